//! Serializes config sections back to git's file format.

use super::Section;

pub(crate) fn serialize(sections: &[Section]) -> String {
    let mut r = String::new();

    for section in sections {
        match &section.subsection {
            Some(sub) => r.push_str(&format!("[{} \"{}\"]\n", section.name, escape_subsection(sub))),
            None => r.push_str(&format!("[{}]\n", section.name)),
        }

        for entry in &section.entries {
            match &entry.value {
                Some(value) => r.push_str(&format!("\t{} = {}\n", entry.key, format_value(value))),
                None => r.push_str(&format!("\t{}\n", entry.key)),
            }
        }
    }

    r
}

fn escape_subsection(sub: &str) -> String {
    let mut r = String::with_capacity(sub.len());
    for c in sub.chars() {
        if c == '\\' || c == '"' {
            r.push('\\');
        }
        r.push(c);
    }
    r
}

fn format_value(value: &str) -> String {
    let needs_quotes = value.starts_with(|c: char| c == ' ' || c == '\t')
        || value.ends_with(|c: char| c == ' ' || c == '\t' || c == '\r')
        || value.contains(|c: char| c == ';' || c == '#');

    let mut r = String::with_capacity(value.len() + 2);
    if needs_quotes {
        r.push('"');
    }

    for c in value.chars() {
        match c {
            '\\' => r.push_str("\\\\"),
            '"' => r.push_str("\\\""),
            '\n' => r.push_str("\\n"),
            '\t' => r.push_str("\\t"),
            '\u{8}' => r.push_str("\\b"),
            c => r.push(c),
        }
    }

    if needs_quotes {
        r.push('"');
    }
    r
}
