//! Parser for the git config file format.
//!
//! See [`git-config`](https://git-scm.com/docs/git-config#_syntax) for the
//! grammar. Errors report the 1-based line on which parsing failed.

use super::{Entry, Section};

use crate::{Error, Result};

pub(crate) fn parse(text: &str) -> Result<Vec<Section>> {
    Parser::new(text).parse()
}

/// Returns true if `key` is a valid variable name: an ASCII letter followed
/// by ASCII alphanumerics and `-`.
pub(crate) fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(is_key_char),
        _ => false,
    }
}

/// Returns true if `name` is a valid section name: ASCII alphanumerics,
/// `-` and `.`.
pub(crate) fn is_valid_section(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| is_key_char(c) || c == '.')
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_comment(c: char) -> bool {
    c == ';' || c == '#'
}

struct Parser<'a> {
    lines: Vec<&'a str>,
    // Index of the line currently being parsed.
    pos: usize,
    sections: Vec<Section>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Parser<'a> {
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        Parser {
            lines,
            pos: 0,
            sections: Vec::new(),
        }
    }

    fn error(&self) -> Error {
        Error::ConfigParseError { line: self.pos + 1 }
    }

    fn parse(mut self) -> Result<Vec<Section>> {
        while self.pos < self.lines.len() {
            let line = self.lines[self.pos].trim_start();

            if line.is_empty() || line.starts_with(is_comment) {
                // nothing to do
            } else if line.starts_with('[') {
                let rest = self.parse_section_header(line)?;
                let rest = rest.trim_start();
                if !rest.is_empty() && !rest.starts_with(is_comment) {
                    self.parse_entry(rest)?;
                }
            } else {
                self.parse_entry(line)?;
            }

            self.pos += 1;
        }

        Ok(self.sections)
    }

    // Parses `[name]`, `[name "subsection"]`, or the legacy `[name.subsection]`,
    // pushes the new section, and returns whatever follows the `]`.
    fn parse_section_header(&mut self, line: &'a str) -> Result<&'a str> {
        let body = &line[1..];
        let name_len = body
            .find(|c: char| !(is_key_char(c) || c == '.'))
            .unwrap_or_else(|| body.len());
        let name = &body[..name_len];
        let rest = &body[name_len..];

        if name.is_empty() {
            return Err(self.error());
        }

        if let Some(rest) = rest.strip_prefix(']') {
            let section = match name.find('.') {
                Some(dot) => {
                    let (section, sub) = (&name[..dot], &name[dot + 1..]);
                    if section.is_empty() || sub.is_empty() {
                        return Err(self.error());
                    }
                    Section::new(section, Some(sub.to_ascii_lowercase()))
                }
                None => Section::new(name, None),
            };
            self.sections.push(section);
            return Ok(rest);
        }

        if name.contains('.') {
            return Err(self.error());
        }

        if !rest.starts_with(|c: char| c == ' ' || c == '\t') {
            return Err(self.error());
        }

        let quoted = rest.trim_start_matches(|c: char| c == ' ' || c == '\t');
        let quoted = match quoted.strip_prefix('"') {
            Some(quoted) => quoted,
            None => return Err(self.error()),
        };

        let mut chars = quoted.char_indices();
        let mut subsection = String::new();
        let consumed = loop {
            match chars.next() {
                Some((i, '"')) => break i + 1,
                Some((_, '\\')) => match chars.next() {
                    Some((_, c)) => subsection.push(c),
                    None => return Err(self.error()),
                },
                Some((_, c)) => subsection.push(c),
                None => return Err(self.error()),
            }
        };

        match quoted[consumed..].strip_prefix(']') {
            Some(rest) => {
                self.sections.push(Section::new(name, Some(subsection)));
                Ok(rest)
            }
            None => Err(self.error()),
        }
    }

    fn parse_entry(&mut self, line: &'a str) -> Result<()> {
        if self.sections.is_empty() {
            return Err(self.error());
        }

        let key_len = line.find(|c: char| !is_key_char(c)).unwrap_or_else(|| line.len());
        let key = &line[..key_len];
        if !is_valid_key(key) {
            return Err(self.error());
        }

        let rest = line[key_len..].trim_start_matches(|c: char| c == ' ' || c == '\t');
        let value = if rest.is_empty() || rest.starts_with(is_comment) {
            None
        } else if let Some(value) = rest.strip_prefix('=') {
            Some(self.parse_value(value)?)
        } else {
            return Err(self.error());
        };

        if let Some(section) = self.sections.last_mut() {
            section.entries.push(Entry {
                key: key.to_string(),
                value,
            });
        }

        Ok(())
    }

    // Unquotes and unescapes a value. A trailing backslash continues the
    // value on the next line, advancing `pos`.
    fn parse_value(&mut self, mut text: &'a str) -> Result<String> {
        let mut value = String::new();
        let mut pending_space = String::new();
        let mut in_quote = false;
        let mut started = false;

        loop {
            let mut chars = text.chars();
            let mut continued = false;

            while let Some(c) = chars.next() {
                match c {
                    ' ' | '\t' if !in_quote => {
                        if started {
                            pending_space.push(c);
                        }
                    }
                    ';' | '#' if !in_quote => {
                        return Ok(value);
                    }
                    '"' => {
                        value.push_str(&pending_space);
                        pending_space.clear();
                        started = true;
                        in_quote = !in_quote;
                    }
                    '\\' => {
                        let unescaped = match chars.next() {
                            None => {
                                continued = true;
                                break;
                            }
                            Some('n') => '\n',
                            Some('t') => '\t',
                            Some('b') => '\u{8}',
                            Some('\\') => '\\',
                            Some('"') => '"',
                            Some(_) => return Err(self.error()),
                        };
                        value.push_str(&pending_space);
                        pending_space.clear();
                        started = true;
                        value.push(unescaped);
                    }
                    c => {
                        value.push_str(&pending_space);
                        pending_space.clear();
                        started = true;
                        value.push(c);
                    }
                }
            }

            if !continued {
                if in_quote {
                    return Err(self.error());
                }
                return Ok(value);
            }

            // Whitespace before a continuation is kept.
            value.push_str(&pending_space);
            pending_space.clear();

            if self.pos + 1 >= self.lines.len() {
                return Err(self.error());
            }
            self.pos += 1;
            text = self.lines[self.pos];
        }
    }
}
