pub(crate) fn header<'a>(line: &'a [u8], name: &[u8]) -> Option<&'a [u8]> {
    if line.contains(&b' ') {
        let (maybe_name, value) = split_once(line, &b' ');
        if maybe_name == name {
            Some(value)
        } else {
            None
        }
    } else {
        None
    }
}

pub(crate) fn split_once<'a>(s: &'a [u8], c: &u8) -> (&'a [u8], &'a [u8]) {
    match s.iter().position(|b| b == c) {
        Some(n) => (&s[0..n], &s[n + 1..]),
        None => (s, &[]),
    }
}

/// Splits the next `\n`-terminated line off the front of `s`.
///
/// The returned line excludes the newline. Returns `None` once `s` is empty.
pub(crate) fn next_line<'a>(s: &mut &'a [u8]) -> Option<&'a [u8]> {
    if s.is_empty() {
        return None;
    }

    let (line, rest) = match s.iter().position(|b| *b == b'\n') {
        Some(n) => (&s[..n], &s[n + 1..]),
        None => (*s, &s[s.len()..]),
    };

    *s = rest;
    Some(line)
}
