use std::fmt;
use std::str;

use super::parse_utils::split_once;

/// An `Attribution` combines a person's identity (name and e-mail address)
/// with the timestamp for a particular action.
///
/// Commits carry two of these: the author and the committer.
///
/// The `timestamp` value is in seconds relative to the Unix epoch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribution {
    name: String,
    email: String,
    timestamp: i64,
    tz_offset: i16,
}

impl Attribution {
    /// Creates a new attribution. `tz_offset` is in minutes relative to GMT.
    pub fn new(name: &str, email: &str, timestamp: i64, tz_offset: i16) -> Attribution {
        Attribution {
            name: name.to_string(),
            email: email.to_string(),
            timestamp,
            tz_offset,
        }
    }

    /// Parse the value of an `author` or `committer` line into an `Attribution`.
    ///
    /// Returns `None` if the name and e-mail can't be located. A missing or
    /// unreadable timestamp or time zone is treated as zero, as git does.
    pub fn parse(line: &[u8]) -> Option<Attribution> {
        let (name, rest) = split_once(line, &b'<');
        if !rest.contains(&b'>') {
            return None;
        }

        let name = str::from_utf8(trim_last_space(name)).ok()?.to_string();

        let (email, rest) = split_once(rest, &b'>');
        let email = str::from_utf8(email).ok()?.to_string();

        let mut words = rest
            .split(|b| *b == b' ')
            .filter(|w| !w.is_empty())
            .rev();

        let (timestamp, tz_offset) = match (words.next(), words.next()) {
            (Some(tz), Some(ts)) => match parse_timestamp(ts) {
                Some(ts) => (ts, parse_tz(tz).unwrap_or(0)),
                None => (0, 0),
            },
            _ => (0, 0),
        };

        Some(Attribution {
            name,
            email,
            timestamp,
            tz_offset,
        })
    }

    /// Returns the person's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the person's email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timezone offset (minutes relative to GMT).
    pub fn tz_offset(&self) -> i16 {
        self.tz_offset
    }

    /// Returns the timezone formatted in human readable offset from GMT.
    pub fn format_tz(&self) -> String {
        let sign = if self.tz_offset < 0 { "-" } else { "+" };

        let offset = i32::from(self.tz_offset).abs();
        format!("{}{:02}{:02}", sign, offset / 60, offset % 60)
    }
}

fn trim_last_space(s: &[u8]) -> &[u8] {
    match s.last() {
        Some(b' ') => &s[..s.len() - 1],
        _ => s,
    }
}

fn parse_timestamp(s: &[u8]) -> Option<i64> {
    str::from_utf8(s).ok()?.parse().ok()
}

fn parse_tz(s: &[u8]) -> Option<i16> {
    if s.len() != 5 || !s[1..].iter().all(u8::is_ascii_digit) {
        return None;
    }

    let sign: i16 = match s[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let digit = |i: usize| (s[i] - b'0') as i16;
    let hh = digit(1) * 10 + digit(2);
    let mm = digit(3) * 10 + digit(4);
    Some(sign * (hh * 60 + mm))
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp,
            self.format_tz()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Attribution;

    #[test]
    fn happy_path() {
        let a = Attribution::new("A U Thor", "author@example.com", 1_142_878_501, 150);

        assert_eq!(a.name(), "A U Thor");
        assert_eq!(a.email(), "author@example.com");
        assert_eq!(a.timestamp(), 1_142_878_501);
        assert_eq!(a.tz_offset(), 150);

        assert_eq!(
            a.to_string(),
            "A U Thor <author@example.com> 1142878501 +0230"
        );
    }

    #[test]
    fn extreme_tz_offsets() {
        let a = Attribution::new("A U Thor", "author@example.com", 0, i16::MIN);
        assert_eq!(a.format_tz(), "-54608");

        let a = Attribution::new("A U Thor", "author@example.com", 0, i16::MAX);
        assert_eq!(a.format_tz(), "+54607");
    }

    #[test]
    fn parse_legal_cases() {
        let a = Attribution::parse(b"Me <me@example.com> 1234567890 -0700").unwrap();
        assert_eq!(a.name(), "Me");
        assert_eq!(a.email(), "me@example.com");
        assert_eq!(a.timestamp(), 1234567890);
        assert_eq!(a.tz_offset(), -420);

        let a = Attribution::parse(b"A U Thor<author@example.com>1234567890 +0530").unwrap();
        assert_eq!(a.name(), "A U Thor");
        assert_eq!(a.email(), "author@example.com");
        assert_eq!(a.timestamp(), 1234567890);
        assert_eq!(a.tz_offset(), 330);

        let a = Attribution::parse(b" A U Thor   < author@example.com > 1234567890 -0700").unwrap();
        assert_eq!(a.name(), " A U Thor  ");
        assert_eq!(a.email(), " author@example.com ");
        assert_eq!(a.timestamp(), 1234567890);
        assert_eq!(a.tz_offset(), -420);
    }

    #[test]
    fn parse_incomplete_cases() {
        let a = Attribution::parse(b"Me <> 1234567890 -0700").unwrap();
        assert_eq!(a.name(), "Me");
        assert_eq!(a.email(), "");
        assert_eq!(a.timestamp(), 1234567890);

        let a = Attribution::parse(b"<>").unwrap();
        assert_eq!(a.name(), "");
        assert_eq!(a.email(), "");
        assert_eq!(a.timestamp(), 0);
        assert_eq!(a.tz_offset(), 0);

        let a = Attribution::parse(b"Me <me@example.com> 1234567890").unwrap();
        assert_eq!(a.timestamp(), 0);
        assert_eq!(a.tz_offset(), 0);

        let a = Attribution::parse(b"Me <me@example.com> 1234567890 ~0700").unwrap();
        assert_eq!(a.timestamp(), 1234567890);
        assert_eq!(a.tz_offset(), 0);
    }

    #[test]
    fn parse_malformed_cases() {
        assert!(Attribution::parse(b"Me me@example.com> 1234567890 -0700").is_none());
        assert!(Attribution::parse(b"Me <me@example.com 1234567890 -0700").is_none());
        assert!(Attribution::parse(b"M\xE2 <me@example.com> 1234567890 -0700").is_none());
    }

    #[test]
    fn format_tz() {
        let a = Attribution::new("A U Thor", "author@example.com", 1_142_878_501, 0);
        assert_eq!(a.format_tz(), "+0000");

        let a = Attribution::new("A U Thor", "author@example.com", 1_142_878_501, -420);
        assert_eq!(a.format_tz(), "-0700");

        let a = Attribution::new("", "", 1_142_878_501, 840);
        assert_eq!(a.to_string(), " <> 1142878501 +1400");
    }
}
