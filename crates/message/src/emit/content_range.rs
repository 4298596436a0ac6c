//! `Content-Range` values as defined by RFC 7233 section 4.2.
//!
//! Only the satisfied-range form `unit first-last/length` is recognized, with
//! `length` either a number or `*`. Anything else parses to `None`; callers
//! treat that as "no range" rather than as an error.

use std::fmt;

/// The complete length part of a `Content-Range` value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompleteLength {
    Known(u64),
    /// `*`
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRange {
    unit: String,
    first: u64,
    last: u64,
    complete_length: CompleteLength,
}

impl ContentRange {
    /// Parses a header value, `None` when it doesn't match the grammar.
    ///
    /// The unit and the range are separated by one or more spaces or tabs.
    /// A range whose `first` is past its `last` is not satisfiable and does
    /// not match either, and neither does a `last` of `u64::MAX`, whose
    /// exclusive end can't be represented.
    pub fn parse(value: &str) -> Option<Self> {
        let (unit, rest) = value.trim().split_once([' ', '\t'])?;
        if unit.is_empty() || !unit.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }

        let (range, complete_length) = rest.trim_start_matches([' ', '\t']).split_once('/')?;
        let (first, last) = range.split_once('-')?;
        let first = parse_digits(first)?;
        let last = parse_digits(last)?;
        if first > last {
            return None;
        }
        last.checked_add(1)?;

        let complete_length = match complete_length {
            "*" => CompleteLength::Unknown,
            digits => CompleteLength::Known(parse_digits(digits)?),
        };

        Some(Self { unit: unit.to_owned(), first, last, complete_length })
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn first(&self) -> u64 {
        self.first
    }

    pub fn last(&self) -> u64 {
        self.last
    }

    pub fn complete_length(&self) -> CompleteLength {
        self.complete_length
    }

    /// Number of bytes in `first..=last`, never zero.
    pub fn byte_count(&self) -> u64 {
        self.last - self.first + 1
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}/", self.unit, self.first, self.last)?;
        match self.complete_length {
            CompleteLength::Known(length) => write!(f, "{length}"),
            CompleteLength::Unknown => f.write_str("*"),
        }
    }
}

fn parse_digits(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_length() {
        let range = ContentRange::parse("bytes 0-499/1234").unwrap();
        assert_eq!(range.unit(), "bytes");
        assert_eq!(range.first(), 0);
        assert_eq!(range.last(), 499);
        assert_eq!(range.complete_length(), CompleteLength::Known(1234));
        assert_eq!(range.byte_count(), 500);
    }

    #[test]
    fn unknown_length() {
        let range = ContentRange::parse("bytes 0-499/*").unwrap();
        assert_eq!(range.complete_length(), CompleteLength::Unknown);
        assert_eq!(range.to_string(), "bytes 0-499/*");
    }

    #[test]
    fn largest_representable_range() {
        let range = ContentRange::parse("bytes 0-18446744073709551614/*").unwrap();
        assert_eq!(range.byte_count(), u64::MAX);
    }

    #[test]
    fn renders_back() {
        let range = ContentRange::parse("  bytes\t\t100-100/101 ").unwrap();
        assert_eq!(range.byte_count(), 1);
        assert_eq!(range.to_string(), "bytes 100-100/101");
    }

    #[test]
    fn no_match_is_none() {
        for value in [
            "",
            "garbage",
            "bytes",
            "bytes 0-499",
            "bytes -499/1234",
            "bytes 0-/1234",
            "bytes 0-499/",
            "bytes 0-499/12x",
            "bytes +0-499/1234",
            "bytes 500-499/1234",
            "bytes */1234",
            "by-tes 0-1/2",
            "bytes 0 - 499/1234",
            "bytes 0-99999999999999999999/1",
            "bytes 0-18446744073709551615/*",
            "bytes 7-18446744073709551615/20",
        ] {
            assert_eq!(ContentRange::parse(value), None, "{value:?} should not match");
        }
    }
}
