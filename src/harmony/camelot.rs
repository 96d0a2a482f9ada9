//! Camelot wheel notation.
//!
//! - Numbers 1-12 are positions on the wheel
//! - 'A' suffix = minor key, 'B' suffix = major key
//! - Neighbouring numbers (with 12 wrapping to 1) are a perfect fifth apart
//! - Same number, other letter = relative major/minor

use std::fmt;
use std::str::FromStr;

/// Wheel ring: inner (minor, `A`) or outer (major, `B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    Minor,
    Major,
}

impl Mode {
    pub fn letter(self) -> char {
        match self {
            Mode::Minor => 'A',
            Mode::Major => 'B',
        }
    }

    pub fn switched(self) -> Mode {
        match self {
            Mode::Minor => Mode::Major,
            Mode::Major => Mode::Minor,
        }
    }
}

/// A parsed Camelot key such as `8A` or `12B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CamelotKey {
    number: u8,
    mode: Mode,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a Camelot key (expected 1A-12B)")]
pub struct InvalidCamelotKey(pub String);

impl CamelotKey {
    /// Build a key from a wheel position. Returns `None` outside 1..=12.
    pub fn new(number: u8, mode: Mode) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self { number, mode })
    }

    pub fn number(self) -> u8 {
        self.number
    }

    pub fn mode(self) -> Mode {
        self.mode
    }

    /// One step clockwise (12 wraps to 1).
    pub fn next(self) -> Self {
        Self {
            number: self.number % 12 + 1,
            mode: self.mode,
        }
    }

    /// One step counter-clockwise (1 wraps to 12).
    pub fn previous(self) -> Self {
        Self {
            number: if self.number == 1 { 12 } else { self.number - 1 },
            mode: self.mode,
        }
    }

    /// Same number, other ring.
    pub fn relative(self) -> Self {
        Self {
            number: self.number,
            mode: self.mode.switched(),
        }
    }

    /// Circular distance between two wheel numbers, ignoring the ring (0-6).
    pub fn wheel_distance(self, other: CamelotKey) -> u8 {
        let diff = self.number.abs_diff(other.number);
        diff.min(12 - diff)
    }

    /// Keys that mix cleanly with this one: itself, both neighbours and the
    /// relative key.
    pub fn compatible_keys(self) -> [CamelotKey; 4] {
        [self, self.next(), self.previous(), self.relative()]
    }
}

impl FromStr for CamelotKey {
    type Err = InvalidCamelotKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidCamelotKey(s.to_string());

        let mut chars = trimmed.chars();
        let mode = match chars.next_back().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Mode::Minor,
            Some('B') => Mode::Major,
            _ => return Err(invalid()),
        };
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let number: u8 = digits.parse().map_err(|_| invalid())?;
        CamelotKey::new(number, mode).ok_or_else(invalid)
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.mode.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> CamelotKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_valid_keys() {
        assert_eq!(key("8A"), CamelotKey::new(8, Mode::Minor).unwrap());
        assert_eq!(key("12b"), CamelotKey::new(12, Mode::Major).unwrap());
        assert_eq!(key(" 1A "), CamelotKey::new(1, Mode::Minor).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "A", "8", "13A", "0B", "8C", "Am", "-1A", "8AA"] {
            assert!(bad.parse::<CamelotKey>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_display_round_trips() {
        for n in 1..=12 {
            for mode in [Mode::Minor, Mode::Major] {
                let k = CamelotKey::new(n, mode).unwrap();
                assert_eq!(k.to_string().parse::<CamelotKey>().unwrap(), k);
            }
        }
    }

    #[test]
    fn test_compatible_keys() {
        let compatible = key("8A").compatible_keys();
        assert!(compatible.contains(&key("8A")));
        assert!(compatible.contains(&key("7A")));
        assert!(compatible.contains(&key("9A")));
        assert!(compatible.contains(&key("8B")));
    }

    #[test]
    fn test_wheel_wraps() {
        assert_eq!(key("12A").next(), key("1A"));
        assert_eq!(key("1B").previous(), key("12B"));
        assert_eq!(key("12A").wheel_distance(key("1A")), 1);
        assert_eq!(key("3A").wheel_distance(key("9B")), 6);
    }
}
