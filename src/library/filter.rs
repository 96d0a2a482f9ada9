//! Library filter predicates.
//!
//! All active predicates are combined with AND. Range bounds are inclusive and
//! a missing bound leaves that side open.

use std::str::FromStr;

use crate::model::Track;

/// Inclusive range with optional ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Default for Bounds<T> {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
        }
    }
}

impl<T: PartialOrd + Copy> Bounds<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid range '{0}' (expected MIN..MAX, MIN.., ..MAX or a single value)")]
pub struct InvalidBounds(pub String);

/// Parses `120..128`, `120..`, `..128`, a single value (`124` = exactly 124)
/// or an empty string (unbounded).
impl<T: FromStr + PartialOrd + Copy> FromStr for Bounds<T> {
    type Err = InvalidBounds;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parse_end = |part: &str| -> Result<Option<T>, InvalidBounds> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<T>()
                .map(Some)
                .map_err(|_| InvalidBounds(s.to_string()))
        };

        match s.split_once("..") {
            Some((min, max)) => Ok(Self::new(parse_end(min)?, parse_end(max)?)),
            None => Ok(match parse_end(s)? {
                Some(exact) => Self::between(exact, exact),
                None => Self::default(),
            }),
        }
    }
}

/// Active library filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the key ("" matches everything)
    pub key: String,
    pub bpm: Bounds<f64>,
    pub energy: Bounds<u8>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.bpm.is_unbounded() && self.energy.is_unbounded()
    }

    pub fn matches(&self, track: &Track) -> bool {
        let key_match = self.key.is_empty() || track.key.to_lowercase().contains(&self.key.to_lowercase());
        key_match && self.bpm.contains(track.bpm) && self.energy.contains(track.energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::track;

    #[test]
    fn test_bounds_inclusive_at_both_ends() {
        let bounds = Bounds::between(120.0, 128.0);
        assert!(bounds.contains(120.0));
        assert!(bounds.contains(128.0));
        assert!(!bounds.contains(128.1));
        assert!(!bounds.contains(119.9));
    }

    #[test]
    fn test_open_bounds() {
        let at_least: Bounds<u8> = Bounds::new(Some(5), None);
        assert!(at_least.contains(10));
        assert!(!at_least.contains(4));
        assert!(Bounds::<u8>::default().contains(0));
    }

    #[test]
    fn test_parse_bounds() {
        assert_eq!("120..128".parse::<Bounds<f64>>().unwrap(), Bounds::between(120.0, 128.0));
        assert_eq!("5..".parse::<Bounds<u8>>().unwrap(), Bounds::new(Some(5), None));
        assert_eq!("..7".parse::<Bounds<u8>>().unwrap(), Bounds::new(None, Some(7)));
        assert_eq!("6".parse::<Bounds<u8>>().unwrap(), Bounds::between(6, 6));
        assert!("".parse::<Bounds<u8>>().unwrap().is_unbounded());
        assert!("fast..".parse::<Bounds<f64>>().is_err());
    }

    #[test]
    fn test_key_filter_is_case_insensitive_substring() {
        let criteria = FilterCriteria {
            key: "a".to_string(),
            ..Default::default()
        };
        assert!(criteria.matches(&track("x", "8A", 120.0, 5)));
        assert!(!criteria.matches(&track("y", "8B", 120.0, 5)));

        let criteria = FilterCriteria {
            key: "1".to_string(),
            ..Default::default()
        };
        assert!(criteria.matches(&track("z", "11B", 120.0, 5)));
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let criteria = FilterCriteria {
            key: "8".to_string(),
            bpm: Bounds::new(None, Some(124.0)),
            energy: Bounds::new(Some(6), None),
        };
        assert!(criteria.matches(&track("a", "8A", 124.0, 6)));
        assert!(!criteria.matches(&track("b", "8A", 124.0, 5)));
        assert!(!criteria.matches(&track("c", "8A", 125.0, 6)));
        assert!(!criteria.matches(&track("d", "9A", 124.0, 6)));
    }
}
