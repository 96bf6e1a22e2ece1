use crate::course::CourseKey;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Custom error type for parsing level restrictions
#[derive(Debug, Clone, PartialEq)]
pub enum ParseLevelError {
    EmptyInput,
    InvalidLevel(String),
}

impl Display for ParseLevelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyInput => write!(f, "Empty level restriction"),
            Self::InvalidLevel(s) => write!(f, "Unrecognized level restriction: {}", s),
        }
    }
}

/// Minimum course level a requirement accepts, stored in the catalog as
/// free text ("300-level", "300+", ">=300"). Always a lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRestriction {
    pub min_level: u32,
}

impl LevelRestriction {
    pub fn new(min_level: u32) -> Self {
        Self { min_level }
    }

    /// Whether a course's numeric level meets the bound. Courses with no
    /// numeric level ("WKRPT M") never qualify.
    pub fn admits(&self, key: &CourseKey) -> bool {
        match key.level() {
            Some(level) => level >= self.min_level,
            None => false,
        }
    }
}

impl FromStr for LevelRestriction {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseLevelError::EmptyInput);
        }

        let stripped = s
            .trim_start_matches(">=")
            .trim_start_matches('≥')
            .trim_start();

        let digits: String = stripped
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();

        if digits.is_empty() {
            return Err(ParseLevelError::InvalidLevel(s.to_string()));
        }

        let rest = stripped[digits.len()..].trim();
        let valid_tail = matches!(
            rest.to_lowercase().as_str(),
            "" | "+" | "level" | "-level" | "level or above" | "-level or above"
        );
        if !valid_tail {
            return Err(ParseLevelError::InvalidLevel(s.to_string()));
        }

        let min_level = digits
            .parse()
            .map_err(|_| ParseLevelError::InvalidLevel(s.to_string()))?;

        Ok(Self { min_level })
    }
}

impl Display for LevelRestriction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-level or above", self.min_level)
    }
}

/// Subject scope for a requirement, stored as a comma-separated list of
/// subject codes. `None` means any subject qualifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectFilter {
    pub subjects: Vec<String>,
}

impl SubjectFilter {
    /// Parses a comma-separated subject list, uppercasing codes and
    /// dropping empty fragments. Returns `None` if nothing remains.
    pub fn parse(s: &str) -> Option<Self> {
        let subjects: Vec<String> = s
            .split(',')
            .map(|code| code.trim().to_uppercase())
            .filter(|code| !code.is_empty())
            .collect();

        if subjects.is_empty() {
            None
        } else {
            Some(Self { subjects })
        }
    }

    pub fn admits(&self, key: &CourseKey) -> bool {
        self.subjects.iter().any(|code| *code == key.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_parse_level(input: &str, expected_min: u32) {
        let result = LevelRestriction::from_str(input);
        assert!(
            result.is_ok(),
            "Failed to parse '{}': {:?}",
            input,
            result.err()
        );
        assert_eq!(result.unwrap().min_level, expected_min);
    }

    #[test]
    fn test_parse_level_variants() {
        test_parse_level("300-level", 300);
        test_parse_level("300 level", 300);
        test_parse_level("300+", 300);
        test_parse_level(">=300", 300);
        test_parse_level("≥300", 300);
        test_parse_level("300", 300);
        test_parse_level("400-level or above", 400);
    }

    #[test]
    fn test_parse_level_errors() {
        assert_eq!(
            LevelRestriction::from_str(""),
            Err(ParseLevelError::EmptyInput)
        );
        assert_eq!(
            LevelRestriction::from_str("upper year"),
            Err(ParseLevelError::InvalidLevel("upper year".to_string()))
        );
        assert_eq!(
            LevelRestriction::from_str("300ish"),
            Err(ParseLevelError::InvalidLevel("300ish".to_string()))
        );
    }

    #[test]
    fn test_level_admits() {
        let restriction = LevelRestriction::new(300);
        assert!(restriction.admits(&CourseKey::new("PMATH", "347")));
        assert!(restriction.admits(&CourseKey::new("MATH", "300")));
        assert!(!restriction.admits(&CourseKey::new("MATH", "239")));
        assert!(!restriction.admits(&CourseKey::new("WKRPT", "M")));
    }

    #[test]
    fn test_subject_filter() {
        let filter = SubjectFilter::parse("MATH, pmath").unwrap();
        assert_eq!(filter.subjects, vec!["MATH", "PMATH"]);
        assert!(filter.admits(&CourseKey::new("MATH", "135")));
        assert!(filter.admits(&CourseKey::new("PMATH", "347")));
        assert!(!filter.admits(&CourseKey::new("CS", "135")));

        assert_eq!(SubjectFilter::parse(" , "), None);
        assert_eq!(SubjectFilter::parse(""), None);
    }
}
