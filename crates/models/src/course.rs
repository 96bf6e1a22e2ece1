use crate::status::CourseStatus;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Custom error type for parsing course keys
#[derive(Debug, Clone, PartialEq)]
pub enum ParseCourseKeyError {
    EmptyInput,
    MissingSubject,
    MissingNumber,
}

impl Display for ParseCourseKeyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyInput => write!(f, "Empty input string"),
            Self::MissingSubject => write!(f, "No subject code found in input"),
            Self::MissingNumber => write!(f, "No catalog number found in input"),
        }
    }
}

/// Identifies a catalog course by subject code and catalog number
/// ("MATH 135"). Course identity is this pair, not a storage id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseKey {
    /// Subject code, uppercased (e.g. "MATH", "PMATH")
    pub subject: String,
    /// Catalog number, may carry a letter suffix (e.g. "135", "146L")
    pub number: String,
}

impl CourseKey {
    pub fn new(subject: &str, number: &str) -> Self {
        Self {
            subject: subject.trim().to_uppercase(),
            number: number.trim().to_uppercase(),
        }
    }

    /// Numeric prefix of the catalog number ("335L" is level 335), if any
    pub fn level(&self) -> Option<u32> {
        let digits: String = self
            .number
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();

        digits.parse().ok()
    }
}

impl FromStr for CourseKey {
    type Err = ParseCourseKeyError;

    /// Accepts "MATH 135", "MATH135" and lowercase variants
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseCourseKeyError::EmptyInput);
        }

        if let Some((subject, number)) = s.split_once(char::is_whitespace) {
            let key = Self::new(subject, number.trim_start());
            if key.number.is_empty() {
                return Err(ParseCourseKeyError::MissingNumber);
            }
            return Ok(key);
        }

        // No separator: split at the first digit
        match s.find(|c: char| c.is_ascii_digit()) {
            Some(0) => Err(ParseCourseKeyError::MissingSubject),
            Some(idx) => Ok(Self::new(&s[..idx], &s[idx..])),
            None => Err(ParseCourseKeyError::MissingNumber),
        }
    }
}

impl Display for CourseKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} {}", self.subject, self.number)
    }
}

/// A plan's view of one course: catalog identity, unit weight and the
/// plan-entry status that evaluation counts by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCourse {
    pub key: CourseKey,
    pub units: f32,
    pub status: CourseStatus,
}

impl PlannedCourse {
    pub fn new(key: CourseKey, units: f32, status: CourseStatus) -> Self {
        Self { key, units, status }
    }

    /// Whether this entry can satisfy count-based requirements
    pub fn counts_toward_requirements(&self) -> bool {
        matches!(
            self.status,
            CourseStatus::Completed | CourseStatus::InProgress
        )
    }

    /// Whether this entry banks units toward unit-total requirements.
    /// Units accrue on completion only.
    pub fn banks_units(&self) -> bool {
        self.status == CourseStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_parse_key(input: &str, subject: &str, number: &str) {
        let result = CourseKey::from_str(input);
        assert!(
            result.is_ok(),
            "Failed to parse '{}': {:?}",
            input,
            result.err()
        );
        assert_eq!(result.unwrap(), CourseKey::new(subject, number));
    }

    #[test]
    fn test_parse_spaced_keys() {
        test_parse_key("MATH 135", "MATH", "135");
        test_parse_key("PMATH 347", "PMATH", "347");
        test_parse_key("CS 145", "CS", "145");
        test_parse_key("  STAT  231 ", "STAT", "231");
    }

    #[test]
    fn test_parse_compact_keys() {
        test_parse_key("MATH135", "MATH", "135");
        test_parse_key("cs245", "CS", "245");
    }

    #[test]
    fn test_parse_letter_suffixes() {
        test_parse_key("MATH 146L", "MATH", "146L");
        test_parse_key("PHYS121l", "PHYS", "121L");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            CourseKey::from_str(""),
            Err(ParseCourseKeyError::EmptyInput)
        );
        assert_eq!(
            CourseKey::from_str("   "),
            Err(ParseCourseKeyError::EmptyInput)
        );
        assert_eq!(
            CourseKey::from_str("135"),
            Err(ParseCourseKeyError::MissingSubject)
        );
        assert_eq!(
            CourseKey::from_str("MATH"),
            Err(ParseCourseKeyError::MissingNumber)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(CourseKey::new("math", "135").to_string(), "MATH 135");
    }

    #[test]
    fn test_level() {
        assert_eq!(CourseKey::new("MATH", "135").level(), Some(135));
        assert_eq!(CourseKey::new("MATH", "335L").level(), Some(335));
        assert_eq!(CourseKey::new("WKRPT", "M").level(), None);
    }

    #[test]
    fn test_status_contribution_rules() {
        let key = CourseKey::new("MATH", "135");

        let planned = PlannedCourse::new(key.clone(), 0.5, CourseStatus::Planned);
        assert!(!planned.counts_toward_requirements());
        assert!(!planned.banks_units());

        let in_progress = PlannedCourse::new(key.clone(), 0.5, CourseStatus::InProgress);
        assert!(in_progress.counts_toward_requirements());
        assert!(!in_progress.banks_units());

        let completed = PlannedCourse::new(key, 0.5, CourseStatus::Completed);
        assert!(completed.counts_toward_requirements());
        assert!(completed.banks_units());
    }
}
