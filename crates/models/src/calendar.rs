use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Custom error type for parsing academic years
#[derive(Debug, Clone, PartialEq)]
pub enum ParseAcademicYearError {
    InvalidFormat(String),
    NonConsecutive(String),
}

impl Display for ParseAcademicYearError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidFormat(s) => write!(f, "Expected YYYY-YYYY, got: {}", s),
            Self::NonConsecutive(s) => {
                write!(f, "Academic year must span consecutive years: {}", s)
            }
        }
    }
}

/// A calendar year label like "2024-2025". Requirement sets are versioned
/// by the academic year they were published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AcademicYear {
    pub start: u16,
}

impl AcademicYear {
    pub fn new(start: u16) -> Self {
        Self { start }
    }
}

impl FromStr for AcademicYear {
    type Err = ParseAcademicYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let (first, second) = s
            .split_once('-')
            .ok_or_else(|| ParseAcademicYearError::InvalidFormat(s.to_string()))?;

        if first.len() != 4 || second.len() != 4 {
            return Err(ParseAcademicYearError::InvalidFormat(s.to_string()));
        }

        let start: u16 = first
            .parse()
            .map_err(|_| ParseAcademicYearError::InvalidFormat(s.to_string()))?;
        let end: u16 = second
            .parse()
            .map_err(|_| ParseAcademicYearError::InvalidFormat(s.to_string()))?;

        if end != start + 1 {
            return Err(ParseAcademicYearError::NonConsecutive(s.to_string()));
        }

        Ok(Self { start })
    }
}

impl Display for AcademicYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}-{}", self.start, self.start + 1)
    }
}

/// Whether a requirement set published for `set_year` applies to a plan
/// following `plan_year`. Sets without a year apply to every plan; dated
/// sets only apply to plans following that exact year.
pub fn year_in_scope(set_year: Option<&str>, plan_year: Option<&str>) -> bool {
    match set_year {
        None => true,
        Some(set) => plan_year == Some(set),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_academic_year() {
        assert_eq!(
            AcademicYear::from_str("2024-2025"),
            Ok(AcademicYear::new(2024))
        );
        assert_eq!(
            AcademicYear::from_str(" 2019-2020 "),
            Ok(AcademicYear::new(2019))
        );
    }

    #[test]
    fn test_parse_academic_year_errors() {
        assert_eq!(
            AcademicYear::from_str("2024"),
            Err(ParseAcademicYearError::InvalidFormat("2024".to_string()))
        );
        assert_eq!(
            AcademicYear::from_str("24-25"),
            Err(ParseAcademicYearError::InvalidFormat("24-25".to_string()))
        );
        assert_eq!(
            AcademicYear::from_str("2024-2026"),
            Err(ParseAcademicYearError::NonConsecutive(
                "2024-2026".to_string()
            ))
        );
    }

    #[test]
    fn test_display_round_trip() {
        let year = AcademicYear::from_str("2024-2025").unwrap();
        assert_eq!(year.to_string(), "2024-2025");
    }

    #[test]
    fn test_year_scope() {
        // Undated sets apply to every plan
        assert!(year_in_scope(None, Some("2024-2025")));
        assert!(year_in_scope(None, None));

        // Dated sets require an exact match
        assert!(year_in_scope(Some("2024-2025"), Some("2024-2025")));
        assert!(!year_in_scope(Some("2024-2025"), Some("2023-2024")));
        assert!(!year_in_scope(Some("2024-2025"), None));
    }
}
