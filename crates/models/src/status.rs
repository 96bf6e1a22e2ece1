use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Implements the sea-orm value conversions for a string-backed enum so it
/// can be used directly as an entity column type. Stored form is the strum
/// serialize string (e.g. "IN_PROGRESS").
#[cfg(feature = "database")]
macro_rules! impl_string_column {
    ($ty:ty) => {
        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Value::String(Some(Box::new(value.to_string())))
            }
        }

        impl sea_orm::TryGetable for $ty {
            fn try_get_by<I: sea_orm::ColIdx>(
                res: &sea_orm::QueryResult,
                index: I,
            ) -> Result<Self, sea_orm::TryGetError> {
                let val: String = res.try_get_by(index)?;

                val.parse().map_err(|_| {
                    sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                        "Unrecognized {} value: {val}",
                        stringify!($ty)
                    )))
                })
            }
        }

        impl sea_orm::sea_query::ValueType for $ty {
            fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
                match v {
                    Value::String(Some(s)) => {
                        s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr)
                    }
                    _ => Err(sea_orm::sea_query::ValueTypeErr),
                }
            }

            fn type_name() -> String {
                stringify!($ty).to_string()
            }

            fn array_type() -> sea_orm::sea_query::ArrayType {
                sea_orm::sea_query::ArrayType::String
            }

            fn column_type() -> sea_orm::sea_query::ColumnType {
                sea_orm::sea_query::ColumnType::Text
            }
        }

        impl sea_orm::sea_query::Nullable for $ty {
            fn null() -> Value {
                Value::String(None)
            }
        }
    };
}

/// Status of a single course entry within a plan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseStatus {
    /// On the plan but not yet taken; never contributes progress
    Planned,
    InProgress,
    Completed,
}

/// Evaluation outcome for a degree requirement
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementStatus {
    NotStarted,
    InProgress,
    Completed,
}

/// How a degree is attached to a plan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DegreeType {
    Major,
    Minor,
    Specialization,
}

/// Discriminator for the stored requirement kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequirementType {
    CourseList,
    Units,
    MultiList,
    Concentration,
}

#[cfg(feature = "database")]
impl_string_column!(CourseStatus);
#[cfg(feature = "database")]
impl_string_column!(RequirementStatus);
#[cfg(feature = "database")]
impl_string_column!(DegreeType);
#[cfg(feature = "database")]
impl_string_column!(RequirementType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_status_round_trip() {
        assert_eq!(CourseStatus::Planned.to_string(), "PLANNED");
        assert_eq!(CourseStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(CourseStatus::Completed.to_string(), "COMPLETED");

        assert_eq!("PLANNED".parse(), Ok(CourseStatus::Planned));
        assert_eq!("IN_PROGRESS".parse(), Ok(CourseStatus::InProgress));
        assert_eq!("COMPLETED".parse(), Ok(CourseStatus::Completed));
    }

    #[test]
    fn test_requirement_status_round_trip() {
        assert_eq!(RequirementStatus::NotStarted.to_string(), "NOT_STARTED");
        assert_eq!("NOT_STARTED".parse(), Ok(RequirementStatus::NotStarted));
        assert_eq!("IN_PROGRESS".parse(), Ok(RequirementStatus::InProgress));
        assert_eq!("COMPLETED".parse(), Ok(RequirementStatus::Completed));
    }

    #[test]
    fn test_requirement_type_round_trip() {
        assert_eq!(RequirementType::CourseList.to_string(), "COURSE_LIST");
        assert_eq!(RequirementType::MultiList.to_string(), "MULTI_LIST");

        assert_eq!("COURSE_LIST".parse(), Ok(RequirementType::CourseList));
        assert_eq!("UNITS".parse(), Ok(RequirementType::Units));
        assert_eq!("MULTI_LIST".parse(), Ok(RequirementType::MultiList));
        assert_eq!("CONCENTRATION".parse(), Ok(RequirementType::Concentration));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("FINISHED".parse::<CourseStatus>().is_err());
        assert!("".parse::<RequirementStatus>().is_err());
        assert!("DOUBLE_MAJOR".parse::<DegreeType>().is_err());
        assert!("COURSELIST".parse::<RequirementType>().is_err());
    }
}
