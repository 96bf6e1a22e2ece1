//! Shapes of the catalog seed document. The seeder reads one JSON file
//! describing faculties, courses and programs (with their degrees,
//! requirement sets and requirements) and loads it into the database.

use crate::status::{DegreeType, RequirementType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogImport {
    #[serde(default)]
    pub faculties: Vec<FacultyImport>,
    #[serde(default)]
    pub courses: Vec<CourseImport>,
    #[serde(default)]
    pub programs: Vec<ProgramImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyImport {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseImport {
    pub subject_code: String,
    pub catalog_number: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub units: f32,
    // Requisite fields are advisory calendar text, stored verbatim
    #[serde(default)]
    pub prerequisites: Option<String>,
    #[serde(default)]
    pub corequisites: Option<String>,
    #[serde(default)]
    pub antirequisites: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Faculty code, resolved against the faculties section
    #[serde(default)]
    pub faculty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramImport {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub faculty: Option<String>,
    #[serde(default)]
    pub degrees: Vec<DegreeImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegreeImport {
    pub name: String,
    pub degree_type: DegreeType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub requirement_sets: Vec<RequirementSetImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementSetImport {
    #[serde(default)]
    pub name: Option<String>,
    /// Academic year label ("2024-2025"); omitted means the set always applies
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub requirements: Vec<RequirementImport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementImport {
    pub name: String,
    #[serde(rename = "type")]
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub description: Option<String>,
    /// Course keys ("MATH 135") in the requirement's own course set
    #[serde(default)]
    pub courses: Vec<String>,
    #[serde(default)]
    pub courses_required: Option<i32>,
    #[serde(default)]
    pub units_required: Option<f32>,
    #[serde(default)]
    pub lists: Vec<ListImport>,
    #[serde(default)]
    pub substitutions: Vec<SubstitutionImport>,
    /// "BREADTH", "DEPTH", or a subject code pinning the depth subject
    #[serde(default)]
    pub concentration_type: Option<String>,
    #[serde(default)]
    pub min_courses_per_subject: Option<i32>,
    /// Comma-separated subject codes scoping a units requirement
    #[serde(default)]
    pub subject_filter: Option<String>,
    /// Free-text minimum level ("300-level") scoping a units requirement
    #[serde(default)]
    pub level_restriction: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListImport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionImport {
    /// Course key of the required course being stood in for
    pub original: String,
    /// Course key that may stand in for it
    pub substitute: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_document() {
        let raw = r#"{
            "faculties": [{ "code": "MATH", "name": "Faculty of Mathematics" }],
            "courses": [
                {
                    "subject_code": "MATH",
                    "catalog_number": "135",
                    "title": "Algebra for Honours Mathematics",
                    "units": 0.5,
                    "faculty": "MATH"
                }
            ],
            "programs": [
                {
                    "name": "Pure Mathematics",
                    "faculty": "MATH",
                    "degrees": [
                        {
                            "name": "Honours Pure Mathematics",
                            "degree_type": "MAJOR",
                            "requirement_sets": [
                                {
                                    "year": "2024-2025",
                                    "requirements": [
                                        {
                                            "name": "Core algebra",
                                            "type": "COURSE_LIST",
                                            "courses": ["MATH 135", "MATH 136"],
                                            "courses_required": 2
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }"#;

        let catalog: CatalogImport = serde_json::from_str(raw).unwrap();
        assert_eq!(catalog.faculties.len(), 1);
        assert_eq!(catalog.courses[0].units, 0.5);

        let degree = &catalog.programs[0].degrees[0];
        assert_eq!(degree.degree_type, DegreeType::Major);

        let requirement = &degree.requirement_sets[0].requirements[0];
        assert_eq!(requirement.requirement_type, RequirementType::CourseList);
        assert_eq!(requirement.courses_required, Some(2));
        assert!(requirement.lists.is_empty());
        assert!(requirement.substitutions.is_empty());
    }

    #[test]
    fn test_sparse_requirement_defaults() {
        let raw = r#"{
            "name": "Depth",
            "type": "CONCENTRATION",
            "concentration_type": "DEPTH",
            "min_courses_per_subject": 3
        }"#;
        let requirement: RequirementImport = serde_json::from_str(raw).unwrap();

        assert_eq!(
            requirement.requirement_type,
            RequirementType::Concentration
        );
        assert_eq!(requirement.min_courses_per_subject, Some(3));
        assert_eq!(requirement.courses_required, None);
        assert!(requirement.courses.is_empty());
    }
}
