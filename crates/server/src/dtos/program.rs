use crate::dtos::course::{CourseResponse, FacultyResponse};
use database::entities::{degrees, faculties, programs};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for program listing
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ProgramQueryParams {
    /// Faculty code, e.g. "MATH"
    pub faculty: Option<String>,
}

/// A program as it appears in listings
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub faculty: Option<FacultyResponse>,
}

impl ProgramResponse {
    pub fn from_models(program: programs::Model, faculty: Option<faculties::Model>) -> Self {
        Self {
            id: program.id.to_string(),
            name: program.name,
            description: program.description,
            faculty: faculty.map(FacultyResponse::from),
        }
    }
}

/// A program with the degrees it offers
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgramDetailResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub faculty: Option<FacultyResponse>,
    pub degrees: Vec<DegreeSummaryResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DegreeSummaryResponse {
    pub id: String,
    pub name: String,
    pub degree_type: String,
    pub description: Option<String>,
}

impl From<degrees::Model> for DegreeSummaryResponse {
    fn from(degree: degrees::Model) -> Self {
        Self {
            id: degree.id.to_string(),
            name: degree.name,
            degree_type: degree.degree_type.to_string(),
            description: degree.description,
        }
    }
}

/// A degree with its full requirement definitions, grouped by catalog year
#[derive(Debug, Serialize, ToSchema)]
pub struct DegreeDetailResponse {
    pub id: String,
    pub program_id: String,
    pub name: String,
    pub degree_type: String,
    pub description: Option<String>,
    pub requirement_sets: Vec<RequirementSetResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementSetResponse {
    pub id: String,
    pub name: Option<String>,
    pub academic_calendar_year: Option<String>,
    pub requirements: Vec<RequirementResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementResponse {
    pub id: String,
    pub name: String,
    pub requirement_type: String,
    pub description: Option<String>,
    pub courses_required: Option<i32>,
    pub units_required: Option<f32>,
    pub level_restriction: Option<String>,
    pub course_code_restriction: Option<String>,
    pub concentration_type: Option<String>,
    pub min_courses_per_subject: Option<i32>,
    pub courses: Vec<CourseResponse>,
    pub lists: Vec<RequirementListResponse>,
    pub substitutions: Vec<SubstitutionResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequirementListResponse {
    pub id: String,
    pub name: Option<String>,
    pub courses: Vec<CourseResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubstitutionResponse {
    pub original: CourseResponse,
    pub substitute: CourseResponse,
}
