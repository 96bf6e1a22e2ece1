use database::entities::{courses, faculties};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Query parameters for course listing
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct CourseQueryParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u64,

    /// Number of items per page
    #[serde(default = "default_per_page")]
    pub per_page: u64,

    /// Substring match against catalog number, title and description
    pub search: Option<String>,

    /// Comma-separated subject codes, e.g. "MATH,PMATH"
    pub subjects: Option<String>,

    /// Course level, e.g. "300" keeps only 3xx courses
    pub level: Option<String>,
}

fn default_page() -> u64 {
    1
}

fn default_per_page() -> u64 {
    20
}

/// A catalog course as it appears in listings and embedded references
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: String,
    pub subject_code: String,
    pub catalog_number: String,
    pub title: String,
    pub units: f32,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl From<courses::Model> for CourseResponse {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id.to_string(),
            subject_code: course.subject_code,
            catalog_number: course.catalog_number,
            title: course.title,
            units: course.units,
            description: course.description,
            url: course.url,
        }
    }
}

/// A single course with its full catalog record
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub id: String,
    pub subject_code: String,
    pub catalog_number: String,
    pub title: String,
    pub units: f32,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
    pub antirequisites: Option<String>,
    pub url: Option<String>,
    pub faculty: Option<FacultyResponse>,
}

impl CourseDetailResponse {
    pub fn from_models(course: courses::Model, faculty: Option<faculties::Model>) -> Self {
        Self {
            id: course.id.to_string(),
            subject_code: course.subject_code,
            catalog_number: course.catalog_number,
            title: course.title,
            units: course.units,
            description: course.description,
            prerequisites: course.prerequisites,
            corequisites: course.corequisites,
            antirequisites: course.antirequisites,
            url: course.url,
            faculty: faculty.map(FacultyResponse::from),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FacultyResponse {
    pub code: String,
    pub name: String,
}

impl From<faculties::Model> for FacultyResponse {
    fn from(faculty: faculties::Model) -> Self {
        Self {
            code: faculty.code,
            name: faculty.name,
        }
    }
}

/// Paginated course list response
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedCoursesResponse {
    pub courses: Vec<CourseResponse>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}
