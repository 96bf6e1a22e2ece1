use crate::dtos::course::CourseResponse;
use chrono::NaiveDateTime;
use database::entities::{courses, degrees, plan_courses, plan_degrees, plans};
use sea_orm::prelude::Uuid;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlanRequest {
    pub name: String,
    /// Catalog year in "2024-2025" form; omit to track only year-less
    /// requirement sets
    pub academic_calendar_year: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlanRequest {
    pub name: Option<String>,
    /// Catalog year in "2024-2025" form; changing it re-scopes the plan's
    /// tracked requirements
    pub academic_calendar_year: Option<String>,
}

/// A plan as it appears in listings
#[derive(Debug, Serialize, ToSchema)]
pub struct PlanResponse {
    pub id: String,
    pub name: String,
    pub academic_calendar_year: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<plans::Model> for PlanResponse {
    fn from(plan: plans::Model) -> Self {
        Self {
            id: plan.id.to_string(),
            name: plan.name,
            academic_calendar_year: plan.academic_calendar_year,
            created_at: plan.created_at,
            updated_at: plan.updated_at,
        }
    }
}

/// A plan with its attached degrees and course entries
#[derive(Debug, Serialize, ToSchema)]
pub struct PlanDetailResponse {
    pub id: String,
    pub name: String,
    pub academic_calendar_year: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub degrees: Vec<PlanDegreeResponse>,
    pub courses: Vec<PlanCourseResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanDegreeResponse {
    pub id: String,
    pub degree_id: String,
    pub degree_type: String,
    pub degree_name: Option<String>,
}

impl PlanDegreeResponse {
    pub fn from_models(link: plan_degrees::Model, degree: Option<degrees::Model>) -> Self {
        Self {
            id: link.id.to_string(),
            degree_id: link.degree_id.to_string(),
            degree_type: link.degree_type.to_string(),
            degree_name: degree.map(|degree| degree.name),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanCourseResponse {
    pub id: String,
    pub status: String,
    pub term: Option<String>,
    pub term_index: Option<i16>,
    pub grade: Option<String>,
    pub course: Option<CourseResponse>,
}

impl PlanCourseResponse {
    pub fn from_models(entry: plan_courses::Model, course: Option<courses::Model>) -> Self {
        Self {
            id: entry.id.to_string(),
            status: entry.status.to_string(),
            term: entry.term,
            term_index: entry.term_index,
            grade: entry.grade,
            course: course.map(CourseResponse::from),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddDegreeRequest {
    pub degree_id: Uuid,
    /// "MAJOR", "MINOR" or "SPECIALIZATION"
    pub degree_type: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanDegreeCreatedResponse {
    pub id: String,
    pub degree_id: String,
    pub degree_type: String,
    /// False when the degree was attached but its first evaluation failed
    pub requirements_refreshed: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCourseRequest {
    pub course_id: Uuid,
    /// "PLANNED", "IN_PROGRESS" or "COMPLETED"; defaults to "PLANNED"
    pub status: Option<String>,
    pub term: Option<String>,
    pub term_index: Option<i16>,
    pub grade: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePlanCourseRequest {
    /// "PLANNED", "IN_PROGRESS" or "COMPLETED"
    pub status: Option<String>,
    pub term: Option<String>,
    pub term_index: Option<i16>,
    pub grade: Option<String>,
}

/// A course entry after a mutation, with the outcome of the follow-up
/// requirement re-evaluation
#[derive(Debug, Serialize, ToSchema)]
pub struct PlanCourseEntryResponse {
    pub id: String,
    pub course_id: String,
    pub status: String,
    pub term: Option<String>,
    pub term_index: Option<i16>,
    pub grade: Option<String>,
    /// False when the entry was saved but re-evaluation failed
    pub requirements_refreshed: bool,
}

impl PlanCourseEntryResponse {
    pub fn from_model(entry: plan_courses::Model, requirements_refreshed: bool) -> Self {
        Self {
            id: entry.id.to_string(),
            course_id: entry.course_id.to_string(),
            status: entry.status.to_string(),
            term: entry.term,
            term_index: entry.term_index,
            grade: entry.grade,
            requirements_refreshed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanCourseRemovedResponse {
    /// False when the entry was removed but re-evaluation failed
    pub requirements_refreshed: bool,
}

/// Requirement progress for every degree attached to a plan
#[derive(Debug, Serialize, ToSchema)]
pub struct PlanRequirementsResponse {
    pub plan_id: String,
    pub degrees: Vec<DegreeProgressResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DegreeProgressResponse {
    pub plan_degree_id: String,
    pub degree_id: String,
    pub degree_type: String,
    pub requirements: Vec<PlanRequirementResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlanRequirementResponse {
    pub id: String,
    pub requirement_id: String,
    pub name: Option<String>,
    pub requirement_type: Option<String>,
    /// "NOT_STARTED", "IN_PROGRESS" or "COMPLETED"
    pub status: String,
    /// Percent complete, floored to a whole number; 100 only once met
    pub progress: i16,
    pub updated_at: NaiveDateTime,
}
