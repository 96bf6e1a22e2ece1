use crate::AppState;
use crate::dtos::course::CourseResponse;
use crate::dtos::program::{
    DegreeDetailResponse, DegreeSummaryResponse, ProgramDetailResponse, ProgramQueryParams,
    ProgramResponse, RequirementListResponse, RequirementResponse, RequirementSetResponse,
    SubstitutionResponse,
};
use crate::routes::internal_error;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::catalog::{
    CatalogService, DegreeDetail, RequirementDetail, RequirementSetDetail,
};
use sea_orm::prelude::Uuid;

/// Get programs, optionally narrowed to one faculty
#[utoipa::path(
    get,
    path = "/programs",
    params(ProgramQueryParams),
    responses(
        (status = 200, description = "List of programs retrieved successfully", body = [ProgramResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Programs"
)]
pub async fn get_programs(
    State(state): State<AppState>,
    Query(params): Query<ProgramQueryParams>,
) -> Result<Json<Vec<ProgramResponse>>, StatusCode> {
    let programs = CatalogService::get_programs(&state.db, params.faculty)
        .await
        .map_err(internal_error)?;

    Ok(Json(
        programs
            .into_iter()
            .map(|(program, faculty)| ProgramResponse::from_models(program, faculty))
            .collect(),
    ))
}

/// Get a program with the degrees it offers
#[utoipa::path(
    get,
    path = "/programs/{id}",
    params(
        ("id" = Uuid, Path, description = "Program ID")
    ),
    responses(
        (status = 200, description = "Program found", body = ProgramDetailResponse),
        (status = 404, description = "Program not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Programs"
)]
pub async fn get_program_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgramDetailResponse>, StatusCode> {
    let program_data = CatalogService::get_program_by_id(&state.db, id)
        .await
        .map_err(internal_error)?;

    match program_data {
        Some((program, faculty, degrees)) => Ok(Json(ProgramDetailResponse {
            id: program.id.to_string(),
            name: program.name,
            description: program.description,
            faculty: faculty.map(Into::into),
            degrees: degrees
                .into_iter()
                .map(DegreeSummaryResponse::from)
                .collect(),
        })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Get a degree with its full requirement definitions
#[utoipa::path(
    get,
    path = "/degrees/{id}",
    params(
        ("id" = Uuid, Path, description = "Degree ID")
    ),
    responses(
        (status = 200, description = "Degree found", body = DegreeDetailResponse),
        (status = 404, description = "Degree not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Programs"
)]
pub async fn get_degree(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DegreeDetailResponse>, StatusCode> {
    let detail = CatalogService::get_degree_detail(&state.db, id)
        .await
        .map_err(internal_error)?;

    match detail {
        Some(detail) => Ok(Json(to_degree_detail(detail))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

fn to_degree_detail(detail: DegreeDetail) -> DegreeDetailResponse {
    let degree = detail.degree;

    DegreeDetailResponse {
        id: degree.id.to_string(),
        program_id: degree.program_id.to_string(),
        name: degree.name,
        degree_type: degree.degree_type.to_string(),
        description: degree.description,
        requirement_sets: detail.sets.into_iter().map(to_requirement_set).collect(),
    }
}

fn to_requirement_set(detail: RequirementSetDetail) -> RequirementSetResponse {
    RequirementSetResponse {
        id: detail.set.id.to_string(),
        name: detail.set.name,
        academic_calendar_year: detail.set.academic_calendar_year,
        requirements: detail.requirements.into_iter().map(to_requirement).collect(),
    }
}

fn to_requirement(detail: RequirementDetail) -> RequirementResponse {
    let model = detail.requirement;

    RequirementResponse {
        id: model.id.to_string(),
        name: model.name,
        requirement_type: model.requirement_type,
        description: model.description,
        courses_required: model.courses_required,
        units_required: model.units_required,
        level_restriction: model.level_restriction,
        course_code_restriction: model.course_code_restriction,
        concentration_type: model.concentration_type,
        min_courses_per_subject: model.min_courses_per_subject,
        courses: detail.courses.into_iter().map(CourseResponse::from).collect(),
        lists: detail
            .lists
            .into_iter()
            .map(|(list, courses)| RequirementListResponse {
                id: list.id.to_string(),
                name: list.name,
                courses: courses.into_iter().map(CourseResponse::from).collect(),
            })
            .collect(),
        substitutions: detail
            .substitutions
            .into_iter()
            .map(|(original, substitute)| SubstitutionResponse {
                original: original.into(),
                substitute: substitute.into(),
            })
            .collect(),
    }
}
