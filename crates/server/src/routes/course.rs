use crate::AppState;
use crate::dtos::course::{
    CourseDetailResponse, CourseQueryParams, CourseResponse, PaginatedCoursesResponse,
    PaginationMeta,
};
use crate::routes::internal_error;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::catalog::CatalogService;
use models::filters::SubjectFilter;
use sea_orm::prelude::Uuid;
use serde_json::json;

/// Get a paginated list of catalog courses
#[utoipa::path(
    get,
    path = "/courses",
    params(CourseQueryParams),
    responses(
        (status = 200, description = "List of courses retrieved successfully", body = PaginatedCoursesResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Result<Json<PaginatedCoursesResponse>, StatusCode> {
    let page = params.page.max(1);
    let per_page = params.per_page.clamp(1, 100);
    let subjects = params
        .subjects
        .as_deref()
        .and_then(SubjectFilter::parse)
        .map(|filter| filter.subjects);

    let (courses, total_items) = CatalogService::get_courses_paginated(
        &state.db,
        page,
        per_page,
        params.search,
        subjects,
        params.level,
    )
    .await
    .map_err(internal_error)?;

    let total_pages = total_items.div_ceil(per_page);
    let pagination = PaginationMeta {
        page,
        per_page,
        total_pages,
        total_items,
        has_next: page < total_pages,
        has_prev: page > 1,
    };

    Ok(Json(PaginatedCoursesResponse {
        courses: courses.into_iter().map(CourseResponse::from).collect(),
        pagination,
    }))
}

/// Get the filter options the course list supports
#[utoipa::path(
    get,
    path = "/courses/filters",
    responses(
        (status = 200, description = "Filter options retrieved successfully"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_filters(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let subjects = CatalogService::get_subject_codes(&state.db)
        .await
        .map_err(internal_error)?;

    Ok(Json(json!({
        "subjects": subjects,
    })))
}

/// Get a specific course by ID
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(
        ("id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseDetailResponse>, StatusCode> {
    let course_data = CatalogService::get_course_by_id(&state.db, id)
        .await
        .map_err(internal_error)?;

    match course_data {
        Some((course, faculty)) => Ok(Json(CourseDetailResponse::from_models(course, faculty))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
