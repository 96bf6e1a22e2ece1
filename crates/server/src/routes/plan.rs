use crate::AppState;
use crate::dtos::plan::{
    AddCourseRequest, AddDegreeRequest, CreatePlanRequest, DegreeProgressResponse,
    PlanCourseEntryResponse, PlanCourseRemovedResponse, PlanCourseResponse,
    PlanDegreeCreatedResponse, PlanDegreeResponse, PlanDetailResponse, PlanRequirementResponse,
    PlanRequirementsResponse, PlanResponse, UpdatePlanCourseRequest, UpdatePlanRequest,
};
use crate::routes::internal_error;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::entities::plans;
use database::services::catalog::CatalogService;
use database::services::plan::PlanService;
use database::services::requirement::{DegreeProgress, RequirementService};
use log::warn;
use models::calendar::AcademicYear;
use models::status::{CourseStatus, DegreeType};
use sea_orm::{DatabaseConnection, prelude::Uuid};
use tower_oauth2_resource_server::claims::DefaultClaims;

/// Get all plans belonging to the authenticated user
#[utoipa::path(
    get,
    path = "/plans",
    responses(
        (status = 200, description = "List of plans retrieved successfully", body = [PlanResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn get_plans(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
) -> Result<Json<Vec<PlanResponse>>, StatusCode> {
    let user_id = subject_of(&claims)?;

    let plans = PlanService::get_plans_for_user(&state.db, user_id)
        .await
        .map_err(internal_error)?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// Create a new plan for the authenticated user
#[utoipa::path(
    post,
    path = "/plans",
    request_body = CreatePlanRequest,
    responses(
        (status = 201, description = "Plan created", body = PlanResponse),
        (status = 400, description = "Empty name or malformed calendar year"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn create_plan(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Json(payload): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), StatusCode> {
    let user_id = subject_of(&claims)?;

    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let year = validated_year(payload.academic_calendar_year)?;

    let plan = PlanService::create_plan(&state.db, user_id, name, year)
        .await
        .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(plan.into())))
}

/// Get a plan with its degrees and course entries
#[utoipa::path(
    get,
    path = "/plans/{id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Plan found", body = PlanDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn get_plan(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanDetailResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let detail = PlanService::get_plan_detail(&state.db, plan)
        .await
        .map_err(internal_error)?;

    Ok(Json(PlanDetailResponse {
        id: detail.plan.id.to_string(),
        name: detail.plan.name,
        academic_calendar_year: detail.plan.academic_calendar_year,
        created_at: detail.plan.created_at,
        updated_at: detail.plan.updated_at,
        degrees: detail
            .degrees
            .into_iter()
            .map(|(link, degree)| PlanDegreeResponse::from_models(link, degree))
            .collect(),
        courses: detail
            .courses
            .into_iter()
            .map(|(entry, course)| PlanCourseResponse::from_models(entry, course))
            .collect(),
    }))
}

/// Rename a plan or switch its catalog year
#[utoipa::path(
    patch,
    path = "/plans/{id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = UpdatePlanRequest,
    responses(
        (status = 200, description = "Plan updated", body = PlanResponse),
        (status = 400, description = "Empty name or malformed calendar year"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn update_plan(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlanRequest>,
) -> Result<Json<PlanResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let name = match payload.name {
        Some(name) => {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(StatusCode::BAD_REQUEST);
            }
            Some(name)
        }
        None => None,
    };
    let year = validated_year(payload.academic_calendar_year)?;
    let year_changed = year.is_some() && year != plan.academic_calendar_year;

    let updated = PlanService::update_plan(&state.db, plan, name, year)
        .await
        .map_err(internal_error)?;

    // A new catalog year changes which requirement sets the plan tracks
    if year_changed {
        refresh_after_mutation(&state.db, &updated).await;
    }

    Ok(Json(updated.into()))
}

/// Delete a plan and everything attached to it
#[utoipa::path(
    delete,
    path = "/plans/{id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 204, description = "Plan deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn delete_plan(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    PlanService::delete_plan(&state.db, plan)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Attach a degree to a plan and start tracking its requirements
#[utoipa::path(
    post,
    path = "/plans/{id}/degrees",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = AddDegreeRequest,
    responses(
        (status = 201, description = "Degree attached", body = PlanDegreeCreatedResponse),
        (status = 400, description = "Unknown degree type"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan or degree not found"),
        (status = 409, description = "Degree already attached in this role"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn add_degree(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddDegreeRequest>,
) -> Result<(StatusCode, Json<PlanDegreeCreatedResponse>), StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let degree_type: DegreeType = payload
        .degree_type
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)?;

    CatalogService::get_degree_by_id(&state.db, payload.degree_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let link = PlanService::add_degree(&state.db, &plan, payload.degree_id, degree_type)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::CONFLICT)?;

    // Seed zeroed progress rows, then compute the real numbers; a failure
    // here leaves the seeded rows for the next refresh
    let requirements_refreshed =
        match RequirementService::seed_plan_degree(&state.db, &plan, &link).await {
            Ok(()) => match RequirementService::refresh_plan_degree(&state.db, &plan, &link).await {
                Ok(()) => true,
                Err(err) => {
                    warn!("Initial refresh for plan degree {} failed: {err}", link.id);
                    false
                }
            },
            Err(err) => {
                warn!("Seeding requirements for plan degree {} failed: {err}", link.id);
                false
            }
        };

    Ok((
        StatusCode::CREATED,
        Json(PlanDegreeCreatedResponse {
            id: link.id.to_string(),
            degree_id: link.degree_id.to_string(),
            degree_type: link.degree_type.to_string(),
            requirements_refreshed,
        }),
    ))
}

/// Detach a degree from a plan, dropping its tracked progress
#[utoipa::path(
    delete,
    path = "/plans/{id}/degrees/{plan_degree_id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("plan_degree_id" = Uuid, Path, description = "Plan degree attachment ID")
    ),
    responses(
        (status = 204, description = "Degree detached"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan or attachment not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn remove_degree(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path((id, plan_degree_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let link = PlanService::get_plan_degree(&state.db, plan.id, plan_degree_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    PlanService::remove_degree(&state.db, link)
        .await
        .map_err(internal_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Add a course entry to a plan
#[utoipa::path(
    post,
    path = "/plans/{id}/courses",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    request_body = AddCourseRequest,
    responses(
        (status = 201, description = "Course added", body = PlanCourseEntryResponse),
        (status = 400, description = "Unknown course status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan or course not found"),
        (status = 409, description = "Course already in the plan"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn add_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddCourseRequest>,
) -> Result<(StatusCode, Json<PlanCourseEntryResponse>), StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let status = parsed_status(payload.status.as_deref())?.unwrap_or(CourseStatus::Planned);

    CatalogService::get_course_by_id(&state.db, payload.course_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let entry = PlanService::add_course(
        &state.db,
        &plan,
        payload.course_id,
        status,
        payload.term,
        payload.term_index,
        payload.grade,
    )
    .await
    .map_err(internal_error)?
    .ok_or(StatusCode::CONFLICT)?;

    let requirements_refreshed = refresh_after_mutation(&state.db, &plan).await;

    Ok((
        StatusCode::CREATED,
        Json(PlanCourseEntryResponse::from_model(
            entry,
            requirements_refreshed,
        )),
    ))
}

/// Update a course entry's status, term or grade
#[utoipa::path(
    patch,
    path = "/plans/{id}/courses/{plan_course_id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("plan_course_id" = Uuid, Path, description = "Plan course entry ID")
    ),
    request_body = UpdatePlanCourseRequest,
    responses(
        (status = 200, description = "Course entry updated", body = PlanCourseEntryResponse),
        (status = 400, description = "Unknown course status"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan or entry not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path((id, plan_course_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdatePlanCourseRequest>,
) -> Result<Json<PlanCourseEntryResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let status = parsed_status(payload.status.as_deref())?;

    let entry = PlanService::get_plan_course(&state.db, plan.id, plan_course_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let updated = PlanService::update_course(
        &state.db,
        entry,
        status,
        payload.term,
        payload.term_index,
        payload.grade,
    )
    .await
    .map_err(internal_error)?;

    let requirements_refreshed = refresh_after_mutation(&state.db, &plan).await;

    Ok(Json(PlanCourseEntryResponse::from_model(
        updated,
        requirements_refreshed,
    )))
}

/// Remove a course entry from a plan
#[utoipa::path(
    delete,
    path = "/plans/{id}/courses/{plan_course_id}",
    params(
        ("id" = Uuid, Path, description = "Plan ID"),
        ("plan_course_id" = Uuid, Path, description = "Plan course entry ID")
    ),
    responses(
        (status = 200, description = "Course entry removed", body = PlanCourseRemovedResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan or entry not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn remove_course(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path((id, plan_course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<PlanCourseRemovedResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let entry = PlanService::get_plan_course(&state.db, plan.id, plan_course_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    PlanService::remove_course(&state.db, entry)
        .await
        .map_err(internal_error)?;

    let requirements_refreshed = refresh_after_mutation(&state.db, &plan).await;

    Ok(Json(PlanCourseRemovedResponse {
        requirements_refreshed,
    }))
}

/// Re-evaluate every tracked requirement and return the fresh numbers
#[utoipa::path(
    post,
    path = "/plans/{id}/requirements/refresh",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Requirements re-evaluated", body = PlanRequirementsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn refresh_requirements(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanRequirementsResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    RequirementService::refresh_plan(&state.db, &plan)
        .await
        .map_err(internal_error)?;

    let progress = RequirementService::get_plan_requirements(&state.db, plan.id)
        .await
        .map_err(internal_error)?;

    Ok(Json(to_plan_requirements(plan.id, progress)))
}

/// Get the stored requirement progress for every attached degree
#[utoipa::path(
    get,
    path = "/plans/{id}/requirements",
    params(
        ("id" = Uuid, Path, description = "Plan ID")
    ),
    responses(
        (status = 200, description = "Requirement progress retrieved", body = PlanRequirementsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Plan belongs to another user"),
        (status = 404, description = "Plan not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Plans"
)]
pub async fn get_requirements(
    State(state): State<AppState>,
    Extension(claims): Extension<DefaultClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlanRequirementsResponse>, StatusCode> {
    let user_id = subject_of(&claims)?;
    let plan = owned_plan(&state.db, id, user_id).await?;

    let progress = RequirementService::get_plan_requirements(&state.db, plan.id)
        .await
        .map_err(internal_error)?;

    Ok(Json(to_plan_requirements(plan.id, progress)))
}

fn subject_of(claims: &DefaultClaims) -> Result<&str, StatusCode> {
    claims
        .sub
        .as_deref()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Loads a plan and checks it against the authenticated user. Misses map
/// to 404 and foreign plans to 403.
async fn owned_plan(
    db: &DatabaseConnection,
    plan_id: Uuid,
    user_id: &str,
) -> Result<plans::Model, StatusCode> {
    let plan = PlanService::get_plan(db, plan_id)
        .await
        .map_err(internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    if plan.user_id != user_id {
        return Err(StatusCode::FORBIDDEN);
    }

    Ok(plan)
}

fn validated_year(year: Option<String>) -> Result<Option<String>, StatusCode> {
    match year {
        Some(year) => {
            year.parse::<AcademicYear>()
                .map_err(|_| StatusCode::BAD_REQUEST)?;
            Ok(Some(year))
        }
        None => Ok(None),
    }
}

fn parsed_status(status: Option<&str>) -> Result<Option<CourseStatus>, StatusCode> {
    match status {
        Some(raw) => raw.parse().map(Some).map_err(|_| StatusCode::BAD_REQUEST),
        None => Ok(None),
    }
}

/// Mutations respond even when re-evaluation fails; the flag tells the
/// client whether the returned state already reflects the change.
async fn refresh_after_mutation(db: &DatabaseConnection, plan: &plans::Model) -> bool {
    match RequirementService::refresh_plan(db, plan).await {
        Ok(()) => true,
        Err(err) => {
            warn!("Requirement refresh for plan {} failed: {err}", plan.id);
            false
        }
    }
}

fn to_plan_requirements(plan_id: Uuid, progress: Vec<DegreeProgress>) -> PlanRequirementsResponse {
    PlanRequirementsResponse {
        plan_id: plan_id.to_string(),
        degrees: progress
            .into_iter()
            .map(|(link, rows)| DegreeProgressResponse {
                plan_degree_id: link.id.to_string(),
                degree_id: link.degree_id.to_string(),
                degree_type: link.degree_type.to_string(),
                requirements: rows
                    .into_iter()
                    .map(|(row, definition)| {
                        let (name, requirement_type) = match definition {
                            Some(definition) => {
                                (Some(definition.name), Some(definition.requirement_type))
                            }
                            None => (None, None),
                        };

                        PlanRequirementResponse {
                            id: row.id.to_string(),
                            requirement_id: row.requirement_id.to_string(),
                            name,
                            requirement_type,
                            status: row.status.to_string(),
                            progress: row.progress,
                            updated_at: row.updated_at,
                        }
                    })
                    .collect(),
            })
            .collect(),
    }
}
