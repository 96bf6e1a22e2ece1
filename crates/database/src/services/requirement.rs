use crate::entities::{
    courses, plan_degrees, plan_requirements, plans, requirement_sets, requirements,
};
use crate::services::catalog::{CatalogService, RequirementDetail};
use crate::services::plan::PlanService;
use chrono::Utc;
use log::warn;
use models::course::CourseKey;
use models::filters::{LevelRestriction, SubjectFilter};
use models::requirement::{
    ConcentrationRule, CourseGroup, Progress, Requirement, RequirementRule, Substitution, union_of,
};
use models::status::{RequirementStatus, RequirementType};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Why a stored requirement row cannot be turned into an evaluable rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    UnknownType(String),
    MissingUnitsThreshold,
    InvalidLevelRestriction(String),
    IncompleteConcentration,
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownType(kind) => write!(f, "unknown requirement type {kind:?}"),
            Self::MissingUnitsThreshold => {
                write!(f, "units requirement without a unit threshold")
            }
            Self::InvalidLevelRestriction(raw) => {
                write!(f, "unparseable level restriction {raw:?}")
            }
            Self::IncompleteConcentration => {
                write!(f, "concentration without a courses-per-subject threshold")
            }
        }
    }
}

impl std::error::Error for DefinitionError {}

/// Stored progress rows for one attached degree, each paired with its
/// requirement definition
pub type DegreeProgress = (
    plan_degrees::Model,
    Vec<(plan_requirements::Model, Option<requirements::Model>)>,
);

pub struct RequirementService;

impl RequirementService {
    /// Requirement sets that apply to a plan: a set pinned to a calendar
    /// year matches only plans on that year, an unpinned set matches all
    pub fn sets_in_scope(
        plan_year: Option<&str>,
        sets: Vec<requirement_sets::Model>,
    ) -> Vec<requirement_sets::Model> {
        sets.into_iter()
            .filter(|set| {
                models::calendar::year_in_scope(set.academic_calendar_year.as_deref(), plan_year)
            })
            .collect()
    }

    /// Load the requirement definitions of a degree that apply to the
    /// given plan's calendar year
    pub async fn in_scope_requirements(
        db: &DatabaseConnection,
        plan: &plans::Model,
        degree_id: Uuid,
    ) -> Result<Vec<RequirementDetail>, DbErr> {
        let sets = requirement_sets::Entity::find()
            .filter(requirement_sets::Column::DegreeId.eq(degree_id))
            .all(db)
            .await?;

        let sets = Self::sets_in_scope(plan.academic_calendar_year.as_deref(), sets);
        if sets.is_empty() {
            return Ok(vec![]);
        }

        let set_ids: Vec<Uuid> = sets.iter().map(|set| set.id).collect();
        let requirement_models = requirements::Entity::find()
            .filter(requirements::Column::RequirementSetId.is_in(set_ids))
            .all(db)
            .await?;

        CatalogService::load_requirement_details(db, requirement_models).await
    }

    /// Translate a stored requirement into its evaluable form
    pub fn to_domain(detail: &RequirementDetail) -> Result<Requirement, DefinitionError> {
        let model = &detail.requirement;
        let kind: RequirementType = model
            .requirement_type
            .parse()
            .map_err(|_| DefinitionError::UnknownType(model.requirement_type.clone()))?;

        let substitutions = detail
            .substitutions
            .iter()
            .map(|(original, substitute)| Substitution {
                original: course_key(original),
                substitute: course_key(substitute),
            })
            .collect();

        let rule = match kind {
            RequirementType::CourseList => {
                let required: Vec<CourseKey> = detail.courses.iter().map(course_key).collect();
                let courses_required = count_threshold(model.courses_required, required.len());
                RequirementRule::CourseList {
                    required,
                    courses_required,
                }
            }
            RequirementType::Units => RequirementRule::Units {
                units_required: model
                    .units_required
                    .ok_or(DefinitionError::MissingUnitsThreshold)?,
                subjects: model
                    .course_code_restriction
                    .as_deref()
                    .and_then(SubjectFilter::parse),
                level: level_restriction(model.level_restriction.as_deref())?,
            },
            RequirementType::MultiList => {
                let lists = course_groups(detail);
                let courses_required =
                    count_threshold(model.courses_required, union_of(&lists).len());
                RequirementRule::MultiList {
                    lists,
                    courses_required,
                    concentration: concentration_rule(model)?,
                }
            }
            RequirementType::Concentration => {
                let pool = union_of(&course_groups(detail));
                let courses_required = count_threshold(model.courses_required, pool.len());
                let rule =
                    concentration_rule(model)?.ok_or(DefinitionError::IncompleteConcentration)?;
                RequirementRule::Concentration {
                    pool,
                    courses_required,
                    rule,
                }
            }
        };

        Ok(Requirement::new(&model.name, rule).with_substitutions(substitutions))
    }

    /// Insert placeholder progress rows for every in-scope requirement of
    /// a freshly attached degree
    pub async fn seed_plan_degree(
        db: &DatabaseConnection,
        plan: &plans::Model,
        plan_degree: &plan_degrees::Model,
    ) -> Result<(), DbErr> {
        let details = Self::in_scope_requirements(db, plan, plan_degree.degree_id).await?;
        if details.is_empty() {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        let rows: Vec<plan_requirements::ActiveModel> = details
            .iter()
            .map(|detail| plan_requirements::ActiveModel {
                id: Set(Uuid::new_v4()),
                plan_degree_id: Set(plan_degree.id),
                requirement_id: Set(detail.requirement.id),
                status: Set(RequirementStatus::NotStarted),
                progress: Set(0),
                updated_at: Set(now),
            })
            .collect();

        plan_requirements::Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([
                    plan_requirements::Column::PlanDegreeId,
                    plan_requirements::Column::RequirementId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        Ok(())
    }

    /// Recompute and store progress for one attached degree. A
    /// requirement whose definition cannot be parsed keeps a zero result
    /// instead of failing the whole refresh.
    pub async fn refresh_plan_degree(
        db: &DatabaseConnection,
        plan: &plans::Model,
        plan_degree: &plan_degrees::Model,
    ) -> Result<(), DbErr> {
        let details = Self::in_scope_requirements(db, plan, plan_degree.degree_id).await?;
        let plan_courses = PlanService::get_planned_courses(db, plan.id).await?;

        let now = Utc::now().naive_utc();
        let mut requirement_ids = Vec::with_capacity(details.len());
        let mut rows = Vec::with_capacity(details.len());

        for detail in &details {
            let progress = match Self::to_domain(detail) {
                Ok(requirement) => requirement.evaluate(&plan_courses),
                Err(err) => {
                    warn!(
                        "Skipping evaluation of requirement '{}' ({}): {}",
                        detail.requirement.name, detail.requirement.id, err
                    );
                    Progress::not_started()
                }
            };

            requirement_ids.push(detail.requirement.id);
            rows.push(plan_requirements::ActiveModel {
                id: Set(Uuid::new_v4()),
                plan_degree_id: Set(plan_degree.id),
                requirement_id: Set(detail.requirement.id),
                status: Set(progress.status),
                progress: Set(progress.percent),
                updated_at: Set(now),
            });
        }

        if !rows.is_empty() {
            plan_requirements::Entity::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([
                        plan_requirements::Column::PlanDegreeId,
                        plan_requirements::Column::RequirementId,
                    ])
                    .update_columns([
                        plan_requirements::Column::Status,
                        plan_requirements::Column::Progress,
                        plan_requirements::Column::UpdatedAt,
                    ])
                    .to_owned(),
                )
                .exec_without_returning(db)
                .await?;
        }

        // Drop stored rows for requirements that left the degree or fell
        // out of the plan's calendar year
        let mut stale = plan_requirements::Entity::delete_many()
            .filter(plan_requirements::Column::PlanDegreeId.eq(plan_degree.id));
        if !requirement_ids.is_empty() {
            stale = stale.filter(plan_requirements::Column::RequirementId.is_not_in(requirement_ids));
        }
        stale.exec(db).await?;

        Ok(())
    }

    /// Recompute progress for every degree attached to a plan
    pub async fn refresh_plan(db: &DatabaseConnection, plan: &plans::Model) -> Result<(), DbErr> {
        let links = plan_degrees::Entity::find()
            .filter(plan_degrees::Column::PlanId.eq(plan.id))
            .all(db)
            .await?;

        for link in links {
            Self::refresh_plan_degree(db, plan, &link).await?;
        }

        Ok(())
    }

    /// Read the stored progress for a plan grouped by attached degree,
    /// without recomputing anything
    pub async fn get_plan_requirements(
        db: &DatabaseConnection,
        plan_id: Uuid,
    ) -> Result<Vec<DegreeProgress>, DbErr> {
        let links = plan_degrees::Entity::find()
            .filter(plan_degrees::Column::PlanId.eq(plan_id))
            .all(db)
            .await?;

        if links.is_empty() {
            return Ok(vec![]);
        }

        let link_ids: Vec<Uuid> = links.iter().map(|link| link.id).collect();
        let rows = plan_requirements::Entity::find()
            .filter(plan_requirements::Column::PlanDegreeId.is_in(link_ids))
            .find_also_related(requirements::Entity)
            .order_by_asc(plan_requirements::Column::RequirementId)
            .all(db)
            .await?;

        let mut rows_by_link: HashMap<
            Uuid,
            Vec<(plan_requirements::Model, Option<requirements::Model>)>,
        > = HashMap::new();
        for (row, definition) in rows {
            rows_by_link
                .entry(row.plan_degree_id)
                .or_default()
                .push((row, definition));
        }

        Ok(links
            .into_iter()
            .map(|link| {
                let rows = rows_by_link.remove(&link.id).unwrap_or_default();
                (link, rows)
            })
            .collect())
    }
}

fn course_key(course: &courses::Model) -> CourseKey {
    CourseKey::new(&course.subject_code, &course.catalog_number)
}

/// A stored count wins over the default; a negative count collapses to
/// zero so the requirement reads as not evaluable
fn count_threshold(stored: Option<i32>, default: usize) -> usize {
    match stored {
        Some(n) if n >= 0 => n as usize,
        Some(_) => 0,
        None => default,
    }
}

fn level_restriction(raw: Option<&str>) -> Result<Option<LevelRestriction>, DefinitionError> {
    match raw {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| DefinitionError::InvalidLevelRestriction(raw.to_string())),
    }
}

/// Direct courses form an unnamed leading group so multi-list unions see
/// them alongside the named lists
fn course_groups(detail: &RequirementDetail) -> Vec<CourseGroup> {
    let mut groups = Vec::new();

    if !detail.courses.is_empty() {
        groups.push(CourseGroup {
            name: None,
            courses: detail.courses.iter().map(course_key).collect(),
        });
    }

    for (list, list_courses) in &detail.lists {
        groups.push(CourseGroup {
            name: list.name.clone(),
            courses: list_courses.iter().map(course_key).collect(),
        });
    }

    groups
}

/// BREADTH spreads across subjects, DEPTH piles into any one subject, and
/// any other non-empty marker names the subject to pile into
fn concentration_rule(
    model: &requirements::Model,
) -> Result<Option<ConcentrationRule>, DefinitionError> {
    let kind = match model.concentration_type.as_deref().map(str::trim) {
        Some(kind) if !kind.is_empty() => kind.to_uppercase(),
        _ => return Ok(None),
    };

    let min = model
        .min_courses_per_subject
        .ok_or(DefinitionError::IncompleteConcentration)?;
    if min < 0 {
        return Err(DefinitionError::IncompleteConcentration);
    }
    let min = min as usize;

    let rule = match kind.as_str() {
        "BREADTH" => ConcentrationRule::SubjectSpread { min_subjects: min },
        "DEPTH" => ConcentrationRule::SubjectDepth {
            subject: None,
            min_courses: min,
        },
        subject => ConcentrationRule::SubjectDepth {
            subject: Some(subject.to_string()),
            min_courses: min,
        },
    };

    Ok(Some(rule))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement_model(requirement_type: &str) -> requirements::Model {
        requirements::Model {
            id: Uuid::new_v4(),
            requirement_set_id: Uuid::new_v4(),
            name: "Core courses".to_string(),
            requirement_type: requirement_type.to_string(),
            description: None,
            courses_required: None,
            units_required: None,
            level_restriction: None,
            course_code_restriction: None,
            concentration_type: None,
            min_courses_per_subject: None,
        }
    }

    fn course_model(subject: &str, number: &str) -> courses::Model {
        courses::Model {
            id: Uuid::new_v4(),
            subject_code: subject.to_string(),
            catalog_number: number.to_string(),
            title: format!("{subject} {number}"),
            units: 0.5,
            description: None,
            prerequisites: None,
            corequisites: None,
            antirequisites: None,
            url: None,
            faculty_id: None,
        }
    }

    fn set_model(year: Option<&str>) -> requirement_sets::Model {
        requirement_sets::Model {
            id: Uuid::new_v4(),
            degree_id: Uuid::new_v4(),
            name: None,
            academic_calendar_year: year.map(str::to_string),
        }
    }

    fn detail(requirement: requirements::Model) -> RequirementDetail {
        RequirementDetail {
            requirement,
            courses: vec![],
            lists: vec![],
            substitutions: vec![],
        }
    }

    #[test]
    fn test_course_list_defaults_to_full_set() {
        let mut detail = detail(requirement_model("COURSE_LIST"));
        detail.courses = vec![course_model("MATH", "135"), course_model("MATH", "137")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::CourseList {
                required,
                courses_required,
            } => {
                assert_eq!(required.len(), 2);
                assert_eq!(courses_required, 2);
            }
            other => panic!("expected a course list, got {other:?}"),
        }
    }

    #[test]
    fn test_course_list_explicit_threshold() {
        let mut model = requirement_model("COURSE_LIST");
        model.courses_required = Some(1);
        let mut detail = detail(model);
        detail.courses = vec![course_model("MATH", "135"), course_model("MATH", "137")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::CourseList {
                courses_required, ..
            } => assert_eq!(courses_required, 1),
            other => panic!("expected a course list, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_threshold_collapses_to_zero() {
        let mut model = requirement_model("COURSE_LIST");
        model.courses_required = Some(-3);
        let mut detail = detail(model);
        detail.courses = vec![course_model("MATH", "135")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::CourseList {
                courses_required, ..
            } => assert_eq!(courses_required, 0),
            other => panic!("expected a course list, got {other:?}"),
        }
    }

    #[test]
    fn test_units_requires_threshold() {
        let detail = detail(requirement_model("UNITS"));
        assert_eq!(
            RequirementService::to_domain(&detail),
            Err(DefinitionError::MissingUnitsThreshold)
        );
    }

    #[test]
    fn test_units_parses_filters() {
        let mut model = requirement_model("UNITS");
        model.units_required = Some(2.0);
        model.course_code_restriction = Some("MATH, PMATH".to_string());
        model.level_restriction = Some("300-level or above".to_string());

        let requirement = RequirementService::to_domain(&detail(model)).unwrap();
        match requirement.rule {
            RequirementRule::Units {
                units_required,
                subjects,
                level,
            } => {
                assert_eq!(units_required, 2.0);
                assert!(subjects.is_some());
                assert_eq!(level.map(|l| l.min_level), Some(300));
            }
            other => panic!("expected a units rule, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_level_restriction_is_rejected() {
        let mut model = requirement_model("UNITS");
        model.units_required = Some(2.0);
        model.level_restriction = Some("sophomore".to_string());

        assert_eq!(
            RequirementService::to_domain(&detail(model)),
            Err(DefinitionError::InvalidLevelRestriction(
                "sophomore".to_string()
            ))
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let detail = detail(requirement_model("DIPLOMA"));
        assert_eq!(
            RequirementService::to_domain(&detail),
            Err(DefinitionError::UnknownType("DIPLOMA".to_string()))
        );
    }

    #[test]
    fn test_breadth_maps_to_subject_spread() {
        let mut model = requirement_model("CONCENTRATION");
        model.concentration_type = Some("BREADTH".to_string());
        model.min_courses_per_subject = Some(3);
        let mut detail = detail(model);
        detail.courses = vec![course_model("MUSIC", "100"), course_model("FINE", "101")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::Concentration { rule, .. } => {
                assert_eq!(rule, ConcentrationRule::SubjectSpread { min_subjects: 3 });
            }
            other => panic!("expected a concentration, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_accepts_any_subject() {
        let mut model = requirement_model("CONCENTRATION");
        model.concentration_type = Some("DEPTH".to_string());
        model.min_courses_per_subject = Some(2);
        let mut detail = detail(model);
        detail.courses = vec![course_model("MUSIC", "100")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::Concentration { rule, .. } => {
                assert_eq!(
                    rule,
                    ConcentrationRule::SubjectDepth {
                        subject: None,
                        min_courses: 2,
                    }
                );
            }
            other => panic!("expected a concentration, got {other:?}"),
        }
    }

    #[test]
    fn test_named_concentration_pins_the_subject() {
        let mut model = requirement_model("CONCENTRATION");
        model.concentration_type = Some("music".to_string());
        model.min_courses_per_subject = Some(2);
        let mut detail = detail(model);
        detail.courses = vec![course_model("MUSIC", "100")];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::Concentration { rule, .. } => {
                assert_eq!(
                    rule,
                    ConcentrationRule::SubjectDepth {
                        subject: Some("MUSIC".to_string()),
                        min_courses: 2,
                    }
                );
            }
            other => panic!("expected a concentration, got {other:?}"),
        }
    }

    #[test]
    fn test_concentration_needs_a_per_subject_count() {
        let mut model = requirement_model("CONCENTRATION");
        model.concentration_type = Some("BREADTH".to_string());
        let mut detail = detail(model);
        detail.courses = vec![course_model("MUSIC", "100")];

        assert_eq!(
            RequirementService::to_domain(&detail),
            Err(DefinitionError::IncompleteConcentration)
        );
    }

    #[test]
    fn test_multi_list_merges_direct_courses_and_lists() {
        let mut detail = detail(requirement_model("MULTI_LIST"));
        detail.courses = vec![course_model("CS", "135")];
        detail.lists = vec![(
            crate::entities::requirement_lists::Model {
                id: Uuid::new_v4(),
                requirement_id: detail.requirement.id,
                name: Some("List 1".to_string()),
            },
            vec![course_model("CS", "136"), course_model("CS", "135")],
        )];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        match requirement.rule {
            RequirementRule::MultiList {
                lists,
                courses_required,
                concentration,
            } => {
                assert_eq!(lists.len(), 2);
                // CS 135 appears twice but the union counts it once
                assert_eq!(courses_required, 2);
                assert!(concentration.is_none());
            }
            other => panic!("expected a multi list, got {other:?}"),
        }
    }

    #[test]
    fn test_substitutions_are_carried_over() {
        let mut detail = detail(requirement_model("COURSE_LIST"));
        detail.courses = vec![course_model("MATH", "135")];
        detail.substitutions = vec![(course_model("MATH", "135"), course_model("MATH", "145"))];

        let requirement = RequirementService::to_domain(&detail).unwrap();
        assert_eq!(requirement.substitutions.len(), 1);
        assert_eq!(
            requirement.substitutions[0].substitute,
            CourseKey::new("MATH", "145")
        );
    }

    #[test]
    fn test_sets_in_scope_filters_by_year() {
        let sets = vec![
            set_model(Some("2024-2025")),
            set_model(Some("2025-2026")),
            set_model(None),
        ];

        let in_scope = RequirementService::sets_in_scope(Some("2024-2025"), sets.clone());
        assert_eq!(in_scope.len(), 2);
        assert!(
            in_scope
                .iter()
                .all(|set| set.academic_calendar_year.as_deref() != Some("2025-2026"))
        );

        // A plan without a year only sees unpinned sets
        let in_scope = RequirementService::sets_in_scope(None, sets);
        assert_eq!(in_scope.len(), 1);
        assert_eq!(in_scope[0].academic_calendar_year, None);
    }
}
