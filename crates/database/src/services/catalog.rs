use crate::entities::{
    courses, degrees, faculties, programs, requirement_courses, requirement_list_courses,
    requirement_lists, requirement_sets, requirement_substitutions, requirements,
};
use log::warn;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// A list row together with its resolved courses
pub type ListDetail = (requirement_lists::Model, Vec<courses::Model>);

/// A requirement definition with its course set, lists and substitution
/// pairs resolved to course rows. Dangling course references are dropped
/// here so downstream evaluation sees only courses that exist.
pub struct RequirementDetail {
    pub requirement: requirements::Model,
    pub courses: Vec<courses::Model>,
    pub lists: Vec<ListDetail>,
    pub substitutions: Vec<(courses::Model, courses::Model)>,
}

pub struct RequirementSetDetail {
    pub set: requirement_sets::Model,
    pub requirements: Vec<RequirementDetail>,
}

pub struct DegreeDetail {
    pub degree: degrees::Model,
    pub sets: Vec<RequirementSetDetail>,
}

pub struct CatalogService;

impl CatalogService {
    /// Query courses with pagination and filtering
    pub async fn get_courses_paginated(
        db: &DatabaseConnection,
        page: u64,
        per_page: u64,
        search: Option<String>,
        subjects: Option<Vec<String>>,
        level: Option<String>,
    ) -> Result<(Vec<courses::Model>, u64), DbErr> {
        let page = page.max(1);
        let mut condition = Condition::all();

        if let Some(subjects) = subjects
            && !subjects.is_empty()
        {
            let codes: Vec<String> = subjects
                .into_iter()
                .map(|code| code.trim().to_uppercase())
                .filter(|code| !code.is_empty())
                .collect();

            if !codes.is_empty() {
                condition = condition.add(courses::Column::SubjectCode.is_in(codes));
            }
        }

        // Courses at the 300 level have catalog numbers starting with 3
        if let Some(level) = level
            && let Some(prefix) = level.trim().chars().next().filter(char::is_ascii_digit)
        {
            condition = condition.add(courses::Column::CatalogNumber.like(format!("{prefix}%")));
        }

        if let Some(search) = search {
            let search_condition = Condition::any()
                .add(courses::Column::CatalogNumber.like(format!("%{search}%")))
                .add(courses::Column::Title.like(format!("%{search}%")))
                .add(courses::Column::Description.like(format!("%{search}%")));
            condition = condition.add(search_condition);
        }

        let query = courses::Entity::find()
            .filter(condition)
            .order_by_asc(courses::Column::SubjectCode)
            .order_by_asc(courses::Column::CatalogNumber);

        // Apply pagination
        let total_items = query.clone().count(db).await?;
        let paginator = query.paginate(db, per_page);
        let courses = paginator.fetch_page(page - 1).await?; // SeaORM uses 0-based pages

        Ok((courses, total_items))
    }

    /// Get a single course with its faculty
    pub async fn get_course_by_id(
        db: &DatabaseConnection,
        course_id: Uuid,
    ) -> Result<Option<(courses::Model, Option<faculties::Model>)>, DbErr> {
        courses::Entity::find_by_id(course_id)
            .find_also_related(faculties::Entity)
            .one(db)
            .await
    }

    /// Get the distinct subject codes present in the catalog, sorted
    pub async fn get_subject_codes(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
        let mut codes: Vec<String> = courses::Entity::find()
            .select_only()
            .column(courses::Column::SubjectCode)
            .distinct()
            .into_tuple::<String>()
            .all(db)
            .await?;

        codes.sort();
        Ok(codes)
    }

    /// Get programs with their faculty, optionally filtered by faculty code
    pub async fn get_programs(
        db: &DatabaseConnection,
        faculty_code: Option<String>,
    ) -> Result<Vec<(programs::Model, Option<faculties::Model>)>, DbErr> {
        let mut query = programs::Entity::find()
            .find_also_related(faculties::Entity)
            .order_by_asc(programs::Column::Name);

        if let Some(code) = faculty_code {
            let faculty = faculties::Entity::find()
                .filter(faculties::Column::Code.eq(code.trim().to_uppercase()))
                .one(db)
                .await?;

            match faculty {
                Some(faculty) => {
                    query = query.filter(programs::Column::FacultyId.eq(faculty.id));
                }
                None => return Ok(vec![]),
            }
        }

        query.all(db).await
    }

    /// Get a single program with its faculty and degrees
    pub async fn get_program_by_id(
        db: &DatabaseConnection,
        program_id: Uuid,
    ) -> Result<Option<(programs::Model, Option<faculties::Model>, Vec<degrees::Model>)>, DbErr>
    {
        let (program, faculty) = match programs::Entity::find_by_id(program_id)
            .find_also_related(faculties::Entity)
            .one(db)
            .await?
        {
            Some(pair) => pair,
            None => return Ok(None),
        };

        let degrees = degrees::Entity::find()
            .filter(degrees::Column::ProgramId.eq(program_id))
            .order_by_asc(degrees::Column::Name)
            .all(db)
            .await?;

        Ok(Some((program, faculty, degrees)))
    }

    /// Get a degree row without its requirement definitions
    pub async fn get_degree_by_id(
        db: &DatabaseConnection,
        degree_id: Uuid,
    ) -> Result<Option<degrees::Model>, DbErr> {
        degrees::Entity::find_by_id(degree_id).one(db).await
    }

    /// Get a degree with its requirement sets and fully resolved
    /// requirement definitions
    pub async fn get_degree_detail(
        db: &DatabaseConnection,
        degree_id: Uuid,
    ) -> Result<Option<DegreeDetail>, DbErr> {
        let degree = match degrees::Entity::find_by_id(degree_id).one(db).await? {
            Some(degree) => degree,
            None => return Ok(None),
        };

        let sets = requirement_sets::Entity::find()
            .filter(requirement_sets::Column::DegreeId.eq(degree_id))
            .order_by_asc(requirement_sets::Column::AcademicCalendarYear)
            .all(db)
            .await?;

        if sets.is_empty() {
            return Ok(Some(DegreeDetail {
                degree,
                sets: vec![],
            }));
        }

        let set_ids: Vec<Uuid> = sets.iter().map(|set| set.id).collect();
        let requirement_models = requirements::Entity::find()
            .filter(requirements::Column::RequirementSetId.is_in(set_ids))
            .order_by_asc(requirements::Column::Name)
            .all(db)
            .await?;

        let details = Self::load_requirement_details(db, requirement_models).await?;

        let mut details_by_set: HashMap<Uuid, Vec<RequirementDetail>> = HashMap::new();
        for detail in details {
            details_by_set
                .entry(detail.requirement.requirement_set_id)
                .or_default()
                .push(detail);
        }

        let set_details = sets
            .into_iter()
            .map(|set| RequirementSetDetail {
                requirements: details_by_set.remove(&set.id).unwrap_or_default(),
                set,
            })
            .collect();

        Ok(Some(DegreeDetail {
            degree,
            sets: set_details,
        }))
    }

    /// Resolve the course sets, lists and substitutions for a batch of
    /// requirements in a fixed number of queries
    pub async fn load_requirement_details(
        db: &DatabaseConnection,
        requirement_models: Vec<requirements::Model>,
    ) -> Result<Vec<RequirementDetail>, DbErr> {
        if requirement_models.is_empty() {
            return Ok(vec![]);
        }

        let requirement_ids: Vec<Uuid> = requirement_models.iter().map(|r| r.id).collect();

        // Batch fetch all definition rows for all requirements
        let course_rows = requirement_courses::Entity::find()
            .filter(requirement_courses::Column::RequirementId.is_in(requirement_ids.clone()))
            .order_by_asc(requirement_courses::Column::Id)
            .all(db)
            .await?;

        let lists = requirement_lists::Entity::find()
            .filter(requirement_lists::Column::RequirementId.is_in(requirement_ids.clone()))
            .order_by_asc(requirement_lists::Column::Id)
            .all(db)
            .await?;

        let list_ids: Vec<Uuid> = lists.iter().map(|list| list.id).collect();
        let list_course_rows = if list_ids.is_empty() {
            vec![]
        } else {
            requirement_list_courses::Entity::find()
                .filter(requirement_list_courses::Column::ListId.is_in(list_ids))
                .order_by_asc(requirement_list_courses::Column::Id)
                .all(db)
                .await?
        };

        let substitution_rows = requirement_substitutions::Entity::find()
            .filter(requirement_substitutions::Column::RequirementId.is_in(requirement_ids))
            .all(db)
            .await?;

        // One course lookup shared by course sets, lists and substitutions
        let mut course_ids: HashSet<Uuid> = HashSet::new();
        course_ids.extend(course_rows.iter().map(|row| row.course_id));
        course_ids.extend(list_course_rows.iter().map(|row| row.course_id));
        for row in &substitution_rows {
            course_ids.insert(row.original_course_id);
            course_ids.insert(row.substitute_course_id);
        }

        let course_models = if course_ids.is_empty() {
            vec![]
        } else {
            courses::Entity::find()
                .filter(courses::Column::Id.is_in(course_ids.into_iter().collect::<Vec<_>>()))
                .all(db)
                .await?
        };

        let courses_by_id: HashMap<Uuid, courses::Model> = course_models
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        // Build lookup maps, skipping dangling course references
        let mut courses_by_requirement: HashMap<Uuid, Vec<courses::Model>> = HashMap::new();
        for row in course_rows {
            match courses_by_id.get(&row.course_id) {
                Some(course) => courses_by_requirement
                    .entry(row.requirement_id)
                    .or_default()
                    .push(course.clone()),
                None => warn!(
                    "Requirement {} references missing course {}",
                    row.requirement_id, row.course_id
                ),
            }
        }

        let mut courses_by_list: HashMap<Uuid, Vec<courses::Model>> = HashMap::new();
        for row in list_course_rows {
            match courses_by_id.get(&row.course_id) {
                Some(course) => courses_by_list
                    .entry(row.list_id)
                    .or_default()
                    .push(course.clone()),
                None => warn!(
                    "Requirement list {} references missing course {}",
                    row.list_id, row.course_id
                ),
            }
        }

        let mut lists_by_requirement: HashMap<Uuid, Vec<ListDetail>> = HashMap::new();
        for list in lists {
            let list_courses = courses_by_list.remove(&list.id).unwrap_or_default();
            lists_by_requirement
                .entry(list.requirement_id)
                .or_default()
                .push((list, list_courses));
        }

        let mut substitutions_by_requirement: HashMap<Uuid, Vec<(courses::Model, courses::Model)>> =
            HashMap::new();
        for row in substitution_rows {
            let original = courses_by_id.get(&row.original_course_id);
            let substitute = courses_by_id.get(&row.substitute_course_id);

            match (original, substitute) {
                (Some(original), Some(substitute)) => substitutions_by_requirement
                    .entry(row.requirement_id)
                    .or_default()
                    .push((original.clone(), substitute.clone())),
                _ => warn!(
                    "Requirement {} has a substitution referencing a missing course",
                    row.requirement_id
                ),
            }
        }

        // Build the final result structure
        let details = requirement_models
            .into_iter()
            .map(|requirement| RequirementDetail {
                courses: courses_by_requirement
                    .remove(&requirement.id)
                    .unwrap_or_default(),
                lists: lists_by_requirement
                    .remove(&requirement.id)
                    .unwrap_or_default(),
                substitutions: substitutions_by_requirement
                    .remove(&requirement.id)
                    .unwrap_or_default(),
                requirement,
            })
            .collect();

        Ok(details)
    }
}
