use crate::entities::{
    courses, degrees, faculties, programs, requirement_courses, requirement_list_courses,
    requirement_lists, requirement_sets, requirement_substitutions, requirements,
};
use futures::future::try_join_all;
use log::warn;
use models::catalog_data::{
    CatalogImport, CourseImport, DegreeImport, FacultyImport, ProgramImport, RequirementImport,
    RequirementSetImport,
};
use models::course::CourseKey;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

const BATCH_SIZE: usize = 200;

/// Counts of what an import touched, for the seeder's closing report
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub faculties: usize,
    pub courses: usize,
    pub programs: usize,
    pub degrees: usize,
    pub requirements: usize,
    pub unresolved_courses: usize,
}

pub struct ImportService;

impl ImportService {
    /// Load a catalog document. Courses upsert on their subject and
    /// number; program and degree definitions replace what was there.
    pub async fn import_catalog(
        db: &DatabaseConnection,
        catalog: &CatalogImport,
    ) -> Result<ImportSummary, DbErr> {
        let mut summary = ImportSummary::default();

        let faculty_ids = Self::save_faculties(db, &catalog.faculties, &mut summary).await?;
        Self::save_courses(db, &catalog.courses, &faculty_ids, &mut summary).await?;

        // Requirement references resolve against the freshly saved catalog
        let course_ids = Self::build_course_cache(db).await?;
        Self::save_programs(db, &catalog.programs, &faculty_ids, &course_ids, &mut summary)
            .await?;

        Ok(summary)
    }

    async fn save_faculties(
        db: &DatabaseConnection,
        imports: &[FacultyImport],
        summary: &mut ImportSummary,
    ) -> Result<HashMap<String, Uuid>, DbErr> {
        let mut ids: HashMap<String, Uuid> = faculties::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|faculty| (faculty.code.clone(), faculty.id))
            .collect();

        for import in imports {
            let code = import.code.trim().to_uppercase();

            match ids.get(&code).copied() {
                Some(id) => {
                    faculties::ActiveModel {
                        id: Set(id),
                        code: Set(code),
                        name: Set(import.name.clone()),
                    }
                    .update(db)
                    .await?;
                }
                None => {
                    let id = Uuid::new_v4();
                    faculties::ActiveModel {
                        id: Set(id),
                        code: Set(code.clone()),
                        name: Set(import.name.clone()),
                    }
                    .insert(db)
                    .await?;
                    ids.insert(code, id);
                }
            }
            summary.faculties += 1;
        }

        Ok(ids)
    }

    /// Upsert courses in parallel batches keyed on subject and number
    async fn save_courses(
        db: &DatabaseConnection,
        imports: &[CourseImport],
        faculty_ids: &HashMap<String, Uuid>,
        summary: &mut ImportSummary,
    ) -> Result<(), DbErr> {
        if imports.is_empty() {
            return Ok(());
        }

        let mut tasks = Vec::new();
        for chunk in imports.chunks(BATCH_SIZE) {
            let batch: Vec<courses::ActiveModel> = chunk
                .iter()
                .map(|import| Self::course_to_active_model(import, faculty_ids))
                .collect();
            let db = db.clone();

            tasks.push(async move {
                courses::Entity::insert_many(batch)
                    .on_conflict(
                        OnConflict::columns([
                            courses::Column::SubjectCode,
                            courses::Column::CatalogNumber,
                        ])
                        .update_columns([
                            courses::Column::Title,
                            courses::Column::Units,
                            courses::Column::Description,
                            courses::Column::Prerequisites,
                            courses::Column::Corequisites,
                            courses::Column::Antirequisites,
                            courses::Column::Url,
                            courses::Column::FacultyId,
                        ])
                        .to_owned(),
                    )
                    .exec_without_returning(&db)
                    .await
            });
        }

        try_join_all(tasks).await?;
        summary.courses += imports.len();
        println!("Saved {} courses", imports.len());
        Ok(())
    }

    fn course_to_active_model(
        import: &CourseImport,
        faculty_ids: &HashMap<String, Uuid>,
    ) -> courses::ActiveModel {
        // Normalizes key casing on the way in
        let key = CourseKey::new(&import.subject_code, &import.catalog_number);
        let faculty_id = import
            .faculty
            .as_deref()
            .and_then(|code| faculty_ids.get(&code.trim().to_uppercase()).copied());

        courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            subject_code: Set(key.subject),
            catalog_number: Set(key.number),
            title: Set(import.title.clone()),
            units: Set(import.units),
            description: Set(import.description.clone()),
            prerequisites: Set(import.prerequisites.clone()),
            corequisites: Set(import.corequisites.clone()),
            antirequisites: Set(import.antirequisites.clone()),
            url: Set(import.url.clone()),
            faculty_id: Set(faculty_id),
        }
    }

    async fn build_course_cache(
        db: &DatabaseConnection,
    ) -> Result<HashMap<CourseKey, Uuid>, DbErr> {
        Ok(courses::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|course| {
                (
                    CourseKey::new(&course.subject_code, &course.catalog_number),
                    course.id,
                )
            })
            .collect())
    }

    async fn save_programs(
        db: &DatabaseConnection,
        imports: &[ProgramImport],
        faculty_ids: &HashMap<String, Uuid>,
        course_ids: &HashMap<CourseKey, Uuid>,
        summary: &mut ImportSummary,
    ) -> Result<(), DbErr> {
        for import in imports {
            let faculty_id = import
                .faculty
                .as_deref()
                .and_then(|code| faculty_ids.get(&code.trim().to_uppercase()).copied());

            let existing = programs::Entity::find()
                .filter(programs::Column::Name.eq(import.name.clone()))
                .one(db)
                .await?;

            let program_id = match existing {
                Some(program) => {
                    let id = program.id;
                    let mut active: programs::ActiveModel = program.into();
                    active.description = Set(import.description.clone());
                    active.faculty_id = Set(faculty_id);
                    active.update(db).await?;
                    id
                }
                None => {
                    let id = Uuid::new_v4();
                    programs::ActiveModel {
                        id: Set(id),
                        faculty_id: Set(faculty_id),
                        name: Set(import.name.clone()),
                        description: Set(import.description.clone()),
                    }
                    .insert(db)
                    .await?;
                    id
                }
            };
            summary.programs += 1;

            for degree in &import.degrees {
                Self::save_degree(db, program_id, degree, course_ids, summary).await?;
            }
        }

        Ok(())
    }

    async fn save_degree(
        db: &DatabaseConnection,
        program_id: Uuid,
        import: &DegreeImport,
        course_ids: &HashMap<CourseKey, Uuid>,
        summary: &mut ImportSummary,
    ) -> Result<(), DbErr> {
        let existing = degrees::Entity::find()
            .filter(degrees::Column::ProgramId.eq(program_id))
            .filter(degrees::Column::Name.eq(import.name.clone()))
            .one(db)
            .await?;

        let degree_id = match existing {
            Some(degree) => {
                let id = degree.id;
                let mut active: degrees::ActiveModel = degree.into();
                active.degree_type = Set(import.degree_type);
                active.description = Set(import.description.clone());
                active.update(db).await?;
                id
            }
            None => {
                let id = Uuid::new_v4();
                degrees::ActiveModel {
                    id: Set(id),
                    program_id: Set(program_id),
                    name: Set(import.name.clone()),
                    degree_type: Set(import.degree_type),
                    description: Set(import.description.clone()),
                }
                .insert(db)
                .await?;
                id
            }
        };
        summary.degrees += 1;

        // Definitions are replaced wholesale; the cascade takes the old
        // requirements and their members with the sets
        let txn = db.begin().await?;
        requirement_sets::Entity::delete_many()
            .filter(requirement_sets::Column::DegreeId.eq(degree_id))
            .exec(&txn)
            .await?;

        for set in &import.requirement_sets {
            Self::save_requirement_set(&txn, degree_id, set, course_ids, summary).await?;
        }

        txn.commit().await
    }

    async fn save_requirement_set(
        txn: &DatabaseTransaction,
        degree_id: Uuid,
        import: &RequirementSetImport,
        course_ids: &HashMap<CourseKey, Uuid>,
        summary: &mut ImportSummary,
    ) -> Result<(), DbErr> {
        let set_id = Uuid::new_v4();
        requirement_sets::ActiveModel {
            id: Set(set_id),
            degree_id: Set(degree_id),
            name: Set(import.name.clone()),
            academic_calendar_year: Set(import.year.clone()),
        }
        .insert(txn)
        .await?;

        for requirement in &import.requirements {
            Self::save_requirement(txn, set_id, requirement, course_ids, summary).await?;
        }

        Ok(())
    }

    async fn save_requirement(
        txn: &DatabaseTransaction,
        set_id: Uuid,
        import: &RequirementImport,
        course_ids: &HashMap<CourseKey, Uuid>,
        summary: &mut ImportSummary,
    ) -> Result<(), DbErr> {
        let requirement_id = Uuid::new_v4();
        requirements::ActiveModel {
            id: Set(requirement_id),
            requirement_set_id: Set(set_id),
            name: Set(import.name.clone()),
            requirement_type: Set(import.requirement_type.to_string()),
            description: Set(import.description.clone()),
            courses_required: Set(import.courses_required),
            units_required: Set(import.units_required),
            level_restriction: Set(import.level_restriction.clone()),
            course_code_restriction: Set(import.subject_filter.clone()),
            concentration_type: Set(import.concentration_type.clone()),
            min_courses_per_subject: Set(import.min_courses_per_subject),
        }
        .insert(txn)
        .await?;

        for course in &import.courses {
            if let Some(course_id) = resolve_course(course, course_ids, summary) {
                requirement_courses::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    requirement_id: Set(requirement_id),
                    course_id: Set(course_id),
                }
                .insert(txn)
                .await?;
            }
        }

        for list in &import.lists {
            let list_id = Uuid::new_v4();
            requirement_lists::ActiveModel {
                id: Set(list_id),
                requirement_id: Set(requirement_id),
                name: Set(list.name.clone()),
            }
            .insert(txn)
            .await?;

            for course in &list.courses {
                if let Some(course_id) = resolve_course(course, course_ids, summary) {
                    requirement_list_courses::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        list_id: Set(list_id),
                        course_id: Set(course_id),
                    }
                    .insert(txn)
                    .await?;
                }
            }
        }

        for substitution in &import.substitutions {
            let original = resolve_course(&substitution.original, course_ids, summary);
            let substitute = resolve_course(&substitution.substitute, course_ids, summary);

            if let (Some(original), Some(substitute)) = (original, substitute) {
                requirement_substitutions::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    requirement_id: Set(requirement_id),
                    original_course_id: Set(original),
                    substitute_course_id: Set(substitute),
                }
                .insert(txn)
                .await?;
            }
        }

        summary.requirements += 1;
        Ok(())
    }
}

/// Course references are free text like "MATH 135"; one that does not
/// resolve to a catalog row is skipped and counted
fn resolve_course(
    reference: &str,
    course_ids: &HashMap<CourseKey, Uuid>,
    summary: &mut ImportSummary,
) -> Option<Uuid> {
    let resolved = reference
        .parse::<CourseKey>()
        .ok()
        .and_then(|key| course_ids.get(&key).copied());

    if resolved.is_none() {
        warn!("Unresolved course reference {reference:?}");
        summary.unresolved_courses += 1;
    }

    resolved
}
