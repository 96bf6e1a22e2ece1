use crate::entities::{courses, degrees, plan_courses, plan_degrees, plans};
use chrono::Utc;
use models::course::{CourseKey, PlannedCourse};
use models::status::{CourseStatus, DegreeType};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

/// A plan together with its attached degrees and course entries
pub struct PlanDetail {
    pub plan: plans::Model,
    pub degrees: Vec<(plan_degrees::Model, Option<degrees::Model>)>,
    pub courses: Vec<(plan_courses::Model, Option<courses::Model>)>,
}

pub struct PlanService;

impl PlanService {
    pub async fn get_plans_for_user(
        db: &DatabaseConnection,
        user_id: &str,
    ) -> Result<Vec<plans::Model>, DbErr> {
        plans::Entity::find()
            .filter(plans::Column::UserId.eq(user_id))
            .order_by_desc(plans::Column::UpdatedAt)
            .all(db)
            .await
    }

    pub async fn create_plan(
        db: &DatabaseConnection,
        user_id: &str,
        name: String,
        academic_calendar_year: Option<String>,
    ) -> Result<plans::Model, DbErr> {
        let now = Utc::now().naive_utc();

        plans::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id.to_string()),
            name: Set(name),
            academic_calendar_year: Set(academic_calendar_year),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await
    }

    /// Ownership is checked by the caller against `user_id`
    pub async fn get_plan(
        db: &DatabaseConnection,
        plan_id: Uuid,
    ) -> Result<Option<plans::Model>, DbErr> {
        plans::Entity::find_by_id(plan_id).one(db).await
    }

    pub async fn get_plan_detail(
        db: &DatabaseConnection,
        plan: plans::Model,
    ) -> Result<PlanDetail, DbErr> {
        let degrees = plan_degrees::Entity::find()
            .filter(plan_degrees::Column::PlanId.eq(plan.id))
            .find_also_related(degrees::Entity)
            .all(db)
            .await?;

        let courses = plan_courses::Entity::find()
            .filter(plan_courses::Column::PlanId.eq(plan.id))
            .find_also_related(courses::Entity)
            .order_by_asc(plan_courses::Column::TermIndex)
            .order_by_asc(plan_courses::Column::CreatedAt)
            .all(db)
            .await?;

        Ok(PlanDetail {
            plan,
            degrees,
            courses,
        })
    }

    pub async fn update_plan(
        db: &DatabaseConnection,
        plan: plans::Model,
        name: Option<String>,
        academic_calendar_year: Option<String>,
    ) -> Result<plans::Model, DbErr> {
        let mut active: plans::ActiveModel = plan.into();

        if let Some(name) = name {
            active.name = Set(name);
        }

        // An absent year leaves the current one in place; clearing a
        // year requires creating a new plan
        if let Some(year) = academic_calendar_year {
            active.academic_calendar_year = Set(Some(year));
        }

        active.updated_at = Set(Utc::now().naive_utc());
        active.update(db).await
    }

    pub async fn delete_plan(db: &DatabaseConnection, plan: plans::Model) -> Result<(), DbErr> {
        plans::Entity::delete_by_id(plan.id).exec(db).await?;
        Ok(())
    }

    /// Attach a degree to a plan. Returns `None` when the same degree is
    /// already attached with the same role.
    pub async fn add_degree(
        db: &DatabaseConnection,
        plan: &plans::Model,
        degree_id: Uuid,
        degree_type: DegreeType,
    ) -> Result<Option<plan_degrees::Model>, DbErr> {
        let existing = plan_degrees::Entity::find()
            .filter(plan_degrees::Column::PlanId.eq(plan.id))
            .filter(plan_degrees::Column::DegreeId.eq(degree_id))
            .filter(plan_degrees::Column::DegreeType.eq(degree_type))
            .one(db)
            .await?;

        if existing.is_some() {
            return Ok(None);
        }

        let link = plan_degrees::ActiveModel {
            id: Set(Uuid::new_v4()),
            plan_id: Set(plan.id),
            degree_id: Set(degree_id),
            degree_type: Set(degree_type),
        }
        .insert(db)
        .await?;

        Self::touch_plan(db, plan.id).await?;
        Ok(Some(link))
    }

    pub async fn get_plan_degree(
        db: &DatabaseConnection,
        plan_id: Uuid,
        plan_degree_id: Uuid,
    ) -> Result<Option<plan_degrees::Model>, DbErr> {
        plan_degrees::Entity::find_by_id(plan_degree_id)
            .filter(plan_degrees::Column::PlanId.eq(plan_id))
            .one(db)
            .await
    }

    /// Detach a degree. The stored progress rows for it go with it.
    pub async fn remove_degree(
        db: &DatabaseConnection,
        link: plan_degrees::Model,
    ) -> Result<(), DbErr> {
        let plan_id = link.plan_id;
        plan_degrees::Entity::delete_by_id(link.id).exec(db).await?;
        Self::touch_plan(db, plan_id).await
    }

    /// Add a course entry to a plan. Returns `None` when the course is
    /// already on the plan.
    pub async fn add_course(
        db: &DatabaseConnection,
        plan: &plans::Model,
        course_id: Uuid,
        status: CourseStatus,
        term: Option<String>,
        term_index: Option<i16>,
        grade: Option<String>,
    ) -> Result<Option<plan_courses::Model>, DbErr> {
        let existing = plan_courses::Entity::find()
            .filter(plan_courses::Column::PlanId.eq(plan.id))
            .filter(plan_courses::Column::CourseId.eq(course_id))
            .one(db)
            .await?;

        if existing.is_some() {
            return Ok(None);
        }

        let now = Utc::now().naive_utc();
        let entry = plan_courses::ActiveModel {
            id: Set(Uuid::new_v4()),
            plan_id: Set(plan.id),
            course_id: Set(course_id),
            status: Set(status),
            term: Set(term),
            term_index: Set(term_index),
            grade: Set(grade),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        Self::touch_plan(db, plan.id).await?;
        Ok(Some(entry))
    }

    pub async fn get_plan_course(
        db: &DatabaseConnection,
        plan_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<plan_courses::Model>, DbErr> {
        plan_courses::Entity::find_by_id(entry_id)
            .filter(plan_courses::Column::PlanId.eq(plan_id))
            .one(db)
            .await
    }

    pub async fn update_course(
        db: &DatabaseConnection,
        entry: plan_courses::Model,
        status: Option<CourseStatus>,
        term: Option<String>,
        term_index: Option<i16>,
        grade: Option<String>,
    ) -> Result<plan_courses::Model, DbErr> {
        let plan_id = entry.plan_id;
        let mut active: plan_courses::ActiveModel = entry.into();

        if let Some(status) = status {
            active.status = Set(status);
        }
        if let Some(term) = term {
            active.term = Set(Some(term));
        }
        if let Some(term_index) = term_index {
            active.term_index = Set(Some(term_index));
        }
        if let Some(grade) = grade {
            active.grade = Set(Some(grade));
        }

        active.updated_at = Set(Utc::now().naive_utc());
        let updated = active.update(db).await?;

        Self::touch_plan(db, plan_id).await?;
        Ok(updated)
    }

    pub async fn remove_course(
        db: &DatabaseConnection,
        entry: plan_courses::Model,
    ) -> Result<(), DbErr> {
        let plan_id = entry.plan_id;
        plan_courses::Entity::delete_by_id(entry.id).exec(db).await?;
        Self::touch_plan(db, plan_id).await
    }

    /// Project a plan's course entries into the form the requirement
    /// evaluation works over. Entries whose course row has vanished are
    /// skipped.
    pub async fn get_planned_courses(
        db: &DatabaseConnection,
        plan_id: Uuid,
    ) -> Result<Vec<PlannedCourse>, DbErr> {
        let entries = plan_courses::Entity::find()
            .filter(plan_courses::Column::PlanId.eq(plan_id))
            .find_also_related(courses::Entity)
            .all(db)
            .await?;

        Ok(entries
            .into_iter()
            .filter_map(|(entry, course)| {
                course.map(|course| {
                    PlannedCourse::new(
                        CourseKey::new(&course.subject_code, &course.catalog_number),
                        course.units,
                        entry.status,
                    )
                })
            })
            .collect())
    }

    async fn touch_plan(db: &DatabaseConnection, plan_id: Uuid) -> Result<(), DbErr> {
        plans::Entity::update_many()
            .col_expr(plans::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(plans::Column::Id.eq(plan_id))
            .exec(db)
            .await?;
        Ok(())
    }
}
