use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    // JWT subject of the owner
    pub user_id: String,
    pub name: String,
    // Selects which requirement sets apply; null matches only null-year sets
    pub academic_calendar_year: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plan_degree::Entity")]
    PlanDegrees,
    #[sea_orm(has_many = "super::plan_course::Entity")]
    PlanCourses,
}

impl Related<super::plan_degree::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanDegrees.def()
    }
}

impl Related<super::plan_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanCourses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
