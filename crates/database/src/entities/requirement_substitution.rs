use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requirement_substitutions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub original_course_id: Uuid,
    pub substitute_course_id: Uuid,
}

// Both course columns point at the courses table, so there is no single
// Related<course::Entity>; the services resolve them with explicit lookups.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::requirement::Entity",
        from = "Column::RequirementId",
        to = "super::requirement::Column::Id"
    )]
    Requirement,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::OriginalCourseId",
        to = "super::course::Column::Id"
    )]
    OriginalCourse,
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::SubstituteCourseId",
        to = "super::course::Column::Id"
    )]
    SubstituteCourse,
}

impl Related<super::requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
