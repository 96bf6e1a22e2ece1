use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requirements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub requirement_set_id: Uuid,
    pub name: String,
    // Kept as text so a malformed discriminator degrades one requirement
    // instead of failing the whole query; parsed in the services
    pub requirement_type: String,
    pub description: Option<String>,
    pub courses_required: Option<i32>,
    pub units_required: Option<f32>,
    pub level_restriction: Option<String>,
    pub course_code_restriction: Option<String>,
    pub concentration_type: Option<String>,
    pub min_courses_per_subject: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::requirement_set::Entity",
        from = "Column::RequirementSetId",
        to = "super::requirement_set::Column::Id"
    )]
    RequirementSet,
    #[sea_orm(has_many = "super::requirement_course::Entity")]
    RequirementCourses,
    #[sea_orm(has_many = "super::requirement_list::Entity")]
    RequirementLists,
    #[sea_orm(has_many = "super::requirement_substitution::Entity")]
    RequirementSubstitutions,
}

impl Related<super::requirement_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementSet.def()
    }
}

impl Related<super::requirement_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementCourses.def()
    }
}

impl Related<super::requirement_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementLists.def()
    }
}

impl Related<super::requirement_substitution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementSubstitutions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
