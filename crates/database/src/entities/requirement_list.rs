use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requirement_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub requirement_id: Uuid,
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::requirement::Entity",
        from = "Column::RequirementId",
        to = "super::requirement::Column::Id"
    )]
    Requirement,
    #[sea_orm(has_many = "super::requirement_list_course::Entity")]
    RequirementListCourses,
}

impl Related<super::requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirement.def()
    }
}

impl Related<super::requirement_list_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementListCourses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
