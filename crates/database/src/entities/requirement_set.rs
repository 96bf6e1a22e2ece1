use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "requirement_sets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub degree_id: Uuid,
    pub name: Option<String>,
    // "2024-2025" form; a null year applies to every plan
    pub academic_calendar_year: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::degree::Entity",
        from = "Column::DegreeId",
        to = "super::degree::Column::Id"
    )]
    Degree,
    #[sea_orm(has_many = "super::requirement::Entity")]
    Requirements,
}

impl Related<super::degree::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Degree.def()
    }
}

impl Related<super::requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
