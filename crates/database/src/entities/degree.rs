use models::status::DegreeType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "degrees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub program_id: Uuid,
    pub name: String,
    pub degree_type: DegreeType,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::program::Entity",
        from = "Column::ProgramId",
        to = "super::program::Column::Id"
    )]
    Program,
    #[sea_orm(has_many = "super::requirement_set::Entity")]
    RequirementSets,
}

impl Related<super::program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Program.def()
    }
}

impl Related<super::requirement_set::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RequirementSets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
