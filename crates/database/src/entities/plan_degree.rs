use models::status::DegreeType;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_degrees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub degree_id: Uuid,
    pub degree_type: DegreeType,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan::Entity",
        from = "Column::PlanId",
        to = "super::plan::Column::Id"
    )]
    Plan,
    #[sea_orm(
        belongs_to = "super::degree::Entity",
        from = "Column::DegreeId",
        to = "super::degree::Column::Id"
    )]
    Degree,
    #[sea_orm(has_many = "super::plan_requirement::Entity")]
    PlanRequirements,
}

impl Related<super::plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::degree::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Degree.def()
    }
}

impl Related<super::plan_requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanRequirements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
