use models::status::RequirementStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "plan_requirements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub plan_degree_id: Uuid,
    pub requirement_id: Uuid,
    pub status: RequirementStatus,
    // Integer percentage, 0 to 100
    pub progress: i16,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_degree::Entity",
        from = "Column::PlanDegreeId",
        to = "super::plan_degree::Column::Id"
    )]
    PlanDegree,
    #[sea_orm(
        belongs_to = "super::requirement::Entity",
        from = "Column::RequirementId",
        to = "super::requirement::Column::Id"
    )]
    Requirement,
}

impl Related<super::plan_degree::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlanDegree.def()
    }
}

impl Related<super::requirement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Requirement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
