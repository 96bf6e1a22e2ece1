use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub subject_code: String,   // e.g. "MATH", "PMATH"
    pub catalog_number: String, // e.g. "135", "146L"
    pub title: String,
    pub units: f32,
    pub description: Option<String>,
    // Requisite fields are advisory text, never enforced
    pub prerequisites: Option<String>,
    pub corequisites: Option<String>,
    pub antirequisites: Option<String>,
    pub url: Option<String>,
    pub faculty_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::faculty::Entity",
        from = "Column::FacultyId",
        to = "super::faculty::Column::Id"
    )]
    Faculty,
}

impl Related<super::faculty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
