use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create plans table
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Plans::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Plans::UserId).string().not_null())
                    .col(ColumnDef::new(Plans::Name).string().not_null())
                    .col(ColumnDef::new(Plans::AcademicCalendarYear).string())
                    .col(ColumnDef::new(Plans::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Plans::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Create plan_degrees table
        manager
            .create_table(
                Table::create()
                    .table(PlanDegrees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanDegrees::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanDegrees::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PlanDegrees::DegreeId).uuid().not_null())
                    .col(ColumnDef::new(PlanDegrees::DegreeType).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_degrees-plan_id")
                            .from(PlanDegrees::Table, PlanDegrees::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_degrees-degree_id")
                            .from(PlanDegrees::Table, PlanDegrees::DegreeId)
                            .to(Degrees::Table, Degrees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_courses table
        manager
            .create_table(
                Table::create()
                    .table(PlanCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PlanCourses::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PlanCourses::CourseId).uuid().not_null())
                    .col(ColumnDef::new(PlanCourses::Status).string().not_null())
                    .col(ColumnDef::new(PlanCourses::Term).string())
                    .col(ColumnDef::new(PlanCourses::TermIndex).small_integer())
                    .col(ColumnDef::new(PlanCourses::Grade).string())
                    .col(ColumnDef::new(PlanCourses::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(PlanCourses::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_courses-plan_id")
                            .from(PlanCourses::Table, PlanCourses::PlanId)
                            .to(Plans::Table, Plans::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_courses-course_id")
                            .from(PlanCourses::Table, PlanCourses::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create plan_requirements table
        manager
            .create_table(
                Table::create()
                    .table(PlanRequirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanRequirements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlanRequirements::PlanDegreeId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlanRequirements::RequirementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PlanRequirements::Status).string().not_null())
                    .col(
                        ColumnDef::new(PlanRequirements::Progress)
                            .small_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PlanRequirements::UpdatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_requirements-plan_degree_id")
                            .from(PlanRequirements::Table, PlanRequirements::PlanDegreeId)
                            .to(PlanDegrees::Table, PlanDegrees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-plan_requirements-requirement_id")
                            .from(PlanRequirements::Table, PlanRequirements::RequirementId)
                            .to(Requirements::Table, Requirements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(PlanRequirements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlanDegrees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Plans {
    Table,
    Id,
    UserId,
    Name,
    AcademicCalendarYear,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlanDegrees {
    Table,
    Id,
    PlanId,
    DegreeId,
    DegreeType,
}

#[derive(Iden)]
enum PlanCourses {
    Table,
    Id,
    PlanId,
    CourseId,
    Status,
    Term,
    TermIndex,
    Grade,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum PlanRequirements {
    Table,
    Id,
    PlanDegreeId,
    RequirementId,
    Status,
    Progress,
    UpdatedAt,
}

#[derive(Iden)]
enum Degrees {
    Table,
    Id,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
}

#[derive(Iden)]
enum Requirements {
    Table,
    Id,
}
