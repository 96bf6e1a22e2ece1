use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Natural keys; the course one also backs the import upsert
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_subject_code_catalog_number")
                    .table(Courses::Table)
                    .col(Courses::SubjectCode)
                    .col(Courses::CatalogNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_faculties_code")
                    .table(Faculties::Table)
                    .col(Faculties::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // One entry per course per plan, one attachment per degree role
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_courses_plan_id_course_id")
                    .table(PlanCourses::Table)
                    .col(PlanCourses::PlanId)
                    .col(PlanCourses::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_degrees_plan_id_degree_id_degree_type")
                    .table(PlanDegrees::Table)
                    .col(PlanDegrees::PlanId)
                    .col(PlanDegrees::DegreeId)
                    .col(PlanDegrees::DegreeType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Backs the progress upsert on refresh
        manager
            .create_index(
                Index::create()
                    .name("idx_plan_requirements_plan_degree_id_requirement_id")
                    .table(PlanRequirements::Table)
                    .col(PlanRequirements::PlanDegreeId)
                    .col(PlanRequirements::RequirementId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index on plans.user_id for the plan listing
        manager
            .create_index(
                Index::create()
                    .name("idx_plans_user_id")
                    .table(Plans::Table)
                    .col(Plans::UserId)
                    .to_owned(),
            )
            .await?;

        // Indexes on foreign keys for faster joins
        manager
            .create_index(
                Index::create()
                    .name("idx_programs_faculty_id")
                    .table(Programs::Table)
                    .col(Programs::FacultyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_degrees_program_id")
                    .table(Degrees::Table)
                    .col(Degrees::ProgramId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_sets_degree_id")
                    .table(RequirementSets::Table)
                    .col(RequirementSets::DegreeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirements_requirement_set_id")
                    .table(Requirements::Table)
                    .col(Requirements::RequirementSetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_courses_requirement_id")
                    .table(RequirementCourses::Table)
                    .col(RequirementCourses::RequirementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_lists_requirement_id")
                    .table(RequirementLists::Table)
                    .col(RequirementLists::RequirementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_list_courses_list_id")
                    .table(RequirementListCourses::Table)
                    .col(RequirementListCourses::ListId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requirement_substitutions_requirement_id")
                    .table(RequirementSubstitutions::Table)
                    .col(RequirementSubstitutions::RequirementId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_requirement_substitutions_requirement_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_requirement_list_courses_list_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_requirement_lists_requirement_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_requirement_courses_requirement_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_requirements_requirement_set_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_requirement_sets_degree_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_degrees_program_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_programs_faculty_id").to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_plans_user_id").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_requirements_plan_degree_id_requirement_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_degrees_plan_id_degree_id_degree_type")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_plan_courses_plan_id_course_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(Index::drop().name("idx_faculties_code").to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_subject_code_catalog_number")
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Faculties {
    Table,
    Code,
}

#[derive(Iden)]
enum Courses {
    Table,
    SubjectCode,
    CatalogNumber,
}

#[derive(Iden)]
enum Programs {
    Table,
    FacultyId,
}

#[derive(Iden)]
enum Degrees {
    Table,
    ProgramId,
}

#[derive(Iden)]
enum RequirementSets {
    Table,
    DegreeId,
}

#[derive(Iden)]
enum Requirements {
    Table,
    RequirementSetId,
}

#[derive(Iden)]
enum RequirementCourses {
    Table,
    RequirementId,
}

#[derive(Iden)]
enum RequirementLists {
    Table,
    RequirementId,
}

#[derive(Iden)]
enum RequirementListCourses {
    Table,
    ListId,
}

#[derive(Iden)]
enum RequirementSubstitutions {
    Table,
    RequirementId,
}

#[derive(Iden)]
enum Plans {
    Table,
    UserId,
}

#[derive(Iden)]
enum PlanCourses {
    Table,
    PlanId,
    CourseId,
}

#[derive(Iden)]
enum PlanDegrees {
    Table,
    PlanId,
    DegreeId,
    DegreeType,
}

#[derive(Iden)]
enum PlanRequirements {
    Table,
    PlanDegreeId,
    RequirementId,
}
