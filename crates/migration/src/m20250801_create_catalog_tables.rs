use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create faculties table
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Faculties::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Faculties::Code).string().not_null())
                    .col(ColumnDef::new(Faculties::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Courses::SubjectCode).string().not_null())
                    .col(ColumnDef::new(Courses::CatalogNumber).string().not_null())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Units).float().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::Prerequisites).text())
                    .col(ColumnDef::new(Courses::Corequisites).text())
                    .col(ColumnDef::new(Courses::Antirequisites).text())
                    .col(ColumnDef::new(Courses::Url).string())
                    .col(ColumnDef::new(Courses::FacultyId).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-courses-faculty_id")
                            .from(Courses::Table, Courses::FacultyId)
                            .to(Faculties::Table, Faculties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create programs table
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Programs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Programs::FacultyId).uuid())
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-programs-faculty_id")
                            .from(Programs::Table, Programs::FacultyId)
                            .to(Faculties::Table, Faculties::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create degrees table
        manager
            .create_table(
                Table::create()
                    .table(Degrees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Degrees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Degrees::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(Degrees::Name).string().not_null())
                    .col(ColumnDef::new(Degrees::DegreeType).string().not_null())
                    .col(ColumnDef::new(Degrees::Description).text())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-degrees-program_id")
                            .from(Degrees::Table, Degrees::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirement_sets table
        manager
            .create_table(
                Table::create()
                    .table(RequirementSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequirementSets::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RequirementSets::DegreeId).uuid().not_null())
                    .col(ColumnDef::new(RequirementSets::Name).string())
                    .col(ColumnDef::new(RequirementSets::AcademicCalendarYear).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_sets-degree_id")
                            .from(RequirementSets::Table, RequirementSets::DegreeId)
                            .to(Degrees::Table, Degrees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirements table
        manager
            .create_table(
                Table::create()
                    .table(Requirements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requirements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Requirements::RequirementSetId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Requirements::Name).string().not_null())
                    .col(
                        ColumnDef::new(Requirements::RequirementType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Requirements::Description).text())
                    .col(ColumnDef::new(Requirements::CoursesRequired).integer())
                    .col(ColumnDef::new(Requirements::UnitsRequired).float())
                    .col(ColumnDef::new(Requirements::LevelRestriction).string())
                    .col(ColumnDef::new(Requirements::CourseCodeRestriction).string())
                    .col(ColumnDef::new(Requirements::ConcentrationType).string())
                    .col(ColumnDef::new(Requirements::MinCoursesPerSubject).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirements-requirement_set_id")
                            .from(Requirements::Table, Requirements::RequirementSetId)
                            .to(RequirementSets::Table, RequirementSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirement_courses junction table
        manager
            .create_table(
                Table::create()
                    .table(RequirementCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequirementCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequirementCourses::RequirementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequirementCourses::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_courses-requirement_id")
                            .from(RequirementCourses::Table, RequirementCourses::RequirementId)
                            .to(Requirements::Table, Requirements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_courses-course_id")
                            .from(RequirementCourses::Table, RequirementCourses::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirement_lists table
        manager
            .create_table(
                Table::create()
                    .table(RequirementLists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequirementLists::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequirementLists::RequirementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequirementLists::Name).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_lists-requirement_id")
                            .from(RequirementLists::Table, RequirementLists::RequirementId)
                            .to(Requirements::Table, Requirements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirement_list_courses junction table
        manager
            .create_table(
                Table::create()
                    .table(RequirementListCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequirementListCourses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequirementListCourses::ListId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequirementListCourses::CourseId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_list_courses-list_id")
                            .from(
                                RequirementListCourses::Table,
                                RequirementListCourses::ListId,
                            )
                            .to(RequirementLists::Table, RequirementLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_list_courses-course_id")
                            .from(
                                RequirementListCourses::Table,
                                RequirementListCourses::CourseId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requirement_substitutions table
        manager
            .create_table(
                Table::create()
                    .table(RequirementSubstitutions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequirementSubstitutions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequirementSubstitutions::RequirementId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequirementSubstitutions::OriginalCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RequirementSubstitutions::SubstituteCourseId)
                            .uuid()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_substitutions-requirement_id")
                            .from(
                                RequirementSubstitutions::Table,
                                RequirementSubstitutions::RequirementId,
                            )
                            .to(Requirements::Table, Requirements::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_substitutions-original_course_id")
                            .from(
                                RequirementSubstitutions::Table,
                                RequirementSubstitutions::OriginalCourseId,
                            )
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-requirement_substitutions-substitute_course_id")
                            .from(
                                RequirementSubstitutions::Table,
                                RequirementSubstitutions::SubstituteCourseId,
                            )
                            .to(Courses::Table, Courses::Id)
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
            .drop_table(
                Table::drop()
                    .table(RequirementSubstitutions::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RequirementListCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RequirementLists::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RequirementCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Requirements::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(RequirementSets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Degrees::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Faculties::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
enum Faculties {
    Table,
    Id,
    Code,
    Name,
}

#[derive(Iden)]
enum Courses {
    Table,
    Id,
    SubjectCode,
    CatalogNumber,
    Title,
    Units,
    Description,
    Prerequisites,
    Corequisites,
    Antirequisites,
    Url,
    FacultyId,
}

#[derive(Iden)]
enum Programs {
    Table,
    Id,
    FacultyId,
    Name,
    Description,
}

#[derive(Iden)]
enum Degrees {
    Table,
    Id,
    ProgramId,
    Name,
    DegreeType,
    Description,
}

#[derive(Iden)]
enum RequirementSets {
    Table,
    Id,
    DegreeId,
    Name,
    AcademicCalendarYear,
}

#[derive(Iden)]
enum Requirements {
    Table,
    Id,
    RequirementSetId,
    Name,
    RequirementType,
    Description,
    CoursesRequired,
    UnitsRequired,
    LevelRestriction,
    CourseCodeRestriction,
    ConcentrationType,
    MinCoursesPerSubject,
}

#[derive(Iden)]
enum RequirementCourses {
    Table,
    Id,
    RequirementId,
    CourseId,
}

#[derive(Iden)]
enum RequirementLists {
    Table,
    Id,
    RequirementId,
    Name,
}

#[derive(Iden)]
enum RequirementListCourses {
    Table,
    Id,
    ListId,
    CourseId,
}

#[derive(Iden)]
enum RequirementSubstitutions {
    Table,
    Id,
    RequirementId,
    OriginalCourseId,
    SubstituteCourseId,
}
