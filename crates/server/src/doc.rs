use crate::routes::{course, health, plan, program, root};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        course::get_courses,
        course::get_course_filters,
        course::get_course_by_id,
        program::get_programs,
        program::get_program_by_id,
        program::get_degree,
        plan::get_plans,
        plan::create_plan,
        plan::get_plan,
        plan::update_plan,
        plan::delete_plan,
        plan::add_degree,
        plan::remove_degree,
        plan::add_course,
        plan::update_course,
        plan::remove_course,
        plan::refresh_requirements,
        plan::get_requirements
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Courses", description = "Course catalog endpoints"),
        (name = "Programs", description = "Program and degree catalog endpoints"),
        (name = "Plans", description = "Degree planning endpoints"),
    ),
    info(
        title = "Degree Planner API",
        version = "1.0.0",
        description = "Course catalog browsing and degree requirement tracking",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
