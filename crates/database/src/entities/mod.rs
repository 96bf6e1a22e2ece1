pub mod course;
pub mod degree;
pub mod faculty;
pub mod plan;
pub mod plan_course;
pub mod plan_degree;
pub mod plan_requirement;
pub mod program;
pub mod requirement;
pub mod requirement_course;
pub mod requirement_list;
pub mod requirement_list_course;
pub mod requirement_set;
pub mod requirement_substitution;

pub use course as courses;
pub use degree as degrees;
pub use faculty as faculties;
pub use plan as plans;
pub use plan_course as plan_courses;
pub use plan_degree as plan_degrees;
pub use plan_requirement as plan_requirements;
pub use program as programs;
pub use requirement as requirements;
pub use requirement_course as requirement_courses;
pub use requirement_list as requirement_lists;
pub use requirement_list_course as requirement_list_courses;
pub use requirement_set as requirement_sets;
pub use requirement_substitution as requirement_substitutions;
