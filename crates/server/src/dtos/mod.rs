pub mod course;
pub mod plan;
pub mod program;
