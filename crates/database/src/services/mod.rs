pub mod catalog;
pub mod import;
pub mod plan;
pub mod requirement;
