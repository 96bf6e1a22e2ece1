pub mod calendar;
pub mod catalog_data;
pub mod course;
pub mod filters;
pub mod requirement;
pub mod status;
