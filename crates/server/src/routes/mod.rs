use axum::http::StatusCode;
use log::error;
use sea_orm::DbErr;

pub mod course;
pub mod health;
pub mod plan;
pub mod program;
pub mod root;

/// Maps a store failure to a 500 after logging it, since the response
/// body carries no error detail
pub(crate) fn internal_error(err: DbErr) -> StatusCode {
    error!("Database error: {err}");
    StatusCode::INTERNAL_SERVER_ERROR
}
