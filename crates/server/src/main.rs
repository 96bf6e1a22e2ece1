use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use database::db::create_connection;
use log::{error, info};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod doc;
mod dtos;
mod routes;
mod utils;

use crate::doc::ApiDoc;
use crate::routes::{course, health, plan, program, root};
use crate::utils::shutdown::shutdown_signal;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let issuer_url = std::env::var("OIDC_ISSUER_URL").expect("OIDC_ISSUER_URL must be set");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let db = create_connection(&database_url)
        .await
        .expect("Failed to connect to the database");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(issuer_url)
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let state = AppState { db: db.clone() };

    // Plan routes carry the JWT resource-server layer; the catalog stays public
    let plan_routes = Router::new()
        .route("/plans", get(plan::get_plans).post(plan::create_plan))
        .route(
            "/plans/{id}",
            get(plan::get_plan)
                .patch(plan::update_plan)
                .delete(plan::delete_plan),
        )
        .route("/plans/{id}/degrees", post(plan::add_degree))
        .route(
            "/plans/{id}/degrees/{plan_degree_id}",
            delete(plan::remove_degree),
        )
        .route("/plans/{id}/courses", post(plan::add_course))
        .route(
            "/plans/{id}/courses/{plan_course_id}",
            patch(plan::update_course).delete(plan::remove_course),
        )
        .route(
            "/plans/{id}/requirements/refresh",
            post(plan::refresh_requirements),
        )
        .route("/plans/{id}/requirements", get(plan::get_requirements))
        .layer(ServiceBuilder::new().layer(oauth2_resource_server.into_layer()));

    let app = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/courses", get(course::get_courses))
        .route("/courses/filters", get(course::get_course_filters))
        .route("/courses/{id}", get(course::get_course_by_id))
        .route("/programs", get(program::get_programs))
        .route("/programs/{id}", get(program::get_program_by_id))
        .route("/degrees/{id}", get(program::get_degree))
        .merge(plan_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await.unwrap();
    info!("Listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    if let Err(err) = db.close().await {
        error!("Failed to close the database connection: {err}");
    }
}
