use database::db::create_connection;
use database::services::import::ImportService;
use models::catalog_data::CatalogImport;

/// Loads a catalog JSON export into the database
#[tokio::main]
async fn main() {
    env_logger::init();
    dotenvy::dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .expect("Usage: seeder <catalog.json>");

    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("Failed to read {path}: {err}"));
    let catalog: CatalogImport =
        serde_json::from_str(&raw).unwrap_or_else(|err| panic!("Failed to parse {path}: {err}"));

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = create_connection(&database_url)
        .await
        .expect("Failed to connect to the database");

    let summary = ImportService::import_catalog(&db, &catalog)
        .await
        .expect("Import failed");

    println!(
        "Imported {} faculties, {} courses, {} programs, {} degrees, {} requirements",
        summary.faculties, summary.courses, summary.programs, summary.degrees, summary.requirements
    );
    if summary.unresolved_courses > 0 {
        println!(
            "{} course references did not match the catalog and were skipped",
            summary.unresolved_courses
        );
    }

    db.close()
        .await
        .expect("Failed to close the database connection");
}
