//! Integration tests using a mock feed server
//!
//! Tests the full end-to-end flow: feed request → saved JSON file → flattened
//! rows → DuckDB table

use neows_etl::config::Settings;
use neows_etl::database::DatabaseEngine;
use neows_etl::extract::NeoWsExtractor;
use neows_etl::http::HttpClientConfig;
use neows_etl::parser::BatchAssembler;
use neows_etl::storage::JsonStore;
use neows_etl::{Error, LoadMode, Pipeline};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn observation(id: u64, date: &str, hazardous: bool) -> Value {
    json!({
        "links": {"self": format!("http://api.nasa.gov/neo/rest/v1/neo/{id}")},
        "id": id.to_string(),
        "neo_reference_id": id.to_string(),
        "name": format!("({id})"),
        "absolute_magnitude_h": 22.1,
        "estimated_diameter": {
            "kilometers": {
                "estimated_diameter_min": 0.1,
                "estimated_diameter_max": 0.25
            },
            "meters": {
                "estimated_diameter_min": 100.0,
                "estimated_diameter_max": 250.0
            }
        },
        "is_potentially_hazardous_asteroid": hazardous,
        "close_approach_data": [{
            "close_approach_date": date,
            "relative_velocity": {"kilometers_per_second": "12.5"},
            "miss_distance": {
                "astronomical": "0.25",
                "kilometers": "37399502.123"
            },
            "orbiting_body": "Earth"
        }],
        "is_sentry_object": false
    })
}

fn feed() -> Value {
    json!({
        "links": {},
        "element_count": 4,
        "near_earth_objects": {
            "2024-10-28": [
                observation(3_542_519, "2024-10-28", false),
                observation(3_726_710, "2024-10-28", true)
            ],
            "2024-10-27": [
                observation(2_465_633, "2024-10-27", false),
                {"id": "not-a-number", "close_approach_data": []}
            ]
        }
    })
}

async fn mount_feed(server: &MockServer, start: &str, end: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/neo/rest/v1/feed"))
        .and(query_param("start_date", start))
        .and(query_param("end_date", end))
        .and(query_param("api_key", "DEMO_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Extract → Parse
// ============================================================================

#[tokio::test]
async fn test_extracted_file_parses_in_payload_order() {
    let server = MockServer::start().await;
    mount_feed(&server, "2024-10-27", "2024-10-28", feed()).await;

    let dir = tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    let extractor = NeoWsExtractor::new(
        "DEMO_KEY",
        format!("{}/neo/rest/v1/feed", server.uri()),
        store.clone(),
        HttpClientConfig::default(),
    )
    .unwrap();

    let outcome = extractor
        .extract("2024-10-27", Some("2024-10-28"))
        .await
        .unwrap();
    assert_eq!(store.list_files().unwrap(), vec![outcome.file_name.clone()]);

    let output = BatchAssembler::new(store)
        .process_file_with_summary(&outcome.file_name)
        .unwrap();

    let ids: Vec<i64> = output.records.iter().map(|r| r.asteroid_id).collect();
    assert_eq!(ids, vec![3_542_519, 3_726_710, 2_465_633]);
    assert_eq!(output.summary.dates, 2);
    assert_eq!(output.summary.skipped, 1);
    assert!(output.records[1].is_hazardous);
    assert!((output.records[0].miss_distance_km - 37_399_502.123).abs() < 1e-6);
}

// ============================================================================
// Full Pipeline
// ============================================================================

#[tokio::test]
async fn test_pipeline_from_settings_into_duckdb_file() {
    let server = MockServer::start().await;
    mount_feed(&server, "2024-10-27", "2024-10-28", feed()).await;

    let dir = tempdir().unwrap();
    let db_path = dir.path().join("db").join("neows.duckdb");

    let mut settings = Settings::default();
    settings.api_key = Some("DEMO_KEY".to_string());
    settings.feed_url = format!("{}/neo/rest/v1/feed", server.uri());
    settings.data_dir = dir.path().join("json");
    settings.database.path = db_path.to_string_lossy().to_string();
    settings.validate().unwrap();

    {
        let mut pipeline = Pipeline::from_settings(&settings).unwrap();
        let report = pipeline.run("2024-10-27", Some("2024-10-28")).await.unwrap();
        assert_eq!(report.extract.element_count, Some(4));
        assert_eq!(report.load.inserted, 3);

        // Loading the same file again appends
        let again = pipeline.load_file(&report.extract.file_name).unwrap();
        assert_eq!(again.inserted, 3);
    }

    let engine = DatabaseEngine::open(&settings.database.path, "asteroids_details").unwrap();
    assert_eq!(engine.count_rows().unwrap(), 6);
    drop(engine);

    settings.database.load_mode = LoadMode::Truncate;
    let mut pipeline = Pipeline::from_settings(&settings).unwrap();
    let report = pipeline
        .transform_and_load("2024-10-27", Some("2024-10-28"))
        .unwrap();
    assert_eq!(report.inserted, 3);
    assert_eq!(pipeline.engine().count_rows().unwrap(), 3);
}

#[tokio::test]
async fn test_pipeline_feed_error_loads_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": "API_KEY_INVALID"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let store = JsonStore::new(dir.path());
    let extractor = NeoWsExtractor::new(
        "DEMO_KEY",
        format!("{}/neo/rest/v1/feed", server.uri()),
        store.clone(),
        HttpClientConfig::default(),
    )
    .unwrap();
    let mut pipeline = Pipeline::new(
        store,
        DatabaseEngine::open_in_memory("asteroids_details").unwrap(),
    )
    .with_extractor(extractor);

    let err = pipeline.run("2024-10-27", None).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 403, .. }));
    assert!(pipeline.store().list_files().unwrap().is_empty());
    assert!(!pipeline.engine().table_exists("asteroids_details").unwrap());
}
