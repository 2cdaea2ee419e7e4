//! Tests for the auth module

use super::*;

#[test]
fn test_no_auth() {
    let auth = Authenticator::new(AuthConfig::None);
    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert!(built.url().query().is_none());
    assert!(built.headers().is_empty());
}

#[test]
fn test_api_key_header() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        location: Location::Header,
        name: Some("X-API-Key".to_string()),
        value: "test-key-123".to_string(),
    });

    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://example.com/api"));

    let built = req.build().unwrap();
    assert_eq!(built.headers().get("X-API-Key").unwrap(), "test-key-123");
}

#[test]
fn test_api_key_header_default_name() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        location: Location::Header,
        name: None,
        value: "k".to_string(),
    });

    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/api"))
        .build()
        .unwrap();
    assert_eq!(built.headers().get("X-Api-Key").unwrap(), "k");
}

#[test]
fn test_api_key_query_default_param() {
    let auth = Authenticator::new(AuthConfig::api_key_query("DEMO_KEY"));

    let client = reqwest::Client::new();
    let req = auth.apply(client.get("https://api.nasa.gov/neo/rest/v1/feed?start_date=2024-01-01"));

    let built = req.build().unwrap();
    let query = built.url().query().unwrap();
    assert!(query.contains("start_date=2024-01-01"));
    assert!(query.contains("api_key=DEMO_KEY"));
}

#[test]
fn test_api_key_query_custom_param() {
    let auth = Authenticator::new(AuthConfig::ApiKey {
        location: Location::Query,
        name: Some("apikey".to_string()),
        value: "secret123".to_string(),
    });

    let client = reqwest::Client::new();
    let built = auth
        .apply(client.get("https://example.com/api"))
        .build()
        .unwrap();
    assert!(built.url().query().unwrap().contains("apikey=secret123"));
}
