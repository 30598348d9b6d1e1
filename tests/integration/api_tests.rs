//! REST API integration tests

use axum::http::StatusCode;
use rstest::rstest;
use serde_json::{json, Value};

use crate::common::{acme, product_ref, tools, TestApp};

/// Create Acme, Tools and a Hammer referencing both
async fn seed(app: &TestApp) -> Value {
    app.post_json("/api/organizations", acme())
        .await
        .assert_created();
    app.post_json("/api/categories", tools())
        .await
        .assert_created();
    let response = app
        .post_json("/api/products", product_ref("Hammer", 1, 1))
        .await;
    response.assert_created();
    response.json()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let json: Value = app.get("/api/health").await.assert_ok().json();
    assert_eq!(json["status"], "healthy");

    let json: Value = app.get("/api/health/detailed").await.assert_ok().json();
    assert_eq!(json["components"]["database"]["status"], "healthy");
    assert!(json["components"].get("missing_tables").is_none());

    app.get("/api/health/live").await.assert_ok();
    app.get("/api/health/ready").await.assert_ok();
}

#[tokio::test]
async fn test_empty_lists() {
    let app = TestApp::new().await;

    for uri in ["/api/products", "/api/categories", "/api/organizations"] {
        let json: Vec<Value> = app.get(uri).await.assert_ok().json();
        assert!(json.is_empty(), "{uri} should start empty");
    }
}

#[tokio::test]
async fn test_create_and_list_product_with_associations() {
    let app = TestApp::new().await;

    let org: Value = app
        .post_json("/api/organizations", acme())
        .await
        .assert_created()
        .json();
    assert_eq!(org, json!({"id": 1, "name": "Acme"}));

    let category: Value = app
        .post_json("/api/categories", tools())
        .await
        .assert_created()
        .json();
    assert_eq!(
        category,
        json!({"id": 1, "name": "Tools", "description": "Hand tools"})
    );

    let created: Value = app
        .post_json("/api/products", product_ref("Hammer", 1, 1))
        .await
        .assert_created()
        .json();

    let expected = json!({
        "id": 1,
        "name": "Hammer",
        "organization": {"id": 1, "name": "Acme"},
        "category": {"id": 1, "name": "Tools", "description": "Hand tools"}
    });
    assert_eq!(created, expected);

    let list = app.get("/api/products").await;
    list.assert_ok();
    assert_eq!(list.json::<Value>(), json!([expected]));
    assert!(list.content_type().starts_with("application/json"));
}

#[tokio::test]
async fn test_product_with_embedded_associations_creates_them() {
    let app = TestApp::new().await;

    let created: Value = app
        .post_json(
            "/api/products",
            json!({
                "name": "Saw",
                "organization": {"name": "Globex"},
                "category": {"name": "Garden"}
            }),
        )
        .await
        .assert_created()
        .json();

    assert_eq!(created["organization"]["name"], "Globex");
    assert!(created["category"]["description"].is_null());

    let orgs: Vec<Value> = app.get("/api/organizations").await.json();
    assert_eq!(orgs.len(), 1);
    let categories: Vec<Value> = app.get("/api/categories").await.json();
    assert_eq!(categories[0]["name"], "Garden");
}

#[tokio::test]
async fn test_get_by_id() {
    let app = TestApp::new().await;
    let hammer = seed(&app).await;

    let json: Value = app.get("/api/products/1").await.assert_ok().json();
    assert_eq!(json, hammer);

    let json: Value = app.get("/api/organizations/1").await.assert_ok().json();
    assert_eq!(json["name"], "Acme");

    let json: Value = app.get("/api/categories/1").await.assert_ok().json();
    assert_eq!(json["name"], "Tools");
}

#[rstest]
#[case("/api/products/42")]
#[case("/api/organizations/42")]
#[case("/api/categories/42")]
#[case("/api/categories/42/products")]
#[tokio::test]
async fn test_missing_resources_return_404(#[case] uri: &str) {
    let app = TestApp::new().await;
    let json: Value = app.get(uri).await.assert_not_found().json();
    assert_eq!(json["error"], "not_found");
}

#[tokio::test]
async fn test_category_products() {
    let app = TestApp::new().await;
    seed(&app).await;

    app.post_json("/api/categories", json!({"name": "Garden"}))
        .await
        .assert_created();
    app.post_json("/api/products", product_ref("Rake", 1, 2))
        .await
        .assert_created();

    let tools: Vec<Value> = app.get("/api/categories/1/products").await.assert_ok().json();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "Hammer");

    let garden: Vec<Value> = app.get("/api/categories/2/products").await.assert_ok().json();
    assert_eq!(garden.len(), 1);
    assert_eq!(garden[0]["category"]["name"], "Garden");
}

#[rstest]
#[case("/api/organizations", json!({}))]
#[case("/api/organizations", json!({"name": "  "}))]
#[case("/api/categories", json!({"description": "no name"}))]
#[case("/api/products", json!({"organization": {"id": 1}, "category": {"id": 1}}))]
#[tokio::test]
async fn test_blank_name_is_rejected(#[case] uri: &str, #[case] body: Value) {
    let app = TestApp::new().await;

    let json: Value = app.post_json(uri, body).await.assert_bad_request().json();
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["details"]["name"][0]["code"], "required");
}

#[tokio::test]
async fn test_validation_reports_every_field() {
    let app = TestApp::new().await;

    let json: Value = app
        .post_json(
            "/api/products",
            json!({
                "name": "x".repeat(121),
                "organization": {"name": ""}
            }),
        )
        .await
        .assert_bad_request()
        .json();

    let details = &json["details"];
    assert_eq!(details["name"][0]["code"], "length");
    assert_eq!(details["name"][0]["params"]["max"], 120);
    assert_eq!(details["organization"]["name"][0]["code"], "required");
    assert_eq!(details["category"][0]["code"], "required");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = app
        .post_raw("/api/organizations", "application/json", "{not json")
        .await;
    let json: Value = response.assert_bad_request().json();
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn test_duplicate_category_name_conflicts() {
    let app = TestApp::new().await;
    app.post_json("/api/categories", tools())
        .await
        .assert_created();

    let response = app
        .post_json("/api/categories", json!({"name": "Tools"}))
        .await;
    let json: Value = response.assert_status(StatusCode::CONFLICT).json();
    assert_eq!(json["error"], "conflict");
    assert!(json["message"].as_str().unwrap().contains("Tools"));

    let categories: Vec<Value> = app.get("/api/categories").await.json();
    assert_eq!(categories.len(), 1);
}

#[tokio::test]
async fn test_missing_reference_is_unprocessable() {
    let app = TestApp::new().await;
    app.post_json("/api/categories", tools())
        .await
        .assert_created();

    let response = app
        .post_json("/api/products", product_ref("Hammer", 99, 1))
        .await;
    let json: Value = response
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY)
        .json();
    assert_eq!(json["error"], "reference_error");
    assert!(json["message"].as_str().unwrap().contains("99"));

    let products: Vec<Value> = app.get("/api/products").await.json();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_failed_create_leaves_nothing_behind() {
    let app = TestApp::new().await;

    // new organization, but the category reference is dangling
    app.post_json(
        "/api/products",
        json!({
            "name": "Hammer",
            "organization": {"name": "Acme"},
            "category": {"id": 7}
        }),
    )
    .await
    .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // duplicate embedded category is detected after the organization insert
    app.post_json("/api/categories", tools())
        .await
        .assert_created();
    app.post_json(
        "/api/products",
        json!({
            "name": "Hammer",
            "organization": {"name": "Acme"},
            "category": {"name": "Tools"}
        }),
    )
    .await
    .assert_status(StatusCode::CONFLICT);

    let orgs: Vec<Value> = app.get("/api/organizations").await.json();
    assert!(orgs.is_empty());
    let products: Vec<Value> = app.get("/api/products").await.json();
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_ids_are_assigned_in_order() {
    let app = TestApp::new().await;

    let mut last = 0;
    for name in ["Acme", "Globex", "Initech"] {
        let org: Value = app
            .post_json("/api/organizations", json!({"name": name}))
            .await
            .assert_created()
            .json();
        let id = org["id"].as_i64().unwrap();
        assert!(id > last);
        last = id;
    }
}
