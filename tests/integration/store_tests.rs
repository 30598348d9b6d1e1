//! Repository tests against a real database

use product_catalog::db::{
    self, CategoryRepository, OrganizationRepository, ProductRepository, StoreError,
};
use product_catalog::models::{
    CategoryRef, CreateCategoryRequest, CreateOrganizationRequest, CreateProductRequest,
    OrganizationRef,
};

use crate::common::{test_config, TestApp};

fn org(name: &str) -> CreateOrganizationRequest {
    CreateOrganizationRequest {
        name: Some(name.to_string()),
    }
}

fn category(name: &str) -> CreateCategoryRequest {
    CreateCategoryRequest {
        name: Some(name.to_string()),
        description: None,
    }
}

fn product(name: &str, organization_id: i64, category_id: i64) -> CreateProductRequest {
    CreateProductRequest {
        name: Some(name.to_string()),
        organization: Some(OrganizationRef {
            id: Some(organization_id),
            name: None,
        }),
        category: Some(CategoryRef {
            id: Some(category_id),
            ..CategoryRef::default()
        }),
    }
}

#[tokio::test]
async fn test_schema_is_complete() {
    let app = TestApp::new().await;

    let missing = db::missing_tables(&app.state.db).await.unwrap();
    assert!(missing.is_empty());

    let tables = db::list_tables(&app.state.db).await.unwrap();
    for table in db::REQUIRED_TABLES {
        assert!(tables.iter().any(|t| t == table));
    }
}

#[tokio::test]
async fn test_aggregate_matches_stored_rows() {
    let app = TestApp::new().await;
    let pool = &app.state.db;

    let acme = OrganizationRepository::new(pool).create(&org("Acme")).await.unwrap();
    let globex = OrganizationRepository::new(pool).create(&org("Globex")).await.unwrap();
    let tools = CategoryRepository::new(pool).create(&category("Tools")).await.unwrap();

    let products = ProductRepository::new(pool);
    products.create(product("Hammer", acme.id, tools.id)).await.unwrap();
    products.create(product("Wrench", globex.id, tools.id)).await.unwrap();

    let loaded = products.list_with_associations().await.unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].organization, acme);
    assert_eq!(loaded[1].organization, globex);
    assert!(loaded.iter().all(|p| p.category == tools));
}

#[tokio::test]
async fn test_created_product_round_trips() {
    let app = TestApp::new().await;
    let pool = &app.state.db;

    let created = ProductRepository::new(pool)
        .create(CreateProductRequest {
            name: Some("Saw".to_string()),
            organization: Some(OrganizationRef {
                id: None,
                name: Some("Acme".to_string()),
            }),
            category: Some(CategoryRef {
                id: None,
                name: Some("Tools".to_string()),
                description: Some("Hand tools".to_string()),
            }),
        })
        .await
        .unwrap();

    let fetched = ProductRepository::new(pool).get_by_id(created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.category.description.as_deref(), Some("Hand tools"));
}

#[tokio::test]
async fn test_duplicate_category_is_constraint_violation() {
    let app = TestApp::new().await;
    let repo = CategoryRepository::new(&app.state.db);

    repo.create(&category("Tools")).await.unwrap();
    let err = repo.create(&category("Tools")).await.unwrap_err();

    match err {
        StoreError::ConstraintViolation { entity, field, value } => {
            assert_eq!(entity, "category");
            assert_eq!(field, "name");
            assert_eq!(value, "Tools");
        }
        other => panic!("expected ConstraintViolation, got {:?}", other),
    }
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_name_never_reaches_database() {
    let app = TestApp::new().await;
    let repo = OrganizationRepository::new(&app.state.db);

    let err = repo.create(&org("")).await.unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(repo.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_reference_is_reported() {
    let app = TestApp::new().await;
    let pool = &app.state.db;
    let tools = CategoryRepository::new(pool).create(&category("Tools")).await.unwrap();

    let err = ProductRepository::new(pool)
        .create(product("Hammer", 404, tools.id))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        StoreError::Reference {
            entity: "organization",
            id: 404
        }
    ));
}

#[tokio::test]
async fn test_list_by_category_requires_category() {
    let app = TestApp::new().await;
    let err = ProductRepository::new(&app.state.db)
        .list_by_category(3)
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::NotFound { entity: "category", id: 3 }));
}

#[tokio::test]
async fn test_ids_are_unique_and_increasing() {
    let app = TestApp::new().await;
    let repo = CategoryRepository::new(&app.state.db);

    let mut ids = Vec::new();
    for name in ["A", "B", "C", "D"] {
        ids.push(repo.create(&category(name)).await.unwrap().id);
    }

    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_concurrent_creates_all_succeed() {
    let mut config = test_config();
    config.database.max_connections = 8;
    let app = TestApp::with_config(config).await;
    let pool = &app.state.db;

    let acme = OrganizationRepository::new(pool).create(&org("Acme")).await.unwrap();
    let tools = CategoryRepository::new(pool).create(&category("Tools")).await.unwrap();

    let mut handles = Vec::new();
    for i in 0..64 {
        let pool = pool.clone();
        let mut req = product(&format!("Item {i}"), acme.id, tools.id);
        if i % 2 == 1 {
            // every other create also inserts a new organization
            req.organization = Some(OrganizationRef {
                id: None,
                name: Some(format!("Org {i}")),
            });
        }
        handles.push(tokio::spawn(async move {
            ProductRepository::new(&pool).create(req).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let created = handle.await.unwrap().expect("concurrent create failed");
        ids.push(created.id);
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 64);

    let stored = ProductRepository::new(pool).list_with_associations().await.unwrap();
    assert_eq!(stored.len(), 64);
    assert_eq!(OrganizationRepository::new(pool).list().await.unwrap().len(), 33);
}

#[tokio::test]
async fn test_names_are_stored_as_sent() {
    let app = TestApp::new().await;
    let created = OrganizationRepository::new(&app.state.db)
        .create(&org(" Acme "))
        .await
        .unwrap();
    assert_eq!(created.name, " Acme ");
}
