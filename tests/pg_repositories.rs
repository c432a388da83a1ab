//! Postgres 仓储测试
//!
//! 需要真实数据库，连接参数与服务相同（DB_HOST / DB_PORT / DB_USER / DB_PASS / DB_NAME）。
//! 运行：cargo test --test pg_repositories -- --ignored

use storefront_api::{
    app::{
        products::{
            model::{NewProduct, ProductChanges},
            PgProductRepository, ProductRepository,
        },
        users::{
            model::{NewUser, UserChanges},
            PgUserRepository, UserRepository,
        },
    },
    config::Config,
    infrastructure::database::{DatabaseManager, StoreError},
};
use uuid::Uuid;

async fn connect() -> DatabaseManager {
    let config = Config::from_env().expect("invalid database environment");
    let db = DatabaseManager::connect(&config.database)
        .await
        .expect("Failed to connect to test database");
    db.ensure_schema().await.expect("Failed to create tables");
    db
}

fn unique_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_user_crud_round_trip() {
    let db = connect().await;
    let repo = PgUserRepository::new(db.pool().clone());

    let email = unique_email();
    let created = repo
        .create(NewUser {
            name: "Ana".to_string(),
            email: email.clone(),
            password_hash: "hash".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(repo.get(created.id).await.unwrap(), Some(created.clone()));
    assert_eq!(
        repo.find_by_email(&email).await.unwrap(),
        Some(created.clone())
    );

    let updated = repo
        .update(
            created.id,
            UserChanges {
                name: Some("Ana Maria".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert_eq!(updated.email, created.email);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert_eq!(repo.get(created.id).await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_duplicate_email_is_unique_violation() {
    let db = connect().await;
    let repo = PgUserRepository::new(db.pool().clone());

    let email = unique_email();
    let new_user = NewUser {
        name: "Ana".to_string(),
        email,
        password_hash: "hash".to_string(),
    };
    let first = repo.create(new_user.clone()).await.unwrap();
    let err = repo.create(new_user).await.unwrap_err();
    assert!(matches!(err, StoreError::UniqueViolation { .. }));

    repo.delete(first.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_product_update_missing_row() {
    let db = connect().await;
    let repo = PgProductRepository::new(db.pool().clone());

    let result = repo
        .update(
            i32::MAX,
            ProductChanges {
                stock: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_products_listed_in_id_order() {
    let db = connect().await;
    let repo = PgProductRepository::new(db.pool().clone());

    let mut created = Vec::new();
    for name in ["b", "a", "c"] {
        created.push(
            repo.create(NewProduct {
                name: name.to_string(),
                description: None,
                price: 1.5,
                stock: 0,
            })
            .await
            .unwrap(),
        );
    }

    let ids: Vec<i32> = repo.list().await.unwrap().iter().map(|p| p.id).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);

    let updated = repo
        .update(
            created[0].id,
            ProductChanges {
                description: Some(Some(String::new())),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some(""));
    assert_eq!(updated.price, 1.5);

    for product in created {
        repo.delete(product.id).await.unwrap();
    }
}
