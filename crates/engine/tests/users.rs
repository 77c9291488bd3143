use sea_orm::Database;

use engine::{Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn register_stores_a_hash_not_the_password() {
    let engine = engine_with_db().await;

    let user = engine
        .register("alice", "alice@x.com", "password123")
        .await
        .unwrap();

    assert_ne!(user.password_hash, "password123");
    assert!(user.password_hash.starts_with("$argon2"));
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let engine = engine_with_db().await;

    engine
        .register("alice", "alice@x.com", "password123")
        .await
        .unwrap();

    let err = engine
        .register("someone", "alice@x.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn duplicate_username_is_a_conflict() {
    let engine = engine_with_db().await;

    engine
        .register("alice", "alice@x.com", "password123")
        .await
        .unwrap();

    let err = engine
        .register("alice", "other@x.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn register_validates_input_shape() {
    let engine = engine_with_db().await;

    let err = engine.register("al", "al@x.com", "password123").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .register("alice", "not-an-address", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine.register("alice", "alice@x.com", "short").await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn authenticate_roundtrip() {
    let engine = engine_with_db().await;

    let registered = engine
        .register("alice", "alice@x.com", "password123")
        .await
        .unwrap();

    let user = engine
        .authenticate("alice@x.com", "password123")
        .await
        .unwrap();
    assert_eq!(user.id, registered.id);
    assert_eq!(user.username, "alice");

    let err = engine
        .authenticate("alice@x.com", "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    let err = engine
        .authenticate("nobody@x.com", "password123")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn email_is_case_insensitive() {
    let engine = engine_with_db().await;

    engine
        .register("alice", "Alice@X.com", "password123")
        .await
        .unwrap();

    assert!(engine.authenticate("alice@x.com", "password123").await.is_ok());
}

#[tokio::test]
async fn list_users_excludes_the_requester() {
    let engine = engine_with_db().await;

    let alice = engine
        .register("alice", "alice@x.com", "password123")
        .await
        .unwrap();
    engine
        .register("bob", "bob@x.com", "password123")
        .await
        .unwrap();
    engine
        .register("carol", "carol@x.com", "password123")
        .await
        .unwrap();

    let others: Vec<String> = engine
        .list_users(alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(others, vec!["bob".to_string(), "carol".to_string()]);
}
