use sea_orm::Database;

use engine::{CreateExpenseCmd, Engine, EngineError, MoneyCents};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn register(engine: &Engine, name: &str) -> i32 {
    engine
        .register(name, &format!("{name}@x.com"), "password123")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn drain_returns_oldest_first_and_marks_read() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    engine.notify(alice, "first").await.unwrap();
    engine.notify(alice, "second").await.unwrap();

    let drained = engine.drain_unread(alice).await.unwrap();
    let messages: Vec<&str> = drained.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second"]);

    // Everything was marked read in the same transaction.
    assert!(engine.drain_unread(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn drain_without_notifications_is_empty() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    assert!(engine.drain_unread(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn drain_only_touches_the_given_user() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    engine.notify(alice, "for alice").await.unwrap();
    engine.notify(bob, "for bob").await.unwrap();

    let drained = engine.drain_unread(alice).await.unwrap();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].message, "for alice");

    let drained = engine.drain_unread(bob).await.unwrap();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].message, "for bob");
}

#[tokio::test]
async fn remind_creates_one_notification_per_participant() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let carol = register(&engine, "carol").await;

    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("Trip", "EUR", MoneyCents::new(100_00), alice)
                .participants(vec![bob, carol]),
        )
        .await
        .unwrap();

    let created = engine.remind_participants(expense.id, alice).await.unwrap();
    assert_eq!(created, 2);

    let drained = engine.drain_unread(bob).await.unwrap();
    assert_eq!(drained.len(), 1);
    assert_eq!(
        drained[0].message,
        "Reminder: please settle your share for 'Trip': 50.00 EUR."
    );
}

#[tokio::test]
async fn remind_skips_the_payers_own_share() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;
    let carol = register(&engine, "carol").await;

    // The payer split the bill with themselves included.
    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("Groceries", "EUR", MoneyCents::new(90_00), alice)
                .participants(vec![alice, bob, carol]),
        )
        .await
        .unwrap();

    let created = engine.remind_participants(expense.id, alice).await.unwrap();
    assert_eq!(created, 2);
    assert!(engine.drain_unread(alice).await.unwrap().is_empty());
}

#[tokio::test]
async fn remind_requires_the_payer() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;
    let bob = register(&engine, "bob").await;

    let expense = engine
        .create_expense(
            CreateExpenseCmd::new("Trip", "EUR", MoneyCents::new(100_00), alice)
                .participants(vec![bob]),
        )
        .await
        .unwrap();

    let err = engine
        .remind_participants(expense.id, bob)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
    assert!(engine.drain_unread(bob).await.unwrap().is_empty());
}

#[tokio::test]
async fn remind_on_missing_expense_is_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice").await;

    let err = engine.remind_participants(9999, alice).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}
