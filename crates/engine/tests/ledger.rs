use std::sync::Arc;

use sea_orm::{ConnectOptions, Database};
use serde_json::json;

use engine::{Engine, EngineError, RecordFilter};
use migration::MigratorTrait;

async fn memory_engine() -> Engine {
    Engine::builder().memory().build()
}

async fn sqlite_engine() -> Engine {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build()
}

/// Runs each scenario once per storage backend.
macro_rules! on_every_backend {
    ($($name:ident),* $(,)?) => {
        mod memory {
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $name() {
                    super::$name(super::memory_engine().await).await;
                }
            )*
        }

        mod sqlite {
            $(
                #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
                async fn $name() {
                    super::$name(super::sqlite_engine().await).await;
                }
            )*
        }
    };
}

on_every_backend!(
    user_round_trip,
    deleted_user_is_gone,
    ids_are_monotonic,
    category_lifecycle,
    record_with_unknown_ids_is_rejected,
    overdraft_is_rejected_atomically,
    debit_and_deposit_scenario,
    deposit_must_be_positive,
    deposit_on_missing_account,
    deposit_cannot_overflow_balance,
    concurrent_deposits_all_land,
    concurrent_debits_never_overdraw,
    record_filters_are_conjunctive,
    record_lifecycle,
    dangling_records_survive_user_deletion,
    healthcheck_succeeds,
);

async fn seed(engine: &Engine, balance: f64) -> (i32, i32) {
    let user = engine.create_user(&json!({ "name": "Alice" })).await.unwrap();
    let category = engine
        .create_category(&json!({ "name": "Food" }))
        .await
        .unwrap();
    if balance > 0.0 {
        engine
            .deposit(user.id, &json!({ "amount": balance }))
            .await
            .unwrap();
    }
    (user.id, category.id)
}

async fn user_round_trip(engine: Engine) {
    let created = engine.create_user(&json!({ "name": "Alice" })).await.unwrap();
    let fetched = engine.user(created.id).await.unwrap();
    assert_eq!(created, fetched);
    assert_eq!(fetched.name, "Alice");

    let account = engine.account(created.id).await.unwrap();
    assert_eq!(account.balance, 0.0);

    let users = engine.users().await.unwrap();
    assert_eq!(users, vec![created]);
}

async fn deleted_user_is_gone(engine: Engine) {
    let user = engine.create_user(&json!({ "name": "Bob" })).await.unwrap();
    engine.delete_user(user.id).await.unwrap();

    assert_eq!(
        engine.user(user.id).await.unwrap_err(),
        EngineError::KeyNotFound("User not found".to_string())
    );
    assert_eq!(
        engine.account(user.id).await.unwrap_err(),
        EngineError::KeyNotFound("Account not found".to_string())
    );
    assert_eq!(
        engine.delete_user(user.id).await.unwrap_err(),
        EngineError::KeyNotFound("User not found".to_string())
    );
}

async fn ids_are_monotonic(engine: Engine) {
    let first = engine.create_user(&json!({ "name": "A" })).await.unwrap();
    let second = engine.create_user(&json!({ "name": "B" })).await.unwrap();
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);

    engine.delete_user(second.id).await.unwrap();
    let third = engine.create_user(&json!({ "name": "C" })).await.unwrap();
    assert_eq!(third.id, 3);
}

async fn category_lifecycle(engine: Engine) {
    let err = engine.create_category(&json!({ "name": "" })).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let food = engine
        .create_category(&json!({ "name": "Food" }))
        .await
        .unwrap();
    let rent = engine
        .create_category(&json!({ "name": "Rent" }))
        .await
        .unwrap();
    assert_eq!(engine.categories().await.unwrap(), vec![food.clone(), rent]);

    engine
        .delete_category(&json!({ "id": food.id }))
        .await
        .unwrap();
    assert_eq!(
        engine.category(food.id).await.unwrap_err(),
        EngineError::KeyNotFound("Category not found".to_string())
    );
    assert_eq!(
        engine
            .delete_category(&json!({ "id": food.id }))
            .await
            .unwrap_err(),
        EngineError::KeyNotFound("Category not found".to_string())
    );
}

async fn record_with_unknown_ids_is_rejected(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 100.0).await;

    for payload in [
        json!({ "user_id": user_id + 10, "category_id": category_id, "amount": 5 }),
        json!({ "user_id": user_id, "category_id": category_id + 10, "amount": 5 }),
    ] {
        let err = engine.create_record(&payload).await.unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidReference("Invalid User or Category ID".to_string())
        );
    }

    assert_eq!(engine.account(user_id).await.unwrap().balance, 100.0);
    assert!(
        engine
            .records(&RecordFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

async fn overdraft_is_rejected_atomically(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 30.0).await;

    let err = engine
        .create_record(&json!({ "user_id": user_id, "category_id": category_id, "amount": 30.5 }))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds("Insufficient funds".to_string())
    );

    assert_eq!(engine.account(user_id).await.unwrap().balance, 30.0);
    assert!(
        engine
            .records(&RecordFilter::default())
            .await
            .unwrap()
            .is_empty()
    );

    // Spending the exact balance is allowed and lands on zero.
    engine
        .create_record(&json!({ "user_id": user_id, "category_id": category_id, "amount": 30 }))
        .await
        .unwrap();
    assert_eq!(engine.account(user_id).await.unwrap().balance, 0.0);
}

async fn debit_and_deposit_scenario(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 0.0).await;
    assert_eq!((user_id, category_id), (1, 1));

    let payload = json!({ "user_id": 1, "category_id": 1, "amount": 10 });
    assert!(matches!(
        engine.create_record(&payload).await.unwrap_err(),
        EngineError::InsufficientFunds(_)
    ));

    let account = engine.deposit(1, &json!({ "amount": 50 })).await.unwrap();
    assert_eq!(account.balance, 50.0);

    let record = engine.create_record(&payload).await.unwrap();
    assert_eq!(record.user_id, 1);
    assert_eq!(record.category_id, 1);
    assert_eq!(record.amount, 10.0);
    assert_eq!(engine.account(1).await.unwrap().balance, 40.0);
}

async fn deposit_must_be_positive(engine: Engine) {
    let (user_id, _) = seed(&engine, 20.0).await;

    for amount in [json!(0), json!(-5), json!("nope")] {
        let err = engine
            .deposit(user_id, &json!({ "amount": amount }))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
    assert_eq!(engine.account(user_id).await.unwrap().balance, 20.0);

    let account = engine
        .deposit(user_id, &json!({ "amount": "2.5" }))
        .await
        .unwrap();
    assert_eq!(account.balance, 22.5);
}

async fn deposit_on_missing_account(engine: Engine) {
    let err = engine
        .deposit(42, &json!({ "amount": 10 }))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("Account not found".to_string())
    );
}

async fn deposit_cannot_overflow_balance(engine: Engine) {
    let (user_id, _) = seed(&engine, 0.0).await;
    let account = engine
        .deposit(user_id, &json!({ "amount": 1e308 }))
        .await
        .unwrap();
    assert_eq!(account.balance, 1e308);

    let err = engine
        .deposit(user_id, &json!({ "amount": 1e308 }))
        .await
        .unwrap_err();
    match err {
        EngineError::Validation(errors) => assert_eq!(errors.fields()[0].field, "amount"),
        other => panic!("unexpected error: {other:?}"),
    }

    let account = engine.account(user_id).await.unwrap();
    assert!(account.balance.is_finite());
    assert_eq!(account.balance, 1e308);
}

async fn concurrent_deposits_all_land(engine: Engine) {
    let (user_id, _) = seed(&engine, 0.0).await;
    let engine = Arc::new(engine);

    let tasks: Vec<_> = (1..=20)
        .map(|amount| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .deposit(user_id, &json!({ "amount": amount }))
                    .await
                    .unwrap();
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(engine.account(user_id).await.unwrap().balance, 210.0);
}

async fn concurrent_debits_never_overdraw(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 50.0).await;
    let engine = Arc::new(engine);

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .create_record(
                        &json!({ "user_id": user_id, "category_id": category_id, "amount": 10 }),
                    )
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(err) => assert!(matches!(err, EngineError::InsufficientFunds(_))),
        }
    }

    assert_eq!(accepted, 5);
    assert_eq!(engine.account(user_id).await.unwrap().balance, 0.0);
    assert_eq!(
        engine
            .records(&RecordFilter::default())
            .await
            .unwrap()
            .len(),
        5
    );
}

async fn record_filters_are_conjunctive(engine: Engine) {
    let (alice, food) = seed(&engine, 100.0).await;
    let bob = engine.create_user(&json!({ "name": "Bob" })).await.unwrap().id;
    let rent = engine
        .create_category(&json!({ "name": "Rent" }))
        .await
        .unwrap()
        .id;
    engine.deposit(bob, &json!({ "amount": 100 })).await.unwrap();

    for (user_id, category_id) in [(alice, food), (alice, rent), (bob, food), (alice, food)] {
        engine
            .create_record(&json!({ "user_id": user_id, "category_id": category_id, "amount": 1 }))
            .await
            .unwrap();
    }

    let both = engine
        .records(&RecordFilter {
            user_id: Some(alice),
            category_id: Some(food),
        })
        .await
        .unwrap();
    assert_eq!(both.len(), 2);
    assert!(
        both.iter()
            .all(|r| r.user_id == alice && r.category_id == food)
    );

    let by_category = engine
        .records(&RecordFilter {
            user_id: None,
            category_id: Some(food),
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 3);

    let all = engine.records(&RecordFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|pair| pair[0].id < pair[1].id));
}

async fn record_lifecycle(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 10.0).await;
    let created = engine
        .create_record(&json!({ "user_id": user_id, "category_id": category_id, "amount": 4 }))
        .await
        .unwrap();

    let fetched = engine.record(created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.amount, 4.0);
    assert_eq!(
        fetched.timestamp.timestamp(),
        created.timestamp.timestamp()
    );

    engine.delete_record(created.id).await.unwrap();
    assert_eq!(
        engine.record(created.id).await.unwrap_err(),
        EngineError::KeyNotFound("Record not found".to_string())
    );
    assert_eq!(
        engine.delete_record(created.id).await.unwrap_err(),
        EngineError::KeyNotFound("Record not found".to_string())
    );
}

async fn dangling_records_survive_user_deletion(engine: Engine) {
    let (user_id, category_id) = seed(&engine, 10.0).await;
    let record = engine
        .create_record(&json!({ "user_id": user_id, "category_id": category_id, "amount": 1 }))
        .await
        .unwrap();

    engine.delete_user(user_id).await.unwrap();
    engine
        .delete_category(&json!({ "id": category_id }))
        .await
        .unwrap();

    let kept = engine.record(record.id).await.unwrap();
    assert_eq!(kept.user_id, user_id);
    assert_eq!(kept.category_id, category_id);
}

async fn healthcheck_succeeds(engine: Engine) {
    engine.healthcheck().await.unwrap();
}
