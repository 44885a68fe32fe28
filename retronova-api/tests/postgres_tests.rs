//! PostgreSQL adapter integration tests
//!
//! These tests need a reachable database at `DATABASE_URL`.
//! They are skipped when it is unset or the server does not answer.

use anyhow::Result;
use axum::http::StatusCode;
use chrono::Utc;
use retronova_api::config::DatabaseConfig;
use retronova_api::core::ApiError;
use retronova_api::domain::models::promo_code::generate_code;
use retronova_api::domain::models::user::generate_publique_id;
use retronova_api::domain::models::{
    ArcadeMachine, ArcadeMachineCreate, Game, GameCreate, PromoCode, PromoCodeCreate,
    PromoCodeUse, RedeemRejection, Redemption, User, UserCreate,
};
use retronova_api::services::{promo_codes, users};
use retronova_api::{PostgresStorage, Storage, StorageError};
use std::env;
use std::sync::Arc;
use uuid::Uuid;

/// Connect and migrate, or `None` when no database is available
async fn create_test_storage() -> Result<Option<PostgresStorage>> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping test");
        return Ok(None);
    };

    let config = DatabaseConfig {
        url,
        max_connections: 10,
        acquire_timeout_secs: 2,
        ..DatabaseConfig::default()
    };

    let storage = match PostgresStorage::connect(&config).await {
        Ok(storage) => storage,
        Err(err) => {
            eprintln!("PostgreSQL not available ({err}), skipping test");
            return Ok(None);
        }
    };
    storage.migrate().await?;
    Ok(Some(storage))
}

/// Per-run suffix so repeated runs against the same database do not collide
fn unique(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..12])
}

fn user_body(firebase_id: String, nb_ticket: i32) -> UserCreate {
    UserCreate {
        firebase_id,
        first_name: None,
        last_name: None,
        nb_ticket,
        bar: false,
    }
}

fn random_code() -> String {
    generate_code(&mut rand::thread_rng(), 12)
}

#[tokio::test]
async fn test_migrations_are_idempotent() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };

    storage.migrate().await?;
    storage.ping().await?;
    Ok(())
}

#[tokio::test]
async fn test_duplicate_firebase_id_maps_to_conflict() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };

    let firebase_id = unique("fb");
    let first = users::create_user(&storage, user_body(firebase_id.clone(), 0)).await?;

    let clone = User::new(
        user_body(firebase_id, 0),
        generate_publique_id(&mut rand::thread_rng()),
        Utc::now(),
    );
    let err = storage.insert_user(&clone).await.unwrap_err();
    assert!(matches!(err, StorageError::UniqueViolation(_)));
    assert_eq!(ApiError::from(err).status_code(), StatusCode::CONFLICT);

    assert!(storage.delete_user(first.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_referenced_game_delete_maps_to_bad_request() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };

    let game = Game::new(
        GameCreate {
            name: unique("game"),
            description: None,
            nb_min_player: 1,
            nb_max_player: 2,
        },
        Utc::now(),
    );
    storage.insert_game(&game).await?;

    let machine = ArcadeMachine::new(
        ArcadeMachineCreate {
            name: Some("Cabinet".to_string()),
            description: None,
            localisation: None,
            game1_id: game.id,
            game2_id: None,
        },
        Utc::now(),
    );
    storage.insert_arcade_machine(&machine).await?;

    let err = storage.delete_game(game.id).await.unwrap_err();
    assert!(matches!(err, StorageError::ForeignKeyViolation(_)));
    assert_eq!(ApiError::from(err).status_code(), StatusCode::BAD_REQUEST);

    assert!(storage.delete_arcade_machine(machine.id).await?);
    assert!(storage.delete_game(game.id).await?);
    Ok(())
}

#[tokio::test]
async fn test_schema_rejects_zero_ticket_promo_code() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };

    let mut promo = PromoCode::new(
        PromoCodeCreate {
            code: random_code(),
            nb_parties: 1,
            is_active: true,
            expires_at: None,
            max_uses: None,
        },
        Utc::now(),
    );
    promo.nb_parties = 0;

    let err = storage.insert_promo_code(&promo).await.unwrap_err();
    assert!(matches!(err, StorageError::CheckViolation(ref name) if name == "promo_codes_nb_parties"));
    assert_eq!(ApiError::from(err).status_code(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_concurrent_redemptions_respect_max_uses() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };
    let storage = Arc::new(storage);

    let user = users::create_user(storage.as_ref(), user_body(unique("crowd"), 0)).await?;
    let promo = promo_codes::create_promo_code(
        storage.as_ref(),
        PromoCodeCreate {
            code: random_code(),
            nb_parties: 2,
            is_active: true,
            expires_at: None,
            max_uses: Some(3),
        },
    )
    .await?;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let storage = storage.clone();
        let request = PromoCodeUse {
            code: promo.code.clone(),
            user_id: user.id,
        };
        handles.push(tokio::spawn(async move {
            promo_codes::use_promo_code(storage.as_ref(), request)
                .await
                .is_ok()
        }));
    }

    let mut redeemed = 0;
    for handle in handles {
        if handle.await? {
            redeemed += 1;
        }
    }

    assert_eq!(redeemed, 3);
    let promo = storage.get_promo_code(promo.id).await?.unwrap();
    assert_eq!(promo.used_count, 3);
    let user = storage.get_user(user.id).await?.unwrap();
    assert_eq!(user.nb_ticket, 6);

    storage.delete_promo_code(promo.id).await?;
    storage.delete_user(user.id).await?;
    Ok(())
}

#[tokio::test]
async fn test_redeem_refuses_ticket_overflow() -> Result<()> {
    let Some(storage) = create_test_storage().await? else {
        return Ok(());
    };

    let user = users::create_user(&storage, user_body(unique("rich"), i32::MAX)).await?;
    let promo = promo_codes::create_promo_code(
        &storage,
        PromoCodeCreate {
            code: random_code(),
            nb_parties: 5,
            is_active: true,
            expires_at: None,
            max_uses: None,
        },
    )
    .await?;

    let outcome = storage
        .redeem_promo_code(&promo.code, user.id, Utc::now())
        .await?;
    assert!(matches!(
        outcome,
        Redemption::Rejected(RedeemRejection::TicketOverflow)
    ));
    assert_eq!(storage.get_user(user.id).await?.unwrap().nb_ticket, i32::MAX);
    assert_eq!(storage.get_promo_code(promo.id).await?.unwrap().used_count, 0);

    storage.delete_promo_code(promo.id).await?;
    storage.delete_user(user.id).await?;
    Ok(())
}
