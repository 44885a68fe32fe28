//! Service layer tests against the in-memory store

use anyhow::Result;
use retronova_api::core::ApiError;
use retronova_api::domain::models::{
    ArcadeMachineCreate, GameCreate, GameUpdate, PartyCreate, PromoCodeCreate, PromoCodeUse, UserCreate,
};
use retronova_api::services::{arcade_machines, games, parties, promo_codes, users};
use retronova_api::{InMemoryStorage, Storage};
use std::sync::Arc;

fn user_body(firebase_id: &str) -> UserCreate {
    UserCreate {
        firebase_id: firebase_id.to_string(),
        first_name: None,
        last_name: None,
        nb_ticket: 0,
        bar: false,
    }
}

fn game_body(name: &str) -> GameCreate {
    GameCreate {
        name: name.to_string(),
        description: None,
        nb_min_player: 1,
        nb_max_player: 2,
    }
}

#[tokio::test]
async fn test_publique_ids_are_unique() -> Result<()> {
    let storage = InMemoryStorage::new();

    let mut seen = std::collections::HashSet::new();
    for i in 0..50 {
        let user = users::create_user(&storage, user_body(&format!("fb-{i}"))).await?;
        assert!(seen.insert(user.publique_id));
    }
    Ok(())
}

#[tokio::test]
async fn test_update_user_rejects_taken_firebase_id() -> Result<()> {
    let storage = InMemoryStorage::new();
    users::create_user(&storage, user_body("first")).await?;
    let second = users::create_user(&storage, user_body("second")).await?;

    let err = users::update_user(&storage, second.id, user_body("first"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn test_soft_deleted_game_cannot_host_machines() -> Result<()> {
    let storage = InMemoryStorage::new();
    let game = games::create_game(&storage, game_body("Galaga")).await?;
    games::delete_game(&storage, game.id, false).await?;

    let err = arcade_machines::create_arcade_machine(
        &storage,
        ArcadeMachineCreate {
            name: None,
            description: None,
            localisation: None,
            game1_id: game.id,
            game2_id: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Game not found");
    Ok(())
}

#[tokio::test]
async fn test_hard_delete_of_referenced_game_is_refused() -> Result<()> {
    let storage = InMemoryStorage::new();
    let game = games::create_game(&storage, game_body("Galaga")).await?;
    arcade_machines::create_arcade_machine(
        &storage,
        ArcadeMachineCreate {
            name: Some("Cab".to_string()),
            description: None,
            localisation: None,
            game1_id: game.id,
            game2_id: None,
        },
    )
    .await?;

    let err = games::delete_game(&storage, game.id, true).await.unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    assert!(storage.get_game(game.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_update_game_keeps_bounds() -> Result<()> {
    let storage = InMemoryStorage::new();
    let game = games::create_game(&storage, game_body("Pong")).await?;

    let err = games::update_game(
        &storage,
        game.id,
        GameUpdate {
            nb_min_player: Some(3),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let stored = storage.get_game(game.id).await?.unwrap();
    assert_eq!(stored.nb_min_player, 1);
    Ok(())
}

#[tokio::test]
async fn test_party_requires_players() -> Result<()> {
    let storage = InMemoryStorage::new();
    let player = users::create_user(&storage, user_body("solo")).await?;
    let game = games::create_game(&storage, game_body("Pong")).await?;
    let machine = arcade_machines::create_arcade_machine(
        &storage,
        ArcadeMachineCreate {
            name: None,
            description: None,
            localisation: None,
            game1_id: game.id,
            game2_id: None,
        },
    )
    .await?;

    let err = parties::create_party(
        &storage,
        PartyCreate {
            player1_id: player.id,
            player2_id: uuid::Uuid::new_v4(),
            game_id: game.id,
            machine_id: machine.id,
            total_score: None,
            p1_score: None,
            p2_score: None,
            password: None,
            done: false,
            cancel: false,
            bar: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "User not found");
    Ok(())
}

#[tokio::test]
async fn test_concurrent_redemptions_respect_max_uses() -> Result<()> {
    let storage = Arc::new(InMemoryStorage::new());
    let user = users::create_user(storage.as_ref(), user_body("crowd")).await?;
    promo_codes::create_promo_code(
        storage.as_ref(),
        PromoCodeCreate {
            code: "LIMITED".to_string(),
            nb_parties: 1,
            is_active: true,
            expires_at: None,
            max_uses: Some(3),
        },
    )
    .await?;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let storage = storage.clone();
        let user_id = user.id;
        handles.push(tokio::spawn(async move {
            promo_codes::use_promo_code(
                storage.as_ref(),
                PromoCodeUse {
                    code: "LIMITED".to_string(),
                    user_id,
                },
            )
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
    let promo = promo_codes::get_promo_code_by_code(storage.as_ref(), "limited").await?;
    assert_eq!(promo.used_count, 3);
    assert_eq!(users::get_user(storage.as_ref(), user.id).await?.nb_ticket, 3);
    Ok(())
}
