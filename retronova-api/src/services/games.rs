//! Game catalogue with soft delete

use super::{ensure_written, restore, visible};
use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::{Game, GameCreate, GameUpdate};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

async fn ensure_name_free(storage: &dyn Storage, name: &str, id: Option<Uuid>) -> ApiResult<()> {
    let taken = storage.get_game_by_name(name).await?;
    if taken.is_some_and(|game| Some(game.id) != id) {
        return Err(ApiError::BadRequest(
            "Game with this name already exists".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_game(storage: &dyn Storage, data: GameCreate) -> ApiResult<Game> {
    ensure_name_free(storage, &data.name, None).await?;

    let game = Game::new(data, Utc::now());
    storage.insert_game(&game).await?;

    info!("Created game {} ({})", game.id, game.name);
    Ok(game)
}

pub async fn list_games(storage: &dyn Storage, include_deleted: bool) -> ApiResult<Vec<Game>> {
    Ok(storage.list_games(include_deleted).await?)
}

pub async fn get_game(storage: &dyn Storage, id: Uuid, include_deleted: bool) -> ApiResult<Game> {
    visible(storage.get_game(id).await?, include_deleted, "Game")
}

pub async fn update_game(storage: &dyn Storage, id: Uuid, update: GameUpdate) -> ApiResult<Game> {
    let mut game = get_game(storage, id, false).await?;

    if let Some(name) = update.name.as_deref().filter(|name| *name != game.name) {
        ensure_name_free(storage, name, Some(id)).await?;
    }

    game.apply(update, Utc::now());
    if !game.has_valid_player_bounds() {
        return Err(ApiError::Validation(
            "nb_min_player must be at least 1 and not exceed nb_max_player".to_string(),
        ));
    }

    ensure_written(storage.update_game(&game).await?, "Game")?;
    Ok(game)
}

/// Soft delete by default; `hard_delete` removes the row
pub async fn delete_game(storage: &dyn Storage, id: Uuid, hard_delete: bool) -> ApiResult<()> {
    let mut game = get_game(storage, id, false).await?;

    if hard_delete {
        ensure_written(storage.delete_game(id).await?, "Game")?;
    } else {
        game.meta.soft_delete(Utc::now());
        ensure_written(storage.update_game(&game).await?, "Game")?;
    }

    info!("Deleted game {} (hard: {})", id, hard_delete);
    Ok(())
}

pub async fn restore_game(storage: &dyn Storage, id: Uuid) -> ApiResult<Game> {
    let game = restore(storage.get_game(id).await?, "Game", Utc::now())?;
    ensure_written(storage.update_game(&game).await?, "Game")?;

    info!("Restored game {}", id);
    Ok(game)
}
