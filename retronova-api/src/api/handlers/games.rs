use super::{DeleteQuery, IncludeDeletedQuery};
use crate::api::{extract::{Path, Query, ValidatedJson}, responses::MessageResponse, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{Game, GameCreate, GameUpdate};
use crate::services::games;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_game(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<GameCreate>,
) -> ApiResult<Json<Game>> {
    games::create_game(state.storage(), body).await.map(Json)
}

pub async fn list_games(
    State(state): State<ApiState>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Vec<Game>>> {
    games::list_games(state.storage(), query.include_deleted)
        .await
        .map(Json)
}

pub async fn get_game(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Game>> {
    games::get_game(state.storage(), id, query.include_deleted)
        .await
        .map(Json)
}

pub async fn update_game(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<GameUpdate>,
) -> ApiResult<Json<Game>> {
    games::update_game(state.storage(), id, body).await.map(Json)
}

pub async fn delete_game(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<MessageResponse>> {
    games::delete_game(state.storage(), id, query.hard_delete).await?;
    Ok(Json(MessageResponse::deleted("Game")))
}

pub async fn restore_game(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Game>> {
    games::restore_game(state.storage(), id).await.map(Json)
}
