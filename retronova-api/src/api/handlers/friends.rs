use super::IncludeDeletedQuery;
use crate::api::{extract::{Path, Query, ValidatedJson}, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{FriendStatusQuery, Friendship, FriendshipCreate, FriendshipUpdate};
use crate::services::friends;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_friendship(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<FriendshipCreate>,
) -> ApiResult<Json<Friendship>> {
    friends::create_friendship(state.storage(), body).await.map(Json)
}

pub async fn list_friendships(State(state): State<ApiState>) -> ApiResult<Json<Vec<Friendship>>> {
    friends::list_friendships(state.storage()).await.map(Json)
}

pub async fn get_friendship(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Friendship>> {
    friends::get_friendship(state.storage(), id).await.map(Json)
}

pub async fn update_friendship(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<FriendshipUpdate>,
) -> ApiResult<Json<Friendship>> {
    friends::update_friendship(state.storage(), id, body).await.map(Json)
}

pub async fn delete_friendship(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Friendship>> {
    friends::delete_friendship(state.storage(), id).await.map(Json)
}

pub async fn friendships_by_status(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<FriendStatusQuery>,
) -> ApiResult<Json<Vec<Friendship>>> {
    friends::friendships_by_status(state.storage(), user_id, &query)
        .await
        .map(Json)
}

pub async fn pending_requests(
    State(state): State<ApiState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Vec<Friendship>>> {
    friends::pending_requests(state.storage(), user_id, query.include_deleted)
        .await
        .map(Json)
}
