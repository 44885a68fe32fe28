use crate::api::{extract::{Path, ValidatedJson}, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{User, UserCreate};
use crate::services::users;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_user(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> ApiResult<Json<User>> {
    users::create_user(state.storage(), body).await.map(Json)
}

pub async fn list_users(State(state): State<ApiState>) -> ApiResult<Json<Vec<User>>> {
    users::list_users(state.storage()).await.map(Json)
}

pub async fn get_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    users::get_user(state.storage(), id).await.map(Json)
}

pub async fn update_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> ApiResult<Json<User>> {
    users::update_user(state.storage(), id, body).await.map(Json)
}

pub async fn delete_user(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    users::delete_user(state.storage(), id).await.map(Json)
}
