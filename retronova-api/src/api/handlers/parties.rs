use super::{DeleteQuery, IncludeDeletedQuery};
use crate::api::{extract::{Path, Query, ValidatedJson}, responses::MessageResponse, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{Party, PartyCreate, PartyUpdate};
use crate::services::parties;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_party(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<PartyCreate>,
) -> ApiResult<Json<Party>> {
    parties::create_party(state.storage(), body).await.map(Json)
}

pub async fn list_parties(
    State(state): State<ApiState>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Vec<Party>>> {
    parties::list_parties(state.storage(), query.include_deleted)
        .await
        .map(Json)
}

pub async fn get_party(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Party>> {
    parties::get_party(state.storage(), id, query.include_deleted)
        .await
        .map(Json)
}

pub async fn update_party(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<PartyUpdate>,
) -> ApiResult<Json<Party>> {
    parties::update_party(state.storage(), id, body).await.map(Json)
}

pub async fn delete_party(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<MessageResponse>> {
    parties::delete_party(state.storage(), id, query.hard_delete).await?;
    Ok(Json(MessageResponse::deleted("Party")))
}

pub async fn restore_party(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Party>> {
    parties::restore_party(state.storage(), id).await.map(Json)
}
