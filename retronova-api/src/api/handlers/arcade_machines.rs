use super::{DeleteQuery, IncludeDeletedQuery};
use crate::api::{extract::{Path, Query, ValidatedJson}, responses::MessageResponse, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{ArcadeMachine, ArcadeMachineCreate, ArcadeMachineUpdate};
use crate::services::arcade_machines;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_arcade_machine(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<ArcadeMachineCreate>,
) -> ApiResult<Json<ArcadeMachine>> {
    arcade_machines::create_arcade_machine(state.storage(), body)
        .await
        .map(Json)
}

pub async fn list_arcade_machines(
    State(state): State<ApiState>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<Vec<ArcadeMachine>>> {
    arcade_machines::list_arcade_machines(state.storage(), query.include_deleted)
        .await
        .map(Json)
}

pub async fn get_arcade_machine(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeDeletedQuery>,
) -> ApiResult<Json<ArcadeMachine>> {
    arcade_machines::get_arcade_machine(state.storage(), id, query.include_deleted)
        .await
        .map(Json)
}

pub async fn update_arcade_machine(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<ArcadeMachineUpdate>,
) -> ApiResult<Json<ArcadeMachine>> {
    arcade_machines::update_arcade_machine(state.storage(), id, body)
        .await
        .map(Json)
}

pub async fn delete_arcade_machine(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteQuery>,
) -> ApiResult<Json<MessageResponse>> {
    arcade_machines::delete_arcade_machine(state.storage(), id, query.hard_delete).await?;
    Ok(Json(MessageResponse::deleted("Arcade machine")))
}

pub async fn restore_arcade_machine(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ArcadeMachine>> {
    arcade_machines::restore_arcade_machine(state.storage(), id)
        .await
        .map(Json)
}
