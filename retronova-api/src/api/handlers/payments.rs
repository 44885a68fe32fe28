use crate::api::{extract::{Path, ValidatedJson}, responses::MessageResponse, ApiState};
use crate::core::ApiResult;
use crate::domain::models::{Payment, PaymentCreate, PaymentUpdate};
use crate::services::payments;
use axum::{
    extract::State,
    response::Json,
};
use uuid::Uuid;

pub async fn create_payment(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<PaymentCreate>,
) -> ApiResult<Json<Payment>> {
    payments::create_payment(state.storage(), body).await.map(Json)
}

pub async fn list_payments(State(state): State<ApiState>) -> ApiResult<Json<Vec<Payment>>> {
    payments::list_payments(state.storage()).await.map(Json)
}

pub async fn get_payment(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Payment>> {
    payments::get_payment(state.storage(), id).await.map(Json)
}

pub async fn update_payment(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<PaymentUpdate>,
) -> ApiResult<Json<Payment>> {
    payments::update_payment(state.storage(), id, body).await.map(Json)
}

pub async fn delete_payment(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    payments::delete_payment(state.storage(), id).await?;
    Ok(Json(MessageResponse::deleted("Payment")))
}
