use crate::api::{
    extract::{Path, Query, ValidatedJson},
    responses::{MessageResponse, PromoCodeUsageResponse},
    ApiState,
};
use crate::core::ApiResult;
use crate::domain::models::promo_code::GENERATED_CODE_DEFAULT_LEN;
use crate::domain::models::{PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoCodeUse};
use crate::services::promo_codes;
use axum::{
    extract::State,
    response::Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct IncludeInactiveQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters of `POST /promo_codes/generate`
#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    #[serde(default = "default_nb_parties")]
    pub nb_parties: i32,
    #[serde(default = "default_length")]
    pub length: i64,
}

fn default_nb_parties() -> i32 {
    1
}

fn default_length() -> i64 {
    GENERATED_CODE_DEFAULT_LEN
}

pub async fn create_promo_code(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<PromoCodeCreate>,
) -> ApiResult<Json<PromoCode>> {
    promo_codes::create_promo_code(state.storage(), body)
        .await
        .map(Json)
}

pub async fn generate_promo_code(
    State(state): State<ApiState>,
    Query(query): Query<GenerateQuery>,
) -> ApiResult<Json<PromoCode>> {
    promo_codes::generate_promo_code(state.storage(), query.nb_parties, query.length)
        .await
        .map(Json)
}

pub async fn list_promo_codes(
    State(state): State<ApiState>,
    Query(query): Query<IncludeInactiveQuery>,
) -> ApiResult<Json<Vec<PromoCode>>> {
    promo_codes::list_promo_codes(state.storage(), query.include_inactive)
        .await
        .map(Json)
}

pub async fn get_promo_code(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<PromoCode>> {
    promo_codes::get_promo_code(state.storage(), id).await.map(Json)
}

pub async fn get_promo_code_by_code(
    State(state): State<ApiState>,
    Path(code): Path<String>,
) -> ApiResult<Json<PromoCode>> {
    promo_codes::get_promo_code_by_code(state.storage(), &code)
        .await
        .map(Json)
}

pub async fn update_promo_code(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<PromoCodeUpdate>,
) -> ApiResult<Json<PromoCode>> {
    promo_codes::update_promo_code(state.storage(), id, body)
        .await
        .map(Json)
}

pub async fn delete_promo_code(
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    promo_codes::delete_promo_code(state.storage(), id).await?;
    Ok(Json(MessageResponse::deleted("Promo code")))
}

pub async fn use_promo_code(
    State(state): State<ApiState>,
    ValidatedJson(body): ValidatedJson<PromoCodeUse>,
) -> ApiResult<Json<PromoCodeUsageResponse>> {
    let (promo_code, _user) = promo_codes::use_promo_code(state.storage(), body).await?;
    Ok(Json(PromoCodeUsageResponse::redeemed(promo_code.nb_parties)))
}
