//! Ticket purchases

use super::{ensure_written, require_user};
use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::{Payment, PaymentCreate, PaymentUpdate};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

async fn ensure_token_free(storage: &dyn Storage, token: &str) -> ApiResult<()> {
    if storage.get_payment_by_token(token).await?.is_some() {
        return Err(ApiError::BadRequest(
            "Payment with this session token already exists".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_payment(storage: &dyn Storage, data: PaymentCreate) -> ApiResult<Payment> {
    require_user(storage, data.user_id).await?;
    ensure_token_free(storage, &data.session_stripe_token).await?;

    let payment = Payment::new(data, Utc::now());
    storage.insert_payment(&payment).await?;

    info!("Recorded payment {} for user {}", payment.id, payment.user_id);
    Ok(payment)
}

pub async fn list_payments(storage: &dyn Storage) -> ApiResult<Vec<Payment>> {
    Ok(storage.list_payments().await?)
}

pub async fn get_payment(storage: &dyn Storage, id: Uuid) -> ApiResult<Payment> {
    storage
        .get_payment(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Payment"))
}

pub async fn update_payment(storage: &dyn Storage, id: Uuid, update: PaymentUpdate) -> ApiResult<Payment> {
    let mut payment = get_payment(storage, id).await?;

    if let Some(user_id) = update.user_id.filter(|user_id| *user_id != payment.user_id) {
        require_user(storage, user_id).await?;
    }
    if let Some(token) = update
        .session_stripe_token
        .as_deref()
        .filter(|token| *token != payment.session_stripe_token)
    {
        ensure_token_free(storage, token).await?;
    }

    payment.apply(update, Utc::now());
    ensure_written(storage.update_payment(&payment).await?, "Payment")?;
    Ok(payment)
}

pub async fn delete_payment(storage: &dyn Storage, id: Uuid) -> ApiResult<()> {
    ensure_written(storage.delete_payment(id).await?, "Payment")?;
    info!("Deleted payment {}", id);
    Ok(())
}
