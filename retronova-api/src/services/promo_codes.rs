//! Promo codes and their redemption

use super::ensure_written;
use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::promo_code::{
    generate_code, normalize_code, CODE_MAX_LEN, GENERATED_CODE_MIN_LEN,
};
use crate::domain::models::{
    PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoCodeUse, Redemption, User,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

const GENERATE_ATTEMPTS: usize = 16;

async fn ensure_code_free(storage: &dyn Storage, code: &str) -> ApiResult<()> {
    if storage.get_promo_code_by_code(code).await?.is_some() {
        return Err(ApiError::BadRequest(
            "A promo code with this code already exists".to_string(),
        ));
    }
    Ok(())
}

pub async fn create_promo_code(storage: &dyn Storage, data: PromoCodeCreate) -> ApiResult<PromoCode> {
    let promo_code = PromoCode::new(data, Utc::now());
    ensure_code_free(storage, &promo_code.code).await?;
    storage.insert_promo_code(&promo_code).await?;

    info!("Created promo code {}", promo_code.code);
    Ok(promo_code)
}

/// Create an active code with a random `[A-Z0-9]` value of `length` characters
pub async fn generate_promo_code(
    storage: &dyn Storage,
    nb_parties: i32,
    length: i64,
) -> ApiResult<PromoCode> {
    if nb_parties < 1 {
        return Err(ApiError::Validation("nb_parties must be at least 1".to_string()));
    }
    let length = usize::try_from(length)
        .ok()
        .filter(|length| (GENERATED_CODE_MIN_LEN..=CODE_MAX_LEN).contains(length))
        .ok_or_else(|| {
            ApiError::Validation(format!(
                "length must be between {} and {}",
                GENERATED_CODE_MIN_LEN, CODE_MAX_LEN
            ))
        })?;

    for attempt in 1..=GENERATE_ATTEMPTS {
        let code = generate_code(&mut rand::thread_rng(), length);
        if storage.get_promo_code_by_code(&code).await?.is_some() {
            warn!("Generated promo code collision on attempt {}", attempt);
            continue;
        }

        let data = PromoCodeCreate {
            code,
            nb_parties,
            is_active: true,
            expires_at: None,
            max_uses: None,
        };
        return create_promo_code(storage, data).await;
    }

    Err(ApiError::Conflict(
        "Could not generate a unique promo code".to_string(),
    ))
}

pub async fn list_promo_codes(storage: &dyn Storage, include_inactive: bool) -> ApiResult<Vec<PromoCode>> {
    Ok(storage.list_promo_codes(include_inactive).await?)
}

pub async fn get_promo_code(storage: &dyn Storage, id: Uuid) -> ApiResult<PromoCode> {
    storage
        .get_promo_code(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Promo code"))
}

/// Lookup ignoring case and surrounding whitespace
pub async fn get_promo_code_by_code(storage: &dyn Storage, code: &str) -> ApiResult<PromoCode> {
    storage
        .get_promo_code_by_code(&normalize_code(code))
        .await?
        .ok_or_else(|| ApiError::not_found("Promo code"))
}

pub async fn update_promo_code(
    storage: &dyn Storage,
    id: Uuid,
    update: PromoCodeUpdate,
) -> ApiResult<PromoCode> {
    let mut promo_code = get_promo_code(storage, id).await?;

    if let Some(code) = update.code.as_deref().map(normalize_code) {
        if code != promo_code.code {
            ensure_code_free(storage, &code).await?;
        }
    }

    promo_code.apply(update, Utc::now());
    ensure_written(storage.update_promo_code(&promo_code).await?, "Promo code")?;
    Ok(promo_code)
}

pub async fn delete_promo_code(storage: &dyn Storage, id: Uuid) -> ApiResult<()> {
    ensure_written(storage.delete_promo_code(id).await?, "Promo code")?;
    info!("Deleted promo code {}", id);
    Ok(())
}

/// Redeem a code for a user, crediting `nb_parties` tickets
pub async fn use_promo_code(storage: &dyn Storage, request: PromoCodeUse) -> ApiResult<(PromoCode, User)> {
    let code = normalize_code(&request.code);

    match storage
        .redeem_promo_code(&code, request.user_id, Utc::now())
        .await?
    {
        Redemption::Redeemed { promo_code, user } => {
            info!(
                "User {} redeemed {} for {} tickets",
                user.id, promo_code.code, promo_code.nb_parties
            );
            Ok((promo_code, user))
        }
        Redemption::CodeNotFound => Err(ApiError::NotFound("Invalid promo code".to_string())),
        Redemption::UserNotFound => Err(ApiError::not_found("User")),
        Redemption::Rejected(rejection) => Err(ApiError::BadRequest(rejection.to_string())),
    }
}
