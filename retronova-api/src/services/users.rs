//! Player accounts

use super::{ensure_written, require_user};
use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::user::generate_publique_id;
use crate::domain::models::{User, UserCreate};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

/// Attempts at drawing a public id nobody holds yet
const PUBLIQUE_ID_ATTEMPTS: usize = 16;

pub async fn create_user(storage: &dyn Storage, data: UserCreate) -> ApiResult<User> {
    if storage.get_user_by_firebase_id(&data.firebase_id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "User with this Firebase ID already exists".to_string(),
        ));
    }

    let publique_id = allocate_publique_id(storage).await?;
    let user = User::new(data, publique_id, Utc::now());
    storage.insert_user(&user).await?;

    info!("Created user {} ({})", user.id, user.publique_id);
    Ok(user)
}

async fn allocate_publique_id(storage: &dyn Storage) -> ApiResult<String> {
    for attempt in 1..=PUBLIQUE_ID_ATTEMPTS {
        let candidate = generate_publique_id(&mut rand::thread_rng());
        if !storage.publique_id_exists(&candidate).await? {
            return Ok(candidate);
        }
        warn!("Public id collision on attempt {}", attempt);
    }
    Err(ApiError::Conflict(
        "Could not allocate a unique public id".to_string(),
    ))
}

pub async fn list_users(storage: &dyn Storage) -> ApiResult<Vec<User>> {
    Ok(storage.list_users().await?)
}

pub async fn get_user(storage: &dyn Storage, id: Uuid) -> ApiResult<User> {
    require_user(storage, id).await
}

/// Replace every editable field of a user
pub async fn update_user(storage: &dyn Storage, id: Uuid, data: UserCreate) -> ApiResult<User> {
    let mut user = require_user(storage, id).await?;

    if data.firebase_id != user.firebase_id {
        let taken = storage.get_user_by_firebase_id(&data.firebase_id).await?;
        if taken.is_some_and(|other| other.id != id) {
            return Err(ApiError::BadRequest(
                "User with this Firebase ID already exists".to_string(),
            ));
        }
    }

    user.replace(data, Utc::now());
    ensure_written(storage.update_user(&user).await?, "User")?;
    Ok(user)
}

/// Remove the user and everything that references it; returns the removed row
pub async fn delete_user(storage: &dyn Storage, id: Uuid) -> ApiResult<User> {
    let user = require_user(storage, id).await?;
    ensure_written(storage.delete_user(id).await?, "User")?;

    info!("Deleted user {}", id);
    Ok(user)
}
