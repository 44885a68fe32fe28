//! Business logic services
//!
//! Each module exposes free async functions over a [`Storage`] handle.
//! Services own the lookups, conflict checks and error messages; handlers
//! only translate HTTP into calls here.
//!
//! [`Storage`]: crate::core::Storage

pub mod arcade_machines;
pub mod friends;
pub mod games;
pub mod parties;
pub mod payments;
pub mod promo_codes;
pub mod users;

use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::{ArcadeMachine, Audited, Game, User};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unwrap a lookup, hiding soft-deleted records unless asked for
pub(crate) fn visible<T: Audited>(record: Option<T>, include_deleted: bool, what: &str) -> ApiResult<T> {
    record
        .filter(|record| record.meta().is_visible(include_deleted))
        .ok_or_else(|| ApiError::not_found(what))
}

/// Clear the soft-delete flags of a record that has them set
pub(crate) fn restore<T: Audited>(record: Option<T>, what: &str, now: DateTime<Utc>) -> ApiResult<T> {
    let mut record = record.ok_or_else(|| ApiError::not_found(what))?;
    if !record.meta().is_deleted {
        return Err(ApiError::BadRequest(format!("{what} is not deleted")));
    }
    record.meta_mut().restore(now);
    Ok(record)
}

/// Map the `bool` returned by a storage write to 404 when the row vanished
pub(crate) fn ensure_written(written: bool, what: &str) -> ApiResult<()> {
    if written {
        Ok(())
    } else {
        Err(ApiError::not_found(what))
    }
}

pub(crate) async fn require_user(storage: &dyn Storage, id: Uuid) -> ApiResult<User> {
    storage
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

pub(crate) async fn require_game(storage: &dyn Storage, id: Uuid) -> ApiResult<Game> {
    visible(storage.get_game(id).await?, false, "Game")
}

pub(crate) async fn require_arcade_machine(storage: &dyn Storage, id: Uuid) -> ApiResult<ArcadeMachine> {
    visible(storage.get_arcade_machine(id).await?, false, "Arcade machine")
}
