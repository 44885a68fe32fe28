//! Domain models shared by the API, services and storage adapters
//!
//! Every table carries the same audit columns ([`RecordMeta`]). Request
//! payloads live next to the entity they create or update.

pub mod arcade_machine;
pub mod friend;
pub mod game;
pub mod party;
pub mod payment;
pub mod promo_code;
pub mod user;

pub use arcade_machine::{ArcadeMachine, ArcadeMachineCreate, ArcadeMachineUpdate};
pub use friend::{FriendStatusQuery, Friendship, FriendshipCreate, FriendshipUpdate};
pub use game::{Game, GameCreate, GameUpdate};
pub use party::{Party, PartyCreate, PartyUpdate};
pub use payment::{Payment, PaymentCreate, PaymentUpdate};
pub use promo_code::{PromoCode, PromoCodeCreate, PromoCodeUpdate, PromoCodeUse, RedeemRejection, Redemption};
pub use user::{User, UserCreate};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Audit and soft-delete columns present on every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
}

impl RecordMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
            is_deleted: false,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    pub fn soft_delete(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.updated_at = now;
    }

    pub fn restore(&mut self, now: DateTime<Utc>) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.updated_at = now;
    }

    /// Whether the record should appear in a read that may or may not include deleted rows
    pub fn is_visible(&self, include_deleted: bool) -> bool {
        include_deleted || !self.is_deleted
    }
}

/// Records that carry [`RecordMeta`]
pub trait Audited {
    fn meta(&self) -> &RecordMeta;
    fn meta_mut(&mut self) -> &mut RecordMeta;
}

macro_rules! impl_audited {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Audited for $ty {
                fn meta(&self) -> &RecordMeta {
                    &self.meta
                }

                fn meta_mut(&mut self) -> &mut RecordMeta {
                    &mut self.meta
                }
            }
        )*
    };
}

impl_audited!(User, Friendship, Game, ArcadeMachine, Party, Payment, PromoCode);

/// Deserializes a present field as `Some(value)`, keeping `null` as `Some(None)`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None` and partial
/// updates can tell "leave unchanged" from "clear".
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        score: Option<Option<i32>>,
    }

    #[test]
    fn test_double_option_distinguishes_null_from_absent() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"score": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"score": 7}"#).unwrap();

        assert_eq!(absent.score, None);
        assert_eq!(null.score, Some(None));
        assert_eq!(set.score, Some(Some(7)));
    }

    #[test]
    fn test_soft_delete_and_restore() {
        let now = Utc::now();
        let mut meta = RecordMeta::new(now);
        assert!(meta.is_visible(false));

        meta.soft_delete(now);
        assert!(meta.is_deleted);
        assert_eq!(meta.deleted_at, Some(now));
        assert!(!meta.is_visible(false));
        assert!(meta.is_visible(true));

        meta.restore(now);
        assert!(!meta.is_deleted);
        assert!(meta.deleted_at.is_none());
    }
}
