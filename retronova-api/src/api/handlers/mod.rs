//! API request handlers, one module per resource

pub mod arcade_machines;
pub mod friends;
pub mod games;
pub mod parties;
pub mod payments;
pub mod promo_codes;
pub mod users;

use serde::Deserialize;

/// `?include_deleted=` on soft-deletable reads
#[derive(Debug, Default, Deserialize)]
pub struct IncludeDeletedQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// `?hard_delete=` on soft-deletable deletes
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub hard_delete: bool,
}
