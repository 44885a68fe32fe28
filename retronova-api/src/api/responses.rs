//! API response types

use serde::{Deserialize, Serialize};

/// Confirmation body returned by delete endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted(what: &str) -> Self {
        Self {
            message: format!("{what} deleted successfully"),
        }
    }
}

/// Response for `POST /promo_codes/use`
#[derive(Debug, Serialize, Deserialize)]
pub struct PromoCodeUsageResponse {
    pub success: bool,
    pub message: String,
    pub nb_parties: i32,
}

impl PromoCodeUsageResponse {
    pub fn redeemed(nb_parties: i32) -> Self {
        Self {
            success: true,
            message: format!(
                "Promo code redeemed successfully! {nb_parties} tickets added to your account."
            ),
            nb_parties,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: i64,
    pub database: String,
}
