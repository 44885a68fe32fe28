//! Promo codes granting free parties

use super::{RecordMeta, User};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::{Validate, ValidationError};

pub const CODE_MAX_LEN: usize = 12;
pub const GENERATED_CODE_MIN_LEN: usize = 6;
pub const GENERATED_CODE_DEFAULT_LEN: i64 = 8;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PromoCode {
    pub id: Uuid,
    pub code: String,
    /// Tickets credited per redemption
    pub nb_parties: i32,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub used_count: i32,
    /// `None` means unlimited
    pub max_uses: Option<i32>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromoCodeCreate {
    #[validate(custom = "validate_code")]
    pub code: String,
    #[serde(default = "default_nb_parties")]
    #[validate(range(min = 1))]
    pub nb_parties: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_uses: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PromoCodeUpdate {
    #[validate(custom = "validate_code")]
    pub code: Option<String>,
    #[validate(range(min = 1))]
    pub nb_parties: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    #[validate(range(min = 0))]
    pub used_count: Option<i32>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(range(min = 1))]
    pub max_uses: Option<Option<i32>>,
}

/// Body of `POST /promo_codes/use`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PromoCodeUse {
    #[validate(length(min = 1, max = 12))]
    pub code: String,
    pub user_id: Uuid,
}

fn default_nb_parties() -> i32 {
    1
}

fn default_active() -> bool {
    true
}

fn validate_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || code.len() > CODE_MAX_LEN {
        return Err(ValidationError::new("code_length"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::new("code_charset"));
    }
    Ok(())
}

/// Codes are stored and looked up upper-cased
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Random code drawn from `[A-Z0-9]`
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| char::from(CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())]))
        .collect()
}

/// Reason a code cannot be redeemed right now
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemRejection {
    #[error("This promo code is no longer active")]
    Inactive,

    #[error("This promo code has expired")]
    Expired,

    #[error("This promo code has reached its maximum number of uses")]
    Exhausted,

    #[error("Ticket balance cannot hold this many tickets")]
    TicketOverflow,
}

/// Outcome of an atomic redemption attempt
#[derive(Debug, Clone)]
pub enum Redemption {
    Redeemed { promo_code: PromoCode, user: User },
    CodeNotFound,
    UserNotFound,
    Rejected(RedeemRejection),
}

impl PromoCode {
    pub fn new(data: PromoCodeCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: normalize_code(&data.code),
            nb_parties: data.nb_parties,
            is_active: data.is_active,
            expires_at: data.expires_at,
            used_count: 0,
            max_uses: data.max_uses,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: PromoCodeUpdate, now: DateTime<Utc>) {
        if let Some(code) = update.code {
            self.code = normalize_code(&code);
        }
        if let Some(nb_parties) = update.nb_parties {
            self.nb_parties = nb_parties;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        if let Some(expires_at) = update.expires_at {
            self.expires_at = expires_at;
        }
        if let Some(used_count) = update.used_count {
            self.used_count = used_count;
        }
        if let Some(max_uses) = update.max_uses {
            self.max_uses = max_uses;
        }
        self.meta.touch(now);
    }

    /// Checks run, in order, before a code is consumed
    pub fn check_redeemable(&self, now: DateTime<Utc>) -> Result<(), RedeemRejection> {
        if !self.is_active {
            return Err(RedeemRejection::Inactive);
        }
        if self.expires_at.is_some_and(|expires_at| expires_at < now) {
            return Err(RedeemRejection::Expired);
        }
        if self.max_uses.is_some_and(|max| self.used_count >= max) {
            return Err(RedeemRejection::Exhausted);
        }
        Ok(())
    }

    /// New `(nb_ticket, used_count)` after crediting a balance of `nb_ticket`
    pub fn credit(&self, nb_ticket: i32) -> Result<(i32, i32), RedeemRejection> {
        let used_count = self
            .used_count
            .checked_add(1)
            .ok_or(RedeemRejection::Exhausted)?;
        let nb_ticket = nb_ticket
            .checked_add(self.nb_parties)
            .ok_or(RedeemRejection::TicketOverflow)?;
        Ok((nb_ticket, used_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(max_uses: Option<i32>) -> PromoCode {
        PromoCode::new(
            PromoCodeCreate {
                code: "welcome1".to_string(),
                nb_parties: 2,
                is_active: true,
                expires_at: None,
                max_uses,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_code_is_upper_cased() {
        assert_eq!(promo(None).code, "WELCOME1");
        assert_eq!(normalize_code(" abc9 "), "ABC9");
    }

    #[test]
    fn test_generated_code_charset() {
        let mut rng = rand::thread_rng();
        for length in GENERATED_CODE_MIN_LEN..=CODE_MAX_LEN {
            let code = generate_code(&mut rng, length);
            assert_eq!(code.len(), length);
            assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_redeem_checks_in_order() {
        let now = Utc::now();

        let mut code = promo(Some(1));
        assert_eq!(code.check_redeemable(now), Ok(()));

        code.used_count = 1;
        assert_eq!(code.check_redeemable(now), Err(RedeemRejection::Exhausted));

        code.expires_at = Some(now - Duration::hours(1));
        assert_eq!(code.check_redeemable(now), Err(RedeemRejection::Expired));

        code.is_active = false;
        assert_eq!(code.check_redeemable(now), Err(RedeemRejection::Inactive));
    }

    #[test]
    fn test_unlimited_code_never_exhausts() {
        let mut code = promo(None);
        code.used_count = 10_000;
        assert!(code.check_redeemable(Utc::now()).is_ok());
    }

    #[test]
    fn test_code_validation() {
        assert!(validate_code("ABC123").is_ok());
        assert!(validate_code("").is_err());
        assert!(validate_code("ABCDEFGHIJKLM").is_err());
        assert!(validate_code("AB-12").is_err());
    }

    #[test]
    fn test_credit_refuses_overflow() {
        let mut code = promo(None);
        assert_eq!(code.credit(5), Ok((7, 1)));
        assert_eq!(code.credit(i32::MAX), Err(RedeemRejection::TicketOverflow));

        code.used_count = i32::MAX;
        assert_eq!(code.credit(0), Err(RedeemRejection::Exhausted));
    }
}
