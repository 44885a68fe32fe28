//! Ticket purchases settled through Stripe checkout sessions

use super::RecordMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Payment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub session_stripe_token: String,
    /// Amount charged, in cents
    pub amount: i32,
    pub nb_ticket: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PaymentCreate {
    pub user_id: Uuid,
    #[validate(length(min = 1))]
    pub session_stripe_token: String,
    #[validate(range(min = 0))]
    pub amount: i32,
    #[validate(range(min = 0))]
    pub nb_ticket: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PaymentUpdate {
    pub user_id: Option<Uuid>,
    #[validate(length(min = 1))]
    pub session_stripe_token: Option<String>,
    #[validate(range(min = 0))]
    pub amount: Option<i32>,
    #[validate(range(min = 0))]
    pub nb_ticket: Option<i32>,
}

impl Payment {
    pub fn new(data: PaymentCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: data.user_id,
            session_stripe_token: data.session_stripe_token,
            amount: data.amount,
            nb_ticket: data.nb_ticket,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: PaymentUpdate, now: DateTime<Utc>) {
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(token) = update.session_stripe_token {
            self.session_stripe_token = token;
        }
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(nb_ticket) = update.nb_ticket {
            self.nb_ticket = nb_ticket;
        }
        self.meta.touch(now);
    }
}
