//! Player accounts

use super::RecordMeta;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Length of the public identifier shared between players
pub const PUBLIQUE_ID_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub publique_id: String,
    pub firebase_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nb_ticket: i32,
    pub bar: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

/// Body of `POST /users` and `PUT /users/{id}`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 28))]
    pub firebase_id: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub nb_ticket: i32,
    #[serde(default)]
    pub bar: bool,
}

impl User {
    pub fn new(data: UserCreate, publique_id: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            publique_id,
            firebase_id: data.firebase_id,
            first_name: data.first_name,
            last_name: data.last_name,
            nb_ticket: data.nb_ticket,
            bar: data.bar,
            meta: RecordMeta::new(now),
        }
    }

    /// Overwrite every editable field
    pub fn replace(&mut self, data: UserCreate, now: DateTime<Utc>) {
        self.firebase_id = data.firebase_id;
        self.first_name = data.first_name;
        self.last_name = data.last_name;
        self.nb_ticket = data.nb_ticket;
        self.bar = data.bar;
        self.meta.touch(now);
    }
}

/// Random 12-digit public identifier without a leading zero
pub fn generate_publique_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut id = String::with_capacity(PUBLIQUE_ID_LEN);
    id.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..PUBLIQUE_ID_LEN {
        id.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publique_id_format() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let id = generate_publique_id(&mut rng);
            assert_eq!(id.len(), PUBLIQUE_ID_LEN);
            assert!(id.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(id.chars().next(), Some('0'));
        }
    }

    #[test]
    fn test_create_defaults() {
        let data: UserCreate = serde_json::from_str(r#"{"firebase_id": "abc"}"#).unwrap();
        assert_eq!(data.nb_ticket, 0);
        assert!(!data.bar);
        assert!(data.first_name.is_none());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_long_firebase_id() {
        let data = UserCreate {
            firebase_id: "x".repeat(29),
            first_name: None,
            last_name: None,
            nb_ticket: 0,
            bar: false,
        };
        assert!(data.validate().is_err());
    }
}
