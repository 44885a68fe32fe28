//! Friend requests between players

use super::RecordMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Directed friend request; `accept`/`decline` record the recipient's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Friendship {
    pub id: Uuid,
    pub friend_from_id: Uuid,
    pub friend_to_id: Uuid,
    pub accept: bool,
    pub decline: bool,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FriendshipCreate {
    pub friend_from_id: Uuid,
    pub friend_to_id: Uuid,
    #[serde(default)]
    pub accept: bool,
    #[serde(default)]
    pub decline: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct FriendshipUpdate {
    pub accept: Option<bool>,
    pub decline: Option<bool>,
}

/// Filters of `GET /friends/status/{user_id}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FriendStatusQuery {
    pub accepted: Option<bool>,
    pub declined: Option<bool>,
    #[serde(default)]
    pub include_deleted: bool,
}

impl Friendship {
    pub fn new(data: FriendshipCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            friend_from_id: data.friend_from_id,
            friend_to_id: data.friend_to_id,
            accept: data.accept,
            decline: data.decline,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: FriendshipUpdate, now: DateTime<Utc>) {
        if let Some(accept) = update.accept {
            self.accept = accept;
        }
        if let Some(decline) = update.decline {
            self.decline = decline;
        }
        self.meta.touch(now);
    }

    pub fn involves(&self, user_id: Uuid) -> bool {
        self.friend_from_id == user_id || self.friend_to_id == user_id
    }

    /// Request addressed to `user_id` that has not been answered yet
    pub fn is_pending_for(&self, user_id: Uuid) -> bool {
        self.friend_to_id == user_id && !self.accept && !self.decline
    }

    pub fn matches_status(&self, query: &FriendStatusQuery) -> bool {
        query.accepted.map_or(true, |accepted| self.accept == accepted)
            && query.declined.map_or(true, |declined| self.decline == declined)
            && self.meta.is_visible(query.include_deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: Uuid, to: Uuid) -> Friendship {
        Friendship::new(
            FriendshipCreate {
                friend_from_id: from,
                friend_to_id: to,
                accept: false,
                decline: false,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_pending_only_for_recipient() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut friendship = request(alice, bob);

        assert!(friendship.is_pending_for(bob));
        assert!(!friendship.is_pending_for(alice));

        friendship.apply(FriendshipUpdate { accept: Some(true), decline: None }, Utc::now());
        assert!(!friendship.is_pending_for(bob));
    }

    #[test]
    fn test_status_filters() {
        let (alice, bob) = (Uuid::new_v4(), Uuid::new_v4());
        let mut friendship = request(alice, bob);
        friendship.accept = true;

        let any = FriendStatusQuery::default();
        let accepted = FriendStatusQuery { accepted: Some(true), ..Default::default() };
        let declined = FriendStatusQuery { declined: Some(true), ..Default::default() };

        assert!(friendship.matches_status(&any));
        assert!(friendship.matches_status(&accepted));
        assert!(!friendship.matches_status(&declined));

        friendship.meta.soft_delete(Utc::now());
        assert!(!friendship.matches_status(&any));
        assert!(friendship.matches_status(&FriendStatusQuery { include_deleted: true, ..Default::default() }));
    }
}
