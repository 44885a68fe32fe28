//! Core trait abstractions (Ports in Hexagonal Architecture)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::StorageResult;
use crate::domain::models::{
    ArcadeMachine, Friendship, Game, Party, Payment, PromoCode, Redemption, User,
};

/// Storage port - abstraction over every persisted entity.
///
/// `get_*` lookups return soft-deleted rows too; callers decide visibility.
/// `update_*` writes the whole row and reports whether it existed.
/// `delete_*` removes the row physically.
#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn insert_user(&self, user: &User) -> StorageResult<()>;
    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>>;
    async fn get_user_by_firebase_id(&self, firebase_id: &str) -> StorageResult<Option<User>>;
    async fn publique_id_exists(&self, publique_id: &str) -> StorageResult<bool>;
    async fn list_users(&self) -> StorageResult<Vec<User>>;
    async fn update_user(&self, user: &User) -> StorageResult<bool>;
    async fn delete_user(&self, id: Uuid) -> StorageResult<bool>;

    // Friendships
    async fn insert_friendship(&self, friendship: &Friendship) -> StorageResult<()>;
    async fn get_friendship(&self, id: Uuid) -> StorageResult<Option<Friendship>>;
    async fn find_friendship(&self, from: Uuid, to: Uuid) -> StorageResult<Option<Friendship>>;
    async fn list_friendships(&self, include_deleted: bool) -> StorageResult<Vec<Friendship>>;
    /// Friendships where the user is either the sender or the recipient
    async fn list_friendships_for_user(&self, user_id: Uuid) -> StorageResult<Vec<Friendship>>;
    async fn update_friendship(&self, friendship: &Friendship) -> StorageResult<bool>;
    async fn delete_friendship(&self, id: Uuid) -> StorageResult<bool>;

    // Games
    async fn insert_game(&self, game: &Game) -> StorageResult<()>;
    async fn get_game(&self, id: Uuid) -> StorageResult<Option<Game>>;
    async fn get_game_by_name(&self, name: &str) -> StorageResult<Option<Game>>;
    async fn list_games(&self, include_deleted: bool) -> StorageResult<Vec<Game>>;
    async fn update_game(&self, game: &Game) -> StorageResult<bool>;
    async fn delete_game(&self, id: Uuid) -> StorageResult<bool>;

    // Arcade machines
    async fn insert_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<()>;
    async fn get_arcade_machine(&self, id: Uuid) -> StorageResult<Option<ArcadeMachine>>;
    async fn list_arcade_machines(&self, include_deleted: bool) -> StorageResult<Vec<ArcadeMachine>>;
    async fn update_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<bool>;
    async fn delete_arcade_machine(&self, id: Uuid) -> StorageResult<bool>;

    // Parties
    async fn insert_party(&self, party: &Party) -> StorageResult<()>;
    async fn get_party(&self, id: Uuid) -> StorageResult<Option<Party>>;
    async fn list_parties(&self, include_deleted: bool) -> StorageResult<Vec<Party>>;
    async fn update_party(&self, party: &Party) -> StorageResult<bool>;
    async fn delete_party(&self, id: Uuid) -> StorageResult<bool>;

    // Payments
    async fn insert_payment(&self, payment: &Payment) -> StorageResult<()>;
    async fn get_payment(&self, id: Uuid) -> StorageResult<Option<Payment>>;
    async fn get_payment_by_token(&self, token: &str) -> StorageResult<Option<Payment>>;
    async fn list_payments(&self) -> StorageResult<Vec<Payment>>;
    async fn update_payment(&self, payment: &Payment) -> StorageResult<bool>;
    async fn delete_payment(&self, id: Uuid) -> StorageResult<bool>;

    // Promo codes
    async fn insert_promo_code(&self, promo_code: &PromoCode) -> StorageResult<()>;
    async fn get_promo_code(&self, id: Uuid) -> StorageResult<Option<PromoCode>>;
    /// Lookup by already-normalized code
    async fn get_promo_code_by_code(&self, code: &str) -> StorageResult<Option<PromoCode>>;
    async fn list_promo_codes(&self, include_inactive: bool) -> StorageResult<Vec<PromoCode>>;
    async fn update_promo_code(&self, promo_code: &PromoCode) -> StorageResult<bool>;
    async fn delete_promo_code(&self, id: Uuid) -> StorageResult<bool>;

    /// Validate and consume one use of `code` for `user_id` atomically.
    ///
    /// On success the user's ticket balance grows by the code's `nb_parties`
    /// and the code's `used_count` by one; nothing is written otherwise.
    async fn redeem_promo_code(
        &self,
        code: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StorageResult<Redemption>;

    /// Health check
    async fn ping(&self) -> StorageResult<()>;
}
