//! PostgreSQL adapter
//!
//! Runtime-checked sqlx queries against the schema in `migrations/`.

use crate::config::DatabaseConfig;
use crate::core::{Storage, StorageResult};
use crate::domain::models::{
    ArcadeMachine, Friendship, Game, Party, Payment, PromoCode, Redemption, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// PostgreSQL-backed storage
#[derive(Clone)]
pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    /// Connect to PostgreSQL using the configured pool settings
    pub async fn connect(config: &DatabaseConfig) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        info!("PostgreSQL connected successfully");

        Ok(Self { pool })
    }

    /// Apply the embedded migrations
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn delete_by_id(&self, table: &str, id: Uuid) -> StorageResult<bool> {
        let query = format!("DELETE FROM {table} WHERE id = $1");
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        debug!("Deleted {} row(s) from {}", result.rows_affected(), table);
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        let query = r#"
            INSERT INTO users (
                id, publique_id, firebase_id, first_name, last_name, nb_ticket, bar,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#;

        sqlx::query(query)
            .bind(user.id)
            .bind(&user.publique_id)
            .bind(&user.firebase_id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.nb_ticket)
            .bind(user.bar)
            .bind(user.meta.created_at)
            .bind(user.meta.updated_at)
            .bind(user.meta.deleted_at)
            .bind(user.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_user_by_firebase_id(&self, firebase_id: &str) -> StorageResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE firebase_id = $1")
            .bind(firebase_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn publique_id_exists(&self, publique_id: &str) -> StorageResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE publique_id = $1)")
                .bind(publique_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update_user(&self, user: &User) -> StorageResult<bool> {
        let query = r#"
            UPDATE users SET
                publique_id = $2, firebase_id = $3, first_name = $4, last_name = $5,
                nb_ticket = $6, bar = $7, updated_at = $8, deleted_at = $9, is_deleted = $10
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(user.id)
            .bind(&user.publique_id)
            .bind(&user.firebase_id)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.nb_ticket)
            .bind(user.bar)
            .bind(user.meta.updated_at)
            .bind(user.meta.deleted_at)
            .bind(user.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("users", id).await
    }

    async fn insert_friendship(&self, friendship: &Friendship) -> StorageResult<()> {
        let query = r#"
            INSERT INTO friends (
                id, friend_from_id, friend_to_id, accept, decline,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(friendship.id)
            .bind(friendship.friend_from_id)
            .bind(friendship.friend_to_id)
            .bind(friendship.accept)
            .bind(friendship.decline)
            .bind(friendship.meta.created_at)
            .bind(friendship.meta.updated_at)
            .bind(friendship.meta.deleted_at)
            .bind(friendship.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_friendship(&self, id: Uuid) -> StorageResult<Option<Friendship>> {
        let friendship = sqlx::query_as::<_, Friendship>("SELECT * FROM friends WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(friendship)
    }

    async fn find_friendship(&self, from: Uuid, to: Uuid) -> StorageResult<Option<Friendship>> {
        let friendship = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friends WHERE friend_from_id = $1 AND friend_to_id = $2",
        )
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(friendship)
    }

    async fn list_friendships(&self, include_deleted: bool) -> StorageResult<Vec<Friendship>> {
        let friendships = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friends WHERE ($1 OR NOT is_deleted) ORDER BY created_at",
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(friendships)
    }

    async fn list_friendships_for_user(&self, user_id: Uuid) -> StorageResult<Vec<Friendship>> {
        let friendships = sqlx::query_as::<_, Friendship>(
            r#"
            SELECT * FROM friends
            WHERE friend_from_id = $1 OR friend_to_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(friendships)
    }

    async fn update_friendship(&self, friendship: &Friendship) -> StorageResult<bool> {
        let query = r#"
            UPDATE friends SET
                friend_from_id = $2, friend_to_id = $3, accept = $4, decline = $5,
                updated_at = $6, deleted_at = $7, is_deleted = $8
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(friendship.id)
            .bind(friendship.friend_from_id)
            .bind(friendship.friend_to_id)
            .bind(friendship.accept)
            .bind(friendship.decline)
            .bind(friendship.meta.updated_at)
            .bind(friendship.meta.deleted_at)
            .bind(friendship.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_friendship(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("friends", id).await
    }

    async fn insert_game(&self, game: &Game) -> StorageResult<()> {
        let query = r#"
            INSERT INTO games (
                id, name, description, nb_max_player, nb_min_player,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(game.id)
            .bind(&game.name)
            .bind(&game.description)
            .bind(game.nb_max_player)
            .bind(game.nb_min_player)
            .bind(game.meta.created_at)
            .bind(game.meta.updated_at)
            .bind(game.meta.deleted_at)
            .bind(game.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_game(&self, id: Uuid) -> StorageResult<Option<Game>> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    async fn get_game_by_name(&self, name: &str) -> StorageResult<Option<Game>> {
        let game = sqlx::query_as::<_, Game>("SELECT * FROM games WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(game)
    }

    async fn list_games(&self, include_deleted: bool) -> StorageResult<Vec<Game>> {
        let games = sqlx::query_as::<_, Game>(
            "SELECT * FROM games WHERE ($1 OR NOT is_deleted) ORDER BY created_at",
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(games)
    }

    async fn update_game(&self, game: &Game) -> StorageResult<bool> {
        let query = r#"
            UPDATE games SET
                name = $2, description = $3, nb_max_player = $4, nb_min_player = $5,
                updated_at = $6, deleted_at = $7, is_deleted = $8
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(game.id)
            .bind(&game.name)
            .bind(&game.description)
            .bind(game.nb_max_player)
            .bind(game.nb_min_player)
            .bind(game.meta.updated_at)
            .bind(game.meta.deleted_at)
            .bind(game.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_game(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("games", id).await
    }

    async fn insert_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<()> {
        let query = r#"
            INSERT INTO arcade_machines (
                id, name, description, localisation, game1_id, game2_id,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#;

        sqlx::query(query)
            .bind(machine.id)
            .bind(&machine.name)
            .bind(&machine.description)
            .bind(&machine.localisation)
            .bind(machine.game1_id)
            .bind(machine.game2_id)
            .bind(machine.meta.created_at)
            .bind(machine.meta.updated_at)
            .bind(machine.meta.deleted_at)
            .bind(machine.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_arcade_machine(&self, id: Uuid) -> StorageResult<Option<ArcadeMachine>> {
        let machine =
            sqlx::query_as::<_, ArcadeMachine>("SELECT * FROM arcade_machines WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(machine)
    }

    async fn list_arcade_machines(&self, include_deleted: bool) -> StorageResult<Vec<ArcadeMachine>> {
        let machines = sqlx::query_as::<_, ArcadeMachine>(
            "SELECT * FROM arcade_machines WHERE ($1 OR NOT is_deleted) ORDER BY created_at",
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(machines)
    }

    async fn update_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<bool> {
        let query = r#"
            UPDATE arcade_machines SET
                name = $2, description = $3, localisation = $4, game1_id = $5, game2_id = $6,
                updated_at = $7, deleted_at = $8, is_deleted = $9
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(machine.id)
            .bind(&machine.name)
            .bind(&machine.description)
            .bind(&machine.localisation)
            .bind(machine.game1_id)
            .bind(machine.game2_id)
            .bind(machine.meta.updated_at)
            .bind(machine.meta.deleted_at)
            .bind(machine.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_arcade_machine(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("arcade_machines", id).await
    }

    async fn insert_party(&self, party: &Party) -> StorageResult<()> {
        let query = r#"
            INSERT INTO parties (
                id, player1_id, player2_id, game_id, machine_id, total_score,
                p1_score, p2_score, password, done, cancel, bar,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        "#;

        sqlx::query(query)
            .bind(party.id)
            .bind(party.player1_id)
            .bind(party.player2_id)
            .bind(party.game_id)
            .bind(party.machine_id)
            .bind(party.total_score)
            .bind(party.p1_score)
            .bind(party.p2_score)
            .bind(party.password)
            .bind(party.done)
            .bind(party.cancel)
            .bind(party.bar)
            .bind(party.meta.created_at)
            .bind(party.meta.updated_at)
            .bind(party.meta.deleted_at)
            .bind(party.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_party(&self, id: Uuid) -> StorageResult<Option<Party>> {
        let party = sqlx::query_as::<_, Party>("SELECT * FROM parties WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(party)
    }

    async fn list_parties(&self, include_deleted: bool) -> StorageResult<Vec<Party>> {
        let parties = sqlx::query_as::<_, Party>(
            "SELECT * FROM parties WHERE ($1 OR NOT is_deleted) ORDER BY created_at",
        )
        .bind(include_deleted)
        .fetch_all(&self.pool)
        .await?;
        Ok(parties)
    }

    async fn update_party(&self, party: &Party) -> StorageResult<bool> {
        let query = r#"
            UPDATE parties SET
                player1_id = $2, player2_id = $3, game_id = $4, machine_id = $5,
                total_score = $6, p1_score = $7, p2_score = $8, password = $9,
                done = $10, cancel = $11, bar = $12,
                updated_at = $13, deleted_at = $14, is_deleted = $15
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(party.id)
            .bind(party.player1_id)
            .bind(party.player2_id)
            .bind(party.game_id)
            .bind(party.machine_id)
            .bind(party.total_score)
            .bind(party.p1_score)
            .bind(party.p2_score)
            .bind(party.password)
            .bind(party.done)
            .bind(party.cancel)
            .bind(party.bar)
            .bind(party.meta.updated_at)
            .bind(party.meta.deleted_at)
            .bind(party.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_party(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("parties", id).await
    }

    async fn insert_payment(&self, payment: &Payment) -> StorageResult<()> {
        let query = r#"
            INSERT INTO payments (
                id, user_id, session_stripe_token, amount, nb_ticket,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;

        sqlx::query(query)
            .bind(payment.id)
            .bind(payment.user_id)
            .bind(&payment.session_stripe_token)
            .bind(payment.amount)
            .bind(payment.nb_ticket)
            .bind(payment.meta.created_at)
            .bind(payment.meta.updated_at)
            .bind(payment.meta.deleted_at)
            .bind(payment.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_payment(&self, id: Uuid) -> StorageResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(payment)
    }

    async fn get_payment_by_token(&self, token: &str) -> StorageResult<Option<Payment>> {
        let payment =
            sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE session_stripe_token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(payment)
    }

    async fn list_payments(&self) -> StorageResult<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>("SELECT * FROM payments ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(payments)
    }

    async fn update_payment(&self, payment: &Payment) -> StorageResult<bool> {
        let query = r#"
            UPDATE payments SET
                user_id = $2, session_stripe_token = $3, amount = $4, nb_ticket = $5,
                updated_at = $6, deleted_at = $7, is_deleted = $8
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(payment.id)
            .bind(payment.user_id)
            .bind(&payment.session_stripe_token)
            .bind(payment.amount)
            .bind(payment.nb_ticket)
            .bind(payment.meta.updated_at)
            .bind(payment.meta.deleted_at)
            .bind(payment.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_payment(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("payments", id).await
    }

    async fn insert_promo_code(&self, promo_code: &PromoCode) -> StorageResult<()> {
        let query = r#"
            INSERT INTO promo_codes (
                id, code, nb_parties, is_active, expires_at, used_count, max_uses,
                created_at, updated_at, deleted_at, is_deleted
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#;

        sqlx::query(query)
            .bind(promo_code.id)
            .bind(&promo_code.code)
            .bind(promo_code.nb_parties)
            .bind(promo_code.is_active)
            .bind(promo_code.expires_at)
            .bind(promo_code.used_count)
            .bind(promo_code.max_uses)
            .bind(promo_code.meta.created_at)
            .bind(promo_code.meta.updated_at)
            .bind(promo_code.meta.deleted_at)
            .bind(promo_code.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_promo_code(&self, id: Uuid) -> StorageResult<Option<PromoCode>> {
        let promo_code = sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(promo_code)
    }

    async fn get_promo_code_by_code(&self, code: &str) -> StorageResult<Option<PromoCode>> {
        let promo_code =
            sqlx::query_as::<_, PromoCode>("SELECT * FROM promo_codes WHERE code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;
        Ok(promo_code)
    }

    async fn list_promo_codes(&self, include_inactive: bool) -> StorageResult<Vec<PromoCode>> {
        let promo_codes = sqlx::query_as::<_, PromoCode>(
            "SELECT * FROM promo_codes WHERE ($1 OR is_active) ORDER BY created_at",
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;
        Ok(promo_codes)
    }

    async fn update_promo_code(&self, promo_code: &PromoCode) -> StorageResult<bool> {
        let query = r#"
            UPDATE promo_codes SET
                code = $2, nb_parties = $3, is_active = $4, expires_at = $5,
                used_count = $6, max_uses = $7,
                updated_at = $8, deleted_at = $9, is_deleted = $10
            WHERE id = $1
        "#;

        let result = sqlx::query(query)
            .bind(promo_code.id)
            .bind(&promo_code.code)
            .bind(promo_code.nb_parties)
            .bind(promo_code.is_active)
            .bind(promo_code.expires_at)
            .bind(promo_code.used_count)
            .bind(promo_code.max_uses)
            .bind(promo_code.meta.updated_at)
            .bind(promo_code.meta.deleted_at)
            .bind(promo_code.meta.is_deleted)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_promo_code(&self, id: Uuid) -> StorageResult<bool> {
        self.delete_by_id("promo_codes", id).await
    }

    async fn redeem_promo_code(
        &self,
        code: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StorageResult<Redemption> {
        // Dropping the transaction without commit rolls it back
        let mut tx = self.pool.begin().await?;

        let promo_code = sqlx::query_as::<_, PromoCode>(
            "SELECT * FROM promo_codes WHERE code = $1 FOR UPDATE",
        )
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(promo_code) = promo_code else {
            return Ok(Redemption::CodeNotFound);
        };

        if let Err(rejection) = promo_code.check_redeemable(now) {
            return Ok(Redemption::Rejected(rejection));
        }

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(user) = user else {
            return Ok(Redemption::UserNotFound);
        };

        let (nb_ticket, used_count) = match promo_code.credit(user.nb_ticket) {
            Ok(balances) => balances,
            Err(rejection) => return Ok(Redemption::Rejected(rejection)),
        };

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET nb_ticket = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(user.id)
        .bind(nb_ticket)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let promo_code = sqlx::query_as::<_, PromoCode>(
            "UPDATE promo_codes SET used_count = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(promo_code.id)
        .bind(used_count)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Redemption::Redeemed { promo_code, user })
    }

    async fn ping(&self) -> StorageResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
