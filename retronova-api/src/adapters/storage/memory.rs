//! In-memory storage used by tests and development runs

use crate::core::{Storage, StorageError, StorageResult};
use crate::domain::models::{
    ArcadeMachine, Audited, Friendship, Game, Party, Payment, PromoCode, Redemption, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    friendships: HashMap<Uuid, Friendship>,
    games: HashMap<Uuid, Game>,
    arcade_machines: HashMap<Uuid, ArcadeMachine>,
    parties: HashMap<Uuid, Party>,
    payments: HashMap<Uuid, Payment>,
    promo_codes: HashMap<Uuid, PromoCode>,
}

/// HashMap-backed storage enforcing the same constraints as the SQL schema
#[derive(Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted<'a, T, I>(rows: I) -> Vec<T>
where
    T: Audited + Clone + 'a,
    I: Iterator<Item = &'a T>,
{
    let mut rows: Vec<T> = rows.cloned().collect();
    rows.sort_by_key(|row| row.meta().created_at);
    rows
}

fn unique(constraint: &str) -> StorageError {
    StorageError::UniqueViolation(constraint.to_string())
}

fn foreign_key(constraint: &str) -> StorageError {
    StorageError::ForeignKeyViolation(constraint.to_string())
}

impl Tables {
    fn check_user(&self, user: &User) -> StorageResult<()> {
        for other in self.users.values().filter(|other| other.id != user.id) {
            if other.firebase_id == user.firebase_id {
                return Err(unique("users_firebase_id_key"));
            }
            if other.publique_id == user.publique_id {
                return Err(unique("users_publique_id_key"));
            }
        }
        Ok(())
    }

    fn check_friendship(&self, friendship: &Friendship) -> StorageResult<()> {
        if !self.users.contains_key(&friendship.friend_from_id) {
            return Err(foreign_key("friends_friend_from_id_fkey"));
        }
        if !self.users.contains_key(&friendship.friend_to_id) {
            return Err(foreign_key("friends_friend_to_id_fkey"));
        }
        let duplicate = self.friendships.values().any(|other| {
            other.id != friendship.id
                && other.friend_from_id == friendship.friend_from_id
                && other.friend_to_id == friendship.friend_to_id
        });
        if duplicate {
            return Err(unique("unique_friendship"));
        }
        Ok(())
    }

    fn check_game(&self, game: &Game) -> StorageResult<()> {
        let duplicate = self
            .games
            .values()
            .any(|other| other.id != game.id && other.name == game.name);
        if duplicate {
            return Err(unique("games_name_key"));
        }
        Ok(())
    }

    fn check_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<()> {
        if !self.games.contains_key(&machine.game1_id) {
            return Err(foreign_key("arcade_machines_game1_id_fkey"));
        }
        if machine.game2_id.is_some_and(|id| !self.games.contains_key(&id)) {
            return Err(foreign_key("arcade_machines_game2_id_fkey"));
        }
        Ok(())
    }

    fn check_party(&self, party: &Party) -> StorageResult<()> {
        if !self.users.contains_key(&party.player1_id) {
            return Err(foreign_key("parties_player1_id_fkey"));
        }
        if !self.users.contains_key(&party.player2_id) {
            return Err(foreign_key("parties_player2_id_fkey"));
        }
        if !self.games.contains_key(&party.game_id) {
            return Err(foreign_key("parties_game_id_fkey"));
        }
        if !self.arcade_machines.contains_key(&party.machine_id) {
            return Err(foreign_key("parties_machine_id_fkey"));
        }
        Ok(())
    }

    fn check_payment(&self, payment: &Payment) -> StorageResult<()> {
        if !self.users.contains_key(&payment.user_id) {
            return Err(foreign_key("payments_user_id_fkey"));
        }
        let duplicate = self.payments.values().any(|other| {
            other.id != payment.id && other.session_stripe_token == payment.session_stripe_token
        });
        if duplicate {
            return Err(unique("payments_session_stripe_token_key"));
        }
        Ok(())
    }

    fn check_promo_code(&self, promo_code: &PromoCode) -> StorageResult<()> {
        let duplicate = self
            .promo_codes
            .values()
            .any(|other| other.id != promo_code.id && other.code == promo_code.code);
        if duplicate {
            return Err(unique("promo_codes_code_key"));
        }
        Ok(())
    }
}

/// Insert `row` unless the key is taken
fn insert_row<T: Clone>(table: &mut HashMap<Uuid, T>, id: Uuid, row: &T, pkey: &str) -> StorageResult<()> {
    if table.contains_key(&id) {
        return Err(unique(pkey));
    }
    table.insert(id, row.clone());
    Ok(())
}

/// Overwrite an existing row, reporting whether it was there
fn replace_row<T: Clone>(table: &mut HashMap<Uuid, T>, id: Uuid, row: &T) -> bool {
    match table.get_mut(&id) {
        Some(existing) => {
            *existing = row.clone();
            true
        }
        None => false,
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn insert_user(&self, user: &User) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        insert_row(&mut tables.users, user.id, user, "users_pkey")
    }

    async fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_firebase_id(&self, firebase_id: &str) -> StorageResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.firebase_id == firebase_id)
            .cloned())
    }

    async fn publique_id_exists(&self, publique_id: &str) -> StorageResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().any(|user| user.publique_id == publique_id))
    }

    async fn list_users(&self) -> StorageResult<Vec<User>> {
        Ok(sorted(self.tables.read().await.users.values()))
    }

    async fn update_user(&self, user: &User) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_user(user)?;
        Ok(replace_row(&mut tables.users, user.id, user))
    }

    async fn delete_user(&self, id: Uuid) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        // ON DELETE CASCADE
        tables.friendships.retain(|_, friendship| !friendship.involves(id));
        tables.payments.retain(|_, payment| payment.user_id != id);
        tables.parties.retain(|_, party| !party.players().contains(&id));

        debug!("Deleted user {} and dependent rows", id);
        Ok(true)
    }

    async fn insert_friendship(&self, friendship: &Friendship) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_friendship(friendship)?;
        insert_row(&mut tables.friendships, friendship.id, friendship, "friends_pkey")
    }

    async fn get_friendship(&self, id: Uuid) -> StorageResult<Option<Friendship>> {
        Ok(self.tables.read().await.friendships.get(&id).cloned())
    }

    async fn find_friendship(&self, from: Uuid, to: Uuid) -> StorageResult<Option<Friendship>> {
        let tables = self.tables.read().await;
        Ok(tables
            .friendships
            .values()
            .find(|f| f.friend_from_id == from && f.friend_to_id == to)
            .cloned())
    }

    async fn list_friendships(&self, include_deleted: bool) -> StorageResult<Vec<Friendship>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .friendships
                .values()
                .filter(|f| f.meta.is_visible(include_deleted)),
        ))
    }

    async fn list_friendships_for_user(&self, user_id: Uuid) -> StorageResult<Vec<Friendship>> {
        let tables = self.tables.read().await;
        Ok(sorted(tables.friendships.values().filter(|f| f.involves(user_id))))
    }

    async fn update_friendship(&self, friendship: &Friendship) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_friendship(friendship)?;
        Ok(replace_row(&mut tables.friendships, friendship.id, friendship))
    }

    async fn delete_friendship(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.tables.write().await.friendships.remove(&id).is_some())
    }

    async fn insert_game(&self, game: &Game) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_game(game)?;
        insert_row(&mut tables.games, game.id, game, "games_pkey")
    }

    async fn get_game(&self, id: Uuid) -> StorageResult<Option<Game>> {
        Ok(self.tables.read().await.games.get(&id).cloned())
    }

    async fn get_game_by_name(&self, name: &str) -> StorageResult<Option<Game>> {
        let tables = self.tables.read().await;
        Ok(tables.games.values().find(|game| game.name == name).cloned())
    }

    async fn list_games(&self, include_deleted: bool) -> StorageResult<Vec<Game>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .games
                .values()
                .filter(|game| game.meta.is_visible(include_deleted)),
        ))
    }

    async fn update_game(&self, game: &Game) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_game(game)?;
        Ok(replace_row(&mut tables.games, game.id, game))
    }

    async fn delete_game(&self, id: Uuid) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.arcade_machines.values().any(|machine| machine.hosts_game(id)) {
            return Err(foreign_key("arcade_machines_game1_id_fkey"));
        }
        if tables.parties.values().any(|party| party.game_id == id) {
            return Err(foreign_key("parties_game_id_fkey"));
        }
        Ok(tables.games.remove(&id).is_some())
    }

    async fn insert_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_arcade_machine(machine)?;
        insert_row(&mut tables.arcade_machines, machine.id, machine, "arcade_machines_pkey")
    }

    async fn get_arcade_machine(&self, id: Uuid) -> StorageResult<Option<ArcadeMachine>> {
        Ok(self.tables.read().await.arcade_machines.get(&id).cloned())
    }

    async fn list_arcade_machines(&self, include_deleted: bool) -> StorageResult<Vec<ArcadeMachine>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .arcade_machines
                .values()
                .filter(|machine| machine.meta.is_visible(include_deleted)),
        ))
    }

    async fn update_arcade_machine(&self, machine: &ArcadeMachine) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_arcade_machine(machine)?;
        Ok(replace_row(&mut tables.arcade_machines, machine.id, machine))
    }

    async fn delete_arcade_machine(&self, id: Uuid) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        if tables.parties.values().any(|party| party.machine_id == id) {
            return Err(foreign_key("parties_machine_id_fkey"));
        }
        Ok(tables.arcade_machines.remove(&id).is_some())
    }

    async fn insert_party(&self, party: &Party) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_party(party)?;
        insert_row(&mut tables.parties, party.id, party, "parties_pkey")
    }

    async fn get_party(&self, id: Uuid) -> StorageResult<Option<Party>> {
        Ok(self.tables.read().await.parties.get(&id).cloned())
    }

    async fn list_parties(&self, include_deleted: bool) -> StorageResult<Vec<Party>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .parties
                .values()
                .filter(|party| party.meta.is_visible(include_deleted)),
        ))
    }

    async fn update_party(&self, party: &Party) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_party(party)?;
        Ok(replace_row(&mut tables.parties, party.id, party))
    }

    async fn delete_party(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.tables.write().await.parties.remove(&id).is_some())
    }

    async fn insert_payment(&self, payment: &Payment) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_payment(payment)?;
        insert_row(&mut tables.payments, payment.id, payment, "payments_pkey")
    }

    async fn get_payment(&self, id: Uuid) -> StorageResult<Option<Payment>> {
        Ok(self.tables.read().await.payments.get(&id).cloned())
    }

    async fn get_payment_by_token(&self, token: &str) -> StorageResult<Option<Payment>> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .find(|payment| payment.session_stripe_token == token)
            .cloned())
    }

    async fn list_payments(&self) -> StorageResult<Vec<Payment>> {
        Ok(sorted(self.tables.read().await.payments.values()))
    }

    async fn update_payment(&self, payment: &Payment) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_payment(payment)?;
        Ok(replace_row(&mut tables.payments, payment.id, payment))
    }

    async fn delete_payment(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.tables.write().await.payments.remove(&id).is_some())
    }

    async fn insert_promo_code(&self, promo_code: &PromoCode) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        tables.check_promo_code(promo_code)?;
        insert_row(&mut tables.promo_codes, promo_code.id, promo_code, "promo_codes_pkey")
    }

    async fn get_promo_code(&self, id: Uuid) -> StorageResult<Option<PromoCode>> {
        Ok(self.tables.read().await.promo_codes.get(&id).cloned())
    }

    async fn get_promo_code_by_code(&self, code: &str) -> StorageResult<Option<PromoCode>> {
        let tables = self.tables.read().await;
        Ok(tables
            .promo_codes
            .values()
            .find(|promo_code| promo_code.code == code)
            .cloned())
    }

    async fn list_promo_codes(&self, include_inactive: bool) -> StorageResult<Vec<PromoCode>> {
        let tables = self.tables.read().await;
        Ok(sorted(
            tables
                .promo_codes
                .values()
                .filter(|promo_code| include_inactive || promo_code.is_active),
        ))
    }

    async fn update_promo_code(&self, promo_code: &PromoCode) -> StorageResult<bool> {
        let mut tables = self.tables.write().await;
        tables.check_promo_code(promo_code)?;
        Ok(replace_row(&mut tables.promo_codes, promo_code.id, promo_code))
    }

    async fn delete_promo_code(&self, id: Uuid) -> StorageResult<bool> {
        Ok(self.tables.write().await.promo_codes.remove(&id).is_some())
    }

    async fn redeem_promo_code(
        &self,
        code: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StorageResult<Redemption> {
        // A single write guard makes the check-then-increment atomic
        let mut tables = self.tables.write().await;
        let tables = &mut *tables;

        let Some(promo_code) = tables.promo_codes.values_mut().find(|p| p.code == code) else {
            return Ok(Redemption::CodeNotFound);
        };

        if let Err(rejection) = promo_code.check_redeemable(now) {
            return Ok(Redemption::Rejected(rejection));
        }

        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(Redemption::UserNotFound);
        };

        let (nb_ticket, used_count) = match promo_code.credit(user.nb_ticket) {
            Ok(balances) => balances,
            Err(rejection) => return Ok(Redemption::Rejected(rejection)),
        };

        user.nb_ticket = nb_ticket;
        user.meta.touch(now);
        promo_code.used_count = used_count;
        promo_code.meta.touch(now);

        Ok(Redemption::Redeemed {
            promo_code: promo_code.clone(),
            user: user.clone(),
        })
    }

    async fn ping(&self) -> StorageResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{GameCreate, PromoCodeCreate, RedeemRejection, UserCreate};

    fn user(firebase_id: &str, publique_id: &str) -> User {
        User::new(
            UserCreate {
                firebase_id: firebase_id.to_string(),
                first_name: None,
                last_name: None,
                nb_ticket: 0,
                bar: false,
            },
            publique_id.to_string(),
            Utc::now(),
        )
    }

    fn game(name: &str) -> Game {
        Game::new(
            GameCreate {
                name: name.to_string(),
                description: None,
                nb_min_player: 1,
                nb_max_player: 2,
            },
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_unique_firebase_id() {
        let storage = InMemoryStorage::new();
        storage.insert_user(&user("fb-1", "100000000001")).await.unwrap();

        let err = storage.insert_user(&user("fb-1", "100000000002")).await.unwrap_err();
        assert!(matches!(err, StorageError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let storage = InMemoryStorage::new();
        let alice = user("fb-a", "100000000001");
        let bob = user("fb-b", "100000000002");
        storage.insert_user(&alice).await.unwrap();
        storage.insert_user(&bob).await.unwrap();

        let friendship = Friendship::new(
            crate::domain::models::FriendshipCreate {
                friend_from_id: alice.id,
                friend_to_id: bob.id,
                accept: false,
                decline: false,
            },
            Utc::now(),
        );
        storage.insert_friendship(&friendship).await.unwrap();

        assert!(storage.delete_user(alice.id).await.unwrap());
        assert!(storage.get_friendship(friendship.id).await.unwrap().is_none());
        assert!(storage.get_user(bob.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_referenced_game_cannot_be_removed() {
        let storage = InMemoryStorage::new();
        let pong = game("Pong");
        storage.insert_game(&pong).await.unwrap();

        let machine = ArcadeMachine::new(
            crate::domain::models::ArcadeMachineCreate {
                name: Some("Cabinet".to_string()),
                description: None,
                localisation: None,
                game1_id: pong.id,
                game2_id: None,
            },
            Utc::now(),
        );
        storage.insert_arcade_machine(&machine).await.unwrap();

        let err = storage.delete_game(pong.id).await.unwrap_err();
        assert!(matches!(err, StorageError::ForeignKeyViolation(_)));

        assert!(storage.delete_arcade_machine(machine.id).await.unwrap());
        assert!(storage.delete_game(pong.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_redeem_credits_user_once_per_use() {
        let storage = InMemoryStorage::new();
        let player = user("fb-a", "100000000001");
        storage.insert_user(&player).await.unwrap();

        let promo = PromoCode::new(
            PromoCodeCreate {
                code: "ONCE".to_string(),
                nb_parties: 3,
                is_active: true,
                expires_at: None,
                max_uses: Some(1),
            },
            Utc::now(),
        );
        storage.insert_promo_code(&promo).await.unwrap();

        match storage.redeem_promo_code("ONCE", player.id, Utc::now()).await.unwrap() {
            Redemption::Redeemed { promo_code, user } => {
                assert_eq!(user.nb_ticket, 3);
                assert_eq!(promo_code.used_count, 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let second = storage.redeem_promo_code("ONCE", player.id, Utc::now()).await.unwrap();
        assert!(matches!(second, Redemption::Rejected(_)));
        assert_eq!(storage.get_user(player.id).await.unwrap().unwrap().nb_ticket, 3);
    }

    #[tokio::test]
    async fn test_redeem_unknown_user_writes_nothing() {
        let storage = InMemoryStorage::new();
        let promo = PromoCode::new(
            PromoCodeCreate {
                code: "GIFT".to_string(),
                nb_parties: 1,
                is_active: true,
                expires_at: None,
                max_uses: None,
            },
            Utc::now(),
        );
        storage.insert_promo_code(&promo).await.unwrap();

        let outcome = storage.redeem_promo_code("GIFT", Uuid::new_v4(), Utc::now()).await.unwrap();
        assert!(matches!(outcome, Redemption::UserNotFound));
        assert_eq!(storage.get_promo_code(promo.id).await.unwrap().unwrap().used_count, 0);
    }

    #[tokio::test]
    async fn test_redeem_refuses_ticket_overflow() {
        let storage = InMemoryStorage::new();
        let mut rich = user("fb-rich", "100000000002");
        rich.nb_ticket = i32::MAX;
        storage.insert_user(&rich).await.unwrap();

        let promo = PromoCode::new(
            PromoCodeCreate {
                code: "BIG".to_string(),
                nb_parties: 5,
                is_active: true,
                expires_at: None,
                max_uses: None,
            },
            Utc::now(),
        );
        storage.insert_promo_code(&promo).await.unwrap();

        let outcome = storage.redeem_promo_code("BIG", rich.id, Utc::now()).await.unwrap();
        assert!(matches!(
            outcome,
            Redemption::Rejected(RedeemRejection::TicketOverflow)
        ));
        assert_eq!(storage.get_user(rich.id).await.unwrap().unwrap().nb_ticket, i32::MAX);
        assert_eq!(storage.get_promo_code(promo.id).await.unwrap().unwrap().used_count, 0);
    }
}
