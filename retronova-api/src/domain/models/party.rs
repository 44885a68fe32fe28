//! Two-player matches played on an arcade machine

use super::RecordMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Party {
    pub id: Uuid,
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub game_id: Uuid,
    pub machine_id: Uuid,
    pub total_score: Option<i32>,
    pub p1_score: Option<i32>,
    pub p2_score: Option<i32>,
    /// Code typed on the cabinet to join the party
    pub password: Option<i32>,
    pub done: bool,
    pub cancel: bool,
    pub bar: Option<bool>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartyCreate {
    pub player1_id: Uuid,
    pub player2_id: Uuid,
    pub game_id: Uuid,
    pub machine_id: Uuid,
    #[serde(default)]
    pub total_score: Option<i32>,
    #[serde(default)]
    pub p1_score: Option<i32>,
    #[serde(default)]
    pub p2_score: Option<i32>,
    #[serde(default)]
    pub password: Option<i32>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub cancel: bool,
    #[serde(default)]
    pub bar: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PartyUpdate {
    pub player1_id: Option<Uuid>,
    pub player2_id: Option<Uuid>,
    pub game_id: Option<Uuid>,
    pub machine_id: Option<Uuid>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub total_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub p1_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub p2_score: Option<Option<i32>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub password: Option<Option<i32>>,
    pub done: Option<bool>,
    pub cancel: Option<bool>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub bar: Option<Option<bool>>,
}

impl Party {
    pub fn new(data: PartyCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            player1_id: data.player1_id,
            player2_id: data.player2_id,
            game_id: data.game_id,
            machine_id: data.machine_id,
            total_score: data.total_score,
            p1_score: data.p1_score,
            p2_score: data.p2_score,
            password: data.password,
            done: data.done,
            cancel: data.cancel,
            bar: data.bar,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: PartyUpdate, now: DateTime<Utc>) {
        if let Some(id) = update.player1_id {
            self.player1_id = id;
        }
        if let Some(id) = update.player2_id {
            self.player2_id = id;
        }
        if let Some(id) = update.game_id {
            self.game_id = id;
        }
        if let Some(id) = update.machine_id {
            self.machine_id = id;
        }
        if let Some(score) = update.total_score {
            self.total_score = score;
        }
        if let Some(score) = update.p1_score {
            self.p1_score = score;
        }
        if let Some(score) = update.p2_score {
            self.p2_score = score;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
        if let Some(done) = update.done {
            self.done = done;
        }
        if let Some(cancel) = update.cancel {
            self.cancel = cancel;
        }
        if let Some(bar) = update.bar {
            self.bar = bar;
        }
        self.meta.touch(now);
    }

    pub fn players(&self) -> [Uuid; 2] {
        [self.player1_id, self.player2_id]
    }
}
