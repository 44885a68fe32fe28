//! Physical arcade cabinets hosting one or two games

use super::RecordMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ArcadeMachine {
    pub id: Uuid,
    pub name: Option<String>,
    pub description: Option<String>,
    pub localisation: Option<String>,
    pub game1_id: Uuid,
    pub game2_id: Option<Uuid>,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ArcadeMachineCreate {
    #[serde(default)]
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub localisation: Option<String>,
    pub game1_id: Uuid,
    #[serde(default)]
    pub game2_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ArcadeMachineUpdate {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(length(max = 255))]
    pub localisation: Option<String>,
    pub game1_id: Option<Uuid>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub game2_id: Option<Option<Uuid>>,
}

impl ArcadeMachine {
    pub fn new(data: ArcadeMachineCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            localisation: data.localisation,
            game1_id: data.game1_id,
            game2_id: data.game2_id,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: ArcadeMachineUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = Some(name);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(localisation) = update.localisation {
            self.localisation = Some(localisation);
        }
        if let Some(game1_id) = update.game1_id {
            self.game1_id = game1_id;
        }
        if let Some(game2_id) = update.game2_id {
            self.game2_id = game2_id;
        }
        self.meta.touch(now);
    }

    /// Games referenced by this machine
    pub fn game_ids(&self) -> impl Iterator<Item = Uuid> {
        std::iter::once(self.game1_id).chain(self.game2_id)
    }

    pub fn hosts_game(&self, game_id: Uuid) -> bool {
        self.game_ids().any(|id| id == game_id)
    }
}
