//! Games available on arcade machines

use super::RecordMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Game {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub nb_max_player: i32,
    pub nb_min_player: i32,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_player_bounds"))]
pub struct GameCreate {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub nb_min_player: i32,
    #[validate(range(min = 1))]
    pub nb_max_player: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct GameUpdate {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(max = 255))]
    pub description: Option<Option<String>>,
    #[validate(range(min = 1))]
    pub nb_min_player: Option<i32>,
    #[validate(range(min = 1))]
    pub nb_max_player: Option<i32>,
}

fn validate_player_bounds(game: &GameCreate) -> Result<(), ValidationError> {
    if game.nb_min_player > game.nb_max_player {
        return Err(ValidationError::new("nb_min_player_exceeds_nb_max_player"));
    }
    Ok(())
}

impl Game {
    pub fn new(data: GameCreate, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            nb_max_player: data.nb_max_player,
            nb_min_player: data.nb_min_player,
            meta: RecordMeta::new(now),
        }
    }

    pub fn apply(&mut self, update: GameUpdate, now: DateTime<Utc>) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(min) = update.nb_min_player {
            self.nb_min_player = min;
        }
        if let Some(max) = update.nb_max_player {
            self.nb_max_player = max;
        }
        self.meta.touch(now);
    }

    pub fn has_valid_player_bounds(&self) -> bool {
        self.nb_min_player >= 1 && self.nb_min_player <= self.nb_max_player
    }
}
