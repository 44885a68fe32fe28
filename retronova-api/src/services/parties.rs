//! Two-player parties with soft delete

use super::{ensure_written, require_arcade_machine, require_game, require_user, restore, visible};
use crate::core::{ApiResult, Storage};
use crate::domain::models::{Party, PartyCreate, PartyUpdate};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

async fn require_references(storage: &dyn Storage, party: &Party) -> ApiResult<()> {
    for player in party.players() {
        require_user(storage, player).await?;
    }
    require_game(storage, party.game_id).await?;
    require_arcade_machine(storage, party.machine_id).await?;
    Ok(())
}

pub async fn create_party(storage: &dyn Storage, data: PartyCreate) -> ApiResult<Party> {
    let party = Party::new(data, Utc::now());
    require_references(storage, &party).await?;
    storage.insert_party(&party).await?;

    info!("Created party {} on machine {}", party.id, party.machine_id);
    Ok(party)
}

pub async fn list_parties(storage: &dyn Storage, include_deleted: bool) -> ApiResult<Vec<Party>> {
    Ok(storage.list_parties(include_deleted).await?)
}

pub async fn get_party(storage: &dyn Storage, id: Uuid, include_deleted: bool) -> ApiResult<Party> {
    visible(storage.get_party(id).await?, include_deleted, "Party")
}

pub async fn update_party(storage: &dyn Storage, id: Uuid, update: PartyUpdate) -> ApiResult<Party> {
    let mut party = get_party(storage, id, false).await?;
    let references_changed = update.player1_id.is_some()
        || update.player2_id.is_some()
        || update.game_id.is_some()
        || update.machine_id.is_some();

    party.apply(update, Utc::now());
    if references_changed {
        require_references(storage, &party).await?;
    }

    ensure_written(storage.update_party(&party).await?, "Party")?;
    Ok(party)
}

pub async fn delete_party(storage: &dyn Storage, id: Uuid, hard_delete: bool) -> ApiResult<()> {
    let mut party = get_party(storage, id, false).await?;

    if hard_delete {
        ensure_written(storage.delete_party(id).await?, "Party")?;
    } else {
        party.meta.soft_delete(Utc::now());
        ensure_written(storage.update_party(&party).await?, "Party")?;
    }

    info!("Deleted party {} (hard: {})", id, hard_delete);
    Ok(())
}

pub async fn restore_party(storage: &dyn Storage, id: Uuid) -> ApiResult<Party> {
    let party = restore(storage.get_party(id).await?, "Party", Utc::now())?;
    ensure_written(storage.update_party(&party).await?, "Party")?;
    Ok(party)
}
