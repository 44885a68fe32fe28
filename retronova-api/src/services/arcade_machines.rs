//! Arcade cabinets with soft delete

use super::{ensure_written, require_game, restore, visible};
use crate::core::{ApiResult, Storage};
use crate::domain::models::{ArcadeMachine, ArcadeMachineCreate, ArcadeMachineUpdate};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

async fn require_games(storage: &dyn Storage, machine: &ArcadeMachine) -> ApiResult<()> {
    for game_id in machine.game_ids() {
        require_game(storage, game_id).await?;
    }
    Ok(())
}

pub async fn create_arcade_machine(
    storage: &dyn Storage,
    data: ArcadeMachineCreate,
) -> ApiResult<ArcadeMachine> {
    let machine = ArcadeMachine::new(data, Utc::now());
    require_games(storage, &machine).await?;
    storage.insert_arcade_machine(&machine).await?;

    info!("Created arcade machine {}", machine.id);
    Ok(machine)
}

pub async fn list_arcade_machines(
    storage: &dyn Storage,
    include_deleted: bool,
) -> ApiResult<Vec<ArcadeMachine>> {
    Ok(storage.list_arcade_machines(include_deleted).await?)
}

pub async fn get_arcade_machine(
    storage: &dyn Storage,
    id: Uuid,
    include_deleted: bool,
) -> ApiResult<ArcadeMachine> {
    visible(storage.get_arcade_machine(id).await?, include_deleted, "Arcade machine")
}

pub async fn update_arcade_machine(
    storage: &dyn Storage,
    id: Uuid,
    update: ArcadeMachineUpdate,
) -> ApiResult<ArcadeMachine> {
    let mut machine = get_arcade_machine(storage, id, false).await?;
    let games_changed = update.game1_id.is_some() || update.game2_id.is_some();

    machine.apply(update, Utc::now());
    if games_changed {
        require_games(storage, &machine).await?;
    }

    ensure_written(storage.update_arcade_machine(&machine).await?, "Arcade machine")?;
    Ok(machine)
}

pub async fn delete_arcade_machine(storage: &dyn Storage, id: Uuid, hard_delete: bool) -> ApiResult<()> {
    let mut machine = get_arcade_machine(storage, id, false).await?;

    if hard_delete {
        ensure_written(storage.delete_arcade_machine(id).await?, "Arcade machine")?;
    } else {
        machine.meta.soft_delete(Utc::now());
        ensure_written(storage.update_arcade_machine(&machine).await?, "Arcade machine")?;
    }

    info!("Deleted arcade machine {} (hard: {})", id, hard_delete);
    Ok(())
}

pub async fn restore_arcade_machine(storage: &dyn Storage, id: Uuid) -> ApiResult<ArcadeMachine> {
    let machine = restore(storage.get_arcade_machine(id).await?, "Arcade machine", Utc::now())?;
    ensure_written(storage.update_arcade_machine(&machine).await?, "Arcade machine")?;
    Ok(machine)
}
