//! Friend requests

use super::{ensure_written, require_user, visible};
use crate::core::{ApiError, ApiResult, Storage};
use crate::domain::models::{FriendStatusQuery, Friendship, FriendshipCreate, FriendshipUpdate};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

pub async fn create_friendship(storage: &dyn Storage, data: FriendshipCreate) -> ApiResult<Friendship> {
    if data.friend_from_id == data.friend_to_id {
        return Err(ApiError::BadRequest(
            "Cannot send a friend request to yourself".to_string(),
        ));
    }

    require_user(storage, data.friend_from_id).await?;
    require_user(storage, data.friend_to_id).await?;

    if storage
        .find_friendship(data.friend_from_id, data.friend_to_id)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Friendship already exists".to_string()));
    }

    let friendship = Friendship::new(data, Utc::now());
    storage.insert_friendship(&friendship).await?;

    info!(
        "Friend request {} from {} to {}",
        friendship.id, friendship.friend_from_id, friendship.friend_to_id
    );
    Ok(friendship)
}

pub async fn list_friendships(storage: &dyn Storage) -> ApiResult<Vec<Friendship>> {
    Ok(storage.list_friendships(false).await?)
}

pub async fn get_friendship(storage: &dyn Storage, id: Uuid) -> ApiResult<Friendship> {
    visible(storage.get_friendship(id).await?, false, "Friend")
}

pub async fn update_friendship(
    storage: &dyn Storage,
    id: Uuid,
    update: FriendshipUpdate,
) -> ApiResult<Friendship> {
    let mut friendship = get_friendship(storage, id).await?;
    friendship.apply(update, Utc::now());
    ensure_written(storage.update_friendship(&friendship).await?, "Friend")?;
    Ok(friendship)
}

/// Removes the row so the pair can send a new request later
pub async fn delete_friendship(storage: &dyn Storage, id: Uuid) -> ApiResult<Friendship> {
    let friendship = get_friendship(storage, id).await?;
    ensure_written(storage.delete_friendship(id).await?, "Friend")?;

    info!("Deleted friendship {}", id);
    Ok(friendship)
}

/// Friendships on either side of `user_id`, filtered by answer
pub async fn friendships_by_status(
    storage: &dyn Storage,
    user_id: Uuid,
    query: &FriendStatusQuery,
) -> ApiResult<Vec<Friendship>> {
    let friendships = storage.list_friendships_for_user(user_id).await?;
    Ok(friendships
        .into_iter()
        .filter(|friendship| friendship.matches_status(query))
        .collect())
}

/// Unanswered requests addressed to `user_id`
pub async fn pending_requests(
    storage: &dyn Storage,
    user_id: Uuid,
    include_deleted: bool,
) -> ApiResult<Vec<Friendship>> {
    let friendships = storage.list_friendships_for_user(user_id).await?;
    Ok(friendships
        .into_iter()
        .filter(|friendship| {
            friendship.is_pending_for(user_id) && friendship.meta.is_visible(include_deleted)
        })
        .collect())
}
