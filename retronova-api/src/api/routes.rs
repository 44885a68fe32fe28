//! API route definitions

use super::{handlers::*, ApiState};
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_user_routes() -> Router<ApiState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

pub fn create_friend_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/friends",
            get(friends::list_friendships).post(friends::create_friendship),
        )
        .route(
            "/friends/:id",
            get(friends::get_friendship)
                .put(friends::update_friendship)
                .delete(friends::delete_friendship),
        )
        .route("/friends/status/:user_id", get(friends::friendships_by_status))
        .route("/friends/pending/:user_id", get(friends::pending_requests))
}

pub fn create_game_routes() -> Router<ApiState> {
    Router::new()
        .route("/games", get(games::list_games).post(games::create_game))
        .route(
            "/games/:id",
            get(games::get_game)
                .put(games::update_game)
                .delete(games::delete_game),
        )
        .route("/games/:id/restore", post(games::restore_game))
}

pub fn create_arcade_machine_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/arcade_machines",
            get(arcade_machines::list_arcade_machines)
                .post(arcade_machines::create_arcade_machine),
        )
        .route(
            "/arcade_machines/:id",
            get(arcade_machines::get_arcade_machine)
                .put(arcade_machines::update_arcade_machine)
                .delete(arcade_machines::delete_arcade_machine),
        )
        .route(
            "/arcade_machines/:id/restore",
            post(arcade_machines::restore_arcade_machine),
        )
}

pub fn create_party_routes() -> Router<ApiState> {
    Router::new()
        .route("/parties", get(parties::list_parties).post(parties::create_party))
        .route(
            "/parties/:id",
            get(parties::get_party)
                .put(parties::update_party)
                .delete(parties::delete_party),
        )
        .route("/parties/:id/restore", post(parties::restore_party))
}

pub fn create_payment_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route(
            "/payments/:id",
            get(payments::get_payment)
                .put(payments::update_payment)
                .delete(payments::delete_payment),
        )
}

pub fn create_promo_code_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/promo_codes",
            get(promo_codes::list_promo_codes).post(promo_codes::create_promo_code),
        )
        .route("/promo_codes/generate", post(promo_codes::generate_promo_code))
        .route("/promo_codes/use", post(promo_codes::use_promo_code))
        .route("/promo_codes/code/:code", get(promo_codes::get_promo_code_by_code))
        .route(
            "/promo_codes/:id",
            get(promo_codes::get_promo_code)
                .put(promo_codes::update_promo_code)
                .delete(promo_codes::delete_promo_code),
        )
}
