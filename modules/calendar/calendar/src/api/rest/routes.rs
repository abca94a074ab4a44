use std::sync::Arc;

use axum::routing::{get, put};
use axum::{Extension, Router, middleware};

use super::auth::{self, AuthState, JwtKeys};
use super::handlers;
use crate::domain::service::Service;

pub const BASE_PATH: &str = "/calendar/v1";

/// All calendar routes, each behind token authentication.
#[must_use]
pub fn router(service: Arc<Service>, keys: Arc<JwtKeys>) -> Router {
    let auth_state = AuthState {
        keys,
        service: service.clone(),
    };

    Router::new()
        .route(
            &format!("{BASE_PATH}/events"),
            get(handlers::list_events).post(handlers::upsert_event),
        )
        .route(
            &format!("{BASE_PATH}/events/{{id}}"),
            get(handlers::get_event)
                .post(handlers::create_event)
                .put(handlers::replace_event)
                .delete(handlers::delete_event),
        )
        .route(
            &format!("{BASE_PATH}/user/timezone"),
            put(handlers::update_timezone),
        )
        .route(&format!("{BASE_PATH}/metrics"), get(handlers::metrics))
        .layer(middleware::from_fn_with_state(auth_state, auth::authenticate))
        .layer(Extension(service))
}
