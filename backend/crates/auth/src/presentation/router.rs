//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::get,
};

use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_admin;

/// `/login` is public; `/register` and `/logout` need a session
///
/// Session resolution for the viewer is left to
/// [`check_auth_session`](crate::presentation::middleware::check_auth_session),
/// layered once over the whole application.
pub fn auth_router<R>(state: AuthAppState<R>) -> Router
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let protected = Router::new()
        .route(
            "/register",
            get(handlers::register_form::<R>).post(handlers::register::<R>),
        )
        .route(
            "/logout",
            get(handlers::logout::<R>).post(handlers::logout::<R>),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin::<R>));

    Router::new()
        .route(
            "/login",
            get(handlers::login_form::<R>).post(handlers::login::<R>),
        )
        .merge(protected)
        .with_state(state)
}
