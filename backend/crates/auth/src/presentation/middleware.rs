//! Auth Middleware
//!
//! `check_auth_session` resolves the session cookie on every request;
//! `require_admin` guards the management routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::cookie::extract_cookie;
use platform::flash::Flash;
use platform::render::Viewer;

use crate::application::{CheckSessionUseCase, CurrentUser};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::presentation::handlers::AuthAppState;

/// Where anonymous visitors of protected pages are sent
pub const LOGIN_PATH: &str = "/login";

// Takes the token rather than the request: `Request` is not `Sync`
async fn resolve_user<R>(state: &AuthAppState<R>, token: Option<String>) -> Option<CurrentUser>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone())
        .current(token.as_deref())
        .await
}

fn session_token<R>(state: &AuthAppState<R>, req: &Request) -> Option<String>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    extract_cookie(req.headers(), &state.config.session_cookie_name)
}

fn attach(req: &mut Request, user: CurrentUser) {
    req.extensions_mut().insert(Viewer::admin(user.name.clone()));
    req.extensions_mut().insert(user);
}

/// Middleware that checks the session but doesn't require it
///
/// Inserts [`Viewer`] and [`CurrentUser`] into request extensions when the
/// visitor is signed in.
pub async fn check_auth_session<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if req.extensions().get::<CurrentUser>().is_none() {
        let token = session_token(&state, &req);
        if let Some(user) = resolve_user(&state, token).await {
            attach(&mut req, user);
        }
    }
    next.run(req).await
}

/// Middleware that requires a valid session
///
/// Anonymous visitors are redirected to the login page with a flash.
pub async fn require_admin<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request,
    next: Next,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if req.extensions().get::<CurrentUser>().is_some() {
        return next.run(req).await;
    }

    let token = session_token(&state, &req);
    match resolve_user(&state, token).await {
        Some(user) => {
            attach(&mut req, user);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "Anonymous access to protected page");
            state
                .pages
                .redirect(LOGIN_PATH, Flash::info("Please log in to access this page."))
        }
    }
}
