//! Router composition
//!
//! Public pages, auth routes, admin CRUD behind the session guard, uploaded
//! images, and the 404 fallback, all under the session middleware.

use auth::domain::{AuthSessionRepository, UserRepository};
use auth::{AuthAppState, auth_router, check_auth_session, require_admin};
use axum::Router;
use axum::middleware::from_fn_with_state;
use content::presentation::SharedImageStore;
use content::presentation::handlers::not_found;
use content::domain::ContentRepository;
use content::{ContentAppState, admin_router, public_router};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn build_app<A, R, I>(auth: AuthAppState<A>, content: ContentAppState<R, I>) -> Router
where
    A: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
    R: ContentRepository,
    I: SharedImageStore,
{
    let uploads = ServeDir::new(&content.config.upload_dir);
    let upload_prefix = content.config.upload_url_prefix.clone();

    let admin = admin_router(content.clone())
        .route_layer(from_fn_with_state(auth.clone(), require_admin::<A>));
    let fallback = Router::new()
        .fallback(not_found::<R, I>)
        .with_state(content.clone());

    Router::new()
        .merge(public_router(content))
        .merge(auth_router(auth.clone()))
        .merge(admin)
        .nest_service(&upload_prefix, uploads)
        .merge(fallback)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(from_fn_with_state(auth, check_auth_session::<A>)),
        )
}
