//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors.

mod app;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, bail};
use auth::domain::AuthSessionRepository;
use auth::{AuthAppState, AuthConfig, BootstrapAdminInput, BootstrapAdminUseCase, PgAuthRepository};
use base64::Engine;
use base64::engine::general_purpose;
use content::application::config::DEFAULT_MAX_UPLOAD_BYTES;
use content::{ContentAppState, ContentConfig, FsImageStore, PgContentRepository};
use platform::password::PasswordPolicy;
use platform::render::{HtmlRenderer, Pages};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SITE_NAME: &str = "Sports Club";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,content=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_repo = PgAuthRepository::new(pool.clone());

    // Startup cleanup: remove expired sessions
    // Errors here should not prevent server startup
    match auth_repo.cleanup_expired_sessions().await {
        Ok(sessions) => {
            tracing::info!(
                sessions_deleted = sessions,
                "Auth session cleanup completed"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Auth session cleanup failed, continuing anyway"
            );
        }
    }

    let auth_config = auth_config()?;
    bootstrap_admin(&auth_repo, &auth_config).await;

    let content_config = content_config()?;
    tracing::info!(
        upload_dir = %content_config.upload_dir.display(),
        max_upload_bytes = content_config.max_upload_bytes,
        "Content configuration loaded"
    );

    let pages = Pages::new(
        Arc::new(HtmlRenderer::new(
            SITE_NAME,
            content_config.upload_url_prefix.clone(),
        )),
        auth_config.cookie_secure,
    );

    let images = FsImageStore::new(content_config.upload_dir.clone());
    let auth_state = AuthAppState::new(auth_repo, auth_config, pages.clone());
    let content_state = ContentAppState::new(
        PgContentRepository::new(pool),
        images,
        content_config,
        pages,
    );

    // Build router
    let app = app::build_app(auth_state, content_state);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Auth configuration from the environment
fn auth_config() -> anyhow::Result<AuthConfig> {
    let mut config = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => {
            let secret_bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())
                .context("SESSION_SECRET must be base64")?;
            let secret: [u8; 32] = secret_bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes"))?;
            AuthConfig {
                session_secret: secret,
                ..AuthConfig::default()
            }
        }
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("SESSION_SECRET not set, sessions will not survive a restart");
            AuthConfig::with_random_secret()
        }
        Err(_) => bail!("SESSION_SECRET must be set in production"),
    };

    config.cookie_secure = match env::var("COOKIE_SECURE") {
        Ok(value) => parse_flag(&value).context("COOKIE_SECURE must be true or false")?,
        Err(_) => !cfg!(debug_assertions),
    };

    if let Ok(policy) = env::var("PASSWORD_POLICY") {
        config.password_policy = policy
            .parse::<PasswordPolicy>()
            .map_err(|e| anyhow::anyhow!("PASSWORD_POLICY: {e}"))?;
    }

    config.password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|pepper| !pepper.is_empty())
        .map(String::into_bytes);

    Ok(config)
}

/// Content configuration from the environment
fn content_config() -> anyhow::Result<ContentConfig> {
    let mut config = match env::var("UPLOAD_DIR") {
        Ok(dir) => ContentConfig::with_upload_dir(dir),
        Err(_) => ContentConfig::default(),
    };

    config.max_upload_bytes = match env::var("MAX_UPLOAD_BYTES") {
        Ok(value) => value
            .trim()
            .parse()
            .context("MAX_UPLOAD_BYTES must be a number of bytes")?,
        Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
    };

    Ok(config)
}

/// Create the first admin from `ADMIN_*` when the users table is empty
///
/// Failures are logged; the site still serves public pages.
async fn bootstrap_admin(repo: &PgAuthRepository, config: &AuthConfig) {
    let (Ok(email), Ok(password)) = (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) else {
        tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD not set, bootstrap skipped");
        return;
    };
    let name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());

    let bootstrap = BootstrapAdminUseCase::new(Arc::new(repo.clone()), Arc::new(config.clone()));
    match bootstrap
        .execute(BootstrapAdminInput {
            name,
            email,
            password,
        })
        .await
    {
        Ok(Some(user_id)) => tracing::info!(user_id = %user_id, "Bootstrap admin created"),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Bootstrap admin failed, continuing anyway"),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
