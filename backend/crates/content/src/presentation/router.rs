//! Content Routers
//!
//! [`public_router`] serves the site; [`admin_router`] serves the CRUD
//! routes and must be wrapped in the session guard by the caller.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::domain::{ContentRepository, EntityRepository, ManagementMember, Project, Sponsor, Team};
use crate::presentation::admin;
use crate::presentation::forms::EntityForm;
use crate::presentation::handlers::{self, ContentAppState, SharedImageStore};

/// Public pages
pub fn public_router<R, I>(state: ContentAppState<R, I>) -> Router
where
    R: ContentRepository,
    I: SharedImageStore,
{
    Router::new()
        .route("/", get(handlers::home::<R, I>))
        .route("/history", get(handlers::history::<R, I>))
        .route("/statute", get(handlers::statute::<R, I>))
        .route("/contact", get(handlers::contact::<R, I>))
        .route("/regulations", get(handlers::regulations::<R, I>))
        .route("/management", get(handlers::management::<R, I>))
        .route("/teams", get(handlers::teams::<R, I>))
        .route("/projects", get(handlers::projects::<R, I>))
        .with_state(state)
}

/// `/add-*`, `/edit-*/{id}` and `/delete-*/{id}` for every entity kind
pub fn admin_router<R, I>(state: ContentAppState<R, I>) -> Router
where
    R: ContentRepository,
    I: SharedImageStore,
{
    let body_limit = state.config.body_limit();

    let router = Router::new();
    let router = entity_routes::<Sponsor, R, I>(router);
    let router = entity_routes::<ManagementMember, R, I>(router);
    let router = entity_routes::<Team, R, I>(router);
    let router = entity_routes::<Project, R, I>(router);

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

fn entity_routes<E, R, I>(
    router: Router<ContentAppState<R, I>>,
) -> Router<ContentAppState<R, I>>
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let slug = E::KIND.slug();
    router
        .route(
            &format!("/add-{slug}"),
            get(admin::add_form::<E, R, I>).post(admin::create::<E, R, I>),
        )
        .route(
            &format!("/edit-{slug}/{{id}}"),
            get(admin::edit_form::<E, R, I>).post(admin::update::<E, R, I>),
        )
        .route(&format!("/delete-{slug}/{{id}}"), post(admin::delete::<E, R, I>))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use platform::render::{HtmlRenderer, Pages};
    use tower::ServiceExt;

    use super::*;
    use crate::application::ContentConfig;
    use crate::domain::EntityId;
    use crate::infra::{MemoryContentRepository, MemoryImageStore};

    const BOUNDARY: &str = "XCONTENTX";
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    struct TestApp {
        router: Router,
        repo: MemoryContentRepository,
        images: MemoryImageStore,
    }

    fn app() -> TestApp {
        let repo = MemoryContentRepository::new();
        let images = MemoryImageStore::new();
        let pages = Pages::new(Arc::new(HtmlRenderer::new("Club", "/uploads")), false);
        let state = ContentAppState::new(repo.clone(), images.clone(), ContentConfig::default(), pages);
        let router = public_router(state.clone()).merge(admin_router(state));
        TestApp {
            router,
            repo,
            images,
        }
    }

    /// Multipart body; parts with a file name are sent as files
    fn multipart(uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, file_name, content) in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                    name, file_name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn add_sponsor(app: &TestApp, name: &str) -> Response {
        app.router
            .clone()
            .oneshot(multipart(
                "/add-sponsor",
                &[
                    ("img", Some("logo.png"), PNG),
                    ("name", None, name.as_bytes()),
                    ("website_url", None, b"https://acme.example"),
                ],
            ))
            .await
            .unwrap()
    }

    async fn sponsor(app: &TestApp, id: i64) -> Option<Sponsor> {
        EntityRepository::<Sponsor>::get(&app.repo, EntityId::new(id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_static_pages_render() {
        let app = app();
        for uri in ["/", "/history", "/statute", "/contact", "/regulations"] {
            let response = app.router.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_sponsor_created_and_shown_in_footer() {
        let app = app();
        let response = add_sponsor(&app, "Acme").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");

        let stored = sponsor(&app, 1).await.unwrap();
        assert!(stored.image.as_str().ends_with("_logo.png"));
        assert!(app.images.contains(&stored.image).await);

        let html = body_text(app.router.clone().oneshot(get("/")).await.unwrap()).await;
        assert!(html.contains("https://acme.example"));
        assert!(html.contains(&format!("/uploads/{}", stored.image)));
    }

    #[tokio::test]
    async fn test_sponsor_without_image_is_rejected() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(multipart("/add-sponsor", &[("name", None, b"Acme")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("File is required."));
        assert!(html.contains("value=\"Acme\""));
        assert!(sponsor(&app, 1).await.is_none());
        assert!(app.images.is_empty().await);
    }

    #[tokio::test]
    async fn test_disguised_image_is_rejected() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(multipart(
                "/add-sponsor",
                &[("img", Some("logo.png"), b"GIF89a"), ("name", None, b"Acme")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(sponsor(&app, 1).await.is_none());
        assert!(app.images.is_empty().await);
    }

    #[tokio::test]
    async fn test_edit_without_file_keeps_image() {
        let app = app();
        add_sponsor(&app, "Acme").await;
        let before = sponsor(&app, 1).await.unwrap();

        let response = app
            .router
            .clone()
            .oneshot(multipart(
                "/edit-sponsor/1",
                &[("name", None, b"Acme Ltd"), ("website_url", None, b"")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let after = sponsor(&app, 1).await.unwrap();
        assert_eq!(after.name, "Acme Ltd");
        assert_eq!(after.website_url, None);
        assert_eq!(after.image, before.image);
    }

    #[tokio::test]
    async fn test_edit_with_file_replaces_image() {
        let app = app();
        add_sponsor(&app, "Acme").await;
        let before = sponsor(&app, 1).await.unwrap();

        let response = app
            .router
            .clone()
            .oneshot(multipart(
                "/edit-sponsor/1",
                &[("img", Some("new.png"), PNG), ("name", None, b"Acme")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let after = sponsor(&app, 1).await.unwrap();
        assert_ne!(after.image, before.image);
        assert!(app.images.contains(&after.image).await);
        assert!(!app.images.contains(&before.image).await);
    }

    #[tokio::test]
    async fn test_edit_form_is_prefilled() {
        let app = app();
        add_sponsor(&app, "Acme").await;

        let response = app.router.clone().oneshot(get("/edit-sponsor/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("action=\"/edit-sponsor/1\""));
        assert!(html.contains("value=\"Acme\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }

    #[tokio::test]
    async fn test_delete_then_edit_is_not_found() {
        let app = app();
        add_sponsor(&app, "Acme").await;

        let response = app
            .router
            .clone()
            .oneshot(form_post("/delete-sponsor/1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(app.images.is_empty().await);

        let response = app.router.clone().oneshot(get("/edit-sponsor/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .router
            .clone()
            .oneshot(form_post("/delete-sponsor/1", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_rejects_get() {
        let app = app();
        add_sponsor(&app, "Acme").await;

        let response = app.router.clone().oneshot(get("/delete-sponsor/1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(sponsor(&app, 1).await.is_some());
    }

    #[tokio::test]
    async fn test_not_found_page_keeps_sponsor_footer() {
        let app = app();
        add_sponsor(&app, "Acme").await;
        let stored = sponsor(&app, 1).await.unwrap();

        let response = app.router.clone().oneshot(get("/edit-team/99")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let html = body_text(response).await;
        assert!(html.contains("Page not found"));
        assert!(html.contains("https://acme.example"));
        assert!(html.contains(&format!("/uploads/{}", stored.image)));
    }

    #[tokio::test]
    async fn test_missing_team_fields_are_reported() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(multipart(
                "/add-team",
                &[("img", Some("team.png"), PNG), ("name", None, b"U12")],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("class=\"error\""));
        assert!(app.images.is_empty().await);
    }

    #[tokio::test]
    async fn test_management_listed_by_order() {
        let app = app();
        for body in [
            "name=Second&position=Treasurer&order=2",
            "name=First&position=Chair&order=1",
        ] {
            let response = app
                .router
                .clone()
                .oneshot(form_post("/add-management", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(location(&response), "/management");
        }

        let html = body_text(app.router.clone().oneshot(get("/management")).await.unwrap()).await;
        let first = html.find("First").unwrap();
        let second = html.find("Second").unwrap();
        assert!(first < second);
        assert!(html.contains("Chair"));
    }

    #[tokio::test]
    async fn test_project_listing_shows_description() {
        let app = app();
        let response = app
            .router
            .clone()
            .oneshot(multipart(
                "/add-project",
                &[
                    ("img", Some("pitch.png"), PNG),
                    ("name", None, b"New pitch"),
                    ("description", None, b"Artificial turf for the youth teams."),
                ],
            ))
            .await
            .unwrap();
        assert_eq!(location(&response), "/projects");

        let html = body_text(app.router.clone().oneshot(get("/projects")).await.unwrap()).await;
        assert!(html.contains("New pitch"));
        assert!(html.contains("Artificial turf for the youth teams."));
    }
}
