//! HTTP Handlers - public pages

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use platform::flash::{Flash, IncomingFlash};
use platform::render::{Page, Pages, Viewer};
use serde::Serialize;
use std::sync::Arc;

use crate::application::{ContentConfig, ManageEntityUseCase};
use crate::domain::{
    ContentRepository, Entity, EntityRepository, ImageStore, ManagementMember, Project, Sponsor,
    Team,
};
use crate::error::ContentError;

/// Image store usable from shared handler state
pub trait SharedImageStore: ImageStore + Clone + Sync + 'static {}

impl<T> SharedImageStore for T where T: ImageStore + Clone + Sync + 'static {}

/// Shared state for content handlers
#[derive(Clone)]
pub struct ContentAppState<R, I>
where
    R: ContentRepository,
    I: SharedImageStore,
{
    pub repo: Arc<R>,
    pub images: Arc<I>,
    pub config: Arc<ContentConfig>,
    pub pages: Pages,
}

impl<R, I> ContentAppState<R, I>
where
    R: ContentRepository,
    I: SharedImageStore,
{
    pub fn new(repo: R, images: I, config: ContentConfig, pages: Pages) -> Self {
        Self {
            repo: Arc::new(repo),
            images: Arc::new(images),
            config: Arc::new(config),
            pages,
        }
    }

    pub fn manage<E>(&self) -> ManageEntityUseCase<E, R, I>
    where
        E: Entity,
        R: EntityRepository<E>,
    {
        ManageEntityUseCase::new(self.repo.clone(), self.images.clone())
    }

    /// Sponsors for the footer; a failure leaves the footer empty
    pub async fn footer_sponsors(&self) -> Vec<Sponsor> {
        match self.manage::<Sponsor>().list().await {
            Ok(sponsors) => sponsors,
            Err(e) => {
                e.log();
                Vec::new()
            }
        }
    }

    /// Rendered page for an error that has no form to go back to
    pub async fn error_page(&self, viewer: Viewer, err: ContentError) -> Response {
        err.log();
        let sponsors = self.footer_sponsors().await;
        let title = match err {
            ContentError::NotFound { .. } => "Page not found",
            _ => "Something went wrong",
        };
        let body = err.user_message();
        let page = Page::new("error", title).with_viewer(viewer);
        let page = page
            .clone()
            .with_payload(&TextPayload {
                body: &body,
                sponsors: &sponsors,
            })
            .unwrap_or(page);
        self.pages.render(err.status_code(), &page)
    }
}

#[derive(Serialize)]
struct TextPayload<'a> {
    body: &'a str,
    sponsors: &'a [Sponsor],
}

#[derive(Serialize)]
struct ListingPayload<'a, E: Serialize> {
    slug: &'static str,
    items: &'a [E],
    sponsors: &'a [Sponsor],
}

// ============================================================================
// Static pages
// ============================================================================

struct StaticPage {
    view: &'static str,
    title: &'static str,
    body: &'static str,
}

const HOME: StaticPage = StaticPage {
    view: "home",
    title: "Welcome",
    body: "Welcome to the club website.\n\nHere you will find our teams, the people who run the club and the projects we are working on.",
};

const HISTORY: StaticPage = StaticPage {
    view: "history",
    title: "History",
    body: "The club was founded by local players and has grown into a community of teams of every age group.",
};

const STATUTE: StaticPage = StaticPage {
    view: "statute",
    title: "Statute",
    body: "The statute defines the goals of the club, the rights and duties of its members and the way its bodies are elected.",
};

const CONTACT: StaticPage = StaticPage {
    view: "contact",
    title: "Contact",
    body: "Questions about trainings, membership or sponsorship are welcome. Contact the management or any team trainer.",
};

const REGULATIONS: StaticPage = StaticPage {
    view: "regulations",
    title: "Regulations",
    body: "Club regulations apply to every player, parent and trainer taking part in club activities.",
};

async fn render_static<R, I>(
    state: &ContentAppState<R, I>,
    page: &StaticPage,
    viewer: Viewer,
    flash: Option<Flash>,
) -> Response
where
    R: ContentRepository,
    I: SharedImageStore,
{
    let sponsors = state.footer_sponsors().await;
    let payload = TextPayload {
        body: page.body,
        sponsors: &sponsors,
    };

    match Page::new(page.view, page.title).with_payload(&payload) {
        Ok(model) => state.pages.render(
            StatusCode::OK,
            &model.with_flash(flash).with_viewer(viewer),
        ),
        Err(e) => {
            state
                .error_page(viewer, ContentError::Internal(e.to_string()))
                .await
        }
    }
}

macro_rules! static_handler {
    ($name:ident, $page:expr, $doc:literal) => {
        #[doc = $doc]
        pub async fn $name<R, I>(
            State(state): State<ContentAppState<R, I>>,
            viewer: Viewer,
            IncomingFlash(flash): IncomingFlash,
        ) -> Response
        where
            R: ContentRepository,
            I: SharedImageStore,
        {
            render_static(&state, &$page, viewer, flash).await
        }
    };
}

static_handler!(home, HOME, "GET /");
static_handler!(history, HISTORY, "GET /history");
static_handler!(statute, STATUTE, "GET /statute");
static_handler!(contact, CONTACT, "GET /contact");
static_handler!(regulations, REGULATIONS, "GET /regulations");

// ============================================================================
// Listings
// ============================================================================

async fn render_listing<E, R, I>(
    state: &ContentAppState<R, I>,
    view: &'static str,
    title: &'static str,
    viewer: Viewer,
    flash: Option<Flash>,
) -> Response
where
    E: Entity,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let items = match state.manage::<E>().list().await {
        Ok(items) => items,
        Err(e) => return state.error_page(viewer, e).await,
    };
    let sponsors = state.footer_sponsors().await;
    let payload = ListingPayload {
        slug: E::KIND.slug(),
        items: &items,
        sponsors: &sponsors,
    };

    match Page::new(view, title).with_payload(&payload) {
        Ok(model) => state.pages.render(
            StatusCode::OK,
            &model.with_flash(flash).with_viewer(viewer),
        ),
        Err(e) => {
            state
                .error_page(viewer, ContentError::Internal(e.to_string()))
                .await
        }
    }
}

/// GET /management - ordered by `order`, then id
pub async fn management<R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    R: ContentRepository,
    I: SharedImageStore,
{
    render_listing::<ManagementMember, R, I>(&state, "management", "Management", viewer, flash)
        .await
}

/// GET /teams - ordered by `order`, then id
pub async fn teams<R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    R: ContentRepository,
    I: SharedImageStore,
{
    render_listing::<Team, R, I>(&state, "teams", "Teams", viewer, flash).await
}

/// GET /projects
pub async fn projects<R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    R: ContentRepository,
    I: SharedImageStore,
{
    render_listing::<Project, R, I>(&state, "projects", "Projects", viewer, flash).await
}

/// Fallback for unknown paths
pub async fn not_found<R, I>(State(state): State<ContentAppState<R, I>>, viewer: Viewer) -> Response
where
    R: ContentRepository,
    I: SharedImageStore,
{
    state.error_page(
        viewer,
        ContentError::NotFound {
            entity: "Page",
            id: 0,
        },
    )
    .await
}
