//! HTTP Handlers - admin CRUD
//!
//! One set of generic handlers serves every entity kind; the router
//! instantiates them per kind. Access control is applied by the caller
//! (see `auth::require_admin`).

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::Response;
use kernel::validation::{FieldErrors, FormMode};
use platform::flash::{Flash, IncomingFlash};
use platform::form::read_form;
use platform::render::{FormView, Page, Viewer};

use crate::domain::{ContentRepository, EntityId, EntityRepository};
use crate::error::ContentError;
use crate::presentation::forms::{EntityForm, IMAGE_FIELD};
use crate::presentation::handlers::{ContentAppState, SharedImageStore};

fn add_action<E: EntityForm>() -> String {
    format!("/add-{}", E::KIND.slug())
}

fn edit_action<E: EntityForm>(id: EntityId<E>) -> String {
    format!("/edit-{}/{}", E::KIND.slug(), id)
}

fn form_page<E: EntityForm>(form: FormView, viewer: Viewer, flash: Option<Flash>) -> Page {
    let title = match form.mode {
        FormMode::Create => format!("Add {}", E::KIND.label().to_lowercase()),
        FormMode::Edit => format!("Edit {}", E::KIND.label().to_lowercase()),
    };
    Page::new("entity_form", title)
        .with_form(form)
        .with_flash(flash)
        .with_viewer(viewer)
}

/// Re-render the form after a rejected submission
///
/// Field-level problems come back as 422 with messages next to the fields;
/// anything else keeps the form and shows a flash.
async fn reject<E, R, I>(
    state: &ContentAppState<R, I>,
    form: FormView,
    viewer: Viewer,
    err: ContentError,
) -> Response
where
    E: EntityForm,
    R: ContentRepository,
    I: SharedImageStore,
{
    if matches!(err, ContentError::NotFound { .. }) {
        return state.error_page(viewer, err).await;
    }
    err.log();

    let (status, form, flash) = match err.field_errors(IMAGE_FIELD) {
        Some(errors) => (StatusCode::UNPROCESSABLE_ENTITY, form.with_errors(errors), None),
        None => (
            err.status_code(),
            form,
            Some(Flash::error(err.user_message())),
        ),
    };
    state
        .pages
        .render(status, &form_page::<E>(form, viewer, flash))
}

fn validation_failed(errors: FieldErrors) -> ContentError {
    ContentError::Validation(errors)
}

// ============================================================================
// Create
// ============================================================================

/// GET /add-<entity>
pub async fn add_form<E, R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let form = FormView::new(E::form(), FormMode::Create, add_action::<E>());
    state
        .pages
        .render(StatusCode::OK, &form_page::<E>(form, viewer, flash))
}

/// POST /add-<entity>
pub async fn create<E, R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    request: Request,
) -> Response
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let form = FormView::new(E::form(), FormMode::Create, add_action::<E>());

    let mut submission = match read_form(request, state.config.max_upload_bytes).await {
        Ok(submission) => submission,
        Err(e) => return reject::<E, R, I>(&state, form, viewer, e.into()).await,
    };
    let form = form.with_values(submission.values().clone());

    if let Err(errors) = E::form().validate(&submission, FormMode::Create) {
        return reject::<E, R, I>(&state, form, viewer, validation_failed(errors)).await;
    }
    let fields = match E::fields_from(&submission) {
        Ok(fields) => fields,
        Err(e) => return reject::<E, R, I>(&state, form, viewer, e).await,
    };
    let upload = submission.take_file(IMAGE_FIELD);

    match state.manage::<E>().create(fields, upload).await {
        Ok(_) => state.pages.redirect(
            E::KIND.listing_path(),
            Flash::success(format!("{} added.", E::KIND.label())),
        ),
        Err(e) => reject::<E, R, I>(&state, form, viewer, e).await,
    }
}

// ============================================================================
// Edit
// ============================================================================

/// GET /edit-<entity>/{id}
pub async fn edit_form<E, R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
    Path(id): Path<i64>,
) -> Response
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let id = EntityId::<E>::new(id);
    let entity = match state.manage::<E>().get(id).await {
        Ok(entity) => entity,
        Err(e) => return state.error_page(viewer, e).await,
    };

    let form = FormView::new(E::form(), FormMode::Edit, edit_action(id))
        .with_values(entity.form_values())
        .with_current_image(entity.image().map(|image| image.to_string()));
    state
        .pages
        .render(StatusCode::OK, &form_page::<E>(form, viewer, flash))
}

/// POST /edit-<entity>/{id}
///
/// Fields are overwritten; the image only when a new file is sent.
pub async fn update<E, R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    Path(id): Path<i64>,
    request: Request,
) -> Response
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let id = EntityId::<E>::new(id);
    let manage = state.manage::<E>();

    let current = match manage.get(id).await {
        Ok(entity) => entity,
        Err(e) => return state.error_page(viewer, e).await,
    };
    let form = FormView::new(E::form(), FormMode::Edit, edit_action(id))
        .with_current_image(current.image().map(|image| image.to_string()));

    let mut submission = match read_form(request, state.config.max_upload_bytes).await {
        Ok(submission) => submission,
        Err(e) => {
            let form = form.with_values(current.form_values());
            return reject::<E, R, I>(&state, form, viewer, e.into()).await;
        }
    };
    let form = form.with_values(submission.values().clone());

    if let Err(errors) = E::form().validate(&submission, FormMode::Edit) {
        return reject::<E, R, I>(&state, form, viewer, validation_failed(errors)).await;
    }
    let fields = match E::fields_from(&submission) {
        Ok(fields) => fields,
        Err(e) => return reject::<E, R, I>(&state, form, viewer, e).await,
    };
    let upload = submission.take_file(IMAGE_FIELD);

    match manage.update(id, fields, upload).await {
        Ok(_) => state.pages.redirect(
            E::KIND.listing_path(),
            Flash::success(format!("{} updated.", E::KIND.label())),
        ),
        Err(e) => reject::<E, R, I>(&state, form, viewer, e).await,
    }
}

// ============================================================================
// Delete
// ============================================================================

/// POST /delete-<entity>/{id}
pub async fn delete<E, R, I>(
    State(state): State<ContentAppState<R, I>>,
    viewer: Viewer,
    Path(id): Path<i64>,
) -> Response
where
    E: EntityForm,
    R: ContentRepository + EntityRepository<E>,
    I: SharedImageStore,
{
    let id = EntityId::<E>::new(id);
    match state.manage::<E>().delete(id).await {
        Ok(_) => state.pages.redirect(
            E::KIND.listing_path(),
            Flash::success(format!("{} deleted.", E::KIND.label())),
        ),
        Err(e @ ContentError::NotFound { .. }) => state.error_page(viewer, e).await,
        Err(e) => {
            e.log();
            state.pages.redirect(E::KIND.listing_path(), Flash::error(e.user_message()))
        }
    }
}
