//! HTTP Handlers

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::validation::{FieldErrors, FormMode, FormSubmission};
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};
use platform::flash::{Flash, IncomingFlash};
use platform::form::read_form;
use platform::render::{FormView, Page, Pages, Viewer};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{SignInInput, SignInUseCase, SignOutUseCase, SignUpInput, SignUpUseCase};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult, INVALID_CREDENTIALS_MESSAGE};
use crate::presentation::forms::{LOGIN_FORM, LoginInput, REGISTER_FORM, RegisterInput};

/// Auth forms carry no files
const AUTH_FORM_LIMIT: usize = 64 * 1024;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub pages: Pages,
}

impl<R> AuthAppState<R>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    pub fn new(repo: R, config: AuthConfig, pages: Pages) -> Self {
        Self {
            repo: Arc::new(repo),
            config: Arc::new(config),
            pages,
        }
    }
}

fn register_page(viewer: Viewer, form: FormView, flash: Option<Flash>) -> Page {
    Page::new("register", "Register user")
        .with_form(form)
        .with_flash(flash)
        .with_viewer(viewer)
}

fn login_page(viewer: Viewer, form: FormView, flash: Option<Flash>) -> Page {
    Page::new("login", "Log in")
        .with_form(form)
        .with_flash(flash)
        .with_viewer(viewer)
}

async fn read_auth_form(request: Request) -> Result<FormSubmission, Response> {
    read_form(request, AUTH_FORM_LIMIT).await.map_err(|e| {
        tracing::debug!(error = %e, "Unreadable auth form");
        kernel::error::app_error::AppError::from(e).into_response()
    })
}

// ============================================================================
// Register
// ============================================================================

/// GET /register
pub async fn register_form<R>(
    State(state): State<AuthAppState<R>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let form = FormView::new(&REGISTER_FORM, FormMode::Create, "/register");
    state
        .pages
        .render(StatusCode::OK, &register_page(viewer, form, flash))
}

/// POST /register
///
/// The signed-in admin stays signed in; the new account can log in
/// separately.
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    viewer: Viewer,
    request: Request,
) -> AuthResult<Response>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let submission = match read_auth_form(request).await {
        Ok(submission) => submission,
        Err(response) => return Ok(response),
    };

    let rerender = |status: StatusCode, errors: FieldErrors, flash: Option<Flash>| {
        let form = FormView::new(&REGISTER_FORM, FormMode::Create, "/register")
            .with_values(submission.values().clone())
            .with_errors(errors);
        state
            .pages
            .render(status, &register_page(viewer.clone(), form, flash))
    };

    if let Err(errors) = REGISTER_FORM.validate(&submission, FormMode::Create) {
        return Ok(rerender(StatusCode::UNPROCESSABLE_ENTITY, errors, None));
    }

    let input = RegisterInput::from_submission(&submission);
    let use_case = SignUpUseCase::new(state.repo.clone(), state.config.clone());

    let result = use_case
        .execute(SignUpInput {
            name: input.name,
            email: input.email,
            password: input.password,
        })
        .await;

    match result {
        Ok(output) => Ok(state.pages.redirect(
            "/",
            Flash::success(format!("User {} registered.", output.name)),
        )),
        Err(AuthError::Validation(errors)) => {
            Ok(rerender(StatusCode::UNPROCESSABLE_ENTITY, errors, None))
        }
        Err(e @ AuthError::EmailTaken) => {
            e.log();
            Ok(rerender(
                StatusCode::CONFLICT,
                FieldErrors::default(),
                Some(Flash::error(e.to_string())),
            ))
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// Login
// ============================================================================

/// GET /login
pub async fn login_form<R>(
    State(state): State<AuthAppState<R>>,
    viewer: Viewer,
    IncomingFlash(flash): IncomingFlash,
) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if viewer.is_admin() {
        return Redirect::to("/").into_response();
    }
    let form = FormView::new(&LOGIN_FORM, FormMode::Create, "/login");
    state
        .pages
        .render(StatusCode::OK, &login_page(viewer, form, flash))
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    viewer: Viewer,
    request: Request,
) -> AuthResult<Response>
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if viewer.is_admin() {
        return Ok(Redirect::to("/").into_response());
    }

    let submission = match read_auth_form(request).await {
        Ok(submission) => submission,
        Err(response) => return Ok(response),
    };

    let rerender = |status: StatusCode, errors: FieldErrors, flash: Option<Flash>| {
        let form = FormView::new(&LOGIN_FORM, FormMode::Create, "/login")
            .with_values(submission.values().clone())
            .with_errors(errors);
        state
            .pages
            .render(status, &login_page(viewer.clone(), form, flash))
    };

    if let Err(errors) = LOGIN_FORM.validate(&submission, FormMode::Create) {
        return Ok(rerender(StatusCode::UNPROCESSABLE_ENTITY, errors, None));
    }

    let input = LoginInput::from_submission(&submission);
    let use_case = SignInUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let output = match use_case
        .execute(SignInInput {
            email: input.email,
            password: input.password,
        })
        .await
    {
        Ok(output) => output,
        Err(e @ AuthError::InvalidCredentials) => {
            e.log();
            return Ok(rerender(
                StatusCode::UNAUTHORIZED,
                FieldErrors::default(),
                Some(Flash::error(INVALID_CREDENTIALS_MESSAGE)),
            ));
        }
        Err(e) => return Err(e),
    };

    let mut response = state.pages.redirect("/", Flash::success("Logged in."));
    let cookie = set_cookie_header(&state.config.session_cookie(), &output.session_token)
        .ok_or_else(|| AuthError::Internal("Session cookie is not a valid header".into()))?;
    response.headers_mut().append(header::SET_COOKIE, cookie);

    Ok(response)
}

// ============================================================================
// Logout
// ============================================================================

/// GET|POST /logout
pub async fn logout<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> Response
where
    R: UserRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared either way
        if let Err(e) = use_case.execute(&token).await {
            e.log();
        }
    }

    let mut response = state.pages.redirect("/", Flash::info("Logged out."));
    if let Some(cookie) = delete_cookie_header(&state.config.session_cookie()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
