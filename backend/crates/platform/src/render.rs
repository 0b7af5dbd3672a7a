//! Page model and rendering
//!
//! Handlers never produce markup themselves. They build a [`Page`] (view
//! name, serialisable payload, optional form state, pending flash, viewer) and
//! hand it to [`Pages`], which owns the configured [`PageRenderer`] and the
//! flash cookie.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use kernel::validation::{FieldErrors, FormMode, FormSpec, InputKind};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::cookie::{CookieConfig, delete_cookie_header, set_cookie_header};
use crate::flash::{FLASH_COOKIE_NAME, Flash};

// ============================================================================
// Viewer
// ============================================================================

/// Who is looking at the page
///
/// Inserted into request extensions by the session middleware; anonymous
/// when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub name: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.name.is_some()
    }
}

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Viewer>().cloned().unwrap_or_default())
    }
}

// ============================================================================
// Page model
// ============================================================================

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize page payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Form state for a rendered form
#[derive(Debug, Clone)]
pub struct FormView {
    pub spec: &'static FormSpec,
    pub mode: FormMode,
    pub action: String,
    pub values: BTreeMap<String, String>,
    pub errors: FieldErrors,
    /// Image currently stored for the record being edited
    pub current_image: Option<String>,
}

impl FormView {
    pub fn new(spec: &'static FormSpec, mode: FormMode, action: impl Into<String>) -> Self {
        Self {
            spec,
            mode,
            action: action.into(),
            values: BTreeMap::new(),
            errors: FieldErrors::default(),
            current_image: None,
        }
    }

    pub fn with_values(mut self, values: BTreeMap<String, String>) -> Self {
        self.values = values;
        self
    }

    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_current_image(mut self, image: Option<String>) -> Self {
        self.current_image = image;
        self
    }
}

/// Everything a renderer needs for one response
#[derive(Debug, Clone)]
pub struct Page {
    pub view: &'static str,
    pub title: String,
    pub payload: Value,
    pub form: Option<FormView>,
    pub flash: Option<Flash>,
    pub viewer: Viewer,
}

impl Page {
    pub fn new(view: &'static str, title: impl Into<String>) -> Self {
        Self {
            view,
            title: title.into(),
            payload: Value::Object(Default::default()),
            form: None,
            flash: None,
            viewer: Viewer::anonymous(),
        }
    }

    pub fn with_payload<T: Serialize>(mut self, payload: &T) -> Result<Self, RenderError> {
        self.payload = serde_json::to_value(payload)?;
        Ok(self)
    }

    pub fn with_form(mut self, form: FormView) -> Self {
        self.form = Some(form);
        self
    }

    pub fn with_flash(mut self, flash: Option<Flash>) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_viewer(mut self, viewer: Viewer) -> Self {
        self.viewer = viewer;
        self
    }
}

/// Turns a page model into markup
pub trait PageRenderer: Send + Sync + 'static {
    fn render(&self, page: &Page) -> Result<String, RenderError>;
}

// ============================================================================
// Pages (response construction)
// ============================================================================

/// Renderer plus the flash cookie settings, shared through handler state
#[derive(Clone)]
pub struct Pages {
    renderer: Arc<dyn PageRenderer>,
    flash_cookie: CookieConfig,
}

impl Pages {
    pub fn new(renderer: Arc<dyn PageRenderer>, secure_cookies: bool) -> Self {
        Self {
            renderer,
            flash_cookie: CookieConfig::named(FLASH_COOKIE_NAME, secure_cookies).with_max_age(60),
        }
    }

    /// Render `page` with `status`; a displayed flash is cleared
    pub fn render(&self, status: StatusCode, page: &Page) -> Response {
        match self.renderer.render(page) {
            Ok(html) => {
                let mut response = (status, Html(html)).into_response();
                if page.flash.is_some() {
                    if let Some(value) = delete_cookie_header(&self.flash_cookie) {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                }
                response
            }
            Err(e) => {
                tracing::error!(view = page.view, error = %e, "Page rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response()
            }
        }
    }

    /// 303 redirect carrying a flash for the next page
    pub fn redirect(&self, location: &str, flash: Flash) -> Response {
        let mut response = Redirect::to(location).into_response();
        if let Some(value) = set_cookie_header(&self.flash_cookie, &flash.encode()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        response
    }
}

// ============================================================================
// Built-in HTML renderer
// ============================================================================

/// Plain server-side HTML without a template engine
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_name: String,
    upload_prefix: String,
}

impl HtmlRenderer {
    pub fn new(site_name: impl Into<String>, upload_prefix: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            upload_prefix: upload_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    fn image_src(&self, reference: &str) -> String {
        format!("{}/{}", self.upload_prefix, reference)
    }

    fn nav(&self, out: &mut String, viewer: &Viewer) {
        const PUBLIC_LINKS: &[(&str, &str)] = &[
            ("/", "Home"),
            ("/history", "History"),
            ("/statute", "Statute"),
            ("/management", "Management"),
            ("/teams", "Teams"),
            ("/projects", "Projects"),
            ("/contact", "Contact"),
            ("/regulations", "Regulations"),
        ];
        const ADMIN_LINKS: &[(&str, &str)] = &[
            ("/add-sponsor", "Add sponsor"),
            ("/add-management", "Add member"),
            ("/add-team", "Add team"),
            ("/add-project", "Add project"),
            ("/register", "Register user"),
        ];

        out.push_str("<nav>");
        for (href, label) in PUBLIC_LINKS {
            let _ = write!(out, "<a href=\"{}\">{}</a> ", href, label);
        }
        if viewer.is_admin() {
            for (href, label) in ADMIN_LINKS {
                let _ = write!(out, "<a href=\"{}\">{}</a> ", href, label);
            }
            out.push_str(
                "<form method=\"post\" action=\"/logout\" class=\"inline\"><button type=\"submit\">Log out</button></form>",
            );
        } else {
            out.push_str("<a href=\"/login\">Log in</a>");
        }
        out.push_str("</nav>");
    }

    fn form(&self, out: &mut String, form: &FormView) {
        let enctype = if form.spec.has_file_field() {
            " enctype=\"multipart/form-data\""
        } else {
            ""
        };
        let _ = write!(
            out,
            "<form method=\"post\" action=\"{}\"{}>",
            escape(&form.action),
            enctype
        );

        for field in form.spec.fields {
            let required = if field.is_required(form.mode) { " required" } else { "" };
            let value = form.values.get(field.name).map(String::as_str).unwrap_or("");
            let _ = write!(
                out,
                "<p><label for=\"{name}\">{label}</label> ",
                name = field.name,
                label = escape(field.label)
            );

            match field.input {
                InputKind::TextArea => {
                    let _ = write!(
                        out,
                        "<textarea id=\"{name}\" name=\"{name}\"{required}>{value}</textarea>",
                        name = field.name,
                        value = escape(value)
                    );
                }
                InputKind::File => {
                    if let Some(image) = &form.current_image {
                        let _ = write!(
                            out,
                            "<img src=\"{}\" alt=\"current\" class=\"thumb\"> ",
                            escape(&self.image_src(image))
                        );
                    }
                    let _ = write!(
                        out,
                        "<input type=\"file\" id=\"{name}\" name=\"{name}\" accept=\".jpg,.jpeg,.png\"{required}>",
                        name = field.name
                    );
                }
                kind => {
                    let ty = match kind {
                        InputKind::Email => "email",
                        InputKind::Password => "password",
                        InputKind::Number => "number",
                        _ => "text",
                    };
                    // Passwords are never echoed back
                    let value = if kind == InputKind::Password { "" } else { value };
                    let _ = write!(
                        out,
                        "<input type=\"{ty}\" id=\"{name}\" name=\"{name}\" value=\"{value}\"{required}>",
                        name = field.name,
                        value = escape(value)
                    );
                }
            }

            if let Some(messages) = form.errors.get(field.name) {
                for message in messages {
                    let _ = write!(out, " <span class=\"error\">{}</span>", escape(message));
                }
            }
            out.push_str("</p>");
        }

        let _ = write!(
            out,
            "<button type=\"submit\">{}</button></form>",
            escape(form.spec.submit_label)
        );
    }

    fn items(&self, out: &mut String, payload: &Value, viewer: &Viewer) {
        let Some(items) = payload.get("items").and_then(Value::as_array) else {
            return;
        };
        let slug = payload.get("slug").and_then(Value::as_str);

        out.push_str("<section class=\"items\">");
        for item in items {
            let Some(fields) = item.as_object() else {
                continue;
            };
            out.push_str("<article>");

            if let Some(image) = fields.get("image").and_then(Value::as_str) {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"\">",
                    escape(&self.image_src(image))
                );
            }
            if let Some(name) = fields.get("name").and_then(Value::as_str) {
                let _ = write!(out, "<h2>{}</h2>", escape(name));
            }

            out.push_str("<dl>");
            for (key, value) in fields {
                if matches!(key.as_str(), "id" | "name" | "image" | "order") {
                    continue;
                }
                let text = match value {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    _ => continue,
                };
                if text.is_empty() {
                    continue;
                }
                let _ = write!(out, "<dt>{}</dt><dd>{}</dd>", escape(key), escape(&text));
            }
            out.push_str("</dl>");

            if let (true, Some(slug), Some(id)) =
                (viewer.is_admin(), slug, fields.get("id").and_then(Value::as_i64))
            {
                let _ = write!(
                    out,
                    "<a href=\"/edit-{slug}/{id}\">Edit</a> \
                     <form method=\"post\" action=\"/delete-{slug}/{id}\" class=\"inline\">\
                     <button type=\"submit\">Delete</button></form>"
                );
            }
            out.push_str("</article>");
        }
        out.push_str("</section>");
    }

    fn sponsors(&self, out: &mut String, payload: &Value, viewer: &Viewer) {
        let Some(sponsors) = payload.get("sponsors").and_then(Value::as_array) else {
            return;
        };
        out.push_str("<footer><ul class=\"sponsors\">");
        for sponsor in sponsors {
            let name = sponsor.get("name").and_then(Value::as_str).unwrap_or("");
            let image = sponsor.get("image").and_then(Value::as_str).unwrap_or("");
            let logo = format!(
                "<img src=\"{}\" alt=\"{}\">",
                escape(&self.image_src(image)),
                escape(name)
            );
            out.push_str("<li>");
            match sponsor.get("website_url").and_then(Value::as_str) {
                Some(url) if !url.is_empty() => {
                    let _ = write!(out, "<a href=\"{}\">{}</a>", escape(url), logo);
                }
                _ => out.push_str(&logo),
            }
            if let (true, Some(id)) = (viewer.is_admin(), sponsor.get("id").and_then(Value::as_i64)) {
                let _ = write!(
                    out,
                    " <a href=\"/edit-sponsor/{id}\">Edit</a> \
                     <form method=\"post\" action=\"/delete-sponsor/{id}\" class=\"inline\">\
                     <button type=\"submit\">Delete</button></form>"
                );
            }
            out.push_str("</li>");
        }
        out.push_str("</ul></footer>");
    }
}

impl PageRenderer for HtmlRenderer {
    fn render(&self, page: &Page) -> Result<String, RenderError> {
        let mut out = String::with_capacity(4096);

        let _ = write!(
            out,
            "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
             <title>{} | {}</title></head><body class=\"view-{}\">",
            escape(&page.title),
            escape(&self.site_name),
            page.view
        );

        self.nav(&mut out, &page.viewer);

        if let Some(flash) = &page.flash {
            let _ = write!(
                out,
                "<div class=\"flash flash-{}\">{}</div>",
                flash.level.as_str(),
                escape(&flash.message)
            );
        }

        let _ = write!(out, "<main><h1>{}</h1>", escape(&page.title));

        if let Some(body) = page.payload.get("body").and_then(Value::as_str) {
            for paragraph in body.split("\n\n") {
                let _ = write!(out, "<p>{}</p>", escape(paragraph));
            }
        }

        if let Some(form) = &page.form {
            self.form(&mut out, form);
        }

        self.items(&mut out, &page.payload, &page.viewer);
        out.push_str("</main>");

        self.sponsors(&mut out, &page.payload, &page.viewer);
        out.push_str("</body></html>");

        Ok(out)
    }
}

/// Minimal HTML escaping for text and attribute values
pub fn escape(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
