//! Form Validation
//!
//! Declarative per-form rule sets. A form is described once as a static
//! [`FormSpec`]; handlers turn the request body into a [`FormSubmission`] and
//! call [`FormSpec::validate`]. Only a submission that passed validation is
//! bound into the typed input struct of the form.

use serde::Serialize;
use std::collections::BTreeMap;

/// Image extensions accepted by every upload field
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

// ============================================================================
// Declarative rules
// ============================================================================

/// Single validation rule attached to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and not whitespace only
    Required,
    /// At most `n` characters (Unicode scalar values)
    MaxLength(usize),
    /// Email address shape (only checked when non-empty)
    Email,
    /// Absolute http/https URL (only checked when non-empty)
    Url,
    /// Whole number fitting in `i32` (only checked when non-empty)
    Integer,
    /// Must equal the value of another field
    EqualTo(&'static str),
    /// Uploaded jpg/jpeg/png; mandatory on create, optional on edit
    Image,
}

/// How a field is presented by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    Email,
    Password,
    Number,
    File,
}

/// Field declaration
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub input: InputKind,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(
        name: &'static str,
        label: &'static str,
        input: InputKind,
        rules: &'static [Rule],
    ) -> Self {
        Self {
            name,
            label,
            input,
            rules,
        }
    }

    /// Whether the renderer should mark the field as mandatory
    pub fn is_required(&self, mode: FormMode) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Required => true,
            Rule::Image => mode == FormMode::Create,
            _ => false,
        })
    }
}

/// Create forms require every image; edit forms keep the stored one when
/// no new file is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    Create,
    Edit,
}

/// Static description of a whole form
#[derive(Debug, Clone, Copy)]
pub struct FormSpec {
    pub name: &'static str,
    pub submit_label: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSpec {
    /// Whether the form needs `multipart/form-data`
    pub fn has_file_field(&self) -> bool {
        self.fields.iter().any(|f| f.input == InputKind::File)
    }

    /// Validate a submission against every field rule
    ///
    /// Rules of one field stop at the first failure, so a missing value
    /// reports only "required".
    pub fn validate(&self, submission: &FormSubmission, mode: FormMode) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();

        for field in self.fields {
            if let Some(message) = check_field(field, submission, mode) {
                errors.add(field.name, message);
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn check_field(field: &FieldSpec, submission: &FormSubmission, mode: FormMode) -> Option<String> {
    let value = submission.value(field.name);
    let trimmed = value.trim();

    for rule in field.rules {
        let failure = match *rule {
            Rule::Required => trimmed.is_empty().then(|| "This field is required.".to_string()),
            Rule::MaxLength(max) => (value.chars().count() > max)
                .then(|| format!("Field cannot be longer than {} characters.", max)),
            Rule::Email => (!trimmed.is_empty() && !is_valid_email(trimmed))
                .then(|| "Invalid email address.".to_string()),
            Rule::Url => (!trimmed.is_empty() && !is_valid_url(trimmed))
                .then(|| "Invalid URL.".to_string()),
            Rule::Integer => (!trimmed.is_empty() && trimmed.parse::<i32>().is_err())
                .then(|| "Enter a whole number.".to_string()),
            Rule::EqualTo(other) => (value != submission.value(other))
                .then(|| format!("Field must be equal to {}.", other)),
            Rule::Image => check_image(submission.file(field.name), mode),
        };

        if failure.is_some() {
            return failure;
        }
    }

    None
}

fn check_image(file: Option<&UploadedFile>, mode: FormMode) -> Option<String> {
    let Some(file) = file else {
        return match mode {
            FormMode::Create => Some("File is required.".to_string()),
            FormMode::Edit => None,
        };
    };

    let Some(format) = ImageFormat::from_file_name(&file.file_name) else {
        return Some("Only jpg, jpeg and png images are allowed.".to_string());
    };

    if ImageFormat::sniff(&file.bytes) != Some(format) {
        return Some("The file content does not match its extension.".to_string());
    }

    None
}

// ============================================================================
// Shape checks
// ============================================================================

/// Maximum email length (per RFC 5321)
pub const EMAIL_MAX_LENGTH: usize = 254;

/// Basic email format validation
///
/// Exactly one `@`, a non-empty local part of at most 64 characters and a
/// dotted domain made of ASCII alphanumerics, dots and hyphens.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LENGTH {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    if !domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    !(domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
        || domain.contains(".."))
}

/// Absolute http(s) URL with a host
pub fn is_valid_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Accepted image encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    const PNG_SIGNATURE: &'static [u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    const JPEG_SOI: &'static [u8] = &[0xFF, 0xD8, 0xFF];

    /// Format implied by the file extension (case-insensitive)
    ///
    /// Only extensions in [`ALLOWED_IMAGE_EXTENSIONS`] are recognised.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        if !ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        match ext.as_str() {
            "png" => Some(ImageFormat::Png),
            _ => Some(ImageFormat::Jpeg),
        }
    }

    /// Format detected from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(Self::PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(Self::JPEG_SOI) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }
}

// ============================================================================
// Submission and errors
// ============================================================================

/// File part of a submitted form
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Raw form body: text values and uploaded files keyed by field name
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    fields: BTreeMap<String, String>,
    files: BTreeMap<String, UploadedFile>,
}

impl FormSubmission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from url-encoded key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut submission = Self::new();
        for (key, value) in pairs {
            submission.insert_field(key, value);
        }
        submission
    }

    pub fn insert_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Browsers send an empty part for an untouched file input; it is
    /// treated as "no file".
    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        if file.bytes.is_empty() && file.file_name.is_empty() {
            return;
        }
        self.files.insert(name.into(), file);
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_field(name, value);
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.insert_file(name, file);
        self
    }

    /// Raw text value, empty string when absent
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Trimmed text value, `None` when absent or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        let trimmed = self.value(name).trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Text values, for re-rendering a rejected form
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.fields
    }
}

/// Field-level error messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16];

    static SAMPLE_FORM: FormSpec = FormSpec {
        name: "sample",
        submit_label: "Save",
        fields: &[
            FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(5)]),
            FieldSpec::new("website_url", "Website", InputKind::Text, &[Rule::Url]),
            FieldSpec::new("order", "Position", InputKind::Number, &[Rule::Required, Rule::Integer]),
            FieldSpec::new("img", "Logo", InputKind::File, &[Rule::Image]),
        ],
    };

    fn png(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: PNG.to_vec(),
        }
    }

    fn valid_submission() -> FormSubmission {
        FormSubmission::new()
            .with_field("name", "Acme")
            .with_field("order", "3")
            .with_file("img", png("logo.png"))
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(SAMPLE_FORM.validate(&valid_submission(), FormMode::Create).is_ok());
    }

    #[test]
    fn test_required_reports_only_required() {
        let submission = valid_submission().with_field("name", "   ");
        let errors = SAMPLE_FORM.validate(&submission, FormMode::Create).unwrap_err();
        assert_eq!(errors.get("name"), Some(&["This field is required.".to_string()][..]));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_max_length() {
        let submission = valid_submission().with_field("name", "Acme Corp");
        let errors = SAMPLE_FORM.validate(&submission, FormMode::Create).unwrap_err();
        assert!(errors.get("name").is_some());
    }

    #[test]
    fn test_optional_url_only_checked_when_present() {
        let empty = valid_submission().with_field("website_url", "");
        assert!(SAMPLE_FORM.validate(&empty, FormMode::Create).is_ok());

        let bad = valid_submission().with_field("website_url", "acme dot com");
        let errors = SAMPLE_FORM.validate(&bad, FormMode::Create).unwrap_err();
        assert_eq!(errors.get("website_url"), Some(&["Invalid URL.".to_string()][..]));

        let good = valid_submission().with_field("website_url", "https://acme.example");
        assert!(SAMPLE_FORM.validate(&good, FormMode::Create).is_ok());
    }

    #[test]
    fn test_integer_rule() {
        let submission = valid_submission().with_field("order", "first");
        let errors = SAMPLE_FORM.validate(&submission, FormMode::Create).unwrap_err();
        assert!(errors.get("order").is_some());

        let negative = valid_submission().with_field("order", "-2");
        assert!(SAMPLE_FORM.validate(&negative, FormMode::Create).is_ok());
    }

    #[test]
    fn test_image_required_on_create_only() {
        let submission = FormSubmission::new()
            .with_field("name", "Acme")
            .with_field("order", "1");

        let errors = SAMPLE_FORM.validate(&submission, FormMode::Create).unwrap_err();
        assert_eq!(errors.get("img"), Some(&["File is required.".to_string()][..]));

        assert!(SAMPLE_FORM.validate(&submission, FormMode::Edit).is_ok());
    }

    #[test]
    fn test_image_type_allow_list() {
        let gif = UploadedFile {
            file_name: "logo.gif".to_string(),
            content_type: Some("image/gif".to_string()),
            bytes: b"GIF89a".to_vec(),
        };
        let submission = valid_submission().with_file("img", gif);
        let errors = SAMPLE_FORM.validate(&submission, FormMode::Edit).unwrap_err();
        assert!(errors.get("img").is_some());
    }

    #[test]
    fn test_image_content_must_match_extension() {
        let disguised = UploadedFile {
            file_name: "logo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: JPEG.to_vec(),
        };
        let submission = valid_submission().with_file("img", disguised);
        assert!(SAMPLE_FORM.validate(&submission, FormMode::Create).is_err());
    }

    #[test]
    fn test_empty_file_part_is_no_file() {
        let empty = UploadedFile {
            file_name: String::new(),
            content_type: None,
            bytes: Vec::new(),
        };
        let submission = FormSubmission::new().with_file("img", empty);
        assert!(submission.file("img").is_none());
    }

    #[test]
    fn test_equal_to() {
        static PASSWORDS: FormSpec = FormSpec {
            name: "passwords",
            submit_label: "Save",
            fields: &[
                FieldSpec::new("password", "Password", InputKind::Password, &[Rule::Required]),
                FieldSpec::new(
                    "confirm_password",
                    "Confirm",
                    InputKind::Password,
                    &[Rule::Required, Rule::EqualTo("password")],
                ),
            ],
        };

        let ok = FormSubmission::from_pairs([("password", "secret"), ("confirm_password", "secret")]);
        assert!(PASSWORDS.validate(&ok, FormMode::Create).is_ok());

        let mismatch =
            FormSubmission::from_pairs([("password", "secret"), ("confirm_password", "other")]);
        let errors = PASSWORDS.validate(&mismatch, FormMode::Create).unwrap_err();
        assert!(errors.get("confirm_password").is_some());
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@example.co.jp"));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@example..com"));
    }

    #[test]
    fn test_url_shapes() {
        assert!(is_valid_url("https://acme.example"));
        assert!(is_valid_url("http://acme.example/path?q=1"));
        assert!(!is_valid_url("ftp://acme.example"));
        assert!(!is_valid_url("acme.example"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }

    #[test]
    fn test_image_format_detection() {
        assert_eq!(ImageFormat::from_file_name("a.PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("a.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.jpg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.gif"), None);
        assert_eq!(ImageFormat::from_file_name("png"), None);
        assert_eq!(ImageFormat::sniff(PNG), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::sniff(JPEG), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::sniff(b"hello"), None);
    }

    #[test]
    fn test_every_allowed_extension_has_a_format() {
        for ext in ALLOWED_IMAGE_EXTENSIONS {
            let name = format!("logo.{}", ext.to_ascii_uppercase());
            assert!(ImageFormat::from_file_name(&name).is_some(), "{ext}");
        }
        assert_eq!(ImageFormat::from_file_name("logo.webp"), None);
    }

    #[test]
    fn test_required_marker() {
        assert!(SAMPLE_FORM.fields[0].is_required(FormMode::Edit));
        assert!(SAMPLE_FORM.fields[3].is_required(FormMode::Create));
        assert!(!SAMPLE_FORM.fields[3].is_required(FormMode::Edit));
        assert!(!SAMPLE_FORM.fields[1].is_required(FormMode::Create));
        assert!(SAMPLE_FORM.has_file_field());
    }
}
