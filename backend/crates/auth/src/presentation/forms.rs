//! Register and login forms

use kernel::validation::{FieldSpec, FormSpec, FormSubmission, InputKind, Rule};

pub static REGISTER_FORM: FormSpec = FormSpec {
    name: "register",
    submit_label: "Register",
    fields: &[
        FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(250)]),
        FieldSpec::new(
            "email",
            "Email",
            InputKind::Email,
            &[Rule::Required, Rule::Email, Rule::MaxLength(250)],
        ),
        FieldSpec::new("password", "Password", InputKind::Password, &[Rule::Required]),
        FieldSpec::new(
            "confirm_password",
            "Confirm password",
            InputKind::Password,
            &[Rule::Required, Rule::EqualTo("password")],
        ),
    ],
};

pub static LOGIN_FORM: FormSpec = FormSpec {
    name: "login",
    submit_label: "Log in",
    fields: &[
        FieldSpec::new("email", "Email", InputKind::Email, &[Rule::Required, Rule::Email]),
        FieldSpec::new("password", "Password", InputKind::Password, &[Rule::Required]),
    ],
};

/// Validated register form
#[derive(Debug)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    /// Only call with a submission that passed [`REGISTER_FORM`]
    pub fn from_submission(submission: &FormSubmission) -> Self {
        Self {
            name: submission.value("name").trim().to_string(),
            email: submission.value("email").trim().to_string(),
            password: submission.value("password").to_string(),
        }
    }
}

/// Validated login form
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    /// Only call with a submission that passed [`LOGIN_FORM`]
    pub fn from_submission(submission: &FormSubmission) -> Self {
        Self {
            email: submission.value("email").trim().to_string(),
            password: submission.value("password").to_string(),
        }
    }
}
