//! Admin forms, one per entity kind
//!
//! A `*Fields` value is only ever built from a submission that passed the
//! entity's [`FormSpec`].

use std::collections::BTreeMap;

use kernel::validation::{FieldErrors, FieldSpec, FormSpec, FormSubmission, InputKind, Rule};

use crate::domain::{
    Entity, ManagementMember, ManagementMemberFields, Project, ProjectFields, Sponsor,
    SponsorFields, Team, TeamFields,
};
use crate::error::{ContentError, ContentResult};

/// Name of the file input on every form with an image
pub const IMAGE_FIELD: &str = "img";

pub static SPONSOR_FORM: FormSpec = FormSpec {
    name: "sponsor",
    submit_label: "Save sponsor",
    fields: &[
        FieldSpec::new(IMAGE_FIELD, "Logo", InputKind::File, &[Rule::Image]),
        FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(250)]),
        FieldSpec::new(
            "website_url",
            "Website",
            InputKind::Text,
            &[Rule::Url, Rule::MaxLength(250)],
        ),
    ],
};

pub static MANAGEMENT_FORM: FormSpec = FormSpec {
    name: "management",
    submit_label: "Save member",
    fields: &[
        FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(255)]),
        FieldSpec::new(
            "position",
            "Position",
            InputKind::Text,
            &[Rule::Required, Rule::MaxLength(80)],
        ),
        FieldSpec::new("order", "Order", InputKind::Number, &[Rule::Required, Rule::Integer]),
    ],
};

pub static TEAM_FORM: FormSpec = FormSpec {
    name: "team",
    submit_label: "Save team",
    fields: &[
        FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(100)]),
        FieldSpec::new(IMAGE_FIELD, "Photo", InputKind::File, &[Rule::Image]),
        FieldSpec::new(
            "vintage",
            "Vintage",
            InputKind::Text,
            &[Rule::Required, Rule::MaxLength(20)],
        ),
        FieldSpec::new(
            "trainer",
            "Trainer",
            InputKind::Text,
            &[Rule::Required, Rule::MaxLength(50)],
        ),
        FieldSpec::new("trainer_phone", "Trainer phone", InputKind::Text, &[Rule::MaxLength(20)]),
        FieldSpec::new("order", "Order", InputKind::Number, &[Rule::Required, Rule::Integer]),
    ],
};

pub static PROJECT_FORM: FormSpec = FormSpec {
    name: "project",
    submit_label: "Save project",
    fields: &[
        FieldSpec::new(IMAGE_FIELD, "Image", InputKind::File, &[Rule::Image]),
        FieldSpec::new("name", "Name", InputKind::Text, &[Rule::Required, Rule::MaxLength(100)]),
        FieldSpec::new("description", "Description", InputKind::TextArea, &[Rule::Required]),
    ],
};

/// Binding between an entity and its admin form
pub trait EntityForm: Entity {
    fn form() -> &'static FormSpec;

    /// Typed fields from a validated submission
    fn fields_from(submission: &FormSubmission) -> ContentResult<Self::Fields>;

    /// Current values for pre-filling the edit form
    fn form_values(&self) -> BTreeMap<String, String>;
}

fn required(submission: &FormSubmission, name: &str) -> String {
    submission.value(name).trim().to_string()
}

fn optional(submission: &FormSubmission, name: &str) -> Option<String> {
    submission.text(name).map(str::to_string)
}

fn order(submission: &FormSubmission) -> ContentResult<i32> {
    submission.value("order").trim().parse().map_err(|_| {
        ContentError::Validation(FieldErrors::single("order", "Enter a whole number."))
    })
}

fn values<const N: usize>(pairs: [(&str, String); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

impl EntityForm for Sponsor {
    fn form() -> &'static FormSpec {
        &SPONSOR_FORM
    }

    fn fields_from(submission: &FormSubmission) -> ContentResult<SponsorFields> {
        Ok(SponsorFields {
            name: required(submission, "name"),
            website_url: optional(submission, "website_url"),
        })
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        values([
            ("name", self.name.clone()),
            ("website_url", self.website_url.clone().unwrap_or_default()),
        ])
    }
}

impl EntityForm for ManagementMember {
    fn form() -> &'static FormSpec {
        &MANAGEMENT_FORM
    }

    fn fields_from(submission: &FormSubmission) -> ContentResult<ManagementMemberFields> {
        Ok(ManagementMemberFields {
            name: required(submission, "name"),
            position: required(submission, "position"),
            order: order(submission)?,
        })
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        values([
            ("name", self.name.clone()),
            ("position", self.position.clone()),
            ("order", self.order.to_string()),
        ])
    }
}

impl EntityForm for Team {
    fn form() -> &'static FormSpec {
        &TEAM_FORM
    }

    fn fields_from(submission: &FormSubmission) -> ContentResult<TeamFields> {
        Ok(TeamFields {
            name: required(submission, "name"),
            vintage: required(submission, "vintage"),
            trainer: required(submission, "trainer"),
            trainer_phone: optional(submission, "trainer_phone"),
            order: order(submission)?,
        })
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        values([
            ("name", self.name.clone()),
            ("vintage", self.vintage.clone()),
            ("trainer", self.trainer.clone()),
            ("trainer_phone", self.trainer_phone.clone().unwrap_or_default()),
            ("order", self.order.to_string()),
        ])
    }
}

impl EntityForm for Project {
    fn form() -> &'static FormSpec {
        &PROJECT_FORM
    }

    fn fields_from(submission: &FormSubmission) -> ContentResult<ProjectFields> {
        Ok(ProjectFields {
            name: required(submission, "name"),
            description: required(submission, "description"),
        })
    }

    fn form_values(&self) -> BTreeMap<String, String> {
        values([
            ("name", self.name.clone()),
            ("description", self.description.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::{FormMode, UploadedFile};

    fn png() -> UploadedFile {
        UploadedFile {
            file_name: "logo.png".to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        }
    }

    #[test]
    fn test_sponsor_requires_image_on_create_only() {
        let submission = FormSubmission::from_pairs([("name", "Acme")]);

        let errors = SPONSOR_FORM
            .validate(&submission, FormMode::Create)
            .unwrap_err();
        assert_eq!(errors.get(IMAGE_FIELD), Some(&["File is required.".to_string()][..]));

        assert!(SPONSOR_FORM.validate(&submission, FormMode::Edit).is_ok());
        assert!(
            SPONSOR_FORM
                .validate(&submission.with_file(IMAGE_FIELD, png()), FormMode::Create)
                .is_ok()
        );
    }

    #[test]
    fn test_sponsor_url_optional_but_checked() {
        let submission = FormSubmission::from_pairs([("name", "Acme"), ("website_url", "")]);
        let fields = Sponsor::fields_from(&submission).unwrap();
        assert_eq!(fields.website_url, None);

        let submission = FormSubmission::from_pairs([("name", "Acme"), ("website_url", "acme")]);
        let errors = SPONSOR_FORM.validate(&submission, FormMode::Edit).unwrap_err();
        assert_eq!(errors.get("website_url"), Some(&["Invalid URL.".to_string()][..]));
    }

    #[test]
    fn test_team_length_limits_and_order() {
        let submission = FormSubmission::from_pairs([
            ("name", "U12"),
            ("vintage", "2014"),
            ("trainer", "Kim"),
            ("trainer_phone", "123456789012345678901"),
            ("order", "two"),
        ]);
        let errors = TEAM_FORM.validate(&submission, FormMode::Edit).unwrap_err();
        assert!(errors.get("trainer_phone").is_some());
        assert_eq!(errors.get("order"), Some(&["Enter a whole number.".to_string()][..]));
    }

    #[test]
    fn test_team_fields_from_valid_submission() {
        let submission = FormSubmission::from_pairs([
            ("name", " U12 "),
            ("vintage", "2014"),
            ("trainer", "Kim"),
            ("trainer_phone", "  "),
            ("order", " -3 "),
        ]);
        assert!(TEAM_FORM.validate(&submission, FormMode::Edit).is_ok());

        let fields = Team::fields_from(&submission).unwrap();
        assert_eq!(fields.name, "U12");
        assert_eq!(fields.trainer_phone, None);
        assert_eq!(fields.order, -3);
    }

    #[test]
    fn test_management_needs_no_file() {
        assert!(!MANAGEMENT_FORM.has_file_field());
        assert!(PROJECT_FORM.has_file_field());
    }
}
