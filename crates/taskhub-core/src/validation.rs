//! Client-side form checks, run before any network call.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Credentials, ProjectDraft, ProjectPatch, SignupRequest, TaskDraft, TaskPatch};

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Maximum task title length.
pub const TASK_TITLE_MAX: usize = 200;
/// Maximum task description length.
pub const TASK_DESCRIPTION_MAX: usize = 1000;
/// Maximum project name length.
pub const PROJECT_NAME_MAX: usize = 100;
/// Maximum project description length.
pub const PROJECT_DESCRIPTION_MAX: usize = 500;
/// Minimum password length.
pub const PASSWORD_MIN: usize = 6;

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field name as it appears on the wire.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// All failed checks of one form, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.joined())]
pub struct ValidationErrors {
    /// Individual failures.
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Messages joined by `", "`.
    pub fn joined(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether `field` failed.
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// A form that can be checked locally.
pub trait Validate {
    /// Run every check; `Err` lists all failures.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Whether `email` looks like an address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|re| re.is_match(email.trim()))
}

fn char_len(s: &str) -> usize {
    s.trim().chars().count()
}

fn check_required_len(
    errs: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    max: usize,
) {
    let len = char_len(value);
    if len == 0 {
        errs.push(field, format!("{label} is required"));
    } else if len > max {
        errs.push(field, format!("{label} must be at most {max} characters"));
    }
}

fn check_email(errs: &mut ValidationErrors, email: &str) {
    if email.trim().is_empty() {
        errs.push("email", "Email is required");
    } else if !is_valid_email(email) {
        errs.push("email", "Email is invalid");
    }
}

fn check_password(errs: &mut ValidationErrors, password: &str) {
    if password.is_empty() {
        errs.push("password", "Password is required");
    } else if password.chars().count() < PASSWORD_MIN {
        errs.push(
            "password",
            format!("Password must be at least {PASSWORD_MIN} characters"),
        );
    }
}

impl Validate for TaskDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        check_required_len(&mut errs, "title", "Title", &self.title, TASK_TITLE_MAX);
        check_required_len(
            &mut errs,
            "description",
            "Description",
            self.description.as_deref().unwrap_or_default(),
            TASK_DESCRIPTION_MAX,
        );
        if self.due_date.is_none() {
            errs.push("dueDate", "Due date is required");
        }
        errs.into_result()
    }
}

impl Validate for TaskPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if let Some(title) = &self.title {
            check_required_len(&mut errs, "title", "Title", title, TASK_TITLE_MAX);
        }
        if let Some(description) = &self.description {
            check_required_len(
                &mut errs,
                "description",
                "Description",
                description,
                TASK_DESCRIPTION_MAX,
            );
        }
        errs.into_result()
    }
}

impl Validate for ProjectDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        check_required_len(&mut errs, "name", "Name", &self.name, PROJECT_NAME_MAX);
        if let Some(description) = &self.description
            && char_len(description) > PROJECT_DESCRIPTION_MAX
        {
            errs.push(
                "description",
                format!("Description must be at most {PROJECT_DESCRIPTION_MAX} characters"),
            );
        }
        errs.into_result()
    }
}

impl Validate for ProjectPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if let Some(name) = &self.name {
            check_required_len(&mut errs, "name", "Name", name, PROJECT_NAME_MAX);
        }
        if let Some(description) = &self.description
            && char_len(description) > PROJECT_DESCRIPTION_MAX
        {
            errs.push(
                "description",
                format!("Description must be at most {PROJECT_DESCRIPTION_MAX} characters"),
            );
        }
        errs.into_result()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        check_email(&mut errs, &self.email);
        check_password(&mut errs, &self.password);
        errs.into_result()
    }
}

impl Validate for SignupRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if self.name.trim().is_empty() {
            errs.push("name", "Name is required");
        }
        check_email(&mut errs, &self.email);
        check_password(&mut errs, &self.password);
        errs.into_result()
    }
}

/// Check a member invitation address.
pub fn validate_member_email(email: &str) -> Result<(), ValidationErrors> {
    let mut errs = ValidationErrors::default();
    check_email(&mut errs, email);
    errs.into_result()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn valid_draft() -> TaskDraft {
        TaskDraft {
            title: "Write docs".into(),
            description: Some("Cover the API".into()),
            due_date: Some(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn valid_task_draft_passes() {
        assert!(valid_draft().validate().is_ok());
    }

    #[test]
    fn task_draft_reports_every_failure() {
        let err = TaskDraft::default().validate().unwrap_err();
        assert!(err.has("title"));
        assert!(err.has("description"));
        assert!(err.has("dueDate"));
        assert_eq!(
            err.to_string(),
            "Title is required, Description is required, Due date is required"
        );
    }

    #[test]
    fn task_title_length_bounds() {
        let mut draft = valid_draft();
        draft.title = "x".repeat(TASK_TITLE_MAX);
        assert!(draft.validate().is_ok());
        draft.title = "x".repeat(TASK_TITLE_MAX + 1);
        assert!(draft.validate().unwrap_err().has("title"));
    }

    #[test]
    fn whitespace_title_is_missing() {
        let mut draft = valid_draft();
        draft.title = "   ".into();
        assert!(draft.validate().unwrap_err().has("title"));
    }

    #[test]
    fn task_patch_checks_present_fields_only() {
        assert!(TaskPatch::default().validate().is_ok());
        let patch = TaskPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().unwrap_err().has("title"));
    }

    #[test]
    fn project_rules() {
        let ok = ProjectDraft {
            name: "Website".into(),
            description: None,
        };
        assert!(ok.validate().is_ok());

        let long = ProjectDraft {
            name: "x".repeat(PROJECT_NAME_MAX + 1),
            description: Some("d".repeat(PROJECT_DESCRIPTION_MAX + 1)),
        };
        let err = long.validate().unwrap_err();
        assert!(err.has("name"));
        assert!(err.has("description"));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@b.io"));
        assert!(is_valid_email("  first.last@example.com "));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email("@c.io"));
        assert!(validate_member_email("").unwrap_err().has("email"));
    }

    #[test]
    fn credentials_rules() {
        let creds = Credentials {
            email: "a@b.io".into(),
            password: "12345".into(),
        };
        let err = creds.validate().unwrap_err();
        assert_eq!(err.errors.len(), 1);
        assert!(err.has("password"));
    }

    #[test]
    fn signup_requires_name() {
        let req = SignupRequest {
            name: " ".into(),
            email: "a@b.io".into(),
            password: "secret1".into(),
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }
}
