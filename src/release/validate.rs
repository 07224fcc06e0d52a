//! Submission validation
//!
//! Re-checks every constraint server-side on each post: the known-project
//! set, semver syntax, the changelog budget (recomputed from the submitted
//! project and version, never trusted from the client), the shared secret,
//! and the attachment limits. All violations are collected and reported
//! together rather than stopping at the first.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{ReleaseSubmission, CHANGELOG_PRESET};
use crate::discord::{budget, ATTACHMENT_SIZE_LIMIT, KNOWN_PROJECTS, MAX_ATTACHMENTS};

/// One user-correctable violation, keyed by form field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found in one submission.
#[derive(Debug, Default)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Single human-readable summary line.
    pub fn to_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Field -> messages map, for structured error responses.
    pub fn by_field(&self) -> BTreeMap<&'static str, Vec<String>> {
        let mut map: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
        for error in &self.errors {
            map.entry(error.field).or_default().push(error.message.clone());
        }
        map
    }
}

/// Validate a submission against the configured secret. `Ok(())` means every
/// constraint passed; `Err` carries all violations at once.
pub fn validate(
    submission: &ReleaseSubmission,
    configured_secret: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if submission.project.is_empty() {
        errors.push("project", "Please select a project");
    } else if !KNOWN_PROJECTS.contains(&submission.project.as_str()) {
        errors.push("project", "Please select a known project");
    }

    if submission.version.is_empty() {
        errors.push("version", "Please enter a version");
    } else if semver::Version::parse(&submission.version).is_err() {
        errors.push("version", "The version must be valid semver");
    }

    if submission.changelog.is_empty() {
        errors.push("changelog", "Please enter a changelog");
    } else if submission.changelog == CHANGELOG_PRESET {
        errors.push("changelog", "Please enter changes in the changelog");
    } else {
        // Recomputed here from the submitted project/version; a client-side
        // counter or precomputed remaining count is never trusted.
        let max = budget::max_changelog_length(&submission.project, &submission.version);
        if submission.changelog.chars().count() as i64 > max {
            errors.push(
                "changelog",
                format!("The changelog must be less than {max} characters"),
            );
        }
    }

    if submission.secret_key.is_empty() {
        errors.push("secretKey", "Please enter the secret key");
    } else if submission.secret_key != configured_secret {
        errors.push("secretKey", "Invalid secret key");
    }

    if submission.files.len() > MAX_ATTACHMENTS {
        errors.push(
            "files",
            format!("You can only upload {MAX_ATTACHMENTS} files"),
        );
    }
    for file in &submission.files {
        if file.size() > ATTACHMENT_SIZE_LIMIT {
            errors.push(
                "files",
                format!("{} exceeds the 10 MiB attachment limit", file.name),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::AttachmentFile;

    const SECRET: &str = "hunter2";

    fn valid_submission() -> ReleaseSubmission {
        ReleaseSubmission {
            project: "Kings Beta".to_string(),
            version: "1.0.0".to_string(),
            changelog: "## Features\n- x".to_string(),
            secret_key: SECRET.to_string(),
            files: vec![],
        }
    }

    fn messages_for(errors: &ValidationErrors, field: &str) -> Vec<String> {
        errors
            .errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn test_valid_submission_passes() {
        assert!(validate(&valid_submission(), SECRET).is_ok());
    }

    #[test]
    fn test_unknown_project_rejected() {
        let mut submission = valid_submission();
        submission.project = "Kings Gamma".to_string();
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(
            messages_for(&errors, "project"),
            vec!["Please select a known project"]
        );
    }

    #[test]
    fn test_invalid_semver_rejected() {
        let mut submission = valid_submission();
        submission.version = "1.0".to_string();
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(
            messages_for(&errors, "version"),
            vec!["The version must be valid semver"]
        );
    }

    #[test]
    fn test_preset_changelog_rejected() {
        let mut submission = valid_submission();
        submission.changelog = CHANGELOG_PRESET.to_string();
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(
            messages_for(&errors, "changelog"),
            vec!["Please enter changes in the changelog"]
        );
    }

    #[test]
    fn test_changelog_at_exact_budget_accepted() {
        let mut submission = valid_submission();
        let max = budget::max_changelog_length(&submission.project, &submission.version);
        submission.changelog = "x".repeat(max as usize);
        assert!(validate(&submission, SECRET).is_ok());

        submission.changelog.push('x');
        let errors = validate(&submission, SECRET).unwrap_err();
        let messages = messages_for(&errors, "changelog");
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("characters"), "got {:?}", messages[0]);
    }

    #[test]
    fn test_budget_tracks_project_and_version() {
        // The allowance differs between projects, so a changelog that fits
        // one project can overflow another.
        let beta_max = budget::max_changelog_length("Kings Beta", "1.0.0");
        let utility_max = budget::max_changelog_length("Kings Utility", "1.0.0");
        assert_ne!(beta_max, utility_max);

        let mut submission = valid_submission();
        submission.project = "Kings Utility".to_string();
        submission.changelog = "x".repeat(utility_max as usize);
        assert!(validate(&submission, SECRET).is_ok());
        submission.project = "Kings Beta".to_string();
        assert!(validate(&submission, SECRET).is_err());
    }

    #[test]
    fn test_secret_mismatch_reported_with_other_failures() {
        let mut submission = valid_submission();
        submission.secret_key = "wrong".to_string();
        submission.version = "not-semver".to_string();
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(messages_for(&errors, "secretKey"), vec!["Invalid secret key"]);
        assert_eq!(
            messages_for(&errors, "version"),
            vec!["The version must be valid semver"]
        );
        assert_eq!(errors.errors.len(), 2);
    }

    #[test]
    fn test_attachment_limits() {
        let file = AttachmentFile {
            name: "shot.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0; 16],
        };
        let mut submission = valid_submission();
        submission.files = vec![file.clone(); 11];
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(
            messages_for(&errors, "files"),
            vec!["You can only upload 10 files"]
        );

        let mut oversized = file;
        oversized.bytes = vec![0; (ATTACHMENT_SIZE_LIMIT + 1) as usize];
        submission.files = vec![oversized];
        let errors = validate(&submission, SECRET).unwrap_err();
        assert_eq!(
            messages_for(&errors, "files"),
            vec!["shot.png exceeds the 10 MiB attachment limit"]
        );
    }

    #[test]
    fn test_by_field_groups_messages() {
        let submission = ReleaseSubmission::default();
        let errors = validate(&submission, SECRET).unwrap_err();
        let map = errors.by_field();
        assert!(map.contains_key("project"));
        assert!(map.contains_key("version"));
        assert!(map.contains_key("changelog"));
        assert!(map.contains_key("secretKey"));
        assert!(!errors.to_message().is_empty());
    }
}
