//! Form input schemas.
//!
//! Each `validate_*` function checks one form's fields and collects every
//! failure under the field's name, so the caller can show all messages at once.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::db::{NewBriefing, NewClient, NewComment, NewProject, NewTask};
use crate::core::selection::{CommentContentPatch, TaskDetailsPatch};

pub const NAME_MAX_LEN: usize = 100;
pub const TITLE_MAX_LEN: usize = 120;
pub const DESCRIPTION_MAX_LEN: usize = 5_000;
pub const COMMENT_MAX_LEN: usize = 2_000;
pub const BRIEFING_MAX_LEN: usize = 20_000;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(nbsp|#160);").expect("entity pattern is valid"));

/// Field name to list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ValidationError(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid input: {0}")]
pub struct ValidationError(pub FieldErrors);

impl ValidationError {
    pub fn fields(&self) -> &FieldErrors {
        &self.0
    }
}

/// Text content of editor markup, with tags removed and whitespace trimmed.
pub fn plain_text(markup: &str) -> String {
    let without_tags = TAG_RE.replace_all(markup, " ");
    let without_nbsp = ENTITY_RE.replace_all(&without_tags, " ");
    without_nbsp.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn required(errors: &mut FieldErrors, field: &str, value: &str, max_len: usize) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    } else if trimmed.chars().count() > max_len {
        errors.add(field, format!("must be at most {max_len} characters"));
    }
}

fn optional(errors: &mut FieldErrors, field: &str, value: Option<&str>, max_len: usize) {
    if let Some(value) = value
        && value.chars().count() > max_len
    {
        errors.add(field, format!("must be at most {max_len} characters"));
    }
}

fn rich_text(errors: &mut FieldErrors, field: &str, markup: &str, max_len: usize) {
    let text = plain_text(markup);
    if text.is_empty() {
        errors.add(field, "must not be empty");
    } else if text.chars().count() > max_len {
        errors.add(field, format!("must be at most {max_len} characters"));
    }
}

pub fn validate_client(client: &NewClient) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    required(&mut errors, "name", &client.name, NAME_MAX_LEN);
    if !EMAIL_RE.is_match(client.email.trim()) {
        errors.add("email", "must be a valid email address");
    }
    if let Some(phone) = client.phone.as_deref()
        && !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        errors.add("phone", "may only contain digits, spaces and + - ( )");
    }
    optional(&mut errors, "company", client.company.as_deref(), NAME_MAX_LEN);
    errors.into_result()
}

pub fn validate_project(project: &NewProject) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    required(&mut errors, "name", &project.name, NAME_MAX_LEN);
    optional(
        &mut errors,
        "description",
        project.description.as_deref(),
        DESCRIPTION_MAX_LEN,
    );
    errors.into_result()
}

fn task_fields(errors: &mut FieldErrors, title: &str, description: Option<&str>) {
    required(errors, "title", title, TITLE_MAX_LEN);
    optional(errors, "description", description, DESCRIPTION_MAX_LEN);
}

pub fn validate_task(task: &NewTask) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    task_fields(&mut errors, &task.title, task.description.as_deref());
    errors.into_result()
}

pub fn validate_task_details(details: &TaskDetailsPatch) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    task_fields(&mut errors, &details.title, details.description.as_deref());
    errors.into_result()
}

pub fn validate_comment(comment: &NewComment) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    rich_text(&mut errors, "content", &comment.content, COMMENT_MAX_LEN);
    errors.into_result()
}

pub fn validate_comment_content(patch: &CommentContentPatch) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    rich_text(&mut errors, "content", &patch.content, COMMENT_MAX_LEN);
    errors.into_result()
}

pub fn validate_briefing(briefing: &NewBriefing) -> Result<(), ValidationError> {
    let mut errors = FieldErrors::default();
    required(&mut errors, "title", &briefing.title, TITLE_MAX_LEN);
    rich_text(&mut errors, "content", &briefing.content, BRIEFING_MAX_LEN);
    errors.into_result()
}
