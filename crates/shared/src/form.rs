//! Raw form input for the post dialog and its field constraints.

use std::fmt;

use thiserror::Error;

use crate::domain::{Post, PostDraft, PostPatch, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostField {
    UserId,
    Title,
    Body,
}

impl PostField {
    pub const ALL: [PostField; 3] = [PostField::UserId, PostField::Title, PostField::Body];

    pub fn label(self) -> &'static str {
        match self {
            PostField::UserId => "userId",
            PostField::Title => "title",
            PostField::Body => "body",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(PostField),
    #[error("{0} must contain digits only")]
    NotNumeric(PostField),
    #[error("{0} is too large")]
    OutOfRange(PostField),
}

impl FieldError {
    pub fn field(&self) -> PostField {
        match self {
            FieldError::Required(field)
            | FieldError::NotNumeric(field)
            | FieldError::OutOfRange(field) => *field,
        }
    }
}

/// Text as typed into the dialog, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub user_id: String,
    pub title: String,
    pub body: String,
}

impl PostForm {
    /// Seeds the form from a copy of an existing post.
    pub fn from_post(post: &Post) -> Self {
        Self {
            user_id: post.user_id.0.to_string(),
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }

    pub fn value(&self, field: PostField) -> &str {
        match field {
            PostField::UserId => &self.user_id,
            PostField::Title => &self.title,
            PostField::Body => &self.body,
        }
    }

    pub fn set(&mut self, field: PostField, value: impl Into<String>) {
        let value = value.into();
        match field {
            PostField::UserId => self.user_id = value,
            PostField::Title => self.title = value,
            PostField::Body => self.body = value,
        }
    }

    /// Returns every constraint violation, in field order.
    pub fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Err(err) = parse_user_id(&self.user_id) {
            errors.push(err);
        }
        if self.title.trim().is_empty() {
            errors.push(FieldError::Required(PostField::Title));
        }
        if self.body.trim().is_empty() {
            errors.push(FieldError::Required(PostField::Body));
        }
        errors
    }

    pub fn to_draft(&self) -> Result<PostDraft, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PostDraft {
            user_id: parse_user_id(&self.user_id).map_err(|err| vec![err])?,
            title: self.title.clone(),
            body: self.body.clone(),
        })
    }

    /// Builds a patch holding only the fields that differ from `original`.
    pub fn to_patch(&self, original: &Post) -> Result<PostPatch, Vec<FieldError>> {
        let draft = self.to_draft()?;
        Ok(PostPatch {
            user_id: (draft.user_id != original.user_id).then_some(draft.user_id),
            title: (draft.title != original.title).then_some(draft.title),
            body: (draft.body != original.body).then_some(draft.body),
        })
    }
}

fn parse_user_id(raw: &str) -> Result<UserId, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::Required(PostField::UserId));
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FieldError::NotNumeric(PostField::UserId));
    }
    raw.parse::<i64>()
        .map(UserId)
        .map_err(|_| FieldError::OutOfRange(PostField::UserId))
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
