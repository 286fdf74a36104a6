//! Terminal renditions of the post form and the delete confirmation.

use std::sync::Arc;

use async_trait::async_trait;
use client_core::{Confirmation, ConfirmationCollector, EditFormCollector, FormOutcome};
use shared::{
    domain::Post,
    form::{PostField, PostForm},
};

use crate::console::Console;

pub const CANCEL_INPUT: &str = ":q";

pub struct TerminalPostForm {
    console: Arc<Console>,
}

impl TerminalPostForm {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }

    /// Prompts for `fields`; `None` when the user cancels or input ends.
    async fn fill(
        &self,
        form: &mut PostForm,
        fields: &[PostField],
        keep_blank: bool,
    ) -> Option<()> {
        for field in fields {
            let label = if keep_blank {
                format!("{} [{}]: ", field.label(), form.value(*field))
            } else {
                format!("{}: ", field.label())
            };
            let input = self.console.prompt(&label).await?;
            let input = input.trim();
            if input == CANCEL_INPUT {
                return None;
            }
            if keep_blank && input.is_empty() {
                continue;
            }
            form.set(*field, input);
        }
        Some(())
    }

    async fn collect(&self, initial: Option<&Post>) -> Option<PostForm> {
        let editing = initial.is_some();
        let mut form = initial.map(PostForm::from_post).unwrap_or_default();
        let title = if editing { "Edit post" } else { "New post" };
        self.console
            .write_line(&format!("-- {title} ({CANCEL_INPUT} cancels) --"));

        self.fill(&mut form, &PostField::ALL, editing).await?;
        loop {
            let errors = form.errors();
            if errors.is_empty() {
                return Some(form);
            }
            for err in &errors {
                self.console.write_line(&format!("  ! {err}"));
            }
            let invalid: Vec<PostField> = errors.iter().map(|err| err.field()).collect();
            self.fill(&mut form, &invalid, false).await?;
        }
    }
}

#[async_trait]
impl EditFormCollector for TerminalPostForm {
    async fn open(&self, initial: Option<Post>) -> FormOutcome {
        let Some(form) = self.collect(initial.as_ref()).await else {
            self.console.write_line("cancelled");
            return FormOutcome::Cancelled;
        };
        let outcome = match &initial {
            None => form.to_draft().map(FormOutcome::Draft),
            Some(original) => form.to_patch(original).map(FormOutcome::Patch),
        };
        // `collect` only returns a form without errors.
        outcome.unwrap_or(FormOutcome::Cancelled)
    }
}

pub struct TerminalConfirmation {
    console: Arc<Console>,
}

impl TerminalConfirmation {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl ConfirmationCollector for TerminalConfirmation {
    async fn open(&self, title: &str, message: &str) -> Confirmation {
        self.console.write_line(&format!("-- {title} --"));
        let Some(answer) = self.console.prompt(&format!("{message} [y/N]: ")).await else {
            return Confirmation::Denied;
        };
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Confirmation::Confirmed,
            _ => Confirmation::Denied,
        }
    }
}

#[cfg(test)]
#[path = "tests/dialogs_tests.rs"]
mod tests;
