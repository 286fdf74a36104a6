//! Modal workflows the controller awaits: the post form and the delete confirmation.

use async_trait::async_trait;
use shared::domain::{Post, PostDraft, PostPatch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Create mode result.
    Draft(PostDraft),
    /// Edit mode result.
    Patch(PostPatch),
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Denied,
}

impl Confirmation {
    pub fn is_confirmed(self) -> bool {
        self == Confirmation::Confirmed
    }
}

/// Collects post fields. `initial` is `None` in create mode and a copy of the
/// target post in edit mode. Implementations only resolve with a draft or a
/// patch once `userId`, `title` and `body` satisfy their constraints.
#[async_trait]
pub trait EditFormCollector: Send + Sync {
    async fn open(&self, initial: Option<Post>) -> FormOutcome;
}

#[async_trait]
pub trait ConfirmationCollector: Send + Sync {
    async fn open(&self, title: &str, message: &str) -> Confirmation;
}
