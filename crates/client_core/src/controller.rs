//! Table synchronization controller.
//!
//! Owns the post list shown to the user, opens the form/confirmation
//! workflows, issues repository calls and reconciles their completions.
//! Repository calls run on spawned tasks and report back through a channel;
//! completions are applied one at a time, in arrival order, by whoever drives
//! [`TableController::next_completion`] (or `apply_ready`/`settle`).
//! Forms and confirmations are opened as detached [`Workflow`] futures, so a
//! caller can keep applying completions until the dialog resolves and then
//! hand the result to [`TableController::submit`].
//!
//! Overlapping mutating operations are allowed. Each completion replaces the
//! single visible notification, so only the last one to arrive stays on
//! screen while every outcome is still applied to the list.

use std::{collections::HashSet, future::Future, pin::Pin, sync::Arc, time::Duration};

use shared::domain::{Post, PostDraft, PostId, PostPatch};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    collectors::{ConfirmationCollector, EditFormCollector, FormOutcome},
    error::{describe_failure, RepositoryError, TableError},
    notification::{
        Notification, NotificationHandle, NotificationSink, NotificationSlot,
        DEFAULT_AUTO_DISMISS,
    },
    pagination::{PageError, PageInfo, Paginator},
    repository::PostRepository,
};

pub const COLUMNS: [&str; 4] = ["id", "title", "userId", "body"];

const SAVING_MESSAGE: &str = "Saving…";
const UPDATING_MESSAGE: &str = "Updating…";
const DELETE_TITLE: &str = "Delete post";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    LoadFailed,
}

/// What a user action led to before any repository result is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The repository call is in flight.
    Issued,
    /// The workflow was cancelled or denied; nothing changed.
    Cancelled,
    /// The target post is not in the list.
    Skipped,
}

/// A completion that was reconciled into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Loaded { count: usize },
    Created(PostId),
    Updated { id: PostId, replaced: bool },
    Deleted { id: PostId, removed: usize },
}

/// A form or confirmation that resolved and is ready for [`TableController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Create(PostDraft),
    Update { original: Post, patch: PostPatch },
    Delete(PostId),
}

/// An open form or confirmation. It holds no borrow of the controller, so
/// completions can still be applied while the user answers.
pub type Workflow = Pin<Box<dyn Future<Output = Option<Request>> + Send + 'static>>;

enum Completion {
    Listed(Result<Vec<Post>, RepositoryError>),
    Created {
        pending: NotificationHandle,
        result: Result<Post, RepositoryError>,
    },
    Updated {
        id: PostId,
        pending: NotificationHandle,
        result: Result<Post, RepositoryError>,
    },
    Deleted {
        id: PostId,
        result: Result<(), RepositoryError>,
    },
}

pub struct Collaborators {
    pub repository: Arc<dyn PostRepository>,
    pub forms: Arc<dyn EditFormCollector>,
    pub confirmations: Arc<dyn ConfirmationCollector>,
    pub notifications: Arc<dyn NotificationSink>,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub paginator: Paginator,
    pub notification_duration: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            paginator: Paginator::default(),
            notification_duration: DEFAULT_AUTO_DISMISS,
        }
    }
}

/// Read-only projection handed to the view layer.
#[derive(Debug)]
pub struct TableView<'a> {
    pub columns: &'static [&'static str],
    pub rows: &'a [Post],
    pub is_loading: bool,
    pub load_state: LoadState,
    pub page: PageInfo,
    pub range_label: String,
}

pub struct TableController {
    repository: Arc<dyn PostRepository>,
    forms: Arc<dyn EditFormCollector>,
    confirmations: Arc<dyn ConfirmationCollector>,
    notifications: NotificationSlot,
    notification_duration: Duration,
    records: Vec<Post>,
    is_loading: bool,
    load_state: LoadState,
    paginator: Paginator,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
    loads_in_flight: usize,
}

impl TableController {
    pub fn new(collaborators: Collaborators, options: ControllerOptions) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            repository: collaborators.repository,
            forms: collaborators.forms,
            confirmations: collaborators.confirmations,
            notifications: NotificationSlot::new(collaborators.notifications),
            notification_duration: options.notification_duration,
            records: Vec::new(),
            is_loading: true,
            load_state: LoadState::Idle,
            paginator: options.paginator,
            completion_tx,
            completion_rx,
            in_flight: 0,
            loads_in_flight: 0,
        }
    }

    pub fn records(&self) -> &[Post] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn current_notification(&self) -> Option<NotificationHandle> {
        self.notifications.current()
    }

    pub fn find(&self, id: PostId) -> Option<&Post> {
        self.records.iter().find(|post| post.id == Some(id))
    }

    pub fn view(&self) -> TableView<'_> {
        let total = self.records.len();
        TableView {
            columns: &COLUMNS,
            rows: self.paginator.slice(&self.records),
            is_loading: self.is_loading,
            load_state: self.load_state,
            page: self.paginator.info(total),
            range_label: self.paginator.range_label(total),
        }
    }

    // Requires a tokio runtime: the call runs on a spawned task.
    fn spawn_call<F>(&mut self, call: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        self.in_flight += 1;
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let completion = call.await;
            let _ = completion_tx.send(completion);
        });
    }

    /// Starts a list fetch. Previously loaded posts stay visible until it succeeds.
    pub fn reload(&mut self) {
        self.load_state = LoadState::Loading;
        self.is_loading = true;
        self.loads_in_flight += 1;
        let repository = Arc::clone(&self.repository);
        debug!("issuing post list fetch");
        self.spawn_call(async move { Completion::Listed(repository.list().await) });
    }

    /// Opens the create form. Resolves to a [`Request::Create`] unless cancelled.
    pub fn open_create(&self) -> Workflow {
        let forms = Arc::clone(&self.forms);
        Box::pin(async move {
            match forms.open(None).await {
                FormOutcome::Draft(draft) => Some(Request::Create(draft)),
                FormOutcome::Cancelled => None,
                FormOutcome::Patch(_) => {
                    warn!("post form returned an edit patch in create mode; ignoring");
                    None
                }
            }
        })
    }

    /// Opens the edit form on a copy of the listed post. `None` when the
    /// post is not listed; the form is never opened then.
    pub fn open_edit(&self, id: PostId) -> Option<Workflow> {
        let Some(original) = self.find(id).cloned() else {
            warn!(post_id = id.0, "edit requested for a post that is not listed");
            return None;
        };
        let forms = Arc::clone(&self.forms);
        Some(Box::pin(async move {
            match forms.open(Some(original.clone())).await {
                FormOutcome::Patch(patch) => Some(Request::Update { original, patch }),
                FormOutcome::Cancelled => None,
                FormOutcome::Draft(_) => {
                    warn!(post_id = id.0, "post form returned a draft in edit mode; ignoring");
                    None
                }
            }
        }))
    }

    /// Asks for confirmation before deleting a listed post.
    pub fn open_delete(&self, id: PostId) -> Option<Workflow> {
        let Some(target) = self.find(id) else {
            warn!(post_id = id.0, "delete requested for a post that is not listed");
            return None;
        };
        let message = format!("Delete \"{}\"? This cannot be undone.", target.title);
        let confirmations = Arc::clone(&self.confirmations);
        Some(Box::pin(async move {
            confirmations
                .open(DELETE_TITLE, &message)
                .await
                .is_confirmed()
                .then_some(Request::Delete(id))
        }))
    }

    /// Issues the repository call for a resolved workflow.
    pub fn submit(&mut self, request: Request) -> Dispatch {
        let repository = Arc::clone(&self.repository);
        match request {
            Request::Create(draft) => {
                let pending = self
                    .notifications
                    .show(Notification::pending(SAVING_MESSAGE));
                debug!(title = %draft.title, "issuing post create");
                self.spawn_call(async move {
                    Completion::Created {
                        pending,
                        result: repository.create(draft).await,
                    }
                });
            }
            Request::Update { original, patch } => {
                let Some(id) = original.id else {
                    warn!("update requested for a post without id");
                    return Dispatch::Skipped;
                };
                let payload = original.merged(&patch);
                let pending = self
                    .notifications
                    .show(Notification::pending(UPDATING_MESSAGE));
                debug!(post_id = id.0, unchanged = patch.is_empty(), "issuing post update");
                self.spawn_call(async move {
                    Completion::Updated {
                        id,
                        pending,
                        result: repository.update(id, payload).await,
                    }
                });
            }
            Request::Delete(id) => {
                debug!(post_id = id.0, "issuing post delete");
                self.spawn_call(async move {
                    Completion::Deleted {
                        id,
                        result: repository.delete(id).await,
                    }
                });
            }
        }
        Dispatch::Issued
    }

    async fn finish(&mut self, workflow: Workflow) -> Dispatch {
        match workflow.await {
            Some(request) => self.submit(request),
            None => Dispatch::Cancelled,
        }
    }

    /// Runs the create workflow to the point where the repository call is
    /// issued. Completions are not applied while the form is open; drive
    /// [`open_create`](Self::open_create) and [`submit`](Self::submit)
    /// separately for that.
    pub async fn create(&mut self) -> Dispatch {
        let workflow = self.open_create();
        self.finish(workflow).await
    }

    pub async fn edit(&mut self, id: PostId) -> Dispatch {
        match self.open_edit(id) {
            Some(workflow) => self.finish(workflow).await,
            None => Dispatch::Skipped,
        }
    }

    pub async fn delete(&mut self, id: PostId) -> Dispatch {
        match self.open_delete(id) {
            Some(workflow) => self.finish(workflow).await,
            None => Dispatch::Skipped,
        }
    }

    /// Applies every completion that already arrived, without waiting.
    pub fn apply_ready(&mut self) -> Vec<Result<Applied, TableError>> {
        let mut applied = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            applied.push(self.apply(completion));
        }
        applied
    }

    /// Waits for the next completion and applies it. `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Result<Applied, TableError>> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.completion_rx.recv().await?;
        Some(self.apply(completion))
    }

    /// Applies completions until no repository call is in flight.
    pub async fn settle(&mut self) -> Vec<Result<Applied, TableError>> {
        let mut applied = Vec::new();
        while let Some(result) = self.next_completion().await {
            applied.push(result);
        }
        applied
    }

    fn apply(&mut self, completion: Completion) -> Result<Applied, TableError> {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Listed(Ok(posts)) => {
                self.records = unique_posts(posts);
                self.finish_load(LoadState::Loaded);
                self.paginator.clamp(self.records.len());
                info!(count = self.records.len(), "posts loaded");
                Ok(Applied::Loaded {
                    count: self.records.len(),
                })
            }
            Completion::Listed(Err(source)) => {
                self.finish_load(LoadState::LoadFailed);
                self.fail(TableError::Fetch(source), None)
            }
            Completion::Created { pending, result } => {
                match result.and_then(|post| self.accept_created(post)) {
                    Ok((id, post)) => {
                        self.notifications.dismiss(pending);
                        self.notify_success(format!("Post {id} created"));
                        self.records.insert(0, post);
                        info!(post_id = id.0, "post created");
                        Ok(Applied::Created(id))
                    }
                    Err(source) => self.fail(TableError::Create(source), Some(pending)),
                }
            }
            Completion::Updated {
                id,
                pending,
                result,
            } => match result {
                Ok(post) => {
                    let updated_id = post.id.unwrap_or(id);
                    self.notifications.dismiss(pending);
                    self.notify_success(format!("Post {updated_id} updated"));
                    let replaced = match self
                        .records
                        .iter_mut()
                        .find(|existing| existing.id == Some(updated_id))
                    {
                        Some(slot) => {
                            *slot = Post {
                                id: Some(updated_id),
                                ..post
                            };
                            true
                        }
                        None => false,
                    };
                    if replaced {
                        info!(post_id = updated_id.0, "post updated");
                    } else {
                        debug!(post_id = updated_id.0, "updated post no longer listed");
                    }
                    Ok(Applied::Updated {
                        id: updated_id,
                        replaced,
                    })
                }
                Err(source) => self.fail(TableError::Update { id, source }, Some(pending)),
            },
            Completion::Deleted { id, result } => match result {
                Ok(()) => {
                    let before = self.records.len();
                    self.records.retain(|post| post.id != Some(id));
                    let removed = before - self.records.len();
                    self.paginator.clamp(self.records.len());
                    self.notify_success(format!("Post {id} deleted"));
                    info!(post_id = id.0, removed, "post deleted");
                    Ok(Applied::Deleted { id, removed })
                }
                Err(source) => self.fail(TableError::Delete { id, source }, None),
            },
        }
    }

    // Later fetches may still be running; the table stays loading until the last lands.
    fn finish_load(&mut self, outcome: LoadState) {
        self.loads_in_flight = self.loads_in_flight.saturating_sub(1);
        if self.loads_in_flight == 0 {
            self.is_loading = false;
            self.load_state = outcome;
        }
    }

    // A created post must carry a fresh id, or the list would stop being unique.
    fn accept_created(&self, post: Post) -> Result<(PostId, Post), RepositoryError> {
        let Some(id) = post.id else {
            return Err(RepositoryError::InvalidResponse(
                "created post has no id".to_string(),
            ));
        };
        if self.find(id).is_some() {
            return Err(RepositoryError::InvalidResponse(format!(
                "created post id {id} is already listed"
            )));
        }
        Ok((id, post))
    }

    fn notify_success(&mut self, message: String) {
        let duration = self.notification_duration;
        self.notifications
            .show(Notification::success(message, duration));
    }

    fn fail(
        &mut self,
        err: TableError,
        pending: Option<NotificationHandle>,
    ) -> Result<Applied, TableError> {
        if let Some(pending) = pending {
            self.notifications.dismiss(pending);
        }
        warn!(error = %err, source = %err.repository_error(), "table operation failed");
        let message = describe_failure(&err);
        let duration = self.notification_duration;
        self.notifications
            .show(Notification::error(message, duration));
        Err(err)
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next_page(self.records.len())
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous_page()
    }

    pub fn first_page(&mut self) {
        self.paginator.first_page();
    }

    pub fn last_page(&mut self) {
        self.paginator.last_page(self.records.len());
    }

    pub fn set_page(&mut self, index: usize) {
        self.paginator.set_page(index, self.records.len());
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), PageError> {
        self.paginator.set_page_size(size)
    }
}

/// Keeps the first post for each id and drops posts without one.
fn unique_posts(posts: Vec<Post>) -> Vec<Post> {
    let mut seen = HashSet::new();
    let total = posts.len();
    let unique: Vec<Post> = posts
        .into_iter()
        .filter(|post| post.id.is_some_and(|id| seen.insert(id)))
        .collect();
    if unique.len() != total {
        warn!(
            dropped = total - unique.len(),
            "post list contained duplicate or missing ids"
        );
    }
    unique
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
