//! Client-side core of the posts table: repository clients, the modal
//! workflow seams, notifications, pagination and the synchronization
//! controller that ties them together.

pub mod collectors;
pub mod controller;
pub mod error;
pub mod http_repository;
pub mod notification;
pub mod pagination;
pub mod repository;

pub use collectors::{Confirmation, ConfirmationCollector, EditFormCollector, FormOutcome};
pub use controller::{
    Applied, Collaborators, ControllerOptions, Dispatch, LoadState, Request, TableController,
    TableView, Workflow, COLUMNS,
};
pub use error::{describe_failure, RepositoryError, TableError};
pub use http_repository::{HttpPostRepository, DEFAULT_SERVER_URL};
pub use notification::{
    DismissTarget, DurationPolicy, Notification, NotificationHandle, NotificationKind,
    NotificationSink,
};
pub use pagination::{PageError, PageInfo, Paginator};
pub use repository::{MemoryPostRepository, PostRepository};
