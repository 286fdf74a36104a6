//! The remote post collection contract and an in-process implementation of it.

use async_trait::async_trait;
use shared::domain::{Post, PostDraft, PostId};
use tokio::sync::Mutex;

use crate::error::RepositoryError;

/// List/create/update/delete against the post collection. Every call resolves
/// exactly once.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, RepositoryError>;
    /// The server assigns the identifier of the returned post.
    async fn create(&self, draft: PostDraft) -> Result<Post, RepositoryError>;
    async fn update(&self, id: PostId, post: Post) -> Result<Post, RepositoryError>;
    async fn delete(&self, id: PostId) -> Result<(), RepositoryError>;
}

#[derive(Default)]
struct MemoryState {
    posts: Vec<Post>,
    next_id: i64,
    offline: bool,
}

/// Keeps the collection in memory. Used for offline sessions and tests.
#[derive(Default)]
pub struct MemoryPostRepository {
    inner: Mutex<MemoryState>,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Posts without an identifier get the next free one.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let mut next_id = posts
            .iter()
            .filter_map(|post| post.id)
            .map(|id| id.0)
            .max()
            .unwrap_or(0);
        let posts = posts
            .into_iter()
            .map(|mut post| {
                if post.id.is_none() {
                    next_id += 1;
                    post.id = Some(PostId(next_id));
                }
                post
            })
            .collect();
        Self {
            inner: Mutex::new(MemoryState {
                posts,
                next_id,
                offline: false,
            }),
        }
    }

    /// While offline every call fails with [`RepositoryError::Unavailable`].
    pub async fn set_offline(&self, offline: bool) {
        self.inner.lock().await.offline = offline;
    }

    pub async fn snapshot(&self) -> Vec<Post> {
        self.inner.lock().await.posts.clone()
    }
}

fn ensure_online(state: &MemoryState) -> Result<(), RepositoryError> {
    if state.offline {
        return Err(RepositoryError::Unavailable(
            "memory repository is offline".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let guard = self.inner.lock().await;
        ensure_online(&guard)?;
        Ok(guard.posts.clone())
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepositoryError> {
        let mut guard = self.inner.lock().await;
        ensure_online(&guard)?;
        guard.next_id += 1;
        let post = draft.with_id(PostId(guard.next_id));
        guard.posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: PostId, post: Post) -> Result<Post, RepositoryError> {
        let mut guard = self.inner.lock().await;
        ensure_online(&guard)?;
        let slot = guard
            .posts
            .iter_mut()
            .find(|existing| existing.id == Some(id))
            .ok_or(RepositoryError::NotFound(id))?;
        *slot = Post {
            id: Some(id),
            ..post
        };
        Ok(slot.clone())
    }

    async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let mut guard = self.inner.lock().await;
        ensure_online(&guard)?;
        let before = guard.posts.len();
        guard.posts.retain(|post| post.id != Some(id));
        if guard.posts.len() == before {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::UserId;

    use super::*;

    fn draft(title: &str) -> PostDraft {
        PostDraft {
            user_id: UserId(1),
            title: title.to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn assigns_ids_after_seeded_maximum() {
        let repo = MemoryPostRepository::with_posts(vec![
            draft("a").with_id(PostId(7)),
            Post {
                id: None,
                ..draft("b").with_id(PostId(0))
            },
        ]);

        let created = repo.create(draft("c")).await.expect("create");

        let ids: Vec<_> = repo.snapshot().await.iter().filter_map(|p| p.id).collect();
        assert_eq!(ids, vec![PostId(7), PostId(8), PostId(9)]);
        assert_eq!(created.id, Some(PostId(9)));
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_posts() {
        let repo = MemoryPostRepository::new();
        let err = repo
            .update(PostId(3), draft("x").with_id(PostId(3)))
            .await
            .expect_err("missing");
        assert!(matches!(err, RepositoryError::NotFound(PostId(3))));
        assert!(matches!(
            repo.delete(PostId(3)).await,
            Err(RepositoryError::NotFound(PostId(3)))
        ));
    }

    #[tokio::test]
    async fn offline_repository_fails_every_call() {
        let repo = MemoryPostRepository::with_posts(vec![draft("a").with_id(PostId(1))]);
        repo.set_offline(true).await;

        assert!(matches!(
            repo.list().await,
            Err(RepositoryError::Unavailable(_))
        ));
        assert!(repo.create(draft("b")).await.is_err());
        assert!(repo.delete(PostId(1)).await.is_err());

        repo.set_offline(false).await;
        assert_eq!(repo.list().await.expect("online").len(), 1);
    }
}
