//! REST implementation of [`PostRepository`] for JSONPlaceholder-style servers.

use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{Post, PostDraft, PostId},
    error::ApiError,
};
use tracing::debug;
use url::Url;

use crate::{error::RepositoryError, repository::PostRepository};

pub const DEFAULT_SERVER_URL: &str = "https://jsonplaceholder.typicode.com";

pub struct HttpPostRepository {
    http: Client,
    server_url: String,
}

impl HttpPostRepository {
    pub fn new(server_url: &str) -> Result<Self, RepositoryError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, RepositoryError> {
        let parsed = Url::parse(server_url.trim()).map_err(|source| RepositoryError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self {
            http,
            server_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    fn collection_url(&self) -> String {
        format!("{}/posts", self.server_url)
    }

    fn post_url(&self, id: PostId) -> String {
        format!("{}/posts/{}", self.server_url, id.0)
    }
}

/// Turns a non-success status into [`RepositoryError::Status`], keeping the
/// server's error body when it decodes.
async fn check_status(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.json::<ApiError>().await.ok();
    Err(RepositoryError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PostRepository for HttpPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepositoryError> {
        let url = self.collection_url();
        debug!(%url, "listing posts");
        let response = self.http.get(url).send().await?;
        let posts = check_status(response).await?.json().await?;
        Ok(posts)
    }

    async fn create(&self, draft: PostDraft) -> Result<Post, RepositoryError> {
        let url = self.collection_url();
        debug!(%url, "creating post");
        let response = self.http.post(url).json(&draft).send().await?;
        let post = check_status(response).await?.json().await?;
        Ok(post)
    }

    async fn update(&self, id: PostId, post: Post) -> Result<Post, RepositoryError> {
        let url = self.post_url(id);
        debug!(%url, "updating post");
        let payload = Post {
            id: Some(id),
            ..post
        };
        let response = self.http.put(url).json(&payload).send().await?;
        let post = check_status(response).await?.json().await?;
        Ok(post)
    }

    async fn delete(&self, id: PostId) -> Result<(), RepositoryError> {
        let url = self.post_url(id);
        debug!(%url, "deleting post");
        let response = self.http.delete(url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/http_repository_tests.rs"]
mod tests;
