use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(PostId);
id_newtype!(UserId);

/// A single record of the managed collection.
///
/// `id` is absent until the server has persisted the post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Applies `patch` to a copy of this post. Fields the patch leaves out keep
    /// their current value and the identifier is always carried over.
    pub fn merged(&self, patch: &PostPatch) -> Post {
        Post {
            id: self.id,
            user_id: patch.user_id.unwrap_or(self.user_id),
            title: patch.title.clone().unwrap_or_else(|| self.title.clone()),
            body: patch.body.clone().unwrap_or_else(|| self.body.clone()),
        }
    }
}

/// An unpersisted post collected in create mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub user_id: UserId,
    pub title: String,
    pub body: String,
}

impl PostDraft {
    pub fn with_id(self, id: PostId) -> Post {
        Post {
            id: Some(id),
            user_id: self.user_id,
            title: self.title,
            body: self.body,
        }
    }
}

/// Partial update collected in edit mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.user_id.is_none() && self.title.is_none() && self.body.is_none()
    }
}
