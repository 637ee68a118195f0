use crate::user_repo::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

impl Tag {
    pub fn new(id: i32, name: String) -> Tag {
        Tag { id, name }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTag {
    pub name: String,
}

impl NewTag {
    pub fn new(name: String) -> NewTag {
        NewTag { name }
    }
}

#[derive(Error, Debug)]
pub enum TagRepoError {
    #[error("Tag with id {0} not found")]
    TagNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait TagRepo: Sync + Send {
    async fn create_tag(&self, user: UserId, new_tag: NewTag) -> Result<Tag, TagRepoError>;

    /// Tags ordered by name, descending. With `assigned_only`, only tags linked to at least one
    /// recipe are returned.
    async fn get_tags(&self, user: UserId, assigned_only: bool) -> Result<Vec<Tag>, TagRepoError>;

    async fn delete_tag(&self, user: UserId, tag_id: i32) -> Result<Tag, TagRepoError>;
}
