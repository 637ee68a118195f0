use crate::sqlx_repo::catalog::TAGS;
use crate::sqlx_repo::SQLxRepo;
use crate::tag_repo::TagRepoError::TagNotFound;
use crate::tag_repo::{NewTag, Tag, TagRepo, TagRepoError};
use crate::user_repo::UserId;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
impl TagRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn create_tag(&self, user: UserId, new_tag: NewTag) -> Result<Tag, TagRepoError> {
        let entry = self
            .insert_catalog_entry(&TAGS, user, &new_tag.name)
            .await?;
        Ok(Tag::new(entry.id, entry.name))
    }

    #[instrument(skip(self))]
    async fn get_tags(&self, user: UserId, assigned_only: bool) -> Result<Vec<Tag>, TagRepoError> {
        let tags = self
            .get_catalog_entries(&TAGS, user, assigned_only)
            .await?
            .into_iter()
            .map(|entry| Tag::new(entry.id, entry.name))
            .collect();
        Ok(tags)
    }

    #[instrument(skip(self))]
    async fn delete_tag(&self, user: UserId, tag_id: i32) -> Result<Tag, TagRepoError> {
        self.delete_catalog_entry(&TAGS, user, tag_id)
            .await?
            .map(|entry| Tag::new(entry.id, entry.name))
            .ok_or(TagNotFound(tag_id))
    }
}
