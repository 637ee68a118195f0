use crate::mem_repo::MemRepo;
use crate::tag_repo::TagRepoError::TagNotFound;
use crate::tag_repo::{NewTag, Tag, TagRepo, TagRepoError};
use crate::user_repo::UserId;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
impl TagRepo for MemRepo {
    async fn create_tag(&self, user: UserId, new_tag: NewTag) -> Result<Tag, TagRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.tags.insert(user, new_tag.name.clone());
        Ok(Tag::new(id, new_tag.name))
    }

    async fn get_tags(&self, user: UserId, assigned_only: bool) -> Result<Vec<Tag>, TagRepoError> {
        let read_guard = self.read_lock()?;

        let mut tags = read_guard.tags.list(user)?;
        if assigned_only {
            let assigned: HashSet<i32> = read_guard
                .recipes_of(user)
                .flat_map(|r| r.tags.iter().copied())
                .collect();
            tags.retain(|(id, _)| assigned.contains(id));
        }

        Ok(tags
            .into_iter()
            .map(|(id, name)| Tag::new(id, name))
            .collect())
    }

    async fn delete_tag(&self, user: UserId, tag_id: i32) -> Result<Tag, TagRepoError> {
        let mut write_guard = self.write_lock()?;

        let name = write_guard
            .tags
            .remove(user, tag_id)
            .ok_or(TagNotFound(tag_id))?;
        for recipe in write_guard.recipes_of_mut(user) {
            recipe.tags.remove(&tag_id);
        }

        Ok(Tag::new(tag_id, name))
    }
}
