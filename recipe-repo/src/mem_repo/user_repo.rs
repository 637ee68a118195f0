use crate::mem_repo::MemRepo;
use crate::user_repo::UserRepoError::{EmailAlreadyExists, EmailNotFound, UserNotFound};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError, UserUpdate};
use async_trait::async_trait;

#[async_trait]
impl UserRepo for MemRepo {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(&user_id)
            .cloned()
            .ok_or(UserNotFound(user_id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| EmailNotFound(email.to_owned()))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.users.values().any(|u| u.email == new_user.email) {
            return Err(EmailAlreadyExists(new_user.email));
        }

        let id = write_guard.next_user_id;
        write_guard.next_user_id += 1;

        let user = new_user.to_user(id);
        write_guard.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        update: UserUpdate,
    ) -> Result<User, UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if let Some(email) = &update.email {
            let taken = write_guard
                .users
                .values()
                .any(|u| u.id != user_id && &u.email == email);
            if taken {
                return Err(EmailAlreadyExists(email.clone()));
            }
        }

        let user = write_guard
            .users
            .get_mut(&user_id)
            .ok_or(UserNotFound(user_id))?;
        update.apply(user);

        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.users.remove(&user_id).is_none() {
            return Err(UserNotFound(user_id));
        }

        write_guard.tags.remove_user(user_id);
        write_guard.ingredients.remove_user(user_id);
        if let Some(recipe_ids) = write_guard.user_recipes.remove(&user_id) {
            for id in recipe_ids {
                write_guard.recipes.remove(&id);
            }
        }

        Ok(())
    }
}
