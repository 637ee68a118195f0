use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::UserRepoError::{EmailAlreadyExists, EmailNotFound, UserNotFound};
use crate::user_repo::{NewUser, User, UserId, UserRepo, UserRepoError, UserUpdate};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query, query_as};
use tracing::instrument;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |e| e.is_unique_violation())
}

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError> {
        let user: Option<User> = query_as(
            "SELECT id, email, name, password_hash FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", user_id))?;
        user.ok_or(UserNotFound(user_id))
    }

    #[instrument(skip(self))]
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError> {
        let user: Option<User> = query_as(
            "SELECT id, email, name, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to get user {}", email))?;
        user.ok_or_else(|| EmailNotFound(email.to_owned()))
    }

    #[instrument(skip(self, new_user), fields(email = %new_user.email))]
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError> {
        let user: Option<User> = query_as(
            "INSERT INTO users(email, name, password_hash) VALUES ($1, $2, $3) ON CONFLICT (email) DO NOTHING RETURNING id, email, name, password_hash",
        )
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to create user {}", new_user.email))?;
        user.ok_or(EmailAlreadyExists(new_user.email))
    }

    #[instrument(skip(self, update))]
    async fn update_user(
        &self,
        user_id: UserId,
        update: UserUpdate,
    ) -> Result<User, UserRepoError> {
        let result: Result<Option<User>, sqlx::Error> = query_as(
            "UPDATE users SET email = COALESCE($1, email), name = COALESCE($2, name), password_hash = COALESCE($3, password_hash) WHERE id = $4 RETURNING id, email, name, password_hash",
        )
        .bind(&update.email)
        .bind(&update.name)
        .bind(&update.password_hash)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(user) => user.ok_or(UserNotFound(user_id)),
            Err(err) if is_unique_violation(&err) => {
                Err(EmailAlreadyExists(update.email.unwrap_or_default()))
            }
            Err(err) => Err(anyhow::Error::new(err)
                .context(format!("Unable to update user {}", user_id))
                .into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserNotFound(user_id))
        }
    }
}
