use async_trait::async_trait;
use thiserror::Error;

pub type UserId = i32;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: UserId) -> Result<User, UserRepoError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, UserRepoError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, UserRepoError>;
    async fn update_user(&self, user_id: UserId, update: UserUpdate)
        -> Result<User, UserRepoError>;
    async fn delete_user(&self, user_id: UserId) -> Result<(), UserRepoError>;
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn new(email: String, name: String, password_hash: String) -> NewUser {
        NewUser {
            email,
            name,
            password_hash,
        }
    }

    pub fn to_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
        }
    }
}

/// Fields left as `None` keep their stored value.
#[derive(Clone, Debug, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

impl UserUpdate {
    pub fn apply(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(UserId),
    #[error("No user with email {0}")]
    EmailNotFound(String),
    #[error("User with email {0} already exists")]
    EmailAlreadyExists(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
