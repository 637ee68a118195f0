mod handlers;

use actix_web::{web, Scope};
use recipe_repo::user_repo::User;
use serde::{Deserialize, Serialize};

pub use recipe_repo::user_repo::UserId;

/// The public view of an account. The password hash never leaves the service.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            email: user.email,
            name: user.name,
        }
    }
}

/// Management of the authenticated user's own account.
pub fn account_service() -> Scope {
    web::scope("/users/me")
        .service(handlers::get_me)
        .service(handlers::replace_me)
        .service(handlers::update_me)
}
