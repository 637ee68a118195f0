use crate::auth::jwt::JWTAuth;
use crate::auth::password;
use crate::error::HandlerError;
use crate::payload::{JsonObject, Payload};
use crate::user::UserResponse;
use crate::validation;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use anyhow::anyhow;
use recipe_repo::user_repo::{NewUser, UserRepo, UserRepoError};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

#[post("/create/")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let mut payload = Payload::new(body);
    let email = payload
        .required::<String>("email")
        .and_then(|email| payload.check("email", validation::normalize_email(&email)));
    let password = payload.required::<String>("password").and_then(|password| {
        payload
            .check("password", validation::validate_password(&password))
            .map(|_| password)
    });
    let name = payload
        .required::<String>("name")
        .and_then(|name| payload.check("name", validation::validate_name(&name)));
    let ((email, password), name) = payload.finish_with(email.zip(password).zip(name))?;

    let password_hash = password::encode_password(&password)?;
    let user = user_repo
        .create_user(NewUser::new(email, name, password_hash))
        .await?;
    info!(user_id = user.id, "Created user");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

fn authentication_failed() -> HandlerError {
    HandlerError::invalid(
        "non_field_errors",
        "Unable to authenticate with provided credentials.",
    )
}

#[post("/token/")]
pub async fn get_token(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    body: JsonObject,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let mut payload = Payload::new(body);
    let email = payload.required::<String>("email");
    let password = payload.required::<String>("password");
    let (email, password) = payload.finish_with(email.zip(password))?;

    let Ok(email) = validation::normalize_email(&email) else {
        return Err(authentication_failed());
    };
    let user = match user_repo.get_user_by_email(&email).await {
        Ok(user) => user,
        Err(UserRepoError::EmailNotFound(_)) => return Err(authentication_failed()),
        Err(e) => return Err(e.into()),
    };

    let matched = password::verify_password(&password, &user.password_hash)?;
    if !matched {
        return Err(authentication_failed());
    }

    let jwt_auth = req
        .app_data::<JWTAuth>()
        .ok_or_else(|| anyhow!("JWTAuth missing from app data"))?;
    let token = jwt_auth.create_token(user.id)?;
    Ok(HttpResponse::Ok().json(json!({ "token": token })))
}
