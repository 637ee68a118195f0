use crate::auth::password;
use crate::error::HandlerError;
use crate::payload::{JsonObject, Payload};
use crate::user::{UserId, UserResponse};
use crate::validation;
use actix_web::{web, HttpResponse, Responder};
use recipe_repo::user_repo::{UserRepo, UserUpdate};
use std::sync::Arc;

/// Applies the supplied account fields. A full replace requires every field, a partial update
/// only changes what is present.
async fn apply_update(
    user_repo: &Arc<dyn UserRepo>,
    user_id: UserId,
    body: JsonObject,
    partial: bool,
) -> Result<UserResponse, HandlerError> {
    let mut payload = Payload::new(body);
    let (email, name, password) = if partial {
        (
            payload.optional::<String>("email"),
            payload.optional::<String>("name"),
            payload.optional::<String>("password"),
        )
    } else {
        (
            payload.required::<String>("email"),
            payload.required::<String>("name"),
            payload.required::<String>("password"),
        )
    };

    let update = UserUpdate {
        email: email.and_then(|email| payload.check("email", validation::normalize_email(&email))),
        name: name.and_then(|name| payload.check("name", validation::validate_name(&name))),
        ..UserUpdate::default()
    };
    let password = password.and_then(|password| {
        payload
            .check("password", validation::validate_password(&password))
            .map(|_| password)
    });
    payload.finish()?;

    let update = match password {
        Some(password) => UserUpdate {
            password_hash: Some(password::encode_password(&password)?),
            ..update
        },
        None => update,
    };

    let user = user_repo.update_user(user_id, update).await?;
    Ok(user.into())
}

#[get("/")]
pub async fn get_me(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
) -> Result<impl Responder, HandlerError> {
    let user = user_repo.get_user(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[put("/")]
pub async fn replace_me(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let user = apply_update(&user_repo, user_id.into_inner(), body, false).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[patch("/")]
pub async fn update_me(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    user_id: web::ReqData<UserId>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let user = apply_update(&user_repo, user_id.into_inner(), body, true).await?;
    Ok(HttpResponse::Ok().json(user))
}
