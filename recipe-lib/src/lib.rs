#[macro_use(get, post, put, patch, delete)]
extern crate actix_web;

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::web::Data;
use actix_web::{web, HttpResponse};
use actix_web_httpauth::middleware::HttpAuthentication;
use auth::jwt::JWTAuth;
use media::MediaStore;
use recipe_repo::Repos;

pub mod auth;
pub mod config;
mod error;
pub mod health;
pub mod ingredient;
pub mod media;
mod payload;
pub mod recipe;
pub mod tag;
pub mod tracing;
pub mod user;
mod validation;

/// Registers every service together with the shared state they need. Everything except token
/// issuance, signup and the health check sits behind bearer authentication.
pub fn app_config_func(
    jwt_auth: JWTAuth,
    repos: Repos,
    media: MediaStore,
    signups_enabled: bool,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let bearer_auth_middleware = HttpAuthentication::bearer(auth::credentials_validator);
        cfg.app_data(jwt_auth)
            .app_data(Data::new(repos.user_repo))
            .app_data(Data::new(repos.tag_repo))
            .app_data(Data::new(repos.ingredient_repo))
            .app_data(Data::new(repos.recipe_repo))
            .app_data(Data::new(repos.health_check))
            .app_data(Data::new(media))
            .app_data(json_config())
            .app_data(query_config())
            // must precede the public /users scope, which would otherwise swallow /users/me
            .service(user::account_service().wrap(bearer_auth_middleware.clone()))
            .service(tag::tag_service().wrap(bearer_auth_middleware.clone()))
            .service(ingredient::ingredient_service().wrap(bearer_auth_middleware.clone()))
            .service(recipe::recipe_service().wrap(bearer_auth_middleware))
            .service(auth::auth_service(signups_enabled))
            .service(health::health);
    }
}

/// Rejects undecodable JSON bodies with a 400 describing the problem.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            QueryPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse query string",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}
