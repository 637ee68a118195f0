use actix_multipart::MultipartError;
use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use recipe_repo::ingredient_repo::IngredientRepoError;
use recipe_repo::recipe_repo::RecipeRepoError;
use recipe_repo::tag_repo::TagRepoError;
use recipe_repo::user_repo::UserRepoError;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::error;

/// Messages keyed by the request field they refer to.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> FieldErrors {
        FieldErrors::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn check<T>(&mut self, field: &str, result: Result<T, &'static str>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.add(field, message);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_result(self) -> Result<(), HandlerError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(HandlerError::Invalid(self))
        }
    }
}

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Invalid request: {0:?}")]
    Invalid(FieldErrors),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HandlerError {
    pub fn invalid(field: &str, message: impl Into<String>) -> HandlerError {
        HandlerError::Invalid(FieldErrors::single(field, message))
    }
}

fn invalid_pk(id: i32) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

impl From<UserRepoError> for HandlerError {
    fn from(e: UserRepoError) -> Self {
        match e {
            UserRepoError::EmailAlreadyExists(_) => {
                HandlerError::invalid("email", "user with this email already exists.")
            }
            UserRepoError::UserNotFound(_) | UserRepoError::EmailNotFound(_) => {
                HandlerError::NotFound(e.to_string())
            }
            UserRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<TagRepoError> for HandlerError {
    fn from(e: TagRepoError) -> Self {
        match e {
            TagRepoError::TagNotFound(_) => HandlerError::NotFound(e.to_string()),
            TagRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<IngredientRepoError> for HandlerError {
    fn from(e: IngredientRepoError) -> Self {
        match e {
            IngredientRepoError::IngredientNotFound(_) => HandlerError::NotFound(e.to_string()),
            IngredientRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<RecipeRepoError> for HandlerError {
    fn from(e: RecipeRepoError) -> Self {
        match e {
            RecipeRepoError::RecipeNotFound(_) => HandlerError::NotFound(e.to_string()),
            RecipeRepoError::TagNotFound(id) => HandlerError::invalid("tags", invalid_pk(id)),
            RecipeRepoError::IngredientNotFound(id) => {
                HandlerError::invalid("ingredients", invalid_pk(id))
            }
            RecipeRepoError::Other(e) => HandlerError::Internal(e),
        }
    }
}

impl From<argon2::Error> for HandlerError {
    fn from(e: argon2::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Password hashing failed"))
    }
}

impl From<jsonwebtoken::errors::Error> for HandlerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        HandlerError::Internal(anyhow::Error::new(e).context("Unable to create token"))
    }
}

impl From<MultipartError> for HandlerError {
    fn from(e: MultipartError) -> Self {
        HandlerError::invalid(
            "image",
            format!(
                "The submitted data was not a file. Check the encoding type on the form. ({})",
                e
            ),
        )
    }
}

impl ResponseError for HandlerError {
    fn status_code(&self) -> StatusCode {
        match self {
            HandlerError::Invalid(_) => StatusCode::BAD_REQUEST,
            HandlerError::NotFound(_) => StatusCode::NOT_FOUND,
            HandlerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        match self {
            HandlerError::Invalid(errors) => HttpResponse::BadRequest().json(errors),
            HandlerError::NotFound(_) => {
                HttpResponse::NotFound().json(serde_json::json!({"detail": "Not found."}))
            }
            HandlerError::Internal(e) => {
                error!(error = ?e, "Request failed");
                HttpResponse::InternalServerError().finish()
            }
        }
    }
}
