use std::sync::Arc;

use recipe_lib::auth::jwt::JWTAuth;
use recipe_lib::auth::password;
use recipe_lib::media::MediaStore;
use recipe_lib::user::UserId;
use recipe_repo::user_repo::{NewUser, UserRepo};
use recipe_repo::Repos;
use rstest::*;
use tempfile::TempDir;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

pub mod mock;

pub const TEST_PASSWORD: &str = "correct horse";
pub const MEDIA_URL: &str = "/media/";

/// Mounts the authenticated services with [mock::MockAuthentication] standing in for bearer
/// tokens.
#[allow(unused_macros)]
macro_rules! build_app {
    ($repos:expr, $media:expr, $user_id:expr) => {{
        let repos: recipe_repo::Repos = $repos.clone();
        let user_id: recipe_lib::user::UserId = $user_id;
        let app = actix_web::App::new()
            .app_data(actix_web::web::Data::new(repos.user_repo))
            .app_data(actix_web::web::Data::new(repos.tag_repo))
            .app_data(actix_web::web::Data::new(repos.ingredient_repo))
            .app_data(actix_web::web::Data::new(repos.recipe_repo))
            .app_data(actix_web::web::Data::new($media.clone()))
            .app_data(recipe_lib::json_config())
            .app_data(recipe_lib::query_config())
            .wrap(recipe_lib::tracing::create_middleware())
            .service(
                recipe_lib::user::account_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id }),
            )
            .service(
                recipe_lib::tag::tag_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id }),
            )
            .service(
                recipe_lib::ingredient::ingredient_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id }),
            )
            .service(
                recipe_lib::recipe::recipe_service()
                    .wrap(crate::utils::mock::MockAuthentication { user_id }),
            );
        tracing::info!("Built app");
        actix_web::test::init_service(app).await
    }};
}

/// Mounts everything the way the server does, including real bearer authentication.
#[allow(unused_macros)]
macro_rules! build_server_app {
    ($repos:expr, $jwt_auth:expr, $media:expr, $signups_enabled:expr) => {{
        let app = actix_web::App::new()
            .wrap(recipe_lib::tracing::create_middleware())
            .configure(recipe_lib::app_config_func(
                $jwt_auth.clone(),
                $repos.clone(),
                $media.clone(),
                $signups_enabled,
            ));
        tracing::info!("Built server app");
        actix_web::test::init_service(app).await
    }};
}

/// Sends a JSON request and returns the status together with the decoded body.
#[allow(unused_macros)]
macro_rules! call_json {
    (&$service:ident, $method:ident, $uri:expr) => {{
        let request = actix_web::test::TestRequest::$method()
            .uri(&$uri)
            .to_request();
        let response = actix_web::test::call_service(&$service, request).await;
        let status = response.status();
        let body = actix_web::test::read_body(response).await;
        let body: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }};
    (&$service:ident, $method:ident, $uri:expr, $payload:expr) => {{
        let request = actix_web::test::TestRequest::$method()
            .uri(&$uri)
            .set_json(&$payload)
            .to_request();
        let response = actix_web::test::call_service(&$service, request).await;
        let status = response.status();
        let body = actix_web::test::read_body(response).await;
        let body: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, body)
    }};
}

#[allow(unused_macros)]
macro_rules! create_tag {
    (&$service:ident, $name:expr) => {{
        let (status, body) = call_json!(&$service, post, "/tags/", serde_json::json!({ "name": $name }));
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{}", body);
        let tag: recipe_repo::tag_repo::Tag = serde_json::from_value(body).unwrap();
        tag
    }};
}

#[allow(unused_macros)]
macro_rules! create_ingredient {
    (&$service:ident, $name:expr) => {{
        let (status, body) = call_json!(
            &$service,
            post,
            "/ingredients/",
            serde_json::json!({ "name": $name })
        );
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{}", body);
        let ingredient: recipe_repo::ingredient_repo::Ingredient =
            serde_json::from_value(body).unwrap();
        ingredient
    }};
}

#[allow(unused_macros)]
macro_rules! create_recipe {
    (&$service:ident, $payload:expr) => {{
        let (status, body) = call_json!(&$service, post, "/recipes/", $payload);
        assert_eq!(
            status,
            actix_web::http::StatusCode::CREATED,
            "Got {} response when creating recipe: {}",
            status,
            body
        );
        let recipe: recipe_repo::recipe_repo::Recipe = serde_json::from_value(body).unwrap();
        recipe
    }};
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let email = format!("test-user-{}@example.com", Uuid::new_v4());
        let new_user = NewUser::new(
            email.clone(),
            "Test User".to_owned(),
            password::encode_password(TEST_PASSWORD).unwrap(),
        );
        let user = user_repo.create_user(new_user).await.unwrap();
        info!(user_id = user.id, %email, "Created user");
        TestUser {
            id: user.id,
            email,
            repo: user_repo.clone(),
        }
    }

    pub async fn delete(&self) {
        self.repo.delete_user(self.id).await.unwrap()
    }
}

/// Media store rooted in a temporary directory that lives as long as the returned guard.
pub struct TestMedia {
    pub dir: TempDir,
    pub store: MediaStore,
}

#[allow(dead_code)]
impl TestMedia {
    /// Files currently stored below `uploads/recipe`.
    pub fn stored_images(&self) -> Vec<std::path::PathBuf> {
        match std::fs::read_dir(self.dir.path().join("uploads/recipe")) {
            Ok(entries) => entries.map(|entry| entry.unwrap().path()).collect(),
            Err(_) => Vec::new(),
        }
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> Repos {
    recipe_repo::mem_repo::create_repos()
}

#[fixture]
pub fn media() -> TestMedia {
    let dir = tempfile::tempdir().unwrap();
    let store = MediaStore::new(dir.path(), MEDIA_URL);
    TestMedia { dir, store }
}

#[fixture]
pub fn jwt_auth() -> JWTAuth {
    let secret: [u8; 32] = rand::random();
    JWTAuth::from_secret(secret.to_vec())
}
