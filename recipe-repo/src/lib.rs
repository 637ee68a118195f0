use async_trait::async_trait;
use std::sync::Arc;

pub mod ingredient_repo;
pub mod recipe_repo;
pub mod tag_repo;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

use ingredient_repo::IngredientRepo;
use recipe_repo::RecipeRepo;
use tag_repo::TagRepo;
use user_repo::UserRepo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

/// Handles to every repository, all backed by the same storage.
#[derive(Clone)]
pub struct Repos {
    pub user_repo: Arc<dyn UserRepo>,
    pub tag_repo: Arc<dyn TagRepo>,
    pub ingredient_repo: Arc<dyn IngredientRepo>,
    pub recipe_repo: Arc<dyn RecipeRepo>,
    pub health_check: Arc<dyn HealthCheck>,
}

impl Repos {
    fn from_backend<R>(backend: Arc<R>) -> Repos
    where
        R: UserRepo + TagRepo + IngredientRepo + RecipeRepo + HealthCheck + 'static,
    {
        Repos {
            user_repo: backend.clone(),
            tag_repo: backend.clone(),
            ingredient_repo: backend.clone(),
            recipe_repo: backend.clone(),
            health_check: backend,
        }
    }
}
