use crate::user_repo::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
}

impl Ingredient {
    pub fn new(id: i32, name: String) -> Ingredient {
        Ingredient { id, name }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewIngredient {
    pub name: String,
}

impl NewIngredient {
    pub fn new(name: String) -> NewIngredient {
        NewIngredient { name }
    }
}

#[derive(Error, Debug)]
pub enum IngredientRepoError {
    #[error("Ingredient with id {0} not found")]
    IngredientNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait IngredientRepo: Sync + Send {
    async fn create_ingredient(
        &self,
        user: UserId,
        new_ingredient: NewIngredient,
    ) -> Result<Ingredient, IngredientRepoError>;

    async fn get_ingredients(
        &self,
        user: UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, IngredientRepoError>;

    async fn delete_ingredient(
        &self,
        user: UserId,
        ingredient_id: i32,
    ) -> Result<Ingredient, IngredientRepoError>;
}
