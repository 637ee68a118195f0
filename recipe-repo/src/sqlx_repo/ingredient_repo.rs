use crate::ingredient_repo::IngredientRepoError::IngredientNotFound;
use crate::ingredient_repo::{Ingredient, IngredientRepo, IngredientRepoError, NewIngredient};
use crate::sqlx_repo::catalog::INGREDIENTS;
use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::UserId;
use async_trait::async_trait;
use tracing::instrument;

#[async_trait]
impl IngredientRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn create_ingredient(
        &self,
        user: UserId,
        new_ingredient: NewIngredient,
    ) -> Result<Ingredient, IngredientRepoError> {
        let entry = self
            .insert_catalog_entry(&INGREDIENTS, user, &new_ingredient.name)
            .await?;
        Ok(Ingredient::new(entry.id, entry.name))
    }

    #[instrument(skip(self))]
    async fn get_ingredients(
        &self,
        user: UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, IngredientRepoError> {
        let ingredients = self
            .get_catalog_entries(&INGREDIENTS, user, assigned_only)
            .await?
            .into_iter()
            .map(|entry| Ingredient::new(entry.id, entry.name))
            .collect();
        Ok(ingredients)
    }

    #[instrument(skip(self))]
    async fn delete_ingredient(
        &self,
        user: UserId,
        ingredient_id: i32,
    ) -> Result<Ingredient, IngredientRepoError> {
        self.delete_catalog_entry(&INGREDIENTS, user, ingredient_id)
            .await?
            .map(|entry| Ingredient::new(entry.id, entry.name))
            .ok_or(IngredientNotFound(ingredient_id))
    }
}
