use crate::ingredient_repo::IngredientRepoError::IngredientNotFound;
use crate::ingredient_repo::{Ingredient, IngredientRepo, IngredientRepoError, NewIngredient};
use crate::mem_repo::MemRepo;
use crate::user_repo::UserId;
use async_trait::async_trait;
use std::collections::HashSet;

#[async_trait]
impl IngredientRepo for MemRepo {
    async fn create_ingredient(
        &self,
        user: UserId,
        new_ingredient: NewIngredient,
    ) -> Result<Ingredient, IngredientRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard
            .ingredients
            .insert(user, new_ingredient.name.clone());
        Ok(Ingredient::new(id, new_ingredient.name))
    }

    async fn get_ingredients(
        &self,
        user: UserId,
        assigned_only: bool,
    ) -> Result<Vec<Ingredient>, IngredientRepoError> {
        let read_guard = self.read_lock()?;

        let mut ingredients = read_guard.ingredients.list(user)?;
        if assigned_only {
            let assigned: HashSet<i32> = read_guard
                .recipes_of(user)
                .flat_map(|r| r.ingredients.iter().copied())
                .collect();
            ingredients.retain(|(id, _)| assigned.contains(id));
        }

        Ok(ingredients
            .into_iter()
            .map(|(id, name)| Ingredient::new(id, name))
            .collect())
    }

    async fn delete_ingredient(
        &self,
        user: UserId,
        ingredient_id: i32,
    ) -> Result<Ingredient, IngredientRepoError> {
        let mut write_guard = self.write_lock()?;

        let name = write_guard
            .ingredients
            .remove(user, ingredient_id)
            .ok_or(IngredientNotFound(ingredient_id))?;
        for recipe in write_guard.recipes_of_mut(user) {
            recipe.ingredients.remove(&ingredient_id);
        }

        Ok(Ingredient::new(ingredient_id, name))
    }
}
