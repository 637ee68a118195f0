use crate::ingredient_repo::Ingredient;
use crate::mem_repo::{MemRepo, State};
use crate::recipe_repo::RecipeRepoError::{IngredientNotFound, RecipeNotFound, TagNotFound};
use crate::recipe_repo::{
    NewRecipe, Recipe, RecipeDetail, RecipeFilter, RecipeRepo, RecipeRepoError,
};
use crate::tag_repo::Tag;
use crate::user_repo::UserId;
use async_trait::async_trait;
use std::collections::HashSet;

impl State {
    fn owns_recipe(&self, user: UserId, recipe_id: i32) -> bool {
        self.user_recipes
            .get(&user)
            .map_or(false, |ids| ids.contains(&recipe_id))
    }

    fn check_links(&self, user: UserId, recipe: &NewRecipe) -> Result<(), RecipeRepoError> {
        if let Some(id) = recipe.tags.iter().find(|id| !self.tags.owned_by(user, **id)) {
            return Err(TagNotFound(*id));
        }
        if let Some(id) = recipe
            .ingredients
            .iter()
            .find(|id| !self.ingredients.owned_by(user, **id))
        {
            return Err(IngredientNotFound(*id));
        }
        Ok(())
    }

    fn recipe(&self, user: UserId, recipe_id: i32) -> Result<&Recipe, RecipeRepoError> {
        if !self.owns_recipe(user, recipe_id) {
            return Err(RecipeNotFound(recipe_id));
        }
        self.recipes
            .get(&recipe_id)
            .ok_or(RecipeNotFound(recipe_id))
    }

    fn recipe_mut(&mut self, user: UserId, recipe_id: i32) -> Result<&mut Recipe, RecipeRepoError> {
        if !self.owns_recipe(user, recipe_id) {
            return Err(RecipeNotFound(recipe_id));
        }
        self.recipes
            .get_mut(&recipe_id)
            .ok_or(RecipeNotFound(recipe_id))
    }
}

#[async_trait]
impl RecipeRepo for MemRepo {
    async fn get_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError> {
        let read_guard = self.read_lock()?;

        read_guard.recipe(user, recipe_id).cloned()
    }

    async fn get_recipe_detail(
        &self,
        user: UserId,
        recipe_id: i32,
    ) -> Result<RecipeDetail, RecipeRepoError> {
        let read_guard = self.read_lock()?;

        let recipe = read_guard.recipe(user, recipe_id)?.clone();
        let tags = recipe
            .tags
            .iter()
            .map(|id| Ok(Tag::new(*id, read_guard.tags.name(*id)?.to_owned())))
            .collect::<Result<Vec<_>, anyhow::Error>>()?;
        let ingredients = recipe
            .ingredients
            .iter()
            .map(|id| {
                Ok(Ingredient::new(
                    *id,
                    read_guard.ingredients.name(*id)?.to_owned(),
                ))
            })
            .collect::<Result<Vec<_>, anyhow::Error>>()?;

        Ok(RecipeDetail::from_recipe(recipe, tags, ingredients))
    }

    async fn get_recipes(
        &self,
        user: UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepoError> {
        let read_guard = self.read_lock()?;

        let mut recipes: Vec<Recipe> = read_guard
            .recipes_of(user)
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(recipes)
    }

    async fn create_recipe(
        &self,
        user: UserId,
        new_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard.check_links(user, &new_recipe)?;

        let id = write_guard.next_recipe_id;
        write_guard.next_recipe_id += 1;

        let recipe = new_recipe.to_recipe(id, None);
        write_guard.recipes.insert(id, recipe.clone());
        write_guard
            .user_recipes
            .entry(user)
            .or_insert_with(HashSet::new)
            .insert(id);

        Ok(recipe)
    }

    async fn update_recipe(
        &self,
        user: UserId,
        recipe_id: i32,
        updated_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError> {
        let mut write_guard = self.write_lock()?;

        let image = write_guard.recipe(user, recipe_id)?.image.clone();
        write_guard.check_links(user, &updated_recipe)?;

        let recipe = updated_recipe.to_recipe(recipe_id, image);
        *write_guard.recipe_mut(user, recipe_id)? = recipe.clone();

        Ok(recipe)
    }

    async fn set_recipe_image(
        &self,
        user: UserId,
        recipe_id: i32,
        image: String,
    ) -> Result<Option<String>, RecipeRepoError> {
        let mut write_guard = self.write_lock()?;

        let recipe = write_guard.recipe_mut(user, recipe_id)?;
        Ok(recipe.image.replace(image))
    }

    async fn delete_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.owns_recipe(user, recipe_id) {
            return Err(RecipeNotFound(recipe_id));
        }
        if let Some(ids) = write_guard.user_recipes.get_mut(&user) {
            ids.remove(&recipe_id);
        }
        write_guard
            .recipes
            .remove(&recipe_id)
            .ok_or(RecipeNotFound(recipe_id))
    }
}
