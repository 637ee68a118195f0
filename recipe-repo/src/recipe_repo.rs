use crate::ingredient_repo::Ingredient;
use crate::tag_repo::Tag;
use crate::user_repo::UserId;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recipe {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub tags: BTreeSet<i32>,
    pub ingredients: BTreeSet<i32>,
}

/// A recipe with its tags and ingredients resolved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RecipeDetail {
    pub id: i32,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<Ingredient>,
}

impl RecipeDetail {
    pub fn from_recipe(recipe: Recipe, tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        RecipeDetail {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            image: recipe.image,
            tags,
            ingredients,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: BTreeSet<i32>,
    #[serde(default)]
    pub ingredients: BTreeSet<i32>,
}

impl NewRecipe {
    pub fn new(
        title: String,
        time_minutes: i32,
        price: Decimal,
        link: String,
        tags: BTreeSet<i32>,
        ingredients: BTreeSet<i32>,
    ) -> NewRecipe {
        NewRecipe {
            title,
            time_minutes,
            price,
            link,
            tags,
            ingredients,
        }
    }

    pub fn to_recipe(self, id: i32, image: Option<String>) -> Recipe {
        Recipe {
            id,
            title: self.title,
            time_minutes: self.time_minutes,
            price: self.price,
            link: self.link,
            image,
            tags: self.tags,
            ingredients: self.ingredients,
        }
    }
}

/// Restricts a recipe listing. Within one dimension a recipe matches if it is linked to any of
/// the listed ids; when both dimensions are set a recipe has to match both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeFilter {
    pub tags: Option<HashSet<i32>>,
    pub ingredients: Option<HashSet<i32>>,
}

impl RecipeFilter {
    pub const NONE: RecipeFilter = RecipeFilter {
        tags: None,
        ingredients: None,
    };

    pub fn new(tags: Option<HashSet<i32>>, ingredients: Option<HashSet<i32>>) -> RecipeFilter {
        RecipeFilter { tags, ingredients }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        fn any_linked(wanted: &Option<HashSet<i32>>, linked: &BTreeSet<i32>) -> bool {
            match wanted {
                None => true,
                Some(wanted) => linked.iter().any(|id| wanted.contains(id)),
            }
        }

        any_linked(&self.tags, &recipe.tags) && any_linked(&self.ingredients, &recipe.ingredients)
    }
}

#[derive(Error, Debug)]
pub enum RecipeRepoError {
    #[error("Recipe with id {0} not found")]
    RecipeNotFound(i32),
    #[error("Tag with id {0} not found")]
    TagNotFound(i32),
    #[error("Ingredient with id {0} not found")]
    IngredientNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait RecipeRepo: Sync + Send {
    async fn get_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError>;

    async fn get_recipe_detail(
        &self,
        user: UserId,
        recipe_id: i32,
    ) -> Result<RecipeDetail, RecipeRepoError>;

    /// Recipes matching `filter`, most recently created first.
    async fn get_recipes(
        &self,
        user: UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepoError>;

    /// Fails with [RecipeRepoError::TagNotFound] or [RecipeRepoError::IngredientNotFound] if a
    /// linked id does not belong to `user`.
    async fn create_recipe(
        &self,
        user: UserId,
        new_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError>;

    /// Replaces every field except the image. Tag and ingredient links are replaced wholesale.
    async fn update_recipe(
        &self,
        user: UserId,
        recipe_id: i32,
        updated_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError>;

    /// Sets the image location and returns the one it replaced.
    async fn set_recipe_image(
        &self,
        user: UserId,
        recipe_id: i32,
        image: String,
    ) -> Result<Option<String>, RecipeRepoError>;

    async fn delete_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError>;
}
