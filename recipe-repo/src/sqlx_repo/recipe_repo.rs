use crate::ingredient_repo::Ingredient;
use crate::recipe_repo::RecipeRepoError::{IngredientNotFound, RecipeNotFound, TagNotFound};
use crate::recipe_repo::{
    NewRecipe, Recipe, RecipeDetail, RecipeFilter, RecipeRepo, RecipeRepoError,
};
use crate::sqlx_repo::catalog::{INGREDIENTS, TAGS};
use crate::sqlx_repo::SQLxRepo;
use crate::tag_repo::Tag;
use crate::user_repo::UserId;
use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{query, query_scalar, PgConnection, Postgres, QueryBuilder};
use tracing::instrument;

const SELECT_RECIPES: &str = r#"
    SELECT r.id, r.title, r.time_minutes, r.price, r.link, r.image,
           ARRAY(SELECT tag_id FROM recipe_tags WHERE recipe_id = r.id ORDER BY tag_id) AS tags,
           ARRAY(SELECT ingredient_id FROM recipe_ingredients WHERE recipe_id = r.id ORDER BY ingredient_id) AS ingredients
    FROM recipes r
    WHERE r.user_id = "#;

#[derive(sqlx::FromRow)]
struct RecipeEntry {
    id: i32,
    title: String,
    time_minutes: i32,
    price: Decimal,
    link: String,
    image: Option<String>,
    tags: Vec<i32>,
    ingredients: Vec<i32>,
}

impl From<RecipeEntry> for Recipe {
    fn from(value: RecipeEntry) -> Self {
        Recipe {
            id: value.id,
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price,
            link: value.link,
            image: value.image,
            tags: value.tags.into_iter().collect(),
            ingredients: value.ingredients.into_iter().collect(),
        }
    }
}

impl SQLxRepo {
    #[instrument(skip(self))]
    async fn get_recipe_entries(
        &self,
        user: UserId,
        recipe_id: Option<i32>,
        filter: RecipeFilter,
    ) -> Result<Vec<RecipeEntry>, RecipeRepoError> {
        let mut query_builder = QueryBuilder::<Postgres>::new(SELECT_RECIPES);
        query_builder.push_bind(user);
        if let Some(recipe_id) = recipe_id {
            query_builder.push(" AND r.id = ").push_bind(recipe_id);
        }
        if let Some(tags) = filter.tags {
            query_builder
                .push(" AND EXISTS (SELECT 1 FROM recipe_tags rt WHERE rt.recipe_id = r.id AND rt.tag_id = ANY(")
                .push_bind(tags.into_iter().collect::<Vec<i32>>())
                .push("))");
        }
        if let Some(ingredients) = filter.ingredients {
            query_builder
                .push(" AND EXISTS (SELECT 1 FROM recipe_ingredients ri WHERE ri.recipe_id = r.id AND ri.ingredient_id = ANY(")
                .push_bind(ingredients.into_iter().collect::<Vec<i32>>())
                .push("))");
        }
        query_builder.push(" ORDER BY r.id DESC");

        let recipe_entries: Vec<RecipeEntry> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get recipes for user {}", user))?;
        Ok(recipe_entries)
    }

    async fn get_recipe_entry(
        &self,
        user: UserId,
        recipe_id: i32,
    ) -> Result<RecipeEntry, RecipeRepoError> {
        self.get_recipe_entries(user, Some(recipe_id), RecipeFilter::NONE)
            .await?
            .pop()
            .ok_or(RecipeNotFound(recipe_id))
    }

    #[instrument(skip(conn, recipe))]
    async fn check_links(
        conn: &mut PgConnection,
        user: UserId,
        recipe: &NewRecipe,
    ) -> Result<(), RecipeRepoError> {
        let tags: Vec<i32> = recipe.tags.iter().copied().collect();
        if let Some(id) = Self::find_foreign_id(&mut *conn, &TAGS, user, &tags).await? {
            return Err(TagNotFound(id));
        }
        let ingredients: Vec<i32> = recipe.ingredients.iter().copied().collect();
        if let Some(id) = Self::find_foreign_id(&mut *conn, &INGREDIENTS, user, &ingredients).await?
        {
            return Err(IngredientNotFound(id));
        }
        Ok(())
    }

    async fn replace_recipe_links(
        conn: &mut PgConnection,
        recipe_id: i32,
        recipe: &NewRecipe,
    ) -> Result<(), RecipeRepoError> {
        let tags: Vec<i32> = recipe.tags.iter().copied().collect();
        Self::replace_links(&mut *conn, &TAGS, recipe_id, &tags).await?;
        let ingredients: Vec<i32> = recipe.ingredients.iter().copied().collect();
        Self::replace_links(&mut *conn, &INGREDIENTS, recipe_id, &ingredients).await?;
        Ok(())
    }
}

#[async_trait]
impl RecipeRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError> {
        self.get_recipe_entry(user, recipe_id)
            .await
            .map(|entry| entry.into())
    }

    #[instrument(skip(self))]
    async fn get_recipe_detail(
        &self,
        user: UserId,
        recipe_id: i32,
    ) -> Result<RecipeDetail, RecipeRepoError> {
        let recipe: Recipe = self.get_recipe_entry(user, recipe_id).await?.into();
        let tags = self
            .get_linked_entries(&TAGS, recipe_id)
            .await?
            .into_iter()
            .map(|entry| Tag::new(entry.id, entry.name))
            .collect();
        let ingredients = self
            .get_linked_entries(&INGREDIENTS, recipe_id)
            .await?
            .into_iter()
            .map(|entry| Ingredient::new(entry.id, entry.name))
            .collect();

        Ok(RecipeDetail::from_recipe(recipe, tags, ingredients))
    }

    #[instrument(skip(self))]
    async fn get_recipes(
        &self,
        user: UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepoError> {
        let recipes = self
            .get_recipe_entries(user, None, filter)
            .await?
            .into_iter()
            .map(|entry| entry.into())
            .collect();
        Ok(recipes)
    }

    #[instrument(skip(self, new_recipe))]
    async fn create_recipe(
        &self,
        user: UserId,
        new_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        Self::check_links(&mut *tx, user, &new_recipe).await?;

        let id: i32 = query_scalar(
            "INSERT INTO recipes(user_id, title, time_minutes, price, link) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user)
        .bind(&new_recipe.title)
        .bind(new_recipe.time_minutes)
        .bind(new_recipe.price)
        .bind(&new_recipe.link)
        .fetch_one(&mut *tx)
        .await
        .context("Unable to insert recipe")?;

        Self::replace_recipe_links(&mut *tx, id, &new_recipe).await?;

        tx.commit().await.context("Unable to commit transaction")?;

        Ok(new_recipe.to_recipe(id, None))
    }

    #[instrument(skip(self, updated_recipe))]
    async fn update_recipe(
        &self,
        user: UserId,
        recipe_id: i32,
        updated_recipe: NewRecipe,
    ) -> Result<Recipe, RecipeRepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Unable to begin transaction")?;

        let image: Option<String> = query_scalar::<_, Option<String>>(
            "UPDATE recipes SET title = $1, time_minutes = $2, price = $3, link = $4 WHERE user_id = $5 AND id = $6 RETURNING image",
        )
        .bind(&updated_recipe.title)
        .bind(updated_recipe.time_minutes)
        .bind(updated_recipe.price)
        .bind(&updated_recipe.link)
        .bind(user)
        .bind(recipe_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Unable to update recipe {}", recipe_id))?
        .ok_or(RecipeNotFound(recipe_id))?;

        Self::check_links(&mut *tx, user, &updated_recipe).await?;
        Self::replace_recipe_links(&mut *tx, recipe_id, &updated_recipe).await?;

        tx.commit().await.context("Unable to commit transaction")?;

        Ok(updated_recipe.to_recipe(recipe_id, image))
    }

    #[instrument(skip(self))]
    async fn set_recipe_image(
        &self,
        user: UserId,
        recipe_id: i32,
        image: String,
    ) -> Result<Option<String>, RecipeRepoError> {
        let previous = query_scalar::<_, Option<String>>(
            r#"
            UPDATE recipes r SET image = $1
            FROM (SELECT id, image FROM recipes WHERE user_id = $2 AND id = $3 FOR UPDATE) old
            WHERE r.id = old.id
            RETURNING old.image
            "#,
        )
        .bind(&image)
        .bind(user)
        .bind(recipe_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to set image of recipe {}", recipe_id))?
        .ok_or(RecipeNotFound(recipe_id))?;
        Ok(previous)
    }

    #[instrument(skip(self))]
    async fn delete_recipe(&self, user: UserId, recipe_id: i32) -> Result<Recipe, RecipeRepoError> {
        let recipe: Recipe = self.get_recipe_entry(user, recipe_id).await?.into();

        let result = query("DELETE FROM recipes WHERE user_id = $1 AND id = $2")
            .bind(user)
            .bind(recipe_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete recipe {}", recipe_id))?;
        if result.rows_affected() == 0 {
            return Err(RecipeNotFound(recipe_id));
        }

        Ok(recipe)
    }
}
