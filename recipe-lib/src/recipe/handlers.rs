use crate::error::HandlerError;
use crate::media::MediaStore;
use crate::payload::JsonObject;
use crate::recipe::{read_recipe, RecipeQuery};
use crate::user::UserId;
use actix_web::{web, HttpResponse, Responder};
use recipe_repo::recipe_repo::RecipeRepo;
use std::sync::Arc;
use tracing::{debug, warn};

#[get("/")]
pub async fn get_recipes(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<RecipeQuery>,
) -> Result<impl Responder, HandlerError> {
    let filter = query.into_inner().into_filter()?;
    debug!(?filter, "Listing recipes");
    let recipes = recipe_repo
        .get_recipes(user_id.into_inner(), filter)
        .await?;
    Ok(HttpResponse::Ok().json(recipes))
}

#[get("/{recipe_id}/")]
pub async fn get_recipe(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    user_id: web::ReqData<UserId>,
    recipe_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let recipe = recipe_repo
        .get_recipe_detail(user_id.into_inner(), recipe_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

#[post("/")]
pub async fn create_recipe(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    user_id: web::ReqData<UserId>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let new_recipe = read_recipe(body, None)?;
    let recipe = recipe_repo
        .create_recipe(user_id.into_inner(), new_recipe)
        .await?;
    Ok(HttpResponse::Created().json(recipe))
}

#[put("/{recipe_id}/")]
pub async fn replace_recipe(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    user_id: web::ReqData<UserId>,
    recipe_id: web::Path<i32>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let recipe = read_recipe(body, None)?;
    let recipe = recipe_repo
        .update_recipe(user_id.into_inner(), recipe_id.into_inner(), recipe)
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

#[patch("/{recipe_id}/")]
pub async fn update_recipe(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    user_id: web::ReqData<UserId>,
    recipe_id: web::Path<i32>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let recipe_id = recipe_id.into_inner();

    let current = recipe_repo.get_recipe(user_id, recipe_id).await?;
    let recipe = read_recipe(body, Some(current))?;
    let recipe = recipe_repo
        .update_recipe(user_id, recipe_id, recipe)
        .await?;
    Ok(HttpResponse::Ok().json(recipe))
}

#[delete("/{recipe_id}/")]
pub async fn delete_recipe(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    media: web::Data<MediaStore>,
    user_id: web::ReqData<UserId>,
    recipe_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let recipe = recipe_repo
        .delete_recipe(user_id.into_inner(), recipe_id.into_inner())
        .await?;

    if let Some(image) = recipe.image {
        if let Err(e) = media.remove(&image).await {
            warn!(error = ?e, recipe_id = recipe.id, "Unable to remove image of deleted recipe");
        }
    }
    Ok(HttpResponse::NoContent().finish())
}
