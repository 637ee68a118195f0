use crate::error::HandlerError;
use crate::payload::{self, JsonObject};
use crate::tag::ListQuery;
use crate::user::UserId;
use actix_web::{web, HttpResponse, Responder};
use recipe_repo::ingredient_repo::{IngredientRepo, NewIngredient};
use std::sync::Arc;

#[get("/")]
pub async fn get_ingredients(
    ingredient_repo: web::Data<Arc<dyn IngredientRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, HandlerError> {
    let ingredients = ingredient_repo
        .get_ingredients(user_id.into_inner(), query.assigned_only())
        .await?;
    Ok(HttpResponse::Ok().json(ingredients))
}

#[post("/")]
pub async fn create_ingredient(
    ingredient_repo: web::Data<Arc<dyn IngredientRepo>>,
    user_id: web::ReqData<UserId>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let name = payload::read_name(body)?;
    let ingredient = ingredient_repo
        .create_ingredient(user_id.into_inner(), NewIngredient::new(name))
        .await?;
    Ok(HttpResponse::Created().json(ingredient))
}

#[delete("/{ingredient_id}/")]
pub async fn delete_ingredient(
    ingredient_repo: web::Data<Arc<dyn IngredientRepo>>,
    user_id: web::ReqData<UserId>,
    ingredient_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    ingredient_repo
        .delete_ingredient(user_id.into_inner(), ingredient_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
