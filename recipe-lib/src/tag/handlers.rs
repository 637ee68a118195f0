use crate::error::HandlerError;
use crate::payload::{self, JsonObject};
use crate::tag::ListQuery;
use crate::user::UserId;
use actix_web::{web, HttpResponse, Responder};
use recipe_repo::tag_repo::{NewTag, TagRepo};
use std::sync::Arc;

#[get("/")]
pub async fn get_tags(
    tag_repo: web::Data<Arc<dyn TagRepo>>,
    user_id: web::ReqData<UserId>,
    query: web::Query<ListQuery>,
) -> Result<impl Responder, HandlerError> {
    let tags = tag_repo
        .get_tags(user_id.into_inner(), query.assigned_only())
        .await?;
    Ok(HttpResponse::Ok().json(tags))
}

#[post("/")]
pub async fn create_tag(
    tag_repo: web::Data<Arc<dyn TagRepo>>,
    user_id: web::ReqData<UserId>,
    body: JsonObject,
) -> Result<impl Responder, HandlerError> {
    let name = payload::read_name(body)?;
    let tag = tag_repo
        .create_tag(user_id.into_inner(), NewTag::new(name))
        .await?;
    Ok(HttpResponse::Created().json(tag))
}

#[delete("/{tag_id}/")]
pub async fn delete_tag(
    tag_repo: web::Data<Arc<dyn TagRepo>>,
    user_id: web::ReqData<UserId>,
    tag_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    tag_repo
        .delete_tag(user_id.into_inner(), tag_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
