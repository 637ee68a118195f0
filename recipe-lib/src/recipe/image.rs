use crate::error::HandlerError;
use crate::media::MediaStore;
use crate::recipe::IMAGE_UPLOAD_DIR;
use crate::user::UserId;
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use anyhow::Context;
use futures_util::StreamExt;
use image::{ImageFormat, ImageReader};
use recipe_repo::recipe_repo::RecipeRepo;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum accepted upload (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

const IMAGE_FIELD: &str = "image";
const INVALID_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// Returns the file extension for `data` if it decodes as one of the allowed formats.
fn check_image(data: &[u8]) -> Option<&'static str> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    let format = reader.format()?;
    if !ALLOWED_FORMATS.contains(&format) {
        return None;
    }
    if let Err(e) = reader.decode() {
        debug!(error = %e, "Image failed to decode");
        return None;
    }
    format.extensions_str().first().copied()
}

/// Collects the contents of the `image` field. Other fields are drained and ignored.
async fn read_image_field(mut payload: Multipart) -> Result<Option<Vec<u8>>, HandlerError> {
    let mut image = None;
    while let Some(field) = payload.next().await {
        let mut field = field?;
        let is_image = field.content_disposition().get_name() == Some(IMAGE_FIELD);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            if is_image {
                if data.len() + chunk.len() > MAX_FILE_SIZE {
                    return Err(HandlerError::invalid(
                        IMAGE_FIELD,
                        format!("File too large. Maximum size is {} bytes.", MAX_FILE_SIZE),
                    ));
                }
                data.extend_from_slice(&chunk);
            }
        }

        if is_image && image.is_none() {
            image = Some(data);
        }
    }
    Ok(image)
}

#[post("/{recipe_id}/image/")]
pub async fn upload_image(
    recipe_repo: web::Data<Arc<dyn RecipeRepo>>,
    media: web::Data<MediaStore>,
    user_id: web::ReqData<UserId>,
    recipe_id: web::Path<i32>,
    payload: Multipart,
) -> Result<impl Responder, HandlerError> {
    let user_id = user_id.into_inner();
    let recipe_id = recipe_id.into_inner();

    recipe_repo.get_recipe(user_id, recipe_id).await?;

    let data = read_image_field(payload)
        .await?
        .filter(|data| !data.is_empty())
        .ok_or_else(|| HandlerError::invalid(IMAGE_FIELD, "No file was submitted."))?;

    let (data, extension) = web::block(move || {
        let extension = check_image(&data);
        (data, extension)
    })
    .await
    .context("Blocking image decode failed")?;
    let extension = extension.ok_or_else(|| HandlerError::invalid(IMAGE_FIELD, INVALID_IMAGE))?;

    let url = media.save(IMAGE_UPLOAD_DIR, extension, data).await?;
    let previous = match recipe_repo
        .set_recipe_image(user_id, recipe_id, url.clone())
        .await
    {
        Ok(previous) => previous,
        Err(e) => {
            if let Err(remove_err) = media.remove(&url).await {
                warn!(error = ?remove_err, %url, "Unable to remove orphaned image");
            }
            return Err(e.into());
        }
    };
    info!(recipe_id, %url, "Stored recipe image");

    if let Some(previous) = previous.filter(|previous| previous != &url) {
        if let Err(e) = media.remove(&previous).await {
            warn!(error = ?e, %previous, "Unable to remove replaced image");
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "id": recipe_id, "image": url })))
}
