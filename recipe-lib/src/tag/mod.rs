mod handlers;

use actix_web::{web, Scope};
use serde::Deserialize;

/// Query of the tag and ingredient listings. A non-zero `assigned_only` hides items that no
/// recipe uses.
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub assigned_only: Option<i32>,
}

impl ListQuery {
    pub fn assigned_only(&self) -> bool {
        self.assigned_only.map_or(false, |v| v != 0)
    }
}

pub fn tag_service() -> Scope {
    web::scope("/tags")
        .service(handlers::get_tags)
        .service(handlers::create_tag)
        .service(handlers::delete_tag)
}
