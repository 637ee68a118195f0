mod handlers;

use actix_web::{web, Scope};

pub fn ingredient_service() -> Scope {
    web::scope("/ingredients")
        .service(handlers::get_ingredients)
        .service(handlers::create_ingredient)
        .service(handlers::delete_ingredient)
}
