mod filter;
mod handlers;
mod image;

use crate::error::HandlerError;
use crate::payload::{JsonObject, Payload};
use crate::validation;
use actix_web::{web, Scope};
use recipe_repo::recipe_repo::{NewRecipe, Recipe};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

pub use filter::RecipeQuery;

pub const IMAGE_UPLOAD_DIR: &str = "uploads/recipe";

pub fn recipe_service() -> Scope {
    web::scope("/recipes")
        .service(handlers::get_recipes)
        .service(handlers::create_recipe)
        .service(handlers::get_recipe)
        .service(handlers::replace_recipe)
        .service(handlers::update_recipe)
        .service(handlers::delete_recipe)
        .service(image::upload_image)
}

/// Reads a recipe body. With `base` set the body is a partial update and absent fields keep the
/// stored values; otherwise title, time and price are required and absent link sets are cleared.
fn read_recipe(body: JsonObject, base: Option<Recipe>) -> Result<NewRecipe, HandlerError> {
    let mut payload = Payload::new(body);
    let recipe = match base {
        Some(base) => read_partial(&mut payload, base),
        None => read_full(&mut payload),
    };
    payload.finish_with(recipe)
}

fn read_full(payload: &mut Payload) -> Option<NewRecipe> {
    let title = payload.required::<String>("title");
    let time_minutes = payload.required::<i32>("time_minutes");
    let price = payload.required::<Decimal>("price");
    let link = payload.optional::<String>("link").unwrap_or_default();
    let tags = payload.optional::<BTreeSet<i32>>("tags").unwrap_or_default();
    let ingredients = payload
        .optional::<BTreeSet<i32>>("ingredients")
        .unwrap_or_default();

    validate(
        payload,
        NewRecipe::new(title?, time_minutes?, price?, link, tags, ingredients),
    )
}

fn read_partial(payload: &mut Payload, base: Recipe) -> Option<NewRecipe> {
    let title = payload.optional::<String>("title");
    let time_minutes = payload.optional::<i32>("time_minutes");
    let price = payload.optional::<Decimal>("price");
    let link = payload.optional::<String>("link");
    let tags = payload.optional::<BTreeSet<i32>>("tags");
    let ingredients = payload.optional::<BTreeSet<i32>>("ingredients");

    let recipe = NewRecipe::new(
        title.unwrap_or(base.title),
        time_minutes.unwrap_or(base.time_minutes),
        price.unwrap_or(base.price),
        link.unwrap_or(base.link),
        tags.unwrap_or(base.tags),
        ingredients.unwrap_or(base.ingredients),
    );
    validate(payload, recipe)
}

fn validate(payload: &mut Payload, recipe: NewRecipe) -> Option<NewRecipe> {
    let title = payload.check("title", validation::validate_name(&recipe.title));
    let time_minutes = payload.check("time_minutes", validation::validate_minutes(recipe.time_minutes));
    let price = payload.check("price", validation::validate_price(recipe.price));
    let link = payload.check("link", validation::validate_link(&recipe.link));

    Some(NewRecipe {
        title: title?,
        time_minutes: time_minutes?,
        price: price?,
        link: link?,
        ..recipe
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::str::FromStr;

    fn body(value: Value) -> JsonObject {
        match value {
            Value::Object(fields) => web::Json(fields),
            other => panic!("not an object: {}", other),
        }
    }

    fn field_errors(result: Result<NewRecipe, HandlerError>) -> Value {
        match result {
            Err(HandlerError::Invalid(errors)) => serde_json::to_value(errors).unwrap(),
            other => panic!("unexpected result {:?}", other),
        }
    }

    fn stored_recipe() -> Recipe {
        NewRecipe::new(
            "Steak".to_owned(),
            30,
            Decimal::from_str("12.00").unwrap(),
            "https://example.com/steak".to_owned(),
            BTreeSet::from([1, 2]),
            BTreeSet::from([5]),
        )
        .to_recipe(9, Some("/media/uploads/recipe/steak.jpg".to_owned()))
    }

    #[test]
    fn full_body_clears_omitted_links() {
        let recipe = read_recipe(
            body(json!({"title": "  Soup ", "time_minutes": 10, "price": 5})),
            None,
        )
        .unwrap();
        assert_eq!(recipe.title, "Soup");
        assert_eq!(recipe.price.to_string(), "5.00");
        assert_eq!(recipe.link, "");
        assert!(recipe.tags.is_empty());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn full_body_requires_title_time_and_price() {
        let errors = field_errors(read_recipe(body(json!({"link": "x"})), None));
        assert_eq!(
            errors,
            json!({
                "title": ["This field is required."],
                "time_minutes": ["This field is required."],
                "price": ["This field is required."],
            })
        );
    }

    #[test]
    fn wrong_types_are_reported_with_other_problems() {
        let errors = field_errors(read_recipe(
            body(json!({"title": " ", "time_minutes": "abc", "price": "1.999", "tags": [1, "x"]})),
            None,
        ));
        assert_eq!(
            errors,
            json!({
                "title": ["This field may not be blank."],
                "time_minutes": ["A valid integer is required."],
                "price": ["Ensure that there are no more than 2 decimal places."],
                "tags": ["Expected a list of ids."],
            })
        );
    }

    #[test]
    fn partial_body_keeps_unspecified_fields() {
        let updated = read_recipe(
            body(json!({"title": "Chicken", "tags": [3]})),
            Some(stored_recipe()),
        )
        .unwrap();
        assert_eq!(updated.title, "Chicken");
        assert_eq!(updated.tags, BTreeSet::from([3]));
        assert_eq!(updated.time_minutes, 30);
        assert_eq!(updated.link, "https://example.com/steak");
        assert_eq!(updated.ingredients, BTreeSet::from([5]));
    }

    #[test]
    fn partial_body_can_clear_tags() {
        let updated = read_recipe(body(json!({"tags": []})), Some(stored_recipe())).unwrap();
        assert!(updated.tags.is_empty());
    }

    #[test]
    fn partial_body_rejects_null() {
        let errors = field_errors(read_recipe(
            body(json!({"time_minutes": null})),
            Some(stored_recipe()),
        ));
        assert_eq!(errors, json!({"time_minutes": ["This field may not be null."]}));
    }
}
