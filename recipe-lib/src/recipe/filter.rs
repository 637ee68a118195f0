use crate::error::HandlerError;
use recipe_repo::recipe_repo::RecipeFilter;
use serde::Deserialize;
use std::collections::HashSet;

/// Raw `?tags=1,2&ingredients=3` query of the recipe listing.
#[derive(Deserialize, Debug, Default)]
pub struct RecipeQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

impl RecipeQuery {
    pub fn into_filter(self) -> Result<RecipeFilter, HandlerError> {
        let tags = parse_ids("tags", self.tags.as_deref())?;
        let ingredients = parse_ids("ingredients", self.ingredients.as_deref())?;
        Ok(RecipeFilter::new(tags, ingredients))
    }
}

/// Parses a comma separated id list. An absent or blank value means no restriction.
fn parse_ids(field: &str, value: Option<&str>) -> Result<Option<HashSet<i32>>, HandlerError> {
    let Some(value) = value else {
        return Ok(None);
    };

    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| HandlerError::invalid(field, format!("Invalid id \"{}\".", token)))
        })
        .collect::<Result<HashSet<i32>, HandlerError>>()?;
    Ok(if ids.is_empty() { None } else { Some(ids) })
}
