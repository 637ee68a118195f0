use crate::sqlx_repo::SQLxRepo;
use crate::user_repo::UserId;
use anyhow::Context;
use sqlx::{query, query_as, query_scalar, PgConnection};
use tracing::instrument;

/// Names the tables behind a per-user list of named items.
#[derive(Debug)]
pub(super) struct CatalogTable {
    pub table: &'static str,
    pub link_table: &'static str,
    pub link_column: &'static str,
}

pub(super) const TAGS: CatalogTable = CatalogTable {
    table: "tags",
    link_table: "recipe_tags",
    link_column: "tag_id",
};

pub(super) const INGREDIENTS: CatalogTable = CatalogTable {
    table: "ingredients",
    link_table: "recipe_ingredients",
    link_column: "ingredient_id",
};

#[derive(sqlx::FromRow)]
pub(super) struct CatalogEntry {
    pub id: i32,
    pub name: String,
}

impl SQLxRepo {
    #[instrument(skip(self))]
    pub(super) async fn insert_catalog_entry(
        &self,
        catalog: &CatalogTable,
        user: UserId,
        name: &str,
    ) -> Result<CatalogEntry, anyhow::Error> {
        let sql = format!(
            "INSERT INTO {}(user_id, name) VALUES ($1, $2) RETURNING id, name",
            catalog.table
        );
        query_as::<_, CatalogEntry>(&sql)
            .bind(user)
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to insert into {}", catalog.table))
    }

    #[instrument(skip(self))]
    pub(super) async fn get_catalog_entries(
        &self,
        catalog: &CatalogTable,
        user: UserId,
        assigned_only: bool,
    ) -> Result<Vec<CatalogEntry>, anyhow::Error> {
        let mut sql = format!(
            "SELECT c.id, c.name FROM {} c WHERE c.user_id = $1",
            catalog.table
        );
        if assigned_only {
            sql.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM {} l WHERE l.{} = c.id)",
                catalog.link_table, catalog.link_column
            ));
        }
        sql.push_str(" ORDER BY c.name DESC, c.id DESC");

        query_as::<_, CatalogEntry>(&sql)
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get {} for user {}", catalog.table, user))
    }

    #[instrument(skip(self))]
    pub(super) async fn delete_catalog_entry(
        &self,
        catalog: &CatalogTable,
        user: UserId,
        id: i32,
    ) -> Result<Option<CatalogEntry>, anyhow::Error> {
        let sql = format!(
            "DELETE FROM {} WHERE user_id = $1 AND id = $2 RETURNING id, name",
            catalog.table
        );
        query_as::<_, CatalogEntry>(&sql)
            .bind(user)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to delete {} {}", catalog.table, id))
    }

    /// Entries linked to a recipe, ordered by id.
    #[instrument(skip(self))]
    pub(super) async fn get_linked_entries(
        &self,
        catalog: &CatalogTable,
        recipe_id: i32,
    ) -> Result<Vec<CatalogEntry>, anyhow::Error> {
        let sql = format!(
            "SELECT c.id, c.name FROM {} c JOIN {} l ON l.{} = c.id WHERE l.recipe_id = $1 ORDER BY c.id",
            catalog.table, catalog.link_table, catalog.link_column
        );
        query_as::<_, CatalogEntry>(&sql)
            .bind(recipe_id)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get {} of recipe {}", catalog.table, recipe_id))
    }

    /// Smallest id in `ids` that `user` does not own.
    #[instrument(skip(conn))]
    pub(super) async fn find_foreign_id(
        conn: &mut PgConnection,
        catalog: &CatalogTable,
        user: UserId,
        ids: &[i32],
    ) -> Result<Option<i32>, anyhow::Error> {
        if ids.is_empty() {
            return Ok(None);
        }
        let sql = format!(
            "SELECT u.id FROM UNNEST($1::int4[]) AS u(id) \
             WHERE NOT EXISTS (SELECT 1 FROM {} c WHERE c.id = u.id AND c.user_id = $2) \
             ORDER BY u.id LIMIT 1",
            catalog.table
        );
        query_scalar::<_, i32>(&sql)
            .bind(ids)
            .bind(user)
            .fetch_optional(&mut *conn)
            .await
            .with_context(|| format!("Unable to check {} ownership", catalog.table))
    }

    #[instrument(skip(conn))]
    pub(super) async fn replace_links(
        conn: &mut PgConnection,
        catalog: &CatalogTable,
        recipe_id: i32,
        ids: &[i32],
    ) -> Result<(), anyhow::Error> {
        let sql = format!("DELETE FROM {} WHERE recipe_id = $1", catalog.link_table);
        query(&sql)
            .bind(recipe_id)
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Unable to clear {}", catalog.link_table))?;

        if !ids.is_empty() {
            let sql = format!(
                "INSERT INTO {}(recipe_id, {}) SELECT $1, UNNEST($2::int4[])",
                catalog.link_table, catalog.link_column
            );
            query(&sql)
                .bind(recipe_id)
                .bind(ids)
                .execute(&mut *conn)
                .await
                .with_context(|| format!("Unable to insert {}", catalog.link_table))?;
        }
        Ok(())
    }
}
