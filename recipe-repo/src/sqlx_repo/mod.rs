mod catalog;
mod ingredient_repo;
mod recipe_repo;
mod tag_repo;
mod user_repo;

use crate::{HealthCheck, Repos};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query, Pool, Postgres};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct SQLxRepo {
    pool: Pool<Postgres>,
}

impl SQLxRepo {
    pub async fn new(database_url: &str, max_pool_size: u32) -> Result<SQLxRepo, anyhow::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_pool_size)
            .connect(database_url)
            .await
            .context("Unable to connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Unable to run database migrations")?;
        info!("Database migrations are up to date");

        Ok(SQLxRepo { pool })
    }
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    #[instrument(skip(self))]
    async fn check(&self) -> bool {
        query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

pub async fn create_repos(database_url: &str, max_pool_size: u32) -> Result<Repos, anyhow::Error> {
    let repo = SQLxRepo::new(database_url, max_pool_size).await?;
    Ok(Repos::from_backend(Arc::new(repo)))
}
