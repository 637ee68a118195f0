use recipe_repo::Repos;
use rstest::fixture;
use std::env;
use tracing::{info, Level};

pub mod generator;
pub mod test_user;

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

/// The PostgreSQL cases are `#[ignore]`d by default. Run them with `cargo test -- --ignored` and
/// `TEST_DATABASE_URL` pointing at a scratch database.
pub async fn build_repos(repo_type: RepoType) -> Repos {
    match repo_type {
        RepoType::SQLx => {
            let database_url = env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set to run the PostgreSQL tests");
            recipe_repo::sqlx_repo::create_repos(&database_url, 1)
                .await
                .unwrap()
        }
        RepoType::Mem => recipe_repo::mem_repo::create_repos(),
    }
}
