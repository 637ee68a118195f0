#[macro_use]
extern crate tracing;

use std::error::Error;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use actix_web::{App, HttpServer};
use anyhow::Context;
use rand::Rng;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, pkcs8_private_keys};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry;

use recipe_lib::auth::jwt::JWTAuth;
use recipe_lib::config::Config;
use recipe_lib::media::MediaStore;
use recipe_repo::Repos;

const SERVICE_NAME: &str = "recipe-server";

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default());
    let tracing_guard = tracing::subscriber::set_default(subscriber);
    info!("tracing initialized");

    let config = match get_config_file() {
        Ok(config_path) => Config::from_file(config_path)?,
        Err(e) => {
            warn!("{}, reading configuration from the environment", e);
            Config::from_env()?
        }
    };

    let telemetry_layer = match &config.honeycomb_api_key {
        Some(api_key) => Some(recipe_lib::tracing::create_opentelemetry_layer(
            SERVICE_NAME,
            api_key,
        )?),
        None => None,
    };

    let subscriber = registry::Registry::default()
        .with(LevelFilter::INFO)
        .with(tracing_subscriber::fmt::Layer::default())
        .with(telemetry_layer);
    tracing::subscriber::set_global_default(subscriber).context("Unable to set up subscriber")?;
    drop(tracing_guard);

    let repos = create_repos(&config).await?;

    fs::create_dir_all(&config.media_root).with_context(|| {
        format!(
            "Unable to create media directory {}",
            config.media_root.display()
        )
    })?;
    let media = MediaStore::new(config.media_root.clone(), &config.media_url);

    let secret = get_secret()?;
    let jwt_auth = JWTAuth::from_secret(secret);
    let signups_enabled = config.signups_enabled;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(recipe_lib::tracing::create_middleware())
            .configure(recipe_lib::app_config_func(
                jwt_auth.clone(),
                repos.clone(),
                media.clone(),
                signups_enabled,
            ))
    });
    server = match config.ssl {
        None => {
            warn!("Using http");
            server.bind(&config.bind_address)?
        }
        Some(ssl_config) => {
            info!("Using https");

            let tls_config = ServerConfig::builder()
                .with_safe_defaults()
                .with_no_client_auth();

            let mut cert_file = BufReader::new(
                File::open(ssl_config.certificate_chain_file)
                    .context("Error opening certificate chain file")?,
            );
            let mut key_file = BufReader::new(
                File::open(ssl_config.private_key_file)
                    .context("Error opening private key file")?,
            );

            let cert_chain = certs(&mut cert_file)
                .context("Unable to read certificate chain file")?
                .into_iter()
                .map(Certificate)
                .collect();
            let mut keys: Vec<PrivateKey> = pkcs8_private_keys(&mut key_file)
                .context("Unable to read private key file")?
                .into_iter()
                .map(PrivateKey)
                .collect();

            if keys.is_empty() {
                error!("No private key found in file");
                return Err("No private key found in file".into());
            }

            let tls_config = tls_config.with_single_cert(cert_chain, keys.remove(0))?;

            server.bind_rustls(&config.bind_address, tls_config)?
        }
    };
    info!(bind_address = %config.bind_address, "Starting server");
    server.run().await?;

    Ok(())
}

async fn create_repos(config: &Config) -> Result<Repos, anyhow::Error> {
    match &config.database_url {
        Some(database_url) => recipe_repo::sqlx_repo::create_repos(database_url, 10).await,
        None => {
            warn!("No database configured, data will only be kept in memory");
            Ok(recipe_repo::mem_repo::create_repos())
        }
    }
}

fn get_config_file() -> Result<PathBuf, &'static str> {
    let config_current_dir = PathBuf::from("config.toml");
    if config_current_dir.exists() {
        return Ok(config_current_dir);
    }
    if let Ok(config_env) = std::env::var("CONFIGURATION_DIRECTORY") {
        let config_path = PathBuf::from(config_env).join("config.toml");
        if config_path.exists() {
            return Ok(config_path);
        }
    }

    Err("Config file not found")
}

fn get_state_dir() -> PathBuf {
    if let Ok(state_env) = std::env::var("STATE_DIRECTORY") {
        return PathBuf::from(state_env);
    }

    PathBuf::from("data")
}

/// Gets the secret from file. If the file does not exist it will generate a new secret and save it
/// to the file
fn get_secret() -> Result<Vec<u8>, Box<dyn Error>> {
    let state_dir = get_state_dir();
    let secret_file = state_dir.join("secret");
    if secret_file.exists() {
        Ok(fs::read(secret_file)?)
    } else {
        let mut rng = rand::thread_rng();
        let mut secret: [u8; 128] = [0; 128];
        rng.fill(&mut secret);

        fs::create_dir_all(state_dir)?;
        fs::write(secret_file, secret)?;
        info!("Generated new token secret");

        Ok(secret.to_vec())
    }
}
