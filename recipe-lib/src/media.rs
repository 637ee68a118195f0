use actix_web::web;
use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Uploaded files on the local filesystem, addressed by URL below `media_url`.
#[derive(Clone, Debug)]
pub struct MediaStore {
    root: PathBuf,
    url: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url: &str) -> MediaStore {
        let url = if url.ends_with('/') {
            url.to_owned()
        } else {
            format!("{}/", url)
        };
        MediaStore {
            root: root.into(),
            url,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes `data` under `dir` with a fresh random name and returns the file's URL.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn save(&self, dir: &str, extension: &str, data: Vec<u8>) -> Result<String, anyhow::Error> {
        let relative = format!("{}/{}.{}", dir.trim_matches('/'), Uuid::new_v4(), extension);
        let path = self.root.join(&relative);

        web::block(move || -> Result<(), anyhow::Error> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Unable to create {}", parent.display()))?;
            }
            fs::write(&path, data).with_context(|| format!("Unable to write {}", path.display()))
        })
        .await
        .context("Blocking file write failed")??;

        debug!(%relative, "Stored media file");
        Ok(format!("{}{}", self.url, relative))
    }

    /// Maps a URL produced by [MediaStore::save] back to its file. URLs outside the media root are
    /// rejected.
    pub fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.strip_prefix(&self.url)?);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if safe && relative.components().next().is_some() {
            Some(self.root.join(relative))
        } else {
            None
        }
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, url: &str) -> Result<(), anyhow::Error> {
        let path = self
            .path_for_url(url)
            .ok_or_else(|| anyhow!("{} is not a media URL", url))?;

        web::block(move || {
            fs::remove_file(&path).with_context(|| format!("Unable to remove {}", path.display()))
        })
        .await
        .context("Blocking file removal failed")?
    }
}
