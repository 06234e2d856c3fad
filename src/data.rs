//! Training-dataset bootstrap.
//!
//! One-time startup step: if the CSV is already on disk nothing happens;
//! otherwise it is downloaded from the configured URL. A missing dataset
//! with no URL, or a failed download, is fatal to startup.

use tracing::info;

use crate::config::DatasetConfig;
use crate::error::{CardioError, Result};

pub async fn ensure_dataset(cfg: &DatasetConfig) -> Result<()> {
    if cfg.path.exists() {
        return Ok(());
    }

    let url = cfg.url.as_ref().ok_or_else(|| {
        CardioError::Dataset(format!(
            "dataset not found at {} and no download URL configured",
            cfg.path.display()
        ))
    })?;

    info!(%url, path = %cfg.path.display(), "dataset not found locally, downloading");
    let response = reqwest::get(url).await?.error_for_status()?;
    let body = response.bytes().await?;

    if let Some(parent) = cfg.path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&cfg.path, &body).await?;
    info!(bytes = body.len(), "dataset downloaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn missing_dataset_without_url_is_fatal() {
        let cfg = DatasetConfig {
            path: PathBuf::from("does/not/exist.csv"),
            url: None,
        };
        assert!(matches!(
            ensure_dataset(&cfg).await.unwrap_err(),
            CardioError::Dataset(_)
        ));
    }

    #[tokio::test]
    async fn present_dataset_short_circuits() {
        let path = std::env::temp_dir().join(format!("cardio-data-{}.csv", std::process::id()));
        std::fs::write(&path, "id;age\n").unwrap();
        let cfg = DatasetConfig {
            path: path.clone(),
            url: None,
        };
        assert!(ensure_dataset(&cfg).await.is_ok());
        let _ = std::fs::remove_file(path);
    }
}
