//! Canvas data acquisition.
//!
//! A canvas comes from one of three places: an inline JSON value, a remote
//! URL, or an injected async loader. [`resolve_canvas_data`] tries them in
//! that priority order and every outcome funnels into [`DataLoadError`]
//! with the right source tag. Validation failures keep the `validation` tag
//! no matter which path produced the data.
//!
//! The load happens once per page view; there is no retry, timeout or
//! cancellation here.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::DataLoadError;
use crate::model::CanvasData;

/// Caller-supplied source of canvas JSON.
///
/// Implementations typically wrap a database query or a bundled fallback
/// document. Errors are wrapped as `DataLoadError::Loader`; the returned
/// value still goes through full validation.
#[async_trait]
pub trait CanvasLoader: Send + Sync {
    async fn load(&self) -> Result<serde_json::Value, Box<dyn std::error::Error + Send + Sync>>;
}

/// Where to get canvas data from. Priority: `data` > `src` > `loader`.
#[derive(Default)]
pub struct CanvasConfig {
    /// Inline canvas value, used as-is.
    pub data: Option<serde_json::Value>,
    /// URL of a JSON document to fetch.
    pub src: Option<String>,
    /// Injected async loader, consulted last.
    pub loader: Option<Box<dyn CanvasLoader>>,
}

impl CanvasConfig {
    pub fn from_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn from_src(src: impl Into<String>) -> Self {
        Self {
            src: Some(src.into()),
            ..Default::default()
        }
    }

    pub fn from_loader(loader: Box<dyn CanvasLoader>) -> Self {
        Self {
            loader: Some(loader),
            ..Default::default()
        }
    }
}

/// Resolve and validate canvas data from the highest-priority source.
pub async fn resolve_canvas_data(config: CanvasConfig) -> Result<CanvasData, DataLoadError> {
    if let Some(value) = config.data {
        debug!("resolving canvas data from inline value");
        return CanvasData::from_value(value);
    }

    if let Some(src) = config.src {
        return fetch_canvas_data(&src).await;
    }

    if let Some(loader) = config.loader {
        debug!("resolving canvas data from injected loader");
        let value = loader
            .load()
            .await
            .map_err(|e| DataLoadError::Loader(e.to_string()))?;
        return CanvasData::from_value(value);
    }

    Err(DataLoadError::Validation(
        "no canvas data source provided: set one of data, src or loader".into(),
    ))
}

async fn fetch_canvas_data(src: &str) -> Result<CanvasData, DataLoadError> {
    debug!(url = src, "fetching canvas data");
    let url = url::Url::parse(src)
        .map_err(|e| DataLoadError::Url(format!("invalid canvas url \"{src}\": {e}")))?;

    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .map_err(|e| DataLoadError::Url(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, url = src, "canvas fetch returned an error status");
        return Err(DataLoadError::Url(format!(
            "fetch failed with {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("unknown status")
        )));
    }

    let value: serde_json::Value = response
        .json()
        .await
        .map_err(|e| DataLoadError::Url(format!("invalid canvas response body: {e}")))?;

    CanvasData::from_value(value)
}
