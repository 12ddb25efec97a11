use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};

use crate::error::AppError;
use crate::model::{NewSegment, Segment, SegmentPatch};

/// The remote segments resource.
#[async_trait]
pub trait SegmentApi: Send + Sync {
    async fn list_segments(&self) -> Result<Vec<Segment>, AppError>;
    async fn get_segment(&self, id: i64) -> Result<Segment, AppError>;
    async fn create_segment(&self, segment: &NewSegment) -> Result<Segment, AppError>;
    async fn update_segment(&self, id: i64, patch: &SegmentPatch) -> Result<Segment, AppError>;
    async fn delete_segment(&self, id: i64) -> Result<(), AppError>;
}

#[derive(Clone, Debug)]
pub struct RestSegmentApi {
    client: Client,
    base: Url,
}

impl RestSegmentApi {
    /// # Errors
    ///
    /// Will return `Err` if `base` is not an absolute http(s) url
    pub fn new(base: &str) -> Result<Self, AppError> {
        Self::with_client(Client::new(), base)
    }

    /// # Errors
    ///
    /// Will return `Err` if `base` is not an absolute http(s) url
    pub fn with_client(client: Client, base: &str) -> Result<Self, AppError> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let normalized = format!("{}/", base.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| AppError::Invalid(format!("api base '{base}': {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AppError::Invalid(format!(
                "api base '{base}' must be http or https"
            )));
        }
        Ok(Self { client, base })
    }

    fn url(&self, path: &str) -> Result<Url, AppError> {
        self.base
            .join(path)
            .map_err(|e| AppError::Invalid(format!("bad api path '{path}': {e}")))
    }
}

async fn check(resp: Response, what: &str) -> Result<Response, AppError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(what.to_string()));
    }
    Err(AppError::Api {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl SegmentApi for RestSegmentApi {
    async fn list_segments(&self) -> Result<Vec<Segment>, AppError> {
        let url = self.url("segments")?;
        tracing::debug!(%url, "listing segments");
        let resp = check(self.client.get(url).send().await?, "segments").await?;
        Ok(resp.json().await?)
    }

    async fn get_segment(&self, id: i64) -> Result<Segment, AppError> {
        let url = self.url(&format!("segments/{id}"))?;
        tracing::debug!(%url, "fetching segment");
        let resp = check(self.client.get(url).send().await?, &format!("segment {id}")).await?;
        Ok(resp.json().await?)
    }

    async fn create_segment(&self, segment: &NewSegment) -> Result<Segment, AppError> {
        let url = self.url("segments")?;
        tracing::debug!(%url, name = %segment.name, "creating segment");
        let resp = check(
            self.client.post(url).json(segment).send().await?,
            "segments",
        )
        .await?;
        Ok(resp.json().await?)
    }

    async fn update_segment(&self, id: i64, patch: &SegmentPatch) -> Result<Segment, AppError> {
        let url = self.url(&format!("segments/{id}"))?;
        tracing::debug!(%url, "patching segment");
        let resp = check(
            self.client.patch(url).json(patch).send().await?,
            &format!("segment {id}"),
        )
        .await?;
        Ok(resp.json().await?)
    }

    async fn delete_segment(&self, id: i64) -> Result<(), AppError> {
        let url = self.url(&format!("segments/{id}"))?;
        tracing::debug!(%url, "deleting segment");
        check(
            self.client.delete(url).send().await?,
            &format!("segment {id}"),
        )
        .await?;
        Ok(())
    }
}
