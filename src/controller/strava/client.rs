use reqwest::{Client, Url};

use super::types::{DetailedSegment, StravaConfig, StravaToken, SummarySegment};
use crate::error::AppError;

const SCOPE: &str = "read,read_all";

#[derive(Clone, Debug)]
pub struct StravaClient {
    client: Client,
    config: StravaConfig,
}

impl StravaClient {
    #[must_use]
    pub fn new(config: StravaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StravaConfig {
        &self.config
    }

    fn endpoint(base: &str, path: &str) -> Result<Url, AppError> {
        let joined = format!("{}/{}", base.trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| AppError::Invalid(format!("strava url '{joined}': {e}")))
    }

    /// Where to send the user to grant access.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the configured oauth base is not a url
    pub fn authorize_url(&self, state: &str) -> Result<Url, AppError> {
        let mut url = Self::endpoint(&self.config.oauth_base, "authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("approval_prompt", "auto")
            .append_pair("scope", SCOPE)
            .append_pair("state", state);
        Ok(url)
    }

    /// # Errors
    ///
    /// Will return `Err` if the token endpoint rejects the code
    pub async fn exchange_code(&self, code: &str) -> Result<StravaToken, AppError> {
        self.token_request(&[
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ])
        .await
    }

    /// Refresh responses carry no athlete, so the old one is kept.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the token endpoint rejects the refresh token
    pub async fn refresh(&self, token: &StravaToken) -> Result<StravaToken, AppError> {
        let mut fresh = self
            .token_request(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", token.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .await?;
        if fresh.athlete.is_none() {
            fresh.athlete.clone_from(&token.athlete);
        }
        Ok(fresh)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<StravaToken, AppError> {
        let url = Self::endpoint(&self.config.oauth_base, "token")?;
        let resp = self.client.post(url).form(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("token request failed ({status}): {body}")));
        }
        Ok(resp.json().await?)
    }

    /// # Errors
    ///
    /// Will return `Err` if the request fails or the token is rejected
    pub async fn starred_segments(
        &self,
        token: &StravaToken,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<SummarySegment>, AppError> {
        let url = Self::endpoint(&self.config.api_base, "segments/starred")?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    /// # Errors
    ///
    /// Will return `Err` if the request fails, the token is rejected, or the segment is unknown
    pub async fn segment_detail(
        &self,
        token: &StravaToken,
        id: i64,
    ) -> Result<DetailedSegment, AppError> {
        let url = Self::endpoint(&self.config.api_base, &format!("segments/{id}"))?;
        let resp = self
            .client
            .get(url)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, AppError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            401 | 403 => Err(AppError::Auth(body)),
            404 => Err(AppError::NotFound(body)),
            code => Err(AppError::Api { status: code, body }),
        }
    }
}
