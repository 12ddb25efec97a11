use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::controller::api::SegmentApi;
use crate::controller::strava::{StravaClient, StravaToken};
use crate::error::AppError;
use crate::model::{ClaimStore, STRAVA_TOKEN_KEY};

/// Shared across workers through `web::Data`.
pub struct AppState {
    pub api: Arc<dyn SegmentApi>,
    pub claims: Mutex<ClaimStore>,
    pub strava: Option<StravaClient>,
    pub token: RwLock<Option<StravaToken>>,
    pub default_page_size: usize,
}

impl AppState {
    /// Picks up a token saved by an earlier run.
    #[must_use]
    pub fn new(
        api: Arc<dyn SegmentApi>,
        claims: ClaimStore,
        strava: Option<StravaClient>,
        default_page_size: usize,
    ) -> Self {
        let token = match claims.get_json::<StravaToken>(STRAVA_TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable stored strava token");
                None
            }
        };
        Self {
            api,
            claims: Mutex::new(claims),
            strava,
            token: RwLock::new(token),
            default_page_size,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if strava is not configured
    pub fn strava_client(&self) -> Result<&StravaClient, AppError> {
        self.strava
            .as_ref()
            .ok_or_else(|| AppError::Auth("strava is not configured".into()))
    }

    /// # Errors
    ///
    /// Will return `Err` if the token cannot be persisted
    pub async fn store_token(&self, token: StravaToken) -> Result<(), AppError> {
        self.claims.lock().await.put_json(STRAVA_TOKEN_KEY, &token)?;
        *self.token.write().await = Some(token);
        Ok(())
    }

    /// A usable token, refreshed first if it is about to expire.
    ///
    /// # Errors
    ///
    /// Will return `Err` if strava is not configured, nobody has connected yet, or the refresh fails
    pub async fn fresh_token(&self) -> Result<StravaToken, AppError> {
        let strava = self.strava_client()?;
        let current = self
            .token
            .read()
            .await
            .clone()
            .ok_or_else(|| AppError::Auth("connect strava first".into()))?;

        if !current.is_expired(chrono::Utc::now()) {
            return Ok(current);
        }

        tracing::info!("refreshing strava token");
        let fresh = strava.refresh(&current).await?;
        self.store_token(fresh.clone()).await?;
        Ok(fresh)
    }

    pub async fn athlete_name(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .and_then(|t| t.athlete.as_ref())
            .map(|a| a.display_name())
    }
}
