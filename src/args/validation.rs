use reqwest::Url;

use super::types::{Args, CleanArgs};
use crate::controller::strava::StravaConfig;
use crate::model::MAX_PAGE_SIZE;

/// # Errors
///
/// Will return `Err` if the value is not an absolute http(s) url
pub fn check_http_url(value: &str) -> Result<String, String> {
    let url = Url::parse(value).map_err(|e| format!("'{value}' is not a url: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("'{value}' must be an http or https url."));
    }
    Ok(value.to_string())
}

impl Args {
    /// # Errors
    ///
    /// Will return `Err` if the page size is out of range or only some of the
    /// strava settings are present
    pub fn validate(self) -> Result<CleanArgs, String> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(format!("Page size must be between 1 and {MAX_PAGE_SIZE}."));
        }

        let strava = match (
            self.strava_client_id.filter(|s| !s.trim().is_empty()),
            self.strava_client_secret.filter(|s| !s.trim().is_empty()),
            self.strava_redirect_uri,
        ) {
            (Some(id), Some(secret), Some(redirect)) => {
                Some(StravaConfig::new(id, secret, redirect))
            }
            (None, None, None) => None,
            _ => {
                return Err(
                    "Strava needs a client id, a client secret and a redirect uri together."
                        .to_string(),
                );
            }
        };

        Ok(CleanArgs {
            api_base: self.api_base,
            bind: self.bind,
            claims_db: self.claims_db,
            page_size: self.page_size,
            strava,
        })
    }
}
