use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::controller::strava::StravaConfig;
use crate::model::DEFAULT_PAGE_SIZE;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Base url of the segments REST api, e.g. http://localhost:3000/api
    #[arg(
        short = 'a',
        long,
        env = "SEGMENTS_API_BASE",
        value_name = "API_BASE",
        value_parser = crate::args::validation::check_http_url
    )]
    pub api_base: String,
    #[arg(
        short = 'b',
        long,
        env = "SEGMENTS_BIND",
        value_name = "ADDR",
        default_value = "0.0.0.0:8081"
    )]
    pub bind: SocketAddr,
    /// Sqlite file holding cached claims and the strava token.
    #[arg(
        short = 'c',
        long,
        env = "SEGMENTS_CLAIMS_DB",
        value_name = "CLAIMS_DB",
        default_value = "claims.sqlite3"
    )]
    pub claims_db: PathBuf,
    #[arg(
        short = 's',
        long,
        env = "SEGMENTS_PAGE_SIZE",
        value_name = "ROWS",
        default_value_t = DEFAULT_PAGE_SIZE
    )]
    pub page_size: usize,
    // Strava is optional; all three must be given together.
    #[arg(long, env = "STRAVA_CLIENT_ID", value_name = "CLIENT_ID")]
    pub strava_client_id: Option<String>,
    #[arg(
        long,
        env = "STRAVA_CLIENT_SECRET",
        value_name = "CLIENT_SECRET",
        hide_env_values = true
    )]
    pub strava_client_secret: Option<String>,
    #[arg(
        long,
        env = "STRAVA_REDIRECT_URI",
        value_name = "REDIRECT_URI",
        value_parser = crate::args::validation::check_http_url
    )]
    pub strava_redirect_uri: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CleanArgs {
    pub api_base: String,
    pub bind: SocketAddr,
    pub claims_db: PathBuf,
    pub page_size: usize,
    pub strava: Option<StravaConfig>,
}
