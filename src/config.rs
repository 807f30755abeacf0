//!
//! src/config.rs
//!
//! Environment-backed configuration for credentials, search parameter
//! ranges, http client tuning, and logging
//!

use serde::Deserialize;
use url::Url;
use std::time;
use crate::SamplerError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 8000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 2000;
pub const HTTP_POOL_MAX_IDLE: usize = 16;
pub const HTTP_POOL_IDLE_TIMEOUT: u64 = 90000;
pub const HTTP_MAX_REDIRECTS: u8 = 4;

/// Constants for search parameter ranges
pub const MIN_YEAR: i64 = 1930;
pub const MAX_YEAR: i64 = 2025;
pub const MAX_OFFSET: i64 = 1000;
pub const DEFAULT_MARKET: &str = "JP";
pub const DEFAULT_OUTPUT_DIR: &str = "res";

/// Wrapper over env::var to return an invalid environment var error
fn env_check(s: &str) -> Result<String, SamplerError> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(SamplerError::Config(format!("{s} was not set"))),
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

/// Configuration that Spotify expects when hitting endpoints
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub token_url: Url,
    pub api_base: Url,
}

fn build_spotify() -> Result<SpotifyConfig, SamplerError> {
    let client_id     = env_check("SPOTIFY_CLIENT_ID")?;
    let client_secret = env_check("SPOTIFY_CLIENT_SECRET")?;

    // form urls
    let token_url = std::env::var("SPOTIFY_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string());

    let api_base  = std::env::var("SPOTIFY_API_BASE")
        .unwrap_or_else(|_| "https://api.spotify.com/v1/".to_string());

    let token_url = Url::parse(&token_url)
        .map_err(|e| SamplerError::Config(
                format!("SPOTIFY_TOKEN_URL invalid {e}")
        ))?;

    let mut api_base  = Url::parse(&api_base)
        .map_err(|e| SamplerError::Config(
                format!("SPOTIFY_API_BASE invalid {e}")
        ))?;

    // ensure valid https and hostname for both urls
    ensure_https(&token_url).map_err(SamplerError::Config)?;
    ensure_https(&api_base).map_err(SamplerError::Config)?;
    ensure_host(&token_url, "accounts.spotify.com")
        .map_err(SamplerError::Config)?;
    ensure_host(&api_base, "api.spotify.com")
        .map_err(SamplerError::Config)?;

    if !api_base.path().ends_with('/') {
        let mut path = api_base.path().to_string();
        path.push('/');
        api_base.set_path(&path);
    }

    Ok( SpotifyConfig { client_id, client_secret, token_url, api_base } )
}

///
/// Configuration for the randomized search parameters and result files
///
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub min_year: i64,     // inclusive lower bound for year:
    pub max_year: i64,     // inclusive upper bound for year:
    pub max_offset: i64,   // offsets are drawn from 0..max_offset
    pub market: String,    // two letter market code
    pub output_dir: String // root for result files
}

fn build_search() -> Result<SearchConfig, SamplerError> {
    let env_to_int = |s: &str, default: i64| -> i64 {
        match std::env::var(s) {
            Ok(s) => {
                match s.parse::<i64>() {
                    Ok(value) => value,
                    _ => default
                }
            },
            Err(_) => {
                default
            }
        }
    };

    let min_year   = env_to_int("SAMPLER_MIN_YEAR", MIN_YEAR);
    let max_year   = env_to_int("SAMPLER_MAX_YEAR", MAX_YEAR);
    let max_offset = env_to_int("SAMPLER_MAX_OFFSET", MAX_OFFSET);

    let market = std::env::var("SAMPLER_MARKET")
        .unwrap_or_else(|_| DEFAULT_MARKET.to_string());
    let output_dir = std::env::var("SAMPLER_OUTPUT_DIR")
        .unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string());

    if min_year > max_year {
        return Err(SamplerError::Config(
            format!("year range inverted ({min_year}..{max_year})")
        ));
    }
    if max_offset <= 0 {
        return Err(SamplerError::Config(
            format!("SAMPLER_MAX_OFFSET must be positive (got {max_offset})")
        ));
    }

    // offsets travel as a u32 query parameter
    let max_offset = max_offset.min(u32::MAX as i64);

    Ok( SearchConfig { min_year, max_year, max_offset, market, output_dir } )
}

///
/// Configuration for Http timeouts, pools, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub pool_max_idle_per_host: usize,
    pub pool_idle_timeout: time::Duration,
    pub max_redirects: u8,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            pool_max_idle_per_host: HTTP_POOL_MAX_IDLE,
            pool_idle_timeout: time::Duration::from_millis(HTTP_POOL_IDLE_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
        }
    }
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool,
}

fn build_logging() -> LoggingConfig {
    let format = match std::env::var("SAMPLER_LOG_FORMAT") {
        Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty
    };

    LoggingConfig {
        filter_directives: "info,track_sampler=debug,reqwest=warn".to_string(),
        format,
        with_ansi: true,
        include_file_line: false,
        include_target: true,
    }
}

///
/// AppConfig which holds everything needed by fetch and the sampler
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub search: SearchConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, SamplerError> {
    dotenvy::dotenv().ok();

    let spotify = build_spotify()?;
    let search  = build_search()?;
    let http    = HttpConfig::default();
    let logging = build_logging();

    Ok( AppConfig { spotify, search, http, logging } )
}

#[cfg(test)]
mod tests {
    use super::*;

    // env mutation is process wide, so every scenario shares this one test
    #[test]
    fn search_overrides_fall_back_and_validate() {
        unsafe {
            std::env::remove_var("SAMPLER_MIN_YEAR");
            std::env::remove_var("SAMPLER_MAX_YEAR");
            std::env::remove_var("SAMPLER_MAX_OFFSET");
        }
        let cfg = build_search().unwrap();
        assert_eq!(cfg.min_year, MIN_YEAR);
        assert_eq!(cfg.max_year, MAX_YEAR);
        assert_eq!(cfg.max_offset, MAX_OFFSET);

        unsafe {
            std::env::set_var("SAMPLER_MIN_YEAR", "soon");
            std::env::set_var("SAMPLER_MAX_YEAR", "2000");
            std::env::set_var("SAMPLER_MAX_OFFSET", "250");
        }
        let cfg = build_search().unwrap();
        assert_eq!(cfg.min_year, MIN_YEAR);
        assert_eq!(cfg.max_year, 2000);
        assert_eq!(cfg.max_offset, 250);

        unsafe {
            std::env::set_var("SAMPLER_MIN_YEAR", "2010");
            std::env::set_var("SAMPLER_MAX_YEAR", "1990");
        }
        let err = build_search().unwrap_err();
        assert!(err.to_string().contains("year range inverted"));

        unsafe {
            std::env::set_var("SAMPLER_MIN_YEAR", "1930");
            std::env::set_var("SAMPLER_MAX_YEAR", "2025");
            std::env::set_var("SAMPLER_MAX_OFFSET", "0");
        }
        let err = build_search().unwrap_err();
        assert!(err.to_string().contains("SAMPLER_MAX_OFFSET"));

        unsafe {
            std::env::set_var("SAMPLER_MAX_OFFSET", "8589934592");
        }
        let cfg = build_search().unwrap();
        assert_eq!(cfg.max_offset, u32::MAX as i64);

        unsafe {
            std::env::remove_var("SAMPLER_MIN_YEAR");
            std::env::remove_var("SAMPLER_MAX_YEAR");
            std::env::remove_var("SAMPLER_MAX_OFFSET");
        }
    }
}
