//!
//! src/fetch.rs
//!
//! Defines methods for hitting the token and search endpoints
//! and returning unparsed data
//!

use reqwest::{Client, header, redirect, RequestBuilder};
use crate::config::{HttpConfig, SpotifyConfig};
use crate::types::SearchType;
use crate::SamplerError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .pool_max_idle_per_host(http.pool_max_idle_per_host)
        .pool_idle_timeout(Some(http.pool_idle_timeout))
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

fn client_with_headers(http: &HttpConfig, headers: header::HeaderMap) ->
    Result<Client, SamplerError> {
    client_helper(http)
        .default_headers(headers)
        .build()
        .map_err(|e| SamplerError::Http(format!("build client: {e}")))
}

pub fn base_client(http: &HttpConfig) -> Result<Client, SamplerError> {
    let mut h = header::HeaderMap::new();
    h.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
    client_with_headers(http, h)
}

#[derive(Clone, Debug)]
pub struct SpotifyClient {
    pub http: Client,
    pub cfg: SpotifyConfig
}

impl SpotifyClient {
    pub fn new(http_config: &HttpConfig, cfg: &SpotifyConfig) ->
        Result<Self, SamplerError> {

        let http = base_client(http_config)?;
        Ok( Self {
            http,
            cfg: cfg.clone()
        })
    }

    pub fn token_request(&self) -> reqwest::RequestBuilder {
        self.http
            .post(self.cfg.token_url.clone())
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
    }

    /// GET /v1/search?type=...&q=...&limit=&offset=&market=
    pub fn search(
        &self,
        query: &str,
        search_type: SearchType,
        limit: u32,
        offset: u32,
        market: &str,
        bearer: &str
    ) -> RequestBuilder {
        let url = self.cfg.api_base.join("search").unwrap();
        self.http.get(url).bearer_auth(bearer).query(&[
            ("type", search_type.as_str()),
            ("q", query),
            ("limit", &limit.to_string()),
            ("offset", &offset.to_string()),
            ("market", market)
        ])
    }
}
