//!
//! src/sampler.rs
//!
//! Drives one search end to end and writes the
//! json/csv result pair
//!

use serde_json::Value;
use tracing::{debug, info};

use crate::errors::SamplerError;
use crate::fetch::SpotifyClient;
use crate::sink::{ResultSink, ITEM_WRAPPERS};
use crate::types::SearchType;

/// Fully resolved parameters for one search call
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub query: String,
    pub search_type: SearchType,
    pub limit: u32,
    pub offset: u32,
    pub market: String,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub items: usize,
    pub json_path: std::path::PathBuf,
    pub csv_path: std::path::PathBuf,
}

pub struct Sampler {
    spotify: SpotifyClient,
    sink: ResultSink,
}

impl Sampler {
    pub fn new(spotify: SpotifyClient, sink: ResultSink) -> Self {
        Self { spotify, sink }
    }

    pub async fn run(&self, job: &SearchJob) -> Result<SearchOutcome, SamplerError> {
        let bearer = self.fetch_token().await?;

        debug!(query = %job.query, offset = job.offset, "search.request");
        let response = self.spotify
            .search(
                &job.query,
                job.search_type,
                job.limit,
                job.offset,
                &job.market,
                &bearer
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SamplerError::Http(
                format!("search returned {status}: {body}")
            ));
        }

        let body: Value = response.json().await?;
        let items = Self::count_items(&body);
        info!(items, "search.response");

        let stem = ResultSink::timestamp_stem();
        let json_path = self.sink.write_json(&stem, &body)?;
        let csv_path = self.sink.write_csv(&stem, &body)?;

        Ok( SearchOutcome { items, json_path, csv_path } )
    }

    async fn fetch_token(&self) -> Result<String, SamplerError> {
        let response = self.spotify.token_request()
            .basic_auth(
                &self.spotify.cfg.client_id,
                Some(&self.spotify.cfg.client_secret)
            )
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SamplerError::Http(
                format!("token endpoint returned {status}")
            ));
        }

        let token: Value = response.json().await?;
        let bearer = token["access_token"].as_str()
            .ok_or_else(|| SamplerError::Http("no access_token in response".into()))?
            .to_string();
        Ok(bearer)
    }

    fn count_items(body: &Value) -> usize {
        ITEM_WRAPPERS.iter()
            .filter_map(|w| body.pointer(&format!("/{w}/items")))
            .filter_map(|v| v.as_array())
            .map(|a| a.len())
            .sum()
    }
}
