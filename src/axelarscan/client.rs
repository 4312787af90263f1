use reqwest::Client;
use thiserror::Error;

use super::types::{ChartPoint, DataEnvelope, GmpRecord, ItsAsset, TopAsset};

pub const DEFAULT_API_BASE: &str = "https://api.axelarscan.io";

#[derive(Debug, Error)]
pub enum AxelarscanError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Client for the Axelarscan GMP analytics API. One attempt per call, no
/// retries; timeouts come from the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct AxelarscanClient {
    http: Client,
    base_url: String,
}

impl AxelarscanClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Per-day transfer counts and volumes for one ITS contract.
    pub async fn gmp_chart(
        &self,
        contract_address: &str,
        from_time: i64,
        to_time: i64,
    ) -> Result<Vec<ChartPoint>, AxelarscanError> {
        metrics::counter!("upstream_requests_total").increment(1);
        let url = format!("{}/gmp/GMPChart", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("contractAddress", contract_address),
                ("fromTime", &from_time.to_string()),
                ("toTime", &to_time.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let envelope: DataEnvelope<ChartPoint> = resp.json().await?;
        Ok(envelope.into_inner())
    }

    /// Per-token transfer totals across the ITS, keyed by token address.
    pub async fn top_its_assets(
        &self,
        from_time: i64,
        to_time: i64,
    ) -> Result<Vec<TopAsset>, AxelarscanError> {
        metrics::counter!("upstream_requests_total").increment(1);
        let url = format!("{}/gmp/GMPTopITSAssets", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("fromTime", &from_time.to_string()),
                ("toTime", &to_time.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let envelope: DataEnvelope<TopAsset> = resp.json().await?;
        Ok(envelope.into_inner())
    }

    /// The ITS asset registry (symbol → deployed addresses).
    pub async fn its_assets(&self) -> Result<Vec<ItsAsset>, AxelarscanError> {
        metrics::counter!("upstream_requests_total").increment(1);
        let url = format!("{}/api/getITSAssets", self.base_url);
        let resp = self.http.get(&url).send().await?.error_for_status()?;

        let envelope: DataEnvelope<ItsAsset> = resp.json().await?;
        Ok(envelope.into_inner())
    }

    /// Raw GMP execution records for a token symbol. One bounded page per
    /// refresh; the normalization pipeline consumes the result.
    pub async fn search_gmp(
        &self,
        symbol: &str,
        from_time: i64,
        to_time: i64,
        size: u32,
    ) -> Result<Vec<GmpRecord>, AxelarscanError> {
        metrics::counter!("upstream_requests_total").increment(1);
        let started = std::time::Instant::now();

        let url = format!("{}/gmp/searchGMP", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("symbol", symbol),
                ("fromTime", &from_time.to_string()),
                ("toTime", &to_time.to_string()),
                ("size", &size.to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let envelope: DataEnvelope<GmpRecord> = resp.json().await?;
        metrics::histogram!("fetch_latency_seconds").record(started.elapsed().as_secs_f64());
        Ok(envelope.into_inner())
    }
}
