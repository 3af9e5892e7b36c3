//! Fetcher for catalog payloads published over HTTP.
//!
//! Each configured URL serves a JSON array of records. Requests run
//! concurrently up to a fixed limit, and transient failures (connection
//! errors, timeouts, 429 and 5xx answers) are retried with exponential
//! backoff.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use nocturne_core::record::parse_records;
use nocturne_core::RawRecord;
use reqwest::{Client, StatusCode};
use tokio::task::JoinSet;

use crate::error::{FetchError, FetchResult};
use crate::fetch::Fetcher;
use crate::normalize::normalize_records;
use crate::resilience::{retry_policy, ConcurrencyLimiter};

/// Fetches record arrays from a list of URLs.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    urls: Vec<String>,
    limiter: ConcurrencyLimiter,
    retry: ExponentialBuilder,
}

impl HttpFetcher {
    /// Create a fetcher for `urls` with at most `max_concurrent` requests
    /// in flight.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be created.
    pub fn new(urls: Vec<String>, max_concurrent: usize) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("nocturne/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            urls,
            limiter: ConcurrencyLimiter::new(max_concurrent),
            retry: retry_policy(),
        })
    }

    /// Replace the backoff used for transient failures.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: ExponentialBuilder) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Fetch every URL, returning one result per URL in URL order.
    pub async fn fetch_tagged(&self) -> Vec<(String, FetchResult<Vec<RawRecord>>)> {
        let mut tasks = JoinSet::new();

        for (index, url) in self.urls.iter().enumerate() {
            let client = self.client.clone();
            let limiter = self.limiter.clone();
            let url = url.clone();
            let retry = self.retry.clone();

            tasks.spawn(async move {
                let _permit = limiter.acquire().await;
                let result = (|| fetch_once(&client, &url))
                    .retry(retry)
                    .when(FetchError::is_transient)
                    .notify(|err, delay| {
                        log::warn!("Retrying {} in {:?}: {}", url, delay, err);
                    })
                    .await;
                (index, result)
            });
        }

        let mut results: Vec<Option<FetchResult<Vec<RawRecord>>>> =
            self.urls.iter().map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => log::error!("Fetch task failed: {}", e),
            }
        }

        self.urls
            .iter()
            .zip(results)
            .map(|(url, result)| {
                let result = result.unwrap_or_else(|| {
                    Err(FetchError::Aborted {
                        source_name: url.clone(),
                    })
                });
                (url.clone(), result)
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    /// Concatenate every URL's records in URL order, failing on the first
    /// URL that could not be fetched.
    async fn fetch_all(&self) -> FetchResult<Vec<RawRecord>> {
        let mut records = Vec::new();
        for (_, result) in self.fetch_tagged().await {
            records.extend(result?);
        }
        Ok(records)
    }
}

async fn fetch_once(client: &Client, url: &str) -> FetchResult<Vec<RawRecord>> {
    log::debug!("GET {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(FetchError::RateLimited {
            source_name: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(FetchError::Http {
            source_name: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    let mut records = parse_records(&body).map_err(|e| FetchError::Parse {
        source_name: url.to_string(),
        message: e.to_string(),
    })?;
    normalize_records(&mut records);
    log::debug!("{} records from {}", records.len(), url);
    Ok(records)
}
