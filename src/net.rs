//! Outbound HTTP behind the async `Network` seam
//!
//! The worker never talks to a client library directly; it sees a trait
//! whose `Err` strictly means transport failure. Any HTTP status, success
//! or not, comes back as `Ok` and the interception policy decides what to
//! do with it.

use crate::config::schema::FetchConfig;
use crate::error::{EdgeError, EdgeResult};
use crate::http::{FetchRequest, Method, Response};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Transport seam between the worker and the real network
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> EdgeResult<Response>;
}

/// `Network` over a blocking ureq agent, driven from `spawn_blocking`
pub struct HttpNetwork {
    agent: ureq::Agent,
}

impl HttpNetwork {
    pub fn new(cfg: &FetchConfig) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(cfg.timeout_secs)))
            .user_agent(cfg.user_agent.as_str())
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
        }
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, req: &FetchRequest) -> EdgeResult<Response> {
        let agent = self.agent.clone();
        let method = req.method;
        let url = req.url.clone();

        debug!("Fetching {} {}", method, url);
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, method, &url))
            .await
            .map_err(|e| EdgeError::Internal(format!("fetch task failed: {e}")))?
    }
}

fn fetch_blocking(agent: &ureq::Agent, method: Method, url: &str) -> EdgeResult<Response> {
    let result = match method {
        Method::Get => agent.get(url).call(),
        Method::Head => agent.head(url).call(),
        Method::Delete => agent.delete(url).call(),
        Method::Options => agent.options(url).call(),
        Method::Post => agent.post(url).send_empty(),
        Method::Put => agent.put(url).send_empty(),
        Method::Patch => agent.patch(url).send_empty(),
    };

    let mut res = result.map_err(|e| EdgeError::transport(url, e.to_string()))?;
    let status = res.status().as_u16();
    let headers = res
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = res
        .body_mut()
        .read_to_vec()
        .map_err(|e| EdgeError::transport(url, format!("reading body: {e}")))?;

    Ok(Response::new(status, headers, body))
}
