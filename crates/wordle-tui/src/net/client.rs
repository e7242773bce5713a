use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use wordle_core::protocol::{SolveRequest, SolveResponse, SolveResult};

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("undecodable response (HTTP {status}): {source}")]
    Decode {
        status: u16,
        source: serde_json::Error,
    },
}

/// HTTP client for the solving service. Cheap to clone; each solve runs on
/// its own task.
#[derive(Clone, Debug)]
pub struct SolverClient {
    http: reqwest::Client,
    solve_url: String,
}

impl SolverClient {
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            solve_url: settings.solve_url(),
        })
    }

    pub fn solve_url(&self) -> &str {
        &self.solve_url
    }

    /// Send the board to the service. Never fails: transport and decoding
    /// problems come back as `Failure { error: "connection failed" }`.
    pub async fn submit(&self, request: &SolveRequest) -> SolveResult {
        match self.post_solve(request).await {
            Ok(response) => SolveResult::from(response),
            Err(e) => {
                warn!(error = %e, url = %self.solve_url, "solve request failed");
                SolveResult::connection_failed()
            }
        }
    }

    async fn post_solve(&self, request: &SolveRequest) -> Result<SolveResponse, ClientError> {
        let resp = self.http.post(&self.solve_url).json(request).send().await?;
        let status = resp.status();
        let body = resp.bytes().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "solve response received");
        // Error replies (HTTP 500) still carry a structured body.
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}
