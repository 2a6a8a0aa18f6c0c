//! HTTP client for the contract gateway.
//!
//! The deployment runs a gateway next to the chain node that exposes the
//! voting contract over plain HTTP: `POST /contract/{addr}/call` submits a
//! signed transaction and returns its hash, `GET /tx/{hash}` reports its
//! confirmation status, and `GET /contract/{addr}/tally` answers read-only
//! tally queries without a signing credential.
//!
//! Mutating calls poll the transaction status until it confirms, is
//! rejected, or the confirmation deadline passes. The poll deadline is the
//! only timeout this client imposes.

use crate::{LedgerClient, LedgerError};
use async_trait::async_trait;
use scrutin_types::LedgerId;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the contract gateway.
///
/// A read-only configuration carries no signer; writes then fail fast with
/// [`LedgerError::SignerMissing`]. The reconciler and other read paths use
/// exactly such a client.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL of the gateway, e.g. `http://127.0.0.1:8945`.
    pub base_url: String,
    /// Address of the voting contract.
    pub contract: String,
    /// Signing credential for mutating calls. `None` for read-only clients.
    pub signer_key: Option<String>,
    /// Interval between confirmation polls.
    pub poll_interval_ms: u64,
    /// Give up waiting for confirmation after this long.
    pub confirm_timeout_secs: u64,
}

impl GatewayConfig {
    pub fn read_only(base_url: impl Into<String>, contract: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            contract: contract.into(),
            signer_key: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            confirm_timeout_secs: DEFAULT_CONFIRM_TIMEOUT_SECS,
        }
    }

    pub fn with_signer(mut self, signer_key: impl Into<String>) -> Self {
        self.signer_key = Some(signer_key.into());
        self
    }
}

#[derive(Deserialize)]
struct SubmitResponse {
    tx_hash: String,
}

#[derive(Deserialize)]
struct TxStatusResponse {
    /// "pending", "confirmed" or "rejected".
    status: String,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct TallyResponse {
    votes: u64,
}

/// Gateway-backed implementation of [`LedgerClient`].
pub struct GatewayClient {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Self {
        let config = GatewayConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn contract_url(&self, suffix: &str) -> String {
        format!(
            "{}/contract/{}/{}",
            self.config.base_url, self.config.contract, suffix
        )
    }

    /// Submit a contract call and wait for on-chain confirmation.
    async fn submit_and_confirm(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<(), LedgerError> {
        let signer = self
            .config
            .signer_key
            .as_deref()
            .ok_or(LedgerError::SignerMissing)?;

        let body = serde_json::json!({
            "method": method,
            "params": params,
            "signer": signer,
        });

        let resp = self
            .http
            .post(self.contract_url("call"))
            .json(&body)
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LedgerError::Rejected(format!(
                "HTTP {} submitting {method}",
                resp.status()
            )));
        }

        let submitted: SubmitResponse = resp
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        debug!(method, tx_hash = %submitted.tx_hash, "transaction submitted, awaiting confirmation");
        self.wait_for_confirmation(&submitted.tx_hash).await?;
        info!(method, tx_hash = %submitted.tx_hash, "transaction confirmed");
        Ok(())
    }

    /// Poll the transaction status until confirmed, rejected, or timed out.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<(), LedgerError> {
        let deadline = Duration::from_secs(self.config.confirm_timeout_secs);
        let interval = Duration::from_millis(self.config.poll_interval_ms);
        let started = std::time::Instant::now();

        loop {
            let url = format!("{}/tx/{}", self.config.base_url, tx_hash);
            let resp = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| LedgerError::Connection(e.to_string()))?;

            if !resp.status().is_success() {
                return Err(LedgerError::InvalidResponse(format!(
                    "HTTP {} from {url}",
                    resp.status()
                )));
            }

            let status: TxStatusResponse = resp
                .json()
                .await
                .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

            match status.status.as_str() {
                "confirmed" => return Ok(()),
                "rejected" => {
                    return Err(LedgerError::Rejected(
                        status.reason.unwrap_or_else(|| "no reason given".into()),
                    ));
                }
                "pending" => {}
                other => {
                    return Err(LedgerError::InvalidResponse(format!(
                        "unknown tx status {other:?}"
                    )));
                }
            }

            if started.elapsed() >= deadline {
                return Err(LedgerError::ConfirmationTimeout {
                    tx_hash: tx_hash.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }
            tokio::time::sleep(interval).await;
        }
    }
}

#[async_trait]
impl LedgerClient for GatewayClient {
    async fn register_election(
        &self,
        election: &LedgerId,
        candidate_count: u32,
    ) -> Result<(), LedgerError> {
        self.submit_and_confirm(
            "create_election",
            serde_json::json!({
                "election": election.to_hex(),
                "candidate_count": candidate_count,
            }),
        )
        .await
    }

    async fn set_active(&self, election: &LedgerId, active: bool) -> Result<(), LedgerError> {
        self.submit_and_confirm(
            "toggle_election_state",
            serde_json::json!({
                "election": election.to_hex(),
                "active": active,
            }),
        )
        .await
    }

    async fn submit_vote(
        &self,
        election: &LedgerId,
        candidate_position: u32,
        voter: &LedgerId,
    ) -> Result<(), LedgerError> {
        self.submit_and_confirm(
            "vote",
            serde_json::json!({
                "election": election.to_hex(),
                "candidate": candidate_position,
                "voter": voter.to_hex(),
            }),
        )
        .await
    }

    async fn read_tally(
        &self,
        election: &LedgerId,
        candidate_position: u32,
    ) -> Result<u64, LedgerError> {
        let url = format!(
            "{}?election={}&candidate={}",
            self.contract_url("tally"),
            election.to_hex(),
            candidate_position,
        );

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(LedgerError::InvalidResponse(format!(
                "HTTP {} from {url}",
                resp.status()
            )));
        }

        let tally: TallyResponse = resp
            .json()
            .await
            .map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;
        Ok(tally.votes)
    }
}
