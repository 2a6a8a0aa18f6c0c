//! Request handlers and their wire types.
//!
//! The current time is stamped here, once per request, and passed down so
//! every decision inside one request sees the same clock reading.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use scrutin_election::{VerifiedResults, VoteReceipt, WinnerSummary};
use scrutin_store::ElectionRecord;
use scrutin_types::{ElectionId, Timestamp, UserId};

use crate::error::RpcError;
use crate::server::AppState;

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateElectionRequest {
    pub title: String,
    pub department: String,
    pub section: String,
}

#[derive(Deserialize)]
pub struct AddCandidateRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub voter_id: String,
    pub candidate_id: String,
}

/// `winner` is `null` when no election has completed yet; that is an
/// ordinary answer for a public endpoint, not an error.
#[derive(Serialize)]
pub struct LatestWinnerResponse {
    pub winner: Option<WinnerSummary>,
}

#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub user: String,
    pub votes: u64,
    pub position: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ElectionView {
    pub id: String,
    pub title: String,
    pub department: String,
    pub section: String,
    pub status: String,
    pub candidates: Vec<CandidateView>,
    pub votes_cast: usize,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
}

impl From<ElectionRecord> for ElectionView {
    fn from(record: ElectionRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title,
            department: record.department,
            section: record.section,
            status: record.status.to_string(),
            candidates: record
                .candidates
                .into_iter()
                .map(|c| CandidateView {
                    user: c.user.to_string(),
                    votes: c.votes,
                    position: c.position,
                })
                .collect(),
            votes_cast: record.voted.len(),
            start_time: record.start_time.map(|t| t.as_secs()),
            end_time: record.end_time.map(|t| t.as_secs()),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

pub async fn create_election(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateElectionRequest>,
) -> Result<(StatusCode, Json<ElectionView>), RpcError> {
    let record = state.coordinator.create_election(
        &req.title,
        &req.department,
        &req.section,
        Timestamp::now(),
    )?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

pub async fn get_election(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ElectionView>, RpcError> {
    let record = state
        .coordinator
        .get_election(&ElectionId::new(id), Timestamp::now())
        .await?;
    Ok(Json(record.into()))
}

pub async fn add_candidate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<AddCandidateRequest>,
) -> Result<Json<ElectionView>, RpcError> {
    let record = state
        .coordinator
        .add_candidate(&ElectionId::new(id), &UserId::new(req.user_id))
        .await?;
    Ok(Json(record.into()))
}

pub async fn start_election(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ElectionView>, RpcError> {
    let record = state
        .coordinator
        .activate(&ElectionId::new(id), Timestamp::now())
        .await?;
    Ok(Json(record.into()))
}

pub async fn stop_election(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ElectionView>, RpcError> {
    let record = state
        .coordinator
        .deactivate(&ElectionId::new(id), Timestamp::now())
        .await?;
    Ok(Json(record.into()))
}

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<CastVoteRequest>,
) -> Result<Json<VoteReceipt>, RpcError> {
    let receipt = state
        .coordinator
        .cast_vote(
            &ElectionId::new(id),
            &UserId::new(req.voter_id),
            &UserId::new(req.candidate_id),
            Timestamp::now(),
        )
        .await?;
    Ok(Json(receipt))
}

pub async fn get_results(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<VerifiedResults>, RpcError> {
    let results = state
        .coordinator
        .verified_results(&ElectionId::new(id), Timestamp::now())
        .await?;
    Ok(Json(results))
}

pub async fn latest_winner(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LatestWinnerResponse>, RpcError> {
    let winner = state.coordinator.latest_winner()?;
    Ok(Json(LatestWinnerResponse { winner }))
}
