//! Voting endpoints: the voting view, vote submission and withdrawal

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::client_id::ClientId;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use soundclash_common::{shuffle, Battle, Entry, Error, ScoreMap};

#[derive(Debug, Deserialize)]
pub struct VoteFormQuery {
    /// Seed for the per-voter display order
    pub shuffle: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteFormResponse {
    pub battle: String,
    pub open: bool,
    pub created_at: DateTime<Utc>,
    /// Entries in request-seeded display order
    pub entries: Vec<Entry>,
    /// The caller's current ballot, empty when they have not voted yet
    pub scores: ScoreMap,
}

/// GET /api/battles/{name}/vote - the voting view
///
/// The display order is seeded by the `shuffle` query parameter, so one
/// voter keeps a stable order across reloads while different seeds
/// desynchronize ordering across voters.
pub async fn vote_form(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<VoteFormQuery>,
    Extension(client_id): Extension<ClientId>,
) -> ApiResult<Json<VoteFormResponse>> {
    let battle = state.store.get_battle(&name).await?;
    guard_voting(&state, &battle)?;

    let seed = query
        .shuffle
        .unwrap_or_else(|| shuffle::DEFAULT_DISPLAY_SEED.to_string());
    let mut entries = battle.entries.clone();
    shuffle::shuffle_seeded(&mut entries, &seed);

    let scores = match state.store.get_votes(&name, &client_id.0).await {
        Ok(votes) => votes.scores,
        Err(err) if err.is_not_found() => ScoreMap::new(),
        Err(err) => return Err(err.into()),
    };

    Ok(Json(VoteFormResponse {
        battle: battle.name,
        open: battle.closed_at.is_none(),
        created_at: battle.created_at,
        entries,
        scores,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub battle_name: String,
    pub entry_id: Uuid,
    pub score: i64,
}

/// POST /api/vote - record one score for the cookie-identified voter
pub async fn vote(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    Json(req): Json<VoteRequest>,
) -> ApiResult<StatusCode> {
    let battle = state.store.get_battle(&req.battle_name).await?;
    guard_voting(&state, &battle)?;

    state
        .store
        .update_vote(&req.battle_name, req.entry_id, &client_id.0, req.score)
        .await?;

    Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct UnvoteRequest {
    pub battle_name: String,
}

/// POST /api/unvote - withdraw the caller's whole ballot
pub async fn unvote(
    State(state): State<AppState>,
    Extension(client_id): Extension<ClientId>,
    Json(req): Json<UnvoteRequest>,
) -> ApiResult<StatusCode> {
    // Battle lookup first so an unknown name is a 404, not a silent no-op
    state.store.get_battle(&req.battle_name).await?;
    state
        .store
        .remove_votes(&req.battle_name, &client_id.0)
        .await?;

    Ok(StatusCode::OK)
}

/// Hidden battles are invisible and closed battles reject votes, unless the
/// service runs unrestricted.
fn guard_voting(state: &AppState, battle: &Battle) -> Result<(), ApiError> {
    if state.config.unrestricted {
        return Ok(());
    }
    if battle.hidden {
        return Err(Error::BattleNotFound(battle.name.clone()).into());
    }
    if !battle.is_voting_open() {
        return Err(ApiError::VotingClosed);
    }
    Ok(())
}
