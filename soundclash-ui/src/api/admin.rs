//! Administrative endpoints: rescan, flag toggles, full battle dump
//!
//! All routes here sit behind the bearer-token middleware.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::scanner::BattleScanner;
use crate::AppState;
use soundclash_common::{ranking, Battle, ScoreMap, Votes};

#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub updated: Vec<String>,
    pub failed: Vec<FailedBattle>,
}

#[derive(Debug, Serialize)]
pub struct FailedBattle {
    pub name: String,
    pub error: String,
}

/// POST /api/admin/scan - rescan the battles directory and reconcile
///
/// Per-battle failures are collected, not fatal; the response lists both
/// outcomes. Only a scan where every battle failed is a server error.
pub async fn scan(State(state): State<AppState>) -> ApiResult<(StatusCode, Json<ScanResponse>)> {
    let scanner = BattleScanner::new(state.battles_dir.clone());
    let scanned = scanner.scan_all()?;
    info!(battles = scanned.len(), "scan complete, reconciling");

    let summary = state.store.reconcile_all(&scanned).await;
    let status = if summary.all_failed() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(ScanResponse {
            updated: summary.updated,
            failed: summary
                .failed
                .into_iter()
                .map(|(name, err)| FailedBattle {
                    name,
                    error: err.to_string(),
                })
                .collect(),
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct BattleDataResponse {
    pub battle: Battle,
    pub votes: Vec<Votes>,
    pub scores_sum: ScoreMap,
}

/// GET /api/admin/battles/{name} - full dump: record, ballots, aggregate
pub async fn battle_data(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<BattleDataResponse>> {
    let mut battle = state.store.get_battle(&name).await?;
    let votes = state.store.get_all_votes(&name).await?;

    let scores_sum = ranking::sum_scores(&votes);
    ranking::sort_by_score(&mut battle.entries, &scores_sum);

    Ok(Json(BattleDataResponse {
        battle,
        votes,
        scores_sum,
    }))
}

/// POST /api/admin/battles/{name}/open
pub async fn open_battle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.open_battle(&name).await?;
    info!(battle = %name, "voting opened");
    Ok(StatusCode::OK)
}

/// POST /api/admin/battles/{name}/close
pub async fn close_battle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.close_battle(&name).await?;
    info!(battle = %name, "voting closed");
    Ok(StatusCode::OK)
}

/// POST /api/admin/battles/{name}/hide
pub async fn hide_battle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.hide_battle(&name).await?;
    Ok(StatusCode::OK)
}

/// POST /api/admin/battles/{name}/unhide
pub async fn unhide_battle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    state.store.unhide_battle(&name).await?;
    Ok(StatusCode::OK)
}
