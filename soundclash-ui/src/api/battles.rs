//! Battle listing

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::ApiResult;
use crate::AppState;
use soundclash_common::Battle;

#[derive(Debug, Serialize)]
pub struct BattleSummary {
    pub name: String,
    pub open: bool,
    pub entry_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BattleListResponse {
    pub battles: Vec<BattleSummary>,
}

/// GET /api/battles - all visible battles
pub async fn list_battles(State(state): State<AppState>) -> ApiResult<Json<BattleListResponse>> {
    let battles = state
        .store
        .get_all_battles()
        .await?
        .into_iter()
        .filter(|b| !b.hidden)
        .map(summary)
        .collect();

    Ok(Json(BattleListResponse { battles }))
}

fn summary(battle: Battle) -> BattleSummary {
    BattleSummary {
        open: battle.is_voting_open(),
        entry_count: battle.entries.len(),
        name: battle.name,
        created_at: battle.created_at,
    }
}
