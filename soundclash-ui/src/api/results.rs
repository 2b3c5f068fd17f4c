//! Results endpoint: podium, remainder, aggregate scores

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use soundclash_common::{ranking, Entry, Error, ScoreMap};

/// Number of placement groups shown on the podium
const PODIUM_GROUPS: usize = 3;

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub battle: String,
    pub num_voters: usize,
    /// Up to three placement groups, best first; entries within a group tied
    pub top_places: Vec<Vec<Entry>>,
    /// Everything below the podium
    pub rest: Vec<Entry>,
    /// Aggregate scores, only when the service is configured to show them
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<ScoreMap>,
}

/// GET /api/battles/{name}/results
pub async fn results(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ResultsResponse>> {
    let battle = state.store.get_battle(&name).await?;

    if !state.config.unrestricted {
        if battle.hidden {
            return Err(Error::BattleNotFound(name).into());
        }
        if battle.is_voting_open() {
            return Err(ApiError::ResultsNotAvailable);
        }
    }

    let all_votes = state.store.get_all_votes(&name).await?;
    if all_votes.is_empty() {
        // Nothing to rank yet: no podium, neutral listing of every entry
        let mut rest = battle.entries.clone();
        ranking::sort_by_name(&mut rest);
        return Ok(Json(ResultsResponse {
            battle: battle.name,
            num_voters: 0,
            top_places: Vec::new(),
            rest,
            scores: state.config.show_scores.then(ScoreMap::new),
        }));
    }

    let scores = ranking::sum_scores(&all_votes);
    let podium = ranking::placement_groups(&battle.entries, &scores).top(PODIUM_GROUPS);

    let mut rest = podium.difference(&battle.entries);
    if state.config.full_results_order {
        ranking::sort_by_score(&mut rest, &scores);
    } else {
        ranking::sort_by_name(&mut rest);
    }

    Ok(Json(ResultsResponse {
        battle: battle.name,
        num_voters: all_votes.len(),
        top_places: podium.into_groups(),
        rest,
        scores: state.config.show_scores.then_some(scores),
    }))
}
