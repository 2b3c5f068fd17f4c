//! Per-battle liveness events
//!
//! The stream only signals that the server is alive; it does not carry
//! votes or results.

use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::error::ApiResult;
use crate::AppState;
use soundclash_common::{sse, Error};

/// GET /api/battles/{name}/events - SSE heartbeat stream
pub async fn battle_events(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let battle = state.store.get_battle(&name).await?;
    if battle.hidden && !state.config.unrestricted {
        return Err(Error::BattleNotFound(name).into());
    }

    Ok(sse::heartbeat_stream(battle.name))
}
