//! Server-Sent Events (SSE) utilities
//!
//! Liveness signaling only: the stream pings, it does not carry votes.

use std::convert::Infallible;
use std::time::Duration;

use axum::response::sse::{Event, Sse};
use futures::stream::Stream;
use tracing::{debug, info};

/// Create a heartbeat-only SSE stream for connection status monitoring.
///
/// `context` names what the client is watching (battle name or service
/// name) and appears only in logs.
pub fn heartbeat_stream(
    context: String,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    info!("New SSE client connected: {context}");

    let stream = async_stream::stream! {
        // Initial connected status so clients can show state immediately
        yield Ok(Event::default()
            .event("ConnectionStatus")
            .data("connected"));

        loop {
            tokio::time::sleep(Duration::from_secs(15)).await;
            debug!("SSE: sending heartbeat for {context}");
            yield Ok(Event::default().comment("heartbeat"));
        }
    };

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
