//! Streamed "typing" delivery of bot replies
//!
//! The reply is fully computed and committed to the session store before
//! the stream starts; this layer only paces the final text one character
//! per frame. A client dropping mid-stream cannot leave state partially
//! applied.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;

/// Frames for one streamed reply: one `stream` frame per character of the
/// bot message, then the caller-supplied `complete` frame.
fn reply_frames(content: &str, complete: Value) -> Vec<Value> {
    content
        .chars()
        .map(|c| json!({ "type": "stream", "content": c }))
        .chain(std::iter::once(complete))
        .collect()
}

/// Pace the already-final frames onto an SSE connection, `delay` apart.
pub fn typing_stream(
    content: &str,
    complete: Value,
    delay: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let frames = reply_frames(content, complete);

    let paced = stream::iter(frames).then(move |frame| async move {
        tokio::time::sleep(delay).await;
        Ok(Event::default().data(frame.to_string()))
    });

    Sse::new(paced).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}
