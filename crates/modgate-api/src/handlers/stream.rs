//! Streaming audio moderation over WebSocket.
//!
//! Binary frames accumulate per connection until the `__END__` marker
//! arrives; the buffer is then analyzed as one audio upload and the scoring
//! result is sent back as a JSON text frame. The buffer resets after each
//! marker so a connection can carry any number of clips. The buffer is
//! bounded and the connection idles out, so a silent or runaway client
//! cannot pin memory indefinitely.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;
use serde_json::json;

use modgate_core::models::{ContentType, Upload};

use crate::state::AppState;

const END_MARKER: &str = "__END__";

/// Bounded per-connection clip accumulator.
struct ClipBuffer {
    data: Vec<u8>,
    max_bytes: usize,
}

/// What the connection loop should do with one incoming frame.
enum FrameAction {
    Buffered,
    Overflow,
    Complete(Vec<u8>),
    EmptyClip,
    Ignore,
}

impl ClipBuffer {
    fn new(max_bytes: usize) -> Self {
        Self {
            data: Vec::new(),
            max_bytes,
        }
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    /// The end marker is accepted as either a text or a binary frame.
    fn accept(&mut self, frame: &Message) -> FrameAction {
        let is_end_marker = match frame {
            Message::Text(text) => text.as_str() == END_MARKER,
            Message::Binary(chunk) => chunk.as_ref() == END_MARKER.as_bytes(),
            _ => false,
        };
        if is_end_marker {
            if self.data.is_empty() {
                return FrameAction::EmptyClip;
            }
            return FrameAction::Complete(std::mem::take(&mut self.data));
        }

        match frame {
            Message::Binary(chunk) => {
                if self.data.len() + chunk.len() > self.max_bytes {
                    return FrameAction::Overflow;
                }
                self.data.extend_from_slice(chunk);
                FrameAction::Buffered
            }
            _ => FrameAction::Ignore,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    user_id: Option<String>,
}

pub async fn ws_audio(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<StreamQuery>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, query.user_id))
}

#[tracing::instrument(skip(socket, state), fields(user_id = ?user_id))]
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, user_id: Option<String>) {
    let idle_timeout = Duration::from_secs(state.config.stream_idle_timeout_secs);
    let mut buffer = ClipBuffer::new(state.config.stream_max_buffer_bytes);

    tracing::info!("Audio stream connected");

    loop {
        let frame = match tokio::time::timeout(idle_timeout, socket.recv()).await {
            Ok(Some(Ok(frame))) => frame,
            Ok(Some(Err(e))) => {
                tracing::debug!(error = %e, "WebSocket receive error");
                break;
            }
            Ok(None) => break,
            Err(_) => {
                tracing::info!(
                    idle_secs = idle_timeout.as_secs(),
                    "Closing idle audio stream"
                );
                let _ = send_error(&mut socket, "idle timeout").await;
                break;
            }
        };

        if matches!(frame, Message::Close(_)) {
            break;
        }

        match buffer.accept(&frame) {
            FrameAction::Buffered | FrameAction::Ignore => {}
            FrameAction::EmptyClip => {
                if send_error(&mut socket, "no audio received").await.is_err() {
                    break;
                }
            }
            FrameAction::Overflow => {
                tracing::warn!(
                    buffered = buffer.len(),
                    max_buffer = state.config.stream_max_buffer_bytes,
                    "Stream buffer limit exceeded, closing"
                );
                let _ = send_error(&mut socket, "audio buffer limit exceeded").await;
                break;
            }
            FrameAction::Complete(clip) => {
                let reply = analyze_clip(&state, clip, user_id.as_deref()).await;
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!("Audio stream disconnected");
}

async fn send_error(socket: &mut WebSocket, message: &str) -> Result<(), axum::Error> {
    socket
        .send(Message::Text(
            json!({ "error": message }).to_string().into(),
        ))
        .await
}

async fn analyze_clip(state: &AppState, clip: Vec<u8>, user_id: Option<&str>) -> String {
    let byte_size = clip.len();
    tracing::info!(byte_size, "Analyzing streamed audio clip");

    let mut upload = Upload::new(clip, "stream.wav");
    if let Some(user_id) = user_id {
        upload = upload.with_user(user_id);
    }

    let result = state.pipeline.process(&upload).await;

    let violation_recorded = match user_id {
        Some(user_id) => {
            state
                .gate
                .maybe_record(
                    user_id,
                    ContentType::Audio,
                    &result.description,
                    result.toxicity_score,
                )
                .await
        }
        None => false,
    };

    json!({
        "transcription": result
            .description
            .strip_prefix("Audio file transcription: ")
            .unwrap_or(&result.description),
        "toxicity_score": result.toxicity_score.wire_value(),
        "score_state": result.toxicity_score.state(),
        "byte_size": byte_size,
        "violation_recorded": violation_recorded,
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(data: &[u8]) -> Message {
        Message::Binary(data.to_vec().into())
    }

    #[test]
    fn marker_completes_the_buffered_clip() {
        let mut buffer = ClipBuffer::new(1024);
        assert!(matches!(buffer.accept(&binary(b"abc")), FrameAction::Buffered));
        assert!(matches!(buffer.accept(&binary(b"def")), FrameAction::Buffered));

        let action = buffer.accept(&Message::Text(END_MARKER.into()));
        match action {
            FrameAction::Complete(clip) => assert_eq!(clip, b"abcdef"),
            _ => panic!("expected completed clip"),
        }
        // Buffer reset: a second marker finds nothing.
        assert!(matches!(
            buffer.accept(&Message::Text(END_MARKER.into())),
            FrameAction::EmptyClip
        ));
    }

    #[test]
    fn binary_end_marker_is_honored() {
        let mut buffer = ClipBuffer::new(1024);
        buffer.accept(&binary(b"xyz"));
        assert!(matches!(
            buffer.accept(&binary(END_MARKER.as_bytes())),
            FrameAction::Complete(_)
        ));
    }

    #[test]
    fn oversized_accumulation_overflows_without_buffering() {
        let mut buffer = ClipBuffer::new(8);
        assert!(matches!(buffer.accept(&binary(b"12345")), FrameAction::Buffered));
        assert!(matches!(buffer.accept(&binary(b"6789")), FrameAction::Overflow));
        // The overflowing chunk was not appended.
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn marker_without_audio_reports_empty_clip() {
        let mut buffer = ClipBuffer::new(1024);
        assert!(matches!(
            buffer.accept(&Message::Text(END_MARKER.into())),
            FrameAction::EmptyClip
        ));
    }

    #[test]
    fn non_marker_text_frames_are_ignored() {
        let mut buffer = ClipBuffer::new(1024);
        assert!(matches!(
            buffer.accept(&Message::Text("hello".into())),
            FrameAction::Ignore
        ));
        assert_eq!(buffer.len(), 0);
    }
}
