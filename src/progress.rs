//! Backup and install progress streams.
//!
//! The backend flushes one `{"progress":"NN%"}` object at a time. Transport chunks do not
//! line up with objects: a chunk may hold several objects, or only part of one, so bytes are
//! buffered until a complete object can be decoded.

use futures_util::{Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::types::ProgressEvent;

pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, ApiError>> + Send>>;

#[derive(Debug, Default)]
pub struct ProgressDecoder {
    buffer: Vec<u8>,
}

impl ProgressDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every object completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<ProgressEvent>, serde_json::Error> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let consumed = {
            let mut stream =
                serde_json::Deserializer::from_slice(&self.buffer).into_iter::<ProgressEvent>();
            let mut consumed = 0;
            loop {
                match stream.next() {
                    Some(Ok(event)) => {
                        events.push(event);
                        consumed = stream.byte_offset();
                    }
                    Some(Err(e)) if e.is_eof() => break,
                    Some(Err(e)) => return Err(e),
                    None => {
                        consumed = stream.byte_offset();
                        break;
                    }
                }
            }
            consumed
        };

        self.buffer.drain(..consumed);
        Ok(events)
    }

    /// Bytes that never formed a complete object.
    pub fn remainder(&self) -> &[u8] {
        &self.buffer
    }
}

/// Reads `stream` to the end, handing each decoded event to `on_event`.
///
/// Returns the number of events seen. With `stall_timeout` set, a gap between chunks longer
/// than the timeout ends the stream with [`ApiError::Stalled`].
pub async fn consume_progress<F>(
    endpoint: &str,
    mut stream: ChunkStream,
    stall_timeout: Option<Duration>,
    mut on_event: F,
) -> Result<usize, ApiError>
where
    F: FnMut(ProgressEvent),
{
    let mut decoder = ProgressDecoder::new();
    let mut seen = 0;

    loop {
        let next = match stall_timeout {
            Some(limit) => tokio::time::timeout(limit, stream.next())
                .await
                .map_err(|_| ApiError::Stalled {
                    endpoint: endpoint.to_string(),
                    seconds: limit.as_secs(),
                })?,
            None => stream.next().await,
        };

        let Some(chunk) = next else {
            break;
        };

        let events = decoder.push(&chunk?).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })?;

        for event in events {
            debug!(endpoint, progress = %event.progress, "progress");
            seen += 1;
            on_event(event);
        }
    }

    let leftover = String::from_utf8_lossy(decoder.remainder());
    if !leftover.trim().is_empty() {
        warn!(endpoint, leftover = %leftover.trim(), "progress stream ended mid-object");
    }

    Ok(seen)
}

/// State of one progress indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressBar {
    percent: f64,
    label: String,
    animated: bool,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressBar {
    pub fn new() -> Self {
        Self {
            percent: 0.0,
            label: "0%".to_string(),
            animated: true,
        }
    }

    /// Moves the bar to the event's value; never moves it backwards.
    pub fn advance(&mut self, event: &ProgressEvent) {
        match event.percent() {
            Some(percent) if percent >= self.percent => {
                self.percent = percent;
                self.label = event.progress.trim().to_string();
            }
            Some(_) => {}
            None => warn!(progress = %event.progress, "ignoring malformed progress value"),
        }
    }

    /// Forces the bar to 100%. Returns whether the animated state was removed by this call.
    pub fn complete(&mut self) -> bool {
        self.percent = 100.0;
        self.label = "100%".to_string();
        std::mem::replace(&mut self.animated, false)
    }

    pub fn halt(&mut self) {
        self.animated = false;
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn ratio(&self) -> f64 {
        self.percent / 100.0
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunks(parts: &[&str]) -> ChunkStream {
        let items: Vec<Result<Vec<u8>, ApiError>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        Box::pin(stream::iter(items))
    }

    #[test]
    fn decodes_concatenated_objects_in_one_chunk() {
        let mut decoder = ProgressDecoder::new();
        let events = decoder
            .push(br#"{"progress":"10%"}{"progress":"20%"}"#)
            .unwrap();
        assert_eq!(events, vec![ProgressEvent::new("10%"), ProgressEvent::new("20%")]);
        assert!(decoder.remainder().is_empty());
    }

    #[test]
    fn object_split_across_chunks_is_decoded_once() {
        let mut decoder = ProgressDecoder::new();
        assert!(decoder.push(br#"{"progr"#).unwrap().is_empty());
        let events = decoder.push(br#"ess":"55%"}"#).unwrap();
        assert_eq!(events, vec![ProgressEvent::new("55%")]);
        assert!(decoder.push(b"").unwrap().is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let mut decoder = ProgressDecoder::new();
        assert!(decoder.push(b"<html>").is_err());
    }

    #[tokio::test]
    async fn consume_reports_every_event() {
        let mut seen = Vec::new();
        let count = consume_progress(
            "api/create-temporary-backup",
            chunks(&["{\"progress\":\"25%\"}\n", "{\"progress\":", "\"75%\"}"]),
            None,
            |event| seen.push(event.progress),
        )
        .await
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen, vec!["25%", "75%"]);
    }

    #[tokio::test]
    async fn stalled_stream_times_out() {
        let stalled: ChunkStream = Box::pin(stream::pending::<Result<Vec<u8>, ApiError>>());
        let err = consume_progress(
            "api/install-package",
            stalled,
            Some(Duration::from_millis(20)),
            |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Stalled { .. }));
    }

    #[test]
    fn bar_is_monotonic_and_completes_once() {
        let mut bar = ProgressBar::new();
        bar.advance(&ProgressEvent::new("40%"));
        bar.advance(&ProgressEvent::new("30%"));
        assert_eq!(bar.label(), "40%");
        assert_eq!(bar.percent(), 40.0);

        assert!(bar.complete());
        assert_eq!(bar.label(), "100%");
        assert!(!bar.is_animated());
        assert!(!bar.complete());
    }
}
