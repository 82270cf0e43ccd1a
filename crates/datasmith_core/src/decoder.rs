//! Incremental decoder for the generation service's event stream.
//!
//! The response body is a newline-delimited text protocol in the
//! server-sent-events style: `data: <json>` lines carrying rows and progress
//! fields, and an `event:complete` line marking the end of the stream. Chunks
//! arrive at arbitrary byte boundaries, unaligned to lines, so the decoder
//! accumulates bytes and only interprets completed lines. The delimiter is a
//! single byte, which means a multi-byte character can never span two lines;
//! holding split characters in the buffer until their line completes makes
//! UTF-8 validation safe per line.

use crate::models::frame::{Frame, ProgressUpdate, Record};
use serde::Deserialize;

/// Line prefix carrying a JSON payload.
const DATA_PREFIX: &str = "data:";

/// Line prefix marking the end of the stream.
const COMPLETE_PREFIX: &str = "event:complete";

/// Wire shape of one `data:` payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamPayload {
    #[serde(default)]
    rows: Vec<Record>,
    #[serde(default)]
    progress: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    percent_complete: Option<f64>,
}

/// What one completed line decoded to.
enum DecodedLine {
    /// A well-formed payload line.
    Payload(StreamPayload),
    /// The completion marker.
    Complete,
    /// Anything else: unknown prefix, empty payload, malformed JSON,
    /// invalid UTF-8. Dropped without aborting the stream.
    Nothing,
}

/// Push decoder turning raw body chunks into protocol frames.
///
/// Feed it chunks as they arrive; it returns every frame completed by that
/// chunk, in stream order. After the completion marker (or [`finish`]) the
/// decoder is exhausted and ignores further input.
///
/// [`finish`]: FrameDecoder::finish
#[derive(Debug, Default)]
pub struct FrameDecoder {
    /// Bytes received but not yet forming a complete line.
    buf: Vec<u8>,
    /// Set once a `Complete` frame has been emitted.
    finished: bool,
}

impl FrameDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the decoder has emitted its `Complete` frame.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume one chunk and return the frames it completed.
    ///
    /// A line carrying both rows and progress fields yields its `Data` frame
    /// before its `Progress` frame, matching payload extraction order.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Frame> {
        if self.finished {
            return Vec::new();
        }

        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buf[consumed..].iter().position(|&b| b == b'\n') {
            let line_end = consumed + offset;
            let line = &self.buf[consumed..line_end];
            consumed = line_end + 1;

            match decode_line(line) {
                DecodedLine::Payload(payload) => {
                    if !payload.rows.is_empty() {
                        frames.push(Frame::Data(payload.rows));
                    }
                    frames.push(Frame::Progress(ProgressUpdate {
                        current: payload.progress,
                        total: payload.total,
                        percent: payload.percent_complete,
                    }));
                }
                DecodedLine::Complete => {
                    // Whatever trails the completion marker is discarded.
                    self.finished = true;
                    self.buf.clear();
                    frames.push(Frame::Complete);
                    return frames;
                }
                DecodedLine::Nothing => {}
            }
        }

        self.buf.drain(..consumed);
        frames
    }

    /// Signal end-of-data from the transport.
    ///
    /// If no completion line was seen, synthesizes the `Complete` frame. A
    /// trailing line still missing its delimiter is treated as truncated and
    /// discarded, never flushed.
    pub fn finish(&mut self) -> Vec<Frame> {
        if self.finished {
            return Vec::new();
        }
        if !self.buf.is_empty() {
            tracing::trace!(bytes = self.buf.len(), "Discarding truncated trailing line");
        }
        self.finished = true;
        self.buf.clear();
        vec![Frame::Complete]
    }
}

/// Decode one completed line (without its delimiter).
fn decode_line(line: &[u8]) -> DecodedLine {
    let Ok(text) = std::str::from_utf8(line) else {
        return DecodedLine::Nothing;
    };
    let text = text.strip_suffix('\r').unwrap_or(text);

    if let Some(rest) = text.strip_prefix(DATA_PREFIX) {
        let payload = rest.trim();
        if payload.is_empty() {
            return DecodedLine::Nothing;
        }
        match serde_json::from_str::<StreamPayload>(payload) {
            Ok(parsed) => DecodedLine::Payload(parsed),
            Err(err) => {
                // One corrupt line must not sacrifice the stream.
                tracing::trace!(error = %err, "Discarding malformed stream line");
                DecodedLine::Nothing
            }
        }
    } else if text.starts_with(COMPLETE_PREFIX) {
        DecodedLine::Complete
    } else {
        DecodedLine::Nothing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> Vec<Frame> {
        let mut decoder = FrameDecoder::new();
        let mut frames = Vec::new();
        for chunk in chunks {
            frames.extend(decoder.feed(chunk));
        }
        frames.extend(decoder.finish());
        frames
    }

    #[test]
    fn single_line_yields_data_then_progress() {
        let frames = decode_all(&[
            b"data: {\"rows\":[{\"id\":1}],\"progress\":1,\"total\":10,\"percentComplete\":10.0}\n",
        ]);
        assert_eq!(frames.len(), 3);
        assert!(matches!(&frames[0], Frame::Data(rows) if rows.len() == 1));
        assert!(matches!(
            &frames[1],
            Frame::Progress(p) if p.current == Some(1) && p.total == Some(10) && p.percent == Some(10.0)
        ));
        assert_eq!(frames[2], Frame::Complete);
    }

    #[test]
    fn empty_rows_yields_progress_only() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"data: {\"rows\":[],\"progress\":5}\n");
        assert_eq!(frames.len(), 1);
        assert!(matches!(&frames[0], Frame::Progress(p) if p.current == Some(5)));
    }

    #[test]
    fn absent_progress_fields_stay_absent() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"data: {\"rows\":[{\"id\":1}]}\n");
        assert!(matches!(
            &frames[1],
            Frame::Progress(p) if p.current.is_none() && p.total.is_none() && p.percent.is_none()
        ));
    }

    #[test]
    fn out_of_range_progress_is_passed_through() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"data: {\"progress\":20,\"total\":10,\"percentComplete\":250.0}\n");
        assert!(matches!(
            &frames[0],
            Frame::Progress(p) if p.current == Some(20) && p.percent == Some(250.0)
        ));
    }

    #[test]
    fn complete_line_stops_decoding_and_discards_rest() {
        let mut decoder = FrameDecoder::new();
        let frames =
            decoder.feed(b"event:complete\ndata: {\"rows\":[{\"id\":1}],\"progress\":1}\n");
        assert_eq!(frames, vec![Frame::Complete]);
        assert!(decoder.is_finished());
        assert!(decoder.feed(b"data: {\"rows\":[{\"id\":2}]}\n").is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn malformed_line_is_dropped_silently() {
        let frames = decode_all(&[
            b"data: {not json}\n",
            b"data: {\"rows\":[{\"id\":1}],\"progress\":1}\n",
        ]);
        assert!(matches!(&frames[0], Frame::Data(_)));
        assert_eq!(*frames.last().unwrap(), Frame::Complete);
        assert_eq!(frames.len(), 3);
    }

    #[test]
    fn bare_data_prefix_is_dropped() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data:\n").is_empty());
        assert!(decoder.feed(b"data:   \n").is_empty());
    }

    #[test]
    fn empty_and_delimiter_only_chunks_emit_nothing() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"").is_empty());
        assert!(decoder.feed(b"\n").is_empty());
        assert!(decoder.feed(b"\n\n\n").is_empty());
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"retry: 3000\n: keep-alive\n").is_empty());
    }

    #[test]
    fn crlf_lines_decode_like_lf_lines() {
        let mut decoder = FrameDecoder::new();
        let frames = decoder.feed(b"data: {\"rows\":[{\"id\":1}],\"progress\":1}\r\n");
        assert_eq!(frames.len(), 2);
        let frames = decoder.feed(b"event:complete\r\n");
        assert_eq!(frames, vec![Frame::Complete]);
    }

    #[test]
    fn stream_end_without_completion_synthesizes_complete_once() {
        let mut decoder = FrameDecoder::new();
        decoder.feed(b"data: {\"rows\":[{\"id\":1}],\"progress\":1}\n");
        assert_eq!(decoder.finish(), vec![Frame::Complete]);
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn truncated_trailing_line_is_discarded() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.feed(b"data: {\"rows\":[{\"id\":1}]").is_empty());
        assert_eq!(decoder.finish(), vec![Frame::Complete]);
    }

    /// Re-chunking at every byte boundary must reconstruct the identical
    /// frame sequence, including splits inside the delimiter region and
    /// inside multi-byte characters.
    #[test]
    fn reassembly_is_chunking_invariant() {
        let stream = "data: {\"rows\":[{\"city\":\"서울\",\"id\":1}],\"progress\":1,\"total\":3,\"percentComplete\":33.3}\n\
                      data: {\"rows\":[],\"progress\":2}\n\
                      data: {\"rows\":[{\"city\":\"부산\",\"id\":2},{\"city\":\"대구\",\"id\":3}],\"progress\":3,\"total\":3,\"percentComplete\":100.0}\n\
                      event:complete\n"
            .as_bytes();

        let reference = decode_all(&[stream]);
        assert_eq!(
            reference.iter().filter(|f| matches!(f, Frame::Data(_))).count(),
            2
        );

        for split in 0..=stream.len() {
            let (a, b) = stream.split_at(split);
            assert_eq!(decode_all(&[a, b]), reference, "split at byte {split}");
        }

        // Byte-at-a-time delivery.
        let trickle: Vec<&[u8]> = stream.chunks(1).collect();
        assert_eq!(decode_all(&trickle), reference);
    }
}
