//! Scanning of firmware debug logs for dumped status vectors.
//!
//! With verbose debugging enabled, the driver prints every vector it reads from the
//! controller on its own line:
//!
//! ```text
//! Receive Status Vector: 3c 00 80 02
//! Transmit Status Vector: 40 00 80 00 40 00 00
//! ```
//!
//! [DebugLogCodec] picks these lines out of a byte stream and decodes them. It can be used
//! with `tokio_util::codec::FramedRead` on a serial port or socket, or synchronously through
//! [LogScanner].
use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::{
    codec::decode_as,
    error::StreamError,
    protocol::{DecodeOutcome, VectorKind},
};

const MARKER: &str = "Status Vector:";
const DEFAULT_MAX_LINE_LEN: usize = 1024;
const READ_CHUNK_LEN: usize = 512;

/// A status vector found in a debug log.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoggedVector {
    line: usize,
    announced: VectorKind,
    outcome: DecodeOutcome,
}

impl LoggedVector {
    /// 1-based line number within the stream
    pub fn line(&self) -> usize {
        self.line
    }

    /// The kind printed in front of the vector
    pub fn announced(&self) -> VectorKind {
        self.announced
    }

    pub fn outcome(&self) -> &DecodeOutcome {
        &self.outcome
    }

    pub fn into_outcome(self) -> DecodeOutcome {
        self.outcome
    }
}

/// Line based decoder yielding one [LoggedVector] per status vector line.
///
/// Lines without a status vector are skipped.
#[derive(Debug, Clone)]
pub struct DebugLogCodec {
    max_line_len: usize,
    // Offset up to which the buffer has already been searched for a newline
    next_index: usize,
    line: usize,
}

impl Default for DebugLogCodec {
    fn default() -> Self {
        DebugLogCodec {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            next_index: 0,
            line: 0,
        }
    }
}

impl DebugLogCodec {
    pub fn new() -> DebugLogCodec {
        DebugLogCodec::default()
    }

    /// Set the longest line, without line ending, that is accepted.
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.max_line_len = len;
        self
    }

    /// Number of lines consumed so far
    pub fn lines(&self) -> usize {
        self.line
    }

    fn parse_line(&mut self, raw: &[u8]) -> Option<LoggedVector> {
        self.line += 1;
        let text = String::from_utf8_lossy(raw);
        let text = text.trim_end();

        let marker = text.find(MARKER)?;
        let prefix = text[..marker].trim_end();
        let announced = if prefix.ends_with(VectorKind::Receive.name()) {
            VectorKind::Receive
        } else if prefix.ends_with(VectorKind::Transmit.name()) {
            VectorKind::Transmit
        } else {
            log::debug!("Line {}: unknown vector kind in {:?}", self.line, text);
            return None;
        };

        let outcome = decode_as(announced, &text[marker + MARKER.len()..]);
        match &outcome {
            Ok(vector) => log::trace!("Line {}: {} {}", self.line, announced, vector.to_hex()),
            Err(err) => log::warn!("Line {}: {}", self.line, err),
        }
        Some(LoggedVector {
            line: self.line,
            announced,
            outcome,
        })
    }
}

/// Length of a line without a trailing carriage return
fn content_len(line: &[u8]) -> usize {
    match line.last() {
        Some(b'\r') => line.len() - 1,
        _ => line.len(),
    }
}

impl Decoder for DebugLogCodec {
    type Item = LoggedVector;
    type Error = StreamError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<LoggedVector>, StreamError> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');
            let Some(offset) = newline else {
                let len = content_len(src);
                if len > self.max_line_len {
                    return Err(StreamError::LineTooLong {
                        max: self.max_line_len,
                        got: len,
                    });
                }
                self.next_index = src.len();
                return Ok(None);
            };

            let end = self.next_index + offset;
            self.next_index = 0;
            let line = src.split_to(end + 1);
            let len = content_len(&line[..end]);
            if len > self.max_line_len {
                self.line += 1;
                return Err(StreamError::LineTooLong {
                    max: self.max_line_len,
                    got: len,
                });
            }
            if let Some(vector) = self.parse_line(&line[..end]) {
                return Ok(Some(vector));
            }
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<LoggedVector>, StreamError> {
        if let Some(vector) = self.decode(src)? {
            return Ok(Some(vector));
        }
        if src.is_empty() {
            return Ok(None);
        }
        // Last line without a line ending
        let line = src.split();
        self.next_index = 0;
        Ok(self.parse_line(&line))
    }
}

/// Blocking iterator over the status vectors in a [Read] source.
///
/// # Example
///
/// ```
/// use enc28j60_status::stream::LogScanner;
///
/// let log = "Sending Packet with 64 bytes...\nTransmit Status Vector: 40 00 80 00 40 00 00\n";
/// let vectors: Vec<_> = LogScanner::new(log.as_bytes())
///     .collect::<Result<_, _>>()
///     .expect("Reading from a slice shouldn't fail");
/// assert_eq!(vectors.len(), 1);
/// assert_eq!(vectors[0].line(), 2);
/// assert!(vectors[0].outcome().as_ref().unwrap().is_healthy());
/// ```
pub struct LogScanner<R> {
    reader: R,
    codec: DebugLogCodec,
    buf: BytesMut,
    eof: bool,
    done: bool,
}

impl<R: Read> LogScanner<R> {
    pub fn new(reader: R) -> LogScanner<R> {
        LogScanner::with_codec(reader, DebugLogCodec::default())
    }

    pub fn with_codec(reader: R, codec: DebugLogCodec) -> LogScanner<R> {
        LogScanner {
            reader,
            codec,
            buf: BytesMut::with_capacity(READ_CHUNK_LEN),
            eof: false,
            done: false,
        }
    }

    fn finish(
        &mut self,
        result: Result<Option<LoggedVector>, StreamError>,
    ) -> Option<Result<LoggedVector, StreamError>> {
        match result {
            Ok(Some(vector)) => Some(Ok(vector)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

impl<R: Read> Iterator for LogScanner<R> {
    type Item = Result<LoggedVector, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = [0u8; READ_CHUNK_LEN];
        loop {
            if self.done {
                return None;
            }
            if self.eof {
                let result = self.codec.decode_eof(&mut self.buf);
                return self.finish(result);
            }
            match self.codec.decode(&mut self.buf) {
                Ok(Some(vector)) => return Some(Ok(vector)),
                Ok(None) => {}
                Err(err) => return self.finish(Err(err)),
            }
            match self.reader.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(n) => self.buf.extend_from_slice(&chunk[..n]),
                Err(err) if err.kind() == ErrorKind::Interrupted => {}
                Err(err) => return self.finish(Err(err.into())),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::DecodeError;

    const LOG: &str = "\
Initializing ENC28J60...\r
Sending Packet with 64 bytes...\r
Transmit Status Vector: 40 00 80 00 40 00 00\r
Received Packet with 60 bytes...\r
Receive Status Vector: 3c 00 80 02\r
";

    #[test]
    fn decode_log_lines() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from(LOG);

        let first = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(first.line(), 3);
        assert_eq!(first.announced(), VectorKind::Transmit);
        assert!(first.outcome().as_ref().unwrap().is_healthy());

        let second = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(second.line(), 5);
        assert_eq!(second.announced(), VectorKind::Receive);
        assert_eq!(second.outcome().as_ref().unwrap().to_hex(), "3c008002");

        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert!(buf.is_empty());
        assert_eq!(codec.lines(), 5);
    }

    #[test]
    fn partial_line_waits_for_more_data() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from("Receive Status Vector: 3c 00");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b" 80 02\n");
        let vector = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(vector.line(), 1);
        assert!(vector.outcome().is_ok());
    }

    #[test]
    fn last_line_without_newline() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from("Receive Status Vector: 3c 00 80 02");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        let vector = codec.decode_eof(&mut buf).unwrap().unwrap();
        assert_eq!(vector.announced(), VectorKind::Receive);
        assert!(codec.decode_eof(&mut buf).unwrap().is_none());
    }

    #[test]
    fn kind_mismatch() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from("Transmit Status Vector: 3c 00 80 02\n");
        let vector = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(
            vector.into_outcome(),
            Err(DecodeError::KindMismatch {
                expected: VectorKind::Transmit,
                found: VectorKind::Receive,
            })
        );
    }

    #[test]
    fn truncated_vector() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from("Receive Status Vector: 3c 00 80\n");
        let vector = codec.decode(&mut buf).unwrap().unwrap();
        assert_eq!(vector.into_outcome(), Err(DecodeError::InvalidLength(6)));
    }

    #[test]
    fn unknown_kind_is_skipped() {
        let mut codec = DebugLogCodec::new();
        let mut buf = BytesMut::from("Some Status Vector: 3c 00 80 02\n");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(codec.lines(), 1);
    }

    #[test]
    fn line_too_long() {
        let mut codec = DebugLogCodec::new().max_line_length(16);
        let mut buf = BytesMut::from("Receive Status Vector: 3c 00 80 02\n");
        match codec.decode(&mut buf) {
            Err(StreamError::LineTooLong { max, got }) => {
                assert_eq!(max, 16);
                assert_eq!(got, 34);
            }
            other => panic!("expected LineTooLong, got {:?}", other),
        }

        let mut codec = DebugLogCodec::new().max_line_length(16);
        let mut buf = BytesMut::from("no line ending in sight");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(StreamError::LineTooLong { max: 16, got: 23 })
        ));
    }

    #[test]
    fn line_too_long_is_counted() {
        let mut codec = DebugLogCodec::new().max_line_length(16);
        let mut buf = BytesMut::from("short\nReceive Status Vector: 3c 00 80 02\n");
        assert!(codec.decode(&mut buf).is_err());
        assert_eq!(codec.lines(), 2);
    }

    #[test]
    fn carriage_return_is_not_counted() {
        // 16 characters plus CRLF
        let mut codec = DebugLogCodec::new().max_line_length(16);
        let mut buf = BytesMut::from("0123456789abcdef\r");
        assert!(codec.decode(&mut buf).unwrap().is_none());
        buf.extend_from_slice(b"\n0123456789abcdefg\r\n");
        match codec.decode(&mut buf) {
            Err(StreamError::LineTooLong { max, got }) => {
                assert_eq!(max, 16);
                assert_eq!(got, 17);
            }
            other => panic!("expected LineTooLong, got {:?}", other),
        }
        assert_eq!(codec.lines(), 2);
    }

    #[test]
    fn scanner_reads_everything() {
        let vectors: Vec<_> = LogScanner::new(LOG.as_bytes())
            .map(|result| result.unwrap().line())
            .collect();
        assert_eq!(vectors, [3, 5]);
    }

    #[test]
    fn scanner_with_small_reads() {
        // Hands out a few bytes per read to split lines across chunks
        struct Trickle<'a>(&'a [u8]);

        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                let n = self.0.len().min(buf.len()).min(3);
                buf[..n].copy_from_slice(&self.0[..n]);
                self.0 = &self.0[n..];
                Ok(n)
            }
        }

        let lines: Vec<_> = LogScanner::new(Trickle(LOG.as_bytes()))
            .map(|result| result.unwrap().line())
            .collect();
        assert_eq!(lines, [3, 5]);
    }

    #[test]
    fn scanner_stops_after_error() {
        let mut scanner =
            LogScanner::with_codec(LOG.as_bytes(), DebugLogCodec::new().max_line_length(8));
        assert!(matches!(
            scanner.next(),
            Some(Err(StreamError::LineTooLong { .. }))
        ));
        assert!(scanner.next().is_none());
    }
}
