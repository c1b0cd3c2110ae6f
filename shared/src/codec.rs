//! Newline-delimited codec for the command stream
//!
//! Requests and responses are framed as:
//! ```text
//! [ N bytes: UTF-8 text ][ b'\n' ]
//! ```
//!
//! Requests carry a bare command name, responses carry one JSON object.

use std::io;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde_json::ser::Formatter;
use thiserror::Error;

use crate::service::MAX_LINE_LEN;
use crate::Response;

/// Line delimiter
pub const DELIMITER: u8 = b'\n';

/// Errors that can occur during encoding/decoding
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Line too long: {0} bytes without a delimiter (max: {1})")]
    LineTooLong(usize, usize),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes JSON with `", "` and `": "` separators, the layout clients of the
/// service already parse.
#[derive(Debug, Default, Clone, Copy)]
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encode a Response as one JSON line, delimiter included
pub fn encode(response: &Response) -> Result<Bytes, CodecError> {
    let mut writer = BytesMut::with_capacity(64).writer();
    let mut ser = serde_json::Serializer::with_formatter(&mut writer, SpacedFormatter);
    response.serialize(&mut ser)?;

    let mut buf = writer.into_inner();
    buf.put_u8(DELIMITER);
    Ok(buf.freeze())
}

/// Decode a Response from one line (delimiter optional)
pub fn decode_response(line: &str) -> Result<Response, CodecError> {
    Ok(serde_json::from_str(line.trim_end())?)
}

/// Splits an incoming byte stream into request lines
#[derive(Debug)]
pub struct LineDecoder {
    /// Bytes received but not yet returned as a line
    buffer: BytesMut,
    max_line_len: usize,
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder {
    /// Create a new line decoder with the default length limit
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a line decoder with a custom length limit
    pub fn with_max_len(max_line_len: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(max_line_len.min(4096)),
            max_line_len,
        }
    }

    /// Add data to the decoder buffer
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to take the next complete line from the buffer
    ///
    /// Invalid UTF-8 is replaced with U+FFFD so the line still gets a reply.
    ///
    /// Returns:
    /// - `Ok(Some(line))` without its delimiter
    /// - `Ok(None)` if more data is needed
    /// - `Err(...)` if the stream is malformed
    pub fn decode_next(&mut self) -> Result<Option<String>, CodecError> {
        match self.buffer.iter().position(|b| *b == DELIMITER) {
            Some(pos) => {
                if pos > self.max_line_len {
                    return Err(CodecError::LineTooLong(pos, self.max_line_len));
                }
                let line = self.buffer.split_to(pos);
                self.buffer.advance(1);
                Ok(Some(String::from_utf8_lossy(&line).into_owned()))
            }
            None if self.buffer.len() > self.max_line_len => Err(CodecError::LineTooLong(
                self.buffer.len(),
                self.max_line_len,
            )),
            None => Ok(None),
        }
    }

    /// Drain whatever is left once the peer has stopped sending
    ///
    /// Returns `Ok(None)` if nothing but whitespace remains.
    pub fn finish(&mut self) -> Result<Option<String>, CodecError> {
        if self.buffer.iter().all(u8::is_ascii_whitespace) {
            self.buffer.clear();
            return Ok(None);
        }
        let rest = self.buffer.split();
        Ok(Some(String::from_utf8_lossy(&rest).into_owned()))
    }

    /// Bytes buffered but not yet returned as a line
    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Status;

    #[test]
    fn test_encode_uses_spaced_separators() {
        let encoded = encode(&Response::success("System locked")).expect("encode failed");
        assert_eq!(
            &encoded[..],
            b"{\"status\": \"SUCCESS\", \"message\": \"System locked\"}\n"
        );
    }

    #[test]
    fn test_encode_escapes_message() {
        let encoded = encode(&Response::unknown("say \"hi\"")).expect("encode failed");
        let text = std::str::from_utf8(&encoded).expect("utf8");
        assert!(text.ends_with('\n'));
        assert_eq!(text.matches('\n').count(), 1);

        let decoded = decode_response(text).expect("decode failed");
        assert_eq!(decoded.status, Status::Error);
        assert_eq!(decoded.message, "Unknown command: say \"hi\"");
    }

    #[test]
    fn test_partial_line() {
        let mut decoder = LineDecoder::new();
        decoder.extend(b"LO");
        assert!(decoder.decode_next().expect("decode error").is_none());
        assert_eq!(decoder.buffer_len(), 2);

        decoder.extend(b"CK\r\n");
        let line = decoder
            .decode_next()
            .expect("decode error")
            .expect("should have line");
        assert_eq!(line, "LOCK\r");
        assert_eq!(decoder.buffer_len(), 0);
    }

    #[test]
    fn test_multiple_lines() {
        let mut decoder = LineDecoder::new();
        decoder.extend(b"sleep\nlock\n\nshut");

        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("sleep"));
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("lock"));
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some(""));
        assert!(decoder.decode_next().unwrap().is_none());
        assert_eq!(decoder.finish().unwrap().as_deref(), Some("shut"));
        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_finish_ignores_trailing_whitespace() {
        let mut decoder = LineDecoder::new();
        decoder.extend(b" \r\n");
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some(" \r"));
        decoder.extend(b"  ");
        assert!(decoder.finish().unwrap().is_none());
    }

    #[test]
    fn test_line_too_long() {
        let mut decoder = LineDecoder::with_max_len(8);
        decoder.extend(b"123456789");
        assert!(matches!(
            decoder.decode_next(),
            Err(CodecError::LineTooLong(9, 8))
        ));

        let mut decoder = LineDecoder::with_max_len(8);
        decoder.extend(b"0123456789\n");
        assert!(matches!(
            decoder.decode_next(),
            Err(CodecError::LineTooLong(10, 8))
        ));
    }

    #[test]
    fn test_invalid_utf8_line_is_still_a_line() {
        let mut decoder = LineDecoder::new();
        decoder.extend(&[0xff, 0xfe, b'\n', b'l', b'o', b'c', b'k', b'\n']);

        let bad = decoder.decode_next().unwrap().expect("should have line");
        assert_eq!(bad, "\u{FFFD}\u{FFFD}");
        assert_eq!(decoder.decode_next().unwrap().as_deref(), Some("lock"));
        assert_eq!(decoder.buffer_len(), 0);
    }
}
