//! Line-based codec for tokio.
//!
//! Reads and writes newline-terminated UTF-8 lines. The decoded item is the
//! line with its terminator (`\n` or `\r\n`) stripped. At end-of-stream, an
//! unterminated final line is still yielded, so a peer that closes without a
//! trailing newline loses nothing.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, including the terminator.
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// Line-based codec that handles newline-terminated messages.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with the default line length limit.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: DEFAULT_MAX_LINE_LEN,
        }
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    fn to_line(&self, bytes: &[u8]) -> Result<String> {
        let s = String::from_utf8(bytes.to_vec())?;
        Ok(s.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            return Ok(Some(self.to_line(&line)?));
        }

        // No newline yet. Refuse to buffer past the limit.
        if src.len() > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: src.len(),
                limit: self.max_len,
            });
        }

        self.next_index = src.len();
        Ok(None)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        // Stream ended without a trailing newline; yield what remains.
        if src.is_empty() {
            Ok(None)
        } else {
            let line = src.split_to(src.len());
            self.next_index = 0;
            Ok(Some(self.to_line(&line)?))
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<()> {
        if line.len() + 1 > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: line.len() + 1,
                limit: self.max_len,
            });
        }

        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}
