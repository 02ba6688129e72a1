use bytes::{Buf, BytesMut};
use std::io::{Error as IoError, ErrorKind};

/// Reassembles text from byte chunks that may split a UTF-8 code point.
///
/// Transports hand out bytes, the scanner wants `&str`. Whatever tail of a
/// chunk is an incomplete code point is held back until the next chunk
/// arrives.
#[derive(Debug, Default)]
pub struct Utf8Assembler {
    pending: BytesMut,
}

impl Utf8Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` and return all text that is now complete. The result may
    /// be empty when the chunk only carried part of a code point.
    pub fn push(&mut self, chunk: &[u8]) -> Result<String, IoError> {
        self.pending.extend_from_slice(chunk);
        let valid = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            // `error_len() == None` means the input simply stops mid code point.
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(IoError::new(ErrorKind::InvalidData, e)),
        };
        let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
        self.pending.advance(valid);
        Ok(text)
    }

    /// Number of bytes held back for the next chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Signal end of input. Leftover bytes are an incomplete code point.
    pub fn finish(&mut self) -> Result<(), IoError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let dangling = self.pending.len();
        self.pending.clear();
        Err(IoError::new(
            ErrorKind::UnexpectedEof,
            format!("stream ended with {dangling} byte(s) of an incomplete UTF-8 sequence"),
        ))
    }
}
