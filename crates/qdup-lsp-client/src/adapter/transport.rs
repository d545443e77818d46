//! Stdio transport layer with LSP header framing.
//!
//! LSP frames every message with a header block:
//! ```text
//! Content-Length: <length>\r\n
//! \r\n
//! <payload>
//! ```

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::process::{ChildStdin, ChildStdout};

use super::error::TransportError;

/// Name of the only header the transport interprets.
const CONTENT_LENGTH: &str = "Content-Length";

/// Reads and writes LSP-framed messages.
///
/// Production clients use the child's stdout and stdin; tests plug in
/// in-memory buffers.
pub struct StdioTransport<R = ChildStdout, W: Write = ChildStdin> {
    reader: BufReader<R>,
    writer: BufWriter<W>,
}

impl<R: Read, W: Write> StdioTransport<R, W> {
    /// Creates a transport reading from `reader` and writing to `writer`.
    #[must_use]
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer: BufWriter::new(writer),
        }
    }

    /// Sends an LSP-framed message and flushes it.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Io` if writing fails.
    pub fn send(&mut self, message: &[u8]) -> Result<(), TransportError> {
        let header = format!("{CONTENT_LENGTH}: {}\r\n\r\n", message.len());
        self.writer.write_all(header.as_bytes())?;
        self.writer.write_all(message)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Receives an LSP-framed message, blocking until it is complete.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::MissingContentLength` if the header block has
    /// no length, `TransportError::InvalidHeader` for a malformed header, and
    /// `TransportError::Io` if reading fails or the stream ends early.
    pub fn receive(&mut self) -> Result<Vec<u8>, TransportError> {
        let content_length = self.read_headers()?;
        let mut content = vec![0u8; content_length];
        self.reader.read_exact(&mut content)?;
        Ok(content)
    }

    /// Returns the underlying writer.
    #[cfg(test)]
    pub(crate) fn writer(&self) -> &W {
        self.writer.get_ref()
    }

    fn read_headers(&mut self) -> Result<usize, TransportError> {
        let mut content_length = None;
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed while reading headers",
                )));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            if let Some(length) = parse_content_length(trimmed)? {
                content_length = Some(length);
            }
        }
        content_length.ok_or(TransportError::MissingContentLength)
    }
}

/// Parses a header line, returning the length for `Content-Length` lines.
///
/// Header names compare case-insensitively; other headers are ignored.
fn parse_content_length(line: &str) -> Result<Option<usize>, TransportError> {
    let (name, value) = line.split_once(':').ok_or(TransportError::InvalidHeader)?;
    if !name.trim().eq_ignore_ascii_case(CONTENT_LENGTH) {
        return Ok(None);
    }
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| TransportError::InvalidHeader)
}
