use bytes::BytesMut;
use tokio_util::codec::Decoder;

use crate::error::Error;

/// Longest line accepted before an unterminated buffer is force-framed.
pub const MAX_LINE_LEN: usize = 512;

#[derive(Debug, PartialEq)]
pub struct Frame {
    pub line: String,
    pub terminator: &'static str,
}

impl Frame {
    /// The line exactly as the client sent it, terminator included.
    pub fn raw(&self) -> String {
        format!("{}{}", self.line, self.terminator)
    }
}

/// Splits client bytes into lines. A line ends at the first LF, and a CR
/// right before it belongs to the terminator. When no LF shows up within
/// [`MAX_LINE_LEN`] bytes, those bytes are handed out as one unterminated
/// line so a client cannot make the server buffer without bound.
#[derive(Debug, Default)]
pub struct LineCodec {
    // bytes before this index are known to hold no LF
    next_index: usize,
}

impl Decoder for LineCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, Error> {
        let window = src.len().min(MAX_LINE_LEN);

        if let Some(offset) = src[self.next_index..window].iter().position(|b| *b == b'\n') {
            let end = self.next_index + offset;
            let line = src.split_to(end + 1);
            self.next_index = 0;

            let (content, terminator) = match line[..end].last() {
                Some(b'\r') => (&line[..end - 1], "\r\n"),
                _ => (&line[..end], "\n"),
            };

            return Ok(Some(Frame {
                line: String::from_utf8_lossy(content).into_owned(),
                terminator,
            }));
        }

        if src.len() >= MAX_LINE_LEN {
            let line = src.split_to(MAX_LINE_LEN);
            self.next_index = 0;

            return Ok(Some(Frame {
                line: String::from_utf8_lossy(&line).into_owned(),
                terminator: "",
            }));
        }

        self.next_index = window;
        Ok(None)
    }
}
