//! Character-by-character reveal of an answer that has already been
//! received in full.

use std::io::{self, Write};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct TypingAnimation<'a> {
    text: &'a str,
    delay: Duration,
}

impl<'a> TypingAnimation<'a> {
    pub fn new(text: &'a str, delay: Duration) -> Self {
        Self { text, delay }
    }

    /// Successive prefixes of the text, one more character each, ending with
    /// the full text.
    pub fn frames(&self) -> impl Iterator<Item = &'a str> + 'a {
        let text = self.text;
        text.char_indices().map(move |(i, ch)| &text[..i + ch.len_utf8()])
    }

    /// Write the text one character at a time. Once `cancel` fires, the rest
    /// is written at once. Returns false if the animation was cut short.
    pub async fn play<W: Write>(&self, out: &mut W, cancel: Option<&CancellationToken>) -> io::Result<bool> {
        let mut buf = [0u8; 4];
        for (i, ch) in self.text.char_indices() {
            if cancel.map_or(false, |token| token.is_cancelled()) {
                out.write_all(self.text[i..].as_bytes())?;
                out.flush()?;
                return Ok(false);
            }

            out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            out.flush()?;

            if self.delay.is_zero() {
                continue;
            }
            match cancel {
                Some(token) => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.delay) => {}
                        _ = token.cancelled() => {}
                    }
                }
                None => tokio::time::sleep(self.delay).await,
            }
        }
        Ok(true)
    }
}
