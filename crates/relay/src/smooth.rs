//! Word-granularity output smoothing.
//!
//! Providers emit deltas at token granularity, which renders unevenly
//! on the client. The smoother re-chunks the delta stream so each
//! emission is one word (with its surrounding whitespace), holding back
//! a trailing partial word until it completes.

/// Re-chunks a stream of text deltas at word granularity.
#[derive(Debug, Default)]
pub struct WordSmoother {
    buf: String,
}

impl WordSmoother {
    /// Create an empty smoother.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a raw delta; returns the completed word pieces to emit.
    ///
    /// A piece is complete once a non-whitespace character follows it,
    /// so a word is never split across emissions.
    pub fn push(&mut self, delta: &str) -> Vec<String> {
        self.buf.push_str(delta);

        // The completed region ends at the start of the last word: a
        // non-whitespace character preceded by whitespace.
        let mut boundary = None;
        let mut prev_ws = false;
        for (i, ch) in self.buf.char_indices() {
            if !ch.is_whitespace() && prev_ws {
                boundary = Some(i);
            }
            prev_ws = ch.is_whitespace();
        }

        let Some(boundary) = boundary else {
            return Vec::new();
        };
        let rest = self.buf.split_off(boundary);
        let complete = std::mem::replace(&mut self.buf, rest);
        chunk_words(&complete)
    }

    /// Emit whatever is still buffered (the trailing partial word).
    pub fn flush(&mut self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}

/// Split a completed region into word pieces, each carrying its
/// leading and trailing whitespace.
fn chunk_words(s: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut prev_ws = true;
    let mut seen_word = false;
    for (i, ch) in s.char_indices() {
        let ws = ch.is_whitespace();
        if !ws && prev_ws && seen_word {
            pieces.push(s[start..i].to_owned());
            start = i;
        }
        if !ws {
            seen_word = true;
        }
        prev_ws = ws;
    }
    if start < s.len() {
        pieces.push(s[start..].to_owned());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_partial_word() {
        let mut smoother = WordSmoother::new();
        assert!(smoother.push("Hel").is_empty());
        assert_eq!(smoother.push("lo wor"), vec!["Hello "]);
        assert!(smoother.push("ld!").is_empty());
        assert_eq!(smoother.flush().as_deref(), Some("world!"));
        assert!(smoother.flush().is_none());
    }

    #[test]
    fn splits_multiple_words_in_one_delta() {
        let mut smoother = WordSmoother::new();
        assert_eq!(smoother.push("one two three"), vec!["one ", "two "]);
        assert_eq!(smoother.flush().as_deref(), Some("three"));
    }

    #[test]
    fn keeps_whitespace_runs_intact() {
        let mut smoother = WordSmoother::new();
        assert_eq!(smoother.push("a  \n b"), vec!["a  \n "]);
        assert_eq!(smoother.flush().as_deref(), Some("b"));
    }

    #[test]
    fn concatenation_is_lossless() {
        let input = ["The", " qui", "ck  bro", "wn\nfox ", "jumps"];
        let mut smoother = WordSmoother::new();
        let mut rebuilt = String::new();
        for delta in input {
            for piece in smoother.push(delta) {
                rebuilt.push_str(&piece);
            }
        }
        if let Some(rest) = smoother.flush() {
            rebuilt.push_str(&rest);
        }
        assert_eq!(rebuilt, input.concat());
    }

    #[test]
    fn flush_on_empty_is_none() {
        assert!(WordSmoother::new().flush().is_none());
    }
}
