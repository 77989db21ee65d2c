//! Inline reasoning-trace extraction.
//!
//! Some models interleave their reasoning into the raw text stream,
//! delimited by a tag pair such as `<think>…</think>`. The extractor
//! splits that stream into visible text and reasoning as deltas arrive,
//! buffering just enough to handle a tag split across chunk boundaries.

/// Output of one extraction step.
#[derive(Debug, Default, PartialEq)]
pub struct Extracted {
    /// Visible text outside the tag pair.
    pub text: String,
    /// Reasoning content inside the tag pair.
    pub reasoning: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
    Text,
    Reasoning,
}

/// Streaming splitter for tag-delimited reasoning traces.
#[derive(Debug)]
pub struct ReasoningExtractor {
    open: String,
    close: String,
    state: State,
    buf: String,
}

impl ReasoningExtractor {
    /// Create an extractor for `<tag>…</tag>`.
    pub fn new(tag: &str) -> Self {
        Self {
            open: format!("<{tag}>"),
            close: format!("</{tag}>"),
            state: State::Text,
            buf: String::new(),
        }
    }

    /// Feed a raw delta and take back the split output.
    pub fn push(&mut self, delta: &str) -> Extracted {
        self.buf.push_str(delta);
        let mut out = Extracted::default();

        loop {
            let (marker, sink): (&str, &mut String) = match self.state {
                State::Text => (&self.open, &mut out.text),
                State::Reasoning => (&self.close, &mut out.reasoning),
            };

            if let Some(pos) = self.buf.find(marker) {
                sink.push_str(&self.buf[..pos]);
                self.buf.drain(..pos + marker.len());
                self.state = match self.state {
                    State::Text => State::Reasoning,
                    State::Reasoning => State::Text,
                };
                continue;
            }

            // No complete marker: emit everything except a trailing
            // fragment that could still become one.
            let keep = partial_marker_len(&self.buf, marker);
            let emit = self.buf.len() - keep;
            sink.push_str(&self.buf[..emit]);
            self.buf.drain(..emit);
            return out;
        }
    }

    /// Drain the buffer at end of stream.
    ///
    /// A dangling partial marker is emitted as-is; an unclosed tag
    /// leaves the remainder in the reasoning channel.
    pub fn flush(&mut self) -> Extracted {
        let rest = std::mem::take(&mut self.buf);
        match self.state {
            State::Text => Extracted {
                text: rest,
                ..Default::default()
            },
            State::Reasoning => Extracted {
                reasoning: rest,
                ..Default::default()
            },
        }
    }
}

/// Length of the longest suffix of `buf` that is a proper prefix of
/// `marker`.
fn partial_marker_len(buf: &str, marker: &str) -> usize {
    let max = buf.len().min(marker.len() - 1);
    (1..=max)
        .rev()
        .find(|&len| buf.ends_with(&marker[..len]))
        .unwrap_or(0)
}

/// Split a complete text into visible content and reasoning.
///
/// Convenience for whole-message extraction at persistence time.
pub fn extract(content: &str, tag: &str) -> Extracted {
    let mut extractor = ReasoningExtractor::new(tag);
    let mut out = extractor.push(content);
    let rest = extractor.flush();
    out.text.push_str(&rest.text);
    out.reasoning.push_str(&rest.reasoning);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tag: &str, deltas: &[&str]) -> Extracted {
        let mut extractor = ReasoningExtractor::new(tag);
        let mut out = Extracted::default();
        for delta in deltas {
            let step = extractor.push(delta);
            out.text.push_str(&step.text);
            out.reasoning.push_str(&step.reasoning);
        }
        let rest = extractor.flush();
        out.text.push_str(&rest.text);
        out.reasoning.push_str(&rest.reasoning);
        out
    }

    #[test]
    fn splits_single_delta() {
        let out = run("think", &["<think>why</think>because"]);
        assert_eq!(out.reasoning, "why");
        assert_eq!(out.text, "because");
    }

    #[test]
    fn reassembles_tag_split_across_deltas() {
        let out = run("think", &["<thi", "nk>deep", " thought</th", "ink>answer"]);
        assert_eq!(out.reasoning, "deep thought");
        assert_eq!(out.text, "answer");
    }

    #[test]
    fn text_without_tags_passes_through() {
        let out = run("think", &["plain ", "text"]);
        assert_eq!(out.text, "plain text");
        assert!(out.reasoning.is_empty());
    }

    #[test]
    fn lone_angle_bracket_is_not_swallowed() {
        let out = run("think", &["a < b ", "and a <t", "ail"]);
        assert_eq!(out.text, "a < b and a <tail");
        assert!(out.reasoning.is_empty());
    }

    #[test]
    fn unclosed_tag_flushes_to_reasoning() {
        let out = run("think", &["<think>never ", "closed"]);
        assert_eq!(out.reasoning, "never closed");
        assert!(out.text.is_empty());
    }

    #[test]
    fn multiple_tag_pairs() {
        let out = run("think", &["<think>a</think>one<think>b</think>two"]);
        assert_eq!(out.reasoning, "ab");
        assert_eq!(out.text, "onetwo");
    }

    #[test]
    fn whole_message_extract() {
        let out = extract("<think>first</think>rest", "think");
        assert_eq!(out.reasoning, "first");
        assert_eq!(out.text, "rest");
    }
}
