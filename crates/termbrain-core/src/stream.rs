use crate::error::{Result, TermbrainError};
use crate::llm::{LlmClient, Message, StreamEvent};
use futures::StreamExt;

pub const THINK_OPEN: &str = "<think>";
pub const THINK_CLOSE: &str = "</think>";
pub const THINK_PLACEHOLDER: &str = "\u{1f4ad} *Thinking...*\n";
pub const THINK_DIVIDER: &str = "\n---\n";

/// Append-only reduction of a token stream. The raw buffer keeps
/// reasoning spans tagged with think markers exactly as accumulated;
/// the display buffer holds the render view, with the placeholder and
/// divider written only where the accumulator itself opened or closed a
/// span. Both buffers only ever grow, so every display snapshot is a
/// strict prefix of the next one even when content deltas carry literal
/// think tags (those pass through verbatim). Persistence always stores
/// the raw text.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    raw: String,
    display: String,
    in_reasoning: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reasoning(&mut self, delta: &str) {
        if !self.in_reasoning {
            self.raw.push_str(THINK_OPEN);
            self.display.push_str(THINK_PLACEHOLDER);
            self.in_reasoning = true;
        }
        self.raw.push_str(delta);
        self.display.push_str(delta);
    }

    pub fn push_content(&mut self, delta: &str) {
        if self.in_reasoning {
            self.raw.push_str(THINK_CLOSE);
            self.display.push_str(THINK_DIVIDER);
            self.in_reasoning = false;
        }
        self.raw.push_str(delta);
        self.display.push_str(delta);
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Display view: reasoning spans sit behind a placeholder marker.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    /// Close any open reasoning span and yield the final raw text.
    pub fn finish(mut self) -> String {
        if self.in_reasoning {
            self.raw.push_str(THINK_CLOSE);
            self.in_reasoning = false;
        }
        self.raw
    }
}

/// Drives exactly one streaming inference call, invoking the render
/// callback with a monotonically growing display snapshot on every
/// non-empty chunk and returning the final accumulated text.
pub struct StreamConsumer;

impl StreamConsumer {
    pub async fn run<F>(
        client: &dyn LlmClient,
        messages: &[Message],
        model: &str,
        max_tokens: u32,
        mut on_render: F,
    ) -> Result<String>
    where
        F: FnMut(&str),
    {
        let mut rx = client.chat_stream(messages, model, max_tokens).await?;
        let mut acc = StreamAccumulator::new();

        while let Some(event) = rx.next().await {
            match event {
                StreamEvent::ReasoningDelta(delta) if !delta.is_empty() => {
                    acc.push_reasoning(&delta);
                    on_render(acc.display_text());
                }
                StreamEvent::TextDelta(delta) if !delta.is_empty() => {
                    acc.push_content(&delta);
                    on_render(acc.display_text());
                }
                StreamEvent::ReasoningDelta(_) | StreamEvent::TextDelta(_) => {}
                StreamEvent::Done => break,
                StreamEvent::Error(message) => {
                    return Err(TermbrainError::Stream {
                        message,
                        partial: acc.finish(),
                    });
                }
            }
        }

        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_buffer_is_append_only_and_tagged() {
        let mut acc = StreamAccumulator::new();
        acc.push_reasoning("pondering");
        acc.push_content("answer");
        assert_eq!(acc.raw(), "<think>pondering</think>answer");
    }

    #[test]
    fn display_collapses_reasoning_spans() {
        let mut acc = StreamAccumulator::new();
        acc.push_reasoning("hmm");
        acc.push_content("done");
        let display = acc.display_text();
        assert!(display.contains(THINK_PLACEHOLDER));
        assert!(!display.contains(THINK_OPEN));
        assert!(display.ends_with("done"));
    }

    #[test]
    fn finish_closes_open_reasoning_span() {
        let mut acc = StreamAccumulator::new();
        acc.push_reasoning("trailing thought");
        let raw = acc.finish();
        assert!(raw.ends_with(THINK_CLOSE));
    }

    #[test]
    fn display_grows_monotonically() {
        let mut acc = StreamAccumulator::new();
        let mut previous = String::new();
        for (reasoning, delta) in [
            (true, "a"),
            (true, "b"),
            (false, "c"),
            (false, "d"),
        ] {
            if reasoning {
                acc.push_reasoning(delta);
            } else {
                acc.push_content(delta);
            }
            let current = acc.display_text().to_string();
            assert!(current.starts_with(&previous));
            previous = current;
        }
    }

    #[test]
    fn literal_think_tag_split_across_content_deltas_stays_verbatim() {
        let mut acc = StreamAccumulator::new();
        let mut previous = String::new();
        for delta in ["<th", "ink>", " is just text"] {
            acc.push_content(delta);
            let current = acc.display_text().to_string();
            assert!(current.starts_with(&previous));
            // Every snapshot boundary must be sliceable by byte offset.
            assert!(current.is_char_boundary(previous.len()));
            previous = current;
        }
        assert_eq!(acc.display_text(), "<think> is just text");
        assert_eq!(acc.finish(), "<think> is just text");
    }
}
