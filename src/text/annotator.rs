//! Builds [`AnnotatedText`] from raw message text

use super::annotated::{AnnotatedText, Span};
use super::detector::Detector;
use crate::bubble::ResolvedStyle;

/// Scans message text for links and phone numbers
#[derive(Debug, Default)]
pub struct TextAnnotator {
    detector: Detector,
}

impl TextAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect spans in `text` and style it for one side of the conversation
    pub fn annotate(&self, text: &str, style: &ResolvedStyle) -> AnnotatedText {
        let spans: Vec<Span> = self
            .detector
            .detect(text)
            .into_iter()
            .map(|detection| Span {
                range: detection.range,
                payload: detection.payload,
            })
            .collect();

        tracing::trace!("Annotated {} bytes with {} spans", text.len(), spans.len());

        AnnotatedText::new(
            text.to_string(),
            spans,
            style.font.clone(),
            style.text_color,
            style.link_color,
        )
    }
}
