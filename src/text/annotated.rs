//! Styled text buffer with typed link / phone spans

use super::detector::{SpanKind, SpanPayload};
use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId, Stroke};
use std::ops::Range;

/// Font size of the invisible trailing run. Keeps the last glyph (emoji in
/// particular) from being clipped by layout rounding.
pub const TRAILING_RUN_FONT_SIZE: f32 = 1.0;
const TRAILING_RUN_TEXT: &str = " ";

/// A tappable range of the text. `range` is in bytes of the base string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub range: Range<usize>,
    pub payload: SpanPayload,
}

impl Span {
    pub fn kind(&self) -> SpanKind {
        self.payload.kind()
    }
}

/// Display attributes of one run of characters
#[derive(Debug, Clone, PartialEq)]
pub struct RunFormat {
    pub font: FontId,
    pub color: Color32,
    pub background: Option<Color32>,
    pub underline: bool,
}

impl RunFormat {
    fn to_text_format(&self) -> TextFormat {
        TextFormat {
            font_id: self.font.clone(),
            color: self.color,
            background: self.background.unwrap_or(Color32::TRANSPARENT),
            underline: if self.underline {
                Stroke::new(1.0, self.color)
            } else {
                Stroke::NONE
            },
            ..Default::default()
        }
    }
}

/// A contiguous range of the base string sharing one [`RunFormat`]
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub range: Range<usize>,
    pub format: RunFormat,
}

/// Message text, its spans and the current display overlay.
///
/// Spans are fixed at construction. Only the overlay changes afterwards,
/// through [`set_highlight`](Self::set_highlight) and
/// [`clear_highlight`](Self::clear_highlight). Runs always cover the base
/// string contiguously; an empty string has a single empty run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedText {
    text: String,
    spans: Vec<Span>,
    runs: Vec<TextRun>,
    trailing: RunFormat,
    revision: u64,
}

impl AnnotatedText {
    /// Build from pre-validated, sorted, non-overlapping spans.
    ///
    /// Span runs get `link_color` and an underline; everything else gets the
    /// base font and color.
    pub(crate) fn new(
        text: String,
        spans: Vec<Span>,
        font: FontId,
        color: Color32,
        link_color: Color32,
    ) -> Self {
        let base = RunFormat {
            font: font.clone(),
            color,
            background: None,
            underline: false,
        };
        let link = RunFormat {
            color: link_color,
            underline: true,
            ..base.clone()
        };

        let mut runs = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for span in &spans {
            if span.range.start > cursor {
                runs.push(TextRun {
                    range: cursor..span.range.start,
                    format: base.clone(),
                });
            }
            runs.push(TextRun {
                range: span.range.clone(),
                format: link.clone(),
            });
            cursor = span.range.end;
        }
        if cursor < text.len() || runs.is_empty() {
            runs.push(TextRun {
                range: cursor..text.len(),
                format: base,
            });
        }

        let trailing = RunFormat {
            font: FontId::new(TRAILING_RUN_FONT_SIZE, font.family),
            color: Color32::TRANSPARENT,
            background: None,
            underline: false,
        };

        Self {
            text,
            spans,
            runs,
            trailing,
            revision: 0,
        }
    }

    /// The message text, without the trailing workaround run
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn span(&self, index: usize) -> Option<&Span> {
        self.spans.get(index)
    }

    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Format of the invisible run appended after the text
    pub fn trailing_run(&self) -> &RunFormat {
        &self.trailing
    }

    /// Incremented on every change to the display overlay
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Index of the span containing byte `offset`
    pub fn span_at(&self, offset: usize) -> Option<usize> {
        let idx = self.spans.partition_point(|s| s.range.end <= offset);
        self.spans
            .get(idx)
            .filter(|s| s.range.contains(&offset))
            .map(|_| idx)
    }

    /// Index of the span containing the `char_index`-th character, as
    /// reported by a text layout cursor
    pub fn span_at_char(&self, char_index: usize) -> Option<usize> {
        let (offset, _) = self.text.char_indices().nth(char_index)?;
        self.span_at(offset)
    }

    /// Background color currently applied at byte `offset`
    pub fn background_at(&self, offset: usize) -> Option<Color32> {
        self.runs
            .iter()
            .find(|run| run.range.contains(&offset))
            .and_then(|run| run.format.background)
    }

    /// Tint the background of `range`. Returns whether anything changed.
    pub fn set_highlight(&mut self, range: Range<usize>, color: Color32) -> bool {
        self.set_background(range, Some(color))
    }

    /// Remove any background tint from `range`. Clearing an unhighlighted
    /// range is a no-op and returns `false`.
    pub fn clear_highlight(&mut self, range: Range<usize>) -> bool {
        self.set_background(range, None)
    }

    /// Re-apply base font and color, e.g. after the message switched sides.
    /// Span runs keep `link_color`.
    pub fn restyle(&mut self, font: FontId, color: Color32, link_color: Color32) {
        let spans = &self.spans;
        for run in &mut self.runs {
            let in_span = spans
                .iter()
                .any(|s| s.range.start <= run.range.start && run.range.end <= s.range.end);
            run.format.font = font.clone();
            run.format.color = if in_span { link_color } else { color };
        }
        self.trailing.font = FontId::new(TRAILING_RUN_FONT_SIZE, font.family);
        self.revision += 1;
    }

    /// Convert to an egui layout job wrapping at `wrap_width`
    pub fn layout_job(&self, wrap_width: f32) -> LayoutJob {
        let mut job = LayoutJob::default();
        job.wrap.max_width = wrap_width;
        for run in &self.runs {
            job.append(&self.text[run.range.clone()], 0.0, run.format.to_text_format());
        }
        job.append(TRAILING_RUN_TEXT, 0.0, self.trailing.to_text_format());
        job
    }

    fn set_background(&mut self, range: Range<usize>, background: Option<Color32>) -> bool {
        if range.is_empty()
            || range.end > self.text.len()
            || !self.text.is_char_boundary(range.start)
            || !self.text.is_char_boundary(range.end)
        {
            return false;
        }

        let changed = self
            .runs
            .iter()
            .any(|run| overlaps(&run.range, &range) && run.format.background != background);
        if !changed {
            return false;
        }

        self.split_at(range.start);
        self.split_at(range.end);
        for run in &mut self.runs {
            if range.start <= run.range.start && run.range.end <= range.end {
                run.format.background = background;
            }
        }
        self.merge_runs();
        self.revision += 1;
        true
    }

    fn split_at(&mut self, offset: usize) {
        let Some(idx) = self
            .runs
            .iter()
            .position(|run| run.range.start < offset && offset < run.range.end)
        else {
            return;
        };
        let run = &mut self.runs[idx];
        let tail = TextRun {
            range: offset..run.range.end,
            format: run.format.clone(),
        };
        run.range.end = offset;
        self.runs.insert(idx + 1, tail);
    }

    /// Join neighbours with equal formats, but never across a span boundary
    fn merge_runs(&mut self) {
        let boundaries: Vec<usize> = self
            .spans
            .iter()
            .flat_map(|s| [s.range.start, s.range.end])
            .collect();

        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.format == run.format
                    && last.range.end == run.range.start
                    && !boundaries.contains(&run.range.start)
                {
                    last.range.end = run.range.end;
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::detector::PhoneNumber;

    fn sample() -> AnnotatedText {
        // "call 555-1234 now"
        let text = "call 555-1234 now".to_string();
        let spans = vec![Span {
            range: 5..13,
            payload: SpanPayload::Phone(PhoneNumber::parse("555-1234").unwrap()),
        }];
        AnnotatedText::new(
            text,
            spans,
            FontId::proportional(16.0),
            Color32::WHITE,
            Color32::LIGHT_BLUE,
        )
    }

    #[test]
    fn test_runs_cover_text() {
        let text = sample();
        let ranges: Vec<Range<usize>> = text.runs().iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..5, 5..13, 13..17]);
        assert!(text.runs()[1].format.underline);
        assert_eq!(text.runs()[1].format.color, Color32::LIGHT_BLUE);
        assert_eq!(text.runs()[0].format.color, Color32::WHITE);
    }

    #[test]
    fn test_span_lookup() {
        let text = sample();
        assert_eq!(text.span_at(4), None);
        assert_eq!(text.span_at(5), Some(0));
        assert_eq!(text.span_at(12), Some(0));
        assert_eq!(text.span_at(13), None);
        assert_eq!(text.span_at_char(6), Some(0));
        assert_eq!(text.span_at_char(100), None);
    }

    #[test]
    fn test_span_at_char_with_multibyte_prefix() {
        let text = "🎉 555-1234".to_string();
        let start = "🎉 ".len();
        let spans = vec![Span {
            range: start..text.len(),
            payload: SpanPayload::Phone(PhoneNumber::parse("555-1234").unwrap()),
        }];
        let annotated = AnnotatedText::new(text, spans, FontId::proportional(16.0), Color32::WHITE, Color32::BLUE);
        assert_eq!(annotated.span_at_char(0), None);
        assert_eq!(annotated.span_at_char(2), Some(0));
    }

    #[test]
    fn test_highlight_and_clear() {
        let mut text = sample();
        assert!(text.set_highlight(5..13, Color32::GRAY));
        assert_eq!(text.background_at(6), Some(Color32::GRAY));
        assert_eq!(text.background_at(2), None);
        assert_eq!(text.revision(), 1);

        assert!(text.clear_highlight(5..13));
        assert_eq!(text.background_at(6), None);
        assert_eq!(text.revision(), 2);
        assert_eq!(text.runs().len(), 3);
    }

    #[test]
    fn test_clear_without_highlight_is_noop() {
        let mut text = sample();
        let before = text.clone();
        assert!(!text.clear_highlight(5..13));
        assert!(!text.clear_highlight(0..0));
        assert!(!text.clear_highlight(10..100));
        assert_eq!(text, before);
    }

    #[test]
    fn test_highlight_twice_is_noop() {
        let mut text = sample();
        assert!(text.set_highlight(5..13, Color32::GRAY));
        assert!(!text.set_highlight(5..13, Color32::GRAY));
        assert_eq!(text.revision(), 1);
    }

    #[test]
    fn test_partial_highlight_splits_runs() {
        let mut text = sample();
        assert!(text.set_highlight(1..3, Color32::GRAY));
        let ranges: Vec<Range<usize>> = text.runs().iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..1, 1..3, 3..5, 5..13, 13..17]);

        assert!(text.clear_highlight(0..5));
        let ranges: Vec<Range<usize>> = text.runs().iter().map(|r| r.range.clone()).collect();
        assert_eq!(ranges, vec![0..5, 5..13, 13..17]);
    }

    #[test]
    fn test_restyle_keeps_link_color() {
        let mut text = sample();
        text.restyle(FontId::proportional(20.0), Color32::BLACK, Color32::RED);
        assert_eq!(text.runs()[0].format.color, Color32::BLACK);
        assert_eq!(text.runs()[1].format.color, Color32::RED);
        assert!(text.runs().iter().all(|r| r.format.font.size == 20.0));
        assert_eq!(text.trailing_run().font.size, TRAILING_RUN_FONT_SIZE);
    }

    #[test]
    fn test_layout_job_sections() {
        let mut text = sample();
        text.set_highlight(5..13, Color32::GRAY);
        let job = text.layout_job(200.0);
        assert_eq!(job.text, "call 555-1234 now ");
        assert_eq!(job.sections.len(), 4);
        assert_eq!(job.sections[1].format.background, Color32::GRAY);
        assert_eq!(job.sections[1].format.underline.width, 1.0);
        assert_eq!(job.sections[3].format.font_id.size, TRAILING_RUN_FONT_SIZE);
        assert_eq!(job.wrap.max_width, 200.0);
    }
}
