//! Link and phone number annotation of message text

pub mod annotated;
pub mod annotator;
pub mod detector;

pub use annotated::{AnnotatedText, RunFormat, Span, TextRun};
pub use annotator::TextAnnotator;
pub use detector::{Detector, PhoneNumber, SpanKind, SpanPayload};
