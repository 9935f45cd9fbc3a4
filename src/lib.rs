//! Chat-Bubbles: chat message bubbles with interactive links for egui
//!
//! The crate is split into the pure core and the egui presentation:
//! - `bubble` computes bubble outlines and turns them into paintable shapes
//! - `text` detects links and phone numbers and keeps the styled text buffer
//! - `interaction` runs the tap / long-press state machine over that buffer
//! - `layout` and `content` size message content for a given width
//! - `ui` paints all of the above with egui

#![warn(clippy::all, rust_2018_idioms)]

pub mod bubble;
pub mod content;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod settings;
pub mod text;
pub mod ui;

pub use bubble::{BubbleRenderer, BubbleShape, BubbleStyle, ResolvedStyle, Side};
pub use error::BubbleError;
pub use interaction::{InteractionPresenter, LinkInteractionController};
pub use layout::{ContentLayoutPolicy, ContentSize};
pub use text::{AnnotatedText, TextAnnotator};
