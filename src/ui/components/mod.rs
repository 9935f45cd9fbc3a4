//! Reusable UI components

pub mod message_bubble;

pub use message_bubble::{BubbleOutput, EguiTextMeasurer, MessageBubble};
