//! Bubble outline, styling and paintable shapes

pub mod geometry;
pub mod renderer;
pub mod style;

pub use geometry::{compute_path, BubblePath, PathSegment};
pub use renderer::{BubbleRenderer, BubbleShape};
pub use style::{BubbleStyle, ResolvedStyle, SecondaryBubble, Side};
