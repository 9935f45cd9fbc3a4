//! egui presentation of message bubbles

pub mod clipboard;
pub mod components;
pub mod image_cache;
pub mod theme;

pub use clipboard::SystemClipboard;
pub use image_cache::ImageTextureCache;
pub use theme::{BubbleColors, BubbleTheme};
