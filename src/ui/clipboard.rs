//! System clipboard access for the Copy menu actions

use crate::error::BubbleError;
use egui::ColorImage;
use std::borrow::Cow;

pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, BubbleError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }

    pub fn set_text(&mut self, text: &str) -> Result<(), BubbleError> {
        self.inner.set_text(text.to_string())?;
        Ok(())
    }

    pub fn set_image(&mut self, image: &ColorImage) -> Result<(), BubbleError> {
        self.inner.set_image(arboard::ImageData {
            width: image.size[0],
            height: image.size[1],
            bytes: Cow::Borrowed(image.as_raw()),
        })?;
        Ok(())
    }
}
