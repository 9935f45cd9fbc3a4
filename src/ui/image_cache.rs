//! Texture cache for image message content

use egui::{ColorImage, TextureHandle, TextureOptions};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Uploaded textures keyed by message id
#[derive(Default)]
pub struct ImageTextureCache {
    textures: RwLock<HashMap<u64, TextureHandle>>,
}

impl ImageTextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, ctx: &egui::Context, id: u64, image: &ColorImage) -> Option<TextureHandle> {
        if let Some(texture) = self.textures.read().get(&id) {
            return Some(texture.clone());
        }
        if image.size[0] == 0 || image.size[1] == 0 {
            return None;
        }

        let texture = ctx.load_texture(format!("message_image_{}", id), image.clone(), TextureOptions::LINEAR);
        tracing::debug!("Uploaded texture for message {} ({:?})", id, image.size);
        self.textures.write().insert(id, texture.clone());
        Some(texture)
    }
}
