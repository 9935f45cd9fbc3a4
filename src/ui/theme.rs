//! Bubble palette and egui theme

use crate::settings::Theme;
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

/// Message bubble color palette
pub struct BubbleColors;

impl BubbleColors {
    // Bubble fills
    pub const PALE_GREY: Color32 = Color32::from_rgb(0xE5, 0xE5, 0xEA);
    pub const ACTION_BLUE: Color32 = Color32::from_rgb(0x00, 0x7A, 0xFF);

    // Text colors
    pub const DARKEST_GREY: Color32 = Color32::from_rgb(0x1F, 0x1F, 0x21);
    pub const WHITE: Color32 = Color32::WHITE;

    // Links
    pub const LINK: Color32 = Color32::from_rgb(0x0A, 0x5C, 0xD6);
    pub const LINK_HIGHLIGHT: Color32 = Color32::from_rgba_premultiplied(0x40, 0x40, 0x40, 0x40);

    // Chrome
    pub const DARK_BG: Color32 = Color32::from_rgb(0x1B, 0x1B, 0x1B);
    pub const DARK_SURFACE: Color32 = Color32::from_rgb(0x2D, 0x2D, 0x2D);
    pub const DARK_SURFACE_ELEVATED: Color32 = Color32::from_rgb(0x3D, 0x3D, 0x3D);
    pub const LIGHT_BG: Color32 = Color32::from_rgb(0xFF, 0xFF, 0xFF);
    pub const LIGHT_SURFACE: Color32 = Color32::from_rgb(0xF6, 0xF6, 0xF6);
    pub const LIGHT_SURFACE_ELEVATED: Color32 = Color32::from_rgb(0xE9, 0xE9, 0xE9);
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0xFF, 0xFF, 0xFF);
    pub const TEXT_DARK: Color32 = Color32::from_rgb(0x1B, 0x1B, 0x1B);
    pub const ACTION_BLUE_HOVER: Color32 = Color32::from_rgb(0x00, 0x6A, 0xE0);
    pub const ACTION_BLUE_PRESSED: Color32 = Color32::from_rgb(0x00, 0x5A, 0xC0);
}

pub struct BubbleTheme {
    pub is_dark: bool,
}

impl BubbleTheme {
    pub fn dark() -> Self {
        Self { is_dark: true }
    }

    pub fn light() -> Self {
        Self { is_dark: false }
    }

    pub fn from_setting(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    /// Apply theme to egui context
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = Style::default();
        style.visuals = if self.is_dark {
            self.dark_visuals()
        } else {
            self.light_visuals()
        };

        style.text_styles = [
            (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(16.0, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
            (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(13.0, FontFamily::Monospace)),
        ]
        .into();

        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12.0);

        ctx.set_style(style);
    }

    fn dark_visuals(&self) -> Visuals {
        let mut visuals = Visuals::dark();

        visuals.panel_fill = BubbleColors::DARK_BG;
        visuals.window_fill = BubbleColors::DARK_SURFACE;
        visuals.extreme_bg_color = BubbleColors::DARK_BG;

        visuals.widgets.inactive.bg_fill = BubbleColors::DARK_SURFACE_ELEVATED;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_PRIMARY);
        visuals.widgets.inactive.rounding = Rounding::same(8.0);

        visuals.widgets.hovered.bg_fill = BubbleColors::ACTION_BLUE_HOVER;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_PRIMARY);
        visuals.widgets.hovered.rounding = Rounding::same(8.0);

        visuals.widgets.active.bg_fill = BubbleColors::ACTION_BLUE_PRESSED;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_PRIMARY);
        visuals.widgets.active.rounding = Rounding::same(8.0);

        visuals.hyperlink_color = BubbleColors::ACTION_BLUE;
        visuals.window_rounding = Rounding::same(12.0);
        visuals.window_shadow.blur = 16.0;

        visuals
    }

    fn light_visuals(&self) -> Visuals {
        let mut visuals = Visuals::light();

        visuals.panel_fill = BubbleColors::LIGHT_BG;
        visuals.window_fill = BubbleColors::LIGHT_SURFACE;
        visuals.extreme_bg_color = BubbleColors::LIGHT_BG;

        visuals.widgets.inactive.bg_fill = BubbleColors::LIGHT_SURFACE_ELEVATED;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_DARK);
        visuals.widgets.inactive.rounding = Rounding::same(8.0);

        visuals.widgets.hovered.bg_fill = BubbleColors::ACTION_BLUE_HOVER;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_PRIMARY);
        visuals.widgets.hovered.rounding = Rounding::same(8.0);

        visuals.widgets.active.bg_fill = BubbleColors::ACTION_BLUE_PRESSED;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, BubbleColors::TEXT_PRIMARY);
        visuals.widgets.active.rounding = Rounding::same(8.0);

        visuals.hyperlink_color = BubbleColors::ACTION_BLUE;
        visuals.window_rounding = Rounding::same(12.0);
        visuals.window_shadow.blur = 8.0;

        visuals
    }
}
