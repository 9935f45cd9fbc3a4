//! Content sizing for text and image bubbles

use crate::settings::LayoutSettings;
use crate::text::AnnotatedText;
use egui::Vec2;
use serde::{Deserialize, Serialize};

/// Padding between a bubble's outline and its content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Insets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl Insets {
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn to_margin(self) -> egui::Margin {
        egui::Margin {
            left: self.left,
            right: self.right,
            top: self.top,
            bottom: self.bottom,
        }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            top: 8.0,
            left: 10.0,
            bottom: 8.0,
            right: 10.0,
        }
    }
}

/// Size reserved for a message's content
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentSize {
    pub width: f32,
    pub height: f32,
}

impl ContentSize {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn is_zero(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

impl From<Vec2> for ContentSize {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Text shaping is left to the caller. The egui implementation lives in
/// `ui::components::message_bubble`.
pub trait TextMeasurer {
    /// Size of `text` laid out with the given wrap width
    fn measure(&self, text: &AnnotatedText, wrap_width: f32) -> Vec2;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentLayoutPolicy {
    pub text_width_fraction: f32,
    pub insets: Insets,
    pub image_width_fraction: f32,
    pub image_height_factor: f32,
}

impl Default for ContentLayoutPolicy {
    fn default() -> Self {
        Self::from(&LayoutSettings::default())
    }
}

impl From<&LayoutSettings> for ContentLayoutPolicy {
    fn from(settings: &LayoutSettings) -> Self {
        Self {
            text_width_fraction: settings.text_width_fraction,
            insets: settings.text_insets,
            image_width_fraction: settings.image_width_fraction,
            image_height_factor: settings.image_height_factor,
        }
    }
}

impl ContentLayoutPolicy {
    /// Width available to the text itself inside a bubble
    pub fn text_wrap_width(&self, max_width: f32) -> f32 {
        let width = sanitize(max_width) * self.text_width_fraction - self.insets.horizontal();
        width.max(0.0)
    }

    /// Measured text plus insets
    pub fn measure_text(
        &self,
        text: &AnnotatedText,
        max_width: f32,
        measurer: &dyn TextMeasurer,
    ) -> ContentSize {
        let wrap = self.text_wrap_width(max_width);
        let measured = measurer.measure(text, wrap);
        ContentSize::new(
            sanitize(measured.x).min(wrap) + self.insets.horizontal(),
            sanitize(measured.y) + self.insets.vertical(),
        )
    }

    /// Image size for a screen width. The width is always the cap and the
    /// height follows the aspect ratio, capped at `image_height_factor`
    /// widths. An explicit size overrides the image's own aspect ratio.
    pub fn measure_image(
        &self,
        screen_width: f32,
        image_size: [usize; 2],
        explicit: Option<Vec2>,
    ) -> ContentSize {
        let width_cap = sanitize(screen_width) * self.image_width_fraction;
        let height_cap = width_cap * self.image_height_factor;

        let aspect = match explicit {
            Some(size) if size.x > 0.0 && size.y > 0.0 => size.x / size.y,
            _ => {
                let [w, h] = image_size;
                if w == 0 || h == 0 {
                    tracing::debug!("Zero-sized image {}x{}", w, h);
                    return ContentSize::ZERO;
                }
                w as f32 / h as f32
            }
        };
        if !aspect.is_finite() || aspect <= 0.0 || width_cap <= 0.0 {
            return ContentSize::ZERO;
        }

        ContentSize::new(width_cap, (width_cap / aspect).min(height_cap))
    }
}

fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::{BubbleStyle, Side};
    use crate::text::TextAnnotator;

    /// 8 points per character, 20 points per line
    struct MonoMeasurer;

    impl TextMeasurer for MonoMeasurer {
        fn measure(&self, text: &AnnotatedText, wrap_width: f32) -> Vec2 {
            let chars = text.text().chars().count() as f32;
            let per_line = (wrap_width / 8.0).floor().max(1.0);
            let lines = (chars / per_line).ceil().max(1.0);
            Vec2::new((chars * 8.0).min(per_line * 8.0), lines * 20.0)
        }
    }

    fn assert_size(actual: ContentSize, width: f32, height: f32) {
        assert!(
            (actual.width - width).abs() < 1e-2 && (actual.height - height).abs() < 1e-2,
            "{:?} != {}x{}",
            actual,
            width,
            height
        );
    }

    fn text(s: &str) -> AnnotatedText {
        TextAnnotator::new().annotate(s, &BubbleStyle::standard().resolve(Side::Incoming))
    }

    #[test]
    fn test_text_wrap_width() {
        let policy = ContentLayoutPolicy::default();
        assert!((policy.text_wrap_width(300.0) - 250.0).abs() < 1e-3);
        assert_eq!(policy.text_wrap_width(10.0), 0.0);
        assert_eq!(policy.text_wrap_width(f32::NAN), 0.0);
    }

    #[test]
    fn test_measure_text_adds_insets() {
        let policy = ContentLayoutPolicy::default();

        let short = policy.measure_text(&text("hello"), 300.0, &MonoMeasurer);
        assert_size(short, 40.0 + 20.0, 20.0 + 16.0);

        // 40 chars in 248 points wrap onto two lines
        let long = policy.measure_text(&text(&"x".repeat(40)), 300.0, &MonoMeasurer);
        assert_eq!(long.height, 40.0 + 16.0);
        assert!(long.width <= 250.0 + 20.0);
    }

    #[test]
    fn test_image_width_capped_height_follows_aspect() {
        let policy = ContentLayoutPolicy::default();

        let landscape = policy.measure_image(300.0, [400, 200], None);
        assert_size(landscape, 200.0, 100.0);

        let square = policy.measure_image(300.0, [10, 10], None);
        assert_size(square, 200.0, 200.0);
    }

    #[test]
    fn test_tall_image_height_capped() {
        let policy = ContentLayoutPolicy::default();
        let tall = policy.measure_image(300.0, [100, 1000], None);
        assert_size(tall, 200.0, 400.0);
    }

    #[test]
    fn test_explicit_size_overrides_aspect() {
        let policy = ContentLayoutPolicy::default();
        let size = policy.measure_image(300.0, [400, 200], Some(Vec2::new(100.0, 100.0)));
        assert_size(size, 200.0, 200.0);

        // A half-specified override is ignored
        let size = policy.measure_image(300.0, [400, 200], Some(Vec2::new(100.0, 0.0)));
        assert_size(size, 200.0, 100.0);
    }

    #[test]
    fn test_zero_dimension_image() {
        let policy = ContentLayoutPolicy::default();
        assert_eq!(policy.measure_image(300.0, [0, 100], None), ContentSize::ZERO);
        assert_eq!(policy.measure_image(300.0, [100, 0], None), ContentSize::ZERO);
        assert_eq!(policy.measure_image(0.0, [100, 100], None), ContentSize::ZERO);
        assert!(ContentSize::ZERO.is_zero());
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = LayoutSettings {
            text_width_fraction: 1.0,
            text_insets: Insets::ZERO,
            ..LayoutSettings::default()
        };
        let policy = ContentLayoutPolicy::from(&settings);
        assert_eq!(policy.text_wrap_width(120.0), 120.0);
    }
}
