//! The kinds of content a message bubble can hold

use crate::bubble::ResolvedStyle;
use crate::error::BubbleError;
use crate::interaction::{InteractionTiming, LinkInteractionController, OpenMenu};
use crate::layout::{ContentLayoutPolicy, ContentSize, TextMeasurer};
use crate::text::{AnnotatedText, TextAnnotator};
use egui::{ColorImage, Vec2};
use std::sync::Arc;

/// Everything `measure` needs from the current layout pass
pub struct MeasureContext<'a> {
    pub max_width: f32,
    pub screen_width: f32,
    pub policy: &'a ContentLayoutPolicy,
    pub measurer: &'a dyn TextMeasurer,
}

/// Annotated text with its own interaction state
#[derive(Debug)]
pub struct TextContent {
    pub controller: LinkInteractionController,
}

impl TextContent {
    pub fn new(
        text: &str,
        style: &ResolvedStyle,
        annotator: &TextAnnotator,
        timing: InteractionTiming,
    ) -> Self {
        let annotated = annotator.annotate(text, style);
        Self {
            controller: LinkInteractionController::new(annotated, style.highlight_color, timing),
        }
    }

    pub fn annotated(&self) -> &AnnotatedText {
        self.controller.text()
    }
}

#[derive(Debug, Clone)]
pub struct ImageContent {
    pub image: Arc<ColorImage>,
    /// Caller-supplied size whose aspect ratio replaces the image's own
    pub explicit_size: Option<Vec2>,
}

impl ImageContent {
    pub fn new(image: ColorImage) -> Self {
        Self {
            image: Arc::new(image),
            explicit_size: None,
        }
    }

    /// Decode PNG or JPEG bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BubbleError> {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        let size = [decoded.width() as usize, decoded.height() as usize];
        Ok(Self::new(ColorImage::from_rgba_unmultiplied(
            size,
            decoded.as_raw(),
        )))
    }

    pub fn with_explicit_size(mut self, size: Vec2) -> Self {
        self.explicit_size = Some(size);
        self
    }

    pub fn pixel_size(&self) -> [usize; 2] {
        self.image.size
    }
}

/// Fixed-size content drawn by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct CustomContent {
    pub size: Vec2,
    pub label: String,
}

#[derive(Debug)]
pub enum MessageContent {
    Text(TextContent),
    Image(ImageContent),
    /// Children stacked vertically inside one bubble
    Collection(Vec<MessageContent>),
    Custom(CustomContent),
}

impl MessageContent {
    pub fn text(
        text: &str,
        style: &ResolvedStyle,
        annotator: &TextAnnotator,
        timing: InteractionTiming,
    ) -> Self {
        Self::Text(TextContent::new(text, style, annotator, timing))
    }

    pub fn custom(size: Vec2, label: impl Into<String>) -> Self {
        Self::Custom(CustomContent {
            size,
            label: label.into(),
        })
    }

    pub fn measure(&self, cx: &MeasureContext<'_>) -> ContentSize {
        match self {
            Self::Text(text) => cx
                .policy
                .measure_text(text.annotated(), cx.max_width, cx.measurer),
            Self::Image(image) => {
                cx.policy
                    .measure_image(cx.screen_width, image.pixel_size(), image.explicit_size)
            }
            Self::Collection(children) => children
                .iter()
                .map(|child| child.measure(cx))
                .fold(ContentSize::ZERO, |acc, size| {
                    ContentSize::new(acc.width.max(size.width), acc.height + size.height)
                }),
            Self::Custom(custom) => ContentSize::new(custom.size.x.max(0.0), custom.size.y.max(0.0)),
        }
    }

    /// Text and collection content can hold timers; this walks all of them
    pub fn controllers_mut(&mut self) -> Vec<&mut LinkInteractionController> {
        match self {
            Self::Text(text) => vec![&mut text.controller],
            Self::Collection(children) => children
                .iter_mut()
                .flat_map(|child| child.controllers_mut())
                .collect(),
            Self::Image(_) | Self::Custom(_) => Vec::new(),
        }
    }

    pub fn controllers(&self) -> Vec<&LinkInteractionController> {
        match self {
            Self::Text(text) => vec![&text.controller],
            Self::Collection(children) => children.iter().flat_map(|child| child.controllers()).collect(),
            Self::Image(_) | Self::Custom(_) => Vec::new(),
        }
    }

    /// The controller at `index` in depth-first order
    pub fn controller_mut(&mut self, index: usize) -> Option<&mut LinkInteractionController> {
        self.controllers_mut().into_iter().nth(index)
    }

    /// Armed state of every controller, in depth-first order
    pub fn armed_flags(&self) -> Vec<bool> {
        self.controllers().iter().map(|c| c.is_armed()).collect()
    }

    /// First controller armed now that was idle in `before`
    pub fn newly_armed(&self, before: &[bool]) -> Option<usize> {
        self.armed_flags()
            .iter()
            .enumerate()
            .position(|(index, armed)| *armed && !before.get(index).copied().unwrap_or(false))
    }

    /// Disarm whatever `menu` left armed. Unclaimed span menus disarm every
    /// controller armed on that span.
    pub fn release(&mut self, menu: &OpenMenu) -> bool {
        if !menu.holds_lock() {
            return false;
        }
        match menu.owner.controller {
            Some(index) => self.controller_mut(index).is_some_and(|c| c.cancel()),
            None => {
                let mut released = false;
                for controller in self.controllers_mut() {
                    if menu.menu.target.span() == controller.lock().armed_span() {
                        released |= controller.cancel();
                    }
                }
                released
            }
        }
    }
}
