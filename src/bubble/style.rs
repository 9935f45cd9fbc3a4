//! Bubble styles for incoming and outgoing messages

use crate::ui::theme::BubbleColors;
use egui::{Color32, FontId};

/// Which side of the conversation a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Incoming,
    Outgoing,
}

impl Side {
    pub fn from_incoming(is_incoming: bool) -> Self {
        if is_incoming {
            Self::Incoming
        } else {
            Self::Outgoing
        }
    }

    pub fn is_incoming(self) -> bool {
        self == Self::Incoming
    }
}

/// How the secondary (stacked) bubble is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryBubble {
    /// Same outline and fill as the primary bubble, without a border
    Flat,
    /// Exact copy of the primary bubble, border included
    MatchPrimary,
}

/// Colors, fonts and border for both sides of a conversation.
///
/// One style is usually shared by many messages; each message picks its half
/// with [`BubbleStyle::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleStyle {
    pub incoming_fill: Color32,
    pub outgoing_fill: Color32,
    pub incoming_text_color: Color32,
    pub outgoing_text_color: Color32,
    pub incoming_font: FontId,
    pub outgoing_font: FontId,
    pub border_color: Color32,
    pub border_width: f32,
    pub corner_radius: f32,
    /// Clip the content to the bubble outline
    pub is_masked: bool,
    pub link_color: Color32,
    pub highlight_color: Color32,
    pub secondary: SecondaryBubble,
}

/// The half of a [`BubbleStyle`] that applies to one message
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub side: Side,
    pub fill: Color32,
    pub text_color: Color32,
    pub font: FontId,
    pub border_color: Color32,
    pub border_width: f32,
    pub corner_radius: f32,
    pub is_masked: bool,
    pub link_color: Color32,
    pub highlight_color: Color32,
    pub secondary: SecondaryBubble,
}

impl BubbleStyle {
    /// Pale grey incoming bubbles, blue outgoing bubbles, no border
    pub fn standard() -> Self {
        Self {
            incoming_fill: BubbleColors::PALE_GREY,
            outgoing_fill: BubbleColors::ACTION_BLUE,
            incoming_text_color: BubbleColors::DARKEST_GREY,
            outgoing_text_color: BubbleColors::WHITE,
            incoming_font: FontId::proportional(16.0),
            outgoing_font: FontId::proportional(16.0),
            border_color: Color32::TRANSPARENT,
            border_width: 0.0,
            corner_radius: 16.0,
            is_masked: false,
            link_color: BubbleColors::LINK,
            highlight_color: BubbleColors::LINK_HIGHLIGHT,
            secondary: SecondaryBubble::Flat,
        }
    }

    /// Transparent bubble with a thick black border. Masking is opt-in via
    /// [`BubbleStyle::with_masked`].
    pub fn image() -> Self {
        Self {
            incoming_fill: Color32::TRANSPARENT,
            outgoing_fill: Color32::TRANSPARENT,
            incoming_text_color: Color32::BLACK,
            outgoing_text_color: Color32::BLACK,
            border_color: Color32::BLACK,
            border_width: 4.0,
            secondary: SecondaryBubble::MatchPrimary,
            ..Self::standard()
        }
    }

    /// Standard bubble with a border
    pub fn bordered(border_color: Color32, border_width: f32) -> Self {
        Self {
            border_color,
            border_width,
            ..Self::standard()
        }
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }

    pub fn with_masked(mut self, masked: bool) -> Self {
        self.is_masked = masked;
        self
    }

    /// Pick the colors and font for one side
    pub fn resolve(&self, side: Side) -> ResolvedStyle {
        let (fill, text_color, font) = match side {
            Side::Incoming => (
                self.incoming_fill,
                self.incoming_text_color,
                self.incoming_font.clone(),
            ),
            Side::Outgoing => (
                self.outgoing_fill,
                self.outgoing_text_color,
                self.outgoing_font.clone(),
            ),
        };

        ResolvedStyle {
            side,
            fill,
            text_color,
            font,
            border_color: self.border_color,
            border_width: self.border_width,
            corner_radius: self.corner_radius,
            is_masked: self.is_masked,
            link_color: self.link_color,
            highlight_color: self.highlight_color,
            secondary: self.secondary,
        }
    }
}

impl Default for BubbleStyle {
    fn default() -> Self {
        Self::standard()
    }
}

/// Shorthand for `style.resolve(Side::from_incoming(is_incoming))`
pub fn style_for(style: &BubbleStyle, is_incoming: bool) -> ResolvedStyle {
    style.resolve(Side::from_incoming(is_incoming))
}
