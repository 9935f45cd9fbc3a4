//! Message bubble component

use crate::bubble::{BubbleRenderer, ResolvedStyle};
use crate::content::{MeasureContext, MessageContent};
use crate::interaction::{Gesture, GestureKind, GesturePhase, InteractionPresenter};
use crate::layout::{ContentLayoutPolicy, TextMeasurer};
use crate::text::AnnotatedText;
use crate::ui::image_cache::ImageTextureCache;
use egui::{Align2, Color32, FontId, Galley, Pos2, Rect, Sense, Shape, Vec2};
use std::time::Instant;

/// Offset of the secondary bubble painted behind a stacked message
const STACK_OFFSET: Vec2 = Vec2::new(4.0, 4.0);

/// Side margin between a bubble and the panel edge
const EDGE_MARGIN: f32 = 12.0;

/// Lays text out with the context's fonts
pub struct EguiTextMeasurer<'a> {
    ctx: &'a egui::Context,
}

impl<'a> EguiTextMeasurer<'a> {
    pub fn new(ctx: &'a egui::Context) -> Self {
        Self { ctx }
    }
}

impl TextMeasurer for EguiTextMeasurer<'_> {
    fn measure(&self, text: &AnnotatedText, wrap_width: f32) -> Vec2 {
        self.ctx
            .fonts(|fonts| fonts.layout_job(text.layout_job(wrap_width)))
            .size()
    }
}

pub struct BubbleOutput {
    pub response: egui::Response,
    /// Long press on image or custom content, which has no controller of
    /// its own. Holds the menu anchor.
    pub message_long_press: Option<Rect>,
}

/// Paints one message and routes its gestures
pub struct MessageBubble<'a> {
    id: u64,
    style: &'a ResolvedStyle,
    policy: &'a ContentLayoutPolicy,
    max_width: f32,
    screen_width: f32,
    stacked: bool,
}

impl<'a> MessageBubble<'a> {
    pub fn new(id: u64, style: &'a ResolvedStyle, policy: &'a ContentLayoutPolicy) -> Self {
        Self {
            id,
            style,
            policy,
            max_width: 400.0,
            screen_width: 600.0,
            stacked: false,
        }
    }

    pub fn max_width(mut self, width: f32) -> Self {
        self.max_width = width;
        self
    }

    pub fn screen_width(mut self, width: f32) -> Self {
        self.screen_width = width;
        self
    }

    /// Paint the secondary bubble behind this one
    pub fn stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    pub fn show(
        self,
        ui: &mut egui::Ui,
        content: &mut MessageContent,
        textures: &ImageTextureCache,
        presenter: &mut dyn InteractionPresenter,
        now: Instant,
    ) -> BubbleOutput {
        let ctx = ui.ctx().clone();
        let measurer = EguiTextMeasurer::new(&ctx);
        let cx = MeasureContext {
            max_width: self.max_width,
            screen_width: self.screen_width,
            policy: self.policy,
            measurer: &measurer,
        };
        let size = content.measure(&cx).to_vec2();
        let stack = if self.stacked { STACK_OFFSET } else { Vec2::ZERO };

        let (outer, response) = ui
            .horizontal(|ui| {
                if self.style.side.is_incoming() {
                    ui.add_space(EDGE_MARGIN);
                } else {
                    ui.add_space((ui.available_width() - size.x - stack.x - EDGE_MARGIN).max(0.0));
                }
                ui.allocate_exact_size(size + stack, Sense::click())
            })
            .inner;
        let rect = Rect::from_min_size(outer.min, size);

        let gesture = gesture_from(&response, ui);
        let mut painter = Painter {
            ui,
            id: self.id,
            style: self.style,
            cx: &cx,
            textures,
            presenter,
            now,
            gesture,
            message_long_press: None,
        };

        if painter.ui.is_rect_visible(outer) || gesture.is_some() {
            let renderer = BubbleRenderer::for_style(self.style);
            if self.stacked {
                let secondary = renderer.secondary(rect.translate(stack));
                painter.ui.painter().add(secondary.to_shape());
            }
            painter.content(content, rect, &renderer, true);
        }

        BubbleOutput {
            message_long_press: painter.message_long_press,
            response,
        }
    }
}

/// Tap on primary click, long press on secondary click or touch hold
fn gesture_from(response: &egui::Response, ui: &egui::Ui) -> Option<(GestureKind, Pos2)> {
    let pointer = || {
        response
            .interact_pointer_pos()
            .or_else(|| ui.ctx().input(|i| i.pointer.interact_pos()))
    };
    if response.secondary_clicked() || response.long_touched() {
        pointer().map(|pos| (GestureKind::LongPress, pos))
    } else if response.clicked() {
        pointer().map(|pos| (GestureKind::Tap, pos))
    } else {
        None
    }
}

/// Index of the character whose glyph lies under `pos` (galley-relative).
/// Points between glyphs or past a row's end hit nothing.
fn char_at(galley: &Galley, pos: Vec2) -> Option<usize> {
    let mut row_start = 0;
    for row in &galley.rows {
        if (row.rect.min.y..row.rect.max.y).contains(&pos.y) {
            return row
                .glyphs
                .iter()
                .position(|glyph| {
                    let rect = glyph.logical_rect();
                    (rect.min.x..rect.max.x).contains(&pos.x)
                })
                .map(|index| row_start + index);
        }
        row_start += row.char_count_including_newline();
    }
    None
}

struct Painter<'u, 'a, 'p> {
    ui: &'u mut egui::Ui,
    id: u64,
    style: &'a ResolvedStyle,
    cx: &'a MeasureContext<'a>,
    textures: &'a ImageTextureCache,
    presenter: &'a mut (dyn InteractionPresenter + 'p),
    now: Instant,
    gesture: Option<(GestureKind, Pos2)>,
    message_long_press: Option<Rect>,
}

impl Painter<'_, '_, '_> {
    fn content(&mut self, content: &mut MessageContent, rect: Rect, renderer: &BubbleRenderer, top: bool) {
        let shape = renderer.primary(rect);
        match content {
            MessageContent::Text(text) => {
                if top {
                    self.ui.painter().add(shape.to_shape());
                }
                let wrap = self.cx.policy.text_wrap_width(self.cx.max_width);
                let job = text.annotated().layout_job(wrap);
                let galley = self.ui.fonts(|fonts| fonts.layout_job(job));
                let insets = self.cx.policy.insets;
                let galley_pos = rect.min + Vec2::new(insets.left, insets.top);
                let galley_rect = Rect::from_min_size(galley_pos, galley.size());

                if let Some((kind, pos)) = self.gesture.filter(|(_, pos)| rect.contains(*pos)) {
                    let hit = galley_rect
                        .contains(pos)
                        .then(|| char_at(&galley, pos - galley_pos))
                        .flatten();
                    let gesture = Gesture {
                        kind,
                        phase: GesturePhase::Began,
                        hit,
                        anchor: Rect::from_min_size(pos, Vec2::ZERO),
                    };
                    text.controller.handle_gesture(&gesture, self.now, self.presenter);
                }

                self.ui.painter().galley(galley_pos, galley, self.style.text_color);
            }
            MessageContent::Image(image) => {
                match self.textures.get_or_load(self.ui.ctx(), self.id, &image.image) {
                    Some(texture) if shape.masked => {
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        let mesh = shape.clip_mesh(texture.id(), uv, Color32::WHITE);
                        self.ui.painter().add(Shape::mesh(mesh));
                        self.ui.painter().add(shape.stroke_shape());
                    }
                    Some(texture) => {
                        self.ui.painter().add(shape.to_shape());
                        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                        self.ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
                    }
                    None => {
                        self.ui.painter().add(shape.to_shape());
                    }
                }
                self.note_message_long_press(rect);
            }
            MessageContent::Custom(custom) => {
                if top {
                    self.ui.painter().add(shape.to_shape());
                }
                self.ui.painter().text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    &custom.label,
                    FontId::proportional(14.0),
                    self.style.text_color,
                );
                self.note_message_long_press(rect);
            }
            MessageContent::Collection(children) => {
                if top {
                    self.ui.painter().add(shape.to_shape());
                }
                let mut min = rect.min;
                for child in children.iter_mut() {
                    let size = child.measure(self.cx).to_vec2();
                    let child_rect = Rect::from_min_size(min, size);
                    self.content(child, child_rect, renderer, false);
                    min.y += size.y;
                }
            }
        }
    }

    fn note_message_long_press(&mut self, rect: Rect) {
        if let Some((GestureKind::LongPress, pos)) = self.gesture {
            if rect.contains(pos) {
                self.message_long_press = Some(Rect::from_min_size(pos, Vec2::ZERO));
            }
        }
    }
}
