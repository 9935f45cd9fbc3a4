//! Demo conversation showing text, image and custom bubbles

use chat_bubbles::bubble::{BubbleStyle, ResolvedStyle, Side};
use chat_bubbles::content::{ImageContent, MessageContent};
use chat_bubbles::interaction::{
    ActionMenu, DeferredQueue, InteractionPresenter, InteractionTiming, MenuAction, MenuOwner, MenuSlot,
    MenuTarget, OpenMenu,
};
use chat_bubbles::layout::ContentLayoutPolicy;
use chat_bubbles::settings::{Settings, SettingsRepository, Theme};
use chat_bubbles::text::{PhoneNumber, TextAnnotator};
use chat_bubbles::ui::components::MessageBubble;
use chat_bubbles::ui::{BubbleTheme, ImageTextureCache, SystemClipboard};
use egui::{Color32, ColorImage, Rect, Vec2};
use std::time::Instant;
use url::Url;

const SAMPLE_MESSAGES: &[(bool, &str)] = &[
    (true, "Hey! Did you see the new docs at https://www.rust-lang.org/learn ?"),
    (false, "Yes, reading them now. Also try www.example.com/bubbles"),
    (true, "Call me on +1 415-555-0100 when you get a chance"),
    (true, "Or the office line, 555-867-5309."),
    (false, "Will do 👍"),
];

/// Presentation callbacks backed by egui and the system clipboard
struct AppPresenter {
    ctx: egui::Context,
    clipboard: Option<SystemClipboard>,
    /// Owner recorded for menus presented by the next callback
    owner: MenuOwner,
    menus: MenuSlot,
    reading_list: Vec<Url>,
    status: Option<String>,
}

impl AppPresenter {
    fn new(ctx: egui::Context) -> Self {
        let clipboard = match SystemClipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                tracing::warn!("Clipboard unavailable, using egui fallback: {}", e);
                None
            }
        };
        Self {
            ctx,
            clipboard,
            owner: MenuOwner::default(),
            menus: MenuSlot::new(),
            reading_list: Vec::new(),
            status: None,
        }
    }

    fn copy_image(&mut self, image: &ColorImage) {
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_image(image),
            None => Ok(()),
        };
        match result {
            Ok(()) => self.status = Some("Image copied".to_string()),
            Err(e) => {
                tracing::error!("Failed to copy image: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }
}

impl InteractionPresenter for AppPresenter {
    fn open_url(&mut self, url: &Url) {
        tracing::info!("Opening {}", url);
        self.ctx.open_url(egui::OpenUrl::new_tab(url.as_str()));
    }

    fn dial(&mut self, number: &PhoneNumber) {
        match number.tel_url() {
            Some(url) => self.open_url(&url),
            None => tracing::warn!("Cannot build tel: URL for {}", number),
        }
    }

    fn present_action_menu(&mut self, menu: ActionMenu, anchor: Rect) {
        tracing::debug!("Presenting {:?} menu for {:?}", menu.target, self.owner);
        self.menus.present(self.owner, menu, anchor);
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        let result = match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(text),
            None => {
                self.ctx.copy_text(text.to_string());
                Ok(())
            }
        };
        match result {
            Ok(()) => self.status = Some(format!("Copied \"{}\"", text)),
            Err(e) => {
                tracing::error!("Failed to copy text: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn add_to_reading_list(&mut self, url: &Url) {
        self.reading_list.push(url.clone());
        self.status = Some(format!("Added {} to the reading list", url));
    }

    fn add_to_contacts(&mut self, number: &PhoneNumber) {
        self.status = Some(format!("Would add {} to contacts", number));
    }
}

struct Message {
    id: u64,
    side: Side,
    content: MessageContent,
}

pub struct BubbleApp {
    settings: SettingsRepository,
    theme: BubbleTheme,
    messages: Vec<Message>,
    presenter: AppPresenter,
    textures: ImageTextureCache,
    /// Copy menus for image and custom messages, which have no controller
    message_menus: DeferredQueue<(u64, Rect)>,
}

impl BubbleApp {
    pub fn new(cc: &eframe::CreationContext<'_>, image_bytes: Option<Vec<u8>>) -> Self {
        let settings = match SettingsRepository::open_default() {
            Ok(repo) => repo,
            Err(e) => {
                tracing::warn!("Using default settings: {}", e);
                SettingsRepository::new(&std::env::temp_dir())
            }
        };

        let theme = BubbleTheme::from_setting(settings.get().theme);
        theme.apply(&cc.egui_ctx);

        let messages = build_messages(settings.get(), image_bytes);
        tracing::info!("Loaded {} sample messages", messages.len());

        Self {
            settings,
            theme,
            messages,
            presenter: AppPresenter::new(cc.egui_ctx.clone()),
            textures: ImageTextureCache::new(),
            message_menus: DeferredQueue::new(),
        }
    }

    fn text_style(&self, side: Side) -> ResolvedStyle {
        let bubble = &self.settings.get().bubble;
        BubbleStyle::standard()
            .with_corner_radius(bubble.corner_radius)
            .with_border_width(bubble.border_width)
            .resolve(side)
    }

    fn image_style(&self, side: Side) -> ResolvedStyle {
        let bubble = &self.settings.get().bubble;
        BubbleStyle::image()
            .with_corner_radius(bubble.corner_radius)
            .with_border_width(bubble.image_border_width)
            .with_masked(bubble.mask_images)
            .resolve(side)
    }

    /// Fire due timers and return the earliest pending deadline
    fn poll_timers(&mut self, now: Instant) -> Option<Instant> {
        let mut next = None;
        for message in &mut self.messages {
            for (index, controller) in message.content.controllers_mut().into_iter().enumerate() {
                self.presenter.owner = MenuOwner::new(message.id, Some(index));
                controller.poll(now, &mut self.presenter);
                next = earliest(next, controller.next_deadline());
            }
        }

        for (message, anchor) in self.message_menus.drain_due(now) {
            self.presenter.owner = MenuOwner::new(message, None);
            self.presenter.present_action_menu(ActionMenu::for_message(), anchor);
        }
        self.release_displaced();
        earliest(next, self.message_menus.next_deadline())
    }

    /// Disarm the controllers behind menus replaced by a newer one
    fn release_displaced(&mut self) {
        for displaced in self.presenter.menus.drain_displaced() {
            if let Some(message) = self.messages.iter_mut().find(|m| m.id == displaced.owner.message) {
                if message.content.release(&displaced) {
                    tracing::debug!("Released {:?} after its menu was replaced", displaced.owner);
                }
            }
        }
    }

    fn select(&mut self, open: OpenMenu, action: MenuAction) {
        let Some(message) = self.messages.iter_mut().find(|m| m.id == open.owner.message) else {
            return;
        };
        self.presenter.owner = open.owner;

        match (open.menu.target, &mut message.content) {
            (MenuTarget::Span(_), content) => match open.owner.controller {
                Some(index) => {
                    if let Some(controller) = content.controller_mut(index) {
                        controller.select_menu_action(open.menu.target, action, &mut self.presenter);
                    }
                }
                None => {
                    tracing::warn!("Span menu for message {} has no controller", message.id);
                    content.release(&open);
                }
            },
            (MenuTarget::Message, MessageContent::Text(text)) => {
                text.controller
                    .select_menu_action(MenuTarget::Message, action, &mut self.presenter);
            }
            (MenuTarget::Message, MessageContent::Image(image)) if action == MenuAction::Copy => {
                let image = image.image.clone();
                self.presenter.copy_image(&image);
            }
            (MenuTarget::Message, content) if action == MenuAction::Copy => {
                let text: Vec<String> = content
                    .controllers_mut()
                    .into_iter()
                    .map(|c| c.text().text().to_string())
                    .collect();
                self.presenter.copy_to_clipboard(&text.join("\n"));
            }
            (MenuTarget::Message, _) => {}
        }
    }

    fn dismiss_menu(&mut self, open: OpenMenu) {
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == open.owner.message) {
            message.content.release(&open);
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        let Some(mut open) = self.presenter.menus.take() else {
            return;
        };

        let mut chosen = None;
        let area = egui::Area::new(egui::Id::new("action_menu"))
            .order(egui::Order::Foreground)
            .fixed_pos(open.anchor.min)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(180.0);
                    for item in &open.menu.items {
                        if ui.button(item.label.as_str()).clicked() {
                            chosen = Some(item.action);
                        }
                    }
                });
            });

        let clicked_outside = !open.fresh && area.response.clicked_elsewhere();
        open.fresh = false;
        match chosen {
            Some(action) => self.select(open, action),
            None if clicked_outside => self.dismiss_menu(open),
            None => self.presenter.menus.restore(open),
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let settings = self.settings.get_mut();
                let mut dark = settings.theme == Theme::Dark;
                if ui.checkbox(&mut dark, "Dark").changed() {
                    settings.theme = if dark { Theme::Dark } else { Theme::Light };
                    self.theme = BubbleTheme::from_setting(settings.theme);
                    self.theme.apply(ctx);
                }

                ui.separator();
                ui.label("Radius");
                ui.add(egui::Slider::new(&mut settings.bubble.corner_radius, 0.0..=40.0));
                ui.label("Border");
                ui.add(egui::Slider::new(&mut settings.bubble.border_width, 0.0..=6.0));
                ui.checkbox(&mut settings.bubble.mask_images, "Mask images");

                ui.separator();
                if ui.button("Save").clicked() {
                    match self.settings.save() {
                        Ok(()) => tracing::info!("Saved settings to {:?}", self.settings.path()),
                        Err(e) => {
                            tracing::error!("Failed to save settings: {}", e);
                            self.presenter.status = Some(e.to_string());
                        }
                    }
                }
                if ui.button("Reset").clicked() {
                    self.settings.reset();
                }

                if !self.presenter.reading_list.is_empty() {
                    ui.separator();
                    ui.label(format!("Reading list: {}", self.presenter.reading_list.len()));
                }
            });
        });
    }
}

impl eframe::App for BubbleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.show_toolbar(ctx);

        if let Some(status) = self.presenter.status.clone() {
            egui::TopBottomPanel::bottom("status_bar")
                .exact_height(24.0)
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.label(status);
                        if ui.small_button("✕").clicked() {
                            self.presenter.status = None;
                        }
                    });
                });
        }

        let policy = ContentLayoutPolicy::from(&self.settings.get().layout);
        let screen_width = ctx.screen_rect().width();

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    let max_width = ui.available_width();
                    let mut previous_side = None;

                    for index in 0..self.messages.len() {
                        let side = self.messages[index].side;
                        let style = match self.messages[index].content {
                            MessageContent::Image(_) => self.image_style(side),
                            _ => self.text_style(side),
                        };
                        let stacked = previous_side == Some(side);
                        previous_side = Some(side);

                        let message = &mut self.messages[index];
                        let armed_before = message.content.armed_flags();
                        self.presenter.owner = MenuOwner::new(message.id, None);
                        let output = MessageBubble::new(message.id, &style, &policy)
                            .max_width(max_width)
                            .screen_width(screen_width)
                            .stacked(stacked)
                            .show(ui, &mut message.content, &self.textures, &mut self.presenter, now);
                        if let Some(armed) = message.content.newly_armed(&armed_before) {
                            self.presenter.menus.claim(message.id, armed);
                        }

                        if let Some(anchor) = output.message_long_press {
                            let delay = self.settings.get().interaction.menu_delay();
                            self.message_menus.schedule(now, delay, (message.id, anchor));
                        }
                        ui.add_space(6.0);
                    }
                });
        });

        self.release_displaced();
        self.show_menu(ctx);

        if let Some(deadline) = self.poll_timers(Instant::now()) {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
        if self.presenter.menus.get().is_some_and(|open| open.fresh) {
            ctx.request_repaint();
        }
    }
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn build_messages(settings: &Settings, image_bytes: Option<Vec<u8>>) -> Vec<Message> {
    let annotator = TextAnnotator::new();
    let timing = InteractionTiming::from(&settings.interaction);
    let standard = BubbleStyle::standard();
    let mut messages = Vec::new();
    let mut next_id = 0u64;
    let mut push = |side: Side, content: MessageContent| {
        next_id += 1;
        messages.push(Message {
            id: next_id,
            side,
            content,
        });
    };

    for (incoming, text) in SAMPLE_MESSAGES {
        let side = Side::from_incoming(*incoming);
        push(
            side,
            MessageContent::text(text, &standard.resolve(side), &annotator, timing),
        );
    }

    let image = image_bytes
        .and_then(|bytes| match ImageContent::from_bytes(&bytes) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("Falling back to generated image: {}", e);
                None
            }
        })
        .unwrap_or_else(|| ImageContent::new(gradient_image(320, 200)));
    push(Side::Outgoing, MessageContent::Image(image));

    push(
        Side::Incoming,
        MessageContent::Collection(vec![
            MessageContent::text(
                "Meeting notes are at https://example.com/notes",
                &standard.resolve(Side::Incoming),
                &annotator,
                timing,
            ),
            MessageContent::custom(Vec2::new(180.0, 40.0), "📍 Shared location"),
        ]),
    );

    messages
}

/// Placeholder image when none is given on the command line
fn gradient_image(width: usize, height: usize) -> ColorImage {
    let mut image = ColorImage::new([width, height], Color32::BLACK);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let b = (y * 255 / height.max(1)) as u8;
            image.pixels[y * width + x] = Color32::from_rgb(r, 0x80, b);
        }
    }
    image
}
