//! Tap and long-press handling for links and phone numbers
//!
//! One controller exists per message. It owns the message's annotated text,
//! the single-flight [`InteractionLock`] and the delayed callbacks that clear
//! highlights or present menus. Dropping the controller drops its pending
//! callbacks with it.

use super::menu::{ActionMenu, MenuAction, MenuTarget};
use super::timer::DeferredQueue;
use crate::bubble::ResolvedStyle;
use crate::settings::InteractionSettings;
use crate::text::{AnnotatedText, PhoneNumber, Span, SpanPayload};
use egui::{Color32, Rect};
use std::ops::Range;
use std::time::{Duration, Instant};
use url::Url;

/// Callbacks into the presentation layer
pub trait InteractionPresenter {
    fn open_url(&mut self, url: &Url);

    fn dial(&mut self, number: &PhoneNumber);

    fn present_action_menu(&mut self, menu: ActionMenu, anchor: Rect);

    fn copy_to_clipboard(&mut self, text: &str);

    fn add_to_reading_list(&mut self, url: &Url) {
        tracing::debug!("Add to reading list not supported: {}", url);
    }

    fn add_to_contacts(&mut self, number: &PhoneNumber) {
        tracing::debug!("Add to contacts not supported: {}", number);
    }
}

/// At most one span per message is armed: highlighted and waiting for a
/// menu decision.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionLock {
    #[default]
    Idle,
    Armed { span: usize, range: Range<usize> },
}

impl InteractionLock {
    pub fn armed_span(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Armed { span, .. } => Some(*span),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    LongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gesture {
    pub kind: GestureKind,
    pub phase: GesturePhase,
    /// Character index under the pointer, `None` when outside the text
    pub hit: Option<usize>,
    /// Where a menu for this gesture should point
    pub anchor: Rect,
}

impl Gesture {
    pub fn tap(hit: Option<usize>, anchor: Rect) -> Self {
        Self {
            kind: GestureKind::Tap,
            phase: GesturePhase::Began,
            hit,
            anchor,
        }
    }

    pub fn long_press(hit: Option<usize>, anchor: Rect) -> Self {
        Self {
            kind: GestureKind::LongPress,
            phase: GesturePhase::Began,
            hit,
            anchor,
        }
    }

    pub fn with_phase(mut self, phase: GesturePhase) -> Self {
        self.phase = phase;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionTiming {
    /// Highlight lifetime after a tap or long press
    pub highlight_clear: Duration,
    /// Delay before the message copy menu appears
    pub menu_delay: Duration,
}

impl Default for InteractionTiming {
    fn default() -> Self {
        Self {
            highlight_clear: Duration::from_millis(400),
            menu_delay: Duration::from_millis(100),
        }
    }
}

impl From<&InteractionSettings> for InteractionTiming {
    fn from(settings: &InteractionSettings) -> Self {
        Self {
            highlight_clear: settings.highlight_clear_delay(),
            menu_delay: settings.menu_delay(),
        }
    }
}

#[derive(Debug)]
enum Deferred {
    ClearHighlight(Range<usize>),
    PresentMenu { menu: ActionMenu, anchor: Rect },
}

#[derive(Debug)]
pub struct LinkInteractionController {
    text: AnnotatedText,
    lock: InteractionLock,
    timers: DeferredQueue<Deferred>,
    timing: InteractionTiming,
    highlight_color: Color32,
}

impl LinkInteractionController {
    pub fn new(text: AnnotatedText, highlight_color: Color32, timing: InteractionTiming) -> Self {
        Self {
            text,
            lock: InteractionLock::Idle,
            timers: DeferredQueue::new(),
            timing,
            highlight_color,
        }
    }

    pub fn text(&self) -> &AnnotatedText {
        &self.text
    }

    pub fn lock(&self) -> &InteractionLock {
        &self.lock
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.lock, InteractionLock::Armed { .. })
    }

    /// Route a gesture. Only the `Began` phase does anything.
    pub fn handle_gesture(
        &mut self,
        gesture: &Gesture,
        now: Instant,
        presenter: &mut dyn InteractionPresenter,
    ) -> bool {
        if gesture.phase != GesturePhase::Began {
            return false;
        }
        let Some(hit) = gesture.hit else {
            return false;
        };

        match (gesture.kind, self.text.span_at_char(hit)) {
            (GestureKind::Tap, Some(span)) => self.tap(span, now, presenter),
            (GestureKind::Tap, None) => false,
            (GestureKind::LongPress, Some(span)) => {
                self.long_press(span, gesture.anchor, now, presenter)
            }
            (GestureKind::LongPress, None) => self.long_press_message(gesture.anchor, now),
        }
    }

    /// Tap on a span: links open (with a short highlight flash), phone
    /// numbers dial. Nothing is armed. Dropped while a span is armed.
    pub fn tap(&mut self, span: usize, now: Instant, presenter: &mut dyn InteractionPresenter) -> bool {
        if let Some(armed) = self.lock.armed_span() {
            tracing::debug!("Dropping tap on span {} while span {} is armed", span, armed);
            return false;
        }
        let Some(target) = self.text.span(span).cloned() else {
            return false;
        };

        match &target.payload {
            SpanPayload::Link(url) => {
                self.flash_highlight(target.range.clone(), now);
                presenter.open_url(url);
            }
            SpanPayload::Phone(number) => presenter.dial(number),
        }
        true
    }

    /// Long press on a span: arm it, highlight it and present its menu.
    /// Dropped while another span is armed.
    pub fn long_press(
        &mut self,
        span: usize,
        anchor: Rect,
        now: Instant,
        presenter: &mut dyn InteractionPresenter,
    ) -> bool {
        if let Some(armed) = self.lock.armed_span() {
            tracing::debug!("Dropping long press on span {} while span {} is armed", span, armed);
            return false;
        }
        let Some(target) = self.text.span(span).cloned() else {
            return false;
        };

        self.lock = InteractionLock::Armed {
            span,
            range: target.range.clone(),
        };
        self.flash_highlight(target.range.clone(), now);

        let menu = match &target.payload {
            SpanPayload::Link(_) => ActionMenu::for_link(span),
            SpanPayload::Phone(number) => ActionMenu::for_phone(span, number),
        };
        presenter.present_action_menu(menu, anchor);
        true
    }

    /// Long press on the text outside any span: show the message copy menu
    /// after the menu delay. Does not arm the lock.
    pub fn long_press_message(&mut self, anchor: Rect, now: Instant) -> bool {
        if self.is_armed() {
            tracing::debug!("Dropping message long press while a span is armed");
            return false;
        }
        self.timers.schedule(
            now,
            self.timing.menu_delay,
            Deferred::PresentMenu {
                menu: ActionMenu::for_message(),
                anchor,
            },
        );
        true
    }

    /// A menu choice was made. Disarms the lock, clears the highlight and
    /// performs the action. Stale span menus (lock no longer armed on that
    /// span) are ignored.
    pub fn select_menu_action(
        &mut self,
        target: MenuTarget,
        action: MenuAction,
        presenter: &mut dyn InteractionPresenter,
    ) -> bool {
        let span = match target {
            MenuTarget::Message => {
                if action == MenuAction::Copy {
                    presenter.copy_to_clipboard(self.text.text());
                }
                return true;
            }
            MenuTarget::Span(span) => span,
        };

        if self.lock.armed_span() != Some(span) {
            tracing::debug!("Ignoring {:?} from stale menu for span {}", action, span);
            return false;
        }
        let InteractionLock::Armed { range, .. } = std::mem::take(&mut self.lock) else {
            return false;
        };
        self.text.clear_highlight(range);

        let Some(target) = self.text.span(span).cloned() else {
            return false;
        };
        perform(&target, action, presenter);
        true
    }

    /// External dismissal of the armed menu
    pub fn cancel(&mut self) -> bool {
        match std::mem::take(&mut self.lock) {
            InteractionLock::Idle => false,
            InteractionLock::Armed { range, .. } => {
                self.text.clear_highlight(range);
                true
            }
        }
    }

    /// Run every callback due at `now`. Returns how many ran.
    pub fn poll(&mut self, now: Instant, presenter: &mut dyn InteractionPresenter) -> usize {
        let due = self.timers.drain_due(now);
        let count = due.len();
        for deferred in due {
            match deferred {
                Deferred::ClearHighlight(range) => {
                    if self.text.clear_highlight(range.clone()) {
                        tracing::debug!("Highlight timeout cleared {:?}", range);
                    }
                }
                Deferred::PresentMenu { .. } if self.is_armed() => {
                    tracing::debug!("Dropping message menu while a span is armed");
                }
                Deferred::PresentMenu { menu, anchor } => presenter.present_action_menu(menu, anchor),
            }
        }
        count
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Forget every pending callback, e.g. when the message is torn down
    pub fn cancel_pending(&mut self) {
        self.timers.cancel_all();
    }

    /// Re-apply fonts and colors after the message changed sides
    pub fn restyle(&mut self, style: &ResolvedStyle) {
        self.text
            .restyle(style.font.clone(), style.text_color, style.link_color);
        self.highlight_color = style.highlight_color;
    }

    fn flash_highlight(&mut self, range: Range<usize>, now: Instant) {
        self.text.set_highlight(range.clone(), self.highlight_color);
        self.timers
            .schedule(now, self.timing.highlight_clear, Deferred::ClearHighlight(range));
    }
}

fn perform(span: &Span, action: MenuAction, presenter: &mut dyn InteractionPresenter) {
    match (action, &span.payload) {
        (MenuAction::Cancel, _) => {}
        (MenuAction::Copy, payload) => presenter.copy_to_clipboard(&payload.copy_text()),
        (MenuAction::Open, SpanPayload::Link(url)) => presenter.open_url(url),
        (MenuAction::AddToReadingList, SpanPayload::Link(url)) => presenter.add_to_reading_list(url),
        (MenuAction::Call, SpanPayload::Phone(number)) => presenter.dial(number),
        (MenuAction::FaceTimeAudio, SpanPayload::Phone(number)) => {
            if let Some(url) = number.scheme_url("facetime-audio") {
                presenter.open_url(&url);
            }
        }
        (MenuAction::SendMessage, SpanPayload::Phone(number)) => {
            if let Some(url) = number.scheme_url("sms") {
                presenter.open_url(&url);
            }
        }
        (MenuAction::AddToContacts, SpanPayload::Phone(number)) => presenter.add_to_contacts(number),
        (action, payload) => {
            tracing::debug!("{:?} does not apply to {:?}", action, payload.kind());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bubble::{BubbleStyle, Side};
    use crate::text::TextAnnotator;
    use egui::{pos2, vec2};

    const PHONE: usize = 0;
    const LINK: usize = 1;

    #[derive(Debug, PartialEq)]
    enum Call {
        OpenUrl(String),
        Dial(String),
        Menu(MenuTarget),
        Copy(String),
        Contacts(String),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl InteractionPresenter for Recorder {
        fn open_url(&mut self, url: &Url) {
            self.calls.push(Call::OpenUrl(url.to_string()));
        }

        fn dial(&mut self, number: &PhoneNumber) {
            self.calls.push(Call::Dial(number.to_string()));
        }

        fn present_action_menu(&mut self, menu: ActionMenu, _anchor: Rect) {
            self.calls.push(Call::Menu(menu.target));
        }

        fn copy_to_clipboard(&mut self, text: &str) {
            self.calls.push(Call::Copy(text.to_string()));
        }

        fn add_to_contacts(&mut self, number: &PhoneNumber) {
            self.calls.push(Call::Contacts(number.to_string()));
        }
    }

    fn anchor() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0))
    }

    fn controller() -> LinkInteractionController {
        let style = BubbleStyle::standard().resolve(Side::Incoming);
        let text = TextAnnotator::new().annotate("Call 555-1234 or visit https://example.com", &style);
        assert_eq!(text.spans().len(), 2);
        LinkInteractionController::new(text, style.highlight_color, InteractionTiming::default())
    }

    fn highlighted(c: &LinkInteractionController, span: usize) -> bool {
        let start = c.text().spans()[span].range.start;
        c.text().background_at(start).is_some()
    }

    #[test]
    fn test_tap_link_opens_without_arming() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        assert!(c.tap(LINK, now, &mut presenter));
        assert_eq!(presenter.calls, vec![Call::OpenUrl("https://example.com/".into())]);
        assert_eq!(c.lock(), &InteractionLock::Idle);

        // The tap flash clears itself
        assert!(highlighted(&c, LINK));
        c.poll(now + Duration::from_millis(400), &mut presenter);
        assert!(!highlighted(&c, LINK));
        assert_eq!(presenter.calls.len(), 1);
    }

    #[test]
    fn test_tap_phone_dials() {
        let mut c = controller();
        let mut presenter = Recorder::default();

        assert!(c.tap(PHONE, Instant::now(), &mut presenter));
        assert_eq!(presenter.calls, vec![Call::Dial("555-1234".into())]);
        assert_eq!(c.lock(), &InteractionLock::Idle);
        assert!(!highlighted(&c, PHONE));
    }

    #[test]
    fn test_long_press_arms_and_presents_menu() {
        let mut c = controller();
        let mut presenter = Recorder::default();

        assert!(c.long_press(LINK, anchor(), Instant::now(), &mut presenter));
        let range = c.text().spans()[LINK].range.clone();
        assert_eq!(c.lock(), &InteractionLock::Armed { span: LINK, range });
        assert!(highlighted(&c, LINK));
        assert_eq!(presenter.calls, vec![Call::Menu(MenuTarget::Span(LINK))]);
    }

    #[test]
    fn test_second_long_press_is_dropped() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        assert!(c.long_press(PHONE, anchor(), now, &mut presenter));
        assert!(!c.long_press(LINK, anchor(), now, &mut presenter));
        assert_eq!(c.lock().armed_span(), Some(PHONE));
        assert!(!highlighted(&c, LINK));
        assert_eq!(presenter.calls.len(), 1);
    }

    #[test]
    fn test_tap_while_armed_is_dropped() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        c.long_press(PHONE, anchor(), now, &mut presenter);
        assert!(!c.tap(LINK, now, &mut presenter));
        assert!(!c.tap(PHONE, now, &mut presenter));
        assert_eq!(presenter.calls, vec![Call::Menu(MenuTarget::Span(PHONE))]);
    }

    #[test]
    fn test_timeout_then_open_clears_once() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        c.long_press(LINK, anchor(), now, &mut presenter);
        let after_press = c.text().revision();

        assert_eq!(c.poll(now + Duration::from_millis(400), &mut presenter), 1);
        assert!(!highlighted(&c, LINK));
        assert_eq!(c.text().revision(), after_press + 1);
        // The timeout does not release the lock
        assert_eq!(c.lock().armed_span(), Some(LINK));

        assert!(c.select_menu_action(MenuTarget::Span(LINK), MenuAction::Open, &mut presenter));
        assert_eq!(c.text().revision(), after_press + 1);
        assert_eq!(c.lock(), &InteractionLock::Idle);
        assert_eq!(
            presenter.calls,
            vec![
                Call::Menu(MenuTarget::Span(LINK)),
                Call::OpenUrl("https://example.com/".into())
            ]
        );
    }

    #[test]
    fn test_menu_action_before_timeout_clears_highlight() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        c.long_press(PHONE, anchor(), now, &mut presenter);
        assert!(c.select_menu_action(MenuTarget::Span(PHONE), MenuAction::Cancel, &mut presenter));
        assert!(!highlighted(&c, PHONE));
        assert_eq!(c.lock(), &InteractionLock::Idle);

        // Late timer is harmless
        let revision = c.text().revision();
        c.poll(now + Duration::from_secs(1), &mut presenter);
        assert_eq!(c.text().revision(), revision);
    }

    #[test]
    fn test_phone_menu_actions() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        for action in [
            MenuAction::Call,
            MenuAction::FaceTimeAudio,
            MenuAction::SendMessage,
            MenuAction::AddToContacts,
            MenuAction::Copy,
        ] {
            assert!(c.long_press(PHONE, anchor(), now, &mut presenter));
            assert!(c.select_menu_action(MenuTarget::Span(PHONE), action, &mut presenter));
        }

        let effects: Vec<&Call> = presenter
            .calls
            .iter()
            .filter(|call| !matches!(call, Call::Menu(_)))
            .collect();
        assert_eq!(
            effects,
            vec![
                &Call::Dial("555-1234".into()),
                &Call::OpenUrl("facetime-audio:5551234".into()),
                &Call::OpenUrl("sms:5551234".into()),
                &Call::Contacts("555-1234".into()),
                &Call::Copy("555-1234".into()),
            ]
        );
    }

    #[test]
    fn test_stale_menu_selection_is_ignored() {
        let mut c = controller();
        let mut presenter = Recorder::default();

        c.long_press(LINK, anchor(), Instant::now(), &mut presenter);
        assert!(c.cancel());
        assert!(!c.cancel());
        assert!(!highlighted(&c, LINK));

        assert!(!c.select_menu_action(MenuTarget::Span(LINK), MenuAction::Open, &mut presenter));
        assert_eq!(presenter.calls.len(), 1);
    }

    #[test]
    fn test_gesture_phases() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();
        let link_char = c.text().spans()[LINK].range.start;

        let gesture = Gesture::long_press(Some(link_char), anchor());
        assert!(!c.handle_gesture(&gesture.with_phase(GesturePhase::Changed), now, &mut presenter));
        assert!(!c.handle_gesture(&gesture.with_phase(GesturePhase::Ended), now, &mut presenter));
        assert_eq!(c.lock(), &InteractionLock::Idle);

        assert!(c.handle_gesture(&gesture, now, &mut presenter));
        assert_eq!(c.lock().armed_span(), Some(LINK));
    }

    #[test]
    fn test_tap_gesture_outside_spans() {
        let mut c = controller();
        let mut presenter = Recorder::default();

        assert!(!c.handle_gesture(&Gesture::tap(Some(0), anchor()), Instant::now(), &mut presenter));
        assert!(!c.handle_gesture(&Gesture::tap(None, anchor()), Instant::now(), &mut presenter));
        assert!(presenter.calls.is_empty());
    }

    #[test]
    fn test_message_long_press_shows_copy_menu_later() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        assert!(c.handle_gesture(&Gesture::long_press(Some(0), anchor()), now, &mut presenter));
        assert_eq!(c.lock(), &InteractionLock::Idle);
        assert!(presenter.calls.is_empty());
        assert_eq!(c.next_deadline(), Some(now + Duration::from_millis(100)));

        c.poll(now + Duration::from_millis(100), &mut presenter);
        assert_eq!(presenter.calls, vec![Call::Menu(MenuTarget::Message)]);

        assert!(c.select_menu_action(MenuTarget::Message, MenuAction::Copy, &mut presenter));
        assert_eq!(
            presenter.calls[1],
            Call::Copy("Call 555-1234 or visit https://example.com".into())
        );
    }

    #[test]
    fn test_message_menu_dropped_once_span_armed() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        assert!(c.long_press_message(anchor(), now));
        assert!(c.long_press(LINK, anchor(), now + Duration::from_millis(50), &mut presenter));
        assert_eq!(presenter.calls, vec![Call::Menu(MenuTarget::Span(LINK))]);

        c.poll(now + Duration::from_millis(100), &mut presenter);
        assert_eq!(presenter.calls.len(), 1);
        assert_eq!(c.lock().armed_span(), Some(LINK));
    }

    #[test]
    fn test_cancel_pending_drops_callbacks() {
        let mut c = controller();
        let mut presenter = Recorder::default();
        let now = Instant::now();

        c.long_press_message(anchor(), now);
        c.cancel_pending();
        assert_eq!(c.poll(now + Duration::from_secs(1), &mut presenter), 0);
        assert!(presenter.calls.is_empty());
    }

    #[test]
    fn test_timing_from_settings() {
        let settings = InteractionSettings {
            highlight_clear_ms: 250,
            menu_delay_ms: 50,
        };
        let timing = InteractionTiming::from(&settings);
        assert_eq!(timing.highlight_clear, Duration::from_millis(250));
        assert_eq!(timing.menu_delay, Duration::from_millis(50));
    }
}
