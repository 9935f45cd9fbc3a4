//! The single on-screen action menu and the controller that owns it

use super::menu::{ActionMenu, MenuTarget};
use egui::Rect;

/// Which message, and which controller inside it, a menu belongs to.
///
/// `controller` indexes the message's controllers in depth-first order. It is
/// `None` for messages without text and until the menu is claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuOwner {
    pub message: u64,
    pub controller: Option<usize>,
}

impl MenuOwner {
    pub fn new(message: u64, controller: Option<usize>) -> Self {
        Self { message, controller }
    }
}

#[derive(Debug, Clone)]
pub struct OpenMenu {
    pub owner: MenuOwner,
    pub menu: ActionMenu,
    pub anchor: Rect,
    /// Opened this frame, so the opening click must not dismiss it
    pub fresh: bool,
}

impl OpenMenu {
    /// Span menus leave their controller armed until released
    pub fn holds_lock(&self) -> bool {
        matches!(self.menu.target, MenuTarget::Span(_))
    }
}

/// Holds at most one open menu. A menu presented while another is open
/// displaces it; displaced menus are queued so their controllers can be
/// disarmed.
#[derive(Debug, Default)]
pub struct MenuSlot {
    open: Option<OpenMenu>,
    displaced: Vec<OpenMenu>,
}

impl MenuSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(&mut self, owner: MenuOwner, menu: ActionMenu, anchor: Rect) {
        let open = OpenMenu {
            owner,
            menu,
            anchor,
            fresh: true,
        };
        if let Some(previous) = self.open.replace(open) {
            tracing::debug!("Menu for {:?} displaced", previous.owner);
            self.displaced.push(previous);
        }
    }

    pub fn get(&self) -> Option<&OpenMenu> {
        self.open.as_ref()
    }

    pub fn take(&mut self) -> Option<OpenMenu> {
        self.open.take()
    }

    /// Put back a menu taken for display. Displaced if a newer one arrived.
    pub fn restore(&mut self, open: OpenMenu) {
        if self.open.is_some() {
            self.displaced.push(open);
        } else {
            self.open = Some(open);
        }
    }

    /// Record which controller armed the open menu of `message`, if nobody
    /// has claimed it yet
    pub fn claim(&mut self, message: u64, controller: usize) -> bool {
        match self.open.as_mut() {
            Some(open) if open.owner.message == message && open.owner.controller.is_none() => {
                open.owner.controller = Some(controller);
                true
            }
            _ => false,
        }
    }

    pub fn drain_displaced(&mut self) -> Vec<OpenMenu> {
        std::mem::take(&mut self.displaced)
    }
}
