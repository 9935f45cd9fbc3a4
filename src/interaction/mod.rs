//! Link and phone number interaction state machine

pub mod controller;
pub mod menu;
pub mod slot;
pub mod timer;

pub use controller::{
    Gesture, GestureKind, GesturePhase, InteractionLock, InteractionPresenter, InteractionTiming,
    LinkInteractionController,
};
pub use menu::{ActionMenu, MenuAction, MenuItem, MenuTarget};
pub use slot::{MenuOwner, MenuSlot, OpenMenu};
pub use timer::{DeferredQueue, TimerId};
