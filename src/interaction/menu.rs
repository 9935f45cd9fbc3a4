//! Contextual action menus for links, phone numbers and whole messages

use crate::text::PhoneNumber;

/// What a menu was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTarget {
    /// A span of the annotated text, by index
    Span(usize),
    /// The message as a whole
    Message,
}

impl MenuTarget {
    pub fn span(self) -> Option<usize> {
        match self {
            Self::Span(span) => Some(span),
            Self::Message => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    Open,
    AddToReadingList,
    Copy,
    Call,
    FaceTimeAudio,
    SendMessage,
    AddToContacts,
    Cancel,
}

impl MenuAction {
    pub fn is_cancel(self) -> bool {
        self == Self::Cancel
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub label: String,
}

impl MenuItem {
    fn new(action: MenuAction, label: impl Into<String>) -> Self {
        Self {
            action,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMenu {
    pub target: MenuTarget,
    pub items: Vec<MenuItem>,
}

impl ActionMenu {
    /// Open / Add to Reading List / Copy / Cancel
    pub fn for_link(span: usize) -> Self {
        Self {
            target: MenuTarget::Span(span),
            items: vec![
                MenuItem::new(MenuAction::Open, "Open"),
                MenuItem::new(MenuAction::AddToReadingList, "Add to Reading List"),
                MenuItem::new(MenuAction::Copy, "Copy"),
                MenuItem::new(MenuAction::Cancel, "Cancel"),
            ],
        }
    }

    /// Call / FaceTime Audio / Send Message / Add to Contacts / Copy / Cancel
    pub fn for_phone(span: usize, number: &PhoneNumber) -> Self {
        Self {
            target: MenuTarget::Span(span),
            items: vec![
                MenuItem::new(MenuAction::Call, format!("Call {}", number)),
                MenuItem::new(MenuAction::FaceTimeAudio, "FaceTime Audio"),
                MenuItem::new(MenuAction::SendMessage, "Send Message"),
                MenuItem::new(MenuAction::AddToContacts, "Add to Contacts"),
                MenuItem::new(MenuAction::Copy, "Copy"),
                MenuItem::new(MenuAction::Cancel, "Cancel"),
            ],
        }
    }

    /// Copy of the whole message
    pub fn for_message() -> Self {
        Self {
            target: MenuTarget::Message,
            items: vec![MenuItem::new(MenuAction::Copy, "Copy")],
        }
    }

    pub fn actions(&self) -> impl Iterator<Item = MenuAction> + '_ {
        self.items.iter().map(|item| item.action)
    }

    pub fn contains(&self, action: MenuAction) -> bool {
        self.actions().any(|a| a == action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_menu() {
        let menu = ActionMenu::for_link(2);
        assert_eq!(menu.target, MenuTarget::Span(2));
        let actions: Vec<MenuAction> = menu.actions().collect();
        assert_eq!(
            actions,
            vec![MenuAction::Open, MenuAction::AddToReadingList, MenuAction::Copy, MenuAction::Cancel]
        );
    }

    #[test]
    fn test_phone_menu_names_number() {
        let number = PhoneNumber::parse("555-1234").unwrap();
        let menu = ActionMenu::for_phone(0, &number);
        assert_eq!(menu.items[0].label, "Call 555-1234");
        assert_eq!(menu.items.len(), 6);
        assert!(menu.contains(MenuAction::FaceTimeAudio));
        assert!(!menu.contains(MenuAction::Open));
        assert!(menu.items.last().unwrap().action.is_cancel());
    }
}
