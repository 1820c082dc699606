//! Focus - Keyboard focus confinement for modals and drawers.
//!
//! A `FocusTrap` keeps Tab and Shift+Tab cycling inside one container while
//! it is active and puts focus back where it was when it deactivates. The
//! trap talks to the page through the `FocusHost` trait; `InMemoryDocument`
//! is an arena-backed host for tests and headless use.
//!
//! ## Example
//!
//! ```ignore
//! use folio_state::{Element, FocusTrap, InMemoryDocument, KeyEvent, Tag};
//!
//! let mut doc = InMemoryDocument::new();
//! let dialog = doc.append(doc.body(), Element::new(Tag::Div));
//! let close = doc.append(dialog, Element::new(Tag::Button));
//!
//! let mut trap = FocusTrap::new(dialog).on_escape(|| println!("close requested"));
//! trap.activate(&mut doc);
//! assert_eq!(doc.active_element(), Some(close));
//! trap.handle_key(&mut doc, &KeyEvent::tab());
//! ```

mod document;
mod modal;
mod query;
mod trap;

/// Handle to a node in a `FocusHost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Element kinds the focus rules care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Body,
    Anchor,
    Button,
    Input,
    Select,
    TextArea,
    Div,
    Span,
    Other(String),
}

impl Tag {
    /// Form controls that take focus without a tab index.
    pub fn is_form_control(&self) -> bool {
        matches!(self, Tag::Button | Tag::Input | Tag::Select | Tag::TextArea)
    }
}

/// The focus-relevant attributes of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub href: Option<String>,
    pub tab_index: Option<i32>,
    pub disabled: bool,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Element {
            tag,
            href: None,
            tab_index: None,
            disabled: false,
        }
    }

    pub fn link(href: impl Into<String>) -> Self {
        Element::new(Tag::Anchor).with_href(href)
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

/// The page surface a focus trap needs.
pub trait FocusHost {
    fn element(&self, node: NodeId) -> Option<&Element>;

    /// Children in document order; empty for unknown nodes.
    fn children(&self, node: NodeId) -> &[NodeId];

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// True if the node is still attached to the document.
    fn is_connected(&self, node: NodeId) -> bool;

    /// The focused element, if any.
    fn active_element(&self) -> Option<NodeId>;

    /// Move focus to `node`. Returns false if it cannot take focus.
    fn focus(&mut self, node: NodeId) -> bool;

    /// Stop the page behind an overlay from scrolling.
    fn lock_scroll(&mut self) {}

    fn unlock_scroll(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    Other(String),
}

/// A keydown as seen by a trap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
}

impl KeyEvent {
    pub fn tab() -> Self {
        KeyEvent {
            key: Key::Tab,
            shift: false,
        }
    }

    pub fn shift_tab() -> Self {
        KeyEvent {
            key: Key::Tab,
            shift: true,
        }
    }

    pub fn escape() -> Self {
        KeyEvent {
            key: Key::Escape,
            shift: false,
        }
    }

    pub fn other(key: impl Into<String>) -> Self {
        KeyEvent {
            key: Key::Other(key.into()),
            shift: false,
        }
    }
}

/// Whether the host should run its default action for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Default,
    PreventDefault,
}

pub use document::InMemoryDocument;
pub use modal::Modal;
pub use query::{contains, focusable_within, is_tabbable};
pub use trap::FocusTrap;
