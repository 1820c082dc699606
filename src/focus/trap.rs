use std::fmt;

use super::query::document_order;
use super::{contains, focusable_within, FocusHost, Key, KeyEvent, KeyOutcome, NodeId};

struct Session {
    previously_focused: Option<NodeId>,
}

/// Confines Tab navigation to one container while active.
///
/// Activation remembers the focused element and focuses the first tabbable
/// descendant; deactivation gives focus back. Each trap owns its own
/// session, so several traps can live side by side.
pub struct FocusTrap {
    container: NodeId,
    on_escape: Option<Box<dyn FnMut()>>,
    session: Option<Session>,
}

impl FocusTrap {
    pub fn new(container: NodeId) -> Self {
        FocusTrap {
            container,
            on_escape: None,
            session: None,
        }
    }

    /// Called on Escape while active. The trap stays active; the callback
    /// decides whether to close.
    pub fn on_escape<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_escape = Some(Box::new(callback));
        self
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The element focus returns to on deactivation.
    pub fn previously_focused(&self) -> Option<NodeId> {
        self.session.as_ref().and_then(|s| s.previously_focused)
    }

    /// Drive the trap from an `is_active` flag.
    pub fn set_active<H>(&mut self, host: &mut H, active: bool)
    where
        H: FocusHost + ?Sized,
    {
        if active {
            self.activate(host);
        } else {
            self.deactivate(host);
        }
    }

    /// Start trapping. A no-op if already active.
    pub fn activate<H>(&mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        if self.session.is_some() {
            return;
        }
        let previously_focused = host.active_element();
        self.session = Some(Session { previously_focused });

        match focusable_within(&*host, self.container).first() {
            Some(&first) => {
                host.focus(first);
            }
            None => tracing::debug!(container = ?self.container, "focus trap has nothing to focus"),
        }
        tracing::debug!(container = ?self.container, previous = ?previously_focused, "focus trap activated");
    }

    /// Stop trapping and restore focus if the saved element is still attached.
    pub fn deactivate<H>(&mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        let Some(session) = self.session.take() else {
            return;
        };
        match session.previously_focused {
            Some(previous) if host.is_connected(previous) => {
                host.focus(previous);
                tracing::debug!(container = ?self.container, restored = ?previous, "focus trap deactivated");
            }
            Some(previous) => {
                tracing::debug!(container = ?self.container, missing = ?previous, "previous focus gone, not restoring");
            }
            None => tracing::debug!(container = ?self.container, "focus trap deactivated"),
        }
    }

    /// Deactivate and drop the trap.
    pub fn teardown<H>(mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        self.deactivate(host);
    }

    /// Feed a keydown to the trap. Inactive traps ignore every key.
    pub fn handle_key<H>(&mut self, host: &mut H, event: &KeyEvent) -> KeyOutcome
    where
        H: FocusHost + ?Sized,
    {
        if self.session.is_none() {
            return KeyOutcome::Default;
        }
        match event.key {
            Key::Tab => self.cycle(host, event.shift),
            Key::Escape => {
                if let Some(callback) = self.on_escape.as_mut() {
                    callback();
                }
                KeyOutcome::Default
            }
            Key::Other(_) => KeyOutcome::Default,
        }
    }

    fn cycle<H>(&self, host: &mut H, backwards: bool) -> KeyOutcome
    where
        H: FocusHost + ?Sized,
    {
        // The container may have changed since activation.
        let focusables = focusable_within(&*host, self.container);
        let (Some(&first), Some(&last)) = (focusables.first(), focusables.last()) else {
            return KeyOutcome::PreventDefault;
        };

        let active = match host.active_element() {
            Some(node) if contains(&*host, self.container, node) => node,
            _ => {
                host.focus(if backwards { last } else { first });
                return KeyOutcome::PreventDefault;
            }
        };

        if !focusables.contains(&active) {
            // Focus sits on the container or an untabbable node inside it;
            // the host's default step could leave the container.
            let target = step_from(&*host, self.container, active, &focusables, backwards)
                .unwrap_or(if backwards { last } else { first });
            host.focus(target);
            return KeyOutcome::PreventDefault;
        }

        if backwards && active == first {
            host.focus(last);
            KeyOutcome::PreventDefault
        } else if !backwards && active == last {
            host.focus(first);
            KeyOutcome::PreventDefault
        } else {
            KeyOutcome::Default
        }
    }
}

/// The nearest focusable after (or before) `from` in document order.
fn step_from<H>(
    host: &H,
    container: NodeId,
    from: NodeId,
    focusables: &[NodeId],
    backwards: bool,
) -> Option<NodeId>
where
    H: FocusHost + ?Sized,
{
    let order = document_order(host, container);
    let at = order.iter().position(|&node| node == from)?;
    if backwards {
        order[..at]
            .iter()
            .rev()
            .copied()
            .find(|node| focusables.contains(node))
    } else {
        order[at + 1..]
            .iter()
            .copied()
            .find(|node| focusables.contains(node))
    }
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("container", &self.container)
            .field("active", &self.is_active())
            .field("previously_focused", &self.previously_focused())
            .finish()
    }
}
