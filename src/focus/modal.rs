use super::{FocusHost, FocusTrap, Key, KeyEvent, KeyOutcome, NodeId};

/// An overlay with a focus trap, a page scroll lock, and Escape-to-close.
///
/// Each open modal holds one scroll lock, so nested modals keep the page
/// locked until the last one closes.
#[derive(Debug)]
pub struct Modal {
    trap: FocusTrap,
    open: bool,
    close_on_escape: bool,
}

impl Modal {
    pub fn new(container: NodeId) -> Self {
        Self::with_trap(FocusTrap::new(container))
    }

    /// Wrap a pre-configured trap (for example one with an `on_escape` callback).
    pub fn with_trap(trap: FocusTrap) -> Self {
        Modal {
            trap,
            open: false,
            close_on_escape: true,
        }
    }

    pub fn close_on_escape(mut self, close: bool) -> Self {
        self.close_on_escape = close;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn trap(&self) -> &FocusTrap {
        &self.trap
    }

    /// Lock scrolling and activate the trap. A no-op if already open.
    pub fn open<H>(&mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        if self.open {
            return;
        }
        self.open = true;
        host.lock_scroll();
        self.trap.activate(host);
    }

    /// Deactivate the trap and release the scroll lock. A no-op if closed.
    pub fn close<H>(&mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        if !self.open {
            return;
        }
        self.open = false;
        self.trap.deactivate(host);
        host.unlock_scroll();
    }

    /// Close if open and drop the modal. Use this when the owning view goes
    /// away while the modal may still be open.
    pub fn teardown<H>(mut self, host: &mut H)
    where
        H: FocusHost + ?Sized,
    {
        self.close(host);
    }

    /// Feed a keydown; Escape closes the modal unless disabled.
    pub fn handle_key<H>(&mut self, host: &mut H, event: &KeyEvent) -> KeyOutcome
    where
        H: FocusHost + ?Sized,
    {
        if !self.open {
            return KeyOutcome::Default;
        }
        let outcome = self.trap.handle_key(host, event);
        if event.key == Key::Escape && self.close_on_escape {
            self.close(host);
            return KeyOutcome::PreventDefault;
        }
        outcome
    }
}
