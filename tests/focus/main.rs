//! Integration tests for focus traps and modals (FocusTrap + Modal over InMemoryDocument).

mod page;

use std::cell::Cell;
use std::rc::Rc;

use folio_state::{
    focusable_within, Element, FocusHost, FocusTrap, InMemoryDocument, KeyEvent, KeyOutcome,
    Modal, Tag,
};
use page::ContactPage;

#[test]
fn tab_on_last_wraps_to_first() {
    let mut page = ContactPage::new();
    let mut trap = FocusTrap::new(page.dialog);
    trap.activate(&mut page.doc);
    page.doc.focus(page.send);

    let outcome = trap.handle_key(&mut page.doc, &KeyEvent::tab());
    assert_eq!(outcome, KeyOutcome::PreventDefault);
    assert_eq!(page.doc.active_element(), Some(page.name));
}

#[test]
fn shift_tab_on_first_wraps_to_last() {
    let mut page = ContactPage::new();
    let mut trap = FocusTrap::new(page.dialog);
    trap.activate(&mut page.doc);
    assert_eq!(page.doc.active_element(), Some(page.name));

    let outcome = trap.handle_key(&mut page.doc, &KeyEvent::shift_tab());
    assert_eq!(outcome, KeyOutcome::PreventDefault);
    assert_eq!(page.doc.active_element(), Some(page.send));
}

#[test]
fn deactivation_restores_previous_focus() {
    let mut page = ContactPage::new();
    let mut trap = FocusTrap::new(page.dialog);

    trap.set_active(&mut page.doc, true);
    page.doc.focus(page.message);
    trap.set_active(&mut page.doc, false);

    assert_eq!(page.doc.active_element(), Some(page.open_button));
}

#[test]
fn empty_container_is_harmless() {
    let mut doc = InMemoryDocument::new();
    let body = doc.body();
    let outside = doc.append(body, Element::new(Tag::Button));
    let empty = doc.append(body, Element::new(Tag::Div));
    doc.append(empty, Element::new(Tag::Span));
    doc.focus(outside);

    let mut trap = FocusTrap::new(empty);
    trap.activate(&mut doc);
    assert_eq!(doc.active_element(), Some(outside));

    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::shift_tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(doc.active_element(), Some(outside));

    trap.deactivate(&mut doc);
    trap.deactivate(&mut doc);
    assert_eq!(doc.active_element(), Some(outside));
}

#[test]
fn nothing_focused_before_activation() {
    let mut page = ContactPage::new();
    page.doc.blur();

    let mut trap = FocusTrap::new(page.dialog);
    trap.activate(&mut page.doc);
    assert_eq!(trap.previously_focused(), None);

    trap.deactivate(&mut page.doc);
    assert_eq!(page.doc.active_element(), Some(page.name));
}

#[test]
fn full_tab_cycle_never_leaves_dialog() {
    let mut page = ContactPage::new();
    let mut trap = FocusTrap::new(page.dialog);
    trap.activate(&mut page.doc);
    let order = focusable_within(&page.doc, page.dialog);
    assert_eq!(order, vec![page.name, page.message, page.send]);

    // Simulate the browser's default Tab by stepping through the order.
    for _ in 0..7 {
        let current = page.doc.active_element().unwrap();
        if trap.handle_key(&mut page.doc, &KeyEvent::tab()) == KeyOutcome::Default {
            let pos = order.iter().position(|n| *n == current).unwrap();
            page.doc.focus(order[pos + 1]);
        }
        let now = page.doc.active_element().unwrap();
        assert!(order.contains(&now));
        assert_ne!(now, page.nav_link);
    }
}

#[test]
fn disabled_last_control_changes_wrap_point() {
    let mut page = ContactPage::new();
    let mut trap = FocusTrap::new(page.dialog);
    trap.activate(&mut page.doc);

    page.doc.set_disabled(page.send, true);
    page.doc.focus(page.message);
    assert_eq!(
        trap.handle_key(&mut page.doc, &KeyEvent::tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(page.doc.active_element(), Some(page.name));
}

#[test]
fn escape_reaches_callback_but_trap_decides_nothing() {
    let mut page = ContactPage::new();
    let escapes = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&escapes);
    let mut trap = FocusTrap::new(page.dialog).on_escape(move || seen.set(seen.get() + 1));
    trap.activate(&mut page.doc);

    trap.handle_key(&mut page.doc, &KeyEvent::escape());
    trap.handle_key(&mut page.doc, &KeyEvent::other("Enter"));

    assert_eq!(escapes.get(), 1);
    assert!(trap.is_active());
}

#[test]
fn modal_escape_runs_callback_then_closes() {
    let mut page = ContactPage::new();
    let escapes = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&escapes);
    let trap = FocusTrap::new(page.dialog).on_escape(move || seen.set(seen.get() + 1));
    let mut modal = Modal::with_trap(trap);

    modal.open(&mut page.doc);
    assert!(page.doc.is_scroll_locked());
    assert_eq!(page.doc.active_element(), Some(page.name));

    modal.handle_key(&mut page.doc, &KeyEvent::escape());
    assert_eq!(escapes.get(), 1);
    assert!(!modal.is_open());
    assert!(!page.doc.is_scroll_locked());
    assert_eq!(page.doc.active_element(), Some(page.open_button));
}

#[test]
fn removed_opener_is_not_restored() {
    let mut page = ContactPage::new();
    let mut modal = Modal::new(page.dialog);
    modal.open(&mut page.doc);

    page.doc.remove(page.open_button);
    modal.close(&mut page.doc);

    assert_eq!(page.doc.active_element(), Some(page.name));
    assert!(!page.doc.is_connected(page.open_button));
}

#[test]
fn focused_dialog_and_trailing_note_keep_tab_inside() {
    let mut doc = InMemoryDocument::new();
    let body = doc.body();
    let outside = doc.append(body, Element::link("/work"));
    let dialog = doc.append(body, Element::new(Tag::Div).with_tab_index(-1));
    let confirm = doc.append(dialog, Element::new(Tag::Button));
    let cancel = doc.append(dialog, Element::new(Tag::Button));
    let note = doc.append(dialog, Element::new(Tag::Div).with_tab_index(-1));
    doc.focus(outside);

    let mut trap = FocusTrap::new(dialog);
    trap.activate(&mut doc);

    assert!(doc.focus(dialog));
    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::shift_tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(doc.active_element(), Some(cancel));

    assert!(doc.focus(dialog));
    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(doc.active_element(), Some(confirm));

    assert!(doc.focus(note));
    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(doc.active_element(), Some(confirm));

    assert!(doc.focus(note));
    assert_eq!(
        trap.handle_key(&mut doc, &KeyEvent::shift_tab()),
        KeyOutcome::PreventDefault
    );
    assert_eq!(doc.active_element(), Some(cancel));
}

#[test]
fn tearing_down_an_open_modal_unlocks_the_page() {
    let mut page = ContactPage::new();
    let mut modal = Modal::new(page.dialog);
    modal.open(&mut page.doc);
    assert!(page.doc.is_scroll_locked());

    modal.teardown(&mut page.doc);
    assert!(!page.doc.is_scroll_locked());
    assert_eq!(page.doc.active_element(), Some(page.open_button));
}
