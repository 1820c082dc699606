use folio_state::{Element, FocusHost, InMemoryDocument, NodeId, Tag};

/// A contact page: a nav link, an "open dialog" button, and a dialog with
/// three tabbable controls.
pub struct ContactPage {
    pub doc: InMemoryDocument,
    pub nav_link: NodeId,
    pub open_button: NodeId,
    pub dialog: NodeId,
    pub name: NodeId,
    pub message: NodeId,
    pub send: NodeId,
}

impl ContactPage {
    pub fn new() -> Self {
        let mut doc = InMemoryDocument::new();
        let body = doc.body();
        let nav_link = doc.append(body, Element::link("/about"));
        let open_button = doc.append(body, Element::new(Tag::Button));
        let dialog = doc.append(body, Element::new(Tag::Div));
        doc.append(dialog, Element::new(Tag::Other("h2".into())));
        let form = doc.append(dialog, Element::new(Tag::Div));
        let name = doc.append(form, Element::new(Tag::Input));
        let message = doc.append(form, Element::new(Tag::TextArea));
        let send = doc.append(form, Element::new(Tag::Button));
        doc.focus(open_button);

        ContactPage {
            doc,
            nav_link,
            open_button,
            dialog,
            name,
            message,
            send,
        }
    }
}
