use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use preview_core::content::{ContentField, WebsiteDescription};
use preview_core::edit::EditableText;
use web_sys as web;

use crate::constants::EDITING_CLASS;
use crate::dom;

/// Receives a changed value for a field, from text and media bindings alike.
pub type OnCommit = Rc<dyn Fn(ContentField, String)>;

/// A text node bound to one content field. Commits on focus loss.
pub struct TextBinding {
    node: web::HtmlElement,
    state: Rc<RefCell<EditableText>>,
    _blur: EventListener,
}

impl TextBinding {
    pub fn bind(node: web::HtmlElement, field: ContentField, value: &str, on_commit: OnCommit) -> Self {
        node.set_text_content(Some(value));
        let _ = node.set_attribute("spellcheck", "false");
        let state = Rc::new(RefCell::new(EditableText::new(field, value)));
        let blur = EventListener::new(&node, "blur", {
            let node = node.clone();
            let state = state.clone();
            move |_| {
                let rendered = node.text_content().unwrap_or_default();
                let changed = state.borrow_mut().commit(&rendered);
                if let Some(value) = changed {
                    on_commit(field, value);
                }
            }
        });
        Self {
            node,
            state,
            _blur: blur,
        }
    }

    pub fn field(&self) -> ContentField {
        self.state.borrow().field()
    }

    pub fn set_editing(&self, editing: bool) {
        {
            let mut state = self.state.borrow_mut();
            if editing {
                state.begin_edit();
            } else {
                state.end_edit();
            }
        }
        self.node
            .set_content_editable(if editing { "true" } else { "false" });
        dom::set_class(&self.node, EDITING_CLASS, editing);
    }

    /// Redraw if the stored value moved away from what is displayed.
    pub fn sync(&self, site: &WebsiteDescription) {
        let field = self.field();
        let Some(value) = site.get(field) else {
            return;
        };
        if self.state.borrow_mut().sync(value) {
            self.node.set_text_content(Some(value));
        }
    }
}
