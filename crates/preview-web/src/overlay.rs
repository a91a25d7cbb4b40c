use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use preview_core::icons::IconId;
use web_sys as web;

use crate::constants::NOTICE_TIMEOUT_MS;
use crate::dom;

/// Dismissable banner for user-visible failures. Auto-hides after a while.
#[derive(Clone)]
pub struct NoticeBanner {
    root: web::HtmlElement,
    message: web::HtmlElement,
    timer: Rc<RefCell<Option<Timeout>>>,
    _close: Rc<EventListener>,
}

impl NoticeBanner {
    pub fn new(document: &web::Document) -> anyhow::Result<Self> {
        let root = dom::el(document, "div", "notice-banner")?;
        let _ = root.set_attribute("role", "alert");
        dom::set_hidden(&root, true);
        let message = dom::el(document, "span", "notice-message")?;
        let close = dom::icon_button(document, "notice-close", &IconId::X.svg("icon"), "")?;
        let _ = close.set_attribute("aria-label", "Dismiss");
        dom::append(&root, &message);
        dom::append(&root, &close);

        let for_close = root.clone();
        let close = EventListener::new(&close, "click", move |_| hide(&for_close));
        Ok(Self {
            root,
            message,
            timer: Rc::new(RefCell::new(None)),
            _close: Rc::new(close),
        })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.root
    }

    pub fn show(&self, message: &str) {
        self.message.set_text_content(Some(message));
        dom::set_hidden(&self.root, false);
        let root = self.root.clone();
        *self.timer.borrow_mut() = Some(Timeout::new(NOTICE_TIMEOUT_MS, move || hide(&root)));
    }
}

#[inline]
fn hide(root: &web::HtmlElement) {
    dom::set_hidden(root, true);
}
