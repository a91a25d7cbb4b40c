//! DOM side of editable media: the displayed element, upload and regenerate
//! controls, and the embed link editor.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use preview_core::content::{ContentField, WebsiteDescription};
use preview_core::icons::IconId;
use preview_core::media::{MediaKind, MediaSlot, RegenerateOutcome};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use crate::constants::{EDIT_ONLY_CLASS, LOADING_CLASS};
use crate::dom;
use crate::editable::OnCommit;
use crate::imagegen::ImageClient;
use crate::overlay::NoticeBanner;

/// Shared by every media binding on a page.
#[derive(Clone)]
pub struct MediaContext {
    pub on_commit: OnCommit,
    pub notices: NoticeBanner,
    pub client: ImageClient,
}

struct MediaInner {
    slot: RefCell<MediaSlot>,
    root: web::HtmlElement,
    display: web::HtmlElement,
    controls: web::HtmlElement,
    ctx: MediaContext,
    listeners: RefCell<Vec<EventListener>>,
}

pub struct MediaBinding {
    inner: Rc<MediaInner>,
}

impl MediaBinding {
    pub fn mount(
        document: &web::Document,
        kind: MediaKind,
        field: ContentField,
        keyword: &str,
        alt: &str,
        ctx: MediaContext,
    ) -> anyhow::Result<Self> {
        let root = dom::el(document, "div", "media")?;
        let display = match kind {
            MediaKind::Image => {
                let img = dom::el(document, "img", "media-image")?;
                let _ = img.set_attribute("alt", alt);
                let _ = img.set_attribute("loading", "lazy");
                img
            }
            MediaKind::Video => {
                let video = dom::el(document, "video", "media-video")?;
                for attr in ["autoplay", "muted", "loop", "playsinline"] {
                    let _ = video.set_attribute(attr, "");
                }
                video
            }
            MediaKind::Embed => {
                let frame = dom::el(document, "iframe", "media-embed")?;
                let _ = frame.set_attribute("title", alt);
                let _ = frame.set_attribute(
                    "allow",
                    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture",
                );
                let _ = frame.set_attribute("allowfullscreen", "");
                frame
            }
        };
        let controls = dom::el(document, "div", &format!("media-controls {EDIT_ONLY_CLASS}"))?;
        let spinner = dom::el(document, "div", "media-spinner")?;
        spinner.set_inner_html(&IconId::Loader.svg("icon spin"));
        dom::append(&root, &display);
        dom::append(&root, &spinner);
        dom::append(&root, &controls);

        let inner = Rc::new(MediaInner {
            slot: RefCell::new(MediaSlot::new(kind, field, "", keyword)),
            root,
            display,
            controls,
            ctx,
            listeners: RefCell::new(Vec::new()),
        });
        inner.show_source();
        build_controls(document, &inner)?;
        Ok(Self { inner })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.inner.root
    }

    /// Upload, regenerate and link controls; shown only while editing.
    pub fn controls(&self) -> &web::HtmlElement {
        &self.inner.controls
    }

    pub fn sync(&self, site: &WebsiteDescription) {
        let field = self.inner.slot.borrow().field();
        let keyword = site.get(field).unwrap_or_default();
        let changed = self.inner.slot.borrow_mut().sync("", keyword);
        if changed {
            self.inner.show_source();
        }
    }
}

impl Drop for MediaBinding {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.inner.slot.try_borrow_mut() {
            slot.unmount();
        }
        self.inner.listeners.borrow_mut().clear();
    }
}

impl MediaInner {
    fn show_source(&self) {
        match self.slot.borrow().source() {
            Some(src) => {
                let _ = self.display.set_attribute("src", src);
            }
            None => {
                let _ = self.display.remove_attribute("src");
            }
        }
    }

    fn store(&self, value: String) {
        self.show_source();
        let field = self.slot.borrow().field();
        (self.ctx.on_commit)(field, value);
    }

    fn regenerate(self: &Rc<Self>) {
        let ticket = self.slot.borrow_mut().begin_regenerate();
        let Some(ticket) = ticket else {
            return;
        };
        dom::set_class(&self.root, LOADING_CLASS, true);
        let weak: Weak<Self> = Rc::downgrade(self);
        let client = self.ctx.client.clone();
        spawn_local(async move {
            let result = client.generate(&ticket.keyword).await;
            let Some(inner) = weak.upgrade() else {
                log::debug!("[media] node gone before generation finished");
                return;
            };
            let outcome = inner.slot.borrow_mut().finish_regenerate(ticket.token, result);
            dom::set_class(&inner.root, LOADING_CLASS, inner.slot.borrow().is_loading());
            match outcome {
                RegenerateOutcome::Applied(url) => inner.store(url),
                RegenerateOutcome::Failed(notice) => inner.ctx.notices.show(&notice.message),
                RegenerateOutcome::Ignored => {}
            }
        });
    }

    fn upload(&self, input: &web::HtmlInputElement) {
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        match web::Url::create_object_url_with_blob(&file) {
            Ok(url) => {
                let stored = self.slot.borrow_mut().upload(&url);
                self.store(stored);
            }
            Err(e) => log::warn!("[media] could not read file: {:?}", e),
        }
        input.set_value("");
    }

    fn set_embed(&self, text: &str) {
        let stored = self.slot.borrow_mut().set_embed_input(text);
        if let Some(url) = stored {
            self.store(url);
        }
    }
}

fn build_controls(document: &web::Document, inner: &Rc<MediaInner>) -> anyhow::Result<()> {
    let kind = inner.slot.borrow().kind();
    let weak = Rc::downgrade(inner);
    let mut listeners = Vec::new();

    match kind {
        MediaKind::Image | MediaKind::Video => {
            let file = dom::input(document, "file", "media-file")?;
            let accept = if kind == MediaKind::Image { "image/*" } else { "video/*" };
            let _ = file.set_attribute("accept", accept);
            let _ = file.set_attribute("hidden", "");
            let upload = dom::icon_button(document, "media-upload", &IconId::Upload.svg("icon"), "Upload")?;
            dom::append(&inner.controls, &file);
            dom::append(&inner.controls, &upload);

            let picker = file.clone();
            listeners.push(EventListener::new(&upload, "click", move |_| picker.click()));
            listeners.push(EventListener::new(&file, "change", {
                let weak = weak.clone();
                move |event| {
                    let input = event
                        .target()
                        .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok());
                    if let (Some(inner), Some(input)) = (weak.upgrade(), input) {
                        inner.upload(&input);
                    }
                }
            }));

            if kind == MediaKind::Image {
                let regen = dom::icon_button(document, "media-regenerate", &IconId::Wand.svg("icon"), "AI")?;
                let _ = regen.set_attribute("title", "Regenerate with AI");
                dom::append(&inner.controls, &regen);
                listeners.push(EventListener::new(&regen, "click", move |_| {
                    if let Some(inner) = weak.upgrade() {
                        inner.regenerate();
                    }
                }));
            }
        }
        MediaKind::Embed => {
            let link = dom::input(document, "text", "media-link")?;
            let _ = link.set_attribute("placeholder", "Paste a YouTube link or search phrase");
            link.set_value(inner.slot.borrow().keyword());
            let label = dom::el(document, "span", "media-link-icon")?;
            label.set_inner_html(&IconId::Youtube.svg("icon"));
            dom::append(&inner.controls, &label);
            dom::append(&inner.controls, &link);
            listeners.push(EventListener::new(&link, "change", move |event| {
                let input = event
                    .target()
                    .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok());
                if let (Some(inner), Some(input)) = (weak.upgrade(), input) {
                    inner.set_embed(&input.value());
                }
            }));
        }
    }
    *inner.listeners.borrow_mut() = listeners;
    Ok(())
}
