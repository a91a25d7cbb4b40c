//! Deploy modal: replays the scripted build log against wall-clock time.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use instant::Instant;
use preview_core::deploy::{site_url, DeployRun, LogLevel};
use preview_core::icons::IconId;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::constants::DEPLOY_TICK_MS;
use crate::dom;
use crate::ui::{Action, Dispatch};

struct Progress {
    run: RefCell<DeployRun>,
    started: Instant,
    rendered: Cell<usize>,
    log: web::HtmlElement,
    bar: web::HtmlElement,
    stage: web::HtmlElement,
    close: web::HtmlElement,
    success: web::HtmlElement,
}

impl Progress {
    /// Returns false once the run has completed and polling can stop.
    fn tick(&self) -> bool {
        let elapsed = self.started.elapsed().as_millis().min(u32::MAX as u128) as u32;
        let mut run = self.run.borrow_mut();
        if run.advance_to(elapsed) > 0 || self.rendered.get() == 0 {
            self.render(&run);
        }
        !run.is_complete()
    }

    fn render(&self, run: &DeployRun) {
        let Some(document) = dom::window_document() else {
            return;
        };
        for line in &run.logs()[self.rendered.get()..] {
            let class = match line.level {
                LogLevel::Info => "log-line",
                LogLevel::Success => "log-line log-success",
                LogLevel::Warn => "log-line log-warn",
            };
            if let Ok(node) = dom::text_el(&document, "div", class, &format!("> {}", line.message)) {
                dom::append(&self.log, &node);
            }
        }
        self.rendered.set(run.logs().len());
        self.log.set_scroll_top(self.log.scroll_height());

        dom::set_style(&self.bar, "width", &format!("{}%", run.progress_percent()));
        self.stage.set_text_content(Some(run.stage().as_str()));
        if run.is_complete() {
            dom::set_hidden(&self.success, false);
            dom::set_hidden(&self.close, false);
            log::info!("[deploy] finished after {} log lines", run.logs().len());
        }
    }
}

pub struct DeployModal {
    root: web::HtmlElement,
    progress: Rc<Progress>,
    ticker: Rc<RefCell<Option<Interval>>>,
    _listeners: Vec<EventListener>,
}

impl DeployModal {
    pub fn open(
        document: &web::Document,
        parent: &web::Element,
        company: &str,
        dispatch: &Dispatch,
    ) -> anyhow::Result<Self> {
        let root = dom::el(document, "div", "deploy-backdrop")?;
        let _ = root.set_attribute(
            "style",
            "position:fixed;inset:0;display:flex;align-items:center;justify-content:center",
        );
        let card = dom::el(document, "div", "deploy-modal")?;
        let _ = card.set_attribute("role", "dialog");
        dom::append(&root, &card);

        let head = dom::el(document, "div", "deploy-head")?;
        let title = dom::el(document, "h3", "deploy-title")?;
        title.set_inner_html(&IconId::Terminal.svg("icon"));
        dom::append(&title, &dom::text_el(document, "span", "", "Deploying")?);
        let stage = dom::el(document, "span", "deploy-stage")?;
        let close = dom::icon_button(document, "deploy-close", &IconId::X.svg("icon"), "")?;
        dom::set_hidden(&close, true);
        dom::append(&head, &title);
        dom::append(&head, &stage);
        dom::append(&head, &close);
        dom::append(&card, &head);

        let track = dom::el(document, "div", "deploy-progress")?;
        let bar = dom::el(document, "div", "deploy-progress-bar")?;
        dom::set_style(&bar, "width", "0%");
        dom::append(&track, &bar);
        dom::append(&card, &track);

        let log = dom::el(document, "div", "deploy-log")?;
        let _ = log.set_attribute("style", "overflow-y:auto");
        dom::append(&card, &log);

        let url = site_url(company);
        let success = dom::el(document, "div", "deploy-success")?;
        dom::set_hidden(&success, true);
        let badge = dom::el(document, "div", "deploy-success-badge")?;
        badge.set_inner_html(&IconId::CheckCircle.svg("icon"));
        dom::append(&badge, &dom::text_el(document, "span", "", "Your site is live")?);
        let address = dom::el(document, "div", "deploy-address")?;
        let link = dom::text_el(document, "code", "deploy-url", &url)?;
        let copy = dom::icon_button(document, "deploy-copy", &IconId::Copy.svg("icon"), "")?;
        let _ = copy.set_attribute("title", "Copy URL");
        dom::append(&address, &link);
        dom::append(&address, &copy);
        let visit = dom::icon_button(
            document,
            "deploy-visit",
            &IconId::ExternalLink.svg("icon"),
            "Visit Live Site",
        )?;
        dom::append(&success, &badge);
        dom::append(&success, &address);
        dom::append(&success, &visit);
        dom::append(&card, &success);

        dom::append(parent, &root);

        let mut listeners = Vec::with_capacity(3);
        let d = dispatch.clone();
        listeners.push(EventListener::new(&close, "click", move |_| d(Action::CloseDeploy)));
        let d = dispatch.clone();
        listeners.push(EventListener::new(&visit, "click", move |_| d(Action::EnterLive)));
        let copied = url.clone();
        let button = copy.clone();
        listeners.push(EventListener::new(&copy, "click", move |_| {
            copy_to_clipboard(copied.clone(), button.clone())
        }));

        let progress = Rc::new(Progress {
            run: RefCell::new(DeployRun::start()),
            started: Instant::now(),
            rendered: Cell::new(0),
            log,
            bar,
            stage,
            close,
            success,
        });
        progress.tick();

        let ticker: Rc<RefCell<Option<Interval>>> = Rc::new(RefCell::new(None));
        let interval = Interval::new(DEPLOY_TICK_MS, {
            let progress = Rc::downgrade(&progress);
            let ticker = Rc::downgrade(&ticker);
            move || {
                let running = progress.upgrade().map(|p| p.tick()).unwrap_or(false);
                if !running {
                    if let Some(slot) = ticker.upgrade() {
                        if let Ok(mut slot) = slot.try_borrow_mut() {
                            slot.take();
                        }
                    }
                }
            }
        });
        *ticker.borrow_mut() = Some(interval);
        log::info!("[deploy] started for {url}");

        Ok(Self {
            root,
            progress,
            ticker,
            _listeners: listeners,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.progress.run.borrow().is_complete()
    }
}

fn copy_to_clipboard(text: String, button: web::HtmlElement) {
    let Some(window) = web::window() else {
        return;
    };
    let pending = window.navigator().clipboard().write_text(&text);
    spawn_local(async move {
        match JsFuture::from(pending).await {
            Ok(_) => {
                dom::set_class(&button, "is-copied", true);
                log::debug!("[deploy] copied {text}");
            }
            Err(e) => log::warn!("[deploy] clipboard write failed: {:?}", e),
        }
    });
}

impl Drop for DeployModal {
    fn drop(&mut self) {
        if let Ok(mut ticker) = self.ticker.try_borrow_mut() {
            ticker.take();
        }
        self.root.remove();
    }
}
