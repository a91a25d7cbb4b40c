//! Top-level controller: owns the shell state and every mounted view, and
//! applies chrome actions in one place.

use std::cell::{Cell, OnceCell, RefCell};
use std::rc::{Rc, Weak};

use gloo::timers::callback::Timeout;
use preview_core::content::ContentField;
use preview_core::media::UploadLedger;
use preview_core::scene::{SceneEngine, SceneParams, SceneSlot};
use preview_core::scroll::ScrollCell;
use preview_core::shell::{LayoutKey, ShellState};
use preview_core::{PreviewConfig, WebsiteDescription};
use web_sys as web;

use crate::backend::WebSceneBackend;
use crate::deploy::DeployModal;
use crate::dom;
use crate::editable::OnCommit;
use crate::imagegen::ImageClient;
use crate::media::MediaContext;
use crate::overlay::NoticeBanner;
use crate::page::{PageHooks, PageView};
use crate::scroll::ScrollCoordinator;
use crate::ui::{Action, Dispatch, LiveExit, ThemePanel, Toolbar};

struct Chrome {
    toolbar: Toolbar,
    theme: ThemePanel,
    live_exit: LiveExit,
}

pub struct App {
    document: web::Document,
    root: web::HtmlElement,
    stage: web::HtmlElement,
    seed: Option<u64>,
    client: ImageClient,
    notices: NoticeBanner,
    shell: RefCell<ShellState>,
    uploads: RefCell<UploadLedger>,
    scroll_cell: ScrollCell,
    chrome: OnceCell<Chrome>,
    // Teardown order on relayout: scene, then scroll, then page.
    scene: RefCell<SceneSlot<WebSceneBackend>>,
    scroll: RefCell<Option<ScrollCoordinator>>,
    page: RefCell<Option<PageView>>,
    layout: Cell<Option<LayoutKey>>,
    deploy: RefCell<Option<DeployModal>>,
    save_timer: RefCell<Option<Timeout>>,
    this: Weak<App>,
}

impl App {
    /// Build the chrome and the first page inside `root`.
    pub fn mount(
        document: web::Document,
        root: web::HtmlElement,
        site: WebsiteDescription,
        config: &PreviewConfig,
    ) -> anyhow::Result<Rc<Self>> {
        let _ = root.set_attribute(
            "style",
            "display:flex;flex-direction:column;height:100vh;overflow:hidden",
        );
        let stage = dom::el(&document, "main", "preview-stage")?;
        let _ = stage.set_attribute(
            "style",
            "flex:1;min-height:0;display:flex;justify-content:center;align-items:center;overflow:hidden",
        );
        let notices = NoticeBanner::new(&document)?;

        let app = Rc::new_cyclic(|this| App {
            document,
            root,
            stage,
            seed: config.seed,
            client: ImageClient::from_config(config),
            notices,
            shell: RefCell::new(ShellState::new(site)),
            uploads: RefCell::new(UploadLedger::new()),
            scroll_cell: ScrollCell::new(),
            chrome: OnceCell::new(),
            scene: RefCell::new(SceneSlot::new()),
            scroll: RefCell::new(None),
            page: RefCell::new(None),
            layout: Cell::new(None),
            deploy: RefCell::new(None),
            save_timer: RefCell::new(None),
            this: this.clone(),
        });

        let dispatch = app.dispatcher();
        let chrome = Chrome {
            toolbar: Toolbar::build(&app.document, &dispatch)?,
            theme: ThemePanel::build(&app.document, &dispatch)?,
            live_exit: LiveExit::build(&app.document, &dispatch)?,
        };
        dom::append(&app.root, chrome.toolbar.element());
        dom::append(&app.root, &app.stage);
        dom::append(&app.root, chrome.theme.element());
        dom::append(&app.root, chrome.live_exit.element());
        dom::append(&app.root, app.notices.element());
        let _ = app.chrome.set(chrome);

        app.compose()?;
        app.refresh_chrome();
        log::info!("[shell] mounted");
        Ok(app)
    }

    fn dispatcher(&self) -> Dispatch {
        let this = self.this.clone();
        Rc::new(move |action| {
            if let Some(app) = this.upgrade() {
                app.handle(action);
            }
        })
    }

    fn committer(&self) -> OnCommit {
        let this = self.this.clone();
        Rc::new(move |field, value| {
            if let Some(app) = this.upgrade() {
                app.commit(field, value);
            }
        })
    }

    fn handle(&self, action: Action) {
        log::debug!("[shell] {:?}", action);
        match action {
            Action::Back => {
                if let Some(history) = web::window().and_then(|w| w.history().ok()) {
                    let _ = history.back();
                }
            }
            Action::Device(device) => {
                let changed = self.with_shell(|shell| shell.set_device(device)).unwrap_or(false);
                if changed {
                    self.relayout();
                }
            }
            Action::ToggleEdit => {
                let editing = self.with_shell(|shell| {
                    shell.toggle_editing();
                    shell.is_editing()
                });
                if let (Some(editing), Ok(page)) = (editing, self.page.try_borrow()) {
                    if let Some(page) = page.as_ref() {
                        page.set_editing(editing);
                    }
                }
            }
            Action::ToggleTheme => {
                self.with_shell(|shell| shell.toggle_theme_panel());
            }
            Action::Save => self.save(),
            Action::OpenDeploy => self.open_deploy(),
            Action::CloseDeploy => {
                let done = self
                    .deploy
                    .borrow()
                    .as_ref()
                    .map(|modal| modal.is_complete())
                    .unwrap_or(true);
                if done {
                    self.with_shell(|shell| shell.close_deploy());
                    let modal = self.deploy.borrow_mut().take();
                    drop(modal);
                }
            }
            Action::EnterLive => {
                self.with_shell(|shell| shell.enter_live());
                let modal = self.deploy.borrow_mut().take();
                drop(modal);
                self.relayout();
            }
            Action::ExitLive => {
                self.with_shell(|shell| shell.exit_live());
                self.relayout();
            }
            Action::Style(style) => {
                let changed = self.with_shell(|shell| shell.set_style(style)).unwrap_or(false);
                if changed {
                    if let Some(page) = self.page.borrow().as_ref() {
                        page.set_active_style(style);
                    }
                    self.ensure_scene();
                }
            }
            Action::Color(role, value) => {
                let result = self.with_shell(|shell| {
                    shell
                        .set_color(role, &value)
                        .map(|changed| changed.then(|| shell.css_variables()))
                });
                match result {
                    Some(Ok(Some(vars))) => {
                        if let Some(page) = self.page.borrow().as_ref() {
                            page.set_css_variables(&vars);
                        }
                        self.ensure_scene();
                    }
                    Some(Err(e)) => log::warn!("[shell] color rejected: {e}"),
                    _ => {}
                }
            }
            Action::Logo(url) => {
                let Some(previous) = self.with_shell(|shell| shell.set_logo(url.clone())) else {
                    dom::revoke_object_url(&url);
                    return;
                };
                if let Some(page) = self.page.borrow().as_ref() {
                    page.set_logo(Some(&url));
                }
                if let Some(previous) = previous {
                    dom::revoke_object_url(&previous);
                }
            }
            Action::ClearLogo => {
                let removed = self.with_shell(|shell| shell.clear_logo()).flatten();
                if let Some(url) = removed {
                    if let Some(page) = self.page.borrow().as_ref() {
                        page.set_logo(None);
                    }
                    dom::revoke_object_url(&url);
                }
            }
        }
        self.refresh_chrome();
    }

    /// Run `f` against the shell unless it is already borrowed further up the stack.
    fn with_shell<T>(&self, f: impl FnOnce(&mut ShellState) -> T) -> Option<T> {
        match self.shell.try_borrow_mut() {
            Ok(mut shell) => Some(f(&mut shell)),
            Err(_) => {
                log::warn!("[shell] shell busy; dropping re-entrant update");
                None
            }
        }
    }

    fn commit(&self, field: ContentField, value: String) {
        match self.with_shell(|shell| shell.update(field, value.clone())) {
            Some(Ok(true)) => {
                if let Some(url) = self.uploads.borrow_mut().stored(field, &value) {
                    dom::revoke_object_url(&url);
                }
            }
            Some(Ok(false)) | None => return,
            Some(Err(e)) => {
                log::warn!("[shell] {e}");
                return;
            }
        }
        if let (Ok(shell), Ok(page)) = (self.shell.try_borrow(), self.page.try_borrow()) {
            if let Some(page) = page.as_ref() {
                page.sync(shell.site());
            }
        }
        self.refresh_chrome();
    }

    fn refresh_chrome(&self) {
        let (Some(chrome), Ok(shell)) = (self.chrome.get(), self.shell.try_borrow()) else {
            return;
        };
        chrome.toolbar.refresh(&shell);
        chrome.theme.refresh(&shell);
        chrome.live_exit.refresh(&shell);
    }

    fn save(&self) {
        let ticket = self.shell.borrow().request_save();
        let this = self.this.clone();
        let timer = Timeout::new(ticket.delay_ms, move || {
            let Some(app) = this.upgrade() else {
                return;
            };
            let saved = app.with_shell(|shell| shell.complete_save(ticket)).unwrap_or(false);
            if !saved {
                log::info!("[shell] edited during save; still unsaved");
            }
            app.refresh_chrome();
        });
        *self.save_timer.borrow_mut() = Some(timer);
    }

    fn open_deploy(&self) {
        if self.deploy.borrow().is_some() {
            return;
        }
        let company = {
            let mut shell = self.shell.borrow_mut();
            shell.open_deploy();
            shell.site().header.company_name.clone()
        };
        match DeployModal::open(&self.document, &self.root, &company, &self.dispatcher()) {
            Ok(modal) => *self.deploy.borrow_mut() = Some(modal),
            Err(e) => {
                log::error!("[shell] deploy modal: {e:?}");
                self.with_shell(|shell| shell.close_deploy());
            }
        }
    }

    fn relayout(&self) {
        if let Err(e) = self.compose() {
            log::error!("[shell] relayout failed: {e:?}");
            self.notices.show("The preview could not be rebuilt.");
        }
    }

    /// Rebuild the page, scroll container and scene when the layout key moved.
    fn compose(&self) -> anyhow::Result<()> {
        let key = self.shell.borrow().layout_key();
        if self.layout.get() == Some(key) {
            return Ok(());
        }

        self.scene.borrow_mut().clear();
        let scroll = self.scroll.borrow_mut().take();
        drop(scroll);
        let page = self.page.borrow_mut().take();
        drop(page);

        let hooks = PageHooks {
            on_commit: self.committer(),
            dispatch: self.dispatcher(),
            media: MediaContext {
                on_commit: self.committer(),
                notices: self.notices.clone(),
                client: self.client.clone(),
            },
        };
        let page = {
            let shell = self.shell.borrow();
            PageView::build(&self.document, &self.stage, &shell, &hooks)?
        };
        let scroll = ScrollCoordinator::bind(
            page.scroller().clone(),
            self.scroll_cell.clone(),
            page.reveal_targets(),
        );
        *self.page.borrow_mut() = Some(page);
        *self.scroll.borrow_mut() = Some(scroll);
        self.layout.set(Some(key));
        log::info!("[shell] layout {:?}", key);

        self.ensure_scene();
        Ok(())
    }

    /// Mount a scene for the current style and primary color, reusing the
    /// running one when neither changed.
    fn ensure_scene(&self) {
        let Some(layer) = self
            .page
            .borrow()
            .as_ref()
            .map(|page| page.scene_layer().clone())
        else {
            return;
        };
        let key = self.shell.borrow().scene_key();
        let seed = self.seed;
        let scroll = self.scroll_cell.clone();
        let rebuilt = self.scene.borrow_mut().ensure(key, |key| {
            let params = SceneParams {
                style: key.style,
                primary: key.primary.clone(),
                seed: seed.unwrap_or_else(rand::random),
            };
            SceneEngine::mount_shared(params, scroll, |engine| {
                WebSceneBackend::new(engine, layer)
            })
        });
        if rebuilt {
            log::info!("[shell] scene mounted");
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.save_timer.get_mut().take();
        self.deploy.get_mut().take();
        self.scene.get_mut().clear();
        self.scroll.get_mut().take();
        self.page.get_mut().take();
        let logo = self.shell.get_mut().clear_logo();
        for url in logo.into_iter().chain(self.uploads.get_mut().drain()) {
            dom::revoke_object_url(&url);
        }
    }
}
