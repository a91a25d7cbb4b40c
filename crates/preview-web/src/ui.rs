//! Preview chrome: toolbar, theme panel and the live-mode exit button.

use std::rc::Rc;

use gloo::events::EventListener;
use preview_core::content::PaletteRole;
use preview_core::icons::IconId;
use preview_core::scene::SceneStyle;
use preview_core::shell::{DeviceFrame, ShellState, THEME_PANEL_ROLES};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;

/// Everything the chrome can ask the app to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Back,
    Device(DeviceFrame),
    ToggleEdit,
    ToggleTheme,
    Save,
    OpenDeploy,
    CloseDeploy,
    EnterLive,
    ExitLive,
    Style(SceneStyle),
    Color(PaletteRole, String),
    Logo(String),
    ClearLogo,
}

pub type Dispatch = Rc<dyn Fn(Action)>;

fn on_click(node: &web::HtmlElement, dispatch: &Dispatch, action: Action) -> EventListener {
    let dispatch = dispatch.clone();
    EventListener::new(node, "click", move |_| dispatch(action.clone()))
}

pub struct Toolbar {
    root: web::HtmlElement,
    company: web::HtmlElement,
    save_state: web::HtmlElement,
    save_button: web::HtmlElement,
    edit_button: web::HtmlElement,
    theme_button: web::HtmlElement,
    devices: Vec<(DeviceFrame, web::HtmlElement)>,
    _listeners: Vec<EventListener>,
}

impl Toolbar {
    pub fn build(document: &web::Document, dispatch: &Dispatch) -> anyhow::Result<Self> {
        let root = dom::el(document, "header", "toolbar")?;
        let mut listeners = Vec::new();

        let left = dom::el(document, "div", "toolbar-left")?;
        let back = dom::icon_button(document, "toolbar-back", &IconId::ArrowLeft.svg("icon"), "Back")?;
        listeners.push(on_click(&back, dispatch, Action::Back));
        let company = dom::el(document, "span", "toolbar-company")?;
        let save_state = dom::el(document, "span", "toolbar-save-state")?;
        dom::append(&left, &back);
        dom::append(&left, &company);
        dom::append(&left, &save_state);

        let center = dom::el(document, "div", "toolbar-devices")?;
        let mut devices = Vec::with_capacity(DeviceFrame::ALL.len());
        for device in DeviceFrame::ALL {
            let button = dom::icon_button(document, "device-button", &device.icon().svg("icon"), "")?;
            let _ = button.set_attribute("title", device.as_str());
            listeners.push(on_click(&button, dispatch, Action::Device(device)));
            dom::append(&center, &button);
            devices.push((device, button));
        }

        let right = dom::el(document, "div", "toolbar-right")?;
        let save_button = dom::icon_button(document, "toolbar-save", &IconId::Save.svg("icon"), "Save")?;
        listeners.push(on_click(&save_button, dispatch, Action::Save));
        let theme_button =
            dom::icon_button(document, "toolbar-theme", &IconId::Palette.svg("icon"), "Theme")?;
        listeners.push(on_click(&theme_button, dispatch, Action::ToggleTheme));
        let edit_button = dom::icon_button(document, "toolbar-edit", &IconId::Pencil.svg("icon"), "Edit")?;
        listeners.push(on_click(&edit_button, dispatch, Action::ToggleEdit));
        let deploy = dom::icon_button(document, "toolbar-deploy", &IconId::Rocket.svg("icon"), "Deploy")?;
        listeners.push(on_click(&deploy, dispatch, Action::OpenDeploy));
        for node in [&save_button, &theme_button, &edit_button, &deploy] {
            dom::append(&right, node);
        }

        dom::append(&root, &left);
        dom::append(&root, &center);
        dom::append(&root, &right);
        Ok(Self {
            root,
            company,
            save_state,
            save_button,
            edit_button,
            theme_button,
            devices,
            _listeners: listeners,
        })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.root
    }

    pub fn refresh(&self, shell: &ShellState) {
        dom::set_hidden(&self.root, shell.is_live());
        self.company
            .set_text_content(Some(&shell.site().header.company_name));
        let saved = shell.is_saved();
        self.save_state
            .set_text_content(Some(if saved { "Saved" } else { "Unsaved changes" }));
        dom::set_class(&self.save_state, "is-dirty", !saved);
        dom::set_hidden(&self.save_button, saved);
        dom::set_class(&self.edit_button, "is-active", shell.is_editing());
        dom::set_class(&self.theme_button, "is-active", shell.theme_panel_open());
        for (device, button) in &self.devices {
            dom::set_class(button, "is-active", *device == shell.device());
        }
    }
}

pub struct ThemePanel {
    root: web::HtmlElement,
    colors: Vec<(PaletteRole, web::HtmlInputElement)>,
    styles: Vec<(SceneStyle, web::HtmlElement)>,
    _listeners: Vec<EventListener>,
}

impl ThemePanel {
    pub fn build(document: &web::Document, dispatch: &Dispatch) -> anyhow::Result<Self> {
        let root = dom::el(document, "aside", "theme-panel")?;
        let mut listeners = Vec::new();

        let head = dom::el(document, "div", "theme-panel-head")?;
        dom::append(&head, &dom::text_el(document, "h3", "", "Theme")?);
        let close = dom::icon_button(document, "theme-panel-close", &IconId::X.svg("icon"), "")?;
        listeners.push(on_click(&close, dispatch, Action::ToggleTheme));
        dom::append(&head, &close);
        dom::append(&root, &head);

        let mut colors = Vec::with_capacity(THEME_PANEL_ROLES.len());
        for role in THEME_PANEL_ROLES {
            let row = dom::el(document, "label", "theme-color")?;
            dom::append(&row, &dom::text_el(document, "span", "", role.label())?);
            let input = dom::input(document, "color", "theme-color-input")?;
            let d = dispatch.clone();
            listeners.push(EventListener::new(&input, "input", move |event| {
                if let Some(input) = event
                    .target()
                    .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
                {
                    d(Action::Color(role, input.value()));
                }
            }));
            dom::append(&row, &input);
            dom::append(&root, &row);
            colors.push((role, input));
        }

        dom::append(&root, &dom::text_el(document, "h4", "", "Backdrop")?);
        let picker = dom::el(document, "div", "theme-styles")?;
        let mut styles = Vec::with_capacity(SceneStyle::PICKER.len());
        for style in SceneStyle::PICKER {
            let button = dom::text_el(document, "button", "style-option", style.as_str())?;
            listeners.push(on_click(&button, dispatch, Action::Style(style)));
            dom::append(&picker, &button);
            styles.push((style, button));
        }
        dom::append(&root, &picker);

        dom::append(&root, &dom::text_el(document, "h4", "", "Logo")?);
        let logo = dom::input(document, "file", "theme-logo")?;
        let _ = logo.set_attribute("accept", "image/*");
        let d = dispatch.clone();
        listeners.push(EventListener::new(&logo, "change", move |event| {
            let file = event
                .target()
                .and_then(|t| t.dyn_into::<web::HtmlInputElement>().ok())
                .and_then(|input| input.files())
                .and_then(|files| files.get(0));
            if let Some(file) = file {
                match web::Url::create_object_url_with_blob(&file) {
                    Ok(url) => d(Action::Logo(url)),
                    Err(e) => log::warn!("[theme] could not read logo: {:?}", e),
                }
            }
        }));
        dom::append(&root, &logo);

        Ok(Self {
            root,
            colors,
            styles,
            _listeners: listeners,
        })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.root
    }

    pub fn refresh(&self, shell: &ShellState) {
        dom::set_hidden(&self.root, !shell.theme_panel_visible());
        let palette = &shell.site().color_palette;
        for (role, input) in &self.colors {
            let value = palette.get(*role);
            if input.value() != value {
                input.set_value(value);
            }
        }
        for (style, button) in &self.styles {
            dom::set_class(button, "is-active", *style == shell.site().hero.style_3d);
        }
    }
}

/// Floating button shown only in live mode.
pub struct LiveExit {
    button: web::HtmlElement,
    _click: EventListener,
}

impl LiveExit {
    pub fn build(document: &web::Document, dispatch: &Dispatch) -> anyhow::Result<Self> {
        let button = dom::icon_button(document, "live-exit", &IconId::X.svg("icon"), "Exit preview")?;
        let click = on_click(&button, dispatch, Action::ExitLive);
        Ok(Self {
            button,
            _click: click,
        })
    }

    pub fn element(&self) -> &web::HtmlElement {
        &self.button
    }

    pub fn refresh(&self, shell: &ShellState) {
        dom::set_hidden(&self.button, !shell.is_live());
    }
}
