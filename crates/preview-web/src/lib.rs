#![cfg(target_arch = "wasm32")]
mod app;
mod backend;
mod constants;
mod deploy;
mod dom;
mod editable;
mod frame;
mod imagegen;
mod input;
mod media;
mod overlay;
mod page;
mod render;
mod scroll;
mod ui;

use std::cell::RefCell;
use std::rc::Rc;

use preview_core::{PreviewConfig, WebsiteDescription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::app::App;
use crate::constants::{CONFIG_ELEMENT_ID, ROOT_ELEMENT_ID};

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let document = dom::window_document();
    let config_json = document
        .as_ref()
        .and_then(|doc| dom::script_text(doc, CONFIG_ELEMENT_ID));
    let config = PreviewConfig::from_json_or_default(config_json.as_deref());
    console_log::init_with_level(config.log_level()).ok();
    log::info!("preview-web starting");

    if let Err(e) = init(&config) {
        log::error!("init error: {:?}", e);
    }
    Ok(())
}

fn init(config: &PreviewConfig) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;

    let json = dom::script_text(&document, &config.website_element_id).ok_or_else(|| {
        anyhow::anyhow!("missing website description in #{}", config.website_element_id)
    })?;
    let site = WebsiteDescription::from_json(&json)?;

    let root = match document.get_element_by_id(ROOT_ELEMENT_ID) {
        Some(el) => el
            .dyn_into::<web::HtmlElement>()
            .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?,
        None => {
            log::warn!("no #{ROOT_ELEMENT_ID}; mounting into <body>");
            document.body().ok_or_else(|| anyhow::anyhow!("no body"))?
        }
    };

    let app = App::mount(document, root, site, config)?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

/// Tear the preview down, releasing the scene, listeners and timers.
#[wasm_bindgen]
pub fn unmount() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if app.is_some() {
        log::info!("preview-web unmounted");
    }
}
