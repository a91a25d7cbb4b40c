use preview_core::scene::SurfaceSize;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::HIDDEN_CLASS;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!(format!("{:?}", e))
}

/// `<tag class="...">` as an [`web::HtmlElement`].
pub fn el(document: &web::Document, tag: &str, class: &str) -> anyhow::Result<web::HtmlElement> {
    let node = document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<web::HtmlElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;
    if !class.is_empty() {
        node.set_class_name(class);
    }
    Ok(node)
}

pub fn text_el(
    document: &web::Document,
    tag: &str,
    class: &str,
    text: &str,
) -> anyhow::Result<web::HtmlElement> {
    let node = el(document, tag, class)?;
    node.set_text_content(Some(text));
    Ok(node)
}

pub fn input(document: &web::Document, kind: &str, class: &str) -> anyhow::Result<web::HtmlInputElement> {
    el(document, "input", class)?
        .dyn_into::<web::HtmlInputElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))
        .map(|input| {
            input.set_type(kind);
            input
        })
}

/// Button with an inline icon and optional label.
pub fn icon_button(
    document: &web::Document,
    class: &str,
    icon_svg: &str,
    label: &str,
) -> anyhow::Result<web::HtmlElement> {
    let button = el(document, "button", class)?;
    let _ = button.set_attribute("type", "button");
    button.set_inner_html(icon_svg);
    if !label.is_empty() {
        let span = text_el(document, "span", "", label)?;
        let _ = button.append_child(&span);
    }
    Ok(button)
}

#[inline]
pub fn append(parent: &web::Element, child: &web::Element) {
    let _ = parent.append_child(child);
}

#[inline]
pub fn set_class(node: &web::Element, class: &str, on: bool) {
    let list = node.class_list();
    let _ = if on { list.add_1(class) } else { list.remove_1(class) };
}

/// Toggle the `hidden` attribute, mirrored as a class for styling hooks.
pub fn set_hidden(node: &web::Element, hidden: bool) {
    let _ = if hidden {
        node.set_attribute("hidden", "")
    } else {
        node.remove_attribute("hidden")
    };
    set_class(node, HIDDEN_CLASS, hidden);
}

#[inline]
pub fn set_style(node: &web::HtmlElement, property: &str, value: &str) {
    let _ = node.style().set_property(property, value);
}

pub fn set_css_variables(node: &web::HtmlElement, vars: &[(&'static str, String)]) {
    let style = node.style();
    for (name, value) in vars {
        let _ = style.set_property(name, value);
    }
}

/// Text content of an embedded JSON `<script>` block.
pub fn script_text(document: &web::Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty())
}

/// CSS size of `node` with the window's device pixel ratio.
pub fn container_size(node: &web::Element) -> SurfaceSize {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    SurfaceSize::new(node.client_width().max(0) as u32, node.client_height().max(0) as u32, dpr)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: SurfaceSize) {
    let (w, h) = size.backing();
    canvas.set_width(w.max(1));
    canvas.set_height(h.max(1));
}

/// Release a blob URL minted by `URL.createObjectURL`.
pub fn revoke_object_url(url: &str) {
    if let Err(e) = web::Url::revoke_object_url(url) {
        log::warn!("[dom] could not revoke {url}: {:?}", e);
    }
}

/// Whether the browser exposes `navigator.gpu`.
pub fn has_webgpu() -> bool {
    web::window()
        .map(|w| js_sys::Reflect::has(&w.navigator(), &"gpu".into()).unwrap_or(false))
        .unwrap_or(false)
}
