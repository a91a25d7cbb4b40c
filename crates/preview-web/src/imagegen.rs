use preview_core::error::{PreviewError, PreviewResult};
use preview_core::imagegen::{GeneratedImage, ImageRequest};
use preview_core::PreviewConfig;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// `fetch`-based client for the image generator.
#[derive(Clone, Debug)]
pub struct ImageClient {
    endpoint: String,
    api_key: String,
}

fn fetch_err(e: JsValue) -> PreviewError {
    PreviewError::image_generation(format!("{:?}", e))
}

impl ImageClient {
    pub fn from_config(config: &PreviewConfig) -> Self {
        Self {
            endpoint: config.image_endpoint.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Generate an image for `keyword` and return it as a data URL.
    pub async fn generate(&self, keyword: &str) -> PreviewResult<String> {
        let body = ImageRequest::prompt(keyword).to_json()?;
        let headers = web::Headers::new().map_err(fetch_err)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(fetch_err)?;
        let init = web::RequestInit::new();
        init.set_method("POST");
        init.set_mode(web::RequestMode::Cors);
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
        let url = ImageRequest::url(&self.endpoint, &self.api_key);
        let request = web::Request::new_with_str_and_init(&url, &init).map_err(fetch_err)?;

        let window = web::window().ok_or_else(|| PreviewError::image_generation("no window"))?;
        let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(fetch_err)?
            .dyn_into()
            .map_err(fetch_err)?;
        if !response.ok() {
            return Err(PreviewError::image_generation(format!(
                "HTTP {} from image endpoint",
                response.status()
            )));
        }
        let text = JsFuture::from(response.text().map_err(fetch_err)?)
            .await
            .map_err(fetch_err)?
            .as_string()
            .ok_or_else(|| PreviewError::image_generation("response body is not text"))?;
        log::debug!("[imagegen] {} bytes for '{}'", text.len(), keyword);
        GeneratedImage::from_response_json(&text).map(|img| img.to_data_url())
    }
}
