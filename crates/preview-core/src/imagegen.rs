//! Wire format for the external image generator (a generateContent-style
//! endpoint returning inline image parts).

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, PreviewResult};

const PROMPT_PREFIX: &str = "High quality, photorealistic, 4k, commercial photography, ";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImageRequest {
    contents: RequestContent,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
struct TextPart {
    text: String,
}

impl ImageRequest {
    pub fn prompt(keyword: &str) -> Self {
        Self {
            contents: RequestContent {
                parts: vec![TextPart {
                    text: format!("{PROMPT_PREFIX}{}", keyword.trim()),
                }],
            },
        }
    }

    pub fn prompt_text(&self) -> &str {
        self.contents
            .parts
            .first()
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> PreviewResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Endpoint with the key appended as a query parameter. An empty key
    /// leaves the endpoint untouched.
    pub fn url(endpoint: &str, api_key: &str) -> String {
        if api_key.is_empty() {
            return endpoint.to_string();
        }
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        format!("{endpoint}{sep}key={}", crate::media::encode_uri_component(api_key))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Base64 image payload as returned inline by the generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: String,
}

impl GeneratedImage {
    /// Take the first inline image part of the first candidate.
    pub fn from_response_json(json: &str) -> PreviewResult<Self> {
        let response: GenerateResponse = serde_json::from_str(json)
            .map_err(|e| PreviewError::image_generation(format!("bad response: {e}")))?;
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.inline_data))
            .map(|d| GeneratedImage {
                mime_type: d.mime_type,
                data: d.data,
            })
            .ok_or_else(|| PreviewError::image_generation("no image data received"))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_prefixed() {
        let req = ImageRequest::prompt(" espresso bar ");
        assert_eq!(
            req.prompt_text(),
            "High quality, photorealistic, 4k, commercial photography, espresso bar"
        );
        let json = req.to_json().unwrap();
        assert!(json.starts_with(r#"{"contents":{"parts":[{"text":"#));
    }

    #[test]
    fn url_appends_key() {
        assert_eq!(ImageRequest::url("https://x/gen", ""), "https://x/gen");
        assert_eq!(ImageRequest::url("https://x/gen", "k 1"), "https://x/gen?key=k%201");
        assert_eq!(ImageRequest::url("https://x/gen?a=b", "k"), "https://x/gen?a=b&key=k");
    }

    #[test]
    fn first_inline_part_wins() {
        let json = r#"{"candidates":[{"content":{"parts":[
            {"text":"here you go"},
            {"inlineData":{"mimeType":"image/png","data":"AAAA"}},
            {"inlineData":{"mimeType":"image/jpeg","data":"BBBB"}}
        ]}}]}"#;
        let img = GeneratedImage::from_response_json(json).unwrap();
        assert_eq!(img.to_data_url(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn text_only_response_is_an_error() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#;
        let err = GeneratedImage::from_response_json(json).unwrap_err();
        assert!(matches!(err, PreviewError::ImageGeneration(_)));
        assert!(GeneratedImage::from_response_json("{}").is_err());
        assert!(GeneratedImage::from_response_json("<html>").is_err());
    }
}
