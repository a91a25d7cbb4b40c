//! Media source resolution and the edit state of one media node.

use std::collections::HashMap;

use crate::content::ContentField;
use crate::error::PreviewError;

pub const GENERATION_FAILED: &str = "AI Generation failed. Try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    /// Looping ambient clip.
    Video,
    /// Embedded external player.
    Embed,
}

/// Percent-encode everything outside `A-Z a-z 0-9 - _ . ! ~ * ' ( )`.
pub fn encode_uri_component(input: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => {
                out.push('%');
                out.push(HEX[(b >> 4) as usize] as char);
                out.push(HEX[(b & 0x0f) as usize] as char);
            }
        }
    }
    out
}

fn is_url(s: &str) -> bool {
    s.starts_with("http") || s.starts_with("blob:") || s.starts_with("data:")
}

pub fn placeholder_image_url(keyword: &str) -> String {
    format!(
        "https://image.pollinations.ai/prompt/{}?width=800&height=600&nologo=true",
        encode_uri_component(keyword)
    )
}

/// Stock clip for an ambient keyword. Local uploads pass through.
pub fn ambient_video_url(keyword: &str) -> String {
    if keyword.starts_with("blob:") {
        return keyword.to_string();
    }
    format!("https://assets.mixkit.co/videos/preview/mixkit-abstract-video-4k-{keyword}-large.mp4")
}

/// Pull an 11-character video id out of the common YouTube URL shapes.
pub fn youtube_id(input: &str) -> Option<&str> {
    if let Some(pos) = input.find("youtu.be/") {
        return take_id(&input[pos + "youtu.be/".len()..]);
    }
    let pos = input.find("youtube.com/")?;
    let rest = &input[pos + "youtube.com/".len()..];
    for prefix in ["embed/", "v/", "e/"] {
        if let Some(tail) = rest.strip_prefix(prefix) {
            return take_id(tail);
        }
    }
    for marker in ["?v=", "&v="] {
        if let Some(i) = rest.find(marker) {
            return take_id(&rest[i + marker.len()..]);
        }
    }
    // `/{section}/{name}/{id}` style links: the id follows the last slash
    let first = rest.find('/')?;
    let last = rest.rfind('/')?;
    if last > first + 1 {
        return take_id(&rest[last + 1..]);
    }
    None
}

fn take_id(tail: &str) -> Option<&str> {
    let id = tail.get(..11)?;
    let valid = id
        .chars()
        .all(|c| !matches!(c, '"' | '&' | '?' | '/') && !c.is_whitespace());
    valid.then_some(id)
}

/// Turn a pasted link or free-text phrase into an embeddable player URL.
pub fn parse_embed(input: &str) -> String {
    let input = input.trim();
    if let Some(id) = youtube_id(input) {
        return format!("https://www.youtube.com/embed/{id}?autoplay=0&controls=1&rel=0");
    }
    if input.starts_with("http") {
        return input.to_string();
    }
    format!(
        "https://www.youtube.com/embed?listType=search&list={}&autoplay=0&controls=1&rel=0",
        encode_uri_component(input)
    )
}

/// Working source for a media node: explicit source first, then a keyword
/// that already is a URL, then a keyword-derived default for the kind.
pub fn resolve_source(src: &str, keyword: &str, kind: MediaKind) -> Option<String> {
    if !src.is_empty() {
        return Some(src.to_string());
    }
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    match kind {
        MediaKind::Embed => Some(parse_embed(keyword)),
        _ if is_url(keyword) => Some(keyword.to_string()),
        MediaKind::Image => Some(placeholder_image_url(keyword)),
        MediaKind::Video => Some(ambient_video_url(keyword)),
    }
}

/// User-visible, dismissable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegenerateTicket {
    pub token: u64,
    pub keyword: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegenerateOutcome {
    /// New source; write it back to the bound field.
    Applied(String),
    Failed(Notice),
    /// Stale token or unmounted node.
    Ignored,
}

/// Edit state of one image, clip or embed bound to a [`ContentField`].
#[derive(Clone, Debug)]
pub struct MediaSlot {
    kind: MediaKind,
    field: ContentField,
    src: String,
    keyword: String,
    source: Option<String>,
    loading: bool,
    pending: Option<u64>,
    next_token: u64,
    mounted: bool,
}

impl MediaSlot {
    pub fn new(kind: MediaKind, field: ContentField, src: &str, keyword: &str) -> Self {
        Self {
            kind,
            field,
            src: src.to_string(),
            keyword: keyword.to_string(),
            source: resolve_source(src, keyword, kind),
            loading: false,
            pending: None,
            next_token: 1,
            mounted: true,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn field(&self) -> ContentField {
        self.field
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Follow external changes to the bound source or keyword. Applies to
    /// every kind alike. Returns whether the displayed source changed.
    pub fn sync(&mut self, src: &str, keyword: &str) -> bool {
        if self.src == src && self.keyword == keyword {
            return false;
        }
        self.src = src.to_string();
        self.keyword = keyword.to_string();
        let next = resolve_source(src, keyword, self.kind);
        if next.is_none() || next == self.source {
            return false;
        }
        self.source = next;
        true
    }

    /// A local file was picked; `object_url` is its blob reference.
    pub fn upload(&mut self, object_url: &str) -> String {
        self.source = Some(object_url.to_string());
        self.keyword = object_url.to_string();
        object_url.to_string()
    }

    /// Link or search phrase typed into the embed editor. Returns the value
    /// to store.
    pub fn set_embed_input(&mut self, input: &str) -> Option<String> {
        if self.kind != MediaKind::Embed {
            return None;
        }
        let url = parse_embed(input);
        self.keyword = url.clone();
        self.source = Some(url.clone());
        Some(url)
    }

    /// Start an AI regeneration. Only images with a keyword can regenerate,
    /// and only one request is outstanding at a time.
    pub fn begin_regenerate(&mut self) -> Option<RegenerateTicket> {
        if self.kind != MediaKind::Image || self.keyword.trim().is_empty() || !self.mounted {
            return None;
        }
        if self.pending.is_some() {
            return None;
        }
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(token);
        self.loading = true;
        Some(RegenerateTicket {
            token,
            keyword: self.keyword.clone(),
        })
    }

    pub fn finish_regenerate(
        &mut self,
        token: u64,
        result: Result<String, PreviewError>,
    ) -> RegenerateOutcome {
        if !self.mounted || self.pending != Some(token) {
            return RegenerateOutcome::Ignored;
        }
        self.pending = None;
        self.loading = false;
        match result {
            Ok(url) => {
                self.source = Some(url.clone());
                self.keyword = url.clone();
                RegenerateOutcome::Applied(url)
            }
            Err(e) => {
                log::error!("[media] regeneration failed: {e}");
                RegenerateOutcome::Failed(Notice {
                    message: GENERATION_FAILED.to_string(),
                })
            }
        }
    }

    /// The node left the page. Late results become no-ops.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
        self.loading = false;
    }
}

/// Object URLs minted for local uploads, at most one per field. Uploads are
/// stored in the description and outlive any one page build, so they are
/// released when their field moves on rather than when a node unmounts.
#[derive(Debug, Default)]
pub struct UploadLedger {
    by_field: HashMap<ContentField, String>,
}

impl UploadLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field` now stores `value`. Returns the upload URL it displaced.
    pub fn stored(&mut self, field: ContentField, value: &str) -> Option<String> {
        if self.by_field.get(&field).is_some_and(|url| url == value) {
            return None;
        }
        let displaced = self.by_field.remove(&field);
        if value.starts_with("blob:") {
            self.by_field.insert(field, value.to_string());
        }
        displaced
    }

    /// Every URL still held; the ledger is empty afterwards.
    pub fn drain(&mut self) -> Vec<String> {
        self.by_field.drain().map(|(_, url)| url).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_encode_uri_component() {
        assert_eq!(encode_uri_component("coffee shop"), "coffee%20shop");
        assert_eq!(encode_uri_component("a&b=c/d"), "a%26b%3Dc%2Fd");
        assert_eq!(encode_uri_component("it's (ok)!*~"), "it's%20(ok)!*~");
        assert_eq!(encode_uri_component("café"), "caf%C3%A9");
    }

    #[test]
    fn youtube_shapes() {
        let id = Some("dQw4w9WgXcQ");
        assert_eq!(youtube_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://youtube.com/watch?feature=x&v=dQw4w9WgXcQ&t=3"), id);
        assert_eq!(youtube_id("https://youtu.be/dQw4w9WgXcQ?t=10"), id);
        assert_eq!(youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/v/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://www.youtube.com/user/someone/dQw4w9WgXcQ"), id);
        assert_eq!(youtube_id("https://youtu.be/short"), None);
        assert_eq!(youtube_id("lofi beats"), None);
    }

    #[test]
    fn embed_fallbacks() {
        assert_eq!(
            parse_embed("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&controls=1&rel=0"
        );
        assert_eq!(parse_embed("https://vimeo.com/1234"), "https://vimeo.com/1234");
        assert_eq!(
            parse_embed("jazz cafe"),
            "https://www.youtube.com/embed?listType=search&list=jazz%20cafe&autoplay=0&controls=1&rel=0"
        );
    }

    #[test]
    fn resolution_order() {
        let k = MediaKind::Image;
        assert_eq!(resolve_source("a.png", "beach", k).as_deref(), Some("a.png"));
        assert_eq!(
            resolve_source("", "blob:http://x/1", k).as_deref(),
            Some("blob:http://x/1")
        );
        assert_eq!(
            resolve_source("", "sunny beach", k).as_deref(),
            Some("https://image.pollinations.ai/prompt/sunny%20beach?width=800&height=600&nologo=true")
        );
        assert_eq!(resolve_source("", "", k), None);
        assert_eq!(
            resolve_source("", "waves", MediaKind::Video).as_deref(),
            Some("https://assets.mixkit.co/videos/preview/mixkit-abstract-video-4k-waves-large.mp4")
        );
    }

    #[test]
    fn regenerate_is_image_only() {
        let mut video = MediaSlot::new(MediaKind::Video, ContentField::VideoSource, "", "waves");
        assert!(video.begin_regenerate().is_none());
        let mut blank = MediaSlot::new(MediaKind::Image, ContentField::FeatureImage(0), "", "");
        assert!(blank.begin_regenerate().is_none());
    }

    #[test]
    fn success_replaces_source() {
        let mut m = MediaSlot::new(MediaKind::Image, ContentField::FeatureImage(0), "", "desk");
        let t = m.begin_regenerate().unwrap();
        assert!(m.is_loading());
        assert!(m.begin_regenerate().is_none());
        let out = m.finish_regenerate(t.token, Ok("data:image/png;base64,AA".into()));
        assert_eq!(out, RegenerateOutcome::Applied("data:image/png;base64,AA".into()));
        assert_eq!(m.source(), Some("data:image/png;base64,AA"));
        assert!(!m.is_loading());
    }

    #[test]
    fn embeds_resync_like_everything_else() {
        let mut m = MediaSlot::new(MediaKind::Embed, ContentField::VideoSource, "", "lofi");
        assert!(m.sync("", "https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(
            m.source(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=0&controls=1&rel=0")
        );
    }

    #[test]
    fn uploads_are_released_when_their_field_moves_on() {
        let mut ledger = UploadLedger::new();
        let field = ContentField::FeatureImage(0);
        assert_eq!(ledger.stored(field, "rocket"), None);
        assert_eq!(ledger.stored(field, "blob:a"), None);
        assert_eq!(ledger.stored(field, "blob:a"), None);
        assert_eq!(ledger.stored(field, "blob:b"), Some("blob:a".to_string()));
        assert_eq!(
            ledger.stored(ContentField::GalleryImage(0), "blob:c"),
            None
        );
        assert_eq!(
            ledger.stored(field, "https://image.example/x.png"),
            Some("blob:b".to_string())
        );
        assert_eq!(ledger.drain(), vec!["blob:c".to_string()]);
        assert!(ledger.drain().is_empty());
    }
}
