// Host-side tests for the edit overlay and media flows against the shell.

use preview_core::content::{ContentField, FeatureItem, WebsiteDescription};
use preview_core::edit::EditableText;
use preview_core::error::PreviewError;
use preview_core::media::{MediaKind, MediaSlot, RegenerateOutcome, GENERATION_FAILED};
use preview_core::shell::ShellState;

const SITE: &str = r##"{
    "theme": "modern",
    "fontPairing": { "heading": "Playfair Display", "body": "Lato" },
    "colorPalette": {
        "primary": "#0ea5e9", "secondary": "#a855f7", "background": "#ffffff",
        "text": "#0f172a", "accent": "#f59e0b"
    },
    "header": { "companyName": "Acme Co", "navLinks": ["About"], "ctaText": "Call" },
    "hero": {
        "headline": "Coffee, done right", "subheadline": "Since 1999",
        "ctaPrimary": "Order", "ctaSecondary": "Menu",
        "backgroundImageKeyword": "coffee beans", "videoMood": "warm", "style3D": "waves"
    },
    "features": {
        "title": "Menu", "subtitle": "Fresh daily",
        "items": [ { "title": "Espresso", "description": "Bold", "icon": "Coffee", "imageKeyword": "espresso cup" } ]
    },
    "gallery": {
        "title": "Space", "description": "Our shop",
        "images": [ { "alt": "bar", "keyword": "coffee bar" } ]
    },
    "testimonials": { "title": "Reviews", "items": [] },
    "footer": { "copyright": "(c) 2024 Acme" }
}"##;

fn shell() -> ShellState {
    ShellState::new(WebsiteDescription::from_json(SITE).expect("fixture parses"))
}

#[test]
fn text_commit_on_blur_is_idempotent() {
    let mut shell = shell();
    let field = ContentField::CompanyName;
    let mut text = EditableText::new(field, shell.site().get(field).unwrap_or_default());
    assert_eq!(text.value(), "Acme Co");

    text.begin_edit();
    if let Some(v) = text.commit("Acme Corp") {
        shell.update(field, v).unwrap();
    }
    assert_eq!(shell.site().header.company_name, "Acme Corp");
    assert!(!shell.is_saved());

    let ticket = shell.request_save();
    shell.complete_save(ticket);

    text.begin_edit();
    if let Some(v) = text.commit("Acme Corp") {
        shell.update(field, v).unwrap();
    }
    assert_eq!(shell.site().header.company_name, "Acme Corp");
    assert!(shell.is_saved());
}

#[test]
fn text_follows_out_of_band_changes() {
    let mut shell = shell();
    let field = ContentField::HeroHeadline;
    let mut text = EditableText::new(field, shell.site().get(field).unwrap_or_default());
    shell.update(field, "Regenerated headline").unwrap();
    assert!(text.sync(shell.site().get(field).unwrap_or_default()));
    assert_eq!(text.value(), "Regenerated headline");
}

#[test]
fn failed_regeneration_keeps_source_and_notifies_once() {
    let shell = shell();
    let field = ContentField::FeatureImage(0);
    let keyword = shell.site().get(field).unwrap_or_default();
    let mut slot = MediaSlot::new(MediaKind::Image, field, "", keyword);
    let before = slot.source().map(str::to_string);
    assert!(before.as_deref().is_some_and(|s| s.contains("espresso%20cup")));

    let ticket = slot.begin_regenerate().expect("image with keyword");
    assert!(slot.is_loading());

    let outcome = slot.finish_regenerate(
        ticket.token,
        Err(PreviewError::image_generation("quota exceeded")),
    );
    let notices = match &outcome {
        RegenerateOutcome::Failed(n) => vec![n.clone()],
        _ => vec![],
    };
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, GENERATION_FAILED);
    assert!(!slot.is_loading());
    assert_eq!(slot.source().map(str::to_string), before);

    // a duplicate completion is not a second notice
    let again = slot.finish_regenerate(ticket.token, Err(PreviewError::image_generation("x")));
    assert_eq!(again, RegenerateOutcome::Ignored);
}

#[test]
fn late_result_after_unmount_is_ignored() {
    let mut slot = MediaSlot::new(MediaKind::Image, ContentField::GalleryImage(0), "", "coffee bar");
    let ticket = slot.begin_regenerate().expect("ticket");
    let before = slot.source().map(str::to_string);
    slot.unmount();
    let outcome = slot.finish_regenerate(ticket.token, Ok("data:image/png;base64,AA".into()));
    assert_eq!(outcome, RegenerateOutcome::Ignored);
    assert_eq!(slot.source().map(str::to_string), before);
}

#[test]
fn applied_image_is_written_back_to_its_field() {
    let mut shell = shell();
    let field = ContentField::GalleryImage(0);
    let mut slot = MediaSlot::new(MediaKind::Image, field, "", "coffee bar");
    let ticket = slot.begin_regenerate().expect("ticket");
    if let RegenerateOutcome::Applied(url) =
        slot.finish_regenerate(ticket.token, Ok("data:image/jpeg;base64,ZZ".into()))
    {
        shell.update(field, url).unwrap();
    }
    assert_eq!(shell.site().get(field), Some("data:image/jpeg;base64,ZZ"));
    // a URL keyword resolves to itself
    slot.sync("", shell.site().get(field).unwrap_or_default());
    assert_eq!(slot.source(), Some("data:image/jpeg;base64,ZZ"));
}

#[test]
fn upload_replaces_source_with_blob_reference() {
    let mut slot = MediaSlot::new(MediaKind::Video, ContentField::VideoSource, "", "city");
    let stored = slot.upload("blob:http://localhost/abc");
    assert_eq!(stored, "blob:http://localhost/abc");
    assert_eq!(slot.source(), Some("blob:http://localhost/abc"));
}

#[test]
fn feature_without_keyword_accepts_an_upload() {
    let mut site = WebsiteDescription::from_json(SITE).expect("fixture parses");
    site.features.items.push(FeatureItem {
        title: "Pastry".into(),
        description: "Flaky".into(),
        icon: "Leaf".into(),
        image_keyword: None,
    });
    let mut shell = ShellState::new(site);
    let field = ContentField::FeatureImage(1);

    let mut slot = MediaSlot::new(MediaKind::Image, field, "", shell.site().get(field).unwrap_or_default());
    assert_eq!(slot.source(), None);
    assert!(slot.begin_regenerate().is_none());

    let stored = slot.upload("blob:http://localhost/pastry");
    assert!(shell.update(field, stored).unwrap());
    assert_eq!(
        shell.site().features.items[1].image_keyword.as_deref(),
        Some("blob:http://localhost/pastry")
    );
    assert!(!slot.sync("", shell.site().get(field).unwrap_or_default()));
    assert_eq!(slot.source(), Some("blob:http://localhost/pastry"));
}
