//! The structured website description produced by the generation service.
//!
//! Rendering reads from [`WebsiteDescription`]; the editable overlay writes
//! back through [`WebsiteDescription::set`], one [`ContentField`] at a time.

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, PreviewResult};
use crate::scene::SceneStyle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Modern,
    Elegant,
    Bold,
    Minimal,
    Cyber,
    /// Themes newer than this build; the page falls back to neutral styling.
    #[serde(other)]
    Other,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Modern => "modern",
            Theme::Elegant => "elegant",
            Theme::Bold => "bold",
            Theme::Minimal => "minimal",
            Theme::Cyber => "cyber",
            Theme::Other => "other",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FontPairing {
    pub heading: String,
    pub body: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub background: String,
    pub text: String,
    pub accent: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaletteRole {
    Primary,
    Secondary,
    Background,
    Text,
    Accent,
}

impl PaletteRole {
    pub const ALL: [PaletteRole; 5] = [
        PaletteRole::Primary,
        PaletteRole::Secondary,
        PaletteRole::Background,
        PaletteRole::Text,
        PaletteRole::Accent,
    ];

    pub fn css_var(self) -> &'static str {
        match self {
            PaletteRole::Primary => "--primary",
            PaletteRole::Secondary => "--secondary",
            PaletteRole::Background => "--bg",
            PaletteRole::Text => "--text",
            PaletteRole::Accent => "--accent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaletteRole::Primary => "primary",
            PaletteRole::Secondary => "secondary",
            PaletteRole::Background => "background",
            PaletteRole::Text => "text",
            PaletteRole::Accent => "accent",
        }
    }
}

impl ColorPalette {
    pub fn get(&self, role: PaletteRole) -> &str {
        match role {
            PaletteRole::Primary => &self.primary,
            PaletteRole::Secondary => &self.secondary,
            PaletteRole::Background => &self.background,
            PaletteRole::Text => &self.text,
            PaletteRole::Accent => &self.accent,
        }
    }

    fn slot(&mut self, role: PaletteRole) -> &mut String {
        match role {
            PaletteRole::Primary => &mut self.primary,
            PaletteRole::Secondary => &mut self.secondary,
            PaletteRole::Background => &mut self.background,
            PaletteRole::Text => &mut self.text,
            PaletteRole::Accent => &mut self.accent,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderData {
    pub company_name: String,
    pub nav_links: Vec<String>,
    pub cta_text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroData {
    pub headline: String,
    pub subheadline: String,
    pub cta_primary: String,
    pub cta_secondary: String,
    pub background_image_keyword: String,
    pub video_mood: String,
    #[serde(rename = "style3D")]
    pub style_3d: SceneStyle,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureItem {
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keyword: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureLayout {
    #[default]
    Grid,
    Alternating,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeaturesData {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<FeatureItem>,
    #[serde(default)]
    pub layout: FeatureLayout,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub alt: String,
    pub keyword: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryData {
    pub title: String,
    pub description: String,
    pub images: Vec<GalleryItem>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    Youtube,
    Ambient,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSectionData {
    pub title: String,
    pub description: String,
    pub video_type: VideoType,
    pub video_keyword: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialItem {
    pub quote: String,
    pub author: String,
    pub role: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsData {
    pub title: String,
    pub items: Vec<TestimonialItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterData {
    pub copyright: String,
    #[serde(default)]
    pub social_links: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteDescription {
    pub theme: Theme,
    pub font_pairing: FontPairing,
    pub color_palette: ColorPalette,
    pub header: HeaderData,
    pub hero: HeroData,
    pub features: FeaturesData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GalleryData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_section: Option<VideoSectionData>,
    pub testimonials: TestimonialsData,
    pub footer: FooterData,
}

/// Address of one independently editable value in the description.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentField {
    CompanyName,
    NavLink(usize),
    HeaderCta,
    HeroHeadline,
    HeroSubheadline,
    HeroCtaPrimary,
    HeroCtaSecondary,
    FeaturesTitle,
    FeaturesSubtitle,
    FeatureTitle(usize),
    FeatureDescription(usize),
    FeatureImage(usize),
    GalleryTitle,
    GalleryDescription,
    GalleryImage(usize),
    GalleryAlt(usize),
    VideoTitle,
    VideoDescription,
    VideoSource,
    TestimonialsTitle,
    TestimonialQuote(usize),
    TestimonialAuthor(usize),
    TestimonialRole(usize),
    FooterCopyright,
    SocialLink(usize),
    Palette(PaletteRole),
}

impl WebsiteDescription {
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> PreviewResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, field: ContentField) -> Option<&str> {
        use ContentField::*;
        let value = match field {
            CompanyName => &self.header.company_name,
            NavLink(i) => self.header.nav_links.get(i)?,
            HeaderCta => &self.header.cta_text,
            HeroHeadline => &self.hero.headline,
            HeroSubheadline => &self.hero.subheadline,
            HeroCtaPrimary => &self.hero.cta_primary,
            HeroCtaSecondary => &self.hero.cta_secondary,
            FeaturesTitle => &self.features.title,
            FeaturesSubtitle => &self.features.subtitle,
            FeatureTitle(i) => &self.features.items.get(i)?.title,
            FeatureDescription(i) => &self.features.items.get(i)?.description,
            FeatureImage(i) => return self.features.items.get(i)?.image_keyword.as_deref(),
            GalleryTitle => &self.gallery.as_ref()?.title,
            GalleryDescription => &self.gallery.as_ref()?.description,
            GalleryImage(i) => &self.gallery.as_ref()?.images.get(i)?.keyword,
            GalleryAlt(i) => &self.gallery.as_ref()?.images.get(i)?.alt,
            VideoTitle => &self.video_section.as_ref()?.title,
            VideoDescription => &self.video_section.as_ref()?.description,
            VideoSource => &self.video_section.as_ref()?.video_keyword,
            TestimonialsTitle => &self.testimonials.title,
            TestimonialQuote(i) => &self.testimonials.items.get(i)?.quote,
            TestimonialAuthor(i) => &self.testimonials.items.get(i)?.author,
            TestimonialRole(i) => &self.testimonials.items.get(i)?.role,
            FooterCopyright => &self.footer.copyright,
            SocialLink(i) => self.footer.social_links.get(i)?,
            Palette(role) => return Some(self.color_palette.get(role)),
        };
        Some(value.as_str())
    }

    /// Write `value` into `field`. Returns whether the stored value changed.
    pub fn set(&mut self, field: ContentField, value: impl Into<String>) -> PreviewResult<bool> {
        let value = value.into();
        if let ContentField::FeatureImage(i) = field {
            let item = self
                .features
                .items
                .get_mut(i)
                .ok_or_else(|| missing(field))?;
            if item.image_keyword.as_deref() == Some(value.as_str()) {
                return Ok(false);
            }
            item.image_keyword = Some(value);
            return Ok(true);
        }
        let slot = self.slot_mut(field).ok_or_else(|| missing(field))?;
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        Ok(true)
    }

    /// Switch the hero backdrop. Returns whether the style changed.
    pub fn set_style(&mut self, style: SceneStyle) -> bool {
        if self.hero.style_3d == style {
            return false;
        }
        self.hero.style_3d = style;
        true
    }

    /// CSS custom properties consumed by the static markup.
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars: Vec<(&'static str, String)> = PaletteRole::ALL
            .iter()
            .map(|role| (role.css_var(), self.color_palette.get(*role).to_string()))
            .collect();
        vars.push(("--font-head", self.font_pairing.heading.clone()));
        vars.push(("--font-body", self.font_pairing.body.clone()));
        vars
    }

    fn slot_mut(&mut self, field: ContentField) -> Option<&mut String> {
        use ContentField::*;
        Some(match field {
            CompanyName => &mut self.header.company_name,
            NavLink(i) => self.header.nav_links.get_mut(i)?,
            HeaderCta => &mut self.header.cta_text,
            HeroHeadline => &mut self.hero.headline,
            HeroSubheadline => &mut self.hero.subheadline,
            HeroCtaPrimary => &mut self.hero.cta_primary,
            HeroCtaSecondary => &mut self.hero.cta_secondary,
            FeaturesTitle => &mut self.features.title,
            FeaturesSubtitle => &mut self.features.subtitle,
            FeatureTitle(i) => &mut self.features.items.get_mut(i)?.title,
            FeatureDescription(i) => &mut self.features.items.get_mut(i)?.description,
            FeatureImage(_) => return None,
            GalleryTitle => &mut self.gallery.as_mut()?.title,
            GalleryDescription => &mut self.gallery.as_mut()?.description,
            GalleryImage(i) => &mut self.gallery.as_mut()?.images.get_mut(i)?.keyword,
            GalleryAlt(i) => &mut self.gallery.as_mut()?.images.get_mut(i)?.alt,
            VideoTitle => &mut self.video_section.as_mut()?.title,
            VideoDescription => &mut self.video_section.as_mut()?.description,
            VideoSource => &mut self.video_section.as_mut()?.video_keyword,
            TestimonialsTitle => &mut self.testimonials.title,
            TestimonialQuote(i) => &mut self.testimonials.items.get_mut(i)?.quote,
            TestimonialAuthor(i) => &mut self.testimonials.items.get_mut(i)?.author,
            TestimonialRole(i) => &mut self.testimonials.items.get_mut(i)?.role,
            FooterCopyright => &mut self.footer.copyright,
            SocialLink(i) => self.footer.social_links.get_mut(i)?,
            Palette(role) => self.color_palette.slot(role),
        })
    }
}

fn missing(field: ContentField) -> PreviewError {
    PreviewError::content(format!("no such field: {field:?}"))
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub const SAMPLE_JSON: &str = r##"{
        "theme": "cyber",
        "fontPairing": { "heading": "Space Grotesk", "body": "Inter" },
        "colorPalette": {
            "primary": "#8b5cf6", "secondary": "#0ea5e9", "background": "#0b0b12",
            "text": "#f8fafc", "accent": "#f472b6"
        },
        "header": { "companyName": "Acme Co", "navLinks": ["Home", "Work", "Contact"], "ctaText": "Start" },
        "hero": {
            "headline": "Build faster", "subheadline": "Ship sites in minutes",
            "ctaPrimary": "Get started", "ctaSecondary": "Learn more",
            "backgroundImageKeyword": "neon city", "videoMood": "tech", "style3D": "grid"
        },
        "features": {
            "title": "Why us", "subtitle": "Three reasons", "layout": "grid",
            "items": [
                { "title": "Fast", "description": "Really fast", "icon": "Zap", "imageKeyword": "rocket" },
                { "title": "Safe", "description": "Locked down", "icon": "Shield" }
            ]
        },
        "videoSection": {
            "title": "Watch", "description": "See it run", "videoType": "youtube",
            "videoKeyword": "https://youtu.be/dQw4w9WgXcQ"
        },
        "testimonials": {
            "title": "Loved by teams",
            "items": [ { "quote": "Great", "author": "Sam", "role": "CTO" } ]
        },
        "footer": { "copyright": "(c) Acme", "socialLinks": ["x", "github"] }
    }"##;
}

#[cfg(test)]
mod tests {
    use super::fixtures::SAMPLE_JSON;
    use super::*;

    #[test]
    fn parses_generated_json() {
        let site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        assert_eq!(site.theme, Theme::Cyber);
        assert_eq!(site.hero.style_3d, SceneStyle::Grid);
        assert_eq!(site.header.nav_links.len(), 3);
        assert_eq!(site.features.items[1].image_keyword, None);
        assert!(site.gallery.is_none());
        assert_eq!(
            site.video_section.as_ref().map(|v| v.video_type),
            Some(VideoType::Youtube)
        );
    }

    #[test]
    fn set_reports_changes_and_is_field_scoped() {
        let mut site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        assert!(site.set(ContentField::CompanyName, "Acme Corp").unwrap());
        assert!(!site.set(ContentField::CompanyName, "Acme Corp").unwrap());
        assert!(site.set(ContentField::NavLink(1), "Portfolio").unwrap());
        assert_eq!(site.header.nav_links, vec!["Home", "Portfolio", "Contact"]);
        assert_eq!(site.get(ContentField::CompanyName), Some("Acme Corp"));
        assert_eq!(site.hero.headline, "Build faster");
    }

    #[test]
    fn feature_image_is_created_on_write() {
        let mut site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        assert_eq!(site.get(ContentField::FeatureImage(1)), None);
        assert!(site.set(ContentField::FeatureImage(1), "padlock").unwrap());
        assert_eq!(site.get(ContentField::FeatureImage(1)), Some("padlock"));
        assert!(!site.set(ContentField::FeatureImage(1), "padlock").unwrap());
    }

    #[test]
    fn absent_sections_and_bad_indices_are_errors() {
        let mut site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        assert_eq!(site.get(ContentField::GalleryTitle), None);
        assert!(site.set(ContentField::GalleryTitle, "x").is_err());
        assert!(site.set(ContentField::NavLink(9), "x").is_err());
        assert!(site.set(ContentField::FeatureImage(9), "x").is_err());
    }

    #[test]
    fn gallery_captions_are_editable_per_image() {
        let mut site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        assert!(site.set(ContentField::GalleryAlt(0), "x").is_err());
        site.gallery = Some(GalleryData {
            title: "Work".into(),
            description: "Recent".into(),
            images: vec![
                GalleryItem { alt: "Lobby".into(), keyword: "hotel lobby".into() },
                GalleryItem { alt: "Pool".into(), keyword: "rooftop pool".into() },
            ],
        });
        assert_eq!(site.get(ContentField::GalleryAlt(1)), Some("Pool"));
        assert!(site.set(ContentField::GalleryAlt(1), "Rooftop pool at dusk").unwrap());
        assert_eq!(site.get(ContentField::GalleryAlt(1)), Some("Rooftop pool at dusk"));
        assert_eq!(site.get(ContentField::GalleryImage(1)), Some("rooftop pool"));
        assert_eq!(site.get(ContentField::GalleryAlt(0)), Some("Lobby"));
        assert!(site.set(ContentField::GalleryAlt(2), "x").is_err());
    }

    #[test]
    fn unknown_theme_falls_back_instead_of_failing() {
        let json = SAMPLE_JSON.replace("\"theme\": \"cyber\"", "\"theme\": \"retro\"");
        let site = WebsiteDescription::from_json(&json).unwrap();
        assert_eq!(site.theme, Theme::Other);
        assert_eq!(site.theme.as_str(), "other");
        assert_eq!(site.header.company_name, "Acme Co");
    }

    #[test]
    fn css_variables_cover_palette_and_fonts() {
        let site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        let vars = site.css_variables();
        let lookup = |k: &str| vars.iter().find(|(n, _)| *n == k).map(|(_, v)| v.as_str());
        assert_eq!(lookup("--primary"), Some("#8b5cf6"));
        assert_eq!(lookup("--bg"), Some("#0b0b12"));
        assert_eq!(lookup("--font-head"), Some("Space Grotesk"));
        assert_eq!(vars.len(), 7);
    }

    #[test]
    fn json_round_trip_keeps_optional_sections_absent() {
        let site = WebsiteDescription::from_json(SAMPLE_JSON).unwrap();
        let json = site.to_json().unwrap();
        assert!(!json.contains("\"gallery\""));
        assert!(json.contains("\"style3D\":\"grid\""));
        assert_eq!(WebsiteDescription::from_json(&json).unwrap(), site);
    }
}
