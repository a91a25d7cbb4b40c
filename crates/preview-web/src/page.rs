//! The generated website itself: device frame, scroll container and the
//! section markup, with every text and media node bound to its content field.

use std::cell::Cell;

use gloo::events::EventListener;
use preview_core::constants::{FRAMED_HEIGHT_VH, GALLERY_MAX_IMAGES};
use preview_core::content::{ContentField, FeatureLayout, VideoType, WebsiteDescription};
use preview_core::icons::IconId;
use preview_core::media::MediaKind;
use preview_core::scene::SceneStyle;
use preview_core::shell::ShellState;
use web_sys as web;

use crate::constants::{EDITING_CLASS, EDIT_ONLY_CLASS, REVEAL_CLASS};
use crate::dom;
use crate::editable::{OnCommit, TextBinding};
use crate::media::{MediaBinding, MediaContext};
use crate::ui::{Action, Dispatch};

/// Callbacks the page hands its bindings.
#[derive(Clone)]
pub struct PageHooks {
    pub on_commit: OnCommit,
    pub dispatch: Dispatch,
    pub media: MediaContext,
}

pub struct PageView {
    frame: web::HtmlElement,
    scroller: web::HtmlElement,
    page: web::HtmlElement,
    scene_layer: web::HtmlElement,
    logo: web::HtmlElement,
    logo_remove: web::HtmlElement,
    company: web::HtmlElement,
    editing: Cell<bool>,
    has_logo: Cell<bool>,
    style_buttons: Vec<(SceneStyle, web::HtmlElement)>,
    edit_only: Vec<web::HtmlElement>,
    texts: Vec<TextBinding>,
    media: Vec<MediaBinding>,
    reveal: Vec<web::Element>,
    _listeners: Vec<EventListener>,
}

struct Builder<'a> {
    document: &'a web::Document,
    site: &'a WebsiteDescription,
    hooks: &'a PageHooks,
    edit_only: Vec<web::HtmlElement>,
    texts: Vec<TextBinding>,
    media: Vec<MediaBinding>,
    reveal: Vec<web::Element>,
    listeners: Vec<EventListener>,
}

impl<'a> Builder<'a> {
    fn text(
        &mut self,
        parent: &web::Element,
        tag: &str,
        class: &str,
        field: ContentField,
    ) -> anyhow::Result<web::HtmlElement> {
        let node = dom::el(self.document, tag, class)?;
        let value = self.site.get(field).unwrap_or_default();
        self.texts
            .push(TextBinding::bind(node.clone(), field, value, self.hooks.on_commit.clone()));
        dom::append(parent, &node);
        Ok(node)
    }

    fn media(
        &mut self,
        parent: &web::Element,
        kind: MediaKind,
        field: ContentField,
        alt: &str,
    ) -> anyhow::Result<()> {
        let keyword = self.site.get(field).unwrap_or_default();
        let binding =
            MediaBinding::mount(self.document, kind, field, keyword, alt, self.hooks.media.clone())?;
        dom::append(parent, binding.element());
        self.edit_only.push(binding.controls().clone());
        self.media.push(binding);
        Ok(())
    }

    fn section(&mut self, parent: &web::Element, class: &str) -> anyhow::Result<web::HtmlElement> {
        let section = dom::el(self.document, "section", &format!("{class} {REVEAL_CLASS}"))?;
        dom::append(parent, &section);
        self.reveal.push(section.clone().into());
        Ok(section)
    }
}

impl PageView {
    pub fn build(
        document: &web::Document,
        stage: &web::Element,
        shell: &ShellState,
        hooks: &PageHooks,
    ) -> anyhow::Result<Self> {
        let site = shell.site();
        let frame = dom::el(
            document,
            "div",
            &format!("device-frame device-{}", shell.device().as_str()),
        )?;
        match shell.container_width_px() {
            Some(w) => dom::set_style(&frame, "max-width", &format!("{w}px")),
            None => dom::set_style(&frame, "width", "100%"),
        }
        if shell.is_framed() {
            dom::set_class(&frame, "is-framed", true);
            dom::set_style(&frame, "height", &format!("{FRAMED_HEIGHT_VH}vh"));
        } else {
            dom::set_style(&frame, "height", "100%");
        }
        let scroller = dom::el(document, "div", "page-scroll")?;
        let _ = scroller.set_attribute("style", "overflow-y:auto;height:100%;position:relative");
        dom::set_css_variables(&scroller, &shell.css_variables());
        let page = dom::el(
            document,
            "div",
            &format!("preview-page theme-{}", site.theme.as_str()),
        )?;
        dom::append(&frame, &scroller);
        dom::append(&scroller, &page);

        let mut b = Builder {
            document,
            site,
            hooks,
            edit_only: Vec::new(),
            texts: Vec::new(),
            media: Vec::new(),
            reveal: Vec::new(),
            listeners: Vec::new(),
        };

        let (logo, logo_remove, company) = nav(&mut b, &page, shell.logo_src())?;
        let (scene_layer, style_buttons) = hero(&mut b, &page)?;
        features(&mut b, &page)?;
        if let Some(video) = &site.video_section {
            let section = b.section(&page, "video-section")?;
            b.text(&section, "h2", "section-title", ContentField::VideoTitle)?;
            b.text(&section, "p", "section-subtitle", ContentField::VideoDescription)?;
            let kind = match video.video_type {
                VideoType::Youtube => MediaKind::Embed,
                VideoType::Ambient => MediaKind::Video,
            };
            b.media(&section, kind, ContentField::VideoSource, &video.title)?;
        }
        if let Some(gallery) = &site.gallery {
            let section = b.section(&page, "gallery")?;
            b.text(&section, "h2", "section-title", ContentField::GalleryTitle)?;
            b.text(&section, "p", "section-subtitle", ContentField::GalleryDescription)?;
            let grid = dom::el(document, "div", "gallery-grid")?;
            dom::append(&section, &grid);
            for (i, image) in gallery.images.iter().take(GALLERY_MAX_IMAGES).enumerate() {
                let figure = dom::el(document, "figure", "gallery-item")?;
                dom::append(&grid, &figure);
                b.media(&figure, MediaKind::Image, ContentField::GalleryImage(i), &image.alt)?;
                b.text(&figure, "p", "gallery-caption", ContentField::GalleryAlt(i))?;
            }
        }
        testimonials(&mut b, &page)?;
        footer(&mut b, &page)?;

        dom::append(stage, &frame);
        let Builder {
            edit_only,
            texts,
            media,
            reveal,
            listeners,
            ..
        } = b;
        let view = Self {
            frame,
            scroller,
            page,
            scene_layer,
            logo,
            logo_remove,
            company,
            editing: Cell::new(false),
            has_logo: Cell::new(shell.logo_src().is_some()),
            style_buttons,
            edit_only,
            texts,
            media,
            reveal,
            _listeners: listeners,
        };
        view.set_editing(shell.is_editing());
        view.set_active_style(site.hero.style_3d);
        Ok(view)
    }

    pub fn scroller(&self) -> &web::HtmlElement {
        &self.scroller
    }

    pub fn scene_layer(&self) -> &web::HtmlElement {
        &self.scene_layer
    }

    pub fn reveal_targets(&self) -> Vec<web::Element> {
        self.reveal.clone()
    }

    pub fn set_editing(&self, editing: bool) {
        self.editing.set(editing);
        self.show_logo_remove();
        dom::set_class(&self.page, EDITING_CLASS, editing);
        for node in &self.edit_only {
            dom::set_hidden(node, !editing);
        }
        for text in &self.texts {
            text.set_editing(editing);
        }
    }

    pub fn set_active_style(&self, style: SceneStyle) {
        for (s, button) in &self.style_buttons {
            dom::set_class(button, "is-active", *s == style);
        }
    }

    pub fn set_logo(&self, src: Option<&str>) {
        match src {
            Some(src) => {
                let _ = self.logo.set_attribute("src", src);
                dom::set_hidden(&self.logo, false);
                dom::set_hidden(&self.company, true);
            }
            None => {
                let _ = self.logo.remove_attribute("src");
                dom::set_hidden(&self.logo, true);
                dom::set_hidden(&self.company, false);
            }
        }
        self.has_logo.set(src.is_some());
        self.show_logo_remove();
    }

    fn show_logo_remove(&self) {
        dom::set_hidden(&self.logo_remove, !(self.editing.get() && self.has_logo.get()));
    }

    pub fn set_css_variables(&self, vars: &[(&'static str, String)]) {
        dom::set_css_variables(&self.scroller, vars);
    }

    /// Follow stored values that changed outside the node being edited.
    pub fn sync(&self, site: &WebsiteDescription) {
        for text in &self.texts {
            text.sync(site);
        }
        for media in &self.media {
            media.sync(site);
        }
    }
}

impl Drop for PageView {
    fn drop(&mut self) {
        self.frame.remove();
    }
}

fn nav(
    b: &mut Builder<'_>,
    page: &web::Element,
    logo_src: Option<&str>,
) -> anyhow::Result<(web::HtmlElement, web::HtmlElement, web::HtmlElement)> {
    let nav = dom::el(b.document, "nav", "site-nav")?;
    let _ = nav.set_attribute("style", "position:sticky;top:0;z-index:10");
    dom::append(page, &nav);
    let brand = dom::el(b.document, "div", "brand")?;
    dom::append(&nav, &brand);
    let logo = dom::el(b.document, "img", "brand-logo")?;
    let _ = logo.set_attribute("alt", &b.site.header.company_name);
    dom::append(&brand, &logo);
    let remove = dom::icon_button(b.document, "brand-logo-remove", &IconId::X.svg("icon"), "")?;
    let _ = remove.set_attribute("title", "Remove Logo");
    dom::set_hidden(&remove, true);
    dom::append(&brand, &remove);
    let dispatch = b.hooks.dispatch.clone();
    b.listeners
        .push(EventListener::new(&remove, "click", move |_| dispatch(Action::ClearLogo)));
    let company = b.text(&brand, "span", "brand-name", ContentField::CompanyName)?;
    match logo_src {
        Some(src) => {
            let _ = logo.set_attribute("src", src);
            dom::set_hidden(&company, true);
        }
        None => dom::set_hidden(&logo, true),
    }

    let links = dom::el(b.document, "div", "nav-links")?;
    dom::append(&nav, &links);
    for i in 0..b.site.header.nav_links.len() {
        b.text(&links, "a", "nav-link", ContentField::NavLink(i))?;
    }
    b.text(&nav, "button", "nav-cta", ContentField::HeaderCta)?;
    Ok((logo, remove, company))
}

type StyleButtons = Vec<(SceneStyle, web::HtmlElement)>;

fn hero(b: &mut Builder<'_>, page: &web::Element) -> anyhow::Result<(web::HtmlElement, StyleButtons)> {
    let hero = dom::el(b.document, "section", "hero")?;
    let _ = hero.set_attribute("style", "position:relative;min-height:100%;overflow:hidden");
    dom::append(page, &hero);

    let scene_layer = dom::el(b.document, "div", "hero-scene")?;
    let _ = scene_layer.set_attribute("style", "position:absolute;inset:0;pointer-events:none");
    dom::append(&hero, &scene_layer);

    let content = dom::el(b.document, "div", "hero-content")?;
    let _ = content.set_attribute("style", "position:relative");
    dom::append(&hero, &content);
    b.text(&content, "h1", "hero-headline", ContentField::HeroHeadline)?;
    b.text(&content, "p", "hero-subheadline", ContentField::HeroSubheadline)?;
    let actions = dom::el(b.document, "div", "hero-actions")?;
    dom::append(&content, &actions);
    b.text(&actions, "a", "btn btn-primary", ContentField::HeroCtaPrimary)?;
    b.text(&actions, "a", "btn btn-secondary", ContentField::HeroCtaSecondary)?;

    let picker = dom::el(b.document, "div", &format!("style-picker {EDIT_ONLY_CLASS}"))?;
    dom::append(&hero, &picker);
    b.edit_only.push(picker.clone());
    let mut buttons = Vec::with_capacity(SceneStyle::PICKER.len());
    for style in SceneStyle::PICKER {
        let button = dom::text_el(b.document, "button", "style-option", style.as_str())?;
        let _ = button.set_attribute("type", "button");
        dom::append(&picker, &button);
        let dispatch = b.hooks.dispatch.clone();
        b.listeners.push(EventListener::new(&button, "click", move |_| {
            dispatch(Action::Style(style))
        }));
        buttons.push((style, button));
    }
    Ok((scene_layer, buttons))
}

fn features(b: &mut Builder<'_>, page: &web::Element) -> anyhow::Result<()> {
    let section = b.section(page, "features")?;
    b.text(&section, "h2", "section-title", ContentField::FeaturesTitle)?;
    b.text(&section, "p", "section-subtitle", ContentField::FeaturesSubtitle)?;
    let site = b.site;
    let layout = match site.features.layout {
        FeatureLayout::Grid => "layout-grid",
        FeatureLayout::Alternating => "layout-alternating",
    };
    let list = dom::el(b.document, "div", &format!("feature-list {layout}"))?;
    dom::append(&section, &list);

    for (i, item) in site.features.items.iter().enumerate() {
        let card = dom::el(b.document, "article", "feature")?;
        dom::append(&list, &card);
        let icon = dom::el(b.document, "div", "feature-icon")?;
        icon.set_inner_html(&IconId::from_name(&item.icon).svg("icon"));
        dom::append(&card, &icon);
        b.media(&card, MediaKind::Image, ContentField::FeatureImage(i), &item.title)?;
        b.text(&card, "h3", "feature-title", ContentField::FeatureTitle(i))?;
        b.text(&card, "p", "feature-description", ContentField::FeatureDescription(i))?;
    }
    Ok(())
}

fn testimonials(b: &mut Builder<'_>, page: &web::Element) -> anyhow::Result<()> {
    let section = b.section(page, "testimonials")?;
    b.text(&section, "h2", "section-title", ContentField::TestimonialsTitle)?;
    let list = dom::el(b.document, "div", "testimonial-list")?;
    dom::append(&section, &list);
    for i in 0..b.site.testimonials.items.len() {
        let quote = dom::el(b.document, "blockquote", "testimonial")?;
        dom::append(&list, &quote);
        b.text(&quote, "p", "testimonial-quote", ContentField::TestimonialQuote(i))?;
        let cite = dom::el(b.document, "footer", "testimonial-cite")?;
        dom::append(&quote, &cite);
        b.text(&cite, "span", "testimonial-author", ContentField::TestimonialAuthor(i))?;
        b.text(&cite, "span", "testimonial-role", ContentField::TestimonialRole(i))?;
    }
    Ok(())
}

fn footer(b: &mut Builder<'_>, page: &web::Element) -> anyhow::Result<()> {
    let footer = dom::el(b.document, "footer", "site-footer")?;
    dom::append(page, &footer);
    b.text(&footer, "p", "footer-copyright", ContentField::FooterCopyright)?;
    let social = dom::el(b.document, "div", "footer-social")?;
    dom::append(&footer, &social);
    for i in 0..b.site.footer.social_links.len() {
        b.text(&social, "a", "social-link", ContentField::SocialLink(i))?;
    }
    Ok(())
}
