//! Preview shell state: the single mutable website description plus the
//! view modes around it (edit, device frame, live).

use crate::constants::{MOBILE_WIDTH_PX, SAVE_DELAY_MS, TABLET_WIDTH_PX};
use crate::content::{ContentField, PaletteRole, WebsiteDescription};
use crate::error::PreviewResult;
use crate::icons::IconId;
use crate::scene::{SceneKey, SceneStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DeviceFrame {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl DeviceFrame {
    pub const ALL: [DeviceFrame; 3] = [DeviceFrame::Desktop, DeviceFrame::Tablet, DeviceFrame::Mobile];

    /// `None` means the frame fills the available width.
    pub fn max_width_px(self) -> Option<u32> {
        match self {
            DeviceFrame::Desktop => None,
            DeviceFrame::Tablet => Some(TABLET_WIDTH_PX),
            DeviceFrame::Mobile => Some(MOBILE_WIDTH_PX),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeviceFrame::Desktop => "desktop",
            DeviceFrame::Tablet => "tablet",
            DeviceFrame::Mobile => "mobile",
        }
    }

    pub fn icon(self) -> IconId {
        match self {
            DeviceFrame::Desktop => IconId::Monitor,
            DeviceFrame::Tablet => IconId::Tablet,
            DeviceFrame::Mobile => IconId::Smartphone,
        }
    }
}

/// Palette roles exposed in the theme panel.
pub const THEME_PANEL_ROLES: [PaletteRole; 4] = [
    PaletteRole::Primary,
    PaletteRole::Secondary,
    PaletteRole::Background,
    PaletteRole::Text,
];

/// Returned by [`ShellState::request_save`]; redeemed after the save delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaveTicket {
    revision: u64,
    pub delay_ms: u32,
}

/// Everything that decides the page's container geometry. A change here
/// means the scroll container and scene are rebuilt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutKey {
    pub device: DeviceFrame,
    pub live: bool,
}

#[derive(Clone, Debug)]
pub struct ShellState {
    site: WebsiteDescription,
    revision: u64,
    is_saved: bool,
    editing: bool,
    device: DeviceFrame,
    live: bool,
    theme_panel_open: bool,
    deploy_open: bool,
    logo_src: Option<String>,
}

impl ShellState {
    /// Every session opens on the orb backdrop.
    pub fn new(mut site: WebsiteDescription) -> Self {
        site.set_style(SceneStyle::Orb);
        Self {
            site,
            revision: 0,
            is_saved: true,
            editing: false,
            device: DeviceFrame::Desktop,
            live: false,
            theme_panel_open: false,
            deploy_open: false,
            logo_src: None,
        }
    }

    pub fn site(&self) -> &WebsiteDescription {
        &self.site
    }

    pub fn is_saved(&self) -> bool {
        self.is_saved
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn device(&self) -> DeviceFrame {
        self.device
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn theme_panel_open(&self) -> bool {
        self.theme_panel_open
    }

    /// The panel only shows over the editor; the open flag survives toggling edit mode.
    pub fn theme_panel_visible(&self) -> bool {
        self.theme_panel_open && self.editing && !self.live
    }

    pub fn deploy_open(&self) -> bool {
        self.deploy_open
    }

    pub fn logo_src(&self) -> Option<&str> {
        self.logo_src.as_deref()
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.is_saved = false;
    }

    /// Write one field. Only a real change marks the session unsaved.
    pub fn update(&mut self, field: ContentField, value: impl Into<String>) -> PreviewResult<bool> {
        let changed = self.site.set(field, value)?;
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    pub fn set_color(&mut self, role: PaletteRole, value: &str) -> PreviewResult<bool> {
        self.update(ContentField::Palette(role), value)
    }

    pub fn set_style(&mut self, style: SceneStyle) -> bool {
        let changed = self.site.set_style(style);
        if changed {
            self.touch();
        }
        changed
    }

    /// An uploaded logo replaces the company name in the nav. Returns the
    /// object URL it displaced so the caller can release it.
    pub fn set_logo(&mut self, object_url: impl Into<String>) -> Option<String> {
        let previous = self.logo_src.replace(object_url.into());
        self.touch();
        previous
    }

    /// Back to the company name. Returns the removed object URL, if any.
    pub fn clear_logo(&mut self) -> Option<String> {
        let removed = self.logo_src.take();
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    pub fn request_save(&self) -> SaveTicket {
        SaveTicket {
            revision: self.revision,
            delay_ms: SAVE_DELAY_MS,
        }
    }

    /// Finish a save. Edits made while it was pending keep the session dirty.
    pub fn complete_save(&mut self, ticket: SaveTicket) -> bool {
        if ticket.revision != self.revision {
            return false;
        }
        self.is_saved = true;
        true
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing && !self.live;
    }

    pub fn toggle_editing(&mut self) {
        self.set_editing(!self.editing);
    }

    pub fn set_device(&mut self, device: DeviceFrame) -> bool {
        if self.device == device {
            return false;
        }
        self.device = device;
        true
    }

    pub fn toggle_theme_panel(&mut self) {
        self.theme_panel_open = !self.theme_panel_open;
    }

    pub fn open_deploy(&mut self) {
        self.deploy_open = true;
    }

    pub fn close_deploy(&mut self) {
        self.deploy_open = false;
    }

    /// Visit the deployed site: no chrome, no editing, full width.
    pub fn enter_live(&mut self) {
        self.deploy_open = false;
        self.theme_panel_open = false;
        self.live = true;
        self.editing = false;
        self.device = DeviceFrame::Desktop;
    }

    pub fn exit_live(&mut self) {
        self.live = false;
    }

    pub fn layout_key(&self) -> LayoutKey {
        LayoutKey {
            device: self.device,
            live: self.live,
        }
    }

    /// Max width of the preview frame in CSS pixels; `None` fills the view.
    pub fn container_width_px(&self) -> Option<u32> {
        if self.live {
            return None;
        }
        self.device.max_width_px()
    }

    /// Narrow device frames are drawn as a bordered, fixed-height phone or tablet.
    pub fn is_framed(&self) -> bool {
        !self.live && self.device != DeviceFrame::Desktop
    }

    pub fn scene_key(&self) -> SceneKey {
        SceneKey {
            style: self.site.hero.style_3d,
            primary: self.site.color_palette.primary.clone(),
        }
    }

    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        self.site.css_variables()
    }
}
