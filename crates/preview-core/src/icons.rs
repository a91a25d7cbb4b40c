//! Closed icon set. Feature items name their icon in Lucide style; anything
//! outside this set renders as [`IconId::Star`].

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconId {
    Star,
    Zap,
    Heart,
    Shield,
    Globe,
    Clock,
    Check,
    Users,
    Sparkles,
    Rocket,
    Leaf,
    Coffee,
    Camera,
    Award,
    TrendingUp,
    MapPin,
    // chrome
    Monitor,
    Tablet,
    Smartphone,
    Palette,
    Pencil,
    Save,
    ArrowLeft,
    X,
    Upload,
    Wand,
    Loader,
    Youtube,
    Terminal,
    CheckCircle,
    ExternalLink,
    Copy,
}

impl IconId {
    /// Content icons the generator may pick from.
    pub const CONTENT: [IconId; 16] = [
        IconId::Star,
        IconId::Zap,
        IconId::Heart,
        IconId::Shield,
        IconId::Globe,
        IconId::Clock,
        IconId::Check,
        IconId::Users,
        IconId::Sparkles,
        IconId::Rocket,
        IconId::Leaf,
        IconId::Coffee,
        IconId::Camera,
        IconId::Award,
        IconId::TrendingUp,
        IconId::MapPin,
    ];

    /// Accepts `ShieldCheck`, `shield-check` and `shield_check` spellings.
    pub fn from_name(name: &str) -> Self {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "star" => IconId::Star,
            "zap" | "bolt" | "lightning" => IconId::Zap,
            "heart" => IconId::Heart,
            "shield" | "shieldcheck" => IconId::Shield,
            "globe" | "globe2" => IconId::Globe,
            "clock" | "timer" => IconId::Clock,
            "check" | "checkcheck" => IconId::Check,
            "users" | "user" | "users2" => IconId::Users,
            "sparkles" | "sparkle" => IconId::Sparkles,
            "rocket" => IconId::Rocket,
            "leaf" | "sprout" => IconId::Leaf,
            "coffee" | "cup" => IconId::Coffee,
            "camera" => IconId::Camera,
            "award" | "trophy" | "medal" => IconId::Award,
            "trendingup" | "chart" | "barchart" => IconId::TrendingUp,
            "mappin" | "map" | "location" => IconId::MapPin,
            "monitor" => IconId::Monitor,
            "tablet" => IconId::Tablet,
            "smartphone" | "phone" => IconId::Smartphone,
            "palette" => IconId::Palette,
            "pencil" | "edit" | "edit3" => IconId::Pencil,
            "save" => IconId::Save,
            "arrowleft" => IconId::ArrowLeft,
            "x" | "close" => IconId::X,
            "upload" => IconId::Upload,
            "wand" | "wand2" => IconId::Wand,
            "loader" => IconId::Loader,
            "youtube" => IconId::Youtube,
            "terminal" => IconId::Terminal,
            "checkcircle" | "checkcircle2" => IconId::CheckCircle,
            "externallink" => IconId::ExternalLink,
            "copy" => IconId::Copy,
            _ => IconId::Star,
        }
    }

    fn body(self) -> &'static str {
        match self {
            IconId::Star => r#"<polygon points="12 2 15.09 8.26 22 9.27 17 14.14 18.18 21.02 12 17.77 5.82 21.02 7 14.14 2 9.27 8.91 8.26 12 2"/>"#,
            IconId::Zap => r#"<polygon points="13 2 3 14 12 14 11 22 21 10 12 10 13 2"/>"#,
            IconId::Heart => r#"<path d="M19 14c1.49-1.46 3-3.21 3-5.5A5.5 5.5 0 0 0 16.5 3c-1.76 0-3 .5-4.5 2-1.5-1.5-2.74-2-4.5-2A5.5 5.5 0 0 0 2 8.5c0 2.3 1.5 4.05 3 5.5l7 7Z"/>"#,
            IconId::Shield => r#"<path d="M12 22s8-4 8-10V5l-8-3-8 3v7c0 6 8 10 8 10z"/>"#,
            IconId::Globe => r#"<circle cx="12" cy="12" r="10"/><path d="M12 2a14.5 14.5 0 0 0 0 20 14.5 14.5 0 0 0 0-20"/><path d="M2 12h20"/>"#,
            IconId::Clock => r#"<circle cx="12" cy="12" r="10"/><polyline points="12 6 12 12 16 14"/>"#,
            IconId::Check => r#"<path d="M20 6 9 17l-5-5"/>"#,
            IconId::Users => r#"<path d="M16 21v-2a4 4 0 0 0-4-4H6a4 4 0 0 0-4 4v2"/><circle cx="9" cy="7" r="4"/><path d="M22 21v-2a4 4 0 0 0-3-3.87"/><path d="M16 3.13a4 4 0 0 1 0 7.75"/>"#,
            IconId::Sparkles => r#"<path d="m12 3-1.9 5.8a2 2 0 0 1-1.3 1.3L3 12l5.8 1.9a2 2 0 0 1 1.3 1.3L12 21l1.9-5.8a2 2 0 0 1 1.3-1.3L21 12l-5.8-1.9a2 2 0 0 1-1.3-1.3Z"/>"#,
            IconId::Rocket => r#"<path d="M4.5 16.5c-1.5 1.26-2 5-2 5s3.74-.5 5-2c.71-.84.7-2.13-.09-2.91a2.18 2.18 0 0 0-2.91-.09z"/><path d="m12 15-3-3a22 22 0 0 1 2-3.95A12.88 12.88 0 0 1 22 2c0 2.72-.78 7.5-6 11a22.35 22.35 0 0 1-4 2z"/>"#,
            IconId::Leaf => r#"<path d="M11 20A7 7 0 0 1 9.8 6.1C15.5 5 17 4.48 19 2c1 2 2 4.18 2 8 0 5.5-4.78 10-10 10Z"/><path d="M2 21c0-3 1.85-5.36 5.08-6"/>"#,
            IconId::Coffee => r#"<path d="M17 8h1a4 4 0 1 1 0 8h-1"/><path d="M3 8h14v9a4 4 0 0 1-4 4H7a4 4 0 0 1-4-4Z"/><line x1="6" x2="6" y1="2" y2="4"/><line x1="10" x2="10" y1="2" y2="4"/><line x1="14" x2="14" y1="2" y2="4"/>"#,
            IconId::Camera => r#"<path d="M14.5 4h-5L7 7H4a2 2 0 0 0-2 2v9a2 2 0 0 0 2 2h16a2 2 0 0 0 2-2V9a2 2 0 0 0-2-2h-3l-2.5-3z"/><circle cx="12" cy="13" r="3"/>"#,
            IconId::Award => r#"<circle cx="12" cy="8" r="6"/><path d="M15.477 12.89 17 22l-5-3-5 3 1.523-9.11"/>"#,
            IconId::TrendingUp => r#"<polyline points="22 7 13.5 15.5 8.5 10.5 2 17"/><polyline points="16 7 22 7 22 13"/>"#,
            IconId::MapPin => r#"<path d="M20 10c0 6-8 12-8 12s-8-6-8-12a8 8 0 0 1 16 0Z"/><circle cx="12" cy="10" r="3"/>"#,
            IconId::Monitor => r#"<rect width="20" height="14" x="2" y="3" rx="2"/><line x1="8" x2="16" y1="21" y2="21"/><line x1="12" x2="12" y1="17" y2="21"/>"#,
            IconId::Tablet => r#"<rect width="16" height="20" x="4" y="2" rx="2" ry="2"/><line x1="12" x2="12.01" y1="18" y2="18"/>"#,
            IconId::Smartphone => r#"<rect width="14" height="20" x="5" y="2" rx="2" ry="2"/><path d="M12 18h.01"/>"#,
            IconId::Palette => r#"<circle cx="13.5" cy="6.5" r=".5"/><circle cx="17.5" cy="10.5" r=".5"/><circle cx="8.5" cy="7.5" r=".5"/><circle cx="6.5" cy="12.5" r=".5"/><path d="M12 2C6.5 2 2 6.5 2 12s4.5 10 10 10c.926 0 1.648-.746 1.648-1.688 0-.437-.18-.835-.437-1.125-.29-.289-.438-.652-.438-1.125a1.64 1.64 0 0 1 1.668-1.668h1.996c3.051 0 5.555-2.503 5.555-5.554C21.965 6.012 17.461 2 12 2z"/>"#,
            IconId::Pencil => r#"<path d="M17 3a2.85 2.83 0 1 1 4 4L7.5 20.5 2 22l1.5-5.5Z"/><path d="m15 5 4 4"/>"#,
            IconId::Save => r#"<path d="M19 21H5a2 2 0 0 1-2-2V5a2 2 0 0 1 2-2h11l5 5v11a2 2 0 0 1-2 2z"/><polyline points="17 21 17 13 7 13 7 21"/><polyline points="7 3 7 8 15 8"/>"#,
            IconId::ArrowLeft => r#"<path d="m12 19-7-7 7-7"/><path d="M19 12H5"/>"#,
            IconId::X => r#"<path d="M18 6 6 18"/><path d="m6 6 12 12"/>"#,
            IconId::Upload => r#"<path d="M21 15v4a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2v-4"/><polyline points="17 8 12 3 7 8"/><line x1="12" x2="12" y1="3" y2="15"/>"#,
            IconId::Wand => r#"<path d="m21.64 3.64-1.28-1.28a1.21 1.21 0 0 0-1.72 0L2.36 18.64a1.21 1.21 0 0 0 0 1.72l1.28 1.28a1.2 1.2 0 0 0 1.72 0L21.64 5.36a1.2 1.2 0 0 0 0-1.72Z"/><path d="m14 7 3 3"/>"#,
            IconId::Loader => r#"<path d="M21 12a9 9 0 1 1-6.219-8.56"/>"#,
            IconId::Youtube => r#"<path d="M2.5 17a24.12 24.12 0 0 1 0-10 2 2 0 0 1 1.4-1.4 49.56 49.56 0 0 1 16.2 0A2 2 0 0 1 21.5 7a24.12 24.12 0 0 1 0 10 2 2 0 0 1-1.4 1.4 49.55 49.55 0 0 1-16.2 0A2 2 0 0 1 2.5 17"/><path d="m10 15 5-3-5-3z"/>"#,
            IconId::Terminal => r#"<polyline points="4 17 10 11 4 5"/><line x1="12" x2="20" y1="19" y2="19"/>"#,
            IconId::CheckCircle => r#"<circle cx="12" cy="12" r="10"/><path d="m9 12 2 2 4-4"/>"#,
            IconId::ExternalLink => r#"<path d="M15 3h6v6"/><path d="M10 14 21 3"/><path d="M18 13v6a2 2 0 0 1-2 2H5a2 2 0 0 1-2-2V8a2 2 0 0 1 2-2h6"/>"#,
            IconId::Copy => r#"<rect width="14" height="14" x="8" y="8" rx="2" ry="2"/><path d="M4 16c-1.1 0-2-.9-2-2V4c0-1.1.9-2 2-2h10c1.1 0 2 .9 2 2"/>"#,
        }
    }

    /// Inline SVG markup, stroked with `currentColor`.
    pub fn svg(self, class: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="{class}">{}</svg>"#,
            self.body()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_spellings_collapse() {
        assert_eq!(IconId::from_name("ShieldCheck"), IconId::Shield);
        assert_eq!(IconId::from_name("shield-check"), IconId::Shield);
        assert_eq!(IconId::from_name("TRENDING_UP"), IconId::TrendingUp);
    }

    #[test]
    fn unknown_names_fall_back_to_star() {
        assert_eq!(IconId::from_name("Kangaroo"), IconId::Star);
        assert_eq!(IconId::from_name(""), IconId::Star);
    }

    #[test]
    fn every_content_icon_renders() {
        for id in IconId::CONTENT {
            let svg = id.svg("w-6 h-6");
            assert!(svg.starts_with("<svg") && svg.ends_with("</svg>"), "{id:?}");
            assert!(svg.contains(r#"class="w-6 h-6""#));
        }
    }
}
