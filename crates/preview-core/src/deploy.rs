//! Scripted deployment log shown by the deploy modal. Nothing is deployed.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeployStage {
    #[default]
    Idle,
    Building,
    Optimizing,
    Uploading,
    Complete,
}

impl DeployStage {
    pub fn as_str(self) -> &'static str {
        match self {
            DeployStage::Idle => "idle",
            DeployStage::Building => "building",
            DeployStage::Optimizing => "optimizing",
            DeployStage::Uploading => "uploading",
            DeployStage::Complete => "complete",
        }
    }

    pub fn progress_percent(self) -> u8 {
        match self {
            DeployStage::Idle => 0,
            DeployStage::Building => 30,
            DeployStage::Optimizing => 60,
            DeployStage::Uploading => 90,
            DeployStage::Complete => 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warn,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineEntry {
    pub delay_ms: u32,
    pub message: &'static str,
    pub stage: DeployStage,
    pub level: LogLevel,
}

const fn entry(delay_ms: u32, message: &'static str, stage: DeployStage) -> TimelineEntry {
    TimelineEntry {
        delay_ms,
        message,
        stage,
        level: LogLevel::Info,
    }
}

pub const INITIAL_MESSAGE: &str = "Initializing build environment...";

/// Delays are measured from the moment the modal opens.
pub const TIMELINE: [TimelineEntry; 9] = [
    entry(800, "Resolving dependencies (React 19, Tailwind, Motion)...", DeployStage::Building),
    entry(1600, "Compiling assets...", DeployStage::Building),
    entry(2200, "Optimizing images and generating srcsets...", DeployStage::Optimizing),
    entry(2500, "Tree-shaking unused modules...", DeployStage::Optimizing),
    entry(2800, "Minifying JS/CSS bundles...", DeployStage::Optimizing),
    entry(3600, "Provisioning edge nodes (US-EAST, EU-WEST, AP-SOUTH)...", DeployStage::Uploading),
    entry(4200, "Uploading static assets to Global CDN...", DeployStage::Uploading),
    entry(4800, "Verifying SSL certificates...", DeployStage::Uploading),
    TimelineEntry {
        delay_ms: 5500,
        message: "Deployment successful!",
        stage: DeployStage::Complete,
        level: LogLevel::Success,
    },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub level: LogLevel,
    pub message: String,
}

/// One pass through [`TIMELINE`].
#[derive(Clone, Debug, Default)]
pub struct DeployRun {
    stage: DeployStage,
    logs: Vec<LogLine>,
    applied: usize,
}

impl DeployRun {
    pub fn start() -> Self {
        Self {
            stage: DeployStage::Building,
            logs: vec![LogLine {
                level: LogLevel::Info,
                message: INITIAL_MESSAGE.to_string(),
            }],
            applied: 0,
        }
    }

    pub fn stage(&self) -> DeployStage {
        self.stage
    }

    pub fn logs(&self) -> &[LogLine] {
        &self.logs
    }

    pub fn progress_percent(&self) -> u8 {
        self.stage.progress_percent()
    }

    pub fn is_complete(&self) -> bool {
        self.stage == DeployStage::Complete
    }

    /// Apply the next entry in order, if any.
    pub fn apply_next(&mut self) -> Option<&TimelineEntry> {
        if self.stage == DeployStage::Idle {
            return None;
        }
        let entry = TIMELINE.get(self.applied)?;
        self.applied += 1;
        self.stage = entry.stage;
        self.logs.push(LogLine {
            level: entry.level,
            message: entry.message.to_string(),
        });
        Some(entry)
    }

    /// Apply every entry due at `elapsed_ms`. Returns how many were applied.
    pub fn advance_to(&mut self, elapsed_ms: u32) -> usize {
        let mut n = 0;
        while TIMELINE
            .get(self.applied)
            .is_some_and(|e| e.delay_ms <= elapsed_ms)
        {
            if self.apply_next().is_none() {
                break;
            }
            n += 1;
        }
        n
    }
}

/// Public address a company would be "deployed" to.
pub fn site_url(company_name: &str) -> String {
    let slug: String = company_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
        .collect();
    format!("https://{slug}.deco.site")
}
