pub mod report;

pub use report::{render_report, ReportView};

use crate::model::{Language, Status};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentColor {
    Emerald,
    Amber,
    Rose,
}

impl AccentColor {
    /// ANSI foreground escape for terminal rendering.
    pub fn ansi(&self) -> &'static str {
        match self {
            AccentColor::Emerald => "\x1b[32m",
            AccentColor::Amber => "\x1b[33m",
            AccentColor::Rose => "\x1b[31m",
        }
    }
}

/// How a verdict is shown: label, icon glyph and accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDisplay {
    label_en: &'static str,
    label_ar: &'static str,
    pub icon: &'static str,
    pub color: AccentColor,
}

impl StatusDisplay {
    pub fn label(&self, language: Language) -> &'static str {
        match language {
            Language::Ar => self.label_ar,
            Language::En => self.label_en,
        }
    }
}

const SAFE: StatusDisplay = StatusDisplay {
    label_en: "Safe / Real",
    label_ar: "آمن / حقيقي",
    icon: "✔",
    color: AccentColor::Emerald,
};

const WARNING: StatusDisplay = StatusDisplay {
    label_en: "Uncertain / Verify",
    label_ar: "غير مؤكد / تدقيق",
    icon: "⚠",
    color: AccentColor::Amber,
};

const DANGER: StatusDisplay = StatusDisplay {
    label_en: "Fake / Danger",
    label_ar: "مزيف / خطر",
    icon: "✖",
    color: AccentColor::Rose,
};

/// Display tuple for `status`; anything unrecognized gets the warning one.
pub fn status_display(status: &Status) -> StatusDisplay {
    match status {
        Status::Safe => SAFE,
        Status::Danger => DANGER,
        Status::Warning | Status::Other(_) => WARNING,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        assert_eq!(status_display(&Status::Safe).color, AccentColor::Emerald);
        assert_eq!(status_display(&Status::Warning).color, AccentColor::Amber);
        assert_eq!(status_display(&Status::Danger).color, AccentColor::Rose);
        assert_eq!(status_display(&Status::Danger).label(Language::En), "Fake / Danger");
        assert_eq!(status_display(&Status::Safe).label(Language::Ar), "آمن / حقيقي");
    }

    #[test]
    fn test_unknown_status_falls_back_to_warning() {
        let display = status_display(&Status::Other("unknown".to_string()));
        assert_eq!(display, status_display(&Status::Warning));
        assert_eq!(display.label(Language::En), "Uncertain / Verify");

        assert_eq!(status_display(&Status::default()), WARNING);
    }
}
