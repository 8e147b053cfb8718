/// Plain-text rendering of an analysis result

use std::fmt::Write;

use super::status_display;
use crate::model::{AnalysisResult, Language};

const BAR_CELLS: usize = 20;
const ANSI_RESET: &str = "\x1b[0m";

struct Headings {
    title: &'static str,
    judgment: &'static str,
    confidence: &'static str,
    report: &'static str,
    sources: &'static str,
    disclaimer: &'static str,
}

const EN: Headings = Headings {
    title: "Analysis Results",
    judgment: "Final Judgment",
    confidence: "Confidence Indicator",
    report: "Detailed Report",
    sources: "Reference Sources",
    disclaimer: "Disclaimer: This analysis is based on AI models and statistical predictions. Please consult experts or doctors in critical cases.",
};

const AR: Headings = Headings {
    title: "نتائج التحليل",
    judgment: "الحكم النهائي",
    confidence: "مؤشر الثقة",
    report: "التقرير المفصل",
    sources: "المصادر المرجعية",
    disclaimer: "إخلاء مسؤولية: هذا التحليل يعتمد على نماذج ذكاء اصطناعي وتوقعات إحصائية، ويجب استشارة الخبراء أو الأطباء في الحالات الحرجة.",
};

fn headings(language: Language) -> &'static Headings {
    match language {
        Language::Ar => &AR,
        Language::En => &EN,
    }
}

pub struct ReportView<'a> {
    result: &'a AnalysisResult,
    language: Language,
    ansi: bool,
}

impl<'a> ReportView<'a> {
    pub fn new(result: &'a AnalysisResult, language: Language) -> Self {
        Self {
            result,
            language,
            ansi: false,
        }
    }

    /// Color the verdict and bar with ANSI escapes.
    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    /// Bar width as a percentage, clamped to [0, 100].
    pub fn confidence_width(&self) -> f64 {
        let value = self.result.confidence;
        if value.is_nan() {
            0.0
        } else {
            value.clamp(0.0, 100.0)
        }
    }

    pub fn confidence_bar(&self) -> String {
        let filled = ((self.confidence_width() / 100.0) * BAR_CELLS as f64).round() as usize;
        let mut bar = "█".repeat(filled);
        bar.push_str(&"░".repeat(BAR_CELLS - filled));
        bar
    }

    fn confidence_label(&self) -> String {
        let value = self.result.confidence;
        if value.fract() == 0.0 {
            format!("{}%", value as i64)
        } else {
            format!("{:.1}%", value)
        }
    }

    fn paint(&self, text: &str) -> String {
        if self.ansi {
            let color = status_display(&self.result.status).color;
            format!("{}{}{}", color.ansi(), text, ANSI_RESET)
        } else {
            text.to_string()
        }
    }

    pub fn render(&self) -> String {
        let h = headings(self.language);
        let display = status_display(&self.result.status);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}: {}", h.title, self.result.tool.title(self.language));
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", h.judgment);
        let _ = writeln!(
            out,
            "  {}",
            self.paint(&format!(
                "{} {} ({})",
                display.icon,
                self.result.judgment,
                display.label(self.language)
            ))
        );
        let _ = writeln!(out);

        let _ = writeln!(out, "{}: {}", h.confidence, self.confidence_label());
        let _ = writeln!(out, "  {}", self.paint(&self.confidence_bar()));
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", h.report);
        for line in self.result.explanation.lines() {
            let _ = writeln!(out, "  {}", line);
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "{}", h.disclaimer);

        if !self.result.sources.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", h.sources);
            for source in &self.result.sources {
                let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
            }
        }

        out
    }
}

pub fn render_report(result: &AnalysisResult, language: Language) -> String {
    ReportView::new(result, language).render()
}
