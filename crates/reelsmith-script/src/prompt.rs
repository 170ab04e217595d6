//! Prompt construction and completion parsing.
//!
//! The preset picks a narration style and a target segment length; the parser
//! turns free-form completion text back into ordered segments with duration
//! estimates.

use reelsmith_types::{Preset, RunConfig, Script, Segment};

use crate::error::{Result, ScriptError};

/// Average spoken pace used for segment duration estimates.
pub const WORDS_PER_SECOND: f64 = 2.5;

/// Narration style parameters for one preset.
#[derive(Debug, Clone, Copy)]
pub struct PresetProfile {
    /// Tone instruction inserted into the system prompt.
    pub tone: &'static str,
    /// Target per-segment spoken length, lower bound.
    pub segment_min_secs: u32,
    /// Target per-segment spoken length, upper bound.
    pub segment_max_secs: u32,
}

impl PresetProfile {
    pub fn for_preset(preset: Preset) -> Self {
        match preset {
            Preset::News => Self {
                tone: "an urgent, current-events news anchor",
                segment_min_secs: 6,
                segment_max_secs: 8,
            },
            Preset::Facts => Self {
                tone: "a punchy, high-energy narrator delivering surprising facts",
                segment_min_secs: 10,
                segment_max_secs: 15,
            },
            Preset::Longform => Self {
                tone: "a calm, narrative documentary voice",
                segment_min_secs: 20,
                segment_max_secs: 30,
            },
        }
    }
}

/// Build the system prompt for a run.
pub fn build_system_prompt(config: &RunConfig) -> String {
    let profile = PresetProfile::for_preset(config.preset);
    let target_words = (config.duration_secs as f64 * WORDS_PER_SECOND).round() as u64;

    let mut prompt = format!(
        "You write voiceover scripts for short-form video. Write in the voice of {tone}. \
         The full script must run about {duration} seconds when spoken, roughly {words} words. \
         Split the script into paragraphs separated by blank lines; each paragraph is one \
         narration segment of about {min}-{max} seconds of speech. \
         Output only the spoken words: no headings, no stage directions, no camera notes, \
         no markdown formatting.",
        tone = profile.tone,
        duration = config.duration_secs,
        words = target_words,
        min = profile.segment_min_secs,
        max = profile.segment_max_secs,
    );

    if !config.instructions.trim().is_empty() {
        prompt.push_str("\n\nAdditional instructions: ");
        prompt.push_str(config.instructions.trim());
    }

    prompt
}

/// Build the user prompt for a run.
pub fn build_user_prompt(config: &RunConfig) -> String {
    let mut prompt = format!("Write the voiceover script. Topic: {}", config.topic.trim());

    if !config.context.trim().is_empty() {
        prompt.push_str("\n\nBackground context to draw from:\n");
        prompt.push_str(config.context.trim());
    }

    prompt
}

/// Parse completion text into a script.
///
/// Blank-line-separated blocks become segments. List markers and numbering the
/// model sometimes emits despite instructions are stripped; blocks left empty
/// after stripping are dropped.
pub fn parse_script(content: &str) -> Result<Script> {
    let segments: Vec<Segment> = content
        .split("\n\n")
        .map(clean_block)
        .filter(|text| !text.is_empty())
        .map(|text| {
            let estimated_secs = estimate_secs(&text);
            Segment::new(text, estimated_secs)
        })
        .collect();

    if segments.is_empty() {
        return Err(ScriptError::Unsegmentable(
            "completion contained no narration text".to_string(),
        ));
    }

    Ok(Script::new(segments))
}

/// Estimate spoken duration from word count.
pub fn estimate_secs(text: &str) -> f64 {
    text.split_whitespace().count() as f64 / WORDS_PER_SECOND
}

/// Collapse a block to one line and strip list markers and numbering.
fn clean_block(block: &str) -> String {
    block
        .lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    let stripped = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "));
    if let Some(rest) = stripped {
        return rest.trim();
    }

    // Numbered list marker, e.g. "1." or "2)".
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim();
        }
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelsmith_types::{Credentials, Visibility};

    fn config(preset: Preset) -> RunConfig {
        RunConfig {
            topic: "the deep ocean".to_string(),
            duration_secs: 60,
            voice: "narrator-1".to_string(),
            preset,
            instructions: String::new(),
            context: String::new(),
            title_template: "t".to_string(),
            description_template: "d".to_string(),
            tags: vec![],
            visibility: Visibility::Unlisted,
            allow_copyrighted_audio: false,
            webhook_url: None,
            credentials: Credentials::default(),
        }
    }

    #[test]
    fn test_system_prompt_reflects_preset_and_duration() {
        let prompt = build_system_prompt(&config(Preset::Facts));
        assert!(prompt.contains("surprising facts"));
        assert!(prompt.contains("about 60 seconds"));
        assert!(prompt.contains("10-15 seconds"));

        let prompt = build_system_prompt(&config(Preset::News));
        assert!(prompt.contains("news anchor"));
        assert!(prompt.contains("6-8 seconds"));
    }

    #[test]
    fn test_system_prompt_appends_instructions() {
        let mut cfg = config(Preset::Facts);
        cfg.instructions = "Avoid jargon.".to_string();
        let prompt = build_system_prompt(&cfg);
        assert!(prompt.ends_with("Additional instructions: Avoid jargon."));
    }

    #[test]
    fn test_user_prompt_includes_context() {
        let mut cfg = config(Preset::Facts);
        cfg.context = "Hydrothermal vents were discovered in 1977.".to_string();
        let prompt = build_user_prompt(&cfg);
        assert!(prompt.contains("Topic: the deep ocean"));
        assert!(prompt.contains("Hydrothermal vents"));
    }

    #[test]
    fn test_parse_splits_on_blank_lines() {
        let script = parse_script(
            "The ocean covers most of the planet.\n\nMost of it has never been mapped.",
        )
        .unwrap();
        assert_eq!(script.segments.len(), 2);
        assert_eq!(script.segments[0].text, "The ocean covers most of the planet.");
    }

    #[test]
    fn test_parse_strips_list_markers() {
        let script =
            parse_script("- First point here.\n\n2. Second point here.\n\n* Third point here.")
                .unwrap();
        assert_eq!(script.segments[0].text, "First point here.");
        assert_eq!(script.segments[1].text, "Second point here.");
        assert_eq!(script.segments[2].text, "Third point here.");
    }

    #[test]
    fn test_parse_collapses_multiline_blocks() {
        let script = parse_script("One sentence.\nSame segment continues.\n\nNext segment.")
            .unwrap();
        assert_eq!(script.segments.len(), 2);
        assert_eq!(script.segments[0].text, "One sentence. Same segment continues.");
    }

    #[test]
    fn test_parse_rejects_empty_content() {
        assert!(matches!(
            parse_script("   \n\n  "),
            Err(ScriptError::Unsegmentable(_))
        ));
    }

    #[test]
    fn test_duration_estimate() {
        // 10 words at 2.5 words/sec.
        let secs = estimate_secs("one two three four five six seven eight nine ten");
        assert!((secs - 4.0).abs() < f64::EPSILON);
    }
}
