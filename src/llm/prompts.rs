//! Instruction builder: turns tuning options into the system instruction
//! for the "prompt chef".
//!
//! The instruction is prose: option names never appear as labelled
//! fields, and the chef is told to output only the finished prompt.

use crate::types::{Format, Level, TuningOptions};

/// Persona used when the user leaves the field empty.
pub const DEFAULT_PERSONA: &str = "An expert assistant";

/// Detail level, indexed by verbosity − 1.
pub const VERBOSITY_SCALE: [&str; 5] = [
    "Extremely concise",
    "Brief and summary-level",
    "Moderately detailed",
    "Comprehensive and thorough",
    "Extremely detailed, covering all aspects",
];

/// Technical depth, indexed by complexity − 1.
pub const COMPLEXITY_SCALE: [&str; 5] = [
    "Very simple, for a complete beginner (ELI5)",
    "Simplified, using basic terminology",
    "Standard complexity, assuming some base knowledge",
    "Advanced, using nuanced and technical language",
    "Expert-level, highly technical and in-depth",
];

/// Asks the chef to mark emphasis for the highlighter.
pub const HIGHLIGHT_DIRECTIVE: &str = "To emphasize the key concepts and instructions in the prompt you write, wrap them in double curly braces, like this: {{important keyword}}. Our display formatter turns these into highlights.";

const CHEF_INTRO: &str = "You are a master prompt chef, skilled at crafting perfect \"recipes\" (prompts) for other AI systems. Your goal is to take a user's raw idea and a handful of tuning preferences, and synthesize them into a single, clean and highly effective prompt for a different AI.";

const OUTPUT_RULES: &str = "Rules for what you output:
1. Never list these preferences as labelled fields or mention that you were given settings. The prompt must read as a natural, flowing instruction to the other AI.
2. Output only the finished prompt itself. No preamble, apology or closing commentary such as \"Here is the prompt:\".";

pub fn verbosity_phrase(level: Level) -> &'static str {
    VERBOSITY_SCALE[usize::from(level.get() - Level::MIN)]
}

pub fn complexity_phrase(level: Level) -> &'static str {
    COMPLEXITY_SCALE[usize::from(level.get() - Level::MIN)]
}

/// The persona actually used: trimmed input, or the default when blank.
pub fn effective_persona(options: &TuningOptions) -> &str {
    match options.persona.trim() {
        "" => DEFAULT_PERSONA,
        persona => persona,
    }
}

fn format_phrase(format: Format) -> String {
    match format {
        Format::Auto => "whichever format best suits the request".to_string(),
        other => format!("the \"{}\" format", other.label()),
    }
}

/// Build the system instruction. Deterministic for equal options.
pub fn build_instruction(options: &TuningOptions) -> String {
    let mut wishes = vec![
        format!(
            "The AI receiving your prompt should adopt this persona: \"{}\".",
            effective_persona(options)
        ),
        format!(
            "It should speak in a {} tone.",
            options.tone.label().to_lowercase()
        ),
        format!("It should present its answer in {}.", format_phrase(options.format)),
        format!(
            "Its answer should be \"{}\" ({} on a scale of 5 for detail).",
            verbosity_phrase(options.verbosity),
            options.verbosity.get()
        ),
        format!(
            "Its technical depth should be \"{}\" ({} on a scale of 5).",
            complexity_phrase(options.complexity),
            options.complexity.get()
        ),
    ];

    let avoid = options.negative_prompt.trim();
    if !avoid.is_empty() {
        wishes.push(format!(
            "It must strictly avoid the following: \"{}\".",
            avoid
        ));
    }

    let bullets: String = wishes.iter().map(|w| format!("- {}\n", w)).collect();

    format!(
        "{CHEF_INTRO}\n\nRead the user's raw idea and weave these preferences into a new, cohesive, natural-language prompt. That prompt will be given to a different AI.\n\n{bullets}\n{HIGHLIGHT_DIRECTIVE}\n\n{OUTPUT_RULES}"
    )
}
