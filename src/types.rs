//! Recipe data model: tuning options, shared recipes and history records.
//!
//! Field names serialize in camelCase and enum variants by their display
//! label, so share links and history files from the web version of
//! Prompt Cooker read back unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Voice the downstream AI should write in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tone {
    Professional,
    Casual,
    Formal,
    Humorous,
    Empathetic,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Professional,
        Tone::Casual,
        Tone::Formal,
        Tone::Humorous,
        Tone::Empathetic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Casual => "Casual",
            Tone::Formal => "Formal",
            Tone::Humorous => "Humorous",
            Tone::Empathetic => "Empathetic",
        }
    }
}

/// Output shape the downstream AI should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    Auto,
    Paragraph,
    #[serde(rename = "Bullet Points")]
    BulletPoints,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "Markdown Table")]
    MarkdownTable,
}

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Auto,
        Format::Paragraph,
        Format::BulletPoints,
        Format::Json,
        Format::MarkdownTable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Format::Auto => "Auto",
            Format::Paragraph => "Paragraph",
            Format::BulletPoints => "Bullet Points",
            Format::Json => "JSON",
            Format::MarkdownTable => "Markdown Table",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase, with spaces, dashes and underscores removed.
fn fold_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_label(s);
        Tone::ALL
            .into_iter()
            .find(|t| fold_label(t.label()) == wanted)
            .ok_or_else(|| format!("Unknown tone: {}", s))
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_label(s);
        Format::ALL
            .into_iter()
            .find(|f| fold_label(f.label()) == wanted)
            .ok_or_else(|| format!("Unknown format: {}", s))
    }
}

/// A 1–5 dial setting (verbosity or complexity).
///
/// Always in range: construction and deserialization clamp, so an
/// out-of-range number can never reach the synthesized instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Clamp any integer into 1..=5.
    pub fn clamped(value: i64) -> Self {
        Level(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Level(3)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Slider values from the web app may arrive as floats.
        let raw = f64::deserialize(deserializer)?;
        if !raw.is_finite() {
            return Err(serde::de::Error::custom("level must be a finite number"));
        }
        Ok(Level::clamped(raw.round() as i64))
    }
}

/// Structured parameters that shape the synthesized instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TuningOptions {
    pub tone: Tone,
    pub format: Format,
    pub verbosity: Level,
    pub complexity: Level,
    /// Empty means "use the default persona".
    #[serde(default)]
    pub persona: String,
    /// Empty means "no constraint clause".
    #[serde(default)]
    pub negative_prompt: String,
}

impl Default for TuningOptions {
    fn default() -> Self {
        Self {
            tone: Tone::Casual,
            format: Format::Auto,
            verbosity: Level::default(),
            complexity: Level::default(),
            persona: String::new(),
            negative_prompt: String::new(),
        }
    }
}

/// The pair that fully determines a generation request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedRecipe {
    pub user_input: String,
    pub tuning_options: TuningOptions,
}

impl SharedRecipe {
    pub fn new(user_input: impl Into<String>, tuning_options: TuningOptions) -> Self {
        Self {
            user_input: user_input.into(),
            tuning_options,
        }
    }
}

/// One successful generation in the recipe book. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    /// Millisecond creation timestamp, bumped to stay unique. Sole delete key.
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    /// Snapshot taken at generation time, not a reference to live options.
    pub tuning_options: TuningOptions,
    pub generated_prompt: String,
}

impl HistoryItem {
    pub fn recipe(&self) -> SharedRecipe {
        SharedRecipe::new(self.user_input.clone(), self.tuning_options.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_clamps_out_of_range() {
        assert_eq!(Level::clamped(0).get(), 1);
        assert_eq!(Level::clamped(-40).get(), 1);
        assert_eq!(Level::clamped(9).get(), 5);
        assert_eq!(Level::clamped(4).get(), 4);
    }

    #[test]
    fn level_deserialize_clamps_and_rounds() {
        let l: Level = serde_json::from_str("17").unwrap();
        assert_eq!(l.get(), 5);
        let l: Level = serde_json::from_str("2.0").unwrap();
        assert_eq!(l.get(), 2);
        assert!(serde_json::from_str::<Level>("\"three\"").is_err());
    }

    #[test]
    fn options_use_web_wire_names() {
        let opts = TuningOptions {
            format: Format::BulletPoints,
            negative_prompt: "jargon".into(),
            ..TuningOptions::default()
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["format"], "Bullet Points");
        assert_eq!(json["tone"], "Casual");
        assert_eq!(json["verbosity"], 3);
        assert_eq!(json["negativePrompt"], "jargon");
    }

    #[test]
    fn labels_parse_loosely() {
        assert_eq!("markdown-table".parse::<Format>().unwrap(), Format::MarkdownTable);
        assert_eq!("Bullet Points".parse::<Format>().unwrap(), Format::BulletPoints);
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("HUMOROUS".parse::<Tone>().unwrap(), Tone::Humorous);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn defaults_match_web_app() {
        let d = TuningOptions::default();
        assert_eq!(d.tone, Tone::Casual);
        assert_eq!(d.format, Format::Auto);
        assert_eq!(d.verbosity.get(), 3);
        assert_eq!(d.complexity.get(), 3);
        assert!(d.persona.is_empty() && d.negative_prompt.is_empty());
    }
}
