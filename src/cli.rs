//! Command-line front end.
//!
//! Thin presentation layer over `Controller`: each subcommand sets up the
//! working state, calls one controller action and prints the result.
//! All logic lives in the controller and below.

use crate::clipboard::{ClipboardWriter, SystemClipboard};
use crate::controller::Controller;
use crate::error::CookerError;
use crate::highlight;
use crate::history::age::time_ago;
use crate::history::{FileStore, HistoryStore};
use crate::llm::GeminiService;
use crate::settings::{self, Settings};
use crate::types::{Format, HistoryItem, Level, Tone, TuningOptions};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "prompt-cooker",
    version,
    about = "Cook a raw idea into a polished prompt for another AI"
)]
pub struct Cli {
    /// Shared recipe to start from: a `?recipe=` link or a bare token.
    #[arg(long, global = true)]
    pub recipe: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cook a prompt and save it to the recipe book.
    Generate {
        /// The raw idea. Defaults to the shared recipe's input.
        input: Option<String>,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Print without highlight colors or {{markers}}.
        #[arg(long)]
        plain: bool,
        /// Copy the cooked prompt (markers stripped) to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Print a share link for an idea and its options.
    Share {
        input: Option<String>,
        #[command(flatten)]
        tuning: TuningArgs,
        /// Copy the link to the clipboard.
        #[arg(long)]
        copy: bool,
    },
    /// Decode a share link and show the recipe inside.
    Open {
        /// Link or bare token.
        link: String,
    },
    /// Browse and manage the recipe book.
    #[command(subcommand)]
    History(HistoryCommand),
    /// Save a Gemini API key to the OS keychain.
    SetKey { key: String },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List saved recipes, newest first.
    List {
        /// Only entries whose idea contains this text (case-insensitive).
        #[arg(long, short)]
        search: Option<String>,
    },
    /// Show one saved recipe and its prompt.
    Show { id: i64 },
    /// Delete one saved recipe.
    Delete { id: i64 },
    /// Delete every saved recipe.
    Clear {
        /// Required: this cannot be undone.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// Professional, Casual, Formal, Humorous or Empathetic.
    #[arg(long)]
    pub tone: Option<Tone>,
    /// Auto, Paragraph, "Bullet Points", JSON or "Markdown Table".
    #[arg(long)]
    pub format: Option<Format>,
    /// Detail level, 1 (concise) to 5 (exhaustive).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub verbosity: Option<u8>,
    /// Technical depth, 1 (beginner) to 5 (expert).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub complexity: Option<u8>,
    /// Persona the downstream AI should adopt.
    #[arg(long)]
    pub persona: Option<String>,
    /// Things the downstream AI must avoid.
    #[arg(long = "avoid")]
    pub negative_prompt: Option<String>,
}

impl TuningArgs {
    /// Overlay the flags that were given onto `base`.
    pub fn apply(&self, base: TuningOptions) -> TuningOptions {
        TuningOptions {
            tone: self.tone.unwrap_or(base.tone),
            format: self.format.unwrap_or(base.format),
            verbosity: self
                .verbosity
                .map(|v| Level::clamped(v.into()))
                .unwrap_or(base.verbosity),
            complexity: self
                .complexity
                .map(|v| Level::clamped(v.into()))
                .unwrap_or(base.complexity),
            persona: self.persona.clone().unwrap_or(base.persona),
            negative_prompt: self.negative_prompt.clone().unwrap_or(base.negative_prompt),
        }
    }
}

/// Entry point for a parsed command line.
pub async fn dispatch(cli: Cli, settings: Settings) -> ExitCode {
    if let Command::SetKey { key } = &cli.command {
        return report(settings::save_api_key(key).map(|_| println!("Key saved.")));
    }
    if let Command::Open { link } = &cli.command {
        return open_link(link);
    }

    let service = GeminiService::new(settings.clone());
    let store = HistoryStore::new(FileStore::new(&settings.data_dir));
    let controller = Controller::new(service, store, &settings.share_host);

    let imported = start(&controller, cli.recipe.as_deref());

    match cli.command {
        Command::Generate {
            input,
            tuning,
            plain,
            copy,
        } => {
            prepare(&controller, input, &tuning, imported);
            match controller.generate().await {
                Ok(prompt) => {
                    if plain {
                        println!("{}", highlight::strip_markers(&prompt));
                    } else if std::io::stdout().is_terminal() {
                        println!("{}", highlight::to_terminal(&prompt));
                    } else {
                        println!("{}", prompt);
                    }
                    if copy {
                        return report(SystemClipboard.write(&highlight::strip_markers(&prompt)));
                    }
                    ExitCode::SUCCESS
                }
                Err(_) => {
                    let view = controller.view();
                    eprintln!("{}", view.error.unwrap_or_default());
                    ExitCode::FAILURE
                }
            }
        }
        Command::Share { input, tuning, copy } => {
            prepare(&controller, input, &tuning, imported);
            if copy {
                report(
                    controller
                        .share_to_clipboard(&mut SystemClipboard)
                        .map(|link| println!("{}\nLink copied!", link)),
                )
            } else {
                println!("{}", controller.share_current());
                ExitCode::SUCCESS
            }
        }
        Command::History(cmd) => history(&controller, cmd),
        Command::Open { .. } | Command::SetKey { .. } => ExitCode::SUCCESS,
    }
}

/// Import the `--recipe` value and load history. Returns whether a recipe
/// now backs the working state.
fn start(controller: &Controller<GeminiService>, recipe: Option<&str>) -> bool {
    match (recipe.and_then(as_link), recipe) {
        (Some(link), _) => {
            let report = controller.start(Some(&link));
            if let Some(e) = report.recipe_error {
                eprintln!("Ignoring recipe link: {}", e);
            } else if report.imported.is_none() {
                eprintln!("Ignoring recipe link: no recipe parameter");
            }
            report.imported.is_some()
        }
        (None, Some(token)) => {
            let imported = match controller.import_recipe(token) {
                Ok(_) => true,
                Err(e) => {
                    eprintln!("Ignoring recipe: {}", e);
                    false
                }
            };
            controller.start(None);
            imported
        }
        (None, None) => {
            controller.start(None);
            false
        }
    }
}

/// A `--recipe` value that is a link rather than a bare token. Links
/// pasted without a scheme (`promptcooker.app/?recipe=...`) get `https://`.
fn as_link(value: &str) -> Option<String> {
    let value = value.trim();
    if value.contains("://") {
        return Some(value.to_string());
    }
    let with_scheme = format!("https://{}", value);
    crate::recipe::extract_token(&with_scheme).map(|_| with_scheme)
}

/// Set input and options for a generate/share run.
///
/// Without an imported recipe the base is the default options and an empty
/// input, not the preloaded example.
fn prepare(
    controller: &Controller<GeminiService>,
    input: Option<String>,
    tuning: &TuningArgs,
    imported: bool,
) {
    let view = controller.view();
    let (base_input, base_options) = if imported {
        (view.user_input, view.tuning_options)
    } else {
        (String::new(), TuningOptions::default())
    };
    controller.set_user_input(input.unwrap_or(base_input));
    controller.set_tuning_options(tuning.apply(base_options));
}

fn open_link(link: &str) -> ExitCode {
    let token = as_link(link)
        .and_then(|l| crate::recipe::extract_token(&l))
        .unwrap_or_else(|| link.trim().to_string());
    match crate::recipe::decode(&token) {
        Ok(recipe) => {
            println!("Idea: {}", recipe.user_input);
            print_options(&recipe.tuning_options);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn history(controller: &Controller<GeminiService>, cmd: HistoryCommand) -> ExitCode {
    match cmd {
        HistoryCommand::List { search } => {
            let all = controller.history("");
            if all.is_empty() {
                println!("Your recipe book is empty. Cooked prompts will be saved here for later.");
                return ExitCode::SUCCESS;
            }
            let hits = controller.history(search.as_deref().unwrap_or(""));
            if hits.is_empty() {
                println!("No recipes match your search.");
            }
            let now = Utc::now();
            for item in &hits {
                println!(
                    "{}  {:<16}  {}",
                    item.id,
                    time_ago(item.timestamp, now),
                    one_line(&item.user_input, 60)
                );
            }
            ExitCode::SUCCESS
        }
        HistoryCommand::Show { id } => match controller.load_from_history(id) {
            Ok(item) => {
                print_item(&item);
                ExitCode::SUCCESS
            }
            Err(e) => report::<()>(Err(e)),
        },
        HistoryCommand::Delete { id } => {
            let before = controller.history("").len();
            let after = controller.delete_from_history(id).len();
            if after == before {
                println!("No recipe with id {}.", id);
            } else {
                println!("Deleted recipe {}.", id);
            }
            ExitCode::SUCCESS
        }
        HistoryCommand::Clear { yes } => {
            if !yes {
                eprintln!("This permanently deletes your entire recipe book. Re-run with --yes.");
                return ExitCode::FAILURE;
            }
            controller.clear_history();
            println!("Recipe book cleared.");
            ExitCode::SUCCESS
        }
    }
}

fn print_options(options: &TuningOptions) {
    println!("Tone: {}", options.tone);
    println!("Format: {}", options.format);
    println!("Verbosity: {}/5", options.verbosity.get());
    println!("Complexity: {}/5", options.complexity.get());
    if !options.persona.is_empty() {
        println!("Persona: {}", options.persona);
    }
    if !options.negative_prompt.is_empty() {
        println!("Avoid: {}", options.negative_prompt);
    }
}

fn print_item(item: &HistoryItem) {
    println!("Recipe {} ({})", item.id, item.timestamp.to_rfc3339());
    println!("Idea: {}", item.user_input);
    print_options(&item.tuning_options);
    println!();
    if std::io::stdout().is_terminal() {
        println!("{}", highlight::to_terminal(&item.generated_prompt));
    } else {
        println!("{}", item.generated_prompt);
    }
}

/// First line of `text`, cut to `max` chars.
fn one_line(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

fn report<T>(result: Result<T, CookerError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tuning_flags_overlay_base() {
        let args = TuningArgs {
            tone: Some(Tone::Formal),
            verbosity: Some(5),
            ..TuningArgs::default()
        };
        let base = TuningOptions {
            persona: "Chef".to_string(),
            ..TuningOptions::default()
        };
        let opts = args.apply(base);
        assert_eq!(opts.tone, Tone::Formal);
        assert_eq!(opts.verbosity.get(), 5);
        assert_eq!(opts.complexity.get(), 3);
        assert_eq!(opts.persona, "Chef");
    }

    #[test]
    fn parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "prompt-cooker",
            "generate",
            "Plan a birthday party",
            "--format",
            "bullet-points",
            "--complexity",
            "5",
            "--avoid",
            "clowns",
        ])
        .unwrap();
        match cli.command {
            Command::Generate { input, tuning, .. } => {
                assert_eq!(input.as_deref(), Some("Plan a birthday party"));
                assert_eq!(tuning.format, Some(Format::BulletPoints));
                assert_eq!(tuning.complexity, Some(5));
                assert_eq!(tuning.negative_prompt.as_deref(), Some("clowns"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(Cli::try_parse_from(["prompt-cooker", "share", "x", "--verbosity", "9"]).is_err());
    }

    #[test]
    fn one_line_truncates() {
        assert_eq!(one_line("abc\ndef", 10), "abc");
        assert_eq!(one_line("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn links_without_scheme_are_recognised() {
        let link = "promptcooker.app/?recipe=abc";
        assert_eq!(as_link(link).as_deref(), Some("https://promptcooker.app/?recipe=abc"));
        assert_eq!(
            as_link("http://localhost:5173/?recipe=abc").as_deref(),
            Some("http://localhost:5173/?recipe=abc")
        );
        // A bare token stays a token.
        assert_eq!(as_link("eyJ1c2VySW5wdXQiOiJYIn0"), None);
    }
}
