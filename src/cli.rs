// Command-line surface. Value flags without a value are rejected by clap as
// usage errors; the "prompt or note required" rule is checked in `main`.
// Options go before the prompt: once the prompt starts, every remaining word
// (including ones starting with `-`) is prompt text.

use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::api::AnalysisOptions;

/// Send a prompt to Kamos, print the analysis and keep it for the viewer.
#[derive(Parser, Debug)]
#[command(
    name = "ask-kamos",
    version,
    about = "Analyze a prompt with Kamos and keep a director history of the results."
)]
pub struct Cli {
    /// Enable Google Search grounding
    #[arg(short = 'g', long = "google")]
    pub google: bool,

    /// Enable RAG over past articles
    #[arg(short = 'r', long = "rag")]
    pub rag: bool,

    /// Include saved analyses as context
    #[arg(short = 's', long = "saved")]
    pub saved: bool,

    /// Include Kamos framework specifications (docs & design)
    #[arg(long = "specs")]
    pub specs: bool,

    /// Analyze an image
    #[arg(short = 'i', long = "image", value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Start a new session, clearing director history
    #[arg(
        short = 'n',
        long = "new",
        visible_alias = "reset",
        action = ArgAction::SetTrue,
        overrides_with = "append"
    )]
    pub new: bool,

    /// Append to the existing director history
    #[arg(short = 'a', long = "append", action = ArgAction::SetTrue, overrides_with = "new")]
    pub append: bool,

    /// Update the director's note for the previous analysis
    #[arg(short = 'u', long = "update-note", value_name = "COMMENT")]
    pub update_note: Option<String>,

    /// Next prompt to record with the director's note
    #[arg(long = "next-prompt", value_name = "PROMPT")]
    pub next_prompt: Option<String>,

    /// Print the stored result and its history without sending anything
    #[arg(long = "show", conflicts_with_all = ["update_note", "next_prompt", "prompt"])]
    pub show: bool,

    /// Suppress progress, results and warnings
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Prompt text; everything after the first prompt word is taken as-is
    #[arg(value_name = "PROMPT", trailing_var_arg = true, allow_hyphen_values = true)]
    pub prompt: Vec<String>,
}

impl Cli {
    /// Prompt words joined by single spaces; `None` when empty.
    pub fn prompt_text(&self) -> Option<String> {
        let prompt = self.prompt.join(" ");
        if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        }
    }

    /// Explicit `-n`/`-a` wins; otherwise a note update appends and a plain
    /// analysis starts fresh.
    pub fn reset_history(&self) -> bool {
        if self.new {
            true
        } else if self.append {
            false
        } else {
            self.update_note.is_none()
        }
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            use_google_search: self.google,
            include_past_articles: self.rag,
            include_saved_analyses: self.saved,
            include_specs: self.specs,
            image: self.image.clone(),
        }
    }

    /// True when the invocation has something to do.
    pub fn has_work(&self) -> bool {
        self.show || self.update_note.is_some() || self.prompt_text().is_some()
    }
}
