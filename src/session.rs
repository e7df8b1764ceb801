// User-level operations. Each one turns every recoverable failure into
// diagnostic text and a "no result" return, so only argument errors can stop
// the process.

use tracing::{debug, info};

use crate::api::{AnalysisOptions, AnalysisRequest, KamosClient};
use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult, StoreError};
use crate::history::{self, MergeOutcome, NoteOutcome};
use crate::models::StoredResult;
use crate::store::Store;
use crate::ui::{self, Console};

/// Send `prompt` for analysis, thread the local history into the response,
/// print it and persist it. Returns `None` on any failure after reporting it.
pub fn run_analysis(
    config: &Config,
    prompt: &str,
    options: &AnalysisOptions,
    reset_history: bool,
) -> Option<StoredResult> {
    let console = Console::new(config.silent);
    match analyze(config, prompt, options, reset_history) {
        Ok(doc) => Some(doc),
        Err(e) => {
            debug!(error = %e, "Analysis failed");
            console.notice(&failure_message(&e));
            None
        }
    }
}

/// Fallible core of [`run_analysis`].
pub fn analyze(
    config: &Config,
    prompt: &str,
    options: &AnalysisOptions,
    reset_history: bool,
) -> AnalysisResult<StoredResult> {
    let console = Console::new(config.silent);
    let client = KamosClient::from_config(config)?;
    let request = AnalysisRequest::build(prompt, options)?;

    console.notice(&ui::describe_request(prompt, options));
    let spinner = console.spinner("Waiting for Kamos...");
    let response = client.analyze(&request);
    spinner.finish_and_clear();
    let mut doc = response?;

    let store = Store::from_config(config);
    match history::merge_history(&mut doc, &store, reset_history) {
        MergeOutcome::Unreadable(e) => {
            console.notice(&format!("[DEBUG] History merge failed: {}", e));
        }
        MergeOutcome::Carried(n) => info!(entries = n, "Carried director history forward"),
        MergeOutcome::Reset | MergeOutcome::NoPriorHistory => {}
    }

    doc.set_user_prompt(prompt);
    console.print(&ui::render_result(&doc));

    store.persist(&doc);
    Ok(doc)
}

/// Annotate the latest stored result. Problems are reported, never raised.
pub fn update_note(config: &Config, comment: &str, next_prompt: Option<&str>) {
    let console = Console::new(config.silent);
    let store = Store::from_config(config);

    match history::update_note(&store, comment, next_prompt) {
        Ok(NoteOutcome::Skipped) => console.notice(&format!(
            "Notice: {} not found. Skipping note update.",
            store.json_path().display()
        )),
        Ok(NoteOutcome::Updated { report }) | Ok(NoteOutcome::Appended { report }) => {
            if report.is_complete() {
                console.notice("Director Note Updated (Archived to history).");
            } else {
                console.notice("Director Note Updated, but not every file could be saved.");
            }
        }
        Err(e) => console.notice(&format!("Error updating director note: {}", e)),
    }
}

/// Print the stored result and its director history without any request.
/// Returns the document shown, or `None` when there was nothing to show.
pub fn show_latest(config: &Config) -> Option<StoredResult> {
    let console = Console::new(config.silent);
    let store = Store::from_config(config);

    match store.load() {
        Ok(doc) => {
            console.print(&ui::render_result(&doc));
            console.print(&ui::render_history(&doc));
            Some(doc)
        }
        Err(StoreError::NotFound { path }) => {
            console.notice(&format!("Notice: {} not found. Nothing to show.", path.display()));
            None
        }
        Err(e) => {
            console.notice(&format!("Error: {}", e));
            None
        }
    }
}

/// Service and HTTP errors already carry their own prefix.
fn failure_message(err: &AnalysisError) -> String {
    match err {
        AnalysisError::Service { .. } | AnalysisError::Http { .. } => err.to_string(),
        other => format!("Error: {}", other),
    }
}
