// Director history: carrying the annotation log from the previous document
// into a fresh result, and recording notes against the current result.

use chrono::Local;
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::models::{HistoryEntry, StoredResult, COMMENT_KEY, NEXT_PROMPT_KEY};
use crate::store::{PersistReport, Store};

/// What `merge_history` did to the fresh result.
#[derive(Debug)]
pub enum MergeOutcome {
    /// History was cleared on request.
    Reset,
    /// This many entries were carried over from the persisted document.
    Carried(usize),
    /// Nothing persisted, or the persisted history was empty.
    NoPriorHistory,
    /// The persisted document could not be read; treated as no history.
    Unreadable(StoreError),
}

/// What `update_note` did to the stored history.
#[derive(Debug)]
pub enum NoteOutcome {
    /// No persisted document; nothing was written.
    Skipped,
    /// The last entry annotated the same title and was rewritten.
    Updated { report: PersistReport },
    /// A new snapshot entry was appended.
    Appended { report: PersistReport },
}

/// Thread the persisted history into `fresh` before it is saved.
///
/// With `reset` the history becomes empty and the store is not read. Otherwise
/// a non-empty history from the previous document is copied verbatim; a missing
/// or unreadable document leaves `fresh` untouched.
pub fn merge_history(fresh: &mut StoredResult, store: &Store, reset: bool) -> MergeOutcome {
    if reset {
        fresh.set_history(Vec::new());
        return MergeOutcome::Reset;
    }

    let previous = match store.load() {
        Ok(doc) => doc,
        Err(StoreError::NotFound { .. }) => return MergeOutcome::NoPriorHistory,
        Err(e) => {
            debug!(error = %e, "History merge failed");
            return MergeOutcome::Unreadable(e);
        }
    };

    match previous.history() {
        Some(entries) if !entries.is_empty() => {
            let carried = entries.len();
            fresh.set_history(entries.clone());
            MergeOutcome::Carried(carried)
        }
        _ => MergeOutcome::NoPriorHistory,
    }
}

/// Record a director note against the latest stored result, timestamped now.
pub fn update_note(
    store: &Store,
    comment: &str,
    next_prompt: Option<&str>,
) -> StoreResult<NoteOutcome> {
    update_note_at(store, comment, next_prompt, now_timestamp())
}

/// Same as [`update_note`] with an explicit timestamp.
pub fn update_note_at(
    store: &Store,
    comment: &str,
    next_prompt: Option<&str>,
    timestamp: String,
) -> StoreResult<NoteOutcome> {
    let mut doc = match store.load() {
        Ok(doc) => doc,
        Err(StoreError::NotFound { .. }) => return Ok(NoteOutcome::Skipped),
        Err(e) => return Err(e),
    };

    let appended = annotate(&mut doc, comment, next_prompt, timestamp)?;
    let report = store.persist(&doc);

    Ok(if appended {
        NoteOutcome::Appended { report }
    } else {
        NoteOutcome::Updated { report }
    })
}

/// Apply a note to `doc`. Returns `true` when a new entry was appended and
/// `false` when the last entry was updated in place.
pub fn annotate(
    doc: &mut StoredResult,
    comment: &str,
    next_prompt: Option<&str>,
    timestamp: String,
) -> StoreResult<bool> {
    doc.result
        .insert(COMMENT_KEY.to_string(), Value::String(comment.to_string()));
    if let Some(next) = next_prompt {
        doc.result
            .insert(NEXT_PROMPT_KEY.to_string(), Value::String(next.to_string()));
    }

    let title = doc.title().cloned();
    let snapshot = HistoryEntry::snapshot(&doc.result, comment, next_prompt, timestamp.clone());
    let history = doc.history_mut();

    if let Some(Value::Object(last)) = history.last_mut() {
        if last.get("title") == title.as_ref() {
            last.insert("timestamp".to_string(), Value::String(timestamp));
            last.insert("comment".to_string(), Value::String(comment.to_string()));
            last.insert(
                NEXT_PROMPT_KEY.to_string(),
                next_prompt.map_or(Value::Null, |p| Value::String(p.to_string())),
            );
            return Ok(false);
        }
    }

    history.push(serde_json::to_value(snapshot)?);
    Ok(true)
}

/// Local time in ISO-8601 form with microseconds and no offset.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
