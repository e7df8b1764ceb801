// Persisted document shapes. The service payload is opaque to this tool, so
// `StoredResult` keeps it as JSON maps and only names the keys the history
// logic reads or writes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const HISTORY_KEY: &str = "directorHistory";
pub const USER_PROMPT_KEY: &str = "userPrompt";
pub const COMMENT_KEY: &str = "directorComment";
pub const NEXT_PROMPT_KEY: &str = "nextPrompt";

/// The service response as persisted to disk: a `result` object plus any
/// other top-level keys the service returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    #[serde(default)]
    pub result: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoredResult {
    pub fn title(&self) -> Option<&Value> {
        self.result.get("title")
    }

    /// Director history, if present and an array.
    pub fn history(&self) -> Option<&Vec<Value>> {
        self.result.get(HISTORY_KEY).and_then(Value::as_array)
    }

    pub fn set_history(&mut self, entries: Vec<Value>) {
        self.result
            .insert(HISTORY_KEY.to_string(), Value::Array(entries));
    }

    /// Director history, created empty when absent or not an array.
    pub fn history_mut(&mut self) -> &mut Vec<Value> {
        let slot = self
            .result
            .entry(HISTORY_KEY)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !slot.is_array() {
            *slot = Value::Array(Vec::new());
        }
        match slot {
            Value::Array(entries) => entries,
            _ => unreachable!("history slot was just set to an array"),
        }
    }

    pub fn set_user_prompt(&mut self, prompt: &str) {
        self.result
            .insert(USER_PROMPT_KEY.to_string(), Value::String(prompt.to_string()));
    }
}

/// One director annotation with a frozen copy of the result it annotates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: String,
    pub comment: String,
    pub next_prompt: Option<String>,
    pub title: Option<Value>,
    pub user_prompt: Option<Value>,
    pub framework: Option<Value>,
    pub report: Option<Value>,
}

impl HistoryEntry {
    /// Snapshot the current result together with a new note.
    pub fn snapshot(
        result: &Map<String, Value>,
        comment: &str,
        next_prompt: Option<&str>,
        timestamp: String,
    ) -> Self {
        Self {
            timestamp,
            comment: comment.to_string(),
            next_prompt: next_prompt.map(str::to_string),
            title: result.get("title").cloned(),
            user_prompt: result.get(USER_PROMPT_KEY).cloned(),
            framework: result.get("framework").cloned(),
            report: result.get("report").cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_stored_result_keeps_unknown_top_level_keys() {
        let raw = json!({
            "result": {"title": "A"},
            "meta": {"model": "x"}
        });
        let doc: StoredResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(doc.title(), Some(&json!("A")));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_history_mut_replaces_non_array() {
        let mut doc: StoredResult =
            serde_json::from_value(json!({"result": {"directorHistory": "oops"}})).unwrap();
        assert!(doc.history().is_none());
        doc.history_mut().push(json!({"comment": "c"}));
        assert_eq!(doc.history().map(Vec::len), Some(1));
    }

    #[test]
    fn test_entry_serializes_camel_case_with_null_next_prompt() {
        let result = json!({"title": "A", "userPrompt": "p", "report": {"1-1": "x"}});
        let entry = HistoryEntry::snapshot(
            result.as_object().unwrap(),
            "c1",
            None,
            "2026-01-01T00:00:00.000000".to_string(),
        );
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["nextPrompt"], Value::Null);
        assert_eq!(value["userPrompt"], json!("p"));
        assert_eq!(value["framework"], Value::Null);
        assert_eq!(value["report"], json!({"1-1": "x"}));
    }
}
