// UI layer: console output for analysis results and progress. Rendering is
// kept as plain string building so it can be tested; printing and the
// spinner live in `Console`, which goes quiet in silent mode.

use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;

use crate::api::AnalysisOptions;
use crate::models::StoredResult;

const PROMPT_PREVIEW_CHARS: usize = 200;

/// Human-facing output. Results go to stdout; progress and problems go to
/// stderr. Nothing is printed when `silent` is set.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    silent: bool,
}

impl Console {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    pub fn notice(&self, message: &str) {
        if !self.silent {
            eprintln!("{}", message);
        }
    }

    pub fn print(&self, text: &str) {
        if !self.silent {
            println!("{}", text);
        }
    }

    /// Spinner shown while the request is in flight. Hidden in silent mode.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if self.silent {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    }
}

/// One-line summary of what is about to be sent.
pub fn describe_request(prompt: &str, options: &AnalysisOptions) -> String {
    let display_prompt = if prompt.chars().count() > PROMPT_PREVIEW_CHARS {
        let head: String = prompt.chars().take(PROMPT_PREVIEW_CHARS).collect();
        format!("{} ... (truncated)", head)
    } else {
        prompt.to_string()
    };

    let mut parts = vec![format!("Analyzing: {}", display_prompt)];
    if options.use_google_search {
        parts.push("[Google Search: ON]".to_string());
    }
    if options.include_past_articles {
        parts.push("[RAG: ON]".to_string());
    }
    if options.include_saved_analyses {
        parts.push("[Saved Data: ON]".to_string());
    }
    if options.include_specs {
        parts.push("[Specs: ON]".to_string());
    }
    if let Some(image) = &options.image {
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| image.display().to_string());
        parts.push(format!("[Image: {}]", name));
    }
    format!("{}...", parts.join(" "))
}

/// Render a result as Markdown-ish text: title, framework axes, report cells
/// and grounding sources.
pub fn render_result(doc: &StoredResult) -> String {
    let data = &doc.result;
    let mut out = String::new();

    let title = data
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or("Analysis Result");
    out.push_str(&format!("\n# {}\n\n", title));

    if let Some(desc) = data.get("_debugImageDescription").and_then(Value::as_str) {
        out.push_str(&format!("\n[DEBUG] Image Description Used:\n{}\n\n", desc));
    }

    if let Some(section) = data
        .get("framework")
        .and_then(|f| f.get("sections"))
        .and_then(Value::as_array)
        .and_then(|s| s.first())
    {
        let structure = section
            .get("structure_type")
            .map(display_value)
            .unwrap_or_else(|| "unknown".to_string());
        out.push_str(&format!("## Generated Framework: {}\n", structure));
        out.push_str(&format!(
            "Axes: [{}] x [{}]\n\n",
            axis_titles(section.get("rows")),
            axis_titles(section.get("columns"))
        ));
    }

    out.push_str("## Report\n\n");
    if let Some(Value::Object(report)) = data.get("report") {
        for (key, content) in report {
            out.push_str(&format!("### Cell {}\n", key));
            out.push_str(&display_value(content));
            out.push_str(&format!("\n\n{}\n\n", "-".repeat(40)));
        }
    }

    if let Some(grounding) = data.get("groundingMetadata").filter(|g| !is_empty(g)) {
        out.push_str("## Sources (Grounding)\n\n");
        out.push_str(&serde_json::to_string_pretty(grounding).unwrap_or_default());
        out.push('\n');
    }

    out
}

/// Numbered list of director history entries, oldest first.
pub fn render_history(doc: &StoredResult) -> String {
    let entries = match doc.history() {
        Some(entries) if !entries.is_empty() => entries,
        _ => return "No director history.\n".to_string(),
    };

    let mut out = String::from("## Director History\n\n");
    for (i, entry) in entries.iter().enumerate() {
        let field = |key: &str| entry.get(key).map(display_value).unwrap_or_default();
        out.push_str(&format!(
            "[{}] {} {}: {}\n",
            i + 1,
            field("timestamp"),
            field("title"),
            field("comment")
        ));
        if let Some(next) = entry.get("nextPrompt").and_then(Value::as_str) {
            out.push_str(&format!("    next: {}\n", next));
        }
    }
    out
}

fn axis_titles(axis: Option<&Value>) -> String {
    axis.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("title"))
                .map(|t| format!("'{}'", display_value(t)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn doc(value: Value) -> StoredResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_describe_request_lists_enabled_flags() {
        let options = AnalysisOptions {
            use_google_search: true,
            include_saved_analyses: true,
            image: Some(PathBuf::from("/tmp/shots/board.png")),
            ..Default::default()
        };
        assert_eq!(
            describe_request("hello", &options),
            "Analyzing: hello [Google Search: ON] [Saved Data: ON] [Image: board.png]..."
        );
    }

    #[test]
    fn test_describe_request_truncates_long_prompt() {
        let prompt = "あ".repeat(250);
        let line = describe_request(&prompt, &AnalysisOptions::default());
        assert!(line.contains(" ... (truncated)"));
        assert_eq!(line.matches('あ').count(), 200);
    }

    #[test]
    fn test_render_result_sections() {
        let text = render_result(&doc(json!({
            "result": {
                "title": "Market Map",
                "framework": {"sections": [{
                    "structure_type": "matrix",
                    "rows": [{"title": "Low"}, {"title": "High"}],
                    "columns": [{"title": "Now"}]
                }]},
                "report": {"1-1": "cell text"},
                "groundingMetadata": {"sources": ["https://example.com"]}
            }
        })));

        assert!(text.contains("# Market Map"));
        assert!(text.contains("## Generated Framework: matrix"));
        assert!(text.contains("Axes: ['Low', 'High'] x ['Now']"));
        assert!(text.contains("### Cell 1-1\ncell text"));
        assert!(text.contains("## Sources (Grounding)"));
    }

    #[test]
    fn test_render_result_defaults_title() {
        let text = render_result(&doc(json!({"result": {}})));
        assert!(text.contains("# Analysis Result"));
        assert!(!text.contains("Sources"));
    }

    #[test]
    fn test_render_history() {
        let text = render_history(&doc(json!({
            "result": {"directorHistory": [
                {"timestamp": "t1", "title": "A", "comment": "c1", "nextPrompt": null},
                {"timestamp": "t2", "title": "B", "comment": "c2", "nextPrompt": "dig"}
            ]}
        })));
        assert!(text.contains("[1] t1 A: c1\n"));
        assert!(text.contains("[2] t2 B: c2\n    next: dig\n"));

        let empty = render_history(&doc(json!({"result": {}})));
        assert_eq!(empty, "No director history.\n");
    }
}
