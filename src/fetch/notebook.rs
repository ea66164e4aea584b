//! Jupyter notebook linearization.
//!
//! Notebooks are JSON; feeding that to a model wastes most of the context on
//! structure. Cells are flattened into a readable script instead, with code
//! prefixed by `>>> ` and outputs inlined after each code cell.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("notebook is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("notebook has no cells array")]
    MissingCells,
}

pub fn is_notebook(path: &str) -> bool {
    path.to_lowercase().ends_with(".ipynb")
}

/// Flatten notebook JSON into text.
pub fn linearize(raw: &str) -> Result<String, NotebookError> {
    let doc: Value = serde_json::from_str(raw)?;
    let cells = doc.get("cells").and_then(Value::as_array).ok_or(NotebookError::MissingCells)?;

    let mut out = String::new();
    for (i, cell) in cells.iter().enumerate() {
        let index = i + 1;
        let source = joined(cell.get("source"));
        match cell.get("cell_type").and_then(Value::as_str) {
            Some("markdown") => {
                out.push_str(&format!("\n# --- Markdown Cell {} ---\n{}\n", index, source));
            }
            Some("code") => {
                out.push_str(&format!(
                    "\n# --- Code Cell {} ---\n>>> {}\n",
                    index,
                    source.replace('\n', "\n>>> ")
                ));
                let outputs = cell.get("outputs").and_then(Value::as_array);
                for output in outputs.into_iter().flatten() {
                    if let Some(text) = output_text(output) {
                        out.push_str(&text);
                        out.push('\n');
                    }
                }
            }
            // raw cells carry nothing readable
            _ => {}
        }
    }
    Ok(out.trim().to_string())
}

fn output_text(output: &Value) -> Option<String> {
    match output.get("output_type").and_then(Value::as_str)? {
        "stream" => non_empty(output.get("text")).map(|text| joined(Some(text))),
        "execute_result" | "display_data" => {
            let plain = non_empty(output.get("data")?.get("text/plain"))?;
            Some(joined(Some(plain)))
        }
        "error" => {
            let ename = output
                .get("ename")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("Error");
            let evalue = output.get("evalue").and_then(Value::as_str).unwrap_or_default();
            Some(format!("Error: {}: {}", ename, evalue))
        }
        _ => None,
    }
}

/// Missing, null and empty-string fields produce no output line.
fn non_empty(value: Option<&Value>) -> Option<&Value> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        v => Some(v),
    }
}

/// Notebook text fields are either a string or an array of line strings.
fn joined(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linearize_markdown_and_code() {
        let raw = r##"{
            "cells": [
                {"cell_type": "markdown", "source": ["# Title\n", "Intro"]},
                {"cell_type": "code", "source": "x = 1\nprint(x)",
                 "outputs": [{"output_type": "stream", "text": ["1"]}]}
            ]
        }"##;
        let text = linearize(raw).unwrap();
        assert_eq!(
            text,
            "# --- Markdown Cell 1 ---\n# Title\nIntro\n\n\
             # --- Code Cell 2 ---\n>>> x = 1\n>>> print(x)\n1"
        );
    }

    #[test]
    fn test_result_and_error_outputs() {
        let raw = r#"{"cells": [{"cell_type": "code", "source": ["1/0"], "outputs": [
            {"output_type": "execute_result", "data": {"text/plain": ["42"]}},
            {"output_type": "display_data", "data": {"image/png": "AAAA"}},
            {"output_type": "error", "ename": "ZeroDivisionError", "evalue": "division by zero"}
        ]}]}"#;
        let text = linearize(raw).unwrap();
        assert_eq!(
            text,
            "# --- Code Cell 1 ---\n>>> 1/0\n42\nError: ZeroDivisionError: division by zero"
        );
    }

    #[test]
    fn test_error_without_name_and_empty_outputs() {
        let raw = r#"{"cells": [{"cell_type": "code", "source": "run()", "outputs": [
            {"output_type": "stream", "text": ""},
            {"output_type": "execute_result", "data": {"text/plain": ""}},
            {"output_type": "stream", "name": "stdout"},
            {"output_type": "error", "evalue": "bad"}
        ]}]}"#;
        let text = linearize(raw).unwrap();
        assert_eq!(text, "# --- Code Cell 1 ---\n>>> run()\nError: Error: bad");
    }

    #[test]
    fn test_missing_cells_is_an_error() {
        assert!(matches!(linearize(r#"{"metadata": {}}"#), Err(NotebookError::MissingCells)));
        assert!(matches!(linearize("not json"), Err(NotebookError::Json(_))));
    }

    #[test]
    fn test_is_notebook() {
        assert!(is_notebook("analysis/Explore.IPYNB"));
        assert!(!is_notebook("notebook.py"));
    }
}
