//! JSON export of the user's rows.
//!
//! The export is a plain pretty-printed array of rows as the remote store
//! returns them, suitable for backup or migration into another tool.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Todo;

/// Render rows as a pretty-printed JSON array.
pub fn render_export(todos: &[Todo]) -> Result<String> {
    Ok(serde_json::to_string_pretty(todos)?)
}

/// Write the export to `path`, creating parent directories as needed.
pub fn write_export(path: &Path, todos: &[Todo]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, render_export(todos)?)?;
    Ok(())
}

/// Default export file name, dated with the local export day.
#[must_use]
pub fn suggested_export_file_name(now: DateTime<Utc>) -> String {
    format!("tiga-export-{}.json", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::TodoId;

    #[test]
    fn file_name_embeds_the_date() {
        let now = Utc.with_ymd_and_hms(2026, 2, 7, 23, 59, 0).unwrap();
        assert_eq!(suggested_export_file_name(now), "tiga-export-2026-02-07.json");
    }

    #[test]
    fn render_is_a_parseable_row_array() {
        let mut doc = Todo::draft(TodoId::new(2), "user-1", "Plan");
        doc.is_document = true;
        doc.content = Some("- [ ] pack".to_string());
        let todos = vec![Todo::draft(TodoId::new(1), "user-1", "Buy milk"), doc];

        let rendered = render_export(&todos).unwrap();
        let parsed: Vec<Todo> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, todos);
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/backup/export.json");

        write_export(&path, &[Todo::draft(TodoId::new(1), "user-1", "t")]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Vec<Todo> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }
}
