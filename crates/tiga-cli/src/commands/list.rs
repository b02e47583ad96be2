use serde::Serialize;
use tiga_core::config::AppConfig;

use crate::commands::common::{
    format_todo_lines, signed_in, todo_service, todo_to_list_item, truncate_title, TodoListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct DocTaskItem {
    doc_id: i64,
    doc_title: String,
    line: usize,
    text: String,
    is_completed: bool,
}

pub async fn run_list(
    config: &AppConfig,
    limit: usize,
    docs: bool,
    doc_tasks: bool,
    as_json: bool,
) -> Result<(), CliError> {
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    if doc_tasks {
        let items: Vec<DocTaskItem> = service
            .doc_tasks()
            .await
            .into_iter()
            .take(limit)
            .map(|task| DocTaskItem {
                doc_id: task.doc_id.raw(),
                doc_title: task.doc_title,
                line: task.line_index,
                text: task.text,
                is_completed: task.is_completed,
            })
            .collect();

        if as_json {
            println!("{}", serde_json::to_string_pretty(&items)?);
        } else {
            for item in items {
                let marker = if item.is_completed { "[x]" } else { "[ ]" };
                println!(
                    "{:>6}:{:<3}  {marker}  {:<40}  ({})",
                    item.doc_id,
                    item.line,
                    truncate_title(&item.text, 40),
                    item.doc_title
                );
            }
        }
        return Ok(());
    }

    let rows: Vec<_> = service
        .rows()
        .await
        .into_iter()
        .filter(|row| row.is_document == docs)
        .take(limit)
        .collect();

    if as_json {
        let items = rows.iter().map(todo_to_list_item).collect::<Vec<TodoListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_todo_lines(&rows) {
            println!("{line}");
        }
    }

    Ok(())
}
