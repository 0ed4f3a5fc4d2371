use serde::Serialize;
use serde_json::{Map, Value};
use tb_core::responses::BoardResponse;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown for each task in table output.
const TASK_COLUMNS: [&str; 5] = ["id", "title", "category", "due_date", "status"];

pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Raw => serde_json::to_string(value)?,
        OutputFormat::Table => table_for(&serde_json::to_value(value)?),
    };
    Ok(rendered)
}

/// Print a response to stdout in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}

/// Render the board. Tables get a heading line and one section per column.
pub fn render_board(board: &BoardResponse, format: OutputFormat) -> anyhow::Result<String> {
    if format != OutputFormat::Table {
        return render(board, format);
    }

    let mut out = format!(
        "{} ({}) rev {}",
        board.owner.display_name, board.owner.user_id, board.revision
    );
    for column in &board.columns {
        let tasks = serde_json::to_value(&column.tasks)?;
        let body = match tasks.as_array() {
            Some(tasks) if !tasks.is_empty() => task_table(tasks),
            _ => String::from("(no tasks)"),
        };
        out.push_str(&format!("\n\n{} [{}]\n{body}", column.title, column.count));
    }
    Ok(out)
}

pub fn output_board(board: &BoardResponse, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render_board(board, format)?);
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn table_for(value: &Value) -> String {
    match value {
        Value::Array(items) if items.is_empty() => String::from("(no tasks)"),
        Value::Array(items) => task_table(items),
        Value::Object(map) => key_value_table(map),
        scalar => table::render_entity_table(&["value"], &[vec![cell(scalar)]], options()),
    }
}

fn task_table(tasks: &[Value]) -> String {
    let rows = tasks
        .iter()
        .map(|task| {
            TASK_COLUMNS
                .iter()
                .map(|column| task.get(*column).map_or_else(|| String::from("-"), cell))
                .collect::<Vec<String>>()
        })
        .collect::<Vec<_>>();
    table::render_entity_table(&TASK_COLUMNS, &rows, options())
}

/// Nested objects (the user of an auth response) are flattened as
/// `parent.child` keys.
fn key_value_table(map: &Map<String, Value>) -> String {
    let mut rows = Vec::new();
    flatten_into(&mut rows, "", map);
    table::render_entity_table(&["key", "value"], &rows, options())
}

fn flatten_into(rows: &mut Vec<Vec<String>>, prefix: &str, map: &Map<String, Value>) {
    for (key, value) in map {
        let key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(rows, &key, nested),
            other => rows.push(vec![key, cell(other)]),
        }
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use tb_core::entities::Task;
    use tb_core::enums::{Bucket, Category, TaskStatus};
    use tb_core::identity::UserIdentity;
    use tb_core::responses::{AuthStatusResponse, BoardColumn, BoardResponse, TaskCreateResponse};

    use super::{render, render_board};
    use crate::cli::OutputFormat;

    fn ada() -> UserIdentity {
        UserIdentity {
            user_id: "usr-00000001".into(),
            display_name: "Ada".into(),
            photo_url: None,
        }
    }

    fn task(id: &str, title: &str, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            owner_id: "usr-00000001".into(),
            title: title.into(),
            description: None,
            category: Category::Work,
            due_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
            status,
            attachment_name: None,
            attachment_type: None,
            created_at: Utc::now(),
        }
    }

    fn board() -> BoardResponse {
        BoardResponse {
            owner: ada(),
            revision: 4,
            columns: vec![
                BoardColumn {
                    bucket: Bucket::Todo,
                    title: Bucket::Todo.title().into(),
                    count: 1,
                    tasks: vec![task("tsk-00000001", "Write report", TaskStatus::ToDo)],
                },
                BoardColumn {
                    bucket: Bucket::InProgress,
                    title: Bucket::InProgress.title().into(),
                    count: 0,
                    tasks: vec![],
                },
            ],
        }
    }

    #[test]
    fn create_response_as_pretty_and_raw_json() {
        let response = TaskCreateResponse {
            task_id: "tsk-00000009".into(),
            dismissed: true,
        };

        let pretty = render(&response, OutputFormat::Json).unwrap();
        assert!(pretty.contains('\n'));
        let raw = render(&response, OutputFormat::Raw).unwrap();
        assert_eq!(raw, r#"{"task_id":"tsk-00000009","dismissed":true}"#);
    }

    #[test]
    fn auth_status_table_flattens_the_user() {
        let status = AuthStatusResponse {
            authenticated: true,
            user: Some(ada()),
            signed_in_at: None,
            note: None,
        };
        let out = render(&status, OutputFormat::Table).unwrap();
        assert!(out.lines().next().is_some_and(|line| line.starts_with("key")));
        assert!(out.contains("user.display_name"));
        assert!(out.contains("Ada"));
        assert!(!out.contains('{'));
    }

    #[test]
    fn task_list_table_uses_task_columns() {
        let tasks = vec![
            task("tsk-00000001", "Write report", TaskStatus::ToDo),
            task("tsk-00000002", "Ship it", TaskStatus::InProgress),
        ];
        let out = render(&tasks, OutputFormat::Table).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id"));
        assert!(lines[0].contains("due_date"));
        assert!(!lines[0].contains("owner_id"));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].find("ToDo"), lines[3].find("In Progress"));
    }

    #[test]
    fn empty_task_list_table() {
        let out = render(&Vec::<Task>::new(), OutputFormat::Table).unwrap();
        assert_eq!(out, "(no tasks)");
    }

    #[test]
    fn board_table_has_a_section_per_column() {
        let out = render_board(&board(), OutputFormat::Table).unwrap();
        assert!(out.starts_with("Ada (usr-00000001) rev 4"));
        assert!(out.contains("Todo [1]"));
        assert!(out.contains("Write report"));
        assert!(out.contains("In-Progress [0]\n(no tasks)"));
    }

    #[test]
    fn board_json_is_the_response() {
        let out = render_board(&board(), OutputFormat::Raw).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["revision"], 4);
        assert_eq!(parsed["columns"][0]["bucket"], "todo");
        assert_eq!(parsed["columns"][0]["tasks"][0]["id"], "tsk-00000001");
    }
}
