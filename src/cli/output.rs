//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::lists::{Note, Todo};
use crate::vault::EntryView;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Masked placeholder for hidden passwords.
const CONCEALED: &str = "\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}";

/// Print a table of vault entries (Id, Service, Username, Password).
///
/// With `reveal`, each password is decrypted individually; an entry that
/// fails shows the decrypt sentinel instead of aborting the listing.
pub fn print_entries_table(entries: &[EntryView<'_>], reveal: bool) {
    if entries.is_empty() {
        info("No passwords saved yet.");
        tip("Run `bento pass add <SERVICE> <USERNAME>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Service", "Username", "Password"]);

    for e in entries {
        let password = if reveal {
            e.reveal_or_sentinel().to_string()
        } else {
            CONCEALED.to_string()
        };
        table.add_row(vec![
            e.id().to_string(),
            e.service().to_string(),
            e.username().to_string(),
            password,
        ]);
    }

    println!("{table}");
}

/// Print a table of notes (Id, Title, Content, Updated).
pub fn print_notes_table(notes: &[Note]) {
    if notes.is_empty() {
        info("No notes yet.");
        tip("Run `bento note add <CONTENT>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Title", "Content", "Updated"]);

    for n in notes {
        table.add_row(vec![
            n.id.clone(),
            n.display_title().to_string(),
            n.content.clone(),
            format_timestamp(n.updated_at),
        ]);
    }

    println!("{table}");
}

/// Print a table of tasks (Id, Done, Task, Due).
pub fn print_todos_table(todos: &[Todo]) {
    if todos.is_empty() {
        info("No tasks yet.");
        tip("Run `bento todo add <TEXT>` to create one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Done", "Task", "Due"]);

    for t in todos {
        table.add_row(vec![
            t.id.clone(),
            if t.completed { "\u{2713}" } else { "" }.to_string(),
            t.text.clone(),
            t.due_date.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}

fn format_timestamp(ts: Option<chrono::DateTime<chrono::Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}
