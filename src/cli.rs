//! Interactive prompts and text output for the command-line frontend.

use std::io::{self, BufRead, Write};

use crate::sort::sorted_for_display;
use crate::task::{Task, DATE_FMT};

/// Raw answers collected by the interactive `add` flow, still untyped; the
/// store validates them.
pub struct NewTaskInput {
    pub summary: String,
    pub details: String,
    pub deadline: String,
    pub priority: String,
}

/// Prompt on stdin for the fields of a new task. EOF on any prompt behaves
/// like an empty answer.
pub fn prompt_new_task() -> io::Result<NewTaskInput> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut read_line = |prompt: &str| -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        match lines.next() {
            Some(line) => Ok(line?.trim().to_string()),
            None => Ok(String::new()),
        }
    };

    let deadline = read_line("deadline (YYYY-MM-DD): ")?;
    let summary = read_line("summary: ")?;
    let details = read_line("details: ")?;
    let priority = read_line("priority (1-5, default 1): ")?;

    Ok(NewTaskInput {
        summary,
        details,
        deadline,
        priority,
    })
}

/// Print the listing in display order. Done tasks are hidden unless `all`,
/// which also switches to the multi-line record form.
pub fn print_list(tasks: &[Task], all: bool) {
    for task in sorted_for_display(tasks) {
        if all {
            print_full(&task);
        } else if !task.done {
            print_row(&task);
        }
    }
}

fn print_row(task: &Task) {
    println!(
        "[{}/{}] {}",
        task.priority,
        task.deadline.format(DATE_FMT),
        task.summary
    );
}

fn print_full(task: &Task) {
    let state = if task.done { "done" } else { "todo" };
    println!("[{state}]     {}", task.summary);
    println!("details    {}", task.details);
    println!("added at   {}", task.added_at.format(DATE_FMT));
    println!("deadline   {}", task.deadline.format(DATE_FMT));
    println!("priority   {}", task.priority);
}
