//! HTML views and form endpoints.
//!
//! Pages are rendered server-side into plain HTML; every mutation endpoint
//! answers a successful POST with `303 See Other` back to the listing,
//! carrying a flash message in the query string. Validation failures come
//! back as `400` with the error message as the body.

use std::fmt::Write as _;
use std::sync::Arc;

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, Redirect};
use chrono::Utc;
use serde::Deserialize;

use crate::sort::sorted_for_display;
use crate::task::{parse_deadline, parse_priority, DoneChange, Task, TaskError, TaskPatch, DATE_FMT};

use super::routes::AppState;

// ─────────────────────────────────────────────────────────────────────────────
// Request Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IndexQuery {
    all: Option<String>,
    flash: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    details: String,
    #[serde(default)]
    deadline: String,
    #[serde(default)]
    priority: String,
}

/// Sparse edit form; omitted or empty fields are left unchanged. `done`
/// accepts an explicit truthy/falsy value from the edit page or the literal
/// `toggle` from the listing's quick action.
#[derive(Debug, Default, Deserialize)]
pub struct SetForm {
    done: Option<String>,
    summary: Option<String>,
    details: Option<String>,
    priority: Option<String>,
    deadline: Option<String>,
}

/// Lenient truthy-string check for query flags and form checkboxes.
fn is_true(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "1" | "t" | "true" | "yes" | "y" | "on"
    )
}

fn form_to_patch(form: SetForm) -> Result<TaskPatch, TaskError> {
    let mut patch = TaskPatch::default();

    if let Some(done) = form.done.as_deref() {
        if done.trim().eq_ignore_ascii_case("toggle") {
            patch.done = Some(DoneChange::Toggle);
        } else if !done.trim().is_empty() {
            patch.done = Some(DoneChange::Set(is_true(done)));
        }
    }
    if let Some(s) = form.summary {
        if !s.trim().is_empty() {
            patch.summary = Some(s);
        }
    }
    if let Some(d) = form.details {
        if !d.is_empty() {
            patch.details = Some(d);
        }
    }
    if let Some(p) = form.priority.as_deref() {
        // Range is checked by the store before anything is touched.
        patch.priority = parse_priority(p)?;
    }
    if let Some(d) = form.deadline.as_deref() {
        patch.deadline = parse_deadline(d)?;
    }
    Ok(patch)
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET / - the listing page.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(q): Query<IndexQuery>,
) -> Html<String> {
    let show_all = q.all.as_deref().map(is_true).unwrap_or(false);
    let tasks = state.store.list().await;
    Html(render_index(&tasks, show_all, q.flash.as_deref()))
}

/// GET /edit/:summary - edit form prefilled from the first match.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(summary): Path<String>,
) -> Result<Html<String>, (StatusCode, String)> {
    match state.store.find_first(&summary).await {
        Some(example) => Ok(Html(render_edit(&summary, &example))),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("no task found with summary: {summary:?}"),
        )),
    }
}

/// POST /add - create a task from the add form.
pub async fn add(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AddForm>,
) -> Result<Redirect, (StatusCode, String)> {
    match state
        .store
        .create(&form.summary, &form.details, &form.deadline, &form.priority)
        .await
    {
        Ok(_) => Ok(flash_redirect("task added")),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

/// POST /set/:summary - patch every task with a matching summary.
pub async fn set(
    State(state): State<Arc<AppState>>,
    Path(summary): Path<String>,
    Form(form): Form<SetForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let patch = form_to_patch(form).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    match state.store.patch(&summary, &patch).await {
        Ok(updated) => Ok(flash_redirect(&format!(
            "updated {updated} task(s) with summary {summary:?}"
        ))),
        Err(e) => Err((StatusCode::BAD_REQUEST, e.to_string())),
    }
}

/// POST /delete/:summary - delete every task with a matching summary.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(summary): Path<String>,
) -> Redirect {
    let removed = state.store.delete(&summary).await;
    flash_redirect(&format!(
        "deleted {removed} task(s) with summary {summary:?}"
    ))
}

fn flash_redirect(message: &str) -> Redirect {
    Redirect::to(&format!("/?flash={}", urlencoding::encode(message)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         <style>\n\
         body {{ font-family: sans-serif; max-width: 48rem; margin: 2rem auto; }}\n\
         table {{ border-collapse: collapse; width: 100%; }}\n\
         td, th {{ padding: 0.3rem 0.6rem; text-align: left; }}\n\
         tr.done {{ color: #888; text-decoration: line-through; }}\n\
         .flash {{ background: #e6f4e6; padding: 0.5rem; }}\n\
         form.inline {{ display: inline; }}\n\
         </style>\n</head>\n<body>\n{body}</body>\n</html>\n"
    )
}

fn render_index(tasks: &[Task], show_all: bool, flash: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<h1>tasks</h1>\n");

    if let Some(flash) = flash {
        let _ = writeln!(body, "<p class=\"flash\">{}</p>", html_escape(flash));
    }

    if show_all {
        body.push_str("<p><a href=\"/\">hide done</a></p>\n");
    } else {
        body.push_str("<p><a href=\"/?all=1\">show done</a></p>\n");
    }

    body.push_str(
        "<table>\n<tr><th>pri</th><th>deadline</th><th>summary</th>\
         <th>details</th><th></th></tr>\n",
    );
    for task in sorted_for_display(tasks) {
        if task.done && !show_all {
            continue;
        }
        let class = if task.done { " class=\"done\"" } else { "" };
        let esc = urlencoding::encode(&task.summary);
        let toggle_label = if task.done { "undone" } else { "done" };
        let _ = writeln!(
            body,
            "<tr{class}><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td><a href=\"/edit/{esc}\">edit</a> \
             <form class=\"inline\" method=\"post\" action=\"/set/{esc}\">\
             <input type=\"hidden\" name=\"done\" value=\"toggle\">\
             <button>{toggle_label}</button></form> \
             <form class=\"inline\" method=\"post\" action=\"/delete/{esc}\">\
             <button>delete</button></form></td></tr>",
            task.priority,
            task.deadline.format(DATE_FMT),
            html_escape(&task.summary),
            html_escape(&task.details),
        );
    }
    body.push_str("</table>\n");

    let today = Utc::now().date_naive().format(DATE_FMT);
    let _ = writeln!(
        body,
        "<h2>add</h2>\n\
         <form method=\"post\" action=\"/add\">\n\
         <p>summary <input name=\"summary\"></p>\n\
         <p>details <input name=\"details\"></p>\n\
         <p>deadline <input name=\"deadline\" value=\"{today}\"></p>\n\
         <p>priority <input name=\"priority\" value=\"1\"></p>\n\
         <p><button>add</button></p>\n\
         </form>"
    );

    page("tasks", &body)
}

fn render_edit(match_summary: &str, example: &Task) -> String {
    let esc = urlencoding::encode(match_summary);
    let done_value = if example.done { "true" } else { "false" };
    let body = format!(
        "<h1>edit {match_esc}</h1>\n\
         <p>every task with this summary is updated; empty fields are left \
         unchanged</p>\n\
         <form method=\"post\" action=\"/set/{esc}\">\n\
         <p>summary <input name=\"summary\" value=\"{summary}\"></p>\n\
         <p>details <input name=\"details\" value=\"{details}\"></p>\n\
         <p>deadline <input name=\"deadline\" value=\"{deadline}\"></p>\n\
         <p>priority <input name=\"priority\" value=\"{priority}\"></p>\n\
         <p>done <select name=\"done\">\
         <option value=\"\">leave unchanged</option>\
         <option value=\"true\">done</option>\
         <option value=\"false\">not done</option>\
         </select> (currently {done_value})</p>\n\
         <p><button>save</button> <a href=\"/\">back</a></p>\n\
         </form>\n",
        match_esc = html_escape(match_summary),
        summary = html_escape(&example.summary),
        details = html_escape(&example.details),
        deadline = example.deadline.format(DATE_FMT),
        priority = example.priority,
    );
    page("edit task", &body)
}
