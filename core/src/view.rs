//! Plain-text rendering of the list view.

use std::fmt::{Display, Write};

use chrono::{DateTime, TimeZone, Utc};

use crate::state::TodoState;
use crate::types::TodoItem;

pub const EMPTY_PLACEHOLDER: &str = "No todos yet! Add one above.";

/// `created_at` as a calendar date in `tz`.
pub fn format_created<Tz>(created_at: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created_at.with_timezone(tz).format("%b %-d, %Y").to_string()
}

/// Render the banner, the pending new-item inputs and the numbered list.
/// The item being edited is shown as its edit form.
pub fn render<Tz>(state: &TodoState, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();

    if let Some(banner) = state.banner() {
        let _ = writeln!(out, "! {banner}");
    }
    if !state.new_title.is_empty() || !state.new_description.is_empty() {
        let _ = writeln!(
            out,
            "new: {:?} {:?}",
            state.new_title, state.new_description
        );
    }

    if state.is_empty() {
        out.push_str(EMPTY_PLACEHOLDER);
        out.push('\n');
        return out;
    }

    let draft = state.draft();
    for (index, item) in state.items().iter().enumerate() {
        let n = index + 1;
        match draft {
            Some(draft) if draft.id == item.id => render_edit_form(&mut out, n, draft),
            _ => render_item(&mut out, n, item, tz),
        }
    }
    out
}

fn render_item<Tz>(out: &mut String, n: usize, item: &TodoItem, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mark = if item.completed { 'x' } else { ' ' };
    let _ = writeln!(out, "{n}. [{mark}] {}", item.title);
    if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "       {description}");
    }
    let _ = writeln!(out, "       Created: {}", format_created(&item.created_at, tz));
}

fn render_edit_form(out: &mut String, n: usize, draft: &TodoItem) {
    let _ = writeln!(out, "{n}. (editing) title: {}", draft.title);
    let _ = writeln!(
        out,
        "       description: {}",
        draft.description.as_deref().unwrap_or("")
    );
    out.push_str("       [save] [cancel]\n");
}
