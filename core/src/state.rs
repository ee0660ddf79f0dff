//! Local state of the todo list client.
//!
//! # Design
//! `TodoState` is the single owner of everything the list view renders: the
//! snapshot of the server collection, the new-item form inputs, the edit
//! sub-flow and the error banner. The snapshot is only ever replaced
//! wholesale from a fetch response; nothing mutates items in place.
//!
//! Fetches are stamped with monotonically increasing tickets. A response is
//! applied only if no newer fetch has already landed, so overlapping
//! requests resolve to the most recently issued fetch instead of whichever
//! response arrives last.
//!
//! `TodoSession` issues and applies a ticket within one blocking call, so
//! through it a fetch is never stale; the guard matters for hosts that keep
//! several fetches in flight and apply their responses as they arrive.

use crate::types::{DraftField, ItemId, TodoItem};

/// Edit sub-flow: at most one draft exists at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Idle,
    Editing(TodoItem),
}

/// Stamp handed out when a fetch is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone, Default)]
pub struct TodoState {
    items: Vec<TodoItem>,
    pub new_title: String,
    pub new_description: String,
    edit: EditState,
    banner: Option<String>,
    issued: u64,
    applied: u64,
}

impl TodoState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&TodoItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn issue_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Replace the snapshot with `items` unless a newer fetch already landed.
    /// Returns whether the snapshot was replaced.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, items: Vec<TodoItem>) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "discarding stale fetch");
            return false;
        }
        self.applied = ticket.0;
        self.items = items;
        true
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn draft(&self) -> Option<&TodoItem> {
        match &self.edit {
            EditState::Idle => None,
            EditState::Editing(draft) => Some(draft),
        }
    }

    /// Open the edit form on an independent copy of `item`, replacing any
    /// draft already in progress.
    pub fn begin_edit(&mut self, item: &TodoItem) {
        self.edit = EditState::Editing(item.clone());
    }

    /// Returns false when no draft is open.
    pub fn update_draft(&mut self, field: DraftField, value: impl Into<String>) -> bool {
        let EditState::Editing(draft) = &mut self.edit else {
            return false;
        };
        let value = value.into();
        match field {
            DraftField::Title => draft.title = value,
            DraftField::Description => draft.description = Some(value),
        }
        true
    }

    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    pub fn clear_new_inputs(&mut self) {
        self.new_title.clear();
        self.new_description.clear();
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }

    pub fn clear_banner(&mut self) {
        self.banner = None;
    }
}
