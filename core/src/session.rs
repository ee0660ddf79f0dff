//! The todo collection client: state plus the operations that change it.
//!
//! # Design
//! Every mutation is write-through with full invalidation: the request goes
//! to the server and, on success, the whole collection is fetched again so
//! the server stays the single source of truth. Nothing is applied
//! optimistically.
//!
//! Failures never escape an operation. They are logged, written to the
//! state's error banner, and reported as `Outcome::Failed`; the previous
//! local state is kept as is.

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::state::TodoState;
use crate::transport::Transport;
use crate::types::{DraftField, ItemId, NewTodo, TodoItem};

/// What an operation ended up doing.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The request succeeded and the collection was re-fetched.
    Applied,
    /// Local validation blocked the action; no request was issued.
    Skipped,
    /// The request failed; the error is in the banner.
    Failed,
}

pub struct TodoSession<T> {
    client: TodoClient,
    transport: T,
    state: TodoState,
}

impl<T: Transport> TodoSession<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            state: TodoState::new(),
        }
    }

    pub fn state(&self) -> &TodoState {
        &self.state
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn set_new_title(&mut self, title: impl Into<String>) {
        self.state.new_title = title.into();
    }

    pub fn set_new_description(&mut self, description: impl Into<String>) {
        self.state.new_description = description.into();
    }

    /// Replace the local snapshot with the server's collection.
    pub fn fetch_all(&mut self) -> Outcome {
        match self.refresh() {
            Ok(()) => {
                self.state.clear_banner();
                Outcome::Applied
            }
            Err(e) => self.fail("load todos", e),
        }
    }

    /// Submit the new-item form. A blank title is skipped silently.
    pub fn create(&mut self) -> Outcome {
        if self.state.new_title.trim().is_empty() {
            tracing::debug!("create skipped: blank title");
            return Outcome::Skipped;
        }
        let input = NewTodo::new(
            self.state.new_title.clone(),
            self.state.new_description.clone(),
        );
        let result = self
            .client
            .build_create_item(&input)
            .and_then(|req| self.send(req, TodoClient::parse_create_item));
        match result {
            Ok(created) => {
                tracing::info!(id = %created.id, title = %created.title, "created todo");
                self.state.clear_new_inputs();
                self.after_write()
            }
            Err(e) => self.fail("add todo", e),
        }
    }

    /// Flip `completed` on the server with a full-record replacement.
    pub fn toggle(&mut self, item: &TodoItem) -> Outcome {
        let replacement = item.toggled();
        let result = self
            .client
            .build_replace_item(&replacement)
            .and_then(|req| self.send(req, TodoClient::parse_replace_item));
        match result {
            Ok(updated) => {
                tracing::info!(id = %updated.id, completed = updated.completed, "toggled todo");
                self.after_write()
            }
            Err(e) => self.fail("update todo", e),
        }
    }

    pub fn begin_edit(&mut self, item: &TodoItem) {
        self.state.begin_edit(item);
    }

    pub fn update_draft_field(&mut self, field: DraftField, value: impl Into<String>) {
        if !self.state.update_draft(field, value) {
            tracing::debug!(?field, "draft update ignored: no edit in progress");
        }
    }

    /// Persist the open draft. Skipped when nothing is being edited or the
    /// draft title is blank; on failure the edit form stays open.
    pub fn save_edit(&mut self) -> Outcome {
        let Some(draft) = self.state.draft().cloned() else {
            return Outcome::Skipped;
        };
        if draft.title.trim().is_empty() {
            tracing::debug!(id = %draft.id, "save skipped: blank title");
            return Outcome::Skipped;
        }
        let result = self
            .client
            .build_replace_item(&draft)
            .and_then(|req| self.send(req, TodoClient::parse_replace_item));
        match result {
            Ok(saved) => {
                tracing::info!(id = %saved.id, "saved todo");
                self.state.cancel_edit();
                self.after_write()
            }
            Err(e) => self.fail("save edit", e),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    pub fn delete_item(&mut self, id: ItemId) -> Outcome {
        let req = self.client.build_delete_item(id);
        match self.send(req, TodoClient::parse_delete_item) {
            Ok(()) => {
                tracing::info!(%id, "deleted todo");
                self.after_write()
            }
            Err(e) => self.fail("delete todo", e),
        }
    }

    /// Fetch a single item without touching the snapshot.
    pub fn show(&mut self, id: ItemId) -> Option<TodoItem> {
        let req = self.client.build_get_item(id);
        match self.send(req, TodoClient::parse_get_item) {
            Ok(item) => Some(item),
            Err(e) => {
                let _ = self.fail("load todo", e);
                None
            }
        }
    }

    fn send<R>(
        &mut self,
        req: HttpRequest,
        parse: impl FnOnce(&TodoClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        tracing::debug!(method = req.method.as_str(), path = %req.path, "sending request");
        let response = self.transport.execute(req)?;
        tracing::debug!(status = response.status, "received response");
        parse(&self.client, response)
    }

    fn refresh(&mut self) -> Result<(), ApiError> {
        let ticket = self.state.issue_fetch();
        let req = self.client.build_list_items();
        let items = self.send(req, TodoClient::parse_list_items)?;
        if !self.state.apply_fetch(ticket, items) {
            tracing::warn!(?ticket, "fetch response superseded by a newer one");
        }
        Ok(())
    }

    /// The write already happened, so a failed re-fetch only shows in the
    /// banner.
    fn after_write(&mut self) -> Outcome {
        self.state.clear_banner();
        if let Err(e) = self.refresh() {
            let _ = self.fail("load todos", e);
        }
        Outcome::Applied
    }

    fn fail(&mut self, action: &str, err: ApiError) -> Outcome {
        tracing::warn!(action, error = %err, "request failed");
        self.state.set_banner(format!("Could not {action}: {err}"));
        Outcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::http::HttpMethod;
    use crate::state::EditState;

    /// Replays canned responses and records every request it sees.
    #[derive(Default)]
    struct Scripted {
        responses: VecDeque<Result<HttpResponse, ApiError>>,
        requests: Vec<HttpRequest>,
    }

    impl Scripted {
        fn reply(mut self, status: u16, body: &str) -> Self {
            self.responses.push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        fn unreachable(mut self) -> Self {
            self.responses
                .push_back(Err(ApiError::Transport("connection refused".to_string())));
            self
        }
    }

    impl Transport for Scripted {
        fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.push(request);
            self.responses
                .pop_front()
                .expect("no scripted response left")
        }
    }

    const MILK: &str = r#"{"id":1,"title":"Buy milk","description":"","completed":false,"created_at":"2025-03-01T09:00:00Z"}"#;
    const MILK_DONE: &str = r#"{"id":1,"title":"Buy milk","description":"","completed":true,"created_at":"2025-03-01T09:00:00Z"}"#;

    fn session(transport: Scripted) -> TodoSession<Scripted> {
        TodoSession::new(TodoClient::new("http://test"), transport)
    }

    fn loaded(transport: Scripted) -> TodoSession<Scripted> {
        let mut s = session(Scripted::default().reply(200, &format!("[{MILK}]")));
        assert_eq!(s.fetch_all(), Outcome::Applied);
        s.transport = transport;
        s
    }

    #[test]
    fn fetch_all_empty_collection() {
        let mut s = session(Scripted::default().reply(200, "[]"));
        assert_eq!(s.fetch_all(), Outcome::Applied);
        assert!(s.state().is_empty());
    }

    #[test]
    fn fetch_failure_keeps_previous_list_and_sets_banner() {
        let mut s = loaded(Scripted::default().reply(500, "boom"));
        assert_eq!(s.fetch_all(), Outcome::Failed);
        assert_eq!(s.state().items().len(), 1);
        assert!(s.state().banner().unwrap().contains("HTTP 500"));
    }

    #[test]
    fn blank_title_issues_no_request() {
        let mut s = session(Scripted::default());
        s.set_new_title("   \t");
        s.set_new_description("ignored");
        assert_eq!(s.create(), Outcome::Skipped);
        assert!(s.transport.requests.is_empty());
        assert_eq!(s.state().new_description, "ignored");
    }

    #[test]
    fn create_posts_then_refetches_and_clears_inputs() {
        let mut s = session(
            Scripted::default()
                .reply(201, MILK)
                .reply(200, &format!("[{MILK}]")),
        );
        s.set_new_title("Buy milk");
        assert_eq!(s.create(), Outcome::Applied);

        let methods: Vec<_> = s.transport.requests.iter().map(|r| r.method).collect();
        assert_eq!(methods, [HttpMethod::Post, HttpMethod::Get]);
        let body: serde_json::Value =
            serde_json::from_str(s.transport.requests[0].body.as_deref().unwrap()).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["completed"], false);

        assert!(s.state().new_title.is_empty());
        assert!(s.state().new_description.is_empty());
        assert_eq!(s.state().items()[0].title, "Buy milk");
    }

    #[test]
    fn create_failure_leaves_inputs_populated() {
        let mut s = session(Scripted::default().unreachable());
        s.set_new_title("Buy milk");
        s.set_new_description("2 litres");
        assert_eq!(s.create(), Outcome::Failed);
        assert_eq!(s.state().new_title, "Buy milk");
        assert_eq!(s.state().new_description, "2 litres");
        assert!(s.state().banner().unwrap().contains("connection refused"));
        assert_eq!(s.transport.requests.len(), 1);
    }

    #[test]
    fn toggle_sends_full_record_with_completed_negated() {
        let mut s = loaded(
            Scripted::default()
                .reply(200, MILK_DONE)
                .reply(200, &format!("[{MILK_DONE}]")),
        );
        let item = s.state().items()[0].clone();
        assert_eq!(s.toggle(&item), Outcome::Applied);

        let put = &s.transport.requests[0];
        assert_eq!(put.method, HttpMethod::Put);
        assert_eq!(put.path, "http://test/api/item/1/");
        let body: TodoItem = serde_json::from_str(put.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, item.toggled());
        assert!(s.state().items()[0].completed);
    }

    #[test]
    fn toggle_failure_does_not_mutate_locally() {
        let mut s = loaded(Scripted::default().reply(503, "unavailable"));
        let item = s.state().items()[0].clone();
        assert_eq!(s.toggle(&item), Outcome::Failed);
        assert!(!s.state().items()[0].completed);
    }

    #[test]
    fn save_edit_success_returns_to_idle() {
        let renamed = MILK.replace("Buy milk", "Buy oat milk");
        let mut s = loaded(
            Scripted::default()
                .reply(200, &renamed)
                .reply(200, &format!("[{renamed}]")),
        );
        let item = s.state().items()[0].clone();
        s.begin_edit(&item);
        s.update_draft_field(DraftField::Title, "Buy oat milk");
        assert_eq!(s.save_edit(), Outcome::Applied);

        let body: TodoItem =
            serde_json::from_str(s.transport.requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body.title, "Buy oat milk");
        assert_eq!(body.description, item.description);
        assert_eq!(body.completed, item.completed);
        assert_eq!(body.created_at, item.created_at);
        assert_eq!(s.state().edit_state(), &EditState::Idle);
        assert_eq!(s.state().items()[0].title, "Buy oat milk");
    }

    #[test]
    fn save_edit_failure_keeps_draft_open() {
        let mut s = loaded(Scripted::default().reply(400, r#"{"title":["too long"]}"#));
        let item = s.state().items()[0].clone();
        s.begin_edit(&item);
        s.update_draft_field(DraftField::Title, "x");
        assert_eq!(s.save_edit(), Outcome::Failed);
        assert_eq!(s.state().draft().unwrap().title, "x");
        assert_eq!(s.state().items()[0], item);
    }

    #[test]
    fn save_edit_with_blank_title_or_no_draft_is_skipped() {
        let mut s = loaded(Scripted::default());
        assert_eq!(s.save_edit(), Outcome::Skipped);

        let item = s.state().items()[0].clone();
        s.begin_edit(&item);
        s.update_draft_field(DraftField::Title, "  ");
        assert_eq!(s.save_edit(), Outcome::Skipped);
        assert!(s.transport.requests.is_empty());
        assert!(s.state().draft().is_some());
    }

    #[test]
    fn cancel_edit_leaves_item_untouched() {
        let mut s = loaded(Scripted::default());
        let item = s.state().items()[0].clone();
        s.begin_edit(&item);
        s.update_draft_field(DraftField::Description, "scratch");
        s.cancel_edit();
        assert_eq!(s.state().items()[0], item);
        assert!(s.state().draft().is_none());
        assert!(s.transport.requests.is_empty());
    }

    #[test]
    fn delete_refetches_after_success() {
        let mut s = loaded(Scripted::default().reply(204, "").reply(200, "[]"));
        assert_eq!(s.delete_item(ItemId(1)), Outcome::Applied);
        assert_eq!(s.transport.requests[0].method, HttpMethod::Delete);
        assert!(s.state().is_empty());
    }

    #[test]
    fn delete_failure_keeps_item() {
        let mut s = loaded(Scripted::default().reply(404, ""));
        assert_eq!(s.delete_item(ItemId(1)), Outcome::Failed);
        assert_eq!(s.state().items().len(), 1);
        assert!(s.state().banner().unwrap().contains("not found"));
    }

    #[test]
    fn write_succeeds_but_refetch_fails() {
        let mut s = loaded(Scripted::default().reply(204, "").unreachable());
        assert_eq!(s.delete_item(ItemId(1)), Outcome::Applied);
        assert_eq!(s.state().items().len(), 1);
        assert!(s.state().banner().unwrap().contains("load todos"));
    }

    #[test]
    fn success_clears_previous_banner() {
        let mut s = loaded(Scripted::default().unreachable().reply(200, "[]"));
        assert_eq!(s.fetch_all(), Outcome::Failed);
        assert!(s.state().banner().is_some());
        assert_eq!(s.fetch_all(), Outcome::Applied);
        assert!(s.state().banner().is_none());
    }

    #[test]
    fn show_does_not_touch_snapshot() {
        let mut s = loaded(Scripted::default().reply(200, MILK_DONE));
        let item = s.show(ItemId(1)).unwrap();
        assert!(item.completed);
        assert!(!s.state().items()[0].completed);
    }
}
