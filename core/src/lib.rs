//! Client core for the todo list's `/api/item/` REST resource.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host plugs in a
//! `Transport`; `TodoSession` drives it and keeps the local list in sync
//! with the server by re-fetching after every write.
//!
//! # Design
//! - `TodoClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `TodoState` is the one state container: snapshot, form inputs, the
//!   `EditState` sub-flow and the error banner.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod state;
pub mod transport;
pub mod types;
pub mod view;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Outcome, TodoSession};
pub use state::{EditState, FetchTicket, TodoState};
pub use transport::Transport;
pub use types::{DraftField, ItemId, NewTodo, TodoItem};
