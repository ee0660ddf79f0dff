use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Full replacement. `id` and `created_at` in the body are read-only and
/// ignored. Every writable field must be present; `description` may be
/// `null`, which stores an empty description.
#[derive(Deserialize)]
pub struct ReplaceItem {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct PatchItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Default)]
pub struct Store {
    next_id: u64,
    items: BTreeMap<u64, Item>,
}

impl Store {
    fn insert(&mut self, title: String, description: String, completed: bool) -> Item {
        self.next_id += 1;
        let item = Item {
            id: self.next_id,
            title,
            description,
            completed,
            created_at: Utc::now(),
        };
        self.items.insert(item.id, item.clone());
        item
    }

    /// Newest first; ids break ties between equal timestamps.
    fn ordered(&self) -> Vec<Item> {
        let mut items: Vec<Item> = self.items.values().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/list/", get(index))
        .route("/api/item/", get(list_items).post(create_item))
        .route(
            "/api/item/{id}/",
            get(get_item)
                .put(replace_item)
                .patch(patch_item)
                .delete(delete_item),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Field-level validation failure, rendered as `{"field": ["message"]}`.
#[derive(Debug)]
pub struct FieldErrors(Vec<(&'static str, &'static str)>);

impl IntoResponse for FieldErrors {
    fn into_response(self) -> Response {
        let body: serde_json::Map<String, serde_json::Value> = self
            .0
            .into_iter()
            .map(|(field, msg)| (field.to_string(), json!([msg])))
            .collect();
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response()
}

fn validate_title(title: Option<String>) -> Result<String, FieldErrors> {
    match title {
        None => Err(FieldErrors(vec![("title", "This field is required.")])),
        Some(t) if t.trim().is_empty() => {
            Err(FieldErrors(vec![("title", "This field may not be blank.")]))
        }
        Some(t) => Ok(t),
    }
}

async fn index() -> &'static str {
    "Hello, world. You're at the list index!"
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    Json(db.read().await.ordered())
}

async fn create_item(State(db): State<Db>, Json(input): Json<CreateItem>) -> Response {
    let title = match validate_title(input.title) {
        Ok(t) => t,
        Err(e) => return e.into_response(),
    };
    let item = db.write().await.insert(
        title,
        input.description.unwrap_or_default(),
        input.completed,
    );
    tracing::info!(id = item.id, "item created");
    (StatusCode::CREATED, Json(item)).into_response()
}

async fn get_item(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    match db.read().await.items.get(&id) {
        Some(item) => Json(item.clone()).into_response(),
        None => not_found(),
    }
}

async fn replace_item(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<ReplaceItem>,
) -> Response {
    let mut store = db.write().await;
    let Some(item) = store.items.get_mut(&id) else {
        return not_found();
    };
    let (title, description, completed) = match validate_replacement(input) {
        Ok(fields) => fields,
        Err(e) => return e.into_response(),
    };
    item.title = title;
    item.description = description;
    item.completed = completed;
    Json(item.clone()).into_response()
}

/// All missing or invalid fields are reported together.
fn validate_replacement(input: ReplaceItem) -> Result<(String, String, bool), FieldErrors> {
    let mut errors = Vec::new();
    let title = match validate_title(input.title) {
        Ok(t) => Some(t),
        Err(FieldErrors(mut e)) => {
            errors.append(&mut e);
            None
        }
    };
    if input.description.is_none() {
        errors.push(("description", "This field is required."));
    }
    if input.completed.is_none() {
        errors.push(("completed", "This field is required."));
    }
    match (title, input.description, input.completed) {
        (Some(title), Some(description), Some(completed)) if errors.is_empty() => {
            Ok((title, description.unwrap_or_default(), completed))
        }
        _ => Err(FieldErrors(errors)),
    }
}

async fn patch_item(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<PatchItem>,
) -> Response {
    let mut store = db.write().await;
    let Some(item) = store.items.get_mut(&id) else {
        return not_found();
    };
    if let Some(title) = input.title {
        match validate_title(Some(title)) {
            Ok(t) => item.title = t,
            Err(e) => return e.into_response(),
        }
    }
    if let Some(description) = input.description {
        item.description = description;
    }
    if let Some(completed) = input.completed {
        item.completed = completed;
    }
    Json(item.clone()).into_response()
}

async fn delete_item(State(db): State<Db>, Path(id): Path<u64>) -> Response {
    match db.write().await.items.remove(&id) {
        Some(_) => {
            tracing::info!(id, "item deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        None => not_found(),
    }
}
