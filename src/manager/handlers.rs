//! Management endpoint handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::SchemaError;
use crate::manager::{pages, ManagerState};
use crate::schema::{dynamic, registry::SCHEMA_SUFFIX};

/// One row of the type listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaItem {
    pub file_name: String,
    pub msg_name: String,
    pub msg_type: &'static str,
    pub example: String,
}

/// `GET /` — static console page.
pub async fn index() -> Html<&'static str> {
    Html(pages::INDEX)
}

/// `GET /st/meta` — every loaded message and enum type, with a zero-valued
/// JSON example per message.
pub async fn meta(State(state): State<ManagerState>) -> Json<Vec<MetaItem>> {
    let mut items = Vec::new();
    for file in state.registry.file_descriptors() {
        for message in file.messages() {
            let example = match dynamic::zero_value_json(&message) {
                Ok(example) => example,
                Err(err) => {
                    tracing::warn!(message = %message.full_name(), error = %err, "example render failed");
                    String::new()
                }
            };
            items.push(MetaItem {
                file_name: file.name().to_string(),
                msg_name: message.full_name().to_string(),
                msg_type: "message",
                example,
            });
        }
        for enumeration in file.enums() {
            let example = enumeration
                .values()
                .map(|v| format!("{} = {}", v.name(), v.number()))
                .collect::<Vec<_>>()
                .join(", ");
            items.push(MetaItem {
                file_name: file.name().to_string(),
                msg_name: enumeration.full_name().to_string(),
                msg_type: "enum",
                example,
            });
        }
    }
    Json(items)
}

/// `GET /do/reload` — explicit reload; previous good state survives errors.
pub async fn reload(State(state): State<ManagerState>) -> Json<serde_json::Value> {
    match state.registry.load() {
        Ok(()) => Json(json!({ "status": "ok" })),
        Err(err) => {
            tracing::error!(error = %err, "explicit schema reload failed");
            Json(json!({ "status": "error", "error": err.to_string() }))
        }
    }
}

/// `POST /do/upload` — multipart schema upload; every part must be a
/// `.proto` file. Each file is written and the set reloaded.
pub async fn upload(
    State(state): State<ManagerState>,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    let mut uploaded = 0usize;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return Json(json!({ "status": "error", "error": err.to_string() }));
            }
        };
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        if !name.ends_with(SCHEMA_SUFFIX) {
            return Json(json!({
                "status": "error",
                "error": format!("only {SCHEMA_SUFFIX} files are allowed, got {name}"),
            }));
        }
        let content = match field.bytes().await {
            Ok(content) => content,
            Err(err) => {
                return Json(json!({ "status": "error", "error": err.to_string() }));
            }
        };
        if let Err(err) = state.registry.add_file(&name, &content) {
            return Json(json!({ "status": "error", "error": err.to_string() }));
        }
        uploaded += 1;
    }
    if uploaded == 0 {
        return Json(json!({ "status": "error", "error": "no files in upload" }));
    }
    Json(json!({ "status": "ok", "uploaded": uploaded }))
}

/// `GET /st/file/{name}` — raw schema file contents.
pub async fn read_file(State(state): State<ManagerState>, Path(name): Path<String>) -> Response {
    match state.registry.read_file(&name) {
        Ok(content) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            content,
        )
            .into_response(),
        Err(err @ SchemaError::FileNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

/// `DELETE /st/file/{name}` — remove a schema file; reload stays explicit.
pub async fn delete_file(State(state): State<ManagerState>, Path(name): Path<String>) -> Response {
    match state.registry.delete_file(&name) {
        Ok(()) => Json(json!({ "status": "ok" })).into_response(),
        Err(err @ SchemaError::FileNotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}
