//! `GET /slob` routes — container info as JSON, and content retrieval with
//! cache header bookkeeping.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::dict::{find, Dict};
use crate::error::AppError;
use crate::state::AppState;

/// Blob ids are stable for a given container id, so id-addressed content is
/// effectively immutable: one year.
const CACHE_IMMUTABLE: &str = "max-age=31556926";
/// A uri tag may be re-pointed at a newer container, so uri-addressed
/// content revalidates after ten minutes (backed by the ETag below).
const CACHE_BY_URI: &str = "max-age=600";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictInfo {
    pub id: String,
    pub compression: String,
    pub encoding: String,
    pub blob_count: u32,
    pub ref_count: usize,
    pub content_types: Vec<String>,
    pub tags: BTreeMap<String, String>,
}

impl DictInfo {
    fn of(dict: &Dict) -> Self {
        Self {
            id: dict.id().to_string(),
            compression: dict.compression().to_string(),
            encoding: dict.encoding().to_string(),
            blob_count: dict.blob_count(),
            ref_count: dict.len(),
            content_types: dict.content_types().to_vec(),
            tags: dict.tags().clone(),
        }
    }
}

/// `GET /slob` — info for every open container.
pub async fn list_info(State(state): State<AppState>) -> Json<Vec<DictInfo>> {
    Json(state.dicts.iter().map(|d| DictInfo::of(d)).collect())
}

/// `GET /slob/{id_or_uri}` — info for one container. Not cacheable: the set
/// of open containers is whatever the server was started with.
pub async fn dict_info(
    State(state): State<AppState>,
    Path(id_or_uri): Path<String>,
) -> Result<Response, AppError> {
    let (dict, _) = state
        .find_dict(&id_or_uri)
        .ok_or_else(|| AppError::NotFound(id_or_uri.clone()))?;
    Ok((
        [(header::CACHE_CONTROL, "no-cache")],
        Json(DictInfo::of(&dict)),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub blob: Option<String>,
}

/// `GET /slob/{id_or_uri}/{*key}?blob=B` — entry content.
///
/// Resolution order follows the link shape emitted by the lookup page:
/// a blob id (when the container was addressed by id) pins the exact entry;
/// otherwise the key is looked up exactly in that container. `If-None-Match`
/// against the quoted container id short-circuits the key lookup.
pub async fn content(
    State(state): State<AppState>,
    Path((id_or_uri, key)): Path<(String, String)>,
    Query(query): Query<ContentQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let (dict, by_id) = state
        .find_dict(&id_or_uri)
        .ok_or_else(|| AppError::NotFound(id_or_uri.clone()))?;

    let blob_id = query
        .blob
        .as_deref()
        .map(|raw| raw.parse::<u32>().map_err(|_| AppError::BadBlobId(raw.to_string())))
        .transpose()?;

    if by_id {
        if let Some(blob_id) = blob_id {
            let (content_type, bytes) = dict.get(blob_id)?;
            return Ok(content_response(content_type, bytes, CACHE_IMMUTABLE, None));
        }
    }

    let e_tag = format!("\"{}\"", dict.id());
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH) {
        if if_none_match.as_bytes() == e_tag.as_bytes() {
            return Ok(StatusCode::NOT_MODIFIED.into_response());
        }
    }

    if let Some((owner, item)) = find(&key, &[dict], false).into_iter().next() {
        let (content_type, bytes) = owner.get(item.id)?;
        let resp = if by_id {
            content_response(content_type, bytes, CACHE_IMMUTABLE, None)
        } else {
            content_response(content_type, bytes, CACHE_BY_URI, Some(&e_tag))
        };
        return Ok(resp);
    }

    Err(AppError::NotFound(key))
}

fn content_response(
    content_type: String,
    bytes: Vec<u8>,
    cache_control: &'static str,
    e_tag: Option<&str>,
) -> Response {
    let mut resp = bytes.into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );
    resp.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static(cache_control));
    if let Some(e_tag) = e_tag {
        if let Ok(value) = HeaderValue::from_str(e_tag) {
            resp.headers_mut().insert(header::ETAG, value);
        }
    }
    resp
}
