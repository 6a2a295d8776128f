//! `GET /lookup` — search all containers and render the result page.

use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;

use crate::dict::find;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub word: Option<String>,
    /// Per-request override of the configured result cap.
    pub limit: Option<usize>,
}

pub async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Html<String> {
    let limit = query.limit.unwrap_or(state.limit);
    let word = query.word.unwrap_or_default();

    let mut word_list = String::new();
    let mut content_url: Option<String> = None;

    if !word.is_empty() {
        let hits = find(&word, &state.dicts, true);
        if hits.is_empty() {
            word_list.push_str(&render::nothing_found(&word));
        } else {
            word_list.push_str("<ul>");
            for (dict, item) in hits.into_iter().take(limit) {
                let href = render::content_link(&state.mount, dict.id(), &item);
                if content_url.is_none() {
                    content_url = Some(href.clone());
                }
                word_list.push_str(&render::word_list_item(&href, &item.key, dict.label()));
            }
            word_list.push_str("</ul>");
        }
    }

    let content_url = content_url.unwrap_or_else(|| "about:blank".to_string());
    Html(render::render_template(
        render::LOOKUP_TEMPLATE,
        &[
            ("style", render::STYLE),
            ("word", &render::escape_html(&word)),
            ("wordlist", &word_list),
            ("content_url", &render::escape_html(&content_url)),
        ],
    ))
}
