//! `GET /dictionaries` — diagnostics page listing each container's metadata.

use axum::extract::State;
use axum::response::Html;

use crate::render::{escape_html, key_value_row, list_item, page};
use crate::state::AppState;

pub async fn dictionaries(State(state): State<AppState>) -> Html<String> {
    let mut body = String::new();

    for dict in state.dicts.iter() {
        body.push_str(&format!("<h1>{}</h1>", escape_html(dict.label())));
        body.push_str("<table>");
        body.push_str(&key_value_row("id", &escape_html(dict.id())));
        body.push_str(&key_value_row("encoding", &escape_html(dict.encoding())));
        body.push_str(&key_value_row(
            "compression",
            &escape_html(dict.compression()),
        ));
        body.push_str(&key_value_row("key count", &dict.len().to_string()));
        body.push_str(&key_value_row("blob count", &dict.blob_count().to_string()));

        let mut content_types = String::from("<ul>");
        for content_type in dict.content_types() {
            content_types.push_str(&list_item(content_type));
        }
        content_types.push_str("</ul>");
        body.push_str(&key_value_row("content types", &content_types));

        let mut tags = String::from("<table>");
        for (k, v) in dict.tags() {
            tags.push_str(&key_value_row(k, &escape_html(v)));
        }
        tags.push_str("</table>");
        body.push_str(&key_value_row("tags", &tags));
        body.push_str("</table>");
    }

    Html(page(&body))
}
