//! HTML rendering: template substitution, escaping, and link building.
//!
//! The lookup page is an embedded template with named `{slot}` placeholders.
//! Substitution is a single pass over the template so substituted values are
//! never rescanned for placeholders.

use crate::dict::Item;

pub const LOOKUP_TEMPLATE: &str = include_str!("../static/lookup.html");
pub const STYLE: &str = include_str!("../static/slobweb.css");

/// Escape for HTML text and double-quoted attribute contexts.
pub fn escape_html(s: &str) -> String {
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

/// Substitute `{name}` placeholders in one pass. Unknown placeholders are
/// left as-is; literal braces in the template stay literal unless they
/// spell a known slot name.
pub fn render_template(template: &str, slots: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        match tail[1..].find('}') {
            Some(close) => {
                let name = &tail[1..close + 1];
                match slots.iter().find(|(n, _)| *n == name) {
                    Some((_, value)) => {
                        out.push_str(value);
                        rest = &tail[close + 2..];
                    }
                    None => {
                        out.push('{');
                        rest = &tail[1..];
                    }
                }
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Wrap page body in the minimal document shell used by the diagnostics
/// and error pages.
pub fn page(body: &str) -> String {
    format!("<html>\n  <body>\n{body}\n  </body>\n</html>\n")
}

pub fn nothing_found(term: &str) -> String {
    format!(
        "<div align=\"center\"><em>Nothing found for <strong>{}</strong></em></div>",
        escape_html(term)
    )
}

/// A two-column table row; the value is raw HTML so callers can nest
/// tables and lists. Escape the value first when it is plain text.
pub fn key_value_row(key: &str, value_html: &str) -> String {
    format!(
        "<tr><td style=\"vertical-align: top\">{}</td><td>{}</td></tr>",
        escape_html(key),
        value_html
    )
}

pub fn list_item(value: &str) -> String {
    format!("<li>{}</li>", escape_html(value))
}

/// Content URL for one lookup hit:
/// `{mount}/slob/{id}/{key}?blob={blob}#{fragment}`. The key and fragment
/// are percent-encoded; the blob id pins the exact entry while the key
/// keeps the link meaningful (and resolvable) on its own.
pub fn content_link(mount: &str, dict_id: &str, item: &Item) -> String {
    format!(
        "{mount}/slob/{id}/{key}?blob={blob}#{fragment}",
        id = urlencoding::encode(dict_id),
        key = urlencoding::encode(&item.key),
        blob = item.id,
        fragment = urlencoding::encode(&item.fragment),
    )
}

/// One hit in the lookup result list: a link targeting the content frame,
/// titled with the source dictionary's label.
pub fn word_list_item(href: &str, key: &str, dict_label: &str) -> String {
    format!(
        "<li><a href=\"{}\" title=\"From {}\" target=\"content\">{}</a></li>",
        escape_html(href),
        escape_html(dict_label),
        escape_html(key)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html(r#"<b>"a&b"</b>"#),
            "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn template_substitution_is_single_pass() {
        let out = render_template("<p>{word}</p><ul>{wordlist}</ul>", &[
            ("word", "{wordlist}"),
            ("wordlist", "<li>x</li>"),
        ]);
        // A slot value spelling another slot's name must not be expanded.
        assert_eq!(out, "<p>{wordlist}</p><ul><li>x</li></ul>");
    }

    #[test]
    fn unknown_placeholders_survive() {
        assert_eq!(
            render_template("a {unknown} b {x}", &[("x", "1")]),
            "a {unknown} b 1"
        );
    }

    #[test]
    fn content_link_encodes_key_and_fragment() {
        let item = crate::dict::Item {
            key: "a/b c".to_string(),
            id: 7,
            fragment: "se ction".to_string(),
            content_type: "text/html".to_string(),
        };
        assert_eq!(
            content_link("/mnt", "abc", &item),
            "/mnt/slob/abc/a%2Fb%20c?blob=7#se%20ction"
        );
    }
}
