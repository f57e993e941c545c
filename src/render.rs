//! HTML rendering for the record page, the landing page and the lookup form.

use crate::columns::ResolvedColumns;
use crate::dataset::Record;
use crate::loader::PATH_SAFE;
use crate::params::{QueryParams, CSV_PARAM, ID_PARAM, ORIGIN_CSV_FIELD, ORIGIN_ID_FIELD};
use crate::samples::Example;
use percent_encoding::utf8_percent_encode;
use url::Url;

pub const UNNAMED: &str = "(unnamed)";
pub const THUMBNAIL_WIDTH: u32 = 150;
pub const LANDING_HINT: &str = "No parameters given. Look up a record below or pick one of the examples.";

const STYLE: &str = "body{font-family:sans-serif;max-width:46rem;margin:2rem auto;padding:0 1rem;line-height:1.5}\
.field{margin:.25rem 0}\
.message{padding:.5rem .75rem;border-radius:4px;margin:.75rem 0}\
.error{background:#fde2e1;color:#8a1c17}\
.warning{background:#fff4d6;color:#7a5300}\
form label{display:block;margin:.5rem 0}\
form input[type=text]{width:100%}\
.example{margin:6px 0}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Warning,
}

/// Values the lookup form is rendered with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub csv: String,
    pub id: String,
    /// Page the form sits on; a rejected submission re-renders it
    pub origin: QueryParams,
    pub feedback: Option<String>,
}

impl FormState {
    /// Form pre-filled with the page's own parameters.
    pub fn for_page(params: &QueryParams) -> Self {
        Self {
            csv: params.csv.clone(),
            id: params.id_str().to_string(),
            origin: params.clone(),
            feedback: None,
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A cell value that should render as a link.
pub fn is_link(value: &str) -> bool {
    let lower = value.to_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && Url::parse(value).is_ok()
}

/// `identifier + " " + name`, with a placeholder when the name is blank.
pub fn record_title(record: &Record, columns: &ResolvedColumns) -> String {
    let id = columns.id().map(|c| record.get(c)).unwrap_or("");
    let name = columns.name().map(|c| record.get(c)).unwrap_or("");
    let name = if name.trim().is_empty() { UNNAMED } else { name };
    format!("{} {}", id, name).trim().to_string()
}

/// Thumbnail source, if an image column resolved and the cell is not blank.
pub fn thumbnail_url<'a>(record: &'a Record, columns: &ResolvedColumns) -> Option<&'a str> {
    let value = record.get(columns.image()?).trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

pub fn render_field(name: &str, value: &str) -> String {
    let rendered = if is_link(value) {
        let escaped = escape_html(value);
        format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
            escaped, escaped
        )
    } else {
        escape_html(value)
    };
    format!("<p class=\"field\">{}: {}</p>", escape_html(name), rendered)
}

/// Heading, optional thumbnail, and one line per column.
pub fn render_record(title: &str, record: &Record, columns: &ResolvedColumns) -> String {
    let mut html = format!("<h1>{}</h1>\n", escape_html(title));

    if let Some(src) = thumbnail_url(record, columns) {
        html.push_str(&format!(
            "<img class=\"thumbnail\" src=\"{}\" width=\"{}\" alt=\"{}\">\n",
            escape_html(src),
            THUMBNAIL_WIDTH,
            escape_html(title)
        ));
    }

    html.push_str("<h2>Fields</h2>\n<div class=\"fields\">\n");
    for (name, value) in &record.fields {
        html.push_str(&render_field(name, value));
        html.push('\n');
    }
    html.push_str("</div>\n");
    html
}

pub fn render_message(kind: MessageKind, text: &str) -> String {
    let class = match kind {
        MessageKind::Error => "error",
        MessageKind::Warning => "warning",
    };
    format!("<div class=\"message {}\">{}</div>\n", class, escape_html(text))
}

pub fn render_lookup_form(form: &FormState) -> String {
    let mut html = String::from("<hr>\n<h2>Look up another record</h2>\n");
    html.push_str("<form method=\"post\" action=\"/lookup\">\n");
    html.push_str(&format!(
        "<label>CSV URL or path <input type=\"text\" name=\"{}\" value=\"{}\"></label>\n",
        CSV_PARAM,
        escape_html(&form.csv)
    ));
    html.push_str(&format!(
        "<label>ID / caseId / url <input type=\"text\" name=\"{}\" value=\"{}\"></label>\n",
        ID_PARAM,
        escape_html(&form.id)
    ));
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
        ORIGIN_CSV_FIELD,
        escape_html(&form.origin.csv)
    ));
    html.push_str(&format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
        ORIGIN_ID_FIELD,
        escape_html(form.origin.id_str())
    ));
    html.push_str("<button type=\"submit\">Look up</button>\n</form>\n");

    if let Some(feedback) = &form.feedback {
        html.push_str(&render_message(MessageKind::Error, feedback));
    }
    html
}

/// Root-anchored link that opens the main view on an example, whatever
/// route the current page was served from.
pub fn example_href(example: &Example) -> String {
    format!(
        "/?csv={}&id={}",
        utf8_percent_encode(example.csv.trim(), PATH_SAFE),
        utf8_percent_encode(example.id.trim(), PATH_SAFE)
    )
}

pub fn render_examples(examples: &[Example]) -> String {
    let mut html = String::from("<hr>\n<h2>Examples</h2>\n");
    for (i, example) in examples.iter().enumerate() {
        let title = if example.title.is_empty() {
            format!("Example {}", i + 1)
        } else {
            example.title.to_string()
        };
        if example.csv.trim().is_empty() || example.id.trim().is_empty() {
            html.push_str(&format!(
                "<div class=\"example\">[ {} (csv and id missing) ]</div>\n",
                escape_html(&title)
            ));
            continue;
        }
        let href = escape_html(&example_href(example));
        html.push_str(&format!(
            "<div class=\"example\">[ {}<br><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a><br>]</div>\n",
            escape_html(&title),
            href,
            href
        ));
    }
    html
}

pub fn render_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}
