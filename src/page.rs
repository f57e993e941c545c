//! One deterministic render per request.
//!
//! Incomplete parameters give the landing view; otherwise the dataset is
//! loaded, its roles resolved and the selected record rendered. Every
//! failure is folded into an inline message so the page stays usable.

use crate::cache::DatasetCache;
use crate::columns::resolve_columns;
use crate::error::ViewerError;
use crate::params::QueryParams;
use crate::record::select_record;
use crate::render::{
    record_title, render_document, render_examples, render_lookup_form, render_message,
    render_record, FormState, MessageKind, LANDING_HINT,
};
use crate::samples::examples;
use tracing::{debug, warn};

/// Main-view notice for a table with a header and no rows.
pub const EMPTY_VIEW_MESSAGE: &str = "the CSV is empty, there is no data to display";

/// Which state the page ended up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    /// No (or partial) parameters
    Landing,
    /// A record was rendered
    Record { title: String, row_index: usize },
    /// The dataset could not be shown
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct Page {
    pub view: PageView,
    pub html: String,
}

/// Render the page for `params`. `form` overrides the lookup form's values
/// and carries a message from a rejected submission.
pub async fn render_page(
    cache: &DatasetCache,
    params: &QueryParams,
    form: Option<FormState>,
    landing_title: &str,
) -> Page {
    let form = form.unwrap_or_else(|| FormState::for_page(params));

    if !params.is_complete() {
        debug!("Incomplete parameters, rendering landing view");
        let mut body = format!("<p><em>{}</em></p>\n", LANDING_HINT);
        body.push_str(&render_lookup_form(&form));
        body.push_str(&render_examples(examples()));
        return Page {
            view: PageView::Landing,
            html: render_document(landing_title, &body),
        };
    }

    match render_record_view(cache, params).await {
        Ok((title, row_index, mut body)) => {
            body.push_str(&render_lookup_form(&form));
            Page {
                view: PageView::Record {
                    title: title.clone(),
                    row_index,
                },
                html: render_document(&title, &body),
            }
        }
        Err(e) => {
            warn!("Cannot render '{}': {}", params.csv, e);
            let (kind, message) = match e {
                ViewerError::EmptyDataset => (MessageKind::Warning, EMPTY_VIEW_MESSAGE.to_string()),
                other => (MessageKind::Error, other.user_message()),
            };
            let mut body = render_message(kind, &message);
            body.push_str(&render_lookup_form(&form));
            Page {
                view: PageView::Failed { message },
                html: render_document(landing_title, &body),
            }
        }
    }
}

async fn render_record_view(
    cache: &DatasetCache,
    params: &QueryParams,
) -> crate::error::Result<(String, usize, String)> {
    let dataset = cache.get_or_load(&params.csv).await?;
    if dataset.is_empty() {
        return Err(ViewerError::EmptyDataset);
    }

    let columns = resolve_columns(&dataset.column_names());
    let record = select_record(&dataset, columns.id(), params.id.as_deref())?;
    let title = record_title(&record, &columns);
    let body = render_record(&title, &record, &columns);
    Ok((title, record.row_index, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::loader::{DatasetLoader, Fetcher, TrustRoots};
    use async_trait::async_trait;

    struct StaticFetcher(&'static [u8]);

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, _url: &str, _roots: TrustRoots) -> Result<Vec<u8>> {
            Ok(self.0.to_vec())
        }
    }

    fn cache(body: &'static [u8]) -> DatasetCache {
        DatasetCache::new(DatasetLoader::new(Box::new(StaticFetcher(body)), "."))
    }

    fn params(id: &str) -> QueryParams {
        QueryParams::new("https://h/items.csv", Some(id.to_string()))
    }

    #[tokio::test]
    async fn test_landing_when_params_missing() {
        let cache = cache(b"id\n1\n");
        let page = render_page(&cache, &QueryParams::new("https://h/items.csv", None), None, "Viewer").await;
        assert_eq!(page.view, PageView::Landing);
        assert!(page.html.contains(LANDING_HINT));
        assert!(page.html.contains("<title>Viewer</title>"));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_record_view() {
        let cache = cache(b"id,name,image\nA1,Widget,https://img/a.png\nA2,Gadget,\n");
        let page = render_page(&cache, &params("A2"), None, "Viewer").await;
        assert_eq!(
            page.view,
            PageView::Record {
                title: "A2 Gadget".to_string(),
                row_index: 1
            }
        );
        assert!(page.html.contains("<title>A2 Gadget</title>"));
        assert!(page.html.contains("<h1>A2 Gadget</h1>"));
        assert!(!page.html.contains("<img"));
        // lookup form is pre-filled with the current pair
        assert!(page.html.contains("name=\"id\" value=\"A2\""));
    }

    #[tokio::test]
    async fn test_unknown_id_shows_first_row() {
        let cache = cache(b"id,name\nA1,Widget\nA2,Gadget\n");
        let page = render_page(&cache, &params("ZZZ"), None, "Viewer").await;
        assert_eq!(
            page.view,
            PageView::Record {
                title: "A1 Widget".to_string(),
                row_index: 0
            }
        );
        assert!(!page.html.contains("message error"));
    }

    #[tokio::test]
    async fn test_empty_dataset_warns() {
        let cache = cache(b"id,name\n");
        let page = render_page(&cache, &params("A1"), None, "Viewer").await;
        assert_eq!(
            page.view,
            PageView::Failed {
                message: EMPTY_VIEW_MESSAGE.to_string()
            }
        );
        assert!(page.html.contains("message warning"));
        assert!(page.html.contains(EMPTY_VIEW_MESSAGE));
        assert!(!page.html.contains("please check the link"));
        assert!(page.html.contains("<form"));
    }
}
