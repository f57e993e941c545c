//! HTTP front end: accept loop, per-connection handling and routing.
//! Uses tokio directly (no web framework).

use crate::cache::DatasetCache;
use crate::config::ViewerConfig;
use crate::error::Result;
use crate::http::{read_request, HttpRequest, HttpResponse};
use crate::loader::DatasetLoader;
use crate::lookup::{submit_lookup, LookupOutcome};
use crate::page::render_page;
use crate::params::{LookupSubmission, QueryParams};
use crate::render::{escape_html, render_document, FormState};
use serde::Serialize;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    cached_datasets: usize,
}

/// State shared by every connection.
pub struct AppState {
    pub config: ViewerConfig,
    pub cache: DatasetCache,
}

impl AppState {
    pub fn new(config: ViewerConfig, cache: DatasetCache) -> Self {
        Self { config, cache }
    }

    /// State with the reqwest-backed loader rooted at the configured app dir.
    pub fn from_config(config: ViewerConfig) -> Result<Self> {
        let loader = DatasetLoader::with_http(config.app_dir.clone())?;
        Ok(Self::new(config, DatasetCache::new(loader)))
    }
}

pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.config.bind_addr).await?;
    info!("Server listening on http://{}", state.config.bind_addr);
    info!("Local CSV locators resolve under {}", state.config.app_dir.display());

    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("New connection from: {}", addr);
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state).await {
                error!("Error handling connection from {}: {}", addr, e);
            }
        });
    }
}

pub async fn handle_connection<S>(mut stream: S, state: Arc<AppState>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let response = match read_request(&mut stream).await {
        Ok(Some(request)) => handle_request(&state, &request).await,
        Ok(None) => return Ok(()),
        Err(e) => {
            warn!("Rejecting request: {}", e);
            HttpResponse::html(400, render_document("Bad Request", &format!("<p>{}</p>\n", escape_html(&e.to_string()))))
        }
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.flush().await?;
    Ok(())
}

pub async fn handle_request(state: &AppState, request: &HttpRequest) -> HttpResponse {
    debug!("Request: {} {}", request.method, request.path);

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/") => {
            let params = QueryParams::from_query(request.query.as_deref());
            let page = render_page(&state.cache, &params, None, &state.config.page_title).await;
            HttpResponse::html(200, page.html)
        }
        ("POST", "/lookup") => handle_lookup(state, &request.body).await,
        ("GET", "/lookup") => handle_lookup(state, request.query.as_deref().unwrap_or("")).await,
        ("GET", "/api/health") => {
            let body = HealthResponse {
                status: "ok",
                service: "record-viewer",
                cached_datasets: state.cache.len(),
            };
            match HttpResponse::json(200, &body) {
                Ok(resp) => resp,
                Err(e) => HttpResponse::html(500, render_document("Error", &format!("<p>{}</p>\n", escape_html(&e.to_string())))),
            }
        }
        (_, "/") | (_, "/lookup") | (_, "/api/health") => HttpResponse::html(
            405,
            render_document("Method Not Allowed", "<p>Method not allowed.</p>\n"),
        ),
        (method, path) => HttpResponse::html(
            404,
            render_document(
                "Not Found",
                &format!("<p>Not found: {} {}</p>\n", escape_html(method), escape_html(path)),
            ),
        ),
    }
}

/// Valid submissions redirect to the new pair; rejected ones re-render the
/// page they came from with the message and the submitted values.
async fn handle_lookup(state: &AppState, form_body: &str) -> HttpResponse {
    let submission = LookupSubmission::from_form(form_body);

    match submit_lookup(&state.cache, &submission).await {
        LookupOutcome::Redirect(params) => {
            HttpResponse::redirect(&format!("/{}", params.to_query_string()))
        }
        LookupOutcome::Rejected(message) => {
            let form = FormState {
                csv: submission.csv.clone(),
                id: submission.id.clone(),
                origin: submission.origin.clone(),
                feedback: Some(message),
            };
            let page = render_page(
                &state.cache,
                &submission.origin,
                Some(form),
                &state.config.page_title,
            )
            .await;
            HttpResponse::html(200, page.html)
        }
    }
}
