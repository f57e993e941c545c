//! Minimal HTTP/1.1 request parsing and response building over raw tokio streams.

use crate::error::{Result, ViewerError};
use serde::Serialize;
use std::collections::HashMap;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::time::{timeout, Duration};

pub const READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const MAX_REQUEST_BYTES: usize = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpRequest {
    pub fn parse(raw: &str) -> Result<Self> {
        let (head, body) = match raw.find("\r\n\r\n") {
            Some(pos) => (&raw[..pos], &raw[pos + 4..]),
            None => (raw, ""),
        };

        let mut lines = head.lines();
        let request_line = lines
            .next()
            .ok_or_else(|| ViewerError::BadRequest("empty request".to_string()))?;
        let parts: Vec<&str> = request_line.split_whitespace().collect();
        if parts.len() < 2 {
            return Err(ViewerError::BadRequest(format!(
                "invalid request line: {}",
                request_line
            )));
        }

        let method = parts[0].to_uppercase();
        let (path, query) = match parts[1].split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (parts[1].to_string(), None),
        };

        // Normalize path (remove trailing slash except for root)
        let mut path = path.trim_end_matches('/').to_string();
        if path.is_empty() {
            path = "/".to_string();
        }

        let mut headers = HashMap::new();
        for line in lines {
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.insert(key.trim().to_lowercase(), value.trim().to_string());
            }
        }

        Ok(Self {
            method,
            path,
            query,
            headers,
            body: body.to_string(),
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}

fn extract_content_length(head: &str) -> Option<usize> {
    for line in head.lines() {
        if line.to_lowercase().starts_with("content-length:") {
            if let Some(value) = line.split(':').nth(1) {
                return value.trim().parse().ok();
            }
        }
    }
    None
}

/// Read one request: headers plus `Content-Length` bytes of body, bounded
/// by [`READ_TIMEOUT`] and [`MAX_REQUEST_BYTES`].
pub async fn read_request<S>(stream: &mut S) -> Result<Option<HttpRequest>>
where
    S: AsyncRead + Unpin,
{
    let mut buffer = Vec::new();
    let mut temp_buf = [0u8; 8192];

    let read_result = timeout(READ_TIMEOUT, async {
        loop {
            let n = stream.read(&mut temp_buf).await?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&temp_buf[..n]);

            if let Some(headers_end) = find_headers_end(&buffer) {
                let head = String::from_utf8_lossy(&buffer[..headers_end]);
                let content_length = extract_content_length(&head).unwrap_or(0);
                if buffer.len() >= headers_end + 4 + content_length {
                    break;
                }
            }
            if buffer.len() > MAX_REQUEST_BYTES {
                return Err(ViewerError::BadRequest("request too large".to_string()));
            }
        }
        Ok::<(), ViewerError>(())
    })
    .await;

    match read_result {
        Ok(result) => result?,
        Err(_) => return Err(ViewerError::BadRequest("request read timeout".to_string())),
    }

    if buffer.is_empty() {
        return Ok(None);
    }

    let raw = String::from_utf8(buffer)
        .map_err(|e| ViewerError::BadRequest(format!("request is not UTF-8: {}", e)))?;
    HttpRequest::parse(&raw).map(Some)
}

fn find_headers_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn html(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: "text/html; charset=utf-8",
            headers: Vec::new(),
            body,
        }
    }

    pub fn json<T: Serialize>(status: u16, value: &T) -> Result<Self> {
        Ok(Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: serde_json::to_string(value)?,
        })
    }

    /// `303 See Other` so the browser re-requests `location` with GET.
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 303,
            content_type: "text/plain; charset=utf-8",
            headers: vec![("Location".to_string(), location.to_string())],
            body: String::new(),
        }
    }

    pub fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            303 => "See Other",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            408 => "Request Timeout",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            self.status,
            self.status_text(),
            self.content_type,
            self.body.len()
        );
        for (key, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", key, value));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(self.body.as_bytes());
        bytes
    }
}
