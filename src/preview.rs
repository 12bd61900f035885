// ABOUTME: Preview surfaces for the slider-export application
// ABOUTME: Shows a generated document on a separate viewing surface such as a local HTTP server

use crate::errors::{Result, SliderError};
use log::{debug, error, info};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server, StatusCode};

/// Somewhere a rendered document can be displayed
pub trait ViewingSurface {
    /// Display the document, returning where it can be seen
    fn show(&mut self, document: &str) -> Result<String>;
}

/// Serves the previewed document from a background HTTP server on localhost
pub struct HttpPreview {
    port: u16,
    handle: Option<JoinHandle<()>>,
}

impl HttpPreview {
    /// Port 0 picks any free port
    pub fn new(port: u16) -> Self {
        Self { port, handle: None }
    }

    /// Block until the server thread exits
    pub fn wait(self) {
        if let Some(handle) = self.handle {
            if handle.join().is_err() {
                error!("Preview server thread panicked");
            }
        }
    }
}

impl ViewingSurface for HttpPreview {
    fn show(&mut self, document: &str) -> Result<String> {
        let server = Server::http(("127.0.0.1", self.port)).map_err(|e| {
            SliderError::SurfaceUnavailable(format!(
                "failed to start preview server on port {}: {}",
                self.port, e
            ))
        })?;

        let address = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| SliderError::SurfaceUnavailable("server has no IP address".to_string()))?;
        let url = format!("http://{}/", address);

        let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
            .map_err(|_| SliderError::SurfaceUnavailable("invalid content type header".to_string()))?;
        let body = document.to_string();

        let handle = thread::spawn(move || {
            for request in server.incoming_requests() {
                debug!("Preview request for {}", request.url());

                let is_document = matches!(request.url(), "/" | "/index.html");
                let result = if is_document {
                    request.respond(
                        Response::from_string(body.clone()).with_header(content_type.clone()),
                    )
                } else {
                    request.respond(
                        Response::from_string("404 Not Found").with_status_code(StatusCode(404)),
                    )
                };
                if let Err(e) = result {
                    error!("Failed to send preview response: {}", e);
                }
            }
        });
        self.handle = Some(handle);

        info!("Preview available at {}", url);
        Ok(url)
    }
}
