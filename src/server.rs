// ABOUTME: Remote control server for deckpilot
// ABOUTME: Serves audience and presenter pages and maps HTTP routes onto navigation events

use crate::errors::{DeckError, Result};
use crate::html::{self, RenderOptions};
use crate::session::{self, InputEvent, Session};
use chrono::Utc;
use log::{debug, error, info, warn};
use parking_lot::{Mutex, RwLock};
use percent_encoding::percent_decode_str;
use std::sync::Arc;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use url::Url;

/// A session shared between the server and the reload watcher
pub type SharedSession = Arc<Mutex<Session>>;

/// Configuration for the remote control server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Outcome of routing one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub location: Option<String>,
}

impl Reply {
    fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: "text/html; charset=utf-8",
            body,
            location: None,
        }
    }

    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
            location: None,
        }
    }

    fn redirect(location: &str) -> Self {
        Self {
            status: 303,
            content_type: "text/plain; charset=utf-8",
            body: String::new(),
            location: Some(location.to_string()),
        }
    }
}

/// Routes requests against one shared session
pub struct RemoteControl {
    session: SharedSession,
    snapshot: Arc<RwLock<String>>,
    options: RenderOptions,
}

impl RemoteControl {
    /// `snapshot` is the output buffer of the session's `HtmlRenderer`
    pub fn new(session: SharedSession, snapshot: Arc<RwLock<String>>, options: RenderOptions) -> Self {
        // First paint, so `/` has something to serve before any input
        session.lock().render();
        Self {
            session,
            snapshot,
            options,
        }
    }

    pub fn session(&self) -> SharedSession {
        Arc::clone(&self.session)
    }

    /// Map a request onto a reply, applying any navigation it carries.
    /// Routes that change the session only accept POST.
    pub fn route(&self, method: &Method, request_url: &str) -> Reply {
        let url = match Url::parse("http://deckpilot.local").and_then(|base| base.join(request_url)) {
            Ok(url) => url,
            Err(e) => return Reply::text(400, format!("Bad request URL: {}", e)),
        };

        let back_to = if url
            .query_pairs()
            .any(|(key, value)| key == "view" && value == "presenter")
        {
            "/presenter"
        } else {
            "/"
        };

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let reads_only = matches!(segments.as_slice(), [] | ["presenter"] | ["state"]);
        if !reads_only && *method != Method::Post {
            return Reply::text(405, format!("{} requires POST", url.path()));
        }

        let event = match segments.as_slice() {
            [] => return Reply::html(self.snapshot.read().clone()),
            ["presenter"] => {
                let session = self.session.lock();
                return Reply::html(html::render_presenter(
                    session.state(),
                    session.deck(),
                    session.started_at(),
                    Utc::now(),
                    &self.options,
                ));
            }
            ["state"] => return Reply::text(200, self.describe_state()),
            ["next"] => InputEvent::Next,
            ["prev"] => InputEvent::Prev,
            ["first"] => InputEvent::First,
            ["last"] => InputEvent::Last,
            ["fullscreen"] => InputEvent::ToggleFullscreen,
            ["fullscreen", flag] => {
                let fullscreen = match *flag {
                    "on" => true,
                    "off" => false,
                    _ => return Reply::text(400, format!("Expected on or off, got {}", flag)),
                };
                self.session.lock().set_fullscreen(fullscreen);
                return Reply::redirect(back_to);
            }
            ["jump", number] => match session::parse_slide_number(number) {
                Ok(index) => InputEvent::Jump(index),
                Err(e) => return Reply::text(400, e.to_string()),
            },
            ["key", key] => match InputEvent::from_key(&decode_key(key)) {
                Some(event) => event,
                None => return Reply::text(400, format!("Unbound key: {}", key)),
            },
            _ => return Reply::text(404, "404 Not Found"),
        };

        let result = self.session.lock().handle(event);
        match result {
            Ok(_) => Reply::redirect(back_to),
            Err(e @ DeckError::IndexOutOfRange { .. }) => {
                warn!("Rejected {:?}: {}", event, e);
                Reply::text(400, e.to_string())
            }
            Err(e) => {
                error!("Failed to handle {:?}: {}", event, e);
                Reply::text(500, e.to_string())
            }
        }
    }

    fn describe_state(&self) -> String {
        let session = self.session.lock();
        let state = session.state();
        let slide_steps = session
            .deck()
            .get(state.slide_index)
            .map(|slide| slide.reveal_steps())
            .unwrap_or(0);

        format!(
            "session={}\nslide={}/{}\nstep={}/{}\nfullscreen={}\nprogress={:.3}\n",
            session.id(),
            state.slide_index + 1,
            session.deck().len(),
            state.reveal_step,
            slide_steps,
            state.fullscreen,
            session.progress()
        )
    }

    /// Answer requests until the server shuts down
    pub fn run(&self, server: Server) {
        for request in server.incoming_requests() {
            let reply = self.route(request.method(), request.url());
            debug!(
                "{} {} -> {}",
                request.method(),
                request.url(),
                reply.status
            );

            let mut response = Response::from_string(reply.body)
                .with_status_code(StatusCode(reply.status));
            if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
                response = response.with_header(header);
            }
            if reply.status == 405 {
                if let Ok(header) = Header::from_bytes(&b"Allow"[..], &b"POST"[..]) {
                    response = response.with_header(header);
                }
            }
            if let Some(location) = reply.location {
                if let Ok(header) = Header::from_bytes(&b"Location"[..], location.as_bytes()) {
                    response = response.with_header(header);
                }
            }

            if let Err(e) = request.respond(response) {
                error!("Failed to send response: {}", e);
            }
        }
    }
}

/// Percent-decoded key name, so `/key/%20` maps to the space bar and `+` stays `+`
fn decode_key(key: &str) -> String {
    percent_decode_str(key).decode_utf8_lossy().into_owned()
}

/// Bind the HTTP listener
pub fn bind(config: &ServerConfig) -> Result<Server> {
    Server::http(format!("{}:{}", config.host, config.port))
        .map_err(|e| DeckError::ServerError(format!("Failed to start HTTP server: {}", e)))
}

/// Bind and serve until interrupted
pub fn serve(config: &ServerConfig, remote: RemoteControl) -> Result<()> {
    let server = bind(config)?;
    info!("Remote control listening on http://{}:{}", config.host, config.port);
    println!(
        "Serving on http://{}:{} (presenter view at /presenter, press Ctrl+C to stop)",
        config.host, config.port
    );
    remote.run(server);
    Ok(())
}
