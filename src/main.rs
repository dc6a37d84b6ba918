use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Json, Path, State,
    },
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use std::{
    collections::{BTreeMap, HashMap},
    env,
    fs::OpenOptions,
    io::Write,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tokio::signal;
use tokio::sync::broadcast;
use tower_http::cors::{AllowOrigin, CorsLayer};

use themesmith_server::commands::{
    append_stream_text, append_tool_call, build_theme_prompt, create_stream, delete_stream,
    derive_theme_mode, export_theme, get_shadow_presets, get_stream_view, get_theme_config,
    get_theme_swatches, get_theme_tokens, import_theme, reset_theme_config, set_stream_status,
    sync_token_across_modes, update_theme_tokens, StreamContext, StreamSessions,
};
use themesmith_server::models::{StreamStatus, ThemeMode};
use themesmith_server::services::{EventSink, TextStreamRegistry, ThemeStore};

// ============================================================================
// Constants
// ============================================================================

const DEFAULT_PORT: u16 = 8788;
const LOG_FILE_NAME: &str = "themesmith-server.log";

// ============================================================================
// Event System
// ============================================================================

#[derive(Clone, Serialize)]
struct ServerEvent {
    event: String,
    payload: Value,
}

#[derive(Clone)]
struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: &str, payload: Value) {
        // No subscribers is not an error
        let _ = self.sender.send(ServerEvent {
            event: event.to_string(),
            payload,
        });
    }
}

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
struct AppState {
    theme_store: Arc<ThemeStore>,
    text_streams: Arc<TextStreamRegistry>,
    stream_sessions: Arc<StreamSessions>,
    event_bus: EventBus,
}

impl AppState {
    fn stream_context(&self) -> StreamContext<'_> {
        StreamContext {
            registry: &self.text_streams,
            sessions: &self.stream_sessions,
            store: &self.theme_store,
            events: &self.event_bus,
        }
    }
}

#[derive(Serialize)]
struct InvokeResponse {
    ok: bool,
    data: Option<Value>,
    error: Option<String>,
}

// ============================================================================
// Logging
// ============================================================================

struct ServerLogger {
    file: Mutex<std::fs::File>,
    event_bus: EventBus,
    level: LevelFilter,
}

impl ServerLogger {
    fn new(
        log_dir: &std::path::Path,
        event_bus: EventBus,
        level: LevelFilter,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        std::fs::create_dir_all(log_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join(LOG_FILE_NAME))?;
        Ok(Self {
            file: Mutex::new(file),
            event_bus,
            level,
        })
    }
}

impl Log for ServerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let timestamp = Local::now();
        let date = timestamp.format("%Y-%m-%d");
        let time = timestamp.format("%H:%M:%S");
        let target = record.target();
        let level = record.level();
        let message = format!("{}", record.args());
        let line = format!("[{date}][{time}][{target}][{level}] {message}");

        if let Ok(mut file) = self.file.try_lock() {
            let _ = writeln!(file, "{line}");
        }

        let level_number = match level {
            Level::Error => 1,
            Level::Warn => 2,
            Level::Info => 3,
            Level::Debug => 4,
            Level::Trace => 5,
        };

        self.event_bus.emit(
            "log://log",
            json!({ "level": level_number, "message": message, "target": target }),
        );
    }

    fn flush(&self) {}
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

// ============================================================================
// CORS Configuration
// ============================================================================

fn build_cors_layer() -> CorsLayer {
    let cors_origins = env::var("THEMESMITH_CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:*,http://127.0.0.1:*".to_string());

    let allowed_origins: Vec<String> = cors_origins
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin: &HeaderValue, _| {
            let Ok(origin) = origin.to_str() else {
                return false;
            };
            allowed_origins.iter().any(|allowed| origin_matches(allowed, origin))
        }))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

/// `http://localhost:*` matches any port on that host.
fn origin_matches(allowed: &str, origin: &str) -> bool {
    match allowed.strip_suffix(":*") {
        Some(prefix) => origin
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with(':')),
        None => origin == allowed,
    }
}

// ============================================================================
// Request Handlers
// ============================================================================

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.event_bus.subscribe()))
}

async fn handle_socket(mut socket: WebSocket, mut receiver: broadcast::Receiver<ServerEvent>) {
    loop {
        let event = match receiver.recv().await {
            Ok(event) => event,
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                log::debug!("WebSocket client lagged, skipped {skipped} event(s)");
                continue;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        };
        if let Ok(payload) = serde_json::to_string(&event) {
            if socket.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    }
}

async fn invoke(
    Path(command): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> impl IntoResponse {
    match invoke_command(&state, &command, payload) {
        Ok(data) => {
            let response = InvokeResponse {
                ok: true,
                data: Some(data),
                error: None,
            };
            (StatusCode::OK, Json(response))
        }
        Err(error) => {
            log::debug!("Command {command} failed: {error}");
            let response = InvokeResponse {
                ok: false,
                data: None,
                error: Some(error),
            };
            (StatusCode::BAD_REQUEST, Json(response))
        }
    }
}

// ============================================================================
// Command Handler
// ============================================================================

fn invoke_command(state: &AppState, command: &str, payload: Value) -> Result<Value, String> {
    let store = state.theme_store.as_ref();
    let events = &state.event_bus;

    match command {
        "get_theme_config" => to_value(get_theme_config(store)),
        "get_theme_tokens" => {
            let mode: ThemeMode = get_arg(&payload, "mode")?;
            to_value(get_theme_tokens(store, mode))
        }
        "get_theme_swatches" => {
            let mode: ThemeMode = get_arg(&payload, "mode")?;
            to_value(get_theme_swatches(store, mode))
        }
        "update_theme_tokens" => {
            let mode: ThemeMode = get_arg(&payload, "mode")?;
            let updates: BTreeMap<String, Option<String>> = get_arg(&payload, "updates")?;
            to_value(update_theme_tokens(store, events, mode, updates)?)
        }
        "sync_token_across_modes" => {
            let variable: String = get_arg(&payload, "variable")?;
            let value: String = get_arg(&payload, "value")?;
            to_value(sync_token_across_modes(store, events, &variable, &value)?)
        }
        "derive_theme_mode" => {
            let source: ThemeMode = get_arg(&payload, "source")?;
            let target: Option<ThemeMode> = get_opt_arg(&payload, "target")?;
            let target = target.unwrap_or_else(|| source.opposite());
            to_value(derive_theme_mode(store, events, source, target)?)
        }
        "reset_theme_config" => to_value(reset_theme_config(store, events)),
        "get_shadow_presets" => {
            let mode: ThemeMode = get_arg(&payload, "mode")?;
            to_value(get_shadow_presets(store, mode))
        }
        "export_theme_css" => Ok(json!(export_theme(store))),
        "import_theme_css" => {
            let css: String = get_arg(&payload, "css")?;
            to_value(import_theme(store, events, &css)?)
        }
        "build_theme_prompt" => {
            let prompt: String = get_arg(&payload, "prompt")?;
            Ok(json!(build_theme_prompt(store, &prompt)?))
        }
        "create_stream" => {
            let stream_id = create_stream(&state.stream_context());
            Ok(json!({ "streamId": stream_id }))
        }
        "append_stream_text" => {
            let stream_id: String = get_arg(&payload, "streamId")?;
            let chunk: String = get_arg(&payload, "chunk")?;
            to_value(append_stream_text(&state.stream_context(), &stream_id, &chunk)?)
        }
        "append_tool_call" => {
            let stream_id: String = get_arg(&payload, "streamId")?;
            let tool_call_id: Option<String> = get_opt_arg(&payload, "toolCallId")?;
            let input: Value = get_arg(&payload, "input")?;
            to_value(append_tool_call(
                &state.stream_context(),
                &stream_id,
                tool_call_id,
                &input,
            )?)
        }
        "set_stream_status" => {
            let stream_id: String = get_arg(&payload, "streamId")?;
            let status: StreamStatus = get_arg(&payload, "status")?;
            to_value(set_stream_status(&state.stream_context(), &stream_id, status)?)
        }
        "get_stream_view" => {
            let stream_id: String = get_arg(&payload, "streamId")?;
            to_value(get_stream_view(&state.stream_context(), &stream_id)?)
        }
        "delete_stream" => {
            let stream_id: String = get_arg(&payload, "streamId")?;
            delete_stream(&state.stream_context(), &stream_id)?;
            Ok(Value::Null)
        }
        _ => Err(format!("Unknown command: {command}")),
    }
}

// ============================================================================
// Argument Parsing
// ============================================================================

fn to_value<T: Serialize>(value: T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| format!("Failed to serialize response: {e}"))
}

fn get_arg<T: DeserializeOwned>(payload: &Value, key: &str) -> Result<T, String> {
    let obj = payload
        .as_object()
        .ok_or_else(|| "Invalid payload".to_string())?;
    let value = obj
        .get(key)
        .ok_or_else(|| format!("Missing argument: {key}"))?;
    serde_json::from_value(value.clone()).map_err(|e| format!("Invalid {key}: {e}"))
}

fn get_opt_arg<T: DeserializeOwned>(payload: &Value, key: &str) -> Result<Option<T>, String> {
    let obj = payload
        .as_object()
        .ok_or_else(|| "Invalid payload".to_string())?;
    let value = match obj.get(key) {
        Some(value) => value.clone(),
        None => return Ok(None),
    };

    if value.is_null() {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| format!("Invalid {key}: {e}"))
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn parse_host(host: &str) -> IpAddr {
    host.parse().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn init_logger(
    log_dir: &std::path::Path,
    event_bus: EventBus,
    level: LevelFilter,
) -> Result<(), Box<dyn std::error::Error>> {
    let logger = ServerLogger::new(log_dir, event_bus, level)?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(())
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    let open_streams = state
        .stream_sessions
        .lock()
        .map(|sessions| sessions.len())
        .unwrap_or_default();
    log::info!("Shutdown signal received ({open_streams} stream session(s) open), server shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment
    let data_dir = env::var("THEMESMITH_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let log_dir = env::var("THEMESMITH_LOG_DIR").unwrap_or_else(|_| format!("{data_dir}/logs"));
    let host = env::var("THEMESMITH_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = env::var("THEMESMITH_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let level = env::var("THEMESMITH_LOG_LEVEL")
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(LevelFilter::Info);

    let data_dir = PathBuf::from(data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let event_bus = EventBus::new();
    init_logger(&PathBuf::from(log_dir), event_bus.clone(), level)?;

    let state = AppState {
        theme_store: Arc::new(ThemeStore::open(data_dir)),
        text_streams: Arc::new(TextStreamRegistry::new()),
        stream_sessions: Arc::new(Mutex::new(HashMap::new())),
        event_bus,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/invoke/:command", post(invoke))
        .route("/ws", get(ws_handler))
        .with_state(state.clone())
        .layer(build_cors_layer());

    let address = SocketAddr::new(parse_host(&host), port);
    log::info!("Themesmith backend listening on http://{address}");

    let listener = tokio::net::TcpListener::bind(address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> AppState {
        AppState {
            theme_store: Arc::new(ThemeStore::in_memory()),
            text_streams: Arc::new(TextStreamRegistry::new()),
            stream_sessions: Arc::new(Mutex::new(HashMap::new())),
            event_bus: EventBus::new(),
        }
    }

    #[test]
    fn test_origin_matching() {
        assert!(origin_matches("http://localhost:*", "http://localhost:5173"));
        assert!(!origin_matches("http://localhost:*", "http://localhost.evil.com"));
        assert!(origin_matches("https://app.example.com", "https://app.example.com"));
        assert!(!origin_matches("https://app.example.com", "https://other.example.com"));
    }

    #[test]
    fn test_parse_level_and_host() {
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("loud"), None);
        assert_eq!(parse_host("not-an-ip"), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(parse_host("0.0.0.0"), IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    }

    #[test]
    fn test_argument_parsing() {
        let payload = json!({ "mode": "dark", "target": null });
        let mode: ThemeMode = get_arg(&payload, "mode").unwrap();
        assert_eq!(mode, ThemeMode::Dark);
        assert!(get_arg::<ThemeMode>(&payload, "missing").is_err());
        assert_eq!(get_opt_arg::<ThemeMode>(&payload, "target").unwrap(), None);
        assert!(get_arg::<ThemeMode>(&json!({ "mode": "sepia" }), "mode").is_err());
    }

    #[test]
    fn test_invoke_stream_round() {
        let state = test_state();
        let mut events = state.event_bus.subscribe();

        let created = invoke_command(&state, "create_stream", json!({})).unwrap();
        let stream_id = created["streamId"].as_str().unwrap().to_string();

        invoke_command(
            &state,
            "append_tool_call",
            json!({
                "streamId": stream_id,
                "toolCallId": "call_1",
                "input": { "targetMode": "light", "updates": { "radius": 1 } }
            }),
        )
        .unwrap();
        invoke_command(
            &state,
            "set_stream_status",
            json!({ "streamId": stream_id, "status": "done" }),
        )
        .unwrap();

        let tokens = invoke_command(&state, "get_theme_tokens", json!({ "mode": "light" })).unwrap();
        assert_eq!(tokens["radius"], "1rem");

        let mut names = Vec::new();
        while let Ok(event) = events.try_recv() {
            names.push(event.event);
        }
        assert_eq!(names, vec!["theme_update_applied", "theme_changed", "stream_finished"]);

        let view = invoke_command(&state, "get_stream_view", json!({ "streamId": stream_id })).unwrap();
        assert_eq!(view["status"], "done");
        assert_eq!(view["summaries"][0]["tokens"][0], "radius");

        invoke_command(&state, "delete_stream", json!({ "streamId": stream_id })).unwrap();
        assert!(invoke_command(&state, "get_stream_view", json!({ "streamId": stream_id })).is_err());
    }

    #[test]
    fn test_invoke_errors() {
        let state = test_state();
        assert!(invoke_command(&state, "launch_rocket", json!({}))
            .unwrap_err()
            .contains("Unknown command"));
        assert!(invoke_command(&state, "get_theme_tokens", json!([]))
            .unwrap_err()
            .contains("Invalid payload"));
        assert!(invoke_command(&state, "derive_theme_mode", json!({ "source": "light", "target": "light" })).is_err());

        let derived = invoke_command(&state, "derive_theme_mode", json!({ "source": "light" })).unwrap();
        assert_eq!(derived["background"], "oklch(0.180 0.000 0.0)");
    }
}
