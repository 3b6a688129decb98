use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    response::IntoResponse,
    routing::get,
    Router,
};
use construct_core::EngineConfig;
use futures::{sink::SinkExt, stream::StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

mod session;
use session::Session;

// Application State
struct AppState {
    config: EngineConfig,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let shared_state = Arc::new(AppState { config: load_config() });

    let app = Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(shared_state);

    let addr = std::env::var("CONSTRUCT_ADDR")
        .ok()
        .and_then(|s| s.parse::<SocketAddr>().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));
    info!("listening on {}", addr);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}

/// Reads the engine configuration from the JSON file named by `CONSTRUCT_CONFIG`.
fn load_config() -> EngineConfig {
    let Ok(path) = std::env::var("CONSTRUCT_CONFIG") else {
        return EngineConfig::default();
    };
    match std::fs::read_to_string(&path).map(|text| EngineConfig::from_json(&text)) {
        Ok(Ok(config)) => {
            info!("Loaded config from {}", path);
            config
        }
        Ok(Err(e)) => {
            warn!("Invalid config {}: {}, using defaults", path, e);
            EngineConfig::default()
        }
        Err(e) => {
            warn!("Cannot read config {}: {}, using defaults", path, e);
            EngineConfig::default()
        }
    }
}

async fn root() -> &'static str {
    "Hello from Construct Backend!"
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    info!("Client connected (core {})", construct_core::version());
    let (mut sender, mut receiver) = socket.split();
    let mut session = Session::new(state.config.clone());

    while let Some(msg) = receiver.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("WebSocket error: {}", e);
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                if let Some(reply) = session.handle(&text) {
                    if sender.send(Message::Text(reply)).await.is_err() {
                        break;
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    info!("Client disconnected");
}
