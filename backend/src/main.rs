use backend::api;

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};

use chess_core::{MoveSource, Session, UciConfig, UciEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();

    // Optional UCI engine; without one every engine move comes from the
    // heuristic fallback selector.
    let engine: Option<Box<dyn MoveSource>> = match std::env::var("ENGINE_PATH") {
        Ok(path) => match UciEngine::spawn(&UciConfig::new(path)).await {
            Ok(engine) => Some(Box::new(engine)),
            Err(e) => {
                warn!("[BACKEND] UCI engine unavailable ({e:#}), using fallback move selection");
                None
            }
        },
        Err(_) => {
            info!("[BACKEND] ENGINE_PATH not set, using fallback move selection");
            None
        }
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    let app = api::router(Session::new(engine));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("[BACKEND] API listening on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
