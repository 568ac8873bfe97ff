//! voxrelay server binary.
//!
//! HTTP polling relay for short-lived voice fragments:
//! - POST /api/register       join a room
//! - POST /api/publish        push one encoded fragment
//! - GET  /api/poll/...       fetch other members' recent fragments
//! - GET  /api/players/...    room roster after a sweep

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use voxrelay_server::{app_state, config, router, sweeper};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cfg = config::load_or_default("voxrelay.yaml").expect("config load failed");
    let listen: SocketAddr = cfg
        .server
        .listen
        .parse()
        .expect("server.listen must be a valid SocketAddr");

    let state = app_state::AppState::new(cfg).expect("state init failed");
    sweeper::spawn(state.clone());
    let app = router::build_router(state);

    tracing::info!(%listen, "voxrelay-server starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
