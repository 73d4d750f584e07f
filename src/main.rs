//! Demo binary: spawns the realtime data loop thread and exposes it over
//! a minimal HTTP control surface.

mod rt;
mod web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = rt::spawn(engine::Config::default())?;

    let (handle, server) = web::setup();

    let ctrl_c_handle = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutting down");
            ctrl_c_handle.shutdown();
        }
    });

    server.start(engine).await
}
