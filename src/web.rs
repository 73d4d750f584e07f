//! HTTP control surface over the data loop, per `SPEC_FULL.md`'s demo
//! binary: list nodes, create a playback stream, trigger a cycle.
//!
//! Grounded on the teacher's `Handle`/`Server` split for graceful shutdown
//! (a shutdown `oneshot` paired with `axum::serve`'s
//! `with_graceful_shutdown`); the routes themselves replace the teacher's
//! single `/playback` endpoint with the small surface the engine exposes.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use axum::extract::Extension;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::rt;

pub fn setup() -> (Handle, Server) {
    let (tx, rx) = oneshot::channel();
    let handle = Handle {
        inner: Arc::new(InnerHandle {
            shutdown: Mutex::new(Some(tx)),
        }),
    };
    let server = Server { shutdown: rx };
    (handle, server)
}

struct InnerHandle {
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
}

/// The handle to this server's graceful shutdown signal.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<InnerHandle>,
}

impl Handle {
    /// Shut the server down.
    pub fn shutdown(&self) {
        if let Ok(mut guard) = self.inner.shutdown.lock() {
            guard.take();
        }
    }
}

/// The server instance, consumed by [`Server::start`].
pub struct Server {
    shutdown: oneshot::Receiver<()>,
}

impl Server {
    /// Run the server until shut down, routing requests to the data loop
    /// via `engine`.
    pub async fn start(self, engine: rt::Handle) -> Result<()> {
        let app = Router::new()
            .route("/nodes", get(list_nodes))
            .route("/playback", post(create_playback))
            .route("/cycle", post(trigger_cycle))
            .layer(Extension(engine));

        let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;

        let shutdown = async move {
            _ = self.shutdown.await;
        };

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

        Ok(())
    }
}

async fn list_nodes(Extension(engine): Extension<rt::Handle>) -> Result<Json<Vec<rt::NodeSummary>>, StatusCode> {
    let (tx, rx) = oneshot::channel();

    engine
        .send(rt::Command::ListNodes(tx))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let nodes = rx.await.map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(nodes))
}

#[derive(Deserialize)]
struct CreatePlayback {}

#[derive(Serialize)]
struct Playback {
    id: u32,
}

#[axum::debug_handler]
async fn create_playback(
    Extension(engine): Extension<rt::Handle>,
    Json(_payload): Json<CreatePlayback>,
) -> Result<(StatusCode, Json<Playback>), StatusCode> {
    let (tx, rx) = oneshot::channel();

    engine
        .send(rt::Command::CreatePlaybackStream(tx))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let id = rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    tracing::info!(id, "created playback stream");

    Ok((StatusCode::CREATED, Json(Playback { id })))
}

async fn trigger_cycle(Extension(engine): Extension<rt::Handle>) -> Result<Json<Vec<u32>>, StatusCode> {
    let (tx, rx) = oneshot::channel();

    engine
        .send(rt::Command::TriggerCycle(tx))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let completed = rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(completed))
}
