use crate::feed::state::FeedState;
use anyhow::Context;
use replaycore::session::BoundaryRecord;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter, Rejection, Reply};

/// `GET /boundaries`, `POST /boundaries` and `GET /status` over the shared state.
pub fn routes(
    state: Arc<FeedState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let list_route = warp::path("boundaries")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: Arc<FeedState>| warp::reply::json(&state.snapshot().boundaries));

    let ingest_route = warp::path("boundaries")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(state_filter.clone())
        .map(|records: Vec<BoundaryRecord>, state: Arc<FeedState>| {
            let revision = state.publish(records);
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "ok", "revision": revision})),
                StatusCode::OK,
            )
        });

    let status_route = warp::path("status")
        .and(warp::path::end())
        .and(warp::get())
        .and(state_filter)
        .map(|state: Arc<FeedState>| warp::reply::json(&state.status()));

    list_route.or(ingest_route).or(status_route)
}

/// HTTP endpoint the visualizer polls for queue-boundary records.
pub struct FeedServer {
    address: SocketAddr,
    state: Arc<FeedState>,
}

impl FeedServer {
    pub fn new(address: SocketAddr, state: Arc<FeedState>) -> Self {
        Self { address, state }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Serves on a background thread with its own single-threaded runtime.
    pub fn spawn(&self) -> anyhow::Result<thread::JoinHandle<()>> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building boundary feed runtime")?;
        let routes = routes(self.state.clone());
        let address = self.address;
        log::info!("boundary feed listening on http://{}/boundaries", address);
        Ok(thread::spawn(move || {
            runtime.block_on(async move {
                warp::serve(routes).run(address).await;
            });
        }))
    }
}
