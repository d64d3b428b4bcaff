use axum::{
    Router,
    routing::{get, post},
};

use std::sync::Arc;

use crate::{accounts, categories, health, records, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .route("/user", post(user::create))
        .route("/user/{id}", get(user::get).delete(user::delete))
        .route("/users", get(user::list))
        .route(
            "/category",
            post(categories::create)
                .get(categories::list)
                .delete(categories::delete),
        )
        .route("/record", post(records::create).get(records::list))
        .route("/record/{id}", get(records::get).delete(records::delete))
        .route("/account/{user_id}", get(accounts::get))
        .route("/account/{user_id}/deposit", post(accounts::deposit))
        .with_state(state)
}

/// Build the HTTP application around `engine`.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine)).await
}
