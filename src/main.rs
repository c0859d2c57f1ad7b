mod api;
mod blockchain;
mod config;
mod error;
mod node;
mod transaction;

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use log::info;

use api::AppState;
use blockchain::HttpPeerClient;
use config::Settings;
use node::Node;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let settings = Settings::from_env();
    env_logger::init();

    let Settings {
        host,
        port,
        node_id,
        peer_timeout,
        pow_max_attempts,
    } = settings;

    info!("⛓️ Starting ledger node {node_id} at http://{host}:{port}");

    let node = Node::new(node_id, Arc::new(HttpPeerClient::with_timeout(peer_timeout)))
        .with_pow_limit(pow_max_attempts);
    let state = web::Data::new(AppState::new(node));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(api::init_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
