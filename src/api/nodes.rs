use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::error::LedgerError;

/// Register peers. Addresses without a host are dropped silently.
#[post("/nodes/register")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> HttpResponse {
    let mut nodes: Vec<String> = state.node.register_nodes(&body.nodes).into_iter().collect();
    nodes.sort();
    info!(
        "POST /nodes/register - {} submitted, {} known",
        body.nodes.len(),
        nodes.len()
    );

    HttpResponse::Created().json(RegisterNodesResponse {
        message: "New nodes have been added",
        nodes,
    })
}

/// Run a consensus pass against all known peers.
#[get("/nodes/resolve")]
pub async fn resolve(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let resolver = state.clone();
    let replaced = web::block(move || resolver.node.resolve_conflicts())
        .await
        .map_err(|e| LedgerError::Blocking(e.to_string()))?;

    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };

    Ok(HttpResponse::Ok().json(ResolveResponse {
        message,
        replaced,
        chain: state.node.chain(),
    }))
}
