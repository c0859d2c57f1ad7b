use actix_web::{HttpResponse, Responder, get, web};
use log::info;

use super::models::{AppState, MineResponse};
use crate::blockchain::PeerChain;
use crate::error::LedgerError;

/// Get the full blockchain, in the shape peers consume during consensus.
#[get("/chain")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = state.node.chain();
    HttpResponse::Ok().json(PeerChain {
        length: chain.len(),
        chain,
    })
}

/// Mine a new block from the pending pool:
/// - Find a proof against the last block's proof (blocking pool)
/// - Credit the mining reward to this node
/// - Seal all pending transactions into the block
#[get("/mine")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let miner = state.clone();
    let block = web::block(move || miner.node.mine())
        .await
        .map_err(|e| LedgerError::Blocking(e.to_string()))??;

    info!(
        "GET /mine - block #{} mined by {}",
        block.index,
        state.node.node_id()
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        message: "New Block Mined",
        index: block.index,
        transactions: block.transactions,
        proof: block.proof,
        previous_hash: block.previous_hash,
    }))
}
