use actix_web::{HttpResponse, post, web};
use log::debug;

use super::models::{AppState, NewTxRequest, NewTxResponse};
use crate::error::LedgerError;

/// Queue a transaction for the next mined block. No validation of the
/// parties or the amount takes place.
#[post("/transactions/new")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, LedgerError> {
    let index = state
        .node
        .submit_transaction(&body.sender, &body.recipient, body.amount)?;
    debug!(
        "POST /transactions/new - {} -> {} ({}) queued for block #{}",
        body.sender, body.recipient, body.amount, index
    );

    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to Block {index}"),
        index,
    }))
}
