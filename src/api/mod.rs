mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::ResponseError;
use actix_web::web::ServiceConfig;

pub use models::AppState;

use crate::error::LedgerError;

/// Routes are unscoped: peers fetch `/chain` directly.
pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(chain::get_chain)
        .service(chain::mine_block)
        .service(tx::post_transaction)
        .service(nodes::register_nodes)
        .service(nodes::resolve);
}

// 500 with the error's display text.
impl ResponseError for LedgerError {}
