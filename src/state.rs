use std::sync::Arc;

use sqlx::PgPool;

use crate::services::ItemService;
use crate::verify::BotVerifier;

/// Shared application state handed to every handler. Built once in main
/// after the pool and verifier are constructed; nothing is created lazily
/// at request time.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub items: ItemService,
    pub verifier: Arc<dyn BotVerifier>,
}

impl AppState {
    pub fn new(pool: PgPool, verifier: Arc<dyn BotVerifier>) -> Self {
        let items = ItemService::new(pool.clone());
        Self { pool, items, verifier }
    }
}
