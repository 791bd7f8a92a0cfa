use std::sync::Arc;

use crate::{
    db::{DbPool, OrmConn},
    payments::PaymentBackend,
    promotions::PromoCatalog,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub promos: Arc<PromoCatalog>,
    pub payments: PaymentBackend,
}
