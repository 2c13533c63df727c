//! State shared by every request handler.

use std::sync::Arc;

use crate::accounts::Accounts;
use crate::catalog::Catalog;

/// Cheaply cloneable handle to the catalogue and the registered accounts.
///
/// Per-visitor state (cart, signed-in customer, one-shot messages) lives in
/// the session instead.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    accounts: Accounts,
}

impl AppState {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                accounts: Accounts::new(),
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    pub fn accounts(&self) -> &Accounts {
        &self.inner.accounts
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Catalog::demo())
    }
}
