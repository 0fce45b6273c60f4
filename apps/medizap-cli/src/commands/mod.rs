//! # CLI Commands
//!
//! One subcommand per catalog/cart operation.
//!
//! ## Command Modules
//!
//! - [`medicine`] - `medizap medicines ...` (inventory)
//! - [`cart`] - `medizap cart ...` (shopping cart)
//!
//! Every command returns a JSON value that `main` prints on stdout.

pub mod cart;
pub mod medicine;

use std::sync::Arc;

use medizap_core::{CartAggregator, MedicineCatalog, Store};

use crate::error::ApiError;

/// Result of a command: the JSON document to print.
pub type CommandResult = Result<serde_json::Value, ApiError>;

/// Services sharing one store.
pub struct Services<S: Store> {
    pub catalog: MedicineCatalog<S>,
    pub cart: CartAggregator<S>,
}

impl<S: Store> Services<S> {
    pub fn new(store: S) -> Self {
        let store = Arc::new(store);
        Services {
            catalog: MedicineCatalog::from_shared(Arc::clone(&store)),
            cart: CartAggregator::from_shared(store),
        }
    }
}
