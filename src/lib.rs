//! Core library surface for the marina boat manager.
//!
//! The record model, the line codec, and the inventory store are the pieces
//! that matter; the `ui` module is a thin shell over them, and `config` and
//! `logger` hold the ambient setup the binary performs before handing over.
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod store;
pub mod ui;

/// Error type shared by every inventory operation.
pub use error::{InventoryError, Result};

/// The domain types that other layers manipulate.
pub use models::{Boat, Location, Money, PlaceKind};

/// The in-memory store with its load/save entry points.
pub use store::{Inventory, Payment, DEFAULT_CAPACITY};

/// The interactive front-ends.
pub use ui::{run_app, run_console, App};
