//! Inventory store split across logical submodules: the record codec, the
//! in-memory collection with its billing operations, and file persistence.

pub mod codec;
mod file;
mod inventory;

pub use codec::{decode_lenient, decode_strict, encode, DecodeError};
pub use inventory::{Inventory, Payment, DEFAULT_CAPACITY};
