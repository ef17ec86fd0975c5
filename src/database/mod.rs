pub mod rest;
pub mod store;

pub use rest::RestStore;
pub use store::{Order, Store, StoreError, Table};
