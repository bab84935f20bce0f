// Analysis History
// Implements: key-value backends, versioned record normalization, the history store.

pub mod kv;
pub mod schema;
pub mod store;
