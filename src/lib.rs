//! Asynchronous DNS client library: wire codec, transaction engine,
//! transport (UDP/TCP/multicast), a small connection pool, and typed query
//! helpers. See the module docs below for each layer.
#[macro_use]
pub mod macros;

pub mod dns_types;
pub mod engine;
pub mod error;
pub mod network_order;
pub mod pool;
pub mod query;
pub mod resolver_config;
pub mod transport;
pub mod wire;
