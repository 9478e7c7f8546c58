//! Providers Module - Realm access
//!
//! `realm` is the query seam; `rpc` is its Tendermint JSON-RPC transport.

pub mod realm;
pub mod rpc;

pub use realm::{RealmFacade, RealmQuery};
pub use rpc::RpcClient;
