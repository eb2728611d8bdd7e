//! Vanna Protocol - wire types between the SDK and the RPC service.
//!
//! Every call is a JSON envelope `{"method": ..., "params": [...]}` answered by
//! `{"result": ...}` or `{"error": ...}`. The records in [`params`] and
//! [`results`] mirror the service's field names exactly, which is why they
//! still say `org` where the SDK surface says "model".

pub mod dataframe;
pub mod params;
pub mod results;
pub mod rpc;
pub mod training;

#[cfg(test)]
mod tests;

pub use dataframe::DataFrame;
pub use params::*;
pub use results::*;
pub use rpc::{Method, RpcErrorBody, RpcRequest, RpcResponse};
pub use training::{DbType, QuestionCategory};
