//! Adapters: concrete implementations of the ports plus the inbound
//! HTTP surface.

pub mod ai;
pub mod commerce;
pub mod http;
