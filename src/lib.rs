//! Merch Forge - Conversational Product Design Agent
//!
//! This crate walks a user from a free-text product idea, through
//! iterative AI design refinement and ranked catalog selection, to a
//! published print-on-demand product.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
