//! Commerce adapters.

mod mock;
mod printify;

pub use mock::{FailurePoint, InMemoryCommerce};
pub use printify::{PrintifyApiConfig, PrintifyClient};
