//! Product configuration: saga-tracked creation and publishing.

mod builder;
mod saga;

pub use builder::{ConfigurationBuilder, FulfillmentError, FulfillmentStatus, ProductConfiguration};
pub use saga::{SagaLog, SagaOutcome, SagaStep};
