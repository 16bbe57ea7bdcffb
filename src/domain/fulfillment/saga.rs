//! Configuration saga steps and recorded outcomes.
//!
//! Product configuration is a sequence of remote calls that is not
//! transactional: a failure partway through leaves earlier effects in
//! place (e.g. a created but unpublished product). Each completed step
//! is recorded with a timestamp so a later retry can resume from the
//! last completed step instead of restarting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One step of the product configuration sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SagaStep {
    ProviderResolved,
    VariantsResolved,
    AssetUploaded,
    ProductCreated,
    Published,
}

impl SagaStep {
    /// The fixed execution order of the saga.
    pub const ORDER: [SagaStep; 5] = [
        SagaStep::ProviderResolved,
        SagaStep::VariantsResolved,
        SagaStep::AssetUploaded,
        SagaStep::ProductCreated,
        SagaStep::Published,
    ];

    /// Describes the work the step performs, for error messages.
    pub fn describes(&self) -> &'static str {
        match self {
            Self::ProviderResolved => "resolving a print provider",
            Self::VariantsResolved => "resolving variants",
            Self::AssetUploaded => "uploading the design asset",
            Self::ProductCreated => "creating the product",
            Self::Published => "publishing the product",
        }
    }
}

/// A completed saga step with its completion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SagaOutcome {
    pub step: SagaStep,
    pub completed_at: DateTime<Utc>,
}

/// Ordered record of the steps a configuration attempt completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SagaLog {
    outcomes: Vec<SagaOutcome>,
}

impl SagaLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a step as completed now.
    pub fn record(&mut self, step: SagaStep) {
        tracing::info!(step = ?step, "configuration step completed");
        self.outcomes.push(SagaOutcome {
            step,
            completed_at: Utc::now(),
        });
    }

    /// Returns true if the given step has been completed.
    pub fn is_completed(&self, step: SagaStep) -> bool {
        self.outcomes.iter().any(|o| o.step == step)
    }

    /// The completed outcomes, in completion order.
    pub fn outcomes(&self) -> &[SagaOutcome] {
        &self.outcomes
    }

    /// The most recently completed step, if any.
    pub fn last_completed(&self) -> Option<SagaStep> {
        self.outcomes.last().map(|o| o.step)
    }

    /// Returns true if every step of the saga has completed.
    pub fn is_complete(&self) -> bool {
        SagaStep::ORDER.iter().all(|step| self.is_completed(*step))
    }
}
