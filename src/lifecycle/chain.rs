//! Ordered status chains per record kind

use crate::config::{ChainConfig, ChainsConfig};
use crate::lifecycle::error::{LifecycleError, LifecycleResult};
use crate::models::{RecordKind, Status};
use serde::Serialize;

/// Forward statuses of one kind plus its absorbing failure status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    statuses: Vec<Status>,
    failure: Status,
}

impl Chain {
    /// Build a chain, rejecting empty or ambiguous definitions
    pub fn new(kind: RecordKind, statuses: Vec<Status>, failure: Status) -> LifecycleResult<Self> {
        if statuses.is_empty() {
            return Err(LifecycleError::InvalidChain {
                kind,
                reason: "chain has no statuses".to_string(),
            });
        }

        for (i, status) in statuses.iter().enumerate() {
            if statuses[..i].contains(status) {
                return Err(LifecycleError::InvalidChain {
                    kind,
                    reason: format!("{} appears more than once", status),
                });
            }
        }

        if statuses.contains(&failure) {
            return Err(LifecycleError::InvalidChain {
                kind,
                reason: format!("failure status {} is also a forward status", failure),
            });
        }

        Ok(Self { statuses, failure })
    }

    /// Status new records start in
    pub fn initial(&self) -> Status {
        self.statuses[0]
    }

    /// Last forward status
    pub fn last(&self) -> Status {
        self.statuses[self.statuses.len() - 1]
    }

    pub fn failure(&self) -> Status {
        self.failure
    }

    /// Forward statuses in order
    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Every status of this kind, forward statuses first
    pub fn all_statuses(&self) -> impl Iterator<Item = Status> + '_ {
        self.statuses.iter().copied().chain(std::iter::once(self.failure))
    }

    /// Position of a forward status
    pub fn position(&self, status: Status) -> Option<usize> {
        self.statuses.iter().position(|s| *s == status)
    }

    /// Lifecycle rank of a status: forward statuses in order, then the
    /// failure status. Statuses of other kinds rank after all of them.
    pub fn rank(&self, status: Status) -> usize {
        self.all_statuses()
            .position(|s| s == status)
            .unwrap_or(usize::MAX)
    }

    pub fn contains(&self, status: Status) -> bool {
        status == self.failure || self.statuses.contains(&status)
    }

    pub fn is_terminal(&self, status: Status) -> bool {
        status == self.failure || status == self.last()
    }

    pub fn is_failure(&self, status: Status) -> bool {
        status == self.failure
    }

    /// Statuses reachable from `from`, given whether terminal statuses are final
    pub fn allowed_from(&self, from: Status, terminal_is_final: bool) -> Vec<Status> {
        if from == self.failure {
            return if terminal_is_final {
                vec![self.failure]
            } else {
                self.all_statuses().collect()
            };
        }

        let Some(i) = self.position(from) else {
            return Vec::new();
        };

        let mut allowed = self.statuses[i..].to_vec();
        if from != self.last() || !terminal_is_final {
            allowed.push(self.failure);
        }
        allowed
    }
}

/// Chain per record kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleTable {
    contract: Chain,
    report: Chain,
    order: Chain,
}

impl LifecycleTable {
    /// Build the table from configuration
    pub fn from_config(config: &ChainsConfig) -> LifecycleResult<Self> {
        Ok(Self {
            contract: build(RecordKind::Contract, &config.contract)?,
            report: build(RecordKind::Report, &config.report)?,
            order: build(RecordKind::Order, &config.order)?,
        })
    }

    pub fn chain(&self, kind: RecordKind) -> &Chain {
        match kind {
            RecordKind::Contract => &self.contract,
            RecordKind::Report => &self.report,
            RecordKind::Order => &self.order,
        }
    }
}

impl Default for LifecycleTable {
    fn default() -> Self {
        let defaults = ChainsConfig::default();
        let chain = |c: &ChainConfig| Chain {
            statuses: c.statuses.clone(),
            failure: c.failure,
        };

        Self {
            contract: chain(&defaults.contract),
            report: chain(&defaults.report),
            order: chain(&defaults.order),
        }
    }
}

fn build(kind: RecordKind, config: &ChainConfig) -> LifecycleResult<Chain> {
    Chain::new(kind, config.statuses.clone(), config.failure)
}
