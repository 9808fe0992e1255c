use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prelude::Result;
use crate::Error;

/// Which destination the aggregator is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DepositStrategy {
    /// The aggregator calls `batchedDepositWithPermit` with a signed permit.
    Permit,
    /// The aggregator pays the depositor, who then transfers to the bridge.
    DirectTransfer,
}

impl DepositStrategy {
    /// Lower bound, in whole USDC, enforced before submission.
    pub fn minimum(self) -> Option<u64> {
        match self {
            DepositStrategy::Permit => None,
            DepositStrategy::DirectTransfer => Some(crate::consts::MIN_DEPOSIT),
        }
    }
}

impl std::str::FromStr for DepositStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "permit" => Ok(DepositStrategy::Permit),
            "direct" | "direct-transfer" | "direct_transfer" => Ok(DepositStrategy::DirectTransfer),
            other => Err(Error::Config(format!("unknown deposit strategy {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Nonce read, signing or encoding failed before the aggregator opened.
    Preparation(String),
    Aggregator(String),
    Transfer(String),
    Timeout,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositState {
    Idle,
    AwaitingAggregator,
    Transferring,
    Done,
    Failed(FailureReason),
}

impl DepositState {
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            DepositState::AwaitingAggregator | DepositState::Transferring
        )
    }
}

impl fmt::Display for DepositState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepositState::Idle => write!(f, "Idle"),
            DepositState::AwaitingAggregator => write!(f, "AwaitingAggregator"),
            DepositState::Transferring => write!(f, "Transferring"),
            DepositState::Done => write!(f, "Done"),
            DepositState::Failed(reason) => write!(f, "Failed({reason:?})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Submitted,
    PreparationFailed(String),
    AggregatorSucceeded,
    AggregatorFailed(String),
    TransferSucceeded,
    TransferFailed(String),
    TimedOut,
    Cancelled,
    /// The widget was closed on a permit handoff, or a new handoff replaced it.
    Dismissed,
    Reset,
}

/// Deposit lifecycle for one strategy.
#[derive(Debug, Clone)]
pub struct DepositMachine {
    strategy: DepositStrategy,
    state: DepositState,
}

impl DepositMachine {
    pub fn new(strategy: DepositStrategy) -> Self {
        Self {
            strategy,
            state: DepositState::Idle,
        }
    }

    pub fn state(&self) -> &DepositState {
        &self.state
    }

    pub fn strategy(&self) -> DepositStrategy {
        self.strategy
    }

    /// Applies `transition`, leaving the state untouched when it is not allowed.
    pub fn apply(&mut self, transition: Transition) -> Result<&DepositState> {
        use DepositState::*;

        let next = match (&self.state, transition) {
            (_, Transition::Reset) => Idle,
            (Idle | Done | Failed(_), Transition::Submitted) => AwaitingAggregator,
            (Idle | Done | Failed(_), Transition::PreparationFailed(reason)) => {
                Failed(FailureReason::Preparation(reason))
            }
            (AwaitingAggregator, Transition::AggregatorSucceeded) => match self.strategy {
                DepositStrategy::Permit => Done,
                DepositStrategy::DirectTransfer => Transferring,
            },
            (AwaitingAggregator, Transition::AggregatorFailed(reason)) => {
                Failed(FailureReason::Aggregator(reason))
            }
            (AwaitingAggregator, Transition::TimedOut) => Failed(FailureReason::Timeout),
            (AwaitingAggregator, Transition::Dismissed)
                if self.strategy == DepositStrategy::Permit =>
            {
                Idle
            }
            (_, Transition::Cancelled) => Failed(FailureReason::Cancelled),
            (Transferring, Transition::TransferSucceeded) => Done,
            (Transferring, Transition::TransferFailed(reason)) => {
                Failed(FailureReason::Transfer(reason))
            }
            (from, event) => {
                return Err(Error::InvalidTransition {
                    from: from.to_string(),
                    event: format!("{event:?}"),
                })
            }
        };
        self.state = next;
        Ok(&self.state)
    }
}
