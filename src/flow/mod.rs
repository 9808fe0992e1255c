//! Deposit sequencing: amount entry, payload preparation, aggregator handoff
//! and the direct-transfer second phase.

mod abort;
mod state;

pub use abort::AbortToken;
pub use state::{DepositMachine, DepositState, DepositStrategy, FailureReason, Transition};

use std::collections::HashMap;
use std::time::Duration;

use ethers::types::{Address, H256, U256};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::amount::{sanitize_amount, validate_amount};
use crate::consts::{
    bridge_address, usdc_address, SupportedChainId, DEFAULT_AMOUNT, QUICK_AMOUNTS,
    SELECTED_ACCOUNT_KEY,
};
use crate::deposit::{encode_usdc_transfer, DepositPayload};
use crate::fund_kit::{DestinationContract, FundKit, FundKitEvent, FundKitEvents};
use crate::permit::{Permit, SplitSignature};
use crate::prelude::Result;
use crate::wallet::{TokenReader, WalletProvider};
use crate::Error;

pub const DEFAULT_AGGREGATOR_TIMEOUT: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub strategy: DepositStrategy,
    pub chain: SupportedChainId,
    /// Longest wait for the aggregator to report on an open session.
    pub aggregator_timeout: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            strategy: DepositStrategy::Permit,
            chain: SupportedChainId::Arbitrum,
            aggregator_timeout: DEFAULT_AGGREGATOR_TIMEOUT,
        }
    }
}

/// What a successful submission handed to the aggregator.
#[derive(Debug, Clone)]
pub enum Submission {
    /// Signed permit calldata the aggregator will execute on the bridge.
    Permit(DepositPayload),
    /// USDC routed to the depositor, to be forwarded once the aggregator succeeds.
    DirectTransfer { depositor: Address, value: U256 },
}

#[derive(Debug, Clone, Copy)]
struct PendingTransfer {
    depositor: Address,
    value: U256,
}

/// Drives one deposit screen against injected wallet, token and fund kit collaborators.
#[derive(Debug)]
pub struct DepositController<W, T, F> {
    wallet: W,
    tokens: T,
    fund_kit: F,
    settings: ControllerSettings,
    machine: DepositMachine,
    amount: String,
    processing: bool,
    session: Option<Uuid>,
    abort: AbortToken,
    pending: Option<PendingTransfer>,
    /// Screen preferences. `selectedAccount` holds the last depositing account
    /// and is dropped on disconnect.
    preferences: HashMap<String, String>,
}

impl<W, T, F> DepositController<W, T, F>
where
    W: WalletProvider,
    T: TokenReader,
    F: FundKit,
{
    pub fn new(wallet: W, tokens: T, fund_kit: F, settings: ControllerSettings) -> Self {
        Self {
            wallet,
            tokens,
            fund_kit,
            machine: DepositMachine::new(settings.strategy),
            settings,
            amount: DEFAULT_AMOUNT.to_string(),
            processing: false,
            session: None,
            abort: AbortToken::new(),
            pending: None,
            preferences: HashMap::new(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn state(&self) -> &DepositState {
        self.machine.state()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn session(&self) -> Option<Uuid> {
        self.session
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn fund_kit(&self) -> &F {
        &self.fund_kit
    }

    pub fn preference(&self, key: &str) -> Option<&str> {
        self.preferences.get(key).map(String::as_str)
    }

    /// Token for cancelling the running attempt from another task. The same
    /// token serves every attempt of this controller.
    pub fn abort_handle(&self) -> AbortToken {
        self.abort.clone()
    }

    pub fn button_label(&self) -> &'static str {
        if self.processing {
            "Processing..."
        } else {
            "Continue"
        }
    }

    /// Stores sanitised keystrokes. Input is ignored while no account is connected.
    pub fn set_amount(&mut self, raw: &str) {
        if self.wallet.address().is_some() {
            self.amount = sanitize_amount(raw);
        }
    }

    /// Picks one of the preset amounts.
    pub fn select_quick_amount(&mut self, value: &str) -> Result<()> {
        if !QUICK_AMOUNTS.contains(&value) {
            return Err(Error::InvalidAmount(format!("{value} is not a preset amount")));
        }
        self.set_amount(value);
        Ok(())
    }

    /// Direct transfers stay busy while the aggregator is open. A handed-off permit does not.
    fn is_busy(&self) -> bool {
        match self.machine.state() {
            DepositState::AwaitingAggregator
                if self.settings.strategy == DepositStrategy::Permit =>
            {
                self.processing
            }
            state => self.processing || state.is_in_flight(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.wallet.address().is_some()
            && !self.is_busy()
            && validate_amount(&self.amount, self.settings.strategy.minimum()).is_ok()
    }

    /// Validates the amount, prepares the destination and opens the aggregator.
    ///
    /// Nothing reaches the aggregator or the wallet when a precondition fails.
    pub async fn submit(&mut self) -> Result<Submission> {
        let depositor = self.wallet.address().ok_or(Error::NotConnected)?;
        if self.is_busy() {
            return Err(Error::Busy);
        }
        let value = validate_amount(&self.amount, self.settings.strategy.minimum())?;

        if self.machine.state().is_in_flight() {
            info!("Replacing aggregator session {:?}", self.session);
            self.fund_kit.close();
            self.machine.apply(Transition::Dismissed)?;
        }
        if self.abort.is_aborted() {
            debug!("Re-arming abort token");
            self.abort.rearm();
        }
        self.processing = true;
        self.session = Some(Uuid::new_v4());
        self.pending = None;
        self.preferences
            .insert(SELECTED_ACCOUNT_KEY.to_string(), format!("{depositor:?}"));
        info!(
            "Submitting {} USDC deposit for {depositor:?} ({:?})",
            self.amount, self.settings.strategy
        );

        let result = match self.settings.strategy {
            DepositStrategy::Permit => self.submit_permit(depositor, value).await,
            DepositStrategy::DirectTransfer => self.submit_direct(depositor, value),
        };
        if let Err(e) = &result {
            error!("Error preparing deposit: {e}");
            self.processing = false;
            self.fund_kit.close();
        }
        result
    }

    async fn submit_permit(&mut self, depositor: Address, value: U256) -> Result<Submission> {
        let payload = match self.prepare_permit_deposit(depositor, value).await {
            Ok(payload) => payload,
            Err(e) => {
                self.machine
                    .apply(Transition::PreparationFailed(e.to_string()))?;
                return Err(e);
            }
        };
        if self.abort.is_aborted() {
            self.machine.apply(Transition::Cancelled)?;
            return Err(Error::Cancelled);
        }

        self.open_aggregator(|fund_kit| {
            fund_kit.update_destination_contract(DestinationContract::hyperliquid_deposit(
                payload.bridge,
                payload.calldata.clone(),
            ));
        })?;

        self.amount.clear();
        self.processing = false;
        Ok(Submission::Permit(payload))
    }

    fn submit_direct(&mut self, depositor: Address, value: U256) -> Result<Submission> {
        self.open_aggregator(|fund_kit| fund_kit.update_destination_wallet(depositor))?;
        self.pending = Some(PendingTransfer { depositor, value });
        Ok(Submission::DirectTransfer { depositor, value })
    }

    async fn prepare_permit_deposit(&self, owner: Address, value: U256) -> Result<DepositPayload> {
        let chain = self.settings.chain;
        let nonce = self.tokens.nonces(usdc_address(chain)?, owner).await?;
        let permit = Permit::for_bridge(owner, value, nonce, Permit::deadline_from_now(), chain)?;
        debug!(
            "Permit value {} nonce {} deadline {}",
            permit.value, permit.nonce, permit.deadline
        );

        let signature = self.wallet.sign_permit(&permit).await?;
        let payload = DepositPayload::from_signed_permit(&permit, SplitSignature::try_from(signature)?)?;
        debug!("Deposit calldata {}", payload.calldata_hex());
        Ok(payload)
    }

    fn open_aggregator(&mut self, set_destination: impl FnOnce(&mut F)) -> Result<()> {
        let session = self
            .session
            .ok_or_else(|| Error::Aggregator("no active session".to_string()))?;

        let opened = self
            .fund_kit
            .update_requested_amount(&self.amount)
            .and_then(|()| {
                set_destination(&mut self.fund_kit);
                self.fund_kit.open_modal(session)
            });
        if let Err(e) = opened {
            self.machine
                .apply(Transition::PreparationFailed(e.to_string()))?;
            return Err(e);
        }
        self.machine.apply(Transition::Submitted)?;
        Ok(())
    }

    /// Waits for the aggregator to report on the current session.
    ///
    /// For direct transfers a success triggers the wallet transfer to the
    /// bridge and its hash is returned. Events tagged with another session
    /// are ignored. The wait ends early on abort and fails after the
    /// configured timeout.
    pub async fn await_aggregator(&mut self, events: &mut FundKitEvents) -> Result<Option<H256>> {
        if self.machine.state() != &DepositState::AwaitingAggregator {
            return Err(Error::InvalidTransition {
                from: self.machine.state().to_string(),
                event: "await_aggregator".to_string(),
            });
        }
        let session = self
            .session
            .ok_or_else(|| Error::Aggregator("no active session".to_string()))?;
        let timeout = tokio::time::sleep(self.settings.aggregator_timeout);
        tokio::pin!(timeout);
        let abort = self.abort.clone();

        loop {
            tokio::select! {
                biased;
                _ = abort.aborted() => {
                    return self.fail(Transition::Cancelled, Error::Cancelled);
                }
                _ = &mut timeout => {
                    let secs = self.settings.aggregator_timeout.as_secs();
                    warn!("No aggregator result for session {session} after {secs}s");
                    return self.fail(Transition::TimedOut, Error::Timeout(secs));
                }
                event = events.recv() => match event {
                    Some(FundKitEvent::TransactionSuccess { session_id, .. }) if session_id == session => {
                        self.fund_kit.close();
                        self.machine.apply(Transition::AggregatorSucceeded)?;
                        return self.finish_after_aggregator().await;
                    }
                    Some(FundKitEvent::TransactionError { session_id, data }) if session_id == session => {
                        return self.fail(
                            Transition::AggregatorFailed(data.to_string()),
                            Error::Aggregator(data.to_string()),
                        );
                    }
                    Some(FundKitEvent::WidgetClose { session_id })
                        if self.settings.strategy == DepositStrategy::Permit
                            && session_id.map_or(true, |id| id == session) =>
                    {
                        info!("Widget closed, permit attempt {session} left to the aggregator");
                        self.fund_kit.close();
                        self.machine.apply(Transition::Dismissed)?;
                        return Ok(None);
                    }
                    Some(other) => {
                        if let Some(stale) = other.session_id().filter(|id| *id != session) {
                            debug!("Ignoring event for stale session {stale}");
                        }
                    }
                    None => {
                        let e = Error::Aggregator("event stream closed".to_string());
                        return self.fail(Transition::AggregatorFailed(e.to_string()), e);
                    }
                },
            }
        }
    }

    async fn finish_after_aggregator(&mut self) -> Result<Option<H256>> {
        if self.machine.state() == &DepositState::Done {
            self.processing = false;
            return Ok(None);
        }

        let Some(pending) = self.pending.take() else {
            let e = Error::Transaction("no pending transfer".to_string());
            return self.fail(Transition::TransferFailed(e.to_string()), e);
        };
        if self.abort.is_aborted() || self.wallet.address() != Some(pending.depositor) {
            return self.fail(Transition::Cancelled, Error::Cancelled);
        }

        let chain = self.settings.chain;
        let calldata = encode_usdc_transfer(bridge_address(chain)?, pending.value);
        match self
            .wallet
            .send_transaction(usdc_address(chain)?, calldata)
            .await
        {
            Ok(tx_hash) => {
                info!("Deposit transfer {tx_hash:?} of {} to bridge confirmed", pending.value);
                self.machine.apply(Transition::TransferSucceeded)?;
                self.processing = false;
                Ok(Some(tx_hash))
            }
            Err(e) => {
                error!("Transfer to bridge failed: {e}");
                self.fail(Transition::TransferFailed(e.to_string()), e)
            }
        }
    }

    fn fail<R>(&mut self, transition: Transition, error: Error) -> Result<R> {
        self.machine.apply(transition)?;
        self.processing = false;
        self.pending = None;
        self.fund_kit.close();
        Err(error)
    }

    /// Resets the screen, cancels any in-flight attempt and drops the wallet.
    pub fn disconnect(&mut self) {
        self.abort.abort();
        self.fund_kit.close();
        self.amount = DEFAULT_AMOUNT.to_string();
        self.processing = false;
        self.pending = None;
        self.session = None;
        if let Err(e) = self.machine.apply(Transition::Reset) {
            error!("Could not reset deposit state: {e}");
        }
        self.wallet.disconnect();
        self.preferences.remove(SELECTED_ACCOUNT_KEY);
        info!("Deposit screen reset after disconnect");
    }
}
