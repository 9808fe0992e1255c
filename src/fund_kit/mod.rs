//! The Aarc fund kit surface: widget configuration, modal control and events.

mod config;
mod events;

pub use config::{
    ApiKeys, Appearance, BridgeAndSwap, DestinationConfig, DestinationContract, FundKitConfig,
    ModuleConfig, OnRamp, Theme, Toggle, APP_NAME,
};
pub use events::{FundKitEvent, FundKitEvents, FundKitHandle};

use ethers::types::Address;
use log::debug;
use tokio::sync::mpsc::unbounded_channel;
use uuid::Uuid;

use crate::prelude::Result;
use crate::Error;

/// Controls of the deposit aggregator widget.
pub trait FundKit {
    fn update_requested_amount(&mut self, amount: &str) -> Result<()>;
    /// Deliver funds by calling `contract` once they are assembled.
    fn update_destination_contract(&mut self, contract: DestinationContract);
    /// Deliver funds straight to `wallet`.
    fn update_destination_wallet(&mut self, wallet: Address);
    fn open_modal(&mut self, session_id: Uuid) -> Result<()>;
    fn close(&mut self);
}

/// In-process fund kit modal.
///
/// Keeps the live widget configuration and forwards open/close as events to
/// the same stream the widget host feeds through [`FundKitHandle`].
#[derive(Debug)]
pub struct FundKitModal {
    config: FundKitConfig,
    session: Option<Uuid>,
    handle: FundKitHandle,
}

impl FundKitModal {
    pub fn new(config: FundKitConfig) -> (Self, FundKitEvents) {
        let (tx, rx) = unbounded_channel();
        let modal = Self {
            config,
            session: None,
            handle: FundKitHandle::new(tx),
        };
        (modal, FundKitEvents::new(rx))
    }

    pub fn handle(&self) -> FundKitHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &FundKitConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<Uuid> {
        self.session
    }
}

impl FundKit for FundKitModal {
    fn update_requested_amount(&mut self, amount: &str) -> Result<()> {
        let requested = amount
            .parse::<f64>()
            .map_err(|e| Error::InvalidAmount(format!("{amount}: {e}")))?;
        self.config.destination.requested_amount = Some(requested);
        Ok(())
    }

    fn update_destination_contract(&mut self, contract: DestinationContract) {
        debug!(
            "Destination contract {:?} with {} bytes of payload",
            contract.contract_address,
            contract.contract_payload.len()
        );
        self.config.destination.wallet_address = contract.contract_address;
        self.config.destination.contract = Some(contract);
    }

    fn update_destination_wallet(&mut self, wallet: Address) {
        debug!("Destination wallet {wallet:?}");
        self.config.destination.contract = None;
        self.config.destination.wallet_address = wallet;
    }

    fn open_modal(&mut self, session_id: Uuid) -> Result<()> {
        if self.config.api_keys.aarc_sdk.is_empty() {
            return Err(Error::Aggregator("missing fund kit api key".to_string()));
        }
        self.session = Some(session_id);
        self.handle.emit(FundKitEvent::WidgetOpen {
            session_id: Some(session_id),
        })
    }

    fn close(&mut self) {
        if let Some(session_id) = self.session.take() {
            let closed = FundKitEvent::WidgetClose {
                session_id: Some(session_id),
            };
            if let Err(e) = self.handle.emit(closed) {
                debug!("Widget close for {session_id} not delivered: {e}");
            }
        }
    }
}
