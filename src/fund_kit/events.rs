use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::prelude::Result;
use crate::Error;

/// Lifecycle events reported by the fund kit widget.
///
/// Transaction events carry the session they belong to, so a late event from
/// an earlier modal session can be told apart from the current one. Widget
/// events may leave it out when the host does not know it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FundKitEvent {
    #[serde(rename_all = "camelCase")]
    TransactionSuccess { session_id: Uuid, data: Value },
    #[serde(rename_all = "camelCase")]
    TransactionError { session_id: Uuid, data: Value },
    #[serde(rename_all = "camelCase")]
    WidgetOpen {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<Uuid>,
    },
    #[serde(rename_all = "camelCase")]
    WidgetClose {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<Uuid>,
    },
}

impl FundKitEvent {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            FundKitEvent::TransactionSuccess { session_id, .. }
            | FundKitEvent::TransactionError { session_id, .. } => Some(*session_id),
            FundKitEvent::WidgetOpen { session_id } | FundKitEvent::WidgetClose { session_id } => {
                *session_id
            }
        }
    }

    /// Default handling for every event: log it.
    pub fn log(&self) {
        match self {
            FundKitEvent::TransactionSuccess { session_id, data } => {
                info!("Transaction successful ({session_id}): {data}")
            }
            FundKitEvent::TransactionError { session_id, data } => {
                error!("Transaction failed ({session_id}): {data}")
            }
            FundKitEvent::WidgetOpen { .. } => info!("Widget opened"),
            FundKitEvent::WidgetClose { .. } => info!("Widget closed"),
        }
    }
}

/// Sending half given to whatever hosts the widget.
#[derive(Debug, Clone)]
pub struct FundKitHandle {
    tx: UnboundedSender<FundKitEvent>,
}

impl FundKitHandle {
    pub(crate) fn new(tx: UnboundedSender<FundKitEvent>) -> Self {
        Self { tx }
    }

    pub fn emit(&self, event: FundKitEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|e| Error::Aggregator(format!("event receiver dropped: {e}")))
    }

    /// Parses and forwards a JSON event from the widget host.
    pub fn emit_json(&self, raw: &str) -> Result<()> {
        self.emit(FundKitEvent::from_json(raw)?)
    }
}

/// Receiving half consumed by the deposit controller.
#[derive(Debug)]
pub struct FundKitEvents {
    rx: UnboundedReceiver<FundKitEvent>,
}

impl FundKitEvents {
    pub(crate) fn new(rx: UnboundedReceiver<FundKitEvent>) -> Self {
        Self { rx }
    }

    /// Next event, or `None` once every handle is gone.
    pub async fn recv(&mut self) -> Option<FundKitEvent> {
        let event = self.rx.recv().await;
        if let Some(event) = &event {
            event.log();
        }
        event
    }
}
