use std::env;

use hl_deposit::prelude::Result;
use hl_deposit::{DepositConfig, DepositController, EthersWallet, FundKitModal, Submission};
use log::{error, info};
use tokio::io::{AsyncBufReadExt, BufReader};

// Drives one deposit against a live RPC. Fund kit events are read from stdin,
// one JSON object per line, e.g.
// {"type":"transactionSuccess","sessionId":"<session>","data":{}}
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = DepositConfig::from_env()?;

    let private_key = env::var("DEPOSIT_PRIVATE_KEY")
        .map_err(|_| hl_deposit::Error::Config("DEPOSIT_PRIVATE_KEY is not set".to_string()))?;
    let wallet = EthersWallet::new(&config.rpc_url, &private_key, config.chain)?;
    let tokens = wallet.provider();

    let (modal, mut events) = FundKitModal::new(config.fund_kit_config()?);
    let handle = modal.handle();
    let mut controller =
        DepositController::new(wallet, tokens, modal, config.controller_settings());

    if let Some(amount) = env::args().nth(1) {
        controller.set_amount(&amount);
    }
    if !controller.can_submit() {
        error!("Cannot submit a deposit of {:?}", controller.amount());
        return Ok(());
    }

    match controller.submit().await? {
        Submission::Permit(payload) => info!("Permit calldata {}", payload.calldata_hex()),
        Submission::DirectTransfer { depositor, value } => {
            info!("Aggregator will deliver {value} to {depositor:?}")
        }
    }
    if let Some(session) = controller.session() {
        println!("Session: {session}");
    }

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Err(e) = handle.emit_json(&line) {
                error!("Bad event: {e}");
            }
        }
    });

    match controller.await_aggregator(&mut events).await {
        Ok(Some(tx_hash)) => info!("Deposited with transfer {tx_hash:?}"),
        Ok(None) => info!("Deposit executed by the aggregator"),
        Err(e) => error!("Deposit did not complete: {e}"),
    }
    info!("Final state: {}", controller.state());

    Ok(())
}
