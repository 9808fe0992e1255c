use std::env;
use std::str::FromStr;

use ethers::signers::{LocalWallet, Signer};
use ethers::types::U256;
use hl_deposit::amount::{parse_usdc, sanitize_amount};
use hl_deposit::prelude::Result;
use hl_deposit::{DepositPayload, Permit, SplitSignature, SupportedChainId};
use log::info;

// Builds and signs a permit deposit offline and prints the bridge calldata.
// Usage: permit_calldata_example [amount] [nonce]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    // Key was randomly generated for testing and shouldn't be used with any real funds
    let key = env::var("DEPOSIT_PRIVATE_KEY").unwrap_or_else(|_| {
        "e908f86dbb4d55ac876378565aafeabc187f6690f046459397b17d9b9a19688e".to_string()
    });
    let wallet = LocalWallet::from_str(&key)
        .map_err(|e| hl_deposit::Error::PrivateKeyParse(e.to_string()))?;

    let mut args = env::args().skip(1);
    let amount = sanitize_amount(&args.next().unwrap_or_else(|| "20".to_string()));
    let nonce = args
        .next()
        .map(|raw| U256::from_dec_str(&raw))
        .transpose()
        .map_err(|e| hl_deposit::Error::InvalidAmount(e.to_string()))?
        .unwrap_or_default();

    let permit = Permit::for_bridge(
        wallet.address(),
        parse_usdc(&amount)?,
        nonce,
        Permit::deadline_from_now(),
        SupportedChainId::Arbitrum,
    )?;
    info!("Signing permit for {:?}", permit.owner);

    let signature = wallet
        .sign_typed_data(&permit)
        .await
        .map_err(|e| hl_deposit::Error::SignatureFailure(e.to_string()))?;
    let payload = DepositPayload::from_signed_permit(&permit, SplitSignature::try_from(signature)?)?;

    println!("Owner:         {:?}", permit.owner);
    println!("Bridge:        {:?}", payload.bridge);
    println!("Value:         {} ({amount} USDC)", payload.value);
    println!("Nonce:         {}", payload.nonce);
    println!("Deadline:      {}", payload.deadline);
    println!("Permit digest: {:?}", payload.permit_digest);
    println!("r:             {}", payload.signature.r_hex());
    println!("s:             {}", payload.signature.s_hex());
    println!("v:             {}", payload.signature.v);
    println!("Calldata:      {}", payload.calldata_hex());

    Ok(())
}
