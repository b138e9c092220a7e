use eyre::{eyre, Result, WrapErr};
use tracing::info;
use tracing_subscriber::EnvFilter;
use transfer_verifier::{
    config::Config,
    context::{BlockContext, FixedBlock, InMemoryLedger, SystemClock},
    types::SignedTransferRequest,
    Verifier,
};

const DEFAULT_CONFIG_PATH: &str = "transfer-verifier";

fn main() -> Result<()> {
    let config = Config::load(DEFAULT_CONFIG_PATH).wrap_err("failed to load configuration")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| eyre!("usage: transfer-verifier <signed-request.json> [current-block]"))?;
    let clock: Box<dyn BlockContext> = match args.next() {
        Some(block) => Box::new(FixedBlock(
            block.parse().wrap_err("current block must be an unsigned integer")?,
        )),
        None => Box::new(SystemClock::new()),
    };

    let content = std::fs::read_to_string(&path).wrap_err_with(|| format!("failed to read {path}"))?;
    let signed: SignedTransferRequest =
        serde_json::from_str(&content).wrap_err("malformed signed request")?;

    let ledger = InMemoryLedger::new(config.treasury.initial_balance);
    let verifier = Verifier::from_config(&config, ledger, clock)?;
    info!(environment = %config.environment, "verifier ready");
    if config.is_development() {
        info!(
            domain = ?verifier.domain(),
            separator = %verifier.domain_separator(),
            "verifier domain"
        );
    }

    let receipt = verifier.verify_and_transfer(
        &signed.signature,
        signed.signer,
        signed.expire_at,
        signed.transfer_amount,
    )?;

    // One line per receipt in production, for log shippers.
    let rendered = if config.is_production() {
        serde_json::to_string(&receipt)?
    } else {
        serde_json::to_string_pretty(&receipt)?
    };
    println!("{rendered}");
    Ok(())
}
