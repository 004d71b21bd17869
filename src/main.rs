//! HolderScan - token whale-holder scanner with on-chain classification
//!
//! Retrieves every holder of a token at or above a balance threshold from
//! the ledger-indexing API, classifies each address on-chain, and writes a
//! consolidated JSON report.

use eyre::Result;
use holderscan::utils::constants::{get_chain_name, APP_NAME, APP_VERSION};
use holderscan::{HolderScanner, ScanConfig};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!("🐋 {} v{} - token holder scanner\n", APP_NAME, APP_VERSION);

    // Configuration errors are fatal before any work starts
    let config = match ScanConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Configuration error: {}", e);
            eprintln!("   Required: HOLDER_API_KEY, TOKEN_ADDRESS,");
            eprintln!("   and ETH_HTTP_URL or ALCHEMY_API_KEY");
            std::process::exit(1);
        }
    };

    let scanner = HolderScanner::new(&config)?;
    let report = scanner.run().await?;

    // The report is written only after both stages completed for all holders
    let path = report.write_json(&config.report_path)?;

    let tally = report.tally();
    println!("\n📊 Scan summary:");
    println!("   Token:            {}", report.token_address);
    println!(
        "   Chain:            {} ({})",
        get_chain_name(report.chain_id),
        report.chain_id
    );
    println!("   Threshold:        {} tokens", report.min_balance);
    println!("   Holders:          {}", report.holder_count);
    println!("   EOA:              {}", tally.eoa);
    println!("   Multisig wallets: {}", tally.multisig);
    println!("   Other contracts:  {}", tally.contract);
    println!("\n✅ Report written to {}", path.display());

    Ok(())
}
