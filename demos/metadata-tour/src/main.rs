use std::time::Duration;

use anyhow::Context;
use solana_sdk::{program_pack::Pack, rent::Rent, signature::Keypair, signer::Signer};
use token_metadata_program::state::{Data, Metadata};
use token_metadata_sdk::{
    CreateTokenWithMetadataParams, MetadataClient, UpdateMetadataAccountParams,
};
use token_metadata_testing::{
    AddressLabels, Ledger, PayerTransactionHandler, SendOptions, SimulatedLedger,
    DEFAULT_AIRDROP_LAMPORTS,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Optional confirmation deadline override
    let timeout = std::env::var("TOUR_TIMEOUT_MS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or_else(|| SendOptions::default().timeout);
    let options = SendOptions {
        timeout,
        ..Default::default()
    };

    let ledger = SimulatedLedger::new();
    let client = MetadataClient::new();
    let mut labels = AddressLabels::new();

    let payer_kp = Keypair::new();
    let payer = payer_kp.pubkey();
    labels.add(payer, "tour:payer");

    let mint_kp = Keypair::new();
    let mint = mint_kp.pubkey();
    labels.add(mint, "tour:mint");

    let metadata_pda = client.metadata_pda(&mint);
    labels.add(metadata_pda, "tour:metadata");

    println!("Metadata program ID: {}", client.program_id);
    println!("Payer: {payer} ({})", labels.display(&payer));
    println!("Mint: {mint} ({})", labels.display(&mint));
    println!("Metadata: {metadata_pda} ({})", labels.display(&metadata_pda));

    ledger
        .request_airdrop(&payer, DEFAULT_AIRDROP_LAMPORTS)
        .await?;
    let payer_account = ledger
        .fetch_account(&payer)
        .await?
        .context("payer account missing after airdrop")?;
    println!("Payer lamports: {}", payer_account.lamports);

    let data = Data {
        name: "Demo Token".to_string(),
        symbol: "DT".to_string(),
        uri: "https://example.com/dt.json".to_string(),
        seller_fee_basis_points: 250,
        creators: None,
    };

    println!("Building instructions: [create_mint_account, initialize_mint2(decimals=0), create_metadata_account]");
    let instructions = client.create_token_with_metadata_ixs(CreateTokenWithMetadataParams {
        payer,
        mint,
        mint_rent: Rent::default().minimum_balance(spl_token::state::Mint::LEN),
        mint_authority: payer,
        freeze_authority: None,
        decimals: 0,
        update_authority: None,
        data: data.clone(),
    })?;

    let handler = PayerTransactionHandler::new(ledger.clone(), payer_kp);

    println!("Submitting transaction...");
    let details = handler
        .send_and_confirm_transaction(&instructions, &[&mint_kp], &options)
        .await?;
    println!("Confirmed signature={}", details.signature);
    println!(
        "slot={} fee={} lamports",
        details.summary.slot, details.summary.fee
    );
    for line in &details.summary.log_messages {
        println!("  {line}");
    }

    // Verify metadata account exists and fields
    let account = ledger
        .fetch_account(&metadata_pda)
        .await?
        .context("metadata account not found")?;
    let metadata = Metadata::from_account_data(&account.data)?;

    anyhow::ensure!(
        metadata.mint == mint,
        "mint mismatch; expected={} actual={}",
        mint,
        metadata.mint
    );
    anyhow::ensure!(
        metadata.data.name == data.name,
        "name mismatch; expected={} actual={}",
        data.name,
        metadata.data.name
    );
    anyhow::ensure!(
        metadata.data.symbol == data.symbol,
        "symbol mismatch; expected={} actual={}",
        data.symbol,
        metadata.data.symbol
    );
    anyhow::ensure!(
        metadata.data.uri == data.uri,
        "uri mismatch; expected={} actual={}",
        data.uri,
        metadata.data.uri
    );
    println!("Metadata: {:?}", metadata);

    // Rotate the uri through an update and verify once more
    let updated = Data {
        uri: "https://example.com/dt-v2.json".to_string(),
        ..data
    };
    let update_ix = client.update_metadata_account_ix(UpdateMetadataAccountParams {
        metadata: metadata_pda,
        update_authority: payer,
        new_data: Some(updated.clone()),
        new_update_authority: None,
        primary_sale_happened: None,
    })?;

    println!("Submitting update...");
    let details = handler
        .send_and_confirm_transaction(&[update_ix], &[], &options)
        .await?;
    println!("Confirmed signature={}", details.signature);

    let account = ledger
        .fetch_account(&metadata_pda)
        .await?
        .context("metadata account not found")?;
    let metadata = Metadata::from_account_data(&account.data)?;
    anyhow::ensure!(
        metadata.data.uri == updated.uri,
        "uri mismatch after update; expected={} actual={}",
        updated.uri,
        metadata.data.uri
    );
    println!("Updated metadata: {:?}", metadata);
    Ok(())
}
