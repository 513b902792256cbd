use anyhow::Context;
use serde_json::json;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::rent::Rent;
use solana_sdk::system_instruction;
use token_metadata_program::{
    find_metadata_pda, id as program_id_fn,
    instruction::{CreateMetadataAccountArgs, MetadataInstruction, UpdateMetadataAccountArgs},
    state::{Data, Key, Metadata},
};

fn main() -> anyhow::Result<()> {
    // Deterministic example inputs
    let data = Data {
        name: "Name".to_string(),
        symbol: "SYM".to_string(),
        uri: "https://u".to_string(),
        seller_fee_basis_points: 500,
        creators: None,
    };

    let create = MetadataInstruction::CreateMetadataAccount(CreateMetadataAccountArgs {
        data: data.clone(),
        is_mutable: true,
    });
    let new_auth = Pubkey::new_from_array([7u8; 32]);
    let update = MetadataInstruction::UpdateMetadataAccount(UpdateMetadataAccountArgs {
        data: Some(Data {
            name: "New".to_string(),
            ..data.clone()
        }),
        update_authority: None,
        primary_sale_happened: None,
    });
    let rotate = MetadataInstruction::UpdateMetadataAccount(UpdateMetadataAccountArgs {
        data: None,
        update_authority: Some(new_auth),
        primary_sale_happened: Some(true),
    });

    let program_id = program_id_fn();
    // Two sample mints for PDA fixtures
    let mint_a = Pubkey::new_from_array([2u8; 32]);
    let mint_b = Pubkey::new_from_array([3u8; 32]);
    let (md_a, bump_a) = find_metadata_pda(&mint_a);
    let (md_b, bump_b) = find_metadata_pda(&mint_b);

    // Upstream fixtures: system + token program
    let token_program_id = spl_token::id();
    let payer = Pubkey::new_from_array([1u8; 32]);
    let mint = mint_a;
    let sys_create_mint = system_instruction::create_account(
        &payer,
        &mint,
        Rent::default().minimum_balance(spl_token::state::Mint::LEN),
        spl_token::state::Mint::LEN as u64,
        &token_program_id,
    );
    let init_mint2 =
        spl_token::instruction::initialize_mint2(&token_program_id, &mint, &payer, None, 0)?;

    // Decoded-state fixture: a well-formed metadata account image
    let account = Metadata {
        key: Key::MetadataV1,
        update_authority: payer,
        mint: mint_a,
        data,
        primary_sale_happened: false,
        is_mutable: true,
    };

    let fixtures = json!({
        "CreateMetadataAccount": hex::encode(create.pack()),
        "UpdateMetadataAccount": hex::encode(update.pack()),
        "UpdateMetadataAuthority": hex::encode(rotate.pack()),
        "MetadataAccountV1": hex::encode(borsh::to_vec(&account)?),
        "ProgramId": hex::encode(program_id),
        "TokenProgramId": hex::encode(token_program_id),
        "PdaSamples": [
            {
                "mint": hex::encode(mint_a),
                "metadata": hex::encode(md_a),
                "bump": bump_a
            },
            {
                "mint": hex::encode(mint_b),
                "metadata": hex::encode(md_b),
                "bump": bump_b
            }
        ],
        "SystemCreateAccountMint": hex::encode(sys_create_mint.data),
        "TokenInitializeMint2": hex::encode(init_mint2.data)
    });

    let out_dir = std::env::var("OUT_FIXTURES_DIR").unwrap_or_else(|_| {
        // default to project-relative path used by tests
        "target/fixtures".to_string()
    });
    std::fs::create_dir_all(&out_dir).context("create fixtures dir")?;
    let path = format!("{}/metadata_fixtures.json", out_dir);
    std::fs::write(&path, serde_json::to_vec_pretty(&fixtures)?)
        .with_context(|| format!("write {}", path))?;

    println!("wrote fixtures to {}", path);
    Ok(())
}
