use solana_sdk::{
    instruction::Instruction, program_pack::Pack, pubkey::Pubkey, rent::Rent, signature::Keypair,
};
use token_metadata_program::state::Data;
use token_metadata_sdk::{CreateMetadataAccountParams, MetadataClient};
use token_metadata_testing::{assert_confirmed_transaction, SendOptions, TestContext};

pub const NAME: &str = "test";
pub const SYMBOL: &str = "sym";
pub const URI: &str = "uri";
pub const SELLER_FEE_BASIS_POINTS: u16 = 10;

pub fn sample_data() -> Data {
    Data {
        name: NAME.to_string(),
        symbol: SYMBOL.to_string(),
        uri: URI.to_string(),
        seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
        creators: None,
    }
}

pub fn mint_rent() -> u64 {
    Rent::default().minimum_balance(spl_token::state::Mint::LEN)
}

pub fn create_and_init_mint_instructions(
    payer_pk: Pubkey,
    mint_pk: Pubkey,
    mint_authority: Pubkey,
    freeze_authority: Option<Pubkey>,
) -> anyhow::Result<[Instruction; 2]> {
    let client = MetadataClient::new();
    let create_mint_ix = client.create_mint_account_ix(payer_pk, mint_pk, mint_rent());
    let init_mint_ix = client.initialize_mint2_ix(mint_pk, mint_authority, freeze_authority, 0)?;
    Ok([create_mint_ix, init_mint_ix])
}

pub async fn create_and_init_mint(
    ctx: &TestContext,
    payer_kp: &Keypair,
    payer_pk: Pubkey,
    mint_kp: &Keypair,
    mint_pk: Pubkey,
    mint_authority: Pubkey,
    freeze_authority: Option<Pubkey>,
) -> anyhow::Result<()> {
    let [create_mint_ix, init_mint_ix] =
        create_and_init_mint_instructions(payer_pk, mint_pk, mint_authority, freeze_authority)?;
    let handler = ctx.payer_handler(payer_kp);
    let result = handler
        .send_and_confirm_transaction(
            &[create_mint_ix, init_mint_ix],
            &[mint_kp],
            &SendOptions::default(),
        )
        .await;
    assert_confirmed_transaction(&result);
    Ok(())
}

pub fn build_create_metadata_ix(
    payer_pk: Pubkey,
    mint_pk: Pubkey,
    mint_authority: Pubkey,
    update_authority: Option<Pubkey>,
    data: Data,
) -> anyhow::Result<(Instruction, Pubkey)> {
    let client = MetadataClient::new();
    let metadata_pda = client.metadata_pda(&mint_pk);
    let ix = client.create_metadata_account_ix(CreateMetadataAccountParams {
        metadata: metadata_pda,
        mint: mint_pk,
        mint_authority,
        payer: payer_pk,
        update_authority,
        data,
    })?;
    Ok((ix, metadata_pda))
}
