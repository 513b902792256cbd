use std::time::{Duration, Instant};

use serial_test::serial;
use solana_sdk::{
    commitment_config::CommitmentLevel, native_token::LAMPORTS_PER_SOL, pubkey::Pubkey,
    system_instruction,
};
use token_metadata_testing::{
    Ledger, SendOptions, TestRunner, TransactionHandlerError, LAMPORTS_PER_SIGNATURE,
};
use token_metadata_tests::{build_create_metadata_ix, sample_data};

// A payer with no balance is rejected at submission, before inclusion
#[tokio::test]
#[serial]
async fn unfunded_payer_is_rejected_at_submission() {
    TestRunner::run(|ctx| async move {
        let (payer_kp, payer_pk) = ctx.generate_new_keypair();
        let recipient = Pubkey::new_unique();

        let transfer_ix = system_instruction::transfer(&payer_pk, &recipient, 1_000);
        let handler = ctx.payer_handler(&payer_kp);
        let err = handler
            .send_and_confirm_transaction(&[transfer_ix], &[], &SendOptions::default())
            .await
            .unwrap_err();
        match &err {
            TransactionHandlerError::SubmissionRejected { reason } => {
                assert!(reason.contains("fee payer"), "reason: {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_retryable());
        assert!(err.log_messages().is_none());
        Ok(())
    })
    .await
}

// Held confirmations surface as a timeout instead of hanging the caller
#[tokio::test]
#[serial]
async fn held_confirmations_surface_as_timeouts() {
    TestRunner::run(|ctx| async move {
        let (payer_kp, payer_pk) = ctx.generate_new_keypair();
        ctx.fund_keypair_with_faucet(&payer_kp).await?;
        let recipient = Pubkey::new_unique();

        ctx.ledger().hold_confirmations(true).await;

        let options = SendOptions {
            timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let transfer_ix = system_instruction::transfer(&payer_pk, &recipient, LAMPORTS_PER_SOL);
        let handler = ctx.payer_handler(&payer_kp);

        let started = Instant::now();
        let err = handler
            .send_and_confirm_transaction(&[transfer_ix], &[], &options)
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(err.is_retryable());

        let signature = match &err {
            TransactionHandlerError::ConfirmationTimeout { signature, timeout } => {
                assert_eq!(*timeout, Duration::from_millis(200));
                *signature
            }
            other => panic!("unexpected error: {other}"),
        };

        // The transfer still executed; the timeout only means the caller gave
        // up waiting. Releasing the hold makes it visible.
        ctx.ledger().hold_confirmations(false).await;
        let confirmed = ctx
            .ledger()
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await?
            .ok_or_else(|| anyhow::anyhow!("held transaction never became visible"))?;
        assert_eq!(confirmed.err, None);

        let recipient_acct = ctx.read_account_info(recipient).await?;
        assert_eq!(recipient_acct.lamports, LAMPORTS_PER_SOL);
        Ok(())
    })
    .await
}

// Resubmitting the same instructions picks up a fresh blockhash and a new signature
#[tokio::test]
#[serial]
async fn resubmission_uses_fresh_blockhashes() {
    TestRunner::run(|ctx| async move {
        let (payer_kp, payer_pk) = ctx.generate_new_keypair();
        ctx.fund_keypair_with_faucet(&payer_kp).await?;
        let recipient = Pubkey::new_unique();

        let handler = ctx.payer_handler(&payer_kp);
        let transfer_ix = system_instruction::transfer(&payer_pk, &recipient, 1_000);

        let first = handler
            .send_and_confirm_transaction(
                &[transfer_ix.clone()],
                &[],
                &SendOptions::default(),
            )
            .await?;
        let second = handler
            .send_and_confirm_transaction(&[transfer_ix], &[], &SendOptions::default())
            .await?;

        assert_ne!(first.signature, second.signature);
        let recipient_acct = ctx.read_account_info(recipient).await?;
        assert_eq!(recipient_acct.lamports, 2_000);
        Ok(())
    })
    .await
}

// Execution failures keep the fee, the summary, and the full log trail
#[tokio::test]
#[serial]
async fn execution_failures_carry_summary_and_logs() {
    TestRunner::run(|ctx| async move {
        let (payer_kp, payer_pk) = ctx.generate_new_keypair();
        ctx.fund_keypair_with_faucet(&payer_kp).await?;

        // Metadata create against a mint that was never created
        let (_mint_kp, mint_pk) = ctx.generate_new_keypair();
        let (metadata_ix, _metadata_pda) =
            build_create_metadata_ix(payer_pk, mint_pk, payer_pk, None, sample_data())?;

        let handler = ctx.payer_handler(&payer_kp);
        let err = handler
            .send_and_confirm_transaction(&[metadata_ix], &[], &SendOptions::default())
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        match &err {
            TransactionHandlerError::ExecutionFailed { error, summary } => {
                assert!(error.contains("custom program error"), "error: {error}");
                assert_eq!(summary.fee, LAMPORTS_PER_SIGNATURE);
                assert!(summary.log_messages.iter().any(|l| l.contains("failed")));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.log_messages().is_some());
        Ok(())
    })
    .await
}

// skip_preflight suppresses the balance check, so the transaction is dropped
// instead of rejected and the caller sees a timeout
#[tokio::test]
#[serial]
async fn skip_preflight_drops_unpayable_transactions() {
    TestRunner::run(|ctx| async move {
        let (payer_kp, payer_pk) = ctx.generate_new_keypair();
        let recipient = Pubkey::new_unique();

        let options = SendOptions {
            skip_preflight: true,
            timeout: Duration::from_millis(200),
            ..Default::default()
        };
        let transfer_ix = system_instruction::transfer(&payer_pk, &recipient, 1_000);
        let handler = ctx.payer_handler(&payer_kp);
        let err = handler
            .send_and_confirm_transaction(&[transfer_ix], &[], &options)
            .await
            .unwrap_err();

        let signature = match &err {
            TransactionHandlerError::ConfirmationTimeout { signature, .. } => *signature,
            other => panic!("unexpected error: {other}"),
        };

        // Dropped for real: the ledger has no record of it
        let confirmed = ctx
            .ledger()
            .confirm_transaction(&signature, CommitmentLevel::Confirmed)
            .await?;
        assert!(confirmed.is_none());
        Ok(())
    })
    .await
}
