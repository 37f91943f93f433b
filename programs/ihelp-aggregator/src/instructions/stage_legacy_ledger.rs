// =============================================================================
// Legacy Ledger Staging
// =============================================================================
// The admin loads a charity's pre-aggregator ledger for one lender token:
// 1. stage_legacy_ledger records the charity's lifetime interest figures
// 2. append_legacy_entries adds contributor balances in chunks
//
// Entries are frozen once the charity migrates its first page.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::LegacyLedgerStaged;
use crate::state::{Aggregator, LegacyEntry, LegacyLedger, LenderToken};

/// Accounts required for stage_legacy_ledger
#[derive(Accounts)]
pub struct StageLegacyLedger<'info> {
    #[account(
        mut,
        constraint = admin.key() == aggregator.admin @ AggregatorError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    /// CHECK: the charity's signing key, only stored and used as a seed
    pub charity: UncheckedAccount<'info>,

    #[account(
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        init,
        payer = admin,
        space = 8 + LegacyLedger::INIT_SPACE,
        seeds = [
            LEGACY_LEDGER_SEED,
            charity.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump
    )]
    pub legacy_ledger: Box<Account<'info, LegacyLedger>>,

    pub system_program: Program<'info, System>,
}

pub fn handler_stage_legacy_ledger(
    ctx: Context<StageLegacyLedger>,
    total_interest_earned: u64,
    claimed_interest: u64,
) -> Result<()> {
    require!(
        claimed_interest <= total_interest_earned,
        AggregatorError::InvalidLegacyInterest
    );

    let charity = ctx.accounts.charity.key();
    let lender_mint = ctx.accounts.lender_token.lender_mint;
    let ledger = &mut ctx.accounts.legacy_ledger;

    ledger.charity = charity;
    ledger.lender_mint = lender_mint;
    ledger.total_interest_earned = total_interest_earned;
    ledger.claimed_interest = claimed_interest;
    ledger.total_balance = 0;
    ledger.entries = Vec::new();
    ledger.migrated_count = 0;
    ledger.interest_migrated = false;
    ledger.bump = ctx.bumps.legacy_ledger;

    msg!("Legacy ledger staged for charity {} on {}", charity, lender_mint);
    msg!(
        "Interest earned: {}, claimed: {}",
        total_interest_earned,
        claimed_interest
    );

    emit!(LegacyLedgerStaged {
        charity,
        lender_mint,
        total_interest_earned,
        claimed_interest,
    });

    Ok(())
}

/// Accounts required for append_legacy_entries
#[derive(Accounts)]
pub struct AppendLegacyEntries<'info> {
    #[account(
        constraint = admin.key() == aggregator.admin @ AggregatorError::Unauthorized
    )]
    pub admin: Signer<'info>,

    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    #[account(
        mut,
        seeds = [
            LEGACY_LEDGER_SEED,
            legacy_ledger.charity.as_ref(),
            legacy_ledger.lender_mint.as_ref()
        ],
        bump = legacy_ledger.bump
    )]
    pub legacy_ledger: Box<Account<'info, LegacyLedger>>,
}

pub fn handler_append_legacy_entries(
    ctx: Context<AppendLegacyEntries>,
    entries: Vec<LegacyEntry>,
) -> Result<()> {
    let ledger = &mut ctx.accounts.legacy_ledger;
    ledger.append(&entries)?;

    msg!(
        "Appended {} legacy entries ({} total, balance {})",
        entries.len(),
        ledger.entries.len(),
        ledger.total_balance
    );

    Ok(())
}
