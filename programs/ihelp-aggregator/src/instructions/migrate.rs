// =============================================================================
// Migrate Instruction
// =============================================================================
// A charity imports its staged legacy ledger one page at a time.
//
// Flow:
// 1. Plan the page at `start_index` (must equal the ledger's cursor)
// 2. Charity moves the page principal (plus, on the first page, the charity
//    share of its legacy unclaimed interest) into the token's vault, and the
//    legacy dev/stake shares to the fee sinks
// 3. Contributor positions are credited with checkpointed rebalances
// 4. The page principal is supplied to the lending market
//
// Remaining accounts, one pair per page entry with a non-zero balance, in
// ledger order: [ContributorPosition (w), ContributorRewards (w)]
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::connector::CpiConnector;
use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::CharityMigrated;
use crate::logic::{self, MigrationTarget};
use crate::state::{
    Aggregator, CharityPosition, ContributorPosition, ContributorRewards, LegacyLedger,
    LenderToken,
};

/// Accounts required for the migrate instruction
#[derive(Accounts)]
pub struct Migrate<'info> {
    #[account(mut)]
    pub charity: Signer<'info>,

    #[account(
        mut,
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump,
        constraint = !aggregator.is_paused @ AggregatorError::AggregatorPaused
    )]
    pub aggregator: Box<Account<'info, Aggregator>>,

    #[account(
        mut,
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Box<Account<'info, LenderToken>>,

    #[account(
        mut,
        seeds = [
            LEGACY_LEDGER_SEED,
            charity.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump = legacy_ledger.bump
    )]
    pub legacy_ledger: Box<Account<'info, LegacyLedger>>,

    #[account(
        init_if_needed,
        payer = charity,
        space = 8 + CharityPosition::INIT_SPACE,
        seeds = [
            CHARITY_POSITION_SEED,
            charity.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump
    )]
    pub charity_position: Box<Account<'info, CharityPosition>>,

    /// Charity's underlying account holding the legacy funds
    #[account(
        mut,
        constraint = charity_underlying_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint,
        constraint = charity_underlying_account.owner == charity.key() @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub charity_underlying_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = dev_fee_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint,
        constraint = dev_fee_account.owner == aggregator.dev_fee_owner @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub dev_fee_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        constraint = stake_fee_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint,
        constraint = stake_fee_account.owner == aggregator.stake_fee_owner @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub stake_fee_account: Box<Account<'info, TokenAccount>>,

    /// CHECK: must match lender_token.connector_program
    pub connector_program: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_position
    #[account(mut)]
    pub connector_position: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_reserve
    #[account(mut)]
    pub connector_reserve: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

impl<'info> Migrate<'info> {
    fn transfer_from_charity(&self, to: &Account<'info, TokenAccount>, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        token::transfer(
            CpiContext::new(
                self.token_program.to_account_info(),
                Transfer {
                    from: self.charity_underlying_account.to_account_info(),
                    to: to.to_account_info(),
                    authority: self.charity.to_account_info(),
                },
            ),
            amount,
        )
    }
}

/// Handler for the migrate instruction
///
/// # Arguments
/// * `start_index` - First ledger entry of the page; must equal migrated_count
/// * `batch_size` - Entries to import (1..=MAX_MIGRATION_BATCH)
pub fn handler_migrate<'info>(
    ctx: Context<'_, '_, 'info, 'info, Migrate<'info>>,
    start_index: u32,
    batch_size: u32,
) -> Result<()> {
    // =========================================================================
    // Plan
    // =========================================================================

    let plan = logic::plan_page(
        &ctx.accounts.aggregator,
        &ctx.accounts.legacy_ledger,
        start_index,
        batch_size,
    )?;

    let funded = plan.funded_entries(&ctx.accounts.legacy_ledger);
    require!(
        ctx.remaining_accounts.len() == funded * 2,
        AggregatorError::MigrationAccountMismatch
    );

    msg!(
        "Migrating entries {}..{} ({} funded), principal {}",
        plan.start,
        plan.end,
        funded,
        plan.principal
    );

    // =========================================================================
    // Custody: Charity -> Vault / Fee Sinks
    // =========================================================================

    let vault_inflow = plan.vault_inflow()?;
    let fees = match plan.interest {
        Some(split) => split
            .dev
            .checked_add(split.stake)
            .ok_or(AggregatorError::MathOverflow)?,
        None => 0,
    };
    let required = vault_inflow
        .checked_add(fees)
        .ok_or(AggregatorError::MathOverflow)?;
    require!(
        ctx.accounts.charity_underlying_account.amount >= required,
        AggregatorError::InsufficientFunds
    );

    ctx.accounts
        .transfer_from_charity(&ctx.accounts.underlying_vault, vault_inflow)?;
    if let Some(split) = plan.interest {
        ctx.accounts
            .transfer_from_charity(&ctx.accounts.dev_fee_account, split.dev)?;
        ctx.accounts
            .transfer_from_charity(&ctx.accounts.stake_fee_account, split.stake)?;
    }

    // =========================================================================
    // Load Contributor Accounts
    // =========================================================================

    let mut positions: Vec<Account<'info, ContributorPosition>> = Vec::with_capacity(funded);
    let mut rewards: Vec<Account<'info, ContributorRewards>> = Vec::with_capacity(funded);
    for pair in ctx.remaining_accounts.chunks(2) {
        require!(
            pair[0].is_writable && pair[1].is_writable,
            AggregatorError::MigrationAccountMismatch
        );
        positions.push(Account::try_from(&pair[0])?);
        rewards.push(Account::try_from(&pair[1])?);
    }

    // =========================================================================
    // Ledger Update + Supply
    // =========================================================================

    let connector = CpiConnector::for_lender_token(
        &ctx.accounts.lender_token,
        &ctx.accounts.underlying_vault,
        &ctx.accounts.connector_program,
        &ctx.accounts.connector_position,
        &ctx.accounts.connector_reserve,
        &ctx.accounts.token_program,
    )?;

    let charity_key = ctx.accounts.charity.key();
    let accounts = &mut *ctx.accounts;
    let lender_mint = accounts.lender_token.lender_mint;
    accounts
        .charity_position
        .open(charity_key, lender_mint, ctx.bumps.charity_position);

    let page = {
        let mut targets: Vec<MigrationTarget> = positions
            .iter_mut()
            .zip(rewards.iter_mut())
            .map(|(position, rewards)| MigrationTarget {
                position: &mut **position,
                rewards: &mut **rewards,
            })
            .collect();

        logic::migrate_page(
            &mut accounts.aggregator,
            &mut accounts.lender_token,
            &mut accounts.charity_position,
            &mut accounts.legacy_ledger,
            &mut targets,
            &connector,
            &plan,
        )?
    };

    // Remaining accounts are not persisted by Anchor
    for position in &positions {
        position.exit(&crate::ID)?;
    }
    for reward in &rewards {
        reward.exit(&crate::ID)?;
    }

    // =========================================================================
    // Log Results
    // =========================================================================

    let interest_credited = page.interest.map(|split| split.charity).unwrap_or(0);

    msg!("Page migrated: {} entries imported so far", page.migrated_count);
    msg!("Principal supplied: {}", page.principal);
    if let Some(split) = page.interest {
        msg!(
            "Legacy interest folded in: charity {}, dev {}, stake {}",
            split.charity,
            split.dev,
            split.stake
        );
    }
    if page.complete {
        msg!("Legacy ledger fully migrated");
    }

    emit!(CharityMigrated {
        charity: charity_key,
        lender_mint,
        start_index,
        migrated_count: page.migrated_count,
        principal: page.principal,
        interest_credited,
        complete: page.complete,
    });

    Ok(())
}
