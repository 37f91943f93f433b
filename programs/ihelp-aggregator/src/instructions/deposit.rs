// =============================================================================
// Deposit Instruction
// =============================================================================
// A recognized charity deposits underlying on behalf of a contributor.
//
// Flow:
// 1. Underlying is transferred from the charity into the token's vault
// 2. Contributor and charity interest views are checkpointed, then credited
// 3. The contributor's emission weight grows by the same amount
// 4. The vault supplies the amount to the lending market via the connector
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};

use crate::connector::CpiConnector;
use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::Deposited;
use crate::logic::{self, LedgerAccounts};
use crate::state::{
    Aggregator, CharityPosition, CharityRecord, ContributorPosition, ContributorRewards,
    LenderToken,
};

/// Accounts required for the deposit instruction
#[derive(Accounts)]
pub struct Deposit<'info> {
    // =========================================================================
    // Signers
    // =========================================================================

    /// The charity depositing on the contributor's behalf
    #[account(mut)]
    pub charity: Signer<'info>,

    /// CHECK: contributor identity, only used as a seed
    pub contributor: UncheckedAccount<'info>,

    // =========================================================================
    // Ledger Accounts
    // =========================================================================

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

    /// CHECK: host registry entry, decoded by CharityRecord::from_registry.
    /// Absent for a charity that was never registered.
    #[account(
        seeds = [CHARITY_SEED, charity.key().as_ref()],
        bump
    )]
    pub charity_record: UncheckedAccount<'info>,

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

    #[account(
        init_if_needed,
        payer = charity,
        space = 8 + ContributorPosition::INIT_SPACE,
        seeds = [
            CONTRIBUTOR_POSITION_SEED,
            contributor.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump
    )]
    pub contributor_position: Box<Account<'info, ContributorPosition>>,

    #[account(
        init_if_needed,
        payer = charity,
        space = 8 + ContributorRewards::INIT_SPACE,
        seeds = [CONTRIBUTOR_REWARDS_SEED, contributor.key().as_ref()],
        bump
    )]
    pub contributor_rewards: Box<Account<'info, ContributorRewards>>,

    // =========================================================================
    // Token Accounts
    // =========================================================================

    #[account(
        constraint = underlying_mint.key() == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint
    )]
    pub underlying_mint: Box<Account<'info, Mint>>,

    /// Charity's underlying account (source of funds)
    #[account(
        mut,
        constraint = charity_underlying_account.mint == underlying_mint.key() @ AggregatorError::InvalidUnderlyingMint,
        constraint = charity_underlying_account.owner == charity.key() @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub charity_underlying_account: Box<Account<'info, TokenAccount>>,

    #[account(
        mut,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Box<Account<'info, TokenAccount>>,

    // =========================================================================
    // Connector
    // =========================================================================

    /// CHECK: must match lender_token.connector_program
    pub connector_program: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_position
    #[account(mut)]
    pub connector_position: UncheckedAccount<'info>,

    /// CHECK: must match lender_token.connector_reserve
    #[account(mut)]
    pub connector_reserve: UncheckedAccount<'info>,

    // =========================================================================
    // Programs
    // =========================================================================

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

/// Handler for the deposit instruction
///
/// # Arguments
/// * `amount` - Underlying to deposit (in base units)
pub fn handler_deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
    require!(amount > 0, AggregatorError::ZeroAmount);
    require!(
        ctx.accounts.charity_underlying_account.amount >= amount,
        AggregatorError::InsufficientFunds
    );

    let charity_record = {
        let info = ctx.accounts.charity_record.to_account_info();
        let data = info.try_borrow_data()?;
        CharityRecord::from_registry(info.owner, &data)?
    };

    // =========================================================================
    // Transfer Underlying: Charity -> Vault
    // =========================================================================

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.charity_underlying_account.to_account_info(),
                to: ctx.accounts.underlying_vault.to_account_info(),
                authority: ctx.accounts.charity.to_account_info(),
            },
        ),
        amount,
    )?;

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
    let contributor_key = ctx.accounts.contributor.key();
    let lender_mint = ctx.accounts.lender_token.lender_mint;

    let accounts = &mut *ctx.accounts;
    accounts
        .charity_position
        .open(charity_key, lender_mint, ctx.bumps.charity_position);
    accounts
        .contributor_position
        .open(contributor_key, lender_mint, ctx.bumps.contributor_position);
    accounts
        .contributor_rewards
        .open(contributor_key, ctx.bumps.contributor_rewards);

    logic::deposit(
        LedgerAccounts {
            aggregator: &mut accounts.aggregator,
            lender_token: &mut accounts.lender_token,
            charity_position: &mut accounts.charity_position,
            contributor_position: &mut accounts.contributor_position,
            contributor_rewards: &mut accounts.contributor_rewards,
        },
        &charity_record,
        &connector,
        amount,
    )?;

    // =========================================================================
    // Log Results
    // =========================================================================

    msg!("Deposit successful!");
    msg!("Amount deposited: {}", amount);
    msg!("Contributor balance: {}", accounts.contributor_position.balance);
    msg!("Charity balance: {}", accounts.charity_position.balance);
    msg!("Token total deposited: {}", accounts.lender_token.total_deposited);

    emit!(Deposited {
        lender_mint,
        charity: charity_key,
        contributor: contributor_key,
        amount,
        contributor_balance: accounts.contributor_position.balance,
        charity_balance: accounts.charity_position.balance,
        total_deposited: accounts.lender_token.total_deposited,
    });

    Ok(())
}
