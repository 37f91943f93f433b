// =============================================================================
// Lender Token Registry
// =============================================================================
// Registers a donation currency: the lender token, its underlying asset and
// the connector (adapter program + position + reserve) that serves it.
// Creates the LenderToken account and its underlying vault.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::{LenderTokenRegistered, LenderTokenSupportUpdated};
use crate::state::{Aggregator, LenderToken};

/// Accounts required for register_lender_token
#[derive(Accounts)]
pub struct RegisterLenderToken<'info> {
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

    /// Identity of the lender token (e.g. the market's receipt token)
    /// CHECK: only used as a key and PDA seed
    pub lender_mint: UncheckedAccount<'info>,

    pub underlying_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        space = 8 + LenderToken::INIT_SPACE,
        seeds = [LENDER_TOKEN_SEED, lender_mint.key().as_ref()],
        bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        init,
        payer = admin,
        token::mint = underlying_mint,
        token::authority = lender_token,
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump
    )]
    pub underlying_vault: Account<'info, TokenAccount>,

    /// CHECK: adapter program implementing the connector ABI
    #[account(
        constraint = connector_program.executable @ AggregatorError::InvalidConnector
    )]
    pub connector_program: UncheckedAccount<'info>,

    /// CHECK: adapter-owned position of the lender token PDA
    #[account(
        constraint = *connector_position.owner == connector_program.key() @ AggregatorError::InvalidConnectorPosition
    )]
    pub connector_position: UncheckedAccount<'info>,

    /// CHECK: adapter liquidity account, validated by the adapter on every call
    pub connector_reserve: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_register_lender_token(ctx: Context<RegisterLenderToken>) -> Result<()> {
    let clock = Clock::get()?;
    let underlying_vault = ctx.accounts.underlying_vault.key();
    let lender_token = &mut ctx.accounts.lender_token;

    lender_token.lender_mint = ctx.accounts.lender_mint.key();
    lender_token.underlying_mint = ctx.accounts.underlying_mint.key();
    lender_token.underlying_vault = underlying_vault;
    lender_token.connector_program = ctx.accounts.connector_program.key();
    lender_token.connector_position = ctx.accounts.connector_position.key();
    lender_token.connector_reserve = ctx.accounts.connector_reserve.key();
    lender_token.is_supported = true;

    lender_token.total_deposited = 0;
    lender_token.reward_per_unit = 0;
    lender_token.total_redeemed = 0;
    lender_token.total_interest_claimed = 0;
    lender_token.unattributed_interest = 0;
    lender_token.total_dev_fees = 0;
    lender_token.total_stake_fees = 0;
    lender_token.last_redeem_time = 0;

    lender_token.bump = ctx.bumps.lender_token;
    lender_token.vault_bump = ctx.bumps.underlying_vault;

    msg!("Lender token registered: {}", lender_token.lender_mint);
    msg!("Underlying: {}", lender_token.underlying_mint);
    msg!("Connector: {}", lender_token.connector_program);

    emit!(LenderTokenRegistered {
        lender_mint: lender_token.lender_mint,
        underlying_mint: lender_token.underlying_mint,
        connector_program: lender_token.connector_program,
        timestamp: clock.unix_timestamp,
    });

    Ok(())
}

// =============================================================================
// Token Support Toggle
// =============================================================================

/// Accounts required for set_token_support
#[derive(Accounts)]
pub struct SetTokenSupport<'info> {
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
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,
}

/// Unsupported tokens reject deposits; withdrawals, redemption and claims
/// keep working so nothing already deposited gets stuck
pub fn handler_set_token_support(ctx: Context<SetTokenSupport>, is_supported: bool) -> Result<()> {
    let lender_token = &mut ctx.accounts.lender_token;
    lender_token.is_supported = is_supported;

    msg!(
        "Lender token {} is now {}",
        lender_token.lender_mint,
        if is_supported { "supported" } else { "unsupported" }
    );

    emit!(LenderTokenSupportUpdated {
        lender_mint: lender_token.lender_mint,
        is_supported,
    });

    Ok(())
}
