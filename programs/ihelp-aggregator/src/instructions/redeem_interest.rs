// =============================================================================
// Redeem Interest Instruction
// =============================================================================
// Permissionless crank that realises a lender token's accrued yield.
//
// Flow:
// 1. Read balance_of_underlying from the connector
// 2. delta = balance - total_deposited (nothing happens when delta <= 0)
// 3. Split delta: dev / stake by BPS, charity share moves reward_per_unit
// 4. Redeem delta into the vault, pay dev and stake shares to their sinks
//
// The charity share stays in the vault until charities claim it.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{Token, TokenAccount};

use crate::connector::CpiConnector;
use crate::constants::*;
use crate::error::AggregatorError;
use crate::events::{InterestRedeemed, NegativeYieldObserved};
use crate::instructions::pay_from_underlying_vault;
use crate::logic::{self, InterestOutcome};
use crate::state::{Aggregator, LenderToken};

/// Accounts required for redeem_interest
#[derive(Accounts)]
pub struct RedeemInterest<'info> {
    /// Anyone may crank
    pub caller: Signer<'info>,

    #[account(
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
        seeds = [UNDERLYING_VAULT_SEED, lender_token.key().as_ref()],
        bump = lender_token.vault_bump
    )]
    pub underlying_vault: Box<Account<'info, TokenAccount>>,

    /// Developer fee sink
    #[account(
        mut,
        constraint = dev_fee_account.mint == lender_token.underlying_mint @ AggregatorError::InvalidUnderlyingMint,
        constraint = dev_fee_account.owner == aggregator.dev_fee_owner @ AggregatorError::InvalidTokenAccountOwner
    )]
    pub dev_fee_account: Box<Account<'info, TokenAccount>>,

    /// Stakeholder fee sink
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

    pub token_program: Program<'info, Token>,
}

pub fn handler_redeem_interest(ctx: Context<RedeemInterest>) -> Result<()> {
    let clock = Clock::get()?;
    let connector = CpiConnector::for_lender_token(
        &ctx.accounts.lender_token,
        &ctx.accounts.underlying_vault,
        &ctx.accounts.connector_program,
        &ctx.accounts.connector_position,
        &ctx.accounts.connector_reserve,
        &ctx.accounts.token_program,
    )?;

    let accounts = &mut *ctx.accounts;
    let lender_mint = accounts.lender_token.lender_mint;

    let outcome = logic::redeem_interest(&accounts.aggregator, &mut accounts.lender_token, &connector)?;

    match outcome {
        InterestOutcome::NoYield => {
            msg!("No interest accrued on {}", lender_mint);
        }
        InterestOutcome::NegativeYield {
            balance,
            total_deposited,
        } => {
            msg!(
                "Negative yield on {}: connector holds {}, deposited {}. Skipping.",
                lender_mint,
                balance,
                total_deposited
            );
            emit!(NegativeYieldObserved {
                lender_mint,
                balance_of_underlying: balance,
                total_deposited,
                timestamp: clock.unix_timestamp,
            });
        }
        InterestOutcome::Redeemed {
            delta,
            split,
            attributed,
        } => {
            accounts.lender_token.last_redeem_time = clock.unix_timestamp;

            // =================================================================
            // Fee Distribution: Vault -> Sinks
            // =================================================================

            pay_from_underlying_vault(
                &accounts.token_program,
                &accounts.underlying_vault,
                &accounts.dev_fee_account,
                &accounts.lender_token,
                split.dev,
            )?;
            pay_from_underlying_vault(
                &accounts.token_program,
                &accounts.underlying_vault,
                &accounts.stake_fee_account,
                &accounts.lender_token,
                split.stake,
            )?;

            msg!("Interest redeemed on {}: {}", lender_mint, delta);
            msg!(
                "Split: dev {}, stake {}, charity {}",
                split.dev,
                split.stake,
                split.charity
            );
            if !attributed {
                msg!(
                    "Nothing deposited; {} held as unattributed interest",
                    split.charity
                );
            }

            emit!(InterestRedeemed {
                lender_mint,
                delta,
                dev_fee: split.dev,
                stake_fee: split.stake,
                charity_share: split.charity,
                attributed,
                reward_per_unit: accounts.lender_token.reward_per_unit,
                timestamp: clock.unix_timestamp,
            });
        }
    }

    Ok(())
}
