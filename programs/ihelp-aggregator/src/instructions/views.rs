// =============================================================================
// View Instructions
// =============================================================================
// Read-only queries. Each returns a u64 through return data and never writes
// to any account, so calling one twice in a row gives the same answer.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::logic;
use crate::state::{Aggregator, CharityPosition, ContributorPosition, ContributorRewards, LenderToken};

#[derive(Accounts)]
pub struct ContributorInterestView<'info> {
    #[account(
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        seeds = [
            CONTRIBUTOR_POSITION_SEED,
            contributor_position.contributor.as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump = contributor_position.bump
    )]
    pub contributor_position: Account<'info, ContributorPosition>,
}

#[derive(Accounts)]
pub struct CharityInterestView<'info> {
    #[account(
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        seeds = [
            CHARITY_POSITION_SEED,
            charity_position.charity.as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump = charity_position.bump
    )]
    pub charity_position: Account<'info, CharityPosition>,
}

#[derive(Accounts)]
pub struct IhelpRewardView<'info> {
    #[account(
        seeds = [AGGREGATOR_SEED],
        bump = aggregator.bump
    )]
    pub aggregator: Account<'info, Aggregator>,

    #[account(
        seeds = [CONTRIBUTOR_REWARDS_SEED, contributor_rewards.contributor.as_ref()],
        bump = contributor_rewards.bump
    )]
    pub contributor_rewards: Account<'info, ContributorRewards>,
}

/// Interest generated by a contributor's deposits of one lender token
pub fn handler_generated_interest_of(ctx: Context<ContributorInterestView>) -> Result<u64> {
    let interest =
        logic::generated_interest_of(&ctx.accounts.lender_token, &*ctx.accounts.contributor_position)?;
    msg!("Generated interest: {}", interest);
    Ok(interest)
}

/// Interest generated by everything deposited through a charity
pub fn handler_charity_generated_interest_of(ctx: Context<CharityInterestView>) -> Result<u64> {
    let interest =
        logic::generated_interest_of(&ctx.accounts.lender_token, &*ctx.accounts.charity_position)?;
    msg!("Generated interest: {}", interest);
    Ok(interest)
}

/// Interest a charity can still claim
pub fn handler_claimable_reward_of(ctx: Context<CharityInterestView>) -> Result<u64> {
    let claimable =
        logic::claimable_interest_of(&ctx.accounts.lender_token, &ctx.accounts.charity_position)?;
    msg!("Claimable interest: {}", claimable);
    Ok(claimable)
}

/// iHelp a contributor can claim
pub fn handler_claimable_ihelp_reward_of(ctx: Context<IhelpRewardView>) -> Result<u64> {
    let claimable = logic::claimable_ihelp_reward_of(
        &ctx.accounts.aggregator,
        &ctx.accounts.contributor_rewards,
    )?;
    msg!("Claimable iHelp: {}", claimable);
    Ok(claimable)
}
