use anchor_lang::prelude::*;

use crate::constants::*;
use crate::state::{ContributorPosition, ContributorRewards, LenderToken};

/// Accounts required for open_contributor_accounts
///
/// Creates a contributor's position for one lender token and their emission
/// checkpoint ahead of time, so migrate can take them as remaining accounts.
#[derive(Accounts)]
pub struct OpenContributorAccounts<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: contributor identity, only used as a seed
    pub contributor: UncheckedAccount<'info>,

    #[account(
        seeds = [LENDER_TOKEN_SEED, lender_token.lender_mint.as_ref()],
        bump = lender_token.bump
    )]
    pub lender_token: Account<'info, LenderToken>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + ContributorPosition::INIT_SPACE,
        seeds = [
            CONTRIBUTOR_POSITION_SEED,
            contributor.key().as_ref(),
            lender_token.lender_mint.as_ref()
        ],
        bump
    )]
    pub contributor_position: Account<'info, ContributorPosition>,

    #[account(
        init_if_needed,
        payer = payer,
        space = 8 + ContributorRewards::INIT_SPACE,
        seeds = [CONTRIBUTOR_REWARDS_SEED, contributor.key().as_ref()],
        bump
    )]
    pub contributor_rewards: Account<'info, ContributorRewards>,

    pub system_program: Program<'info, System>,
}

pub fn handler_open_contributor_accounts(ctx: Context<OpenContributorAccounts>) -> Result<()> {
    let contributor = ctx.accounts.contributor.key();
    let lender_mint = ctx.accounts.lender_token.lender_mint;

    ctx.accounts.contributor_position.open(
        contributor,
        lender_mint,
        ctx.bumps.contributor_position,
    );
    ctx.accounts
        .contributor_rewards
        .open(contributor, ctx.bumps.contributor_rewards);

    msg!(
        "Contributor accounts ready for {} on {}",
        contributor,
        lender_mint
    );

    Ok(())
}
