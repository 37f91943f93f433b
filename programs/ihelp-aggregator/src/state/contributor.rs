use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::state::checkpoint::Checkpoint;

/// A contributor's accounted balance of one lender token and its interest view.
/// PDA: ["contributor_position", contributor, lender_mint]
#[account]
#[derive(InitSpace, Default)]
pub struct ContributorPosition {
    pub contributor: Pubkey,
    pub lender_mint: Pubkey,

    /// Principal this contributor has deposited (through any charity)
    pub balance: u64,

    /// Weighted by `balance` against the token's reward_per_unit
    pub interest: Checkpoint,

    pub bump: u8,
}

impl ContributorPosition {
    /// Fill in identity on a freshly created account; no-op afterwards
    pub fn open(&mut self, contributor: Pubkey, lender_mint: Pubkey, bump: u8) {
        if self.contributor == Pubkey::default() {
            self.contributor = contributor;
            self.lender_mint = lender_mint;
            self.bump = bump;
        }
    }

    /// Settle interest, then apply a balance change
    pub fn rebalance(&mut self, reward_per_unit: u128, new_balance: u64) -> Result<()> {
        self.interest.settle(reward_per_unit, new_balance)?;
        self.balance = new_balance;
        Ok(())
    }
}

/// Emission (iHelp) checkpoint for a contributor, shared by every lender token.
/// PDA: ["contributor_rewards", contributor]
///
/// `checkpoint.weight` is the contributor's share of Aggregator::total_weight.
#[account]
#[derive(InitSpace, Default)]
pub struct ContributorRewards {
    pub contributor: Pubkey,

    pub checkpoint: Checkpoint,

    /// Lifetime iHelp claimed
    pub claimed: u64,

    pub bump: u8,
}

impl ContributorRewards {
    /// Fill in identity on a freshly created account; no-op afterwards
    pub fn open(&mut self, contributor: Pubkey, bump: u8) {
        if self.contributor == Pubkey::default() {
            self.contributor = contributor;
            self.bump = bump;
        }
    }

    pub fn claimable(&self, reward_per_weight: u128) -> Result<u64> {
        self.checkpoint.earned(reward_per_weight)
    }

    /// Settle, then add `amount` to the weight
    pub fn add_weight(&mut self, reward_per_weight: u128, amount: u64) -> Result<()> {
        let new_weight = self
            .checkpoint
            .weight
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        self.checkpoint.settle(reward_per_weight, new_weight)
    }

    /// Settle, then remove `amount` from the weight
    pub fn remove_weight(&mut self, reward_per_weight: u128, amount: u64) -> Result<()> {
        let new_weight = self
            .checkpoint
            .weight
            .checked_sub(amount)
            .ok_or(AggregatorError::MathUnderflow)?;
        self.checkpoint.settle(reward_per_weight, new_weight)
    }

    /// Settle, then debit a claim
    pub fn record_claim(&mut self, reward_per_weight: u128, amount: u64) -> Result<()> {
        require!(amount > 0, AggregatorError::ZeroAmount);
        self.checkpoint.settle(reward_per_weight, self.checkpoint.weight)?;
        self.checkpoint.debit(amount)?;
        self.claimed = self
            .claimed
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    /// Credit iHelp that did not flow through the accumulator (fallback)
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.checkpoint.credit(amount)
    }
}
