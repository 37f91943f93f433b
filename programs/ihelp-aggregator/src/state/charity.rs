use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::state::checkpoint::Checkpoint;

/// Host registry entry for a charity.
/// PDA: ["charity", charity]
#[account]
#[derive(InitSpace, Debug)]
pub struct CharityRecord {
    pub charity: Pubkey,

    /// Only recognized charities may deposit
    pub is_recognized: bool,

    pub registered_at: i64,

    pub bump: u8,
}

impl CharityRecord {
    /// Decode the registry entry stored at a charity's PDA.
    /// A charity that was never registered has no entry and is not recognized.
    pub fn from_registry(owner: &Pubkey, data: &[u8]) -> Result<Self> {
        require!(
            *owner == crate::ID && !data.is_empty(),
            AggregatorError::NotAuthorizedCharity
        );
        let mut data = data;
        Self::try_deserialize(&mut data)
    }
}

/// A charity's accounted balance of one lender token and its interest view.
/// PDA: ["charity_position", charity, lender_mint]
#[account]
#[derive(InitSpace, Default)]
pub struct CharityPosition {
    pub charity: Pubkey,
    pub lender_mint: Pubkey,

    /// Principal deposited through this charity
    pub balance: u64,

    /// Weighted by `balance` against the token's reward_per_unit.
    /// `accrued` also carries interest folded in by migration.
    pub interest: Checkpoint,

    /// Interest already pulled out through claim_interest
    pub claimed_interest: u64,

    pub bump: u8,
}

impl CharityPosition {
    /// Fill in identity on a freshly created account; no-op afterwards
    pub fn open(&mut self, charity: Pubkey, lender_mint: Pubkey, bump: u8) {
        if self.charity == Pubkey::default() {
            self.charity = charity;
            self.lender_mint = lender_mint;
            self.bump = bump;
        }
    }

    /// Total interest generated for this charity so far
    pub fn generated_interest(&self, reward_per_unit: u128) -> Result<u64> {
        self.interest.earned(reward_per_unit)
    }

    /// Generated interest not yet claimed
    pub fn claimable_interest(&self, reward_per_unit: u128) -> Result<u64> {
        self.generated_interest(reward_per_unit)?
            .checked_sub(self.claimed_interest)
            .ok_or(error!(AggregatorError::MathUnderflow))
    }

    /// Settle interest, then apply a balance change
    pub fn rebalance(&mut self, reward_per_unit: u128, new_balance: u64) -> Result<()> {
        self.interest.settle(reward_per_unit, new_balance)?;
        self.balance = new_balance;
        Ok(())
    }

    pub fn record_claim(&mut self, reward_per_unit: u128, amount: u64) -> Result<()> {
        require!(amount > 0, AggregatorError::ZeroAmount);
        require!(
            amount <= self.claimable_interest(reward_per_unit)?,
            AggregatorError::InsufficientClaimable
        );

        self.interest.settle(reward_per_unit, self.balance)?;
        self.claimed_interest = self
            .claimed_interest
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }
}
