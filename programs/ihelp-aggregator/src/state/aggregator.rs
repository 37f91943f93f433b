// =============================================================================
// Aggregator State Account
// =============================================================================
// Global configuration plus the single emission (iHelp) accumulator.
//
// - admin/distributor authorities
// - fee split applied to every interest redemption (dev / stake / charity)
// - reward_per_weight: iHelp distributed per unit of deposited weight
// - total_weight: sum of every contributor's deposits across all tokens
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MIN_CHARITY_FEE_BPS};
use crate::error::AggregatorError;
use crate::state::checkpoint::accumulator_increase;

/// The global aggregator account.
/// PDA: ["aggregator"]
#[account]
#[derive(InitSpace)]
pub struct Aggregator {
    // =========================================================================
    // Authorities
    // =========================================================================

    /// Can change configuration, register tokens and charities, stage migrations
    pub admin: Pubkey,

    /// Allowed to push iHelp emissions through distribute_ihelp
    pub distributor: Pubkey,

    /// Receives the whole distribution when nobody holds weight
    pub fallback_recipient: Pubkey,

    /// Owner of the token accounts that receive the developer fee
    pub dev_fee_owner: Pubkey,

    /// Owner of the token accounts that receive the stakeholder fee
    pub stake_fee_owner: Pubkey,

    // =========================================================================
    // iHelp Reward Token
    // =========================================================================

    pub reward_mint: Pubkey,

    /// PDA token account holding iHelp until contributors claim it
    pub reward_vault: Pubkey,

    // =========================================================================
    // Fee Split (BPS, sums to 10000)
    // =========================================================================

    pub dev_fee_bps: u16,
    pub stake_fee_bps: u16,
    pub charity_fee_bps: u16,

    // =========================================================================
    // Emission Accumulator
    // =========================================================================

    /// Raw token units deposited across every lender token
    pub total_weight: u64,

    /// iHelp per unit of weight, scaled by REWARD_PRECISION
    pub reward_per_weight: u128,

    /// Lifetime iHelp distributed (including fallback credits)
    pub total_reward_distributed: u64,

    /// Lifetime iHelp credited to the fallback recipient
    pub total_fallback_credited: u64,

    /// Lifetime iHelp claimed
    pub total_reward_claimed: u64,

    pub last_distribution_time: i64,

    // =========================================================================
    // Status
    // =========================================================================

    pub is_paused: bool,

    pub bump: u8,
    pub reward_vault_bump: u8,
}

/// Result of splitting an interest amount by the configured fee split
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FeeSplit {
    pub dev: u64,
    pub stake: u64,
    pub charity: u64,
}

/// Where a distribute_ihelp amount ended up
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Distribution {
    /// Spread over total_weight through reward_per_weight
    Accumulated { increase: u128 },
    /// Nobody held weight; credited to the fallback recipient
    Fallback,
}

impl Aggregator {
    /// Validate a proposed fee split
    pub fn validate_fee_split(dev_fee_bps: u16, stake_fee_bps: u16, charity_fee_bps: u16) -> Result<()> {
        let total_bps = (dev_fee_bps as u32)
            .checked_add(stake_fee_bps as u32)
            .ok_or(AggregatorError::MathOverflow)?
            .checked_add(charity_fee_bps as u32)
            .ok_or(AggregatorError::MathOverflow)?;

        require!(
            total_bps == BPS_DENOMINATOR as u32,
            AggregatorError::InvalidFeeSplit
        );
        require!(
            charity_fee_bps >= MIN_CHARITY_FEE_BPS,
            AggregatorError::CharityShareTooLow
        );

        Ok(())
    }

    /// Current split as (dev_bps, stake_bps, charity_bps)
    pub fn fee_split(&self) -> (u16, u16, u16) {
        (self.dev_fee_bps, self.stake_fee_bps, self.charity_fee_bps)
    }

    /// Split an interest amount.
    ///
    /// dev and charity are computed directly; stake takes the remainder so the
    /// three parts always sum to `amount`.
    pub fn calculate_fee_split(&self, amount: u64) -> Result<FeeSplit> {
        let charity = bps_of(amount, self.charity_fee_bps)?;
        let dev = bps_of(amount, self.dev_fee_bps)?;
        let stake = amount
            .checked_sub(charity)
            .ok_or(AggregatorError::MathUnderflow)?
            .checked_sub(dev)
            .ok_or(AggregatorError::MathUnderflow)?;

        Ok(FeeSplit { dev, stake, charity })
    }

    pub fn add_weight(&mut self, amount: u64) -> Result<()> {
        self.total_weight = self
            .total_weight
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    pub fn remove_weight(&mut self, amount: u64) -> Result<()> {
        self.total_weight = self
            .total_weight
            .checked_sub(amount)
            .ok_or(AggregatorError::MathUnderflow)?;
        Ok(())
    }

    /// Account for `amount` of freshly distributed iHelp.
    ///
    /// Formula: reward_per_weight += amount * PRECISION / total_weight
    /// With no weight the caller must credit the fallback recipient.
    pub fn record_distribution(&mut self, amount: u64) -> Result<Distribution> {
        self.total_reward_distributed = self
            .total_reward_distributed
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;

        if self.total_weight == 0 {
            self.total_fallback_credited = self
                .total_fallback_credited
                .checked_add(amount)
                .ok_or(AggregatorError::MathOverflow)?;
            return Ok(Distribution::Fallback);
        }

        let increase = accumulator_increase(amount, self.total_weight)?;
        self.reward_per_weight = self
            .reward_per_weight
            .checked_add(increase)
            .ok_or(AggregatorError::MathOverflow)?;

        Ok(Distribution::Accumulated { increase })
    }

    pub fn record_claim(&mut self, amount: u64) -> Result<()> {
        self.total_reward_claimed = self
            .total_reward_claimed
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }
}

fn bps_of(amount: u64, bps: u16) -> Result<u64> {
    let share = (amount as u128)
        .checked_mul(bps as u128)
        .ok_or(AggregatorError::MathOverflow)?
        .checked_div(BPS_DENOMINATOR as u128)
        .ok_or(AggregatorError::DivisionByZero)?;
    Ok(share as u64)
}
