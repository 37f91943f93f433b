use anchor_lang::prelude::*;

use crate::constants::REWARD_PRECISION;
use crate::error::AggregatorError;

/// Lazily-settled share of a reward-per-unit accumulator.
///
/// Used for both accumulators the aggregator runs:
/// - interest: weight = balance of one lender token, accumulator = reward_per_unit
/// - emission: weight = total deposited across tokens, accumulator = reward_per_weight
///
/// Earned share at any moment:
/// `accrued + weight * (accumulator_now - accumulator) / PRECISION`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, Debug, PartialEq, Eq, InitSpace)]
pub struct Checkpoint {
    /// Weight held since the last settlement
    pub weight: u64,

    /// Accumulator value at the last settlement
    pub accumulator: u128,

    /// Share settled so far and not yet debited
    pub accrued: u64,
}

impl Checkpoint {
    /// Share earned since the last settlement (truncated)
    pub fn pending(&self, accumulator: u128) -> Result<u64> {
        if self.weight == 0 {
            return Ok(0);
        }

        let diff = accumulator
            .checked_sub(self.accumulator)
            .ok_or(AggregatorError::MathUnderflow)?;

        let pending = (self.weight as u128)
            .checked_mul(diff)
            .ok_or(AggregatorError::MathOverflow)?
            .checked_div(REWARD_PRECISION)
            .ok_or(AggregatorError::DivisionByZero)?;

        u64::try_from(pending).map_err(|_| error!(AggregatorError::MathOverflow))
    }

    /// Settled plus pending share, without mutating anything
    pub fn earned(&self, accumulator: u128) -> Result<u64> {
        self.accrued
            .checked_add(self.pending(accumulator)?)
            .ok_or(error!(AggregatorError::MathOverflow))
    }

    /// Fold pending into `accrued`, move to `accumulator`, then adopt `new_weight`.
    ///
    /// Must run before any change of weight, otherwise the new weight would be
    /// paid for the period it was not held.
    pub fn settle(&mut self, accumulator: u128, new_weight: u64) -> Result<()> {
        self.accrued = self.earned(accumulator)?;
        self.accumulator = accumulator;
        self.weight = new_weight;
        Ok(())
    }

    /// Credit realised share that did not come through the accumulator
    pub fn credit(&mut self, amount: u64) -> Result<()> {
        self.accrued = self
            .accrued
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    /// Remove a claimed amount from the settled share
    pub fn debit(&mut self, amount: u64) -> Result<()> {
        require!(amount <= self.accrued, AggregatorError::InsufficientClaimable);
        self.accrued -= amount;
        Ok(())
    }
}

/// Accumulator increase for distributing `amount` over `total_weight`.
/// Returns 0 when there is no weight to distribute over.
pub fn accumulator_increase(amount: u64, total_weight: u64) -> Result<u128> {
    if total_weight == 0 {
        return Ok(0);
    }

    let increase = (amount as u128)
        .checked_mul(REWARD_PRECISION)
        .ok_or(AggregatorError::MathOverflow)?
        .checked_div(total_weight as u128)
        .ok_or(AggregatorError::DivisionByZero)?;

    Ok(increase)
}
