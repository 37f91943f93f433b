// =============================================================================
// Lender Token State Account
// =============================================================================
// One account per supported donation currency. It is both the registry entry
// (is this token supported, which connector serves it) and the token's
// interest accumulator:
//
// - total_deposited: principal the ledger has supplied through the connector
// - reward_per_unit: charity-share interest per unit of principal
// - total_redeemed: charity-share interest credited (incl. migrated interest)
// =============================================================================

use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::state::aggregator::FeeSplit;
use crate::state::checkpoint::accumulator_increase;

/// PDA: ["lender_token", lender_mint]
#[account]
#[derive(InitSpace)]
pub struct LenderToken {
    // =========================================================================
    // Registry
    // =========================================================================

    /// Identity of the lender token
    pub lender_mint: Pubkey,

    /// Asset that is deposited, supplied and redeemed
    pub underlying_mint: Pubkey,

    /// PDA token account staging underlying between the ledger and the connector
    /// PDA: ["underlying_vault", lender_token]
    pub underlying_vault: Pubkey,

    /// Adapter program implementing the connector ABI for this market
    pub connector_program: Pubkey,

    /// Adapter-owned account recording what this token PDA has supplied
    pub connector_position: Pubkey,

    /// Adapter liquidity account that supply/redeem move funds through
    pub connector_reserve: Pubkey,

    /// Unsupported tokens accept no deposits
    pub is_supported: bool,

    // =========================================================================
    // Interest Accumulator
    // =========================================================================

    pub total_deposited: u64,

    /// Charity-share interest per unit of principal (scaled by REWARD_PRECISION)
    pub reward_per_unit: u128,

    /// Charity-share interest credited to charities
    pub total_redeemed: u64,

    /// Interest charities have pulled out
    pub total_interest_claimed: u64,

    /// Charity-share interest that arrived while nothing was deposited
    pub unattributed_interest: u64,

    /// Lifetime fee totals routed to the sinks
    pub total_dev_fees: u64,
    pub total_stake_fees: u64,

    pub last_redeem_time: i64,

    pub bump: u8,
    pub vault_bump: u8,
}

impl LenderToken {
    /// Yield the connector holds beyond recorded principal.
    ///
    /// Errors with NegativeYieldObserved when the connector reports less than
    /// what was deposited; callers treat that as a no-op.
    pub fn observe_yield(&self, balance_of_underlying: u64) -> Result<u64> {
        require!(
            balance_of_underlying >= self.total_deposited,
            AggregatorError::NegativeYieldObserved
        );
        Ok(balance_of_underlying - self.total_deposited)
    }

    /// Fold the charity share of a redemption into the accumulator.
    ///
    /// Formula: reward_per_unit += charity_share * PRECISION / total_deposited
    ///
    /// Returns false when nothing is deposited; the charity share is then held
    /// in unattributed_interest instead of being credited to anyone.
    pub fn credit_interest(&mut self, split: &FeeSplit) -> Result<bool> {
        self.total_dev_fees = self
            .total_dev_fees
            .checked_add(split.dev)
            .ok_or(AggregatorError::MathOverflow)?;
        self.total_stake_fees = self
            .total_stake_fees
            .checked_add(split.stake)
            .ok_or(AggregatorError::MathOverflow)?;

        if self.total_deposited == 0 {
            self.unattributed_interest = self
                .unattributed_interest
                .checked_add(split.charity)
                .ok_or(AggregatorError::MathOverflow)?;
            return Ok(false);
        }

        let increase = accumulator_increase(split.charity, self.total_deposited)?;
        self.reward_per_unit = self
            .reward_per_unit
            .checked_add(increase)
            .ok_or(AggregatorError::MathOverflow)?;
        self.total_redeemed = self
            .total_redeemed
            .checked_add(split.charity)
            .ok_or(AggregatorError::MathOverflow)?;

        Ok(true)
    }

    /// Credit already-realised charity interest that bypasses the accumulator
    pub fn credit_realised_interest(&mut self, split: &FeeSplit) -> Result<()> {
        self.total_redeemed = self
            .total_redeemed
            .checked_add(split.charity)
            .ok_or(AggregatorError::MathOverflow)?;
        self.total_dev_fees = self
            .total_dev_fees
            .checked_add(split.dev)
            .ok_or(AggregatorError::MathOverflow)?;
        self.total_stake_fees = self
            .total_stake_fees
            .checked_add(split.stake)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    pub fn add_deposit(&mut self, amount: u64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    pub fn remove_deposit(&mut self, amount: u64) -> Result<()> {
        self.total_deposited = self
            .total_deposited
            .checked_sub(amount)
            .ok_or(AggregatorError::MathUnderflow)?;
        Ok(())
    }

    pub fn record_interest_claim(&mut self, amount: u64) -> Result<()> {
        self.total_interest_claimed = self
            .total_interest_claimed
            .checked_add(amount)
            .ok_or(AggregatorError::MathOverflow)?;
        Ok(())
    }

    /// Release held unattributed interest; returns the amount released
    pub fn take_unattributed(&mut self) -> Result<u64> {
        let amount = self.unattributed_interest;
        require!(amount > 0, AggregatorError::NothingToSweep);
        self.unattributed_interest = 0;
        Ok(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::REWARD_PRECISION;

    fn lender_token(total_deposited: u64) -> LenderToken {
        LenderToken {
            lender_mint: Pubkey::new_unique(),
            underlying_mint: Pubkey::new_unique(),
            underlying_vault: Pubkey::new_unique(),
            connector_program: Pubkey::new_unique(),
            connector_position: Pubkey::new_unique(),
            connector_reserve: Pubkey::new_unique(),
            is_supported: true,
            total_deposited,
            reward_per_unit: 0,
            total_redeemed: 0,
            total_interest_claimed: 0,
            unattributed_interest: 0,
            total_dev_fees: 0,
            total_stake_fees: 0,
            last_redeem_time: 0,
            bump: 255,
            vault_bump: 254,
        }
    }

    #[test]
    fn test_observe_yield() {
        let token = lender_token(1_000);
        assert_eq!(token.observe_yield(1_100).unwrap(), 100);
        assert_eq!(token.observe_yield(1_000).unwrap(), 0);
        assert!(token.observe_yield(999).is_err());
    }

    #[test]
    fn test_credit_interest_moves_accumulator() {
        let mut token = lender_token(1_000);
        let split = FeeSplit {
            dev: 10,
            stake: 10,
            charity: 80,
        };
        assert!(token.credit_interest(&split).unwrap());
        assert_eq!(token.reward_per_unit, 80 * REWARD_PRECISION / 1_000);
        assert_eq!(token.total_redeemed, 80);
        assert_eq!(token.total_dev_fees, 10);
        assert_eq!(token.total_stake_fees, 10);
    }

    #[test]
    fn test_credit_interest_without_deposits_is_held() {
        let mut token = lender_token(0);
        let split = FeeSplit {
            dev: 0,
            stake: 0,
            charity: 50,
        };
        assert!(!token.credit_interest(&split).unwrap());
        assert_eq!(token.reward_per_unit, 0);
        assert_eq!(token.total_redeemed, 0);
        assert_eq!(token.unattributed_interest, 50);

        assert_eq!(token.take_unattributed().unwrap(), 50);
        assert!(token.take_unattributed().is_err());
    }
}
