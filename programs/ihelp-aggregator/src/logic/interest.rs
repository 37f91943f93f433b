// =============================================================================
// Interest Accrual
// =============================================================================
// Pull-based per-token interest:
//
// 1. redeem_interest reads what the connector holds beyond total_deposited
// 2. the delta is split dev / stake / charity
// 3. the charity share moves reward_per_unit; dev and stake go to the sinks
// 4. the full delta is redeemed into the underlying vault
//
// Reads (generated/claimable interest) never mutate and are O(1).
// =============================================================================

use anchor_lang::prelude::*;

use crate::connector::LenderConnector;
use crate::state::{
    Aggregator, CharityPosition, Checkpoint, ContributorPosition, FeeSplit, LenderToken,
};

/// Anything weighted against a lender token's reward_per_unit
pub trait InterestBearing {
    fn interest_checkpoint(&self) -> &Checkpoint;
}

impl InterestBearing for ContributorPosition {
    fn interest_checkpoint(&self) -> &Checkpoint {
        &self.interest
    }
}

impl InterestBearing for CharityPosition {
    fn interest_checkpoint(&self) -> &Checkpoint {
        &self.interest
    }
}

/// What a redeem_interest call did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterestOutcome {
    /// Connector balance equals recorded principal
    NoYield,

    /// Connector reports less than recorded principal; nothing changed
    NegativeYield { balance: u64, total_deposited: u64 },

    /// `delta` was split and redeemed into the underlying vault.
    /// `attributed` is false when the charity share was held as unattributed.
    Redeemed {
        delta: u64,
        split: FeeSplit,
        attributed: bool,
    },
}

/// Realise accrued yield for one lender token
pub fn redeem_interest<C: LenderConnector>(
    aggregator: &Aggregator,
    lender_token: &mut LenderToken,
    connector: &C,
) -> Result<InterestOutcome> {
    let balance = connector.balance_of_underlying()?;

    let delta = match lender_token.observe_yield(balance) {
        Ok(delta) => delta,
        Err(_) => {
            return Ok(InterestOutcome::NegativeYield {
                balance,
                total_deposited: lender_token.total_deposited,
            })
        }
    };
    if delta == 0 {
        return Ok(InterestOutcome::NoYield);
    }

    let split = aggregator.calculate_fee_split(delta)?;
    let attributed = lender_token.credit_interest(&split)?;

    connector.redeem_underlying(delta)?;

    Ok(InterestOutcome::Redeemed {
        delta,
        split,
        attributed,
    })
}

/// Interest generated so far by a contributor's or a charity's deposits
pub fn generated_interest_of<P: InterestBearing>(
    lender_token: &LenderToken,
    principal: &P,
) -> Result<u64> {
    principal
        .interest_checkpoint()
        .earned(lender_token.reward_per_unit)
}

/// Interest a charity can still claim
pub fn claimable_interest_of(
    lender_token: &LenderToken,
    charity_position: &CharityPosition,
) -> Result<u64> {
    charity_position.claimable_interest(lender_token.reward_per_unit)
}

/// Debit `amount` of claimable interest from a charity.
///
/// The caller pays it out of the underlying vault afterwards.
pub fn claim_interest(
    lender_token: &mut LenderToken,
    charity_position: &mut CharityPosition,
    amount: u64,
) -> Result<()> {
    charity_position.record_claim(lender_token.reward_per_unit, amount)?;
    lender_token.record_interest_claim(amount)
}
