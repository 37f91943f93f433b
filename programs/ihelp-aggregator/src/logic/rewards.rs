use anchor_lang::prelude::*;

use crate::error::AggregatorError;
use crate::state::{Aggregator, ContributorRewards, Distribution};

/// Spread `amount` of iHelp over every unit of deposited weight.
///
/// With no weight the whole amount is credited to `fallback`.
pub fn distribute_ihelp(
    aggregator: &mut Aggregator,
    fallback: &mut ContributorRewards,
    amount: u64,
) -> Result<Distribution> {
    require!(amount > 0, AggregatorError::ZeroAmount);

    let distribution = aggregator.record_distribution(amount)?;
    if distribution == Distribution::Fallback {
        fallback.credit(amount)?;
    }

    Ok(distribution)
}

pub fn claimable_ihelp_reward_of(
    aggregator: &Aggregator,
    rewards: &ContributorRewards,
) -> Result<u64> {
    rewards.claimable(aggregator.reward_per_weight)
}

/// Debit `amount` of claimable iHelp; the caller pays it out of the reward vault
pub fn claim_ihelp_reward(
    aggregator: &mut Aggregator,
    rewards: &mut ContributorRewards,
    amount: u64,
) -> Result<()> {
    rewards.record_claim(aggregator.reward_per_weight, amount)?;
    aggregator.record_claim(amount)
}
