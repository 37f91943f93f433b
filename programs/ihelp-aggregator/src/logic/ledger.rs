/// Accounting ledger transitions: deposit and withdraw.
///
/// Both follow the same order:
/// 1. validate
/// 2. checkpoint every affected accumulator view at the pre-mutation weight
/// 3. mutate balances, token totals and emission weight
/// 4. only then call out to the lender connector
use anchor_lang::prelude::*;

use crate::connector::LenderConnector;
use crate::error::AggregatorError;
use crate::state::{
    Aggregator, CharityPosition, CharityRecord, ContributorPosition, ContributorRewards,
    LenderToken,
};

/// The five accounts a balance change touches
pub struct LedgerAccounts<'a> {
    pub aggregator: &'a mut Aggregator,
    pub lender_token: &'a mut LenderToken,
    pub charity_position: &'a mut CharityPosition,
    pub contributor_position: &'a mut ContributorPosition,
    pub contributor_rewards: &'a mut ContributorRewards,
}

/// Record `amount` of underlying deposited by `charity` for `contributor`
/// and supply it to the lending market.
///
/// The caller must already have moved `amount` into the token's underlying vault.
pub fn deposit<C: LenderConnector>(
    accounts: LedgerAccounts<'_>,
    charity_record: &CharityRecord,
    connector: &C,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, AggregatorError::ZeroAmount);
    require!(
        accounts.lender_token.is_supported,
        AggregatorError::UnsupportedToken
    );
    require!(
        charity_record.is_recognized,
        AggregatorError::NotAuthorizedCharity
    );

    let LedgerAccounts {
        aggregator,
        lender_token,
        charity_position,
        contributor_position,
        contributor_rewards,
    } = accounts;

    let reward_per_unit = lender_token.reward_per_unit;
    let reward_per_weight = aggregator.reward_per_weight;

    let contributor_balance = contributor_position
        .balance
        .checked_add(amount)
        .ok_or(AggregatorError::MathOverflow)?;
    let charity_balance = charity_position
        .balance
        .checked_add(amount)
        .ok_or(AggregatorError::MathOverflow)?;

    contributor_position.rebalance(reward_per_unit, contributor_balance)?;
    charity_position.rebalance(reward_per_unit, charity_balance)?;
    contributor_rewards.add_weight(reward_per_weight, amount)?;

    lender_token.add_deposit(amount)?;
    aggregator.add_weight(amount)?;

    connector.supply(amount)
}

/// Debit `amount` from `contributor` (and symmetrically from `charity`) and
/// redeem it from the lending market into the underlying vault.
///
/// The caller pays the vault out to the recipient afterwards.
pub fn withdraw<C: LenderConnector>(
    accounts: LedgerAccounts<'_>,
    connector: &C,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, AggregatorError::ZeroAmount);

    let LedgerAccounts {
        aggregator,
        lender_token,
        charity_position,
        contributor_position,
        contributor_rewards,
    } = accounts;

    // Checked against the contributor's balance; the charity can never take
    // out more than this contributor put in
    require!(
        amount <= contributor_position.balance,
        AggregatorError::InsufficientFunds
    );
    require!(
        amount <= charity_position.balance,
        AggregatorError::InsufficientFunds
    );

    let reward_per_unit = lender_token.reward_per_unit;
    let reward_per_weight = aggregator.reward_per_weight;

    contributor_position.rebalance(reward_per_unit, contributor_position.balance - amount)?;
    charity_position.rebalance(reward_per_unit, charity_position.balance - amount)?;
    contributor_rewards.remove_weight(reward_per_weight, amount)?;

    lender_token.remove_deposit(amount)?;
    aggregator.remove_weight(amount)?;

    connector.redeem_underlying(amount)
}
