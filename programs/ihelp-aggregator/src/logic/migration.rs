// =============================================================================
// Legacy Migration
// =============================================================================
// Imports one charity's legacy ledger into the aggregator page by page.
//
// Every page leaves the ledger consistent on its own:
// - each contributor's balance is added through a checkpointed rebalance
// - the charity balance, total_deposited and total_weight grow by the page sum
// - the first page also folds in the legacy unclaimed interest, split by the
//   current fee split, with the charity share credited as realised interest
//
// The cursor (LegacyLedger::migrated_count) makes a page impossible to replay.
// =============================================================================

use anchor_lang::prelude::*;

use crate::connector::LenderConnector;
use crate::constants::MAX_MIGRATION_BATCH;
use crate::error::AggregatorError;
use crate::state::{
    Aggregator, CharityPosition, ContributorPosition, ContributorRewards, FeeSplit, LegacyLedger,
    LenderToken,
};

/// Everything a page will move, computed before any state changes so the
/// caller can stage custody transfers first
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationPlan {
    pub start: usize,
    pub end: usize,

    /// Sum of the page's legacy balances, supplied to the market
    pub principal: u64,

    /// Split of the legacy unclaimed interest, first page only
    pub interest: Option<FeeSplit>,
}

impl MigrationPlan {
    /// Entries in the page that carry a balance; each needs a target
    pub fn funded_entries(&self, ledger: &LegacyLedger) -> usize {
        ledger.entries[self.start..self.end]
            .iter()
            .filter(|entry| entry.balance > 0)
            .count()
    }

    /// Underlying the charity must move into the token's vault
    pub fn vault_inflow(&self) -> Result<u64> {
        let interest = self.interest.map(|split| split.charity).unwrap_or(0);
        self.principal
            .checked_add(interest)
            .ok_or(error!(AggregatorError::MathOverflow))
    }
}

/// One contributor's accounts for a page
pub struct MigrationTarget<'a> {
    pub position: &'a mut ContributorPosition,
    pub rewards: &'a mut ContributorRewards,
}

/// Outcome of an applied page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationPage {
    pub principal: u64,
    pub interest: Option<FeeSplit>,
    pub migrated_count: u32,
    pub complete: bool,
}

pub fn plan_page(
    aggregator: &Aggregator,
    ledger: &LegacyLedger,
    start_index: u32,
    batch_size: u32,
) -> Result<MigrationPlan> {
    require!(
        batch_size > 0 && batch_size <= MAX_MIGRATION_BATCH,
        AggregatorError::InvalidMigrationBatch
    );

    let (start, end) = ledger.page(start_index, batch_size)?;
    let principal = ledger.page_principal(start, end)?;

    let interest = if ledger.interest_migrated {
        None
    } else {
        Some(aggregator.calculate_fee_split(ledger.unclaimed_interest()?)?)
    };

    Ok(MigrationPlan {
        start,
        end,
        principal,
        interest,
    })
}

/// Apply a planned page.
///
/// `targets` must line up, in order, with the page's entries that carry a
/// balance. The caller must already have moved `plan.vault_inflow()` into the
/// underlying vault.
#[allow(clippy::too_many_arguments)]
pub fn migrate_page<C: LenderConnector>(
    aggregator: &mut Aggregator,
    lender_token: &mut LenderToken,
    charity_position: &mut CharityPosition,
    ledger: &mut LegacyLedger,
    targets: &mut [MigrationTarget<'_>],
    connector: &C,
    plan: &MigrationPlan,
) -> Result<MigrationPage> {
    require!(
        plan.start == ledger.migrated_count as usize && plan.end <= ledger.entries.len(),
        AggregatorError::InvalidMigrationCursor
    );
    require!(
        plan.interest.is_some() != ledger.interest_migrated,
        AggregatorError::InvalidMigrationCursor
    );
    require!(
        plan.funded_entries(ledger) == targets.len(),
        AggregatorError::MigrationAccountMismatch
    );

    let entries = ledger.entries[plan.start..plan.end]
        .iter()
        .filter(|entry| entry.balance > 0);
    for (entry, target) in entries.clone().zip(targets.iter()) {
        require_keys_eq!(
            target.position.contributor,
            entry.contributor,
            AggregatorError::MigrationAccountMismatch
        );
        require_keys_eq!(
            target.position.lender_mint,
            lender_token.lender_mint,
            AggregatorError::MigrationAccountMismatch
        );
        require_keys_eq!(
            target.rewards.contributor,
            entry.contributor,
            AggregatorError::MigrationAccountMismatch
        );
    }

    let reward_per_unit = lender_token.reward_per_unit;
    let reward_per_weight = aggregator.reward_per_weight;

    if let Some(split) = plan.interest {
        charity_position.interest.credit(split.charity)?;
        lender_token.credit_realised_interest(&split)?;
    }

    let mut principal: u64 = 0;
    for (entry, target) in entries.zip(targets.iter_mut()) {
        let balance = target
            .position
            .balance
            .checked_add(entry.balance)
            .ok_or(AggregatorError::MathOverflow)?;
        target.position.rebalance(reward_per_unit, balance)?;
        target.rewards.add_weight(reward_per_weight, entry.balance)?;

        principal = principal
            .checked_add(entry.balance)
            .ok_or(AggregatorError::MathOverflow)?;
    }
    require!(
        principal == plan.principal,
        AggregatorError::MigrationAccountMismatch
    );

    let charity_balance = charity_position
        .balance
        .checked_add(principal)
        .ok_or(AggregatorError::MathOverflow)?;
    charity_position.rebalance(reward_per_unit, charity_balance)?;
    lender_token.add_deposit(principal)?;
    aggregator.add_weight(principal)?;

    ledger.interest_migrated = true;
    ledger.migrated_count = plan.end as u32;

    connector.supply(principal)?;

    Ok(MigrationPage {
        principal,
        interest: plan.interest,
        migrated_count: ledger.migrated_count,
        complete: ledger.is_complete(),
    })
}
