//! Scenario tests
//!
//! Drive the same logic functions the instruction handlers call, against an
//! in-memory ledger. SPL token movements done by the handlers are modelled
//! as plain counters; a failed call restores the snapshot taken before it,
//! like a failed transaction.

mod test_migration;
mod test_properties;

use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt::Debug;

use anchor_lang::prelude::*;

use crate::connector::LenderConnector;
use crate::error::AggregatorError;
use crate::logic::{self, InterestOutcome, LedgerAccounts, MigrationPage, MigrationTarget};
use crate::state::*;

/// Assert that `result` failed with `expected`
pub fn assert_err<T: Debug>(result: Result<T>, expected: AggregatorError) {
    match result {
        Err(Error::AnchorError(err)) => assert_eq!(
            err.error_code_number,
            u32::from(expected),
            "expected {:?}, got {}",
            expected,
            err.error_name
        ),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

// =============================================================================
// Mock Lender Connector
// =============================================================================

/// A lending market that holds `market` on behalf of the token and moves
/// funds to and from the token's `vault`
#[derive(Clone, Debug, Default)]
pub struct MockConnector {
    market: Cell<u64>,
    vault: Cell<u64>,
}

impl MockConnector {
    /// Market yield accrues to the holder
    pub fn accrue(&self, amount: u64) {
        self.market.set(self.market.get() + amount);
    }

    /// Market loses value (bad debt, exchange rate drop)
    pub fn shrink(&self, amount: u64) {
        self.market.set(self.market.get() - amount);
    }

    pub fn market(&self) -> u64 {
        self.market.get()
    }

    pub fn vault(&self) -> u64 {
        self.vault.get()
    }

    fn fund_vault(&self, amount: u64) {
        self.vault.set(self.vault.get() + amount);
    }

    fn pay_from_vault(&self, amount: u64) -> Result<()> {
        let balance = self
            .vault
            .get()
            .checked_sub(amount)
            .ok_or(AggregatorError::InsufficientFunds)?;
        self.vault.set(balance);
        Ok(())
    }
}

impl LenderConnector for MockConnector {
    fn balance_of_underlying(&self) -> Result<u64> {
        Ok(self.market.get())
    }

    fn supply(&self, amount: u64) -> Result<()> {
        let vault = self
            .vault
            .get()
            .checked_sub(amount)
            .ok_or(AggregatorError::ConnectorCallFailed)?;
        self.vault.set(vault);
        self.market.set(self.market.get() + amount);
        Ok(())
    }

    fn redeem_underlying(&self, amount: u64) -> Result<()> {
        let market = self
            .market
            .get()
            .checked_sub(amount)
            .ok_or(AggregatorError::ConnectorCallFailed)?;
        self.market.set(market);
        self.vault.set(self.vault.get() + amount);
        Ok(())
    }
}

// =============================================================================
// Harness
// =============================================================================

#[derive(Clone)]
pub struct Harness {
    pub aggregator: Aggregator,
    pub token: LenderToken,
    pub connector: MockConnector,

    pub charities: BTreeMap<Pubkey, CharityRecord>,
    pub charity_positions: BTreeMap<Pubkey, CharityPosition>,
    pub positions: BTreeMap<Pubkey, ContributorPosition>,
    pub rewards: BTreeMap<Pubkey, ContributorRewards>,
    pub ledgers: BTreeMap<Pubkey, LegacyLedger>,

    /// Underlying received by the dev / stake fee sinks
    pub dev_sink: u64,
    pub stake_sink: u64,

    /// iHelp held by the reward vault
    pub reward_vault: u64,
}

impl Harness {
    /// Default 10 / 10 / 80 fee split
    pub fn new() -> Self {
        Self::with_fee_split(1_000, 1_000, 8_000)
    }

    pub fn with_fee_split(dev_fee_bps: u16, stake_fee_bps: u16, charity_fee_bps: u16) -> Self {
        Aggregator::validate_fee_split(dev_fee_bps, stake_fee_bps, charity_fee_bps).unwrap();

        let aggregator = Aggregator {
            admin: Pubkey::new_unique(),
            distributor: Pubkey::new_unique(),
            fallback_recipient: Pubkey::new_unique(),
            dev_fee_owner: Pubkey::new_unique(),
            stake_fee_owner: Pubkey::new_unique(),
            reward_mint: Pubkey::new_unique(),
            reward_vault: Pubkey::new_unique(),
            dev_fee_bps,
            stake_fee_bps,
            charity_fee_bps,
            total_weight: 0,
            reward_per_weight: 0,
            total_reward_distributed: 0,
            total_fallback_credited: 0,
            total_reward_claimed: 0,
            last_distribution_time: 0,
            is_paused: false,
            bump: 255,
            reward_vault_bump: 254,
        };

        let token = LenderToken {
            lender_mint: Pubkey::new_unique(),
            underlying_mint: Pubkey::new_unique(),
            underlying_vault: Pubkey::new_unique(),
            connector_program: Pubkey::new_unique(),
            connector_position: Pubkey::new_unique(),
            connector_reserve: Pubkey::new_unique(),
            is_supported: true,
            total_deposited: 0,
            reward_per_unit: 0,
            total_redeemed: 0,
            total_interest_claimed: 0,
            unattributed_interest: 0,
            total_dev_fees: 0,
            total_stake_fees: 0,
            last_redeem_time: 0,
            bump: 255,
            vault_bump: 254,
        };

        Self {
            aggregator,
            token,
            connector: MockConnector::default(),
            charities: BTreeMap::new(),
            charity_positions: BTreeMap::new(),
            positions: BTreeMap::new(),
            rewards: BTreeMap::new(),
            ledgers: BTreeMap::new(),
            dev_sink: 0,
            stake_sink: 0,
            reward_vault: 0,
        }
    }

    /// Run `op` as one transaction: on error every change is rolled back
    fn atomic<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = op(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// A new recognized charity
    pub fn charity(&mut self) -> Pubkey {
        let charity = Pubkey::new_unique();
        self.set_recognition(charity, true);
        charity
    }

    pub fn set_recognition(&mut self, charity: Pubkey, is_recognized: bool) {
        let record = self.charities.entry(charity).or_insert(CharityRecord {
            charity,
            is_recognized,
            registered_at: 0,
            bump: 255,
        });
        record.is_recognized = is_recognized;
    }

    // =========================================================================
    // Accounting Ledger
    // =========================================================================

    pub fn deposit(&mut self, charity: Pubkey, contributor: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|h| {
            h.connector.fund_vault(amount);

            let lender_mint = h.token.lender_mint;
            let record = h
                .charities
                .get(&charity)
                .ok_or(AggregatorError::NotAuthorizedCharity)?;
            let charity_position = h.charity_positions.entry(charity).or_default();
            charity_position.open(charity, lender_mint, 255);
            let contributor_position = h.positions.entry(contributor).or_default();
            contributor_position.open(contributor, lender_mint, 255);
            let contributor_rewards = h.rewards.entry(contributor).or_default();
            contributor_rewards.open(contributor, 255);

            logic::deposit(
                LedgerAccounts {
                    aggregator: &mut h.aggregator,
                    lender_token: &mut h.token,
                    charity_position,
                    contributor_position,
                    contributor_rewards,
                },
                record,
                &h.connector,
                amount,
            )
        })
    }

    pub fn withdraw(&mut self, charity: Pubkey, contributor: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|h| {
            let charity_position = h
                .charity_positions
                .get_mut(&charity)
                .ok_or(AggregatorError::InsufficientFunds)?;
            let contributor_position = h
                .positions
                .get_mut(&contributor)
                .ok_or(AggregatorError::InsufficientFunds)?;
            let contributor_rewards = h
                .rewards
                .get_mut(&contributor)
                .ok_or(AggregatorError::InsufficientFunds)?;

            logic::withdraw(
                LedgerAccounts {
                    aggregator: &mut h.aggregator,
                    lender_token: &mut h.token,
                    charity_position,
                    contributor_position,
                    contributor_rewards,
                },
                &h.connector,
                amount,
            )?;

            h.connector.pay_from_vault(amount)
        })
    }

    // =========================================================================
    // Interest
    // =========================================================================

    pub fn redeem(&mut self) -> Result<InterestOutcome> {
        self.atomic(|h| {
            let outcome = logic::redeem_interest(&h.aggregator, &mut h.token, &h.connector)?;
            if let InterestOutcome::Redeemed { split, .. } = outcome {
                h.connector.pay_from_vault(split.dev)?;
                h.connector.pay_from_vault(split.stake)?;
                h.dev_sink += split.dev;
                h.stake_sink += split.stake;
            }
            Ok(outcome)
        })
    }

    pub fn claim_interest(&mut self, charity: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|h| {
            let charity_position = h
                .charity_positions
                .get_mut(&charity)
                .ok_or(AggregatorError::InsufficientClaimable)?;
            logic::claim_interest(&mut h.token, charity_position, amount)?;
            h.connector.pay_from_vault(amount)
        })
    }

    pub fn sweep_unattributed(&mut self) -> Result<u64> {
        self.atomic(|h| {
            let amount = h.token.take_unattributed()?;
            h.connector.pay_from_vault(amount)?;
            h.dev_sink += amount;
            Ok(amount)
        })
    }

    pub fn generated_interest_of(&self, contributor: Pubkey) -> u64 {
        self.positions
            .get(&contributor)
            .map(|position| logic::generated_interest_of(&self.token, position).unwrap())
            .unwrap_or(0)
    }

    pub fn charity_generated_interest_of(&self, charity: Pubkey) -> u64 {
        self.charity_positions
            .get(&charity)
            .map(|position| logic::generated_interest_of(&self.token, position).unwrap())
            .unwrap_or(0)
    }

    pub fn claimable_reward_of(&self, charity: Pubkey) -> u64 {
        self.charity_positions
            .get(&charity)
            .map(|position| logic::claimable_interest_of(&self.token, position).unwrap())
            .unwrap_or(0)
    }

    // =========================================================================
    // iHelp Rewards
    // =========================================================================

    pub fn distribute(&mut self, amount: u64) -> Result<Distribution> {
        self.atomic(|h| {
            h.reward_vault += amount;
            let fallback_recipient = h.aggregator.fallback_recipient;
            let fallback = h.rewards.entry(fallback_recipient).or_default();
            fallback.open(fallback_recipient, 255);
            logic::distribute_ihelp(&mut h.aggregator, fallback, amount)
        })
    }

    pub fn claim_ihelp(&mut self, contributor: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|h| {
            let rewards = h
                .rewards
                .get_mut(&contributor)
                .ok_or(AggregatorError::InsufficientClaimable)?;
            logic::claim_ihelp_reward(&mut h.aggregator, rewards, amount)?;
            h.reward_vault = h
                .reward_vault
                .checked_sub(amount)
                .ok_or(AggregatorError::InsufficientFunds)?;
            Ok(())
        })
    }

    pub fn claimable_ihelp(&self, contributor: Pubkey) -> u64 {
        self.rewards
            .get(&contributor)
            .map(|rewards| logic::claimable_ihelp_reward_of(&self.aggregator, rewards).unwrap())
            .unwrap_or(0)
    }

    // =========================================================================
    // Legacy Migration
    // =========================================================================

    pub fn stage(
        &mut self,
        charity: Pubkey,
        total_interest_earned: u64,
        claimed_interest: u64,
        entries: &[(Pubkey, u64)],
    ) -> Result<()> {
        self.atomic(|h| {
            let mut ledger = LegacyLedger {
                charity,
                lender_mint: h.token.lender_mint,
                total_interest_earned,
                claimed_interest,
                total_balance: 0,
                entries: Vec::new(),
                migrated_count: 0,
                interest_migrated: false,
                bump: 255,
            };
            let entries: Vec<LegacyEntry> = entries
                .iter()
                .map(|&(contributor, balance)| LegacyEntry {
                    contributor,
                    balance,
                })
                .collect();
            ledger.append(&entries)?;
            h.ledgers.insert(charity, ledger);
            Ok(())
        })
    }

    /// Migrate a page, passing the accounts of the page's funded entries
    pub fn migrate(&mut self, charity: Pubkey, start_index: u32, batch_size: u32) -> Result<MigrationPage> {
        let contributors: Vec<Pubkey> = self
            .ledgers
            .get(&charity)
            .map(|ledger| {
                ledger
                    .entries
                    .iter()
                    .skip(start_index as usize)
                    .take(batch_size as usize)
                    .filter(|entry| entry.balance > 0)
                    .map(|entry| entry.contributor)
                    .collect()
            })
            .unwrap_or_default();
        self.migrate_with(charity, start_index, batch_size, &contributors)
    }

    /// Migrate a page with an explicit list of contributor accounts
    pub fn migrate_with(
        &mut self,
        charity: Pubkey,
        start_index: u32,
        batch_size: u32,
        contributors: &[Pubkey],
    ) -> Result<MigrationPage> {
        self.atomic(|h| {
            let mut ledger = h
                .ledgers
                .remove(&charity)
                .ok_or(AggregatorError::InvalidMigrationCursor)?;
            let plan = logic::plan_page(&h.aggregator, &ledger, start_index, batch_size)?;

            // Charity custody transfers
            h.connector.fund_vault(plan.vault_inflow()?);
            if let Some(split) = plan.interest {
                h.dev_sink += split.dev;
                h.stake_sink += split.stake;
            }

            let lender_mint = h.token.lender_mint;
            let mut positions: Vec<ContributorPosition> = contributors
                .iter()
                .map(|contributor| {
                    let mut position = h.positions.remove(contributor).unwrap_or_default();
                    position.open(*contributor, lender_mint, 255);
                    position
                })
                .collect();
            let mut rewards: Vec<ContributorRewards> = contributors
                .iter()
                .map(|contributor| {
                    let mut rewards = h.rewards.remove(contributor).unwrap_or_default();
                    rewards.open(*contributor, 255);
                    rewards
                })
                .collect();

            let charity_position = h.charity_positions.entry(charity).or_default();
            charity_position.open(charity, lender_mint, 255);

            let page = {
                let mut targets: Vec<MigrationTarget> = positions
                    .iter_mut()
                    .zip(rewards.iter_mut())
                    .map(|(position, rewards)| MigrationTarget { position, rewards })
                    .collect();
                logic::migrate_page(
                    &mut h.aggregator,
                    &mut h.token,
                    charity_position,
                    &mut ledger,
                    &mut targets,
                    &h.connector,
                    &plan,
                )?
            };

            for (position, rewards) in positions.into_iter().zip(rewards) {
                h.positions.insert(position.contributor, position);
                h.rewards.insert(rewards.contributor, rewards);
            }
            h.ledgers.insert(charity, ledger);

            Ok(page)
        })
    }

    // =========================================================================
    // Invariants
    // =========================================================================

    /// Ledger-wide properties that must hold after every call
    pub fn assert_conserved(&self) {
        let contributor_total: u64 = self.positions.values().map(|p| p.balance).sum();
        let charity_total: u64 = self.charity_positions.values().map(|p| p.balance).sum();
        assert_eq!(contributor_total, self.token.total_deposited);
        assert_eq!(charity_total, self.token.total_deposited);

        let weight_total: u64 = self.rewards.values().map(|r| r.checkpoint.weight).sum();
        assert_eq!(weight_total, self.aggregator.total_weight);
        assert_eq!(self.aggregator.total_weight, self.token.total_deposited);

        // Everything the vault holds is owed to charities or held unattributed
        let outstanding = self.token.total_redeemed - self.token.total_interest_claimed
            + self.token.unattributed_interest;
        assert_eq!(self.connector.vault(), outstanding);

        // Attributed interest never exceeds what was redeemed for charities
        let generated: u64 = self
            .charity_positions
            .keys()
            .map(|charity| self.charity_generated_interest_of(*charity))
            .sum();
        assert!(generated <= self.token.total_redeemed);
        let contributor_generated: u64 = self
            .positions
            .keys()
            .map(|contributor| self.generated_interest_of(*contributor))
            .sum();
        assert!(contributor_generated <= self.token.total_redeemed);
    }
}
