// =============================================================================
// Legacy Ledger State Account
// =============================================================================
// Snapshot of one charity's pre-aggregator ledger for one lender token:
// per-contributor balances plus the charity's lifetime interest figures.
// The admin stages it, the charity consumes it page by page through migrate.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::MAX_LEGACY_ENTRIES;
use crate::error::AggregatorError;

/// One contributor's balance in the legacy ledger
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct LegacyEntry {
    pub contributor: Pubkey,
    pub balance: u64,
}

/// PDA: ["legacy_ledger", charity, lender_mint]
#[account]
#[derive(InitSpace)]
pub struct LegacyLedger {
    pub charity: Pubkey,
    pub lender_mint: Pubkey,

    /// Interest the legacy ledger ever generated for the charity
    pub total_interest_earned: u64,

    /// Part of it the charity already withdrew
    pub claimed_interest: u64,

    /// Sum of entry balances
    pub total_balance: u64,

    #[max_len(MAX_LEGACY_ENTRIES)]
    pub entries: Vec<LegacyEntry>,

    /// Entries imported so far; next migrate must start here
    pub migrated_count: u32,

    /// Legacy unclaimed interest has been folded in
    pub interest_migrated: bool,

    pub bump: u8,
}

impl LegacyLedger {
    /// Legacy interest the charity never claimed
    pub fn unclaimed_interest(&self) -> Result<u64> {
        self.total_interest_earned
            .checked_sub(self.claimed_interest)
            .ok_or(error!(AggregatorError::InvalidLegacyInterest))
    }

    /// Entries may only change before the first page is migrated
    pub fn is_sealed(&self) -> bool {
        self.migrated_count > 0 || self.interest_migrated
    }

    pub fn is_complete(&self) -> bool {
        self.migrated_count as usize == self.entries.len()
    }

    pub fn append(&mut self, entries: &[LegacyEntry]) -> Result<()> {
        require!(!self.is_sealed(), AggregatorError::LegacyLedgerSealed);
        require!(
            self.entries.len() + entries.len() <= MAX_LEGACY_ENTRIES,
            AggregatorError::LegacyLedgerFull
        );

        for entry in entries {
            require!(
                !self.entries.iter().any(|e| e.contributor == entry.contributor),
                AggregatorError::DuplicateLegacyContributor
            );
            self.total_balance = self
                .total_balance
                .checked_add(entry.balance)
                .ok_or(AggregatorError::MathOverflow)?;
            self.entries.push(*entry);
        }

        Ok(())
    }

    /// Bounds of the page starting at `start_index`.
    ///
    /// `start_index` must equal migrated_count so a page can never be imported
    /// twice or skipped.
    pub fn page(&self, start_index: u32, batch_size: u32) -> Result<(usize, usize)> {
        require!(
            start_index == self.migrated_count,
            AggregatorError::InvalidMigrationCursor
        );
        // A ledger with no entries still needs one page to carry its interest
        require!(
            !self.is_complete() || !self.interest_migrated,
            AggregatorError::InvalidMigrationCursor
        );

        let start = start_index as usize;
        let end = start
            .checked_add(batch_size as usize)
            .ok_or(AggregatorError::MathOverflow)?
            .min(self.entries.len());

        Ok((start, end))
    }

    /// Sum of balances in `entries[start..end]`
    pub fn page_principal(&self, start: usize, end: usize) -> Result<u64> {
        self.entries[start..end]
            .iter()
            .try_fold(0u64, |acc, e| acc.checked_add(e.balance))
            .ok_or(error!(AggregatorError::MathOverflow))
    }
}
