// =============================================================================
// iHelp Aggregator - Donation Ledger Program
// =============================================================================
//
// Charities deposit contributors' funds into lending markets. The principal
// stays redeemable; the yield is the donation:
// - Interest is realised per lender token and split dev / stake / charity
// - The charity share is attributed to contributors and charities through a
//   pull-based reward_per_unit accumulator
// - iHelp emissions are spread over everything deposited through a second,
//   global reward_per_weight accumulator
// - Legacy per-charity ledgers are imported page by page through migrate
//
// This is the main entry point for the aggregator Anchor program.
// =============================================================================

pub mod connector;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod logic;
pub mod state;

#[cfg(test)]
mod tests;

use anchor_lang::prelude::*;

pub use constants::*;
pub use error::*;
pub use events::*;
pub use instructions::*;
pub use state::*;

declare_id!("gNXy3yggRY7zU2NSHBhPjzmNuZoediK14TSNcfZPU73");

#[program]
pub mod ihelp_aggregator {
    use super::*;

    // =========================================================================
    // Setup
    // =========================================================================

    /// Create the aggregator and its iHelp reward vault
    ///
    /// # Arguments
    /// * `distributor` - Authorized to call distribute_ihelp
    /// * `fallback_recipient` - Receives emissions made while nothing is deposited
    /// * `dev_fee_owner` - Owner of the developer fee token accounts
    /// * `stake_fee_owner` - Owner of the stakeholder fee token accounts
    pub fn initialize(
        ctx: Context<Initialize>,
        distributor: Pubkey,
        fallback_recipient: Pubkey,
        dev_fee_owner: Pubkey,
        stake_fee_owner: Pubkey,
    ) -> Result<()> {
        instructions::initialize::handler_initialize(
            ctx,
            distributor,
            fallback_recipient,
            dev_fee_owner,
            stake_fee_owner,
        )
    }

    /// Register a lender token and the connector serving it (admin only)
    pub fn register_lender_token(ctx: Context<RegisterLenderToken>) -> Result<()> {
        instructions::register_lender_token::handler_register_lender_token(ctx)
    }

    /// Enable or disable deposits of a lender token (admin only)
    pub fn set_token_support(ctx: Context<SetTokenSupport>, is_supported: bool) -> Result<()> {
        instructions::register_lender_token::handler_set_token_support(ctx, is_supported)
    }

    /// Recognize or revoke a charity in the host registry (admin only)
    pub fn set_charity_recognition(
        ctx: Context<SetCharityRecognition>,
        is_recognized: bool,
    ) -> Result<()> {
        instructions::set_charity_recognition::handler_set_charity_recognition(ctx, is_recognized)
    }

    /// Create a contributor's position and emission checkpoint ahead of migration
    pub fn open_contributor_accounts(ctx: Context<OpenContributorAccounts>) -> Result<()> {
        instructions::open_contributor_accounts::handler_open_contributor_accounts(ctx)
    }

    // =========================================================================
    // Accounting Ledger
    // =========================================================================

    /// Deposit underlying for a contributor through a recognized charity
    ///
    /// # Arguments
    /// * `amount` - Underlying to deposit (in base units)
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<()> {
        instructions::deposit::handler_deposit(ctx, amount)
    }

    /// Withdraw a contributor's principal to a recipient
    ///
    /// # Arguments
    /// * `amount` - Underlying to withdraw (in base units)
    pub fn withdraw(ctx: Context<Withdraw>, amount: u64) -> Result<()> {
        instructions::withdraw::handler_withdraw(ctx, amount)
    }

    // =========================================================================
    // Interest
    // =========================================================================

    /// Realise a lender token's accrued yield and split it (permissionless)
    ///
    /// # Fee Distribution
    /// * dev_fee_bps to the developer sink
    /// * stake_fee_bps to the stakeholder sink
    /// * the rest is attributed to charities through reward_per_unit
    pub fn redeem_interest(ctx: Context<RedeemInterest>) -> Result<()> {
        instructions::redeem_interest::handler_redeem_interest(ctx)
    }

    /// Pull claimable interest out to a recipient (charity only)
    pub fn claim_interest(ctx: Context<ClaimInterest>, amount: u64) -> Result<()> {
        instructions::claim_interest::handler_claim_interest(ctx, amount)
    }

    /// Interest generated by a contributor's deposits of one lender token
    pub fn generated_interest_of(ctx: Context<ContributorInterestView>) -> Result<u64> {
        instructions::views::handler_generated_interest_of(ctx)
    }

    /// Interest generated by everything deposited through a charity
    pub fn charity_generated_interest_of(ctx: Context<CharityInterestView>) -> Result<u64> {
        instructions::views::handler_charity_generated_interest_of(ctx)
    }

    /// Interest a charity can still claim
    pub fn claimable_reward_of(ctx: Context<CharityInterestView>) -> Result<u64> {
        instructions::views::handler_claimable_reward_of(ctx)
    }

    // =========================================================================
    // iHelp Rewards
    // =========================================================================

    /// Push an iHelp emission into the global accumulator (distributor only)
    pub fn distribute_ihelp(ctx: Context<DistributeIhelp>, amount: u64) -> Result<()> {
        instructions::distribute_ihelp::handler_distribute_ihelp(ctx, amount)
    }

    /// iHelp a contributor can claim
    pub fn claimable_ihelp_reward_of(ctx: Context<IhelpRewardView>) -> Result<u64> {
        instructions::views::handler_claimable_ihelp_reward_of(ctx)
    }

    /// Claim accrued iHelp
    pub fn claim_ihelp_reward(ctx: Context<ClaimIhelpReward>, amount: u64) -> Result<()> {
        instructions::claim_ihelp_reward::handler_claim_ihelp_reward(ctx, amount)
    }

    // =========================================================================
    // Legacy Migration
    // =========================================================================

    /// Stage a charity's legacy ledger for one lender token (admin only)
    pub fn stage_legacy_ledger(
        ctx: Context<StageLegacyLedger>,
        total_interest_earned: u64,
        claimed_interest: u64,
    ) -> Result<()> {
        instructions::stage_legacy_ledger::handler_stage_legacy_ledger(
            ctx,
            total_interest_earned,
            claimed_interest,
        )
    }

    /// Add contributor balances to a staged legacy ledger (admin only)
    pub fn append_legacy_entries(
        ctx: Context<AppendLegacyEntries>,
        entries: Vec<LegacyEntry>,
    ) -> Result<()> {
        instructions::stage_legacy_ledger::handler_append_legacy_entries(ctx, entries)
    }

    /// Import one page of the caller's legacy ledger
    ///
    /// # Arguments
    /// * `start_index` - Must equal the ledger's migrated_count
    /// * `batch_size` - Entries to import, at most MAX_MIGRATION_BATCH
    ///
    /// Remaining accounts: [ContributorPosition, ContributorRewards] per entry
    /// with a non-zero balance, in ledger order
    pub fn migrate<'info>(
        ctx: Context<'_, '_, 'info, 'info, Migrate<'info>>,
        start_index: u32,
        batch_size: u32,
    ) -> Result<()> {
        instructions::migrate::handler_migrate(ctx, start_index, batch_size)
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Change the interest fee split (admin only)
    ///
    /// # Requirements
    /// * All three must sum to exactly 10000 (100%)
    /// * Charity share must be at least 50%
    pub fn update_fee_split(
        ctx: Context<UpdateConfig>,
        dev_fee_bps: u16,
        stake_fee_bps: u16,
        charity_fee_bps: u16,
    ) -> Result<()> {
        instructions::admin::handler_update_fee_split(ctx, dev_fee_bps, stake_fee_bps, charity_fee_bps)
    }

    /// Pause or unpause the aggregator (admin only)
    pub fn set_paused(ctx: Context<UpdateConfig>, paused: bool) -> Result<()> {
        instructions::admin::handler_set_paused(ctx, paused)
    }

    /// Hand admin rights to a new key (admin only)
    pub fn transfer_admin(ctx: Context<UpdateConfig>, new_admin: Pubkey) -> Result<()> {
        instructions::admin::handler_transfer_admin(ctx, new_admin)
    }

    /// Replace the iHelp distributor (admin only)
    pub fn update_distributor(ctx: Context<UpdateConfig>, new_distributor: Pubkey) -> Result<()> {
        instructions::admin::handler_update_distributor(ctx, new_distributor)
    }

    /// Send interest that arrived while nothing was deposited to the dev sink (admin only)
    pub fn sweep_unattributed_interest(ctx: Context<SweepUnattributedInterest>) -> Result<()> {
        instructions::admin::handler_sweep_unattributed_interest(ctx)
    }
}
