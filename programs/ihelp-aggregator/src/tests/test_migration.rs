use super::*;
use crate::constants::MAX_MIGRATION_BATCH;

#[test]
fn test_migration_imports_balances_and_interest() {
    let mut h = Harness::new();
    let charity = h.charity();
    let alice = Pubkey::new_unique();
    let dormant = Pubkey::new_unique();
    let carol = Pubkey::new_unique();

    // 800 unclaimed legacy interest
    h.stage(charity, 1_000, 200, &[(alice, 300), (dormant, 0), (carol, 700)])
        .unwrap();

    let page = h.migrate(charity, 0, 2).unwrap();
    assert_eq!(page.principal, 300);
    assert_eq!(
        page.interest,
        Some(FeeSplit {
            dev: 80,
            stake: 80,
            charity: 640,
        })
    );
    assert_eq!(page.migrated_count, 2);
    assert!(!page.complete);

    // Consistent after the first page already
    assert_eq!(h.claimable_reward_of(charity), 640);
    assert_eq!(h.positions[&alice].balance, 300);
    assert!(!h.positions.contains_key(&dormant));
    assert_eq!(h.token.total_deposited, 300);
    assert_eq!(h.dev_sink, 80);
    assert_eq!(h.stake_sink, 80);
    h.assert_conserved();

    let page = h.migrate(charity, 2, 2).unwrap();
    assert_eq!(page.principal, 700);
    assert_eq!(page.interest, None);
    assert!(page.complete);

    assert_eq!(h.charity_positions[&charity].balance, 1_000);
    assert_eq!(h.token.total_deposited, 1_000);
    assert_eq!(h.aggregator.total_weight, 1_000);
    assert_eq!(h.claimable_reward_of(charity), 640);
    h.assert_conserved();
}

#[test]
fn test_migrated_ledger_accrues_like_direct_deposits() {
    let alice = Pubkey::new_unique();
    let carol = Pubkey::new_unique();

    let mut migrated = Harness::new();
    let charity = migrated.charity();
    migrated
        .stage(charity, 0, 0, &[(alice, 300), (carol, 700)])
        .unwrap();
    migrated.migrate(charity, 0, 2).unwrap();

    let mut direct = Harness::new();
    let direct_charity = direct.charity();
    direct.deposit(direct_charity, alice, 300).unwrap();
    direct.deposit(direct_charity, carol, 700).unwrap();

    for h in [&mut migrated, &mut direct] {
        h.connector.accrue(100);
        h.redeem().unwrap();
        h.distribute(1_000).unwrap();
    }

    assert_eq!(migrated.generated_interest_of(alice), 24);
    assert_eq!(migrated.generated_interest_of(carol), 56);
    for contributor in [alice, carol] {
        assert_eq!(
            migrated.generated_interest_of(contributor),
            direct.generated_interest_of(contributor)
        );
        assert_eq!(
            migrated.claimable_ihelp(contributor),
            direct.claimable_ihelp(contributor)
        );
    }
    assert_eq!(
        migrated.claimable_reward_of(charity),
        direct.claimable_reward_of(direct_charity)
    );
}

#[test]
fn test_migration_adds_to_existing_positions() {
    let mut h = Harness::with_fee_split(0, 0, 10_000);
    let charity = h.charity();
    let alice = Pubkey::new_unique();

    h.deposit(charity, alice, 500).unwrap();
    h.connector.accrue(50);
    h.redeem().unwrap();

    h.stage(charity, 30, 0, &[(alice, 500)]).unwrap();
    h.migrate(charity, 0, 1).unwrap();

    assert_eq!(h.positions[&alice].balance, 1_000);
    // Interest earned before the import is kept, not re-weighted
    assert_eq!(h.generated_interest_of(alice), 50);
    assert_eq!(h.claimable_reward_of(charity), 80);
    h.assert_conserved();
}

#[test]
fn test_migration_cursor_prevents_replay() {
    let mut h = Harness::new();
    let charity = h.charity();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();

    h.stage(charity, 100, 0, &[(alice, 10), (bob, 20)]).unwrap();

    assert_err(h.migrate(charity, 1, 1), AggregatorError::InvalidMigrationCursor);
    assert_err(h.migrate(charity, 0, 0), AggregatorError::InvalidMigrationBatch);
    assert_err(
        h.migrate(charity, 0, MAX_MIGRATION_BATCH + 1),
        AggregatorError::InvalidMigrationBatch,
    );

    h.migrate(charity, 0, 1).unwrap();
    assert_err(h.migrate(charity, 0, 1), AggregatorError::InvalidMigrationCursor);

    h.migrate(charity, 1, 1).unwrap();
    assert_err(h.migrate(charity, 2, 1), AggregatorError::InvalidMigrationCursor);

    // Interest was folded in exactly once
    assert_eq!(h.claimable_reward_of(charity), 80);
    assert_eq!(h.positions[&alice].balance, 10);
    assert_eq!(h.positions[&bob].balance, 20);
    h.assert_conserved();
}

#[test]
fn test_migration_rejects_wrong_accounts() {
    let mut h = Harness::new();
    let charity = h.charity();
    let alice = Pubkey::new_unique();
    let bob = Pubkey::new_unique();
    let mallory = Pubkey::new_unique();

    h.stage(charity, 0, 0, &[(alice, 10), (bob, 20)]).unwrap();

    assert_err(
        h.migrate_with(charity, 0, 2, &[alice]),
        AggregatorError::MigrationAccountMismatch,
    );
    assert_err(
        h.migrate_with(charity, 0, 2, &[alice, mallory]),
        AggregatorError::MigrationAccountMismatch,
    );
    assert_err(
        h.migrate_with(charity, 0, 2, &[bob, alice]),
        AggregatorError::MigrationAccountMismatch,
    );

    // Nothing was applied
    assert_eq!(h.ledgers[&charity].migrated_count, 0);
    assert_eq!(h.token.total_deposited, 0);
    assert_eq!(h.connector.vault(), 0);

    h.migrate_with(charity, 0, 2, &[alice, bob]).unwrap();
    assert!(h.ledgers[&charity].is_complete());
}

#[test]
fn test_empty_ledger_migrates_interest_only() {
    let mut h = Harness::new();
    let charity = h.charity();

    h.stage(charity, 100, 0, &[]).unwrap();

    let page = h.migrate(charity, 0, 1).unwrap();
    assert_eq!(page.principal, 0);
    assert!(page.complete);
    assert_eq!(h.claimable_reward_of(charity), 80);
    assert_eq!(h.token.total_deposited, 0);

    assert_err(h.migrate(charity, 0, 1), AggregatorError::InvalidMigrationCursor);

    h.claim_interest(charity, 80).unwrap();
    h.assert_conserved();
}
