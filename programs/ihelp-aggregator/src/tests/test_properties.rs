//! Ledger-wide properties over random operation sequences

use proptest::prelude::*;

use super::*;

const CHARITIES: usize = 3;
const CONTRIBUTORS: usize = 4;

// =============================================================================
// Strategies
// =============================================================================

/// One externally triggered event. Percentages pick an amount relative to
/// what is currently available so most steps hit the success path.
#[derive(Clone, Debug)]
enum Step {
    Deposit {
        charity: usize,
        contributor: usize,
        amount: u64,
    },
    Withdraw {
        charity: usize,
        contributor: usize,
        percent: u64,
    },
    /// Market yield followed by a redemption
    Accrue(u64),
    /// Market loss followed by a redemption attempt
    Shrink(u64),
    Distribute(u64),
    ClaimInterest {
        charity: usize,
        percent: u64,
    },
    ClaimIhelp {
        contributor: usize,
        percent: u64,
    },
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..CHARITIES, 0..CONTRIBUTORS, 1u64..10_000).prop_map(
            |(charity, contributor, amount)| Step::Deposit {
                charity,
                contributor,
                amount,
            }
        ),
        2 => (0..CHARITIES, 0..CONTRIBUTORS, 0u64..=100).prop_map(
            |(charity, contributor, percent)| Step::Withdraw {
                charity,
                contributor,
                percent,
            }
        ),
        2 => (0u64..2_000).prop_map(Step::Accrue),
        1 => (0u64..500).prop_map(Step::Shrink),
        2 => (0u64..5_000).prop_map(Step::Distribute),
        1 => (0..CHARITIES, 0u64..=100)
            .prop_map(|(charity, percent)| Step::ClaimInterest { charity, percent }),
        1 => (0..CONTRIBUTORS, 0u64..=100)
            .prop_map(|(contributor, percent)| Step::ClaimIhelp {
                contributor,
                percent,
            }),
    ]
}

fn percent_of(amount: u64, percent: u64) -> u64 {
    amount * percent / 100
}

// =============================================================================
// Driver
// =============================================================================

fn apply(h: &mut Harness, charities: &[Pubkey], contributors: &[Pubkey], step: &Step) {
    // Failed steps roll back inside the harness; the properties must hold
    // whether a step succeeded or not
    match *step {
        Step::Deposit {
            charity,
            contributor,
            amount,
        } => {
            let _ = h.deposit(charities[charity], contributors[contributor], amount);
        }
        Step::Withdraw {
            charity,
            contributor,
            percent,
        } => {
            let (charity, contributor) = (charities[charity], contributors[contributor]);
            let contributor_balance = h.positions.get(&contributor).map_or(0, |p| p.balance);
            let charity_balance = h.charity_positions.get(&charity).map_or(0, |p| p.balance);
            let amount = percent_of(contributor_balance.min(charity_balance), percent);
            let _ = h.withdraw(charity, contributor, amount);
        }
        Step::Accrue(amount) => {
            h.connector.accrue(amount);
            let _ = h.redeem();
        }
        Step::Shrink(amount) => {
            h.connector.shrink(amount.min(h.connector.market()));
            let _ = h.redeem();
        }
        Step::Distribute(amount) => {
            let _ = h.distribute(amount);
        }
        Step::ClaimInterest { charity, percent } => {
            let charity = charities[charity];
            let amount = percent_of(h.claimable_reward_of(charity), percent);
            let _ = h.claim_interest(charity, amount);
        }
        Step::ClaimIhelp {
            contributor,
            percent,
        } => {
            let contributor = contributors[contributor];
            let amount = percent_of(h.claimable_ihelp(contributor), percent);
            let _ = h.claim_ihelp(contributor, amount);
        }
    }
}

/// Accumulator values seen after the previous step
struct Watermark {
    reward_per_unit: u128,
    reward_per_weight: u128,
}

fn check(h: &Harness, last: &mut Watermark) {
    h.assert_conserved();

    assert!(h.token.reward_per_unit >= last.reward_per_unit);
    assert!(h.aggregator.reward_per_weight >= last.reward_per_weight);
    last.reward_per_unit = h.token.reward_per_unit;
    last.reward_per_weight = h.aggregator.reward_per_weight;

    // Charities can never claim more than was redeemed for them
    let claimable: u64 = h
        .charity_positions
        .keys()
        .map(|charity| h.claimable_reward_of(*charity))
        .sum();
    assert!(claimable + h.token.total_interest_claimed <= h.token.total_redeemed);

    // Nor contributors more iHelp than was distributed
    let claimable_ihelp: u64 = h
        .rewards
        .keys()
        .map(|contributor| h.claimable_ihelp(*contributor))
        .sum();
    assert!(
        claimable_ihelp + h.aggregator.total_reward_claimed
            <= h.aggregator.total_reward_distributed
    );
    assert_eq!(
        h.reward_vault,
        h.aggregator.total_reward_distributed - h.aggregator.total_reward_claimed
    );
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_ledger_invariants_hold_after_every_step(
        steps in prop::collection::vec(step(), 1..48)
    ) {
        let mut h = Harness::new();
        let charities: Vec<Pubkey> = (0..CHARITIES).map(|_| h.charity()).collect();
        let contributors: Vec<Pubkey> = (0..CONTRIBUTORS).map(|_| Pubkey::new_unique()).collect();
        let mut last = Watermark {
            reward_per_unit: 0,
            reward_per_weight: 0,
        };

        for step in &steps {
            apply(&mut h, &charities, &contributors, step);
            check(&h, &mut last);
        }
    }

    #[test]
    fn prop_full_withdrawal_empties_the_ledger(
        deposits in prop::collection::vec(
            (0..CHARITIES, 0..CONTRIBUTORS, 1u64..10_000),
            1..16
        ),
        yield_amount in 0u64..2_000,
    ) {
        let mut h = Harness::new();
        let charities: Vec<Pubkey> = (0..CHARITIES).map(|_| h.charity()).collect();
        let contributors: Vec<Pubkey> = (0..CONTRIBUTORS).map(|_| Pubkey::new_unique()).collect();

        let mut deposited = BTreeMap::new();
        for &(charity, contributor, amount) in &deposits {
            h.deposit(charities[charity], contributors[contributor], amount).unwrap();
            *deposited.entry((charity, contributor)).or_insert(0u64) += amount;
        }
        h.connector.accrue(yield_amount);
        h.redeem().unwrap();

        for (&(charity, contributor), &amount) in &deposited {
            h.withdraw(charities[charity], contributors[contributor], amount).unwrap();
        }

        prop_assert_eq!(h.token.total_deposited, 0);
        prop_assert_eq!(h.aggregator.total_weight, 0);
        prop_assert_eq!(h.connector.market(), 0);
        h.assert_conserved();
    }
}
