#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Property-based tests for reward accrual.
//!
//! Invariants tested:
//! - `acc_reward_per_share` never decreases as blocks advance
//! - Refreshing a pool twice in the same block changes nothing
//! - The quoted `pending_reward` is exactly what `claim` pays
//! - A rate change prices earlier blocks at the old rate and later blocks at the new one

use proptest::prelude::*;
use soroban_sdk::testutils::Address as _;
use soroban_sdk::Address;

use crate::common::{farm, mint, set_block, token};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// For any deposit schedule over non-decreasing blocks the accumulator
    /// never goes down.
    #[test]
    fn prop_accumulator_non_decreasing(
        rate in 0i128..1_000_000,
        steps in proptest::collection::vec((0u32..30, 1i128..50_000), 1..12),
    ) {
        let f = farm(rate);
        let lp = token(&f.env);
        f.client.add_pool(&f.admin, &lp, &7, &false);

        let mut block = 0u32;
        let mut previous = 0i128;
        for (advance, amount) in steps {
            block += advance;
            set_block(&f.env, block);

            let user = Address::generate(&f.env);
            mint(&f.env, &lp, &user, amount);
            f.client.deposit(&user, &lp, &amount, &false);

            let acc = f.client.get_pool(&lp).acc_reward_per_share;
            prop_assert!(acc >= previous, "accumulator fell from {} to {}", previous, acc);
            previous = acc;
        }
    }

    /// `update_pool` at an unchanged block is a no-op.
    #[test]
    fn prop_update_pool_idempotent(
        rate in 0i128..1_000_000,
        weight in 1u32..100,
        other_weight in 0u32..100,
        amount in 1i128..1_000_000,
        blocks in 0u32..500,
    ) {
        let f = farm(rate);
        let lp = token(&f.env);
        let other = token(&f.env);
        f.client.add_pool(&f.admin, &lp, &weight, &false);
        f.client.add_pool(&f.admin, &other, &other_weight, &false);

        let user = Address::generate(&f.env);
        mint(&f.env, &lp, &user, amount);
        f.client.deposit(&user, &lp, &amount, &false);

        set_block(&f.env, blocks);
        let once = f.client.update_pool(&lp);
        let twice = f.client.update_pool(&lp);
        prop_assert_eq!(once, twice);
    }

    /// The read-only quote and the settling claim agree to the unit.
    #[test]
    fn prop_pending_equals_claim(
        rate in 0i128..10_000_000,
        weight in 1u32..100,
        other_weight in 0u32..100,
        first in 1i128..1_000_000,
        second in 1i128..1_000_000,
        gap in 0u32..200,
        blocks in 0u32..200,
    ) {
        let f = farm(rate);
        let lp = token(&f.env);
        let other = token(&f.env);
        f.client.add_pool(&f.admin, &lp, &weight, &false);
        f.client.add_pool(&f.admin, &other, &other_weight, &false);

        let alice = Address::generate(&f.env);
        let bob = Address::generate(&f.env);
        mint(&f.env, &lp, &alice, first);
        mint(&f.env, &lp, &bob, second);

        f.client.deposit(&alice, &lp, &first, &false);
        set_block(&f.env, gap);
        f.client.deposit(&bob, &lp, &second, &false);
        set_block(&f.env, gap + blocks);

        let quoted_alice = f.client.pending_reward(&lp, &alice);
        let quoted_bob = f.client.pending_reward(&lp, &bob);
        prop_assert!(quoted_alice >= 0 && quoted_bob >= 0);
        prop_assert_eq!(f.client.claim(&alice, &lp), quoted_alice);
        prop_assert_eq!(f.client.claim(&bob, &lp), quoted_bob);
        prop_assert_eq!(f.client.pending_reward(&lp, &alice), 0);
    }

    /// With a single unit staked every emitted reward lands in the user's
    /// position untruncated, so the split around a rate change is exact.
    #[test]
    fn prop_rate_change_splits_at_change_block(
        old_rate in 0i128..1_000_000,
        new_rate in 0i128..1_000_000,
        before in 0u32..300,
        after in 0u32..300,
    ) {
        let f = farm(old_rate);
        let lp = token(&f.env);
        f.client.add_pool(&f.admin, &lp, &1, &false);

        let user = Address::generate(&f.env);
        mint(&f.env, &lp, &user, 1);
        f.client.deposit(&user, &lp, &1, &false);

        set_block(&f.env, before);
        f.client.set_reward_per_block(&f.admin, &new_rate);
        prop_assert_eq!(
            f.client.pending_reward(&lp, &user),
            old_rate * before as i128
        );

        set_block(&f.env, before + after);
        prop_assert_eq!(
            f.client.pending_reward(&lp, &user),
            old_rate * before as i128 + new_rate * after as i128
        );
    }
}
