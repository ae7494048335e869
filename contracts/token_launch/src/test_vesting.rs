#![allow(clippy::unwrap_used)]

use crate::test::{Setup, END, START};
use crate::{AllocationCategory, CategoryGrant, Error, VestingConfig};
use soroban_sdk::{testutils::Address as _, vec, Address};

const MONTH: u64 = 30 * 24 * 60 * 60;

fn vested_sale(s: &Setup, vesting: VestingConfig) -> (u64, Address, Address) {
    let mut params = s.standard_params();
    params.vesting = vesting;
    let sale_id = s.create(&params);
    let alice = s.participant(1_000);
    let bob = s.participant(1_000);
    s.set_time(START);
    s.client.commit(&sale_id, &alice, &300);
    s.client.commit(&sale_id, &bob, &250);
    s.close(sale_id);
    s.client.run_settlement(&sale_id, &0);
    (sale_id, alice, bob)
}

#[test]
fn test_nothing_claimable_before_cliff() {
    let s = Setup::new();
    let (sale_id, alice, _) = vested_sale(
        &s,
        VestingConfig {
            cliff_months: 1,
            vesting_months: 4,
        },
    );

    assert_eq!(s.client.claim(&sale_id, &alice, &AllocationCategory::PublicSale), 0);
    s.set_time(END + MONTH - 1);
    assert_eq!(s.client.claim(&sale_id, &alice, &AllocationCategory::PublicSale), 0);
    assert_eq!(s.sale_token.balance(&alice), 0);

    let view = s
        .client
        .get_allocation(&sale_id, &alice, &AllocationCategory::PublicSale);
    assert_eq!((view.token_amount, view.claimed_amount, view.claimable), (30, 0, 0));
}

#[test]
fn test_linear_claims_after_cliff() {
    let s = Setup::new();
    let (sale_id, alice, bob) = vested_sale(
        &s,
        VestingConfig {
            cliff_months: 1,
            vesting_months: 4,
        },
    );
    let public = AllocationCategory::PublicSale;

    // halfway through the linear period
    s.set_time(END + 3 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &alice, &public), 15);
    assert_eq!(s.client.claim(&sale_id, &alice, &public), 0);
    assert_eq!(s.sale_token.balance(&alice), 15);

    s.set_time(END + 4 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &alice, &public), 7);

    s.set_time(END + 5 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &alice, &public), 8);
    assert_eq!(s.client.claim(&sale_id, &bob, &public), 25);

    s.set_time(END + 50 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &alice, &public), 0);

    let view = s.client.get_allocation(&sale_id, &alice, &public);
    assert_eq!((view.claimed_amount, view.claimable), (30, 0));
    assert_eq!(s.sale_token.balance(&alice), 30);
    assert_eq!(s.sale_token.balance(&bob), 25);
    // everything allocated has left escrow; the rest went back at settlement
    assert_eq!(s.sale_token.balance(&s.contract_id), 0);
}

#[test]
fn test_unvested_allocation_claims_at_once() {
    let s = Setup::new();
    let (sale_id, alice, _) = vested_sale(&s, VestingConfig::default());

    assert_eq!(
        s.client
            .claim(&sale_id, &alice, &AllocationCategory::PublicSale),
        30
    );
    assert_eq!(
        s.client
            .claim(&sale_id, &alice, &AllocationCategory::PublicSale),
        0
    );
}

#[test]
fn test_claim_without_allocation_rejected() {
    let s = Setup::new();
    let sale_id = s.create(&s.standard_params());
    let alice = s.participant(1_000);
    s.set_time(START);
    s.client.commit(&sale_id, &alice, &600);

    // not settled yet
    assert_eq!(
        s.client
            .try_claim(&sale_id, &alice, &AllocationCategory::PublicSale),
        Err(Ok(Error::AllocationNotFound))
    );

    s.close(sale_id);
    s.client.run_settlement(&sale_id, &0);
    assert_eq!(
        s.client
            .try_claim(&sale_id, &alice, &AllocationCategory::Developer),
        Err(Ok(Error::AllocationNotFound))
    );
    let stranger = Address::generate(&s.env);
    assert_eq!(
        s.client
            .try_claim(&sale_id, &stranger, &AllocationCategory::PublicSale),
        Err(Ok(Error::AllocationNotFound))
    );
}

#[test]
fn test_grant_follows_its_own_schedule() {
    let s = Setup::new();
    let developer = Address::generate(&s.env);
    let mut params = s.standard_params();
    params.grants = vec![
        &s.env,
        CategoryGrant {
            category: AllocationCategory::Developer,
            beneficiary: developer.clone(),
            amount: 40,
            vesting: VestingConfig {
                cliff_months: 6,
                vesting_months: 12,
            },
        },
    ];
    let sale_id = s.create(&params);
    let alice = s.participant(1_000);
    s.set_time(START);
    s.client.commit(&sale_id, &alice, &500);
    s.close(sale_id);
    s.client.run_settlement(&sale_id, &0);

    let dev = AllocationCategory::Developer;
    // public allocations are unvested, the grant is not
    assert_eq!(
        s.client
            .claim(&sale_id, &alice, &AllocationCategory::PublicSale),
        50
    );
    assert_eq!(s.client.claim(&sale_id, &developer, &dev), 0);

    s.set_time(END + 6 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &developer, &dev), 0);

    s.set_time(END + 9 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &developer, &dev), 10);

    s.set_time(END + 18 * MONTH);
    assert_eq!(s.client.claim(&sale_id, &developer, &dev), 30);
    assert_eq!(s.sale_token.balance(&developer), 40);
}

#[test]
fn test_claimable_never_decreases() {
    let s = Setup::new();
    let (sale_id, alice, _) = vested_sale(
        &s,
        VestingConfig {
            cliff_months: 2,
            vesting_months: 7,
        },
    );

    let mut last = 0;
    let mut now = END;
    while now <= END + 10 * MONTH {
        s.set_time(now);
        let view = s
            .client
            .get_allocation(&sale_id, &alice, &AllocationCategory::PublicSale);
        assert!(view.claimable >= last);
        assert!(view.claimable <= view.token_amount);
        last = view.claimable;
        now += MONTH / 3;
    }
    assert_eq!(last, 30);
}
