//! # Withdrawal Mode Flows
//!
//! How an exchange ends up in withdrawal mode, and what users can still do
//! once it is there.
//!
//! ## Triggers Tested:
//!
//! 1. **Deposit aging**: an unprocessed deposit older than the max age
//! 2. **Withdrawal-request aging**: same for an on-chain withdrawal request
//! 3. **Shutdown timer**: `base + delta * numAccounts` after `shutdown`
//!
//! ## Exits Tested:
//!
//! - Committed balances via published tree data and via user proofs
//! - Unprocessed deposits via their request index
//! - Protocol fee account proceeds routed to the fee vault

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use rx_02_exchange::{
        ExchangeApi, ExchangeError, ExchangeEvent, ExchangeMode, ModeEvent, TokenVault,
    };
    use shared_types::{PROTOCOL_FEE_ACCOUNT_ID, U256};

    fn max_age(h: &Harness) -> u64 {
        h.config.max_age_request_until_withdraw_mode
    }

    // =============================================================================
    // TRIGGERS
    // =============================================================================

    #[test]
    fn test_unprocessed_deposit_triggers_withdrawal_mode() {
        let h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();

        h.advance(max_age(&h) - 10);
        assert!(!h.exchange.is_in_withdrawal_mode());

        h.advance(20);
        assert!(h.exchange.is_in_withdrawal_mode());
        assert_eq!(h.exchange.mode(), ExchangeMode::WithdrawalMode);
    }

    #[test]
    fn test_age_boundary_is_strict() {
        let h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();

        h.advance(max_age(&h));
        assert!(!h.exchange.is_in_withdrawal_mode());

        h.advance(1);
        assert!(h.exchange.is_in_withdrawal_mode());
    }

    #[test]
    fn test_unprocessed_withdrawal_request_triggers_withdrawal_mode() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.commit_pending().unwrap();

        h.request_withdrawal(ALICE, ETH, ether(1)).unwrap();
        h.advance(max_age(&h) - 10);
        assert!(!h.exchange.is_in_withdrawal_mode());

        h.advance(20);
        assert!(h.exchange.is_in_withdrawal_mode());
    }

    #[test]
    fn test_processed_requests_do_not_age() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.request_withdrawal(ALICE, ETH, ether(1)).unwrap();
        h.commit_pending().unwrap();

        h.advance(max_age(&h) * 3);
        assert!(!h.exchange.is_in_withdrawal_mode());
        assert_eq!(h.exchange.mode(), ExchangeMode::Normal);
    }

    #[test]
    fn test_shutdown_timer_triggers_withdrawal_mode() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.deposit(BOB, ETH, ether(2)).unwrap();
        h.commit_pending().unwrap();

        h.exchange.shutdown(OWNER).unwrap();
        assert_eq!(h.exchange.mode(), ExchangeMode::Shutdown);

        let allowance = h.config.shutdown_allowance(h.exchange.num_accounts());
        assert_eq!(
            allowance,
            h.config.max_time_in_shutdown_base + 3 * h.config.max_time_in_shutdown_delta
        );

        h.advance(allowance - 10);
        assert!(!h.exchange.is_in_withdrawal_mode());

        h.advance(20);
        assert!(h.exchange.is_in_withdrawal_mode());
    }

    #[test]
    fn test_shutdown_ignores_request_aging() {
        let h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.exchange.shutdown(OWNER).unwrap();

        // The deposit is still queued, but only the shutdown timer counts now.
        h.advance(max_age(&h) + 1);
        assert_eq!(h.exchange.mode(), ExchangeMode::Shutdown);
        assert_eq!(
            h.exchange.deposit(BOB, ETH, ether(1)).unwrap_err(),
            ExchangeError::InvalidMode {
                mode: ExchangeMode::Shutdown
            }
        );
    }

    #[test]
    fn test_mode_flip_is_published_once() {
        let h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.advance(max_age(&h) + 1);

        // Queries never persist the flip.
        assert!(h.exchange.is_in_withdrawal_mode());
        assert_eq!(h.events.count("mode_changed"), 0);

        assert!(h.exchange.shutdown(OWNER).is_err());
        assert!(h.exchange.submit_blocks(Vec::new(), OPERATOR).is_err());

        let flips: Vec<_> = h
            .events
            .events()
            .into_iter()
            .filter_map(|event| match event {
                ExchangeEvent::ModeChanged { from, to, reason, .. } => Some((from, to, reason)),
                _ => None,
            })
            .collect();
        assert_eq!(
            flips,
            vec![(
                ExchangeMode::Normal,
                ExchangeMode::WithdrawalMode,
                ModeEvent::RequestExpired
            )]
        );
    }

    #[test]
    fn test_withdrawal_mode_rejects_operator_and_owner() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        let batch = h.prepare(&[(1, 0)]).unwrap();
        h.advance(max_age(&h) + 1);

        match h.submit(batch) {
            Err(HarnessError::Exchange(err)) => assert_eq!(
                err,
                ExchangeError::InvalidMode {
                    mode: ExchangeMode::WithdrawalMode
                }
            ),
            other => panic!("expected INVALID_MODE, got {:?}", other.map(|r| r.blocks)),
        }
        assert_eq!(
            h.exchange.shutdown(OWNER).unwrap_err().code(),
            "INVALID_MODE"
        );
        // Mode is checked before the caller.
        assert_eq!(
            h.exchange.shutdown(ALICE).unwrap_err().code(),
            "INVALID_MODE"
        );
        assert_eq!(
            h.exchange.deposit(BOB, ETH, ether(1)).unwrap_err().code(),
            "INVALID_MODE"
        );
    }

    #[test]
    fn test_fallback_rejected_before_trigger() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.commit_pending().unwrap();
        h.deposit(BOB, ETH, ether(1)).unwrap();

        let proof = h.proof(1, ETH).unwrap();
        for err in [
            h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap_err(),
            h.exchange.withdraw_from_merkle_tree_with_proof(proof).unwrap_err(),
            h.exchange.withdraw_from_deposit_request(BOB, ETH, 1).unwrap_err(),
        ] {
            assert_eq!(err.code(), "NOT_IN_WITHDRAW_MODE");
        }
        assert!(h.paid_to(&ALICE, ETH).is_zero());
    }

    // =============================================================================
    // EXITS
    // =============================================================================

    #[test]
    fn test_tampered_proof_then_valid_then_replay() {
        let mut h = Harness::new();
        h.deposit(ALICE, LRC, ether(5)).unwrap();
        h.commit_pending().unwrap();
        h.deposit(BOB, LRC, ether(1)).unwrap();
        h.advance(max_age(&h) + 1);

        let alice = h.account_id(&ALICE).unwrap();
        let mut forged = h.proof(alice, LRC).unwrap();
        forged.balance = forged.balance * U256::from(2u64);
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(forged)
                .unwrap_err()
                .code(),
            "INVALID_MERKLE_TREE_DATA"
        );

        let paid = h
            .exchange
            .withdraw_from_merkle_tree_with_proof(h.proof(alice, LRC).unwrap())
            .unwrap();
        assert_eq!(paid, ether(5));
        assert_eq!(h.paid_to(&ALICE, LRC), ether(5));

        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(h.proof(alice, LRC).unwrap())
                .unwrap_err()
                .code(),
            "WITHDRAWN_ALREADY"
        );
    }

    #[test]
    fn test_committed_and_unprocessed_balances_pay_separately() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether_tenths(17)).unwrap();
        h.commit_pending().unwrap();
        let unprocessed = h.deposit(ALICE, ETH, ether_tenths(17)).unwrap();
        h.advance(max_age(&h) + 1);

        // The tree only knows the committed 1.7.
        let paid = h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap();
        assert_eq!(paid, ether_tenths(17));

        let paid = h
            .exchange
            .withdraw_from_deposit_request(ALICE, ETH, unprocessed)
            .unwrap();
        assert_eq!(paid, ether_tenths(17));

        assert_eq!(h.paid_to(&ALICE, ETH), ether_tenths(34));
        assert!(h.vault.custody(ETH).is_zero());
    }

    #[test]
    fn test_both_tree_paths_share_replay_ledger() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(3)).unwrap();
        h.commit_pending().unwrap();
        h.deposit(BOB, ETH, ether(1)).unwrap();
        h.advance(max_age(&h) + 1);

        h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap();
        let proof = h.proof(1, ETH).unwrap();
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(proof)
                .unwrap_err()
                .code(),
            "WITHDRAWN_ALREADY"
        );
        assert_eq!(h.paid_to(&ALICE, ETH), ether(3));
    }

    #[test]
    fn test_zero_balance_claim_is_still_recorded() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(3)).unwrap();
        h.commit_pending().unwrap();
        h.deposit(BOB, ETH, ether(1)).unwrap();
        h.advance(max_age(&h) + 1);

        let paid = h.exchange.withdraw_from_merkle_tree(ALICE, LRC).unwrap();
        assert!(paid.is_zero());
        assert_eq!(
            h.exchange.withdraw_from_merkle_tree(ALICE, LRC).unwrap_err().code(),
            "WITHDRAWN_ALREADY"
        );
    }

    #[test]
    fn test_fee_account_proceeds_go_to_fee_vault() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(10)).unwrap();
        h.commit_pending().unwrap();

        // Trading fees settle into the protocol fee account.
        h.transfer(1, PROTOCOL_FEE_ACCOUNT_ID, ETH, ether_tenths(3))
            .unwrap();
        h.advance(60);
        h.commit_pending().unwrap();
        assert_eq!(
            h.committed_balance(PROTOCOL_FEE_ACCOUNT_ID, ETH),
            ether_tenths(3)
        );

        h.exchange.shutdown(OWNER).unwrap();
        h.advance(h.config.shutdown_allowance(h.exchange.num_accounts()) + 1);

        let proof = h.proof(PROTOCOL_FEE_ACCOUNT_ID, ETH).unwrap();
        let paid = h
            .exchange
            .withdraw_from_merkle_tree_with_proof(proof)
            .unwrap();
        assert_eq!(paid, ether_tenths(3));
        assert_eq!(h.paid_to(&FEE_VAULT, ETH), ether_tenths(3));
        assert!(h.paid_to(&shared_types::ZERO_ADDRESS, ETH).is_zero());
    }

    #[test]
    fn test_deposit_request_exits() {
        let mut h = Harness::new();
        let a = h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.commit_pending().unwrap();
        let b = h.deposit(BOB, ETH, ether(2)).unwrap();
        let c = h.deposit(CAROL, LRC, ether(3)).unwrap();
        let d = h.deposit(DAVE, ETH, ether(4)).unwrap();
        h.advance(max_age(&h) + 1);

        assert_eq!(
            h.exchange.withdraw_from_deposit_request(BOB, ETH, b).unwrap(),
            ether(2)
        );
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(CAROL, LRC, c)
                .unwrap(),
            ether(3)
        );
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(CAROL, LRC, c)
                .unwrap_err()
                .code(),
            "WITHDRAWN_ALREADY"
        );
        assert_eq!(
            h.exchange.withdraw_from_deposit_request(DAVE, ETH, d).unwrap(),
            ether(4)
        );

        // Folded into a block: claimable through the tree only.
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(ALICE, ETH, a)
                .unwrap_err()
                .code(),
            "WITHDRAWN_ALREADY"
        );
        assert_eq!(h.paid_to(&BOB, ETH), ether(2));
        assert_eq!(h.paid_to(&CAROL, LRC), ether(3));
        assert_eq!(h.paid_to(&DAVE, ETH), ether(4));
        assert_eq!(h.vault.custody(ETH), ether(1));
        assert!(h.vault.custody(LRC).is_zero());
    }

    #[test]
    fn test_deposit_request_claim_checks_owner_and_token() {
        let h = Harness::new();
        let index = h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.advance(max_age(&h) + 1);

        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(BOB, ETH, index)
                .unwrap_err()
                .code(),
            "DEPOSIT_MISMATCH"
        );
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(ALICE, LRC, index)
                .unwrap_err()
                .code(),
            "DEPOSIT_MISMATCH"
        );
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(ALICE, ETH, index + 1)
                .unwrap_err()
                .code(),
            "DEPOSIT_NOT_FOUND"
        );
        assert_eq!(h.vault.custody(ETH), ether(1));
    }

    #[test]
    fn test_every_user_can_exit_in_full() {
        let mut h = Harness::new();
        let users = [ALICE, BOB, CAROL, DAVE];
        for (i, user) in users.iter().enumerate() {
            h.deposit(*user, ETH, ether(i as u64 + 1)).unwrap();
        }
        h.commit_pending().unwrap();
        h.transfer(1, 2, ETH, ether_tenths(5)).unwrap();
        h.advance(10);
        h.commit_pending().unwrap();

        let late = h.deposit(ALICE, LRC, ether(7)).unwrap();
        h.advance(max_age(&h) + 1);

        let mut total = U256::zero();
        for user in users {
            total += h.exchange.withdraw_from_merkle_tree(user, ETH).unwrap();
        }
        total += h
            .exchange
            .withdraw_from_deposit_request(ALICE, LRC, late)
            .unwrap();

        assert_eq!(total, ether(1 + 2 + 3 + 4 + 7));
        assert_eq!(h.paid_to(&ALICE, ETH), ether_tenths(5));
        assert_eq!(h.paid_to(&BOB, ETH), ether_tenths(25));
        assert!(h.vault.custody(ETH).is_zero());
        assert!(h.vault.custody(LRC).is_zero());
    }
}
