//! # Misbehaving Operator
//!
//! The operator can stop working or stop publishing data, but it cannot
//! lock funds: users fall back to their own proofs.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use rx_02_exchange::{ExchangeApi, ExchangeMode, TokenVault};

    #[test]
    fn test_withheld_tree_data_falls_back_to_user_proof() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(2)).unwrap();
        h.commit_pending().unwrap();
        let user_proof = h.proof(1, ETH).unwrap();

        h.deposit(BOB, ETH, ether(1)).unwrap();
        assert!(h.tree_data.withhold(&h.committed_root()));
        h.advance(h.config.max_age_request_until_withdraw_mode + 1);

        assert_eq!(
            h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap_err().code(),
            "MERKLE_TREE_DATA_UNAVAILABLE"
        );
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(user_proof)
                .unwrap(),
            ether(2)
        );
    }

    #[test]
    fn test_stale_proof_from_earlier_root_rejected() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(2)).unwrap();
        h.commit_pending().unwrap();
        let stale = h.proof(1, ETH).unwrap();

        h.request_withdrawal(ALICE, ETH, ether(2)).unwrap();
        h.advance(60);
        h.commit_pending().unwrap();

        h.deposit(BOB, ETH, ether(1)).unwrap();
        h.advance(h.config.max_age_request_until_withdraw_mode + 1);

        // Alice already got her 2 ETH through the block; the old proof is dead.
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(stale)
                .unwrap_err()
                .code(),
            "INVALID_MERKLE_TREE_DATA"
        );
        assert_eq!(h.paid_to(&ALICE, ETH), ether(2));
    }

    #[test]
    fn test_stalling_operator_cannot_revive_exchange() {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(1)).unwrap();
        h.advance(h.config.max_age_request_until_withdraw_mode + 1);

        // Proving the overdue deposit now is too late.
        let batch = h.prepare(&[(1, 0)]).unwrap();
        assert!(h.submit(batch).is_err());
        assert_eq!(h.exchange.mode(), ExchangeMode::WithdrawalMode);
        assert_eq!(h.exchange.deposit_queue_head(), 0);

        assert_eq!(
            h.exchange.withdraw_from_deposit_request(ALICE, ETH, 0).unwrap(),
            ether(1)
        );
    }

    #[test]
    fn test_unbacked_payouts_refused() {
        let mut h = Harness::new();
        h.deposit(ALICE, LRC, ether(1)).unwrap();
        h.request_withdrawal(ALICE, LRC, ether(1)).unwrap();
        h.advance(60);

        // A correctly proven block that pays out more than was ever deposited.
        let mut batch = h.prepare(&[(1, 1)]).unwrap();
        batch.blocks[0].payouts[0].amount = ether(50);
        h.reprove(&mut batch.blocks);

        match h.submit(batch) {
            Err(HarnessError::Exchange(err)) => assert_eq!(err.code(), "INSUFFICIENT_CUSTODY"),
            other => panic!("expected INSUFFICIENT_CUSTODY, got {:?}", other.map(|r| r.blocks)),
        }
        assert_eq!(h.vault.custody(LRC), ether(1));
        assert!(h.paid_to(&ALICE, LRC).is_zero());
        assert_eq!(h.exchange.withdrawal_queue_head(), 0);
    }

    #[test]
    fn test_shutdown_is_owner_only() {
        let h = Harness::new();
        assert_eq!(
            h.exchange.shutdown(OPERATOR).unwrap_err().code(),
            "UNAUTHORIZED"
        );
        assert_eq!(h.exchange.mode(), ExchangeMode::Normal);
    }
}
