//! # Double-Withdrawal Attempts
//!
//! A balance or deposit must pay out at most once, whichever path is used.

#[cfg(test)]
mod tests {
    use crate::harness::*;
    use rx_02_exchange::ExchangeApi;

    /// Exchange in withdrawal mode with Alice's 3 ETH committed, and Bob's
    /// 1 ETH deposit (index 1) still pending.
    fn stalled_exchange() -> Harness {
        let mut h = Harness::new();
        h.deposit(ALICE, ETH, ether(3)).unwrap();
        h.commit_pending().unwrap();
        h.deposit(BOB, ETH, ether(1)).unwrap();
        h.advance(h.config.max_age_request_until_withdraw_mode + 1);
        h
    }

    #[test]
    fn test_committed_deposit_not_claimable_by_index() {
        let h = stalled_exchange();
        h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap();

        // Deposit 0 is already in the tree balance Alice just withdrew.
        let err = h
            .exchange
            .withdraw_from_deposit_request(ALICE, ETH, 0)
            .unwrap_err();
        assert_eq!(err.code(), "WITHDRAWN_ALREADY");
        assert_eq!(h.paid_to(&ALICE, ETH), ether(3));
    }

    #[test]
    fn test_proof_replay_after_published_path() {
        let h = stalled_exchange();
        let proof = h.proof(1, ETH).unwrap();

        h.exchange
            .withdraw_from_merkle_tree_with_proof(proof.clone())
            .unwrap();
        for _ in 0..3 {
            assert_eq!(
                h.exchange
                    .withdraw_from_merkle_tree_with_proof(proof.clone())
                    .unwrap_err()
                    .code(),
                "WITHDRAWN_ALREADY"
            );
        }
        assert_eq!(
            h.exchange.withdraw_from_merkle_tree(ALICE, ETH).unwrap_err().code(),
            "WITHDRAWN_ALREADY"
        );
        assert_eq!(h.paid_to(&ALICE, ETH), ether(3));
    }

    #[test]
    fn test_deposit_claim_replay() {
        let h = stalled_exchange();
        h.exchange
            .withdraw_from_deposit_request(BOB, ETH, 1)
            .unwrap();
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(BOB, ETH, 1)
                .unwrap_err()
                .code(),
            "WITHDRAWN_ALREADY"
        );
        assert!(h.exchange.deposit_request(1).unwrap().withdrawn);
        assert_eq!(h.paid_to(&BOB, ETH), ether(1));
    }

    #[test]
    fn test_proof_for_other_token_not_reusable() {
        let h = stalled_exchange();
        let mut proof = h.proof(1, ETH).unwrap();
        proof.token = LRC;
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(proof)
                .unwrap_err()
                .code(),
            "INVALID_MERKLE_TREE_DATA"
        );
    }

    #[test]
    fn test_proof_redirected_to_other_owner() {
        let h = stalled_exchange();
        let mut proof = h.proof(1, ETH).unwrap();
        proof.owner = CAROL;
        assert_eq!(
            h.exchange
                .withdraw_from_merkle_tree_with_proof(proof)
                .unwrap_err()
                .code(),
            "INVALID_MERKLE_TREE_DATA"
        );
        assert!(h.paid_to(&CAROL, ETH).is_zero());
    }

    #[test]
    fn test_claiming_someone_elses_deposit() {
        let h = stalled_exchange();
        assert_eq!(
            h.exchange
                .withdraw_from_deposit_request(ALICE, ETH, 1)
                .unwrap_err()
                .code(),
            "DEPOSIT_MISMATCH"
        );
        assert!(!h.exchange.deposit_request(1).unwrap().withdrawn);
    }
}
