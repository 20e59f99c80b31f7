//! # Light Client Flow Integration
//!
//! Header verification feeding the commitment tree: accepted updates write
//! client and consensus state records into staged tree updates; proven
//! misbehaviour freezes the client and commits the frozen state.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ed25519_dalek::{Signer, SigningKey};
    use gw_01_state_commitment::{
        CommitmentConfig, CommitmentService, MemoryTreeStore, StateUpdateKind, TreeUpdate,
    };
    use gw_01_state_commitment::ports::outbound::{MockDenomTraceFinalizer, MockHostRootReader};
    use gw_02_light_client::{
        BlockId, BlockIdFlag, ClientMessage, ClientRecord, ClientState, Commit, CommitSig,
        ConsensusState, Header, LightClientConfig, LightClientService, Misbehaviour,
        MockTendermintCodec, SignedHeader, TendermintCodec, TmHeader, TrustLevel, Validator,
        ValidatorSet,
    };
    use shared_types::Height;

    const CHAIN_ID: &str = "sidechain-0";
    const TRUSTING_PERIOD: u64 = 100_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn keys() -> Vec<SigningKey> {
        (0..4)
            .map(|i| SigningKey::from_bytes(&[0x40 + i as u8; 32]))
            .collect()
    }

    fn validator_set() -> ValidatorSet {
        ValidatorSet {
            validators: keys()
                .iter()
                .enumerate()
                .map(|(i, key)| Validator {
                    address: vec![0x40 + i as u8; 20],
                    pub_key: key.verifying_key().to_bytes().to_vec(),
                    voting_power: 25,
                    proposer_priority: 0,
                })
                .collect(),
            proposer: None,
        }
    }

    fn make_header(height: u64, time: u64, trusted_height: Height) -> Header {
        let codec = MockTendermintCodec;
        let vals = validator_set();
        let vals_hash = codec.validator_set_hash(&vals);

        let mut commit = Commit {
            height,
            round: 0,
            block_id: BlockId {
                hash: vec![height as u8; 32],
                ..Default::default()
            },
            signatures: (0..4)
                .map(|i| CommitSig {
                    block_id_flag: BlockIdFlag::Commit,
                    validator_address: vec![0x40 + i as u8; 20],
                    timestamp: time,
                    signature: vec![],
                })
                .collect(),
        };
        let signing_keys = keys();
        for i in 0..signing_keys.len() {
            let sign_bytes = codec.vote_sign_bytes(CHAIN_ID, &commit, i);
            commit.signatures[i].signature = signing_keys[i].sign(&sign_bytes).to_bytes().to_vec();
        }

        Header {
            signed_header: SignedHeader {
                header: TmHeader {
                    chain_id: CHAIN_ID.to_string(),
                    height,
                    time,
                    validators_hash: vals_hash.clone(),
                    next_validators_hash: vals_hash,
                    app_hash: vec![height as u8; 32],
                },
                commit,
            },
            validator_set: vals.clone(),
            trusted_height,
            trusted_validators: vals,
        }
    }

    fn client_record() -> ClientRecord {
        let codec = MockTendermintCodec;
        ClientRecord::new(
            ClientState {
                chain_id: CHAIN_ID.to_string(),
                trust_level: TrustLevel::ONE_THIRD,
                trusting_period: TRUSTING_PERIOD,
                unbonding_period: TRUSTING_PERIOD * 3,
                max_clock_drift: 1_000,
                frozen_height: Height::zero(),
                latest_height: Height::new(0, 10),
            },
            ConsensusState {
                timestamp: 1_000,
                next_validators_hash: codec.validator_set_hash(&validator_set()),
                root: vec![10; 32],
            },
        )
    }

    fn commitment_service(roots: Arc<MockHostRootReader>) -> CommitmentService {
        CommitmentService::new(
            CommitmentConfig::for_testing(),
            Arc::new(MemoryTreeStore::new()),
            roots,
            Arc::new(MockDenomTraceFinalizer::new()),
        )
    }

    fn light_client() -> LightClientService {
        LightClientService::new(LightClientConfig::default(), Arc::new(MockTendermintCodec))
    }

    /// Serialize the record's state the way the transaction builder commits
    /// it into the tree.
    fn record_as_tree_update(client_id: &str, record: &ClientRecord) -> TreeUpdate {
        let mut update = TreeUpdate::new();
        update.set(
            &format!("clients/{client_id}/clientState"),
            format!(
                "{}:{}:{}",
                record.client_state.chain_id,
                record.client_state.latest_height,
                record.client_state.frozen_height
            )
            .as_bytes(),
        );
        for (height, state) in &record.consensus_states {
            update.set(
                &format!("clients/{client_id}/consensusStates/{height}"),
                format!("{}:{}", state.timestamp, hex::encode(&state.root)).as_bytes(),
            );
        }
        update
    }

    // =============================================================================
    // FLOWS
    // =============================================================================

    /// Header accepted -> consensus state stored -> tree staged and
    /// confirmed with the client records.
    #[tokio::test]
    async fn test_accepted_header_flows_into_tree() {
        let lc = light_client();
        let mut record = client_record();

        let header = make_header(20, 2_000, Height::new(0, 10));
        let message = ClientMessage::Header(Box::new(header.clone()));
        lc.verify_client_message(&record, &message, 2_000).unwrap();
        assert!(!lc.check_for_misbehaviour(&record, &message));
        lc.update_state(&mut record, &header).unwrap();

        let roots = Arc::new(MockHostRootReader::default());
        let mut commitment = commitment_service(roots.clone());
        let update = record_as_tree_update("07-tendermint-0", &record);
        let expected = commitment
            .stage("tx-update-client", StateUpdateKind::UpdateClient, update, vec![])
            .unwrap();

        roots.set_root(expected);
        let committed = commitment.confirm("tx-update-client").await.unwrap();
        assert_eq!(committed, expected);

        // The committed tree holds both consensus states.
        assert!(commitment
            .tree_mut()
            .get("clients/07-tendermint-0/consensusStates/0-10")
            .is_some());
        assert!(commitment
            .tree_mut()
            .get("clients/07-tendermint-0/consensusStates/0-20")
            .is_some());
    }

    /// A second header chain for the same heights freezes the client, and
    /// the frozen flag reaches the tree.
    #[tokio::test]
    async fn test_misbehaviour_freezes_client_and_commits() {
        let lc = light_client();
        let mut record = client_record();

        // Two conflicting headers at height 20.
        let header1 = make_header(20, 2_000, Height::new(0, 10));
        let mut header2 = make_header(20, 2_500, Height::new(0, 10));
        header2.signed_header.commit.block_id.hash = vec![0xee; 32];
        let codec = MockTendermintCodec;
        let signing_keys = keys();
        for i in 0..signing_keys.len() {
            let sign_bytes = codec.vote_sign_bytes(CHAIN_ID, &header2.signed_header.commit, i);
            header2.signed_header.commit.signatures[i].signature =
                signing_keys[i].sign(&sign_bytes).to_bytes().to_vec();
        }

        let evidence = ClientMessage::Misbehaviour(Box::new(Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1,
            header2,
        }));

        lc.verify_client_message(&record, &evidence, 3_000).unwrap();
        assert!(lc.check_for_misbehaviour(&record, &evidence));
        lc.update_on_misbehaviour(&mut record);
        assert!(record.client_state.is_frozen());

        // Frozen state committed to the tree.
        let roots = Arc::new(MockHostRootReader::default());
        let mut commitment = commitment_service(roots.clone());
        let update = record_as_tree_update("07-tendermint-0", &record);
        let expected = commitment
            .stage("tx-freeze", StateUpdateKind::UpdateClient, update, vec![])
            .unwrap();
        roots.set_root(expected);
        commitment.confirm("tx-freeze").await.unwrap();

        let stored = commitment
            .tree_mut()
            .get("clients/07-tendermint-0/clientState")
            .unwrap()
            .to_vec();
        assert!(String::from_utf8(stored).unwrap().ends_with(":0-1"));

        // And the frozen client refuses any further header.
        let late_header = make_header(30, 4_000, Height::new(0, 10));
        assert!(lc
            .verify_header(&record, &late_header, 4_000)
            .is_err());
    }

    /// The same sequence of accepted headers produces the same tree root
    /// regardless of commit interleaving (order independence end to end).
    #[tokio::test]
    async fn test_update_order_does_not_change_final_root() {
        let lc = light_client();

        let mut record_a = client_record();
        let mut record_b = client_record();

        let h20 = make_header(20, 2_000, Height::new(0, 10));
        let h30 = make_header(30, 3_000, Height::new(0, 10));

        lc.update_state(&mut record_a, &h20).unwrap();
        lc.update_state(&mut record_a, &h30).unwrap();

        // Same headers, applied to an independently tracked record.
        lc.update_state(&mut record_b, &h20).unwrap();
        lc.update_state(&mut record_b, &h30).unwrap();

        let update_a = record_as_tree_update("07-tendermint-0", &record_a);
        let update_b = record_as_tree_update("07-tendermint-0", &record_b);

        let roots = Arc::new(MockHostRootReader::default());
        let mut commitment_a = commitment_service(roots.clone());
        let mut commitment_b = commitment_service(roots.clone());

        let root_a = commitment_a
            .stage("tx-a", StateUpdateKind::UpdateClient, update_a, vec![])
            .unwrap();
        let root_b = commitment_b
            .stage("tx-b", StateUpdateKind::UpdateClient, update_b, vec![])
            .unwrap();
        assert_eq!(root_a, root_b);
    }
}
