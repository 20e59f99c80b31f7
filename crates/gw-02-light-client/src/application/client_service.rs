//! # Light Client Service
//!
//! State transitions for one tracked chain, mirroring the on-chain client
//! validator's view:
//!
//! ```text
//! {Active} --update(valid header)-->  {Active, consensus state added}
//! {Active} --misbehaviour proven-->   {Frozen}
//! {Frozen} -- terminal; every further update is rejected
//! ```
//!
//! All functions are synchronous and pure over the passed-in record; the
//! service itself only carries configuration and the wire codec.

use crate::config::LightClientConfig;
use crate::domain::client::{ClientRecord, ClientState, ConsensusState};
use crate::domain::errors::LightClientError;
use crate::domain::message::{ClientMessage, Header, Misbehaviour};
use crate::ports::TendermintCodec;
use crate::validation::basic::{
    validate_client_state, validate_consensus_state, validate_signed_header,
    validate_validator_set,
};
use crate::validation::commit_verifier::{verify_commit_light, verify_commit_light_trusting};
use shared_types::{Height, TimestampNs};
use std::sync::Arc;

/// Light client service - verifies client messages and applies state
/// transitions.
pub struct LightClientService {
    /// Configuration.
    config: LightClientConfig,
    /// Canonical wire encodings.
    codec: Arc<dyn TendermintCodec>,
}

impl LightClientService {
    /// Create a new service.
    pub fn new(config: LightClientConfig, codec: Arc<dyn TendermintCodec>) -> Self {
        Self { config, codec }
    }

    /// Validate an initial client/consensus state pair into a fresh record.
    pub fn create_client(
        &self,
        client_state: ClientState,
        consensus_state: ConsensusState,
    ) -> Result<ClientRecord, LightClientError> {
        validate_client_state(&client_state)?;
        validate_consensus_state(&consensus_state)?;
        Ok(ClientRecord::new(client_state, consensus_state))
    }

    /// Verify a client message against the stored record.
    ///
    /// `now` is the wall-clock reference (ns) used for trusting-period and
    /// clock-drift checks.
    pub fn verify_client_message(
        &self,
        record: &ClientRecord,
        message: &ClientMessage,
        now: TimestampNs,
    ) -> Result<(), LightClientError> {
        match message {
            ClientMessage::Header(header) => self.verify_header(record, header, now),
            ClientMessage::Misbehaviour(misbehaviour) => {
                self.verify_misbehaviour(record, misbehaviour)
            }
        }
    }

    /// Verify a header against its claimed trusted consensus state.
    pub fn verify_header(
        &self,
        record: &ClientRecord,
        header: &Header,
        now: TimestampNs,
    ) -> Result<(), LightClientError> {
        let client_state = &record.client_state;
        if client_state.is_frozen() {
            return Err(LightClientError::ClientFrozen);
        }

        validate_validator_set(&header.validator_set)?;
        validate_validator_set(&header.trusted_validators)?;

        let trusted_state = record
            .consensus_state_at(&header.trusted_height)
            .ok_or(LightClientError::TrustedConsensusStateNotFound {
                height: header.trusted_height,
            })?;

        self.check_trusted_header(header, trusted_state)?;

        let header_height = header.signed_header.header.height;
        let trusted_height = header.trusted_height.revision_height;
        if header_height <= trusted_height {
            return Err(LightClientError::HeaderHeightNotNewer {
                header: header_height,
                trusted: trusted_height,
            });
        }

        if header_height == trusted_height + 1 {
            self.verify_adjacent(client_state, trusted_state, header, now)
        } else {
            self.verify_non_adjacent(client_state, trusted_state, header, now)
        }
    }

    /// Adjacent update: the trusted state already names the only validator
    /// set allowed to produce the next block.
    fn verify_adjacent(
        &self,
        client_state: &ClientState,
        trusted_state: &ConsensusState,
        header: &Header,
        now: TimestampNs,
    ) -> Result<(), LightClientError> {
        self.verify_new_header_and_vals(client_state, trusted_state, header, now)?;

        if header.signed_header.header.validators_hash != trusted_state.next_validators_hash {
            return Err(LightClientError::NextValidatorsMismatch);
        }

        verify_commit_light(
            self.codec.as_ref(),
            &client_state.chain_id,
            &header.validator_set,
            &header.signed_header.commit,
        )
    }

    /// Non-adjacent update: skipping ahead is allowed while the trusted
    /// state is inside its trusting period and enough of the trusted
    /// validators signed the new commit.
    fn verify_non_adjacent(
        &self,
        client_state: &ClientState,
        trusted_state: &ConsensusState,
        header: &Header,
        now: TimestampNs,
    ) -> Result<(), LightClientError> {
        let expires_at = trusted_state
            .timestamp
            .saturating_add(client_state.trusting_period);
        if now > expires_at {
            return Err(LightClientError::TrustedStateExpired {
                expired_at: expires_at,
                now,
            });
        }

        self.verify_new_header_and_vals(client_state, trusted_state, header, now)?;

        verify_commit_light_trusting(
            self.codec.as_ref(),
            &client_state.chain_id,
            &header.trusted_validators,
            &header.signed_header.commit,
            client_state.trust_level,
        )?;

        // The untrusted set check comes last: an adversarial header can make
        // this set arbitrarily large, the trusted-set check above cannot.
        verify_commit_light(
            self.codec.as_ref(),
            &client_state.chain_id,
            &header.validator_set,
            &header.signed_header.commit,
        )
    }

    /// Structural and temporal checks shared by both update paths.
    fn verify_new_header_and_vals(
        &self,
        client_state: &ClientState,
        trusted_state: &ConsensusState,
        header: &Header,
        now: TimestampNs,
    ) -> Result<(), LightClientError> {
        validate_signed_header(&header.signed_header, &client_state.chain_id)?;

        let header_time = header.signed_header.header.time;
        if header_time <= trusted_state.timestamp {
            return Err(LightClientError::NonMonotonicHeaderTime {
                header_time,
                trusted_time: trusted_state.timestamp,
            });
        }

        let max_allowed = now.saturating_add(client_state.max_clock_drift);
        if header_time > max_allowed {
            return Err(LightClientError::HeaderFromFuture {
                header_time,
                max_allowed,
            });
        }

        let computed = self.codec.validator_set_hash(&header.validator_set);
        if computed != header.signed_header.header.validators_hash {
            return Err(LightClientError::InvalidValidator(format!(
                "header validators hash {} does not match the supplied validator set {}",
                hex::encode(&header.signed_header.header.validators_hash),
                hex::encode(&computed)
            )));
        }
        Ok(())
    }

    /// Check that the submitted trusted validators really are the next
    /// validators of the trusted consensus state.
    fn check_trusted_header(
        &self,
        header: &Header,
        trusted_state: &ConsensusState,
    ) -> Result<(), LightClientError> {
        let computed = self.codec.validator_set_hash(&header.trusted_validators);
        if computed != trusted_state.next_validators_hash {
            return Err(LightClientError::InvalidValidator(format!(
                "trusted validators do not hash to the latest trusted validators; expected {}, got {}",
                hex::encode(&trusted_state.next_validators_hash),
                hex::encode(&computed)
            )));
        }
        Ok(())
    }

    /// Decide whether a message evidences misbehaviour.
    ///
    /// Pure decision logic; assumes the message already passed
    /// [`verify_client_message`](Self::verify_client_message).
    pub fn check_for_misbehaviour(&self, record: &ClientRecord, message: &ClientMessage) -> bool {
        match message {
            ClientMessage::Header(header) => {
                let implied = header.consensus_state();
                let height = header.height();

                if let Some(existing) = record.consensus_state_at(&height) {
                    // Already-submitted header: an exact match is a no-op
                    // duplicate, anything else is a conflicting claim for
                    // the same height.
                    return *existing != implied;
                }

                // New height: its timestamp must slot between the stored
                // neighbours.
                if let Some(prev) = record.prev_consensus_state(&height) {
                    if prev.timestamp > implied.timestamp {
                        return true;
                    }
                }
                if let Some(next) = record.next_consensus_state(&height) {
                    if next.timestamp < implied.timestamp {
                        return true;
                    }
                }
                false
            }
            ClientMessage::Misbehaviour(misbehaviour) => {
                let h1 = &misbehaviour.header1.signed_header;
                let h2 = &misbehaviour.header2.signed_header;

                if h1.header.height == h2.header.height {
                    // Same height: a fork shows up as differing commit
                    // block ids.
                    return h1.commit.block_id.hash != h2.commit.block_id.hash;
                }

                // Different heights: the higher header's time must be
                // strictly after the lower one's, or BFT time is violated.
                let (higher, lower) = if h1.header.height > h2.header.height {
                    (h1, h2)
                } else {
                    (h2, h1)
                };
                higher.header.time <= lower.header.time
            }
        }
    }

    /// Verify explicit misbehaviour evidence: both conflicting headers must
    /// independently have convinced this client.
    pub fn verify_misbehaviour(
        &self,
        record: &ClientRecord,
        misbehaviour: &Misbehaviour,
    ) -> Result<(), LightClientError> {
        self.check_misbehaviour_header(record, &misbehaviour.header1)?;
        self.check_misbehaviour_header(record, &misbehaviour.header2)?;
        Ok(())
    }

    /// Validity of one side of a misbehaviour claim, judged at the header's
    /// own time.
    fn check_misbehaviour_header(
        &self,
        record: &ClientRecord,
        header: &Header,
    ) -> Result<(), LightClientError> {
        let client_state = &record.client_state;

        validate_validator_set(&header.trusted_validators)?;

        let trusted_state = record
            .consensus_state_at(&header.trusted_height)
            .ok_or(LightClientError::TrustedConsensusStateNotFound {
                height: header.trusted_height,
            })?;

        self.check_trusted_header(header, trusted_state)?;

        // The trusted state must not already be outside its trusting period
        // at the header's claimed time.
        let header_time = header.signed_header.header.time;
        let age = header_time.saturating_sub(trusted_state.timestamp);
        if age >= client_state.trusting_period {
            return Err(LightClientError::TrustedStateExpired {
                expired_at: trusted_state
                    .timestamp
                    .saturating_add(client_state.trusting_period),
                now: header_time,
            });
        }

        verify_commit_light_trusting(
            self.codec.as_ref(),
            &client_state.chain_id,
            &header.trusted_validators,
            &header.signed_header.commit,
            client_state.trust_level,
        )
    }

    /// Fold an accepted header into the record.
    ///
    /// Prunes consensus states that aged out relative to the new header,
    /// rejects duplicate heights, and truncates the history oldest-first at
    /// the configured bound.
    pub fn update_state(
        &self,
        record: &mut ClientRecord,
        header: &Header,
    ) -> Result<Height, LightClientError> {
        if record.client_state.is_frozen() {
            return Err(LightClientError::ClientFrozen);
        }

        let new_height = header.height();
        let header_time = header.signed_header.header.time;
        let trusting_period = record.client_state.trusting_period;

        // Evict states whose age exceeds the trusting period relative to
        // this update.
        record
            .consensus_states
            .retain(|_, state| state.timestamp.saturating_add(trusting_period) >= header_time);

        if record.consensus_states.contains_key(&new_height) {
            return Err(LightClientError::ConsensusStateExists { height: new_height });
        }

        record
            .consensus_states
            .insert(new_height, header.consensus_state());

        while record.consensus_states.len() > self.config.max_consensus_states {
            record.consensus_states.pop_first();
        }

        if new_height > record.client_state.latest_height {
            record.client_state.latest_height = new_height;
        }

        tracing::debug!(
            height = %new_height,
            stored = record.consensus_states.len(),
            "client updated"
        );
        Ok(new_height)
    }

    /// Freeze the client after proven misbehaviour.
    ///
    /// Any non-zero frozen height means "frozen"; `{0, 1}` by convention.
    pub fn update_on_misbehaviour(&self, record: &mut ClientRecord) {
        record.client_state.frozen_height = Height::new(0, 1);
        tracing::info!(
            chain_id = %record.client_state.chain_id,
            "client frozen due to misbehaviour"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::TrustLevel;
    use crate::domain::header::{BlockId, BlockIdFlag, Commit, CommitSig, SignedHeader, TmHeader};
    use crate::domain::validator::{Validator, ValidatorSet};
    use crate::ports::MockTendermintCodec;
    use ed25519_dalek::{Signer, SigningKey};

    const CHAIN_ID: &str = "cosmoshub-4";
    const TRUSTING_PERIOD: u64 = 10_000;

    fn keys() -> Vec<SigningKey> {
        (0..3)
            .map(|i| SigningKey::from_bytes(&[i as u8 + 1; 32]))
            .collect()
    }

    fn validator_set(keys: &[SigningKey]) -> ValidatorSet {
        ValidatorSet {
            validators: keys
                .iter()
                .enumerate()
                .map(|(i, key)| Validator {
                    address: vec![i as u8 + 1; 20],
                    pub_key: key.verifying_key().to_bytes().to_vec(),
                    voting_power: 10,
                    proposer_priority: 0,
                })
                .collect(),
            proposer: None,
        }
    }

    /// A signed header at `height`/`time`, produced and to-be-followed by
    /// the same validator set.
    fn make_header(height: u64, time: u64, trusted_height: Height) -> Header {
        let keys = keys();
        let vals = validator_set(&keys);
        let codec = MockTendermintCodec;
        let vals_hash = codec.validator_set_hash(&vals);

        let mut commit = Commit {
            height,
            round: 0,
            block_id: BlockId {
                hash: vec![height as u8; 32],
                ..Default::default()
            },
            signatures: (0..keys.len())
                .map(|i| CommitSig {
                    block_id_flag: BlockIdFlag::Commit,
                    validator_address: vec![i as u8 + 1; 20],
                    timestamp: time,
                    signature: vec![],
                })
                .collect(),
        };
        for i in 0..keys.len() {
            let sign_bytes = codec.vote_sign_bytes(CHAIN_ID, &commit, i);
            commit.signatures[i].signature = keys[i].sign(&sign_bytes).to_bytes().to_vec();
        }

        Header {
            signed_header: SignedHeader {
                header: TmHeader {
                    chain_id: CHAIN_ID.to_string(),
                    height,
                    time,
                    validators_hash: vals_hash.clone(),
                    next_validators_hash: vals_hash,
                    app_hash: vec![0xaa; 32],
                },
                commit,
            },
            validator_set: vals.clone(),
            trusted_height,
            trusted_validators: vals,
        }
    }

    /// A record trusting height (0, 10) at t=1000, tracked by the fixture
    /// validator set.
    fn record() -> ClientRecord {
        let codec = MockTendermintCodec;
        let vals_hash = codec.validator_set_hash(&validator_set(&keys()));
        ClientRecord::new(
            ClientState {
                chain_id: CHAIN_ID.to_string(),
                trust_level: TrustLevel::ONE_THIRD,
                trusting_period: TRUSTING_PERIOD,
                unbonding_period: TRUSTING_PERIOD * 3,
                max_clock_drift: 100,
                frozen_height: Height::zero(),
                latest_height: Height::new(0, 10),
            },
            ConsensusState {
                timestamp: 1_000,
                next_validators_hash: vals_hash,
                root: vec![0xbb; 32],
            },
        )
    }

    fn service() -> LightClientService {
        LightClientService::new(LightClientConfig::for_testing(), Arc::new(MockTendermintCodec))
    }

    #[test]
    fn test_create_client_validates_inputs() {
        let svc = service();
        let rec = record();
        assert!(svc
            .create_client(
                rec.client_state.clone(),
                rec.latest_consensus_state().unwrap().clone()
            )
            .is_ok());

        let mut bad = rec.client_state.clone();
        bad.trusting_period = 0;
        assert!(svc
            .create_client(bad, rec.latest_consensus_state().unwrap().clone())
            .is_err());
    }

    #[test]
    fn test_verify_and_update_non_adjacent_header() {
        let svc = service();
        let mut rec = record();
        let header = make_header(20, 2_000, Height::new(0, 10));

        svc.verify_header(&rec, &header, 2_000).unwrap();
        let stored = svc.update_state(&mut rec, &header).unwrap();

        assert_eq!(stored, Height::new(0, 20));
        assert_eq!(rec.client_state.latest_height, Height::new(0, 20));
        assert_eq!(
            rec.consensus_state_at(&stored).unwrap().timestamp,
            2_000
        );
    }

    #[test]
    fn test_verify_adjacent_header() {
        let svc = service();
        let rec = record();
        let header = make_header(11, 1_500, Height::new(0, 10));
        svc.verify_header(&rec, &header, 1_500).unwrap();
    }

    #[test]
    fn test_adjacent_header_with_wrong_validators_rejected() {
        let svc = service();
        let mut rec = record();
        // The stored trusted state expects a different next validator set.
        rec.consensus_states
            .get_mut(&Height::new(0, 10))
            .unwrap()
            .next_validators_hash = vec![0xde; 32];

        let header = make_header(11, 1_500, Height::new(0, 10));
        // check_trusted_header fires before the adjacent-specific check.
        assert!(svc.verify_header(&rec, &header, 1_500).is_err());
    }

    #[test]
    fn test_header_with_unknown_trusted_height_rejected() {
        let svc = service();
        let rec = record();
        let header = make_header(20, 2_000, Height::new(0, 9));
        assert!(matches!(
            svc.verify_header(&rec, &header, 2_000),
            Err(LightClientError::TrustedConsensusStateNotFound { .. })
        ));
    }

    #[test]
    fn test_header_not_newer_than_trusted_rejected() {
        let svc = service();
        let rec = record();
        let header = make_header(10, 2_000, Height::new(0, 10));
        assert!(matches!(
            svc.verify_header(&rec, &header, 2_000),
            Err(LightClientError::HeaderHeightNotNewer { .. })
        ));
    }

    #[test]
    fn test_header_time_must_advance() {
        let svc = service();
        let rec = record();
        let header = make_header(20, 1_000, Height::new(0, 10));
        assert!(matches!(
            svc.verify_header(&rec, &header, 2_000),
            Err(LightClientError::NonMonotonicHeaderTime { .. })
        ));
    }

    #[test]
    fn test_header_from_future_rejected() {
        let svc = service();
        let rec = record();
        let header = make_header(20, 5_000, Height::new(0, 10));
        // now + drift = 2000 + 100 < 5000
        assert!(matches!(
            svc.verify_header(&rec, &header, 2_000),
            Err(LightClientError::HeaderFromFuture { .. })
        ));
    }

    #[test]
    fn test_expired_trusted_state_rejected_for_non_adjacent() {
        let svc = service();
        let rec = record();
        let header = make_header(20, 15_000, Height::new(0, 10));
        // Trusted state from t=1000 with a 10_000ns trusting period has
        // expired by now=15_000.
        assert!(matches!(
            svc.verify_header(&rec, &header, 15_000),
            Err(LightClientError::TrustedStateExpired { .. })
        ));
    }

    #[test]
    fn test_frozen_client_rejects_updates() {
        let svc = service();
        let mut rec = record();
        svc.update_on_misbehaviour(&mut rec);

        let header = make_header(20, 2_000, Height::new(0, 10));
        assert!(matches!(
            svc.verify_header(&rec, &header, 2_000),
            Err(LightClientError::ClientFrozen)
        ));
        assert!(matches!(
            svc.update_state(&mut rec, &header),
            Err(LightClientError::ClientFrozen)
        ));
        assert_eq!(rec.client_state.frozen_height, Height::new(0, 1));
    }

    #[test]
    fn test_duplicate_height_update_rejected() {
        let svc = service();
        let mut rec = record();
        let header = make_header(20, 2_000, Height::new(0, 10));
        svc.update_state(&mut rec, &header).unwrap();

        let conflicting = make_header(20, 2_500, Height::new(0, 10));
        assert!(matches!(
            svc.update_state(&mut rec, &conflicting),
            Err(LightClientError::ConsensusStateExists { .. })
        ));
    }

    #[test]
    fn test_update_prunes_expired_states() {
        let svc = service();
        let mut rec = record();
        // Stored state at t=1000; a header at t=12_001 pushes it past the
        // 10_000ns trusting period.
        let header = make_header(20, 12_001, Height::new(0, 10));
        svc.update_state(&mut rec, &header).unwrap();

        assert!(rec.consensus_state_at(&Height::new(0, 10)).is_none());
        assert_eq!(rec.consensus_states.len(), 1);
    }

    #[test]
    fn test_consensus_state_cap_evicts_oldest() {
        let svc = service(); // for_testing: max 4 states
        let mut rec = record();
        for (i, height) in (20..25).enumerate() {
            let header = make_header(height, 2_000 + i as u64 * 100, Height::new(0, 10));
            svc.update_state(&mut rec, &header).unwrap();
        }

        assert_eq!(rec.consensus_states.len(), 4);
        // The initial state at height 10 and then height 20 were evicted.
        assert!(rec.consensus_state_at(&Height::new(0, 10)).is_none());
        assert!(rec.consensus_state_at(&Height::new(0, 20)).is_none());
        assert!(rec.consensus_state_at(&Height::new(0, 24)).is_some());
    }

    #[test]
    fn test_resubmitted_identical_header_is_not_misbehaviour() {
        let svc = service();
        let mut rec = record();
        let header = make_header(20, 2_000, Height::new(0, 10));
        svc.update_state(&mut rec, &header).unwrap();

        let msg = ClientMessage::Header(Box::new(header));
        assert!(!svc.check_for_misbehaviour(&rec, &msg));
    }

    #[test]
    fn test_conflicting_header_at_stored_height_is_misbehaviour() {
        let svc = service();
        let mut rec = record();
        let header = make_header(20, 2_000, Height::new(0, 10));
        svc.update_state(&mut rec, &header).unwrap();

        let conflicting = make_header(20, 2_500, Height::new(0, 10));
        let msg = ClientMessage::Header(Box::new(conflicting));
        assert!(svc.check_for_misbehaviour(&rec, &msg));
    }

    #[test]
    fn test_header_timestamp_monotonicity_window() {
        let svc = service();
        let mut rec = record();
        // Neighbours at height 10 (t=100) and height 30 (t=300).
        rec.consensus_states.clear();
        rec.consensus_states.insert(
            Height::new(0, 10),
            ConsensusState {
                timestamp: 100,
                next_validators_hash: vec![1; 32],
                root: vec![1; 32],
            },
        );
        rec.consensus_states.insert(
            Height::new(0, 30),
            ConsensusState {
                timestamp: 300,
                next_validators_hash: vec![1; 32],
                root: vec![1; 32],
            },
        );

        let probe = |time| {
            let header = make_header(20, time, Height::new(0, 10));
            svc.check_for_misbehaviour(&rec, &ClientMessage::Header(Box::new(header)))
        };

        assert!(probe(50)); // before the previous neighbour
        assert!(probe(350)); // after the next neighbour
        assert!(!probe(200)); // inside the window
    }

    #[test]
    fn test_explicit_misbehaviour_fork_detection() {
        let svc = service();
        let rec = record();

        let header1 = make_header(20, 2_000, Height::new(0, 10));
        let mut header2 = header1.clone();
        header2.signed_header.commit.block_id.hash = vec![0xff; 32];

        let fork = ClientMessage::Misbehaviour(Box::new(Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: header1.clone(),
            header2,
        }));
        assert!(svc.check_for_misbehaviour(&rec, &fork));

        // Identical headers are not a fork.
        let not_fork = ClientMessage::Misbehaviour(Box::new(Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: header1.clone(),
            header2: header1,
        }));
        assert!(!svc.check_for_misbehaviour(&rec, &not_fork));
    }

    #[test]
    fn test_explicit_misbehaviour_time_violation() {
        let svc = service();
        let rec = record();

        // Higher height with an earlier time: BFT time violated.
        let violating = ClientMessage::Misbehaviour(Box::new(Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: make_header(30, 1_500, Height::new(0, 10)),
            header2: make_header(20, 2_000, Height::new(0, 10)),
        }));
        assert!(svc.check_for_misbehaviour(&rec, &violating));

        // Higher height with a later time: fine.
        let ordered = ClientMessage::Misbehaviour(Box::new(Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: make_header(30, 2_500, Height::new(0, 10)),
            header2: make_header(20, 2_000, Height::new(0, 10)),
        }));
        assert!(!svc.check_for_misbehaviour(&rec, &ordered));
    }

    #[test]
    fn test_verify_misbehaviour_requires_trusted_states() {
        let svc = service();
        let rec = record();

        let misbehaviour = Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: make_header(20, 2_000, Height::new(0, 9)),
            header2: make_header(20, 2_500, Height::new(0, 10)),
        };
        assert!(matches!(
            svc.verify_misbehaviour(&rec, &misbehaviour),
            Err(LightClientError::TrustedConsensusStateNotFound { .. })
        ));
    }

    #[test]
    fn test_verify_misbehaviour_accepts_valid_evidence_and_freezes() {
        let svc = service();
        let mut rec = record();

        let header1 = make_header(20, 2_000, Height::new(0, 10));
        let mut header2 = make_header(20, 2_500, Height::new(0, 10));
        header2.signed_header.commit.block_id.hash = vec![0xff; 32];
        // Re-sign header2's commit for its altered block id.
        let codec = MockTendermintCodec;
        let fixture_keys = keys();
        for i in 0..fixture_keys.len() {
            let sign_bytes =
                codec.vote_sign_bytes(CHAIN_ID, &header2.signed_header.commit, i);
            header2.signed_header.commit.signatures[i].signature =
                fixture_keys[i].sign(&sign_bytes).to_bytes().to_vec();
        }

        let misbehaviour = Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1,
            header2,
        };
        svc.verify_misbehaviour(&rec, &misbehaviour).unwrap();

        svc.update_on_misbehaviour(&mut rec);
        assert!(rec.client_state.is_frozen());
        assert_eq!(rec.status(2_000), crate::domain::client::Status::Frozen);
    }

    #[test]
    fn test_verify_misbehaviour_rejects_expired_trusted_state() {
        let svc = service();
        let rec = record();

        // Headers claiming times past the trusting period of the t=1000
        // trusted state.
        let misbehaviour = Misbehaviour {
            client_id: "07-tendermint-0".to_string(),
            header1: make_header(20, 12_000, Height::new(0, 10)),
            header2: make_header(25, 12_500, Height::new(0, 10)),
        };
        assert!(matches!(
            svc.verify_misbehaviour(&rec, &misbehaviour),
            Err(LightClientError::TrustedStateExpired { .. })
        ));
    }
}
