//! Governance, multisig and escrow support types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CodecError, CodecResult},
    types::primitives::{Address, Amount},
};

/// Key prefix for validator entries in a `SetValidators` diff.
pub const ED25519_VALIDATOR_PREFIX: &str = "ed25519_";

/// A member of a multisignature contract.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// The participant's address
    pub address: Address,
    /// The participant's voting weight
    pub weight: u32,
}

/// A ratio, used for election thresholds and quorums.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Fraction {
    /// Numerator
    pub numerator: u32,
    /// Denominator
    pub denominator: u32,
}

/// A ballot choice.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOption {
    /// In favor
    Yes,
    /// Against
    No,
    /// Counted for quorum only
    Abstain,
}

/// The action a governance proposal executes when it passes. Batches nest further actions.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ProposalAction {
    /// Record a text resolution on chain
    #[serde(rename = "gov_create_text_resolution")]
    CreateTextResolution {
        /// The resolution text
        resolution: String,
    },
    /// Execute several actions atomically
    #[serde(rename = "execute_proposal_batch")]
    ExecuteProposalBatch {
        /// The batched actions. Never empty.
        messages: Vec<ProposalAction>,
    },
    /// Release funds from an escrow the electorate arbitrates
    #[serde(rename = "escrow_release")]
    ReleaseEscrow {
        /// The escrow
        escrow_id: u64,
        /// Amounts to release
        amounts: Vec<Amount>,
    },
    /// Send tokens from an account the electorate controls
    #[serde(rename = "cash_send")]
    Send {
        /// Source account
        sender: Address,
        /// Destination account
        recipient: Address,
        /// Amount to send
        amount: Amount,
        /// Optional memo
        #[serde(default, skip_serializing_if = "Option::is_none")]
        memo: Option<String>,
    },
    /// Change validator powers. Keys are `ed25519_<hex pubkey>`, a power of 0 removes a
    /// validator.
    #[serde(rename = "validators_apply_diff")]
    SetValidators {
        /// Validator key to new power
        validator_updates: BTreeMap<String, u64>,
    },
    /// Change an election rule
    #[serde(rename = "gov_update_election_rule")]
    UpdateElectionRule {
        /// The rule to update
        election_rule_id: u64,
        /// New acceptance threshold
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<Fraction>,
        /// New quorum
        #[serde(default, skip_serializing_if = "Option::is_none")]
        quorum: Option<Fraction>,
        /// New voting period, in seconds
        voting_period: u32,
    },
    /// Change elector weights. A weight of 0 removes an elector.
    #[serde(rename = "gov_update_electorate")]
    UpdateElectorate {
        /// The electorate to update
        electorate_id: u64,
        /// Elector address to new weight
        diff_electors: BTreeMap<Address, u32>,
    },
}

impl ProposalAction {
    /// The kind tag of this action
    pub fn kind(&self) -> &'static str {
        match self {
            ProposalAction::CreateTextResolution { .. } => "gov_create_text_resolution",
            ProposalAction::ExecuteProposalBatch { .. } => "execute_proposal_batch",
            ProposalAction::ReleaseEscrow { .. } => "escrow_release",
            ProposalAction::Send { .. } => "cash_send",
            ProposalAction::SetValidators { .. } => "validators_apply_diff",
            ProposalAction::UpdateElectionRule { .. } => "gov_update_election_rule",
            ProposalAction::UpdateElectorate { .. } => "gov_update_electorate",
        }
    }

    /// How many batches deep this action nests. Anything but a batch is 0.
    pub fn batch_depth(&self) -> usize {
        match self {
            ProposalAction::ExecuteProposalBatch { messages } => {
                1 + messages.iter().map(Self::batch_depth).max().unwrap_or(0)
            }
            _ => 0,
        }
    }

    /// Check that no batch is empty and that batches nest at most `max_depth` deep.
    pub fn validate(&self, max_depth: usize) -> CodecResult<()> {
        self.validate_at(max_depth, 0)
    }

    fn validate_at(&self, max_depth: usize, depth: usize) -> CodecResult<()> {
        if let ProposalAction::ExecuteProposalBatch { messages } = self {
            if depth + 1 > max_depth {
                return Err(CodecError::ProposalBatchTooDeep { max: max_depth });
            }
            if messages.is_empty() {
                return Err(CodecError::EmptyProposalBatch);
            }
            for message in messages.iter() {
                message.validate_at(max_depth, depth + 1)?;
            }
        }
        Ok(())
    }
}

/// Build a `SetValidators` map key from an Ed25519 public key.
pub fn validator_key(pubkey: &[u8]) -> String {
    format!("{}{}", ED25519_VALIDATOR_PREFIX, hex::encode(pubkey))
}

/// Parse a `SetValidators` map key back into Ed25519 public key bytes.
pub fn parse_validator_key(key: &str) -> CodecResult<Vec<u8>> {
    let hex_part = key
        .strip_prefix(ED25519_VALIDATOR_PREFIX)
        .ok_or_else(|| CodecError::UnsupportedShape(format!("validator key {}", key)))?;
    let data = hex::decode(hex_part)
        .map_err(|_| CodecError::UnsupportedShape(format!("validator key {}", key)))?;
    if data.len() != 32 || hex_part != hex::encode(&data) {
        return Err(CodecError::UnsupportedShape(format!("validator key {}", key)));
    }
    Ok(data)
}
