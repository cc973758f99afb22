//! The transaction model. `TxBody` is a closed sum type tagged by a `kind` string, so every
//! transaction is exactly one variant.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::CodecError,
    types::{
        governance::{Participant, ProposalAction, VoteOption},
        keys::{Identity, PubkeyBundle, SignatureBytes},
        primitives::{Address, Amount, Fee, Nonce},
        swap::{Preimage, SwapHash, SwapId, Timeout},
    },
};

/// Namespace prefix of the weave-specific transaction kinds.
pub const GRAFAIN_KIND_PREFIX: &str = "grafain/";

/// Discriminant of a `TxBody`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TxKind {
    /// `bcp/send`
    Send,
    /// `bcp/swap_offer`
    SwapOffer,
    /// `bcp/swap_claim`
    SwapClaim,
    /// `bcp/swap_abort`
    SwapAbort,
    /// `grafain/create_artifact`
    CreateArtifact,
    /// `grafain/create_multisignature_contract`
    CreateMultisignature,
    /// `grafain/update_multisignature_contract`
    UpdateMultisignature,
    /// `grafain/create_escrow`
    CreateEscrow,
    /// `grafain/release_escrow`
    ReleaseEscrow,
    /// `grafain/return_escrow`
    ReturnEscrow,
    /// `grafain/update_escrow_parties`
    UpdateEscrowParties,
    /// `grafain/create_proposal`
    CreateProposal,
    /// `grafain/vote`
    Vote,
    /// `erc20/approve`
    Erc20Approve,
}

impl TxKind {
    /// Every kind, in declaration order
    pub const ALL: [TxKind; 14] = [
        TxKind::Send,
        TxKind::SwapOffer,
        TxKind::SwapClaim,
        TxKind::SwapAbort,
        TxKind::CreateArtifact,
        TxKind::CreateMultisignature,
        TxKind::UpdateMultisignature,
        TxKind::CreateEscrow,
        TxKind::ReleaseEscrow,
        TxKind::ReturnEscrow,
        TxKind::UpdateEscrowParties,
        TxKind::CreateProposal,
        TxKind::Vote,
        TxKind::Erc20Approve,
    ];

    /// The kind tag
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Send => "bcp/send",
            TxKind::SwapOffer => "bcp/swap_offer",
            TxKind::SwapClaim => "bcp/swap_claim",
            TxKind::SwapAbort => "bcp/swap_abort",
            TxKind::CreateArtifact => "grafain/create_artifact",
            TxKind::CreateMultisignature => "grafain/create_multisignature_contract",
            TxKind::UpdateMultisignature => "grafain/update_multisignature_contract",
            TxKind::CreateEscrow => "grafain/create_escrow",
            TxKind::ReleaseEscrow => "grafain/release_escrow",
            TxKind::ReturnEscrow => "grafain/return_escrow",
            TxKind::UpdateEscrowParties => "grafain/update_escrow_parties",
            TxKind::CreateProposal => "grafain/create_proposal",
            TxKind::Vote => "grafain/vote",
            TxKind::Erc20Approve => "erc20/approve",
        }
    }

    /// True for the cross-chain base kinds every backend family shares.
    pub fn is_base_kind(&self) -> bool {
        matches!(
            self,
            TxKind::Send | TxKind::SwapOffer | TxKind::SwapClaim | TxKind::SwapAbort
        )
    }
}

impl FromStr for TxKind {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TxKind::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| CodecError::UnsupportedMessageType(s.to_owned()))
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True if a weave chain understands transactions of this kind: anything in the `grafain/`
/// namespace, plus the base send and swap kinds.
pub fn is_grafain_kind(kind: &str) -> bool {
    kind.starts_with(GRAFAIN_KIND_PREFIX)
        || kind
            .parse::<TxKind>()
            .map(|k| k.is_base_kind())
            .unwrap_or(false)
}

/// Move tokens between accounts.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SendTx {
    /// Source account
    pub sender: Address,
    /// Destination account
    pub recipient: Address,
    /// Amount to send
    pub amount: Amount,
    /// Optional memo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Lock funds behind a hash until the recipient reveals the preimage or the timeout passes.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SwapOfferTx {
    /// Offerer-chosen swap id
    pub swap_id: SwapId,
    /// Who may claim the funds
    pub recipient: Address,
    /// The hash lock
    pub hash: SwapHash,
    /// After this, the offerer may abort
    pub timeout: Timeout,
    /// Locked amounts
    pub amounts: Vec<Amount>,
    /// Optional memo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Claim a swap by revealing its preimage.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SwapClaimTx {
    /// The swap being claimed
    pub swap_id: SwapId,
    /// The secret
    pub preimage: Preimage,
}

/// Return an expired swap to its offerer.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SwapAbortTx {
    /// The swap being aborted
    pub swap_id: SwapId,
}

/// Register a container image artifact.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CreateArtifactTx {
    /// Image reference
    pub image: String,
    /// Image checksum
    pub checksum: String,
}

/// Create a multisignature contract.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CreateMultisignatureTx {
    /// Members
    pub participants: Vec<Participant>,
    /// Weight needed to act through the contract
    pub activation_threshold: u32,
    /// Weight needed to modify the contract
    pub admin_threshold: u32,
}

/// Replace the configuration of a multisignature contract.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UpdateMultisignatureTx {
    /// The contract to update
    pub contract_id: u64,
    /// New members
    pub participants: Vec<Participant>,
    /// Weight needed to act through the contract
    pub activation_threshold: u32,
    /// Weight needed to modify the contract
    pub admin_threshold: u32,
}

/// Lock funds under the control of an arbiter.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct CreateEscrowTx {
    /// Funds come from here, and return here on timeout
    pub sender: Address,
    /// May release or return the funds
    pub arbiter: Address,
    /// Funds go here on release
    pub recipient: Address,
    /// Locked amounts
    pub amounts: Vec<Amount>,
    /// After this, anyone may return the funds
    pub timeout: Timeout,
    /// Optional memo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Release (part of) an escrow to its recipient.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReleaseEscrowTx {
    /// The escrow
    pub escrow_id: u64,
    /// Amounts to release
    pub amounts: Vec<Amount>,
}

/// Return an escrow to its sender.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ReturnEscrowTx {
    /// The escrow
    pub escrow_id: u64,
}

/// Replace some of the parties of an escrow.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct UpdateEscrowPartiesTx {
    /// The escrow
    pub escrow_id: u64,
    /// New sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<Address>,
    /// New arbiter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbiter: Option<Address>,
    /// New recipient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<Address>,
}

/// Open a governance proposal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CreateProposalTx {
    /// Short title
    pub title: String,
    /// What happens if the proposal passes
    pub action: ProposalAction,
    /// Long description
    pub description: String,
    /// The rule the vote follows
    pub election_rule_id: u64,
    /// Voting opens at this unix timestamp, in seconds
    pub start_time: i64,
    /// The proposer
    pub author: Address,
}

/// Vote on a governance proposal.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct VoteTx {
    /// The proposal
    pub proposal_id: u64,
    /// The ballot
    pub selection: VoteOption,
}

/// Allow `spender` to move up to `amount` of an ERC20 token on the creator's behalf.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Erc20ApproveTx {
    /// Who may spend
    pub spender: Address,
    /// Allowance, in the token's ticker
    pub amount: Amount,
}

/// The kind-specific content of a transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TxBody {
    /// See `SendTx`
    #[serde(rename = "bcp/send")]
    Send(SendTx),
    /// See `SwapOfferTx`
    #[serde(rename = "bcp/swap_offer")]
    SwapOffer(SwapOfferTx),
    /// See `SwapClaimTx`
    #[serde(rename = "bcp/swap_claim")]
    SwapClaim(SwapClaimTx),
    /// See `SwapAbortTx`
    #[serde(rename = "bcp/swap_abort")]
    SwapAbort(SwapAbortTx),
    /// See `CreateArtifactTx`
    #[serde(rename = "grafain/create_artifact")]
    CreateArtifact(CreateArtifactTx),
    /// See `CreateMultisignatureTx`
    #[serde(rename = "grafain/create_multisignature_contract")]
    CreateMultisignature(CreateMultisignatureTx),
    /// See `UpdateMultisignatureTx`
    #[serde(rename = "grafain/update_multisignature_contract")]
    UpdateMultisignature(UpdateMultisignatureTx),
    /// See `CreateEscrowTx`
    #[serde(rename = "grafain/create_escrow")]
    CreateEscrow(CreateEscrowTx),
    /// See `ReleaseEscrowTx`
    #[serde(rename = "grafain/release_escrow")]
    ReleaseEscrow(ReleaseEscrowTx),
    /// See `ReturnEscrowTx`
    #[serde(rename = "grafain/return_escrow")]
    ReturnEscrow(ReturnEscrowTx),
    /// See `UpdateEscrowPartiesTx`
    #[serde(rename = "grafain/update_escrow_parties")]
    UpdateEscrowParties(UpdateEscrowPartiesTx),
    /// See `CreateProposalTx`
    #[serde(rename = "grafain/create_proposal")]
    CreateProposal(CreateProposalTx),
    /// See `VoteTx`
    #[serde(rename = "grafain/vote")]
    Vote(VoteTx),
    /// See `Erc20ApproveTx`
    #[serde(rename = "erc20/approve")]
    Erc20Approve(Erc20ApproveTx),
}

impl TxBody {
    /// The discriminant of this body
    pub fn kind(&self) -> TxKind {
        match self {
            TxBody::Send(_) => TxKind::Send,
            TxBody::SwapOffer(_) => TxKind::SwapOffer,
            TxBody::SwapClaim(_) => TxKind::SwapClaim,
            TxBody::SwapAbort(_) => TxKind::SwapAbort,
            TxBody::CreateArtifact(_) => TxKind::CreateArtifact,
            TxBody::CreateMultisignature(_) => TxKind::CreateMultisignature,
            TxBody::UpdateMultisignature(_) => TxKind::UpdateMultisignature,
            TxBody::CreateEscrow(_) => TxKind::CreateEscrow,
            TxBody::ReleaseEscrow(_) => TxKind::ReleaseEscrow,
            TxBody::ReturnEscrow(_) => TxKind::ReturnEscrow,
            TxBody::UpdateEscrowParties(_) => TxKind::UpdateEscrowParties,
            TxBody::CreateProposal(_) => TxKind::CreateProposal,
            TxBody::Vote(_) => TxKind::Vote,
            TxBody::Erc20Approve(_) => TxKind::Erc20Approve,
        }
    }

    /// An `UnsupportedMessageType` error naming this body's kind. For backends to reject
    /// kinds they cannot carry.
    pub fn unsupported(&self) -> CodecError {
        CodecError::UnsupportedMessageType(self.kind().as_str().to_owned())
    }
}

/// An unsigned transaction.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Who signs first. Determines the chain.
    pub creator: Identity,
    /// Optional fee
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Fee>,
    /// Ids of multisignature contracts authorizing this transaction. Weave chains only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub multisig: Vec<u64>,
    /// The kind-specific content
    #[serde(flatten)]
    pub body: TxBody,
}

impl Transaction {
    /// Instantiate a transaction without fee or multisig
    pub fn new(creator: Identity, body: TxBody) -> Self {
        Self {
            creator,
            fee: None,
            multisig: vec![],
            body,
        }
    }

    /// Set the fee
    pub fn with_fee(mut self, fee: Fee) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Set the multisig contract ids
    pub fn with_multisig(mut self, multisig: Vec<u64>) -> Self {
        self.multisig = multisig;
        self
    }

    /// The discriminant of the body
    pub fn kind(&self) -> TxKind {
        self.body.kind()
    }
}

/// A signature along with what is needed to check it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FullSignature {
    /// The signer's nonce at signing time
    pub nonce: Nonce,
    /// The signer's public key
    pub pubkey: PubkeyBundle,
    /// The signature
    pub signature: SignatureBytes,
}

/// A transaction with at least one signature.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// The signed transaction
    pub transaction: Transaction,
    /// The creator's signature
    pub primary_signature: FullSignature,
    /// Further signatures, e.g. from multisig participants
    #[serde(default)]
    pub other_signatures: Vec<FullSignature>,
}

impl SignedTransaction {
    /// All signatures, primary first
    pub fn signatures(&self) -> impl Iterator<Item = &FullSignature> {
        std::iter::once(&self.primary_signature).chain(self.other_signatures.iter())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::keys::PubkeyBundle;

    #[test]
    fn it_maps_every_kind_both_ways() {
        for kind in TxKind::ALL.iter() {
            assert_eq!(kind.as_str().parse::<TxKind>().unwrap(), *kind);
        }
        match "bcp/unknown".parse::<TxKind>() {
            Err(CodecError::UnsupportedMessageType(s)) => assert_eq!(s, "bcp/unknown"),
            _ => assert!(false, "expected UnsupportedMessageType"),
        }
    }

    #[test]
    fn it_classifies_grafain_kinds() {
        let cases = [
            ("bcp/send", true),
            ("bcp/swap_offer", true),
            ("bcp/swap_claim", true),
            ("bcp/swap_abort", true),
            ("grafain/vote", true),
            ("grafain/anything_new", true),
            ("erc20/approve", false),
            ("bcp/register_username", false),
            ("", false),
        ];
        for (kind, expected) in cases.iter() {
            assert_eq!(is_grafain_kind(kind), *expected, "{}", kind);
        }
    }

    #[test]
    fn it_classifies_json_by_discriminant() {
        let json = r#"{
            "creator": {"chain_id": "iov-lovenet", "pubkey": {"algo": "ed25519", "data": "aa"}},
            "kind": "grafain/vote",
            "proposal_id": 5,
            "selection": "abstain"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.kind(), TxKind::Vote);
        assert_eq!(
            tx.body,
            TxBody::Vote(VoteTx {
                proposal_id: 5,
                selection: VoteOption::Abstain
            })
        );
        assert_eq!(tx.creator.pubkey, PubkeyBundle::ed25519(&[0xaa]));

        let missing = json.replace("\"kind\": \"grafain/vote\",", "");
        assert!(serde_json::from_str::<Transaction>(&missing).is_err());
        let unknown = json.replace("grafain/vote", "grafain/veto");
        assert!(serde_json::from_str::<Transaction>(&unknown).is_err());
    }
}
