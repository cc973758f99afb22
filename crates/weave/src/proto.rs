//! Protobuf messages of the weave wire format, declared directly with `prost` derives.
//!
//! Module names follow the weave packages (`crypto`, `coin`, `sigs`, `cash`, ...). The envelope
//! is `grafain::Tx`.

#![allow(missing_docs)]

/// `weave.Metadata`, present on every message.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Metadata {
    #[prost(int32, tag = "1")]
    pub schema: i32,
}

impl Metadata {
    /// The only schema version this crate produces
    pub fn v1() -> Option<Self> {
        Some(Self { schema: 1 })
    }
}

pub mod crypto {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PublicKey {
        #[prost(oneof = "public_key::Pub", tags = "1")]
        pub r#pub: ::core::option::Option<public_key::Pub>,
    }

    pub mod public_key {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Pub {
            #[prost(bytes, tag = "1")]
            Ed25519(::prost::alloc::vec::Vec<u8>),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PrivateKey {
        #[prost(oneof = "private_key::Priv", tags = "1")]
        pub r#priv: ::core::option::Option<private_key::Priv>,
    }

    pub mod private_key {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Priv {
            #[prost(bytes, tag = "1")]
            Ed25519(::prost::alloc::vec::Vec<u8>),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Signature {
        #[prost(oneof = "signature::Sig", tags = "1")]
        pub sig: ::core::option::Option<signature::Sig>,
    }

    pub mod signature {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Sig {
            #[prost(bytes, tag = "1")]
            Ed25519(::prost::alloc::vec::Vec<u8>),
        }
    }
}

pub mod coin {
    /// A token amount split at 10^9.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Coin {
        #[prost(int64, tag = "1")]
        pub whole: i64,
        #[prost(int64, tag = "2")]
        pub fractional: i64,
        #[prost(string, tag = "3")]
        pub ticker: ::prost::alloc::string::String,
    }
}

pub mod sigs {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct StdSignature {
        #[prost(int64, tag = "1")]
        pub sequence: i64,
        #[prost(message, optional, tag = "2")]
        pub pubkey: ::core::option::Option<super::crypto::PublicKey>,
        #[prost(message, optional, tag = "4")]
        pub signature: ::core::option::Option<super::crypto::Signature>,
    }
}

pub mod cash {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct FeeInfo {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub payer: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub fees: ::core::option::Option<super::coin::Coin>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct SendMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub destination: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "4")]
        pub amount: ::core::option::Option<super::coin::Coin>,
        #[prost(string, tag = "5")]
        pub memo: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "6")]
        pub r#ref: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod escrow {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub arbiter: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub destination: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, repeated, tag = "5")]
        pub amount: ::prost::alloc::vec::Vec<super::coin::Coin>,
        #[prost(int64, tag = "6")]
        pub timeout: i64,
        #[prost(string, tag = "7")]
        pub memo: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReleaseMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub amount: ::prost::alloc::vec::Vec<super::coin::Coin>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReturnMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UpdatePartiesMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub escrow_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub source: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub arbiter: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "5")]
        pub destination: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod multisig {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Participant {
        #[prost(bytes = "vec", tag = "1")]
        pub signature: ::prost::alloc::vec::Vec<u8>,
        #[prost(uint32, tag = "2")]
        pub weight: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(message, repeated, tag = "2")]
        pub participants: ::prost::alloc::vec::Vec<Participant>,
        #[prost(uint32, tag = "3")]
        pub activation_threshold: u32,
        #[prost(uint32, tag = "4")]
        pub admin_threshold: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UpdateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub contract_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub participants: ::prost::alloc::vec::Vec<Participant>,
        #[prost(uint32, tag = "4")]
        pub activation_threshold: u32,
        #[prost(uint32, tag = "5")]
        pub admin_threshold: u32,
    }
}

pub mod aswap {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub source: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub preimage_hash: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "4")]
        pub destination: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, repeated, tag = "5")]
        pub amount: ::prost::alloc::vec::Vec<super::coin::Coin>,
        #[prost(int64, tag = "6")]
        pub timeout: i64,
        #[prost(string, tag = "7")]
        pub memo: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "8")]
        pub swap_id: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReleaseMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub swap_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub preimage: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ReturnMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub swap_id: ::prost::alloc::vec::Vec<u8>,
    }
}

pub mod gov {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateProposalMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(string, tag = "2")]
        pub title: ::prost::alloc::string::String,
        /// An encoded `grafain::ProposalOptions`
        #[prost(bytes = "vec", tag = "3")]
        pub raw_option: ::prost::alloc::vec::Vec<u8>,
        #[prost(string, tag = "4")]
        pub description: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "5")]
        pub election_rule_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(int64, tag = "6")]
        pub start_time: i64,
        #[prost(bytes = "vec", tag = "7")]
        pub author: ::prost::alloc::vec::Vec<u8>,
    }

    /// `selected` is 1 for yes, 2 for no, 3 for abstain. 0 is invalid.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct VoteMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub proposal_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(bytes = "vec", tag = "3")]
        pub voter: ::prost::alloc::vec::Vec<u8>,
        #[prost(int32, tag = "4")]
        pub selected: i32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateTextResolutionMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(string, tag = "2")]
        pub resolution: ::prost::alloc::string::String,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Fraction {
        #[prost(uint32, tag = "1")]
        pub numerator: u32,
        #[prost(uint32, tag = "2")]
        pub denominator: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UpdateElectionRuleMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub election_rule_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub threshold: ::core::option::Option<Fraction>,
        #[prost(message, optional, tag = "4")]
        pub quorum: ::core::option::Option<Fraction>,
        #[prost(uint32, tag = "5")]
        pub voting_period: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Elector {
        #[prost(bytes = "vec", tag = "1")]
        pub address: ::prost::alloc::vec::Vec<u8>,
        #[prost(uint32, tag = "2")]
        pub weight: u32,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct UpdateElectorateMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub electorate_id: ::prost::alloc::vec::Vec<u8>,
        #[prost(message, repeated, tag = "3")]
        pub diff_electors: ::prost::alloc::vec::Vec<Elector>,
    }
}

pub mod validators {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct PubKey {
        #[prost(string, tag = "1")]
        pub r#type: ::prost::alloc::string::String,
        #[prost(bytes = "vec", tag = "2")]
        pub data: ::prost::alloc::vec::Vec<u8>,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ValidatorUpdate {
        #[prost(message, optional, tag = "1")]
        pub pub_key: ::core::option::Option<PubKey>,
        #[prost(int64, tag = "2")]
        pub power: i64,
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ApplyDiffMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(message, repeated, tag = "2")]
        pub validator_updates: ::prost::alloc::vec::Vec<ValidatorUpdate>,
    }
}

pub mod artifact {
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct CreateArtifactMsg {
        #[prost(message, optional, tag = "1")]
        pub metadata: ::core::option::Option<super::Metadata>,
        #[prost(bytes = "vec", tag = "2")]
        pub owner: ::prost::alloc::vec::Vec<u8>,
        #[prost(string, tag = "3")]
        pub image: ::prost::alloc::string::String,
        #[prost(string, tag = "4")]
        pub checksum: ::prost::alloc::string::String,
    }
}

pub mod grafain {
    /// The signed transaction envelope.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Tx {
        #[prost(message, optional, tag = "1")]
        pub fees: ::core::option::Option<super::cash::FeeInfo>,
        #[prost(message, repeated, tag = "2")]
        pub signatures: ::prost::alloc::vec::Vec<super::sigs::StdSignature>,
        #[prost(bytes = "vec", repeated, tag = "4")]
        pub multisig: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
        #[prost(
            oneof = "tx::Sum",
            tags = "51, 52, 53, 54, 55, 56, 57, 70, 71, 72, 73, 75, 100"
        )]
        pub sum: ::core::option::Option<tx::Sum>,
    }

    pub mod tx {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Sum {
            #[prost(message, tag = "51")]
            SendMsg(super::super::cash::SendMsg),
            #[prost(message, tag = "52")]
            CreateEscrowMsg(super::super::escrow::CreateMsg),
            #[prost(message, tag = "53")]
            ReleaseEscrowMsg(super::super::escrow::ReleaseMsg),
            #[prost(message, tag = "54")]
            ReturnEscrowMsg(super::super::escrow::ReturnMsg),
            #[prost(message, tag = "55")]
            UpdateEscrowPartiesMsg(super::super::escrow::UpdatePartiesMsg),
            #[prost(message, tag = "56")]
            CreateContractMsg(super::super::multisig::CreateMsg),
            #[prost(message, tag = "57")]
            UpdateContractMsg(super::super::multisig::UpdateMsg),
            #[prost(message, tag = "70")]
            CreateSwapMsg(super::super::aswap::CreateMsg),
            #[prost(message, tag = "71")]
            ReleaseSwapMsg(super::super::aswap::ReleaseMsg),
            #[prost(message, tag = "72")]
            ReturnSwapMsg(super::super::aswap::ReturnMsg),
            #[prost(message, tag = "73")]
            CreateProposalMsg(super::super::gov::CreateProposalMsg),
            #[prost(message, tag = "75")]
            VoteMsg(super::super::gov::VoteMsg),
            #[prost(message, tag = "100")]
            CreateArtifactMsg(super::super::artifact::CreateArtifactMsg),
        }
    }

    /// The action a proposal executes, carried in `CreateProposalMsg::raw_option`.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ProposalOptions {
        #[prost(oneof = "proposal_options::Action", tags = "51, 53, 77, 78, 79, 80, 81")]
        pub action: ::core::option::Option<proposal_options::Action>,
    }

    pub mod proposal_options {
        #[derive(Clone, PartialEq, ::prost::Oneof)]
        pub enum Action {
            #[prost(message, tag = "51")]
            SendMsg(super::super::cash::SendMsg),
            #[prost(message, tag = "53")]
            EscrowReleaseMsg(super::super::escrow::ReleaseMsg),
            #[prost(message, tag = "77")]
            UpdateElectorateMsg(super::super::gov::UpdateElectorateMsg),
            #[prost(message, tag = "78")]
            UpdateElectionRuleMsg(super::super::gov::UpdateElectionRuleMsg),
            #[prost(message, tag = "79")]
            CreateTextResolutionMsg(super::super::gov::CreateTextResolutionMsg),
            #[prost(message, tag = "80")]
            ExecuteProposalBatchMsg(super::ExecuteProposalBatchMsg),
            #[prost(message, tag = "81")]
            ValidatorsApplyDiffMsg(super::super::validators::ApplyDiffMsg),
        }
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ExecuteProposalBatchMsg {
        #[prost(message, repeated, tag = "1")]
        pub messages: ::prost::alloc::vec::Vec<ProposalOptions>,
    }
}
