//! Transaction model to protobuf messages, and the layout of the bytes signers sign.

use std::{
    convert::TryFrom,
    io::{Error as IOError, ErrorKind, Read, Write},
};

use prost::Message;

use xchain_core::{
    ser::{fixed_length, ByteFormat, SerError, SerResult},
    wire_memo, Address, Amount, ChainId, CodecError, CodecResult, Fee, FullSignature, Nonce, Participant,
    ProposalAction, Timeout, Transaction, TxBody,
};

use crate::{
    enc,
    proto::{
        aswap, cash, coin, crypto, escrow, gov, grafain, multisig, sigs, validators, Metadata,
    },
};

/// Weave coins always carry 9 fractional digits.
pub const FRACTIONAL_DIGITS: u32 = 9;

/// `10^FRACTIONAL_DIGITS`, the boundary between `whole` and `fractional`.
pub const FRACTION_SCALE: u128 = 1_000_000_000;

/// Prepended to every signable byte string.
pub const SIGN_MAGIC: [u8; 4] = [0x00, 0xca, 0xfe, 0x00];

/// The key type weave validators are registered under.
pub const VALIDATOR_KEY_TYPE: &str = "ed25519";

/// Split an amount into a weave coin.
pub fn encode_amount(amount: &Amount) -> CodecResult<coin::Coin> {
    if amount.fractional_digits != FRACTIONAL_DIGITS {
        return Err(CodecError::UnsupportedShape(format!(
            "amounts need {} fractional digits, got {}",
            FRACTIONAL_DIGITS, amount.fractional_digits
        )));
    }
    let out_of_range = || CodecError::UnsupportedShape(format!("quantity {} is out of range", amount.quantity));
    let atomics: u128 = amount.quantity.as_str().parse().map_err(|_| out_of_range())?;
    let whole = i64::try_from(atomics / FRACTION_SCALE).map_err(|_| out_of_range())?;
    Ok(coin::Coin {
        whole,
        fractional: (atomics % FRACTION_SCALE) as i64,
        ticker: amount.ticker.clone(),
    })
}

fn encode_amounts(amounts: &[Amount]) -> CodecResult<Vec<coin::Coin>> {
    amounts.iter().map(encode_amount).collect()
}

/// Ids are 8-byte big-endian.
pub fn encode_id(id: u64) -> Vec<u8> {
    id.to_be_bytes().to_vec()
}

fn encode_memo(memo: &Option<String>) -> CodecResult<String> {
    Ok(wire_memo(memo)?.to_owned())
}

fn encode_timestamp(timeout: &Timeout) -> CodecResult<i64> {
    match timeout {
        Timeout::Timestamp(ts) => Ok(*ts),
        Timeout::BlockHeight(_) => Err(CodecError::UnsupportedTimeoutKind),
    }
}

fn encode_optional_address(chain_id: &ChainId, address: &Option<Address>) -> CodecResult<Vec<u8>> {
    match address {
        Some(a) => enc::decode_address(chain_id, a),
        None => Ok(vec![]),
    }
}

fn encode_participants(
    chain_id: &ChainId,
    participants: &[Participant],
) -> CodecResult<Vec<multisig::Participant>> {
    participants
        .iter()
        .map(|p| {
            Ok(multisig::Participant {
                signature: enc::decode_address(chain_id, &p.address)?,
                weight: p.weight,
            })
        })
        .collect()
}

fn encode_fee(payer: &[u8], fee: &Option<Fee>) -> CodecResult<Option<cash::FeeInfo>> {
    let fee = match fee {
        Some(fee) => fee,
        None => return Ok(None),
    };
    if fee.gas_price.is_some() || fee.gas_limit.is_some() {
        return Err(CodecError::UnsupportedShape(
            "weave fees are flat token amounts".to_owned(),
        ));
    }
    let tokens = fee.tokens.as_ref().ok_or(CodecError::MissingField("fee.tokens"))?;
    Ok(Some(cash::FeeInfo {
        metadata: Metadata::v1(),
        payer: payer.to_vec(),
        fees: Some(encode_amount(tokens)?),
    }))
}

fn encode_send(
    chain_id: &ChainId,
    sender: &Address,
    recipient: &Address,
    amount: &Amount,
    memo: &Option<String>,
) -> CodecResult<cash::SendMsg> {
    Ok(cash::SendMsg {
        metadata: Metadata::v1(),
        source: enc::decode_address(chain_id, sender)?,
        destination: enc::decode_address(chain_id, recipient)?,
        amount: Some(encode_amount(amount)?),
        memo: encode_memo(memo)?,
        r#ref: vec![],
    })
}

/// Build the `ProposalOptions` message for an action. Call `ProposalAction::validate` first;
/// this does not check batch depth.
pub fn encode_action(
    chain_id: &ChainId,
    action: &ProposalAction,
) -> CodecResult<grafain::ProposalOptions> {
    use grafain::proposal_options::Action;

    let encoded = match action {
        ProposalAction::CreateTextResolution { resolution } => {
            Action::CreateTextResolutionMsg(gov::CreateTextResolutionMsg {
                metadata: Metadata::v1(),
                resolution: resolution.clone(),
            })
        }
        ProposalAction::ExecuteProposalBatch { messages } => {
            Action::ExecuteProposalBatchMsg(grafain::ExecuteProposalBatchMsg {
                messages: messages
                    .iter()
                    .map(|m| encode_action(chain_id, m))
                    .collect::<CodecResult<_>>()?,
            })
        }
        ProposalAction::ReleaseEscrow { escrow_id, amounts } => {
            Action::EscrowReleaseMsg(escrow::ReleaseMsg {
                metadata: Metadata::v1(),
                escrow_id: encode_id(*escrow_id),
                amount: encode_amounts(amounts)?,
            })
        }
        ProposalAction::Send {
            sender,
            recipient,
            amount,
            memo,
        } => Action::SendMsg(encode_send(chain_id, sender, recipient, amount, memo)?),
        ProposalAction::SetValidators { validator_updates } => {
            Action::ValidatorsApplyDiffMsg(validators::ApplyDiffMsg {
                metadata: Metadata::v1(),
                validator_updates: validator_updates
                    .iter()
                    .map(|(key, power)| {
                        Ok(validators::ValidatorUpdate {
                            pub_key: Some(validators::PubKey {
                                r#type: VALIDATOR_KEY_TYPE.to_owned(),
                                data: xchain_core::parse_validator_key(key)?,
                            }),
                            power: i64::try_from(*power).map_err(|_| {
                                CodecError::UnsupportedShape(format!("validator power {}", power))
                            })?,
                        })
                    })
                    .collect::<CodecResult<_>>()?,
            })
        }
        ProposalAction::UpdateElectionRule {
            election_rule_id,
            threshold,
            quorum,
            voting_period,
        } => Action::UpdateElectionRuleMsg(gov::UpdateElectionRuleMsg {
            metadata: Metadata::v1(),
            election_rule_id: encode_id(*election_rule_id),
            threshold: threshold.map(|f| gov::Fraction {
                numerator: f.numerator,
                denominator: f.denominator,
            }),
            quorum: quorum.map(|f| gov::Fraction {
                numerator: f.numerator,
                denominator: f.denominator,
            }),
            voting_period: *voting_period,
        }),
        ProposalAction::UpdateElectorate {
            electorate_id,
            diff_electors,
        } => Action::UpdateElectorateMsg(gov::UpdateElectorateMsg {
            metadata: Metadata::v1(),
            electorate_id: encode_id(*electorate_id),
            diff_electors: diff_electors
                .iter()
                .map(|(address, weight)| {
                    Ok(gov::Elector {
                        address: enc::decode_address(chain_id, address)?,
                        weight: *weight,
                    })
                })
                .collect::<CodecResult<_>>()?,
        }),
    };
    Ok(grafain::ProposalOptions {
        action: Some(encoded),
    })
}

/// Build the message carried in the envelope's `sum` oneof.
pub fn encode_body(tx: &Transaction, max_batch_depth: usize) -> CodecResult<grafain::tx::Sum> {
    use grafain::tx::Sum;

    let chain_id = &tx.creator.chain_id;
    let sum = match &tx.body {
        TxBody::Send(send) => Sum::SendMsg(encode_send(
            chain_id,
            &send.sender,
            &send.recipient,
            &send.amount,
            &send.memo,
        )?),
        TxBody::SwapOffer(offer) => Sum::CreateSwapMsg(aswap::CreateMsg {
            metadata: Metadata::v1(),
            source: enc::pubkey_to_payload(&tx.creator.pubkey)?,
            preimage_hash: offer.hash.bytes().to_vec(),
            destination: enc::decode_address(chain_id, &offer.recipient)?,
            amount: encode_amounts(&offer.amounts)?,
            timeout: encode_timestamp(&offer.timeout)?,
            memo: encode_memo(&offer.memo)?,
            swap_id: offer.swap_id.bytes().to_vec(),
        }),
        TxBody::SwapClaim(claim) => Sum::ReleaseSwapMsg(aswap::ReleaseMsg {
            metadata: Metadata::v1(),
            swap_id: claim.swap_id.bytes().to_vec(),
            preimage: claim.preimage.bytes().to_vec(),
        }),
        TxBody::SwapAbort(abort) => Sum::ReturnSwapMsg(aswap::ReturnMsg {
            metadata: Metadata::v1(),
            swap_id: abort.swap_id.bytes().to_vec(),
        }),
        TxBody::CreateArtifact(artifact) => {
            Sum::CreateArtifactMsg(crate::proto::artifact::CreateArtifactMsg {
                metadata: Metadata::v1(),
                owner: enc::pubkey_to_payload(&tx.creator.pubkey)?,
                image: artifact.image.clone(),
                checksum: artifact.checksum.clone(),
            })
        }
        TxBody::CreateMultisignature(create) => Sum::CreateContractMsg(multisig::CreateMsg {
            metadata: Metadata::v1(),
            participants: encode_participants(chain_id, &create.participants)?,
            activation_threshold: create.activation_threshold,
            admin_threshold: create.admin_threshold,
        }),
        TxBody::UpdateMultisignature(update) => Sum::UpdateContractMsg(multisig::UpdateMsg {
            metadata: Metadata::v1(),
            contract_id: encode_id(update.contract_id),
            participants: encode_participants(chain_id, &update.participants)?,
            activation_threshold: update.activation_threshold,
            admin_threshold: update.admin_threshold,
        }),
        TxBody::CreateEscrow(create) => Sum::CreateEscrowMsg(escrow::CreateMsg {
            metadata: Metadata::v1(),
            source: enc::decode_address(chain_id, &create.sender)?,
            arbiter: enc::decode_address(chain_id, &create.arbiter)?,
            destination: enc::decode_address(chain_id, &create.recipient)?,
            amount: encode_amounts(&create.amounts)?,
            timeout: encode_timestamp(&create.timeout)?,
            memo: encode_memo(&create.memo)?,
        }),
        TxBody::ReleaseEscrow(release) => Sum::ReleaseEscrowMsg(escrow::ReleaseMsg {
            metadata: Metadata::v1(),
            escrow_id: encode_id(release.escrow_id),
            amount: encode_amounts(&release.amounts)?,
        }),
        TxBody::ReturnEscrow(ret) => Sum::ReturnEscrowMsg(escrow::ReturnMsg {
            metadata: Metadata::v1(),
            escrow_id: encode_id(ret.escrow_id),
        }),
        TxBody::UpdateEscrowParties(update) => {
            Sum::UpdateEscrowPartiesMsg(escrow::UpdatePartiesMsg {
                metadata: Metadata::v1(),
                escrow_id: encode_id(update.escrow_id),
                source: encode_optional_address(chain_id, &update.sender)?,
                arbiter: encode_optional_address(chain_id, &update.arbiter)?,
                destination: encode_optional_address(chain_id, &update.recipient)?,
            })
        }
        TxBody::CreateProposal(proposal) => {
            proposal.action.validate(max_batch_depth)?;
            Sum::CreateProposalMsg(gov::CreateProposalMsg {
                metadata: Metadata::v1(),
                title: proposal.title.clone(),
                raw_option: encode_action(chain_id, &proposal.action)?.encode_to_vec(),
                description: proposal.description.clone(),
                election_rule_id: encode_id(proposal.election_rule_id),
                start_time: proposal.start_time,
                author: enc::decode_address(chain_id, &proposal.author)?,
            })
        }
        TxBody::Vote(vote) => Sum::VoteMsg(gov::VoteMsg {
            metadata: Metadata::v1(),
            proposal_id: encode_id(vote.proposal_id),
            voter: vec![],
            selected: match vote.selection {
                xchain_core::VoteOption::Yes => 1,
                xchain_core::VoteOption::No => 2,
                xchain_core::VoteOption::Abstain => 3,
            },
        }),
        TxBody::Erc20Approve(_) => return Err(tx.body.unsupported()),
    };
    Ok(sum)
}

/// Build the envelope without signatures.
pub fn encode_unsigned(tx: &Transaction, max_batch_depth: usize) -> CodecResult<grafain::Tx> {
    let payer = enc::pubkey_to_payload(&tx.creator.pubkey)?;
    Ok(grafain::Tx {
        fees: encode_fee(&payer, &tx.fee)?,
        signatures: vec![],
        multisig: tx.multisig.iter().copied().map(encode_id).collect(),
        sum: Some(encode_body(tx, max_batch_depth)?),
    })
}

/// Wrap a full signature in its protobuf message. Ed25519 signatures are 64 bytes.
pub fn encode_signature(signature: &FullSignature) -> CodecResult<sigs::StdSignature> {
    let sig: [u8; 64] = fixed_length("signature", signature.signature.items())?;
    Ok(sigs::StdSignature {
        sequence: encode_sequence(signature.nonce)?,
        pubkey: Some(enc::encode_pubkey(&signature.pubkey)?),
        signature: Some(crypto::Signature {
            sig: Some(crypto::signature::Sig::Ed25519(sig.to_vec())),
        }),
    })
}

fn encode_sequence(nonce: Nonce) -> CodecResult<i64> {
    i64::try_from(nonce)
        .map_err(|_| CodecError::UnsupportedShape(format!("nonce {} exceeds i64", nonce)))
}

/// The byte string a weave signer signs:
/// `00 CA FE 00 || len(chain_id) || chain_id || nonce (i64 BE) || unsigned tx`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignBytes {
    chain_id: String,
    nonce: i64,
    tx_bytes: Vec<u8>,
}

impl SignBytes {
    /// Instantiate. Chain ids are at most 255 bytes, nonces at most `i64::MAX`.
    pub fn new(chain_id: &ChainId, nonce: Nonce, tx_bytes: Vec<u8>) -> CodecResult<Self> {
        if chain_id.as_str().len() > u8::MAX as usize {
            return Err(CodecError::InvalidChainId(chain_id.to_string()));
        }
        Ok(Self {
            chain_id: chain_id.to_string(),
            nonce: encode_sequence(nonce)?,
            tx_bytes,
        })
    }

    /// The chain id
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// The signer's sequence
    pub fn nonce(&self) -> i64 {
        self.nonce
    }

    /// The unsigned envelope
    pub fn tx_bytes(&self) -> &[u8] {
        &self.tx_bytes
    }
}

impl ByteFormat for SignBytes {
    type Error = SerError;

    fn serialized_length(&self) -> usize {
        SIGN_MAGIC.len() + 1 + self.chain_id.len() + 8 + self.tx_bytes.len()
    }

    fn read_from<R>(reader: &mut R, _limit: usize) -> SerResult<Self>
    where
        R: Read,
        Self: std::marker::Sized,
    {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != SIGN_MAGIC {
            return Err(IOError::new(ErrorKind::InvalidData, "bad sign bytes magic").into());
        }
        let mut len = [0u8; 1];
        reader.read_exact(&mut len)?;
        let mut chain_id = vec![0u8; len[0] as usize];
        reader.read_exact(&mut chain_id)?;
        let chain_id = String::from_utf8(chain_id)
            .map_err(|e| IOError::new(ErrorKind::InvalidData, e))?;
        let mut nonce = [0u8; 8];
        reader.read_exact(&mut nonce)?;
        let mut tx_bytes = vec![];
        reader.read_to_end(&mut tx_bytes)?;
        Ok(Self {
            chain_id,
            nonce: i64::from_be_bytes(nonce),
            tx_bytes,
        })
    }

    fn write_to<W>(&self, writer: &mut W) -> SerResult<usize>
    where
        W: Write,
    {
        writer.write_all(&SIGN_MAGIC)?;
        writer.write_all(&[self.chain_id.len() as u8])?;
        writer.write_all(self.chain_id.as_bytes())?;
        writer.write_all(&self.nonce.to_be_bytes())?;
        writer.write_all(&self.tx_bytes)?;
        Ok(self.serialized_length())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use xchain_core::{Identity, PubkeyBundle, SendTx};

    #[test]
    fn it_splits_amounts_at_nine_digits() {
        let cases = [
            ("0", 0, 0),
            ("1", 0, 1),
            ("999999999", 0, 999_999_999),
            ("1000000000", 1, 0),
            ("123456789012345678", 123_456_789, 12_345_678),
        ];
        for (quantity, whole, fractional) in cases.iter() {
            let coin = encode_amount(&Amount::new(quantity, 9, "IOV").unwrap()).unwrap();
            assert_eq!(coin.whole, *whole, "{}", quantity);
            assert_eq!(coin.fractional, *fractional, "{}", quantity);
            assert_eq!(coin.ticker, "IOV");
        }
    }

    #[test]
    fn it_rejects_unrepresentable_amounts() {
        let cases = [
            Amount::new("1", 18, "ETH").unwrap(),
            Amount::new("9223372036854775808000000000", 9, "IOV").unwrap(),
            Amount::new(&"9".repeat(60), 9, "IOV").unwrap(),
        ];
        for amount in cases.iter() {
            match encode_amount(amount) {
                Err(CodecError::UnsupportedShape(_)) => {}
                _ => assert!(false, "expected UnsupportedShape"),
            }
        }
    }

    #[test]
    fn it_lays_out_sign_bytes() {
        let sign_bytes = SignBytes::new(&"test-123".into(), 17, vec![0xaa, 0xbb]).unwrap();
        let expected = "00cafe0008746573742d3132330000000000000011aabb";
        assert_eq!(sign_bytes.serialize_hex().unwrap(), expected);
        assert_eq!(sign_bytes.serialized_length(), expected.len() / 2);
        assert_eq!(SignBytes::deserialize_hex(expected).unwrap(), sign_bytes);
        assert!(SignBytes::deserialize_hex("01cafe00").is_err());
    }

    #[test]
    fn it_writes_sign_bytes_through_short_writers() {
        struct Trickle(Vec<u8>);
        impl Write for Trickle {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                let n = buf.len().min(3);
                self.0.extend_from_slice(&buf[..n]);
                Ok(n)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let sign_bytes = SignBytes::new(&"test-123".into(), 17, vec![0xaa, 0xbb]).unwrap();
        let mut trickle = Trickle(vec![]);
        let written = sign_bytes.write_to(&mut trickle).unwrap();
        assert_eq!(written, sign_bytes.serialized_length());
        assert_eq!(hex::encode(&trickle.0), "00cafe0008746573742d3132330000000000000011aabb");
    }

    #[test]
    fn it_bounds_sign_bytes_inputs() {
        let long: ChainId = "x".repeat(256).into();
        match SignBytes::new(&long, 0, vec![]) {
            Err(CodecError::InvalidChainId(_)) => {}
            _ => assert!(false, "expected InvalidChainId"),
        }
        assert!(SignBytes::new(&"x".repeat(255).into(), 0, vec![]).is_ok());
        match SignBytes::new(&"chain".into(), u64::MAX, vec![]) {
            Err(CodecError::UnsupportedShape(_)) => {}
            _ => assert!(false, "expected UnsupportedShape"),
        }
    }

    #[test]
    fn it_requires_timestamp_timeouts_and_token_fees() {
        assert_eq!(encode_timestamp(&Timeout::Timestamp(12)).unwrap(), 12);
        match encode_timestamp(&Timeout::BlockHeight(12)) {
            Err(CodecError::UnsupportedTimeoutKind) => {}
            _ => assert!(false, "expected UnsupportedTimeoutKind"),
        }

        let gas = Fee {
            gas_limit: Some("21000".parse().unwrap()),
            ..Default::default()
        };
        match encode_fee(&[0u8; 20], &Some(gas)) {
            Err(CodecError::UnsupportedShape(_)) => {}
            _ => assert!(false, "expected UnsupportedShape"),
        }
        match encode_fee(&[0u8; 20], &Some(Fee::default())) {
            Err(CodecError::MissingField("fee.tokens")) => {}
            _ => assert!(false, "expected MissingField"),
        }
        assert!(encode_fee(&[0u8; 20], &None).unwrap().is_none());
    }

    #[test]
    fn it_refuses_erc20_approvals() {
        let creator = Identity::new("iov-lovenet", PubkeyBundle::ed25519(&[1u8; 32]));
        let approve = Transaction::new(
            creator.clone(),
            TxBody::Erc20Approve(xchain_core::Erc20ApproveTx {
                spender: "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea".into(),
                amount: Amount::new("1", 9, "IOV").unwrap(),
            }),
        );
        match encode_unsigned(&approve, 1) {
            Err(CodecError::UnsupportedMessageType(kind)) => assert_eq!(kind, "erc20/approve"),
            _ => assert!(false, "expected UnsupportedMessageType"),
        }

        let send = Transaction::new(
            creator,
            TxBody::Send(SendTx {
                sender: "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea".into(),
                recipient: "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea".into(),
                amount: Amount::new("1", 9, "IOV").unwrap(),
                memo: None,
            }),
        );
        let unsigned = encode_unsigned(&send, 1).unwrap();
        assert!(unsigned.signatures.is_empty());
        assert!(unsigned.fees.is_none());
    }
}
