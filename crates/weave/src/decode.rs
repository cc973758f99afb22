//! Protobuf messages back into the transaction model.

use std::collections::BTreeMap;

use prost::Message;

use xchain_core::{
    ser::fixed_length, validator_key, Address, Amount, ChainId, CodecError, CodecResult,
    CreateArtifactTx, CreateEscrowTx, CreateMultisignatureTx, CreateProposalTx, Fee,
    FullSignature, Fraction, Participant, Preimage, ProposalAction, Quantity, ReleaseEscrowTx,
    ReturnEscrowTx, SendTx, SwapAbortTx, SwapClaimTx, SwapHash, SwapId, SwapOfferTx, Timeout,
    TxBody, UpdateEscrowPartiesTx, UpdateMultisignatureTx, VoteOption, VoteTx,
};

use crate::{
    enc,
    encode::{FRACTIONAL_DIGITS, FRACTION_SCALE, VALIDATOR_KEY_TYPE},
    proto::{cash, coin, crypto, gov, grafain, multisig, sigs},
};

fn malformed(what: &str) -> CodecError {
    CodecError::MalformedEncoding(what.to_owned())
}

/// Join a weave coin back into an amount with 9 fractional digits.
pub fn decode_amount(coin: &coin::Coin) -> CodecResult<Amount> {
    if coin.whole < 0 || coin.fractional < 0 || coin.fractional as u128 >= FRACTION_SCALE {
        return Err(malformed("coin out of range"));
    }
    let atomics = coin.whole as u128 * FRACTION_SCALE + coin.fractional as u128;
    Ok(Amount {
        quantity: Quantity::from(atomics),
        fractional_digits: FRACTIONAL_DIGITS,
        ticker: coin.ticker.clone(),
    })
}

fn decode_amounts(coins: &[coin::Coin]) -> CodecResult<Vec<Amount>> {
    coins.iter().map(decode_amount).collect()
}

fn required_amount(coin: &Option<coin::Coin>) -> CodecResult<Amount> {
    decode_amount(coin.as_ref().ok_or(CodecError::MissingField("amount"))?)
}

/// Read an 8-byte big-endian id.
pub fn decode_id(field: &'static str, bytes: &[u8]) -> CodecResult<u64> {
    Ok(u64::from_be_bytes(fixed_length(field, bytes)?))
}

fn decode_memo(memo: &str) -> Option<String> {
    if memo.is_empty() {
        None
    } else {
        Some(memo.to_owned())
    }
}

fn decode_optional_address(chain_id: &ChainId, payload: &[u8]) -> CodecResult<Option<Address>> {
    if payload.is_empty() {
        Ok(None)
    } else {
        Ok(Some(enc::encode_address(chain_id, payload)?))
    }
}

fn decode_participants(
    chain_id: &ChainId,
    participants: &[multisig::Participant],
) -> CodecResult<Vec<Participant>> {
    participants
        .iter()
        .map(|p| {
            Ok(Participant {
                address: enc::encode_address(chain_id, &p.signature)?,
                weight: p.weight,
            })
        })
        .collect()
}

fn decode_fraction(fraction: &Option<gov::Fraction>) -> Option<Fraction> {
    fraction.as_ref().map(|f| Fraction {
        numerator: f.numerator,
        denominator: f.denominator,
    })
}

/// Read the fee of an envelope. The payer is implied by the creator.
pub fn decode_fee(fees: &Option<cash::FeeInfo>) -> CodecResult<Option<Fee>> {
    match fees {
        None => Ok(None),
        Some(info) => {
            let tokens = info.fees.as_ref().ok_or(CodecError::MissingField("fees"))?;
            Ok(Some(Fee::tokens(decode_amount(tokens)?)))
        }
    }
}

/// Unwrap a signature message.
pub fn decode_signature(signature: &sigs::StdSignature) -> CodecResult<FullSignature> {
    let pubkey = signature
        .pubkey
        .as_ref()
        .ok_or(CodecError::MissingField("pubkey"))?;
    let sig = match signature.signature.as_ref().and_then(|s| s.sig.as_ref()) {
        Some(crypto::signature::Sig::Ed25519(sig)) => sig,
        None => return Err(CodecError::MissingField("signature")),
    };
    if signature.sequence < 0 {
        return Err(malformed("negative sequence"));
    }
    Ok(FullSignature {
        nonce: signature.sequence as u64,
        pubkey: enc::decode_pubkey(pubkey)?,
        signature: sig.as_slice().into(),
    })
}

fn decode_send(chain_id: &ChainId, msg: &cash::SendMsg) -> CodecResult<SendTx> {
    Ok(SendTx {
        sender: enc::encode_address(chain_id, &msg.source)?,
        recipient: enc::encode_address(chain_id, &msg.destination)?,
        amount: required_amount(&msg.amount)?,
        memo: decode_memo(&msg.memo),
    })
}

/// Rebuild a proposal action. Batches nested deeper than `max_depth`, and empty batches, are
/// rejected while decoding.
pub fn decode_action(
    chain_id: &ChainId,
    options: &grafain::ProposalOptions,
    max_depth: usize,
) -> CodecResult<ProposalAction> {
    decode_action_at(chain_id, options, max_depth, 0)
}

fn decode_action_at(
    chain_id: &ChainId,
    options: &grafain::ProposalOptions,
    max_depth: usize,
    depth: usize,
) -> CodecResult<ProposalAction> {
    use grafain::proposal_options::Action;

    let action = options
        .action
        .as_ref()
        .ok_or(CodecError::MissingField("action"))?;
    let decoded = match action {
        Action::CreateTextResolutionMsg(msg) => ProposalAction::CreateTextResolution {
            resolution: msg.resolution.clone(),
        },
        Action::ExecuteProposalBatchMsg(batch) => {
            if depth + 1 > max_depth {
                return Err(CodecError::ProposalBatchTooDeep { max: max_depth });
            }
            if batch.messages.is_empty() {
                return Err(CodecError::EmptyProposalBatch);
            }
            ProposalAction::ExecuteProposalBatch {
                messages: batch
                    .messages
                    .iter()
                    .map(|m| decode_action_at(chain_id, m, max_depth, depth + 1))
                    .collect::<CodecResult<_>>()?,
            }
        }
        Action::EscrowReleaseMsg(msg) => ProposalAction::ReleaseEscrow {
            escrow_id: decode_id("escrow_id", &msg.escrow_id)?,
            amounts: decode_amounts(&msg.amount)?,
        },
        Action::SendMsg(msg) => {
            let send = decode_send(chain_id, msg)?;
            ProposalAction::Send {
                sender: send.sender,
                recipient: send.recipient,
                amount: send.amount,
                memo: send.memo,
            }
        }
        Action::ValidatorsApplyDiffMsg(msg) => {
            let mut validator_updates = BTreeMap::new();
            for update in msg.validator_updates.iter() {
                let pub_key = update
                    .pub_key
                    .as_ref()
                    .ok_or(CodecError::MissingField("pub_key"))?;
                if pub_key.r#type != VALIDATOR_KEY_TYPE {
                    return Err(CodecError::UnsupportedShape(format!(
                        "validator key type {}",
                        pub_key.r#type
                    )));
                }
                if update.power < 0 {
                    return Err(malformed("negative validator power"));
                }
                validator_updates.insert(validator_key(&pub_key.data), update.power as u64);
            }
            ProposalAction::SetValidators { validator_updates }
        }
        Action::UpdateElectionRuleMsg(msg) => ProposalAction::UpdateElectionRule {
            election_rule_id: decode_id("election_rule_id", &msg.election_rule_id)?,
            threshold: decode_fraction(&msg.threshold),
            quorum: decode_fraction(&msg.quorum),
            voting_period: msg.voting_period,
        },
        Action::UpdateElectorateMsg(msg) => {
            let mut diff_electors = BTreeMap::new();
            for elector in msg.diff_electors.iter() {
                diff_electors.insert(
                    enc::encode_address(chain_id, &elector.address)?,
                    elector.weight,
                );
            }
            ProposalAction::UpdateElectorate {
                electorate_id: decode_id("electorate_id", &msg.electorate_id)?,
                diff_electors,
            }
        }
    };
    Ok(decoded)
}

/// Rebuild the body from the envelope's `sum` oneof.
pub fn decode_body(
    chain_id: &ChainId,
    sum: &grafain::tx::Sum,
    max_batch_depth: usize,
) -> CodecResult<TxBody> {
    use grafain::tx::Sum;

    let body = match sum {
        Sum::SendMsg(msg) => TxBody::Send(decode_send(chain_id, msg)?),
        Sum::CreateSwapMsg(msg) => TxBody::SwapOffer(SwapOfferTx {
            swap_id: SwapId::from_slice(&msg.swap_id)?,
            recipient: enc::encode_address(chain_id, &msg.destination)?,
            hash: SwapHash::from_slice(&msg.preimage_hash)?,
            timeout: Timeout::Timestamp(msg.timeout),
            amounts: decode_amounts(&msg.amount)?,
            memo: decode_memo(&msg.memo),
        }),
        Sum::ReleaseSwapMsg(msg) => TxBody::SwapClaim(SwapClaimTx {
            swap_id: SwapId::from_slice(&msg.swap_id)?,
            preimage: Preimage::from_slice(&msg.preimage)?,
        }),
        Sum::ReturnSwapMsg(msg) => TxBody::SwapAbort(SwapAbortTx {
            swap_id: SwapId::from_slice(&msg.swap_id)?,
        }),
        Sum::CreateArtifactMsg(msg) => TxBody::CreateArtifact(CreateArtifactTx {
            image: msg.image.clone(),
            checksum: msg.checksum.clone(),
        }),
        Sum::CreateContractMsg(msg) => TxBody::CreateMultisignature(CreateMultisignatureTx {
            participants: decode_participants(chain_id, &msg.participants)?,
            activation_threshold: msg.activation_threshold,
            admin_threshold: msg.admin_threshold,
        }),
        Sum::UpdateContractMsg(msg) => TxBody::UpdateMultisignature(UpdateMultisignatureTx {
            contract_id: decode_id("contract_id", &msg.contract_id)?,
            participants: decode_participants(chain_id, &msg.participants)?,
            activation_threshold: msg.activation_threshold,
            admin_threshold: msg.admin_threshold,
        }),
        Sum::CreateEscrowMsg(msg) => TxBody::CreateEscrow(CreateEscrowTx {
            sender: enc::encode_address(chain_id, &msg.source)?,
            arbiter: enc::encode_address(chain_id, &msg.arbiter)?,
            recipient: enc::encode_address(chain_id, &msg.destination)?,
            amounts: decode_amounts(&msg.amount)?,
            timeout: Timeout::Timestamp(msg.timeout),
            memo: decode_memo(&msg.memo),
        }),
        Sum::ReleaseEscrowMsg(msg) => TxBody::ReleaseEscrow(ReleaseEscrowTx {
            escrow_id: decode_id("escrow_id", &msg.escrow_id)?,
            amounts: decode_amounts(&msg.amount)?,
        }),
        Sum::ReturnEscrowMsg(msg) => TxBody::ReturnEscrow(ReturnEscrowTx {
            escrow_id: decode_id("escrow_id", &msg.escrow_id)?,
        }),
        Sum::UpdateEscrowPartiesMsg(msg) => TxBody::UpdateEscrowParties(UpdateEscrowPartiesTx {
            escrow_id: decode_id("escrow_id", &msg.escrow_id)?,
            sender: decode_optional_address(chain_id, &msg.source)?,
            arbiter: decode_optional_address(chain_id, &msg.arbiter)?,
            recipient: decode_optional_address(chain_id, &msg.destination)?,
        }),
        Sum::CreateProposalMsg(msg) => {
            let options = grafain::ProposalOptions::decode(msg.raw_option.as_slice())
                .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;
            TxBody::CreateProposal(CreateProposalTx {
                title: msg.title.clone(),
                action: decode_action(chain_id, &options, max_batch_depth)?,
                description: msg.description.clone(),
                election_rule_id: decode_id("election_rule_id", &msg.election_rule_id)?,
                start_time: msg.start_time,
                author: enc::encode_address(chain_id, &msg.author)?,
            })
        }
        Sum::VoteMsg(msg) => TxBody::Vote(VoteTx {
            proposal_id: decode_id("proposal_id", &msg.proposal_id)?,
            selection: match msg.selected {
                1 => VoteOption::Yes,
                2 => VoteOption::No,
                3 => VoteOption::Abstain,
                _ => return Err(malformed("vote selection")),
            },
        }),
    };
    Ok(body)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{encode::encode_action, proto::Metadata};

    const ADDRESS: &str = "tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea";

    fn text(s: &str) -> ProposalAction {
        ProposalAction::CreateTextResolution {
            resolution: s.to_owned(),
        }
    }

    #[test]
    fn it_joins_coins() {
        let coin = coin::Coin {
            whole: 3,
            fractional: 40,
            ticker: "CASH".to_owned(),
        };
        assert_eq!(
            decode_amount(&coin).unwrap(),
            Amount::new("3000000040", 9, "CASH").unwrap()
        );

        let cases = [(-1, 0), (0, -1), (0, 1_000_000_000)];
        for (whole, fractional) in cases.iter() {
            let coin = coin::Coin {
                whole: *whole,
                fractional: *fractional,
                ticker: "CASH".to_owned(),
            };
            match decode_amount(&coin) {
                Err(CodecError::MalformedEncoding(_)) => {}
                _ => assert!(false, "expected MalformedEncoding"),
            }
        }
    }

    #[test]
    fn it_reads_eight_byte_ids() {
        assert_eq!(decode_id("escrow_id", &[0, 0, 0, 0, 0, 0, 1, 2]).unwrap(), 258);
        match decode_id("escrow_id", &[1, 2]) {
            Err(CodecError::InvalidLength {
                field: "escrow_id",
                expected: 8,
                got: 2,
            }) => {}
            _ => assert!(false, "expected InvalidLength"),
        }
    }

    #[test]
    fn it_enforces_batch_depth_while_decoding() {
        let chain_id: ChainId = "iov-lovenet".into();
        let nested = ProposalAction::ExecuteProposalBatch {
            messages: vec![ProposalAction::ExecuteProposalBatch {
                messages: vec![text("deep")],
            }],
        };
        let options = encode_action(&chain_id, &nested).unwrap();
        assert_eq!(decode_action(&chain_id, &options, 2).unwrap(), nested);
        match decode_action(&chain_id, &options, 1) {
            Err(CodecError::ProposalBatchTooDeep { max: 1 }) => {}
            _ => assert!(false, "expected ProposalBatchTooDeep"),
        }

        let empty = grafain::ProposalOptions {
            action: Some(grafain::proposal_options::Action::ExecuteProposalBatchMsg(
                grafain::ExecuteProposalBatchMsg { messages: vec![] },
            )),
        };
        match decode_action(&chain_id, &empty, 1) {
            Err(CodecError::EmptyProposalBatch) => {}
            _ => assert!(false, "expected EmptyProposalBatch"),
        }
    }

    #[test]
    fn it_rebuilds_every_proposal_action() {
        let chain_id: ChainId = "iov-lovenet".into();
        let mut electors = BTreeMap::new();
        electors.insert(Address::from(ADDRESS), 5);
        let mut validators = BTreeMap::new();
        validators.insert(validator_key(&[0x11; 32]), 10);
        validators.insert(validator_key(&[0x22; 32]), 0);

        let actions = vec![
            text("hello"),
            ProposalAction::ReleaseEscrow {
                escrow_id: 4,
                amounts: vec![Amount::new("1000000001", 9, "IOV").unwrap()],
            },
            ProposalAction::Send {
                sender: ADDRESS.into(),
                recipient: ADDRESS.into(),
                amount: Amount::new("7", 9, "IOV").unwrap(),
                memo: Some("for the treasury".to_owned()),
            },
            ProposalAction::SetValidators {
                validator_updates: validators,
            },
            ProposalAction::UpdateElectionRule {
                election_rule_id: 2,
                threshold: Some(Fraction {
                    numerator: 2,
                    denominator: 3,
                }),
                quorum: None,
                voting_period: 3600,
            },
            ProposalAction::UpdateElectorate {
                electorate_id: 1,
                diff_electors: electors,
            },
        ];
        let batch = ProposalAction::ExecuteProposalBatch { messages: actions };
        let options = encode_action(&chain_id, &batch).unwrap();
        let bytes = options.encode_to_vec();
        let decoded = grafain::ProposalOptions::decode(bytes.as_slice()).unwrap();
        assert_eq!(decode_action(&chain_id, &decoded, 1).unwrap(), batch);
    }

    #[test]
    fn it_rejects_unknown_vote_selections() {
        let sum = grafain::tx::Sum::VoteMsg(gov::VoteMsg {
            metadata: Metadata::v1(),
            proposal_id: vec![0; 8],
            voter: vec![],
            selected: 0,
        });
        match decode_body(&"iov-lovenet".into(), &sum, 1) {
            Err(CodecError::MalformedEncoding(_)) => {}
            _ => assert!(false, "expected MalformedEncoding"),
        }
    }

    #[test]
    fn it_requires_signature_parts() {
        let bare = sigs::StdSignature {
            sequence: 1,
            pubkey: None,
            signature: None,
        };
        match decode_signature(&bare) {
            Err(CodecError::MissingField("pubkey")) => {}
            _ => assert!(false, "expected MissingField"),
        }
        let negative = sigs::StdSignature {
            sequence: -1,
            pubkey: Some(crypto::PublicKey {
                r#pub: Some(crypto::public_key::Pub::Ed25519(vec![1; 32])),
            }),
            signature: Some(crypto::Signature {
                sig: Some(crypto::signature::Sig::Ed25519(vec![2; 64])),
            }),
        };
        match decode_signature(&negative) {
            Err(CodecError::MalformedEncoding(_)) => {}
            _ => assert!(false, "expected MalformedEncoding"),
        }
    }
}
