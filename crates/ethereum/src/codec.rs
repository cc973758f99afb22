//! The RLP `TxCodec`.

use std::collections::BTreeMap;

use alloy_primitives::U256;
use log::trace;
use serde::{Deserialize, Serialize};

use xchain_core::{
    hashes::{keccak256, PrehashType},
    wire_memo, Address, Amount, ChainId, CodecError, CodecResult, Erc20ApproveTx, Fee,
    FullSignature, Identity, Nonce, SendTx, SignJob, SignedTransaction, SwapOfferTx, Timeout,
    Transaction, TransactionId, TxBody, TxCodec,
};

use crate::{
    abi::{self, CallData},
    enc,
    rlp::{self, ForkState, LegacyTx, RlpSignature},
};

/// Ticker of the native token
pub const ETHER_TICKER: &str = "ETH";

/// Fractional digits of ether, in wei
pub const ETHER_DECIMALS: u32 = 18;

/// Chain ids look like `ethereum-eip155-<numeric chain id>`
pub const CHAIN_ID_PREFIX: &str = "ethereum-eip155-";

/// Read the numeric chain id out of a chain id string.
pub fn parse_chain_id(chain_id: &ChainId) -> CodecResult<u64> {
    chain_id
        .as_str()
        .strip_prefix(CHAIN_ID_PREFIX)
        .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| CodecError::InvalidChainId(chain_id.to_string()))
}

/// An ERC20 token the codec may transfer, approve or swap.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Erc20Options {
    /// The token contract
    pub contract_address: Address,
    /// Fractional digits of the token
    pub decimals: u32,
}

/// Runtime configuration of an `EthereumCodec`.
///
/// Swap transactions need exactly one of the two swap contracts.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumConfig {
    /// Known tokens, by ticker
    pub erc20_tokens: BTreeMap<String, Erc20Options>,
    /// The ether atomic swap contract
    pub atomic_swap_ether_contract: Option<Address>,
    /// The ERC20 atomic swap contract
    pub atomic_swap_erc20_contract: Option<Address>,
}

enum SwapContract<'a> {
    Ether(&'a Address),
    Erc20(&'a Address),
}

impl EthereumConfig {
    fn token(&self, ticker: &str) -> CodecResult<&Erc20Options> {
        self.erc20_tokens
            .get(ticker)
            .ok_or_else(|| CodecError::UnknownToken(ticker.to_owned()))
    }

    fn token_at(&self, payload: &[u8; 20]) -> Option<(&String, &Erc20Options)> {
        self.erc20_tokens.iter().find(|(_, token)| {
            enc::decode_address(&token.contract_address)
                .map(|p| p == *payload)
                .unwrap_or(false)
        })
    }

    fn swap_contract(&self) -> CodecResult<SwapContract<'_>> {
        match (
            &self.atomic_swap_ether_contract,
            &self.atomic_swap_erc20_contract,
        ) {
            (Some(_), Some(_)) => Err(CodecError::AmbiguousContract),
            (None, None) => Err(CodecError::NoContractConfigured),
            (Some(ether), None) => Ok(SwapContract::Ether(ether)),
            (None, Some(erc20)) => Ok(SwapContract::Erc20(erc20)),
        }
    }

    fn is_swap_contract(&self, payload: &[u8; 20]) -> bool {
        [
            &self.atomic_swap_ether_contract,
            &self.atomic_swap_erc20_contract,
        ]
        .iter()
        .filter_map(|c| c.as_ref())
        .any(|c| enc::decode_address(c).map(|p| p == *payload).unwrap_or(false))
    }
}

struct Call {
    to: [u8; 20],
    value: U256,
    data: Vec<u8>,
}

fn quantity_in(amount: &Amount, fractional_digits: u32) -> CodecResult<U256> {
    if amount.fractional_digits != fractional_digits {
        return Err(CodecError::UnsupportedShape(format!(
            "{} amounts need {} fractional digits, got {}",
            amount.ticker, fractional_digits, amount.fractional_digits
        )));
    }
    rlp::to_uint(&amount.quantity)
}

fn ether(quantity: U256) -> CodecResult<Amount> {
    Ok(Amount {
        quantity: rlp::to_quantity(quantity)?,
        fractional_digits: ETHER_DECIMALS,
        ticker: ETHER_TICKER.to_owned(),
    })
}

/// Encodes and parses legacy RLP transactions.
#[derive(Clone, Debug, Default)]
pub struct EthereumCodec {
    config: EthereumConfig,
}

impl EthereumCodec {
    /// Instantiate a codec
    pub fn new(config: EthereumConfig) -> Self {
        Self { config }
    }

    /// The codec's configuration
    pub fn config(&self) -> &EthereumConfig {
        &self.config
    }

    fn send_call(&self, send: &SendTx) -> CodecResult<Call> {
        enc::decode_address(&send.sender)?;
        let recipient = enc::decode_address(&send.recipient)?;
        let memo = wire_memo(&send.memo)?;

        if send.amount.ticker == ETHER_TICKER {
            return Ok(Call {
                to: recipient,
                value: quantity_in(&send.amount, ETHER_DECIMALS)?,
                data: memo.as_bytes().to_vec(),
            });
        }
        if !memo.is_empty() {
            return Err(CodecError::MemoNotSupported);
        }
        let token = self.config.token(&send.amount.ticker)?;
        Ok(Call {
            to: enc::decode_address(&token.contract_address)?,
            value: U256::ZERO,
            data: CallData::new(&abi::TRANSFER)
                .address(&recipient)
                .uint256(quantity_in(&send.amount, token.decimals)?)
                .into_bytes(),
        })
    }

    fn swap_offer_call(&self, offer: &SwapOfferTx) -> CodecResult<Call> {
        let recipient = enc::decode_address(&offer.recipient)?;
        if !wire_memo(&offer.memo)?.is_empty() {
            return Err(CodecError::MemoNotSupported);
        }
        let contract = self.config.swap_contract()?;
        let height = match offer.timeout {
            Timeout::BlockHeight(height) => U256::from(height),
            Timeout::Timestamp(_) => return Err(CodecError::UnsupportedTimeoutKind),
        };
        let amount = match offer.amounts.as_slice() {
            [amount] => amount,
            _ => return Err(CodecError::MultiAmountUnsupported),
        };
        let open = |method: &[u8; 4]| {
            CallData::new(method)
                .word(offer.swap_id.bytes())
                .address(&recipient)
                .word(offer.hash.bytes())
                .uint256(height)
        };

        match contract {
            SwapContract::Ether(address) => {
                if amount.ticker != ETHER_TICKER {
                    return Err(CodecError::WrongTicker {
                        expected: ETHER_TICKER.to_owned(),
                        got: amount.ticker.clone(),
                    });
                }
                Ok(Call {
                    to: enc::decode_address(address)?,
                    value: quantity_in(amount, ETHER_DECIMALS)?,
                    data: open(&*abi::OPEN_ETHER_SWAP).into_bytes(),
                })
            }
            SwapContract::Erc20(address) => {
                let token = self.config.token(&amount.ticker)?;
                Ok(Call {
                    to: enc::decode_address(address)?,
                    value: U256::ZERO,
                    data: open(&*abi::OPEN_ERC20_SWAP)
                        .address(&enc::decode_address(&token.contract_address)?)
                        .uint256(quantity_in(amount, token.decimals)?)
                        .into_bytes(),
                })
            }
        }
    }

    fn swap_contract_call(&self, data: CallData) -> CodecResult<Call> {
        let address = match self.config.swap_contract()? {
            SwapContract::Ether(address) | SwapContract::Erc20(address) => address,
        };
        Ok(Call {
            to: enc::decode_address(address)?,
            value: U256::ZERO,
            data: data.into_bytes(),
        })
    }

    fn approve_call(&self, approve: &Erc20ApproveTx) -> CodecResult<Call> {
        let spender = enc::decode_address(&approve.spender)?;
        let token = self.config.token(&approve.amount.ticker)?;
        Ok(Call {
            to: enc::decode_address(&token.contract_address)?,
            value: U256::ZERO,
            data: CallData::new(&abi::APPROVE)
                .address(&spender)
                .uint256(quantity_in(&approve.amount, token.decimals)?)
                .into_bytes(),
        })
    }

    /// Build the legacy transaction for `tx` at `nonce`.
    pub fn build(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<LegacyTx> {
        if !tx.multisig.is_empty() {
            return Err(CodecError::UnsupportedShape(
                "ethereum transactions have no multisig conditions".to_owned(),
            ));
        }
        let fee = tx.fee.as_ref().ok_or(CodecError::MissingField("fee"))?;
        let gas_price = fee
            .gas_price
            .as_ref()
            .ok_or(CodecError::MissingField("fee.gas_price"))?;
        let gas_limit = fee
            .gas_limit
            .as_ref()
            .ok_or(CodecError::MissingField("fee.gas_limit"))?;
        if gas_price.ticker != ETHER_TICKER {
            return Err(CodecError::UnsupportedShape(format!(
                "gas price in {}, not {}",
                gas_price.ticker, ETHER_TICKER
            )));
        }
        if fee.tokens.is_some() {
            return Err(CodecError::UnsupportedShape(
                "ethereum fees are paid through gas".to_owned(),
            ));
        }
        let gas_price = quantity_in(gas_price, ETHER_DECIMALS)?;

        let call = match &tx.body {
            TxBody::Send(send) => self.send_call(send)?,
            TxBody::SwapOffer(offer) => self.swap_offer_call(offer)?,
            TxBody::SwapClaim(claim) => self.swap_contract_call(
                CallData::new(&abi::CLAIM_SWAP)
                    .word(claim.swap_id.bytes())
                    .word(claim.preimage.bytes()),
            )?,
            TxBody::SwapAbort(abort) => self
                .swap_contract_call(CallData::new(&abi::ABORT_SWAP).word(abort.swap_id.bytes()))?,
            TxBody::Erc20Approve(approve) => self.approve_call(approve)?,
            other => return Err(other.unsupported()),
        };

        Ok(LegacyTx {
            nonce,
            gas_price,
            gas_limit: rlp::to_uint(gas_limit)?,
            to: call.to,
            value: call.value,
            data: call.data,
        })
    }

    fn decode_send(&self, unsigned: &LegacyTx, sender: Address) -> CodecResult<SendTx> {
        if self.config.is_swap_contract(&unsigned.to) {
            return Err(CodecError::UnsupportedMessageType(
                "atomic swap contract call".to_owned(),
            ));
        }
        if let Some((ticker, token)) = self.config.token_at(&unsigned.to) {
            if !unsigned.value.is_zero() {
                return Err(CodecError::UnsupportedShape(
                    "token call carrying ether".to_owned(),
                ));
            }
            let (recipient, quantity) = abi::decode_transfer(&unsigned.data)?;
            return Ok(SendTx {
                sender,
                recipient: enc::encode_address(&recipient),
                amount: Amount {
                    quantity: rlp::to_quantity(quantity)?,
                    fractional_digits: token.decimals,
                    ticker: ticker.clone(),
                },
                memo: None,
            });
        }

        let memo = if unsigned.data.is_empty() {
            None
        } else {
            Some(String::from_utf8(unsigned.data.clone()).map_err(|_| {
                CodecError::UnsupportedMessageType("contract call".to_owned())
            })?)
        };
        Ok(SendTx {
            sender,
            recipient: enc::encode_address(&unsigned.to),
            amount: ether(unsigned.value)?,
            memo,
        })
    }
}

impl TxCodec for EthereumCodec {
    fn bytes_to_sign(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<SignJob> {
        let fork = ForkState::from_chain_id(parse_chain_id(&tx.creator.chain_id)?);
        let unsigned = self.build(tx, nonce)?;
        trace!("rlp signing bytes for {} at nonce {} ({:?})", tx.kind(), nonce, fork);
        Ok(SignJob {
            bytes: unsigned.signing_bytes(fork),
            prehash: PrehashType::Keccak256,
        })
    }

    fn bytes_to_post(&self, signed: &SignedTransaction) -> CodecResult<Vec<u8>> {
        let tx = &signed.transaction;
        if !signed.other_signatures.is_empty() {
            return Err(CodecError::UnsupportedShape(
                "ethereum transactions carry exactly one signature".to_owned(),
            ));
        }
        if signed.primary_signature.pubkey != tx.creator.pubkey {
            return Err(CodecError::UnsupportedShape(
                "primary signature is not the creator's".to_owned(),
            ));
        }
        let fork = ForkState::from_chain_id(parse_chain_id(&tx.creator.chain_id)?);
        let unsigned = self.build(tx, signed.primary_signature.nonce)?;
        let signature =
            RlpSignature::from_recoverable(signed.primary_signature.signature.items(), fork)?;
        Ok(unsigned.signed_bytes(&signature))
    }

    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> CodecResult<SignedTransaction> {
        let fork = ForkState::from_chain_id(parse_chain_id(chain_id)?);
        let (unsigned, signature) = LegacyTx::decode(bytes)?;
        let signature = match signature {
            Some(s) if !(s.r.is_zero() && s.s.is_zero()) => s,
            _ => return Err(CodecError::MissingSignature),
        };
        let recoverable = signature.to_recoverable(fork)?;
        let digest = keccak256(&unsigned.signing_bytes(fork));
        let pubkey = enc::recover_pubkey(&digest, &recoverable)?;
        let sender = enc::pubkey_to_address(&pubkey)?;
        trace!("recovered {} from {} bytes", sender, bytes.len());

        let body = TxBody::Send(self.decode_send(&unsigned, sender)?);
        let fee = Fee {
            tokens: None,
            gas_price: Some(ether(unsigned.gas_price)?),
            gas_limit: Some(rlp::to_quantity(unsigned.gas_limit)?),
        };
        Ok(SignedTransaction {
            transaction: Transaction {
                creator: Identity::new(chain_id.clone(), pubkey.clone()),
                fee: Some(fee),
                multisig: vec![],
                body,
            },
            primary_signature: FullSignature {
                nonce: unsigned.nonce,
                pubkey,
                signature: recoverable.to_vec().into(),
            },
            other_signatures: vec![],
        })
    }

    fn identifier(&self, signed: &SignedTransaction) -> CodecResult<TransactionId> {
        let posted = self.bytes_to_post(signed)?;
        Ok(TransactionId::from_digest(&keccak256(&posted)))
    }

    fn identity_to_address(&self, identity: &Identity) -> CodecResult<Address> {
        enc::pubkey_to_address(&identity.pubkey)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        enc::is_valid_address(address)
    }
}
