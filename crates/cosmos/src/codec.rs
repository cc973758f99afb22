//! The Amino JSON `TxCodec`.

use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::json;

use xchain_core::{
    enc::AddressEncoder,
    hashes::PrehashType, wire_memo, Address, ChainId, CodecError, CodecResult, Identity, Nonce, SignJob,
    SignedTransaction, Transaction, TxBody, TxCodec,
};

use crate::{
    amino::{self, AminoTx, StdTx, STD_TX_TYPE},
    enc,
};

/// Runtime configuration of a `CosmosCodec`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CosmosConfig {
    /// Fractional digits of every token on the chain
    pub fractional_digits: u32,
    /// The creator's account number, bound into the sign doc
    pub account_number: u64,
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            fractional_digits: 9,
            account_number: 0,
        }
    }
}

/// Encodes and parses Amino JSON transactions.
#[derive(Clone, Debug, Default)]
pub struct CosmosCodec {
    config: CosmosConfig,
}

impl CosmosCodec {
    /// Instantiate a codec
    pub fn new(config: CosmosConfig) -> Self {
        Self { config }
    }

    /// The codec's configuration
    pub fn config(&self) -> &CosmosConfig {
        &self.config
    }

    fn build_unsigned(&self, tx: &Transaction) -> CodecResult<StdTx> {
        let send = match &tx.body {
            TxBody::Send(send) => send,
            other => return Err(other.unsupported()),
        };
        if !tx.multisig.is_empty() {
            return Err(CodecError::UnsupportedShape(
                "amino transactions have no multisig conditions".to_owned(),
            ));
        }
        for address in [&send.sender, &send.recipient].iter() {
            enc::AccountEncoder::decode_address(address)?;
        }
        let fee = tx.fee.as_ref().ok_or(CodecError::MissingField("fee"))?;
        Ok(StdTx {
            msg: Some(vec![amino::encode_send(send, self.config.fractional_digits)?]),
            fee: Some(amino::encode_fee(fee, self.config.fractional_digits)?),
            signatures: Some(vec![]),
            memo: wire_memo(&send.memo)?.to_owned(),
        })
    }

    /// The sign doc for `tx` at `nonce`: compact JSON, keys sorted at every level.
    pub fn sign_doc(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<Vec<u8>> {
        let unsigned = self.build_unsigned(tx)?;
        let doc = json!({
            "account_number": self.config.account_number.to_string(),
            "chain_id": tx.creator.chain_id.as_str(),
            "fee": unsigned.fee,
            "memo": unsigned.memo,
            "msgs": unsigned.msg,
            "sequence": nonce.to_string(),
        });
        serde_json::to_vec(&doc).map_err(|e| CodecError::MalformedEncoding(e.to_string()))
    }
}

impl TxCodec for CosmosCodec {
    fn bytes_to_sign(&self, tx: &Transaction, nonce: Nonce) -> CodecResult<SignJob> {
        trace!("amino sign doc for {} at sequence {}", tx.kind(), nonce);
        Ok(SignJob {
            bytes: self.sign_doc(tx, nonce)?,
            prehash: PrehashType::Sha256,
        })
    }

    fn bytes_to_post(&self, signed: &SignedTransaction) -> CodecResult<Vec<u8>> {
        let mut value = self.build_unsigned(&signed.transaction)?;
        value.signatures = Some(signed.signatures().map(amino::encode_signature).collect());
        let envelope = AminoTx {
            kind: STD_TX_TYPE.to_owned(),
            value,
        };
        serde_json::to_vec(&envelope).map_err(|e| CodecError::MalformedEncoding(e.to_string()))
    }

    fn parse_bytes(&self, bytes: &[u8], chain_id: &ChainId) -> CodecResult<SignedTransaction> {
        let envelope: AminoTx = serde_json::from_slice(bytes)
            .map_err(|e| CodecError::MalformedEncoding(e.to_string()))?;
        if envelope.kind != STD_TX_TYPE {
            return Err(CodecError::UnsupportedMessageType(envelope.kind));
        }
        let value = envelope.value;
        let signatures = value
            .signatures
            .as_ref()
            .ok_or(CodecError::MissingField("signatures"))?;
        let msgs = value.msg.as_ref().ok_or(CodecError::MissingField("msg"))?;
        let fee = value.fee.as_ref().ok_or(CodecError::MissingField("fee"))?;

        let mut signatures = signatures
            .iter()
            .map(amino::decode_signature)
            .collect::<CodecResult<Vec<_>>>()?
            .into_iter();
        let primary_signature = signatures.next().ok_or(CodecError::MissingSignature)?;

        if msgs.len() != 1 {
            return Err(CodecError::UnsupportedShape(format!(
                "transactions with {} messages",
                msgs.len()
            )));
        }
        let mut send = amino::decode_send(&msgs[0], self.config.fractional_digits)?;
        if !value.memo.is_empty() {
            send.memo = Some(value.memo.clone());
        }
        trace!("parsed amino send from {} bytes", bytes.len());

        Ok(SignedTransaction {
            transaction: Transaction {
                creator: Identity::new(chain_id.clone(), primary_signature.pubkey.clone()),
                fee: Some(amino::decode_fee(fee, self.config.fractional_digits)?),
                multisig: vec![],
                body: TxBody::Send(send),
            },
            primary_signature,
            other_signatures: signatures.collect(),
        })
    }

    fn identity_to_address(&self, identity: &Identity) -> CodecResult<Address> {
        enc::pubkey_to_address(&identity.pubkey)
    }

    fn is_valid_address(&self, address: &str) -> bool {
        enc::is_valid_address(address)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use xchain_core::{Amount, Fee, PubkeyBundle, SendTx, SwapAbortTx, SwapId};

    fn send_tx(memo: Option<&str>) -> Transaction {
        Transaction::new(
            Identity::new("cosmoshub-3", PubkeyBundle::secp256k1(&[0x02; 33])),
            TxBody::Send(SendTx {
                sender: "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6".into(),
                recipient: "cosmos1h806c7khnvmjlywdrkdgk2vrayy2mmvf9rxk2r".into(),
                amount: Amount::new("35", 9, "uatom").unwrap(),
                memo: memo.map(str::to_owned),
            }),
        )
        .with_fee(Fee {
            tokens: Some(Amount::new("5000", 9, "uatom").unwrap()),
            gas_price: None,
            gas_limit: Some("200000".parse().unwrap()),
        })
    }

    #[test]
    fn it_sorts_the_sign_doc() {
        let codec = CosmosCodec::new(CosmosConfig {
            account_number: 77,
            ..Default::default()
        });
        let job = codec.bytes_to_sign(&send_tx(Some("hi")), 3).unwrap();
        assert_eq!(job.prehash, PrehashType::Sha256);
        let expected = concat!(
            r#"{"account_number":"77","chain_id":"cosmoshub-3","#,
            r#""fee":{"amount":[{"amount":"5000","denom":"uatom"}],"gas":"200000"},"#,
            r#""memo":"hi","#,
            r#""msgs":[{"type":"cosmos-sdk/MsgSend","value":{"amount":[{"amount":"35","denom":"uatom"}],"#,
            r#""from_address":"cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6","#,
            r#""to_address":"cosmos1h806c7khnvmjlywdrkdgk2vrayy2mmvf9rxk2r"}}],"#,
            r#""sequence":"3"}"#
        );
        assert_eq!(String::from_utf8(job.bytes).unwrap(), expected);
    }

    #[test]
    fn it_only_carries_sends() {
        let codec = CosmosCodec::default();
        let mut tx = send_tx(None);
        tx.body = TxBody::SwapAbort(SwapAbortTx {
            swap_id: SwapId::from([1u8; 32]),
        });
        match codec.bytes_to_sign(&tx, 0) {
            Err(CodecError::UnsupportedMessageType(kind)) => assert_eq!(kind, "bcp/swap_abort"),
            _ => assert!(false, "expected UnsupportedMessageType"),
        }

        let mut unpaid = send_tx(None);
        unpaid.fee = None;
        match codec.bytes_to_sign(&unpaid, 0) {
            Err(CodecError::MissingField("fee")) => {}
            _ => assert!(false, "expected MissingField"),
        }
    }

    #[test]
    fn it_refuses_empty_memos() {
        let codec = CosmosCodec::default();
        match codec.bytes_to_sign(&send_tx(Some("")), 0) {
            Err(CodecError::UnsupportedShape(_)) => {}
            _ => assert!(false, "expected UnsupportedShape"),
        }
        assert!(codec.bytes_to_sign(&send_tx(None), 0).is_ok());
    }

    #[test]
    fn it_parses_node_signatures_without_sequences() {
        let codec = CosmosCodec::default();
        let json = serde_json::json!({
            "type": "auth/StdTx",
            "value": {
                "msg": [{
                    "type": "cosmos-sdk/MsgSend",
                    "value": {
                        "from_address": "cosmos1pkptre7fdkl6gfrzlesjjvhxhlc3r4gmmk8rs6",
                        "to_address": "cosmos1h806c7khnvmjlywdrkdgk2vrayy2mmvf9rxk2r",
                        "amount": [{"denom": "uatom", "amount": "35"}]
                    }
                }],
                "fee": {"amount": [{"denom": "uatom", "amount": "5000"}], "gas": "200000"},
                "signatures": [{
                    "pub_key": {
                        "type": "tendermint/PubKeySecp256k1",
                        "value": "AgICAgICAgICAgICAgICAgICAgICAgICAgICAgICAgIC"
                    },
                    "signature": "q6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urq6urqw=="
                }],
                "memo": "hi"
            }
        });
        let parsed = codec
            .parse_bytes(&serde_json::to_vec(&json).unwrap(), &"cosmoshub-3".into())
            .unwrap();
        assert_eq!(parsed.primary_signature.nonce, 0);
        assert_eq!(parsed.primary_signature.pubkey, PubkeyBundle::secp256k1(&[0x02; 33]));
        assert_eq!(parsed.primary_signature.signature.items(), &[0xab; 64][..]);
        assert_eq!(parsed.transaction, send_tx(Some("hi")));
    }

    #[test]
    fn it_requires_envelope_fields() {
        let codec = CosmosCodec::default();
        let cases = [
            (r#"{"type":"auth/StdTx","value":{"msg":[],"fee":null,"memo":""}}"#, "signatures"),
            (r#"{"type":"auth/StdTx","value":{"signatures":[],"memo":""}}"#, "msg"),
            (r#"{"type":"auth/StdTx","value":{"signatures":[],"msg":[]}}"#, "fee"),
        ];
        for (json, missing) in cases.iter() {
            match codec.parse_bytes(json.as_bytes(), &"cosmoshub-3".into()) {
                Err(CodecError::MissingField(field)) => assert_eq!(field, *missing),
                _ => assert!(false, "expected MissingField"),
            }
        }

        let unsigned = r#"{"type":"auth/StdTx","value":{"msg":[],"fee":{"amount":[],"gas":"1"},"signatures":[],"memo":""}}"#;
        match codec.parse_bytes(unsigned.as_bytes(), &"cosmoshub-3".into()) {
            Err(CodecError::MissingSignature) => {}
            _ => assert!(false, "expected MissingSignature"),
        }
        match codec.parse_bytes(b"{\"type\":", &"cosmoshub-3".into()) {
            Err(CodecError::MalformedEncoding(_)) => {}
            _ => assert!(false, "expected MalformedEncoding"),
        }
    }
}
