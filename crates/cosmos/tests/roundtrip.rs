use k256::ecdsa::{signature::hazmat::PrehashVerifier, Signature, VerifyingKey};

use xchain_core::{
    signer::{append_signature, sign_transaction, Secp256k1Signer, TxSigner},
    Amount, CodecError, Fee, Identity, SendTx, Transaction, TxBody, TxCodec,
};
use xchain_cosmos::{CosmosCodec, CosmosConfig};

const CHAIN_ID: &str = "cosmoshub-3";

fn atom(quantity: &str) -> Amount {
    Amount::new(quantity, 9, "uatom").unwrap()
}

fn send(codec: &CosmosCodec, signer: &Secp256k1Signer, memo: Option<&str>) -> Transaction {
    let creator = Identity::new(CHAIN_ID, signer.pubkey());
    Transaction::new(
        creator.clone(),
        TxBody::Send(SendTx {
            sender: codec.identity_to_address(&creator).unwrap(),
            recipient: "cosmos1h806c7khnvmjlywdrkdgk2vrayy2mmvf9rxk2r".into(),
            amount: atom("1000"),
            memo: memo.map(str::to_owned),
        }),
    )
    .with_fee(Fee {
        tokens: Some(atom("5000")),
        gas_price: None,
        gas_limit: Some("200000".parse().unwrap()),
    })
}

#[tokio::test]
async fn sends_round_trip_with_every_signature() {
    let codec = CosmosCodec::new(CosmosConfig {
        account_number: 9,
        ..Default::default()
    });
    let creator = Secp256k1Signer::from_bytes(&[0x21; 32]).unwrap();
    let cosigner = Secp256k1Signer::from_bytes(&[0x22; 32]).unwrap();

    for memo in [None, Some("rent")].iter() {
        let tx = send(&codec, &creator, *memo);
        let signed = sign_transaction(&codec, &creator, tx, 4).await.unwrap();
        let signed = append_signature(&codec, &cosigner, signed, 11).await.unwrap();

        let bytes = codec.bytes_to_post(&signed).unwrap();
        let parsed = codec.parse_bytes(&bytes, &CHAIN_ID.into()).unwrap();
        assert_eq!(parsed, signed);
    }
}

#[tokio::test]
async fn signatures_verify_over_the_sign_doc() {
    let codec = CosmosCodec::default();
    let signer = Secp256k1Signer::from_bytes(&[0x21; 32]).unwrap();
    let tx = send(&codec, &signer, Some("check me"));
    let signed = sign_transaction(&codec, &signer, tx.clone(), 2).await.unwrap();

    let digest = codec.bytes_to_sign(&tx, 2).unwrap().digest();
    let key = VerifyingKey::from_sec1_bytes(signer.pubkey().data.items()).unwrap();
    let signature = Signature::from_slice(signed.primary_signature.signature.items()).unwrap();
    assert!(key.verify_prehash(&digest, &signature).is_ok());
}

#[test]
fn posted_envelopes_are_amino_std_txs() {
    let codec = CosmosCodec::default();
    let signer = Secp256k1Signer::from_bytes(&[0x21; 32]).unwrap();
    let tx = send(&codec, &signer, None);
    let signed = xchain_core::SignedTransaction {
        transaction: tx,
        primary_signature: xchain_core::FullSignature {
            nonce: 0,
            pubkey: signer.pubkey(),
            signature: vec![1u8; 64].into(),
        },
        other_signatures: vec![],
    };
    let json: serde_json::Value =
        serde_json::from_slice(&codec.bytes_to_post(&signed).unwrap()).unwrap();
    assert_eq!(json["type"], "auth/StdTx");
    assert_eq!(json["value"]["msg"][0]["type"], "cosmos-sdk/MsgSend");
    assert_eq!(json["value"]["memo"], "");
    assert_eq!(
        json["value"]["signatures"][0]["pub_key"]["type"],
        "tendermint/PubKeySecp256k1"
    );
    assert_eq!(json["value"]["signatures"][0]["sequence"], "0");

    let id = codec.identifier(&signed).unwrap();
    assert_eq!(id.as_str().len(), 64);
    assert_eq!(id.as_str(), id.as_str().to_uppercase());
}

#[test]
fn foreign_addresses_are_refused() {
    let codec = CosmosCodec::default();
    let signer = Secp256k1Signer::from_bytes(&[0x21; 32]).unwrap();
    let mut tx = send(&codec, &signer, None);
    if let TxBody::Send(send) = &mut tx.body {
        send.recipient = "cosmosvaloper17mggn4znyeyg25wd7498qxl7r2jhgue8u4qjcq".into();
    }
    match codec.bytes_to_sign(&tx, 0) {
        Err(CodecError::Address(_)) => {}
        _ => assert!(false, "expected an address error"),
    }
    assert!(codec.is_valid_address("cosmosvaloper17mggn4znyeyg25wd7498qxl7r2jhgue8u4qjcq"));
    assert!(!codec.is_valid_address("tiov15nuhg3l8ma2mdmcdvgy7hme20v3xy5mkxcezea"));
}

#[tokio::test]
async fn tampered_addresses_do_not_parse() {
    let codec = CosmosCodec::default();
    let signer = Secp256k1Signer::from_bytes(&[0x21; 32]).unwrap();
    let signed = sign_transaction(&codec, &signer, send(&codec, &signer, None), 0)
        .await
        .unwrap();
    let posted: serde_json::Value =
        serde_json::from_slice(&codec.bytes_to_post(&signed).unwrap()).unwrap();

    let cases = [
        ("to_address", "not-an-address-at-all", "malformed"),
        ("from_address", "", "malformed"),
        (
            "to_address",
            "cosmosvaloper17mggn4znyeyg25wd7498qxl7r2jhgue8u4qjcq",
            "prefix",
        ),
    ];
    for (field, replacement, expected) in cases.iter() {
        let mut tampered = posted.clone();
        tampered["value"]["msg"][0]["value"][*field] = serde_json::json!(replacement);
        let bytes = serde_json::to_vec(&tampered).unwrap();
        match (codec.parse_bytes(&bytes, &CHAIN_ID.into()), *expected) {
            (Err(CodecError::MalformedEncoding(_)), "malformed") => {}
            (Err(CodecError::Address(_)), "prefix") => {}
            _ => assert!(false, "expected a {} error for {}", expected, replacement),
        }
    }
}
