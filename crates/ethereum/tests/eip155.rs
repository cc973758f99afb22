//! The worked example from EIP-155: nonce 9, 20 gwei, 21000 gas, 1 ether to 0x3535..35 on
//! chain 1, signed with the key 0x4646..46.

use xchain_core::{
    signer::{sign_transaction, Secp256k1Signer, TxSigner},
    Amount, Fee, Identity, SendTx, Transaction, TxBody, TxCodec,
};
use xchain_ethereum::EthereumCodec;

const CHAIN_ID: &str = "ethereum-eip155-1";
const SIGNING_BYTES: &str =
    "ec098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a764000080018080";
const SIGNED_BYTES: &str = concat!(
    "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a7640000",
    "8025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276",
    "a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83"
);
const SENDER: &str = "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F";
const RECIPIENT: &str = "0x3535353535353535353535353535353535353535";

fn signer() -> Secp256k1Signer {
    Secp256k1Signer::from_bytes(&[0x46; 32]).unwrap().recoverable()
}

fn transaction() -> Transaction {
    Transaction::new(
        Identity::new(CHAIN_ID, signer().pubkey()),
        TxBody::Send(SendTx {
            sender: SENDER.into(),
            recipient: RECIPIENT.into(),
            amount: Amount::new("1000000000000000000", 18, "ETH").unwrap(),
            memo: None,
        }),
    )
    .with_fee(Fee {
        tokens: None,
        gas_price: Some(Amount::new("20000000000", 18, "ETH").unwrap()),
        gas_limit: Some("21000".parse().unwrap()),
    })
}

#[test]
fn it_produces_the_reference_signing_bytes() {
    let codec = EthereumCodec::default();
    let job = codec.bytes_to_sign(&transaction(), 9).unwrap();
    assert_eq!(hex::encode(&job.bytes), SIGNING_BYTES);
    assert_eq!(
        hex::encode(job.digest()),
        "daf5a779ae972f972197303d7b574746c7ef83eadac0f2791ad23db92e4c8e53"
    );
}

#[test]
fn it_parses_the_reference_transaction() {
    let codec = EthereumCodec::default();
    let bytes = hex::decode(SIGNED_BYTES).unwrap();
    let parsed = codec.parse_bytes(&bytes, &CHAIN_ID.into()).unwrap();

    assert_eq!(parsed.transaction, transaction());
    assert_eq!(parsed.primary_signature.nonce, 9);
    assert_eq!(parsed.primary_signature.pubkey, signer().pubkey());
    // v = 37, so recovery id 0
    assert_eq!(parsed.primary_signature.signature.items()[64], 0);
    assert_eq!(codec.bytes_to_post(&parsed).unwrap(), bytes);
}

#[tokio::test]
async fn it_signs_the_reference_transaction() {
    let codec = EthereumCodec::default();
    let signed = sign_transaction(&codec, &signer(), transaction(), 9)
        .await
        .unwrap();
    assert_eq!(hex::encode(codec.bytes_to_post(&signed).unwrap()), SIGNED_BYTES);
}
