//! Drives the version negotiation through the four handshake messages.

use connection::msgs::{Counterparty, HandshakeMsg, OpenAck, OpenConfirm, OpenTry, Signer};
use connection::{FeatureSetPolicy, NegotiationConfig, NegotiationError, Version};

fn initiator_config() -> NegotiationConfig {
    NegotiationConfig::new(
        vec![
            Version::new("2", ["DAG", "ORDERED"]).expect("valid"),
            Version::default_connection(),
        ],
        FeatureSetPolicy::default_connection(),
    )
    .expect("non-empty")
}

fn open_try(counterparty_versions: Vec<String>) -> OpenTry {
    OpenTry {
        connection_id: "connectionidtwo".to_owned(),
        client_id: "clientidtwo".to_owned(),
        counterparty: Counterparty::new("clientidone", "connectionidone", b"ibc".to_vec()),
        counterparty_versions,
        proof_init: vec![1],
        proof_consensus: vec![2],
        proof_height: 5,
        consensus_height: 5,
        signer: Signer::new(b"responder".to_vec()),
    }
}

fn open_ack(version: String) -> OpenAck {
    OpenAck {
        connection_id: "connectionidone".to_owned(),
        version,
        proof_try: vec![3],
        proof_consensus: vec![4],
        proof_height: 6,
        consensus_height: 6,
        signer: Signer::new(b"initiator".to_vec()),
    }
}

#[test]
fn full_handshake_agrees_on_shared_features() {
    let initiator = initiator_config();
    let offered: Vec<String> = initiator
        .compatible_versions()
        .iter()
        .map(ToString::to_string)
        .collect();

    let try_msg = open_try(offered);
    HandshakeMsg::from(try_msg.clone())
        .validate_basic()
        .expect("well-formed open try");

    // The responder only knows the default version.
    let responder = NegotiationConfig::default();
    let picked = try_msg.pick_version(&responder).expect("default overlaps");
    assert_eq!(picked.to_string(), "(1,[ORDERED,UNORDERED])");

    let ack = open_ack(picked.to_string());
    HandshakeMsg::from(ack.clone())
        .validate_basic()
        .expect("well-formed open ack");
    assert!(ack.confirm_version(&initiator));

    let confirm = HandshakeMsg::from(OpenConfirm {
        connection_id: "connectionidtwo".to_owned(),
        proof_ack: vec![5],
        proof_height: 7,
        signer: Signer::new(b"responder".to_vec()),
    });
    assert_eq!(confirm.validate_basic(), Ok(()));
}

#[test]
fn responder_preference_order_decides() {
    let responder = NegotiationConfig::new(
        vec![
            Version::default_connection(),
            Version::new("2", ["DAG"]).expect("valid"),
        ],
        FeatureSetPolicy::new(),
    )
    .expect("non-empty");
    let try_msg = open_try(vec!["(2,[DAG])".to_owned(), "(1,[ORDERED])".to_owned()]);

    let picked = try_msg.pick_version(&responder).expect("both overlap");
    assert_eq!(picked.to_string(), "(1,[ORDERED])");
}

#[test]
fn responder_without_overlap_aborts() {
    let try_msg = open_try(vec!["(1,[DAG])".to_owned()]);
    let err = try_msg
        .pick_version(&NegotiationConfig::default())
        .unwrap_err();
    assert!(matches!(err, NegotiationError::NoCompatibleVersion { .. }));
}

#[test]
fn initiator_rejects_widened_or_emptied_versions() {
    let initiator = initiator_config();
    assert!(!open_ack("(2,[DAG,ZK])".to_owned()).confirm_version(&initiator));
    assert!(!open_ack("(2,[])".to_owned()).confirm_version(&initiator));
    assert!(!open_ack("(3,[DAG])".to_owned()).confirm_version(&initiator));
    assert!(open_ack("(2,[ORDERED])".to_owned()).confirm_version(&initiator));
}
