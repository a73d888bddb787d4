#![cfg(feature = "serde")]

use std::io::Write;

use connection::msgs::HandshakeMsg;
use connection::{ConfigError, NegotiationConfig};

#[test]
fn loads_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"compatible_versions": ["(2,[DAG])", "(1,[ORDERED,UNORDERED])"],
            "allow_empty_feature_sets": {{"2": true}}}}"#
    )
    .expect("write config");

    let config = NegotiationConfig::from_json_file(file.path()).expect("valid config");
    let picked = config.pick(&["(2,[ZK])"]).expect("empty set allowed for 2");
    assert_eq!(picked.to_string(), "(2,[])");
}

#[test]
fn unknown_fields_are_ignored_but_bad_versions_are_not() {
    let ok = NegotiationConfig::from_json_str(
        r#"{"compatible_versions": ["(1,[ORDERED])"], "comment": "test"}"#,
    );
    assert!(ok.is_ok());

    let err = NegotiationConfig::from_json_str(r#"{"compatible_versions": ["(1,[ORD)ERED])"]}"#)
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn handshake_message_parses_from_json() {
    let msg: HandshakeMsg = serde_json::from_str(
        r#"{
            "type": "connection_open_ack",
            "connection_id": "connectionidone",
            "version": "(1,[ORDERED])",
            "proof_try": [1],
            "proof_consensus": [2],
            "proof_height": 3,
            "consensus_height": 3,
            "signer": [115, 105, 103, 110]
        }"#,
    )
    .expect("valid message");
    assert_eq!(msg.msg_type(), "connection_open_ack");
    assert_eq!(msg.validate_basic(), Ok(()));
}
