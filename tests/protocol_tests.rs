//! Tests for the JSON line protocol codec

use questline::progression::{PlayerProgression, ProgressionRules};
use questline::protocol::{
    decode_command, encode_command, encode_response, player_id_hint, Command, Response, Status,
    UNKNOWN_PLAYER_ID,
};
use questline::QuestlineError;

#[test]
fn decodes_each_command_kind() {
    match decode_command(r#"{"type":"LOAD","playerId":42}"#).expect("load") {
        Command::Load { player_id } => assert_eq!(player_id, 42),
        other => panic!("expected LOAD, got {:?}", other),
    }

    match decode_command(r#"{"type":"EVENT","playerId":7,"eventType":"kill_boss","amount":-5}"#)
        .expect("event")
    {
        Command::Event {
            player_id,
            event_type,
            amount,
        } => {
            assert_eq!(player_id, 7);
            assert_eq!(event_type, "kill_boss");
            assert_eq!(amount, -5);
        }
        other => panic!("expected EVENT, got {:?}", other),
    }

    match decode_command(r#"{"type":"PING","playerId":1}"#).expect("ping") {
        Command::Ping { player_id } => assert_eq!(player_id, 1),
        other => panic!("expected PING, got {:?}", other),
    }
}

#[test]
fn decodes_save_with_a_full_progression_blob() {
    let state = PlayerProgression::new_default(42, &ProgressionRules::default());
    let line = format!(
        r#"{{"type":"SAVE","playerId":42,"data":{}}}"#,
        serde_json::to_string(&state).unwrap()
    );

    match decode_command(&line).expect("save") {
        Command::Save { player_id, data } => {
            assert_eq!(player_id, 42);
            assert_eq!(data, state);
        }
        other => panic!("expected SAVE, got {:?}", other),
    }
}

#[test]
fn malformed_json_is_a_protocol_error() {
    let err = decode_command("{oops").unwrap_err();
    assert!(matches!(err, QuestlineError::Protocol(_)));
    assert!(err.to_string().contains("malformed request"));
}

#[test]
fn unknown_command_type_is_reported_as_such() {
    let err = decode_command(r#"{"type":"DELETE","playerId":4}"#).unwrap_err();
    assert!(err.to_string().contains("unknown command: DELETE"));
}

#[test]
fn missing_type_and_missing_fields_are_protocol_errors() {
    assert!(decode_command(r#"{"playerId":4}"#)
        .unwrap_err()
        .to_string()
        .contains("missing command type"));

    // EVENT without an amount
    let err = decode_command(r#"{"type":"EVENT","playerId":4,"eventType":"x"}"#).unwrap_err();
    assert!(matches!(err, QuestlineError::Protocol(_)));
}

#[test]
fn non_positive_player_id_is_a_validation_error() {
    for line in [
        r#"{"type":"LOAD","playerId":0}"#,
        r#"{"type":"PING","playerId":-3}"#,
    ] {
        let err = decode_command(line).unwrap_err();
        assert!(matches!(err, QuestlineError::Validation(_)), "{}", line);
    }
}

#[test]
fn player_id_hint_recovers_what_it_can() {
    assert_eq!(player_id_hint(r#"{"type":"NOPE","playerId":31}"#), 31);
    assert_eq!(player_id_hint("{not json at all"), UNKNOWN_PLAYER_ID);
    assert_eq!(player_id_hint(r#"{"type":"LOAD"}"#), UNKNOWN_PLAYER_ID);
}

#[test]
fn progression_response_carries_level_xp_and_flat_quests() {
    let state = PlayerProgression::new_default(42, &ProgressionRules::default());
    let response = Response::progression(&state);
    let line = encode_response(&response).expect("encode");

    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["status"], "OK");
    assert_eq!(value["playerId"], 42);
    assert_eq!(value["level"], 0);
    assert_eq!(value["xp"], 0);
    assert_eq!(value["quests"]["kill_boss"], 0);
    // message is only present on errors
    assert!(value.get("message").is_none());
}

#[test]
fn error_and_pong_responses_have_the_wire_shape() {
    let line = encode_response(&Response::error(-1, "bad line")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["status"], "ERROR");
    assert_eq!(value["playerId"], -1);
    assert_eq!(value["message"], "bad line");
    assert!(value.get("level").is_none());

    let pong = Response::pong(42);
    assert_eq!(pong.status, Status::Pong);
    let value: serde_json::Value =
        serde_json::from_str(&encode_response(&pong).unwrap()).unwrap();
    assert_eq!(value["status"], "PONG");
    assert_eq!(value["playerId"], 42);
}

#[test]
fn encoded_commands_decode_back() {
    let command = Command::Event {
        player_id: 9,
        event_type: "daily_login".to_string(),
        amount: 3,
    };
    let line = encode_command(&command).unwrap();
    match decode_command(&line).unwrap() {
        Command::Event {
            player_id, amount, ..
        } => {
            assert_eq!(player_id, 9);
            assert_eq!(amount, 3);
        }
        other => panic!("expected EVENT, got {:?}", other),
    }
}
