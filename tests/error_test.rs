//! Tests for [`ExhibitError`] messages and status codes.

use exhibit::types::CapabilityKind;
use exhibit::{EngineError, ExhibitError};

#[test]
fn capability_errors_name_the_kind() {
    let unknown = ExhibitError::UnknownCapability {
        kind: CapabilityKind::Interpreter,
        id: "magic".into(),
    };
    assert_eq!(unknown.to_string(), "No interpreter with id 'magic'");

    let unsupported = ExhibitError::UnsupportedCapability {
        kind: CapabilityKind::Attacker,
        id: "hotflip".into(),
    };
    assert_eq!(
        unsupported.to_string(),
        "Attacker with id 'hotflip' is not supported for this model"
    );
}

#[test]
fn request_too_large_message() {
    let err = ExhibitError::RequestTooLarge {
        model: "bidaf".into(),
        max: 100,
        actual: 250,
    };
    assert_eq!(
        err.to_string(),
        "Max request length exceeded for model bidaf! Max: 100 Actual: 250"
    );
}

#[test]
fn status_codes() {
    let cases = [
        (ExhibitError::InvalidInput("bad".into()), 400),
        (
            ExhibitError::RequestTooLarge {
                model: "m".into(),
                max: 1,
                actual: 2,
            },
            400,
        ),
        (
            ExhibitError::UnknownCapability {
                kind: CapabilityKind::Attacker,
                id: "x".into(),
            },
            404,
        ),
        (ExhibitError::PermalinksDisabled, 400),
        (ExhibitError::UnrecognizedPermalink("x".into()), 400),
        (ExhibitError::PermalinkNotFound("x".into()), 404),
        (ExhibitError::Engine(EngineError::Failed("x".into())), 500),
        (ExhibitError::Storage("x".into()), 500),
        (ExhibitError::Configuration("x".into()), 500),
    ];

    for (err, status) in cases {
        assert_eq!(err.status_code(), status, "{err}");
        assert_eq!(err.is_client_error(), status < 500, "{err}");
    }
}

#[test]
fn json_errors_become_invalid_input() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{nope");
    let err: ExhibitError = parse.unwrap_err().into();
    assert!(matches!(err, ExhibitError::InvalidInput(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn engine_errors_convert() {
    let err: ExhibitError = EngineError::Api {
        status: 502,
        message: "bad gateway".into(),
    }
    .into();
    assert_eq!(err.to_string(), "engine error: engine API error (502): bad gateway");
}
