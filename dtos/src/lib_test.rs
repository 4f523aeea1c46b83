use super::*;
use serde_json::json;

#[test]
fn authorized_status_parses_appliance_payload() {
    let raw = json!({
        "clientState": "AUTHORIZED",
        "ipAddress": "10.0.0.7",
        "macAddress": "02:00:00:00:00:11",
        "userName": "maker",
        "sessionId": "abc",
        "startTime": 1_700_000_000.25,
        "acc_session_timeout": 3600
    });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(status.client_state(), ClientState::Authorized);
    let authorized = status.as_authorized().unwrap();
    assert_eq!(authorized.user_name, "maker");
    assert_eq!(authorized.session_id, "abc");
    assert!((authorized.start_time - 1_700_000_000.25).abs() < f64::EPSILON);
    assert_eq!(status.auth_type(), None);
}

#[test]
fn unauthorized_status_carries_auth_type() {
    let raw = json!({ "clientState": "NOT_AUTHORIZED", "ipAddress": "10.0.0.7", "authType": "none" });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(status.client_state(), ClientState::NotAuthorized);
    assert_eq!(status.auth_type(), Some(AuthType::None));
    assert!(!status.is_authorized());
}

#[test]
fn unauthorized_status_optional_fields_may_be_missing() {
    let raw = json!({ "clientState": "NOT_AUTHORIZED", "ipAddress": "10.0.0.7" });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    match status {
        ClientStatusResponse::NotAuthorized(s) => {
            assert_eq!(s.mac_address, None);
            assert_eq!(s.auth_type, None);
        }
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn unknown_status_parses() {
    let raw = json!({ "clientState": "UNKNOWN", "ipAddress": "0.0.0.0" });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(status.client_state(), ClientState::Unknown);
    assert_eq!(status.ip_address(), "0.0.0.0");
}

#[test]
fn unrecognized_client_state_reads_as_unknown() {
    let raw = json!({ "clientState": "EXPIRED", "ipAddress": "10.0.0.7" });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(status.client_state(), ClientState::Unknown);
    assert_eq!(status.ip_address(), "10.0.0.7");
}

#[test]
fn missing_client_state_is_rejected() {
    let raw = json!({ "errorMessage": "Endpoint not found", "errorTitle": "Error" });
    assert!(serde_json::from_value::<ClientStatusResponse>(raw).is_err());
}

#[test]
fn authorized_without_session_fields_is_rejected() {
    let raw = json!({ "clientState": "AUTHORIZED", "ipAddress": "10.0.0.7" });
    let err = serde_json::from_value::<ClientStatusResponse>(raw).unwrap_err();
    assert!(err.to_string().contains("macAddress"));
}

#[test]
fn unrecognized_auth_type_reads_as_absent() {
    let raw = json!({ "clientState": "NOT_AUTHORIZED", "ipAddress": "10.0.0.7", "authType": "voucher" });
    let status: ClientStatusResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(status.client_state(), ClientState::NotAuthorized);
    assert_eq!(status.auth_type(), None);
}

#[test]
fn unauthorized_serialization_skips_absent_fields() {
    let status = ClientStatusResponse::NotAuthorized(UnauthorizedClientStatus {
        ip_address: "127.0.0.1".into(),
        mac_address: None,
        auth_type: Some(AuthType::Normal),
    });
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(
        value,
        json!({ "clientState": "NOT_AUTHORIZED", "ipAddress": "127.0.0.1", "authType": "normal" })
    );
}

#[test]
fn authorized_serialization_uses_camel_case() {
    let status = ClientStatusResponse::Authorized(AuthorizedClientStatus {
        ip_address: "127.0.0.1".into(),
        mac_address: "02:00:00:00:00:80".into(),
        user_name: "maker".into(),
        session_id: "s-1".into(),
        start_time: 12.0,
    });
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value["clientState"], "AUTHORIZED");
    assert_eq!(value["userName"], "maker");
    assert_eq!(value["sessionId"], "s-1");
    assert_eq!(value["macAddress"], "02:00:00:00:00:80");
}

#[test]
fn auth_type_from_str_is_case_insensitive() {
    assert_eq!("NONE".parse::<AuthType>(), Ok(AuthType::None));
    assert_eq!(" normal ".parse::<AuthType>(), Ok(AuthType::Normal));
    assert!("radius".parse::<AuthType>().is_err());
}

#[test]
fn logon_request_defaults_missing_fields() {
    let req: LogonRequest = serde_json::from_value(json!({ "user": "maker" })).unwrap();
    assert_eq!(req, LogonRequest::new("maker", ""));
    assert_eq!(LogonRequest::anonymous(), LogonRequest::new("", ""));
}

#[test]
fn captive_portal_status_uses_rfc_field_names() {
    let status = CaptivePortalStatus {
        captive: true,
        user_portal_url: Some("https://portal.test/".into()),
        seconds_remaining: None,
    };
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value, json!({ "captive": true, "user-portal-url": "https://portal.test/" }));

    let parsed: CaptivePortalStatus =
        serde_json::from_value(json!({ "captive": false, "seconds-remaining": 120 })).unwrap();
    assert!(!parsed.captive);
    assert_eq!(parsed.seconds_remaining, Some(120));
}
