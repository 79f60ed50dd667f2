//! Known-answer and sensitivity checks for request signing.

use datastreams_auth::{
    bulk_reports_path, canonical_string, report_path, sign, Credentials, SignRequest,
};
use proptest::prelude::*;

const FEED: &str = "0x00037da06d56d083fe599397a4769a042d63aa73dc4ef57709d31e9971a5b439";
const TS: u64 = 1_718_885_772_000;

fn creds() -> Credentials {
    Credentials::new("clientId", "clientSecret").unwrap()
}

#[test]
fn get_report_known_answer() {
    let request = SignRequest::get(&report_path(FEED, 1_718_885_772)).unwrap();
    let headers = creds().sign(&request, TS);
    assert_eq!(headers.authorization, "clientId");
    assert_eq!(headers.timestamp, TS);
    assert_eq!(
        headers.signature,
        "6acc8f316d42dd1e81edb48f5fcdf936740a538590f86ecff76bd5cd02f9c31b"
    );
}

#[test]
fn post_with_body_known_answer() {
    let body = br#"{"feedIDs":["0x01"]}"#;
    let request = SignRequest::new("post", "/api/v1/reports")
        .unwrap()
        .with_body(body);
    assert_eq!(
        canonical_string(&request, "clientId", TS),
        "POST /api/v1/reports 9d8bc01ce4a1e67afe9cc570f68f27cd529a8df7e3f0664ee1fa97af8fafd762 clientId 1718885772000"
    );
    assert_eq!(
        sign(&request, &creds(), TS).signature,
        "5e5f670a6ae784876c479f645274bd58a1d85362d16aa1fd58fec72d85d90beb"
    );
}

#[test]
fn empty_body_matches_explicit_empty_body() {
    let path = bulk_reports_path([FEED], 1);
    let implicit = SignRequest::get(&path).unwrap();
    let explicit = SignRequest::get(&path).unwrap().with_body(&[]);
    assert_eq!(creds().sign(&implicit, TS), creds().sign(&explicit, TS));
}

#[test]
fn signature_depends_on_every_input() {
    let base_request = SignRequest::get("/api/v1/reports").unwrap();
    let base = creds().sign(&base_request, TS).signature;

    let changed = [
        creds()
            .sign(&SignRequest::new("HEAD", "/api/v1/reports").unwrap(), TS)
            .signature,
        creds()
            .sign(&SignRequest::get("/api/v1/reports/bulk").unwrap(), TS)
            .signature,
        creds()
            .sign(&base_request.clone().with_body(b"x"), TS)
            .signature,
        Credentials::new("clientId2", "clientSecret")
            .unwrap()
            .sign(&base_request, TS)
            .signature,
        Credentials::new("clientId", "clientSecret2")
            .unwrap()
            .sign(&base_request, TS)
            .signature,
        creds().sign(&base_request, TS + 1).signature,
    ];
    for signature in changed {
        assert_ne!(signature, base);
    }
}

proptest! {
    #[test]
    fn prop_signing_is_deterministic(
        path in "/[a-z0-9/?=&]{0,40}",
        body in proptest::collection::vec(any::<u8>(), 0..64),
        ts in any::<u64>(),
    ) {
        let request = SignRequest::get(&path).unwrap().with_body(&body);
        let first = creds().sign(&request, ts);
        let second = creds().sign(&request, ts);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_timestamp_changes_signature(ts in 0u64..u64::MAX) {
        let request = SignRequest::get("/api/v1/reports").unwrap();
        prop_assert_ne!(creds().sign(&request, ts).signature, creds().sign(&request, ts + 1).signature);
    }
}
