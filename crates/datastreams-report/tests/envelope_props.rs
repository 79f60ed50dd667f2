use datastreams_report::envelope::ENVELOPE_STATIC_SIZE;
use datastreams_report::{AbiError, Envelope, EnvelopeCodec, ReportError};
use proptest::collection::vec;
use proptest::prelude::*;

fn envelope_strategy() -> impl Strategy<Value = Envelope> {
    (0usize..6)
        .prop_flat_map(|signers| {
            (
                any::<[[u8; 32]; 3]>(),
                vec(any::<u8>(), 0..400),
                vec(any::<[u8; 32]>(), signers),
                vec(any::<[u8; 32]>(), signers),
                any::<[u8; 32]>(),
            )
        })
        .prop_map(|(report_context, report_blob, raw_rs, raw_ss, raw_vs)| Envelope {
            report_context,
            report_blob,
            raw_rs,
            raw_ss,
            raw_vs,
        })
}

proptest! {
    #[test]
    fn prop_envelope_roundtrip(envelope in envelope_strategy()) {
        let codec = EnvelopeCodec::default();
        let encoded = codec.encode(&envelope).unwrap();
        prop_assert_eq!(encoded.len() % 32, 0);
        prop_assert_eq!(codec.decode(&encoded).unwrap(), envelope);
    }

    #[test]
    fn prop_short_static_region_is_truncated(envelope in envelope_strategy(), cut in 0usize..ENVELOPE_STATIC_SIZE) {
        let codec = EnvelopeCodec::default();
        let encoded = codec.encode(&envelope).unwrap();
        let err = codec.decode(&encoded[..cut]).unwrap_err();
        let is_truncated = matches!(
            err,
            ReportError::Abi(AbiError::TruncatedInput { needed: ENVELOPE_STATIC_SIZE, available }) if available == cut
        );
        prop_assert!(is_truncated);
    }

    #[test]
    fn prop_any_strict_prefix_fails(envelope in envelope_strategy(), cut in any::<prop::sample::Index>()) {
        let codec = EnvelopeCodec::default();
        let encoded = codec.encode(&envelope).unwrap();
        let cut = cut.index(encoded.len());
        prop_assert!(codec.decode(&encoded[..cut]).is_err());
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(data in vec(any::<u8>(), 0..600)) {
        let _ = EnvelopeCodec::default().decode(&data);
        let _ = datastreams_report::decode_report(&data);
    }
}

#[test]
fn uneven_signature_components_are_rejected() {
    let codec = EnvelopeCodec::default();
    let envelope = Envelope {
        report_context: [[0; 32]; 3],
        report_blob: vec![1, 2, 3],
        raw_rs: vec![[1; 32]; 2],
        raw_ss: vec![[2; 32]; 5],
        raw_vs: [0; 32],
    };
    let encoded = codec.encode(&envelope).unwrap();
    assert!(matches!(
        codec.decode(&encoded),
        Err(ReportError::SignatureArityMismatch { rs: 2, ss: 5 })
    ));
}
