//! Property tests for the ticket codec.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::sync::OnceLock;
use ticket_codec_core::{CodecError, Field, MAX_CODE_LEN, TicketCodec};
use ticket_codec_testing::fixtures::{TEST_ALPHABET, TestKeys, normalized};
use ticket_codec_testing::properties::{arb_invalid_affiliation, arb_ticket_record};

fn codec() -> &'static TicketCodec {
    static CODEC: OnceLock<TicketCodec> = OnceLock::new();
    CODEC.get_or_init(|| TestKeys::generate().codec())
}

proptest! {
    #[test]
    fn round_trip_recovers_record(record in arb_ticket_record()) {
        let codec = codec();
        let code = codec.generate(&record).unwrap();

        prop_assert!(!code.is_empty());
        prop_assert!(code.chars().count() <= MAX_CODE_LEN);
        prop_assert!(code.chars().all(|c| TEST_ALPHABET.contains(c)));
        prop_assert_eq!(codec.decode(&code), Some(normalized(record)));
    }

    #[test]
    fn substituted_symbol_never_yields_original(record in arb_ticket_record()) {
        let codec = codec();
        let code = codec.generate(&record).unwrap();
        let original = Some(normalized(record));
        let symbols: Vec<char> = code.chars().collect();

        let mut accepted = 0;
        for position in 0..symbols.len() {
            for replacement in TEST_ALPHABET.chars().filter(|&c| c != symbols[position]) {
                let mut altered = symbols.clone();
                altered[position] = replacement;
                let altered: String = altered.into_iter().collect();

                let decoded = codec.decode(&altered);
                prop_assert_ne!(decoded, original);
                if decoded.is_some() {
                    accepted += 1;
                }
            }
        }
        // A forged code passes the 10-bit tag about once in 1024 tries.
        prop_assert!(accepted < 16, "{} altered codes were accepted", accepted);
    }

    #[test]
    fn invalid_affiliation_is_rejected(
        record in arb_ticket_record(),
        affiliation in arb_invalid_affiliation(),
    ) {
        let mut record = record;
        record.affiliation = affiliation;

        match codec().generate(&record) {
            Err(CodecError::FieldOutOfRange { field, .. }) => {
                prop_assert!(matches!(field, Field::Grade | Field::Class | Field::Number));
            }
            other => prop_assert!(false, "expected a range error, got {:?}", other),
        }
    }

    #[test]
    fn oversized_fields_are_rejected(
        record in arb_ticket_record(),
        relationship in 8u8..,
        ticket_type in 16u8..,
        performance in 32u8..,
        schedule in 64u8..,
        serial in 16u8..,
    ) {
        let codec = codec();
        let cases = [
            (Field::Relationship, ticket_codec_core::TicketRecord { relationship, ..record }),
            (Field::TicketType, ticket_codec_core::TicketRecord { ticket_type, ..record }),
            (Field::Performance, ticket_codec_core::TicketRecord { performance, ..record }),
            (Field::Schedule, ticket_codec_core::TicketRecord { schedule, ..record }),
            (Field::Serial, ticket_codec_core::TicketRecord { serial, ..record }),
        ];
        for (expected, input) in cases {
            let err = codec.generate(&input).unwrap_err();
            prop_assert!(err.is_validation_error());
            let reported = matches!(err, CodecError::FieldOutOfRange { field, .. } if field == expected);
            prop_assert!(reported, "expected {:?}, got {:?}", expected, err);
        }
    }

    #[test]
    fn base58_round_trip(value in 0u64..(1 << 46)) {
        let alphabet = codec().alphabet();
        let text = alphabet.encode(value);
        prop_assert!(text.chars().count() <= MAX_CODE_LEN);
        prop_assert_eq!(alphabet.decode(&text), Some(value));
    }

    #[test]
    fn arbitrary_text_never_panics(text in "\\PC{0,12}") {
        let _ = codec().decode(&text);
        let _ = codec().decode_prefix(&text);
    }
}
