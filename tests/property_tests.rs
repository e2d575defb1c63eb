//! Property-based tests for fanout_logger using proptest

use fanout_logger::core::encoder::encode;
use fanout_logger::prelude::*;
use proptest::prelude::*;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that parsing ignores case
    #[test]
    fn test_log_level_case_insensitive(level in any_level(), use_lower in any::<bool>()) {
        let text = if use_lower {
            level.to_str().to_lowercase()
        } else {
            level.to_str().to_string()
        };
        prop_assert_eq!(text.parse::<LogLevel>().unwrap(), level);
    }

    /// Test that the filter agrees with numeric ordering
    #[test]
    fn test_log_level_filter_matches_value(level in any_level(), threshold in any_level()) {
        prop_assert_eq!(level.passes(threshold), level.value() >= threshold.value());
        prop_assert_eq!(level >= threshold, level.passes(threshold));
    }

    /// Test that unknown names are rejected
    #[test]
    fn test_log_level_invalid_parse(invalid in "[abcfghj-vx-zABCFGHJ-VX-Z0-9]+") {
        prop_assert!(invalid.parse::<LogLevel>().is_err());
    }

    /// Test that LogLevel serializes as its upper-case name
    #[test]
    fn test_log_level_json_serialization(level in any_level()) {
        let json = serde_json::to_string(&level).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", level));
    }
}

// ============================================================================
// Message Sanitization Tests
// ============================================================================

proptest! {
    /// Test that no entry message ever contains a raw line break or tab
    #[test]
    fn test_message_sanitization(message in ".*") {
        let entry = LogEntry::new(LogLevel::Info, &message);
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
        prop_assert!(!entry.message.contains('\t'));
    }

    /// Test that messages without control characters are kept verbatim
    #[test]
    fn test_plain_message_unchanged(message in "[a-zA-Z0-9 .,:;!?-]*") {
        let entry = LogEntry::new(LogLevel::Warn, &message);
        prop_assert_eq!(entry.message, message);
    }

    /// Test that a formatted line is always a single line
    #[test]
    fn test_log_injection_prevention(
        prefix in "[a-zA-Z ]{0,20}",
        injected in "[a-zA-Z ]{0,20}",
    ) {
        let entry = LogEntry::new(LogLevel::Info, format!("{}\nERROR {}\r\n", prefix, injected));
        prop_assert_eq!(entry.format_line().lines().count(), 1);
    }

    /// Test that multi-part messages are joined with single spaces
    #[test]
    fn test_parts_join(parts in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let mut joined = String::new();
        parts.clone().write_message(&mut joined);
        prop_assert_eq!(joined, parts.join(" "));
    }
}

// ============================================================================
// Structured Payload Tests
// ============================================================================

proptest! {
    /// Test that encoded payloads decode to the same object
    #[test]
    fn test_encode_roundtrip(
        entries in prop::collection::btree_map("[a-z_]{1,10}", any::<i64>(), 1..8)
    ) {
        let encoded = encode(&entries).unwrap().expect("non-empty object");
        let decoded: std::collections::BTreeMap<String, i64> =
            serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(decoded, entries);
    }

    /// Test that encoded output is a single line
    #[test]
    fn test_encode_single_line(value in ".*") {
        let fields = LogFields::new().with("value", value);
        let encoded = encode(&fields).unwrap().expect("non-empty object");
        prop_assert!(!encoded.contains('\n'));
    }
}

// ============================================================================
// Queue Capacity Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Test that the queue accepts exactly its capacity before the worker runs
    #[test]
    fn test_queue_accepts_exactly_capacity(capacity in 1usize..32, emitted in 0usize..64) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let (accepted, dropped) = runtime.block_on(async {
            let logger = Logger::builder()
                .queue_capacity(capacity)
                .handler(Arc::new(MemoryHandler::new()))
                .build(&CancellationToken::new())
                .unwrap();
            for i in 0..emitted {
                logger.debug(i.to_string());
            }
            (logger.metrics().accepted_count(), logger.metrics().dropped_count())
        });

        let expected = emitted.min(capacity) as u64;
        prop_assert_eq!(accepted, expected);
        prop_assert_eq!(dropped, emitted as u64 - expected);
    }
}
