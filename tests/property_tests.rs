//! Property-based tests for the logging pipeline

use proptest::prelude::*;
use serde_json::{Map, Value};
use tagged_logger::appenders::MemoryAppender;
use tagged_logger::prelude::*;
use tagged_logger::{deep_merge, merge_defaults, LogCall};

fn call_with(level: LogLevel, message: &str, args: Vec<LogArg>) -> LogCall {
    LogCall::new(level, message).with_args(args)
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-e]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Maps whose keys avoid record fields and reserved carrier keys
fn arb_fields() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[f-m][a-z]{0,5}", arb_value(), 0..5)
        .prop_map(|m| m.into_iter().collect())
}

fn arb_level() -> impl Strategy<Value = LogLevel> {
    prop::sample::select(LogLevel::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_caller_wins_at_top_level(caller in arb_fields(), defaults in arb_fields()) {
        let merged = merge_defaults(caller.clone(), &defaults);
        for (key, value) in &caller {
            match (value, defaults.get(key)) {
                (Value::Object(_), Some(Value::Object(_))) => {
                    prop_assert!(merged[key].is_object());
                }
                _ => prop_assert_eq!(&merged[key], value),
            }
        }
        for key in defaults.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    #[test]
    fn test_merge_defaults_with_empty_is_identity(caller in arb_fields()) {
        prop_assert_eq!(merge_defaults(caller.clone(), &Map::new()), caller.clone());
        prop_assert_eq!(merge_defaults(Map::new(), &caller), caller);
    }

    #[test]
    fn test_deep_merge_source_wins(target in arb_fields(), source in arb_fields()) {
        let mut merged = target.clone();
        deep_merge(&mut merged, source.clone());
        for (key, value) in &source {
            if !value.is_object() {
                prop_assert_eq!(&merged[key], value);
            }
        }
        for key in target.keys() {
            prop_assert!(merged.contains_key(key));
        }
    }

    #[test]
    fn test_level_str_roundtrip(level in arb_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(parsed, level);
        let upper: LogLevel = level.to_str().to_uppercase().parse().unwrap();
        prop_assert_eq!(upper, level);
    }

    #[test]
    fn test_sink_threshold(call_level in arb_level(), threshold in arb_level()) {
        let sink = Sink::new(MemoryAppender::new()).with_level(threshold);
        prop_assert_eq!(sink.accepts(call_level), call_level <= threshold);
    }

    #[test]
    fn test_rendering_is_deterministic(
        message in ".{0,40}",
        fields in arb_fields(),
        level in arb_level(),
        json in any::<bool>(),
    ) {
        let sink = Sink::new(MemoryAppender::new()).json(json);
        let call = call_with(level, &message, vec![LogArg::from(fields)]);
        prop_assert_eq!(sink.render(&call), sink.render(&call));
    }

    #[test]
    fn test_human_line_contains_extras_json(message in "[a-z ]{0,20}", fields in arb_fields()) {
        let sink = Sink::new(MemoryAppender::new());
        let call = call_with(LogLevel::Info, &message, vec![LogArg::from(fields.clone())]);
        let record = sink.record(&call);
        let line = sink.render_record(&record).to_line();

        prop_assert_eq!(&record.extras, &fields);
        if !fields.is_empty() {
            prop_assert!(line.contains(&serde_json::to_string(&fields).unwrap()));
        }
    }

    #[test]
    fn test_stack_appears_once(marker in "[A-Z]{12}", json in any::<bool>()) {
        let sink = Sink::new(MemoryAppender::new()).json(json);
        let error = ErrorInfo::new(format!("failed {}", marker), format!("Error: failed {}\n    at handler", marker));
        let call = call_with(LogLevel::Error, "Failure:", vec![LogArg::from(error)]);
        let text = sink.render(&call).to_line();
        prop_assert_eq!(text.matches(&marker).count(), 1);
    }

    #[test]
    fn test_structured_never_leaks_carriers(fields in arb_fields(), tag in "[a-z]{1,8}") {
        let mut data = fields.clone();
        data.insert("__tag__".to_string(), Value::from(tag.clone()));
        data.insert("__extra_fields__".to_string(), Value::Object(Map::new()));
        let sink = Sink::new(MemoryAppender::new()).json(true);
        let call = call_with(LogLevel::Info, "carried", vec![LogArg::from(data)]);

        let rendered = sink.render(&call);
        let obj = rendered.as_structured().unwrap();
        prop_assert!(!obj.contains_key("__tag__"));
        prop_assert!(!obj.contains_key("__extra_fields__"));
        prop_assert_eq!(&obj["tag"], &Value::from(tag));
    }
}
