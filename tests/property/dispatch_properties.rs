//! Properties of full dispatch cycles against a temporary storage directory.

use proptest::prelude::*;
use shellctx::cli::RunContext;
use shellctx::clock::FixedClock;
use shellctx::env::{Environment, Streams};
use std::sync::Arc;
use tempfile::TempDir;

fn run(dir: &TempDir, args: &[&str], input: &str) -> (i32, String) {
    let clock = FixedClock::parse("2000-01-01T00:00:00.000000").unwrap();
    let env = Environment::new(dir.path()).with_clock(Arc::new(clock));
    let context = RunContext::from_environment(env);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut stdin = input.as_bytes();
    let status = context.execute(args, Streams::new(&mut out, &mut err, &mut stdin));
    (status, String::from_utf8(out).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_dispatch_round_trip(k in "[a-z_]{1,8}", v in "[ -~]{1,24}") {
        let dir = TempDir::new().unwrap();
        prop_assert_eq!(run(&dir, &["set", &k, &v], "").0, 0);
        prop_assert_eq!(run(&dir, &["get", &k], ""), (0, format!("{}\n", v)));
    }

    #[test]
    fn prop_entry_numbers_are_sequential(n in 1usize..12) {
        let dir = TempDir::new().unwrap();
        for i in 1..=n {
            let (status, out) = run(&dir, &["entry", "note", "x"], "");
            prop_assert_eq!(status, 0);
            prop_assert_eq!(out, format!("note_{:03}=x\n", i));
        }
    }

    #[test]
    fn prop_bulk_update_orders_lines(values in prop::collection::vec("[a-z0-9]{0,8}", 1..20)) {
        let dir = TempDir::new().unwrap();
        let input: String = values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("key{:02}={}\n", i, v))
            .collect();
        prop_assert_eq!(run(&dir, &["update", "-"], &input).0, 0);

        let raw = std::fs::read_to_string(dir.path().join("main.log")).unwrap();
        let log: Vec<(String, String, Option<String>, Option<String>)> =
            serde_json::from_str(&raw).unwrap();
        prop_assert_eq!(log.len(), values.len());
        for (i, record) in log.iter().enumerate() {
            prop_assert_eq!(&record.1, "update");
            let key = format!("key{:02}", i);
            prop_assert_eq!(record.2.as_deref(), Some(key.as_str()));
            prop_assert_eq!(record.3.as_deref(), Some(values[i].as_str()));
        }
        for pair in log.windows(2) {
            prop_assert!(pair[0].0 < pair[1].0);
        }
    }
}
