//! End-to-end behavior of the built-in commands against a real storage directory.

use crate::integration::test_utils::{Harness, FROZEN_AT};

const T0: &str = FROZEN_AT;
const T1: &str = "2024-01-02T03:04:05.000001";
const T2: &str = "2024-01-02T03:04:05.000002";

#[test]
fn test_set_then_get_round_trip() {
    let h = Harness::new();
    h.ok(&["set", "greeting", "hello", "big", "world"]);
    assert_eq!(h.ok(&["get", "greeting"]), "hello big world\n");

    let store = h.read_json(&h.store_file("main"));
    assert_eq!(store["greeting"][0], T0);
    assert_eq!(store["greeting"][1], "hello big world");
}

#[test]
fn test_store_file_is_four_space_indented() {
    let h = Harness::new();
    h.ok(&["set", "k", "v"]);
    let raw = std::fs::read_to_string(h.store_file("main")).unwrap();
    assert!(raw.contains("\n    \"k\": ["), "unexpected layout:\n{}", raw);
}

#[test]
fn test_get_missing_key_fails() {
    let h = Harness::new();
    let run = h.run(&["get", "nope"]);
    assert_eq!(run.status, 1);
    assert_eq!(run.err, "error: key not found: nope\n");
    assert!(run.out.is_empty());
}

#[test]
fn test_missing_arguments_are_reported() {
    let h = Harness::new();
    let run = h.run(&["set", "k"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("requires a value"), "{}", run.err);

    let run = h.run(&["get"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("requires a key"), "{}", run.err);
    assert!(!h.store_file("main").exists());
}

#[test]
fn test_unknown_command_exits_zero_on_stdout() {
    let h = Harness::new();
    let run = h.run(&["frobnicate", "x"]);
    assert_eq!(run.status, 0);
    assert_eq!(run.out, "command not recognized: frobnicate\n");
    assert!(run.err.is_empty());
}

#[test]
fn test_delete_removes_key() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    h.ok(&["set", "b", "2"]);
    h.ok(&["del", "a"]);
    assert_eq!(h.run(&["get", "a"]).status, 1);
    assert_eq!(h.ok(&["keys"]), "b\n");
}

#[test]
fn test_delete_many_is_all_or_nothing() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    h.ok(&["set", "b", "2"]);
    h.ok(&["set", "c", "3"]);

    let run = h.run(&["delete", "a", "zz", "b"]);
    assert_eq!(run.status, 1);
    assert_eq!(h.ok(&["keys"]), "a\nb\nc\n");

    h.ok(&["delete", "a", "b"]);
    assert_eq!(h.ok(&["keys"]), "c\n");
}

#[test]
fn test_rename_preserves_timestamp() {
    let h = Harness::new();
    h.ok(&["set", "old", "v"]);
    h.ok(&["set", "other", "w"]);
    h.ok(&["mv", "old", "new"]);

    let store = h.read_json(&h.store_file("main"));
    assert!(store.get("old").is_none());
    assert_eq!(store["new"][0], T0);
    assert_eq!(store["new"][1], "v");
}

#[test]
fn test_rename_onto_existing_key_fails() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    h.ok(&["set", "b", "2"]);
    let run = h.run(&["rename", "a", "b"]);
    assert_eq!(run.status, 1);
    assert_eq!(run.err, "error: key already exists: b\n");
    assert_eq!(h.ok(&["get", "b"]), "2\n");
}

#[test]
fn test_rename_target_must_be_one_word() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    assert_eq!(h.run(&["rename", "a", "b", "c"]).status, 1);
    assert_eq!(h.ok(&["get", "a"]), "1\n");
}

#[test]
fn test_copy_gets_fresh_timestamp() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    h.ok(&["cp", "a", "b"]);

    let store = h.read_json(&h.store_file("main"));
    assert_eq!(store["a"][0], T0);
    assert_eq!(store["b"][0], T1);
    assert_eq!(store["b"][1], "1");
}

#[test]
fn test_pop_prints_and_deletes() {
    let h = Harness::new();
    h.ok(&["set", "tmp", "value"]);
    assert_eq!(h.ok(&["pop", "tmp"]), "value\n");
    assert_eq!(h.run(&["_pop", "tmp"]).status, 1);
}

#[test]
fn test_entry_auto_increments() {
    let h = Harness::new();
    assert_eq!(h.ok(&["entry", "note", "first"]), "note_001=first\n");
    assert_eq!(h.ok(&["entry", "note", "a", "b", "c"]), "note_002=a b c\n");
    h.ok(&["del", "note_001"]);
    assert_eq!(h.ok(&["entry", "note", "third"]), "note_003=third\n");
}

#[test]
fn test_entry_fails_cleanly_when_numbers_run_out() {
    let h = Harness::new();
    h.ok(&["set", "n_18446744073709551615", "x"]);
    let run = h.run(&["entry", "n", "y"]);
    assert_eq!(run.status, 1);
    assert!(run.err.starts_with("error: "), "{}", run.err);
    assert_eq!(h.run(&["keys"]).lines(), vec!["n_18446744073709551615"]);
}

#[test]
fn test_update_from_stdin() {
    let h = Harness::new();
    let run = h.run_with_input(&["update", "-"], "A=1\n\nB=two words\nC=x=y\n");
    assert_eq!(run.status, 0, "{}", run.err);

    let store = h.read_json(&h.store_file("main"));
    assert_eq!(store["A"], serde_json::json!([T0, "1"]));
    assert_eq!(store["B"], serde_json::json!([T1, "two words"]));
    assert_eq!(store["C"], serde_json::json!([T2, "x=y"]));

    let log = h.read_json(&h.log_file("main"));
    let records = log.as_array().unwrap();
    assert_eq!(records.len(), 3);
    for record in records {
        assert_eq!(record[1], "update");
    }
}

#[test]
fn test_update_rejects_line_without_separator() {
    let h = Harness::new();
    let run = h.run_with_input(&["update", "-"], "A=1\nbroken\n");
    assert_eq!(run.status, 1);
    assert!(run.err.contains("no '='"), "{}", run.err);
    assert!(!h.store_file("main").exists());
    assert!(!h.log_file("main").exists());
}

#[test]
fn test_update_from_file_relative_to_cwd() {
    let h = Harness::new();
    std::fs::write(h.cwd.join("vars.env"), "HOST=example.org\r\nPORT=8080\r\n").unwrap();
    h.ok(&["update", "vars.env"]);
    assert_eq!(h.ok(&["items"]), "HOST=example.org\nPORT=8080\n");

    let run = h.run(&["update", "missing.env"]);
    assert_eq!(run.status, 1);
}

#[test]
fn test_clear_requires_context_name() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);

    let run = h.run(&["clear", "wrong"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("\"main\""), "{}", run.err);
    assert_eq!(h.ok(&["keys"]), "a\n");

    h.ok(&["clear", "main"]);
    assert_eq!(h.ok(&["keys"]), "");
    assert_eq!(h.read_json(&h.store_file("main")), serde_json::json!({}));
}

#[test]
fn test_import_copies_environment_variable() {
    let mut h = Harness::new();
    h.vars.insert("EDITOR".to_string(), "vim".to_string());

    h.ok(&["import", "EDITOR"]);
    h.ok(&["import", "EDITOR", "ed"]);
    assert_eq!(h.ok(&["items"]), "EDITOR=vim\ned=vim\n");

    assert_eq!(h.run(&["import", "EDITOR", "two words"]).status, 1);
}

#[test]
fn test_import_of_unset_variable_is_silent() {
    let h = Harness::new();
    let run = h.run(&["import", "NOT_SET_ANYWHERE"]);
    assert_eq!(run.status, 0);
    assert!(run.out.is_empty());
    assert!(!h.store_file("main").exists());
    assert!(!h.log_file("main").exists());
}

#[test]
fn test_setpath_joins_working_directory() {
    let h = Harness::new();
    let expected = h.cwd.join("sub").to_string_lossy().to_string();
    assert_eq!(
        h.ok(&["setpath", "proj", "sub"]),
        format!("setting proj = {}\n", expected)
    );
    assert_eq!(h.ok(&["get", "proj"]), format!("{}\n", expected));

    h.ok(&["setpath", "here"]);
    h.ok(&["setpath", "dot", "."]);
    let cwd = h.cwd.to_string_lossy().to_string();
    assert_eq!(h.ok(&["get", "here"]), format!("{}\n", cwd));
    assert_eq!(h.ok(&["get", "dot"]), format!("{}\n", cwd));
}

#[test]
fn test_full_dump_is_newest_first() {
    let h = Harness::new();
    h.ok(&["set", "a", "1"]);
    h.ok(&["set", "b", "2"]);

    let out = h.ok(&[]);
    let expected = format!(
        "Using context main\nThere are 2 entries.\n\n{}    b = 2\n{}    a = 1\n",
        T1, T0
    );
    assert_eq!(out, expected);
    assert_eq!(h.ok(&["_fullitems"]), expected);
}

#[test]
fn test_full_dump_notes_override() {
    let h = Harness::new().with_override("scratch");
    let out = h.ok(&["fullitems"]);
    assert!(out.starts_with("Using context scratch set by CTX_NAME\nThere are 0 entries.\n"));
}

#[test]
fn test_items_and_keys_are_sorted() {
    let h = Harness::new();
    h.ok(&["set", "zeta", "z"]);
    h.ok(&["set", "alpha", "a"]);
    h.ok(&["set", "mid", "m"]);
    assert_eq!(h.ok(&["keys"]), "alpha\nmid\nzeta\n");
    assert_eq!(h.ok(&["items"]), "alpha=a\nmid=m\nzeta=z\n");
    assert_eq!(h.ok(&["items", "zeta", "alpha"]), "alpha=a\nzeta=z\n");
    assert_eq!(h.run(&["items", "nope"]).status, 1);
}

#[test]
fn test_now_strips_colons() {
    let h = Harness::new();
    assert_eq!(h.ok(&["now"]), "2024-01-02T030405.000000\n");
}

#[test]
fn test_name_and_store_path() {
    let h = Harness::new();
    assert_eq!(h.ok(&["name"]), "main\n");
    assert_eq!(
        h.ok(&["_ctxpath"]),
        format!("{}\n", h.store_dir().display())
    );
}

#[test]
fn test_version_and_args_go_to_stderr() {
    let h = Harness::new();
    let run = h.run(&["--version"]);
    assert_eq!(run.status, 0);
    assert!(run.out.is_empty());
    assert_eq!(
        run.err,
        format!("shellctx version {}\n", env!("CARGO_PKG_VERSION"))
    );

    let run = h.run(&["_print", "a b"]);
    assert_eq!(run.err, "    0 = 'ctx'\n    1 = '_print'\n    2 = 'a b'\n");
}

#[test]
fn test_help_lists_commands() {
    let h = Harness::new();
    let out = h.ok(&["-h"]);
    assert!(out.contains("rename, mv"), "{}", out);
    assert!(out.contains("delete-named-context, _delctx"), "{}", out);
}

#[test]
fn test_dryshell_appends_looked_up_values() {
    let h = Harness::new();
    h.ok(&["set", "greet", "echo"]);
    h.ok(&["set", "who", "world"]);
    h.ok(&["set", "punct", "!"]);
    assert_eq!(
        h.ok(&["dryshell", "greet", "who", "punct"]),
        "dryrun shell command: echo world !\n"
    );
    assert_eq!(h.ok(&["dry-shell", "greet"]), "dryrun shell command: echo\n");
    assert_eq!(h.run(&["dryshell", "greet", "nobody"]).status, 1);
}

#[test]
fn test_dryexec_splits_like_a_shell() {
    let h = Harness::new();
    h.ok(&["set", "p", "printf '%s\\n' \"a b\""]);
    assert_eq!(
        h.ok(&["dryexec", "p", "x", "-y"]),
        "dryrun exec command: [\"printf\",\"%s\\\\n\",\"a b\",\"x\",\"-y\"]\n"
    );
}

#[test]
fn test_dryexec_rejects_unbalanced_quotes() {
    let h = Harness::new();
    h.ok(&["set", "bad", "echo 'oops"]);
    let run = h.run(&["dry-exec", "bad"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("unbalanced"), "{}", run.err);
}

#[cfg(unix)]
#[test]
fn test_exec_and_shell_propagate_exit_status() {
    let h = Harness::new();
    h.ok(&["set", "fail3", "sh -c 'exit 3'"]);
    h.ok(&["set", "fail4", "exit 4"]);
    assert_eq!(h.run(&["exec", "fail3"]).status, 3);
    assert_eq!(h.run(&["shell", "fail4"]).status, 4);
    assert_eq!(h.run(&["shell", "fail4"]).err, "");
}

#[cfg(unix)]
#[test]
fn test_exec_of_missing_program_is_error() {
    let h = Harness::new();
    h.ok(&["set", "ghost", "definitely-not-a-real-program-xyz"]);
    let run = h.run(&["exec", "ghost"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("Failed to run"), "{}", run.err);
}

#[test]
fn test_log_prints_one_array_per_line() {
    let h = Harness::new();
    h.ok(&["set", "k", "v"]);
    h.ok(&["del", "k"]);
    assert_eq!(
        h.ok(&["log"]),
        format!(
            "[\"{}\",\"set\",\"k\",\"v\"]\n[\"{}\",\"del\",\"k\",null]\n",
            T0, T1
        )
    );
}
