//! Operations registered after the built-ins.

use crate::integration::test_utils::Harness;
use shellctx::dispatch::{Invocation, OpContext, Operation, Outcome, Requires};
use shellctx::error::CtxError;

struct Greet;

impl Operation for Greet {
    fn aliases(&self) -> &[&'static str] {
        &["greet", "hi"]
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn summary(&self) -> &'static str {
        "greet the value stored at KEY"
    }
    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let who = cx.view()?.get(inv.key()?)?.value.clone();
        cx.println(&format!("hello, {}", who))?;
        Ok(Outcome::ok())
    }
}

/// Claims a built-in token; must never be reached through it.
struct ShadowGet;

impl Operation for ShadowGet {
    fn aliases(&self) -> &[&'static str] {
        &["get", "shadow"]
    }
    fn requires(&self) -> Requires {
        Requires::Nothing
    }
    fn summary(&self) -> &'static str {
        "tries to replace get"
    }
    fn execute(&self, cx: &mut OpContext<'_>, _inv: &Invocation) -> Result<Outcome, CtxError> {
        cx.println("shadowed")?;
        Ok(Outcome::exit(7))
    }
}

/// Prints the value words; the key slot is a placeholder.
struct Echo;

impl Operation for Echo {
    fn aliases(&self) -> &[&'static str] {
        &["echo"]
    }
    fn requires(&self) -> Requires {
        Requires::Value
    }
    fn summary(&self) -> &'static str {
        "print VALUE"
    }
    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let text = inv.value()?.to_string();
        cx.println(&text)?;
        Ok(Outcome::ok())
    }
}

fn echo() -> Box<dyn Operation> {
    Box::new(Echo)
}

fn greet() -> Box<dyn Operation> {
    Box::new(Greet)
}

fn shadow() -> Box<dyn Operation> {
    Box::new(ShadowGet)
}

#[test]
fn test_extension_resolves_after_builtins() {
    let h = Harness::new().with_extension(greet);
    h.ok(&["set", "name", "world"]);
    assert_eq!(h.ok(&["greet", "name"]), "hello, world\n");
    assert_eq!(h.ok(&["hi", "name"]), "hello, world\n");
}

#[test]
fn test_extension_cannot_shadow_builtin() {
    let h = Harness::new().with_extension(shadow);
    h.ok(&["set", "k", "v"]);
    assert_eq!(h.ok(&["get", "k"]), "v\n");

    let run = h.run(&["shadow"]);
    assert_eq!(run.status, 7);
    assert_eq!(run.out, "shadowed\n");
}

#[test]
fn test_extension_argument_checks_apply() {
    let h = Harness::new().with_extension(greet);
    let run = h.run(&["greet"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("requires a key"));
}

#[test]
fn test_unregistered_token_still_unknown() {
    let h = Harness::new().with_extension(greet);
    assert_eq!(h.run(&["wave"]).out, "command not recognized: wave\n");
}

#[test]
fn test_value_only_extension() {
    let h = Harness::new().with_extension(echo);
    assert_eq!(h.ok(&["echo", "_", "hello", "there"]), "hello there\n");

    let run = h.run(&["echo", "_"]);
    assert_eq!(run.status, 1);
    assert!(run.err.contains("requires a value"), "{}", run.err);
    assert!(h.ok(&["help"]).contains("_ VALUE"));
}
