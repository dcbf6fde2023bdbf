//! Shared test utilities for integration tests
//!
//! Every test gets its own storage directory and a frozen clock, so runs are
//! isolated and timestamps are predictable.

use shellctx::cli::RunContext;
use shellctx::clock::FixedClock;
use shellctx::dispatch::Operation;
use shellctx::env::{Environment, Streams};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Instant the frozen clock reports.
pub const FROZEN_AT: &str = "2024-01-02T03:04:05.000000";

/// Output of one invocation.
#[derive(Debug)]
pub struct Captured {
    pub status: i32,
    pub out: String,
    pub err: String,
}

impl Captured {
    pub fn lines(&self) -> Vec<&str> {
        self.out.lines().collect()
    }
}

/// An isolated storage directory plus the knobs a test may turn.
pub struct Harness {
    temp: TempDir,
    pub vars: HashMap<String, String>,
    pub name_override: Option<String>,
    pub cwd: PathBuf,
    extensions: Vec<fn() -> Box<dyn Operation>>,
}

impl Harness {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().join("work");
        std::fs::create_dir_all(&cwd).unwrap();
        Self {
            temp,
            vars: HashMap::new(),
            name_override: None,
            cwd,
            extensions: Vec::new(),
        }
    }

    pub fn store_dir(&self) -> PathBuf {
        self.temp.path().join("store")
    }

    pub fn store_file(&self, name: &str) -> PathBuf {
        self.store_dir().join(format!("{}.json", name))
    }

    pub fn log_file(&self, name: &str) -> PathBuf {
        self.store_dir().join(format!("{}.log", name))
    }

    pub fn pointer_file(&self) -> PathBuf {
        self.store_dir().join("_name.txt")
    }

    pub fn with_override(mut self, name: &str) -> Self {
        self.name_override = Some(name.to_string());
        self
    }

    pub fn with_extension(mut self, make: fn() -> Box<dyn Operation>) -> Self {
        self.extensions.push(make);
        self
    }

    fn environment(&self, args: &[&str]) -> Environment {
        let clock = FixedClock::parse(FROZEN_AT).unwrap();
        let mut argv = vec!["ctx".to_string()];
        argv.extend(args.iter().map(|a| a.to_string()));
        Environment::new(self.store_dir())
            .with_name_override(self.name_override.clone())
            .with_vars(self.vars.clone())
            .with_cwd(self.cwd.clone())
            .with_clock(Arc::new(clock))
            .with_argv(argv)
    }

    /// Run one invocation with empty stdin.
    pub fn run(&self, args: &[&str]) -> Captured {
        self.run_with_input(args, "")
    }

    pub fn run_with_input(&self, args: &[&str], input: &str) -> Captured {
        let mut context = RunContext::from_environment(self.environment(args));
        for make in &self.extensions {
            context.dispatcher_mut().register(make());
        }
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut stdin = input.as_bytes();
        let status = context.execute(args, Streams::new(&mut out, &mut err, &mut stdin));
        Captured {
            status,
            out: String::from_utf8(out).unwrap(),
            err: String::from_utf8(err).unwrap(),
        }
    }

    /// Run and assert success; returns stdout.
    pub fn ok(&self, args: &[&str]) -> String {
        let captured = self.run(args);
        assert_eq!(
            captured.status, 0,
            "`{}` failed: {}",
            args.join(" "),
            captured.err
        );
        captured.out
    }

    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }
}
