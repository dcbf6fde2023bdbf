//! Running stored command fragments as subprocesses.

use crate::dispatch::context::OpContext;
use crate::dispatch::invocation::{Invocation, Requires};
use crate::dispatch::registry::{Operation, Outcome};
use crate::error::CtxError;
use std::process::Command;
use tracing::info;

/// Run the entry at KEY through the host shell, with the values of the
/// keys named in VALUE appended.
pub struct Shell {
    pub dry_run: bool,
}

impl Shell {
    fn command_line(cx: &mut OpContext<'_>, inv: &Invocation) -> Result<String, CtxError> {
        let view = cx.view()?;
        let mut line = view.get(inv.key()?)?.value.clone();
        let words = inv.value.as_deref().unwrap_or_default().split_whitespace();
        let args = words
            .map(|k| view.get(k).map(|e| e.value.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        if !args.is_empty() {
            line.push(' ');
            line.push_str(&args.join(" "));
        }
        Ok(line)
    }
}

#[cfg(windows)]
fn host_shell(line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(line);
    cmd
}

#[cfg(not(windows))]
fn host_shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line);
    cmd
}

fn run(mut cmd: Command, shown: &str) -> Result<Outcome, CtxError> {
    let status = cmd.status().map_err(|source| CtxError::Process {
        command: shown.to_string(),
        source,
    })?;
    info!(command = shown, status = ?status.code(), "Subprocess exited");
    Ok(Outcome::exit(status.code().unwrap_or(1)))
}

impl Operation for Shell {
    fn aliases(&self) -> &[&'static str] {
        if self.dry_run {
            &["dryshell", "dry-shell"]
        } else {
            &["shell"]
        }
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn summary(&self) -> &'static str {
        if self.dry_run {
            "print the shell command `shell` would run"
        } else {
            "run KEY in the shell with the values of KEYS appended"
        }
    }
    fn usage(&self) -> &'static str {
        "[KEYS...]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let line = Self::command_line(cx, inv)?;
        if self.dry_run {
            let style = cx.style;
            cx.println(&format!("dryrun shell command: {}", style.value(&line)))?;
            return Ok(Outcome::ok());
        }
        info!(command = %line, "Running shell command");
        run(host_shell(&line), &line)
    }
}

/// Split the entry at KEY like a shell would, append the raw arguments,
/// and spawn the result directly.
pub struct Exec {
    pub dry_run: bool,
}

impl Exec {
    fn argv(cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Vec<String>, CtxError> {
        let template = cx.view()?.get(inv.key()?)?.value.clone();
        let mut argv = shlex::split(&template).ok_or_else(|| CtxError::InvalidArgument {
            command: inv.command.clone(),
            reason: format!("cannot split \"{}\": unbalanced quoting", template),
        })?;
        argv.extend(inv.rest.iter().cloned());
        if argv.is_empty() {
            return Err(CtxError::InvalidArgument {
                command: inv.command.clone(),
                reason: "stored command is empty".to_string(),
            });
        }
        Ok(argv)
    }
}

impl Operation for Exec {
    fn aliases(&self) -> &[&'static str] {
        if self.dry_run {
            &["dryexec", "dry-exec"]
        } else {
            &["exec"]
        }
    }
    fn requires(&self) -> Requires {
        Requires::Key
    }
    fn summary(&self) -> &'static str {
        if self.dry_run {
            "print the argument vector `exec` would spawn"
        } else {
            "spawn KEY directly with ARGS appended"
        }
    }
    fn usage(&self) -> &'static str {
        "[ARGS...]"
    }

    fn execute(&self, cx: &mut OpContext<'_>, inv: &Invocation) -> Result<Outcome, CtxError> {
        let argv = Self::argv(cx, inv)?;
        let rendered = serde_json::to_string(&argv).map_err(|e| CtxError::InvalidArgument {
            command: inv.command.clone(),
            reason: e.to_string(),
        })?;
        if self.dry_run {
            let style = cx.style;
            cx.println(&format!("dryrun exec command: {}", style.value(&rendered)))?;
            return Ok(Outcome::ok());
        }

        info!(command = %rendered, "Spawning");
        let mut cmd = Command::new(&argv[0]);
        cmd.args(&argv[1..]);
        run(cmd, &rendered)
    }
}
