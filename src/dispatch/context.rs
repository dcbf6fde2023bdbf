//! Per-dispatch state handed to an operation.

use crate::audit::{AuditLog, LogRecord};
use crate::clock::Timestamper;
use crate::context::{self, LayeredView, Selection};
use crate::dispatch::invocation::Invocation;
use crate::dispatch::registry::Registry;
use crate::env::{Environment, Streams};
use crate::error::CtxError;
use crate::store::StoreDir;
use crate::style::Style;
use std::io::BufRead;
use tracing::info;

/// Everything one operation may touch: the environment, the resolved
/// context (loaded on first use), the streams, and pending log records.
pub struct OpContext<'a> {
    pub env: &'a Environment,
    pub selection: Selection,
    pub registry: &'a Registry,
    pub style: Style,
    streams: Streams<'a>,
    view: Option<LayeredView>,
    log: Option<AuditLog>,
    stamper: Timestamper,
    seeded: bool,
    last_stamp: Option<String>,
    pending: Vec<LogRecord>,
}

impl<'a> OpContext<'a> {
    pub fn new(
        env: &'a Environment,
        selection: Selection,
        registry: &'a Registry,
        streams: Streams<'a>,
    ) -> Self {
        Self {
            env,
            selection,
            registry,
            style: Style::new(env.color),
            streams,
            view: None,
            log: None,
            stamper: Timestamper::new(env.clock.clone()),
            seeded: false,
            last_stamp: None,
            pending: Vec::new(),
        }
    }

    pub fn store_dir(&self) -> &StoreDir {
        &self.env.store_dir
    }

    /// Name of the active context chain.
    pub fn context_name(&self) -> &str {
        &self.selection.name
    }

    /// The layered view, resolved on first access.
    pub fn view(&mut self) -> Result<&LayeredView, CtxError> {
        self.view_mut().map(|view| &*view)
    }

    pub fn view_mut(&mut self) -> Result<&mut LayeredView, CtxError> {
        let view = match self.view.take() {
            Some(view) => view,
            None => context::resolve(&self.env.store_dir, &self.selection.name)?,
        };
        Ok(self.view.insert(view))
    }

    /// The head store's audit log, loaded on first access.
    pub fn audit_log(&mut self) -> Result<&mut AuditLog, CtxError> {
        let log = match self.log.take() {
            Some(log) => log,
            None => {
                let head = self.view()?.head().name().to_string();
                AuditLog::load(&self.env.store_dir, &head)?
            }
        };
        Ok(self.log.insert(log))
    }

    /// Issue a fresh timestamp, strictly after anything in the head store or log.
    pub fn stamp(&mut self) -> Result<String, CtxError> {
        if !self.seeded {
            let mut floor: Vec<String> = self
                .view()?
                .head()
                .iter()
                .map(|(_, e)| e.timestamp.clone())
                .collect();
            floor.extend(self.audit_log()?.last_timestamp().map(str::to_string));
            for ts in &floor {
                self.stamper.observe(ts);
            }
            self.seeded = true;
        }
        let ts = self.stamper.next();
        self.last_stamp = Some(ts.clone());
        Ok(ts)
    }

    /// Wall-clock time, for display only.
    pub fn now(&self) -> chrono::NaiveDateTime {
        self.stamper.peek_now()
    }

    /// Record the invocation as one mutation of the head store, reusing the
    /// timestamp the operation just issued.
    pub fn commit(&mut self, inv: &Invocation) -> Result<(), CtxError> {
        let ts = match self.last_stamp.clone() {
            Some(ts) => ts,
            None => self.stamp()?,
        };
        self.commit_record(LogRecord::new(
            ts,
            inv.command.clone(),
            inv.key.clone(),
            inv.value.clone(),
        ));
        Ok(())
    }

    /// Record one explicit log entry; used by bulk operations.
    pub fn commit_record(&mut self, record: LogRecord) {
        self.pending.push(record);
    }

    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn input(&mut self) -> &mut dyn BufRead {
        &mut *self.streams.input
    }

    pub fn println(&mut self, line: &str) -> Result<(), CtxError> {
        writeln!(self.streams.out, "{}", line)?;
        Ok(())
    }

    /// Write without a trailing newline.
    pub fn print(&mut self, text: &str) -> Result<(), CtxError> {
        write!(self.streams.out, "{}", text)?;
        Ok(())
    }

    pub fn eprintln(&mut self, line: &str) -> Result<(), CtxError> {
        writeln!(self.streams.err, "{}", line)?;
        Ok(())
    }

    /// Persist the head store and append pending log records, if anything changed.
    pub(crate) fn finish(mut self) -> Result<(), CtxError> {
        self.streams.out.flush()?;
        if self.pending.is_empty() {
            return Ok(());
        }
        let records = std::mem::take(&mut self.pending);
        self.audit_log()?;
        let (Some(view), Some(log)) = (self.view.take(), self.log.as_mut()) else {
            return Ok(());
        };
        let head = view.into_head();
        self.env.store_dir.save_store(&head)?;
        log.append(records)?;
        info!(context = %self.selection.name, store = head.name(), "Persisted mutation");
        Ok(())
    }
}
