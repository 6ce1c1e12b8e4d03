//! Shared test doubles for application service tests.
//!
//! `ScriptedRunner` answers commands by prefix, `FakeFs` keeps files in
//! memory, and both can append to one shared [`Journal`] so tests can assert
//! the order of filesystem moves relative to external commands.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, LocalFs, PortProbe, ProgressReporter};

/// Ordered log of side effects shared between doubles.
pub type Journal = Rc<RefCell<Vec<String>>>;

/// Build an `ExitStatus` from a logical exit code (cross-platform).
#[cfg(unix)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    std::process::ExitStatus::from_raw(code as u32)
}

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn fail_output(stderr: &[u8]) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── ScriptedRunner ───────────────────────────────────────────────────────────

enum Reply {
    Output(Output),
    Error(String),
}

impl Reply {
    fn produce(&self) -> Result<Output> {
        match self {
            Reply::Output(o) => Ok(o.clone()),
            Reply::Error(msg) => anyhow::bail!("{msg}"),
        }
    }
}

/// `CommandRunner` that answers from a script keyed by command-line prefix.
///
/// Each prefix holds a queue of replies; the last reply repeats once the
/// queue is down to one. Unscripted commands fail with "not expected".
pub struct ScriptedRunner {
    journal: Journal,
    script: RefCell<Vec<(String, VecDeque<Reply>)>>,
    spawn_error: Option<String>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::with_journal(Journal::default())
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            script: RefCell::new(Vec::new()),
            spawn_error: None,
        }
    }

    /// Answer commands starting with `prefix` with `replies`, in order.
    #[must_use]
    pub fn on(self, prefix: &str, replies: Vec<Output>) -> Self {
        assert!(!replies.is_empty(), "at least one reply");
        self.script.borrow_mut().push((
            prefix.to_string(),
            replies.into_iter().map(Reply::Output).collect(),
        ));
        self
    }

    /// Fail commands starting with `prefix` before they produce output.
    #[must_use]
    pub fn on_error(self, prefix: &str, message: &str) -> Self {
        self.script
            .borrow_mut()
            .push((prefix.to_string(), VecDeque::from([Reply::Error(message.to_string())])));
        self
    }

    #[must_use]
    pub fn failing_spawn(mut self, message: &str) -> Self {
        self.spawn_error = Some(message.to_string());
        self
    }

    /// Every command line seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.journal.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.journal
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn reply(&self, program: &str, args: &[&str]) -> Result<Output> {
        let line = command_line(program, args);
        self.journal.borrow_mut().push(line.clone());
        let mut script = self.script.borrow_mut();
        let Some((_, replies)) = script.iter_mut().find(|(p, _)| line.starts_with(p.as_str()))
        else {
            anyhow::bail!("not expected: {line}");
        };
        if replies.len() > 1 {
            replies.pop_front().expect("non-empty").produce()
        } else {
            replies.front().expect("non-empty").produce()
        }
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.reply(program, args)
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], _: Duration) -> Result<Output> {
        self.reply(program, args)
    }

    async fn run_to_completion(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.reply(program, args)
    }

    fn spawn_detached(&self, program: &str, args: &[&str], cwd: &Path) -> Result<u32> {
        self.journal.borrow_mut().push(format!(
            "spawn[{}] {}",
            cwd.display(),
            command_line(program, args)
        ));
        match &self.spawn_error {
            Some(msg) => anyhow::bail!("{msg}"),
            None => Ok(4242),
        }
    }
}

// ── FakeFs ───────────────────────────────────────────────────────────────────

/// In-memory `LocalFs`.
pub struct FakeFs {
    journal: Journal,
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    rename_error: Option<String>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::with_journal(Journal::default())
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            files: RefCell::new(BTreeMap::new()),
            dirs: RefCell::new(BTreeSet::new()),
            rename_error: None,
        }
    }

    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.borrow_mut().insert(path.into(), content.to_string());
        self
    }

    #[must_use]
    pub fn failing_rename(mut self, message: &str) -> Self {
        self.rename_error = Some(message.to_string());
        self
    }

    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn has_dir(&self, path: impl AsRef<Path>) -> bool {
        self.dirs.borrow().contains(path.as_ref())
    }

    fn log(&self, entry: String) {
        self.journal.borrow_mut().push(entry);
    }
}

impl LocalFs for FakeFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.log(format!("mkdir {}", path.display()));
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if let Some(msg) = &self.rename_error {
            anyhow::bail!("{msg}");
        }
        let content = self
            .files
            .borrow_mut()
            .remove(from)
            .ok_or_else(|| anyhow::anyhow!("No such file or directory: {}", from.display()))?;
        self.files.borrow_mut().insert(to.to_path_buf(), content);
        self.log(format!("rename {} -> {}", from.display(), to.display()));
        Ok(())
    }

    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), content.to_string());
        self.log(format!("write {}", path.display()));
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        let content = self
            .file(from)
            .ok_or_else(|| anyhow::anyhow!("No such file or directory: {}", from.display()))?;
        self.files.borrow_mut().insert(to.to_path_buf(), content);
        self.log(format!("copy {} -> {}", from.display(), to.display()));
        Ok(())
    }
}

// ── Probe and reporter doubles ───────────────────────────────────────────────

/// `PortProbe` answering from a fixed sequence; repeats the last answer.
pub struct ProbeSequence {
    answers: RefCell<VecDeque<bool>>,
    checks: Cell<u32>,
    at: RefCell<Vec<tokio::time::Instant>>,
}

impl ProbeSequence {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            checks: Cell::new(0),
            at: RefCell::new(Vec::new()),
        }
    }

    pub fn checks(&self) -> u32 {
        self.checks.get()
    }

    /// Instants at which each check happened (tokio clock).
    pub fn check_times(&self) -> Vec<tokio::time::Instant> {
        self.at.borrow().clone()
    }
}

impl PortProbe for ProbeSequence {
    async fn is_listening(&self, _: u16) -> Result<bool> {
        self.checks.set(self.checks.get() + 1);
        self.at.borrow_mut().push(tokio::time::Instant::now());
        let mut answers = self.answers.borrow_mut();
        let answer = if answers.len() > 1 {
            answers.pop_front().unwrap_or(false)
        } else {
            answers.front().copied().unwrap_or(false)
        };
        Ok(answer)
    }
}

/// Reporter that records every message with its level.
#[derive(Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|l| l.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.lines.borrow_mut().push(format!("step: {message}"));
    }
    fn update(&self, message: &str) {
        self.lines.borrow_mut().push(format!("update: {message}"));
    }
    fn success(&self, message: &str) {
        self.lines.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(format!("warn: {message}"));
    }
    fn detail(&self, text: &str) {
        self.lines.borrow_mut().push(format!("detail: {text}"));
    }
}
