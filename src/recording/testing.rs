//! In-memory capture and playback backends for controller tests.

use super::capture::CaptureBackend;
use super::playback::PlaybackBackend;
use anyhow::anyhow;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

#[derive(Debug, Default)]
struct CaptureLogInner {
    begun: Vec<PathBuf>,
    finished: usize,
    discarded: usize,
    holding: bool,
    fail_begin: bool,
    fail_finish: bool,
    finish_delay: Duration,
    finish_entered: Option<DateTime<Local>>,
}

/// Shared view of what a [`FakeCapture`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog(Rc<RefCell<CaptureLogInner>>);

impl CaptureLog {
    pub fn begun(&self) -> Vec<PathBuf> {
        self.0.borrow().begun.clone()
    }

    pub fn finished(&self) -> usize {
        self.0.borrow().finished
    }

    pub fn discarded(&self) -> usize {
        self.0.borrow().discarded
    }

    /// Whether the fake still holds the microphone.
    pub fn holding(&self) -> bool {
        self.0.borrow().holding
    }

    pub fn fail_begin(&self, fail: bool) {
        self.0.borrow_mut().fail_begin = fail;
    }

    pub fn fail_finish(&self, fail: bool) {
        self.0.borrow_mut().fail_finish = fail;
    }

    /// Makes `finish` take `delay`, like a slow encode.
    pub fn slow_finish(&self, delay: Duration) {
        self.0.borrow_mut().finish_delay = delay;
    }

    /// Wall-clock time the last `finish` call began.
    pub fn finish_entered(&self) -> Option<DateTime<Local>> {
        self.0.borrow().finish_entered
    }
}

pub struct FakeCapture {
    log: CaptureLog,
}

impl FakeCapture {
    pub fn new() -> Self {
        Self {
            log: CaptureLog::default(),
        }
    }

    pub fn log(&self) -> CaptureLog {
        self.log.clone()
    }
}

impl CaptureBackend for FakeCapture {
    fn extension(&self) -> &str {
        "mp3"
    }

    fn begin(&mut self, output: &Path) -> anyhow::Result<()> {
        let mut log = self.log.0.borrow_mut();
        // Failures happen after the device was grabbed, like a real prepare/start.
        log.holding = true;
        if log.fail_begin {
            return Err(anyhow!("device busy"));
        }
        log.begun.push(output.to_path_buf());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        let mut log = self.log.0.borrow_mut();
        log.finish_entered = Some(Local::now());
        std::thread::sleep(log.finish_delay);
        if log.fail_finish {
            return Err(anyhow!("encoder crashed"));
        }
        log.holding = false;
        log.finished += 1;
        Ok(())
    }

    fn discard(&mut self) {
        let mut log = self.log.0.borrow_mut();
        if log.holding {
            log.discarded += 1;
        }
        log.holding = false;
    }
}

#[derive(Debug, Default)]
struct PlaybackLogInner {
    live: Vec<PathBuf>,
    released: Vec<PathBuf>,
    failing: Vec<PathBuf>,
}

/// Shared view of the sessions a [`FakePlayback`] handed out.
#[derive(Debug, Clone, Default)]
pub struct PlaybackLog(Rc<RefCell<PlaybackLogInner>>);

impl PlaybackLog {
    /// Paths of sessions that have not been dropped yet.
    pub fn live(&self) -> Vec<PathBuf> {
        self.0.borrow().live.clone()
    }

    pub fn released(&self) -> Vec<PathBuf> {
        self.0.borrow().released.clone()
    }

    /// Makes opening `path` fail from now on.
    pub fn fail_path(&self, path: &str) {
        self.0.borrow_mut().failing.push(PathBuf::from(path));
    }
}

pub struct FakePlayback {
    log: PlaybackLog,
}

impl FakePlayback {
    pub fn new() -> Self {
        Self {
            log: PlaybackLog::default(),
        }
    }

    pub fn log(&self) -> PlaybackLog {
        self.log.clone()
    }
}

pub struct FakeSession {
    path: PathBuf,
    log: PlaybackLog,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        let mut log = self.log.0.borrow_mut();
        log.live.retain(|p| p != &self.path);
        log.released.push(self.path.clone());
    }
}

impl PlaybackBackend for FakePlayback {
    type Session = FakeSession;

    fn open(&mut self, path: &Path) -> anyhow::Result<FakeSession> {
        let mut log = self.log.0.borrow_mut();
        if log.failing.iter().any(|p| p == path) {
            return Err(anyhow!("cannot decode {}", path.display()));
        }
        log.live.push(path.to_path_buf());
        Ok(FakeSession {
            path: path.to_path_buf(),
            log: self.log.clone(),
        })
    }
}
