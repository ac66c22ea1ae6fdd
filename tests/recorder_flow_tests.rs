//! End-to-end recorder flow through the public controller API.

use anyhow::anyhow;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use taper::recording::{
    CaptureBackend, CaptureController, MicrophoneAccess, PlaybackBackend, PlaybackController,
};
use taper::screen::{ListChange, NoticeLevel, RowSource, ScreenController, ScreenEvent};

/// Writes a placeholder file on finish, like an encoder would.
struct FileCapture {
    pending: Option<PathBuf>,
}

impl CaptureBackend for FileCapture {
    fn extension(&self) -> &str {
        "ogg"
    }

    fn begin(&mut self, output: &Path) -> anyhow::Result<()> {
        self.pending = Some(output.to_path_buf());
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        let path = self.pending.take().ok_or_else(|| anyhow!("not capturing"))?;
        std::fs::write(path, b"OggS")?;
        Ok(())
    }

    fn discard(&mut self) {
        self.pending = None;
    }
}

/// Plays only files that exist on disk.
#[derive(Clone, Default)]
struct DiskPlayback {
    opened: Rc<RefCell<Vec<PathBuf>>>,
}

impl PlaybackBackend for DiskPlayback {
    type Session = PathBuf;

    fn open(&mut self, path: &Path) -> anyhow::Result<PathBuf> {
        if !path.exists() {
            return Err(anyhow!("{} does not exist", path.display()));
        }
        self.opened.borrow_mut().push(path.to_path_buf());
        Ok(path.to_path_buf())
    }
}

fn screen(
    cache_dir: &Path,
    access: MicrophoneAccess,
) -> (ScreenController<FileCapture, DiskPlayback>, DiskPlayback) {
    let playback = DiskPlayback::default();
    let controller = ScreenController::new(
        CaptureController::new(FileCapture { pending: None }, cache_dir.to_path_buf()),
        PlaybackController::new(playback.clone()),
        access,
    );
    (controller, playback)
}

#[test]
fn consent_record_list_and_play() {
    let dir = tempfile::tempdir().unwrap();
    let (mut screen, playback) = screen(dir.path(), MicrophoneAccess::ask());

    assert_eq!(screen.handle(ScreenEvent::Record), ListChange::Unchanged);
    assert!(screen.permission_pending());
    screen.handle(ScreenEvent::PermissionResult(true));
    assert!(screen.is_capturing());
    assert_eq!(screen.handle(ScreenEvent::Stop), ListChange::InsertedAt(0));

    screen.handle(ScreenEvent::Record);
    assert_eq!(screen.handle(ScreenEvent::Stop), ListChange::InsertedAt(0));

    let recordings = screen.recordings();
    assert_eq!(recordings.item_count(), 2);
    let newest = recordings.get(0).unwrap().clone();
    assert!(newest.path().starts_with(dir.path()));
    assert!(newest.path().exists());
    assert_eq!(newest.path().extension().unwrap(), "ogg");
    assert_eq!(recordings.bind(0).unwrap().duration, "0:00");

    screen.handle(ScreenEvent::Play(0));
    assert_eq!(*playback.opened.borrow(), vec![newest.path().to_path_buf()]);
    let notices = screen.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
    assert!(notices[0].message.starts_with("Playing: Recording_"));
}

#[test]
fn deleted_file_reports_playback_failure() {
    let dir = tempfile::tempdir().unwrap();
    let (mut screen, _playback) = screen(dir.path(), MicrophoneAccess::granted());
    screen.handle(ScreenEvent::Record);
    screen.handle(ScreenEvent::Stop);

    let path = screen.recordings().get(0).unwrap().path().to_path_buf();
    std::fs::remove_file(&path).unwrap();
    screen.handle(ScreenEvent::Play(0));

    let notices = screen.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Playback failed");
}

#[test]
fn teardown_mid_capture_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let (mut screen, _playback) = screen(dir.path(), MicrophoneAccess::granted());

    screen.handle(ScreenEvent::Record);
    screen.handle(ScreenEvent::Teardown);

    assert!(!screen.is_capturing());
    assert_eq!(screen.recordings().item_count(), 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
