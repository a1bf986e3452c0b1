//! The cleaning pass.
//!
//! A pass lists the regular files directly inside a directory, classifies
//! each one by extension, and moves it into the matching category
//! subdirectory. Status lines and fractional progress are reported through a
//! [`Reporter`]; a shared [`StopFlag`] lets another thread end the pass
//! between two files.
//!
//! Failures never escape a pass as errors. They are logged through the
//! reporter and counted in the returned [`RunSummary`].

use crate::category::{CategoryTable, split_file_name};
use crate::mover::{self, MoveError};
use chrono::{DateTime, Utc};
use crossbeam_channel::Sender;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info, warn};

pub const MARK_ERROR: &str = "❌";
pub const MARK_SCAN: &str = "📂";
pub const MARK_WARNING: &str = "⚠️";
pub const MARK_INFO: &str = "ℹ️";
pub const MARK_STOP: &str = "🛑";
pub const MARK_MOVED: &str = "✅";
pub const MARK_DONE: &str = "🎉";

const SEPARATOR_WIDTH: usize = 40;

/// Errors that end a pass before any file is touched.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// The path does not name an existing directory.
    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),
    /// The directory could not be listed.
    #[error("Error accessing directory {}: {source}", .path.display())]
    ListingFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Cooperative cancellation for a running pass.
///
/// The flag starts out permitting work. [`request_stop`](Self::request_stop)
/// clears it from any thread; the pass checks it once per file. A stopped
/// flag stays stopped until [`reset`](Self::reset) is called.
#[derive(Debug, Clone)]
pub struct StopFlag {
    running: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Ask the pass to stop before its next file.
    pub fn request_stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Permit a new pass to run.
    pub fn reset(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    pub fn should_continue(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Receives status lines and progress from a pass.
///
/// Calls are made synchronously from whichever thread runs the pass.
pub trait Reporter {
    /// A complete human-readable status line.
    fn log(&mut self, message: &str);
    /// Fraction of files attempted so far, in `0.0..=1.0`.
    fn progress(&mut self, fraction: f64);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn log(&mut self, message: &str) {
        (**self).log(message);
    }

    fn progress(&mut self, fraction: f64) {
        (**self).progress(fraction);
    }
}

/// Adapts a pair of closures into a [`Reporter`].
///
/// # Examples
///
/// ```
/// use folder_cleaner::cleaner::{Callbacks, Reporter};
///
/// let mut lines = Vec::new();
/// let mut reporter = Callbacks::new(|line: &str| lines.push(line.to_string()), |_| {});
/// reporter.log("hello");
/// drop(reporter);
/// assert_eq!(lines, vec!["hello"]);
/// ```
pub struct Callbacks<L, P> {
    log: L,
    progress: P,
}

impl<L, P> Callbacks<L, P>
where
    L: FnMut(&str),
    P: FnMut(f64),
{
    pub fn new(log: L, progress: P) -> Self {
        Self { log, progress }
    }
}

impl<L, P> Reporter for Callbacks<L, P>
where
    L: FnMut(&str),
    P: FnMut(f64),
{
    fn log(&mut self, message: &str) {
        (self.log)(message);
    }

    fn progress(&mut self, fraction: f64) {
        (self.progress)(fraction);
    }
}

/// An event emitted by a pass running on another thread.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanEvent {
    Log(String),
    Progress(f64),
}

/// Forwards pass output over a channel, for front ends that must handle it
/// on their own thread.
///
/// Send failures (the receiver went away) are ignored; the pass carries on.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: Sender<CleanEvent>,
}

impl ChannelReporter {
    pub fn new(tx: Sender<CleanEvent>) -> Self {
        Self { tx }
    }
}

impl Reporter for ChannelReporter {
    fn log(&mut self, message: &str) {
        let _ = self.tx.send(CleanEvent::Log(message.to_string()));
    }

    fn progress(&mut self, fraction: f64) {
        let _ = self.tx.send(CleanEvent::Progress(fraction));
    }
}

/// Lifecycle of a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassState {
    Idle,
    Scanning,
    Processing,
    Stopped,
    Done,
}

/// How a pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    /// Every listed file was attempted.
    Completed,
    /// The stop flag was observed before the listing was exhausted.
    Stopped,
    /// The directory held no regular files.
    NoFiles,
    /// The directory was invalid or could not be listed.
    Failed,
}

/// A file that was relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: PathBuf,
    pub to: PathBuf,
    pub category: String,
    /// True when a collision forced a new name.
    pub renamed: bool,
}

/// A file that could not be relocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedMove {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub directory: PathBuf,
    pub outcome: PassOutcome,
    /// Regular files listed at scan start.
    pub found: usize,
    pub moved: usize,
    pub renamed: usize,
    pub errors: usize,
    pub moves: Vec<MoveRecord>,
    pub failures: Vec<FailedMove>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    fn new(directory: &Path) -> Self {
        let now = Utc::now();
        Self {
            directory: directory.to_path_buf(),
            outcome: PassOutcome::Failed,
            found: 0,
            moved: 0,
            renamed: 0,
            errors: 0,
            moves: Vec::new(),
            failures: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Files attempted, successful or not.
    pub fn attempted(&self) -> usize {
        self.moved + self.errors
    }

    /// Moved files per category name.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for record in &self.moves {
            *counts.entry(record.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    fn finish(mut self, outcome: PassOutcome) -> Self {
        self.outcome = outcome;
        self.finished_at = Utc::now();
        self
    }
}

/// A move the pass would perform, as computed by [`FolderCleaner::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub from: PathBuf,
    pub category: String,
    pub file_name: String,
    pub renamed: bool,
}

/// Runs cleaning passes with a fixed category table.
#[derive(Debug, Clone)]
pub struct FolderCleaner {
    table: Arc<CategoryTable>,
    stop: StopFlag,
}

impl FolderCleaner {
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table: Arc::new(table),
            stop: StopFlag::new(),
        }
    }

    /// A handle to this cleaner's stop flag.
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Runs one pass over `directory`, blocking until it completes or stops.
    ///
    /// The stop flag is read, never reset: a flag left stopped by an earlier
    /// pass stops this one before its first file.
    ///
    /// # Examples
    ///
    /// ```
    /// use folder_cleaner::{CategoryTable, Callbacks, FolderCleaner, PassOutcome};
    /// use std::fs;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// fs::write(dir.path().join("photo.png"), "").unwrap();
    ///
    /// let cleaner = FolderCleaner::new(CategoryTable::default());
    /// let summary = cleaner.run(dir.path(), &mut Callbacks::new(|_: &str| {}, |_| {}));
    ///
    /// assert_eq!(summary.outcome, PassOutcome::Completed);
    /// assert!(dir.path().join("Images/photo.png").is_file());
    /// ```
    pub fn run<R: Reporter + ?Sized>(&self, directory: &Path, reporter: &mut R) -> RunSummary {
        let mut summary = RunSummary::new(directory);
        let mut state = PassState::Idle;
        transition(&mut state, PassState::Scanning, directory);

        if !directory.is_dir() {
            reporter.log(&format!("{} Error: Invalid directory selected.", MARK_ERROR));
            warn!(directory = %directory.display(), "invalid directory");
            transition(&mut state, PassState::Done, directory);
            return summary.finish(PassOutcome::Failed);
        }

        reporter.log(&format!("{} Scanning: {}...", MARK_SCAN, directory.display()));

        let files = match list_files(directory) {
            Ok(files) => files,
            Err(e) => {
                reporter.log(&format!("{} Error accessing directory: {}", MARK_ERROR, e));
                warn!(directory = %directory.display(), error = %e, "listing failed");
                transition(&mut state, PassState::Done, directory);
                return summary.finish(PassOutcome::Failed);
            }
        };

        let total = files.len();
        summary.found = total;
        if total == 0 {
            reporter.log(&format!("{} No files found to clean.", MARK_WARNING));
            reporter.progress(1.0);
            transition(&mut state, PassState::Done, directory);
            return summary.finish(PassOutcome::NoFiles);
        }

        reporter.log(&format!(
            "{} Found {} files. Starting organization...",
            MARK_INFO, total
        ));
        transition(&mut state, PassState::Processing, directory);

        for (index, raw_name) in files.iter().enumerate() {
            if !self.stop.should_continue() {
                reporter.log(&format!("{} Operation stopped by user.", MARK_STOP));
                transition(&mut state, PassState::Stopped, directory);
                break;
            }

            let display_name = raw_name.to_string_lossy();
            let category = self.table.category_for_file(&display_name);
            let source = directory.join(raw_name);

            match relocate(directory, &source, raw_name, category) {
                Ok(record) => {
                    if record.renamed {
                        let new_name = file_name_lossy(&record.to);
                        reporter.log(&format!(
                            "{} Moved (renamed): {} → {}/{}",
                            MARK_MOVED, display_name, category, new_name
                        ));
                        summary.renamed += 1;
                    } else {
                        reporter.log(&format!(
                            "{} Moved: {} → {}",
                            MARK_MOVED, display_name, category
                        ));
                    }
                    debug!(file = %display_name, category, renamed = record.renamed, "moved");
                    summary.moved += 1;
                    summary.moves.push(record);
                }
                Err(e) => {
                    reporter.log(&format!(
                        "{} Error moving {}: {}",
                        MARK_ERROR,
                        display_name,
                        io_cause(&e)
                    ));
                    warn!(file = %display_name, error = %e, "move failed");
                    summary.errors += 1;
                    summary.failures.push(FailedMove {
                        path: source,
                        reason: e.to_string(),
                    });
                }
            }

            reporter.progress((index + 1) as f64 / total as f64);
        }

        let outcome = if state == PassState::Stopped {
            PassOutcome::Stopped
        } else {
            transition(&mut state, PassState::Done, directory);
            PassOutcome::Completed
        };

        reporter.log(&"-".repeat(SEPARATOR_WIDTH));
        match outcome {
            PassOutcome::Stopped => reporter.log(&format!(
                "{} Stopped. Moved: {}, Errors: {}",
                MARK_STOP, summary.moved, summary.errors
            )),
            _ => reporter.log(&format!(
                "{} Completed! Moved: {}, Errors: {}",
                MARK_DONE, summary.moved, summary.errors
            )),
        }
        info!(
            directory = %directory.display(),
            found = summary.found,
            moved = summary.moved,
            errors = summary.errors,
            ?outcome,
            "pass finished"
        );

        summary.finish(outcome)
    }

    /// Computes what a pass would do without touching the filesystem.
    ///
    /// Collision names account both for entries already in the category
    /// directories and for earlier files of the same plan.
    ///
    /// # Errors
    ///
    /// Returns [`CleanError`] if `directory` is not a directory or cannot be
    /// listed.
    pub fn plan(&self, directory: &Path) -> Result<Vec<PlannedMove>, CleanError> {
        if !directory.is_dir() {
            return Err(CleanError::InvalidDirectory(directory.to_path_buf()));
        }
        let files = list_files(directory).map_err(|source| CleanError::ListingFailed {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut claimed: HashSet<(String, String)> = HashSet::new();
        let mut planned = Vec::with_capacity(files.len());

        for raw_name in files {
            let name = raw_name.to_string_lossy().into_owned();
            let category = self.table.category_for_file(&name).to_string();
            let category_dir = directory.join(&category);

            let (base, ext) = split_file_name(&name);
            let mut candidate = name.clone();
            let mut counter: u64 = 1;
            while fs::symlink_metadata(category_dir.join(&candidate)).is_ok()
                || claimed.contains(&(category.clone(), candidate.clone()))
            {
                candidate = format!("{}_{}{}", base, counter, ext);
                counter += 1;
            }
            claimed.insert((category.clone(), candidate.clone()));

            planned.push(PlannedMove {
                from: directory.join(&raw_name),
                renamed: candidate != name,
                category,
                file_name: candidate,
            });
        }

        Ok(planned)
    }

    /// Runs a pass on a background thread.
    ///
    /// The reporter is moved to the worker and dropped when the pass ends,
    /// which closes a [`ChannelReporter`]'s channel.
    pub fn spawn<R>(&self, directory: PathBuf, mut reporter: R) -> io::Result<CleanHandle>
    where
        R: Reporter + Send + 'static,
    {
        let cleaner = self.clone();
        let thread = thread::Builder::new()
            .name("folder-cleaner".into())
            .spawn(move || cleaner.run(&directory, &mut reporter))?;

        Ok(CleanHandle {
            stop: self.stop.clone(),
            thread,
        })
    }
}

/// Handle to a pass running on a background thread.
pub struct CleanHandle {
    stop: StopFlag,
    thread: thread::JoinHandle<RunSummary>,
}

impl CleanHandle {
    /// Request the pass to stop before its next file.
    pub fn stop(&self) {
        self.stop.request_stop();
    }

    /// Wait for the pass and return its summary.
    pub fn join(self) -> thread::Result<RunSummary> {
        self.thread.join()
    }
}

/// Names of the regular files directly inside `directory`.
///
/// Symlinks are followed when deciding whether an entry is a file. Order is
/// whatever the OS listing yields.
fn list_files(directory: &Path) -> io::Result<Vec<OsString>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if fs::metadata(entry.path()).is_ok_and(|m| m.is_file()) {
            files.push(entry.file_name());
        }
    }
    Ok(files)
}

fn relocate(
    base_path: &Path,
    source: &Path,
    raw_name: &std::ffi::OsStr,
    category: &str,
) -> Result<MoveRecord, MoveError> {
    let category_path = mover::ensure_category_dir(base_path, category)?;
    let new_name = mover::destination_name(&category_path, raw_name);
    let destination = category_path.join(&new_name);
    mover::move_file(source, &destination)?;

    Ok(MoveRecord {
        from: source.to_path_buf(),
        to: destination,
        category: category.to_string(),
        renamed: new_name.as_os_str() != raw_name,
    })
}

fn io_cause(error: &MoveError) -> &io::Error {
    match error {
        MoveError::DirectoryCreationFailed { source, .. } => source,
        MoveError::FileMoveFailed { source, .. } => source,
    }
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn transition(state: &mut PassState, next: PassState, directory: &Path) {
    let from = *state;
    debug!(directory = %directory.display(), ?from, to = ?next, "pass state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        lines: Vec<String>,
        progress: Vec<f64>,
    }

    impl Reporter for Recorder {
        fn log(&mut self, message: &str) {
            self.lines.push(message.to_string());
        }

        fn progress(&mut self, fraction: f64) {
            self.progress.push(fraction);
        }
    }

    fn cleaner() -> FolderCleaner {
        FolderCleaner::new(CategoryTable::default())
    }

    #[test]
    fn test_stop_flag_lifecycle() {
        let flag = StopFlag::new();
        assert!(flag.should_continue());

        let other = flag.clone();
        other.request_stop();
        assert!(!flag.should_continue());

        flag.reset();
        assert!(other.should_continue());
    }

    #[test]
    fn test_invalid_directory_reports_once_without_progress() {
        let mut recorder = Recorder::default();
        let summary = cleaner().run(Path::new("/non/existent/path"), &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::Failed);
        assert_eq!(recorder.lines.len(), 1);
        assert!(recorder.lines[0].contains("Invalid directory"));
        assert!(recorder.progress.is_empty());
    }

    #[test]
    fn test_file_path_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let mut recorder = Recorder::default();
        let summary = cleaner().run(&file, &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::Failed);
        assert!(recorder.progress.is_empty());
        assert!(file.is_file());
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let mut recorder = Recorder::default();
        let summary = cleaner().run(temp_dir.path(), &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::NoFiles);
        assert_eq!(recorder.progress, vec![1.0]);
        assert!(recorder.lines.iter().any(|l| l.contains("No files found")));
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_moves_and_logs() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("notes.txt"), "n").unwrap();
        fs::write(temp_dir.path().join("song.mp3"), "s").unwrap();

        let mut recorder = Recorder::default();
        let summary = cleaner().run(temp_dir.path(), &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::Completed);
        assert_eq!((summary.found, summary.moved, summary.errors), (2, 2, 0));
        assert!(recorder.lines.contains(&"✅ Moved: notes.txt → Documents".to_string()));
        assert!(recorder.lines.contains(&"✅ Moved: song.mp3 → Audio".to_string()));
        assert_eq!(
            recorder.lines.last().unwrap(),
            "🎉 Completed! Moved: 2, Errors: 0"
        );
        assert_eq!(recorder.progress, vec![0.5, 1.0]);
    }

    #[test]
    fn test_renamed_move_is_logged() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Documents")).unwrap();
        fs::write(temp_dir.path().join("Documents/a.txt"), "old").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "new").unwrap();

        let mut recorder = Recorder::default();
        let summary = cleaner().run(temp_dir.path(), &mut recorder);

        assert_eq!(summary.renamed, 1);
        assert!(
            recorder
                .lines
                .contains(&"✅ Moved (renamed): a.txt → Documents/a_1.txt".to_string())
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Documents/a.txt")).unwrap(),
            "old"
        );
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Documents/a_1.txt")).unwrap(),
            "new"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_per_file_failure_does_not_abort() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A dangling symlink named like the category blocks its directory
        // and is not itself listed as a file.
        std::os::unix::fs::symlink(
            temp_dir.path().join("missing-target"),
            temp_dir.path().join("Images"),
        )
        .unwrap();
        fs::write(temp_dir.path().join("photo.png"), "p").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "n").unwrap();

        let mut recorder = Recorder::default();
        let summary = cleaner().run(temp_dir.path(), &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::Completed);
        assert_eq!((summary.found, summary.moved, summary.errors), (2, 1, 1));
        assert_eq!(summary.failures[0].path, temp_dir.path().join("photo.png"));
        assert_eq!(recorder.progress.last(), Some(&1.0));
        assert!(temp_dir.path().join("photo.png").is_file());
        assert!(temp_dir.path().join("Documents/notes.txt").is_file());
        assert!(
            recorder
                .lines
                .iter()
                .any(|l| l.starts_with("❌ Error moving photo.png:"))
        );
        assert_eq!(
            recorder.lines.last().unwrap(),
            "🎉 Completed! Moved: 1, Errors: 1"
        );
    }

    #[test]
    fn test_stopped_flag_stops_before_first_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("a.txt"), "").unwrap();

        let cleaner = cleaner();
        cleaner.stop_flag().request_stop();

        let mut recorder = Recorder::default();
        let summary = cleaner.run(temp_dir.path(), &mut recorder);

        assert_eq!(summary.outcome, PassOutcome::Stopped);
        assert_eq!(summary.attempted(), 0);
        assert!(recorder.progress.is_empty());
        assert!(temp_dir.path().join("a.txt").is_file());
        assert!(
            recorder
                .lines
                .contains(&"🛑 Operation stopped by user.".to_string())
        );
        assert_eq!(
            recorder.lines.last().unwrap(),
            "🛑 Stopped. Moved: 0, Errors: 0"
        );
    }

    #[test]
    fn test_callbacks_reporter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("app.exe"), "").unwrap();

        let lines = RefCell::new(Vec::new());
        let fractions = RefCell::new(Vec::new());
        let mut reporter = Callbacks::new(
            |line: &str| lines.borrow_mut().push(line.to_string()),
            |f| fractions.borrow_mut().push(f),
        );
        cleaner().run(temp_dir.path(), &mut reporter);

        assert_eq!(fractions.into_inner(), vec![1.0]);
        assert!(lines.into_inner().iter().any(|l| l.contains("Programs")));
    }

    #[test]
    fn test_plan_does_not_touch_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("Documents")).unwrap();
        fs::write(temp_dir.path().join("Documents/a.txt"), "").unwrap();
        fs::write(temp_dir.path().join("a.txt"), "").unwrap();
        fs::write(temp_dir.path().join("photo.png"), "").unwrap();

        let mut plan = cleaner().plan(temp_dir.path()).unwrap();
        plan.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].file_name, "a_1.txt");
        assert!(plan[0].renamed);
        assert_eq!(plan[1].category, "Images");
        assert!(!plan[1].renamed);
        assert!(temp_dir.path().join("photo.png").is_file());
        assert!(!temp_dir.path().join("Images").exists());
    }

    #[test]
    fn test_handle_stop_never_loses_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        for i in 0..20 {
            fs::write(temp_dir.path().join(format!("{}.txt", i)), "").unwrap();
        }

        let cleaner = cleaner();
        let handle = cleaner
            .spawn(temp_dir.path().to_path_buf(), Recorder::default())
            .expect("Failed to spawn worker");
        handle.stop();
        let summary = handle.join().expect("worker panicked");

        let left = list_files(temp_dir.path()).unwrap().len();
        assert_eq!(summary.moved + left, 20);
        assert!(!cleaner.stop_flag().should_continue());
    }

    #[test]
    fn test_plan_invalid_directory() {
        let result = cleaner().plan(Path::new("/non/existent/path"));
        assert!(matches!(result, Err(CleanError::InvalidDirectory(_))));
    }

    #[test]
    fn test_spawn_with_channel_reporter() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("archive.zip"), "").unwrap();

        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = cleaner()
            .spawn(temp_dir.path().to_path_buf(), ChannelReporter::new(tx))
            .expect("Failed to spawn worker");

        let events: Vec<CleanEvent> = rx.iter().collect();
        let summary = handle.join().expect("worker panicked");

        assert_eq!(summary.moved, 1);
        assert!(events.contains(&CleanEvent::Progress(1.0)));
        assert!(temp_dir.path().join("Archives/archive.zip").is_file());
    }
}
