//! Daily rotating file appender
//!
//! Files are named from a template in which `%DATE%` stands for the local
//! date (`YYYY-MM-DD`), so each day gets its own file. Within a day the
//! file rolls over to `<file>.1`, `<file>.2`, ... once it reaches the size
//! limit. Rolled and closed files can be gzipped, and the number of rolled
//! files kept can be capped.

use crate::core::error::{LoggerError, Result};
use crate::core::log_level::LogLevel;
use crate::core::renderer::Rendered;
use crate::core::sink::{SinkConfig, DEFAULT_FILENAME};
use crate::core::Appender;
use chrono::{Local, NaiveDate};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Placeholder replaced by the date in file name templates
pub const DATE_PLACEHOLDER: &str = "%DATE%";

/// Option key capping the number of rolled files kept
pub const MAX_FILES_KEY: &str = "maxFiles";

const DATE_PATTERN: &str = "%Y-%m-%d";

/// Rotation settings
///
/// # Examples
///
/// ```
/// use tagged_logger::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_files(7)
///     .with_compression(true);
/// assert_eq!(policy.max_files, Some(7));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationPolicy {
    /// Bytes after which the current file rolls over; unlimited when `None`
    pub max_size: Option<u64>,
    /// Rolled files kept; unlimited when `None`
    pub max_files: Option<usize>,
    /// Gzip rolled and closed files
    pub compress: bool,
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, size: u64) -> Self {
        self.max_size = Some(size);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = Some(count);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// Appender writing one file per day, rolling over by size
///
/// Rolled files are tracked for pruning while the appender lives; files
/// left over from earlier runs are not pruned.
///
/// # Examples
///
/// ```no_run
/// use tagged_logger::appenders::{DailyRotateFileAppender, RotationPolicy};
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * 1024 * 1024)
///     .with_compression(true);
/// let appender = DailyRotateFileAppender::new("/var/log/app", "app-%DATE%.log", policy).unwrap();
/// ```
pub struct DailyRotateFileAppender {
    dirname: PathBuf,
    template: String,
    policy: RotationPolicy,
    date: NaiveDate,
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    next_index: usize,
    rolled: VecDeque<PathBuf>,
}

impl DailyRotateFileAppender {
    /// Open today's file under `dirname`, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns error if the directory or the file cannot be created
    pub fn new(
        dirname: impl AsRef<Path>,
        template: impl Into<String>,
        policy: RotationPolicy,
    ) -> Result<Self> {
        let dirname = dirname.as_ref().to_path_buf();
        fs::create_dir_all(&dirname).map_err(|e| {
            LoggerError::io_operation("create log directory", dirname.display().to_string(), e)
        })?;

        let template = template.into();
        let date = Local::now().date_naive();
        let path = dated_path(&dirname, &template, date);
        let (writer, current_size) = open_append(&path)?;

        Ok(Self {
            dirname,
            template,
            policy,
            date,
            path,
            writer: Some(writer),
            current_size,
            next_index: 1,
            rolled: VecDeque::new(),
        })
    }

    /// Build from resolved sink options
    ///
    /// Uses `dirname`, `filename`, `maxsize`, `zippedArchive` and the
    /// pass-through `maxFiles` option.
    pub fn from_config(config: &SinkConfig) -> Result<Self> {
        let dirname = config
            .dirname
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));
        let template = config
            .filename
            .clone()
            .unwrap_or_else(|| DEFAULT_FILENAME.to_string());

        let max_files = match config.passthrough.get(MAX_FILES_KEY) {
            None => None,
            Some(value) => Some(parse_max_files(value)?),
        };

        let policy = RotationPolicy {
            max_size: config.maxsize,
            max_files,
            compress: config.zipped_archive.unwrap_or(false),
        };
        Self::new(dirname, template, policy)
    }

    fn write_line_on(&mut self, date: NaiveDate, line: &str) -> Result<()> {
        if date != self.date {
            self.switch_day(date)?;
        }

        let bytes = line.len() as u64 + 1;
        if let Some(max_size) = self.policy.max_size {
            if self.current_size > 0 && self.current_size + bytes > max_size {
                if let Err(e) = self.roll_over() {
                    self.reopen_after_failed_roll_over();
                    return Err(e);
                }
            }
        }

        let path = &self.path;
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(path.display().to_string(), "File is not open")
        })?;
        writeln!(writer, "{}", line).map_err(|e| {
            LoggerError::io_operation("write to", path.display().to_string(), e)
        })?;
        self.current_size += bytes;
        Ok(())
    }

    /// Close the current file and open the one for `date`
    ///
    /// The new day's file is opened even when closing or compressing the
    /// previous one fails; that failure is still returned.
    fn switch_day(&mut self, date: NaiveDate) -> Result<()> {
        let closed = self.close_writer();
        let compressed = if closed.is_ok() && self.policy.compress && self.current_size > 0 {
            self.compress_file(&self.path.clone()).map(|_| ())
        } else {
            Ok(())
        };

        self.date = date;
        self.path = dated_path(&self.dirname, &self.template, date);
        let (writer, current_size) = open_append(&self.path)?;
        self.writer = Some(writer);
        self.current_size = current_size;
        self.next_index = 1;
        closed.and(compressed)
    }

    /// Move the current file to the next free `.N` and start a fresh one
    fn roll_over(&mut self) -> Result<()> {
        self.close_writer()?;

        let backup = self.next_backup_path();
        fs::rename(&self.path, &backup).map_err(|e| {
            LoggerError::file_rotation(
                self.path.display().to_string(),
                format!("Failed to rotate current log file: {}", e),
            )
        })?;

        let kept = if self.policy.compress {
            self.compress_file(&backup)?
        } else {
            backup
        };
        if self.policy.max_files.is_some() {
            self.rolled.push_back(kept);
            self.prune();
        }

        let (writer, _) = open_append(&self.path).map_err(|e| {
            LoggerError::file_rotation(self.path.display().to_string(), e.to_string())
        })?;
        self.writer = Some(writer);
        self.current_size = 0;
        Ok(())
    }

    /// Keep writing to the current path after a roll-over failed
    ///
    /// The size count restarts, so the next roll-over is attempted only
    /// after another `max_size` bytes.
    fn reopen_after_failed_roll_over(&mut self) {
        if self.writer.is_none() {
            match open_append(&self.path) {
                Ok((writer, _)) => self.writer = Some(writer),
                Err(e) => {
                    eprintln!(
                        "[LOGGER ERROR] Cannot reopen {} after a failed roll-over: {}",
                        self.path.display(),
                        e
                    );
                    return;
                }
            }
        }
        self.current_size = 0;
    }

    fn close_writer(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }
        Ok(())
    }

    fn next_backup_path(&mut self) -> PathBuf {
        loop {
            let candidate = backup_path(&self.path, self.next_index);
            self.next_index += 1;
            if !candidate.exists() && !with_suffix(&candidate, ".gz").exists() {
                return candidate;
            }
        }
    }

    /// Delete the oldest rolled files beyond `max_files`
    fn prune(&mut self) {
        let Some(max_files) = self.policy.max_files else {
            return;
        };
        while self.rolled.len() > max_files {
            if let Some(oldest) = self.rolled.pop_front() {
                if let Err(e) = fs::remove_file(&oldest) {
                    eprintln!(
                        "[LOGGER WARNING] Failed to remove old log file {}: {}",
                        oldest.display(),
                        e
                    );
                }
            }
        }
    }

    /// Gzip `path` into `<path>.gz`, removing the original on success
    ///
    /// The archive is written to a temporary file first and renamed into
    /// place, so a failure leaves the original untouched. Returns the path
    /// of the file that was kept.
    #[cfg(feature = "file")]
    fn compress_file(&self, path: &Path) -> Result<PathBuf> {
        let gz_path = with_suffix(path, ".gz");
        let temp_path = with_suffix(path, ".gz.tmp");

        let gzip = || -> std::io::Result<()> {
            let mut input = std::io::BufReader::new(File::open(path)?);
            let output = BufWriter::new(File::create(&temp_path)?);
            let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
            std::io::copy(&mut input, &mut encoder)?;
            encoder.finish()?.flush()?;
            fs::rename(&temp_path, &gz_path)
        };
        if let Err(e) = gzip() {
            let _ = fs::remove_file(&temp_path);
            return Err(LoggerError::io_operation("compress", path.display().to_string(), e));
        }

        if let Err(e) = fs::remove_file(path) {
            eprintln!(
                "[LOGGER WARNING] Compressed {} but failed to remove the original: {}",
                path.display(),
                e
            );
        }
        Ok(gz_path)
    }

    #[cfg(not(feature = "file"))]
    fn compress_file(&self, path: &Path) -> Result<PathBuf> {
        eprintln!(
            "[LOGGER WARNING] Compression unavailable without the `file` feature, keeping {}",
            path.display()
        );
        Ok(path.to_path_buf())
    }

    /// Path of the file currently written
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

impl Appender for DailyRotateFileAppender {
    fn append(&mut self, _level: LogLevel, output: &Rendered) -> Result<()> {
        self.write_line_on(Local::now().date_naive(), &output.to_line())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "daily-rotate-file"
    }
}

impl Drop for DailyRotateFileAppender {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!(
                "[LOGGER ERROR] Failed to flush {} on drop: {}",
                self.path.display(),
                e
            );
        }
    }
}

fn dated_path(dirname: &Path, template: &str, date: NaiveDate) -> PathBuf {
    let stamp = date.format(DATE_PATTERN).to_string();
    dirname.join(template.replace(DATE_PLACEHOLDER, &stamp))
}

fn backup_path(path: &Path, index: usize) -> PathBuf {
    with_suffix(path, &format!(".{}", index))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

fn open_append(path: &Path) -> Result<(BufWriter<File>, u64)> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
        })?;
    let size = file
        .metadata()
        .map_err(|e| {
            LoggerError::file_appender(
                path.display().to_string(),
                format!("Cannot access file metadata: {}", e),
            )
        })?
        .len();
    Ok((BufWriter::new(file), size))
}

fn parse_max_files(value: &serde_json::Value) -> Result<usize> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        LoggerError::config(
            "daily-rotate-file",
            format!("{} must be a non-negative integer, got {}", MAX_FILES_KEY, value),
        )
    })
}
