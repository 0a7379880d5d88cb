//! Rolling Logger
//!
//! File logger for the todos client. Formatted `tracing` output goes to
//! `<log_dir>/<app_name>.log`, which is rotated once it grows past a size
//! limit, and the most recent lines are kept in a circular buffer so a host
//! can show them without touching the filesystem.
//!
//! `log` records are bridged into `tracing`, so library code can keep using
//! the `log` macros.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// Rotate the active file once it exceeds this many bytes
pub const DEFAULT_MAX_BYTES: u64 = 1024 * 1024;
/// Rotated files kept next to the active one (`app.1.log` .. `app.N.log`)
pub const DEFAULT_MAX_FILES: usize = 3;
/// Lines kept in memory
pub const DEFAULT_BUFFER_LINES: usize = 500;

static LOGGER: OnceLock<Arc<Shared>> = OnceLock::new();

/// Logger errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Log file error: {0}")]
    Io(#[from] io::Error),
    #[error("Logger already initialized")]
    AlreadyInitialized,
    #[error("Logger not initialized")]
    NotInitialized,
}

// ========================
// Circular line buffer
// ========================

/// Fixed-capacity buffer of the most recent log lines
#[derive(Debug)]
pub struct LineBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append every non-empty line of `chunk`, evicting the oldest lines
    pub fn push_chunk(&mut self, chunk: &str) {
        if self.capacity == 0 {
            return;
        }
        for line in chunk.lines().map(str::trim_end).filter(|l| !l.is_empty()) {
            if self.lines.len() == self.capacity {
                self.lines.pop_front();
            }
            self.lines.push_back(line.to_string());
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ========================
// Size-rotated file
// ========================

/// Log file that shifts itself to `<name>.1.log` when it gets too large
#[derive(Debug)]
pub struct RollingFile {
    dir: PathBuf,
    base_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingFile {
    pub fn open(
        dir: impl AsRef<Path>,
        base_name: &str,
        max_bytes: u64,
        max_files: usize,
    ) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{}.log", base_name));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir,
            base_name: base_name.to_string(),
            max_bytes,
            max_files,
            file,
            written,
        })
    }

    pub fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}.log", self.base_name, index))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.max_files == 0 {
            self.file = File::create(self.active_path())?;
            self.written = 0;
            return Ok(());
        }
        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(self.active_path(), self.rotated_path(1))?;
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.active_path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

// ========================
// Subscriber wiring
// ========================

#[derive(Debug)]
struct Shared {
    file: Mutex<RollingFile>,
    buffer: Mutex<LineBuffer>,
}

/// Writer handed to the fmt layer for each event
struct LogWriter {
    shared: Arc<Shared>,
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut buffer) = self.shared.buffer.lock() {
            buffer.push_chunk(&String::from_utf8_lossy(buf));
        }
        match self.shared.file.lock() {
            Ok(mut file) => file.write(buf),
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.shared.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// Install the global logger writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: impl AsRef<Path>, app_name: &str) -> Result<(), LoggerError> {
    let file = RollingFile::open(log_dir, app_name, DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)?;
    let shared = Arc::new(Shared {
        file: Mutex::new(file),
        buffer: Mutex::new(LineBuffer::new(DEFAULT_BUFFER_LINES)),
    });

    LOGGER
        .set(shared.clone())
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    let writer_shared = shared.clone();
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || LogWriter {
            shared: writer_shared.clone(),
        })
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    log::info!(
        "[{}] {} logger started",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        app_name
    );
    Ok(())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    LOGGER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

/// Log an informational message
pub fn info(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::info!("{}", message);
    Ok(())
}

/// Log an error message
pub fn error(message: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    tracing::error!("{}", message);
    Ok(())
}

/// Most recent lines, oldest first. Empty before `init_logger`.
pub fn recent_lines() -> Vec<String> {
    LOGGER
        .get()
        .and_then(|shared| shared.buffer.lock().ok().map(|b| b.snapshot()))
        .unwrap_or_default()
}
