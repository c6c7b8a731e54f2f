//! LogPrinter клиента: stdout + logs/game.log

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use catrun_simulation::{LogLevel, LogPrinter};

pub const LOG_FILE: &str = "logs/game.log";

pub struct FileLogger {
    file: Option<Mutex<File>>,
}

impl FileLogger {
    /// Файл не открылся: пишем только в stdout
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            let _ = fs::create_dir_all(dir);
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| eprintln!("Cannot open {}: {}", path.display(), err))
            .ok()
            .map(Mutex::new);

        Self { file }
    }
}

impl LogPrinter for FileLogger {
    fn log(&self, level: LogLevel, message: &str) {
        let line = format!("[{}] {}", level.as_str(), message);
        println!("{}", line);

        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                let _ = writeln!(file, "{}", line);
            }
        }
    }
}

/// Session header в лог файле
pub fn log_session_start() {
    catrun_simulation::log_info(&format!(
        "=== CATRUN session {} ===",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
}
