use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

lazy_static::lazy_static! {
    static ref LOGGER: Mutex<Option<File>> = Mutex::new(None);
}

/// Open the debug log for appending. Later calls keep the first file.
pub fn init(path: &Path) {
    let Ok(mut logger) = LOGGER.lock() else {
        return;
    };
    if logger.is_none()
        && let Ok(file) = OpenOptions::new().create(true).append(true).open(path)
    {
        *logger = Some(file);
    }
}

pub fn log(message: &str) {
    write_line("INFO", message);
}

pub fn warn(message: &str) {
    write_line("WARN", message);
}

fn write_line(level: &str, message: &str) {
    let Ok(mut guard) = LOGGER.lock() else {
        return;
    };
    write_entry(&mut *guard, level, message);
}

/// Append one entry to `sink`; nothing happens while it is unset.
fn write_entry<W: Write>(sink: &mut Option<W>, level: &str, message: &str) {
    if let Some(out) = sink.as_mut() {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let _ = writeln!(out, "[{}] {} {}", timestamp, level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_need_an_open_sink() {
        let mut sink: Option<Vec<u8>> = None;
        write_entry(&mut sink, "INFO", "nobody is listening");
        assert!(sink.is_none());

        let mut sink = Some(Vec::new());
        write_entry(&mut sink, "WARN", "somebody is");
        let written = String::from_utf8(sink.unwrap()).unwrap();
        assert!(written.starts_with('['));
        assert!(written.ends_with("] WARN somebody is\n"));
        assert_eq!(written.lines().count(), 1);
    }

    #[test]
    fn test_logger_writes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trivia.log");
        init(&path);
        log("Test log message");
        warn("Test warning");

        // Another test may have claimed the global logger first.
        if let Ok(contents) = std::fs::read_to_string(&path) {
            assert!(contents.contains("INFO Test log message"));
            assert!(contents.contains("WARN Test warning"));
        }
    }
}
