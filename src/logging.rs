// 詳細ログ（探索の段階やノード数の記録用）

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// グローバルな詳細ログフラグ
static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// ログの出力先
enum LogSink {
    Stderr,
    File(std::fs::File),
}

static LOG_SINK: Mutex<Option<LogSink>> = Mutex::new(None);

/// ログファイルを初期化する（既存内容は捨てる）
pub fn init_log_file(path: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(LogSink::File(file));
    }
    Ok(())
}

/// 標準エラーに出す
pub fn init_log_stderr() {
    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(LogSink::Stderr);
    }
}

/// ログを1行書き込む（出力先未設定なら捨てる）
pub fn write_log(message: &str) {
    let Ok(mut sink) = LOG_SINK.lock() else {
        return;
    };
    match sink.as_mut() {
        Some(LogSink::File(file)) => {
            let _ = writeln!(file, "{}", message);
            let _ = file.flush();
        }
        Some(LogSink::Stderr) => eprintln!("{}", message),
        None => {}
    }
}

pub fn enable_verbose_logging() {
    VERBOSE_LOGGING.store(true, Ordering::Relaxed);
}

pub fn disable_verbose_logging() {
    VERBOSE_LOGGING.store(false, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

/// 詳細ログ出力マクロ（無効時は format しない）
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            let message = format!($($arg)*);
            $crate::logging::write_log(&message);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_log_without_sink_is_noop() {
        write_log("出力先なし");
    }

    #[test]
    fn log_file_receives_message() {
        let path = std::env::temp_dir().join(format!("puyocore_log_{}.txt", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        init_log_file(&path_str).unwrap();
        write_log("hello");
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello"));
        let _ = std::fs::remove_file(&path);
    }
}
