//! Console logging macros. Every line carries a coloured level tag and a UTC wall-clock stamp.

/// Environment variable enabling the per-call [`event!`] output.
pub const EVENT_LOG_VAR: &str = "LOG_IAS_EVENTS";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        println!("\x1b[32m[INFO] [{}]\x1b[0m [IAS] {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log {
    ($($arg:tt)*) => {
        println!("\x1b[33m[LOG]  [{}]\x1b[0m [IAS] {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        println!("\x1b[35m[WARN] [{}]\x1b[0m [IAS] {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        println!("\x1b[31m[ERROR][{}]\x1b[0m [IAS] {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
    };
}

/// High-frequency output (one line per intercepted call), silent unless [`EVENT_LOG_VAR`] is set.
#[macro_export]
macro_rules! event {
    ($($arg:tt)*) => {
        if std::env::var($crate::logger::EVENT_LOG_VAR).is_ok() {
            println!("\x1b[36m[EVENT][{}]\x1b[0m [IAS] {}", chrono::Utc::now().format("%H:%M:%S"), format!($($arg)*))
        }
    };
}
