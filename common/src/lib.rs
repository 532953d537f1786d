pub mod config;
pub mod error;
pub mod host;
pub mod seed;

#[doc(hidden)]
pub use tracing;

/// Logs at INFO level with the `[+]` symbol in terminal output.
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!($($arg)*)
    };
}

/// Logs at INFO level under the success target, rendered as a green check.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: "ambit::success", $($arg)*)
    };
}

/// Logs at WARN level with the `[*]` symbol in terminal output.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!($($arg)*)
    };
}

/// Logs at ERROR level with the `[-]` symbol in terminal output.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::tracing::error!($($arg)*)
    };
}
