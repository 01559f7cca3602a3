//! MTG rules core
//!
//! A deterministic rules engine for a Magic: The Gathering style card game.
//! Game state is an immutable snapshot with structural sharing; player
//! actions go through a single pipeline that applies the action, announces
//! what changed as events, and runs state-based actions to a fixpoint.

/// Log a formatted narrative message at Normal verbosity
///
/// With the `verbose-logging` feature disabled this expands to nothing, so
/// the `format!` cost disappears from hot paths.
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.normal(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

pub mod core;
pub mod error;
pub mod game;
pub mod loader;
pub mod zones;

pub use error::{MtgError, RejectReason, Result};
