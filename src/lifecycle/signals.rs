//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or SIGTERM
//! - Report which one arrived
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGTERM only exists on unix; elsewhere only Ctrl+C is observed

use std::fmt;

/// Signal that requested termination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Interrupt,
    Terminate,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Interrupt => f.write_str("SIGINT"),
            TerminationSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Resolve when the process is asked to stop.
pub async fn wait_for_termination() -> std::io::Result<TerminationSignal> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result.map(|_| TerminationSignal::Interrupt),
            _ = terminate.recv() => Ok(TerminationSignal::Terminate),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(TerminationSignal::Interrupt)
    }
}
