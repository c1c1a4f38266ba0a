//! Log setup and the bridge from core diagnostics to the `log` facade.
use env_logger::Env;
use log::{debug, warn};
use relicsim_core::{Diagnostic, DiagnosticSink, Severity};

/// Initialise `env_logger`, defaulting to `info` unless `RUST_LOG` is set.
pub fn init() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}

/// Forwards analysis findings to the log at their severity.
#[derive(Debug, Default)]
pub struct LogSink {
    warnings: usize,
}

impl LogSink {
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Debug => debug!("{diagnostic}"),
            Severity::Warning => {
                self.warnings += 1;
                warn!("{diagnostic}");
            }
        }
    }
}
