//! Creation context and parameters handed to component factories.

use std::time::{Duration, Instant};

use tokio::sync::watch;

use crate::error::Error;

/// Cancellation and deadline carried through component creation.
///
/// Clones share the same cancellation signal. Factories pass the context
/// through untouched; implementations check [`Context::err`] before doing
/// work.
#[derive(Debug, Clone)]
pub struct Context {
    cancelled: watch::Receiver<bool>,
    deadline: Option<Instant>,
}

/// Handle that cancels every clone of a [`Context`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self {
            cancelled: rx,
            deadline: None,
        }
    }

    /// Create a cancellable context.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancelled: rx,
            deadline: None,
        };
        (ctx, CancelHandle { tx })
    }

    /// Derive a context that expires at `deadline`.
    ///
    /// An earlier existing deadline wins.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        };
        Self {
            cancelled: self.cancelled.clone(),
            deadline: Some(deadline),
        }
    }

    /// Derive a context that expires after `timeout`.
    ///
    /// A timeout too large to represent leaves the deadline unchanged.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.clone(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Why this context is done, or `None` while it is still live.
    pub fn err(&self) -> Option<Error> {
        if self.is_cancelled() {
            return Some(Error::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Build metadata of the host process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    /// Executable name.
    pub command: String,
    /// Host version.
    pub version: String,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            command: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Parameters passed to every exporter constructor.
#[derive(Debug, Clone)]
pub struct ExporterCreateParams {
    /// Span that the created component logs under.
    pub span: tracing::Span,
    pub build_info: BuildInfo,
}

impl ExporterCreateParams {
    /// Create parameters logging under a span named after `component`.
    pub fn new(component: &str) -> Self {
        Self {
            span: tracing::info_span!("exporter", exporter = %component),
            build_info: BuildInfo::default(),
        }
    }
}

impl Default for ExporterCreateParams {
    fn default() -> Self {
        Self {
            span: tracing::Span::none(),
            build_info: BuildInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());
    }

    #[test]
    fn test_cancel_reaches_clones() {
        let (ctx, handle) = Context::with_cancel();
        let clone = ctx.clone();

        handle.cancel();

        assert!(ctx.is_cancelled());
        assert!(matches!(clone.err(), Some(Error::Cancelled)));
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::background().with_deadline(Instant::now());
        assert!(matches!(ctx.err(), Some(Error::DeadlineExceeded)));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let soon = Instant::now() + Duration::from_secs(1);
        let ctx = Context::background()
            .with_deadline(soon)
            .with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(soon));
        assert!(ctx.err().is_none());
    }

    #[test]
    fn test_unrepresentable_timeout_means_no_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());

        let soon = Instant::now() + Duration::from_secs(1);
        let ctx = Context::background()
            .with_deadline(soon)
            .with_timeout(Duration::MAX);
        assert_eq!(ctx.deadline(), Some(soon));
    }

    #[test]
    fn test_derived_context_keeps_cancellation() {
        let (ctx, handle) = Context::with_cancel();
        let derived = ctx.with_timeout(Duration::from_secs(60));

        handle.cancel();

        assert!(matches!(derived.err(), Some(Error::Cancelled)));
    }
}
