//! Logging setup.
//!
//! Controllers log through `tracing` macros only. Installing a subscriber is
//! the embedder's choice: the browser entry point calls [`init_logging`],
//! tests call [`init_test_logging`]. In the browser, output goes to the
//! devtools console and timestamps are left out (there is no system clock
//! on `wasm32-unknown-unknown`).

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON lines
    Json,
    /// Multi-line, human oriented
    #[default]
    Pretty,
    /// One line per event
    Compact,
}

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are no-ops, as is a call made
/// after another subscriber was installed. The level comes
/// from `RUST_LOG` where an environment exists and defaults to `info`.
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(env_filter);

        #[cfg(not(all(feature = "wasm", target_arch = "wasm32")))]
        let layer = fmt::layer();
        #[cfg(all(feature = "wasm", target_arch = "wasm32"))]
        let layer = fmt::layer()
            .with_writer(console::MakeConsoleWriter)
            .with_ansi(false)
            .without_time();

        // A subscriber installed by the embedder wins
        let _ = match format {
            LogFormat::Json => registry.with(layer.json()).try_init(),
            LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
            LogFormat::Compact => registry.with(layer.compact()).try_init(),
        };
    });
}

/// Test subscriber: captured by the test harness, `vitrine=debug` by default
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vitrine=debug"));
    let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
}

/// Span wrapping the setup of one page component
#[must_use]
pub fn component_span(component: &'static str) -> Span {
    tracing::info_span!("mount", component)
}

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
mod console {
    use std::io;
    use tracing_subscriber::fmt::MakeWriter;

    /// Buffers one formatted event and hands it to `console.log`
    #[derive(Debug)]
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.buf.is_empty() {
                return Ok(());
            }
            let line = String::from_utf8_lossy(&self.buf);
            web_sys::console::log_1(&line.trim_end().into());
            self.buf.clear();
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let _ = io::Write::flush(self);
        }
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MakeConsoleWriter;

    impl<'a> MakeWriter<'a> for MakeConsoleWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { buf: Vec::new() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(LogFormat::Compact);
        init_logging(LogFormat::Json);
    }

    #[test]
    fn test_init_test_logging_twice() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("test logging ready");
    }

    #[test]
    fn test_component_span() {
        let span = component_span("carousel");
        let _guard = span.enter();
        tracing::info!("inside component span");
    }

    #[test]
    fn test_default_format() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }
}
