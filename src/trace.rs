//! Logging fifochan lewat `tracing`, aktif dengan `--features tracing`.
//!
//! Event yang dipancarkan:
//! - `debug`: open / close session, generation reset, cancel, broken pipe
//! - `trace`: park dan wake di ConditionGate
//! - `warn`: enqueue yang terpotong karena consumer habis
//!
//! Tanpa feature, `debug!` / `trace!` / `warn!` di-expand jadi kosong.

/// Filter default kalau `RUST_LOG` tidak di-set
#[cfg(feature = "tracing")]
const DEFAULT_FILTER: &str = "fifochan=debug";

/// Pasang subscriber `fmt` ke stderr. Aman dipanggil berkali-kali.
///
/// Nama thread ikut dicetak: hampir semua event fifochan terjadi di
/// thread yang parked atau membangunkan thread lain.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .with_target(false)
        .with_timer(fmt::time::uptime());

    // Sudah ada subscriber global (test lain) bukan error
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

#[cfg(not(feature = "tracing"))]
pub fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! discard {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use discard as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use discard as trace;
#[cfg(not(feature = "tracing"))]
pub(crate) use discard as warn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();

        debug!(role = "consumer", "event after init");
        warn!(len = 3usize, "warn after init");
    }
}
