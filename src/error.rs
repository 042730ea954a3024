//! Error taxonomy untuk operasi channel.

use std::io;

use thiserror::Error;

/// Hasil gagal dari Open / Read / Write.
///
/// End-of-stream bukan error: `read` mengembalikan `Ok(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FifoError {
    /// Thread diinterupsi saat parked. Waiter count sudah di-rollback.
    #[error("interrupted while waiting")]
    Cancelled,
    /// Tidak ada consumer yang terbuka. Byte yang ditulis tetap tersimpan
    /// di buffer.
    #[error("broken pipe: no consumer session is open")]
    BrokenPipe,
    /// Satu write melebihi kapasitas total channel. Buffer tidak disentuh.
    #[error("write of {len} bytes exceeds channel capacity of {capacity} bytes")]
    TooLarge { len: usize, capacity: usize },
}

impl FifoError {
    /// Result code (errno positif) seperti yang dilaporkan device aslinya.
    #[cfg(unix)]
    pub const fn errno(&self) -> libc::c_int {
        match self {
            Self::Cancelled => libc::EINTR,
            Self::BrokenPipe => libc::EPIPE,
            Self::TooLarge { .. } => libc::ENOMEM,
        }
    }
}

// Cancelled sengaja bukan `Interrupted`: helper std (`read_to_end`,
// `write_all`, `io::copy`) me-retry `Interrupted` dan cancel jadi hilang.
// Caller bisa downcast `get_ref()` ke `FifoError`.
impl From<FifoError> for io::Error {
    fn from(err: FifoError) -> Self {
        let kind = match err {
            FifoError::Cancelled => io::ErrorKind::Other,
            FifoError::BrokenPipe => io::ErrorKind::BrokenPipe,
            FifoError::TooLarge { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}

/// Helper untuk host yang bekerja dengan result code gaya file-operations.
#[cfg(unix)]
pub mod host {
    use super::FifoError;

    /// Lipat hasil read/write menjadi `ssize_t`: jumlah byte, atau errno negatif.
    pub fn ssize(result: Result<usize, FifoError>) -> libc::ssize_t {
        match result {
            Ok(n) => n as libc::ssize_t,
            Err(err) => -(err.errno() as libc::ssize_t),
        }
    }

    /// Lipat hasil open menjadi `0` atau errno negatif.
    pub fn status<T>(result: Result<T, FifoError>) -> libc::c_int {
        match result {
            Ok(_) => 0,
            Err(err) => -err.errno(),
        }
    }
}
