//! Session handle: role tetap sejak open, close otomatis saat drop.

use std::fmt;
use std::io;
use std::sync::Arc;

use super::controller::ChannelController;
use super::CancelToken;
use crate::error::FifoError;
use crate::role::Role;

/// Write end.
///
/// Boleh di-share antar thread (`&Producer`), semua write berbagi token
/// yang sama.
pub struct Producer {
    controller: Arc<ChannelController>,
    token: CancelToken,
}

/// Read end. Lihat [`Producer`] untuk semantik sharing.
pub struct Consumer {
    controller: Arc<ChannelController>,
    token: CancelToken,
}

impl Producer {
    pub(super) fn new(controller: Arc<ChannelController>, token: CancelToken) -> Self {
        Self { controller, token }
    }

    /// Tulis `bytes` secara utuh.
    ///
    /// Blok selama ruang kurang dan masih ada consumer.
    ///
    /// # Errors
    /// - [`FifoError::TooLarge`] kalau `bytes.len() > CAPACITY`, buffer tidak disentuh
    /// - [`FifoError::BrokenPipe`] kalau tidak ada consumer; byte tetap tersimpan
    /// - [`FifoError::Cancelled`] kalau token di-cancel saat parked
    pub fn write(&self, bytes: &[u8]) -> Result<usize, FifoError> {
        self.token.park_on(&self.controller);
        self.controller.write(bytes, self.token.interrupt())
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Tutup session sekarang (sama dengan drop).
    pub fn close(self) {}
}

impl Consumer {
    pub(super) fn new(controller: Arc<ChannelController>, token: CancelToken) -> Self {
        Self { controller, token }
    }

    /// Baca sampai `buf.len()` byte, oldest-first.
    ///
    /// Blok selama buffer kosong dan masih ada producer. `Ok(0)` berarti
    /// end-of-stream: buffer kosong dan tidak ada producer lagi.
    ///
    /// # Errors
    /// [`FifoError::Cancelled`] kalau token di-cancel saat parked.
    pub fn read(&self, buf: &mut [u8]) -> Result<usize, FifoError> {
        self.token.park_on(&self.controller);
        self.controller.read(buf, self.token.interrupt())
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn close(self) {}
}

impl Drop for Producer {
    fn drop(&mut self) {
        self.controller.close(Role::Producer);
    }
}

impl Drop for Consumer {
    fn drop(&mut self) {
        self.controller.close(Role::Consumer);
    }
}

impl fmt::Debug for Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Producer").field("token", &self.token).finish()
    }
}

impl fmt::Debug for Consumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consumer").field("token", &self.token).finish()
    }
}

// TooLarge tidak dipotong jadi partial write: satu `write` = satu record utuh.
impl io::Write for &Producer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Producer::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Write for Producer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::Write::write(&mut &*self, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for &Consumer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Consumer::read(*self, buf).map_err(io::Error::from)
    }
}

impl io::Read for Consumer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut &*self, buf)
    }
}

/// Session dengan role yang baru diketahui saat runtime.
#[derive(Debug)]
pub enum Session {
    Producer(Producer),
    Consumer(Consumer),
}

impl Session {
    pub fn role(&self) -> Role {
        match self {
            Self::Producer(_) => Role::Producer,
            Self::Consumer(_) => Role::Consumer,
        }
    }

    pub fn cancel_token(&self) -> CancelToken {
        match self {
            Self::Producer(producer) => producer.cancel_token(),
            Self::Consumer(consumer) => consumer.cancel_token(),
        }
    }

    pub fn into_producer(self) -> Option<Producer> {
        match self {
            Self::Producer(producer) => Some(producer),
            Self::Consumer(_) => None,
        }
    }

    pub fn into_consumer(self) -> Option<Consumer> {
        match self {
            Self::Consumer(consumer) => Some(consumer),
            Self::Producer(_) => None,
        }
    }
}
