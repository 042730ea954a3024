//! Role sebuah session: Producer (write-only) atau Consumer (read-only).

/// Role tetap selama umur session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Write end
    Producer,
    /// Read end
    Consumer,
}

impl Role {
    /// Role lawan (yang ditunggu saat rendezvous)
    #[inline]
    pub const fn peer(self) -> Self {
        match self {
            Self::Producer => Self::Consumer,
            Self::Consumer => Self::Producer,
        }
    }

    /// Map access flags `open(2)` ke role.
    ///
    /// Hanya `O_WRONLY` yang menjadi producer; semua mode yang bisa membaca
    /// (termasuk `O_RDWR`) menjadi consumer.
    #[cfg(unix)]
    pub fn from_open_flags(flags: libc::c_int) -> Self {
        if flags & libc::O_ACCMODE == libc::O_WRONLY {
            Self::Producer
        } else {
            Self::Consumer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer() {
        assert_eq!(Role::Producer.peer(), Role::Consumer);
        assert_eq!(Role::Consumer.peer(), Role::Producer);
    }

    #[cfg(unix)]
    #[test]
    fn test_from_open_flags() {
        assert_eq!(Role::from_open_flags(libc::O_WRONLY), Role::Producer);
        assert_eq!(
            Role::from_open_flags(libc::O_WRONLY | libc::O_NONBLOCK),
            Role::Producer
        );
        assert_eq!(Role::from_open_flags(libc::O_RDONLY), Role::Consumer);
        assert_eq!(Role::from_open_flags(libc::O_RDWR), Role::Consumer);
    }
}
