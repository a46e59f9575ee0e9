//! Unix-socket handoff of menu selections to the running daemon.
//!
//! Framing: the client writes the raw UTF-8 text and shuts down its write
//! half; the daemon answers with a single [`ACK`] byte once the clipboard is
//! set. No ACK means the client should set the clipboard itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Byte the daemon writes after taking ownership of the text.
pub const ACK: u8 = 0x06;
/// Largest payload accepted over the socket.
pub const MAX_HANDOFF_BYTES: u64 = 16 * 1024 * 1024;
/// Bound on how long a single client may stall the daemon loop.
pub const HANDOFF_IO_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("another daemon is already listening on {}", .0.display())]
    AlreadyRunning(PathBuf),
    #[error("handoff i/o on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("handoff payload is not valid utf-8")]
    NotUtf8,
    #[error("handoff payload exceeds {MAX_HANDOFF_BYTES} bytes")]
    TooLarge,
    #[error("handoff timed out")]
    Timeout,
    #[error("clipboard handoff is not supported on this platform")]
    Unsupported,
}

impl HandoffError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(unix)]
pub use unix::{HandoffListener, Incoming, send};

#[cfg(not(unix))]
pub use fallback::{HandoffListener, Incoming, send};

#[cfg(unix)]
mod unix {
    use std::io::{Read, Write};
    use std::net::Shutdown;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{UnixListener, UnixStream};
    use tracing::{debug, info};

    use super::{ACK, HANDOFF_IO_TIMEOUT, HandoffError, MAX_HANDOFF_BYTES};

    /// Hands `text` to the daemon listening on `path` and waits for its ACK.
    pub fn send(path: &Path, text: &str) -> Result<(), HandoffError> {
        let io = |e| HandoffError::io(path, e);
        let mut stream = std::os::unix::net::UnixStream::connect(path).map_err(io)?;
        stream.set_write_timeout(Some(HANDOFF_IO_TIMEOUT)).map_err(io)?;
        stream.set_read_timeout(Some(HANDOFF_IO_TIMEOUT)).map_err(io)?;
        stream.write_all(text.as_bytes()).map_err(io)?;
        stream.shutdown(Shutdown::Write).map_err(io)?;
        let mut ack = [0u8; 1];
        stream.read_exact(&mut ack).map_err(io)?;
        if ack[0] == ACK {
            Ok(())
        } else {
            Err(io(std::io::Error::other("unexpected acknowledgement")))
        }
    }

    /// Daemon side of the socket; removes the socket file on drop.
    pub struct HandoffListener {
        listener: UnixListener,
        path: PathBuf,
    }

    impl HandoffListener {
        /// Binds `path`, replacing a stale socket file.
        ///
        /// Must be called from within a tokio runtime.
        pub fn bind(path: &Path) -> Result<Self, HandoffError> {
            if path.exists() {
                if std::os::unix::net::UnixStream::connect(path).is_ok() {
                    return Err(HandoffError::AlreadyRunning(path.to_path_buf()));
                }
                debug!(path = %path.display(), "removing stale handoff socket");
                std::fs::remove_file(path).map_err(|e| HandoffError::io(path, e))?;
            }
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).map_err(|e| HandoffError::io(dir, e))?;
            }
            let listener = UnixListener::bind(path).map_err(|e| HandoffError::io(path, e))?;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
                .map_err(|e| HandoffError::io(path, e))?;
            info!(path = %path.display(), "listening for clipboard handoffs");
            Ok(Self {
                listener,
                path: path.to_path_buf(),
            })
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        /// Waits for the next client. Cancel-safe.
        pub async fn accept(&self) -> Result<Incoming, HandoffError> {
            let (stream, _) = self
                .listener
                .accept()
                .await
                .map_err(|e| HandoffError::io(&self.path, e))?;
            Ok(Incoming {
                stream,
                path: self.path.clone(),
            })
        }
    }

    impl Drop for HandoffListener {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.path);
        }
    }

    /// An accepted client connection.
    pub struct Incoming {
        stream: UnixStream,
        path: PathBuf,
    }

    impl Incoming {
        /// Reads the whole payload, bounded in size and time.
        pub async fn read_text(&mut self) -> Result<String, HandoffError> {
            let mut buf = Vec::new();
            let mut limited = (&mut self.stream).take(MAX_HANDOFF_BYTES + 1);
            tokio::time::timeout(HANDOFF_IO_TIMEOUT, limited.read_to_end(&mut buf))
                .await
                .map_err(|_| HandoffError::Timeout)?
                .map_err(|e| HandoffError::io(&self.path, e))?;
            if buf.len() as u64 > MAX_HANDOFF_BYTES {
                return Err(HandoffError::TooLarge);
            }
            String::from_utf8(buf).map_err(|_| HandoffError::NotUtf8)
        }

        /// Confirms to the client that the clipboard now holds its text.
        pub async fn ack(mut self) {
            let write = self.stream.write_all(&[ACK]);
            if let Ok(Err(err)) = tokio::time::timeout(HANDOFF_IO_TIMEOUT, write).await {
                debug!(%err, "handoff client went away before ack");
            }
        }
    }
}

#[cfg(not(unix))]
mod fallback {
    use std::path::Path;

    use super::HandoffError;

    pub fn send(_path: &Path, _text: &str) -> Result<(), HandoffError> {
        Err(HandoffError::Unsupported)
    }

    pub struct HandoffListener;

    impl HandoffListener {
        pub fn bind(_path: &Path) -> Result<Self, HandoffError> {
            Err(HandoffError::Unsupported)
        }

        pub async fn accept(&self) -> Result<Incoming, HandoffError> {
            std::future::pending().await
        }
    }

    pub struct Incoming;

    impl Incoming {
        pub async fn read_text(&mut self) -> Result<String, HandoffError> {
            Err(HandoffError::Unsupported)
        }

        pub async fn ack(self) {}
    }
}
