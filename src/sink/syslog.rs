//! Local syslog sink.
//!
//! Frames follow the BSD format that local syslog daemons accept on their
//! Unix socket: `<PRI>Mmm dd hh:mm:ss TAG[PID]: MSG`. All messages use the
//! `kern` facility.

use std::io::Write;
use std::os::unix::net::{UnixDatagram, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::Local;

use super::{LogSink, Severity, SinkError};

/// Socket paths probed by [`SyslogSink::connect`], in order.
pub const SYSLOG_SOCKETS: &[&str] = &["/dev/log", "/var/run/syslog", "/var/run/log"];

/// `LOG_KERN`.
const FACILITY_KERN: u8 = 0;
const LOG_ALERT: u8 = 1;
const LOG_INFO: u8 = 6;

/// Syslog priority value for a severity.
#[must_use]
pub fn priority(severity: Severity) -> u8 {
    let level = match severity {
        Severity::Alert | Severity::Error => LOG_ALERT,
        Severity::Info => LOG_INFO,
    };
    (FACILITY_KERN << 3) | level
}

#[derive(Debug)]
enum Transport {
    Datagram(UnixDatagram),
    Stream(UnixStream),
}

impl Transport {
    /// Open `path`, trying datagram then stream mode.
    fn open(path: &Path) -> std::io::Result<Self> {
        match UnixDatagram::unbound().and_then(|sock| {
            sock.connect(path)?;
            Ok(sock)
        }) {
            Ok(sock) => Ok(Self::Datagram(sock)),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Datagram syslog connect failed, trying stream");
                UnixStream::connect(path).map(Self::Stream)
            }
        }
    }

    fn send(&mut self, frame: &str) -> std::io::Result<()> {
        match self {
            Self::Datagram(sock) => sock.send(frame.as_bytes()).map(|_| ()),
            Self::Stream(stream) => {
                stream.write_all(frame.as_bytes())?;
                stream.write_all(b"\n")
            }
        }
    }
}

#[derive(Debug)]
struct Connection {
    transport: Transport,
    path: PathBuf,
}

impl Connection {
    fn open(path: &Path) -> std::io::Result<Self> {
        let transport = Transport::open(path)?;
        tracing::debug!(path = %path.display(), "Connected to syslog");
        Ok(Self {
            transport,
            path: path.to_path_buf(),
        })
    }

    /// Reopen the current socket, falling back to [`SYSLOG_SOCKETS`].
    fn reconnect(&mut self) -> std::io::Result<()> {
        let current = self.path.clone();
        let mut last_err = None;
        let candidates = std::iter::once(current.as_path())
            .chain(SYSLOG_SOCKETS.iter().map(Path::new).filter(|p| *p != current));
        for path in candidates {
            match Self::open(path) {
                Ok(conn) => {
                    *self = conn;
                    return Ok(());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(last_err.unwrap_or_else(|| std::io::ErrorKind::NotFound.into()))
    }
}

/// Sink writing to the local syslog daemon.
///
/// A failed write reconnects (the daemon may have recreated its socket)
/// and retries the frame once.
#[derive(Debug)]
pub struct SyslogSink {
    conn: Mutex<Connection>,
    tag: String,
}

impl SyslogSink {
    /// Connect to the first reachable syslog socket.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::SyslogUnavailable` if none of
    /// [`SYSLOG_SOCKETS`] accepts a connection.
    pub fn connect(tag: impl Into<String>) -> Result<Self, SinkError> {
        let tag = tag.into();
        let mut last_err = None;
        for path in SYSLOG_SOCKETS {
            match Self::connect_to(path, tag.clone()) {
                Ok(sink) => return Ok(sink),
                Err(e) => last_err = Some(e),
            }
        }
        Err(SinkError::SyslogUnavailable {
            tried: SYSLOG_SOCKETS.join(", "),
            source: last_err.unwrap_or_else(|| std::io::ErrorKind::NotFound.into()),
        })
    }

    /// Connect to a specific socket, trying datagram then stream mode.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the stream attempt if both fail.
    pub fn connect_to(path: impl AsRef<Path>, tag: impl Into<String>) -> std::io::Result<Self> {
        Ok(Self {
            conn: Mutex::new(Connection::open(path.as_ref())?),
            tag: tag.into(),
        })
    }

    /// Socket this sink currently writes to.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.lock().path.clone()
    }

    /// Build the wire frame for one message.
    #[must_use]
    pub fn frame(&self, severity: Severity, message: &str) -> String {
        format!(
            "<{}>{} {}[{}]: {}",
            priority(severity),
            Local::now().format("%b %e %H:%M:%S"),
            self.tag,
            std::process::id(),
            message.trim_end_matches('\n')
        )
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn send(&self, frame: &str) -> std::io::Result<()> {
        let mut conn = self.lock();
        let Err(first) = conn.transport.send(frame) else {
            return Ok(());
        };
        tracing::debug!(path = %conn.path.display(), error = %first, "Syslog write failed, reconnecting");
        conn.reconnect()?;
        conn.transport.send(frame)
    }
}

impl LogSink for SyslogSink {
    fn log(&self, severity: Severity, message: &str) {
        let frame = self.frame(severity, message);
        if let Err(e) = self.send(&frame) {
            tracing::warn!(
                path = %self.path().display(),
                error = %e,
                "Failed to write to syslog, message dropped"
            );
        }
    }
}
