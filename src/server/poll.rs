use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

use libc::{POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT, c_int, nfds_t, pollfd};

use crate::http::connection::Interest;

/// Events reported for one descriptor by the last [`PollSet::wait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness(i16);

impl Readiness {
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Data to read, or a hang-up/error the next read will surface.
    pub fn readable(&self) -> bool {
        self.0 & (POLLIN | POLLHUP | POLLERR) != 0
    }

    pub fn writable(&self) -> bool {
        self.0 & POLLOUT != 0
    }

    /// The descriptor is not open.
    pub fn invalid(&self) -> bool {
        self.0 & POLLNVAL != 0
    }
}

fn events_for(interest: Interest) -> i16 {
    let mut events = 0;
    if interest.read {
        events |= POLLIN;
    }
    if interest.write {
        events |= POLLOUT;
    }
    events
}

/// Level-triggered readiness set backed by `poll(2)`.
///
/// Entries are addressed by position; removal swaps the last entry into the
/// freed position.
#[derive(Debug)]
pub struct PollSet {
    fds: Vec<pollfd>,
}

impl PollSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fds: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.fds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fds.is_empty()
    }

    /// Appends `fd` and returns its position.
    pub fn push(&mut self, fd: RawFd, interest: Interest) -> usize {
        self.fds.push(pollfd {
            fd,
            events: events_for(interest),
            revents: 0,
        });
        self.fds.len() - 1
    }

    pub fn swap_remove(&mut self, idx: usize) -> RawFd {
        self.fds.swap_remove(idx).fd
    }

    pub fn fd(&self, idx: usize) -> RawFd {
        self.fds[idx].fd
    }

    pub fn set_interest(&mut self, idx: usize, interest: Interest) {
        self.fds[idx].events = events_for(interest);
    }

    pub fn readiness(&self, idx: usize) -> Readiness {
        Readiness(self.fds[idx].revents)
    }

    /// Blocks until at least one entry is ready. `None` waits indefinitely.
    ///
    /// A signal arriving mid-wait surfaces as `ErrorKind::Interrupted`.
    pub fn wait(&mut self, timeout: Option<Duration>) -> io::Result<usize> {
        let timeout_ms: c_int = match timeout {
            Some(t) => t.as_millis().min(c_int::MAX as u128) as c_int,
            None => -1,
        };

        let res = unsafe { libc::poll(self.fds.as_mut_ptr(), self.fds.len() as nfds_t, timeout_ms) };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(res as usize)
    }
}
