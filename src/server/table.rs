use std::io::{Read, Write};
use std::os::unix::io::RawFd;
use std::time::Duration;

use crate::http::connection::{Connection, Interest};
use crate::server::poll::{PollSet, Readiness};

/// A worker's fixed-capacity connection slots and the poll set that watches
/// them.
///
/// The first `reserved` poll entries are sentinels (listener, shutdown
/// channel). After them, poll entry `reserved + slot` always belongs to
/// connection `slot`; inserts and removals touch both vectors together so the
/// correspondence never breaks.
pub struct ConnectionTable<S> {
    conns: Vec<Connection<S>>,
    poll: PollSet,
    reserved: usize,
    capacity: usize,
}

impl<S: Read + Write> ConnectionTable<S> {
    pub fn new(capacity: usize, sentinels: &[RawFd]) -> Self {
        let mut poll = PollSet::with_capacity(sentinels.len() + capacity);
        for &fd in sentinels {
            poll.push(fd, Interest::READ);
        }

        Self {
            conns: Vec::with_capacity(capacity),
            poll,
            reserved: sentinels.len(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.conns.len() >= self.capacity
    }

    /// Registers `conn` with read interest. A full table hands the
    /// connection back untouched.
    pub fn insert(&mut self, conn: Connection<S>, fd: RawFd) -> Result<usize, Connection<S>> {
        if self.is_full() {
            return Err(conn);
        }

        self.poll.push(fd, Interest::READ);
        self.conns.push(conn);
        debug_assert_eq!(self.poll.len(), self.reserved + self.conns.len());
        Ok(self.conns.len() - 1)
    }

    /// Removes slot `slot`; the last connection moves into it.
    pub fn remove(&mut self, slot: usize) -> Connection<S> {
        self.poll.swap_remove(self.reserved + slot);
        let conn = self.conns.swap_remove(slot);
        debug_assert_eq!(self.poll.len(), self.reserved + self.conns.len());
        conn
    }

    pub fn get(&self, slot: usize) -> Option<&Connection<S>> {
        self.conns.get(slot)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Connection<S>> {
        self.conns.get_mut(slot)
    }

    pub fn fd(&self, slot: usize) -> RawFd {
        self.poll.fd(self.reserved + slot)
    }

    pub fn readiness(&self, slot: usize) -> Readiness {
        self.poll.readiness(self.reserved + slot)
    }

    pub fn sentinel_readiness(&self, idx: usize) -> Readiness {
        self.poll.readiness(idx)
    }

    pub fn set_interest(&mut self, slot: usize, interest: Interest) {
        self.poll.set_interest(self.reserved + slot, interest);
    }

    pub fn wait(&mut self, timeout: Option<Duration>) -> std::io::Result<usize> {
        self.poll.wait(timeout)
    }
}
