//! Opaque client/transport handles.
//!
//! spec.md §1 frames the core as "an in-process engine that accepts opaque
//! *client* and *transport* handles" — the real wire protocol and IPC
//! framing stay out of scope. [`Transport`] is the seam: anything that can
//! move a byte payload and an optional file descriptor out of the engine
//! implements it. The demo binary's HTTP control surface and a hypothetical
//! future wire protocol would both plug in here without the engine crate
//! knowing which.

use std::os::fd::RawFd;

/// A destination for engine-originated out-of-band data (buffer pool fds,
/// serialized property variants, ...). The engine never reads or
/// interprets a wire format itself; it only hands payloads to whatever
/// `Transport` the caller configured.
pub trait Transport {
    /// Send an opaque payload, optionally accompanied by a file
    /// descriptor (e.g. a `MemFd` buffer pool plane).
    fn send(&mut self, payload: &[u8], fd: Option<RawFd>) -> anyhow::Result<()>;
}

/// A `Transport` that discards everything sent to it.
///
/// Useful for engine instances that never need to forward data outside the
/// process (standalone demo binaries, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn send(&mut self, payload: &[u8], fd: Option<RawFd>) -> anyhow::Result<()> {
        tracing::trace!(len = payload.len(), ?fd, "null transport: dropping payload");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_transport_always_succeeds() {
        let mut transport = NullTransport;
        assert!(transport.send(b"hello", None).is_ok());
    }
}
