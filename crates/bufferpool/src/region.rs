use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::ptr::NonNull;

/// A `memfd`-backed shared-memory region, mapped read/write in this
/// process and ready to be handed to a peer via `SCM_RIGHTS` (the actual
/// ancillary-data transfer is the transport's job, out of scope here — see
/// `crates/protocol/src/connection.rs`'s `recv_with_fds` in the teacher
/// workspace for that half).
///
/// Grounded on `crates/client/src/memory.rs`'s `Memory::insert`, generalized
/// from "map a region received over the wire" to "allocate a region to
/// hand out".
#[derive(Debug)]
pub struct MemRegion {
    fd: OwnedFd,
    ptr: NonNull<u8>,
    len: usize,
}

// SAFETY: the mapping is exclusively owned by this `MemRegion` and the
// pointer is never invalidated except by `Drop`.
unsafe impl Send for MemRegion {}
unsafe impl Sync for MemRegion {}

impl MemRegion {
    /// Allocate a new anonymous, sealable memfd region of `len` bytes and
    /// map it `PROT_READ | PROT_WRITE`, `MAP_SHARED`.
    pub fn allocate(name: &str, len: usize) -> io::Result<Self> {
        let cname = std::ffi::CString::new(name).unwrap_or_default();

        // SAFETY: `cname` is a valid NUL-terminated C string for the
        // duration of the call.
        let fd = unsafe { libc::memfd_create(cname.as_ptr(), libc::MFD_CLOEXEC) };

        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: `fd` was just created above and is owned by this call.
        let fd = unsafe { OwnedFd::from_raw_fd(fd) };

        // SAFETY: `fd` is a valid, open file descriptor.
        if unsafe { libc::ftruncate(fd.as_raw_fd(), len as libc::off_t) } < 0 {
            return Err(io::Error::last_os_error());
        }

        Self::map(fd, len)
    }

    /// Map an already-open fd (e.g. one received over a transport) of
    /// `len` bytes.
    pub fn map(fd: OwnedFd, len: usize) -> io::Result<Self> {
        // SAFETY: `fd` is valid and `len` matches the caller-provided size;
        // the mapping is dropped via `munmap` in `Drop`.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                len,
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_SHARED,
                fd.as_raw_fd(),
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(io::Error::last_os_error());
        }

        let ptr = NonNull::new(ptr as *mut u8).expect("mmap returned a null non-failure pointer");

        Ok(Self { fd, ptr, len })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }

    /// Borrow the region's backing memory.
    ///
    /// # Safety
    ///
    /// The caller must ensure exclusive access for the duration of the
    /// borrow per the single-writer-at-a-time discipline described for
    /// I/O areas and buffer payloads (spec §5).
    #[inline]
    pub unsafe fn as_slice(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Mutable counterpart of [`MemRegion::as_slice`].
    ///
    /// # Safety
    ///
    /// See [`MemRegion::as_slice`].
    #[inline]
    pub unsafe fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for MemRegion {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` describe exactly the mapping created in
        // `allocate`/`map`, unmapped exactly once here.
        unsafe {
            libc::munmap(self.ptr.as_ptr() as *mut libc::c_void, self.len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_and_round_trips_bytes() {
        let mut region = MemRegion::allocate("test-region", 4096).expect("allocate");
        assert_eq!(region.len(), 4096);

        unsafe {
            region.as_mut_slice()[..5].copy_from_slice(b"hello");
            assert_eq!(&region.as_slice()[..5], b"hello");
        }
    }
}
