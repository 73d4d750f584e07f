/// Which logical I/O area a region maps, mirroring the handful of
/// `SPA_IO_*` ids the original node/port `set_io` calls recognise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoType {
    /// Buffer handoff area: which buffer id is ready this cycle.
    Buffers,
    /// Transport clock: rate, position, current cycle duration.
    Clock,
    /// Graph-wide playback position, written once per cycle by the driver.
    Position,
    /// Per-link control values (e.g. volume) applied in-place.
    Control,
}

/// A mapped shared I/O area attached to a port or node.
///
/// In the real protocol this is a region of `memfd` shared memory mapped
/// by both sides; here, since the driver and every node run in the same
/// process, it's simply owned data behind the type the area describes.
/// The single-writer-at-a-time discipline from spec §5 still applies: only
/// the scheduler (for `Position`/`Clock`) or the owning port (for
/// `Buffers`/`Control`) writes to a given area in a cycle.
#[derive(Debug)]
pub struct IoArea<T> {
    pub ty: IoType,
    value: T,
}

impl<T> IoArea<T> {
    pub fn new(ty: IoType, value: T) -> Self {
        Self { ty, value }
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    #[inline]
    pub fn set(&mut self, value: T) {
        self.value = value;
    }
}

/// The status field spec.md §3 calls "the scheduler's primary edge
/// signal": whether the link's shared I/O area currently holds data the
/// consumer hasn't taken yet, needs fresh data from the producer, or just
/// had its format renegotiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStatus {
    Ok,
    NeedBuffer,
    HaveBuffer,
    FormatChanged,
}

/// The concrete `Buffers` I/O area: `status` plus the id of the buffer
/// it refers to, matching spec.md §3's "`status` ... `buffer_id` (u32)".
///
/// One `BufferIo` is owned per [`crate::Link`] rather than per
/// [`crate::Port`], which is what makes the "`out.io == in.io`" invariant
/// (spec.md §3/§8) hold structurally: both ports of a link read and write
/// through [`crate::Graph::port_io`]/[`crate::Graph::port_io_mut`], which
/// resolve to the same underlying [`Link::io`](crate::Link).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferIo {
    pub status: IoStatus,
    pub buffer_id: u32,
}

impl BufferIo {
    /// `buffer_id` is `u32::MAX` (no buffer assigned) until the producer
    /// publishes one; a freshly linked port always starts out needing one.
    pub const INVALID_BUFFER: u32 = u32::MAX;

    pub(crate) fn new() -> Self {
        Self {
            status: IoStatus::NeedBuffer,
            buffer_id: Self::INVALID_BUFFER,
        }
    }
}

impl Default for BufferIo {
    fn default() -> Self {
        Self::new()
    }
}
