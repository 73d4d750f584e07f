use anyhow::{Context, Result, bail};

use crate::region::MemRegion;

/// What kind of memory a [`Data`] plane points into, mirroring
/// `spa_data_type` (`spa/include/spa/buffer.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Plain heap pointer, private to this process.
    MemPtr,
    /// `memfd`-backed shared memory, transferable by fd.
    MemFd,
    /// A DMA-BUF fd handed in from a device backend (out of scope to
    /// produce here, but buffers may still carry one through).
    DmaBuf,
    /// An opaque id referring to memory tracked elsewhere (the server's
    /// memory table in the original protocol).
    MemId,
}

/// What a [`Meta`] block describes, mirroring `spa_meta_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    Header,
    VideoCrop,
    Bitmap,
    Cursor,
}

/// Per-buffer metadata block (e.g. a header with a sequence number and
/// presentation timestamp).
#[derive(Debug)]
pub struct Meta {
    pub ty: MetaType,
    pub data: Vec<u8>,
}

/// The filled/available extent of a [`Data`] plane, updated by whichever
/// side wrote it this cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chunk {
    pub offset: u32,
    pub size: u32,
    pub stride: i32,
}

/// One data plane of a buffer.
#[derive(Debug)]
pub struct Data {
    pub ty: DataType,
    pub max_size: u32,
    pub chunk: Chunk,
    region: Option<MemRegion>,
    heap: Option<Vec<u8>>,
}

impl Data {
    /// Borrow the plane's bytes, whichever backing it uses.
    pub fn as_slice(&self) -> &[u8] {
        if let Some(region) = &self.region {
            // SAFETY: the pool enforces single-owner access per buffer
            // state (`BufferState`); a plane is only reachable through a
            // buffer that is not concurrently borrowed elsewhere.
            unsafe { region.as_slice() }
        } else {
            self.heap.as_deref().unwrap_or_default()
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        if let Some(region) = &mut self.region {
            // SAFETY: see `as_slice`.
            unsafe { region.as_mut_slice() }
        } else {
            self.heap.get_or_insert_with(|| vec![0u8; self.max_size as usize])
        }
    }

    /// The fd backing this plane's memory, if it is `memfd`-based.
    pub fn raw_fd(&self) -> Option<std::os::fd::RawFd> {
        self.region.as_ref().map(MemRegion::raw_fd)
    }
}

/// Ownership state of a pooled buffer, per spec §4.3/§5: a buffer handed
/// to a node for writing is `InFlight`; once the consumer is done with it
/// it becomes `Returned`, and the pool reclaims it back to `Free` on the
/// next [`BufferPool::reclaim`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    Free,
    InFlight,
    Returned,
}

/// A single pooled buffer: a set of metadata blocks plus one or more data
/// planes.
#[derive(Debug)]
pub struct Buffer {
    pub id: u32,
    pub metas: Vec<Meta>,
    pub datas: Vec<Data>,
    state: BufferState,
}

impl Buffer {
    #[inline]
    pub fn state(&self) -> BufferState {
        self.state
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PoolStats {
    pub free: usize,
    pub in_flight: usize,
    pub returned: usize,
}

/// A pool of pre-allocated buffers shared between a node's output port
/// and its peers.
#[derive(Debug)]
pub struct BufferPool {
    buffers: Vec<Buffer>,
    plane_size: u32,
    data_type: DataType,
}

impl BufferPool {
    /// Allocate `count` buffers, each with a single data plane of
    /// `plane_size` bytes backed by `data_type`.
    ///
    /// `MemFd` buffers are backed by one `memfd` region per plane so each
    /// can independently be handed to a peer; `MemPtr` buffers use a plain
    /// heap allocation local to this process.
    pub fn allocate(count: u32, plane_size: u32, data_type: DataType) -> Result<Self> {
        if !matches!(data_type, DataType::MemFd | DataType::MemPtr) {
            bail!("buffer pool can only allocate MemFd or MemPtr planes, got {data_type:?}");
        }

        let mut buffers = Vec::with_capacity(count as usize);

        for id in 0..count {
            let data = match data_type {
                DataType::MemFd => {
                    let region = MemRegion::allocate(&format!("mediagraph-buf-{id}"), plane_size as usize)
                        .with_context(|| format!("allocating memfd region for buffer {id}"))?;

                    Data {
                        ty: DataType::MemFd,
                        max_size: plane_size,
                        chunk: Chunk::default(),
                        region: Some(region),
                        heap: None,
                    }
                }
                DataType::MemPtr => Data {
                    ty: DataType::MemPtr,
                    max_size: plane_size,
                    chunk: Chunk::default(),
                    region: None,
                    heap: Some(vec![0u8; plane_size as usize]),
                },
                _ => unreachable!("checked above"),
            };

            buffers.push(Buffer {
                id,
                metas: Vec::new(),
                datas: vec![data],
                state: BufferState::Free,
            });
        }

        tracing::debug!(count, plane_size, ?data_type, "allocated buffer pool");

        Ok(Self {
            buffers,
            plane_size,
            data_type,
        })
    }

    #[inline]
    pub fn plane_size(&self) -> u32 {
        self.plane_size
    }

    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Dequeue the next free buffer, marking it in-flight.
    pub fn dequeue(&mut self) -> Option<&mut Buffer> {
        let buffer = self.buffers.iter_mut().find(|b| b.state == BufferState::Free)?;
        buffer.state = BufferState::InFlight;
        Some(buffer)
    }

    /// Return a buffer the consumer is finished reading.
    pub fn queue(&mut self, id: u32) -> Result<()> {
        let buffer = self
            .buffers
            .iter_mut()
            .find(|b| b.id == id)
            .context("unknown buffer id")?;

        if buffer.state != BufferState::InFlight {
            bail!("buffer {id} returned from state {:?}, expected InFlight", buffer.state);
        }

        buffer.state = BufferState::Returned;
        Ok(())
    }

    /// Move every `Returned` buffer back to `Free`. Called once per cycle
    /// by the node driving this pool.
    pub fn reclaim(&mut self) {
        for buffer in &mut self.buffers {
            if buffer.state == BufferState::Returned {
                buffer.state = BufferState::Free;
            }
        }
    }

    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats::default();

        for buffer in &self.buffers {
            match buffer.state {
                BufferState::Free => stats.free += 1,
                BufferState::InFlight => stats.in_flight += 1,
                BufferState::Returned => stats.returned += 1,
            }
        }

        stats
    }

    pub fn get(&self, id: u32) -> Option<&Buffer> {
        self.buffers.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Buffer> {
        self.buffers.iter_mut().find(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeue_queue_reclaim_cycle() {
        let mut pool = BufferPool::allocate(2, 1024, DataType::MemPtr).unwrap();

        let id = pool.dequeue().unwrap().id;
        assert_eq!(pool.stats().in_flight, 1);
        assert_eq!(pool.stats().free, 1);

        pool.queue(id).unwrap();
        assert_eq!(pool.stats().returned, 1);

        pool.reclaim();
        assert_eq!(pool.stats().free, 2);
    }

    #[test]
    fn queue_rejects_buffer_not_in_flight() {
        let mut pool = BufferPool::allocate(1, 64, DataType::MemPtr).unwrap();
        assert!(pool.queue(0).is_err());
    }

    #[test]
    fn exhausted_pool_returns_none() {
        let mut pool = BufferPool::allocate(1, 64, DataType::MemPtr).unwrap();
        assert!(pool.dequeue().is_some());
        assert!(pool.dequeue().is_none());
    }

    #[test]
    fn memfd_buffers_expose_a_raw_fd() {
        let mut pool = BufferPool::allocate(1, 4096, DataType::MemFd).unwrap();
        let buffer = pool.dequeue().unwrap();
        assert!(buffer.datas[0].raw_fd().is_some());
    }
}
