use crate::BufferIo;

/// A directed connection between an output port and an input port.
///
/// Links are the edges of the graph's DAG; [`Graph::add_link`](crate::Graph::add_link)
/// is where the acyclicity invariant is enforced.
#[derive(Debug)]
pub struct Link {
    pub id: u32,
    pub output_node: u32,
    pub output_port: u32,
    pub input_node: u32,
    pub input_port: u32,
    /// Whether the peer's ring buffer / I-O area is currently mapped and
    /// this link can carry data.
    pub active: bool,
    /// The I/O area shared by both of this link's ports (spec.md §3: "the
    /// *same* I/O area"). Owned here, not on either [`crate::Port`], so
    /// there's exactly one copy for both sides to read and write.
    pub io: BufferIo,
}
