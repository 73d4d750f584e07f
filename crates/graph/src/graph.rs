use std::collections::HashSet;
use std::fmt;

use collections::Map;

use crate::{Direction, Link, Node, NodeFlags, Port, PortFlags};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    NodeNotFound(u32),
    PortNotFound(u32),
    PortNotLinked(u32),
    LinkNotFound(u32),
    DirectionMismatch,
    WouldCreateCycle,
    SameNode,
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::NodeNotFound(id) => write!(f, "no such node: {id}"),
            GraphError::PortNotFound(id) => write!(f, "no such port: {id}"),
            GraphError::PortNotLinked(id) => write!(f, "port {id} has no active link"),
            GraphError::LinkNotFound(id) => write!(f, "no such link: {id}"),
            GraphError::DirectionMismatch => write!(f, "link must go from an output port to an input port"),
            GraphError::WouldCreateCycle => write!(f, "link would create a cycle"),
            GraphError::SameNode => write!(f, "cannot link a node's ports to themselves"),
        }
    }
}

impl std::error::Error for GraphError {}

/// The runtime graph: nodes, ports and links, addressed by stable id.
///
/// Pointer-chasing adjacency from the original `spa_graph_node`/
/// `spa_graph_port` intrusive lists is replaced by id lookups into
/// [`collections::Map`], per the arena-and-index redesign.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Map<Node>,
    ports: Map<Port>,
    links: Map<Link>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, name: impl Into<String>, flags: NodeFlags) -> u32 {
        let name = name.into();
        self.nodes.insert_with(|id| Node::new(id, name, flags))
    }

    pub fn node(&self, id: u32) -> Result<&Node, GraphError> {
        self.nodes.get(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn node_mut(&mut self, id: u32) -> Result<&mut Node, GraphError> {
        self.nodes.get_mut(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (u32, &Node)> {
        self.nodes.iter()
    }

    /// Remove a node and every port/link that referenced it.
    pub fn remove_node(&mut self, id: u32) -> Result<(), GraphError> {
        let node = self.nodes.remove(id).ok_or(GraphError::NodeNotFound(id))?;

        for port_id in node.input_ports().iter().chain(node.output_ports()).copied().collect::<Vec<_>>() {
            let _ = self.remove_port(port_id);
        }

        Ok(())
    }

    pub fn add_port(
        &mut self,
        node_id: u32,
        direction: Direction,
        name: impl Into<String>,
        flags: PortFlags,
    ) -> Result<u32, GraphError> {
        if self.nodes.get(node_id).is_none() {
            return Err(GraphError::NodeNotFound(node_id));
        }

        let name = name.into();
        let port_id = self.ports.insert_with(|id| Port::new(id, node_id, direction, name, flags));

        let node = self.nodes.get_mut(node_id).unwrap();
        node.add_port(direction, port_id);

        // spec.md §4.6: "increments `required[d]` if the port lacks the
        // optional flag".
        if !flags.contains(PortFlags::OPTIONAL) {
            node.incr_required(direction);
        }

        Ok(port_id)
    }

    pub fn port(&self, id: u32) -> Result<&Port, GraphError> {
        self.ports.get(id).ok_or(GraphError::PortNotFound(id))
    }

    pub fn port_mut(&mut self, id: u32) -> Result<&mut Port, GraphError> {
        self.ports.get_mut(id).ok_or(GraphError::PortNotFound(id))
    }

    pub fn remove_port(&mut self, id: u32) -> Result<(), GraphError> {
        let port = self.ports.remove(id).ok_or(GraphError::PortNotFound(id))?;

        for link_id in port.links().to_vec() {
            let _ = self.remove_link(link_id);
        }

        if let Some(node) = self.nodes.get_mut(port.node_id) {
            node.remove_port(port.direction, id);

            if !port.flags.contains(PortFlags::OPTIONAL) {
                node.decr_required(port.direction);
            }
        }

        Ok(())
    }

    /// Connect `output_port` to `input_port`, rejecting the link if it
    /// would introduce a cycle into the node graph (spec's DAG invariant).
    pub fn add_link(&mut self, output_port: u32, input_port: u32) -> Result<u32, GraphError> {
        let out = self.ports.get(output_port).ok_or(GraphError::PortNotFound(output_port))?;
        let inp = self.ports.get(input_port).ok_or(GraphError::PortNotFound(input_port))?;

        if out.direction != Direction::Output || inp.direction != Direction::Input {
            return Err(GraphError::DirectionMismatch);
        }

        if out.node_id == inp.node_id {
            return Err(GraphError::SameNode);
        }

        if self.reaches(inp.node_id, out.node_id) {
            return Err(GraphError::WouldCreateCycle);
        }

        let output_node = out.node_id;
        let input_node = inp.node_id;

        let link_id = self.links.insert_with(|id| Link {
            id,
            output_node,
            output_port,
            input_node,
            input_port,
            active: false,
            io: crate::BufferIo::new(),
        });

        self.ports.get_mut(output_port).unwrap().add_link(link_id);
        self.ports.get_mut(input_port).unwrap().add_link(link_id);

        Ok(link_id)
    }

    pub fn remove_link(&mut self, id: u32) -> Result<(), GraphError> {
        let link = self.links.remove(id).ok_or(GraphError::LinkNotFound(id))?;

        if let Some(port) = self.ports.get_mut(link.output_port) {
            port.remove_link(id);
        }

        if let Some(port) = self.ports.get_mut(link.input_port) {
            port.remove_link(id);
        }

        Ok(())
    }

    pub fn link(&self, id: u32) -> Result<&Link, GraphError> {
        self.links.get(id).ok_or(GraphError::LinkNotFound(id))
    }

    /// The shared I/O area for `link_id`.
    pub fn link_io(&self, link_id: u32) -> Result<&crate::BufferIo, GraphError> {
        Ok(&self.link(link_id)?.io)
    }

    /// Mutably borrow the shared I/O area for `link_id`.
    pub fn link_io_mut(&mut self, link_id: u32) -> Result<&mut crate::BufferIo, GraphError> {
        Ok(&mut self.links.get_mut(link_id).ok_or(GraphError::LinkNotFound(link_id))?.io)
    }

    /// The I/O area shared by `port_id`'s active link, if it has one.
    /// Per spec.md §3, "a port may appear in at most one active link", so
    /// the first (only) link id on the port resolves it unambiguously.
    pub fn port_io(&self, port_id: u32) -> Result<&crate::BufferIo, GraphError> {
        let port = self.port(port_id)?;
        let &link_id = port.links().first().ok_or(GraphError::PortNotLinked(port_id))?;
        self.link_io(link_id)
    }

    /// Mutably borrow the I/O area shared by `port_id`'s active link.
    pub fn port_io_mut(&mut self, port_id: u32) -> Result<&mut crate::BufferIo, GraphError> {
        let &link_id = self.port(port_id)?.links().first().ok_or(GraphError::PortNotLinked(port_id))?;
        self.link_io_mut(link_id)
    }

    pub fn links(&self) -> impl Iterator<Item = (u32, &Link)> {
        self.links.iter()
    }

    /// Ids of every node that has been continuously `Idle` for at least
    /// `timeout`, per spec.md §4.7's idle-suspend policy. The caller
    /// (typically a periodic sweep on the event loop's timer queue) is
    /// expected to transition each one to `Suspended`.
    pub fn idle_timed_out(&self, now: std::time::Instant, timeout: std::time::Duration) -> Vec<u32> {
        self.nodes
            .iter()
            .filter_map(|(id, node)| (node.idle_for(now)? >= timeout).then_some(id))
            .collect()
    }

    /// Nodes directly downstream of `node_id` via its output ports'
    /// links — the scheduler's fan-out when a node finishes a cycle.
    pub fn successors(&self, node_id: u32) -> Vec<u32> {
        let Some(node) = self.nodes.get(node_id) else {
            return Vec::new();
        };

        let mut out = Vec::new();

        for &port_id in node.output_ports() {
            let Some(port) = self.ports.get(port_id) else { continue };

            for &link_id in port.links() {
                if let Some(link) = self.links.get(link_id) {
                    out.push(link.input_node);
                }
            }
        }

        out
    }

    /// Nodes directly upstream of `node_id` via its input ports' links —
    /// used to compute a node's "required" count.
    pub fn predecessors(&self, node_id: u32) -> Vec<u32> {
        let Some(node) = self.nodes.get(node_id) else {
            return Vec::new();
        };

        let mut out = Vec::new();

        for &port_id in node.input_ports() {
            let Some(port) = self.ports.get(port_id) else { continue };

            for &link_id in port.links() {
                if let Some(link) = self.links.get(link_id) {
                    out.push(link.output_node);
                }
            }
        }

        out
    }

    /// Whether `from` can reach `to` by following links downstream
    /// (breadth-first over `successors`). Used to reject cycle-forming
    /// links before they're added.
    fn reaches(&self, from: u32, to: u32) -> bool {
        let mut seen = HashSet::new();
        let mut stack = vec![from];

        while let Some(node) = stack.pop() {
            if node == to {
                return true;
            }

            if !seen.insert(node) {
                continue;
            }

            stack.extend(self.successors(node));
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_duplex(graph: &mut Graph, name: &str) -> (u32, u32, u32) {
        let node = graph.add_node(name, NodeFlags::NONE);
        let input = graph.add_port(node, Direction::Input, "in", PortFlags::NONE).unwrap();
        let output = graph.add_port(node, Direction::Output, "out", PortFlags::NONE).unwrap();
        (node, input, output)
    }

    #[test]
    fn links_two_nodes() {
        let mut graph = Graph::new();
        let (_, _, out_a) = add_duplex(&mut graph, "a");
        let (_, in_b, _) = add_duplex(&mut graph, "b");

        let link = graph.add_link(out_a, in_b).unwrap();
        assert_eq!(graph.link(link).unwrap().output_port, out_a);
        assert_eq!(graph.port(out_a).unwrap().links(), &[link]);
    }

    #[test]
    fn rejects_cycles() {
        let mut graph = Graph::new();
        let (_, in_a, out_a) = add_duplex(&mut graph, "a");
        let (_, in_b, out_b) = add_duplex(&mut graph, "b");

        graph.add_link(out_a, in_b).unwrap();
        let err = graph.add_link(out_b, in_a).unwrap_err();
        assert_eq!(err, GraphError::WouldCreateCycle);
    }

    #[test]
    fn rejects_wrong_direction_links() {
        let mut graph = Graph::new();
        let (_, in_a, _) = add_duplex(&mut graph, "a");
        let (_, in_b, _) = add_duplex(&mut graph, "b");

        let err = graph.add_link(in_a, in_b).unwrap_err();
        assert_eq!(err, GraphError::DirectionMismatch);
    }

    #[test]
    fn removing_a_node_drops_its_links() {
        let mut graph = Graph::new();
        let (node_a, _, out_a) = add_duplex(&mut graph, "a");
        let (_, in_b, _) = add_duplex(&mut graph, "b");

        let link = graph.add_link(out_a, in_b).unwrap();
        graph.remove_node(node_a).unwrap();

        assert!(matches!(graph.link(link), Err(GraphError::LinkNotFound(_))));
        assert!(matches!(graph.port(in_b).is_ok(), true));
    }

    #[test]
    fn linked_ports_share_the_same_io_area() {
        let mut graph = Graph::new();
        let (_, _, out_a) = add_duplex(&mut graph, "a");
        let (_, in_b, _) = add_duplex(&mut graph, "b");
        graph.add_link(out_a, in_b).unwrap();

        graph.port_io_mut(out_a).unwrap().status = crate::IoStatus::HaveBuffer;
        graph.port_io_mut(out_a).unwrap().buffer_id = 3;

        // out.io == in.io: writing through the output port's handle is
        // visible through the input port's handle, because both resolve
        // to the same link's `BufferIo`.
        let seen = graph.port_io(in_b).unwrap();
        assert_eq!(seen.status, crate::IoStatus::HaveBuffer);
        assert_eq!(seen.buffer_id, 3);
    }

    #[test]
    fn optional_ports_do_not_count_toward_required() {
        let mut graph = Graph::new();
        let node = graph.add_node("n", NodeFlags::NONE);

        graph.add_port(node, Direction::Input, "required-in", PortFlags::NONE).unwrap();
        assert_eq!(graph.node(node).unwrap().required(Direction::Input), 1);

        let optional = graph.add_port(node, Direction::Input, "optional-in", PortFlags::OPTIONAL).unwrap();
        assert_eq!(graph.node(node).unwrap().required(Direction::Input), 1);

        graph.remove_port(optional).unwrap();
        assert_eq!(graph.node(node).unwrap().required(Direction::Input), 1);
    }

    #[test]
    fn successors_and_predecessors_follow_links() {
        let mut graph = Graph::new();
        let (node_a, _, out_a) = add_duplex(&mut graph, "a");
        let (node_b, in_b, _) = add_duplex(&mut graph, "b");

        graph.add_link(out_a, in_b).unwrap();
        assert_eq!(graph.successors(node_a), vec![node_b]);
        assert_eq!(graph.predecessors(node_b), vec![node_a]);
    }
}
