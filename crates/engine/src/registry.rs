//! Proxy / resource registry (C10), spec.md §4.10.
//!
//! Grounded on `crates/client/src/state.rs`'s `GlobalMap` (global id ↔
//! local id) and `local_id_to_kind` dispatch table for the client-side
//! half; the **resource** (server-side mirror with a permission mask) is
//! new surface, modeled the same way but inverted, as SPEC_FULL §10.8
//! calls for. Binding is `(id, interface, version, permissions) -> new
//! proxy`, generalizing the `client_node_get_node`-style bind call in
//! `crates/client/src/client.rs` away from one hard-coded factory to any
//! registered interface/global.

use std::collections::BTreeMap;

use anyhow::{Context, Result, bail};
use collections::Map;
use protocol::Properties;

use crate::listeners::Listeners;

/// Read/write/execute permission mask granted to a bound proxy, mirroring
/// the server-side resource's permission bits from spec.md §4.10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions(u32);

impl Permissions {
    pub const NONE: Self = Self(0);
    pub const READ: Self = Self(0x1);
    pub const WRITE: Self = Self(0x2);
    pub const EXEC: Self = Self(0x4);
    pub const ALL: Self = Self(Self::READ.0 | Self::WRITE.0 | Self::EXEC.0);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl core::ops::BitOr for Permissions {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// A server-side object enumerable through the registry.
#[derive(Debug)]
pub struct Global {
    pub id: u32,
    pub interface: u32,
    pub version: u32,
    pub properties: Properties,
}

/// A client-side handle to a remote [`Global`].
#[derive(Debug, Clone, Copy)]
pub struct Proxy {
    pub local_id: u32,
    pub global_id: u32,
    pub interface: u32,
    pub version: u32,
}

/// The server-side mirror of a [`Proxy`]: same binding, plus the
/// permission mask the client was granted.
#[derive(Debug, Clone, Copy)]
pub struct Resource {
    pub client_id: u32,
    pub global_id: u32,
    pub interface: u32,
    pub version: u32,
    pub permissions: Permissions,
}

/// Notifications the registry emits as globals and bindings change.
#[derive(Debug, Clone, Copy)]
#[non_exhaustive]
pub enum RegistryEvent {
    GlobalAdded { id: u32 },
    GlobalRemoved { id: u32 },
}

#[derive(Debug, Default)]
struct ClientState {
    proxies: Map<Proxy>,
    global_to_local: BTreeMap<u32, u32>,
}

/// Per-connection proxy tables plus the server-side global/resource maps.
///
/// One `Registry` is shared by the whole engine; each connected client is
/// identified by a caller-assigned `client_id` (the engine does not invent
/// these — spec.md treats the client handle as opaque, per §1's "accepts
/// opaque client and transport handles").
#[derive(Default)]
pub struct Registry {
    globals: Map<Global>,
    resources: Map<Resource>,
    clients: BTreeMap<u32, ClientState>,
    listeners: Listeners<RegistryEvent>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for global add/remove notifications.
    pub fn add_listener(&mut self, callback: impl FnMut(&RegistryEvent) + 'static) -> crate::listeners::ListenerId {
        self.listeners.add(callback)
    }

    /// Publish a new global object, returning its id.
    pub fn add_global(&mut self, interface: u32, version: u32, properties: Properties) -> u32 {
        let id = self.globals.insert_with(|id| Global { id, interface, version, properties });
        tracing::debug!(id, interface, version, "registry: global added");
        self.listeners.emit(&RegistryEvent::GlobalAdded { id });
        id
    }

    /// Remove a global object. Any resources already bound to it are left
    /// in place (the spec models proxy/resource teardown as an explicit
    /// `destroy`, not an implicit cascade); callers that want cascading
    /// teardown should enumerate [`Self::resources_for`] first.
    pub fn remove_global(&mut self, id: u32) -> Option<Global> {
        let global = self.globals.remove(id)?;
        tracing::debug!(id, "registry: global removed");
        self.listeners.emit(&RegistryEvent::GlobalRemoved { id });
        Some(global)
    }

    pub fn global(&self, id: u32) -> Option<&Global> {
        self.globals.get(id)
    }

    pub fn globals(&self) -> impl Iterator<Item = (u32, &Global)> {
        self.globals.iter()
    }

    /// Bind `client_id` to `global_id`, creating a [`Proxy`] on the client
    /// side and its mirrored [`Resource`] on the server side.
    ///
    /// Returns `(proxy_local_id, resource_id)`.
    pub fn bind(&mut self, client_id: u32, global_id: u32, permissions: Permissions) -> Result<(u32, u32)> {
        let global = self.globals.get(global_id).with_context(|| format!("no such global: {global_id}"))?;
        let interface = global.interface;
        let version = global.version;

        let client = self.clients.entry(client_id).or_default();

        let local_id = client.proxies.insert_with(|id| Proxy {
            local_id: id,
            global_id,
            interface,
            version,
        });
        client.global_to_local.insert(global_id, local_id);

        let resource_id = self.resources.insert(Resource {
            client_id,
            global_id,
            interface,
            version,
            permissions,
        });

        tracing::debug!(client_id, global_id, local_id, resource_id, "registry: bound");
        Ok((local_id, resource_id))
    }

    /// Look up a client's proxy by its local id.
    pub fn proxy(&self, client_id: u32, local_id: u32) -> Option<&Proxy> {
        self.clients.get(&client_id)?.proxies.get(local_id)
    }

    /// Map a global id to the local id a client bound it under, if any.
    pub fn local_id_for(&self, client_id: u32, global_id: u32) -> Option<u32> {
        self.clients.get(&client_id)?.global_to_local.get(&global_id).copied()
    }

    pub fn resource(&self, resource_id: u32) -> Option<&Resource> {
        self.resources.get(resource_id)
    }

    /// Destroy a single proxy/resource pair. Matches spec.md §4.10:
    /// "Destruction of a proxy issues a `destroy` request; the resource
    /// fires a `destroy` event on teardown" — here collapsed into one
    /// local call since there's no wire round trip to model.
    pub fn destroy_proxy(&mut self, client_id: u32, local_id: u32) -> Result<()> {
        let client = self.clients.get_mut(&client_id).context("unknown client")?;
        let proxy = client.proxies.remove(local_id).context("unknown proxy")?;
        client.global_to_local.remove(&proxy.global_id);

        let removed = self
            .resources
            .iter()
            .find(|(_, resource)| resource.client_id == client_id && resource.global_id == proxy.global_id)
            .map(|(id, _)| id);

        if let Some(resource_id) = removed {
            self.resources.remove(resource_id);
        }

        Ok(())
    }

    /// Tear down every proxy and resource belonging to `client_id`.
    ///
    /// Matches the "Peer gone / connection closed" error taxonomy in
    /// spec.md §7: "All proxies/resources bound to that connection are
    /// destroyed."
    pub fn disconnect_client(&mut self, client_id: u32) {
        let Some(client) = self.clients.remove(&client_id) else {
            return;
        };

        let stale: Vec<u32> = self
            .resources
            .iter()
            .filter(|(_, resource)| resource.client_id == client_id)
            .map(|(id, _)| id)
            .collect();

        for id in stale {
            self.resources.remove(id);
        }

        tracing::info!(client_id, proxies = client.proxies.len(), "registry: client disconnected");
    }

    /// Fails with an error if `permissions` doesn't grant `required`.
    pub fn check_permissions(&self, resource_id: u32, required: Permissions) -> Result<()> {
        let resource = self.resources.get(resource_id).context("unknown resource")?;

        if !resource.permissions.contains(required) {
            bail!("permission denied for resource {resource_id}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_creates_matching_proxy_and_resource() {
        let mut registry = Registry::new();
        let global_id = registry.add_global(1, 3, Properties::new());

        let (local_id, resource_id) = registry.bind(42, global_id, Permissions::ALL).unwrap();

        let proxy = registry.proxy(42, local_id).unwrap();
        assert_eq!(proxy.global_id, global_id);

        let resource = registry.resource(resource_id).unwrap();
        assert_eq!(resource.client_id, 42);
        assert_eq!(resource.global_id, global_id);
    }

    #[test]
    fn binding_unknown_global_is_an_error() {
        let mut registry = Registry::new();
        assert!(registry.bind(1, 999, Permissions::READ).is_err());
    }

    #[test]
    fn disconnect_client_drops_all_its_bindings() {
        let mut registry = Registry::new();
        let global_id = registry.add_global(1, 1, Properties::new());
        registry.bind(7, global_id, Permissions::READ).unwrap();

        registry.disconnect_client(7);

        assert!(registry.proxy(7, 0).is_none());
        assert_eq!(registry.resources.len(), 0);
    }

    #[test]
    fn permission_check_rejects_missing_bits() {
        let mut registry = Registry::new();
        let global_id = registry.add_global(1, 1, Properties::new());
        let (_, resource_id) = registry.bind(1, global_id, Permissions::READ).unwrap();

        assert!(registry.check_permissions(resource_id, Permissions::READ).is_ok());
        assert!(registry.check_permissions(resource_id, Permissions::WRITE).is_err());
    }

    #[test]
    fn listener_observes_global_lifecycle() {
        let mut registry = Registry::new();
        let events: std::rc::Rc<std::cell::RefCell<Vec<u32>>> = Default::default();

        let events_a = events.clone();
        registry.add_listener(move |event| match event {
            RegistryEvent::GlobalAdded { id } | RegistryEvent::GlobalRemoved { id } => {
                events_a.borrow_mut().push(*id);
            }
        });

        let id = registry.add_global(1, 1, Properties::new());
        registry.remove_global(id);

        assert_eq!(*events.borrow(), vec![id, id]);
    }
}
