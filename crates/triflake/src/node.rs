/// Supplies the node id a [`Generator`] embeds in every identifier.
///
/// Node ids must be unique among generators sharing a layout, otherwise
/// identifiers from different generators can collide. This crate does not
/// coordinate that; providers only decide where the number comes from.
///
/// [`Generator`]: crate::Generator
pub trait NodeIdProvider {
    /// Returns the node id, before truncation to any layout's width.
    fn node_id(&self) -> u64;
}

/// A fixed, caller-assigned node id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StaticNodeId(pub u64);

impl NodeIdProvider for StaticNodeId {
    fn node_id(&self) -> u64 {
        self.0
    }
}

/// A node id derived by hashing a stable platform identifier, such as a
/// hostname, container id or machine id.
///
/// Uses 64-bit FNV-1a, which is stable across builds and platforms. The full
/// hash is returned; each layout keeps only as many low bits as its node id
/// field holds, so distinct identifiers may still map to the same node id.
///
/// # Example
///
/// ```
/// use triflake::{HashedNodeId, NodeIdProvider};
///
/// let a = HashedNodeId::new("worker-a.internal");
/// let b = HashedNodeId::new("worker-a.internal");
/// assert_eq!(a.node_id(), b.node_id());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashedNodeId {
    hash: u64,
}

impl HashedNodeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hashes `identifier` into a node id.
    pub fn new(identifier: impl AsRef<[u8]>) -> Self {
        let hash = identifier
            .as_ref()
            .iter()
            .fold(Self::FNV_OFFSET_BASIS, |hash, &byte| {
                (hash ^ u64::from(byte)).wrapping_mul(Self::FNV_PRIME)
            });
        Self { hash }
    }
}

impl NodeIdProvider for HashedNodeId {
    fn node_id(&self) -> u64 {
        self.hash
    }
}

impl<P> NodeIdProvider for &P
where
    P: NodeIdProvider + ?Sized,
{
    fn node_id(&self) -> u64 {
        (**self).node_id()
    }
}
