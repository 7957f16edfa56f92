mod client;
mod filter;
mod model;
mod selection;
mod store;
mod wire;

pub use client::{Credentials, DEFAULT_VCENTER_PORT, FetchError, TopologyClient};
pub use filter::{FilteredTopology, filter_topology};
pub use model::{Edge, Node, NodeKind, TopologySnapshot};
pub use selection::Selection;
pub use store::TopologyStore;

#[cfg(test)]
pub(crate) use model::{Position, fixtures};
