mod arena;
mod handle;
mod node;
mod raw_multiway_set;

pub use node::MAX_FANOUT;
pub(crate) use raw_multiway_set::RawMultiwaySet;
