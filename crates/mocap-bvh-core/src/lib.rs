//! BVH motion-capture file core (engine-agnostic).
//!
//! This crate models one `.bvh` file as a single aggregate: a
//! recursive-descent parser turns the textual hierarchy into a joint/channel
//! tree and a dense frame matrix, a transform engine reconstructs per-frame
//! local transforms (with the format's axis-sign and Rz·Ry·Rx composition
//! conventions), and a writer serializes the model back to the same textual
//! layout. No engine-asset types appear anywhere; consumers get neutral
//! numeric and string results.

pub mod config;
pub mod data;
pub mod error;
pub mod file;
pub mod ids;
pub mod transform;

mod parse;
mod write;

// Re-exports for consumers (adapters)
pub use config::WriteConfig;
pub use data::{Channel, ChannelType, Joint};
pub use error::BvhError;
pub use file::BvhFile;
pub use ids::{ChannelId, JointId};
pub use transform::JointTransform;
