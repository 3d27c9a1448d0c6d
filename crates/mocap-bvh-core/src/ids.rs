//! Arena identifiers for skeleton entities.
//!
//! Parent, child and owner links between joints and channels are cyclic when
//! expressed as references, so the aggregate keeps both kinds of record in
//! arenas and links them through these stable indices instead. Dense indices
//! keep navigation O(1); the ids are opaque externally.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct JointId(pub u32);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl JointId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl ChannelId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}
