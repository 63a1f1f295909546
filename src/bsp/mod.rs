// src/bsp/mod.rs
mod clip_tree;
mod contents;
pub mod vis;

pub use self::clip_tree::{
    ClipChild, ClipTree, HullNode, Movement, DEFAULT_MAX_RESTARTS, DIST_EPSILON,
};
pub use self::contents::Contents;
pub use self::vis::visible_leaves;
