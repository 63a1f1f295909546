// src/entity/mod.rs
mod entity;
mod parser;

pub use self::entity::{Entity, EntityList, RenderMode, DEFAULT_SKY_NAME};
pub use self::parser::parse_entities;
