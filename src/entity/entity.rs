// src/entity/entity.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::utils::geometry::Vec3;
use crate::utils::util::parse_vec3;

/// Sky used when `worldspawn` names none.
pub const DEFAULT_SKY_NAME: &str = "dusk";

/// `"rendermode"` values understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenderMode {
    Normal,
    Color,
    Texture,
    Glow,
    Solid,
    Additive,
}

impl RenderMode {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(RenderMode::Normal),
            1 => Some(RenderMode::Color),
            2 => Some(RenderMode::Texture),
            3 => Some(RenderMode::Glow),
            4 => Some(RenderMode::Solid),
            5 => Some(RenderMode::Additive),
            _ => None,
        }
    }
}

/// One `{ ... }` block of the entity lump.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    /// Copy of the `"classname"` value, empty if the block has none.
    pub classname: String,

    pub keyvalues: HashMap<String, String>,
}

impl Entity {
    /// Stores a pair. A repeated key overwrites the earlier value.
    pub fn insert(&mut self, key: String, value: String) {
        if key == "classname" {
            self.classname = value.clone();
        }
        self.keyvalues.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.keyvalues.get(key).map(String::as_str)
    }

    pub fn origin(&self) -> Option<Vec3> {
        self.get("origin").and_then(parse_vec3)
    }

    /// Pitch, yaw, roll. Falls back to the single `"angle"` yaw key.
    pub fn angles(&self) -> Option<Vec3> {
        if let Some(angles) = self.get("angles").and_then(parse_vec3) {
            return Some(angles);
        }
        let yaw: f32 = self.get("angle")?.trim().parse().ok()?;
        Some(Vec3::new(0.0, yaw, 0.0))
    }

    /// The brush model index for `"model" "*N"`; `None` for studio models
    /// and entities without a model.
    pub fn model_index(&self) -> Option<usize> {
        self.get("model")?.strip_prefix('*')?.parse().ok()
    }

    pub fn render_mode(&self) -> Option<RenderMode> {
        RenderMode::from_code(self.get("rendermode")?.trim().parse().ok()?)
    }

    /// `"renderamt"`, clamped to a byte.
    pub fn render_amount(&self) -> Option<u8> {
        let amount: i32 = self.get("renderamt")?.trim().parse().ok()?;
        Some(amount.clamp(0, 255) as u8)
    }

    pub fn render_color(&self) -> Option<[u8; 3]> {
        let color = parse_vec3(self.get("rendercolor")?)?;
        let channel = |v: f32| v.clamp(0.0, 255.0) as u8;
        Some([channel(color.x), channel(color.y), channel(color.z)])
    }
}

/// The ordered entity list of a map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityList {
    entities: Vec<Entity>,
}

impl EntityList {
    pub fn new(entities: Vec<Entity>) -> Self {
        EntityList { entities }
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    /// First entity with the given classname.
    pub fn find_by_classname(&self, classname: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.classname == classname)
    }

    pub fn find_all_by_classname<'a>(
        &'a self,
        classname: &'a str,
    ) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities.iter().filter(move |e| e.classname == classname)
    }

    /// The world entity, looked up by classname rather than position.
    pub fn worldspawn(&self) -> Option<&Entity> {
        self.find_by_classname("worldspawn")
    }

    pub fn sky_name(&self) -> &str {
        self.worldspawn()
            .and_then(|w| w.get("skyname"))
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_SKY_NAME)
    }

    /// File names of the texture packages listed in `worldspawn`'s `"wad"`
    /// key. Editors store absolute paths from the mapper's machine, so only
    /// the final component is kept.
    pub fn wad_files(&self) -> Vec<String> {
        let Some(list) = self.worldspawn().and_then(|w| w.get("wad")) else {
            return Vec::new();
        };
        list.split(';')
            .filter_map(|path| path.rsplit(['/', '\\']).next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parse_entities;

    fn list(text: &str) -> EntityList {
        EntityList::new(parse_entities(text.as_bytes()).unwrap())
    }

    #[test]
    fn test_worldspawn_found_by_classname() {
        let entities = list(r#"{"classname" "light"}{"classname" "worldspawn" "skyname" "space"}"#);
        assert_eq!(entities.worldspawn().unwrap().get("skyname"), Some("space"));
        assert_eq!(entities.sky_name(), "space");
    }

    #[test]
    fn test_default_sky() {
        let entities = list(r#"{"classname" "worldspawn"}"#);
        assert_eq!(entities.sky_name(), DEFAULT_SKY_NAME);
    }

    #[test]
    fn test_wad_files_strip_directories() {
        let entities = list(
            r#"{"classname" "worldspawn" "wad" "\sierra\half-life\valve\halflife.wad;C:/maps/extra.wad;;"}"#,
        );
        assert_eq!(entities.wad_files(), vec!["halflife.wad", "extra.wad"]);
    }

    #[test]
    fn test_find_all() {
        let entities = list(r#"{"classname" "light"}{"classname" "info_player_start"}{"classname" "light"}"#);
        assert_eq!(entities.find_all_by_classname("light").count(), 2);
        assert!(entities.find_by_classname("func_door").is_none());
    }

    #[test]
    fn test_origin_and_angles() {
        let entities = list(r#"{"classname" "info_player_start" "origin" "-96 128 36" "angle" "270"}"#);
        let start = entities.find_by_classname("info_player_start").unwrap();
        assert_eq!(start.origin(), Some(Vec3::new(-96.0, 128.0, 36.0)));
        assert_eq!(start.angles(), Some(Vec3::new(0.0, 270.0, 0.0)));
    }

    #[test]
    fn test_brush_model_reference() {
        let entities = list(r#"{"classname" "func_door" "model" "*3"}{"classname" "monster" "model" "models/scientist.mdl"}"#);
        assert_eq!(entities.get(0).unwrap().model_index(), Some(3));
        assert_eq!(entities.get(1).unwrap().model_index(), None);
    }

    #[test]
    fn test_render_settings() {
        let entities = list(r#"{"classname" "func_wall" "rendermode" "5" "renderamt" "300" "rendercolor" "255 128 0"}"#);
        let wall = entities.get(0).unwrap();
        assert_eq!(wall.render_mode(), Some(RenderMode::Additive));
        assert_eq!(wall.render_amount(), Some(255));
        assert_eq!(wall.render_color(), Some([255, 128, 0]));
    }

    #[test]
    fn test_serializes_as_array() {
        let entities = list(r#"{"classname" "light"}"#);
        let json = serde_json::to_value(&entities).unwrap();
        assert_eq!(json[0]["classname"], "light");
    }
}
