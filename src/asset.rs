// src/asset.rs
//! A fully loaded map.
//!
//! `BspAsset` owns the file buffer plus everything derived from it at load
//! time. Nothing is mutated afterwards, so an asset can be shared across
//! threads behind an `Arc` without locking.

use image::RgbImage;
use log::{error, info, warn};

use crate::bsp::{visible_leaves, ClipTree};
use crate::config::LoaderConfig;
use crate::entity::{parse_entities, EntityList};
use crate::error::{FormatError, FormatResult, LoadError};
use crate::fs::FileSystem;
use crate::lump::{BspFile, LumpKind};
use crate::map::Model;
use crate::surface::{
    load_texture_refs, reconstruct_surfaces, Lightmap, SurfaceFace, SurfaceVertex, Surfaces,
    TextureRef,
};

#[derive(Debug)]
pub struct BspAsset {
    file: BspFile,
    entities: EntityList,
    textures: Vec<TextureRef>,
    surfaces: Surfaces,
    models: Vec<Model>,
    collision: Option<ClipTree>,
}

impl BspAsset {
    /// Locates `name` through `fs` and loads it.
    pub fn load<F: FileSystem + ?Sized>(
        fs: &F,
        name: &str,
        config: &LoaderConfig,
    ) -> Result<Self, LoadError> {
        let Some(path) = fs.locate(name) else {
            error!("Map {} not found in search paths", name);
            return Err(LoadError::ResourceMissing(name.to_string()));
        };
        let bytes = fs.load(&path).map_err(|source| {
            error!("Failed to read {}: {}", path.display(), source);
            LoadError::Io {
                path: path.clone(),
                source,
            }
        })?;

        info!("Loading {}", path.display());
        Self::from_bytes(bytes, config)
    }

    /// Parses a complete map file held in memory.
    pub fn from_bytes(bytes: Vec<u8>, config: &LoaderConfig) -> Result<Self, LoadError> {
        Self::parse(bytes, config).map_err(|e| {
            error!("Failed to load map: {}", e);
            LoadError::Format(e)
        })
    }

    fn parse(bytes: Vec<u8>, config: &LoaderConfig) -> FormatResult<Self> {
        let file = BspFile::from_bytes(bytes)?;
        let entities = EntityList::new(parse_entities(file.lump_bytes(LumpKind::Entities))?);
        let textures = load_texture_refs(file.lump_bytes(LumpKind::Textures))?;
        let surfaces = reconstruct_surfaces(&file, &textures)?;

        let models: Vec<Model> = file.models().iter().collect();
        for (index, model) in models.iter().enumerate() {
            check_model_faces(index, model, surfaces.faces.len())?;
        }

        let collision = match ClipTree::for_hull(&file, 0, config.clip.hull) {
            Ok(tree) => Some(tree.with_max_restarts(config.clip.max_restarts)),
            Err(FormatError::MissingHull { hull, .. }) => {
                warn!("Map has no hull {}, collision disabled", hull);
                None
            }
            Err(e) => return Err(e),
        };

        info!(
            "Loaded BSP v{}: {} entities, {} faces, {} vertices, {} textures, {} models",
            file.version(),
            entities.len(),
            surfaces.faces.len(),
            surfaces.vertices.len(),
            textures.len(),
            models.len()
        );

        Ok(BspAsset {
            file,
            entities,
            textures,
            surfaces,
            models,
            collision,
        })
    }

    pub fn file(&self) -> &BspFile {
        &self.file
    }

    pub fn entities(&self) -> &EntityList {
        &self.entities
    }

    pub fn textures(&self) -> &[TextureRef] {
        &self.textures
    }

    pub fn vertices(&self) -> &[SurfaceVertex] {
        &self.surfaces.vertices
    }

    pub fn faces(&self) -> &[SurfaceFace] {
        &self.surfaces.faces
    }

    pub fn lightmaps(&self) -> &[Lightmap] {
        &self.surfaces.lightmaps
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Vertices of one reconstructed face.
    pub fn face_vertices(&self, face: &SurfaceFace) -> &[SurfaceVertex] {
        self.surfaces
            .vertices
            .get(face.first_vertex..face.first_vertex + face.vertex_count)
            .unwrap_or_default()
    }

    /// The faces drawn for brush model `model`. Out-of-range models have none.
    pub fn model_faces(&self, model: usize) -> &[SurfaceFace] {
        self.models
            .get(model)
            .and_then(Model::face_range)
            .and_then(|range| self.surfaces.faces.get(range))
            .unwrap_or_default()
    }

    /// Raw RGB lightmap samples of face `face`; `None` for faces drawn
    /// fully lit.
    pub fn lightmap_rgb(&self, face: usize) -> Option<&[u8]> {
        self.surfaces
            .lightmaps
            .get(face)?
            .rgb_bytes(self.file.lump_bytes(LumpKind::Lighting))
    }

    pub fn lightmap_image(&self, face: usize) -> Option<RgbImage> {
        self.surfaces
            .lightmaps
            .get(face)?
            .to_image(self.file.lump_bytes(LumpKind::Lighting))
    }

    /// The world collision hull selected by the loader config, if the map
    /// has it.
    pub fn collision(&self) -> Option<&ClipTree> {
        self.collision.as_ref()
    }

    /// Decodes another hull, e.g. for a brush entity's model.
    pub fn clip_tree(&self, model: usize, hull: usize) -> FormatResult<ClipTree> {
        ClipTree::for_hull(&self.file, model, hull)
    }

    pub fn visible_leaves(&self, leaf: usize) -> FormatResult<Vec<usize>> {
        visible_leaves(&self.file, leaf)
    }

    /// Indices of the faces listed in leaf `leaf`'s mark-surface run.
    pub fn leaf_faces(&self, leaf: usize) -> FormatResult<Vec<usize>> {
        let leaf = self.file.leaves().try_get(leaf as i64, "leaf")?;
        let marks = self.file.mark_surfaces();
        let first = leaf.first_mark_surface as i64;
        let face_count = self.surfaces.faces.len();

        (first..first + leaf.mark_surface_count as i64)
            .map(|i| {
                let face = marks.try_get(i, "leaf mark-surface")?.0 as usize;
                if face >= face_count {
                    return Err(FormatError::IndexOutOfRange {
                        kind: LumpKind::Faces,
                        index: face as i64,
                        count: face_count,
                        context: "mark-surface face",
                    });
                }
                Ok(face)
            })
            .collect()
    }
}

fn check_model_faces(index: usize, model: &Model, face_count: usize) -> FormatResult<()> {
    match model.face_range() {
        Some(range) if range.end <= face_count => Ok(()),
        _ => Err(FormatError::IndexOutOfRange {
            kind: LumpKind::Faces,
            index: model.first_face as i64 + model.face_count as i64,
            count: face_count,
            context: if index == 0 {
                "world model face range"
            } else {
                "brush model face range"
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bsp::{ClipChild, Contents};
    use crate::fs::SearchPathFileSystem;
    use crate::test_util::square_room;
    use crate::utils::geometry::Vec3;
    use image::Rgb;
    use std::fs;
    use std::path::PathBuf;

    fn room() -> BspAsset {
        BspAsset::from_bytes(square_room().build(), &LoaderConfig::default()).unwrap()
    }

    #[test]
    fn test_asset_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BspAsset>();
    }

    #[test]
    fn test_loads_everything() {
        let asset = room();
        assert_eq!(asset.entities().len(), 1);
        assert_eq!(asset.entities().wad_files(), vec!["halflife.wad", "decals.wad"]);
        assert_eq!(asset.textures().len(), 2);
        assert_eq!(asset.faces().len(), 2);
        assert_eq!(asset.vertices().len(), 8);
        assert_eq!(asset.model_faces(0).len(), 2);
        assert!(asset.model_faces(3).is_empty());
        assert_eq!(asset.face_vertices(&asset.faces()[1]).len(), 4);
    }

    #[test]
    fn test_lightmap_access() {
        let asset = room();
        assert_eq!(asset.lightmap_rgb(0).map(<[u8]>::len), Some(27));
        assert_eq!(asset.lightmap_rgb(1), None);

        let lit = asset.lightmap_image(0).unwrap();
        assert_eq!(lit.get_pixel(2, 2), &Rgb([24, 25, 26]));
        let sky = asset.lightmap_image(1).unwrap();
        assert_eq!(sky.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_world_collision() {
        let asset = room();
        let tree = asset.collision().unwrap();
        assert_eq!(tree.contents_at(Vec3::new(0.0, 0.0, 8.0), tree.root()), Contents::Empty);

        let movement = tree.resolve_movement(
            Vec3::new(16.0, 16.0, 8.0),
            Vec3::new(16.0, 16.0, -8.0),
            tree.root(),
        );
        assert!(movement.blocked);
        assert!(movement.position.z > 0.0);
    }

    #[test]
    fn test_missing_hull_disables_collision() {
        let mut config = LoaderConfig::default();
        config.clip.hull = 2;
        let asset = BspAsset::from_bytes(square_room().build(), &config).unwrap();
        assert!(asset.collision().is_none());
        assert!(matches!(
            asset.clip_tree(0, 2),
            Err(FormatError::MissingHull { model: 0, hull: 2 })
        ));
        assert_eq!(
            asset.clip_tree(0, 0).unwrap().root(),
            ClipChild::Node(0)
        );
    }

    #[test]
    fn test_leaf_faces() {
        let bytes = square_room()
            .mark_surface(1)
            .mark_surface(0)
            .mark_surface(9)
            .leaf_with_marks(-1, -1, 0, 2)
            .leaf_with_marks(-1, -1, 1, 2)
            .build();
        let asset = BspAsset::from_bytes(bytes, &LoaderConfig::default()).unwrap();
        assert!(asset.leaf_faces(1).unwrap().is_empty());
        assert_eq!(asset.leaf_faces(2).unwrap(), vec![1, 0]);
        assert!(matches!(
            asset.leaf_faces(3),
            Err(FormatError::IndexOutOfRange { kind: LumpKind::Faces, index: 9, .. })
        ));
        assert!(asset.leaf_faces(4).is_err());
    }

    #[test]
    fn test_model_face_range_is_checked() {
        let bytes = square_room().model([0.0; 3], [0; 4], 0, 1, 5).build();
        let err = BspAsset::from_bytes(bytes, &LoaderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Format(FormatError::IndexOutOfRange { kind: LumpKind::Faces, index: 6, .. })
        ));
    }

    #[test]
    fn test_format_errors_abort_load() {
        let err = BspAsset::from_bytes(vec![30, 0, 0, 0], &LoaderConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::Format(FormatError::HeaderTooSmall { .. })));
    }

    #[test]
    fn test_load_through_file_system() {
        let root = std::env::temp_dir().join(format!("rust_hlbsp_asset_{}", std::process::id()));
        fs::create_dir_all(root.join("maps")).unwrap();
        fs::write(root.join("maps/room.bsp"), square_room().build()).unwrap();

        let files = SearchPathFileSystem::new(vec![PathBuf::from("/nonexistent"), root.clone()]);
        let config = LoaderConfig::default();
        let asset = BspAsset::load(&files, "maps/room.bsp", &config).unwrap();
        assert_eq!(asset.faces().len(), 2);

        match BspAsset::load(&files, "maps/gone.bsp", &config) {
            Err(LoadError::ResourceMissing(name)) => assert_eq!(name, "maps/gone.bsp"),
            other => panic!("expected missing resource, got {:?}", other.map(|_| ())),
        }

        let _ = fs::remove_dir_all(root);
    }
}
