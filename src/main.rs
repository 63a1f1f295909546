#![warn(non_snake_case)]
//! # bsp-inspect
//!
//! Loads a Half-Life map and prints what it contains.
//!
//! ```text
//! bsp-inspect [--config loader.json] [--entities] [--lightmap FACE --out OUT.png] MAP
//! ```
//!
//! `MAP` is either a path to a `.bsp` file or a game-relative name such as
//! `maps/c1a0.bsp`, looked up in the configured search paths. Set
//! `RUST_LOG=debug` for per-lump detail.

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use rust_hlbsp::{BspAsset, LoaderConfig, SearchPathFileSystem};

#[derive(Parser, Debug)]
#[command(name = "bsp-inspect", version, about = "Summarise a Half-Life BSP map")]
struct Cli {
    /// A `.bsp` file on disk, or a name relative to the search paths.
    map: String,

    /// Loader configuration in JSON.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the entity lump as JSON.
    #[arg(long)]
    entities: bool,

    /// Export the lightmap of this face.
    #[arg(long, value_name = "FACE", requires = "out")]
    lightmap: Option<usize>,

    /// Where to write the exported lightmap.
    #[arg(long, value_name = "PNG", requires = "lightmap")]
    out: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoaderConfig::from_file(path)?,
        None => LoaderConfig::default(),
    };

    let asset = if Path::new(&cli.map).is_file() {
        info!("Reading {}", cli.map);
        BspAsset::from_bytes(std::fs::read(&cli.map)?, &config)?
    } else {
        let files = SearchPathFileSystem::new(config.search_paths.clone());
        info!("Searching {} paths for {}", files.search_paths().len(), cli.map);
        BspAsset::load(&files, &cli.map, &config)?
    };

    let entities = asset.entities();
    println!("version     {}", asset.file().version());
    println!("entities    {}", entities.len());
    println!("faces       {}", asset.faces().len());
    println!("vertices    {}", asset.vertices().len());
    println!("textures    {}", asset.textures().len());
    println!("models      {}", asset.models().len());
    println!("sky         {}", entities.sky_name());
    println!("wads        {}", entities.wad_files().join(", "));
    match asset.collision() {
        Some(tree) => println!("hull {}      {} nodes", config.clip.hull, tree.nodes().len()),
        None => println!("hull {}      missing", config.clip.hull),
    }

    if cli.entities {
        println!("{}", serde_json::to_string_pretty(entities)?);
    }

    if let (Some(face), Some(out)) = (cli.lightmap, &cli.out) {
        let image = asset
            .lightmap_image(face)
            .ok_or_else(|| format!("face {} has no lightmap", face))?;
        image.save(out)?;
        info!("Wrote {}x{} lightmap of face {} to {}", image.width(), image.height(), face, out.display());
    }

    Ok(())
}
