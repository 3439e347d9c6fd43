//! Asset Loading Tests
//!
//! Tests for:
//! - GltfLoader: binary glTF parsing into a PartAsset
//! - AssetLoader: concurrent loads, per-path failures, progress reporting
//! - Texture decoding
//! - Ingesting a load batch into the composer
//! - FileAssetReader against a temporary directory

mod common;

use myth_avatar::assets::{
    AssetLoader, AssetManifest, FileAssetReader, GltfLoader, LoadOutcome, LoadedAsset,
    MemoryAssetReader,
};
use myth_avatar::errors::AvatarError;
use myth_avatar::resources::ColorSpace;

use common::{empty_composer, png_bytes, triangle_glb};

fn manifest(parts: &[&str], textures: &[&str]) -> AssetManifest {
    AssetManifest {
        parts: parts.iter().map(|s| (*s).to_string()).collect(),
        textures: textures.iter().map(|s| (*s).to_string()).collect(),
    }
}

// ============================================================================
// GltfLoader
// ============================================================================

#[test]
fn gltf_parses_single_mesh_part() {
    let part = GltfLoader::parse("Tri", &triangle_glb("Tri")).expect("parse");
    assert_eq!(part.name, "Tri");
    assert_eq!(part.nodes.len(), 1);
    assert_eq!(part.roots, vec![0]);
    assert_eq!(part.mesh_count(), 1);
    assert!(part.skeletons.is_empty());
    assert!(part.clips.is_empty());

    let mesh = part.nodes[0].mesh.as_ref().expect("mesh");
    assert_eq!(mesh.geometry.vertex_count(), 3);
    assert!(!mesh.geometry.is_skinned());
}

#[test]
fn gltf_rejects_garbage() {
    let result = GltfLoader::parse("Broken", b"definitely not a glb");
    assert!(matches!(result, Err(AvatarError::GltfError(_))));
}

// ============================================================================
// AssetLoader
// ============================================================================

#[test]
fn load_all_settles_every_path() {
    let reader = MemoryAssetReader::new()
        .with("models/Tri.glb", triangle_glb("Tri"))
        .with("models/Broken.glb", b"garbage".to_vec())
        .with("textures/Mouth_1_mask.png", png_bytes());
    let loader = AssetLoader::new(reader);

    let batch = pollster::block_on(loader.load_all(&manifest(
        &["models/Tri.glb", "models/Broken.glb", "models/Missing.glb"],
        &["textures/Mouth_1_mask.png"],
    )));

    assert_eq!(batch.outcomes.len(), 4);
    assert_eq!(batch.loaded_count(), 2);
    assert_eq!(batch.failed_count(), 2);

    let missing = batch
        .outcomes
        .iter()
        .find(|o| o.path() == "models/Missing.glb")
        .expect("outcome");
    assert!(matches!(
        missing,
        LoadOutcome::Failed {
            error: AvatarError::AssetNotFound(_),
            ..
        }
    ));

    let tri = batch
        .outcomes
        .iter()
        .find(|o| o.path() == "models/Tri.glb")
        .expect("outcome");
    let LoadOutcome::Loaded {
        name,
        asset: LoadedAsset::Part(part),
        ..
    } = tri
    else {
        panic!("expected a loaded part");
    };
    assert_eq!(name, "Tri");
    assert_eq!(part.name, "Tri");
}

#[test]
fn load_all_reports_progress_per_path() {
    let reader = MemoryAssetReader::new().with("models/Tri.glb", triangle_glb("Tri"));
    let loader = AssetLoader::new(reader);

    let mut seen = Vec::new();
    let batch = pollster::block_on(loader.load_all_with_progress(
        &manifest(&["models/Tri.glb", "models/Nope.glb"], &["textures/Nope.png"]),
        |p| seen.push((p.settled, p.total, p.ok, p.is_complete())),
    ));

    assert_eq!(batch.outcomes.len(), 3);
    assert_eq!(seen.len(), 3);
    assert_eq!(
        seen.iter().map(|s| s.0).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(seen.iter().all(|s| s.1 == 3));
    assert_eq!(seen.iter().filter(|s| s.2).count(), 1);
    assert!(seen.last().expect("progress").3);
}

#[test]
fn load_all_with_empty_manifest() {
    let loader = AssetLoader::new(MemoryAssetReader::new());
    let batch = pollster::block_on(loader.load_all(&AssetManifest::default()));
    assert!(batch.outcomes.is_empty());
}

#[test]
fn loaded_textures_are_surface_maps() {
    let reader = MemoryAssetReader::new().with("textures/Mouth_1_mask.png", png_bytes());
    let loader = AssetLoader::new(reader);

    let texture = pollster::block_on(loader.load_texture("textures/Mouth_1_mask.png")).expect("texture");
    assert_eq!(texture.name, "Mouth_1_mask");
    assert_eq!((texture.width, texture.height), (2, 2));
    assert_eq!(texture.data.len(), 2 * 2 * 4);
    assert!(!texture.flip_y);
    assert_eq!(texture.color_space, ColorSpace::Srgb);
}

#[test]
fn load_batch_ingests_into_composer() {
    let reader = MemoryAssetReader::new()
        .with("models/Eyebrows.glb", triangle_glb("Eyebrows"))
        .with("models/Spikey.glb", triangle_glb("Spikey"))
        .with("textures/Mouth_1_mask.png", png_bytes());
    let loader = AssetLoader::new(reader);
    let batch = pollster::block_on(loader.load_all(&manifest(
        &["models/Eyebrows.glb", "models/Spikey.glb", "models/Body.glb"],
        &["textures/Mouth_1_mask.png"],
    )));

    let mut composer = empty_composer();
    let summary = composer.ingest(batch);

    assert_eq!(summary.parts, 2);
    assert_eq!(summary.textures, 1);
    assert_eq!(summary.failed, 1);
    assert!(composer.is_in_scene("Eyebrows"));
    assert!(!composer.is_in_scene("Spikey"));
    assert!(!composer.is_in_scene("Body"));
}

// ============================================================================
// FileAssetReader
// ============================================================================

#[test]
fn file_reader_loads_from_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("models")).expect("mkdir");
    std::fs::write(dir.path().join("models/Tri.glb"), triangle_glb("Tri")).expect("write");

    let loader = AssetLoader::new(FileAssetReader::new(dir.path()));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");

    let batch = runtime.block_on(loader.load_all(&manifest(&["models/Tri.glb", "models/Gone.glb"], &[])));
    assert_eq!(batch.loaded_count(), 1);

    let gone = batch
        .outcomes
        .iter()
        .find(|o| o.path() == "models/Gone.glb")
        .expect("outcome");
    assert!(matches!(
        gone,
        LoadOutcome::Failed {
            error: AvatarError::AssetNotFound(_),
            ..
        }
    ));
}

#[test]
fn file_reader_accepts_a_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = dir.path().join("settings.json");
    std::fs::write(&settings, "{}").expect("write");

    let reader = FileAssetReader::new(&settings);
    assert_eq!(reader.root_path(), dir.path());
}
