//! Composer Tests
//!
//! Tests for:
//! - Part ingestion: materials, shadows, double-sided hair, bone registry
//! - Scene membership and category exclusivity
//! - Overlay synthesis: build once, reuse, session-permanent failure
//! - Recoloring scope, invalid colors and unknown names
//! - Animation playback with the tied camera move
//! - Theme application

mod common;

use glam::Vec3;

use myth_avatar::assets::{LoadBatch, LoadOutcome, LoadedAsset, PartOrigin};
use myth_avatar::composer::Composer;
use myth_avatar::config::{
    Category, CategoryId, CategoryTable, MemoryPreferences, PreferenceStore, SceneSettings, THEME_KEY,
    Theme,
};
use myth_avatar::errors::AvatarError;
use myth_avatar::resources::{Blending, Color, ColorValue, ShadowFlags, Side};

use common::{body_asset, composer_with, empty_composer, mask_texture, mesh_part};

const EPSILON: f32 = 1e-3;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

fn base_color() -> Color {
    SceneSettings::default().base_color
}

// ============================================================================
// Ingestion
// ============================================================================

#[test]
fn ingest_part_keeps_part_out_of_scene() {
    let composer = composer_with(&["Spikey"]);
    assert!(composer.part("Spikey").is_some());
    assert!(!composer.is_in_scene("Spikey"));
    assert!(composer.scene().root_nodes().is_empty());
}

#[test]
fn ingest_part_rejects_duplicate_names() {
    let mut composer = composer_with(&["Spikey"]);
    let uuid = composer.part("Spikey").expect("part").uuid;
    assert!(!composer.ingest_part(mesh_part("Spikey"), "models/other/Spikey.glb"));
    assert_eq!(composer.part("Spikey").expect("part").uuid, uuid);
    assert_eq!(composer.registry().part_count(), 1);
}

#[test]
fn ingested_meshes_get_fresh_base_material_and_shadows() {
    let composer = composer_with(&["Body", "Eyebrows"]);
    for name in ["Body", "Eyebrows"] {
        let part = composer.part(name).expect("part");
        let (_, mesh) = composer.scene().meshes_in(part.root).next().expect("mesh");
        assert_eq!(mesh.material.color, base_color());
        assert_eq!(mesh.shadows, ShadowFlags::CAST | ShadowFlags::RECEIVE);
        assert_eq!(mesh.material.side, Side::Front);
    }

    let body = composer.part("Body").expect("body");
    let eyebrows = composer.part("Eyebrows").expect("eyebrows");
    let body_mat = &composer.scene().meshes_in(body.root).next().expect("mesh").1.material;
    let brow_mat = &composer.scene().meshes_in(eyebrows.root).next().expect("mesh").1.material;
    assert_ne!(body_mat.uuid, brow_mat.uuid);
}

#[test]
fn hair_styles_are_double_sided() {
    let composer = composer_with(&["Spikey", "Wavy"]);
    for name in ["Spikey", "Wavy"] {
        let part = composer.part(name).expect("part");
        let (_, mesh) = composer.scene().meshes_in(part.root).next().expect("mesh");
        assert_eq!(mesh.material.side, Side::Double, "{name}");
    }
}

#[test]
fn skeleton_bones_are_registered_by_name() {
    let composer = composer_with(&["Body"]);
    let registry = composer.registry();
    assert_eq!(registry.bone_count(), 2);

    let head = registry.bone("Head").expect("head bone");
    assert_eq!(composer.scene().get_node(head).map(|n| n.name.as_str()), Some("Head"));
    assert!(registry.bone("Armature").is_none());
}

#[test]
fn animated_parts_get_a_binding_with_running_base_clips() {
    let composer = composer_with(&["Body", "Eyebrows"]);
    let binding = composer.animations().binding("Body").expect("binding");
    assert!(binding.is_running("Idle"));
    assert!(binding.is_additive("LookUp"));
    assert!(!composer.animations().has_binding("Eyebrows"));
}

#[test]
fn ingest_batch_counts_and_shows_defaults() {
    let mut composer = empty_composer();
    let loaded = |path: &str, name: &str, asset| LoadOutcome::Loaded {
        path: path.to_string(),
        name: name.to_string(),
        asset,
    };
    let batch = LoadBatch {
        outcomes: vec![
            loaded("models/Body.glb", "Body", LoadedAsset::Part(body_asset())),
            loaded("models/Eyebrows.glb", "Eyebrows", LoadedAsset::Part(mesh_part("Eyebrows"))),
            loaded("models/Spikey.glb", "Spikey", LoadedAsset::Part(mesh_part("Spikey"))),
            loaded("models/more/Spikey.glb", "Spikey", LoadedAsset::Part(mesh_part("Spikey"))),
            loaded(
                "textures/Mouth_1_mask.png",
                "Mouth_1_mask",
                LoadedAsset::Texture(mask_texture("Mouth_1_mask")),
            ),
            LoadOutcome::Failed {
                path: "models/Wavy.glb".to_string(),
                error: AvatarError::AssetNotFound("models/Wavy.glb".to_string()),
            },
        ],
    };

    let summary = composer.ingest(batch);
    assert_eq!(summary.parts, 3);
    assert_eq!(summary.textures, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.duplicates, 1);

    // Only the defaults that actually loaded are shown
    assert!(composer.is_in_scene("Body"));
    assert!(composer.is_in_scene("Eyebrows"));
    assert!(!composer.is_in_scene("Spikey"));
    assert_eq!(composer.scene().root_nodes().len(), 2);
    assert!(composer.registry().texture("Mouth_1_mask").is_some());
}

fn part_batch(names: &[&str]) -> LoadBatch {
    LoadBatch {
        outcomes: names
            .iter()
            .map(|&name| LoadOutcome::Loaded {
                path: format!("models/{name}.glb"),
                name: name.to_string(),
                asset: LoadedAsset::Part(mesh_part(name)),
            })
            .collect(),
    }
}

#[test]
fn later_batches_keep_user_choices() {
    let mut composer = empty_composer();
    composer.ingest(part_batch(&["Eyebrows", "Nose Triangle", "Nose Oval"]));
    assert_eq!(composer.visible_members(CategoryId::Nose), vec!["Nose Triangle"]);

    assert!(composer.set_exclusive_style(CategoryId::Nose, "Nose Oval"));
    assert!(composer.remove_from_scene("Eyebrows"));

    composer.ingest(part_batch(&["Left Iris", "Spikey"]));
    assert_eq!(composer.visible_members(CategoryId::Nose), vec!["Nose Oval"]);
    assert!(!composer.is_in_scene("Eyebrows"));
    // Defaults arriving late are still shown once
    assert!(composer.is_in_scene("Left Iris"));
    assert!(!composer.is_in_scene("Spikey"));
}

#[test]
fn show_defaults_restores_every_default() {
    let mut composer = empty_composer();
    composer.ingest(part_batch(&["Eyebrows", "Nose Triangle", "Nose Oval"]));
    composer.set_exclusive_style(CategoryId::Nose, "Nose Oval");
    composer.remove_from_scene("Eyebrows");

    composer.show_defaults();
    assert_eq!(composer.visible_members(CategoryId::Nose), vec!["Nose Triangle"]);
    assert!(composer.is_in_scene("Eyebrows"));
}

// ============================================================================
// Membership & exclusivity
// ============================================================================

#[test]
fn add_and_remove_are_idempotent() {
    let mut composer = composer_with(&["Eyebrows"]);
    assert!(composer.add_to_scene("Eyebrows"));
    assert!(!composer.add_to_scene("Eyebrows"));
    assert_eq!(composer.scene().root_nodes().len(), 1);

    assert!(composer.remove_from_scene("Eyebrows"));
    assert!(!composer.remove_from_scene("Eyebrows"));
    assert!(composer.scene().root_nodes().is_empty());
}

#[test]
fn exclusive_style_swaps_siblings() {
    let mut composer = composer_with(&["Spikey", "Wavy"]);
    assert!(composer.set_exclusive_style(CategoryId::Hair, "Spikey"));
    assert!(composer.set_exclusive_style(CategoryId::Hair, "Wavy"));

    assert!(composer.is_in_scene("Wavy"));
    assert!(!composer.is_in_scene("Spikey"));
    assert_eq!(composer.visible_members(CategoryId::Hair), vec!["Wavy"]);
}

#[test]
fn exclusive_style_reselect_keeps_single_member() {
    let mut composer = composer_with(&["Spikey", "Wavy"]);
    composer.set_exclusive_style(CategoryId::Hair, "Wavy");
    assert!(composer.set_exclusive_style(CategoryId::Hair, "Wavy"));
    assert_eq!(composer.visible_members(CategoryId::Hair), vec!["Wavy"]);
    assert_eq!(composer.scene().root_nodes().len(), 1);
}

#[test]
fn add_to_scene_enforces_exclusivity() {
    let mut composer = composer_with(&["Spikey", "Wavy", "Eyebrows"]);
    composer.add_to_scene("Eyebrows");
    assert!(composer.add_to_scene("Spikey"));
    assert!(composer.add_to_scene("Wavy"));
    assert!(!composer.add_to_scene("Wavy"));

    assert_eq!(composer.visible_members(CategoryId::Hair), vec!["Wavy"]);
    assert!(composer.is_in_scene("Eyebrows"));
}

#[test]
fn exclusive_style_rejects_non_members() {
    let mut composer = composer_with(&["Spikey", "Eyebrows"]);
    composer.set_exclusive_style(CategoryId::Hair, "Spikey");

    assert!(!composer.set_exclusive_style(CategoryId::Hair, "Eyebrows"));
    assert!(!composer.set_exclusive_style(CategoryId::Skin, "Spikey"));
    assert!(composer.is_in_scene("Spikey"));
    assert!(!composer.is_in_scene("Eyebrows"));
}

#[test]
fn missing_style_empties_its_category() {
    let mut composer = composer_with(&["Spikey"]);
    composer.set_exclusive_style(CategoryId::Hair, "Spikey");

    assert!(!composer.set_exclusive_style(CategoryId::Hair, "Wavy"));
    assert!(composer.visible_members(CategoryId::Hair).is_empty());
}

#[test]
fn unknown_names_leave_scene_unchanged() {
    let mut composer = composer_with(&["Eyebrows"]);
    composer.add_to_scene("Eyebrows");
    let before = composer.scene().root_nodes().to_vec();

    assert!(!composer.add_to_scene("Ghost"));
    assert!(!composer.remove_from_scene("Ghost"));
    assert_eq!(composer.recolor("#ff0000", &["Ghost"]), 0);
    assert!(!composer.is_in_scene("Ghost"));
    assert!(composer.part_color("Ghost").is_none());

    assert_eq!(composer.scene().root_nodes(), before.as_slice());
    assert_eq!(composer.part_color("Eyebrows"), Some(base_color()));
}

// ============================================================================
// Overlay synthesis
// ============================================================================

fn mouth_composer() -> Composer {
    let mut composer = composer_with(&["Body"]);
    composer.insert_texture("Mouth_1_mask", mask_texture("Mouth_1_mask"));
    composer.add_to_scene("Body");
    composer
}

#[test]
fn overlay_is_built_on_first_selection() {
    let mut composer = mouth_composer();
    assert!(composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1"));
    assert_eq!(composer.overlay_build_count(), 1);

    let part = composer.part("Mouth 1").expect("overlay part");
    assert!(part.is_synthesized());
    assert_eq!(
        part.origin,
        PartOrigin::Synthesized {
            style: "Mouth 1".to_string()
        }
    );
    assert!(composer.is_in_scene("Mouth 1"));
    assert!(composer.is_in_scene("Body"));
}

#[test]
fn overlay_shares_body_skeleton_and_offsets_geometry() {
    let mut composer = mouth_composer();
    composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1");

    let body = composer.part("Body").expect("body");
    let overlay = composer.part("Mouth 1").expect("overlay");
    let (_, body_mesh) = composer.scene().meshes_in(body.root).next().expect("body mesh");
    let (_, mesh) = composer.scene().meshes_in(overlay.root).next().expect("overlay mesh");

    let body_skin = body_mesh.skin.as_ref().expect("body skin");
    let skin = mesh.skin.as_ref().expect("overlay skin");
    assert_eq!(skin.skeleton, body_skin.skeleton);
    assert_eq!(skin.bind_matrix, body_skin.bind_matrix);

    assert_ne!(mesh.geometry.uuid, body_mesh.geometry.uuid);
    for (p, q) in mesh.geometry.positions.iter().zip(&body_mesh.geometry.positions) {
        assert!(approx_vec3(*p, *q + Vec3::new(0.0, 0.0, 0.01)));
    }
    // The body's own geometry is untouched
    assert!(approx_vec3(body_mesh.geometry.positions[0], Vec3::new(-0.1, 1.5, 0.1)));
}

#[test]
fn overlay_material_is_alpha_masked() {
    let mut composer = mouth_composer();
    composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1");

    let overlay = composer.part("Mouth 1").expect("overlay");
    let (_, mesh) = composer.scene().meshes_in(overlay.root).next().expect("mesh");
    let material = &mesh.material;

    assert_eq!(material.color, Color::from_hex(0x72_5147));
    assert!(material.alpha_map.is_some());
    assert!(material.map.is_some());
    assert!(material.transparent);
    assert!(!material.depth_write);
    assert_eq!(material.blending, Blending::ALPHA_OVER);
}

#[test]
fn overlay_without_mask_is_still_built() {
    let mut composer = mouth_composer();
    assert!(composer.set_exclusive_style(CategoryId::Mouth, "Mouth 2"));

    let overlay = composer.part("Mouth 2").expect("overlay");
    let (_, mesh) = composer.scene().meshes_in(overlay.root).next().expect("mesh");
    assert!(mesh.material.alpha_map.is_none());
}

#[test]
fn overlay_is_reused_on_reselection() {
    let mut composer = mouth_composer();
    composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1");
    let uuid = composer.part("Mouth 1").expect("overlay").uuid;

    composer.set_exclusive_style(CategoryId::Mouth, "Mouth 2");
    assert!(!composer.is_in_scene("Mouth 1"));
    assert_eq!(composer.overlay_build_count(), 2);

    assert!(composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1"));
    assert_eq!(composer.overlay_build_count(), 2);
    assert_eq!(composer.part("Mouth 1").expect("overlay").uuid, uuid);
    assert_eq!(composer.visible_members(CategoryId::Mouth), vec!["Mouth 1"]);
}

#[test]
fn overlay_failure_is_not_retried() {
    let mut composer = empty_composer();
    assert!(!composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1"));
    assert_eq!(composer.overlay_build_count(), 0);
    assert!(composer.part("Mouth 1").is_none());

    // A body arriving later does not revive the failed style
    assert!(composer.ingest_part(body_asset(), "models/Body.glb"));
    assert!(!composer.set_exclusive_style(CategoryId::Mouth, "Mouth 1"));
    assert_eq!(composer.overlay_build_count(), 0);

    // Other styles are still attempted
    assert!(composer.set_exclusive_style(CategoryId::Mouth, "Mouth 2"));
    assert_eq!(composer.overlay_build_count(), 1);
}

#[test]
fn overlay_needs_a_skinned_base() {
    let mut composer = empty_composer();
    assert!(composer.ingest_part(mesh_part("Body"), "models/Body.glb"));
    assert!(!composer.set_exclusive_style(CategoryId::Mouth, "Mouth 3"));
    assert!(composer.visible_members(CategoryId::Mouth).is_empty());
}

// ============================================================================
// Color
// ============================================================================

#[test]
fn recolor_touches_only_targets() {
    let mut composer = composer_with(&["Body", "Spikey", "Wavy", "Eyebrows"]);
    assert_eq!(composer.recolor("#583c36", &["Spikey", "Wavy"]), 2);

    let hair = Color::from_hex(0x58_3c36);
    assert_eq!(composer.part_color("Spikey"), Some(hair));
    assert_eq!(composer.part_color("Wavy"), Some(hair));
    assert_eq!(composer.part_color("Eyebrows"), Some(base_color()));
    assert_eq!(composer.part_color("Body"), Some(base_color()));
}

#[test]
fn recolor_accepts_every_color_form() {
    let mut composer = composer_with(&["Body"]);
    composer.recolor(0x00ff_00_u32, &["Body"]);
    assert_eq!(composer.part_color("Body"), Some(Color::from_hex(0x00_ff00)));

    composer.recolor(Color::BLACK, &["Body"]);
    assert_eq!(composer.part_color("Body"), Some(Color::BLACK));

    composer.recolor(ColorValue::Css("#fff".to_string()), &["Body"]);
    assert_eq!(composer.part_color("Body"), Some(Color::WHITE));
}

#[test]
fn recolor_with_invalid_color_is_ignored() {
    let mut composer = composer_with(&["Body"]);
    assert_eq!(composer.recolor("not-a-color", &["Body"]), 0);
    assert_eq!(composer.part_color("Body"), Some(base_color()));
}

#[test]
fn recolor_category_uses_declared_targets() {
    let mut composer = composer_with(&["Spikey", "Wavy", "Eyebrows", "Body"]);
    assert_eq!(composer.recolor_category(CategoryId::Hair, "#814043"), 3);
    assert_eq!(composer.part_color("Eyebrows"), Some(Color::from_hex(0x81_4043)));
    assert_eq!(composer.part_color("Body"), Some(base_color()));

    assert_eq!(composer.recolor_category(CategoryId::Top, "#814043"), 0);
}

#[test]
fn recolor_applies_to_hidden_parts() {
    let mut composer = composer_with(&["Spikey"]);
    assert!(!composer.is_in_scene("Spikey"));
    assert_eq!(composer.recolor("#3087d0", &["Spikey"]), 1);
    assert_eq!(composer.part_color("Spikey"), Some(Color::from_hex(0x30_87d0)));
}

#[test]
fn custom_catalog_swaps_and_recolors() {
    let table = CategoryTable::new(vec![
        Category::new(CategoryId::Hair)
            .with_exclusive(&["Hair_Spikey", "Hair_Wavy"])
            .double_sided()
            .with_recolor(&["Hair_Spikey", "Hair_Wavy"], &["#583c36"]),
    ])
    .expect("valid table");
    let mut composer = Composer::new(SceneSettings::default(), table);
    for name in ["Hair_Spikey", "Hair_Wavy"] {
        composer.ingest_part(mesh_part(name), &format!("models/{name}.glb"));
    }

    composer.set_exclusive_style(CategoryId::Hair, "Hair_Spikey");
    composer.set_exclusive_style(CategoryId::Hair, "Hair_Wavy");
    composer.recolor("#583c36", &["Hair_Spikey", "Hair_Wavy"]);

    assert!(composer.is_in_scene("Hair_Wavy"));
    assert!(!composer.is_in_scene("Hair_Spikey"));
    let hair = Color::from_hex(0x58_3c36);
    assert_eq!(composer.part_color("Hair_Spikey"), Some(hair));
    assert_eq!(composer.part_color("Hair_Wavy"), Some(hair));
}

#[test]
fn floor_and_background_colors() {
    let mut composer = empty_composer();
    assert!(composer.update_floor_color("#34984f"));
    assert_eq!(composer.floor_material().color, Color::from_hex(0x34_984f));
    assert!(!composer.update_floor_color("nope"));
    assert_eq!(composer.floor_material().color, Color::from_hex(0x34_984f));

    assert!(composer.set_background(0x10_1010_u32));
    assert_eq!(composer.scene().background, Color::from_hex(0x10_1010));
}

// ============================================================================
// Animation & camera
// ============================================================================

#[test]
fn play_animation_moves_camera_without_any_parts() {
    let mut composer = empty_composer();
    assert_eq!(composer.play_animation(&["Body"], "LookUp"), 0);
    assert!(composer.is_camera_moving());
    assert!(composer.scene().root_nodes().is_empty());

    composer.advance(0.25);
    assert!(approx_vec3(composer.camera().position(), Vec3::new(0.0, 1.6, 4.0)));

    composer.advance(0.25);
    composer.advance(0.1);
    let settings = SceneSettings::default();
    assert!(approx_vec3(composer.camera().position(), settings.camera.look_up_position));
    assert!(!composer.is_camera_moving());
    assert!(approx_vec3(composer.controls().target, settings.camera.target));
}

#[test]
fn play_animation_drives_loaded_parts() {
    let mut composer = composer_with(&["Body"]);
    assert_eq!(composer.play_animation(&["Body", "Eyebrows"], "LookUp"), 1);
    composer.advance(1.2);

    let binding = composer.animations().binding("Body").expect("binding");
    let look_up = binding.mixer.action("LookUp").expect("action");
    assert!(look_up.is_running());
    assert!(look_up.is_finished());
    assert!(binding.is_running("Idle"));

    let head = composer.registry().bone("Head").expect("head");
    let rotation = composer.scene().get_node(head).expect("node").transform.rotation;
    assert!(rotation.dot(common::look_up_pitch()).abs() > 1.0 - 1e-5);
}

#[test]
fn unrelated_action_does_not_move_camera() {
    let mut composer = composer_with(&["Body"]);
    assert_eq!(composer.play_animation(&["Body"], "Idle"), 1);
    assert!(!composer.is_camera_moving());
}

#[test]
fn reset_camera_snaps_to_rest_pose() {
    let mut composer = empty_composer();
    composer.play_animation(&["Body"], "LookUp");
    composer.advance(0.1);
    composer.reset_camera();

    assert!(!composer.is_camera_moving());
    assert!(approx_vec3(composer.camera().position(), SceneSettings::default().camera.position));
}

// ============================================================================
// Themes
// ============================================================================

#[test]
fn apply_theme_recolors_and_persists() {
    let mut composer = empty_composer();
    let mut store = MemoryPreferences::new();
    let theme = Theme {
        name: "Forest".to_string(),
        primary: Color::from_hex(0x34_984f),
        background: Color::from_hex(0x10_2010),
        ..Theme::default()
    };

    composer.apply_theme(&theme, &mut store).expect("saved");
    assert_eq!(composer.floor_material().color, theme.primary);
    assert_eq!(composer.scene().background, theme.background);
    assert!(store.get(THEME_KEY).is_some());
    assert_eq!(Theme::load(&store), Some(theme));
}

#[test]
fn saved_theme_is_applied_at_startup() {
    let mut store = MemoryPreferences::new();
    let theme = Theme {
        name: "Dusk".to_string(),
        primary: Color::from_hex(0x81_4043),
        ..Theme::default()
    };
    theme.save(&mut store).expect("saved");

    let mut composer = empty_composer();
    composer.apply_saved_theme(&store);
    assert_eq!(composer.floor_material().color, Color::from_hex(0x81_4043));
}

#[test]
fn missing_theme_falls_back_to_default() {
    let mut composer = empty_composer();
    composer.update_floor_color("#000000");
    composer.apply_saved_theme(&MemoryPreferences::new());
    assert_eq!(
        composer.floor_material().color,
        SceneSettings::default().default_theme.primary
    );
}
