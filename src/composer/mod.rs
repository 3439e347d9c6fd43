//! Scene composition.
//!
//! [`Composer`] owns the scene graph, the part registry and the animation
//! coordinator, and is the only writer of part membership and color. Every
//! operation tolerates names that are not (or not yet) loaded: it logs and
//! leaves the scene unchanged, so the frame loop never stops on a missing
//! asset.
//!
//! Exclusivity is enforced on every entry point: adding a member of an
//! exclusive category removes its siblings first.

mod overlay;

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::animation::coordinator::AnimationCoordinator;
use crate::assets::part::PartAsset;
use crate::assets::registry::{AssetRegistry, Part, PartOrigin};
use crate::assets::server::{LoadBatch, LoadOutcome, LoadedAsset};
use crate::config::category::{Category, CategoryId, CategoryTable, OverlaySpec};
use crate::config::preferences::{PreferenceStore, Theme};
use crate::config::settings::SceneSettings;
use crate::errors::Result;
use crate::resources::color::{Color, ColorValue};
use crate::resources::material::{Material, Side};
use crate::resources::mesh::ShadowFlags;
use crate::resources::texture::Texture;
use crate::scene::camera::Camera;
use crate::scene::{NodeHandle, Scene};
use crate::utils::camera_move::CameraMover;
use crate::utils::orbit_control::OrbitControls;

/// Counts reported by [`Composer::ingest`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub parts: usize,
    pub textures: usize,
    pub failed: usize,
    /// Names that were already registered.
    pub duplicates: usize,
}

pub struct Composer {
    settings: SceneSettings,
    categories: CategoryTable,

    scene: Scene,
    registry: AssetRegistry,
    animations: AnimationCoordinator,

    // ==== Camera rig ====
    camera: Camera,
    controls: OrbitControls,
    camera_mover: CameraMover,

    floor_material: Material,

    // Styles whose synthesis failed; not retried this session
    failed_overlays: FxHashSet<String>,
    // Default parts already put in the scene once
    shown_defaults: FxHashSet<String>,
    overlay_builds: usize,
    clock: f32,
}

impl Composer {
    #[must_use]
    pub fn new(settings: SceneSettings, categories: CategoryTable) -> Self {
        let cam = &settings.camera;
        let mut camera = Camera::new_perspective(cam.fov, 1.0, cam.near, cam.far);
        camera.set_position(cam.position);

        let mut controls = OrbitControls::from_settings(cam);
        controls.update(&mut camera.transform, 0.0);

        let mut scene = Scene::new();
        scene.background = settings.background;

        let floor_material = Material::new_phong(
            settings.default_theme.primary,
            settings.floor.shininess,
        );

        Self {
            animations: AnimationCoordinator::new(settings.animation.clone()),
            settings,
            categories,
            scene,
            registry: AssetRegistry::new(),
            camera,
            controls,
            camera_mover: CameraMover::new(),
            floor_material,
            failed_overlays: FxHashSet::default(),
            shown_defaults: FxHashSet::default(),
            overlay_builds: 0,
            clock: 0.0,
        }
    }

    // ========================================================================
    // Theme
    // ========================================================================

    /// Seeds floor and background from the saved theme, or from the default
    /// theme when nothing usable is stored.
    pub fn apply_saved_theme(&mut self, store: &dyn PreferenceStore) {
        let theme = Theme::load(store).unwrap_or_else(|| self.settings.default_theme.clone());
        log::info!("Using theme '{}'", theme.name);
        self.update_floor_color(theme.primary);
        self.set_background(theme.background);
    }

    /// Recolors floor and background, then persists `theme`.
    ///
    /// The scene is updated even when persisting fails.
    pub fn apply_theme(&mut self, theme: &Theme, store: &mut dyn PreferenceStore) -> Result<()> {
        self.update_floor_color(theme.primary);
        self.set_background(theme.background);
        theme.save(store)
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Registers everything a load pass produced, then shows the default
    /// parts. Textures go first so overlays built later can find their masks.
    pub fn ingest(&mut self, batch: LoadBatch) -> IngestSummary {
        let mut summary = IngestSummary::default();
        let mut parts = Vec::new();

        for outcome in batch.outcomes {
            match outcome {
                LoadOutcome::Loaded {
                    name,
                    asset: LoadedAsset::Texture(texture),
                    ..
                } => {
                    if self.insert_texture(&name, texture) {
                        summary.textures += 1;
                    } else {
                        summary.duplicates += 1;
                    }
                }
                LoadOutcome::Loaded {
                    path,
                    asset: LoadedAsset::Part(part),
                    ..
                } => parts.push((path, part)),
                LoadOutcome::Failed { .. } => summary.failed += 1,
            }
        }

        for (path, part) in parts {
            if self.ingest_part(part, &path) {
                summary.parts += 1;
            } else {
                summary.duplicates += 1;
            }
        }

        self.show_new_defaults();

        log::info!(
            "Ingested {} parts, {} textures ({} failed, {} duplicates)",
            summary.parts,
            summary.textures,
            summary.failed,
            summary.duplicates
        );
        summary
    }

    /// Instantiates a loaded part: fresh base-color material per mesh, shadows
    /// on, double-sided for double-sided category members, bones registered,
    /// clips bound. Returns `false` when the name is already registered.
    pub fn ingest_part(&mut self, mut asset: PartAsset, path: &str) -> bool {
        if self.registry.contains_part(&asset.name) {
            log::warn!("Part '{}' already loaded, ignoring '{path}'", asset.name);
            return false;
        }

        let base_color = self.settings.base_color;
        let part_double_sided = self.categories.is_double_sided(&asset.name);
        let categories = &self.categories;

        let root = self.scene.instantiate(&asset, |mesh| {
            let side = if part_double_sided || categories.is_double_sided(&mesh.name) {
                Side::Double
            } else {
                Side::Front
            };
            Material::new_standard(base_color).with_side(side)
        });

        self.scene.for_each_mesh_mut(root, |mesh| {
            mesh.shadows = ShadowFlags::CAST | ShadowFlags::RECEIVE;
        });

        for handle in self.scene.traverse(root) {
            if let Some(node) = self.scene.get_node(handle)
                && node.is_bone
            {
                self.registry.register_bone(&node.name, handle);
            }
        }

        let clips = std::mem::take(&mut asset.clips);
        self.animations.bind_part(&asset.name, root, clips, &self.scene);

        self.registry.insert_part(Part::new(
            asset.name,
            root,
            PartOrigin::Loaded {
                path: path.to_string(),
            },
        ))
    }

    pub fn insert_texture(&mut self, name: &str, texture: Texture) -> bool {
        self.registry.insert_texture(name, Arc::new(texture))
    }

    /// Adds every configured default part to the scene, including ones the
    /// user has since removed or replaced.
    pub fn show_defaults(&mut self) {
        let defaults = self.settings.default_parts.clone();
        for name in defaults {
            self.add_to_scene(&name);
            if self.registry.part(&name).is_some() {
                self.shown_defaults.insert(name);
            }
        }
    }

    /// Shows defaults that became available since the last ingest. Defaults
    /// shown before are left alone so later batches keep the user's choices.
    fn show_new_defaults(&mut self) {
        let pending: Vec<String> = self
            .settings
            .default_parts
            .iter()
            .filter(|name| !self.shown_defaults.contains(name.as_str()))
            .filter(|name| self.registry.part(name).is_some())
            .cloned()
            .collect();
        for name in pending {
            self.add_to_scene(&name);
            self.shown_defaults.insert(name);
        }
    }

    // ========================================================================
    // Membership
    // ========================================================================

    /// Adds the named part to the scene. Returns `true` if it was not
    /// present before.
    ///
    /// Members of an exclusive category displace their siblings.
    pub fn add_to_scene(&mut self, name: &str) -> bool {
        if let Some(id) = self.categories.exclusive_category_of(name).map(|c| c.id) {
            let was_present = self.is_in_scene(name);
            return self.set_exclusive_style(id, name) && !was_present;
        }

        let Some(part) = self.registry.part(name) else {
            log::debug!("add_to_scene: no part named '{name}'");
            return false;
        };
        self.scene.add(part.root)
    }

    /// Removes the named part from the scene. Returns `true` if it was
    /// present.
    pub fn remove_from_scene(&mut self, name: &str) -> bool {
        let Some(part) = self.registry.part(name) else {
            log::debug!("remove_from_scene: no part named '{name}'");
            return false;
        };
        self.scene.remove(part.root)
    }

    /// Makes `style` the only member of `category` in the scene.
    ///
    /// All members are removed first; a missing style is synthesized when the
    /// category declares an overlay spec. Returns whether `style` is in the
    /// scene afterwards.
    pub fn set_exclusive_style(&mut self, category: CategoryId, style: &str) -> bool {
        let Some((members, synthesis)) = self.exclusive_members(category) else {
            log::warn!("Category '{category}' has no exclusive styles");
            return false;
        };
        if !members.iter().any(|m| m == style) {
            log::warn!("'{style}' is not a style of category '{category}'");
            return false;
        }

        for member in &members {
            if let Some(part) = self.registry.part(member) {
                self.scene.remove(part.root);
            }
        }

        if !self.registry.contains_part(style)
            && let Some(spec) = synthesis
        {
            self.synthesize_overlay(style, &spec);
        }

        match self.registry.part(style) {
            Some(part) => {
                self.scene.add(part.root);
                true
            }
            None => {
                log::debug!("set_exclusive_style: '{style}' unavailable, category '{category}' left empty");
                false
            }
        }
    }

    fn exclusive_members(&self, id: CategoryId) -> Option<(Vec<String>, Option<OverlaySpec>)> {
        let set = self.categories.get(id)?.exclusive.as_ref()?;
        Some((set.members.clone(), set.synthesis.clone()))
    }

    /// Builds and registers the overlay for `style` once. Failures are
    /// remembered and not retried.
    fn synthesize_overlay(&mut self, style: &str, spec: &OverlaySpec) -> Option<NodeHandle> {
        if self.failed_overlays.contains(style) {
            log::debug!("Overlay '{style}' failed earlier, not retrying");
            return None;
        }

        match overlay::build_overlay(&mut self.scene, &self.registry, style, spec) {
            Ok(root) => {
                self.overlay_builds += 1;
                self.registry.insert_part(Part::new(
                    style,
                    root,
                    PartOrigin::Synthesized {
                        style: style.to_string(),
                    },
                ));
                log::info!("Synthesized overlay '{style}'");
                Some(root)
            }
            Err(e) => {
                log::error!("{e}");
                self.failed_overlays.insert(style.to_string());
                None
            }
        }
    }

    // ========================================================================
    // Color
    // ========================================================================

    /// Sets the material color of every mesh of every named part. Unknown
    /// names are skipped. Returns how many parts were recolored.
    pub fn recolor<S: AsRef<str>>(&mut self, color: impl Into<ColorValue>, targets: &[S]) -> usize {
        let color = match color.into().normalize() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("recolor ignored: {e}");
                return 0;
            }
        };

        let mut count = 0;
        for target in targets {
            let name = target.as_ref();
            let Some(part) = self.registry.part(name) else {
                log::debug!("recolor: no part named '{name}'");
                continue;
            };
            let root = part.root;
            self.scene.for_each_mesh_mut(root, |mesh| mesh.material.color = color);
            count += 1;
        }
        count
    }

    /// Recolors the declared recolor targets of `category`.
    pub fn recolor_category(&mut self, category: CategoryId, color: impl Into<ColorValue>) -> usize {
        let targets = self
            .categories
            .get(category)
            .map(|c| c.recolor_targets().to_vec())
            .unwrap_or_default();
        if targets.is_empty() {
            log::debug!("Category '{category}' has no recolor targets");
            return 0;
        }
        self.recolor(color, &targets)
    }

    pub fn update_floor_color(&mut self, color: impl Into<ColorValue>) -> bool {
        match color.into().normalize() {
            Ok(c) => {
                self.floor_material.color = c;
                true
            }
            Err(e) => {
                log::warn!("Floor color ignored: {e}");
                false
            }
        }
    }

    pub fn set_background(&mut self, color: impl Into<ColorValue>) -> bool {
        match color.into().normalize() {
            Ok(c) => {
                self.scene.background = c;
                true
            }
            Err(e) => {
                log::warn!("Background color ignored: {e}");
                false
            }
        }
    }

    // ========================================================================
    // Animation & camera
    // ========================================================================

    /// Starts the camera move tied to `action` and plays `action` on every
    /// target part that has it. The camera moves even when no part plays.
    /// Returns how many parts started the action.
    pub fn play_animation<S: AsRef<str>>(&mut self, targets: &[S], action: &str) -> usize {
        self.move_camera(action);
        self.animations.play(targets, action)
    }

    /// Starts the scripted camera move for `action`, from wherever the camera
    /// is now. Returns `false` for actions without a camera pose.
    pub fn move_camera(&mut self, action: &str) -> bool {
        let cam = &self.settings.camera;
        let destination = if action == cam.look_up_action {
            cam.look_up_position
        } else if action == cam.look_back_action {
            cam.position
        } else {
            log::debug!("No camera pose for action '{action}'");
            return false;
        };

        self.camera_mover.start(
            self.camera.position(),
            destination,
            cam.target,
            self.clock,
            cam.move_duration,
        );
        self.camera_mover
            .step(self.clock, &mut self.camera, &mut self.controls);
        true
    }

    /// Snaps the camera back to the resting pose.
    pub fn reset_camera(&mut self) {
        let cam = &self.settings.camera;
        self.camera_mover.cancel();
        self.camera.set_position(cam.position);
        self.controls.target = cam.target;
        self.controls.stop();
        self.controls.update(&mut self.camera.transform, 0.0);
    }

    /// Per-frame update: animations, scripted camera move, orbit controls.
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock += dt;
        self.animations.advance(dt, &mut self.scene);
        self.camera_mover
            .step(self.clock, &mut self.camera, &mut self.controls);
        self.controls.update(&mut self.camera.transform, dt);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn is_in_scene(&self, name: &str) -> bool {
        self.registry
            .part(name)
            .is_some_and(|p| self.scene.contains(p.root))
    }

    /// Color of the first mesh of the named part.
    #[must_use]
    pub fn part_color(&self, name: &str) -> Option<Color> {
        let part = self.registry.part(name)?;
        self.scene
            .meshes_in(part.root)
            .next()
            .map(|(_, mesh)| mesh.material.color)
    }

    /// Members of `category` currently in the scene.
    #[must_use]
    pub fn visible_members(&self, category: CategoryId) -> Vec<&str> {
        self.categories
            .get(category)
            .map(Category::members)
            .unwrap_or_default()
            .iter()
            .filter(|m| self.is_in_scene(m))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.registry.part(name)
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    #[must_use]
    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    #[must_use]
    pub fn animations(&self) -> &AnimationCoordinator {
        &self.animations
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    #[must_use]
    pub fn is_camera_moving(&self) -> bool {
        self.camera_mover.is_active()
    }

    #[must_use]
    pub fn floor_material(&self) -> &Material {
        &self.floor_material
    }

    /// Number of overlays built so far.
    #[must_use]
    pub fn overlay_build_count(&self) -> usize {
        self.overlay_builds
    }

    /// Seconds advanced since construction.
    #[must_use]
    pub fn clock(&self) -> f32 {
        self.clock
    }
}
