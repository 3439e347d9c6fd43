//! Headless Composer Example
//!
//! Loads the asset manifest from a settings file, ingests everything that
//! loaded and replays a short scripted customization session against the
//! composer, logging what happens.
//!
//! Usage:
//!   cargo run --example headless_composer -- [settings.json] [asset_dir]
//!
//! Missing assets are reported and skipped; the session still runs.

use std::time::Duration;

use myth_avatar::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => SceneSettings::load(path)?,
        None => SceneSettings::default(),
    };
    let asset_dir = args.next().unwrap_or_else(|| "demos/assets".to_string());

    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let loader = AssetLoader::new(FileAssetReader::new(&asset_dir));
    let batch = runtime.block_on(loader.load_all_with_progress(&settings.assets, |p| {
        log::info!(
            "[{}/{}] {} {}",
            p.settled,
            p.total,
            if p.ok { "loaded" } else { "failed" },
            p.path
        );
    }));

    let mut composer = Composer::new(settings, CategoryTable::default());
    let mut ui = UiController::new(MemoryPreferences::new());
    composer.apply_saved_theme(ui.store());

    let summary = composer.ingest(batch);
    log::info!(
        "{} parts, {} textures, {} failed",
        summary.parts,
        summary.textures,
        summary.failed
    );

    let script = vec![
        UiCommand::SelectCategory(CategoryId::Hair),
        UiCommand::SelectStyle {
            category: CategoryId::Hair,
            style: "Wavy".to_string(),
        },
        UiCommand::PickColor {
            category: CategoryId::Hair,
            color: ColorValue::from("#583c36"),
        },
        UiCommand::SelectCategory(CategoryId::Mouth),
        UiCommand::SelectStyle {
            category: CategoryId::Mouth,
            style: "Mouth 2".to_string(),
        },
        UiCommand::SelectCategory(CategoryId::Skin),
        UiCommand::PickColor {
            category: CategoryId::Skin,
            color: ColorValue::from("#e7b292"),
        },
        UiCommand::ResetView,
    ];

    let mut viewport = Viewport::new(1280, 720);
    viewport.resize(&mut composer, 1280, 720);
    viewport.frame_interval = Some(Duration::from_millis(16));

    // One command every 40 frames, then a short tail to let moves finish
    let mut commands = script.into_iter();
    viewport.run(&mut composer, |composer, frame| {
        if frame.frame_count % 40 == 0 {
            match commands.next() {
                Some(command) => {
                    log::info!("t={:.2}s {command:?}", frame.time);
                    ui.handle(composer, command);
                }
                None => return false,
            }
        }
        true
    });

    for category in CategoryId::ALL {
        log::info!("{category}: {:?}", composer.visible_members(category));
    }
    log::info!(
        "Camera at {:?}, {} overlays built",
        composer.camera().position(),
        composer.overlay_build_count()
    );

    Ok(())
}
