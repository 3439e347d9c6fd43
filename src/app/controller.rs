use crate::composer::Composer;
use crate::config::category::CategoryId;
use crate::config::preferences::{PreferenceStore, Theme};
use crate::resources::color::ColorValue;

/// User intent, as produced by the panel UI.
#[derive(Debug, Clone)]
pub enum UiCommand {
    SelectCategory(CategoryId),
    SelectStyle { category: CategoryId, style: String },
    PickColor { category: CategoryId, color: ColorValue },
    ResetView,
    ApplyTheme(Theme),
}

/// Translates [`UiCommand`]s into composer calls. Holds no avatar state
/// beyond the open panel.
pub struct UiController<P: PreferenceStore> {
    store: P,
    current_category: Option<CategoryId>,
}

impl<P: PreferenceStore> UiController<P> {
    pub fn new(store: P) -> Self {
        Self {
            store,
            current_category: None,
        }
    }

    #[must_use]
    pub fn current_category(&self) -> Option<CategoryId> {
        self.current_category
    }

    #[must_use]
    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn handle(&mut self, composer: &mut Composer, command: UiCommand) {
        match command {
            UiCommand::SelectCategory(category) => self.select_category(composer, category),
            UiCommand::SelectStyle { category, style } => {
                composer.set_exclusive_style(category, &style);
            }
            UiCommand::PickColor { category, color } => {
                composer.recolor_category(category, color);
            }
            UiCommand::ResetView => composer.reset_camera(),
            UiCommand::ApplyTheme(theme) => {
                if let Err(e) = composer.apply_theme(&theme, &mut self.store) {
                    log::error!("Failed to save theme '{}': {e}", theme.name);
                }
            }
        }
    }

    /// Opening the hair panel tilts the avatar's head up; leaving it tilts
    /// it back. Re-selecting the open panel does nothing.
    fn select_category(&mut self, composer: &mut Composer, category: CategoryId) {
        if self.current_category == Some(category) {
            return;
        }

        let full_body = composer.settings().full_body.clone();
        let camera = &composer.settings().camera;
        let (look_up, look_back) = (camera.look_up_action.clone(), camera.look_back_action.clone());

        if category == CategoryId::Hair {
            composer.play_animation(&full_body, &look_up);
        } else if self.current_category == Some(CategoryId::Hair) {
            composer.play_animation(&full_body, &look_back);
        }

        self.current_category = Some(category);
    }
}
