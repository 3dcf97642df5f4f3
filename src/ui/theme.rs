// PoolWatch - ui/theme.rs
//
// Theme application: turns the dark-mode preference into a presentation
// change on the host. No dependencies on app state or business logic.

/// Applies the dark-mode flag to whatever presents the dashboard.
pub trait ThemeApplier: Send {
    fn apply(&mut self, dark_mode: bool);
}

/// Applies the theme to an egui context (dark or light visuals).
pub struct EguiTheme {
    ctx: egui::Context,
}

impl EguiTheme {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl ThemeApplier for EguiTheme {
    fn apply(&mut self, dark_mode: bool) {
        let theme = if dark_mode {
            egui::Theme::Dark
        } else {
            egui::Theme::Light
        };
        self.ctx.set_theme(theme);
        self.ctx.request_repaint();
    }
}

/// Theme sink for hosts without a presentation layer (the CLI).
#[derive(Debug, Default)]
pub struct HeadlessTheme;

impl ThemeApplier for HeadlessTheme {
    fn apply(&mut self, dark_mode: bool) {
        tracing::debug!(dark_mode, "Theme applied (headless)");
    }
}
