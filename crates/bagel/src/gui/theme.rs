use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

const CSS: &str = "
.bagel-window,
.bagel-drawing-area {
    background: none;
    background-color: transparent;
}
";

#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub active: Srgba<f64>,
    pub slice: Srgba<f64>,
    pub dead_zone: Srgba<f64>,
    pub label: Srgba<f64>,
    pub cursor: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            active: Srgba::new(0.4, 0.4, 0.8, 0.9),
            slice: Srgba::new(0.15, 0.15, 0.15, 0.75),
            dead_zone: Srgba::new(0.2, 0.2, 0.2, 0.15),
            label: Srgba::new(1.0, 1.0, 1.0, 1.0),
            cursor: Srgba::new(1.0, 1.0, 1.0, 0.8),
        }
    }
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let fallback = Self::default();
        let named = |name: &str, alpha: Option<f64>, fallback: Srgba<f64>| {
            context
                .lookup_color(name)
                .map_or(fallback, |rgba| to_srgba(&rgba, alpha))
        };
        Self {
            active: named("theme_selected_bg_color", Some(0.9), fallback.active),
            slice: named("theme_bg_color", Some(0.75), fallback.slice),
            dead_zone: named("theme_fg_color", Some(0.1), fallback.dead_zone),
            label: named("theme_fg_color", None, fallback.label),
            cursor: named("theme_selected_fg_color", Some(0.8), fallback.cursor),
        }
    }
}

fn to_srgba(rgba: &gdk::RGBA, alpha: Option<f64>) -> Srgba<f64> {
    Srgba::new(
        f64::from(rgba.red()),
        f64::from(rgba.green()),
        f64::from(rgba.blue()),
        alpha.unwrap_or(f64::from(rgba.alpha())),
    )
}

pub fn load_css() {
    let Some(display) = gdk::Display::default() else {
        log::warn!("No display, skipping stylesheet");
        return;
    };
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_override() {
        let rgba = gdk::RGBA::new(0.25, 0.5, 1.0, 1.0);
        let color = to_srgba(&rgba, Some(0.3));
        assert!((color.alpha - 0.3).abs() < 1e-6);
        assert!((color.green - 0.5).abs() < 1e-6);
        assert!((to_srgba(&rgba, None).alpha - 1.0).abs() < 1e-6);
    }
}
