use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colours of the built-in character, taken from the GTK theme where it defines them.
pub struct PetColors {
    pub body: Srgba<f64>,
    pub outline: Srgba<f64>,
    pub eyes: Srgba<f64>,
    pub cheeks: Srgba<f64>,
}

impl PetColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            body: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.55, 0.75, 0.95, 0.95),
                Some(0.95),
            ),
            outline: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.15, 0.15, 0.2, 0.9),
                Some(0.9),
            ),
            eyes: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.1, 0.1, 0.1, 1.0),
                None,
            ),
            cheeks: Self::lookup_color(
                context,
                "error_bg_color",
                Srgba::new(0.95, 0.5, 0.55, 0.6),
                Some(0.6),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    alpha_override.unwrap_or(c.alpha() as f64),
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.deskpet-window, .deskpet-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
