use crate::gui::theme::PetColors;
use cairo::Context;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use palette::Srgba;
use std::f64::consts::PI;
use std::path::Path;

pub fn load(path: Option<&Path>) -> Option<Pixbuf> {
    let path = path?;
    match Pixbuf::from_file(path) {
        Ok(pixbuf) => {
            log::debug!("Loaded sprite {}", path.display());
            Some(pixbuf)
        }
        Err(e) => {
            log::warn!("Failed to load sprite {}: {}", path.display(), e);
            None
        }
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Paints the pet into a `width` x `height` area: the sprite when one is loaded,
/// otherwise the built-in character.
pub fn draw(
    cr: &Context,
    width: f64,
    height: f64,
    sprite: Option<&Pixbuf>,
    colors: &PetColors,
) -> Result<(), cairo::Error> {
    match sprite {
        Some(pixbuf) => draw_pixbuf(cr, width, height, pixbuf),
        None => draw_character(cr, width, height, colors),
    }
}

fn draw_pixbuf(cr: &Context, width: f64, height: f64, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
    let (pw, ph) = (pixbuf.width() as f64, pixbuf.height() as f64);
    if pw <= 0.0 || ph <= 0.0 {
        return Ok(());
    }
    // fit inside, keep aspect
    let scale = (width / pw).min(height / ph);
    let (x, y) = ((width - pw * scale) / 2.0, (height - ph * scale) / 2.0);

    cr.save()?;
    cr.translate(x, y);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn draw_character(
    cr: &Context,
    width: f64,
    height: f64,
    colors: &PetColors,
) -> Result<(), cairo::Error> {
    let unit = width.min(height);
    let (cx, cy) = (width / 2.0, height * 0.55);
    let (rx, ry) = (unit * 0.42, height * 0.4);

    // body
    cr.save()?;
    cr.translate(cx, cy);
    cr.scale(rx, ry);
    cr.arc(0.0, 0.0, 1.0, 0.0, 2.0 * PI);
    cr.restore()?;
    set_color(cr, colors.body);
    cr.fill_preserve()?;
    set_color(cr, colors.outline);
    cr.set_line_width(unit * 0.02);
    cr.stroke()?;

    // eyes
    let eye_y = cy - ry * 0.2;
    set_color(cr, colors.eyes);
    for side in [-1.0, 1.0] {
        cr.arc(cx + side * rx * 0.35, eye_y, unit * 0.05, 0.0, 2.0 * PI);
        cr.fill()?;
    }

    // cheeks
    set_color(cr, colors.cheeks);
    for side in [-1.0, 1.0] {
        cr.arc(cx + side * rx * 0.6, eye_y + unit * 0.1, unit * 0.06, 0.0, 2.0 * PI);
        cr.fill()?;
    }
    Ok(())
}
