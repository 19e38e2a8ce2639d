use crate::gui::theme::ThemeColors;
use cairo::Context;
use glide::item::children_at;
use glide::{BagelConfig, ItemColor, MenuState, MenuStatus, Point, RadialItem};
use palette::{Srgb, Srgba, WithAlpha};
use std::f64::consts::TAU;
use std::rc::Rc;

const LABEL_SIZE: f64 = 12.0;
const CURSOR_RADIUS: f64 = 4.0;
const ITEM_ALPHA: f64 = 0.75;

#[derive(Debug)]
pub struct Scene {
    pub state: MenuState,
    pub items: Rc<[RadialItem]>,
    pub config: BagelConfig,
    pub center: Point,
    pub cursor: Option<Point>,
}

impl Scene {
    pub fn new(items: Rc<[RadialItem]>, config: BagelConfig) -> Self {
        Self {
            state: MenuState::default(),
            items,
            config,
            center: Point::default(),
            cursor: None,
        }
    }

    pub fn rings(&self) -> Vec<&[RadialItem]> {
        let mut rings = vec![&self.items[..]];
        for depth in 0..self.state.active_path.len() {
            match children_at(&self.items, &self.state.active_path[..=depth]) {
                Some(children) if !children.is_empty() => rings.push(children),
                _ => break,
            }
        }
        rings
    }
}

pub fn slice_span(index: usize, count: usize, depth: usize, config: &BagelConfig) -> (f64, f64) {
    let slice = TAU / count as f64;
    let start = config.start_angle + slice * index as f64;
    if count == 1 {
        return (start, start + TAU);
    }
    let pad = (config.gap_angle(depth) / 2.0).min(slice / 2.0);
    (start + pad, start + slice - pad)
}

pub fn parse_color(color: &ItemColor) -> Option<Srgba<f64>> {
    match color.as_str().parse::<Srgb<u8>>() {
        Ok(rgb) => Some(rgb.into_format::<f64>().with_alpha(ITEM_ALPHA)),
        Err(e) => {
            log::warn!("Ignoring item color '{}': {}", color, e);
            None
        }
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    if scene.state.status == MenuStatus::Closed {
        return Ok(());
    }
    let alpha = if scene.state.status == MenuStatus::AnimatingOut {
        0.5
    } else {
        1.0
    };
    cr.push_group();

    draw_dead_zone(cr, scene, colors)?;
    for (depth, ring) in scene.rings().into_iter().enumerate() {
        let active = scene.state.active_path.get(depth).copied();
        draw_ring(cr, scene, colors, depth, ring, active)?;
    }
    if scene.state.status == MenuStatus::Gliding
        && let Some(cursor) = scene.cursor
    {
        set_color(cr, colors.cursor);
        cr.arc(cursor.x, cursor.y, CURSOR_RADIUS, 0.0, TAU);
        cr.fill()?;
    }

    cr.pop_group_to_source()?;
    cr.paint_with_alpha(alpha)
}

fn draw_dead_zone(cr: &Context, scene: &Scene, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_color(cr, colors.dead_zone);
    cr.arc(
        scene.center.x,
        scene.center.y,
        scene.config.dead_zone_radius,
        0.0,
        TAU,
    );
    cr.fill()
}

fn draw_ring(
    cr: &Context,
    scene: &Scene,
    colors: &ThemeColors,
    depth: usize,
    ring: &[RadialItem],
    active: Option<usize>,
) -> Result<(), cairo::Error> {
    let config = &scene.config;
    let (inner, outer) = (config.ring_inner(depth), config.ring_outer(depth));
    let Point { x: cx, y: cy } = scene.center;

    for (index, item) in ring.iter().enumerate() {
        let (from, to) = slice_span(index, ring.len(), depth, config);

        let fill = if active == Some(index) {
            colors.active
        } else {
            item.color
                .as_ref()
                .and_then(parse_color)
                .unwrap_or(colors.slice)
        };
        set_color(cr, fill);
        cr.new_path();
        cr.arc(cx, cy, outer, from, to);
        cr.arc_negative(cx, cy, inner, to, from);
        cr.close_path();
        cr.fill()?;

        let mid = Point::from_polar(config.ring_mid(depth), (from + to) / 2.0);
        draw_label(cr, colors, Point::new(cx + mid.x, cy + mid.y), &item.label)?;
    }
    Ok(())
}

fn draw_label(
    cr: &Context,
    colors: &ThemeColors,
    at: Point,
    text: &str,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.label);
    cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
    cr.set_font_size(LABEL_SIZE);
    if let Ok(ext) = cr.text_extents(text) {
        cr.move_to(at.x - ext.width() / 2.0, at.y + ext.height() / 2.0);
        cr.show_text(text)?;
    }
    Ok(())
}
