use gdk4 as gdk;
use glide::Point;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, KeyboardMode, Layer, LayerShell};

pub fn get_cursor_position(window: &gtk::ApplicationWindow) -> Option<Point> {
    let pointer = gdk::Display::default()?.default_seat()?.pointer()?;
    let (x, y, _) = window.surface()?.device_position(&pointer)?;
    Some(Point::new(x, y))
}

/// Middle of the monitor showing the overlay, or of the first monitor before it is mapped.
pub fn monitor_center(window: &gtk::ApplicationWindow) -> Option<Point> {
    let display = gdk::Display::default()?;
    let monitor = window
        .surface()
        .and_then(|surface| display.monitor_at_surface(&surface))
        .or_else(|| {
            display
                .monitors()
                .item(0)
                .and_then(|item| item.downcast::<gdk::Monitor>().ok())
        })?;
    let geometry = monitor.geometry();
    Some(Point::new(
        f64::from(geometry.width()) / 2.0,
        f64::from(geometry.height()) / 2.0,
    ))
}

pub fn area_center(area: &gtk::DrawingArea) -> Point {
    Point::new(f64::from(area.width()) / 2.0, f64::from(area.height()) / 2.0)
}

pub fn pick_center(
    cursor: Option<Point>,
    monitor: impl FnOnce() -> Option<Point>,
    area: impl FnOnce() -> Point,
) -> Point {
    cursor.or_else(monitor).unwrap_or_else(area)
}

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_namespace(Some("bagel"));
    window.set_layer(Layer::Overlay);
    window.set_keyboard_mode(KeyboardMode::Exclusive);
    window.set_exclusive_zone(-1);
    [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left]
        .into_iter()
        .for_each(|edge| window.set_anchor(edge, true));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_center_prefers_cursor() {
        let center = pick_center(
            Some(Point::new(10.0, 20.0)),
            || panic!("monitor is not consulted"),
            || panic!("area is not consulted"),
        );
        assert_eq!(center, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_pick_center_unmapped_window_uses_monitor() {
        // an unrealized area reports 0x0, which would put the menu in the corner
        let center = pick_center(None, || Some(Point::new(960.0, 540.0)), Point::default);
        assert_eq!(center, Point::new(960.0, 540.0));

        let center = pick_center(None, || None, || Point::new(5.0, 5.0));
        assert_eq!(center, Point::new(5.0, 5.0));
    }
}
