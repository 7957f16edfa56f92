use eframe::egui::{Color32, Painter, Pos2, Rect, Vec2, vec2};

use crate::topology::NodeKind;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn kind_color(kind: &NodeKind) -> Color32 {
    match kind {
        NodeKind::Vm => Color32::from_rgb(84, 160, 232),
        NodeKind::Host => Color32::from_rgb(96, 190, 128),
        NodeKind::Datastore => Color32::from_rgb(232, 170, 72),
        NodeKind::StoragePod => Color32::from_rgb(176, 124, 226),
        NodeKind::Other(_) => Color32::from_rgb(140, 146, 156),
    }
}

pub(super) const COMPUTE_EDGE_COLOR: Color32 = Color32::from_rgb(124, 136, 152);
pub(super) const STORAGE_EDGE_COLOR: Color32 = Color32::from_rgb(226, 166, 84);

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (40.0 * zoom.clamp(0.5, 2.0)).max(16.0);
    let origin = rect.center() + pan;
    let dot = Color32::from_rgba_unmultiplied(70, 80, 92, 120);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
        while y < rect.bottom() {
            painter.circle_filled(Pos2::new(x, y), 1.0, dot);
            y += step;
        }
        x += step;
    }
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Pan and zoom that center `bounds` (world space) inside `viewport`.
pub(super) fn fit_transform(bounds: Rect, viewport: Rect, margin: f32) -> (Vec2, f32) {
    let available = vec2(
        (viewport.width() - margin * 2.0).max(1.0),
        (viewport.height() - margin * 2.0).max(1.0),
    );
    let extent = vec2(bounds.width().max(1.0), bounds.height().max(1.0));
    let zoom = (available.x / extent.x)
        .min(available.y / extent.y)
        .clamp(0.05, 1.5);
    let pan = -bounds.center().to_vec2() * zoom;
    (pan, zoom)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn fit_transform_centers_bounds() {
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 600.0));
        let bounds = Rect::from_min_max(pos2(0.0, 0.0), pos2(980.0, 656.0));

        let (pan, zoom) = fit_transform(bounds, viewport, 20.0);
        assert!(zoom > 0.0 && zoom <= 1.0);
        assert!((zoom - (560.0 / 656.0)).abs() < 1e-4);

        let center = world_to_screen(viewport, pan, zoom, bounds.center().to_vec2());
        assert!((center - viewport.center()).length() < 1e-3);
    }

    #[test]
    fn fit_transform_caps_zoom_for_single_node() {
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0));
        let bounds = Rect::from_min_size(pos2(500.0, 200.0), vec2(0.0, 0.0));

        let (_pan, zoom) = fit_transform(bounds, viewport, 40.0);
        assert_eq!(zoom, 1.5);
    }

    #[test]
    fn screen_to_world_inverts_world_to_screen() {
        let viewport = Rect::from_min_size(pos2(10.0, 20.0), vec2(640.0, 480.0));
        let pan = vec2(-35.0, 12.0);
        let world = vec2(250.0, 400.0);

        let screen = world_to_screen(viewport, pan, 0.8, world);
        let back = screen_to_world(viewport, pan, 0.8, screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn edge_crossing_viewport_is_visible() {
        let viewport = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(edge_visible(viewport, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(viewport, pos2(-50.0, -50.0), pos2(-10.0, 150.0), 0.0));
    }

    #[test]
    fn blend_and_dim_stay_in_range() {
        let blended = blend_color(Color32::BLACK, Color32::WHITE, 2.0);
        assert_eq!(blended, Color32::WHITE);
        let dimmed = dim_color(Color32::from_rgb(200, 100, 50), 0.5);
        assert!(dimmed.a() < 255);
    }
}
