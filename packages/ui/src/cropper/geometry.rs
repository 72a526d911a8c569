//! Pan/zoom geometry of the circular cropper.
//!
//! Coordinates are in viewport pixels with the origin at the viewport's top-left
//! corner. The image is drawn at `offset` with `scale` viewport pixels per image
//! pixel. After every operation the image covers the whole square viewport, and
//! therefore the circle inscribed in it.

/// How far past the cover scale the user may zoom in.
pub const MAX_ZOOM: f64 = 4.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropState {
    image_width: f64,
    image_height: f64,
    viewport: f64,
    scale: f64,
    offset: Point,
}

impl CropState {
    /// Fit an image of the given natural size into a square viewport, centered
    /// and zoomed out as far as coverage allows.
    pub fn new(image_width: f64, image_height: f64, viewport: f64) -> Self {
        let positive = |v: f64| if v.is_finite() && v > 0.0 { v } else { 1.0 };
        let mut state = Self {
            image_width: positive(image_width),
            image_height: positive(image_height),
            viewport: positive(viewport),
            scale: 1.0,
            offset: Point::default(),
        };
        state.scale = state.min_scale();
        state.offset = Point::new(
            (state.viewport - state.displayed_width()) / 2.0,
            (state.viewport - state.displayed_height()) / 2.0,
        );
        state
    }

    /// Smallest scale at which the image still covers the viewport.
    pub fn min_scale(&self) -> f64 {
        self.viewport / self.image_width.min(self.image_height)
    }

    pub fn max_scale(&self) -> f64 {
        self.min_scale() * MAX_ZOOM
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Zoom relative to the cover scale, in `1.0..=MAX_ZOOM`.
    pub fn zoom(&self) -> f64 {
        self.scale / self.min_scale()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn viewport(&self) -> f64 {
        self.viewport
    }

    pub fn displayed_width(&self) -> f64 {
        self.image_width * self.scale
    }

    pub fn displayed_height(&self) -> f64 {
        self.image_height * self.scale
    }

    fn clamp_offset(&mut self) {
        let min_x = self.viewport - self.displayed_width();
        let min_y = self.viewport - self.displayed_height();
        self.offset.x = self.offset.x.clamp(min_x.min(0.0), 0.0);
        self.offset.y = self.offset.y.clamp(min_y.min(0.0), 0.0);
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.offset.x += dx;
        self.offset.y += dy;
        self.clamp_offset();
    }

    /// Multiply the scale by `factor`, keeping the image point under `anchor` fixed
    /// where the bounds allow.
    pub fn zoom_at(&mut self, factor: f64, anchor: Point) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let new_scale = (self.scale * factor).clamp(self.min_scale(), self.max_scale());
        let image_x = (anchor.x - self.offset.x) / self.scale;
        let image_y = (anchor.y - self.offset.y) / self.scale;
        self.scale = new_scale;
        self.offset = Point::new(anchor.x - image_x * new_scale, anchor.y - image_y * new_scale);
        self.clamp_offset();
    }

    /// Set the zoom (relative to the cover scale) around the viewport center.
    pub fn set_zoom(&mut self, zoom: f64) {
        let center = Point::new(self.viewport / 2.0, self.viewport / 2.0);
        let target = zoom.clamp(1.0, MAX_ZOOM) * self.min_scale();
        self.zoom_at(target / self.scale, center);
    }

    /// Two-finger pinch: the fingers moved from `previous_distance` apart to
    /// `distance` apart around `midpoint`.
    pub fn pinch(&mut self, previous_distance: f64, distance: f64, midpoint: Point) {
        if previous_distance > f64::EPSILON {
            self.zoom_at(distance / previous_distance, midpoint);
        }
    }

    /// The part of the image under the viewport, in image pixels.
    pub fn source_rect(&self) -> Rect {
        let size = self.viewport / self.scale;
        Rect {
            x: -self.offset.x / self.scale,
            y: -self.offset.y / self.scale,
            width: size,
            height: size,
        }
    }

    /// Whether the image covers the viewport. Holds after every operation.
    pub fn covers_viewport(&self) -> bool {
        const EPS: f64 = 1e-6;
        self.offset.x <= EPS
            && self.offset.y <= EPS
            && self.offset.x + self.displayed_width() >= self.viewport - EPS
            && self.offset.y + self.displayed_height() >= self.viewport - EPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_new_centers_and_covers() {
        let state = CropState::new(800.0, 400.0, 200.0);
        assert!(approx(state.scale(), 0.5));
        assert!(approx(state.displayed_width(), 400.0));
        assert_eq!(state.offset(), Point::new(-100.0, 0.0));
        assert!(state.covers_viewport());
        assert!(approx(state.zoom(), 1.0));
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut state = CropState::new(800.0, 400.0, 200.0);
        state.drag(500.0, 50.0);
        assert_eq!(state.offset(), Point::new(0.0, 0.0));
        state.drag(-1000.0, -1000.0);
        assert_eq!(state.offset(), Point::new(-200.0, 0.0));
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut state = CropState::new(400.0, 400.0, 200.0);
        let anchor = Point::new(100.0, 100.0);
        state.zoom_at(2.0, anchor);
        assert!(approx(state.zoom(), 2.0));
        let rect = state.source_rect();
        assert!(approx(rect.x + rect.width / 2.0, 200.0));
        assert!(approx(rect.width, 200.0));
    }

    #[test]
    fn test_zoom_is_bounded() {
        let mut state = CropState::new(400.0, 300.0, 100.0);
        state.zoom_at(100.0, Point::new(0.0, 0.0));
        assert!(approx(state.zoom(), MAX_ZOOM));
        state.zoom_at(0.001, Point::new(50.0, 50.0));
        assert!(approx(state.zoom(), 1.0));
        assert!(state.covers_viewport());

        state.set_zoom(2.5);
        assert!(approx(state.zoom(), 2.5));
        state.set_zoom(9.0);
        assert!(approx(state.zoom(), MAX_ZOOM));
    }

    #[test]
    fn test_pinch() {
        let mut state = CropState::new(400.0, 400.0, 200.0);
        state.pinch(100.0, 150.0, Point::new(100.0, 100.0));
        assert!(approx(state.zoom(), 1.5));
        state.pinch(0.0, 150.0, Point::new(100.0, 100.0));
        assert!(approx(state.zoom(), 1.5));
    }

    #[test]
    fn test_source_rect_inside_image() {
        let mut state = CropState::new(1200.0, 900.0, 300.0);
        state.zoom_at(3.0, Point::new(10.0, 290.0));
        state.drag(37.0, -12.0);
        let r = state.source_rect();
        assert!(r.x >= -1e-6 && r.y >= -1e-6);
        assert!(r.x + r.width <= 1200.0 + 1e-6);
        assert!(r.y + r.height <= 900.0 + 1e-6);
    }

    #[test]
    fn test_arbitrary_gestures_keep_circle_covered() {
        let mut state = CropState::new(640.0, 1280.0, 256.0);
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            (seed % 10_000) as f64 / 10_000.0
        };
        for _ in 0..500 {
            match (next() * 3.0) as u32 {
                0 => state.drag(next() * 400.0 - 200.0, next() * 400.0 - 200.0),
                1 => state.zoom_at(0.5 + next() * 1.5, Point::new(next() * 256.0, next() * 256.0)),
                _ => state.pinch(10.0 + next() * 100.0, 10.0 + next() * 100.0, Point::new(next() * 256.0, next() * 256.0)),
            }
            assert!(state.covers_viewport(), "{state:?}");
            assert!(state.zoom() >= 1.0 - 1e-9 && state.zoom() <= MAX_ZOOM + 1e-9);
        }
    }

    #[test]
    fn test_degenerate_sizes_fall_back() {
        let state = CropState::new(0.0, f64::NAN, 200.0);
        assert!(state.covers_viewport());
    }
}
