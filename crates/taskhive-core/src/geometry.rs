//! Hexagonal tiling of tokens inside a fixed-width container.
//!
//! Tokens are pointy-top hexagons (vertical flat sides). They fill a full
//! row left to right, then an offset row tucked beneath it, then repeat.
//!
//! ```text
//! O   O   O   O
//!   O   O   O
//! O   O   O   O
//! ```

/// Default gap between neighbouring tokens.
pub const DEFAULT_SPACING: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HexLayout {
    pub container_width: f64,
    pub radius: f64,
    pub spacing: f64,
}

impl HexLayout {
    pub fn new(container_width: f64, radius: f64) -> Self {
        Self {
            container_width,
            radius,
            spacing: DEFAULT_SPACING,
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn tile_width(&self) -> f64 {
        3f64.sqrt() * self.radius
    }

    /// Horizontal distance between neighbouring token origins.
    fn pitch(&self) -> f64 {
        self.tile_width() + self.spacing
    }

    /// Tokens in a full row. Always at least one.
    pub fn row_capacity(&self) -> usize {
        let pitch = self.pitch();
        if pitch.is_nan() || pitch <= 0.0 || !self.container_width.is_finite() {
            return 1;
        }
        let fits = (self.container_width / pitch).floor();
        if fits < 1.0 {
            1
        } else {
            fits as usize
        }
    }

    /// Vertical distance from a full row to the offset row beneath it.
    pub fn row_height(&self) -> f64 {
        2.0 * self.radius + self.spacing - self.radius / 2.0
    }

    /// Position of every token, index for index.
    pub fn positions(&self, count: usize) -> Vec<Point> {
        let capacity = self.row_capacity();
        let band = capacity.saturating_mul(2) - 1;
        let pitch = self.pitch();
        let row_height = self.row_height();
        let centring = if self.container_width.is_finite() {
            (self.container_width - pitch * capacity as f64) / 2.0
        } else {
            0.0
        };

        (0..count)
            .map(|i| {
                let slot = i % band;
                let band_top = (i / band) as f64 * 2.0 * row_height;
                let (x, y) = if slot < capacity {
                    (slot as f64 * pitch, band_top)
                } else {
                    let column = (slot - capacity) as f64;
                    (column * pitch + self.radius, band_top + row_height)
                };
                Point {
                    x: x + centring,
                    y,
                }
            })
            .collect()
    }

    /// Pair each item with its position, preserving order.
    pub fn place<'a, T>(&self, items: &'a [T]) -> Vec<(Point, &'a T)> {
        self.positions(items.len()).into_iter().zip(items).collect()
    }
}
