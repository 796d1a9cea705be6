//! River and coastline carving, done before any tile is classified

use rand::Rng;

/// Membership grid for one water feature.
#[derive(Debug, Clone)]
pub struct FeatureSet {
    width: u32,
    height: u32,
    cells: Vec<bool>,
}

impl FeatureSet {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    /// Marks a cell; off-grid coordinates are ignored.
    pub fn insert(&mut self, x: i32, y: i32) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = true;
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.cells[i]).unwrap_or(false)
    }

    /// True when any member lies within `distance` in Chebyshev metric
    /// (a square window), including the cell itself.
    pub fn is_near(&self, x: i32, y: i32, distance: i32) -> bool {
        for dy in -distance..=distance {
            for dx in -distance..=distance {
                if self.contains(x + dx, y + dy) {
                    return true;
                }
            }
        }
        false
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|c| *c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    North,
    East,
    South,
    West,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::North, Edge::East, Edge::South, Edge::West];
}

/// Feature sets carved for one map; absent features are `None`.
#[derive(Debug, Clone, Default)]
pub struct Features {
    pub river: Option<FeatureSet>,
    pub coastline: Option<FeatureSet>,
}

impl Features {
    pub fn is_river(&self, x: i32, y: i32) -> bool {
        self.river.as_ref().is_some_and(|r| r.contains(x, y))
    }

    pub fn is_coastline(&self, x: i32, y: i32) -> bool {
        self.coastline.as_ref().is_some_and(|c| c.contains(x, y))
    }

    pub fn near_river(&self, x: i32, y: i32, distance: i32) -> bool {
        self.river.as_ref().is_some_and(|r| r.is_near(x, y, distance))
    }

    pub fn near_coastline(&self, x: i32, y: i32, distance: i32) -> bool {
        self.coastline
            .as_ref()
            .is_some_and(|c| c.is_near(x, y, distance))
    }
}

fn clamp_column(x: i32, width: i32) -> i32 {
    if width <= 2 {
        x.clamp(0, width - 1)
    } else {
        x.clamp(1, width - 2)
    }
}

/// Walks from a random column on the top row to the bottom row, stamping a
/// 3x3 block at each step and drifting by -1, 0 or +1 columns.
pub fn carve_river<R: Rng + ?Sized>(width: u32, height: u32, rng: &mut R) -> FeatureSet {
    let mut river = FeatureSet::new(width, height);
    let w = width as i32;
    let mut x = rng.gen_range(0..w);
    for y in 0..height as i32 {
        for dy in -1..=1 {
            for dx in -1..=1 {
                river.insert(x + dx, y + dy);
            }
        }
        x = clamp_column(x + rng.gen_range(-1..=1), w);
    }
    river
}

/// Floods an inland strip along one random edge. Each column (or row) of
/// the strip gets its own depth drawn from
/// `base ± variance` where `base = min(width, height) * depth_ratio`.
pub fn carve_coastline<R: Rng + ?Sized>(
    width: u32,
    height: u32,
    depth_ratio: f64,
    variance: u32,
    rng: &mut R,
) -> (Edge, FeatureSet) {
    let mut coast = FeatureSet::new(width, height);
    let edge = Edge::ALL[rng.gen_range(0..Edge::ALL.len())];
    let base = (width.min(height) as f64 * depth_ratio).floor() as i64;
    let variance = i64::from(variance);
    let (w, h) = (width as i32, height as i32);

    let mut depth = |limit: i32| -> i32 {
        let jitter = if variance > 0 {
            rng.gen_range(-variance..=variance)
        } else {
            0
        };
        // limit is at most MAX_DIMENSION, so the narrowing cast is lossless
        base.saturating_add(jitter).clamp(1, i64::from(limit)) as i32
    };

    match edge {
        Edge::North => {
            for x in 0..w {
                for y in 0..depth(h) {
                    coast.insert(x, y);
                }
            }
        }
        Edge::South => {
            for x in 0..w {
                for y in 0..depth(h) {
                    coast.insert(x, h - 1 - y);
                }
            }
        }
        Edge::West => {
            for y in 0..h {
                for x in 0..depth(w) {
                    coast.insert(x, y);
                }
            }
        }
        Edge::East => {
            for y in 0..h {
                for x in 0..depth(w) {
                    coast.insert(w - 1 - x, y);
                }
            }
        }
    }
    (edge, coast)
}
