//! Tile partitioning.
//!
//! Divides the image into square tiles that can be rendered
//! independently and in parallel.

/// A rectangular region `[x_min, x_max) x [y_min, y_max)` of the image.
///
/// Coordinates are film pixels with y = 0 the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: u32,
    pub y_max: u32,
}

impl Job {
    pub fn new(x_min: u32, x_max: u32, y_min: u32, y_max: u32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    pub fn width(&self) -> u32 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> u32 {
        self.y_max - self.y_min
    }

    /// Get the total number of pixels in this tile.
    pub fn pixel_count(&self) -> u32 {
        self.width() * self.height()
    }

    /// Do two tiles share any pixel?
    pub fn overlaps(&self, other: &Job) -> bool {
        self.x_min < other.x_max
            && other.x_min < self.x_max
            && self.y_min < other.y_max
            && other.y_min < self.y_max
    }
}

/// Generate tiles covering a `width x height` image, row-major: tile rows
/// from the bottom up, columns left to right. Tiles in the last row and
/// column are clipped to the image bounds.
pub fn generate_jobs(width: u32, height: u32, tile_size: u32) -> Vec<Job> {
    if tile_size == 0 {
        return Vec::new();
    }

    let tiles_x = width.div_ceil(tile_size);
    let tiles_y = height.div_ceil(tile_size);
    let mut jobs = Vec::with_capacity((tiles_x * tiles_y) as usize);

    for tile_y in 0..tiles_y {
        let y_min = tile_y * tile_size;
        let y_max = (y_min + tile_size).min(height);

        for tile_x in 0..tiles_x {
            let x_min = tile_x * tile_size;
            let x_max = (x_min + tile_size).min(width);
            jobs.push(Job::new(x_min, x_max, y_min, y_max));
        }
    }

    jobs
}
