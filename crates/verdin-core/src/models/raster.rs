//! In-memory raster grid in geographic coordinates.
//!
//! Layers and archive scenes share this representation: a north-west anchored
//! grid of square cells with NaN marking cells that carry no data.

/// A rectangular grid of cell values in geographic coordinates.
#[derive(Debug, Clone)]
pub struct Raster {
    /// Longitude of the west edge (degrees)
    pub west: f64,

    /// Latitude of the north edge (degrees)
    pub north: f64,

    /// Cell size in degrees
    pub cell_deg: f64,

    /// Number of columns
    pub width: usize,

    /// Number of rows
    pub height: usize,

    /// Row-major cell values from the north row down, NaN for nodata
    pub values: Vec<f32>,
}

impl Raster {
    /// Create a raster with every cell set to the given value
    pub fn filled(
        west: f64,
        north: f64,
        cell_deg: f64,
        width: usize,
        height: usize,
        value: f32,
    ) -> Self {
        Self { west, north, cell_deg, width, height, values: vec![value; width * height] }
    }

    /// Create a raster with every cell set to nodata
    pub fn nodata(west: f64, north: f64, cell_deg: f64, width: usize, height: usize) -> Self {
        Self::filled(west, north, cell_deg, width, height, f32::NAN)
    }

    /// Longitude of the east edge
    pub fn east(&self) -> f64 {
        self.west + self.cell_deg * self.width as f64
    }

    /// Latitude of the south edge
    pub fn south(&self) -> f64 {
        self.north - self.cell_deg * self.height as f64
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert world coordinates to the containing (col, row) cell.
    ///
    /// Points on an interior cell edge fall into the cell to their south-east;
    /// points on the east or south outer edge are outside the grid.
    pub fn cell_at(&self, lng: f64, lat: f64) -> Option<(usize, usize)> {
        let col = ((lng - self.west) / self.cell_deg).floor();
        let row = ((self.north - lat) / self.cell_deg).floor();
        if !col.is_finite() || !row.is_finite() || col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some((col, row))
    }

    /// Value of the cell containing the point.
    ///
    /// Returns None for points outside the grid and for nodata cells.
    pub fn value_at(&self, lng: f64, lat: f64) -> Option<f32> {
        let (col, row) = self.cell_at(lng, lat)?;
        let value = self.values[row * self.width + col];
        if value.is_nan() {
            None
        } else {
            Some(value)
        }
    }

    /// World coordinates of a cell's centre
    pub fn cell_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.west + (col as f64 + 0.5) * self.cell_deg,
            self.north - (row as f64 + 0.5) * self.cell_deg,
        )
    }

    /// Read a cell directly
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.values[row * self.width + col]
    }

    /// Write a cell directly
    pub fn set(&mut self, col: usize, row: usize, value: f32) {
        self.values[row * self.width + col] = value;
    }

    /// Fraction of cells carrying data
    pub fn coverage(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let data = self.values.iter().filter(|v| !v.is_nan()).count();
        data as f64 / self.values.len() as f64
    }
}
