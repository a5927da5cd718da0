//! Zoning grid synthesis.
//!
//! The grid is a fixed template: a road lattice plus static zone rectangles,
//! gated by density tier. Writes are applied in a fixed order and the last
//! write to a cell wins.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::DensityTier;

pub const REFERENCE_GRID_SIZE: usize = 1_000;
/// Largest side the renderer can draw.
pub const MAX_GRID_SIZE: usize = u16::MAX as usize;
const STRIDE_DIVISOR: f64 = 33.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ZoneLabel {
    Empty = 0,
    Road = 1,
    Residential = 2,
    Commercial = 3,
    Park = 4,
    Industrial = 5,
}

impl ZoneLabel {
    pub const ALL: [ZoneLabel; 6] = [
        ZoneLabel::Empty,
        ZoneLabel::Road,
        ZoneLabel::Residential,
        ZoneLabel::Commercial,
        ZoneLabel::Park,
        ZoneLabel::Industrial,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Axis-aligned rectangle expressed as fractions of the grid span.
/// Rows cover `[row_start, row_end)`, columns `[col_start, col_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRect {
    pub row_start: f64,
    pub row_end: f64,
    pub col_start: f64,
    pub col_end: f64,
}

impl ZoneRect {
    pub const fn new(rows: (f64, f64), cols: (f64, f64)) -> Self {
        Self {
            row_start: rows.0,
            row_end: rows.1,
            col_start: cols.0,
            col_end: cols.1,
        }
    }

    /// Cell ranges for a grid of `size`, clamped to `[0, size]`.
    pub fn cells(&self, size: usize) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        let to_cell = |fraction: f64| -> usize {
            let scaled = (fraction * size as f64).round();
            if scaled <= 0.0 {
                0
            } else {
                (scaled as usize).min(size)
            }
        };
        let rows = to_cell(self.row_start)..to_cell(self.row_end);
        let cols = to_cell(self.col_start)..to_cell(self.col_end);
        (rows, cols)
    }

    fn check(&self) -> Result<(), GridConfigError> {
        let spans = [
            (self.row_start, self.row_end),
            (self.col_start, self.col_end),
        ];
        for (start, end) in spans {
            if !(0.0..=1.0).contains(&start) || !(0.0..=1.0).contains(&end) {
                return Err(GridConfigError::FractionOutOfRange(*self));
            }
            if start > end {
                return Err(GridConfigError::ReversedSpan(*self));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GridConfigError {
    #[error("grid size must be greater than zero")]
    EmptyGrid,
    #[error("grid size {0} exceeds the maximum of {max}", max = MAX_GRID_SIZE)]
    TooLarge(usize),
    #[error("road stride must be greater than zero")]
    ZeroStride,
    #[error("zone rectangle {0:?} has a fraction outside [0, 1]")]
    FractionOutOfRange(ZoneRect),
    #[error("zone rectangle {0:?} has a start after its end")]
    ReversedSpan(ZoneRect),
}

fn default_size() -> usize {
    REFERENCE_GRID_SIZE
}

fn default_residential() -> Vec<ZoneRect> {
    vec![
        ZoneRect::new((0.1, 0.2), (0.1, 0.2)),
        ZoneRect::new((0.4, 0.6), (0.4, 0.6)),
        ZoneRect::new((0.7, 0.9), (0.7, 0.9)),
    ]
}

fn default_commercial() -> Vec<ZoneRect> {
    vec![
        ZoneRect::new((0.4, 0.6), (0.1, 0.2)),
        ZoneRect::new((0.1, 0.2), (0.7, 0.9)),
    ]
}

fn default_parks() -> Vec<ZoneRect> {
    vec![
        ZoneRect::new((0.4, 0.6), (0.7, 0.9)),
        ZoneRect::new((0.7, 0.9), (0.1, 0.3)),
    ]
}

fn default_industrial() -> Vec<ZoneRect> {
    vec![ZoneRect::new((0.7, 0.9), (0.4, 0.6))]
}

/// Immutable synthesis parameters. `Default` is the reference 1000x1000 layout.
/// When a config file omits the lattice spacing it is derived from `size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GridConfigFile")]
pub struct GridConfig {
    pub size: usize,
    pub road_stride: usize,
    pub secondary_road_offset: usize,
    pub residential: Vec<ZoneRect>,
    pub commercial: Vec<ZoneRect>,
    pub parks: Vec<ZoneRect>,
    /// Only stamped for dense tiers.
    pub industrial: Vec<ZoneRect>,
}

#[derive(Deserialize)]
struct GridConfigFile {
    #[serde(default = "default_size")]
    size: usize,
    road_stride: Option<usize>,
    secondary_road_offset: Option<usize>,
    #[serde(default = "default_residential")]
    residential: Vec<ZoneRect>,
    #[serde(default = "default_commercial")]
    commercial: Vec<ZoneRect>,
    #[serde(default = "default_parks")]
    parks: Vec<ZoneRect>,
    #[serde(default = "default_industrial")]
    industrial: Vec<ZoneRect>,
}

impl From<GridConfigFile> for GridConfig {
    fn from(file: GridConfigFile) -> Self {
        let road_stride = file.road_stride.unwrap_or_else(|| stride_for(file.size));
        Self {
            size: file.size,
            road_stride,
            secondary_road_offset: file
                .secondary_road_offset
                .unwrap_or_else(|| offset_for(road_stride)),
            residential: file.residential,
            commercial: file.commercial,
            parks: file.parks,
            industrial: file.industrial,
        }
    }
}

fn stride_for(size: usize) -> usize {
    ((size as f64 / STRIDE_DIVISOR).round() as usize).max(1)
}

fn offset_for(stride: usize) -> usize {
    (stride as f64 / 3.0).round() as usize
}

impl GridConfig {
    /// Reference layout rescaled to `size` cells per side.
    pub fn scaled(size: usize) -> Self {
        let road_stride = stride_for(size);
        Self {
            size,
            road_stride,
            secondary_road_offset: offset_for(road_stride),
            residential: default_residential(),
            commercial: default_commercial(),
            parks: default_parks(),
            industrial: default_industrial(),
        }
    }

    pub fn validate(&self) -> Result<(), GridConfigError> {
        if self.size == 0 {
            return Err(GridConfigError::EmptyGrid);
        }
        if self.size > MAX_GRID_SIZE {
            return Err(GridConfigError::TooLarge(self.size));
        }
        if self.road_stride == 0 {
            return Err(GridConfigError::ZeroStride);
        }
        self.residential
            .iter()
            .chain(&self.commercial)
            .chain(&self.parks)
            .chain(&self.industrial)
            .try_for_each(ZoneRect::check)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::scaled(default_size())
    }
}

/// Square row-major matrix of zone labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneGrid {
    size: usize,
    cells: Vec<ZoneLabel>,
}

impl ZoneGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![ZoneLabel::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ZoneLabel> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ZoneLabel]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn count(&self, label: ZoneLabel) -> usize {
        self.cells.iter().filter(|cell| **cell == label).count()
    }

    pub fn contains(&self, label: ZoneLabel) -> bool {
        self.cells.contains(&label)
    }

    fn fill_row(&mut self, row: usize, label: ZoneLabel) {
        let start = row * self.size;
        self.cells[start..start + self.size].fill(label);
    }

    fn fill_col(&mut self, col: usize, label: ZoneLabel) {
        for row in 0..self.size {
            self.cells[row * self.size + col] = label;
        }
    }

    fn lay_lattice(&mut self, offset: usize, stride: usize) {
        for line in (offset..self.size).step_by(stride) {
            self.fill_row(line, ZoneLabel::Road);
            self.fill_col(line, ZoneLabel::Road);
        }
    }

    fn stamp(&mut self, rect: &ZoneRect, label: ZoneLabel) {
        let (rows, cols) = rect.cells(self.size);
        if cols.is_empty() {
            return;
        }
        for row in rows {
            let start = row * self.size;
            self.cells[start + cols.start..start + cols.end].fill(label);
        }
    }
}

/// Builds the zoning template for `tier`. Order of application: primary
/// lattice, secondary lattice (dense only), residential, commercial, parks,
/// industrial (dense only).
pub fn synthesize_grid(tier: DensityTier, config: &GridConfig) -> ZoneGrid {
    let mut grid = ZoneGrid::new(config.size);
    if config.size == 0 {
        return grid;
    }
    let stride = config.road_stride.max(1);

    grid.lay_lattice(0, stride);
    if tier.is_dense() {
        grid.lay_lattice(config.secondary_road_offset, stride);
    }

    let zones = [
        (&config.residential, ZoneLabel::Residential),
        (&config.commercial, ZoneLabel::Commercial),
        (&config.parks, ZoneLabel::Park),
    ];
    for (rects, label) in zones {
        for rect in rects {
            grid.stamp(rect, label);
        }
    }

    if tier.is_dense() {
        for rect in &config.industrial {
            grid.stamp(rect, ZoneLabel::Industrial);
        }
    }
    grid
}
