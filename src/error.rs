use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::vector::Vec2i;

/// Failures while loading or decoding a WAD container.
#[derive(Debug, Error)]
pub enum WadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("short read on {path}: expected {expected} bytes, got {actual}")]
    Read {
        path: PathBuf,
        expected: u64,
        actual: usize,
    },

    #[error("wad buffer has been released")]
    NullContainer,

    #[error("{width}-byte read at offset {offset} exceeds wad size {len}")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("wad is {len} bytes, too small for the 12-byte header")]
    TooSmall { len: usize },

    #[error("invalid wad type tag {tag:?}")]
    InvalidFormat { tag: [u8; 4] },

    #[error("map marker {name} not found in directory")]
    MissingMap { name: String },

    #[error("map {map} has no {lump} lump")]
    MissingLump { map: String, lump: &'static str },
}

/// Failures while building a map model.
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Wad(#[from] WadError),

    #[error("{lump} lump size {size} is not a multiple of {record} bytes")]
    LumpSize {
        lump: &'static str,
        size: u32,
        record: u32,
    },

    #[error("map has {count} vertices, capacity is {capacity}")]
    TooManyVertices { count: usize, capacity: usize },

    #[error("map has {count} linedefs, capacity is {capacity}")]
    TooManyLinedefs { count: usize, capacity: usize },

    #[error("linedef {linedef} references missing vertex {vertex}")]
    DanglingVertex { linedef: usize, vertex: u16 },

    #[error("grid row {row} has {len} tiles, expected {expected}")]
    RaggedGrid { row: usize, len: usize, expected: usize },
}

/// Invariant violations during a frame render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    #[error("column {column}: ray left the grid at cell ({}, {})", cell.x, cell.y)]
    GridTraversal { column: usize, cell: Vec2i },

    #[error("column {column}: degenerate perpendicular distance {distance}")]
    DegenerateProjection { column: usize, distance: f32 },
}

impl RenderError {
    pub fn column(&self) -> usize {
        match self {
            RenderError::GridTraversal { column, .. }
            | RenderError::DegenerateProjection { column, .. } => *column,
        }
    }

    /// Same kind of failure at the same column, ignoring the payload.
    pub fn same_site(&self, other: &RenderError) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.column() == other.column()
    }

    /// Same error attributed to screen column `column`.
    pub fn at_column(self, column: usize) -> Self {
        match self {
            RenderError::GridTraversal { cell, .. } => RenderError::GridTraversal { column, cell },
            RenderError::DegenerateProjection { distance, .. } => {
                RenderError::DegenerateProjection { column, distance }
            }
        }
    }
}

/// Rejected command line settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("resolution {width}x{height} must be non-zero")]
    ZeroResolution { width: u32, height: u32 },

    #[error("field of view {0} must be in (0, 180) degrees")]
    FieldOfView(f32),

    #[error("{name} must be positive, got {value}")]
    Speed { name: &'static str, value: f32 },
}
