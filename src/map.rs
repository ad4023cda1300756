use tracing::{debug, info};

use crate::error::MapError;
use crate::vector::{Vec2f, Vec2i};
use crate::wad::{DirectoryEntry, MapLumps, Wad, find_map_lumps};

/// Maximum number of vertices, and of linedefs, a map can hold.
pub const MAP_CAPACITY: usize = 255;

pub const VERTEX_RECORD_SIZE: u32 = 4;
pub const LINEDEF_RECORD_SIZE: u32 = 14;

/// Map edge between two vertex indices. Only `start` and `end` are
/// interpreted, the rest is carried through from the WAD record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Linedef {
    pub start: u16,
    pub end: u16,
    pub flags: u16,
    pub special: u16,
    pub sector_tag: u16,
    pub right_sidedef: u16,
    pub left_sidedef: u16,
}

impl Linedef {
    pub const fn new(start: u16, end: u16) -> Self {
        Self {
            start,
            end,
            flags: 0,
            special: 0,
            sector_tag: 0,
            right_sidedef: 0,
            left_sidedef: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    vertices: Vec<Vec2i>,
    linedefs: Vec<Linedef>,
}

impl Map {
    /// Validates capacity and that every linedef references existing vertices.
    pub fn new(vertices: Vec<Vec2i>, linedefs: Vec<Linedef>) -> Result<Self, MapError> {
        if vertices.len() > MAP_CAPACITY {
            return Err(MapError::TooManyVertices {
                count: vertices.len(),
                capacity: MAP_CAPACITY,
            });
        }
        if linedefs.len() > MAP_CAPACITY {
            return Err(MapError::TooManyLinedefs {
                count: linedefs.len(),
                capacity: MAP_CAPACITY,
            });
        }
        for (i, line) in linedefs.iter().enumerate() {
            for vertex in [line.start, line.end] {
                if vertex as usize >= vertices.len() {
                    return Err(MapError::DanglingVertex { linedef: i, vertex });
                }
            }
        }
        Ok(Self { vertices, linedefs })
    }

    /// Built-in 100x100 square, used when no WAD is supplied.
    pub fn fixture() -> Self {
        Self {
            vertices: vec![
                Vec2i::new(50, 50),
                Vec2i::new(150, 50),
                Vec2i::new(150, 150),
                Vec2i::new(50, 150),
            ],
            linedefs: vec![
                Linedef::new(0, 1),
                Linedef::new(1, 2),
                Linedef::new(2, 3),
                Linedef::new(3, 0),
            ],
        }
    }

    /// Decodes the VERTEXES and LINEDEFS records addressed by `lumps`.
    pub fn from_lumps(wad: &Wad, lumps: &MapLumps) -> Result<Self, MapError> {
        let vertex_count = record_count(&lumps.vertexes, "VERTEXES", VERTEX_RECORD_SIZE)?;
        let linedef_count = record_count(&lumps.linedefs, "LINEDEFS", LINEDEF_RECORD_SIZE)?;
        if vertex_count > MAP_CAPACITY {
            return Err(MapError::TooManyVertices {
                count: vertex_count,
                capacity: MAP_CAPACITY,
            });
        }
        if linedef_count > MAP_CAPACITY {
            return Err(MapError::TooManyLinedefs {
                count: linedef_count,
                capacity: MAP_CAPACITY,
            });
        }

        let base = lumps.vertexes.lump_offset as usize;
        let mut vertices = Vec::with_capacity(vertex_count);
        for i in 0..vertex_count {
            let at = base + i * VERTEX_RECORD_SIZE as usize;
            let x = wad.read_i16(at)?;
            let y = wad.read_i16(at + 2)?;
            vertices.push(Vec2i::new(x.into(), y.into()));
        }

        let base = lumps.linedefs.lump_offset as usize;
        let mut linedefs = Vec::with_capacity(linedef_count);
        for i in 0..linedef_count {
            let at = base + i * LINEDEF_RECORD_SIZE as usize;
            linedefs.push(Linedef {
                start: wad.read_u16(at)?,
                end: wad.read_u16(at + 2)?,
                flags: wad.read_u16(at + 4)?,
                special: wad.read_u16(at + 6)?,
                sector_tag: wad.read_u16(at + 8)?,
                right_sidedef: wad.read_u16(at + 10)?,
                left_sidedef: wad.read_u16(at + 12)?,
            });
        }

        Self::new(vertices, linedefs)
    }

    /// Header, directory and lump lookup for `map_name`, then decode.
    pub fn load(wad: &Wad, map_name: &str) -> Result<Self, MapError> {
        let header = wad.header()?;
        debug!(?header, "wad header");
        let directory = wad.directory(&header)?;
        let lumps = find_map_lumps(&directory, map_name)?;
        let map = Self::from_lumps(wad, &lumps)?;
        info!(
            map = map_name,
            vertices = map.vertices.len(),
            linedefs = map.linedefs.len(),
            "decoded map"
        );
        Ok(map)
    }

    pub fn vertices(&self) -> &[Vec2i] {
        &self.vertices
    }

    pub fn linedefs(&self) -> &[Linedef] {
        &self.linedefs
    }

    /// # Panics
    /// If `index` is not below `vertices().len()`.
    #[inline]
    pub fn vertex(&self, index: usize) -> Vec2i {
        self.vertices[index]
    }

    /// Endpoints of every linedef, in order.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2i, Vec2i)> + '_ {
        self.linedefs
            .iter()
            .map(|l| (self.vertex(l.start as usize), self.vertex(l.end as usize)))
    }

    /// Copy scaled and translated so every vertex lies inside
    /// `[margin, width - margin] x [margin, height - margin]`, aspect preserved.
    pub fn fit_to(&self, width: u32, height: u32, margin: u32) -> Map {
        let Some(first) = self.vertices.first() else {
            return self.clone();
        };
        let (mut min, mut max) = (*first, *first);
        for v in &self.vertices {
            min = Vec2i::new(min.x.min(v.x), min.y.min(v.y));
            max = Vec2i::new(max.x.max(v.x), max.y.max(v.y));
        }

        let span = Vec2f::new(((max.x - min.x).max(1)) as f32, ((max.y - min.y).max(1)) as f32);
        let avail_w = width.saturating_sub(2 * margin).max(1) as f32;
        let avail_h = height.saturating_sub(2 * margin).max(1) as f32;
        let scale = (avail_w / span.x).min(avail_h / span.y);

        let vertices = self
            .vertices
            .iter()
            .map(|v| {
                let x = (v.x - min.x) as f32 * scale + margin as f32;
                let y = (v.y - min.y) as f32 * scale + margin as f32;
                Vec2i::new(x.round() as i32, y.round() as i32)
            })
            .collect();

        Map {
            vertices,
            linedefs: self.linedefs.clone(),
        }
    }
}

fn record_count(
    entry: &DirectoryEntry,
    lump: &'static str,
    record: u32,
) -> Result<usize, MapError> {
    if entry.lump_size % record != 0 {
        return Err(MapError::LumpSize {
            lump,
            size: entry.lump_size,
            record,
        });
    }
    Ok((entry.lump_size / record) as usize)
}

const DEMO_ROWS: [[u8; 16]; 16] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 2, 2, 2, 0, 0, 0, 0, 3, 0, 3, 0, 0, 1],
    [1, 0, 0, 2, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 2, 0, 2, 0, 0, 0, 0, 3, 0, 3, 0, 0, 1],
    [1, 0, 0, 2, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 4, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 1],
    [1, 0, 5, 0, 0, 0, 0, 0, 0, 4, 0, 0, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 4, 4, 4, 4, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// Row-major tile map, 0 empty, anything else a wall type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<u8>,
}

impl TileGrid {
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, MapError> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(MapError::RaggedGrid {
                    row,
                    len: r.len(),
                    expected: width,
                });
            }
            tiles.extend_from_slice(r);
        }
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
        })
    }

    /// Built-in enclosed level.
    pub fn demo() -> Self {
        Self {
            width: DEMO_ROWS[0].len(),
            height: DEMO_ROWS.len(),
            tiles: DEMO_ROWS.iter().flatten().copied().collect(),
        }
    }

    /// Empty room of `width` x `height` cells with a border of `wall` tiles.
    pub fn enclosed(width: usize, height: usize, wall: u8) -> Self {
        let mut tiles = vec![0u8; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
                    tiles[y * width + x] = wall;
                }
            }
        }
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tile value, `None` outside the grid.
    #[inline]
    pub fn tile_at(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.tiles[y as usize * self.width + x as usize])
    }

    /// Whether every border tile is a wall, which guarantees ray termination.
    pub fn is_enclosed(&self) -> bool {
        if self.width == 0 || self.height == 0 {
            return false;
        }
        let (w, h) = (self.width as i32, self.height as i32);
        let solid = |x, y| self.tile_at(x, y).is_some_and(|t| t != 0);
        (0..w).all(|x| solid(x, 0) && solid(x, h - 1))
            && (0..h).all(|y| solid(0, y) && solid(w - 1, y))
    }
}
