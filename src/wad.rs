//! WAD container reader.
//!
//! Every field read is bounds-checked on its own, so a truncated file fails
//! at the first unsafe access with the exact offset instead of up front.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::WadError;

pub const HEADER_SIZE: usize = 12;
pub const DIRECTORY_ENTRY_SIZE: usize = 16;
pub const LUMP_NAME_LEN: usize = 8;

/// Lumps that can follow a map marker before the next map begins.
const MAP_LUMPS: &[&str] = &[
    "THINGS", "LINEDEFS", "SIDEDEFS", "VERTEXES", "SEGS", "SSECTORS", "NODES", "SECTORS",
    "REJECT", "BLOCKMAP", "BEHAVIOR",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WadKind {
    Iwad,
    Pwad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: WadKind,
    pub directory_count: u32,
    pub directory_offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub lump_offset: u32,
    pub lump_size: u32,
    pub name: [u8; LUMP_NAME_LEN],
}

impl DirectoryEntry {
    /// Lump name up to the first NUL.
    pub fn name(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(LUMP_NAME_LEN);
        std::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

/// Directory entries of one map, found after its marker lump.
#[derive(Debug, Clone, Copy)]
pub struct MapLumps {
    pub vertexes: DirectoryEntry,
    pub linedefs: DirectoryEntry,
}

/// Reads `reader` to the end, failing if fewer than `expected` bytes arrive.
fn read_all(mut reader: impl Read, expected: u64, path: &Path) -> Result<Vec<u8>, WadError> {
    let mut data = Vec::with_capacity(expected as usize);
    reader.read_to_end(&mut data).map_err(|source| WadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if (data.len() as u64) < expected {
        return Err(WadError::Read {
            path: path.to_path_buf(),
            expected,
            actual: data.len(),
        });
    }
    Ok(data)
}

/// In-memory WAD file.
pub struct Wad {
    data: Option<Vec<u8>>,
}

impl Wad {
    /// Reads the whole file at `path` into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WadError> {
        let path = path.as_ref();
        let io_err = |source| WadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_err)?;
        let expected = file.metadata().map_err(io_err)?.len();
        let data = read_all(file, expected, path)?;

        info!(path = %path.display(), bytes = data.len(), "loaded wad");
        Ok(Self { data: Some(data) })
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data: Some(data) }
    }

    /// Byte length, zero once released.
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the buffer. Later reads fail with [`WadError::NullContainer`].
    pub fn release(&mut self) {
        if let Some(data) = self.data.take() {
            debug!(bytes = data.len(), "released wad buffer");
        }
    }

    pub fn is_released(&self) -> bool {
        self.data.is_none()
    }

    fn bytes(&self, offset: usize, width: usize) -> Result<&[u8], WadError> {
        let data = self.data.as_deref().ok_or(WadError::NullContainer)?;
        let out_of_bounds = || WadError::OutOfBounds {
            offset,
            width,
            len: data.len(),
        };
        let end = offset.checked_add(width).ok_or_else(out_of_bounds)?;
        data.get(offset..end).ok_or_else(out_of_bounds)
    }

    fn array<const N: usize>(&self, offset: usize) -> Result<[u8; N], WadError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(offset, N)?);
        Ok(out)
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, WadError> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn read_u16(&self, offset: usize) -> Result<u16, WadError> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn read_i16(&self, offset: usize) -> Result<i16, WadError> {
        self.array(offset).map(i16::from_le_bytes)
    }

    pub fn read_u32(&self, offset: usize) -> Result<u32, WadError> {
        self.array(offset).map(u32::from_le_bytes)
    }

    pub fn header(&self) -> Result<Header, WadError> {
        if self.data.is_none() {
            return Err(WadError::NullContainer);
        }
        if self.len() < HEADER_SIZE {
            return Err(WadError::TooSmall { len: self.len() });
        }

        let mut tag = [0u8; 4];
        for (i, byte) in tag.iter_mut().enumerate() {
            *byte = self.read_u8(i)?;
        }
        let kind = match &tag {
            b"IWAD" => WadKind::Iwad,
            b"PWAD" => WadKind::Pwad,
            _ => return Err(WadError::InvalidFormat { tag }),
        };

        Ok(Header {
            kind,
            directory_count: self.read_u32(4)?,
            directory_offset: self.read_u32(8)?,
        })
    }

    pub fn directory_entry(&self, offset: usize) -> Result<DirectoryEntry, WadError> {
        let lump_offset = self.read_u32(offset)?;
        let lump_size = self.read_u32(offset + 4)?;

        let mut name = [0u8; LUMP_NAME_LEN];
        for (i, byte) in name.iter_mut().enumerate() {
            *byte = self.read_u8(offset + 8 + i)?;
        }

        Ok(DirectoryEntry {
            lump_offset,
            lump_size,
            name,
        })
    }

    /// All entries of the directory table described by `header`.
    pub fn directory(&self, header: &Header) -> Result<Vec<DirectoryEntry>, WadError> {
        let base = header.directory_offset as usize;
        let entries = (0..header.directory_count as usize)
            .map(|i| self.directory_entry(base + i * DIRECTORY_ENTRY_SIZE))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = entries.len(), offset = base, "read wad directory");
        Ok(entries)
    }

    /// Raw bytes of a lump.
    pub fn lump(&self, entry: &DirectoryEntry) -> Result<&[u8], WadError> {
        self.bytes(entry.lump_offset as usize, entry.lump_size as usize)
    }
}

/// Locates the VERTEXES and LINEDEFS lumps belonging to `map_name`.
pub fn find_map_lumps(directory: &[DirectoryEntry], map_name: &str) -> Result<MapLumps, WadError> {
    let marker = directory
        .iter()
        .position(|e| e.name().eq_ignore_ascii_case(map_name))
        .ok_or_else(|| WadError::MissingMap {
            name: map_name.to_string(),
        })?;

    let map_lumps: Vec<&DirectoryEntry> = directory[marker + 1..]
        .iter()
        .take_while(|e| MAP_LUMPS.contains(&e.name()))
        .collect();

    let find = |lump: &'static str| {
        map_lumps
            .iter()
            .find(|e| e.name() == lump)
            .map(|e| **e)
            .ok_or_else(|| WadError::MissingLump {
                map: map_name.to_string(),
                lump,
            })
    };

    Ok(MapLumps {
        vertexes: find("VERTEXES")?,
        linedefs: find("LINEDEFS")?,
    })
}
