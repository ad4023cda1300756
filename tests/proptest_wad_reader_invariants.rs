//! Property-based invariant tests for the WAD reader.
//!
//! 1. Field reads succeed exactly when `offset + width <= len`
//! 2. Encoded headers decode to the same fields; short buffers are rejected
//! 3. Arbitrary bytes never panic the header or directory decoders

use proptest::prelude::*;
use wadcaster::error::WadError;
use wadcaster::wad::{HEADER_SIZE, Wad, WadKind};

fn encode_header(tag: &[u8; 4], count: u32, offset: u32) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&offset.to_le_bytes());
    out
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Per-field bounds checks
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn read_u32_bounds(
        bytes in prop::collection::vec(any::<u8>(), 0..64),
        offset in 0usize..80,
    ) {
        let wad = Wad::from_bytes(bytes.clone());
        match wad.read_u32(offset) {
            Ok(value) => {
                prop_assert!(offset + 4 <= bytes.len());
                let expected = u32::from_le_bytes([
                    bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3],
                ]);
                prop_assert_eq!(value, expected);
            }
            Err(WadError::OutOfBounds { offset: o, width, len }) => {
                prop_assert!(offset + 4 > bytes.len());
                prop_assert_eq!((o, width, len), (offset, 4, bytes.len()));
            }
            Err(other) => prop_assert!(false, "unexpected error {}", other),
        }
    }

    #[test]
    fn narrow_reads_bounds(
        bytes in prop::collection::vec(any::<u8>(), 0..16),
        offset in 0usize..20,
    ) {
        let wad = Wad::from_bytes(bytes.clone());
        prop_assert_eq!(wad.read_u8(offset).is_ok(), offset < bytes.len());
        prop_assert_eq!(wad.read_u16(offset).is_ok(), offset + 2 <= bytes.len());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Header encoding
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn header_round_trip(
        iwad in any::<bool>(),
        count in any::<u32>(),
        offset in any::<u32>(),
        trailing in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let tag = if iwad { b"IWAD" } else { b"PWAD" };
        let mut bytes = encode_header(tag, count, offset);
        bytes.extend_from_slice(&trailing);

        let header = Wad::from_bytes(bytes).header().unwrap();
        prop_assert_eq!(header.kind, if iwad { WadKind::Iwad } else { WadKind::Pwad });
        prop_assert_eq!(header.directory_count, count);
        prop_assert_eq!(header.directory_offset, offset);
    }

    #[test]
    fn short_buffers_are_too_small(len in 0usize..HEADER_SIZE) {
        let mut bytes = encode_header(b"IWAD", 3, 12);
        bytes.truncate(len);
        let result = Wad::from_bytes(bytes).header();
        prop_assert!(matches!(result, Err(WadError::TooSmall { len: l }) if l == len), "unexpected result {:?}", result);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. No panics on arbitrary input
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_bytes_never_panic(
        bytes in prop::collection::vec(any::<u8>(), 0..256),
        entry_offset in 0usize..300,
    ) {
        let wad = Wad::from_bytes(bytes);
        if let Ok(header) = wad.header() {
            // Cap the count so huge bogus headers stay cheap.
            let header = wadcaster::wad::Header {
                directory_count: header.directory_count.min(64),
                ..header
            };
            let _ = wad.directory(&header);
        }
        let _ = wad.directory_entry(entry_offset);
    }
}
