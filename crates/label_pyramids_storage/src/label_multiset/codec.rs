//! Binary encoding of a block of label multisets.
//!
//! All integers are big-endian. With `n` voxels:
//!
//! ```text
//! u32                 n
//! n x u64             argmax of each voxel (INVALID for an empty multiset)
//! n x u32             byte offset of each voxel's list, relative to the start of the list data
//! list data           lists, each a u32 entry count followed by (u64 id, u64 count) entries in increasing id order
//! ```
//!
//! Neighboring voxels very often hold identical multisets, so identical lists are written once and shared by offset. The
//! cached argmax lets readers that only need the majority label skip the lists entirely.

use super::{Entry, LabelId, LabelMultiset, INVALID};
use crate::{
    serialization::{u32_field, Reader},
    DecodeError, StorageResult,
};

use ahash::AHashMap;

const ENTRY_BYTES: usize = 8 + 8;

/// Encodes `multisets` in voxel order. `decode_multisets` is the exact inverse. Fails if the voxel count or a list offset
/// does not fit its `u32` field.
pub fn encode_multisets(multisets: &[LabelMultiset]) -> StorageResult<Vec<u8>> {
    let mut list_offsets: AHashMap<&[Entry], [u8; 4]> = AHashMap::default();
    let mut list_data = Vec::new();
    let mut offsets = Vec::with_capacity(multisets.len());
    for multiset in multisets {
        let offset = match list_offsets.get(multiset.entries()) {
            Some(&offset) => offset,
            None => {
                let offset = u32_field(list_data.len(), "list data")?;
                write_list(multiset.entries(), &mut list_data)?;
                list_offsets.insert(multiset.entries(), offset);
                offset
            }
        };
        offsets.push(offset);
    }

    let mut bytes = Vec::with_capacity(4 + multisets.len() * (8 + 4) + list_data.len());
    bytes.extend_from_slice(&u32_field(multisets.len(), "multiset block")?);
    for multiset in multisets {
        bytes.extend_from_slice(&multiset.arg_max().unwrap_or(INVALID).to_be_bytes());
    }
    for offset in offsets {
        bytes.extend_from_slice(&offset);
    }
    bytes.extend_from_slice(&list_data);

    Ok(bytes)
}

fn write_list(entries: &[Entry], out: &mut Vec<u8>) -> StorageResult<()> {
    out.extend_from_slice(&u32_field(entries.len(), "multiset")?);
    for entry in entries {
        out.extend_from_slice(&entry.id.to_be_bytes());
        out.extend_from_slice(&entry.count.to_be_bytes());
    }

    Ok(())
}

/// Decodes a buffer written by `encode_multisets`. Every list is checked for canonical form and against the stored argmax.
pub fn decode_multisets(bytes: &[u8]) -> Result<Vec<LabelMultiset>, DecodeError> {
    let mut header = Reader::new(bytes);
    let n = header.read_u32("voxel count")? as usize;
    // Check the claimed size before allocating anything for it.
    header.expect_remaining(n.saturating_mul(8 + 4), "argmax and offset arrays")?;

    let mut arg_maxes = Vec::with_capacity(n);
    for _ in 0..n {
        arg_maxes.push(header.read_u64("argmax array")?);
    }
    let mut offsets = Vec::with_capacity(n);
    for _ in 0..n {
        offsets.push(header.read_u32("offset array")? as usize);
    }
    let list_data = header.rest();

    let mut decoded_lists: AHashMap<usize, LabelMultiset> = AHashMap::default();
    let mut list_data_end = 0;
    let mut multisets = Vec::with_capacity(n);
    for (voxel, (&offset, &stored_arg_max)) in offsets.iter().zip(arg_maxes.iter()).enumerate() {
        let multiset = match decoded_lists.get(&offset) {
            Some(multiset) => multiset.clone(),
            None => {
                let (multiset, end) = read_list(list_data, offset, voxel)?;
                list_data_end = list_data_end.max(end);
                decoded_lists.insert(offset, multiset.clone());
                multiset
            }
        };

        let computed: LabelId = multiset.arg_max().unwrap_or(INVALID);
        if computed != stored_arg_max {
            return Err(DecodeError::ArgMaxMismatch {
                voxel,
                stored: stored_arg_max,
                computed,
            });
        }
        multisets.push(multiset);
    }

    if list_data_end < list_data.len() {
        return Err(DecodeError::TrailingBytes {
            what: "list data",
            trailing: list_data.len() - list_data_end,
        });
    }

    Ok(multisets)
}

fn read_list(
    list_data: &[u8],
    offset: usize,
    voxel: usize,
) -> Result<(LabelMultiset, usize), DecodeError> {
    if offset >= list_data.len() {
        return Err(DecodeError::OffsetOutOfRange {
            voxel,
            offset,
            len: list_data.len(),
        });
    }

    let mut reader = Reader::new(&list_data[offset..]);
    let num_entries = reader.read_u32("list length")? as usize;
    reader.expect_remaining(num_entries.saturating_mul(ENTRY_BYTES), "list entries")?;
    let mut entries = Vec::with_capacity(num_entries);
    for _ in 0..num_entries {
        let id = reader.read_u64("label id")?;
        let count = reader.read_u64("label count")?;
        entries.push(Entry::new(id, count));
    }
    let end = offset + reader.position();

    let multiset = LabelMultiset::try_from_canonical(entries)
        .map_err(|reason| DecodeError::NonCanonical { voxel, reason })?;

    Ok((multiset, end))
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn sample_block() -> Vec<LabelMultiset> {
        vec![
            vec![5, 5, 5, 4].into_iter().collect(),
            LabelMultiset::singleton(4),
            LabelMultiset::singleton(4),
            LabelMultiset::new(),
            vec![1, 4, 1, 4].into_iter().collect(),
            LabelMultiset::from_entries(vec![Entry::new(u64::MAX - 1, 8)]),
        ]
    }

    #[test]
    fn decode_inverts_encode() {
        let block = sample_block();

        assert_eq!(decode_multisets(&encode_multisets(&block).unwrap()).unwrap(), block);
    }

    #[test]
    fn counts_beyond_32_bits_are_kept() {
        let big = LabelMultiset::from_entries(vec![Entry::new(3, u32::MAX as u64), Entry::new(3, 2)]);
        let block = vec![big.clone(), big.merge(&big)];

        let decoded = decode_multisets(&encode_multisets(&block).unwrap()).unwrap();

        assert_eq!(decoded[0].count(3), u32::MAX as u64 + 2);
        assert_eq!(decoded[1].count(3), 2 * (u32::MAX as u64 + 2));
    }

    #[test]
    fn decode_inverts_encode_for_random_blocks() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..50 {
            let num_voxels = rng.gen_range(0..64);
            let block: Vec<LabelMultiset> = (0..num_voxels)
                .map(|_| {
                    let len = rng.gen_range(0..5);
                    LabelMultiset::from_entries(
                        (0..len).map(|_| Entry::new(rng.gen_range(0..6), rng.gen_range(1..9))),
                    )
                })
                .collect();

            assert_eq!(decode_multisets(&encode_multisets(&block).unwrap()).unwrap(), block);
        }
    }

    #[test]
    fn identical_lists_are_stored_once() {
        let shared = LabelMultiset::from_entries(vec![Entry::new(1, 3), Entry::new(2, 5)]);
        let block = vec![shared; 100];

        let bytes = encode_multisets(&block).unwrap();

        // Header, arrays, and one list with 2 entries.
        assert_eq!(bytes.len(), 4 + 100 * 12 + 4 + 2 * ENTRY_BYTES);
    }

    #[test]
    fn truncated_buffer_is_an_error() {
        let bytes = encode_multisets(&sample_block()).unwrap();

        for cut in [0, 3, 10, bytes.len() - 1] {
            assert!(
                decode_multisets(&bytes[..cut]).is_err(),
                "decoding {} of {} bytes should fail",
                cut,
                bytes.len()
            );
        }
    }

    #[test]
    fn corrupt_argmax_is_detected() {
        let mut bytes = encode_multisets(&[LabelMultiset::singleton(7)]).unwrap();
        // The first argmax occupies bytes 4..12.
        bytes[11] = 8;

        assert_eq!(
            decode_multisets(&bytes),
            Err(DecodeError::ArgMaxMismatch {
                voxel: 0,
                stored: 8,
                computed: 7
            })
        );
    }

    #[test]
    fn unsorted_list_is_detected() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&2u64.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        write_list(&[Entry::new(2, 1), Entry::new(1, 1)], &mut bytes).unwrap();

        assert!(matches!(
            decode_multisets(&bytes),
            Err(DecodeError::NonCanonical { voxel: 0, .. })
        ));
    }

    #[test]
    fn trailing_bytes_are_detected() {
        let mut bytes = encode_multisets(&sample_block()).unwrap();
        bytes.push(0);

        assert!(matches!(
            decode_multisets(&bytes),
            Err(DecodeError::TrailingBytes { .. })
        ));
    }
}
