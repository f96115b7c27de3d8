//! Byte layouts of everything other than label multisets: plain label blocks, label lists and block coordinate lists. All
//! integers are big-endian, so blocks written on any machine read back the same everywhere.

use crate::{DataType, DecodeError, LabelId, StorageError, StorageResult};

use label_pyramids_core::prelude::*;

use core::convert::TryFrom;

/// Encodes label values (in voxel order) as `data_type`. Values that don't fit the type are an error, never truncated.
pub fn encode_label_values(data_type: DataType, values: &[LabelId]) -> StorageResult<Vec<u8>> {
    let mut bytes = Vec::with_capacity(values.len() * data_type.size_in_bytes());
    match data_type {
        DataType::Uint64 | DataType::Int64 => {
            for &v in values {
                bytes.extend_from_slice(&v.to_be_bytes());
            }
        }
        DataType::Uint32 => {
            for &v in values {
                let narrow =
                    u32::try_from(v).map_err(|_| StorageError::ValueOutOfRange { value: v, data_type })?;
                bytes.extend_from_slice(&narrow.to_be_bytes());
            }
        }
        other => {
            return Err(StorageError::UnexpectedDataType {
                path: String::new(),
                data_type: other.to_string(),
                expected: "an integer label type",
            })
        }
    }

    Ok(bytes)
}

/// Decodes label values of `data_type`. Signed 64-bit labels are reinterpreted as unsigned.
pub fn decode_label_values(data_type: DataType, bytes: &[u8]) -> StorageResult<Vec<LabelId>> {
    let mut reader = Reader::new(bytes);
    let values = match data_type {
        DataType::Uint64 => read_all(&mut reader, 8, |r| r.read_u64("uint64 label"))?,
        DataType::Int64 => read_all(&mut reader, 8, |r| r.read_i64("int64 label").map(|v| v as u64))?,
        DataType::Uint32 => read_all(&mut reader, 4, |r| r.read_u32("uint32 label").map(u64::from))?,
        other => {
            return Err(StorageError::UnexpectedDataType {
                path: String::new(),
                data_type: other.to_string(),
                expected: "an integer label type",
            })
        }
    };
    reader.finish("label values")?;

    Ok(values)
}

fn read_all<T>(
    reader: &mut Reader<'_>,
    value_size: usize,
    mut read_one: impl FnMut(&mut Reader<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let n = reader.remaining() / value_size;
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        values.push(read_one(reader)?);
    }

    Ok(values)
}

/// A length or offset as the big-endian `u32` that every list header stores. Never truncated.
pub(crate) fn u32_field(len: usize, what: &'static str) -> StorageResult<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| StorageError::TooLong { what, len })
}

/// Encodes a strictly increasing list of labels, e.g. the unique labels of one block.
pub fn encode_label_list(labels: &[LabelId]) -> StorageResult<Vec<u8>> {
    debug_assert!(labels.windows(2).all(|w| w[0] < w[1]));

    let mut bytes = Vec::with_capacity(4 + labels.len() * 8);
    bytes.extend_from_slice(&u32_field(labels.len(), "label list")?);
    for label in labels {
        bytes.extend_from_slice(&label.to_be_bytes());
    }

    Ok(bytes)
}

pub fn decode_label_list(bytes: &[u8]) -> Result<Vec<LabelId>, DecodeError> {
    let mut reader = Reader::new(bytes);
    let n = reader.read_u32("label list length")? as usize;
    reader.expect_remaining(n.saturating_mul(8), "label list")?;
    let mut labels = Vec::with_capacity(n);
    for _ in 0..n {
        labels.push(reader.read_u64("label list")?);
    }
    reader.finish("label list")?;

    if labels.windows(2).any(|w| w[0] >= w[1]) {
        return Err(DecodeError::Unsorted { what: "label list" });
    }

    Ok(labels)
}

/// Encodes a list of block grid positions sorted by `zyx` without duplicates.
pub fn encode_grid_positions(positions: &[Point3i]) -> StorageResult<Vec<u8>> {
    debug_assert!(positions.windows(2).all(|w| w[0].zyx() < w[1].zyx()));

    let mut bytes = Vec::with_capacity(4 + positions.len() * 12);
    bytes.extend_from_slice(&u32_field(positions.len(), "block list")?);
    for p in positions {
        for c in p.0.iter() {
            bytes.extend_from_slice(&c.to_be_bytes());
        }
    }

    Ok(bytes)
}

pub fn decode_grid_positions(bytes: &[u8]) -> Result<Vec<Point3i>, DecodeError> {
    let mut reader = Reader::new(bytes);
    let n = reader.read_u32("block list length")? as usize;
    reader.expect_remaining(n.saturating_mul(12), "block list")?;
    let mut positions = Vec::with_capacity(n);
    for _ in 0..n {
        let x = reader.read_i32("block coordinate")?;
        let y = reader.read_i32("block coordinate")?;
        let z = reader.read_i32("block coordinate")?;
        positions.push(PointN([x, y, z]));
    }
    reader.finish("block list")?;

    if positions.windows(2).any(|w| w[0].zyx() >= w[1].zyx()) {
        return Err(DecodeError::Unsorted { what: "block list" });
    }

    Ok(positions)
}

/// Big-endian cursor over a byte slice that reports where it ran out.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    pub(crate) fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    pub(crate) fn expect_remaining(&self, n: usize, what: &'static str) -> Result<(), DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::Truncated {
                what,
                offset: self.bytes.len(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N], DecodeError> {
        self.expect_remaining(N, what)?;
        let mut out = [0; N];
        out.copy_from_slice(&self.bytes[self.position..self.position + N]);
        self.position += N;
        Ok(out)
    }

    pub(crate) fn read_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        self.take::<4>(what).map(u32::from_be_bytes)
    }

    pub(crate) fn read_i32(&mut self, what: &'static str) -> Result<i32, DecodeError> {
        self.take::<4>(what).map(i32::from_be_bytes)
    }

    pub(crate) fn read_u64(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        self.take::<8>(what).map(u64::from_be_bytes)
    }

    pub(crate) fn read_i64(&mut self, what: &'static str) -> Result<i64, DecodeError> {
        self.take::<8>(what).map(i64::from_be_bytes)
    }

    /// Fails unless every byte was consumed.
    pub(crate) fn finish(self, what: &'static str) -> Result<(), DecodeError> {
        match self.remaining() {
            0 => Ok(()),
            trailing => Err(DecodeError::TrailingBytes { what, trailing }),
        }
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
