//! Move-to-Front transform.
//!
//! Each byte is replaced by its position in a recency list, then moved to the
//! front. After the BWT, runs of equal bytes turn into runs of zeros.

fn identity() -> [u8; 256] {
    let mut list = [0u8; 256];
    for (i, slot) in list.iter_mut().enumerate() {
        *slot = i as u8;
    }
    list
}

/// Perform the Move-to-Front transform.
pub fn transform(data: &[u8]) -> Vec<u8> {
    let mut list = identity();
    let mut out = Vec::with_capacity(data.len());

    for &byte in data {
        // Every byte value is in the list, so the scan always stops.
        let mut pos = 0;
        while list[pos] != byte {
            pos += 1;
        }
        out.push(pos as u8);
        list.copy_within(0..pos, 1);
        list[0] = byte;
    }

    out
}

/// Perform the inverse Move-to-Front transform.
pub fn inverse_transform(data: &[u8]) -> Vec<u8> {
    let mut list = identity();
    let mut out = Vec::with_capacity(data.len());

    for &pos in data {
        let pos = pos as usize;
        let byte = list[pos];
        out.push(byte);
        list.copy_within(0..pos, 1);
        list[0] = byte;
    }

    out
}
