//! Burrows-Wheeler Transform over cyclic rotations.
//!
//! Rotations are sorted by prefix doubling: after the pass with step `k`
//! every rotation is ranked by its first `2k` bytes, so at most
//! `log2(n) + 1` sorts are needed and repetitive blocks cost the same as
//! random ones.

use oxibz3_core::Status;

/// Perform the Burrows-Wheeler Transform.
///
/// Returns the last column of the sorted rotation matrix and the row at which
/// the original block appears.
pub fn transform(data: &[u8]) -> (Vec<u8>, u32) {
    let n = data.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = data.iter().map(|&b| b as u32).collect();
    let mut next = vec![0u32; n];
    let mut k = 1usize;

    loop {
        let key = |i: u32| {
            let i = i as usize;
            (rank[i], rank[(i + k) % n])
        };
        sa.sort_unstable_by_key(|&i| key(i));

        next[sa[0] as usize] = 0;
        for w in 1..n {
            let bump = u32::from(key(sa[w]) != key(sa[w - 1]));
            next[sa[w] as usize] = next[sa[w - 1] as usize] + bump;
        }
        std::mem::swap(&mut rank, &mut next);

        // All rotations distinct, or every rotation compared in full.
        if rank[sa[n - 1] as usize] as usize == n - 1 || 2 * k >= n {
            break;
        }
        k *= 2;
    }

    let primary = sa.iter().position(|&i| i == 0).unwrap_or(0) as u32;
    let last = sa
        .iter()
        .map(|&i| data[(i as usize + n - 1) % n])
        .collect();

    (last, primary)
}

/// Perform the inverse Burrows-Wheeler Transform.
///
/// Fails with [`Status::BwtError`] when `primary` does not name a row.
pub fn inverse_transform(last: &[u8], primary: u32) -> Result<Vec<u8>, Status> {
    let n = last.len();
    if n == 0 {
        return if primary == 0 {
            Ok(Vec::new())
        } else {
            Err(Status::BwtError)
        };
    }
    if primary as usize >= n {
        return Err(Status::BwtError);
    }

    // Start of each byte value in the first column.
    let mut starts = [0usize; 256];
    for &byte in last {
        starts[byte as usize] += 1;
    }
    let mut total = 0;
    for slot in starts.iter_mut() {
        let count = *slot;
        *slot = total;
        total += count;
    }

    // links[row of first column] = row whose last byte it is.
    let mut links = vec![0u32; n];
    for (i, &byte) in last.iter().enumerate() {
        links[starts[byte as usize]] = i as u32;
        starts[byte as usize] += 1;
    }

    let mut out = Vec::with_capacity(n);
    let mut row = links[primary as usize] as usize;
    for _ in 0..n {
        out.push(last[row]);
        row = links[row] as usize;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bwt_empty() {
        let (last, primary) = transform(b"");
        assert!(last.is_empty());
        assert_eq!(primary, 0);
        assert_eq!(inverse_transform(&last, primary).unwrap(), b"");
    }

    #[test]
    fn test_bwt_banana() {
        let (last, primary) = transform(b"banana");
        assert_eq!(last, b"nnbaaa");
        assert_eq!(primary, 3);
        assert_eq!(inverse_transform(&last, primary).unwrap(), b"banana");
    }

    #[test]
    fn test_bwt_roundtrip() {
        let cases: [&[u8]; 7] = [
            b"a",
            b"hello world",
            b"abracadabra",
            b"mississippi",
            b"aaaaaaaaaaaa",
            b"abababababab",
            b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\n",
        ];
        for data in cases {
            let (last, primary) = transform(data);
            assert_eq!(inverse_transform(&last, primary).unwrap(), data);
        }
    }

    #[test]
    fn test_bwt_periodic_long() {
        let data: Vec<u8> = b"xyz".iter().copied().cycle().take(3000).collect();
        let (last, primary) = transform(&data);
        assert_eq!(inverse_transform(&last, primary).unwrap(), data);
    }

    #[test]
    fn test_bwt_bad_primary() {
        let (last, _) = transform(b"banana");
        assert_eq!(inverse_transform(&last, 6), Err(Status::BwtError));
        assert_eq!(inverse_transform(b"", 1), Err(Status::BwtError));
    }
}
