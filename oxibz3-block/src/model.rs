//! Context model for MTF symbols.
//!
//! Zero is by far the most common symbol after BWT + MTF, so each symbol is
//! coded as a zero flag (context: length of the current zero run, capped at
//! 3) followed, for non-zero symbols, by `symbol - 1` on an 8-bit tree
//! (context: whether the previous symbol was small).

use crate::range_coder::{PROB_INIT, RangeDecoder, RangeEncoder};
use oxibz3_core::Status;

const RUN_CONTEXTS: usize = 4;
const TREE_CONTEXTS: usize = 2;

#[derive(Debug, Clone)]
struct SymbolModel {
    zero: [u16; RUN_CONTEXTS],
    tree: [[u16; 256]; TREE_CONTEXTS],
    run: usize,
    prev: u8,
}

impl SymbolModel {
    fn new() -> Self {
        Self {
            zero: [PROB_INIT; RUN_CONTEXTS],
            tree: [[PROB_INIT; 256]; TREE_CONTEXTS],
            run: 0,
            prev: 0,
        }
    }

    fn tree_context(&self) -> usize {
        usize::from(self.prev > 2)
    }

    fn update(&mut self, symbol: u8) {
        self.run = if symbol == 0 {
            (self.run + 1).min(RUN_CONTEXTS - 1)
        } else {
            0
        };
        self.prev = symbol;
    }
}

/// Entropy-code a sequence of MTF symbols.
pub fn encode(symbols: &[u8]) -> Vec<u8> {
    let mut model = SymbolModel::new();
    let mut rc = RangeEncoder::with_capacity(symbols.len() / 2 + 16);

    for &symbol in symbols {
        let run = model.run;
        if symbol == 0 {
            rc.encode_bit(&mut model.zero[run], 0);
        } else {
            rc.encode_bit(&mut model.zero[run], 1);
            let ctx = model.tree_context();
            rc.encode_bit_tree(&mut model.tree[ctx], 8, u32::from(symbol - 1));
        }
        model.update(symbol);
    }

    rc.finish()
}

/// Decode exactly `count` symbols from `payload`.
pub fn decode(payload: &[u8], count: usize) -> Result<Vec<u8>, Status> {
    let mut model = SymbolModel::new();
    let mut rc = RangeDecoder::new(payload)?;
    let mut symbols = Vec::with_capacity(count);

    for _ in 0..count {
        let run = model.run;
        let symbol = if rc.decode_bit(&mut model.zero[run])? == 0 {
            0
        } else {
            let ctx = model.tree_context();
            let value = rc.decode_bit_tree(&mut model.tree[ctx], 8)?;
            // 255 would decode to symbol 256.
            u8::try_from(value + 1).map_err(|_| Status::OutOfBounds)?
        };
        symbols.push(symbol);
        model.update(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let mut symbols = vec![0u8; 500];
        symbols.extend((0..=255u8).cycle().take(1000));
        symbols.extend([255, 255, 1, 0, 0, 2]);

        let coded = encode(&symbols);
        assert_eq!(decode(&coded, symbols.len()).unwrap(), symbols);
    }

    #[test]
    fn test_zero_runs_compress() {
        let symbols = vec![0u8; 10_000];
        let coded = encode(&symbols);
        assert!(coded.len() < 100, "coded {} bytes", coded.len());
    }

    #[test]
    fn test_empty() {
        let coded = encode(&[]);
        assert_eq!(decode(&coded, 0).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_truncated() {
        let symbols: Vec<u8> = (0..=255u8).cycle().take(4000).collect();
        let coded = encode(&symbols);
        let err = decode(&coded[..coded.len() / 2], symbols.len()).unwrap_err();
        assert_eq!(err, Status::TruncatedData);
    }
}
