//! Streaming sessions end to end.

use oxibz3::{
    BLOCK_SIZE_MIN, Bz3Error, DecodeOptions, Decoder, EncodeOptions, Encoder, Format, decode,
    encode, scan,
};
use std::io::{Cursor, Read, Write};

const TEXT: &[u8] = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\n";

fn sample(len: usize) -> Vec<u8> {
    let mut state = 0x2545_F491u32;
    (0..len)
        .map(|i| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            // Mix text with noise so both block modes show up.
            if i % 3 == 0 { (state >> 24) as u8 } else { TEXT[i % TEXT.len()] }
        })
        .collect()
}

#[test]
fn test_read_sizes_follow_requests() {
    let packed = encode(TEXT, &EncodeOptions::new().with_block_size(1 << 20)).unwrap();
    let mut dec = Decoder::new(Cursor::new(packed), DecodeOptions::new()).unwrap();

    assert_eq!(dec.read_bytes(0).unwrap(), Some(Vec::new()));
    assert_eq!(dec.read_bytes(5).unwrap().unwrap(), b"12345");
    assert_eq!(dec.read_bytes(6).unwrap().unwrap(), b"6789AB");
    assert_eq!(dec.read_all().unwrap().unwrap(), b"CDEFGHIJKLMNOPQRSTUVWXYZ\n");
    assert_eq!(dec.read_all().unwrap(), None);

    dec.close();
    dec.close();
    assert!(matches!(dec.read_bytes(1), Err(Bz3Error::ClosedSession)));
}

#[test]
fn test_reads_across_blocks_and_units() {
    let data = sample(BLOCK_SIZE_MIN * 3 + 17);
    let opts = EncodeOptions::new().with_block_size(BLOCK_SIZE_MIN);
    let mut stream = encode(&data, &opts).unwrap();
    stream.extend(encode(TEXT, &opts).unwrap());

    let mut dec = Decoder::new(&stream[..], DecodeOptions::new()).unwrap();
    let mut out = Vec::new();
    let mut chunk = Vec::new();
    while dec.read_into(Some(40_000), &mut chunk).unwrap().is_some() {
        assert!(chunk.len() <= 40_000);
        out.extend_from_slice(&chunk);
    }
    assert!(dec.is_eof());

    let mut expected = data;
    expected.extend_from_slice(TEXT);
    assert_eq!(out, expected);
}

#[test]
fn test_encoder_into_decoder() {
    let data = sample(BLOCK_SIZE_MIN * 2 + 1000);
    let opts = EncodeOptions::new().with_block_size(BLOCK_SIZE_MIN);

    let mut enc = Encoder::new(Vec::new(), opts).unwrap();
    for piece in data.chunks(7_777) {
        enc.write_all(piece).unwrap();
    }
    let packed = enc.finish().unwrap();

    let units = scan(&packed[..]).unwrap();
    assert_eq!(units[0].blocks.len(), 3);

    let mut dec = Decoder::new(&packed[..], DecodeOptions::new()).unwrap();
    let mut out = Vec::new();
    dec.read_to_end(&mut out).unwrap();
    assert_eq!(out, data);
}

#[test]
fn test_streaming_matches_one_shot() {
    let data = sample(5_000);
    let opts = EncodeOptions::new();

    let mut enc = Encoder::new(Vec::new(), opts.clone()).unwrap();
    enc.write(&data).unwrap();
    let streamed = enc.finish().unwrap();

    assert_eq!(streamed, encode(&data, &opts).unwrap());
}

#[test]
fn test_frame_sessions() {
    let opts = EncodeOptions::new().with_format(Format::Frame);
    let mut frame = Vec::new();
    Encoder::open_with(&mut frame, opts.clone(), |enc| {
        enc.write(b"frame ")?;
        enc.write(b"session")?;
        Ok(())
    })
    .unwrap();
    assert_eq!(frame, encode(b"frame session", &opts).unwrap());

    let dopts = DecodeOptions::new().with_format(Format::Frame);
    let out = Decoder::open_with(&frame[..], dopts.clone(), |dec| {
        Ok(dec.read_all()?.unwrap_or_default())
    })
    .unwrap();
    assert_eq!(out, b"frame session");
    assert_eq!(decode(&frame, &dopts).unwrap(), b"frame session");
}

#[test]
fn test_decoder_failure_is_sticky() {
    let mut packed = encode(TEXT, &EncodeOptions::new()).unwrap();
    packed.truncate(packed.len() - 2);

    let mut dec = Decoder::new(&packed[..], DecodeOptions::new()).unwrap();
    assert!(matches!(dec.read_all(), Err(Bz3Error::TruncatedSource { .. })));
    assert!(matches!(dec.read_bytes(1), Err(Bz3Error::SessionFailed)));
}

#[test]
fn test_decoder_partial_stream() {
    let data = sample(BLOCK_SIZE_MIN + 500);
    let packed = encode(&data, &EncodeOptions::new().with_block_size(BLOCK_SIZE_MIN)).unwrap();
    let cut = &packed[..packed.len() - 1];

    let opts = DecodeOptions::new().with_partial(true);
    let mut dec = Decoder::new(cut, opts).unwrap();
    assert_eq!(dec.read_all().unwrap().unwrap(), &data[..BLOCK_SIZE_MIN]);
    assert_eq!(dec.read_all().unwrap(), None);
}

#[test]
fn test_encoder_into_file_sink() {
    let mut sink = Cursor::new(Vec::new());
    {
        let mut enc = Encoder::new(&mut sink, EncodeOptions::new()).unwrap();
        write!(enc, "{}", String::from_utf8_lossy(TEXT)).unwrap();
        enc.close().unwrap();
    }
    let packed = sink.into_inner();
    assert_eq!(decode(&packed, &DecodeOptions::new()).unwrap(), TEXT);
}
