#![no_main]

use arbitrary::Arbitrary;
use bytes::Bytes;
use hxs_codec::{
    length, varint, varint::VarInt, Decode, DecodeExt, Encode, EncodeSize, Endian, Error,
    FixedInt, IntCfg, RangeCfg,
};
use libfuzzer_sys::fuzz_target;

fn roundtrip_varint(v: i32) {
    let encoded = VarInt(v).encode();
    assert_eq!(varint::size(v), encoded.len());
    if (0..0x80).contains(&v) {
        assert_eq!(&encoded[..], &[v as u8]);
    } else {
        assert_eq!(encoded.len(), 5);
    }
    let decoded = VarInt::decode(encoded).expect("Failed to decode varint!");
    assert_eq!(v, decoded.0);
}

// Arbitrary bytes either fail to decode or decode to their own canonical encoding.
fn decode_varint(raw: Vec<u8>) {
    let mut buf = &raw[..];
    if let Ok(v) = varint::read(&mut buf) {
        let consumed = raw.len() - buf.len();
        assert_eq!(&VarInt(v).encode()[..], &raw[..consumed]);
    }
}

fn roundtrip_string(s: Option<String>) {
    let encoded = s.encode();
    assert_eq!(s.encode_size(), encoded.len());
    let decoded = Option::<String>::decode_cfg(encoded, &RangeCfg::default())
        .expect("Failed to decode string!");
    assert_eq!(s, decoded);
}

fn roundtrip_bytes(b: Option<Vec<u8>>) {
    let b = b.map(Bytes::from);
    let encoded = b.encode();
    let len = b.as_ref().map(Bytes::len).unwrap_or(0);
    if b.is_some() {
        assert!(matches!(
            Option::<Bytes>::decode_cfg(encoded.clone(), &(0..len).into()),
            Err(Error::InvalidLength(_))
        ));
    }
    let decoded = Option::<Bytes>::decode_cfg(encoded, &RangeCfg::default())
        .expect("Failed to decode bytes!");
    assert_eq!(b, decoded);
}

fn roundtrip_count(count: Option<u16>) {
    let count = count.map(usize::from);
    let mut buf = Vec::new();
    length::write(count, &mut buf);
    assert_eq!(length::size(count), buf.len());
    let decoded = length::read(&mut &buf[..], &RangeCfg::default()).expect("Failed to decode count!");
    assert_eq!(count, decoded);
}

fn roundtrip_fixed(value: i64, width: u8, big: bool, signed: bool) {
    let width = usize::from(width % 8) + 1;
    let endian = if big { Endian::Big } else { Endian::Little };
    let cfg = IntCfg::new(width, endian, signed);
    let Ok(int) = FixedInt::new(value, cfg) else {
        assert!(!cfg.fits(value));
        return;
    };
    let encoded = int.encode();
    assert_eq!(encoded.len(), width);
    let decoded = FixedInt::decode_cfg(encoded, &cfg).expect("Failed to decode fixed int!");
    assert_eq!(int, decoded);
}

fn roundtrip_f64(v: f64) {
    let decoded = f64::decode(v.encode()).expect("Failed to decode f64!");
    if v.is_nan() && decoded.is_nan() {
        return;
    }
    assert_eq!(v, decoded);
}

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    VarInt(i32),
    RawVarInt(Vec<u8>),
    String(Option<String>),
    Bytes(Option<Vec<u8>>),
    Count(Option<u16>),
    Fixed {
        value: i64,
        width: u8,
        big: bool,
        signed: bool,
    },
    I64(i64),
    F64(f64),
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::VarInt(v) => roundtrip_varint(v),
        FuzzInput::RawVarInt(raw) => decode_varint(raw),
        FuzzInput::String(s) => roundtrip_string(s),
        FuzzInput::Bytes(b) => roundtrip_bytes(b),
        FuzzInput::Count(c) => roundtrip_count(c),
        FuzzInput::Fixed {
            value,
            width,
            big,
            signed,
        } => roundtrip_fixed(value, width, big, signed),
        FuzzInput::I64(v) => assert_eq!(i64::decode(v.encode()).unwrap(), v),
        FuzzInput::F64(v) => roundtrip_f64(v),
    };
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
