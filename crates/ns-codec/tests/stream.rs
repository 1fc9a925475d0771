// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use ns_codec::{CodecError, InputStream, OutputStream, Reader, Writer};
use proptest::prelude::*;

#[test]
fn mixed_sequence_reads_back_in_order() {
    let mut w = Writer::with_capacity(64);
    w.write_u64_le(100);
    w.write_u8(2);
    w.write_array(&[9u8; 25]);
    w.write_u32_le(u32::MAX);
    let bytes = w.into_vec();
    assert_eq!(bytes.len(), 8 + 1 + 25 + 4);

    let mut r = Reader::new(&bytes);
    assert_eq!(r.read_u64_le().unwrap(), 100);
    assert_eq!(r.read_u8().unwrap(), 2);
    assert_eq!(r.read_array::<25>().unwrap(), [9u8; 25]);
    assert_eq!(r.read_u32_le().unwrap(), u32::MAX);
    assert!(r.is_exhausted());
    assert!(matches!(r.read_u8(), Err(CodecError::OutOfBounds { .. })));
}

proptest! {
    #[test]
    fn every_prefix_of_a_u64_is_a_short_read(value in any::<u64>(), cut in 0usize..8) {
        let mut w = Writer::default();
        w.write_u64_le(value);
        let bytes = w.into_vec();
        let mut r = Reader::new(&bytes[..cut]);
        prop_assert_eq!(
            r.read_u64_le(),
            Err(CodecError::OutOfBounds { needed: 8, remaining: cut })
        );
    }
}
