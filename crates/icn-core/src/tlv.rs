//! NDN TLV wire encoding (packet format 0.3)
//!
//! Only the encoder lives here. TLV-TYPE and TLV-LENGTH are VAR-NUMBERs;
//! non-negative integers use the shortest of 1, 2, 4 or 8 bytes.

use bytes::{BufMut, Bytes, BytesMut};

use crate::name::Name;

pub const TLV_INTEREST: u64 = 0x05;
pub const TLV_DATA: u64 = 0x06;
pub const TLV_NAME: u64 = 0x07;
pub const TLV_GENERIC_COMPONENT: u64 = 0x08;
pub const TLV_NONCE: u64 = 0x0A;
pub const TLV_INTEREST_LIFETIME: u64 = 0x0C;
pub const TLV_CAN_BE_PREFIX: u64 = 0x21;
pub const TLV_META_INFO: u64 = 0x14;
pub const TLV_CONTENT: u64 = 0x15;
pub const TLV_SIGNATURE_INFO: u64 = 0x16;
pub const TLV_SIGNATURE_VALUE: u64 = 0x17;
pub const TLV_FRESHNESS_PERIOD: u64 = 0x19;
pub const TLV_SIGNATURE_TYPE: u64 = 0x1B;
pub const TLV_KEY_LOCATOR: u64 = 0x1C;

/// Append a VAR-NUMBER
pub fn put_var_number(buf: &mut BytesMut, n: u64) {
    if n < 253 {
        buf.put_u8(n as u8);
    } else if n <= u16::MAX as u64 {
        buf.put_u8(253);
        buf.put_u16(n as u16);
    } else if n <= u32::MAX as u64 {
        buf.put_u8(254);
        buf.put_u32(n as u32);
    } else {
        buf.put_u8(255);
        buf.put_u64(n);
    }
}

/// Shortest big-endian encoding of a non-negative integer
pub fn non_negative_integer(value: u64) -> Bytes {
    let mut buf = BytesMut::with_capacity(8);
    if value <= u8::MAX as u64 {
        buf.put_u8(value as u8);
    } else if value <= u16::MAX as u64 {
        buf.put_u16(value as u16);
    } else if value <= u32::MAX as u64 {
        buf.put_u32(value as u32);
    } else {
        buf.put_u64(value);
    }
    buf.freeze()
}

/// Append one TLV element
pub fn put_tlv(buf: &mut BytesMut, tlv_type: u64, value: &[u8]) {
    put_var_number(buf, tlv_type);
    put_var_number(buf, value.len() as u64);
    buf.put_slice(value);
}

/// Append a TLV element whose value is a non-negative integer
pub fn put_non_negative_integer(buf: &mut BytesMut, tlv_type: u64, value: u64) {
    put_tlv(buf, tlv_type, &non_negative_integer(value));
}

/// Append an encoded Name
pub fn put_name(buf: &mut BytesMut, name: &Name) {
    let mut inner = BytesMut::new();
    for component in name.components() {
        put_tlv(&mut inner, TLV_GENERIC_COMPONENT, component.as_bytes());
    }
    put_tlv(buf, TLV_NAME, &inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(n: u64) -> Vec<u8> {
        let mut buf = BytesMut::new();
        put_var_number(&mut buf, n);
        buf.to_vec()
    }

    #[test]
    fn test_var_number_widths() {
        assert_eq!(var(0), vec![0]);
        assert_eq!(var(252), vec![252]);
        assert_eq!(var(253), vec![253, 0, 253]);
        assert_eq!(var(1024), vec![253, 0x04, 0x00]);
        assert_eq!(var(70_000), vec![254, 0x00, 0x01, 0x11, 0x70]);
        assert_eq!(var(1 << 40).len(), 9);
    }

    #[test]
    fn test_non_negative_integer_widths() {
        assert_eq!(non_negative_integer(0).as_ref(), &[0]);
        assert_eq!(non_negative_integer(255).len(), 1);
        assert_eq!(non_negative_integer(256).len(), 2);
        assert_eq!(non_negative_integer(2000).as_ref(), &[0x07, 0xD0]);
        assert_eq!(non_negative_integer(70_000).len(), 4);
        assert_eq!(non_negative_integer(u64::MAX).len(), 8);
    }

    #[test]
    fn test_name_encoding() {
        let name: Name = "/a/10".parse().unwrap();
        let mut buf = BytesMut::new();
        put_name(&mut buf, &name);
        assert_eq!(
            buf.to_vec(),
            vec![0x07, 7, 0x08, 1, b'a', 0x08, 2, b'1', b'0']
        );
    }
}
