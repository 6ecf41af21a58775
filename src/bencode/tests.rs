use std::collections::BTreeMap;

use bytes::Bytes;

use super::*;

#[test]
fn test_decode_integer() {
    assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
    assert_eq!(decode(b"i-1e").unwrap(), Value::Integer(-1));
    assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
}

#[test]
fn test_decode_integer_invalid() {
    assert!(matches!(
        decode(b"i e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(decode(b"ie"), Err(BencodeError::InvalidInteger(_))));
    assert!(matches!(
        decode(b"i-0e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(
        decode(b"i03e"),
        Err(BencodeError::InvalidInteger(_))
    ));
    assert!(matches!(decode(b"i42"), Err(BencodeError::UnexpectedEof)));
}

#[test]
fn test_decode_bytes() {
    assert_eq!(
        decode(b"5:hello").unwrap(),
        Value::Bytes(Bytes::from_static(b"hello"))
    );
    assert_eq!(decode(b"0:").unwrap(), Value::Bytes(Bytes::from_static(b"")));
}

#[test]
fn test_decode_bytes_trailing() {
    assert!(matches!(
        decode(b"2:ab c"),
        Err(BencodeError::TrailingData)
    ));
}

#[test]
fn test_decode_bytes_length_exceeds_input() {
    assert!(matches!(
        decode(b"10:abc"),
        Err(BencodeError::LengthExceedsInput)
    ));
}

#[test]
fn test_decode_list() {
    let result = decode(b"l4:spam4:eggse").unwrap();
    match result {
        Value::List(l) => {
            assert_eq!(l.len(), 2);
            assert_eq!(l[0], Value::Bytes(Bytes::from_static(b"spam")));
            assert_eq!(l[1], Value::Bytes(Bytes::from_static(b"eggs")));
        }
        _ => panic!("expected list"),
    }
}

#[test]
fn test_decode_dict() {
    let result = decode(b"d3:cow3:moo4:spaml1:a1:bee").unwrap();
    let dict = result.as_dict().unwrap();
    assert_eq!(dict.len(), 2);
    assert_eq!(
        dict.get(&Bytes::from_static(b"cow")),
        Some(&Value::Bytes(Bytes::from_static(b"moo")))
    );
}

#[test]
fn test_decode_dict_duplicate_key() {
    assert!(matches!(
        decode(b"d3:cow3:moo3:cow3:bahe"),
        Err(BencodeError::DuplicateKey)
    ));
}

#[test]
fn test_decode_dict_non_string_key() {
    assert!(matches!(
        decode(b"di1e3:mooe"),
        Err(BencodeError::InvalidDictKey)
    ));
}

#[test]
fn test_decode_bad_header_byte() {
    assert!(matches!(
        decode(b"x42e"),
        Err(BencodeError::UnexpectedChar('x'))
    ));
}

#[test]
fn test_decode_trailing_data() {
    assert!(matches!(
        decode(b"i42eextra"),
        Err(BencodeError::TrailingData)
    ));
}

#[test]
fn test_decode_nesting_limit() {
    let mut deep = Vec::new();
    deep.extend(std::iter::repeat(b'l').take(80));
    deep.extend(std::iter::repeat(b'e').take(80));
    assert!(matches!(decode(&deep), Err(BencodeError::NestingTooDeep)));
}

#[test]
fn test_encode_integer() {
    assert_eq!(encode(&Value::Integer(42)).unwrap(), b"i42e");
    assert_eq!(encode(&Value::Integer(-42)).unwrap(), b"i-42e");
    assert_eq!(encode(&Value::Integer(0)).unwrap(), b"i0e");
}

#[test]
fn test_encode_bytes() {
    assert_eq!(
        encode(&Value::Bytes(Bytes::from_static(b"spam"))).unwrap(),
        b"4:spam"
    );
}

#[test]
fn test_encode_dict_sorted() {
    let mut dict = BTreeMap::new();
    dict.insert(Bytes::from_static(b"zz"), Value::Integer(1));
    dict.insert(Bytes::from_static(b"aa"), Value::Integer(2));
    assert_eq!(encode(&Value::Dict(dict)).unwrap(), b"d2:aai2e2:zzi1ee");
}

#[test]
fn test_roundtrip() {
    // Canonical inputs (sorted keys) survive decode -> encode verbatim.
    let inputs: [&[u8]; 4] = [
        b"d3:cow3:moo4:spaml1:a1:bee",
        b"d8:announce15:http://test.com4:infod4:name4:test12:piece lengthi16384eee",
        b"l4:spami42ee",
        b"i-7e",
    ];
    for input in inputs {
        let decoded = decode(input).unwrap();
        assert_eq!(encode(&decoded).unwrap(), input);
    }
}

#[test]
fn test_roundtrip_binary_string() {
    // Byte strings pass through untouched even when they are not UTF-8.
    let mut raw = b"3:".to_vec();
    raw.extend([0xff, 0x00, 0x80]);
    let decoded = decode(&raw).unwrap();
    assert_eq!(encode(&decoded).unwrap(), raw);
}

#[test]
fn test_value_accessors() {
    let value = Value::Integer(42);
    assert_eq!(value.as_integer(), Some(42));
    assert!(value.as_bytes().is_none());

    let value = Value::string("test");
    assert_eq!(value.as_str(), Some("test"));
    assert!(value.as_integer().is_none());

    let value = Value::List(vec![]);
    assert!(value.as_list().is_some());
    assert!(value.as_dict().is_none());

    let value = decode(b"d3:fooi1ee").unwrap();
    let dict = value.into_dict().unwrap();
    assert_eq!(dict.len(), 1);
}
