use std::collections::BTreeMap;

use bytes::Bytes;
use sha1::{Digest, Sha1};

use super::*;
use crate::bencode::{encode, Value};

fn piece_digests(content: &[u8], piece_length: usize) -> Vec<u8> {
    content
        .chunks(piece_length)
        .flat_map(|chunk| Sha1::digest(chunk).to_vec())
        .collect()
}

fn torrent_bytes(announce: &str, name: &str, length: i64, piece_length: i64, pieces: &[u8]) -> Vec<u8> {
    let mut info = BTreeMap::new();
    info.insert(Bytes::from_static(b"length"), Value::Integer(length));
    info.insert(Bytes::from_static(b"name"), Value::string(name));
    info.insert(Bytes::from_static(b"piece length"), Value::Integer(piece_length));
    info.insert(
        Bytes::from_static(b"pieces"),
        Value::Bytes(Bytes::copy_from_slice(pieces)),
    );

    let mut root = BTreeMap::new();
    root.insert(Bytes::from_static(b"announce"), Value::string(announce));
    root.insert(Bytes::from_static(b"info"), Value::Dict(info));

    encode(&Value::Dict(root)).unwrap()
}

fn sample_torrent() -> Vec<u8> {
    let content = b"abcdefghijklmnopqrstuvwxyz012345";
    let pieces = piece_digests(content, 16);
    torrent_bytes("http://tracker.example.com/announce", "hello.txt", 32, 16, &pieces)
}

#[test]
fn test_load_single_file_torrent() {
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();

    assert_eq!(meta.announce(), "http://tracker.example.com/announce");
    assert_eq!(meta.name(), "hello.txt");
    assert_eq!(meta.total_length(), 32);
    assert_eq!(meta.piece_length(), 16);
    assert_eq!(meta.num_pieces(), 2);
}

#[test]
fn test_info_hash_stability() {
    // Independently computed over the canonical info dictionary.
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();
    assert_eq!(
        meta.info_hash().to_hex(),
        "f9d49364bbab0e0e3e83134664ac3b0355742b28"
    );
    assert_eq!(meta.info_hash().as_bytes().len(), 20);
}

#[test]
fn test_info_hash_matches_raw_info_digest() {
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();
    let digest: [u8; 20] = Sha1::digest(meta.raw_info()).into();
    assert_eq!(meta.info_hash().as_bytes(), &digest);
}

#[test]
fn test_info_hash_url_encode() {
    let hash = InfoHash::from_bytes(*b"abcdefghij0123456789");
    assert_eq!(hash.url_encode(), "abcdefghij0123456789");

    let hash = InfoHash::from_bytes([0x0a; 20]);
    assert_eq!(hash.url_encode(), "%0a".repeat(20));
}

#[test]
fn test_piece_geometry_aligned() {
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();
    assert_eq!(meta.piece_size(0), 16);
    assert_eq!(meta.piece_size(1), 16);
    let total: u64 = (0..meta.num_pieces()).map(|i| meta.piece_size(i)).sum();
    assert_eq!(total, meta.total_length());
}

#[test]
fn test_piece_geometry_unaligned() {
    let content: Vec<u8> = (0..33u8).collect();
    let pieces = piece_digests(&content, 16);
    let data = torrent_bytes("http://t.example/announce", "odd.bin", 33, 16, &pieces);
    let meta = Metainfo::from_bytes(&data).unwrap();

    assert_eq!(meta.num_pieces(), 3);
    assert_eq!(meta.piece_size(0), 16);
    assert_eq!(meta.piece_size(1), 16);
    assert_eq!(meta.piece_size(2), 1);
    let total: u64 = (0..meta.num_pieces()).map(|i| meta.piece_size(i)).sum();
    assert_eq!(total, 33);
}

#[test]
fn test_piece_geometry_single_piece() {
    let content: Vec<u8> = (0..92u8).collect();
    let pieces = piece_digests(&content, 32768);
    let data = torrent_bytes("http://t.example/announce", "small.bin", 92, 32768, &pieces);
    let meta = Metainfo::from_bytes(&data).unwrap();

    assert_eq!(meta.num_pieces(), 1);
    assert_eq!(meta.piece_size(0), 92);
}

#[test]
fn test_piece_hash_slices() {
    let content = b"abcdefghijklmnopqrstuvwxyz012345";
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();

    let first: [u8; 20] = Sha1::digest(&content[..16]).into();
    let second: [u8; 20] = Sha1::digest(&content[16..]).into();
    assert_eq!(meta.piece_hash(0), &first);
    assert_eq!(meta.piece_hash(1), &second);
}

#[test]
fn test_piece_count_mismatch() {
    // Three digests declared for a two-piece file.
    let content = b"abcdefghijklmnopqrstuvwxyz012345";
    let mut pieces = piece_digests(content, 16);
    pieces.extend([0u8; 20]);
    let data = torrent_bytes("http://t.example/announce", "bad.bin", 32, 16, &pieces);

    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::PieceCountMismatch {
            expected: 2,
            actual: 3
        })
    ));
}

#[test]
fn test_missing_announce() {
    let mut info = BTreeMap::new();
    info.insert(Bytes::from_static(b"length"), Value::Integer(1));
    info.insert(Bytes::from_static(b"name"), Value::string("x"));
    info.insert(Bytes::from_static(b"piece length"), Value::Integer(16));
    info.insert(
        Bytes::from_static(b"pieces"),
        Value::Bytes(Bytes::copy_from_slice(&[0u8; 20])),
    );
    let mut root = BTreeMap::new();
    root.insert(Bytes::from_static(b"info"), Value::Dict(info));
    let data = encode(&Value::Dict(root)).unwrap();

    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::MissingField("announce"))
    ));
}

#[test]
fn test_non_positive_length() {
    let data = torrent_bytes("http://t.example/announce", "empty.bin", 0, 16, &[]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::NonPositiveLength("length"))
    ));
}

#[test]
fn test_pieces_not_multiple_of_twenty() {
    let data = torrent_bytes("http://t.example/announce", "bad.bin", 16, 16, &[0u8; 19]);
    assert!(matches!(
        Metainfo::from_bytes(&data),
        Err(MetainfoError::InvalidField("pieces"))
    ));
}

#[test]
fn test_decode_error_propagates() {
    assert!(matches!(
        Metainfo::from_bytes(b"not a torrent"),
        Err(MetainfoError::Bencode(_))
    ));
}

#[test]
fn test_summary_contains_hash() {
    let meta = Metainfo::from_bytes(&sample_torrent()).unwrap();
    let summary = meta.summary();
    assert!(summary.contains("hello.txt"));
    assert!(summary.contains("f9d49364bbab0e0e3e83134664ac3b0355742b28"));
}
