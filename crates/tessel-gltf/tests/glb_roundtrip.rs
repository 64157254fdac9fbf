//! GLB container round trips through an independent chunk reader.

use serde_json::Value;
use tessel_gltf::{Document, JsonLayout};

struct Chunks<'a> {
    total: u32,
    json: &'a [u8],
    bin: &'a [u8],
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes(bytes[at..at + 4].try_into().unwrap())
}

fn split(glb: &[u8]) -> Chunks<'_> {
    assert_eq!(&glb[0..4], b"glTF");
    assert_eq!(read_u32(glb, 4), 2);
    let json_len = read_u32(glb, 12) as usize;
    assert_eq!(&glb[16..20], b"JSON");
    let json = &glb[20..20 + json_len];
    let bin_at = 20 + json_len;
    let bin_len = read_u32(glb, bin_at) as usize;
    assert_eq!(&glb[bin_at + 4..bin_at + 8], b"BIN\0");
    let bin = &glb[bin_at + 8..bin_at + 8 + bin_len];
    Chunks {
        total: read_u32(glb, 8),
        json,
        bin,
    }
}

fn quad() -> (Vec<f32>, Vec<f32>, Vec<u32>) {
    (
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        vec![0, 1, 2, 2, 3, 0],
    )
}

#[test]
fn test_embedded_json_declares_unpadded_buffer_length() {
    let mut doc = Document::new();
    let material = doc.add_material(0.8, 0.8, 0.8, 1.0, 0.1, "concrete").unwrap();
    // A single triangle: 36 + 36 + 6 bytes, padded to 80 inside the document.
    doc.add_triangle_mesh(
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        &[0, 1, 2],
        material,
        None,
    )
    .unwrap();
    let (v, n, i) = quad();
    doc.add_triangle_mesh(&v, &n, &i, material, None).unwrap();

    let glb = doc.create_glb().unwrap();
    let chunks = split(&glb);
    assert_eq!(chunks.total as usize, glb.len());

    let json: Value = serde_json::from_slice(chunks.json).unwrap();
    assert_eq!(json["buffers"].as_array().unwrap().len(), 1);
    assert!(json["buffers"][0].get("uri").is_none());
    assert_eq!(
        json["buffers"][0]["byteLength"].as_u64().unwrap() as usize,
        doc.buffer().len()
    );
    assert_eq!(chunks.bin, doc.buffer().as_bytes());
}

#[test]
fn test_embedded_json_matches_compact_encoding() {
    let mut doc = Document::new();
    let material = doc.add_material(1.0, 0.0, 0.0, 0.5, 1.0, "glass").unwrap();
    let (v, n, i) = quad();
    doc.add_triangle_mesh(&v, &n, &i, material, None).unwrap();

    let glb = doc.create_glb().unwrap();
    let chunks = split(&glb);
    let text = std::str::from_utf8(chunks.json).unwrap();
    let compact = doc.to_json_string(None, JsonLayout::Compact).unwrap();
    assert_eq!(text.trim_end_matches(' '), compact);

    let json: Value = serde_json::from_str(text).unwrap();
    assert_eq!(json["materials"][0]["alphaMode"], "BLEND");
}

#[test]
fn test_glb_is_stable_across_calls() {
    let mut doc = Document::new();
    let material = doc.add_material(0.1, 0.2, 0.3, 1.0, 0.0, "slate").unwrap();
    let (v, n, i) = quad();
    doc.add_triangle_mesh(&v, &n, &i, material, None).unwrap();

    let first = doc.create_glb().unwrap();
    let second = doc.create_glb().unwrap();
    assert_eq!(first, second);
    assert_eq!(doc.to_base64().unwrap(), doc.to_base64().unwrap());
}

#[test]
fn test_vertex_data_is_little_endian_floats() {
    let mut doc = Document::new();
    let material = doc.add_material(1.0, 1.0, 1.0, 1.0, 0.0, "white").unwrap();
    let (v, n, i) = quad();
    doc.add_triangle_mesh(&v, &n, &i, material, None).unwrap();

    let glb = doc.create_glb().unwrap();
    let bin = split(&glb).bin;
    let decoded: Vec<f32> = bin[..v.len() * 4]
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes(c.try_into().unwrap()))
        .collect();
    assert_eq!(decoded, v);

    let index_at = (v.len() + n.len()) * 4;
    let decoded: Vec<u32> = bin[index_at..index_at + i.len() * 2]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]) as u32)
        .collect();
    assert_eq!(decoded, i);
}
