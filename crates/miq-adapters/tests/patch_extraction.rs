//! Integration tests for filesystem patch extraction.

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use image::{GrayImage, ImageBuffer, Luma};
use miq_adapters::fs::load_patches;
use miq_adapters::FsPatchSource;
use miq_core::PatchSource;

fn write_png(dir: &std::path::Path, name: &str, width: u32, height: u32) -> PathBuf {
    let img = GrayImage::from_fn(width, height, |x, y| {
        if (x + y) % 2 == 0 {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

#[test]
fn test_tiles_exact_multiple() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "grid.png", 32, 16);

    let patches = load_patches(&path, 8).unwrap();
    assert_eq!(patches.width, 32);
    assert_eq!(patches.height, 16);
    assert_eq!(patches.len(), 8); // 4 cols x 2 rows
    assert!(patches.patches.iter().all(|p| p.len() == 64));
}

#[test]
fn test_discards_partial_edge_tiles() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "odd.png", 20, 13);

    // 20x13 with 8-px patches: 2 full columns, 1 full row.
    let patches = load_patches(&path, 8).unwrap();
    assert_eq!(patches.len(), 2);
}

#[test]
fn test_rejects_zero_patch_width() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "grid.png", 8, 8);

    let err = load_patches(&path, 0).unwrap_err();
    assert!(err.to_string().contains("patch width"));
}

#[test]
fn test_rejects_image_smaller_than_patch() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "tiny.png", 6, 6);

    let err = load_patches(&path, 8).unwrap_err();
    assert!(err.to_string().contains("smaller than the patch width"));
}

#[test]
fn test_values_are_normalized() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "grid.png", 8, 8);

    let patches = load_patches(&path, 8).unwrap();
    for patch in &patches.patches {
        assert!(patch
            .iter()
            .all(|&p| (p - 1.0).abs() < 1e-6 || p.abs() < 1e-6));
    }
}

#[test]
fn test_sixteen_bit_png_uses_full_range() {
    let dir = tempfile::tempdir().unwrap();
    let img: ImageBuffer<Luma<u16>, Vec<u16>> =
        ImageBuffer::from_pixel(8, 8, Luma([u16::MAX / 4]));
    let path = dir.path().join("deep.png");
    img.save(&path).unwrap();

    let patches = load_patches(&path, 8).unwrap();
    assert!(patches.patches[0].iter().all(|&p| (p - 0.25).abs() < 1e-3));
}

#[test]
fn test_source_walks_directories() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "a.png", 8, 8);
    write_png(dir.path(), "b.png", 8, 8);
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let sub = dir.path().join("nested");
    std::fs::create_dir(&sub).unwrap();
    write_png(&sub, "c.png", 8, 8);

    let flat = FsPatchSource::new(vec![dir.path().to_path_buf()], false, 8);
    assert_eq!(flat.count_hint(), Some(2));

    let recursive = FsPatchSource::new(vec![dir.path().to_path_buf()], true, 8);
    assert_eq!(recursive.count_hint(), Some(3));
    let loaded: Vec<_> = recursive.images().collect();
    assert_eq!(loaded.len(), 3);
    assert!(loaded.iter().all(std::result::Result::is_ok));
}

#[test]
fn test_decode_failure_yields_item_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"not a png").unwrap();

    let source = FsPatchSource::new(vec![path], false, 8);
    let items: Vec<_> = source.images().collect();
    assert_eq!(items.len(), 1);
    assert!(items[0].is_err());
}
