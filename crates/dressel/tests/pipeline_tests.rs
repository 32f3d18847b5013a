use std::io::Cursor;

use dressel::test_support::InMemoryArchive;
use dressel::{ContentKind, Mirror, MirrorError, ResourcePair, ResourcePath};
use image::{DynamicImage, GenericImageView, ImageBuffer, ImageFormat, Rgb};
use indicatif::ProgressBar;

fn path(raw: &str) -> ResourcePath {
    ResourcePath::parse(raw).unwrap()
}

fn paths(raw: &[&str]) -> Vec<ResourcePath> {
    raw.iter().map(|s| path(s)).collect()
}

fn png_bytes() -> Vec<u8> {
    let img = ImageBuffer::from_fn(12, 6, |x, _| Rgb([(x * 20) as u8, 90, 30]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[tokio::test]
async fn pull_writes_raw_body_under_root() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("a/b/img1.tif", b"II*\0raw tiff bytes".to_vec());

    let report = Mirror::new(&archive, root.path())
        .pull(&paths(&["a/b/img1.tif"]), ContentKind::Raw)
        .await
        .unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(
        std::fs::read(root.path().join("a/b/img1.tif")).unwrap(),
        b"II*\0raw tiff bytes"
    );
}

#[tokio::test]
async fn rerun_skips_existing_without_requests() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("a/b/img1.tif", b"B".to_vec());
    let manifest = paths(&["a/b/img1.tif"]);

    Mirror::new(&archive, root.path())
        .pull(&manifest, ContentKind::Raw)
        .await
        .unwrap();
    assert_eq!(archive.request_count(), 1);

    let progress = ProgressBar::hidden();
    let report = Mirror::new(&archive, root.path())
        .with_progress(progress.clone())
        .pull(&manifest, ContentKind::Raw)
        .await
        .unwrap();

    assert_eq!(archive.request_count(), 1);
    assert_eq!(report.skipped_existing, 1);
    assert_eq!(report.fetched, 0);
    assert_eq!(progress.position(), 1);
}

#[tokio::test]
async fn skip_existing_disabled_refetches() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("x.bin"), b"stale").unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("x.bin", b"fresh".to_vec());

    let report = Mirror::new(&archive, root.path())
        .skip_existing(false)
        .pull(&paths(&["x.bin"]), ContentKind::Raw)
        .await
        .unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(std::fs::read(root.path().join("x.bin")).unwrap(), b"fresh");
}

#[tokio::test]
async fn not_found_is_skipped_and_run_continues() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("after.tif", b"ok".to_vec());

    let progress = ProgressBar::hidden();
    let report = Mirror::new(&archive, root.path())
        .with_progress(progress.clone())
        .pull(&paths(&["missing.tif", "after.tif"]), ContentKind::Raw)
        .await
        .unwrap();

    assert!(!root.path().join("missing.tif").exists());
    assert!(root.path().join("after.tif").exists());
    assert_eq!(report.not_found, paths(&["missing.tif"]));
    assert_eq!(report.fetched, 1);
    assert_eq!(progress.position(), 2);
}

#[tokio::test]
async fn protocol_error_aborts_before_later_entries() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("first.tif", b"1".to_vec());
    archive.add_status("broken.tif", 500);
    archive.add("last.tif", b"3".to_vec());

    let result = Mirror::new(&archive, root.path())
        .pull(&paths(&["first.tif", "broken.tif", "last.tif"]), ContentKind::Raw)
        .await;

    match result {
        Err(MirrorError::Protocol { path, status }) => {
            assert_eq!(path.as_str(), "broken.tif");
            assert_eq!(status, 500);
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
    assert!(root.path().join("first.tif").exists());
    assert!(!root.path().join("broken.tif").exists());
    assert!(!root.path().join("last.tif").exists());
    assert_eq!(archive.requests(), vec!["first.tif", "broken.tif"]);
}

#[tokio::test]
async fn pull_processes_entries_in_manifest_order() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    for name in ["c", "a", "b"] {
        archive.add(name, name.as_bytes().to_vec());
    }

    Mirror::new(&archive, root.path())
        .pull(&paths(&["c", "a", "b"]), ContentKind::Raw)
        .await
        .unwrap();

    assert_eq!(archive.requests(), vec!["c", "a", "b"]);
}

#[tokio::test]
async fn image_pull_writes_decodable_jpeg() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("tiles/t1.png", png_bytes());

    Mirror::new(&archive, root.path())
        .pull(&paths(&["tiles/t1.png"]), ContentKind::Image)
        .await
        .unwrap();

    let written = std::fs::read(root.path().join("tiles/t1.png")).unwrap();
    assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
    assert_eq!(image::load_from_memory(&written).unwrap().dimensions(), (12, 6));
}

#[tokio::test]
async fn undecodable_image_aborts_without_artifact() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("tiles/bad.png", b"not an image".to_vec());

    let result = Mirror::new(&archive, root.path())
        .pull(&paths(&["tiles/bad.png"]), ContentKind::Image)
        .await;

    assert!(matches!(result, Err(MirrorError::Fetch { .. })));
    assert!(!root.path().join("tiles/bad.png").exists());
}

#[tokio::test]
async fn text_pull_writes_utf8() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("labels/1.txt", "forêt\n");

    Mirror::new(&archive, root.path())
        .pull(&paths(&["labels/1.txt"]), ContentKind::Text)
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(root.path().join("labels/1.txt")).unwrap(),
        "forêt\n"
    );
}

#[tokio::test]
async fn pairs_use_shorter_list() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    for i in 1..=5 {
        archive.add(&format!("img/{i}.png"), png_bytes());
    }
    for i in 1..=3 {
        archive.add(&format!("ann/{i}.txt"), format!("label {i}"));
    }

    let pairs = dressel::pair_suffixes(
        (1..=5).map(|i| path(&format!("img/{i}.png"))).collect(),
        (1..=3).map(|i| path(&format!("ann/{i}.txt"))).collect(),
    );
    let progress = ProgressBar::hidden();
    let report = Mirror::new(&archive, root.path())
        .with_progress(progress.clone())
        .pull_pairs(&pairs)
        .await
        .unwrap();

    assert_eq!(report.fetched, 3);
    assert_eq!(progress.position(), 3);
    assert_eq!(archive.request_count(), 6);
    assert!(root.path().join("img/3.png").exists());
    assert!(!root.path().join("img/4.png").exists());
    assert_eq!(
        std::fs::read_to_string(root.path().join("ann/2.txt")).unwrap(),
        "label 2"
    );
}

#[tokio::test]
async fn pair_with_missing_annotation_writes_nothing() {
    let root = tempfile::tempdir().unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("img/1.png", png_bytes());

    let pairs = vec![ResourcePair {
        image: path("img/1.png"),
        annotation: path("ann/1.txt"),
    }];
    let report = Mirror::new(&archive, root.path())
        .pull_pairs(&pairs)
        .await
        .unwrap();

    assert_eq!(report.fetched, 0);
    assert_eq!(report.not_found, paths(&["ann/1.txt"]));
    assert!(!root.path().join("img/1.png").exists());
    assert!(!root.path().join("ann/1.txt").exists());
}

#[tokio::test]
async fn pair_fetches_only_missing_half() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("img")).unwrap();
    std::fs::write(root.path().join("img/1.png"), b"already here").unwrap();
    let mut archive = InMemoryArchive::new("archive");
    archive.add("img/1.png", png_bytes());
    archive.add("ann/1.txt", "label");

    let pairs = vec![ResourcePair {
        image: path("img/1.png"),
        annotation: path("ann/1.txt"),
    }];
    let report = Mirror::new(&archive, root.path())
        .pull_pairs(&pairs)
        .await
        .unwrap();

    assert_eq!(report.fetched, 1);
    assert_eq!(archive.requests(), vec!["ann/1.txt"]);
    assert_eq!(
        std::fs::read(root.path().join("img/1.png")).unwrap(),
        b"already here"
    );
}

#[tokio::test]
async fn complete_pair_issues_no_requests() {
    let root = tempfile::tempdir().unwrap();
    for file in ["img/1.png", "ann/1.txt"] {
        let dest = root.path().join(file);
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(dest, b"x").unwrap();
    }
    let archive = InMemoryArchive::new("archive");

    let pairs = vec![ResourcePair {
        image: path("img/1.png"),
        annotation: path("ann/1.txt"),
    }];
    let report = Mirror::new(&archive, root.path())
        .pull_pairs(&pairs)
        .await
        .unwrap();

    assert_eq!(report.skipped_existing, 1);
    assert_eq!(archive.request_count(), 0);
}
