use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use image::Rgb;

use eidos::application::ports::DevicePreference;
use eidos::application::services::{CONFIDENCE, MAX_REPORTED_PROGRESS, ProcessingEngine};
use eidos::domain::{BoundingBox, ImageAnalysis, VideoAnalysis};
use eidos::infrastructure::media::{InMemoryMediaBackend, SyntheticClip};
use eidos::infrastructure::vision::{CheckpointModelLoader, SimulatedRegionProposer};

use crate::helpers::{degraded_engine, write_png};

fn run_video(engine: &ProcessingEngine, path: &std::path::Path) -> (VideoAnalysis, Vec<f32>) {
    let mut reported = Vec::new();
    let outcome = engine.analyze_video(path, "drone", &mut |fraction| reported.push(fraction));
    (outcome, reported)
}

fn staged_video(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("temp_clip.mp4");
    std::fs::write(&path, b"not really a video").unwrap();
    path
}

#[test]
fn given_png_when_analyzing_image_then_success_with_jpeg_data_url() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_png(dir.path(), "frame.png", 64, 48);
    let engine = degraded_engine(
        InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1)),
        dir.path().join("out"),
    );

    let analysis = engine.analyze_image(&path, "car");

    let ImageAnalysis::Success {
        message,
        image,
        confidence,
        region,
    } = analysis
    else {
        panic!("expected success, got {analysis:?}");
    };

    assert_eq!(message, "Target 'car' acquired");
    assert_eq!(confidence, CONFIDENCE);
    assert_eq!(
        region,
        BoundingBox {
            x: 20,
            y: 12,
            width: 25,
            height: 25,
        }
    );

    let encoded = image.strip_prefix("data:image/jpeg;base64,").unwrap();
    let jpeg = general_purpose::STANDARD.decode(encoded).unwrap();
    let decoded = image::load_from_memory(&jpeg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}

#[test]
fn given_missing_file_when_analyzing_image_then_error_result() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = degraded_engine(
        InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1)),
        dir.path().join("out"),
    );

    let analysis = engine.analyze_image(&dir.path().join("absent.png"), "car");

    match analysis {
        ImageAnalysis::Error { message } => assert!(message.starts_with("Failed to load image")),
        other => panic!("expected error, got {other:?}"),
    }
}

#[test]
fn given_undecodable_bytes_when_analyzing_image_then_error_result() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.jpg");
    std::fs::write(&path, b"definitely not an image").unwrap();
    let engine = degraded_engine(
        InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1)),
        dir.path().join("out"),
    );

    assert!(!engine.analyze_image(&path, "car").is_success());
}

#[test]
fn given_ten_frame_clip_when_analyzing_video_then_every_frame_written_with_orbiting_target() {
    let dir = tempfile::TempDir::new().unwrap();
    let media = InMemoryMediaBackend::new(SyntheticClip::new(60, 48, 10));
    let engine = degraded_engine(media.clone(), dir.path().join("out"));
    let input = staged_video(&dir);

    let (outcome, reported) = run_video(&engine, &input);

    let output_path = dir.path().join("out").join("processed_temp_clip.mp4");
    assert_eq!(
        outcome,
        VideoAnalysis::Success {
            output_path: output_path.clone(),
            frames_written: 10,
        }
    );
    assert!(output_path.is_file());

    assert_eq!(reported.len(), 10);
    assert!(reported.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*reported.last().unwrap(), MAX_REPORTED_PROGRESS);

    let frames = media.written_frames(&output_path).unwrap();
    assert_eq!(frames.len(), 10);
    for (index, frame) in frames.iter().enumerate() {
        let (cx, cy) = SimulatedRegionProposer::orbit_center(60, 48, index as u64);
        assert_eq!(
            *frame.get_pixel(cx as u32, cy as u32),
            Rgb([0, 97, 102]),
            "frame {index} should be highlighted at its orbit centre"
        );
    }
}

#[test]
fn given_clip_without_frame_count_when_analyzing_video_then_progress_uses_fallback() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut clip = SyntheticClip::new(32, 24, 10);
    clip.reported_frame_count = Some(0);
    let engine = degraded_engine(InMemoryMediaBackend::new(clip), dir.path().join("out"));
    let input = staged_video(&dir);

    let (outcome, reported) = run_video(&engine, &input);

    assert!(matches!(outcome, VideoAnalysis::Success { frames_written: 10, .. }));
    assert!((reported.last().unwrap() - 0.1).abs() < 1e-6);
}

#[test]
fn given_clip_longer_than_reported_when_analyzing_video_then_progress_capped() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut clip = SyntheticClip::new(32, 24, 6);
    clip.reported_frame_count = Some(3);
    let engine = degraded_engine(InMemoryMediaBackend::new(clip), dir.path().join("out"));
    let input = staged_video(&dir);

    let (outcome, reported) = run_video(&engine, &input);

    assert!(matches!(outcome, VideoAnalysis::Success { frames_written: 6, .. }));
    assert!(reported.iter().all(|p| *p <= MAX_REPORTED_PROGRESS));
}

#[test]
fn given_missing_video_when_analyzing_then_error_and_no_progress() {
    let dir = tempfile::TempDir::new().unwrap();
    let engine = degraded_engine(
        InMemoryMediaBackend::new(SyntheticClip::new(32, 24, 4)),
        dir.path().join("out"),
    );

    let (outcome, reported) = run_video(&engine, &dir.path().join("absent.mp4"));

    assert!(matches!(outcome, VideoAnalysis::Error { .. }));
    assert!(reported.is_empty());
}

#[test]
fn given_corrupt_frame_mid_stream_when_analyzing_video_then_error_after_partial_progress() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut clip = SyntheticClip::new(32, 24, 8);
    clip.fail_at_frame = Some(3);
    let engine = degraded_engine(InMemoryMediaBackend::new(clip), dir.path().join("out"));
    let input = staged_video(&dir);

    let (outcome, reported) = run_video(&engine, &input);

    match outcome {
        VideoAnalysis::Error { message } => assert!(message.contains("corrupt frame 3")),
        other => panic!("expected error, got {other:?}"),
    }
    assert_eq!(reported.len(), 3);
}

#[test]
fn given_input_path_when_output_path_requested_then_processed_mp4_in_output_dir() {
    let engine = degraded_engine(
        InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1)),
        "outputs".into(),
    );

    assert_eq!(
        engine.output_path_for(std::path::Path::new("uploads/temp_abc_clip.mov")),
        std::path::Path::new("outputs/processed_temp_abc_clip.mp4")
    );
}

#[tokio::test]
async fn given_no_weights_when_initializing_then_engine_degraded() {
    let dir = tempfile::TempDir::new().unwrap();

    let engine = ProcessingEngine::initialize(
        &CheckpointModelLoader::new(None),
        DevicePreference::Cpu,
        Arc::new(SimulatedRegionProposer::new()),
        Arc::new(InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1))),
        dir.path().to_path_buf(),
    )
    .await;

    assert!(!engine.is_ready());
}

#[tokio::test]
async fn given_weights_file_when_initializing_then_engine_ready_and_still_analyzes() {
    let dir = tempfile::TempDir::new().unwrap();
    let weights = dir.path().join("sam3.pt");
    std::fs::write(&weights, vec![1u8; 64]).unwrap();
    let image = write_png(dir.path(), "frame.png", 40, 40);

    let engine = ProcessingEngine::initialize(
        &CheckpointModelLoader::new(Some(weights)),
        DevicePreference::Cpu,
        Arc::new(SimulatedRegionProposer::new()),
        Arc::new(InMemoryMediaBackend::new(SyntheticClip::new(8, 8, 1))),
        dir.path().join("out"),
    )
    .await;

    assert!(engine.is_ready());
    assert!(engine.analyze_image(&image, "person").is_success());
}
