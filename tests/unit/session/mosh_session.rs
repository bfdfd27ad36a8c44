use super::*;
use crate::decode::source::{InMemorySource, SourceInfo};
use crate::encode::sink::InMemorySink;
use crate::foundation::core::Fps;
use crate::foundation::frame::Frame;
use crate::mosh::observer::{NoopObserver, RecordingObserver};

fn info(width: u32, height: u32) -> SourceInfo {
    SourceInfo {
        width,
        height,
        fps: Fps::new(30, 1).unwrap(),
    }
}

fn solid(width: u32, height: u32, v: u8) -> Frame {
    Frame::new(width, height, 3, vec![v; (width * height * 3) as usize]).unwrap()
}

/// Frames where a bright 4x4 square walks right by 4 pixels per frame.
fn walking_square(count: u32) -> Vec<Frame> {
    (0..count)
        .map(|i| {
            let mut f = solid(16, 8, 0);
            let x0 = (i * 4) % 16;
            for y in 2..6u32 {
                for x in x0..x0 + 4 {
                    let off = ((y * 16 + x) * 3) as usize;
                    f.data[off..off + 3].copy_from_slice(&[255, 255, 255]);
                }
            }
            f
        })
        .collect()
}

fn config(division_size: u32, fractal_level: u32, budget: f64) -> MoshConfig {
    MoshConfig {
        division_size,
        budget,
        start_blank: false,
        fractal_level,
        refresh_rate: None,
    }
}

#[test]
fn emits_one_frame_per_frame_after_the_first() {
    let session = MoshSession::new(config(2, 1, 0.5), MoshSessionOpts::default()).unwrap();
    let mut source = InMemorySource::new(info(16, 8), walking_square(5));
    let mut sink = InMemorySink::new();
    let stats = session
        .run(&mut source, &mut sink, &mut NoopObserver)
        .unwrap();

    assert_eq!(stats.frames_decoded, 5);
    assert_eq!(stats.frames_emitted, 4);
    assert_eq!(sink.frames().len(), 4);
    let idxs = sink.frames().iter().map(|(i, _)| i.0).collect::<Vec<_>>();
    assert_eq!(idxs, vec![0, 1, 2, 3]);
    assert!(sink.ended());
    let cfg = sink.config().unwrap();
    assert_eq!((cfg.width, cfg.height), (16, 8));
}

#[test]
fn refresh_rate_blanks_before_selection_on_multiples() {
    let cfg = MoshConfig {
        refresh_rate: Some(3),
        ..config(2, 1, 0.5)
    };
    let session = MoshSession::new(cfg, MoshSessionOpts::default()).unwrap();
    // 8 decoded frames -> processed indices 0..=6.
    let mut source = InMemorySource::new(info(16, 8), walking_square(8));
    let mut sink = InMemorySink::new();
    let mut rec = RecordingObserver::default();
    let stats = session.run(&mut source, &mut sink, &mut rec).unwrap();

    assert_eq!(stats.frames_emitted, 7);
    assert_eq!(stats.resets, 3);
    assert_eq!(rec.resets, vec![FrameIndex(0), FrameIndex(3), FrameIndex(6)]);
    assert_eq!(rec.frames_started.len(), 7);
}

#[test]
fn unchanged_regions_keep_stale_base_content() {
    // The two frames differ only at pixel (0,0); the rest of the source is bright.
    let mut a = solid(4, 4, 200);
    let mut b = solid(4, 4, 200);
    a.data[0..3].copy_from_slice(&[0, 0, 0]);
    b.data[0..3].copy_from_slice(&[10, 20, 30]);

    let run = |cfg: MoshConfig| {
        let session = MoshSession::new(cfg, MoshSessionOpts::default()).unwrap();
        let mut source = InMemorySource::new(info(4, 4), vec![a.clone(), b.clone()]);
        let mut sink = InMemorySink::new();
        session
            .run(&mut source, &mut sink, &mut NoopObserver)
            .unwrap();
        sink.frames()[0].1.clone()
    };

    // One 4x4 candidate; floor(1 * 0.25) keeps nothing, so the blank canvas survives.
    let out = run(MoshConfig {
        start_blank: true,
        ..config(2, 1, 0.25)
    });
    assert!(out.data.iter().all(|&v| v == 0));

    // Four 2x2 candidates; floor(4 * 0.25) keeps the top-left one, split into 1x1 blocks.
    let out = run(MoshConfig {
        start_blank: true,
        ..config(1, 1, 0.25)
    });
    assert_eq!(out.pixel(0, 0), &[10, 20, 30]);
    assert_eq!(out.pixel(1, 0), &[200, 200, 200]);
    assert_eq!(out.pixel(1, 1), &[200, 200, 200]);
    assert_eq!(out.pixel(2, 0), &[0, 0, 0]);
    assert_eq!(out.pixel(3, 3), &[0, 0, 0]);

    // Starting from the first frame instead keeps its content outside the refreshed block.
    let out = run(config(1, 1, 0.25));
    assert_eq!(out.pixel(0, 0), &[10, 20, 30]);
    assert_eq!(out.pixel(3, 3), &[200, 200, 200]);
}

#[test]
fn empty_source_is_an_error() {
    let session = MoshSession::new(config(2, 1, 0.5), MoshSessionOpts::default()).unwrap();
    let mut source = InMemorySource::new(info(4, 4), Vec::new());
    let mut sink = InMemorySink::new();
    let err = session
        .run(&mut source, &mut sink, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, MoshError::EmptySource(_)));
    assert!(sink.config().is_none());
}

#[test]
fn geometry_change_mid_stream_aborts_the_run() {
    let session = MoshSession::new(config(2, 1, 0.5), MoshSessionOpts::default()).unwrap();
    let frames = vec![solid(4, 4, 0), solid(4, 4, 1), solid(4, 2, 2), solid(4, 4, 3)];
    let mut source = InMemorySource::new(info(4, 4), frames);
    let mut sink = InMemorySink::new();
    let err = session
        .run(&mut source, &mut sink, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, MoshError::FrameGeometry(_)));
    assert_eq!(sink.frames().len(), 1);
    assert!(!sink.ended());
    assert_eq!(source.remaining(), 1);
}

#[test]
fn first_frame_must_match_source_info() {
    let session = MoshSession::new(config(2, 1, 0.5), MoshSessionOpts::default()).unwrap();
    let mut source = InMemorySource::new(info(8, 8), vec![solid(4, 4, 0), solid(4, 4, 0)]);
    let mut sink = InMemorySink::new();
    let err = session
        .run(&mut source, &mut sink, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, MoshError::FrameGeometry(_)));
}

#[test]
fn invalid_config_fails_before_reading_frames() {
    let err = MoshSession::new(config(2, 0, 0.5), MoshSessionOpts::default())
        .err()
        .unwrap();
    assert!(matches!(err, MoshError::Configuration(_)));

    let err = MoshSession::new(
        config(2, 1, 0.5),
        MoshSessionOpts {
            parallel: true,
            threads: Some(0),
        },
    )
    .err()
    .unwrap();
    assert!(matches!(err, MoshError::Configuration(_)));
}

#[test]
fn parallel_run_matches_sequential_run() {
    let cfg = MoshConfig {
        refresh_rate: Some(4),
        start_blank: true,
        ..config(2, 2, 0.4)
    };
    let frames = walking_square(9);

    let seq = MoshSession::new(cfg.clone(), MoshSessionOpts::default()).unwrap();
    let mut src_a = InMemorySource::new(info(16, 8), frames.clone());
    let mut sink_a = InMemorySink::new();
    let stats_a = seq.run(&mut src_a, &mut sink_a, &mut NoopObserver).unwrap();

    let par = MoshSession::new(
        cfg,
        MoshSessionOpts {
            parallel: true,
            threads: Some(2),
        },
    )
    .unwrap();
    let mut src_b = InMemorySource::new(info(16, 8), frames);
    let mut sink_b = InMemorySink::new();
    let stats_b = par.run(&mut src_b, &mut sink_b, &mut NoopObserver).unwrap();

    assert_eq!(stats_a, stats_b);
    assert_eq!(sink_a.frames(), sink_b.frames());
}
