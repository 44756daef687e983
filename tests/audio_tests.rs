// Tests for the audio capture types and the shipped capture devices.

use live_transcriber::{
    AudioCaptureDevice, AudioFile, AudioFrame, CaptureConfig, SilenceCapture, WavCapture,
};

#[test]
fn audio_frame_creation() {
    let frame = AudioFrame {
        samples: vec![100, 200, 300],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms: 1000,
    };

    assert_eq!(frame.samples.len(), 3);
    assert_eq!(frame.sample_rate, 16000);
    assert_eq!(frame.channels, 1);
    assert_eq!(frame.timestamp_ms, 1000);
}

#[test]
fn capture_config_default() {
    let config = CaptureConfig::default();

    assert_eq!(config.sample_rate, 16000, "Default should be 16kHz");
    assert_eq!(config.channels, 1, "Default should be mono");
    assert_eq!(config.buffer_duration_ms, 100, "Default buffer should be 100ms");
}

#[test]
fn stereo_frames_are_interleaved() {
    // Stereo audio: samples are interleaved [L, R, L, R, ...]
    let frame = AudioFrame {
        samples: vec![100, 200, 150, 250, 175, 275],
        sample_rate: 44100,
        channels: 2,
        timestamp_ms: 0,
    };

    let num_frames = frame.samples.len() / frame.channels as usize;
    assert_eq!(num_frames, 3);
}

#[tokio::test(start_paused = true)]
async fn silence_capture_emits_frames_until_released() {
    let device = SilenceCapture::new();
    let config = CaptureConfig::default();

    let mut subscription = device.subscribe(&config).await.expect("subscribe failed");

    for i in 0..3 {
        let frame = subscription.frames.recv().await.expect("frame missing");
        assert_eq!(frame.samples.len(), 1600, "100ms of 16kHz mono");
        assert!(frame.samples.iter().all(|&s| s == 0));
        assert_eq!(frame.timestamp_ms, i * 100);
    }

    subscription.handle.release();
    // The generator notices the release and closes the channel.
    while subscription.frames.recv().await.is_some() {}
}

fn write_test_wav(path: &std::path::Path, samples: &[i16]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    for &sample in samples {
        writer.write_sample(sample).expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

#[test]
fn audio_file_reports_format_and_duration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tone.wav");
    write_test_wav(&path, &vec![42i16; 16000]);

    let audio = AudioFile::open(&path).expect("open failed");
    assert_eq!(audio.sample_rate, 16000);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.samples.len(), 16000);
    assert!((audio.duration_seconds - 1.0).abs() < 0.001);
}

#[test]
fn audio_file_open_missing_file_fails() {
    assert!(AudioFile::open("does/not/exist.wav").is_err());
}

#[tokio::test(start_paused = true)]
async fn wav_capture_replays_every_sample_then_closes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("short.wav");
    // 0.25s at 16kHz: two full 100ms frames plus a 50ms remainder.
    let samples: Vec<i16> = (0..4000).map(|i| (i % 128) as i16).collect();
    write_test_wav(&path, &samples);

    let device = WavCapture::open(&path).expect("open failed");
    let mut subscription = device
        .subscribe(&CaptureConfig::default())
        .await
        .expect("subscribe failed");

    let mut replayed = Vec::new();
    while let Some(frame) = subscription.frames.recv().await {
        assert_eq!(frame.sample_rate, 16000);
        replayed.extend(frame.samples);
    }

    assert_eq!(replayed, samples);
}

#[tokio::test(start_paused = true)]
async fn wav_capture_release_stops_the_replay() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("long.wav");
    write_test_wav(&path, &vec![7i16; 160_000]); // 10 seconds

    let device = WavCapture::open(&path).expect("open failed");
    let mut subscription = device
        .subscribe(&CaptureConfig::default())
        .await
        .expect("subscribe failed");

    let first = subscription.frames.recv().await.expect("frame missing");
    assert_eq!(first.samples.len(), 1600);

    subscription.handle.release();

    let mut remaining = 0;
    while subscription.frames.recv().await.is_some() {
        remaining += 1;
    }
    assert!(remaining < 100, "replay kept running after release");
}
