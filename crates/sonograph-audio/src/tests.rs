use super::*;

fn pcm16_wav(sample_rate: u32, channels: u16, interleaved: &[i16]) -> Vec<u8> {
    let data_len = (interleaved.len() * 2) as u32;
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * channels as u32 * 2).to_le_bytes());
    bytes.extend_from_slice(&(channels * 2).to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for sample in interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

fn wav_mime() -> Mime {
    "audio/x-wav".parse().unwrap()
}

#[test]
fn decodes_mono_pcm_samples() {
    let wav = pcm16_wav(8000, 1, &[0, 16384, -16384, 32767]);
    let decoded = decode_audio(&wav_mime(), &wav).unwrap();

    assert_eq!(decoded.sample_rate, 8000);
    assert_eq!(decoded.channels, 1);
    assert_eq!(decoded.samples.len(), 1);
    assert!((decoded.duration_seconds - 4.0 / 8000.0).abs() < 1e-6);

    let channel = &decoded.samples[0];
    assert_eq!(channel.len(), 4);
    let expected = [0.0, 0.5, -0.5, 1.0];
    for (got, want) in channel.iter().zip(expected) {
        assert!((got - want).abs() < 1e-3, "{got} vs {want}");
    }
}

#[test]
fn decodes_stereo_into_planar_channels() {
    let frames: Vec<i16> = (0..100).flat_map(|_| [8192i16, -8192i16]).collect();
    let wav = pcm16_wav(44_100, 2, &frames);
    let decoded = decode_audio(&wav_mime(), &wav).unwrap();

    assert_eq!(decoded.channels, 2);
    assert_eq!(decoded.samples.len(), 2);
    assert_eq!(decoded.samples[0].len(), 100);
    assert_eq!(decoded.samples[1].len(), 100);
    assert!(decoded.samples[0].iter().all(|&s| (s - 0.25).abs() < 1e-3));
    assert!(decoded.samples[1].iter().all(|&s| (s + 0.25).abs() < 1e-3));
}

#[test]
fn more_than_two_channels_truncate_silently() {
    let frames: Vec<i16> = (0..50).flat_map(|_| [1000i16, 2000i16, 3000i16]).collect();
    let wav = pcm16_wav(22_050, 3, &frames);
    let decoded = decode_audio(&wav_mime(), &wav).unwrap();

    assert_eq!(decoded.channels, 3);
    assert_eq!(decoded.samples.len(), MAX_RENDER_CHANNELS);
    assert_eq!(decoded.samples[0].len(), 50);
}

#[test]
fn kind_detection_prefers_content_over_extension() {
    let wav = pcm16_wav(8000, 1, &[0, 0, 0, 0]);
    let kind = detect_kind(Path::new("mislabeled.bin"), &wav);
    assert!(is_audio_kind(&kind));
    assert_eq!(audio_extension(&kind), Some("wav"));
}

#[test]
fn kind_detection_falls_back_to_the_path() {
    let kind = detect_kind(Path::new("notes.txt"), b"just some text");
    assert!(!is_audio_kind(&kind));
}

#[test]
fn known_audio_kinds_map_to_decode_hints() {
    assert_eq!(audio_extension(&"audio/mpeg".parse().unwrap()), Some("mp3"));
    assert_eq!(audio_extension(&"audio/flac".parse().unwrap()), Some("flac"));
    assert_eq!(audio_extension(&"audio/mp4".parse().unwrap()), Some("m4a"));
}

#[test]
fn load_audio_rejects_non_audio_files() {
    let path = std::env::temp_dir().join("sonograph_not_audio.txt");
    std::fs::write(&path, b"plain text, no audio here").unwrap();
    let result = load_audio(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(AudioLoadError::NotAudio(_))));
}

#[test]
fn load_audio_reads_a_wav_from_disk() {
    let path = std::env::temp_dir().join("sonograph_roundtrip.wav");
    std::fs::write(&path, pcm16_wav(8000, 1, &[100, 200, 300, 400])).unwrap();
    let decoded = load_audio(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(decoded.sample_rate, 8000);
    assert_eq!(decoded.samples[0].len(), 4);
}
