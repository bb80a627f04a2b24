use memmap2::Mmap;
use mime::Mime;
use std::fs::File;
use std::io::{Cursor, ErrorKind};
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, SignalSpec};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;

#[cfg(test)]
mod tests;

pub const MAX_RENDER_CHANNELS: usize = 2;

#[derive(Debug)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub duration_seconds: f32,
    pub samples: Vec<Vec<f32>>,
}

#[derive(Debug, Error)]
pub enum AudioLoadError {
    #[error("failed to open file: {0}")]
    Open(#[source] std::io::Error),
    #[error("not an audio file: {0}")]
    NotAudio(Mime),
    #[error("symphonia error: {0}")]
    Symphonia(#[from] SymphoniaError),
    #[error("no default audio track")]
    NoDefaultTrack,
    #[error("missing sample rate")]
    MissingSampleRate,
    #[error("no audio samples decoded")]
    EmptyAudio,
}

pub fn load_audio(path: &Path) -> Result<DecodedAudio, AudioLoadError> {
    let handle = File::open(path).map_err(AudioLoadError::Open)?;
    let content = unsafe { Mmap::map(&handle) }.map_err(AudioLoadError::Open)?;
    let kind = detect_kind(path, &content);
    if !is_audio_kind(&kind) {
        return Err(AudioLoadError::NotAudio(kind));
    }
    decode_audio(&kind, &content)
}

pub fn detect_kind(path: &Path, content: &[u8]) -> Mime {
    if let Some(kind) = infer::get(content)
        && let Ok(mime) = kind.mime_type().parse()
    {
        mime
    } else if let Some(mime) = mime_guess::from_path(path).first() {
        mime
    } else {
        mime::APPLICATION_OCTET_STREAM
    }
}

pub fn is_audio_kind(kind: &Mime) -> bool {
    kind.type_() == mime::AUDIO || kind.type_() == mime::VIDEO
}

pub fn audio_extension(kind: &Mime) -> Option<&'static str> {
    match kind.essence_str() {
        "audio/mpeg" => Some("mp3"),
        "audio/wav" | "audio/x-wav" => Some("wav"),
        "audio/flac" => Some("flac"),
        "audio/ogg" | "application/ogg" => Some("ogg"),
        "audio/opus" => Some("opus"),
        "audio/webm" => Some("webm"),
        "audio/aac" => Some("aac"),
        "audio/mp4" | "video/mp4" => Some("m4a"),
        "audio/x-m4a" => Some("m4a"),
        _ => mime_guess::get_mime_extensions(kind).and_then(|exts| exts.first().copied()),
    }
}

pub fn decode_audio(kind: &Mime, content: &[u8]) -> Result<DecodedAudio, AudioLoadError> {
    let mut hint = Hint::new();
    if let Some(extension) = audio_extension(kind) {
        hint.with_extension(extension);
    }

    let owned = content.to_vec();
    let mss = MediaSourceStream::new(Box::new(Cursor::new(owned)), Default::default());
    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;
    let track = format.default_track().ok_or(AudioLoadError::NoDefaultTrack)?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let mut decoder = symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut samples = vec![Vec::new()];
    let mut signal_spec = if let Some(rate) = codec_params.sample_rate
        && let Some(channels) = codec_params.channels
    {
        Some(SignalSpec { rate, channels })
    } else {
        None
    };
    let mut sample_buf = None::<AudioBuffer<f32>>;
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = decoder.decode(&packet)?;
        let spec = *decoded.spec();
        if signal_spec.is_none() {
            signal_spec = Some(spec);
        }
        let sample_buf = sample_buf.get_or_insert_with(|| AudioBuffer::<f32>::new(decoded.capacity() as u64, spec));
        decoded.convert(sample_buf);
        samples.resize_with(sample_buf.planes().planes().len(), Vec::new);
        for (plane, channel) in sample_buf.planes().planes().iter().zip(samples.iter_mut()) {
            channel.extend_from_slice(plane);
        }
    }

    let Some(signal_spec) = signal_spec else {
        return Err(AudioLoadError::MissingSampleRate);
    };

    let max_len = samples.iter().map(Vec::len).max().unwrap_or(0);
    if max_len == 0 {
        return Err(AudioLoadError::EmptyAudio);
    }

    let channels = signal_spec.channels.count() as u16;
    // Anything beyond stereo is dropped, not rejected.
    samples.truncate(MAX_RENDER_CHANNELS);

    Ok(DecodedAudio {
        sample_rate: signal_spec.rate,
        channels,
        duration_seconds: max_len as f32 / signal_spec.rate as f32,
        samples,
    })
}
