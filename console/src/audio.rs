//! Audio output: short parametrized tone cues fired directly from game
//! events, and a background worker that streams WAV data from storage to
//! the audio peripheral in small chunks.
//!
//! Cancellation uses a generation counter instead of force-terminating the
//! worker: `play` and `stop` bump the shared generation, and a worker that
//! observes a generation other than its own at a chunk boundary exits
//! without touching its successor's state. Reissuing `play` before the
//! previous worker has unwound is therefore safe.

use std::io::{self, Read, Seek, SeekFrom};
use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
};
use std::thread;

use crate::storage::Storage;

pub const AUDIO_CHUNK_BYTES: usize = 256;

pub const INTRO_TRACKS: [&str; 3] = ["/snd_intro1.wav", "/snd_intro2.wav", "/snd_intro3.wav"];
pub const MAIN_TRACKS: [&str; 5] = [
    "/snd_main1.wav",
    "/snd_main2.wav",
    "/snd_main3.wav",
    "/snd_main4.wav",
    "/snd_main5.wav",
];
pub const GAMEOVER_TRACKS: [&str; 3] = [
    "/snd_gameover1.wav",
    "/snd_gameover2.wav",
    "/snd_gameover3.wav",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundEffect {
    Laser,
    Hit,
    Crash,
}

impl SoundEffect {
    /// (frequency in Hz, duration in ms) for the buzzer.
    pub fn tone(self) -> (u32, u32) {
        match self {
            Self::Laser => (2_000, 100),
            Self::Hit => (400, 150),
            Self::Crash => (200, 400),
        }
    }
}

/// The audio peripheral: continuous PCM chunks for music, parametrized
/// tones for effect cues. `write_chunk` may block until the transmit
/// buffer has room.
pub trait AudioSink: Send {
    fn write_chunk(&mut self, pcm: &[u8]) -> io::Result<()>;
    fn tone(&mut self, freq_hz: u32, duration_ms: u32);
}

/// Discards everything. Stands in for the peripheral in headless runs.
#[derive(Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn write_chunk(&mut self, _pcm: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn tone(&mut self, _freq_hz: u32, _duration_ms: u32) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavInfo {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
    pub data_pos: u64,
    pub data_len: u32,
}

/// Locates the fmt and data chunks of a RIFF/WAVE stream. Rejects files
/// missing either chunk.
pub fn parse_wav<R: Read + Seek + ?Sized>(reader: &mut R) -> io::Result<WavInfo> {
    let mut riff = [0u8; 12];
    reader.read_exact(&mut riff)?;
    if &riff[0..4] != b"RIFF" || &riff[8..12] != b"WAVE" {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "not a RIFF/WAVE file"));
    }

    let mut format: Option<(u16, u32, u16)> = None;

    loop {
        let mut chunk_header = [0u8; 8];
        if reader.read_exact(&mut chunk_header).is_err() {
            return Err(io::Error::new(io::ErrorKind::InvalidData, "no data chunk"));
        }
        let chunk_size = u32::from_le_bytes([
            chunk_header[4],
            chunk_header[5],
            chunk_header[6],
            chunk_header[7],
        ]);

        match &chunk_header[0..4] {
            b"fmt " => {
                if chunk_size < 16 {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, "short fmt chunk"));
                }
                let mut fmt = [0u8; 16];
                reader.read_exact(&mut fmt)?;
                let channels = u16::from_le_bytes([fmt[2], fmt[3]]);
                let sample_rate = u32::from_le_bytes([fmt[4], fmt[5], fmt[6], fmt[7]]);
                let bits_per_sample = u16::from_le_bytes([fmt[14], fmt[15]]);
                format = Some((channels, sample_rate, bits_per_sample));
                // Skip any fmt extension plus the RIFF pad byte.
                let skip = u64::from(chunk_size - 16) + u64::from(chunk_size % 2);
                reader.seek(SeekFrom::Current(skip as i64))?;
            }
            b"data" => {
                let (channels, sample_rate, bits_per_sample) = format.ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidData, "data chunk before fmt")
                })?;
                let data_pos = reader.stream_position()?;
                return Ok(WavInfo {
                    channels,
                    sample_rate,
                    bits_per_sample,
                    data_pos,
                    data_len: chunk_size,
                });
            }
            _ => {
                let skip = u64::from(chunk_size) + u64::from(chunk_size % 2);
                reader.seek(SeekFrom::Current(skip as i64))?;
            }
        }
    }
}

struct AudioFlags {
    generation: AtomicU32,
    playing: AtomicBool,
}

pub struct AudioPlayer {
    storage: Arc<dyn Storage>,
    sink: Arc<Mutex<dyn AudioSink>>,
    flags: Arc<AudioFlags>,
}

impl AudioPlayer {
    pub fn new(storage: Arc<dyn Storage>, sink: Arc<Mutex<dyn AudioSink>>) -> Self {
        Self {
            storage,
            sink,
            flags: Arc::new(AudioFlags {
                generation: AtomicU32::new(0),
                playing: AtomicBool::new(false),
            }),
        }
    }

    /// Supersedes any in-flight playback and starts streaming the given
    /// track on a fresh worker.
    pub fn play(&self, track: &str) {
        let generation = self.flags.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.flags.playing.store(true, Ordering::SeqCst);

        let track = track.to_string();
        let storage = Arc::clone(&self.storage);
        let sink = Arc::clone(&self.sink);
        let flags = Arc::clone(&self.flags);
        thread::spawn(move || stream_track(&track, generation, storage, sink, flags));
    }

    /// Idempotent: any live worker sees the stale generation at its next
    /// chunk boundary and unwinds.
    pub fn stop(&self) {
        self.flags.generation.fetch_add(1, Ordering::SeqCst);
        self.flags.playing.store(false, Ordering::SeqCst);
    }

    pub fn is_playing(&self) -> bool {
        self.flags.playing.load(Ordering::SeqCst)
    }

    /// Effect cues bypass the streaming path entirely.
    pub fn effect(&self, effect: SoundEffect) {
        let (freq_hz, duration_ms) = effect.tone();
        self.sink.lock().unwrap().tone(freq_hz, duration_ms);
    }
}

fn stream_track(
    track: &str,
    generation: u32,
    storage: Arc<dyn Storage>,
    sink: Arc<Mutex<dyn AudioSink>>,
    flags: Arc<AudioFlags>,
) {
    let outcome = (|| -> io::Result<()> {
        let mut handle = storage.open_read(track)?;
        let info = parse_wav(&mut *handle)?;
        handle.seek(SeekFrom::Start(info.data_pos))?;
        tracing::debug!(
            track,
            sample_rate = info.sample_rate,
            channels = info.channels,
            "streaming"
        );

        let mut remaining = info.data_len as usize;
        let mut chunk = [0u8; AUDIO_CHUNK_BYTES];
        while remaining > 0 {
            if flags.generation.load(Ordering::SeqCst) != generation {
                // Superseded by a newer play() or a stop().
                return Ok(());
            }
            let want = chunk.len().min(remaining);
            let got = handle.read(&mut chunk[..want])?;
            if got == 0 {
                break;
            }
            sink.lock().unwrap().write_chunk(&chunk[..got])?;
            remaining -= got;
        }
        Ok(())
    })();

    if let Err(error) = outcome {
        tracing::warn!(track, "audio stream ended early: {error}");
    }

    // Only the current generation owns the playing flag; a stale worker
    // must not clear it for its successor.
    if flags.generation.load(Ordering::SeqCst) == generation {
        flags.playing.store(false, Ordering::SeqCst);
    }
}

/// Minimal PCM WAV image for tests: a 44-byte header followed by
/// `data_len` bytes of `fill`.
#[cfg(test)]
pub(crate) fn wav_bytes(fill: u8, data_len: usize) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&((36 + data_len) as u32).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&2u16.to_le_bytes()); // channels
    bytes.extend_from_slice(&44_100u32.to_le_bytes());
    bytes.extend_from_slice(&176_400u32.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&4u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&(data_len as u32).to_le_bytes());
    bytes.extend(std::iter::repeat(fill).take(data_len));
    bytes
}
