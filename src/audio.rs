use std::collections::HashMap;
use std::f32::consts::TAU;

use log::{info, warn};
use macroquad::audio::{PlaySoundParams, Sound, load_sound_from_bytes, play_sound};

use crate::presentation::{AudioSink, SoundId};

pub const SAMPLE_RATE: u32 = 44100;

/// Wraps mono samples in `-1.0..=1.0` as a PCM16 WAV file.
pub fn encode_wav(samples: &[f32]) -> Vec<u8> {
    let num_samples = samples.len() as u32;
    let block_align: u16 = 2; // mono 16-bit
    let byte_rate: u32 = SAMPLE_RATE * block_align as u32;
    let data_size: u32 = num_samples * 2;
    let chunk_size: u32 = 36 + data_size;

    let mut data: Vec<u8> = Vec::with_capacity(data_size as usize + 44);
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&chunk_size.to_le_bytes());
    data.extend_from_slice(b"WAVE");
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes()); // PCM chunk size
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    data.extend_from_slice(&1u16.to_le_bytes()); // channels
    data.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    data.extend_from_slice(&byte_rate.to_le_bytes());
    data.extend_from_slice(&block_align.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    data.extend_from_slice(b"data");
    data.extend_from_slice(&data_size.to_le_bytes());

    for s in samples {
        let sample = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
        data.extend_from_slice(&sample.to_le_bytes());
    }
    data
}

fn synth(duration_seconds: f32, mut wave: impl FnMut(f32) -> f32) -> Vec<f32> {
    let n = (duration_seconds * SAMPLE_RATE as f32) as usize;
    (0..n).map(|i| wave(i as f32 / SAMPLE_RATE as f32)).collect()
}

/// Raw samples for each sound the game uses.
pub fn samples_for(sound: SoundId) -> Vec<f32> {
    match sound {
        SoundId::Eat => synth(0.2, |t| {
            let frequency = 800.0 + (t * 20.0).sin() * 200.0;
            (TAU * frequency * t).sin() * (-t * 8.0).exp() * 0.3
        }),
        SoundId::GameOver => synth(1.5, |t| {
            let frequency = 200.0 - t * 150.0;
            let noise = macroquad::rand::gen_range(-0.05, 0.05);
            ((TAU * frequency * t).sin() + noise) * (-t * 2.0).exp() * 0.4
        }),
        SoundId::Click => synth(0.1, |t| (TAU * 1000.0 * t).sin() * (-t * 20.0).exp() * 0.2),
        SoundId::HighScore => synth(2.0, |t| {
            let frequency = 440.0 + (t * 8.0).sin() * 220.0 + t * 200.0;
            let envelope = (-t * 1.5).exp() * (1.0 + (t * 15.0).sin() * 0.3);
            (TAU * frequency * t).sin() * envelope * 0.3
        }),
    }
}

/// Procedurally generated sounds played through macroquad. Sounds that
/// failed to load stay silent.
pub struct SoundBank {
    sounds: HashMap<SoundId, Sound>,
    enabled: bool,
    volume: f32,
}

impl SoundBank {
    pub async fn load(enabled: bool) -> Self {
        let mut sounds = HashMap::new();
        for id in SoundId::ALL {
            match load_sound_from_bytes(&encode_wav(&samples_for(id))).await {
                Ok(sound) => {
                    sounds.insert(id, sound);
                }
                Err(e) => warn!("sound {id:?} unavailable: {e}"),
            }
        }
        info!("loaded {}/{} sounds", sounds.len(), SoundId::ALL.len());
        Self { sounds, enabled, volume: 1.0 }
    }
}

impl AudioSink for SoundBank {
    fn play(&mut self, sound: SoundId) {
        if !self.enabled {
            return;
        }
        if let Some(s) = self.sounds.get(&sound) {
            play_sound(s, PlaySoundParams { looped: false, volume: self.volume });
        }
    }

    fn toggle_mute(&mut self) -> bool {
        self.enabled = !self.enabled;
        info!("sound {}", if self.enabled { "on" } else { "off" });
        self.enabled
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
