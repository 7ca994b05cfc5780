//! The lock-free-ring-fed audio mixer.
//!
//! [`Mixer`] is the game-thread-facing handle: every method just encodes a command and pushes it
//! onto the [`ring::CommandRing`], so it's cheap and safe to call from any thread. [`MixState`] is
//! owned exclusively by the audio thread and advanced by [`Mixer::process`], which drains the
//! ring and then runs [`mix::mix`].

mod command;
mod fade;
mod mix;
mod ring;
mod spatial;
mod voice;

pub use self::{
    fade::{Fade, FadeStyle, FadeTable},
    mix::{mix, DenormalGuard},
    spatial::{Listener, mix_matrix, ChannelMix},
    voice::{Voice, VoiceFlags, VoiceId, VoiceTable, VoiceType, Waveform},
};

use {
    command::Command,
    parking_lot::Mutex,
    ring::CommandRing,
    std::sync::Arc,
};

/// Audio-thread-only mixing state: fades and the listener basis. Kept separate from
/// [`Mixer`]'s shared, lock-guarded [`VoiceTable`] because nothing outside the mix callback ever
/// touches it.
#[derive(Default)]
pub struct MixState {
    pub fades: FadeTable,
    pub listener: Listener,
}

/// The game-thread-facing mixer handle. Cheap to clone (an `Arc` internally) and safe to share
/// across threads; every producer method just encodes and enqueues a command.
pub struct Mixer {
    ring: CommandRing,
    voices: Mutex<VoiceTable>,
}

impl Mixer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ring: CommandRing::new(),
            voices: Mutex::new(VoiceTable::new()),
        })
    }

    /// Reserves a voice slot and enqueues its start; the id is valid (and can be passed to
    /// [`Self::fade`]/[`Self::stop_sound`]/...) immediately, even though the mix callback hasn't
    /// processed the command yet.
    pub fn play_sound(
        &self,
        waveform: Arc<Waveform>,
        volume: f32,
        flags: VoiceFlags,
        position: glam::Vec3,
        min_distance: f32,
    ) -> VoiceId {
        let id = self.voices.lock().reserve();
        self.ring.push(Command::PlaySound {
            id,
            waveform,
            volume,
            flags,
            position,
            min_distance,
        });
        id
    }

    pub fn stop_sound(&self, id: VoiceId) {
        self.ring.push(Command::StopSound { id });
    }

    #[allow(clippy::too_many_arguments)]
    pub fn fade(&self, id: VoiceId, start: f32, target: f32, style: FadeStyle, duration_samples: u32, stop_on_finish: bool) {
        self.ring.push(Command::Fade {
            id,
            start,
            target,
            style,
            duration_samples,
            stop_on_finish,
        });
    }

    pub fn update_listener(&self, position: glam::Vec3, direction: glam::Vec3) {
        self.ring.push(Command::UpdateListener { position, direction });
    }

    pub fn sound_position(&self, id: VoiceId, position: glam::Vec3) {
        self.ring.push(Command::SoundPosition { id, position });
    }

    pub fn set_playing_sound_flags(&self, id: VoiceId, unset_mask: VoiceFlags, set_mask: VoiceFlags) {
        self.ring.push(Command::SetPlayingSoundFlags { id, unset_mask, set_mask });
    }

    /// Called by the audio thread with a frame count `F`: drains the ring, then mixes `F` stereo
    /// frames into `output` (length `F * 2`).
    pub fn process(&self, state: &mut MixState, frame_count: u32, output: &mut [f32]) {
        let mut voices = self.voices.lock();

        self.ring.drain(|command| apply_command(&mut voices, &mut state.fades, &mut state.listener, command));

        mix::mix(&mut voices, &mut state.fades, &state.listener, frame_count, output);
    }
}

fn apply_command(voices: &mut VoiceTable, fades: &mut FadeTable, listener: &mut Listener, command: Command) {
    match command {
        Command::PlaySound { id, waveform, volume, flags, position, min_distance } => {
            voices.install(
                id,
                Voice {
                    waveform,
                    volume,
                    flags,
                    position,
                    min_distance,
                    at_index: 0,
                    fades: Vec::new(),
                    stop_requested: false,
                },
            );
        }
        Command::StopSound { id } => voices.retire(id),
        Command::Fade { id, start, target, style, duration_samples, stop_on_finish } => {
            if let Some(voice) = voices.get_mut(id) {
                let index = fades.insert(fade::Fade::new(start, target, style, duration_samples, stop_on_finish));
                voice.fades.push(index);
            }
        }
        Command::UpdateListener { position, direction } => {
            listener.position = position;
            listener.forward = direction;
        }
        Command::SoundPosition { id, position } => {
            if let Some(voice) = voices.get_mut(id) {
                voice.position = position;
            }
        }
        Command::SetPlayingSoundFlags { id, unset_mask, set_mask } => {
            if let Some(voice) = voices.get_mut(id) {
                voice.flags = voice.flags.apply(unset_mask, set_mask);
            }
        }
    }
}
