//! The POD commands carried over [`super::ring::CommandRing`].

use {
    super::{fade::FadeStyle, voice::{VoiceFlags, VoiceId, Waveform}},
    glam::Vec3,
    std::sync::Arc,
};

pub enum Command {
    PlaySound {
        id: VoiceId,
        waveform: Arc<Waveform>,
        volume: f32,
        flags: VoiceFlags,
        position: Vec3,
        min_distance: f32,
    },
    StopSound {
        id: VoiceId,
    },
    Fade {
        id: VoiceId,
        start: f32,
        target: f32,
        style: FadeStyle,
        duration_samples: u32,
        stop_on_finish: bool,
    },
    UpdateListener {
        position: Vec3,
        direction: Vec3,
    },
    SoundPosition {
        id: VoiceId,
        position: Vec3,
    },
    SetPlayingSoundFlags {
        id: VoiceId,
        unset_mask: VoiceFlags,
        set_mask: VoiceFlags,
    },
}
