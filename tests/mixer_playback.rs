//! Mixer play -> stop: a looping voice produces audible output, and once stopped, the next
//! `process` call after the stop command drains produces silence (the mixer retires a stopped
//! voice immediately rather than fading it out).

use quartz_engine::mixer::{Mixer, MixState, VoiceFlags, Waveform};
use std::sync::Arc;

const FRAMES_PER_BLOCK: u32 = 64;

#[test]
fn a_playing_voice_goes_silent_one_block_after_stop_sound() {
    let mixer = Mixer::new();
    let mut state = MixState::default();
    let mut output = vec![0.0f32; (FRAMES_PER_BLOCK * 2) as usize];

    let waveform = Arc::new(Waveform { channels: 1, samples: vec![1.0; 256] });
    let id = mixer.play_sound(waveform, 1.0, VoiceFlags::LOOPING, glam::Vec3::ZERO, 1.0);

    // Half a second at 44.1kHz, in 64-frame blocks: every block before the stop is audible.
    let blocks_for_half_second = 22_050 / FRAMES_PER_BLOCK;
    for _ in 0..blocks_for_half_second {
        mixer.process(&mut state, FRAMES_PER_BLOCK, &mut output);
        assert!(output.iter().any(|&s| s.abs() > 0.0), "expected audible output before stop");
    }

    mixer.stop_sound(id);

    mixer.process(&mut state, FRAMES_PER_BLOCK, &mut output);
    assert!(output.iter().all(|&s| s == 0.0), "expected silence in the block after stop_sound");
}
