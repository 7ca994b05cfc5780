//! The mix loop itself and denormal protection around it.

use super::{
    fade::FadeTable,
    spatial::{mix_matrix, Listener},
    voice::{VoiceFlags, VoiceTable},
};

/// Flushes denormals to zero for the lifetime of the guard, restoring the previous MXCSR state
/// on drop. A no-op off x86_64, where SSE2 (and its MXCSR)
/// isn't guaranteed present.
pub struct DenormalGuard {
    #[cfg(target_arch = "x86_64")]
    previous_mxcsr: u32,
}

impl DenormalGuard {
    #[cfg(target_arch = "x86_64")]
    pub fn new() -> Self {
        use std::arch::x86_64::{_mm_getcsr, _mm_setcsr};

        const FLUSH_TO_ZERO: u32 = 1 << 15;

        let previous_mxcsr = unsafe { _mm_getcsr() };
        unsafe { _mm_setcsr(previous_mxcsr | FLUSH_TO_ZERO) };
        Self { previous_mxcsr }
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn new() -> Self {
        Self {}
    }
}

impl Drop for DenormalGuard {
    fn drop(&mut self) {
        #[cfg(target_arch = "x86_64")]
        unsafe {
            std::arch::x86_64::_mm_setcsr(self.previous_mxcsr);
        }
    }
}

/// Mixes `frame_count` stereo frames into `output` (length `frame_count * 2`, interleaved L/R),
/// once commands have already been drained. Commands must already have been drained into `voices`/
/// `fades`/`listener` by the caller before calling this.
pub fn mix(voices: &mut VoiceTable, fades: &mut FadeTable, listener: &Listener, frame_count: u32, output: &mut [f32]) {
    debug_assert_eq!(output.len(), frame_count as usize * 2);

    let _denormal_guard = DenormalGuard::new();

    for sample in output.iter_mut() {
        *sample = 0.0;
    }

    let mut finished = Vec::new();

    for (id, voice) in voices.iter_mut() {
        let channels = voice.waveform.channels;
        if channels == 0 {
            continue;
        }

        let looping = voice.flags.contains(VoiceFlags::LOOPING);
        let matrix = mix_matrix(listener, voice.flags, voice.position, voice.min_distance, channels);

        let fade_scalar: f32 = voice
            .fades
            .iter()
            .filter_map(|&idx| fades.get(idx).map(|fade| fade.value()))
            .product::<f32>()
            .max(0.0);

        for f in 0..frame_count {
            let frame = voice.at_index + f;
            for channel in 0..channels {
                let sample = voice.waveform.sample(frame, channel, looping) * voice.volume * fade_scalar;
                let row = matrix[channel as usize];
                output[(f * 2) as usize] += sample * row[0];
                output[(f * 2 + 1) as usize] += sample * row[1];
            }
        }

        voice.at_index += frame_count;
        let total_frames = voice.waveform.frame_count();
        if looping && total_frames > 0 {
            voice.at_index %= total_frames;
        } else if voice.at_index >= total_frames {
            voice.stop_requested = true;
        }

        let mut finished_fades = Vec::new();
        for &idx in &voice.fades {
            if let Some(stop_on_finish) = fades.advance(idx, frame_count) {
                finished_fades.push(idx);
                if stop_on_finish {
                    voice.stop_requested = true;
                }
            }
        }
        voice.fades.retain(|idx| !finished_fades.contains(idx));

        if voice.stop_requested {
            finished.push(id);
        }
    }

    for id in finished {
        voices.retire(id);
    }

    for sample in output.iter_mut() {
        *sample = sample.clamp(-1.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixer::voice::{Voice, Waveform};
    use glam::Vec3;
    use std::sync::Arc;

    fn voice_table_with(waveform: Arc<Waveform>, flags: VoiceFlags) -> VoiceTable {
        let mut table = VoiceTable::new();
        let id = table.reserve();
        table.install(
            id,
            Voice {
                waveform,
                volume: 1.0,
                flags,
                position: Vec3::ZERO,
                min_distance: 1.0,
                at_index: 0,
                fades: Vec::new(),
                stop_requested: false,
            },
        );
        table
    }

    #[test]
    fn a_looping_mono_voice_produces_nonzero_output() {
        let waveform = Arc::new(Waveform { channels: 1, samples: vec![1.0; 8] });
        let mut voices = voice_table_with(waveform, VoiceFlags::LOOPING);
        let mut fades = FadeTable::new();
        let listener = Listener::default();

        let mut output = vec![0.0; 8];
        mix(&mut voices, &mut fades, &listener, 4, &mut output);

        assert!(output.iter().any(|&s| s.abs() > 0.0));
    }

    #[test]
    fn a_non_looping_voice_retires_once_it_runs_out() {
        let waveform = Arc::new(Waveform { channels: 1, samples: vec![1.0; 8] });
        let mut voices = voice_table_with(waveform, VoiceFlags::NONE);
        let mut fades = FadeTable::new();
        let listener = Listener::default();

        let mut output = vec![0.0; 8];
        mix(&mut voices, &mut fades, &listener, 4, &mut output);
        assert_eq!(voices.iter_mut().count(), 1);

        mix(&mut voices, &mut fades, &listener, 4, &mut output);
        assert_eq!(voices.iter_mut().count(), 0);
    }

    #[test]
    fn output_is_always_clamped_to_unit_range() {
        let waveform = Arc::new(Waveform { channels: 1, samples: vec![10.0; 8] });
        let mut voices = voice_table_with(waveform, VoiceFlags::LOOPING);
        let mut fades = FadeTable::new();
        let listener = Listener::default();

        let mut output = vec![0.0; 8];
        mix(&mut voices, &mut fades, &listener, 4, &mut output);

        assert!(output.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }
}
