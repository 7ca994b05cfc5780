//! Spatialisation: the channel-mix matrix blending

use {super::voice::VoiceFlags, glam::Vec3};

/// The listener's position and facing; `right` is derived assuming a Z-up world, matching the
/// rest of the engine's coordinate convention (see [`crate::map`]).
#[derive(Clone, Copy, Debug)]
pub struct Listener {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Default for Listener {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::Y,
        }
    }
}

impl Listener {
    pub fn right(&self) -> Vec3 {
        self.forward.cross(Vec3::Z).normalize_or_zero()
    }
}

/// One row per source channel: `[left_gain, right_gain]`.
pub type ChannelMix = Vec<[f32; 2]>;

fn unspatialized_matrix(in_channels: u32, force_mono: bool) -> ChannelMix {
    if force_mono {
        let g = std::f32::consts::FRAC_1_SQRT_2;
        return (0..in_channels).map(|_| [g, g]).collect();
    }

    match in_channels {
        0 => Vec::new(),
        1 => vec![[1.0, 1.0]],
        _ => (0..in_channels)
            .map(|i| if i % 2 == 0 { [1.0, 0.0] } else { [0.0, 1.0] })
            .collect(),
    }
}

fn spatial_matrix(listener: &Listener, position: Vec3, min_distance: f32, in_channels: u32) -> ChannelMix {
    let to_sound = position - listener.position;
    let dist = to_sound.length();
    let dist_sq = dist * dist;

    let attenuation = min_distance / (min_distance + dist_sq);
    let dir = if dist > 1e-5 { to_sound / dist } else { Vec3::ZERO };
    let cos_theta = dir.dot(listener.right());
    let pan = (0.5 * (cos_theta + 1.0)).clamp(0.0, 1.0).sqrt();

    let left = attenuation * (1.0 - pan);
    let right = attenuation * pan;
    (0..in_channels).map(|_| [left, right]).collect()
}

/// The final `in_channels × 2` mix matrix for one voice this mix step.
pub fn mix_matrix(listener: &Listener, flags: VoiceFlags, position: Vec3, min_distance: f32, in_channels: u32) -> ChannelMix {
    let unspatial = unspatialized_matrix(in_channels, flags.contains(VoiceFlags::FORCE_MONO));

    if !flags.contains(VoiceFlags::SPATIAL) {
        return unspatial;
    }

    let spatial = spatial_matrix(listener, position, min_distance, in_channels);
    let dist_sq = (position - listener.position).length_squared();
    let blend = (0.2 * min_distance) / (0.2 * min_distance + dist_sq);

    spatial
        .iter()
        .zip(unspatial.iter())
        .map(|(s, u)| [s[0] * (1.0 - blend) + u[0] * blend, s[1] * (1.0 - blend) + u[1] * blend])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distant_sound_attenuates_toward_silence() {
        let listener = Listener::default();
        let matrix = mix_matrix(&listener, VoiceFlags::SPATIAL, Vec3::new(1000.0, 0.0, 0.0), 1.0, 1);
        assert!(matrix[0][0] < 0.01);
        assert!(matrix[0][1] < 0.01);
    }

    #[test]
    fn sound_at_listener_position_is_not_attenuated_by_distance() {
        let listener = Listener::default();
        let matrix = mix_matrix(&listener, VoiceFlags::SPATIAL, listener.position, 1.0, 1);
        assert!((matrix[0][0] + matrix[0][1] - 1.0).abs() < 0.2);
    }

    #[test]
    fn unspatialised_voice_ignores_position() {
        let listener = Listener::default();
        let matrix = mix_matrix(&listener, VoiceFlags::NONE, Vec3::new(1000.0, 0.0, 0.0), 1.0, 1);
        assert_eq!(matrix, vec![[1.0, 1.0]]);
    }
}
