//! Volume fades").
//!
//! Multiple fades can be attached to the same voice at once (e.g. an in-progress fade-out
//! cancelled by a new fade-in); the mix loop multiplies a voice's volume by every attached fade's
//! current value, so nothing here assumes at most one fade per voice.

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FadeStyle {
    Linear,
    Smoothstep,
    Smootherstep,
}

impl FadeStyle {
    fn ease(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
            Self::Smootherstep => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}

/// A fade in progress against one voice's volume.
pub struct Fade {
    pub start: f32,
    pub target: f32,
    pub style: FadeStyle,
    pub duration_samples: u32,
    pub elapsed_samples: u32,
    /// If set, the owning voice is stopped the instant this fade finishes.
    pub stop_on_finish: bool,
}

impl Fade {
    pub fn new(start: f32, target: f32, style: FadeStyle, duration_samples: u32, stop_on_finish: bool) -> Self {
        Self {
            start,
            target,
            style,
            duration_samples: duration_samples.max(1),
            elapsed_samples: 0,
            stop_on_finish,
        }
    }

    /// This fade's interpolated value at its current `elapsed_samples`.
    pub fn value(&self) -> f32 {
        let t = (self.elapsed_samples as f32 / self.duration_samples as f32).clamp(0.0, 1.0);
        let eased = self.style.ease(t);
        self.start + (self.target - self.start) * eased
    }

    /// Advances by `samples`; returns `true` once the fade has run its full duration.
    pub fn advance(&mut self, samples: u32) -> bool {
        self.elapsed_samples = self.elapsed_samples.saturating_add(samples);
        self.elapsed_samples >= self.duration_samples
    }
}

/// Indexed storage for in-flight fades, mirroring [`super::voice::VoiceTable`]'s free-list
/// recycling.
#[derive(Default)]
pub struct FadeTable {
    slots: Vec<Option<Fade>>,
    free: Vec<u32>,
}

impl FadeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, fade: Fade) -> u32 {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(fade);
            index
        } else {
            self.slots.push(Some(fade));
            self.slots.len() as u32 - 1
        }
    }

    pub fn get(&self, index: u32) -> Option<&Fade> {
        self.slots.get(index as usize)?.as_ref()
    }

    /// Advances the fade at `index` by `samples`; retires (and frees) it if finished. Returns
    /// `Some(stop_on_finish)` if the fade finished on this call.
    pub fn advance(&mut self, index: u32, samples: u32) -> Option<bool> {
        let slot = self.slots.get_mut(index as usize)?;
        let fade = slot.as_mut()?;
        if fade.advance(samples) {
            let stop_on_finish = fade.stop_on_finish;
            *slot = None;
            self.free.push(index);
            Some(stop_on_finish)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_fade_reaches_target_at_full_duration() {
        let mut fade = Fade::new(0.0, 1.0, FadeStyle::Linear, 100, false);
        assert_eq!(fade.value(), 0.0);
        let finished = fade.advance(100);
        assert!(finished);
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn smoothstep_is_monotonic_between_endpoints() {
        let mut fade = Fade::new(0.0, 1.0, FadeStyle::Smoothstep, 10, false);
        let mut last = fade.value();
        for _ in 0..10 {
            fade.advance(1);
            let next = fade.value();
            assert!(next >= last);
            last = next;
        }
    }

    #[test]
    fn finished_fade_slot_is_recycled() {
        let mut table = FadeTable::new();
        let a = table.insert(Fade::new(0.0, 1.0, FadeStyle::Linear, 1, false));
        assert_eq!(table.advance(a, 1), Some(false));
        let b = table.insert(Fade::new(0.0, 1.0, FadeStyle::Linear, 1, true));
        assert_eq!(a, b);
    }
}
