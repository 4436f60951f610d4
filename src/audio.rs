//! Sound effect routing
//!
//! The core never plays audio itself. It names the effect and hands it to an
//! optional [`SoundBackend`]; with no backend installed every call is a no-op.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Puck touched something (outside the startup grace period)
    Hit,
    /// Non-terminal goal
    Goal,
    /// Player dash
    Dash,
    /// Match decided
    GameOver,
    /// Menu interaction (pause, rematch)
    UiClick,
}

/// Playback device supplied by the host
pub trait SoundBackend {
    /// Fire-and-forget playback at the given linear volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start looping background music
    fn start_music(&mut self, _volume: f32) {}
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn SoundBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl std::fmt::Debug for AudioManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioManager")
            .field("has_backend", &self.backend.is_some())
            .field("master_volume", &self.master_volume)
            .field("sfx_volume", &self.sfx_volume)
            .field("music_volume", &self.music_volume)
            .field("muted", &self.muted)
            .finish()
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn SoundBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No sound backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Get effective SFX volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.play(effect, vol);
    }

    /// Start background music
    pub fn start_music(&mut self) {
        if self.muted {
            return;
        }
        let vol = self.master_volume * self.music_volume;
        if let Some(backend) = self.backend.as_mut() {
            backend.start_music(vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<(SoundEffect, f32)>>>);

    impl SoundBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.borrow_mut().push((effect, volume));
        }
    }

    #[test]
    fn test_plays_at_effective_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        audio.play(SoundEffect::Hit);

        assert_eq!(recorder.0.borrow().as_slice(), &[(SoundEffect::Hit, 0.25)]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.set_muted(true);
        audio.play(SoundEffect::Goal);
        assert!(recorder.0.borrow().is_empty());
    }

    #[test]
    fn test_missing_backend_is_silent() {
        let mut audio = AudioManager::default();
        assert!(!audio.has_backend());
        audio.play(SoundEffect::Dash);
        audio.start_music();
    }

    #[test]
    fn test_volume_clamped() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.set_master_volume(4.0);
        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::UiClick);
        assert!(recorder.0.borrow().is_empty());
    }
}
