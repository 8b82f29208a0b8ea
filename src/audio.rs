//! Audio cue interface
//!
//! The simulation never synthesizes sound; it reports gameplay events
//! as [`AudioCue`]s to whatever sink the host injects. A headless run
//! uses [`NullAudio`].

/// Gameplay events the presentation layer may voice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    /// Agent fired a weapon
    Shot,
    /// A hostile was hit but survived
    HostileHit,
    /// A hostile (or the boss) was destroyed
    Explosion,
    /// Agent took damage
    AgentDamage,
    /// Agent collected a pickup
    Pickup,
    /// Agent leveled up
    LevelUp,
    /// Boss entered the arena
    BossSpawn,
    /// Boss ground slam landed
    BossSlam,
    /// Low-health pulse, paced by the simulation
    Heartbeat,
    /// Session ended
    GameOver,
}

/// Fire-and-forget audio sink; implementations must not fail loudly.
pub trait AudioSink {
    /// Voice a single cue. Called mid-frame, so implementations
    /// should queue rather than block.
    fn play(&mut self, cue: AudioCue);
}

/// Discards every cue. Default sink for headless sessions and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Records cues in order. Clones share the log, so a test can keep a
/// handle while the world owns the boxed sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    cues: std::rc::Rc<std::cell::RefCell<Vec<AudioCue>>>,
}

impl RecordingAudio {
    pub fn cues(&self) -> Vec<AudioCue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.borrow().iter().filter(|&&c| c == cue).count()
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: AudioCue) {
        self.cues.borrow_mut().push(cue);
    }
}
