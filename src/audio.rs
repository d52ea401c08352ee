//! Audio system using Web Audio API
//!
//! Everything is synthesized with oscillators, so no sound files are fetched.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::platform::Audio;
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player hit a meteor
    Death,
    /// Meteors recycled past the left edge
    Score,
    /// Meteors got faster
    SpeedUp,
}

/// Nodes of the running background loop
struct Music {
    oscillators: Vec<OscillatorNode>,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    sfx_volume: f32,
    music_volume: f32,
    music: Option<Music>,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let mut manager = Self {
            ctx,
            sfx_volume: 0.0,
            music_volume: 0.0,
            music: None,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        self.resume();

        match effect {
            SoundEffect::Jump => play_jump(ctx, vol),
            SoundEffect::Death => play_death(ctx, vol),
            SoundEffect::Score => play_score(ctx, vol),
            SoundEffect::SpeedUp => play_speed_up(ctx, vol),
        }
    }

    fn start_music(&self) -> Option<Music> {
        let ctx = self.ctx.as_ref()?;
        self.resume();

        let gain = ctx.create_gain().ok()?;
        gain.gain().set_value(self.music_volume * MUSIC_LEVEL);
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        let mut oscillators = Vec::new();
        // Low detuned drone
        for (freq, osc_type) in [
            (55.0, OscillatorType::Sawtooth),
            (55.4, OscillatorType::Sawtooth),
            (110.0, OscillatorType::Triangle),
        ] {
            let osc = ctx.create_oscillator().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            oscillators.push(osc);
        }

        // Slow swell on the drone's gain
        let lfo = ctx.create_oscillator().ok()?;
        let depth = ctx.create_gain().ok()?;
        lfo.frequency().set_value(0.25);
        depth.gain().set_value(self.music_volume * MUSIC_LEVEL * 0.5);
        lfo.connect_with_audio_node(&depth).ok()?;
        depth.connect_with_audio_param(&gain.gain()).ok()?;
        oscillators.push(lfo);

        for osc in &oscillators {
            osc.start().ok()?;
        }
        Some(Music { oscillators, gain })
    }
}

/// Music sits well below the effects
const MUSIC_LEVEL: f32 = 0.15;

impl Audio for AudioManager {
    fn play_background_music(&mut self) {
        if self.music.is_some() || self.music_volume <= 0.0 {
            return;
        }
        self.music = self.start_music();
        if self.music.is_some() {
            log::debug!("Background music started");
        }
    }

    fn stop_background_music(&mut self) {
        if let Some(music) = self.music.take() {
            for osc in &music.oscillators {
                osc.stop().ok();
            }
            music.gain.disconnect().ok();
        }
    }

    fn play_jump_sound(&mut self) {
        self.play(SoundEffect::Jump);
    }

    fn play_death_sound(&mut self) {
        self.play(SoundEffect::Death);
    }

    fn play_score_sound(&mut self) {
        self.play(SoundEffect::Score);
    }

    fn play_speed_up_sound(&mut self) {
        self.play(SoundEffect::SpeedUp);
    }

    fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let (Some(music), Some(ctx)) = (&self.music, &self.ctx) {
            music
                .gain
                .gain()
                .set_value_at_time(self.music_volume * MUSIC_LEVEL, ctx.current_time())
                .ok();
        }
    }
}

// === Sound generators ===

/// Create an oscillator with gain envelope
fn create_osc(
    ctx: &AudioContext,
    freq: f32,
    osc_type: OscillatorType,
) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;

    osc.set_type(osc_type);
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;

    Some((osc, gain))
}

/// Jump - quick upward chirp
fn play_jump(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 250.0, OscillatorType::Square) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.2, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
        .ok();
    osc.frequency().set_value_at_time(250.0, t).ok();
    osc.frequency()
        .exponential_ramp_to_value_at_time(700.0, t + 0.12)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.18).ok();
}

/// Death - crunch followed by a falling tone
fn play_death(ctx: &AudioContext, vol: f32) {
    let t = ctx.current_time();

    if let Some((osc, gain)) = create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
        gain.gain().set_value_at_time(vol * 0.45, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.3)
            .ok();
        osc.frequency().set_value_at_time(120.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(35.0, t + 0.3)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.35).ok();
    }

    for (i, freq) in [440.0, 370.0, 294.0, 220.0].iter().enumerate() {
        let delay = 0.15 + i as f64 * 0.18;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}

/// Score - soft high blip
fn play_score(ctx: &AudioContext, vol: f32) {
    let Some((osc, gain)) = create_osc(ctx, 880.0, OscillatorType::Sine) else {
        return;
    };
    let t = ctx.current_time();

    gain.gain().set_value_at_time(vol * 0.12, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.01, t + 0.08)
        .ok();

    osc.start().ok();
    osc.stop_with_when(t + 0.1).ok();
}

/// Speed up - rising two-note cue
fn play_speed_up(ctx: &AudioContext, vol: f32) {
    for (i, freq) in [523.0, 784.0].iter().enumerate() {
        let delay = i as f64 * 0.09;
        if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Triangle) {
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.18).ok();
        }
    }
}
