//! Audio system using Web Audio API
//!
//! Procedurally generated cues and a background drone, no external files.
//! The host feeds it the controller's [`GameEvent`]s.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::{AudioCue, GameEvent};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    music: Option<(OscillatorNode, GainNode)>,
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            music: None,
            sfx_volume: settings.effective_sfx_volume(),
            music_volume: settings.effective_music_volume(),
        }
    }

    /// Route one controller event
    pub fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::Cue(cue) => self.play(cue),
            GameEvent::MusicPaused => self.pause_music(),
            GameEvent::MusicResumed => self.resume_music(),
        }
    }

    /// Play a sound cue
    pub fn play(&self, cue: AudioCue) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        log::debug!("Cue: {}", cue.name());
        match cue {
            AudioCue::Pickup => self.play_pickup(ctx, vol),
            AudioCue::Death => self.play_death(ctx, vol),
            AudioCue::Thump => self.play_thump(ctx, vol),
        }
    }

    /// Start or unmute the background drone
    fn resume_music(&mut self) {
        let Some(ctx) = &self.ctx else { return };
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        if self.music.is_none() {
            let Some((osc, gain)) = create_osc(ctx, 55.0, OscillatorType::Triangle) else {
                return;
            };
            gain.gain().set_value(0.0);
            osc.start().ok();
            self.music = Some((osc, gain));
        }

        if let Some((_, gain)) = &self.music {
            let t = ctx.current_time();
            gain.gain().cancel_scheduled_values(t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(self.music_volume * 0.15, t + 0.3)
                .ok();
        }
    }

    /// Fade the drone out; the oscillator keeps running silently
    fn pause_music(&mut self) {
        let (Some(ctx), Some((_, gain))) = (&self.ctx, &self.music) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().cancel_scheduled_values(t).ok();
        gain.gain().set_value_at_time(gain.gain().value(), t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.2).ok();
    }

    // === Sound generators ===

    /// Pickup - happy ding
    fn play_pickup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.2).ok();
            }
        }
    }

    /// Death - sad descending
    fn play_death(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.15;
            if let Some((osc, gain)) = create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.25, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.3).ok();
            }
        }
    }

    /// Thump - dull knock against a harmless wall
    fn play_thump(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = create_osc(ctx, 150.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(60.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }
}

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
