//! Sound cues over MIDI.
//!
//! Cues are queued to a playback thread that turns each into one or two
//! short General-MIDI notes. Nothing is sent back; a missing MIDI port just
//! means silence.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::SoundConfig;

// ════════════════════════════════════════════════════════════════════════════
// SoundCue
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// A shot was fired.
    Laser,
    /// A target was destroyed.
    Explosion,
    /// A target escaped.
    Miss,
    /// The cursor moved onto a menu item.
    Hover,
    /// A menu item was activated.
    Click,
    /// The countdown finished and the round began.
    Start,
    GameOver,
}

/// One note of a cue. `drum` notes go to the GM percussion channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CueNote {
    pub program: u8,
    pub pitch:   u8,
    pub drum:    bool,
    pub millis:  u64,
}

const fn tone(program: u8, pitch: u8, millis: u64) -> CueNote {
    CueNote { program, pitch, drum: false, millis }
}

const fn drum(pitch: u8, millis: u64) -> CueNote {
    CueNote { program: 0, pitch, drum: true, millis }
}

// GM programs
const LEAD_SQUARE: u8 = 80;
const FX_SCIFI:    u8 = 103;
const CELESTA:     u8 = 8;
const BRASS:       u8 = 61;

// GM drum keys
const CRASH:       u8 = 49;
const LOW_TOM:     u8 = 45;
const SIDE_STICK:  u8 = 37;

const LASER:     &[CueNote] = &[tone(LEAD_SQUARE, 84, 40), tone(LEAD_SQUARE, 79, 40)];
const EXPLOSION: &[CueNote] = &[drum(CRASH, 120), drum(LOW_TOM, 80)];
const MISS:      &[CueNote] = &[tone(FX_SCIFI, 48, 200)];
const HOVER:     &[CueNote] = &[drum(SIDE_STICK, 20)];
const CLICK:     &[CueNote] = &[tone(CELESTA, 88, 60)];
const START:     &[CueNote] = &[tone(BRASS, 60, 120), tone(BRASS, 67, 180)];
const GAME_OVER: &[CueNote] = &[tone(BRASS, 55, 200), tone(BRASS, 48, 400)];

impl SoundCue {
    pub fn notes(self) -> &'static [CueNote] {
        match self {
            SoundCue::Laser     => LASER,
            SoundCue::Explosion => EXPLOSION,
            SoundCue::Miss      => MISS,
            SoundCue::Hover     => HOVER,
            SoundCue::Click     => CLICK,
            SoundCue::Start     => START,
            SoundCue::GameOver  => GAME_OVER,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / null
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn program_change(&mut self, channel: u8, program: u8);
    fn note_on(&mut self,  channel: u8, note: u8, velocity: u8);
    fn note_off(&mut self, channel: u8, note: u8);
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn program_change(&mut self, channel: u8, program: u8) {
        let _ = self.conn.send(&[0xC0 | (channel & 0x0F), program]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        let _ = self.conn.send(&[0x90 | (channel & 0x0F), note, velocity]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        let _ = self.conn.send(&[0x80 | (channel & 0x0F), note, 0]);
    }
}

// ── null backend (used when no MIDI port is available) ────────────────────

struct NullOut;
impl MidiOut for NullOut {
    fn program_change(&mut self, _ch: u8, _p: u8)   {}
    fn note_on(&mut self, _ch: u8, _n: u8, _v: u8)  {}
    fn note_off(&mut self, _ch: u8, _n: u8)          {}
}

/// Open the first MIDI output port, preferring a soft synth.
fn open_midi_output() -> Box<dyn MidiOut> {
    let midi_out = match midir::MidiOutput::new("void_recon") {
        Ok(m)  => m,
        Err(e) => {
            warn!("MIDI init error: {}; sound cues muted", e);
            return Box::new(NullOut);
        }
    };

    let ports = midi_out.ports();
    if ports.is_empty() {
        warn!("no MIDI output ports found; sound cues muted (try `fluidsynth` or `timidity -iA`)");
        return Box::new(NullOut);
    }

    let port_idx = ports.iter()
        .position(|p| {
            midi_out.port_name(p).map(|n| {
                let n = n.to_lowercase();
                n.contains("fluid") || n.contains("timidity") ||
                n.contains("microsoft") || n.contains("synth")
            }).unwrap_or(false)
        })
        .unwrap_or(0);

    let port = &ports[port_idx];
    let name = midi_out.port_name(port).unwrap_or_else(|_| "unknown".to_string());

    match midi_out.connect(port, "void-recon-cues") {
        Ok(conn) => {
            info!(port = %name, "MIDI output connected");
            Box::new(MidirOut { conn })
        }
        Err(e) => {
            warn!(port = %name, "MIDI connect failed: {}; sound cues muted", e);
            Box::new(NullOut)
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SoundPlayer — handle to the cue thread
// ════════════════════════════════════════════════════════════════════════════

enum SoundCommand {
    Play(SoundCue),
    Quit,
}

const DRUM_CHANNEL: u8 = 9;

pub struct SoundPlayer {
    cmd_tx:  Option<Sender<SoundCommand>>,
    handle:  Option<JoinHandle<()>>,
    enabled: bool,
}

impl SoundPlayer {
    /// Spawn the cue thread; a disabled config produces a silent player
    /// that can still be switched on later.
    pub fn spawn(cfg: &SoundConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SoundCommand>();
        let channel  = cfg.channel;
        let velocity = cfg.velocity;
        let handle = thread::spawn(move || cue_thread(cmd_rx, channel, velocity));
        SoundPlayer { cmd_tx: Some(cmd_tx), handle: Some(handle), enabled: cfg.enabled }
    }

    /// A player with no thread at all.
    pub fn silent() -> Self {
        SoundPlayer { cmd_tx: None, handle: None, enabled: false }
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn set_enabled(&mut self, on: bool) {
        self.enabled = on && self.cmd_tx.is_some();
        debug!(enabled = self.enabled, "sound cues");
    }

    pub fn play(&self, cue: SoundCue) {
        if !self.enabled {
            return;
        }
        if let Some(tx) = &self.cmd_tx {
            let _ = tx.send(SoundCommand::Play(cue));
        }
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        if let Some(tx) = self.cmd_tx.take() {
            let _ = tx.send(SoundCommand::Quit);
        }
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

fn cue_thread(cmd_rx: Receiver<SoundCommand>, channel: u8, velocity: u8) {
    let mut midi = open_midi_output();
    let mut current_program = None;

    while let Ok(cmd) = cmd_rx.recv() {
        let mut cue = match cmd {
            SoundCommand::Play(c) => c,
            SoundCommand::Quit    => return,
        };

        // Cues that piled up while notes were sounding collapse to the newest.
        while let Ok(next) = cmd_rx.try_recv() {
            match next {
                SoundCommand::Play(c) => cue = c,
                SoundCommand::Quit    => return,
            }
        }

        for note in cue.notes() {
            let ch = if note.drum { DRUM_CHANNEL } else { channel };
            if !note.drum && current_program != Some(note.program) {
                midi.program_change(ch, note.program);
                current_program = Some(note.program);
            }
            midi.note_on(ch, note.pitch, velocity);
            thread::sleep(Duration::from_millis(note.millis));
            midi.note_off(ch, note.pitch);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SoundCue; 7] = [
        SoundCue::Laser,
        SoundCue::Explosion,
        SoundCue::Miss,
        SoundCue::Hover,
        SoundCue::Click,
        SoundCue::Start,
        SoundCue::GameOver,
    ];

    #[test]
    fn every_cue_is_short_valid_midi() {
        for cue in ALL {
            let notes = cue.notes();
            assert!(!notes.is_empty(), "{cue:?} has no notes");
            let total: u64 = notes.iter().map(|n| n.millis).sum();
            assert!(total <= 600, "{cue:?} lasts {total} ms");
            for n in notes {
                assert!(n.pitch < 128 && n.program < 128);
            }
        }
    }

    #[test]
    fn gameplay_cues_stay_snappy() {
        for cue in [SoundCue::Laser, SoundCue::Hover, SoundCue::Click] {
            let total: u64 = cue.notes().iter().map(|n| n.millis).sum();
            assert!(total <= 100);
        }
    }

    #[test]
    fn silent_player_cannot_be_enabled() {
        let mut p = SoundPlayer::silent();
        p.set_enabled(true);
        assert!(!p.is_enabled());
        p.play(SoundCue::Laser);
    }
}
