// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale construction engine.
//!
//! Every named scale is derived from a handful of primitives: the diatonic
//! key generator, named intervals, rotation with octave bumps, and
//! single-degree alteration. Scales are built fresh per call and are never
//! cached, unlike key-note sets.
//!
//! The engine also owns the chord-symbol to scale-name lookup used for
//! improvisation hints, extendable at runtime from a tab-separated file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chord::{self, Chord};
use crate::interval;
use crate::key::KeyCache;
use crate::pitch::Pitch;

/// Every scale the engine can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleKind {
    Diatonic,
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
    NaturalMinor,
    HarmonicMinor,
    MelodicMinor,
    MelodicMinorII,
    MelodicMinorIII,
    MelodicMinorIV,
    MelodicMinorV,
    MelodicMinorVI,
    MelodicMinorVII,
    LydianDiminished,
    LydianDominant,
    PentatonicMinor,
    PentatonicMinorFlatII,
    PentatonicMinorII,
    PentatonicMinorFlatIII,
    PentatonicMinorIII,
    PentatonicMinorIV,
    PentatonicMinorFlatV,
    PentatonicMinorV,
    PentatonicMinorFlatVI,
    PentatonicMinorVI,
    PentatonicMinorFlatVII,
    PentatonicMinorVII,
    PentatonicMajor,
    PentatonicDominant,
    PentatonicDominantFlatII,
    PentatonicDominantII,
    PentatonicDominantFlatIII,
    PentatonicDominantIII,
    PentatonicDominantIV,
    PentatonicDominantFlatV,
    PentatonicDominantV,
    PentatonicDominantFlatVI,
    PentatonicDominantVI,
    PentatonicDominantFlatVII,
    PentatonicDominantVII,
    Blues,
    Diminished,
    Augmented,
    BebopDominant,
    BebopMinor,
    Flamenco,
    InSen,
    Hirajoshi,
    Hindu,
    Chromatic,
    WholeNote,
}

impl ScaleKind {
    pub const ALL: [ScaleKind; 55] = [
        ScaleKind::Diatonic,
        ScaleKind::Ionian,
        ScaleKind::Dorian,
        ScaleKind::Phrygian,
        ScaleKind::Lydian,
        ScaleKind::Mixolydian,
        ScaleKind::Aeolian,
        ScaleKind::Locrian,
        ScaleKind::NaturalMinor,
        ScaleKind::HarmonicMinor,
        ScaleKind::MelodicMinor,
        ScaleKind::MelodicMinorII,
        ScaleKind::MelodicMinorIII,
        ScaleKind::MelodicMinorIV,
        ScaleKind::MelodicMinorV,
        ScaleKind::MelodicMinorVI,
        ScaleKind::MelodicMinorVII,
        ScaleKind::LydianDiminished,
        ScaleKind::LydianDominant,
        ScaleKind::PentatonicMinor,
        ScaleKind::PentatonicMinorFlatII,
        ScaleKind::PentatonicMinorII,
        ScaleKind::PentatonicMinorFlatIII,
        ScaleKind::PentatonicMinorIII,
        ScaleKind::PentatonicMinorIV,
        ScaleKind::PentatonicMinorFlatV,
        ScaleKind::PentatonicMinorV,
        ScaleKind::PentatonicMinorFlatVI,
        ScaleKind::PentatonicMinorVI,
        ScaleKind::PentatonicMinorFlatVII,
        ScaleKind::PentatonicMinorVII,
        ScaleKind::PentatonicMajor,
        ScaleKind::PentatonicDominant,
        ScaleKind::PentatonicDominantFlatII,
        ScaleKind::PentatonicDominantII,
        ScaleKind::PentatonicDominantFlatIII,
        ScaleKind::PentatonicDominantIII,
        ScaleKind::PentatonicDominantIV,
        ScaleKind::PentatonicDominantFlatV,
        ScaleKind::PentatonicDominantV,
        ScaleKind::PentatonicDominantFlatVI,
        ScaleKind::PentatonicDominantVI,
        ScaleKind::PentatonicDominantFlatVII,
        ScaleKind::PentatonicDominantVII,
        ScaleKind::Blues,
        ScaleKind::Diminished,
        ScaleKind::Augmented,
        ScaleKind::BebopDominant,
        ScaleKind::BebopMinor,
        ScaleKind::Flamenco,
        ScaleKind::InSen,
        ScaleKind::Hirajoshi,
        ScaleKind::Hindu,
        ScaleKind::Chromatic,
        ScaleKind::WholeNote,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScaleKind::Diatonic => "diatonic",
            ScaleKind::Ionian => "ionian",
            ScaleKind::Dorian => "dorian",
            ScaleKind::Phrygian => "phrygian",
            ScaleKind::Lydian => "lydian",
            ScaleKind::Mixolydian => "mixolydian",
            ScaleKind::Aeolian => "aeolian",
            ScaleKind::Locrian => "locrian",
            ScaleKind::NaturalMinor => "naturalMinor",
            ScaleKind::HarmonicMinor => "harmonicMinor",
            ScaleKind::MelodicMinor => "melodicMinor",
            ScaleKind::MelodicMinorII => "melodicMinorII",
            ScaleKind::MelodicMinorIII => "melodicMinorIII",
            ScaleKind::MelodicMinorIV => "melodicMinorIV",
            ScaleKind::MelodicMinorV => "melodicMinorV",
            ScaleKind::MelodicMinorVI => "melodicMinorVI",
            ScaleKind::MelodicMinorVII => "melodicMinorVII",
            ScaleKind::LydianDiminished => "lydianDiminished",
            ScaleKind::LydianDominant => "lydianDominant",
            ScaleKind::PentatonicMinor => "pentatonicMinor",
            ScaleKind::PentatonicMinorFlatII => "pentatonicMinorbII",
            ScaleKind::PentatonicMinorII => "pentatonicMinorII",
            ScaleKind::PentatonicMinorFlatIII => "pentatonicMinorbIII",
            ScaleKind::PentatonicMinorIII => "pentatonicMinorIII",
            ScaleKind::PentatonicMinorIV => "pentatonicMinorIV",
            ScaleKind::PentatonicMinorFlatV => "pentatonicMinorbV",
            ScaleKind::PentatonicMinorV => "pentatonicMinorV",
            ScaleKind::PentatonicMinorFlatVI => "pentatonicMinorbVI",
            ScaleKind::PentatonicMinorVI => "pentatonicMinorVI",
            ScaleKind::PentatonicMinorFlatVII => "pentatonicMinorbVII",
            ScaleKind::PentatonicMinorVII => "pentatonicMinorVII",
            ScaleKind::PentatonicMajor => "pentatonicMajor",
            ScaleKind::PentatonicDominant => "pentatonicDominant",
            ScaleKind::PentatonicDominantFlatII => "pentatonicDominantbII",
            ScaleKind::PentatonicDominantII => "pentatonicDominantII",
            ScaleKind::PentatonicDominantFlatIII => "pentatonicDominantbIII",
            ScaleKind::PentatonicDominantIII => "pentatonicDominantIII",
            ScaleKind::PentatonicDominantIV => "pentatonicDominantIV",
            ScaleKind::PentatonicDominantFlatV => "pentatonicDominantbV",
            ScaleKind::PentatonicDominantV => "pentatonicDominantV",
            ScaleKind::PentatonicDominantFlatVI => "pentatonicDominantbVI",
            ScaleKind::PentatonicDominantVI => "pentatonicDominantVI",
            ScaleKind::PentatonicDominantFlatVII => "pentatonicDominantbVII",
            ScaleKind::PentatonicDominantVII => "pentatonicDominantVII",
            ScaleKind::Blues => "blues",
            ScaleKind::Diminished => "diminished",
            ScaleKind::Augmented => "augmented",
            ScaleKind::BebopDominant => "bebopDominant",
            ScaleKind::BebopMinor => "bebopMinor",
            ScaleKind::Flamenco => "flamenco",
            ScaleKind::InSen => "inSen",
            ScaleKind::Hirajoshi => "hirajoshi",
            ScaleKind::Hindu => "hindu",
            ScaleKind::Chromatic => "chromatic",
            ScaleKind::WholeNote => "wholenote",
        }
    }

    /// Reverse of [`ScaleKind::name`], plus the historical alias
    /// `halfDiminished` which resolves to the locrian builder.
    pub fn from_name(name: &str) -> Option<ScaleKind> {
        if name == "halfDiminished" {
            return Some(ScaleKind::Locrian);
        }
        ScaleKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

/// A built scale: the kind it was requested as, plus its spelled notes
/// ascending from the tonic.
#[derive(Debug, Clone)]
pub struct Scale {
    pub kind: ScaleKind,
    pub notes: Vec<Pitch>,
}

impl Scale {
    pub fn is_valid(&self) -> bool {
        self.notes.len() > 1
    }

    pub fn root(&self) -> Option<&Pitch> {
        self.notes.first()
    }

    /// e.g. `"A dorian"`
    pub fn full_name(&self) -> String {
        match self.root() {
            Some(root) => format!("{} {}", root.diatonic_name(), self.kind.name()),
            None => self.kind.name().to_string(),
        }
    }

    /// Degree access with octave wrap. Degree 0 is the tonic; degrees past
    /// the end continue in the next octave, negative degrees reach below.
    pub fn note(&self, degree: i32) -> Option<Pitch> {
        if self.notes.is_empty() {
            return None;
        }
        let len = self.notes.len() as i32;
        let octave_shift = degree.div_euclid(len);
        let idx = degree.rem_euclid(len) as usize;
        let mut note = self.notes[idx];
        note.change_octave(octave_shift);
        Some(note)
    }

    /// Degree of a pitch by pitch class, ignoring octave
    pub fn degree_of(&self, pitch: &Pitch) -> Option<usize> {
        let class = pitch.semitone();
        let found = self.notes.iter().position(|n| n.semitone() == class);
        if found.is_none() {
            warn!(pitch = %pitch, scale = %self.full_name(), "note not in scale");
        }
        found
    }

    /// The scale's third, major or minor, whichever occurs first
    pub fn third(&self) -> Option<Pitch> {
        self.note_at_distance(&[3, 4])
    }

    /// The scale's seventh, major or minor, whichever occurs first
    pub fn seventh(&self) -> Option<Pitch> {
        self.note_at_distance(&[10, 11])
    }

    fn note_at_distance(&self, semitones: &[i32]) -> Option<Pitch> {
        let root = self.root()?;
        self.notes
            .iter()
            .find(|n| semitones.contains(&root.measure(n)))
            .copied()
    }

    /// The scale member at or nearest above (or below, when
    /// `prefer_higher` is false) the given pitch.
    pub fn closest_note(&self, pitch: &Pitch, prefer_higher: bool) -> Pitch {
        if !self.is_valid() {
            return *pitch;
        }
        let target = pitch.absolute();
        let mut stack = self.clone();
        stack.set_octave(pitch.absolute_octave());
        while stack.notes[0].absolute() > target {
            stack.change_octave(-1);
        }
        let mut degree = 0;
        loop {
            // note() only fails on an empty scale, checked above
            let Some(candidate) = stack.note(degree) else {
                return *pitch;
            };
            if candidate.absolute() == target {
                return candidate;
            }
            if candidate.absolute() > target {
                if prefer_higher {
                    return candidate;
                }
                return stack.note(degree - 1).unwrap_or(candidate);
            }
            degree += 1;
        }
    }

    /// The octave placement of `degree` nearest to a reference pitch,
    /// e.g. the third closest to middle C.
    pub fn degree_closest_to(&self, degree: i32, reference: &Pitch) -> Option<Pitch> {
        let mut search = self.note(degree)?;
        search.octave = reference.absolute_octave();
        let above = search.octave_up();
        let below = search.octave_down();

        let target = reference.absolute();
        let d_here = (target - search.absolute()).abs();
        let d_above = (target - above.absolute()).abs();
        let d_below = (target - below.absolute()).abs();

        if d_here <= d_above && d_here <= d_below {
            Some(search)
        } else if d_above <= d_here && d_above <= d_below {
            Some(above)
        } else {
            Some(below)
        }
    }

    pub fn set_octave(&mut self, octave: i32) {
        set_octave(&mut self.notes, octave);
    }

    pub fn change_octave(&mut self, diff: i32) {
        for note in &mut self.notes {
            note.change_octave(diff);
        }
    }

    pub fn octave_up(&mut self) {
        self.change_octave(1);
    }

    pub fn octave_down(&mut self) {
        self.change_octave(-1);
    }
}

/// Rotate a scale so degree `amount` leads, bumping the rotated-out notes
/// up an octave. The shared primitive behind all the diatonic modes.
fn offset(notes: &[Pitch], amount: usize) -> Vec<Pitch> {
    if notes.len() <= amount {
        warn!(amount, len = notes.len(), "offset beyond scale length");
        return notes.to_vec();
    }
    let mut sorted = notes.to_vec();
    sorted.sort_by_key(|n| n.absolute());
    let mut rotated: Vec<Pitch> = sorted[amount..].to_vec();
    for note in &sorted[..amount] {
        rotated.push(note.octave_up());
    }
    rotated
}

/// Shift a note run so its first note sounds in `octave`
fn set_octave(notes: &mut [Pitch], octave: i32) {
    if let Some(first) = notes.first() {
        let diff = octave - first.absolute_octave();
        for note in notes.iter_mut() {
            note.change_octave(diff);
        }
    }
}

/// The scale engine: shares a key cache with its callers and owns the
/// mutable chord-scale lookup.
#[derive(Debug)]
pub struct ScaleEngine {
    keys: Arc<KeyCache>,
    chord_scales: Mutex<HashMap<String, String>>,
}

impl ScaleEngine {
    pub fn new(keys: Arc<KeyCache>) -> Self {
        Self {
            keys,
            chord_scales: Mutex::new(default_chord_scales()),
        }
    }

    pub fn keys(&self) -> &KeyCache {
        &self.keys
    }

    /// Build a scale of the given kind on a tonic
    pub fn scale(&self, kind: ScaleKind, tonic: &Pitch) -> Scale {
        Scale {
            kind,
            notes: self.build_notes(kind, tonic),
        }
    }

    /// Build by table name, e.g. `"melodicMinorIV"` or the alias
    /// `"halfDiminished"`. Unknown names log and return `None`.
    pub fn scale_named(&self, name: &str, tonic: &Pitch) -> Option<Scale> {
        match ScaleKind::from_name(name) {
            Some(kind) => Some(self.scale(kind, tonic)),
            None => {
                warn!(name, "unknown scale name");
                None
            }
        }
    }

    /// Candidate scale names for a chord symbol suffix, most obvious first
    pub fn scales_for_symbol(&self, chord_symbol: &str) -> Vec<String> {
        let table = self.chord_scales.lock().unwrap_or_else(|e| e.into_inner());
        match table.get(chord_symbol) {
            Some(value) if !value.is_empty() => {
                value.split(',').map(str::to_string).collect()
            }
            _ => {
                warn!(chord_symbol, "no scales listed for chord");
                Vec::new()
            }
        }
    }

    /// Candidate scales for a chord, rooted on the chord root and
    /// normalized to octave 3.
    pub fn scales_for_chord(&self, chord: &Chord) -> Vec<Scale> {
        let Some(root) = chord.root() else {
            return Vec::new();
        };
        self.scales_for_symbol(&chord.name)
            .iter()
            .filter_map(|name| self.scale_named(name, root))
            .map(|mut s| {
                s.set_octave(3);
                s
            })
            .collect()
    }

    /// Load chord-scale overrides from a tab-separated file: each row is
    /// `chordSymbol<TAB>comma,separated,scaleNames`. Rows whose symbol the
    /// chord parser rejects are skipped. Returns the number of rows applied.
    pub fn load_chord_scales(&self, path: &Path) -> Result<usize> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read chord scale file {}", path.display()))?;

        let mut applied = 0;
        let mut table = self.chord_scales.lock().unwrap_or_else(|e| e.into_inner());
        for line in data.lines() {
            let mut parts = line.splitn(2, '\t');
            let (Some(symbol), Some(scales)) = (parts.next(), parts.next()) else {
                continue;
            };
            if !chord::is_valid_symbol(symbol, &self.keys) {
                continue;
            }
            let scales: String = scales.chars().filter(|c| !c.is_whitespace()).collect();
            let (_, suffix) = match chord::parse_symbol(symbol) {
                Some(parsed) => parsed,
                None => continue,
            };
            debug!(symbol = %suffix, scales = %scales, "chord scale override");
            table.insert(suffix, scales);
            applied += 1;
        }
        Ok(applied)
    }

    fn build_notes(&self, kind: ScaleKind, tonic: &Pitch) -> Vec<Pitch> {
        let keys = &*self.keys;
        match kind {
            ScaleKind::Diatonic | ScaleKind::Ionian => ionian(keys, tonic),
            ScaleKind::Dorian => {
                mode(keys, tonic, &interval::minor_seventh(keys, tonic), 1)
            }
            ScaleKind::Phrygian => {
                mode(keys, tonic, &interval::minor_sixth(keys, tonic), 2)
            }
            ScaleKind::Lydian => mode(keys, tonic, &interval::perfect_fifth(keys, tonic), 3),
            ScaleKind::Mixolydian => {
                mode(keys, tonic, &interval::perfect_fourth(keys, tonic), 4)
            }
            ScaleKind::Aeolian => mode(keys, tonic, &interval::minor_third(keys, tonic), 5),
            ScaleKind::Locrian => mode(keys, tonic, &interval::minor_second(keys, tonic), 6),
            ScaleKind::NaturalMinor => {
                mode(keys, tonic, &interval::minor_third(keys, tonic), 5)
            }
            ScaleKind::HarmonicMinor => {
                let mut notes = self.build_notes(ScaleKind::NaturalMinor, tonic);
                notes[6].augment(1);
                notes
            }
            ScaleKind::MelodicMinor => {
                let mut notes = self.build_notes(ScaleKind::HarmonicMinor, tonic);
                notes[5].augment(1);
                set_octave(&mut notes, tonic.absolute_octave());
                notes
            }
            ScaleKind::MelodicMinorII => self.altered(ScaleKind::Phrygian, tonic, 5, 1),
            ScaleKind::MelodicMinorIII => self.altered(ScaleKind::Lydian, tonic, 4, 1),
            ScaleKind::MelodicMinorIV | ScaleKind::LydianDominant => {
                self.altered(ScaleKind::Lydian, tonic, 6, -1)
            }
            ScaleKind::MelodicMinorV => self.altered(ScaleKind::Mixolydian, tonic, 5, -1),
            ScaleKind::MelodicMinorVI => self.altered(ScaleKind::Locrian, tonic, 1, 1),
            ScaleKind::MelodicMinorVII => self.altered(ScaleKind::Locrian, tonic, 3, -1),
            ScaleKind::LydianDiminished => {
                let mut notes = ionian(keys, tonic);
                notes[2].diminish(1);
                notes[3].augment(1);
                set_octave(&mut notes, tonic.absolute_octave());
                notes
            }
            ScaleKind::Hindu => {
                let mut notes = ionian(keys, tonic);
                notes[5].diminish(1);
                notes
            }
            ScaleKind::PentatonicMinor => pentatonic_minor(keys, tonic),
            ScaleKind::PentatonicMinorFlatII => pentatonic_minor(keys, &tonic.transposed(1)),
            ScaleKind::PentatonicMinorII => pentatonic_minor(keys, &tonic.transposed(2)),
            ScaleKind::PentatonicMinorFlatIII => pentatonic_minor(keys, &tonic.transposed(3)),
            ScaleKind::PentatonicMinorIII => pentatonic_minor(keys, &tonic.transposed(4)),
            ScaleKind::PentatonicMinorIV => pentatonic_minor(keys, &tonic.transposed(5)),
            ScaleKind::PentatonicMinorFlatV => pentatonic_minor(keys, &tonic.transposed(6)),
            ScaleKind::PentatonicMinorV => pentatonic_minor(keys, &tonic.transposed(7)),
            ScaleKind::PentatonicMinorFlatVI => pentatonic_minor(keys, &tonic.transposed(8)),
            ScaleKind::PentatonicMinorVI => pentatonic_minor(keys, &tonic.transposed(9)),
            ScaleKind::PentatonicMinorFlatVII => {
                pentatonic_minor(keys, &tonic.transposed(10))
            }
            ScaleKind::PentatonicMinorVII => pentatonic_minor(keys, &tonic.transposed(11)),
            ScaleKind::PentatonicMajor => pentatonic_major(keys, tonic),
            ScaleKind::PentatonicDominant => pentatonic_dominant(keys, tonic),
            ScaleKind::PentatonicDominantFlatII => {
                pentatonic_dominant(keys, &tonic.transposed(1))
            }
            ScaleKind::PentatonicDominantII => pentatonic_dominant(keys, &tonic.transposed(2)),
            ScaleKind::PentatonicDominantFlatIII => {
                pentatonic_dominant(keys, &tonic.transposed(3))
            }
            ScaleKind::PentatonicDominantIII => {
                pentatonic_dominant(keys, &tonic.transposed(4))
            }
            ScaleKind::PentatonicDominantIV => pentatonic_dominant(keys, &tonic.transposed(5)),
            ScaleKind::PentatonicDominantFlatV => {
                pentatonic_dominant(keys, &tonic.transposed(6))
            }
            ScaleKind::PentatonicDominantV => pentatonic_dominant(keys, &tonic.transposed(7)),
            ScaleKind::PentatonicDominantFlatVI => {
                pentatonic_dominant(keys, &tonic.transposed(8))
            }
            ScaleKind::PentatonicDominantVI => {
                pentatonic_dominant(keys, &tonic.transposed(9))
            }
            ScaleKind::PentatonicDominantFlatVII => {
                pentatonic_dominant(keys, &tonic.transposed(10))
            }
            ScaleKind::PentatonicDominantVII => {
                pentatonic_dominant(keys, &tonic.transposed(11))
            }
            ScaleKind::Blues => {
                let mut notes = pentatonic_minor(keys, tonic);
                notes.insert(3, interval::minor_fifth(keys, tonic));
                notes
            }
            ScaleKind::Diminished => diminished(keys, tonic),
            ScaleKind::Augmented => vec![
                *tonic,
                interval::minor_third(keys, tonic),
                interval::major_third(keys, tonic),
                interval::perfect_fifth(keys, tonic),
                interval::minor_sixth(keys, tonic),
                interval::major_seventh(keys, tonic),
            ],
            ScaleKind::BebopDominant => {
                let mut notes = self.build_notes(ScaleKind::Mixolydian, tonic);
                let mut seventh = tonic.octave_up();
                seventh.diminish(1);
                notes.push(seventh);
                notes
            }
            ScaleKind::BebopMinor => {
                let mut notes = self.build_notes(ScaleKind::Dorian, tonic);
                let major_third = notes[2].augmented();
                notes.insert(3, major_third);
                notes
            }
            ScaleKind::Flamenco => {
                let mut notes = self.build_notes(ScaleKind::Phrygian, tonic);
                let major_third = notes[2].augmented();
                notes.insert(3, major_third);
                notes
            }
            ScaleKind::InSen => {
                let mut notes = pentatonic_minor(keys, tonic);
                notes[1] = interval::minor_second(keys, tonic);
                notes
            }
            ScaleKind::Hirajoshi => {
                let mut notes = pentatonic_minor(keys, tonic);
                notes[1] = interval::minor_second(keys, tonic);
                notes[4] = interval::minor_sixth(keys, tonic);
                notes
            }
            ScaleKind::Chromatic => {
                let mut notes = vec![*tonic];
                for i in 1..12 {
                    notes.push(tonic.transposed(i));
                }
                notes
            }
            ScaleKind::WholeNote => {
                let mut notes = vec![*tonic];
                let mut current = *tonic;
                for _ in 0..5 {
                    current = interval::major_second(keys, &current);
                    notes.push(current);
                }
                notes
            }
        }
    }

    fn altered(&self, base: ScaleKind, tonic: &Pitch, degree: usize, by: i32) -> Vec<Pitch> {
        let mut notes = self.build_notes(base, tonic);
        if by > 0 {
            notes[degree].augment(by);
        } else {
            notes[degree].diminish(-by);
        }
        set_octave(&mut notes, tonic.absolute_octave());
        notes
    }
}

fn ionian(keys: &KeyCache, tonic: &Pitch) -> Vec<Pitch> {
    let mut notes = keys.notes(tonic);
    set_octave(&mut notes, tonic.absolute_octave());
    notes
}

/// Diatonic mode: the ionian scale on a shifted root, rotated so the
/// requested tonic leads, forced back to the tonic's octave.
fn mode(keys: &KeyCache, tonic: &Pitch, shifted_root: &Pitch, rotation: usize) -> Vec<Pitch> {
    let base = ionian(keys, shifted_root);
    let mut notes = offset(&base, rotation);
    set_octave(&mut notes, tonic.absolute_octave());
    notes
}

fn pentatonic_minor(keys: &KeyCache, tonic: &Pitch) -> Vec<Pitch> {
    let mut notes = vec![
        *tonic,
        interval::minor_third(keys, tonic),
        interval::perfect_fourth(keys, tonic),
        interval::perfect_fifth(keys, tonic),
        interval::minor_seventh(keys, tonic),
    ];
    set_octave(&mut notes, tonic.absolute_octave());
    notes
}

fn pentatonic_major(keys: &KeyCache, tonic: &Pitch) -> Vec<Pitch> {
    let mut notes = vec![
        *tonic,
        interval::major_second(keys, tonic),
        interval::major_third(keys, tonic),
        interval::perfect_fifth(keys, tonic),
        interval::major_sixth(keys, tonic),
    ];
    set_octave(&mut notes, tonic.absolute_octave());
    notes
}

fn pentatonic_dominant(keys: &KeyCache, tonic: &Pitch) -> Vec<Pitch> {
    let mut notes = vec![
        *tonic,
        interval::major_second(keys, tonic),
        interval::major_third(keys, tonic),
        interval::perfect_fifth(keys, tonic),
        interval::minor_seventh(keys, tonic),
    ];
    set_octave(&mut notes, tonic.absolute_octave());
    notes
}

/// Whole/half-step octatonic with the last two degrees patched to the
/// major sixth and major seventh, per the classic jazz spelling.
fn diminished(keys: &KeyCache, tonic: &Pitch) -> Vec<Pitch> {
    let mut notes = vec![*tonic];
    let mut current = *tonic;
    for _ in 0..3 {
        let whole = interval::major_second(keys, &current);
        let half = interval::minor_third(keys, &current);
        notes.push(whole);
        notes.push(half);
        current = half;
    }
    notes.push(interval::major_seventh(keys, tonic));
    let patched = notes.len() - 2;
    notes[patched] = interval::major_sixth(keys, tonic);
    notes
}

fn default_chord_scales() -> HashMap<String, String> {
    let entries: &[(&str, &str)] = &[
        // triads
        ("m", "dorian,aeolian"),
        ("M", "ionian"),
        ("", "ionian"),
        ("dim", "diminished"),
        ("aug", "augmented,pentatonicMinorbIII"),
        ("+", "augmented,pentatonicMinorbIII"),
        // major sevenths
        ("M7+5", "melodicMinorIII,augmented,hindu"),
        ("M7+", "melodicMinorIII,augmented,hindu"),
        // minor sevenths
        ("m7+", "aeolian,dorian,phrygian,pentatonicMinorbIII"),
        ("m7+5", "aeolian,dorian,phrygian,pentatonicMinorbIII"),
        // dominants
        ("7+", "melodicMinorVII,melodicMinorV,pentatonicMinorbIII,wholenote"),
        ("7+5", "melodicMinorVII,melodicMinorV,pentatonicMinorbIII,wholenote"),
        ("7#5", "melodicMinorVII,melodicMinorV,pentatonicMinorbIII,wholenote"),
        // suspended
        ("sus47", "pentatonicMinorV,dorian,aeolian,phrygian,mixolydian"),
        (
            "sus4",
            "pentatonicMinorV,harmonicMinor,melodicMinor,pentatonicMinor,blues,aeolian,dorian,phrygian,mixolydian",
        ),
        ("sus2", "harmonicMinor,melodicMinor,pentatonicMinor,blues"),
        (
            "sus",
            "ionian,harmonicMinor,melodicMinor,pentatonicMinor,blues,aeolian,dorian,phrygian,mixolydian",
        ),
        ("11", "mixolydian"),
        ("sus4b9", "melodicMinorII"),
        ("susb9", "melodicMinorII"),
        ("sus9", "pentatonicMinorV,dorian,aeolian,phrygian,mixolydian"),
        ("sus49", "pentatonicMinorV,dorian,aeolian,phrygian,mixolydian"),
        // sevenths
        (
            "m7",
            "dorian,aeolian,pentatonicMinor,pentatonicMinorII,pentatonicMinorV",
        ),
        ("M7", "ionian,lydian,pentatonicMinorVII,pentatonicDominantII"),
        (
            "dom7",
            "mixolydian,pentatonicMajor,pentatonicDominant,pentatonicDominantII,pentatonicMinorV",
        ),
        (
            "7",
            "mixolydian,pentatonicMajor,pentatonicDominant,pentatonicDominantII,pentatonicMinorV",
        ),
        ("m7b5", "locrian,melodicMinorVI,pentatonicDominantbVI"),
        ("dim7", "diminished"),
        ("mM7", "melodicMinor,harmonicMinor"),
        // sixths
        ("m6", "melodicMinor"),
        ("M6", "ionian,lydian"),
        ("6", "ionian,lydian"),
        ("6/7", ""),
        ("67", ""),
        ("6/9", "pentatonicMajor"),
        ("69", "pentatonicMajor"),
        // ninths
        ("9", "mixolydian,bebopDominant"),
        ("7b9", "flamenco"),
        ("7#9", "halfDiminished"),
        ("M9", "lydian"),
        ("m9", "aeolian,dorian"),
        ("9#11", "lydian"),
        ("m6/9", "dorian"),
        ("m6/9/11", "dorian"),
        // elevenths
        ("7#11", "melodicMinorIV"),
        (
            "m11",
            "dorian,pentatonicMinorV,pentatonicMinorIV,pentatonicMinorIII,pentatonicMinor,blues",
        ),
        ("M7#11", "lydian"),
        // thirteenths
        ("M13", ""),
        ("m13", "melodicMinor,bebopMinor"),
        (
            "13",
            "mixolydian,melodicMinorIV,bebopDominant,pentatonicMajor,blues",
        ),
        // altered dominants
        ("7b5", "melodicMinorIV"),
        ("7+#9", "melodicMinorVII"),
        ("7+b9", "melodicMinorVII"),
        // special
        ("hendrix", "blues,pentatonicMinorbIII"),
        ("7b12", "blues"),
        (
            "5",
            "pentatonicMinor,blues,aeolian,pentatonicMajor,pentatonicMinorIII,pentatonicMinorIV,pentatonicMinorV",
        ),
        ("7b9b5", "melodicMinorVII,pentatonicMinorbIII"),
        ("m7b9", "phrygian"),
        ("m11b5", "melodicMinorVI"),
        ("7#9b13", "melodicMinorVII,pentatonicMinorbIII"),
    ];
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
