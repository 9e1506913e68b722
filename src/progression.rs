// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Roman-numeral progression analysis.
//!
//! Functions such as `bVIIM7` or `V7/II` convert to concrete chords in a
//! key, concrete chords convert back to functions, and the substitution
//! families (harmonic, relative minor/major, diminished cycles) rewrite
//! functions into their common replacements. All spellings run through the
//! shared key cache so a `bIII` in F comes out as Ab, not G#.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::chord::{self, Chord};
use crate::interval::{self, Quality};
use crate::key::KeyCache;
use crate::pitch::Pitch;

/// A scale-degree numeral
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Numeral {
    I,
    II,
    III,
    IV,
    V,
    VI,
    VII,
}

impl Numeral {
    pub const ALL: [Numeral; 7] = [
        Numeral::I,
        Numeral::II,
        Numeral::III,
        Numeral::IV,
        Numeral::V,
        Numeral::VI,
        Numeral::VII,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Semitones above the tonic in the major scale
    pub fn semitones(self) -> i32 {
        [0, 2, 4, 5, 7, 9, 11][self.index()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Numeral::I => "I",
            Numeral::II => "II",
            Numeral::III => "III",
            Numeral::IV => "IV",
            Numeral::V => "V",
            Numeral::VI => "VI",
            Numeral::VII => "VII",
        }
    }

    pub fn from_name(name: &str) -> Option<Numeral> {
        Numeral::ALL.iter().copied().find(|n| n.as_str() == name)
    }

    /// The long functional name, e.g. dominant for V
    pub fn function_name(self) -> &'static str {
        match self {
            Numeral::I => "tonic",
            Numeral::II => "supertonic",
            Numeral::III => "mediant",
            Numeral::IV => "subdominant",
            Numeral::V => "dominant",
            Numeral::VI => "submediant",
            Numeral::VII => "leadingtone",
        }
    }

    /// The numeral `steps` scale degrees up, wrapping past VII
    pub fn step(self, steps: usize) -> Numeral {
        Numeral::ALL[(self.index() + steps) % 7]
    }
}

/// A parsed roman-numeral token: accidentals, numeral, quality suffix.
///
/// `roman` is almost always a plain numeral; the one synthetic value is
/// `bVII` for the subtonic, which `bVII` and the equivalent `#VI` both
/// normalize to, with their accidental count folded away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordFunction {
    pub roman: String,
    pub numeral: Option<Numeral>,
    pub accidentals: i32,
    pub cleaned_accidentals: String,
    pub suffix: String,
}

impl ChordFunction {
    /// Parse a token such as `"bIM7"` or `"VIIdim7"`. Case of the numeral
    /// is forgiven; tokens without a numeral yield `None`.
    pub fn parse(token: &str) -> Option<ChordFunction> {
        let token: String = token.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = token.as_bytes();

        let mut i = 0;
        let mut accidentals: i32 = 0;
        while i < bytes.len() && (bytes[i] == b'#' || bytes[i] == b'b') {
            if bytes[i] == b'#' {
                accidentals += 1;
            } else {
                accidentals -= 1;
            }
            i += 1;
        }

        let roman_start = i;
        while i < bytes.len() && matches!(bytes[i], b'i' | b'I' | b'v' | b'V') {
            i += 1;
        }
        if i == roman_start {
            return None;
        }

        let mut roman = token[roman_start..i].to_uppercase();
        let suffix = token[i..].to_string();
        let mut cleaned = clean_accidentals(accidentals);

        // bVII and #VI both name the subtonic
        if (roman == "VII" && cleaned == "b") || (roman == "VI" && cleaned == "#") {
            roman = "bVII".to_string();
            accidentals = 0;
            cleaned = String::new();
        }

        Some(ChordFunction {
            numeral: Numeral::from_name(&roman),
            roman,
            accidentals,
            cleaned_accidentals: cleaned,
            suffix,
        })
    }

    pub fn symbol(&self) -> String {
        format!("{}{}{}", self.cleaned_accidentals, self.roman, self.suffix)
    }
}

/// Collapse an accidental count into its printable marks. Counts beyond a
/// sixth fold to the enharmonically closer direction: seven sharps becomes
/// one flat.
pub fn clean_accidentals(count: i32) -> String {
    let mut count = count;
    if count > 6 {
        count = -(count % 6);
    } else if count < -6 {
        count %= 6;
    }
    if count >= 0 {
        "#".repeat(count as usize)
    } else {
        "b".repeat(-count as usize)
    }
}

/// Accidentals needed on `to` so the distance from `from` up to it equals
/// `semitones`. In C major, I up to VI is already nine semitones, so
/// `interval_diff(I, VI, 9)` is zero; stretching it to ten would need one
/// sharp.
pub fn interval_diff(from: Numeral, to: Numeral, semitones: i32) -> i32 {
    let low = from.semitones();
    let mut high = to.semitones();
    if high < low {
        high += 12;
    }
    let mut accidentals = 0;
    while high - low > semitones {
        accidentals -= 1;
        high -= 1;
    }
    while high - low < semitones {
        accidentals += 1;
        high += 1;
    }
    accidentals
}

/// Analyzer for chord progressions in a key. Shares the key cache with
/// the rest of the engine.
#[derive(Debug)]
pub struct ProgressionAnalyzer {
    keys: Arc<KeyCache>,
}

impl ProgressionAnalyzer {
    pub fn new(keys: Arc<KeyCache>) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &KeyCache {
        &self.keys
    }

    /// The diatonic triad or seventh chord on a scale degree
    fn degree_chord(&self, key: &Pitch, numeral: Numeral, seventh: bool) -> Chord {
        let key_notes = self.keys.notes(key);
        let count = if seventh { 4 } else { 3 };
        let notes: Vec<Pitch> = (0..count)
            .map(|k| {
                let i = numeral.index() + 2 * k;
                let mut note = key_notes[i % 7];
                note.change_octave((i / 7) as i32);
                note
            })
            .collect();
        chord_from_notes(notes)
    }

    /// The borrowed major chord on the flattened seventh degree
    fn subtonic_chord(&self, key: &Pitch, seventh: bool) -> Chord {
        let root = self.keys.notes(key)[6].diminished();
        let mut notes = vec![
            root,
            interval::major_third(&self.keys, &root),
            interval::perfect_fifth(&self.keys, &root),
        ];
        if seventh {
            notes.push(interval::minor_seventh(&self.keys, &root));
        }
        chord_from_notes(notes)
    }

    /// Realize a parsed function as a chord in a key. Accidentals on the
    /// numeral transpose the whole key first, so `bII` in C is a chord
    /// in Db, not a Db-rooted chord spelled from C.
    pub fn chord_for_function(&self, function: &ChordFunction, key: &Pitch) -> Option<Chord> {
        let key = if function.accidentals != 0 {
            key.transposed(function.accidentals)
        } else {
            *key
        };

        if function.roman == "bVII" {
            return match function.suffix.as_str() {
                "" => Some(self.subtonic_chord(&key, false)),
                "7" => Some(self.subtonic_chord(&key, true)),
                suffix => {
                    let root = self.keys.notes(&key)[6].diminished();
                    chord::from_shorthand(suffix, &root, &self.keys)
                }
            };
        }

        let Some(numeral) = function.numeral else {
            warn!(roman = %function.roman, "unknown numeral");
            return None;
        };
        match function.suffix.as_str() {
            "" => Some(self.degree_chord(&key, numeral, false)),
            "7" => Some(self.degree_chord(&key, numeral, true)),
            suffix => {
                let root = *self.degree_chord(&key, numeral, false).root()?;
                chord::from_shorthand(suffix, &root, &self.keys)
            }
        }
    }

    /// Realize a function token, including slash (`"V7/II"`) and polychord
    /// (`"V|IV"`) forms
    pub fn chord_from_function(&self, function: &str, key: &Pitch) -> Option<Chord> {
        if let Some((top, bottom)) = function.split_once('|') {
            let mut top_chord = self.chord_from_function(top, key)?;
            let bottom_chord = self.chord_from_function(bottom, key)?;
            top_chord.poly = Some(Box::new(bottom_chord));
            return Some(top_chord);
        }
        if let Some((main, bass)) = function.split_once('/') {
            // only a slash if the bass parses as a function on its own;
            // "I6/9" keeps its slash inside the suffix
            if let Some(bass_function) = ChordFunction::parse(bass) {
                if bass_function.numeral.is_some() || bass_function.roman == "bVII" {
                    let main_function = ChordFunction::parse(main)?;
                    let mut chord = self.chord_for_function(&main_function, key)?;
                    let bass_chord = self.chord_for_function(&bass_function, key)?;
                    chord.bass = bass_chord.root().copied();
                    return Some(chord);
                }
            }
        }
        let function = ChordFunction::parse(function)?;
        self.chord_for_function(&function, key)
    }

    /// Realize a comma-separated progression. Tokens that do not resolve
    /// are skipped with a log.
    pub fn chords(&self, progression: &str, key: &Pitch) -> Vec<Chord> {
        progression
            .split(',')
            .filter_map(|token| {
                let chord = self.chord_from_function(token, key);
                if chord.is_none() {
                    warn!(token, "unresolvable function");
                }
                chord
            })
            .collect()
    }

    /// The roman-numeral function of a chord symbol in a key. Shorthand
    /// gives `"bIIIM7"`; long form gives `"minor mediant major seventh"`
    /// style names.
    pub fn function_in_roman(&self, chord_symbol: &str, key: &Pitch, shorthand: bool) -> Option<String> {
        let chord = chord::from_symbol(chord_symbol, &self.keys)?;
        let root = *chord.root()?;
        let (quality, degree) = interval::determine(key, &root);
        let numeral = Numeral::ALL[degree as usize];

        if shorthand {
            let function = format!("{}{}", numeral.as_str(), chord.name);
            Some(match quality {
                Quality::Minor => format!("b{function}"),
                Quality::Augmented => format!("#{function}"),
                Quality::Diminished => format!("bb{function}"),
                _ => function,
            })
        } else {
            let quality_name = chord::full_name(&chord.name)
                .map(str::to_string)
                .unwrap_or_else(|| chord.name.clone());
            let function = format!("{} {}", numeral.function_name(), quality_name);
            Some(match quality {
                Quality::Minor => format!("minor {function}"),
                Quality::Augmented => format!("augmented {function}"),
                Quality::Diminished => format!("diminished {function}"),
                _ => function,
            })
        }
    }

    fn symbol_to_function(&self, symbol: &str, key: &Pitch, shorthand: bool) -> Option<String> {
        let parts: Vec<&str> = symbol.split('|').collect();
        if parts.len() == 2 && parts[0] != parts[1] {
            let top = self.function_in_roman(parts[0], key, shorthand)?;
            let bottom = self.function_in_roman(parts[1], key, shorthand)?;
            return Some(format!("{top}|{bottom}"));
        }
        if chord::is_slash_chord(symbol) {
            let (main, bass) = symbol.split_once('/')?;
            let main = self.function_in_roman(main, key, shorthand)?;
            let bass = self.function_in_roman(bass, key, shorthand)?;
            return Some(format!("{main}/{bass}"));
        }
        self.function_in_roman(symbol, key, shorthand)
    }

    /// Candidate functions for a pitch collection, ranked like
    /// [`chord::classify`]: the literal voicing first, then inversions and
    /// polychord splits when enabled.
    pub fn determine(
        &self,
        notes: &[Pitch],
        key: &Pitch,
        shorthand: bool,
        inversions: bool,
        polychords: bool,
    ) -> Vec<String> {
        let mut functions = Vec::new();
        for symbol in chord::classify(notes, true, inversions, polychords) {
            if let Some(function) = self.symbol_to_function(&symbol, key, shorthand) {
                if !functions.contains(&function) {
                    functions.push(function);
                }
            }
        }
        if functions.is_empty() {
            warn!(key = %key, "no functional interpretation for note set");
        }
        functions
    }

    /// Candidate functions for an already-built chord
    pub fn determine_chord(
        &self,
        chord: &Chord,
        key: &Pitch,
        shorthand: bool,
        inversions: bool,
        polychords: bool,
    ) -> Vec<String> {
        self.determine(&chord.notes, key, shorthand, inversions, polychords)
    }

    /// Candidate functions for a chord symbol. The literal reading comes
    /// first; with `inversions` or `polychords` the chord's notes are also
    /// re-classified for alternative readings.
    pub fn determine_symbol(
        &self,
        chord_symbol: &str,
        key: &Pitch,
        shorthand: bool,
        inversions: bool,
        polychords: bool,
    ) -> Vec<String> {
        let symbol: String = chord_symbol.chars().filter(|c| !c.is_whitespace()).collect();
        let mut functions = Vec::new();
        if let Some(function) = self.symbol_to_function(&symbol, key, shorthand) {
            functions.push(function);
        }
        if inversions || polychords {
            if let Some(chord) = chord::from_symbol(&symbol, &self.keys) {
                for function in self.determine(&chord.notes, key, shorthand, inversions, polychords)
                {
                    if !functions.contains(&function) {
                        functions.push(function);
                    }
                }
            }
        }
        functions
    }

    /// Analyze a comma-separated progression of chord symbols: one list of
    /// candidate functions per chord
    pub fn analyse(
        &self,
        progression: &str,
        key: &Pitch,
        shorthand: bool,
        inversions: bool,
        polychords: bool,
    ) -> Vec<Vec<String>> {
        progression
            .split(',')
            .map(|symbol| self.determine_symbol(symbol, key, shorthand, inversions, polychords))
            .collect()
    }

    /// One shorthand function per chord, `"?"` where nothing matched,
    /// joined back into a comma-separated line
    pub fn quick_analysis(&self, progression: &str, key: &Pitch) -> String {
        self.analyse(progression, key, true, false, false)
            .iter()
            .map(|options| options.first().cloned().unwrap_or_else(|| "?".to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Functional equivalents: I and III, I and VI, IV and II, IV and VI,
    /// V and VII, in either direction. Applies to triads and plain
    /// sevenths unless `ignore_suffix` opens it to everything.
    pub fn substitute_harmonic(&self, function: &str, ignore_suffix: bool) -> Vec<String> {
        const PAIRS: [(Numeral, Numeral); 5] = [
            (Numeral::I, Numeral::III),
            (Numeral::I, Numeral::VI),
            (Numeral::IV, Numeral::II),
            (Numeral::IV, Numeral::VI),
            (Numeral::V, Numeral::VII),
        ];

        let Some(func) = canonical(function) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if ignore_suffix || func.suffix.is_empty() || func.suffix == "7" {
            for (a, b) in PAIRS {
                if func.numeral == Some(a) {
                    out.push(format!("{}{}{}", func.cleaned_accidentals, b.as_str(), func.suffix));
                }
                if func.numeral == Some(b) {
                    out.push(format!("{}{}{}", func.cleaned_accidentals, a.as_str(), func.suffix));
                }
            }
        }
        out
    }

    /// Replace a minor function with its relative major a third up:
    /// VIm7 becomes IM7
    pub fn substitute_minor_for_major(&self, function: &str, ignore_suffix: bool) -> Vec<String> {
        let Some(func) = canonical(function) else {
            return Vec::new();
        };
        let Some(numeral) = func.numeral else {
            return Vec::new();
        };
        let applies = ignore_suffix
            || func.suffix == "m"
            || func.suffix == "m7"
            || (func.suffix.is_empty()
                && matches!(numeral, Numeral::II | Numeral::III | Numeral::VI));
        if !applies {
            return Vec::new();
        }

        let target = numeral.step(2);
        let accidentals = interval_diff(numeral, target, 3) + func.accidentals;
        let cleaned = clean_accidentals(accidentals);

        let mut out = Vec::new();
        if func.suffix == "m" || ignore_suffix {
            out.push(format!("{}{}M", cleaned, target.as_str()));
        }
        if func.suffix == "m7" || ignore_suffix {
            out.push(format!("{}{}M7", cleaned, target.as_str()));
        }
        if func.suffix.is_empty() || ignore_suffix {
            out.push(format!("{}{}", cleaned, target.as_str()));
        }
        out
    }

    /// Replace a major function with its relative minor a sixth up:
    /// IM7 becomes VIm7
    pub fn substitute_major_for_minor(&self, function: &str, ignore_suffix: bool) -> Vec<String> {
        let Some(func) = canonical(function) else {
            return Vec::new();
        };
        let Some(numeral) = func.numeral else {
            return Vec::new();
        };
        let applies = ignore_suffix
            || func.suffix == "M"
            || func.suffix == "M7"
            || (func.suffix.is_empty()
                && matches!(numeral, Numeral::I | Numeral::IV | Numeral::V));
        if !applies {
            return Vec::new();
        }

        let target = numeral.step(5);
        let accidentals = interval_diff(numeral, target, 9) + func.accidentals;
        let cleaned = clean_accidentals(accidentals);

        let mut out = Vec::new();
        if func.suffix == "M" || ignore_suffix {
            out.push(format!("{}{}m", cleaned, target.as_str()));
        }
        if func.suffix == "M7" || ignore_suffix {
            out.push(format!("{}{}m7", cleaned, target.as_str()));
        }
        if func.suffix.is_empty() || ignore_suffix {
            out.push(format!("{}{}", cleaned, target.as_str()));
        }
        out
    }

    /// A diminished chord equals its own transposition by minor thirds, so
    /// VIIdim7 also reads as IIdim7, IVdim7 and bVIdim7
    pub fn substitute_diminished_for_diminished(
        &self,
        function: &str,
        ignore_suffix: bool,
    ) -> Vec<String> {
        let Some(func) = canonical(function) else {
            return Vec::new();
        };
        let Some(numeral) = func.numeral else {
            return Vec::new();
        };
        let applies = ignore_suffix
            || func.suffix == "dim7"
            || func.suffix == "dim"
            || (func.suffix.is_empty() && numeral == Numeral::VII);
        if !applies {
            return Vec::new();
        }
        let suffix = if func.suffix.is_empty() {
            "dim".to_string()
        } else {
            func.suffix.clone()
        };

        let mut out = Vec::new();
        let mut accidentals = func.accidentals;
        let mut last = numeral;
        for _ in 0..3 {
            let next = last.step(2);
            accidentals += interval_diff(last, next, 3);
            out.push(format!("{}{}{}", clean_accidentals(accidentals), next.as_str(), suffix));
            last = next;
        }
        out
    }

    /// The dominant sevenths a diminished chord stands in for, one per
    /// minor-third transposition
    pub fn substitute_diminished_for_dominant(
        &self,
        function: &str,
        ignore_suffix: bool,
    ) -> Vec<String> {
        let Some(func) = canonical(function) else {
            return Vec::new();
        };
        let Some(numeral) = func.numeral else {
            return Vec::new();
        };
        let applies = ignore_suffix
            || func.suffix == "dim7"
            || func.suffix == "dim"
            || (func.suffix.is_empty() && numeral == Numeral::VII);
        if !applies {
            return Vec::new();
        }

        let mut out = Vec::new();
        let mut last = numeral;
        for _ in 0..4 {
            let next = last.step(2);
            let dominant = last.step(5);
            let accidentals = interval_diff(last, dominant, 8) + func.accidentals;
            out.push(format!(
                "{}{}dom7",
                clean_accidentals(accidentals),
                dominant.as_str()
            ));
            last = next;
        }
        out
    }
}

fn chord_from_notes(notes: Vec<Pitch>) -> Chord {
    let name = chord::suffix_of(&notes).unwrap_or("").to_string();
    Chord {
        name,
        notes,
        bass: None,
        poly: None,
    }
}

/// Substitutions only operate on plain numerals
fn canonical(function: &str) -> Option<ChordFunction> {
    match ChordFunction::parse(function) {
        Some(func) if func.numeral.is_some() => Some(func),
        _ => {
            warn!(function, "not a substitutable numeral");
            None
        }
    }
}
