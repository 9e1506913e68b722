// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord construction from shorthand symbols and classification of pitch
//! collections back into ranked candidate symbols.

use std::fmt;

use tracing::warn;

use crate::interval;
use crate::key::KeyCache;
use crate::pitch::Pitch;

/// A chord: quality suffix plus spelled notes, lowest first.
///
/// `name` holds only the quality symbol (`"m7"`, `""` for a major triad);
/// the printable symbol prepends the root. Slash basses and stacked
/// polychords ride along as optional extras.
#[derive(Debug, Clone)]
pub struct Chord {
    /// Quality suffix, e.g. `"m7b5"`; empty for a plain major triad
    pub name: String,
    pub notes: Vec<Pitch>,
    pub bass: Option<Pitch>,
    pub poly: Option<Box<Chord>>,
}

impl Chord {
    pub fn root(&self) -> Option<&Pitch> {
        self.notes.first()
    }

    pub fn is_valid(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Printable symbol, e.g. `"Cm7"`
    pub fn symbol(&self) -> String {
        match self.root() {
            Some(root) => format!("{}{}", root.diatonic_name(), self.name),
            None => self.name.clone(),
        }
    }

    pub fn set_octave(&mut self, octave: i32) {
        if let Some(first) = self.notes.first() {
            let diff = octave - first.absolute_octave();
            for note in &mut self.notes {
                note.change_octave(diff);
            }
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

/// Split a chord symbol such as `"Cm7"` into root name and quality suffix.
/// The root takes the letter plus any directly following accidental run, so
/// `"Cb9"` reads as a Cb chord, not C with a `b9`.
pub fn parse_symbol(symbol: &str) -> Option<(Pitch, String)> {
    let first = symbol.chars().next()?;
    crate::pitch::Letter::from_char(first)?;
    let mut end = 1;
    for c in symbol[1..].chars() {
        if c == '#' || c == 'b' {
            end += 1;
        } else {
            break;
        }
    }
    let root = Pitch::parse(&symbol[..end])?;
    Some((root, symbol[end..].to_string()))
}

/// Whether a string names a chord this module can build
pub fn is_valid_symbol(symbol: &str, keys: &KeyCache) -> bool {
    from_symbol(symbol, keys).is_some()
}

/// Whether the string is a slash chord (`"CM7/G"`), as opposed to a suffix
/// that merely contains a slash (`"Cm6/9"`)
pub fn is_slash_chord(symbol: &str) -> bool {
    let parts: Vec<&str> = symbol.split('/').collect();
    parts.len() == 2 && Pitch::is_valid_name(parts[1]) && parse_symbol(parts[0]).is_some()
}

/// Build a chord from a full symbol such as `"F#m7b5"`
pub fn from_symbol(symbol: &str, keys: &KeyCache) -> Option<Chord> {
    let (root, suffix) = parse_symbol(symbol)?;
    from_shorthand(&suffix, &root, keys)
}

/// Build a chord from a quality suffix on a root note.
///
/// Spellings come from the named-interval generator, so minor thirds and
/// diminished fifths land on the right letters. Unknown suffixes log and
/// return `None`.
pub fn from_shorthand(suffix: &str, root: &Pitch, keys: &KeyCache) -> Option<Chord> {
    let r = *root;
    let m2 = || interval::minor_second(keys, &r);
    let maj2 = || interval::major_second(keys, &r);
    let m3 = || interval::minor_third(keys, &r);
    let maj3 = || interval::major_third(keys, &r);
    let p4 = || interval::perfect_fourth(keys, &r);
    let dim5 = || interval::minor_fifth(keys, &r);
    let p5 = || interval::perfect_fifth(keys, &r);
    let aug5 = || interval::perfect_fifth(keys, &r).augmented();
    let maj6 = || interval::major_sixth(keys, &r);
    let m7 = || interval::minor_seventh(keys, &r);
    let maj7 = || interval::major_seventh(keys, &r);
    let dim7 = || interval::minor_seventh(keys, &r).diminished();
    // extensions sit an octave above their simple interval
    let flat9 = || m2().octave_up();
    let nine = || maj2().octave_up();
    let sharp9 = || m3().octave_up();
    let eleven = || p4().octave_up();
    let sharp11 = || dim5().octave_up();
    let thirteen = || maj6().octave_up();

    let notes: Vec<Pitch> = match suffix {
        "" | "M" | "maj" => vec![r, maj3(), p5()],
        "m" | "min" | "-" => vec![r, m3(), p5()],
        "dim" => vec![r, m3(), dim5()],
        "aug" | "+" => vec![r, maj3(), aug5()],
        "dim7" => vec![r, m3(), dim5(), dim7()],
        "7" | "dom7" => vec![r, maj3(), p5(), m7()],
        "M7" | "maj7" => vec![r, maj3(), p5(), maj7()],
        "m7" => vec![r, m3(), p5(), m7()],
        "m7b5" => vec![r, m3(), dim5(), m7()],
        "mM7" | "m/M7" | "mmaj7" => vec![r, m3(), p5(), maj7()],
        "5" => vec![r, p5()],
        "6" | "M6" => vec![r, maj3(), p5(), maj6()],
        "m6" => vec![r, m3(), p5(), maj6()],
        "6/7" | "67" => vec![r, maj3(), p5(), maj6(), m7()],
        "6/9" | "69" => vec![r, maj3(), p5(), maj6(), nine()],
        "sus" | "sus4" => vec![r, p4(), p5()],
        "sus2" => vec![r, maj2(), p5()],
        "sus47" | "7sus4" => vec![r, p4(), p5(), m7()],
        "sus4b9" | "susb9" => vec![r, p4(), p5(), flat9()],
        "7b5" => vec![r, maj3(), dim5(), m7()],
        "7#5" | "7+5" | "7+" => vec![r, maj3(), aug5(), m7()],
        "M7+5" | "M7+" => vec![r, maj3(), aug5(), maj7()],
        "m7+" | "m7+5" => vec![r, m3(), aug5(), m7()],
        "7b9" => vec![r, maj3(), p5(), m7(), flat9()],
        "7#9" => vec![r, maj3(), p5(), m7(), sharp9()],
        "m7b9" => vec![r, m3(), p5(), m7(), flat9()],
        "7b9b5" => vec![r, maj3(), dim5(), m7(), flat9()],
        "9" => vec![r, maj3(), p5(), m7(), nine()],
        "M9" => vec![r, maj3(), p5(), maj7(), nine()],
        "m9" => vec![r, m3(), p5(), m7(), nine()],
        "add9" => vec![r, maj3(), p5(), nine()],
        "9#11" => vec![r, maj3(), p5(), m7(), nine(), sharp11()],
        "7#11" => vec![r, maj3(), p5(), m7(), sharp11()],
        "11" => vec![r, p5(), m7(), eleven()],
        "m11" => vec![r, m3(), p5(), m7(), eleven()],
        "m11b5" => vec![r, m3(), dim5(), m7(), eleven()],
        "13" => vec![r, maj3(), p5(), m7(), nine(), thirteen()],
        "M13" => vec![r, maj3(), p5(), maj7(), nine(), thirteen()],
        "m13" => vec![r, m3(), p5(), m7(), nine(), thirteen()],
        "m6/9" => vec![r, m3(), p5(), maj6(), nine()],
        "m6/9/11" => vec![r, m3(), p5(), maj6(), nine(), eleven()],
        "hendrix" | "7b12" => vec![r, maj3(), p5(), m7(), sharp9()],
        _ => {
            warn!(suffix, "unknown chord shorthand");
            return None;
        }
    };

    Some(Chord {
        name: suffix.to_string(),
        notes,
        bass: None,
        poly: None,
    })
}

/// Pretty name for a quality suffix, used by the long-form analysis
pub fn full_name(suffix: &str) -> Option<&'static str> {
    let name = match suffix {
        "" | "M" | "maj" => "major triad",
        "m" | "min" | "-" => "minor triad",
        "dim" => "diminished triad",
        "aug" | "+" => "augmented triad",
        "dim7" => "diminished seventh",
        "7" | "dom7" => "dominant seventh",
        "M7" | "maj7" => "major seventh",
        "m7" => "minor seventh",
        "m7b5" => "half diminished seventh",
        "mM7" | "m/M7" | "mmaj7" => "minor/major seventh",
        "5" => "perfect fifth",
        "6" | "M6" => "major sixth",
        "m6" => "minor sixth",
        "sus" | "sus4" => "suspended fourth triad",
        "sus2" => "suspended second triad",
        "sus47" | "7sus4" => "suspended seventh",
        "7b5" => "dominant flat five",
        "7#5" | "7+5" | "7+" => "augmented dominant seventh",
        "7b9" => "dominant flat ninth",
        "7#9" => "dominant sharp ninth",
        "9" => "dominant ninth",
        "M9" => "major ninth",
        "m9" => "minor ninth",
        "add9" => "added ninth",
        "11" => "eleventh",
        "m11" => "minor eleventh",
        "13" => "dominant thirteenth",
        "M13" => "major thirteenth",
        "m13" => "minor thirteenth",
        "6/9" | "69" => "sixth ninth",
        _ => return None,
    };
    Some(name)
}

/// Map a deduplicated, sorted pitch-class profile (relative to an assumed
/// root) to a quality suffix.
fn suffix_for_profile(profile: &[i32]) -> Option<&'static str> {
    let suffix = match profile {
        [0, 4, 7] => "",
        [0, 3, 7] => "m",
        [0, 3, 6] => "dim",
        [0, 4, 8] => "aug",
        [0, 5, 7] => "sus4",
        [0, 2, 7] => "sus2",
        [0, 7] => "5",
        [0, 4, 7, 10] => "7",
        [0, 4, 7, 11] => "M7",
        [0, 3, 7, 10] => "m7",
        [0, 3, 6, 10] => "m7b5",
        [0, 3, 6, 9] => "dim7",
        [0, 3, 7, 11] => "mM7",
        [0, 4, 6, 10] => "7b5",
        [0, 4, 8, 10] => "7#5",
        [0, 4, 8, 11] => "M7+5",
        [0, 4, 7, 9] => "6",
        [0, 3, 7, 9] => "m6",
        [0, 5, 7, 10] => "sus47",
        [0, 2, 4, 7] => "add9",
        [0, 2, 4, 7, 10] => "9",
        [0, 2, 4, 7, 11] => "M9",
        [0, 2, 3, 7, 10] => "m9",
        [0, 1, 4, 7, 10] => "7b9",
        [0, 3, 4, 7, 10] => "7#9",
        [0, 2, 4, 7, 9] => "6/9",
        [0, 3, 5, 7, 10] => "m11",
        [0, 2, 4, 6, 7, 10] => "9#11",
        [0, 2, 4, 7, 9, 10] => "13",
        [0, 2, 4, 7, 9, 11] => "M13",
        [0, 2, 3, 7, 9, 10] => "m13",
        _ => return None,
    };
    Some(suffix)
}

/// The quality suffix of a note stack read with its lowest note as the
/// root, or `None` when the profile is unrecognized
pub fn suffix_of(notes: &[Pitch]) -> Option<&'static str> {
    let root = notes.first()?;
    suffix_for_profile(&profile_against(root, notes))
}

fn profile_against(root: &Pitch, notes: &[Pitch]) -> Vec<i32> {
    let mut classes: Vec<i32> = notes
        .iter()
        .map(|n| (n.semitone() - root.semitone()).rem_euclid(12))
        .collect();
    classes.sort_unstable();
    classes.dedup();
    classes
}

fn symbol_for(root: &Pitch, suffix: &str, shorthand: bool) -> String {
    if shorthand {
        format!("{}{}", root.diatonic_name(), suffix)
    } else {
        format!(
            "{} {}",
            root.diatonic_name(),
            full_name(suffix).unwrap_or(suffix)
        )
    }
}

/// Classify a pitch collection into ranked candidate symbols.
///
/// The first candidate always treats the given bass note as the root.
/// With `inversions`, each rotation of the note list is tried as an
/// alternative root; with `polychords`, six-note sets are additionally
/// split 3+3 and reported as `top|bottom` when both halves classify.
pub fn classify(notes: &[Pitch], shorthand: bool, inversions: bool, polychords: bool) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    if notes.is_empty() {
        return result;
    }

    let rotation_count = if inversions { notes.len() } else { 1 };
    for rot in 0..rotation_count {
        let root = &notes[rot];
        let mut rotated: Vec<Pitch> = notes[rot..].to_vec();
        rotated.extend_from_slice(&notes[..rot]);
        if let Some(suffix) = suffix_for_profile(&profile_against(root, &rotated)) {
            let symbol = symbol_for(root, suffix, shorthand);
            if !result.contains(&symbol) {
                result.push(symbol);
            }
        }
    }

    if polychords && notes.len() == 6 {
        let bottom = &notes[..3];
        let top = &notes[3..];
        let bottom_suffix = suffix_for_profile(&profile_against(&bottom[0], bottom));
        let top_suffix = suffix_for_profile(&profile_against(&top[0], top));
        if let (Some(bs), Some(ts)) = (bottom_suffix, top_suffix) {
            let symbol = format!(
                "{}|{}",
                symbol_for(&top[0], ts, shorthand),
                symbol_for(&bottom[0], bs, shorthand)
            );
            if !result.contains(&symbol) {
                result.push(symbol);
            }
        }
    }

    result
}
