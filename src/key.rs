// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Diatonic key generation with a shared cache.
//!
//! A key is identified by its tonic pitch. [`KeyCache::notes`] spells the
//! seven notes of the major key through the circle of fifths, so exotic
//! tonics like `C####` or `Gbbbb` still come out correctly spelled.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::error;

use crate::pitch::{Letter, Pitch};

/// Letter names in circle-of-fifths order
const FIFTHS: [Letter; 7] = [
    Letter::F,
    Letter::C,
    Letter::G,
    Letter::D,
    Letter::A,
    Letter::E,
    Letter::B,
];

/// Cache of generated keys, keyed by tonic spelling and octave.
///
/// Clients share one cache; lookups hand out owned copies so callers can
/// retune octaves or accidentals without corrupting cached entries.
#[derive(Debug, Default)]
pub struct KeyCache {
    keys: Mutex<HashMap<(String, i32), Vec<Pitch>>>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seven notes of the major key on `tonic`, tonic first, ascending
    /// from the tonic's octave. Notes that sit below the tonic within the
    /// octave are pushed up one octave so the run ascends.
    pub fn notes(&self, tonic: &Pitch) -> Vec<Pitch> {
        let id = (tonic.name(), tonic.octave);
        {
            let cache = self.keys.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(notes) = cache.get(&id) {
                return notes.clone();
            }
        }

        let notes = generate_key(tonic);

        let mut cache = self.keys.lock().unwrap_or_else(|e| e.into_inner());
        cache.entry(id).or_insert_with(|| notes.clone());
        notes
    }

    /// The note `steps` diatonic steps above `start` in the key of `tonic`.
    /// For example two steps up from D in C major is F. Returns `None` when
    /// `start` is not spelled as a member of the key.
    pub fn interval(&self, tonic: &Pitch, start: &Pitch, steps: i32) -> Option<Pitch> {
        let notes = self.notes(tonic);
        let pos = notes.iter().position(|n| n.name() == start.name())?;
        let idx = (pos as i32 + steps).rem_euclid(7) as usize;
        notes.get(idx).copied()
    }
}

/// Spell the major key on `tonic` through the circle of fifths.
fn generate_key(tonic: &Pitch) -> Vec<Pitch> {
    let acc = tonic.accidentals;
    let octave = tonic.octave;
    let fifth_index = FIFTHS
        .iter()
        .position(|&l| l == tonic.letter)
        .unwrap_or(0);

    let mut result = Vec::with_capacity(7);
    if fifth_index != 0 {
        // the letter one fifth below keeps the tonic's accidentals
        result.push(Pitch::new(FIFTHS[fifth_index - 1], acc, octave));
        for &letter in &FIFTHS[fifth_index..] {
            result.push(Pitch::new(letter, acc, octave));
        }
        // letters further down the cycle pick up an extra sharp
        for &letter in &FIFTHS[..fifth_index - 1] {
            result.push(Pitch::new(letter, acc + 1, octave));
        }
    } else {
        // F is the special case: B is flattened instead of anything sharpened
        for &letter in &FIFTHS[..6] {
            result.push(Pitch::new(letter, acc, octave));
        }
        result.push(Pitch::new(Letter::B, acc - 1, octave));
    }

    result.sort_by_key(|n| n.absolute());

    let tonic_pos = result
        .iter()
        .position(|n| n.letter == tonic.letter && n.accidentals == tonic.accidentals);
    let Some(tonic_pos) = tonic_pos else {
        error!(tonic = %tonic, "tonic not found in generated key");
        return Vec::new();
    };

    let mut sorted: Vec<Pitch> = result[tonic_pos..].to_vec();
    for note in &result[..tonic_pos] {
        sorted.push(note.octave_up());
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(notes: &[Pitch]) -> Vec<String> {
        notes.iter().map(|n| n.name()).collect()
    }

    #[test]
    fn test_c_major() {
        let cache = KeyCache::new();
        let c = Pitch::parse("C").unwrap();
        assert_eq!(names(&cache.notes(&c)), ["C", "D", "E", "F", "G", "A", "B"]);
    }

    #[test]
    fn test_f_major_flattens_b() {
        let cache = KeyCache::new();
        let f = Pitch::parse("F").unwrap();
        assert_eq!(
            names(&cache.notes(&f)),
            ["F", "G", "A", "Bb", "C", "D", "E"]
        );
    }

    #[test]
    fn test_sharp_keys() {
        let cache = KeyCache::new();
        let e = Pitch::parse("E").unwrap();
        assert_eq!(
            names(&cache.notes(&e)),
            ["E", "F#", "G#", "A", "B", "C#", "D#"]
        );

        let fs = Pitch::parse("F#").unwrap();
        assert_eq!(
            names(&cache.notes(&fs)),
            ["F#", "G#", "A#", "B", "C#", "D#", "E#"]
        );
    }

    #[test]
    fn test_flat_keys() {
        let cache = KeyCache::new();
        let eb = Pitch::parse("Eb").unwrap();
        assert_eq!(
            names(&cache.notes(&eb)),
            ["Eb", "F", "G", "Ab", "Bb", "C", "D"]
        );
    }

    #[test]
    fn test_exotic_tonics_still_spell() {
        let cache = KeyCache::new();
        let weird = Pitch::parse("C####").unwrap();
        let notes = cache.notes(&weird);
        assert_eq!(notes.len(), 7);
        assert_eq!(notes[0].name(), "C####");
        // still a major scale by ear
        let tonic = notes[0].absolute();
        let steps: Vec<i32> = notes.iter().map(|n| n.absolute() - tonic).collect();
        assert_eq!(steps, [0, 2, 4, 5, 7, 9, 11]);
    }

    #[test]
    fn test_notes_ascend_from_tonic_octave() {
        let cache = KeyCache::new();
        let g = Pitch::parse("G4").unwrap();
        let notes = cache.notes(&g);
        assert_eq!(notes[0].octave, 4);
        for pair in notes.windows(2) {
            assert!(pair[0].absolute() < pair[1].absolute());
        }
        // F# lies below G within the octave, so it gets bumped up
        assert_eq!(notes[6].name(), "F#");
        assert_eq!(notes[6].octave, 5);
    }

    #[test]
    fn test_cached_copies_are_independent() {
        let cache = KeyCache::new();
        let c = Pitch::parse("C").unwrap();
        let mut first = cache.notes(&c);
        first[0].augment(1);
        let second = cache.notes(&c);
        assert_eq!(second[0].name(), "C");
    }

    #[test]
    fn test_interval() {
        let cache = KeyCache::new();
        let c = Pitch::parse("C").unwrap();
        let d = Pitch::parse("D").unwrap();
        let third = cache.interval(&c, &d, 1).unwrap();
        assert_eq!(third.name(), "E");

        let wrapped = cache.interval(&c, &d, 6).unwrap();
        assert_eq!(wrapped.name(), "C");

        // start note must be spelled as a member of the key
        let ds = Pitch::parse("D#").unwrap();
        assert!(cache.interval(&c, &ds, 1).is_none());
    }
}
