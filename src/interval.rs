// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named diatonic intervals and interval determination.
//!
//! Interval construction is spelling-aware: each named interval starts from
//! the matching degree of the root's major key and adjusts accidentals until
//! the semitone distance is exact, so a minor third above D is F, not E#.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::key::KeyCache;
use crate::pitch::Pitch;

/// Semitone offsets of the major-scale degrees above the tonic
const MAJOR_TEMPLATE: [i32; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Generic interval size by letter distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Degree {
    Unison,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
}

impl Degree {
    pub fn as_str(self) -> &'static str {
        match self {
            Degree::Unison => "unison",
            Degree::Second => "second",
            Degree::Third => "third",
            Degree::Fourth => "fourth",
            Degree::Fifth => "fifth",
            Degree::Sixth => "sixth",
            Degree::Seventh => "seventh",
        }
    }

    fn from_letter_distance(d: usize) -> Degree {
        match d % 7 {
            0 => Degree::Unison,
            1 => Degree::Second,
            2 => Degree::Third,
            3 => Degree::Fourth,
            4 => Degree::Fifth,
            5 => Degree::Sixth,
            _ => Degree::Seventh,
        }
    }

    /// Whether the plain form of this degree is perfect rather than major
    fn is_perfect(self) -> bool {
        matches!(self, Degree::Unison | Degree::Fourth | Degree::Fifth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    Diminished,
    Minor,
    Major,
    Perfect,
    Augmented,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Diminished => "diminished",
            Quality::Minor => "minor",
            Quality::Major => "major",
            Quality::Perfect => "perfect",
            Quality::Augmented => "augmented",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed semitone distance from `a` to `b`
pub fn measure(a: &Pitch, b: &Pitch) -> i32 {
    b.absolute() - a.absolute()
}

/// Spell the note `degree` letter steps above `root` at exactly `semitones`.
///
/// The base spelling comes from the root's own major key; accidentals are
/// then stripped or stacked one at a time until the distance matches, and
/// the octave is fitted so the result sits at or above the root.
fn adjusted_degree(keys: &KeyCache, root: &Pitch, degree: usize, semitones: i32) -> Pitch {
    let scale = keys.notes(&root.natural());
    let mut note = scale[degree % 7];
    // carry the root's own accidentals so the key of D# needs no exotic lookup
    note.accidentals += root.accidentals;
    note.octave = root.octave;
    if note.absolute() < root.absolute() {
        note.change_octave(1);
    }

    let mut dist = (note.absolute() - root.absolute()).rem_euclid(12);
    while dist < semitones {
        note.accidentals += 1;
        dist += 1;
    }
    while dist > semitones {
        note.accidentals -= 1;
        dist -= 1;
    }
    note
}

macro_rules! named_interval {
    ($(#[$meta:meta])* $name:ident, $degree:expr, $semitones:expr) => {
        $(#[$meta])*
        pub fn $name(keys: &KeyCache, root: &Pitch) -> Pitch {
            adjusted_degree(keys, root, $degree, $semitones)
        }
    };
}

named_interval!(minor_second, 1, 1);
named_interval!(major_second, 1, 2);
named_interval!(minor_third, 2, 3);
named_interval!(major_third, 2, 4);
named_interval!(perfect_fourth, 3, 5);
named_interval!(
    /// Diminished fifth spelled on the fifth degree, as blues scales want it
    minor_fifth,
    4,
    6
);
named_interval!(perfect_fifth, 4, 7);
named_interval!(minor_sixth, 5, 8);
named_interval!(major_sixth, 5, 9);
named_interval!(minor_seventh, 6, 10);
named_interval!(major_seventh, 6, 11);

/// Name the interval from `tonic` up to `other` by letter distance and
/// pitch-class offset against the major template. Distances more than one
/// accidental away from the template collapse to diminished or augmented.
pub fn determine(tonic: &Pitch, other: &Pitch) -> (Quality, Degree) {
    let letter_distance =
        (other.letter.index() + 7 - tonic.letter.index()) % 7;
    let degree = Degree::from_letter_distance(letter_distance);

    let template = MAJOR_TEMPLATE[letter_distance];
    let actual = (other.semitone() - tonic.semitone()).rem_euclid(12);
    let diff = actual - template;

    let quality = match diff {
        0 if degree.is_perfect() => Quality::Perfect,
        0 => Quality::Major,
        -1 if degree.is_perfect() => Quality::Diminished,
        -1 => Quality::Minor,
        1 => Quality::Augmented,
        _ if diff < 0 => Quality::Diminished,
        _ => Quality::Augmented,
    };
    (quality, degree)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Pitch {
        Pitch::parse(name).unwrap()
    }

    #[test]
    fn test_named_intervals_from_c() {
        let keys = KeyCache::new();
        let c = p("C");
        assert_eq!(minor_second(&keys, &c).name(), "Db");
        assert_eq!(major_second(&keys, &c).name(), "D");
        assert_eq!(minor_third(&keys, &c).name(), "Eb");
        assert_eq!(major_third(&keys, &c).name(), "E");
        assert_eq!(perfect_fourth(&keys, &c).name(), "F");
        assert_eq!(minor_fifth(&keys, &c).name(), "Gb");
        assert_eq!(perfect_fifth(&keys, &c).name(), "G");
        assert_eq!(minor_sixth(&keys, &c).name(), "Ab");
        assert_eq!(major_sixth(&keys, &c).name(), "A");
        assert_eq!(minor_seventh(&keys, &c).name(), "Bb");
        assert_eq!(major_seventh(&keys, &c).name(), "B");
    }

    #[test]
    fn test_intervals_keep_letter_spelling() {
        let keys = KeyCache::new();
        // a minor third above D is F, not E#
        assert_eq!(minor_third(&keys, &p("D")).name(), "F");
        // above E the minor third is G
        assert_eq!(minor_third(&keys, &p("E")).name(), "G");
        // sharp roots carry the sharp through
        assert_eq!(perfect_fifth(&keys, &p("F#")).name(), "C#");
    }

    #[test]
    fn test_intervals_sit_above_root() {
        let keys = KeyCache::new();
        let a = p("A");
        let third = major_third(&keys, &a);
        assert_eq!(third.measure(&a), -4);
        assert!(third.absolute() > a.absolute());
    }

    #[test]
    fn test_determine() {
        assert_eq!(determine(&p("C"), &p("E")), (Quality::Major, Degree::Third));
        assert_eq!(
            determine(&p("C"), &p("Eb")),
            (Quality::Minor, Degree::Third)
        );
        assert_eq!(
            determine(&p("C"), &p("G")),
            (Quality::Perfect, Degree::Fifth)
        );
        assert_eq!(
            determine(&p("C"), &p("Gb")),
            (Quality::Diminished, Degree::Fifth)
        );
        assert_eq!(
            determine(&p("C"), &p("F#")),
            (Quality::Augmented, Degree::Fourth)
        );
        assert_eq!(
            determine(&p("C"), &p("Bb")),
            (Quality::Minor, Degree::Seventh)
        );
        assert_eq!(
            determine(&p("A"), &p("C")),
            (Quality::Minor, Degree::Third)
        );
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure(&p("C"), &p("G")), 7);
        assert_eq!(measure(&p("G"), &p("C")), -7);
    }

    #[test]
    fn test_quality_and_degree_serde_round_trip() {
        let pair = (Quality::Minor, Degree::Third);
        let encoded = serde_json::to_string(&pair).unwrap();
        let decoded: (Quality, Degree) = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, pair);
    }
}
