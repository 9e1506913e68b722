// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled pitch representation and arithmetic.
//!
//! A [`Pitch`] keeps its letter name, a signed accidental count and an
//! octave, so `C###` and `D#` stay distinct spellings of the same sounding
//! note. Display normalization (`diatonic_name`) is on demand and never
//! mutates the stored spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sharp-oriented chromatic spellings, indexed by pitch class.
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat-oriented chromatic spellings, indexed by pitch class.
pub const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// The seven natural letter names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in ascending pitch order starting from C
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Pitch class of the natural letter (C = 0, D = 2, ...)
    pub fn semitone(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Position in the C-based letter sequence (C = 0 .. B = 6)
    pub fn index(self) -> usize {
        match self {
            Letter::C => 0,
            Letter::D => 1,
            Letter::E => 2,
            Letter::F => 3,
            Letter::G => 4,
            Letter::A => 5,
            Letter::B => 6,
        }
    }

    /// Parse a letter from a character, case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Letter::C => "C",
            Letter::D => "D",
            Letter::E => "E",
            Letter::F => "F",
            Letter::G => "G",
            Letter::A => "A",
            Letter::B => "B",
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a pitch name does not match `[A-Ga-g][#b]*[-]?[0-9]*`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a valid pitch name")]
pub struct ParsePitchError(pub String);

/// A spelled pitch: letter, signed accidental count, octave.
///
/// Octave numbering follows the convention where middle C is C3 = 60, so the
/// absolute semitone is `(octave + 2) * 12 + pitch class` and octave -2 is
/// the lowest representable octave.
///
/// Accidentals are unbounded in either direction; quintuple sharps are legal
/// spellings and only collapse when asked for via [`Pitch::diatonic_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    /// Positive for sharps, negative for flats
    pub accidentals: i32,
    pub octave: i32,
}

impl Pitch {
    /// Create a pitch from its parts
    pub fn new(letter: Letter, accidentals: i32, octave: i32) -> Self {
        Self {
            letter,
            accidentals,
            octave,
        }
    }

    /// Parse a spelled name such as `"C"`, `"Bb"`, `"F##"`, `"C#-1"` or
    /// `"Eb6"`. Returns `None` for anything outside the pitch grammar.
    /// The octave defaults to 3 (the middle-C octave) when absent.
    pub fn parse(name: &str) -> Option<Self> {
        Self::parse_with_octave(name, 3)
    }

    /// Like [`Pitch::parse`] but with an explicit default octave used when
    /// the name carries no octave suffix.
    pub fn parse_with_octave(name: &str, default_octave: i32) -> Option<Self> {
        let mut chars = name.trim().chars().peekable();
        let letter = Letter::from_char(chars.next()?)?;

        let mut accidentals = 0i32;
        while let Some(&c) = chars.peek() {
            match c {
                '#' => accidentals += 1,
                'b' => accidentals -= 1,
                _ => break,
            }
            chars.next();
        }

        let rest: String = chars.collect();
        let octave = if rest.is_empty() {
            default_octave
        } else {
            rest.parse::<i32>().ok()?
        };

        Some(Self {
            letter,
            accidentals,
            octave,
        })
    }

    /// Whether a string is inside the pitch grammar at all
    pub fn is_valid_name(name: &str) -> bool {
        Self::parse(name).is_some()
    }

    /// Build a pitch from an absolute semitone value (middle C = 60),
    /// spelled from the sharp-oriented table. Negative values are refused.
    pub fn from_absolute(value: i32) -> Option<Self> {
        if value < 0 {
            return None;
        }
        let mut p = Pitch::new(Letter::C, 0, 0);
        p.set_absolute(value);
        Some(p)
    }

    /// Pitch class 0-11 (C = 0), folding accidentals
    pub fn semitone(&self) -> i32 {
        (self.letter.semitone() + self.accidentals).rem_euclid(12)
    }

    /// Absolute semitone value considering the octave (middle C = C3 = 60)
    pub fn absolute(&self) -> i32 {
        (self.octave + 2) * 12 + self.letter.semitone() + self.accidentals
    }

    /// The octave the sounding pitch actually falls in.
    ///
    /// Differs from the stored octave for spellings that cross a C boundary;
    /// B#3 is stored in octave 3 but sounds in octave 4.
    pub fn absolute_octave(&self) -> i32 {
        self.absolute().div_euclid(12) - 2
    }

    /// Signed semitone distance to another pitch
    pub fn measure(&self, other: &Pitch) -> i32 {
        other.absolute() - self.absolute()
    }

    /// Sharpen the spelling. Augmenting a flat-spelled pitch strips one
    /// flat instead of stacking a sharp on top of it; otherwise `n` sharps
    /// are appended. Spelling-aware, not semitone arithmetic.
    pub fn augment(&mut self, n: i32) {
        if self.accidentals < 0 {
            self.accidentals += 1;
        } else {
            self.accidentals += n;
        }
    }

    /// Flatten the spelling; the mirror of [`Pitch::augment`]
    pub fn diminish(&mut self, n: i32) {
        if self.accidentals > 0 {
            self.accidentals -= 1;
        } else {
            self.accidentals -= n;
        }
    }

    /// Copy with one augment applied
    pub fn augmented(&self) -> Pitch {
        let mut p = *self;
        p.augment(1);
        p
    }

    /// Copy with one diminish applied
    pub fn diminished(&self) -> Pitch {
        let mut p = *self;
        p.diminish(1);
        p
    }

    /// Strip all accidentals, e.g. Bb to B
    pub fn naturalize(&mut self) {
        self.accidentals = 0;
    }

    /// Natural copy
    pub fn natural(&self) -> Pitch {
        Pitch::new(self.letter, 0, self.octave)
    }

    /// Move the pitch up or down by semitones.
    ///
    /// Recomputes letter and octave from the absolute value, which drops the
    /// original accidentals and respells from the sharp table. Lossy by
    /// design: transposition does not preserve spelling intent.
    pub fn transpose(&mut self, semitones: i32) {
        let value = self.absolute() + semitones;
        self.set_absolute(value);
    }

    /// Transposed copy
    pub fn transposed(&self, semitones: i32) -> Pitch {
        let mut p = *self;
        p.transpose(semitones);
        p
    }

    fn set_absolute(&mut self, value: i32) {
        let class = value.rem_euclid(12);
        self.letter = match class {
            0 | 1 => Letter::C,
            2 | 3 => Letter::D,
            4 => Letter::E,
            5 | 6 => Letter::F,
            7 | 8 => Letter::G,
            9 | 10 => Letter::A,
            _ => Letter::B,
        };
        self.accidentals = class - self.letter.semitone();
        self.octave = value.div_euclid(12) - 2;
    }

    pub fn change_octave(&mut self, diff: i32) {
        self.octave += diff;
    }

    pub fn octave_up(&self) -> Pitch {
        Pitch::new(self.letter, self.accidentals, self.octave + 1)
    }

    pub fn octave_down(&self) -> Pitch {
        Pitch::new(self.letter, self.accidentals, self.octave - 1)
    }

    /// Clamp the stored octave into `[min, max]`
    pub fn clamp_octave(&mut self, min: i32, max: i32) {
        self.octave = self.octave.clamp(min, max);
    }

    /// Copy shifted by whole octaves until no octave step brings it closer
    /// to `reference`. Each step changes the distance by exactly 12, so the
    /// walk terminates at the single minimum.
    pub fn nearest_octave(&self, reference: &Pitch) -> Pitch {
        let mut p = *self;
        let target = reference.absolute();
        loop {
            let dist = (p.absolute() - target).abs();
            let up = (p.octave_up().absolute() - target).abs();
            let down = (p.octave_down().absolute() - target).abs();
            if up < dist {
                p.change_octave(1);
            } else if down < dist {
                p.change_octave(-1);
            } else {
                return p;
            }
        }
    }

    /// Stored spelling without octave, e.g. `"C##"`
    pub fn name(&self) -> String {
        format!("{}{}", self.letter, self.accidental_str())
    }

    /// The accidental run of the stored spelling (`"##"`, `"b"`, `""`)
    pub fn accidental_str(&self) -> String {
        if self.accidentals >= 0 {
            "#".repeat(self.accidentals as usize)
        } else {
            "b".repeat((-self.accidentals) as usize)
        }
    }

    /// Simplest enharmonic spelling of the stored pitch.
    ///
    /// Over-accidented spellings are folded through the sharp-oriented table
    /// (for net sharps) or the flat-oriented table (for net flats):
    /// `C###` becomes `D#`, `Gbb` becomes `F`.
    pub fn diatonic_name(&self) -> String {
        if self.accidentals == 0 {
            return self.letter.as_str().to_string();
        }
        let idx = (self.letter.semitone() + self.accidentals).rem_euclid(12) as usize;
        if self.accidentals > 0 {
            SHARP_NAMES[idx].to_string()
        } else {
            FLAT_NAMES[idx].to_string()
        }
    }

    /// Diatonic name plus sounding octave, e.g. `"C#-1"` or `"Eb4"`.
    ///
    /// Uses [`Pitch::absolute_octave`] rather than the stored octave so
    /// B#3 renders as C4.
    pub fn shorthand(&self) -> String {
        format!("{}{}", self.diatonic_name(), self.absolute_octave())
    }

    /// Frequency in Hz, anchored so absolute value 57 sounds at
    /// `standard_pitch` (equal temperament)
    pub fn frequency(&self, standard_pitch: f64) -> f64 {
        let diff = f64::from(self.absolute() - 57);
        (diff / 12.0).exp2() * standard_pitch
    }
}

impl FromStr for Pitch {
    type Err = ParsePitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::parse(s).ok_or_else(|| ParsePitchError(s.to_string()))
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        let c = Pitch::parse("C").unwrap();
        assert_eq!(c.letter, Letter::C);
        assert_eq!(c.accidentals, 0);
        assert_eq!(c.octave, 3);

        let bb = Pitch::parse("Bb").unwrap();
        assert_eq!(bb.letter, Letter::B);
        assert_eq!(bb.accidentals, -1);

        let fss = Pitch::parse("f##").unwrap();
        assert_eq!(fss.letter, Letter::F);
        assert_eq!(fss.accidentals, 2);

        let low = Pitch::parse("C#-1").unwrap();
        assert_eq!(low.octave, -1);

        let high = Pitch::parse("Eb6").unwrap();
        assert_eq!(high.octave, 6);

        assert_eq!(Pitch::parse("H"), None);
        assert_eq!(Pitch::parse(""), None);
        assert_eq!(Pitch::parse("C%"), None);
    }

    #[test]
    fn test_absolute_convention() {
        // Middle C is C3 = 60
        assert_eq!(Pitch::parse("C").unwrap().absolute(), 60);
        assert_eq!(Pitch::parse("A").unwrap().absolute(), 69);
        assert_eq!(Pitch::parse("C-2").unwrap().absolute(), 0);

        let from = Pitch::from_absolute(60).unwrap();
        assert_eq!(from.letter, Letter::C);
        assert_eq!(from.octave, 3);

        assert_eq!(Pitch::from_absolute(-1), None);
    }

    #[test]
    fn test_semitone_class() {
        assert_eq!(Pitch::parse("C").unwrap().semitone(), 0);
        assert_eq!(Pitch::parse("B#").unwrap().semitone(), 0);
        assert_eq!(Pitch::parse("Cb").unwrap().semitone(), 11);
        assert_eq!(Pitch::parse("C###").unwrap().semitone(), 3);
    }

    #[test]
    fn test_augment_diminish_direction() {
        // augment then diminish on a natural is a no-op
        let mut c = Pitch::parse("C").unwrap();
        c.augment(1);
        assert_eq!(c.name(), "C#");
        c.diminish(1);
        assert_eq!(c.name(), "C");

        // diminishing a flat-spelled note never stacks a double flat short cut
        let mut bb = Pitch::parse("Bb").unwrap();
        bb.diminish(1);
        assert_eq!(bb.name(), "Bbb");

        // augmenting a flat-spelled note strips the flat
        let mut eb = Pitch::parse("Eb").unwrap();
        eb.augment(1);
        assert_eq!(eb.name(), "E");

        // the strip only removes one marker, whatever n says
        let mut ebb = Pitch::parse("Ebb").unwrap();
        ebb.augment(3);
        assert_eq!(ebb.name(), "Eb");
    }

    #[test]
    fn test_transpose_is_lossy() {
        let mut a = Pitch::parse("A").unwrap();
        a.transpose(3);
        assert_eq!(a.name(), "C");
        assert_eq!(a.octave, 4);
        a.transpose(-3);
        assert_eq!(a.name(), "A");
        assert_eq!(a.octave, 3);

        // spelling intent is dropped: Db up a semitone is D, not Ebb
        let mut db = Pitch::parse("Db").unwrap();
        db.transpose(1);
        assert_eq!(db.name(), "D");
    }

    #[test]
    fn test_diatonic_name() {
        assert_eq!(Pitch::parse("C###").unwrap().diatonic_name(), "D#");
        assert_eq!(Pitch::parse("Gbb").unwrap().diatonic_name(), "F");
        assert_eq!(Pitch::parse("B#").unwrap().diatonic_name(), "C");
        assert_eq!(Pitch::parse("C").unwrap().diatonic_name(), "C");
        // interleaved accidentals net out: Gbb##bb#b## is plain G
        assert_eq!(Pitch::parse("Gbb##bb#b##").unwrap().diatonic_name(), "G");
    }

    #[test]
    fn test_shorthand_octave_comes_from_absolute() {
        // B#3 sounds as C4
        let bs = Pitch::parse("B#").unwrap();
        assert_eq!(bs.shorthand(), "C4");
        // Cb3 sounds as B2
        let cb = Pitch::parse("Cb").unwrap();
        assert_eq!(cb.shorthand(), "B2");
    }

    #[test]
    fn test_shorthand_round_trip() {
        for name in ["C", "F#", "Bb", "C###", "Gbbb", "B#", "Cb"] {
            let p = Pitch::parse(name).unwrap();
            let reparsed = Pitch::parse(&p.shorthand()).unwrap();
            assert_eq!(
                p.semitone(),
                reparsed.semitone(),
                "{name} -> {} lost its pitch class",
                p.shorthand()
            );
            assert_eq!(p.absolute(), reparsed.absolute());
        }
    }

    #[test]
    fn test_nearest_octave() {
        let ref_c = Pitch::parse("C").unwrap();

        let high_g = Pitch::parse("G6").unwrap();
        let near = high_g.nearest_octave(&ref_c);
        assert!((near.absolute() - ref_c.absolute()).abs() <= 6);
        assert_eq!(near.semitone(), high_g.semitone());

        let low_d = Pitch::parse("D-2").unwrap();
        let near = low_d.nearest_octave(&ref_c);
        assert!((near.absolute() - ref_c.absolute()).abs() <= 6);
    }

    #[test]
    fn test_measure() {
        let c = Pitch::parse("C").unwrap();
        let d = Pitch::parse("D").unwrap();
        assert_eq!(c.measure(&d), 2);
        assert_eq!(d.measure(&c), -2);
    }

    #[test]
    fn test_from_str_error() {
        assert!("C#".parse::<Pitch>().is_ok());
        let err = "xyz".parse::<Pitch>().unwrap_err();
        assert_eq!(err, ParsePitchError("xyz".to_string()));
    }
}
