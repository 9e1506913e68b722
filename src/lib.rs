// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Tonal harmony engine.
//!
//! Pitches carry their spelling (letter, accidentals, octave) rather than
//! a bare semitone number, so F# and Gb stay distinct. On top of that sit
//! a cached circle-of-fifths key generator, named intervals, chords built
//! from shorthand symbols, a scale engine covering the diatonic modes
//! through jazz and pentatonic variants, and a roman-numeral progression
//! analyzer with substitution rules.
//!
//! The key cache is the shared spelling authority: build one, wrap it in
//! an [`Arc`](std::sync::Arc), and hand it to the scale engine and the
//! progression analyzer.
//!
//! ```
//! use std::sync::Arc;
//! use tonality::{KeyCache, Pitch, ProgressionAnalyzer, ScaleEngine, ScaleKind};
//!
//! let keys = Arc::new(KeyCache::new());
//! let scales = ScaleEngine::new(Arc::clone(&keys));
//! let analyzer = ProgressionAnalyzer::new(Arc::clone(&keys));
//!
//! let tonic = Pitch::parse("D").unwrap();
//! let dorian = scales.scale(ScaleKind::Dorian, &tonic);
//! assert_eq!(dorian.full_name(), "D dorian");
//!
//! assert_eq!(analyzer.quick_analysis("Dm7,G7,CM7", &Pitch::parse("C").unwrap()),
//!            "IIm7,V7,IM7");
//! ```

pub mod chord;
pub mod interval;
pub mod key;
pub mod pitch;
pub mod progression;
pub mod scale;

pub use chord::Chord;
pub use key::KeyCache;
pub use pitch::{Letter, Pitch};
pub use progression::{ChordFunction, Numeral, ProgressionAnalyzer};
pub use scale::{Scale, ScaleEngine, ScaleKind};
