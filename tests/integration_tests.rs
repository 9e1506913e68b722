// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for the harmony engine.
//!
//! These tests exercise the public API end to end: the key cache feeding
//! the scale engine and the progression analyzer, and round trips between
//! chords, symbols and roman-numeral functions.

use std::io::Write;
use std::sync::{Arc, Mutex};

use tonality::progression::{clean_accidentals, interval_diff};
use tonality::{chord, interval, Numeral};
use tonality::{KeyCache, Pitch, ProgressionAnalyzer, ScaleEngine, ScaleKind};

fn p(name: &str) -> Pitch {
    Pitch::parse(name).unwrap()
}

fn names(notes: &[Pitch]) -> Vec<String> {
    notes.iter().map(|n| n.name()).collect()
}

#[test]
fn test_key_spelling_uses_flats_where_the_key_does() {
    let keys = KeyCache::new();
    assert_eq!(
        names(&keys.notes(&p("F"))),
        ["F", "G", "A", "Bb", "C", "D", "E"]
    );
    assert_eq!(
        names(&keys.notes(&p("F#"))),
        ["F#", "G#", "A#", "B", "C#", "D#", "E#"]
    );
    assert_eq!(
        names(&keys.notes(&p("Eb"))),
        ["Eb", "F", "G", "Ab", "Bb", "C", "D"]
    );
}

#[test]
fn test_keys_ascend_from_the_tonic() {
    let keys = KeyCache::new();
    for tonic in ["C", "F#", "Eb", "B"] {
        let notes = keys.notes(&p(tonic));
        for pair in notes.windows(2) {
            assert!(pair[0].absolute() < pair[1].absolute(), "key of {tonic}");
        }
    }
}

#[test]
fn test_engine_shares_one_key_cache() {
    let keys = Arc::new(KeyCache::new());
    let scales = ScaleEngine::new(Arc::clone(&keys));
    let analyzer = ProgressionAnalyzer::new(Arc::clone(&keys));

    // the same spelling authority answers both
    let lydian = scales.scale(ScaleKind::Lydian, &p("F"));
    assert_eq!(lydian.notes[3].name(), "B");
    let four = analyzer.chord_from_function("IV", &p("C")).unwrap();
    assert_eq!(four.root().unwrap().name(), "F");
}

#[test]
fn test_augment_and_diminish_prefer_unspelling() {
    // sharpening a flatted note removes the flat instead of stacking marks
    let mut note = p("Bb");
    note.augment(1);
    assert_eq!(note.name(), "B");
    let mut note = p("C#");
    note.diminish(1);
    assert_eq!(note.name(), "C");
    // ...and only adds a mark once the spelling is clean
    let mut note = p("B");
    note.augment(1);
    assert_eq!(note.name(), "B#");
}

#[test]
fn test_transposition_round_trip_is_enharmonic() {
    let start = p("F#4");
    let back = start.transposed(7).transposed(-7);
    assert_eq!(back.absolute(), start.absolute());
    // spelling may change, pitch class may not
    assert_eq!(back.semitone(), start.semitone());
}

#[test]
fn test_interval_quality_naming() {
    let (quality, degree) = interval::determine(&p("C"), &p("Eb"));
    assert_eq!(quality.as_str(), "minor");
    assert_eq!(degree.as_str(), "third");
    let (quality, degree) = interval::determine(&p("C"), &p("F#"));
    assert_eq!(quality.as_str(), "augmented");
    assert_eq!(degree.as_str(), "fourth");
}

#[test]
fn test_chord_symbol_round_trip() {
    let keys = KeyCache::new();
    for symbol in ["C", "F#m7b5", "BbM7", "Ebm", "G7", "Adim7"] {
        let built = chord::from_symbol(symbol, &keys).unwrap();
        assert_eq!(built.symbol(), symbol);
        let classified = chord::classify(&built.notes, true, false, false);
        assert_eq!(classified.first().map(String::as_str), Some(symbol));
    }
}

#[test]
fn test_scale_engine_against_known_spellings() {
    let scales = ScaleEngine::new(Arc::new(KeyCache::new()));
    assert_eq!(
        names(&scales.scale(ScaleKind::MelodicMinor, &p("C")).notes),
        ["C", "D", "Eb", "F", "G", "A", "B"]
    );
    assert_eq!(
        names(&scales.scale(ScaleKind::LydianDominant, &p("C")).notes),
        ["C", "D", "E", "F#", "G", "A", "Bb"]
    );
    assert_eq!(
        names(&scales.scale(ScaleKind::Blues, &p("A")).notes),
        ["A", "C", "D", "Eb", "E", "G"]
    );
}

#[test]
fn test_mode_degrees_agree_with_their_parent_key() {
    // every note of E phrygian is a pitch class of the C major key
    let keys = Arc::new(KeyCache::new());
    let scales = ScaleEngine::new(Arc::clone(&keys));
    let phrygian = scales.scale(ScaleKind::Phrygian, &p("E"));
    let parent: Vec<i32> = keys.notes(&p("C")).iter().map(|n| n.semitone()).collect();
    for note in &phrygian.notes {
        assert!(parent.contains(&note.semitone()), "{}", note.name());
    }
}

#[test]
fn test_chord_scale_suggestions_feed_the_scale_engine() {
    let keys = Arc::new(KeyCache::new());
    let scales = ScaleEngine::new(Arc::clone(&keys));
    let chord = chord::from_symbol("G7", &keys).unwrap();
    let options = scales.scales_for_chord(&chord);
    assert!(!options.is_empty());
    assert_eq!(options[0].kind, ScaleKind::Mixolydian);
    for scale in &options {
        assert_eq!(scale.notes[0].semitone(), 7, "{}", scale.full_name());
    }
}

#[test]
fn test_chord_scale_overrides_from_file() {
    let scales = ScaleEngine::new(Arc::new(KeyCache::new()));
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "C7\tblues, pentatonicMajor").unwrap();
    file.flush().unwrap();

    assert_eq!(scales.load_chord_scales(file.path()).unwrap(), 1);
    let chord = chord::from_symbol("G7", scales.keys()).unwrap();
    let options = scales.scales_for_chord(&chord);
    assert_eq!(options.len(), 2);
    assert_eq!(options[0].kind, ScaleKind::Blues);
}

#[test]
fn test_progression_forward_and_back() {
    let keys = Arc::new(KeyCache::new());
    let analyzer = ProgressionAnalyzer::new(Arc::clone(&keys));
    let key = p("C");

    let chords = analyzer.chords("IIm7,V7,IM7", &key);
    assert_eq!(chords.len(), 3);
    let symbols: Vec<String> = chords.iter().map(|c| c.symbol()).collect();
    assert_eq!(symbols, ["Dm7", "G7", "CM7"]);

    let line = symbols.join(",");
    assert_eq!(analyzer.quick_analysis(&line, &key), "IIm7,V7,IM7");
}

#[test]
fn test_determine_matches_literal_voicings() {
    let analyzer = ProgressionAnalyzer::new(Arc::new(KeyCache::new()));
    let key = p("C");

    let triad = [p("C"), p("E"), p("G")];
    assert_eq!(
        analyzer
            .determine(&triad, &key, true, false, false)
            .first()
            .map(String::as_str),
        Some("I")
    );

    let seventh = [p("G3"), p("B3"), p("D4"), p("F4")];
    assert_eq!(
        analyzer
            .determine(&seventh, &key, true, false, false)
            .first()
            .map(String::as_str),
        Some("V7")
    );
}

#[test]
fn test_out_of_key_chords_pick_up_accidental_prefixes() {
    let analyzer = ProgressionAnalyzer::new(Arc::new(KeyCache::new()));
    assert_eq!(
        analyzer.quick_analysis("G,Bb,F7", &p("G")),
        "I,bIII,bVII7"
    );
}

#[test]
fn test_substitution_round_trip() {
    let analyzer = ProgressionAnalyzer::new(Arc::new(KeyCache::new()));
    let relative_major = analyzer.substitute_minor_for_major("VIm7", false);
    assert_eq!(relative_major, ["IM7"]);
    let back = analyzer.substitute_major_for_minor(&relative_major[0], false);
    assert!(back.contains(&"VIm7".to_string()));
}

#[test]
fn test_substituted_functions_stay_playable() {
    let analyzer = ProgressionAnalyzer::new(Arc::new(KeyCache::new()));
    let key = p("C");
    for function in analyzer.substitute_diminished_for_dominant("VIIdim", false) {
        let chord = analyzer.chord_from_function(&function, &key);
        let chord = chord.unwrap_or_else(|| panic!("{function}"));
        assert_eq!(chord.name, "dom7", "{function}");
        assert_eq!(chord::suffix_of(&chord.notes), Some("7"), "{function}");
    }
}

/// Writer that appends formatted log lines to a shared buffer
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_lookup_misses_warn_instead_of_failing() {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let keys = Arc::new(KeyCache::new());
        let scales = ScaleEngine::new(Arc::clone(&keys));
        let analyzer = ProgressionAnalyzer::new(Arc::clone(&keys));

        assert!(scales.scale_named("mystery", &p("C")).is_none());
        assert!(scales.scales_for_symbol("zzz").is_empty());
        let cluster = [p("C"), p("C#"), p("D")];
        assert!(analyzer.determine(&cluster, &p("C"), true, false, false).is_empty());
    });

    let log = capture.contents();
    assert!(log.contains("unknown scale name"), "{log}");
    assert!(log.contains("no scales listed for chord"), "{log}");
    assert!(log.contains("no functional interpretation"), "{log}");
}

#[test]
fn test_accidental_arithmetic_fixtures() {
    assert_eq!(interval_diff(Numeral::I, Numeral::VI, 9), 0);
    assert_eq!(clean_accidentals(7), "b");
    assert_eq!(clean_accidentals(-8), "bb");
    assert_eq!(clean_accidentals(3), "###");
}
