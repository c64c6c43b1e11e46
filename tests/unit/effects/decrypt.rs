use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::clock::timers::Timers;

fn session(text: &str, rate: f64) -> DecryptSession {
    let mut timers = Timers::new();
    let task = timers.schedule_interval(0.03);
    let mut spec = DecryptSpec::new(TargetId(0), text);
    spec.rate = rate;
    DecryptSession::new(&spec, task)
}

#[test]
fn reveal_boundary_is_exact_at_integer_crossings() {
    assert_eq!(reveal_count(0, 1.0 / 3.0), 0);
    assert_eq!(reveal_count(2, 1.0 / 3.0), 0);
    assert_eq!(reveal_count(3, 1.0 / 3.0), 1);
    assert_eq!(reveal_count(30, 1.0 / 3.0), 10);
    assert_eq!(reveal_count(10, 0.1), 1);
}

#[test]
fn completes_in_ceil_len_over_rate_ticks() {
    for (text, rate) in [
        ("SYSTEM_REBOOT", 1.0 / 3.0),
        ("ENTROPY", 0.5),
        ("AB", 0.3),
        ("X", 2.0),
    ] {
        let mut rng = StdRng::seed_from_u64(7);
        let mut s = session(text, rate);
        let expected = ticks_to_complete(text.chars().count(), rate);
        assert_eq!(
            expected,
            (text.chars().count() as f64 / rate).ceil() as u32,
            "{text}"
        );
        let mut last = String::new();
        while !s.is_complete() {
            last = s.tick(&mut rng);
            assert!(s.ticks() <= expected, "{text} overran");
        }
        assert_eq!(s.ticks(), expected, "{text}");
        assert_eq!(last, text);
        assert_eq!(s.final_text(), text);
    }
}

#[test]
fn scrambled_tail_uses_the_alphabet_and_keeps_length() {
    let mut rng = StdRng::seed_from_u64(42);
    let text: Vec<char> = "DECRYPT".chars().collect();
    let alphabet: Vec<char> = "#".chars().collect();
    let out = render_reveal(&text, 3, &alphabet, &mut rng);
    assert_eq!(out, "DEC####");

    let alphabet: Vec<char> = GLYPH_ALPHABET.chars().collect();
    let out = render_reveal(&text, 0, &alphabet, &mut rng);
    assert_eq!(out.chars().count(), text.len());
    assert!(out.chars().all(|c| alphabet.contains(&c)));
}

#[test]
fn default_filler_is_uppercase_letters() {
    let mut rng = StdRng::seed_from_u64(3);
    let spec = DecryptSpec::new(TargetId(0), "ENTROPY");
    let alphabet: Vec<char> = spec.alphabet.chars().collect();
    assert_eq!(alphabet.len(), 26);
    let text: Vec<char> = spec.text.chars().collect();
    let out = render_reveal(&text, 0, &alphabet, &mut rng);
    assert!(out.chars().all(|c| c.is_ascii_uppercase()), "{out}");
}

#[test]
fn invalid_specs_are_rejected() {
    let mut spec = DecryptSpec::new(TargetId(0), "x");
    spec.rate = 0.0;
    assert!(spec.validate().is_err());
    let mut spec = DecryptSpec::new(TargetId(0), "x");
    spec.alphabet.clear();
    assert!(spec.validate().is_err());
    assert!(DecryptSpec::new(TargetId(0), "x").validate().is_ok());
}
