#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use tube_elo::{EloRating, RatingSystem, Score};

#[derive(Arbitrary)]
struct Encounter {
    first: f64,
    second: f64,
    k_factor: f64,
    score: u8,
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(encounter) = Encounter::arbitrary(&mut u) else {
        return;
    };
    if !encounter.first.is_finite()
        || !encounter.second.is_finite()
        || !encounter.k_factor.is_finite()
    {
        return;
    }

    let first = EloRating(encounter.first.clamp(-10000.0, 10000.0));
    let second = EloRating(encounter.second.clamp(-10000.0, 10000.0));
    let score = match encounter.score % 3 {
        0 => Score::LOSS,
        1 => Score::DRAW,
        _ => Score::WIN,
    };

    let rating_system = RatingSystem::builder()
        .k_factor(encounter.k_factor.abs().min(1000.0))
        .build();

    let (new_first, new_second) = rating_system.update_ratings(first, second, score);
    assert!(new_first.0.is_finite());
    assert!(new_second.0.is_finite());

    let gained = new_first.0 - first.0;
    let lost = second.0 - new_second.0;
    assert!((gained - lost).abs() < 1e-6);
});
