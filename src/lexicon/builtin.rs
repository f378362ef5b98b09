//! Built-in ISL data for the mixamo rig shipped with the player
//! (`/models/xbot.glb`, `/models/ybot.glb`).

use std::f32::consts::PI;

use crate::lexicon::bone::{Axis, BoneSequence, BoneTarget, Direction};
use crate::lexicon::clips::ClipRepository;
use crate::lexicon::table::{BoneLexicon, SequenceRecorder};

const NECK: &str = "mixamorigNeck";
const LEFT_ARM: &str = "mixamorigLeftArm";
const LEFT_FORE_ARM: &str = "mixamorigLeftForeArm";
const LEFT_HAND: &str = "mixamorigLeftHand";
const RIGHT_ARM: &str = "mixamorigRightArm";
const RIGHT_FORE_ARM: &str = "mixamorigRightForeArm";
const RIGHT_HAND: &str = "mixamorigRightHand";

const FINGERS: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];

/// Per-letter right-hand shapes: curl per finger (thumb → pinky, radians per
/// joint, 0 = extended) and wrist twist around Y.
const HANDSHAPES: [(char, [f32; 5], f32); 26] = [
    ('A', [0.0, 1.4, 1.4, 1.4, 1.4], 0.0),
    ('B', [1.0, 0.0, 0.0, 0.0, 0.0], 0.0),
    ('C', [0.4, 0.6, 0.6, 0.6, 0.6], PI / 2.0),
    ('D', [0.8, 0.0, 1.2, 1.2, 1.2], 0.0),
    ('E', [1.2, 1.0, 1.0, 1.0, 1.0], 0.0),
    ('F', [0.8, 1.0, 0.0, 0.0, 0.0], 0.0),
    ('G', [0.0, 0.0, 1.4, 1.4, 1.4], PI / 2.0),
    ('H', [1.0, 0.0, 0.0, 1.4, 1.4], PI / 2.0),
    ('I', [1.0, 1.4, 1.4, 1.4, 0.0], 0.0),
    ('J', [1.0, 1.4, 1.4, 1.4, 0.0], PI / 3.0),
    ('K', [0.2, 0.0, 0.0, 1.4, 1.4], 0.0),
    ('L', [0.0, 0.0, 1.4, 1.4, 1.4], 0.0),
    ('M', [1.2, 1.0, 1.0, 1.0, 1.4], 0.0),
    ('N', [1.2, 1.0, 1.0, 1.4, 1.4], 0.0),
    ('O', [0.6, 0.9, 0.9, 0.9, 0.9], PI / 2.0),
    ('P', [0.2, 0.0, 0.4, 1.4, 1.4], PI),
    ('Q', [0.0, 0.4, 1.4, 1.4, 1.4], PI),
    ('R', [1.0, 0.0, 0.1, 1.4, 1.4], 0.0),
    ('S', [1.0, 1.4, 1.4, 1.4, 1.4], 0.0),
    ('T', [0.5, 1.2, 1.4, 1.4, 1.4], 0.0),
    ('U', [1.0, 0.0, 0.0, 1.4, 1.4], 0.0),
    ('V', [1.0, 0.0, 0.0, 1.4, 1.4], PI / 8.0),
    ('W', [1.0, 0.0, 0.0, 0.0, 1.4], 0.0),
    ('X', [1.0, 0.7, 1.4, 1.4, 1.4], 0.0),
    ('Y', [0.0, 1.4, 1.4, 1.4, 0.0], 0.0),
    ('Z', [1.0, 0.0, 1.4, 1.4, 1.4], PI / 4.0),
];

/// The neutral pose the avatar returns to on load, stop and reset.
#[must_use]
pub fn rest_pose() -> BoneSequence {
    BoneSequence::new(vec![
        BoneTarget::rotation(NECK, Axis::X, PI / 12.0, Direction::Increase),
        BoneTarget::rotation(LEFT_ARM, Axis::Z, -PI / 3.0, Direction::Decrease),
        BoneTarget::rotation(LEFT_FORE_ARM, Axis::Y, -PI / 1.5, Direction::Decrease),
        BoneTarget::rotation(RIGHT_ARM, Axis::Z, PI / 3.0, Direction::Increase),
        BoneTarget::rotation(RIGHT_FORE_ARM, Axis::Y, PI / 1.5, Direction::Increase),
    ])
}

fn raise_right_hand(r: &mut SequenceRecorder) {
    r.rotate(RIGHT_ARM, Axis::Z, PI / 6.0, Direction::Decrease)
        .rotate(RIGHT_ARM, Axis::X, -PI / 6.0, Direction::Decrease)
        .rotate(RIGHT_FORE_ARM, Axis::Y, PI / 2.5, Direction::Decrease)
        .rotate(RIGHT_FORE_ARM, Axis::Z, PI / 3.0, Direction::Increase);
}

/// Opens the right hand flat, then curls it into `curls` and twists the
/// wrist to `twist`. Opening first keeps every direction valid whatever
/// handshape came before, since curls and twists are never negative.
fn shape_right_hand(r: &mut SequenceRecorder, curls: [f32; 5], twist: f32) {
    for finger in FINGERS {
        for joint in 1..=3 {
            r.rotate(&format!("{RIGHT_HAND}{finger}{joint}"), Axis::Z, 0.0, Direction::Decrease);
        }
    }
    r.rotate(RIGHT_HAND, Axis::Y, 0.0, Direction::Decrease);
    r.push_sequence();

    for (finger, curl) in FINGERS.iter().zip(curls) {
        if curl > 0.0 {
            for joint in 1..=3 {
                r.rotate(&format!("{RIGHT_HAND}{finger}{joint}"), Axis::Z, curl, Direction::Increase);
            }
        }
    }
    if twist > 0.0 {
        r.rotate(RIGHT_HAND, Axis::Y, twist, Direction::Increase);
    }
}

/// Letters A–Z plus a handful of common words.
#[must_use]
pub fn builtin_lexicon() -> BoneLexicon {
    let mut lexicon = BoneLexicon::new();

    for (letter, curls, twist) in HANDSHAPES {
        lexicon.record_letter(letter, |r| {
            raise_right_hand(r);
            shape_right_hand(r, curls, twist);
        });
    }

    // Roof shape over the chest, then drop.
    lexicon.record_word("HOME", |r| {
        r.rotate(LEFT_ARM, Axis::Z, -PI / 6.0, Direction::Increase)
            .rotate(RIGHT_ARM, Axis::Z, PI / 6.0, Direction::Decrease)
            .rotate(LEFT_FORE_ARM, Axis::Z, -PI / 3.0, Direction::Decrease)
            .rotate(RIGHT_FORE_ARM, Axis::Z, PI / 3.0, Direction::Increase)
            .rotate(LEFT_HAND, Axis::X, PI / 6.0, Direction::Increase)
            .rotate(RIGHT_HAND, Axis::X, PI / 6.0, Direction::Increase);
        r.push_sequence();
        r.rotate(LEFT_FORE_ARM, Axis::Z, 0.0, Direction::Increase)
            .rotate(RIGHT_FORE_ARM, Axis::Z, 0.0, Direction::Decrease);
    });

    // Tap the left wrist with the right index finger.
    lexicon.record_word("TIME", |r| {
        r.rotate(LEFT_ARM, Axis::Z, -PI / 5.0, Direction::Increase)
            .rotate(LEFT_FORE_ARM, Axis::Y, -PI / 2.0, Direction::Increase);
        raise_right_hand(r);
        shape_right_hand(r, [1.0, 0.0, 1.4, 1.4, 1.4], 0.0);
        r.push_sequence();
        r.rotate(RIGHT_FORE_ARM, Axis::Z, PI / 2.5, Direction::Increase);
        r.push_sequence();
        r.rotate(RIGHT_FORE_ARM, Axis::Z, PI / 3.0, Direction::Decrease);
    });

    // Point forward.
    lexicon.record_word("YOU", |r| {
        raise_right_hand(r);
        shape_right_hand(r, [1.0, 0.0, 1.4, 1.4, 1.4], 0.0);
        r.rotate(RIGHT_FORE_ARM, Axis::X, -PI / 4.0, Direction::Decrease);
    });

    // Both flat hands trace the body downwards.
    lexicon.record_word("PERSON", |r| {
        r.rotate(LEFT_ARM, Axis::Z, -PI / 4.0, Direction::Increase)
            .rotate(RIGHT_ARM, Axis::Z, PI / 4.0, Direction::Decrease)
            .rotate(LEFT_FORE_ARM, Axis::Y, -PI / 3.0, Direction::Increase)
            .rotate(RIGHT_FORE_ARM, Axis::Y, PI / 3.0, Direction::Decrease);
        r.push_sequence();
        r.rotate(LEFT_ARM, Axis::Z, -PI / 3.0, Direction::Decrease)
            .rotate(RIGHT_ARM, Axis::Z, PI / 3.0, Direction::Increase);
    });

    lexicon
}

/// Phrase clips served by the web front end under `/glb/`.
#[must_use]
pub fn builtin_clips() -> ClipRepository {
    let mut repo = ClipRepository::new();
    for phrase in [
        "hello",
        "how are you",
        "i am fine",
        "thank you",
        "welcome",
        "good morning",
        "good night",
        "yes",
        "no",
    ] {
        repo.insert(phrase, format!("/glb/{}.glb", phrase.replace(' ', "_")));
    }
    repo
}
