use serde::Serialize;

/// A Hebrew voice offered by the synthesis provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceOption {
    pub id: &'static str,
    pub display_name: &'static str,
}

/// A speaking rate multiplier offered to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedOption {
    #[serde(rename = "id")]
    pub multiplier: f64,
    pub display_name: &'static str,
}

/// Provider-accepted speaking rate range
pub const MIN_SPEAKING_RATE: f64 = 0.25;
pub const MAX_SPEAKING_RATE: f64 = 4.0;

const SPEED_TOLERANCE: f64 = 1e-6;

// Identifiers are never reused for a different physical voice; new voices are
// appended, never renamed.
const VOICES: &[VoiceOption] = &[
    VoiceOption {
        id: "he-IL-Chirp3-HD-Puck",
        display_name: "פאק - גבר (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Charon",
        display_name: "כארון - גבר (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Fenrir",
        display_name: "פנריר - גבר (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Orus",
        display_name: "אורוס - גבר (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Kore",
        display_name: "קורה - אישה (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Aoede",
        display_name: "איאודה - אישה (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Leda",
        display_name: "לדה - אישה (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Chirp3-HD-Zephyr",
        display_name: "זפיר - אישה (Chirp3 HD)",
    },
    VoiceOption {
        id: "he-IL-Wavenet-A",
        display_name: "דוד - גבר (Wavenet)",
    },
    VoiceOption {
        id: "he-IL-Wavenet-B",
        display_name: "שרה - אישה (Wavenet)",
    },
    VoiceOption {
        id: "he-IL-Wavenet-C",
        display_name: "רות - אישה (Wavenet)",
    },
    VoiceOption {
        id: "he-IL-Wavenet-D",
        display_name: "יוסי - גבר (Wavenet)",
    },
    VoiceOption {
        id: "he-IL-Standard-A",
        display_name: "דוד - גבר (Standard)",
    },
    VoiceOption {
        id: "he-IL-Standard-B",
        display_name: "שרה - אישה (Standard)",
    },
    VoiceOption {
        id: "he-IL-Standard-C",
        display_name: "רות - אישה (Standard)",
    },
    VoiceOption {
        id: "he-IL-Standard-D",
        display_name: "יוסי - גבר (Standard)",
    },
];

const SPEEDS: &[SpeedOption] = &[
    SpeedOption {
        multiplier: 0.75,
        display_name: "איטי (0.75x)",
    },
    SpeedOption {
        multiplier: 1.0,
        display_name: "רגיל (1.0x)",
    },
    SpeedOption {
        multiplier: 1.25,
        display_name: "מהיר (1.25x)",
    },
    SpeedOption {
        multiplier: 1.5,
        display_name: "מהיר מאוד (1.5x)",
    },
];

/// All voices, in display order. The first one is the default.
pub fn voices() -> &'static [VoiceOption] {
    VOICES
}

/// All speeds, in display order
pub fn speeds() -> &'static [SpeedOption] {
    SPEEDS
}

pub fn default_voice() -> &'static VoiceOption {
    &VOICES[0]
}

pub fn default_speed() -> &'static SpeedOption {
    &SPEEDS[1]
}

pub fn find_voice(id: &str) -> Option<&'static VoiceOption> {
    VOICES.iter().find(|v| v.id == id)
}

pub fn is_supported_speed(speed: f64) -> bool {
    SPEEDS
        .iter()
        .any(|s| (s.multiplier - speed).abs() < SPEED_TOLERANCE)
}

pub fn is_within_provider_range(speed: f64) -> bool {
    speed.is_finite() && (MIN_SPEAKING_RATE..=MAX_SPEAKING_RATE).contains(&speed)
}
