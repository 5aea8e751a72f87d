//! The fixed set of notification sounds Pushover accepts.

/// Sound used whenever a requested sound is not recognised.
pub const DEFAULT_SOUND: &str = "pushover";

/// Every sound identifier the provider understands.
pub const ALLOWED_SOUNDS: [&str; 22] = [
    "pushover",
    "bike",
    "bugle",
    "cashregister",
    "classical",
    "cosmic",
    "falling",
    "gamelan",
    "incoming",
    "intermission",
    "magic",
    "mechanical",
    "pianobar",
    "siren",
    "spacealarm",
    "tugboat",
    "alien",
    "climb",
    "persistent",
    "echo",
    "updown",
    "none",
];

/// Returns `true` if `sound` is one of [`ALLOWED_SOUNDS`] (case-sensitive).
pub fn is_allowed(sound: &str) -> bool {
    ALLOWED_SOUNDS.contains(&sound)
}

/// Coerces `sound` into the allowed set.
///
/// Unknown values fall back to [`DEFAULT_SOUND`] instead of being rejected.
pub fn coerce(sound: &str) -> &str {
    if is_allowed(sound) {
        sound
    } else {
        tracing::warn!(sound, fallback = DEFAULT_SOUND, "Unknown Pushover sound, using fallback");
        DEFAULT_SOUND
    }
}
