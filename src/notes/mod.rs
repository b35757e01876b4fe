//! Equal-tempered note table for the piano picker.

pub const SUPPORTED_KEY_COUNTS: [usize; 3] = [12, 36, 60];
pub const DEFAULT_KEY_COUNT: usize = 36;

/// Piano key number of concert A (440 Hz).
const REFERENCE_KEY: i32 = 49;
const REFERENCE_HZ: f64 = 440.0;
/// Lowest key whose octave gets a name prefix; key 28 is the C an octave below "Low C".
const LOWEST_NAMED_KEY: i32 = 28;

const KEY_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];
const OCTAVE_NAMES: [&str; 5] = ["Lower", "Low", "Middle", "High", "Higher"];

#[derive(Debug, Clone, PartialEq)]
pub struct NoteEntry {
    pub name: String,
    pub frequency_hz: f64,
}

/// Snaps an arbitrary key count to a supported one.
pub fn resolve_key_count(requested: usize) -> usize {
    if SUPPORTED_KEY_COUNTS.contains(&requested) {
        requested
    } else {
        tracing::warn!(
            requested,
            default = DEFAULT_KEY_COUNT,
            "unsupported piano key count"
        );
        DEFAULT_KEY_COUNT
    }
}

const fn first_key(key_count: usize) -> i32 {
    match key_count {
        60 => 28,
        _ => 40,
    }
}

pub fn key_frequency(key: i32) -> f64 {
    REFERENCE_HZ * 2f64.powf(f64::from(key - REFERENCE_KEY) / 12.0)
}

fn key_name(key: i32) -> String {
    let offset = key - LOWEST_NAMED_KEY;
    let pitch = KEY_NAMES[offset.rem_euclid(12) as usize];
    match usize::try_from(offset.div_euclid(12))
        .ok()
        .and_then(|octave| OCTAVE_NAMES.get(octave))
    {
        Some(octave) => format!("{octave} {pitch}"),
        None => pitch.to_string(),
    }
}

/// One entry per key, ascending. Unsupported counts fall back to the default keyboard.
pub fn note_table(key_count: usize) -> Vec<NoteEntry> {
    let key_count = resolve_key_count(key_count);
    let start = first_key(key_count);
    let end = start + i32::try_from(key_count).unwrap_or(0);
    (start..end)
        .map(|key| NoteEntry {
            name: key_name(key),
            frequency_hz: key_frequency(key),
        })
        .collect()
}

/// Index of the entry within `epsilon_hz` of `frequency`, if any.
pub fn matching_entry(entries: &[NoteEntry], frequency: f64, epsilon_hz: f64) -> Option<usize> {
    entries
        .iter()
        .position(|entry| (entry.frequency_hz - frequency).abs() <= epsilon_hz)
}

/// Entry closest to `frequency`; used to pick the initial highlighted key.
pub fn nearest_entry(entries: &[NoteEntry], frequency: f64) -> Option<usize> {
    entries
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a.frequency_hz - frequency)
                .abs()
                .total_cmp(&(b.frequency_hz - frequency).abs())
        })
        .map(|(index, _)| index)
}

pub fn display_text(entries: &[NoteEntry], frequency: f64, epsilon_hz: f64) -> String {
    match matching_entry(entries, frequency, epsilon_hz) {
        Some(index) => entries[index].name.clone(),
        None => format!("{frequency:.2} Hz"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keyboard_starts_at_low_c() {
        let entries = note_table(DEFAULT_KEY_COUNT);
        assert_eq!(entries.len(), 36);
        assert_eq!(entries[0].name, "Low C");
        assert!((entries[0].frequency_hz - 261.63).abs() < 0.01);
        assert_eq!(entries[1].name, "Low C#");
        assert_eq!(entries[12].name, "Middle C");
    }

    #[test]
    fn concert_a_is_exact() {
        let entries = note_table(12);
        let a = entries
            .iter()
            .find(|entry| entry.name == "Low A")
            .expect("twelve keys include an A");
        assert_eq!(a.frequency_hz, 440.0);
    }

    #[test]
    fn sixty_keys_span_five_named_octaves() {
        let entries = note_table(60);
        assert_eq!(entries.len(), 60);
        assert_eq!(entries[0].name, "Lower C");
        assert_eq!(entries[59].name, "Higher B");
    }

    #[test]
    fn frequencies_ascend() {
        let entries = note_table(60);
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].frequency_hz < pair[1].frequency_hz));
    }

    #[test]
    fn unsupported_key_count_uses_default() {
        assert_eq!(resolve_key_count(24), DEFAULT_KEY_COUNT);
        assert_eq!(note_table(7).len(), DEFAULT_KEY_COUNT);
    }

    #[test]
    fn display_text_names_close_frequencies() {
        let entries = note_table(36);
        assert_eq!(display_text(&entries, 261.0, 1.0), "Low C");
        assert_eq!(display_text(&entries, 300.0, 1.0), "300.00 Hz");
        assert_eq!(display_text(&entries, 123.456, 1.0), "123.46 Hz");
    }

    #[test]
    fn nearest_entry_snaps_off_table_values() {
        let entries = note_table(12);
        assert_eq!(nearest_entry(&entries, 445.0), Some(9));
        assert_eq!(nearest_entry(&[], 445.0), None);
    }
}
