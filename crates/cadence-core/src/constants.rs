/// Number of occurrences produced when neither the rule nor the caller caps the sequence.
pub const DEFAULT_OCCURRENCE_COUNT: u32 = 52;

/// Timezone applied to rules that carry no `tzId`.
pub const DEFAULT_TZID: &str = "UTC";

/// Log filter used until configuration has been loaded.
pub const DEFAULT_LOG_LEVEL: &str = "info";
