/// Knobs that tighten how strictly record headers are checked.
///
/// Both options default to off, which matches what the framework's own
/// reader does.
///
/// ```text
/// ┌─────────────────────────┬─────────┬─────────────────────────────────────────┐
/// │ Field                   │ Default │ Effect                                  │
/// ├─────────────────────────┼─────────┼─────────────────────────────────────────┤
/// │ strict_prefix_length    │ false   │ prefix-rooted classes assert their      │
/// │                         │         │ declared byte count like object-rooted  │
/// │ require_byte_count_flag │ false   │ reject prefixes without the count flag  │
/// └─────────────────────────┴─────────┴─────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Assert `position == end` after a prefix-rooted class record, the
    /// same way object-rooted records always do. Only applies to
    /// single-record reads; the memberwise path has no per-instance
    /// header to check against.
    pub strict_prefix_length: bool,

    /// Fail with `MissingByteCountFlag` when a byte-count prefix read by a
    /// class, object-header or sequence reader lacks the flag bit.
    pub require_byte_count_flag: bool,
}

impl ReadOptions {
    /// Both checks enabled.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_prefix_length: true,
            require_byte_count_flag: true,
        }
    }
}
