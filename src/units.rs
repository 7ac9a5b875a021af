//! Time units accepted by a rate specification and their millisecond conversions.

/// A time unit a caller may express a rate in.
///
/// The conversion table is bit-exact: [`TimeUnit::Month`] is defined as
/// exactly 31 days, not a calendar month. Callers sensitive to calendar
/// months should account for the difference themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Month,
}

impl TimeUnit {
    /// Length of this unit in milliseconds.
    pub const fn to_ms(self) -> f64 {
        match self {
            TimeUnit::Microsecond => 0.001,
            TimeUnit::Millisecond => 1.0,
            TimeUnit::Second => 1_000.0,
            TimeUnit::Minute => 60_000.0,
            TimeUnit::Hour => 3_600_000.0,
            TimeUnit::Day => 86_400_000.0,
            TimeUnit::Month => 2_678_400_000.0,
        }
    }
}
