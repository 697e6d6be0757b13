/// Decimal precision for metric calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for values rendered into coaching messages
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Seconds per day, for holding-period conversion
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Length of the random suffix appended to coaching action ids
pub const ACTION_ID_SUFFIX_LEN: usize = 8;
