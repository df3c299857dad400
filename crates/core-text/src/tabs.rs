//! Logical↔visual column mapping.
//!
//! Both directions replay the tab-expansion rule rather than consulting the
//! render cache, so they stay correct mid-mutation. The two functions agree:
//! `cx_to_rx(row, rx_to_cx(row, rx))` lands on the tab-stop-aligned cell
//! containing `rx`.

/// Columns per tab stop.
pub const TAB_STOP: usize = 8;

/// Visual column of logical index `cx` within `chars`.
pub fn cx_to_rx(chars: &str, cx: usize) -> usize {
    let mut rx = 0;
    for c in chars.chars().take(cx) {
        if c == '\t' {
            rx += (TAB_STOP - 1) - (rx % TAB_STOP);
        }
        rx += 1;
    }
    rx
}

/// Logical index whose cell span contains visual column `rx`, clamped to
/// the row length when `rx` exceeds the row's visual width.
pub fn rx_to_cx(chars: &str, rx: usize) -> usize {
    let mut cur_rx = 0;
    for (cx, c) in chars.chars().enumerate() {
        if c == '\t' {
            cur_rx += (TAB_STOP - 1) - (cur_rx % TAB_STOP);
        }
        cur_rx += 1;
        if cur_rx > rx {
            return cx;
        }
    }
    chars.chars().count()
}
