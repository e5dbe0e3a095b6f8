//! Number formatting and chart palette shared by every view model.

/// Categorical colours for bars and donut segments.
pub const PALETTE: [&str; 6] = [
    "#4f7cff", "#22b07d", "#f5a524", "#e5484d", "#8e4ec6", "#12a4b8",
];

/// Donut colours: correct, wrong, skipped.
pub const OUTCOME_COLORS: [&str; 3] = ["#22b07d", "#e5484d", "#a0a7b4"];

/// Palette colour for the `index`-th series item, cycling.
#[must_use]
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn sanitize(ratio: f64) -> f64 {
    if ratio.is_finite() { ratio } else { 0.0 }
}

/// Headline percentage of a `0..=1` ratio, no decimals: `"89%"`.
#[must_use]
pub fn percent_headline(ratio: f64) -> String {
    format!("{:.0}%", sanitize(ratio) * 100.0)
}

/// Secondary percentage of a `0..=1` ratio, one decimal: `"88.9%"`.
#[must_use]
pub fn percent_detail(ratio: f64) -> String {
    format!("{:.1}%", sanitize(ratio) * 100.0)
}

/// Bar width in percent, clamped to `[0, 100]`.
#[must_use]
pub fn clamp_width(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Width of `part` relative to `whole`, clamped; 0 when `whole` is 0.
#[must_use]
pub fn share_width(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 || !whole.is_finite() {
        return 0.0;
    }
    clamp_width(part / whole * 100.0)
}

/// Inline style for a horizontal or vertical bar.
#[must_use]
pub fn width_style(percent: f64) -> String {
    format!("width: {:.1}%", clamp_width(percent))
}

#[must_use]
pub fn height_style(percent: f64) -> String {
    format!("height: {:.1}%", clamp_width(percent))
}

/// One decimal, trailing `.0` dropped: `3`, `2.5`.
#[must_use]
pub fn format_score(value: f64) -> String {
    let value = sanitize(value);
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
