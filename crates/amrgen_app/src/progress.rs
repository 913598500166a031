use indicatif::ProgressStyle;

/// Progress bar in the style
/// `<prefix> ####.... <pos>/<len> Steps, <message>`
pub fn run_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix:.bold.dim} {bar:.cyan/blue} {human_pos}/{human_len} Steps, {wide_msg}",
    )
    .unwrap()
}

/// Progress bar in the style
/// `<prefix> ####.... <pos>/<len> levels`
pub fn level_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix:.bold.dim} {bar:.cyan/blue} {human_pos}/{human_len} levels",
    )
    .unwrap()
}
