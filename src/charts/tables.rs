//! Static optotype tables.
//!
//! Heights follow the 6/6 = 8.87 mm reference at 6 m: a 6/X line is
//! `(X / 6) * 8.87` mm tall, rounded to one decimal.

use super::{ChartLine, LineSpacing};

const fn line(
    acuity: &'static str,
    glyphs: &'static [&'static str],
    height_mm: f64,
) -> ChartLine {
    ChartLine {
        acuity,
        glyphs,
        height_mm,
        spacing: LineSpacing::Tight,
    }
}

pub(super) const SNELLEN: &[ChartLine] = &[
    line("6/60", &["A"], 88.7),
    line("6/36", &["O", "X"], 53.2),
    line("6/24", &["H", "V", "T"], 35.5),
    line("6/18", &["X", "A", "U"], 26.6),
    line("6/12", &["V", "O", "T", "H"], 17.7),
    line("6/9", &["X", "A", "M", "U", "T"], 13.3),
    line("6/6", &["V", "H", "A", "I", "X", "U", "Y"], 8.9),
    line("6/5", &["A", "U", "T", "H", "Y", "M", "X", "V"], 7.4),
];

pub(super) const HINDI: &[ChartLine] = &[
    line("6/60", &["र"], 88.7),
    line("6/36", &["त", "प"], 53.2),
    line("6/24", &["न", "ग", "ट"], 35.5),
    line("6/18", &["म", "त", "र", "फ"], 26.6),
    line("6/12", &["ग", "ड", "त", "र", "व", "म"], 17.7),
    line("6/9", &["फ", "न", "र", "व", "म"], 13.3),
    line("6/6", &["ट", "म", "ग", "प", "त"], 8.9),
];

pub(super) const NUMERIC: &[ChartLine] = &[
    line("6/60", &["7"], 88.7),
    line("6/36", &["4", "2"], 53.2),
    line("6/24", &["5", "8", "3"], 35.5),
    line("6/18", &["6", "9", "2", "4"], 26.6),
    line("6/12", &["3", "7", "5", "8"], 17.7),
    line("6/9", &["2", "6", "4", "9", "5"], 13.3),
    line("6/6", &["8", "3", "7", "2", "6", "4"], 8.9),
    line("6/5", &["5", "9", "3", "6", "2", "8", "7"], 7.4),
];

pub(super) const LANDOLT_C: &[ChartLine] = &[
    line("6/60", &["C"], 88.7),
    line("6/36", &["C", "C"], 53.2),
    line("6/24", &["C", "C", "C"], 35.5),
    line("6/18", &["C", "C", "C", "C"], 26.6),
    line("6/12", &["C", "C", "C", "C", "C"], 17.7),
    line("6/9", &["C", "C", "C", "C", "C", "C"], 13.3),
    line("6/6", &["C", "C", "C", "C", "C", "C", "C"], 8.9),
    line("6/5", &["C", "C", "C", "C", "C", "C", "C", "C"], 7.4),
    line("6/4", &["C", "C", "C", "C", "C", "C", "C", "C", "C"], 5.9),
];
