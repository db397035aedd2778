//! Locale-style number formatting and free-text numeric input handling
//!
//! Values are displayed with a comma as decimal separator. While typing, a
//! field tolerates partial input (`"12,"`) and only commits once the text is
//! a complete number; on blur it is reformatted to exactly two decimals.

use regex::Regex;
use std::sync::LazyLock;

static TWO_DECIMAL_CUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+[.,]\d{0,2}).*").expect("valid regex"));

static COMPLETE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d*[.,]?\d{0,2}$").expect("valid regex"));

/// Format with exactly two decimals and a comma separator (`210,00`)
pub fn format_mm(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    format!("{:.2}", value).replace('.', ",")
}

/// Format for an input field: shortest representation, comma separator (`12,5`)
pub fn format_input_value(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded).replace('.', ",")
}

/// Keep only digits and separators, and drop anything after two fractional digits
pub fn sanitize_numeric_input(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    TWO_DECIMAL_CUT.replace(&filtered, "$1").into_owned()
}

/// Whether `text` is a number that can be committed while typing
pub fn is_complete_number(text: &str) -> bool {
    !text.is_empty() && text != "." && text != "," && COMPLETE_NUMBER.is_match(text)
}

/// Parse a comma or dot decimal
pub fn parse_numeric(text: &str) -> Option<f64> {
    let value: f64 = text.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Step a value up or down by 1 (or 10 when `coarse`).
///
/// Lands on the next multiple of the step in the direction of travel and always
/// moves by at least one step. The result never goes below `floor`.
pub fn step_value(current: f64, up: bool, coarse: bool, floor: f64) -> f64 {
    let step = if coarse { 10.0 } else { 1.0 };
    let mut next = if up {
        (current / step).ceil() * step
    } else {
        (current / step).floor() * step
    };
    if next == current {
        next += if up { step } else { -step };
    }
    next.max(floor)
}

/// Human readable page size, e.g. `210 × 297 mm` or `215,9 × 279,4 mm`
pub fn format_size_mm(width: f64, height: f64) -> String {
    fn fmt(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{}", value)
        } else {
            format!("{:.1}", value).replace('.', ",")
        }
    }
    format!("{} × {} mm", fmt(width), fmt(height))
}

/// Human readable byte count
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// One free-text numeric input (trim, adjuster width or height).
///
/// The field keeps the text the user is typing separately from the last
/// committed value, so partial input never reaches the model.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    text: String,
    value: f64,
    floor: f64,
}

impl NumericField {
    pub fn new(value: f64, floor: f64) -> Self {
        Self {
            text: format_input_value(value),
            value,
            floor,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for UI toolkits that edit the string in place.
    /// Call [`NumericField::on_input`] with the edited text afterwards.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Handle a keystroke. Returns the value to commit, if any.
    pub fn on_input(&mut self, raw: &str) -> Option<f64> {
        self.text = sanitize_numeric_input(raw);
        if !is_complete_number(&self.text) {
            return None;
        }
        let value = parse_numeric(&self.text)?;
        if value < self.floor {
            return None;
        }
        self.value = value;
        Some(value)
    }

    /// Reformat to two decimals and commit. Invalid text reverts to the last value.
    pub fn on_blur(&mut self) -> Option<f64> {
        match parse_numeric(&self.text) {
            Some(value) => {
                let value = value.max(self.floor);
                self.value = value;
                self.text = format_mm(value);
                Some(value)
            }
            None => {
                self.text = format_mm(self.value);
                None
            }
        }
    }

    /// Arrow-key stepping
    pub fn on_step(&mut self, up: bool, coarse: bool) -> f64 {
        let current = parse_numeric(&self.text).unwrap_or(0.0);
        let next = step_value(current, up, coarse, self.floor);
        self.value = next;
        self.text = format_input_value(next);
        next
    }

    /// Follow a value changed elsewhere (mode switch, preset, trim sync)
    pub fn sync(&mut self, value: f64) {
        if (value - self.value).abs() > f64::EPSILON {
            self.value = value;
            self.text = format_input_value(value);
        }
    }
}
