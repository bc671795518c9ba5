//! Formatting measurements as strings

use std::fmt;

use mensura_core::{Decimal, Precision, RoundingMode};

use crate::{Measurement, Result};

/// Per-call override of a value formatter: receives the (rounded) value,
/// the unit and the measurement, and returns the complete output
pub type ValueFormatter<'a> = &'a dyn Fn(&Decimal, &str, &Measurement) -> String;

/// What follows the number
#[derive(Clone, Copy, Default)]
pub enum Suffix<'a> {
    /// The unit name
    #[default]
    Unit,
    /// Literal text; a `%` inside turns it into a template for the value
    Text(&'a str),
    /// Full override
    Custom(ValueFormatter<'a>),
}

impl fmt::Debug for Suffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suffix::Unit => write!(f, "Unit"),
            Suffix::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Suffix::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Formatting options
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions<'a> {
    pub suffix: Suffix<'a>,
    pub unit: Option<&'a str>,
    pub scale: Option<u32>,
    pub rounding: RoundingMode,
}

impl<'a> FormatOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suffix(mut self, suffix: Suffix<'a>) -> Self {
        self.suffix = suffix;
        self
    }

    /// Convert to `unit` before formatting
    pub fn with_unit(mut self, unit: &'a str) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Fixed number of decimal places
    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    fn precision(&self) -> Precision {
        match self.scale {
            Some(scale) => Precision::fixed_with(scale, self.rounding),
            None => Precision::Exact,
        }
    }
}

/// Convert (when a unit is requested), round and render
pub fn format(measurement: &Measurement, options: &FormatOptions<'_>) -> Result<String> {
    let precision = options.precision();
    let converted = match options.unit {
        Some(unit) => measurement.convert_to_with(unit, precision)?,
        None => measurement.clone(),
    };
    let scale = options.scale.map(|scale| (scale, options.rounding));
    Ok(render(&converted, &options.suffix, scale))
}

/// Render without conversion; `scale` pads or rounds to fixed places
pub(crate) fn render(measurement: &Measurement, suffix: &Suffix<'_>, scale: Option<(u32, RoundingMode)>) -> String {
    let (value, text) = match scale {
        Some((scale, mode)) => (measurement.value().round(scale, mode), measurement.value().to_fixed(scale, mode)),
        None => (measurement.value().clone(), measurement.value().to_plain_string()),
    };
    let unit = measurement.unit();

    let literal = match suffix {
        Suffix::Custom(formatter) => return formatter(&value, unit, measurement),
        Suffix::Text(template) if template.contains('%') => return fill_template(template, &text),
        Suffix::Text(literal) => *literal,
        Suffix::Unit => unit,
    };

    let resolved = match measurement.system().suffix_formatter() {
        Some(hook) => hook.format_suffix(literal, &value, unit, measurement),
        None => literal.to_string(),
    };
    format!("{}{}", text, resolved)
}

/// Replace the first placeholder ("%s", else a bare "%") with the value
fn fill_template(template: &str, value: &str) -> String {
    match template.find("%s") {
        Some(pos) => format!("{}{}{}", &template[..pos], value, &template[pos + 2..]),
        None => template.replacen('%', value, 1),
    }
}
