//! Message templates.
//!
//! A template is plain text with `{{`/`}}` escapes and two kinds of
//! replacement fields: a positional field (`{}` or `{0}`) that receives the
//! elapsed seconds, and a `{name}` field that receives the stopwatch name.
//! The positional field accepts a numeric format spec of the form
//! `[+][0][width][.precision][type]` where `type` is one of `f F e E g G %`.
//! Numbers come out the way Python's `str.format` prints a float: with no
//! type, `{}` gives the shortest round-trip form (`2.0`, `5e-05`) and `{:.3}`
//! keeps three significant digits.

use crate::error::TemplateError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Notation {
    /// No type, no precision: shortest round-trip digits.
    #[default]
    Repr,
    /// `g`/`G`, or no type with a precision (`dot_zero`).
    General {
        upper: bool,
        dot_zero: bool,
    },
    Fixed,
    Exponent {
        upper: bool,
    },
    Percent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct NumberSpec {
    plus: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
    notation: Notation,
}

/// Default precision for the `f`, `e`, `g` and `%` types.
const DEFAULT_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Numbering {
    Unset,
    Automatic(usize),
    Manual,
}

/// Substitute `seconds` and `name` into `template`.
///
/// An unset name renders as empty text.
pub fn render(template: &str, seconds: f64, name: Option<&str>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len() + 16);
    let mut numbering = Numbering::Unset;
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if chars.next_if(|&(_, next)| next == '{').is_some() {
                    out.push('{');
                    continue;
                }
                let start = position + 1;
                let end = template[start..]
                    .find('}')
                    .map(|offset| start + offset)
                    .ok_or(TemplateError::UnmatchedOpen { position })?;
                while chars.next_if(|&(i, _)| i <= end).is_some() {}

                let field = &template[start..end];
                write_field(&mut out, field, &mut numbering, seconds, name)?;
            }
            '}' => {
                if chars.next_if(|&(_, next)| next == '}').is_none() {
                    return Err(TemplateError::UnmatchedClose { position });
                }
                out.push('}');
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn write_field(
    out: &mut String,
    field: &str,
    numbering: &mut Numbering,
    seconds: f64,
    name: Option<&str>,
) -> Result<(), TemplateError> {
    let (field_name, spec) = field.split_once(':').unwrap_or((field, ""));
    if let Some((_, conversion)) = field_name.split_once('!') {
        return Err(TemplateError::UnsupportedConversion(conversion.to_owned()));
    }

    if field_name == "name" {
        if !spec.is_empty() {
            return Err(TemplateError::InvalidSpec(spec.to_owned()));
        }
        out.push_str(name.unwrap_or_default());
        return Ok(());
    }

    let index = if field_name.is_empty() {
        match *numbering {
            Numbering::Manual => return Err(TemplateError::MixedNumbering),
            Numbering::Unset => {
                *numbering = Numbering::Automatic(1);
                0
            }
            Numbering::Automatic(next) => {
                *numbering = Numbering::Automatic(next + 1);
                next
            }
        }
    } else if field_name.bytes().all(|b| b.is_ascii_digit()) {
        if let Numbering::Automatic(_) = numbering {
            return Err(TemplateError::MixedNumbering);
        }
        *numbering = Numbering::Manual;
        field_name
            .parse::<usize>()
            .map_err(|_| TemplateError::UnknownField(field_name.to_owned()))?
    } else {
        return Err(TemplateError::UnknownField(field_name.to_owned()));
    };

    if index != 0 {
        return Err(TemplateError::PositionalOutOfRange(index));
    }

    let spec = parse_spec(spec)?;
    out.push_str(&format_number(seconds, &spec));
    Ok(())
}

fn leading_digits(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

fn parse_spec(spec: &str) -> Result<NumberSpec, TemplateError> {
    let invalid = || TemplateError::InvalidSpec(spec.to_owned());
    let mut parsed = NumberSpec::default();
    let mut rest = spec;

    if let Some(r) = rest.strip_prefix('+') {
        parsed.plus = true;
        rest = r;
    }
    if let Some(r) = rest.strip_prefix('0') {
        parsed.zero = true;
        rest = r;
    }

    let digits = leading_digits(rest);
    if digits > 0 {
        parsed.width = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];
    }

    if let Some(r) = rest.strip_prefix('.') {
        let digits = leading_digits(r);
        if digits == 0 {
            return Err(invalid());
        }
        parsed.precision = Some(r[..digits].parse().map_err(|_| invalid())?);
        rest = &r[digits..];
    }

    parsed.notation = match rest {
        "" if parsed.precision.is_some() => Notation::General {
            upper: false,
            dot_zero: true,
        },
        "" => Notation::Repr,
        "g" => Notation::General {
            upper: false,
            dot_zero: false,
        },
        "G" => Notation::General {
            upper: true,
            dot_zero: false,
        },
        "f" | "F" => Notation::Fixed,
        "e" => Notation::Exponent { upper: false },
        "E" => Notation::Exponent { upper: true },
        "%" => Notation::Percent,
        _ => return Err(invalid()),
    };

    Ok(parsed)
}

fn format_number(value: f64, spec: &NumberSpec) -> String {
    let magnitude = value.abs();
    let body = match spec.notation {
        _ if !magnitude.is_finite() => non_finite(magnitude, spec.notation),
        Notation::Repr => repr(magnitude),
        Notation::General { upper, dot_zero } => general(
            magnitude,
            spec.precision.unwrap_or(DEFAULT_PRECISION),
            upper,
            dot_zero,
        ),
        Notation::Fixed => {
            let precision = spec.precision.unwrap_or(DEFAULT_PRECISION);
            format!("{magnitude:.precision$}")
        }
        Notation::Exponent { upper } => {
            exponent(magnitude, spec.precision.unwrap_or(DEFAULT_PRECISION), upper)
        }
        Notation::Percent => {
            let precision = spec.precision.unwrap_or(DEFAULT_PRECISION);
            format!("{:.precision$}%", magnitude * 100.0)
        }
    };

    let sign = if value.is_sign_negative() {
        "-"
    } else if spec.plus {
        "+"
    } else {
        ""
    };

    let len = sign.len() + body.chars().count();
    if len >= spec.width {
        return format!("{sign}{body}");
    }
    let fill = spec.width - len;
    if spec.zero {
        format!("{sign}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

fn non_finite(magnitude: f64, notation: Notation) -> String {
    let text = if magnitude.is_nan() { "nan" } else { "inf" };
    match notation {
        Notation::General { upper: true, .. } | Notation::Exponent { upper: true } => {
            text.to_uppercase()
        }
        Notation::Percent => format!("{text}%"),
        _ => text.to_owned(),
    }
}

/// Significant digits, without trailing zeros, and the decimal exponent of a
/// number printed with `{:e}`.
fn decompose(scientific: &str) -> (String, i32) {
    let (mantissa, exp) = scientific.split_once('e').unwrap_or((scientific, "0"));
    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    while digits.len() > 1 && digits.ends_with('0') {
        digits.pop();
    }
    (digits, exp.parse().unwrap_or(0))
}

fn repr(value: f64) -> String {
    let (digits, exp) = decompose(&format!("{value:e}"));
    if (-4..16).contains(&exp) {
        positional(&digits, exp, true)
    } else {
        scientific(&digits, exp, false)
    }
}

/// `precision` significant digits; scientific outside `1e-4..10^precision`.
/// Without a type the upper bound drops by one and whole numbers keep `.0`.
fn general(value: f64, precision: usize, upper: bool, dot_zero: bool) -> String {
    let precision = precision.max(1);
    let (digits, exp) = decompose(&format!("{value:.prec$e}", prec = precision - 1));
    let significant = i32::try_from(precision).unwrap_or(i32::MAX);
    let limit = if dot_zero {
        significant - 1
    } else {
        significant
    };
    if exp < -4 || exp >= limit {
        scientific(&digits, exp, upper)
    } else {
        positional(&digits, exp, dot_zero)
    }
}

fn positional(digits: &str, exp: i32, dot_zero: bool) -> String {
    let (whole, fraction) = match usize::try_from(exp) {
        Ok(exp) => {
            let split = exp + 1;
            if digits.len() > split {
                (digits[..split].to_owned(), &digits[split..])
            } else {
                (format!("{digits:0<split$}"), "")
            }
        }
        Err(_) => {
            let zeros = "0".repeat(exp.unsigned_abs() as usize - 1);
            return format!("0.{zeros}{digits}");
        }
    };
    if !fraction.is_empty() {
        format!("{whole}.{fraction}")
    } else if dot_zero {
        format!("{whole}.0")
    } else {
        whole
    }
}

fn scientific(digits: &str, exp: i32, upper: bool) -> String {
    let (first, rest) = digits.split_at(1);
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exp < 0 { '-' } else { '+' };
    let magnitude = exp.unsigned_abs();
    if rest.is_empty() {
        format!("{first}{marker}{sign}{magnitude:02}")
    } else {
        format!("{first}.{rest}{marker}{sign}{magnitude:02}")
    }
}

/// Scientific notation with a signed, two-digit minimum exponent (`5.000e-02`).
fn exponent(value: f64, precision: usize, upper: bool) -> String {
    let formatted = format!("{value:.precision$e}");
    let Some((mantissa, exp)) = formatted.split_once('e') else {
        return formatted;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
    };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{digits:0>2}")
}
