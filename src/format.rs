// ABOUTME: printf-style row formatting
// ABOUTME: Renders extracted column values through a positional template like "%d %s%n"

use thiserror::Error;

use crate::models::Value;

#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("format specifier '{spec}' has no argument (only {available} given)")]
    MissingArgument { spec: String, available: usize },
    #[error("unknown conversion '{0}'")]
    UnknownConversion(String),
    #[error("conversion '{conversion}' cannot format a {kind} value")]
    Mismatch {
        conversion: char,
        kind: &'static str,
    },
    #[error("incomplete format specifier at end of template")]
    Incomplete,
}

#[derive(Debug, Default)]
struct Spec {
    index: Option<usize>,
    left: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

/// Render `args` through `template`.
///
/// Specifiers follow `%[index$][flags][width][.precision]conversion` with
/// the flags `-` and `0` and the conversions `d s S f n %`. Plain
/// specifiers take arguments in order; `%2$s` style ones pick an argument
/// by 1-based index. Unused arguments are ignored.
pub fn render(template: &str, args: &[Value]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(template.len() + args.len() * 8);
    let mut chars = template.char_indices().peekable();
    let mut next_arg = 0;

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let spec = parse_spec(&mut chars)?;
        match spec.conversion {
            'n' => {
                out.push('\n');
                continue;
            }
            '%' => {
                pad(&mut out, "%", &spec);
                continue;
            }
            _ => {}
        }

        let position = match spec.index {
            Some(index) => index.checked_sub(1),
            None => {
                next_arg += 1;
                Some(next_arg - 1)
            }
        };
        let value = position.and_then(|p| args.get(p)).ok_or_else(|| {
            let end = chars.peek().map(|(i, _)| *i).unwrap_or(template.len());
            FormatError::MissingArgument {
                spec: template[start..end].to_string(),
                available: args.len(),
            }
        })?;

        let text = convert(&spec, value)?;
        pad(&mut out, &text, &spec);
    }

    Ok(out)
}

fn parse_spec<I>(chars: &mut std::iter::Peekable<I>) -> Result<Spec, FormatError>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut spec = Spec::default();

    // Leading digits are either an argument index (followed by '$') or a width
    let mut digits = take_digits(chars);
    if digits.is_some() && matches!(chars.peek(), Some(&(_, '$'))) {
        chars.next();
        spec.index = digits;
        digits = None;
    }

    if digits.is_none() {
        while let Some(&(_, flag)) = chars.peek() {
            match flag {
                '-' => spec.left = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = take_digits(chars);
    } else {
        spec.width = digits;
    }

    if matches!(chars.peek(), Some(&(_, '.'))) {
        chars.next();
        spec.precision = Some(take_digits(chars).unwrap_or(0));
    }

    spec.conversion = chars.next().map(|(_, c)| c).ok_or(FormatError::Incomplete)?;
    Ok(spec)
}

fn take_digits<I>(chars: &mut std::iter::Peekable<I>) -> Option<usize>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut value: Option<usize> = None;
    while let Some(&(_, c)) = chars.peek() {
        let Some(digit) = c.to_digit(10) else { break };
        // A leading zero is the zero-pad flag, not part of a number
        if value.is_none() && digit == 0 {
            break;
        }
        value = Some(value.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
        chars.next();
    }
    value
}

fn convert(spec: &Spec, value: &Value) -> Result<String, FormatError> {
    let text = match (spec.conversion, value) {
        (_, Value::Null) if matches!(spec.conversion, 'd' | 's' | 'S' | 'f') => "null".to_string(),
        ('d', Value::Int(v)) => v.to_string(),
        ('f', Value::Double(v)) => format!("{:.*}", spec.precision.unwrap_or(6), v),
        ('s' | 'S', v) => v.to_string(),
        ('d' | 'f', v) => {
            return Err(FormatError::Mismatch {
                conversion: spec.conversion,
                kind: v.kind(),
            })
        }
        (other, _) => return Err(FormatError::UnknownConversion(other.to_string())),
    };

    let text = match spec.conversion {
        's' | 'S' => match spec.precision {
            Some(max) => text.chars().take(max).collect(),
            None => text,
        },
        _ => text,
    };

    Ok(if spec.conversion == 'S' {
        text.to_uppercase()
    } else {
        text
    })
}

fn pad(out: &mut String, text: &str, spec: &Spec) {
    let len = text.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);

    if fill == 0 {
        out.push_str(text);
    } else if spec.left {
        out.push_str(text);
        out.extend(std::iter::repeat(' ').take(fill));
    } else if spec.zero && matches!(spec.conversion, 'd' | 'f') {
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text),
        };
        out.push_str(sign);
        out.extend(std::iter::repeat('0').take(fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat(' ').take(fill));
        out.push_str(text);
    }
}
