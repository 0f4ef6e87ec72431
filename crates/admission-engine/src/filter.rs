//! Value filters applied inside placeholders: `{{.key | upper | trunc 8}}`.

use admission_types::{AdmissionError, Result};

/// A single filter of a placeholder chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Upper,
    Lower,
    Title,
    Untitle,
    Trim,
    Escape,
    Dirname,
    Basename,
    Trunc(usize),
    Substr(i64, i64),
}

impl Filter {
    /// Parse one filter segment such as `upper` or `substr 0 5`.
    pub fn parse(segment: &str) -> Result<Self> {
        let mut tokens = segment.split_whitespace();
        let name = tokens.next().ok_or_else(|| AdmissionError::MalformedFilter {
            filter: segment.to_string(),
            message: "empty filter".into(),
        })?;
        let args: Vec<&str> = tokens.collect();

        let filter = match name {
            "upper" => Filter::Upper,
            "lower" => Filter::Lower,
            "title" => Filter::Title,
            "untitle" => Filter::Untitle,
            "trim" => Filter::Trim,
            "escape" => Filter::Escape,
            "dirname" => Filter::Dirname,
            "basename" => Filter::Basename,
            "trunc" => {
                let [n] = int_args::<1>(segment, &args)?;
                let n = usize::try_from(n)
                    .map_err(|_| malformed(segment, "length must not be negative"))?;
                Filter::Trunc(n)
            }
            "substr" => {
                let [start, end] = int_args::<2>(segment, &args)?;
                Filter::Substr(start, end)
            }
            other => {
                return Err(AdmissionError::UnknownFilter {
                    name: other.to_string(),
                })
            }
        };

        if filter.arity() != args.len() {
            return Err(malformed(
                segment,
                &format!("expected {} argument(s), got {}", filter.arity(), args.len()),
            ));
        }
        Ok(filter)
    }

    fn arity(&self) -> usize {
        match self {
            Filter::Trunc(_) => 1,
            Filter::Substr(..) => 2,
            _ => 0,
        }
    }

    /// Apply the filter to a resolved value.
    pub fn apply(&self, value: &str) -> String {
        match self {
            Filter::Upper => value.to_uppercase(),
            Filter::Lower => value.to_lowercase(),
            Filter::Title => title(value),
            Filter::Untitle => {
                let mut chars = value.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Filter::Trim => value.trim().to_string(),
            Filter::Escape => value.replace(['_', '/', '.'], "-"),
            Filter::Dirname => dirname(value),
            Filter::Basename => basename(value),
            Filter::Trunc(n) => value.chars().take(*n).collect(),
            Filter::Substr(start, end) => substr(value, *start, *end),
        }
    }
}

/// Parse a filter chain, the text following the key: `| upper | trunc 3`.
///
/// An empty chain yields no filters.
pub fn parse_chain(chain: &str) -> Result<Vec<Filter>> {
    let chain = chain.trim();
    if chain.is_empty() {
        return Ok(Vec::new());
    }
    let Some(rest) = chain.strip_prefix('|') else {
        return Err(malformed(chain, "filter chain must start with '|'"));
    };
    rest.split('|').map(Filter::parse).collect()
}

/// Apply a parsed chain left to right.
pub fn apply_chain(filters: &[Filter], value: &str) -> String {
    filters
        .iter()
        .fold(value.to_string(), |acc, f| f.apply(&acc))
}

fn int_args<const N: usize>(segment: &str, args: &[&str]) -> Result<[i64; N]> {
    if args.len() != N {
        return Err(malformed(
            segment,
            &format!("expected {N} argument(s), got {}", args.len()),
        ));
    }
    let mut out = [0i64; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg
            .parse()
            .map_err(|_| malformed(segment, &format!("'{arg}' is not an integer")))?;
    }
    Ok(out)
}

fn malformed(filter: &str, message: &str) -> AdmissionError {
    AdmissionError::MalformedFilter {
        filter: filter.trim().to_string(),
        message: message.to_string(),
    }
}

// Word boundaries: any ASCII char other than alphanumerics and '_', or whitespace.
fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    c.is_whitespace()
}

fn title(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_boundary = true;
    for c in value.chars() {
        if at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = is_word_separator(c);
    }
    out
}

fn dirname(path: &str) -> String {
    match path.rfind('/') {
        None => ".".to_string(),
        Some(idx) => {
            let dir = path[..idx].trim_end_matches('/');
            if dir.is_empty() {
                "/".to_string()
            } else {
                dir.to_string()
            }
        }
    }
}

fn basename(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/".to_string();
    }
    match trimmed.rfind('/') {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

fn substr(value: &str, start: i64, end: i64) -> String {
    let len = value.chars().count();
    let end = if end < 0 { len } else { (end as usize).min(len) };
    let start = if start < 0 { 0 } else { (start as usize).min(end) };
    value.chars().skip(start).take(end - start).collect()
}
