//! Value-to-text conversion for log calls.
//!
//! The composer only sees strings; this is the collaborator that turns
//! arbitrary caller values into them. Dispatch is a closed tagged variant
//! (primitive / sequence / mapping / error / unit) rather than open-ended
//! runtime inspection: callers either pass something with a `From`
//! conversion or construct a [`LogValue`] explicitly.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// A loggable value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LogValue {
    /// No value. A unit title renders as `" "`, a unit body promotes the
    /// title into the body.
    #[default]
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Seq(Vec<LogValue>),
    Map(Vec<(String, LogValue)>),
    /// An error with its source chain, rendered stack-trace style.
    Error {
        name: String,
        message: String,
        frames: Vec<String>,
    },
}

impl LogValue {
    /// Capture a `std::error::Error` with its source chain.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut frames = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            frames.push(cause.to_string());
            source = cause.source();
        }
        Self::Error {
            name: "Error".to_string(),
            message: err.to_string(),
            frames,
        }
    }

    /// Render to body text: primitives literally, sequences and mappings as
    /// a 2-space-indented JSON-like block, errors as `Name : message` plus
    /// `  at …` lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_into(&mut out, 0);
        out
    }

    fn write_into(&self, out: &mut String, depth: usize) {
        match self {
            Self::Unit => {}
            Self::Bool(v) => {
                let _ = write!(out, "{v}");
            }
            Self::Int(v) => {
                let _ = write!(out, "{v}");
            }
            Self::Float(v) => {
                let _ = write!(out, "{v}");
            }
            Self::Text(v) => out.push_str(v),
            Self::Seq(items) => {
                if items.is_empty() {
                    out.push_str("[]");
                    return;
                }
                out.push_str("[\n");
                for item in items {
                    indent(out, depth + 1);
                    item.write_quoted(out, depth + 1);
                    out.push_str(",\n");
                }
                indent(out, depth);
                out.push(']');
            }
            Self::Map(entries) => {
                if entries.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{\n");
                for (key, value) in entries {
                    indent(out, depth + 1);
                    let _ = write!(out, "{key}: ");
                    value.write_quoted(out, depth + 1);
                    out.push_str(",\n");
                }
                indent(out, depth);
                out.push('}');
            }
            Self::Error {
                name,
                message,
                frames,
            } => {
                let _ = write!(out, "{name} : {message}");
                for frame in frames {
                    let _ = write!(out, "\n  at {frame}");
                }
            }
        }
    }

    /// Like `write_into` but quotes text values, for use inside containers.
    fn write_quoted(&self, out: &mut String, depth: usize) {
        if let Self::Text(v) = self {
            let _ = write!(out, "\"{v}\"");
        } else {
            self.write_into(out, depth);
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

impl From<()> for LogValue {
    fn from((): ()) -> Self {
        Self::Unit
    }
}

impl From<bool> for LogValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for LogValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for LogValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<f64> for LogValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for LogValue {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {$(
        impl From<$ty> for LogValue {
            fn from(v: $ty) -> Self {
                Self::Int(v as i64)
            }
        }
    )+};
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32, usize);

impl<T: Into<LogValue>> From<Vec<T>> for LogValue {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<LogValue>> From<BTreeMap<String, T>> for LogValue {
    fn from(v: BTreeMap<String, T>) -> Self {
        Self::Map(v.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_render_literally() {
        assert_eq!(LogValue::from(true).render(), "true");
        assert_eq!(LogValue::from(42).render(), "42");
        assert_eq!(LogValue::from(1.5).render(), "1.5");
        assert_eq!(LogValue::from("hi").render(), "hi");
        assert_eq!(LogValue::Unit.render(), "");
    }

    #[test]
    fn seq_pretty_prints() {
        let v = LogValue::from(vec!["a", "b"]);
        assert_eq!(v.render(), "[\n  \"a\",\n  \"b\",\n]");
    }

    #[test]
    fn map_pretty_prints_with_nesting() {
        let v = LogValue::Map(vec![
            ("id".to_string(), LogValue::Int(7)),
            (
                "tags".to_string(),
                LogValue::Seq(vec![LogValue::Text("x".into())]),
            ),
        ]);
        assert_eq!(v.render(), "{\n  id: 7,\n  tags: [\n    \"x\",\n  ],\n}");
    }

    #[test]
    fn error_renders_with_source_chain() {
        let io = std::io::Error::other("disk on fire");
        let v = LogValue::from_error(&io);
        assert_eq!(v.render(), "Error : disk on fire");

        let v = LogValue::Error {
            name: "ParseError".into(),
            message: "bad header".into(),
            frames: vec!["read_frame".into(), "poll_next".into()],
        };
        assert_eq!(
            v.render(),
            "ParseError : bad header\n  at read_frame\n  at poll_next"
        );
    }
}
