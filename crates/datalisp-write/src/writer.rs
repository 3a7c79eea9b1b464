//! DataLisp emitter.

use datalisp_model::{Array, Container, Data, Group, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WriteError {
    #[error("{role} '{name}' is not a valid identifier")]
    InvalidIdentifier { role: &'static str, name: String },

    #[error("float {0} has no text form")]
    NonFiniteFloat(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Emit a container with default options.
pub fn generate(container: &Container) -> Result<String, WriteError> {
    Writer::emit(container, &WriteOptions::default())
}

pub fn generate_with(container: &Container, options: &WriteOptions) -> Result<String, WriteError> {
    Writer::emit(container, options)
}

/// Emits the model as DataLisp source.
///
/// Each group prints as `(id`, its anonymous entries, its named entries as
/// `:key value`, one per line, then `)`. Empty groups stay on one line.
pub struct Writer {
    output: String,
    indent: usize,
    unit: String,
}

impl Writer {
    pub fn new(options: &WriteOptions) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            unit: " ".repeat(options.indent),
        }
    }

    pub fn emit(container: &Container, options: &WriteOptions) -> Result<String, WriteError> {
        let mut writer = Self::new(options);
        for group in container {
            writer.write_group(group)?;
            writer.output.push('\n');
        }
        Ok(writer.output)
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(&self.unit);
        }
    }

    fn write_group(&mut self, group: &Group) -> Result<(), WriteError> {
        check_id(group.id())?;
        self.output.push('(');
        self.output.push_str(group.id());
        if group.is_empty() {
            self.output.push(')');
            return Ok(());
        }

        self.output.push('\n');
        self.indent += 1;
        for data in group.anonymous_entries().iter().chain(group.named_entries()) {
            self.write_indent();
            self.write_data(data)?;
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push(')');
        Ok(())
    }

    fn write_data(&mut self, data: &Data) -> Result<(), WriteError> {
        if let Some(key) = data.key() {
            check_key(key)?;
            self.output.push(':');
            self.output.push_str(key);
            self.output.push(' ');
        }
        self.write_value(data.value())
    }

    fn write_value(&mut self, value: &Value) -> Result<(), WriteError> {
        match value {
            Value::Null => self.output.push_str("null"),
            Value::String(s) => {
                self.output.push('"');
                self.output.push_str(&escape_string(s));
                self.output.push('"');
            }
            Value::Integer(i) => self.output.push_str(&i.to_string()),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(WriteError::NonFiniteFloat(*f));
                }
                // Debug keeps a `.0` or exponent, so the value reads back as a float.
                self.output.push_str(&format!("{f:?}"));
            }
            Value::Bool(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Value::Group(group) => self.write_group(group)?,
            Value::Array(array) => self.write_array(array)?,
        }
        Ok(())
    }

    fn write_array(&mut self, array: &Array) -> Result<(), WriteError> {
        self.output.push('[');
        for (i, data) in array.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_value(data.value())?;
        }
        self.output.push(']');
        Ok(())
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !matches!(s, "true" | "false" | "null")
}

fn check_id(id: &str) -> Result<(), WriteError> {
    if is_identifier(id) {
        Ok(())
    } else {
        Err(WriteError::InvalidIdentifier {
            role: "group id",
            name: id.to_string(),
        })
    }
}

/// Keys are identifiers or unsigned integers.
fn check_key(key: &str) -> Result<(), WriteError> {
    let numeric = !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit());
    if numeric || is_identifier(key) {
        Ok(())
    } else {
        Err(WriteError::InvalidIdentifier {
            role: "key",
            name: key.to_string(),
        })
    }
}

fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0B}' => out.push_str("\\v"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> Group {
        let mut group = Group::new("Point");
        group.insert("x", Value::Integer(1));
        group.insert("y", Value::Float(2.5));
        group
    }

    #[test]
    fn test_simple_group() {
        let text = generate(&Container::from_iter([point()])).unwrap();
        assert_eq!(text, "(Point\n  :x 1\n  :y 2.5\n)\n");
    }

    #[test]
    fn test_anonymous_entries_come_first() {
        let mut group = Group::new("Call");
        group.insert("name", Value::String("f".into()));
        group.push(Value::Bool(true));
        group.push(Value::Null);

        let text = generate(&Container::from_iter([group])).unwrap();
        assert_eq!(text, "(Call\n  true\n  null\n  :name \"f\"\n)\n");
    }

    #[test]
    fn test_nested_and_arrays() {
        let mut outer = Group::new("Line");
        outer.insert("from", Value::Group(point()));
        outer.insert("empty", Value::Group(Group::new("Nothing")));
        let array = Array::from_iter([Data::integer(1), Data::float(1.0), Data::string("a")]);
        outer.insert("items", Value::Array(array));

        let options = WriteOptions { indent: 4 };
        let text = generate_with(&Container::from_iter([outer]), &options).unwrap();
        assert_eq!(
            text,
            "(Line\n    :from (Point\n        :x 1\n        :y 2.5\n    )\n    :empty (Nothing)\n    :items [1, 1.0, \"a\"]\n)\n"
        );
    }

    #[test]
    fn test_floats_keep_their_kind() {
        let mut group = Group::new("f");
        group.insert("big", Value::Float(1e42));
        group.insert("whole", Value::Float(3.0));
        group.insert("neg", Value::Float(-0.5));

        let text = generate(&Container::from_iter([group])).unwrap();
        assert!(text.contains(":big 1e42\n"), "{text}");
        assert!(text.contains(":whole 3.0\n"), "{text}");
        assert!(text.contains(":neg -0.5\n"), "{text}");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(escape_string("a\"b\\c\nd\u{07}"), "a\\\"b\\\\c\\nd\\a");
        assert_eq!(escape_string("\u{1F}é"), "\\u001Fé");
    }

    #[test]
    fn test_invalid_identifiers() {
        let mut group = Group::new("my-group");
        let err = generate(&Container::from_iter([group.clone()])).unwrap_err();
        assert_eq!(
            err,
            WriteError::InvalidIdentifier {
                role: "group id",
                name: "my-group".into()
            }
        );

        group.set_id("ok");
        group.insert("bad key", Value::Null);
        let err = generate(&Container::from_iter([group])).unwrap_err();
        assert!(matches!(err, WriteError::InvalidIdentifier { role: "key", .. }));

        assert!(check_key("0").is_ok());
        assert!(check_key("12").is_ok());
        assert!(check_key("-1").is_err());
        assert!(check_id("true").is_err());
        assert!(check_id("__unknown__").is_ok());
    }

    #[test]
    fn test_non_finite_float() {
        let mut group = Group::new("g");
        group.insert("inf", Value::Float(f64::INFINITY));
        let err = generate(&Container::from_iter([group])).unwrap_err();
        assert_eq!(err, WriteError::NonFiniteFloat(f64::INFINITY));
    }

    #[test]
    fn test_round_trip_through_reader() {
        let mut scene = Group::new("scene");
        scene.push(Value::Group(point()));
        scene.insert("name", Value::String("tab\there \"quoted\" \u{2022}".into()));
        scene.insert("0", Value::Integer(-7));
        scene.insert("ratio", Value::Float(1e-42));
        scene.insert("on", Value::Bool(false));
        scene.insert("none", Value::Null);
        let nested = Array::from_iter([
            Data::array(Array::new()),
            Data::group(Group::new("inner")),
            Data::string("x"),
        ]);
        scene.insert("list", Value::Array(nested));
        let container = Container::from_iter([scene, point()]);

        let text = generate(&container).unwrap();
        let back = datalisp_read::read(&text).unwrap();
        assert_eq!(back, container);
    }
}
