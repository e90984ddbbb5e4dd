//! Structural key decoding for diagnostics
//!
//! [`parse`] turns key text into a [`KeyDocument`] tree without a
//! compilation and without knowing the per-kind schemas. Useful for logging
//! and for explaining why a key failed to resolve.

use crate::config::DEFAULT_MAX_NESTING_DEPTH;
use crate::error::{Result, SymbolKeyError};
use crate::grammar::{self, SymbolKeyType};
use serde::Serialize;
use std::fmt::Write as _;

/// Decoded key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyDocument {
    /// Format version from the header
    pub version: i32,
    /// Language from the header
    pub language: String,
    /// Top-level record
    pub root: KeyNode,
}

/// One field or record of a key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum KeyNode {
    /// Symbol record
    Record {
        /// Tag character
        tag: char,
        /// Schema name
        kind: &'static str,
        /// Post-order record id
        id: u32,
        /// Fields in written order
        fields: Vec<KeyNode>,
    },
    /// `(% n ...)`
    Array {
        /// Elements
        items: Vec<KeyNode>,
    },
    /// `(# id)`
    Reference {
        /// Referenced record id
        id: u32,
    },
    /// `(@ index ordinal)`
    MethodTypeParameter {
        /// Method stack index
        method_index: u32,
        /// Type parameter ordinal
        ordinal: u32,
    },
    /// `!`
    Null,
    /// Quoted string
    String {
        /// Unescaped value
        value: String,
    },
    /// Integer
    Integer {
        /// Value
        value: i64,
    },
}

impl KeyDocument {
    /// Render as an indented outline, one node per line
    #[must_use]
    pub fn render_tree(&self) -> String {
        let mut out = format!("version {} language {:?}\n", self.version, self.language);
        render(&self.root, 0, &mut out);
        out
    }

    /// Number of records in the document
    #[must_use]
    pub fn record_count(&self) -> usize {
        count_records(&self.root)
    }
}

fn count_records(node: &KeyNode) -> usize {
    match node {
        KeyNode::Record { fields, .. } => 1 + fields.iter().map(count_records).sum::<usize>(),
        KeyNode::Array { items } => items.iter().map(count_records).sum(),
        _ => 0,
    }
}

fn render(node: &KeyNode, indent: usize, out: &mut String) {
    let pad = "  ".repeat(indent);
    match node {
        KeyNode::Record { kind, id, fields, .. } => {
            let _ = writeln!(out, "{pad}{kind} #{id}");
            for field in fields {
                render(field, indent + 1, out);
            }
        }
        KeyNode::Array { items } => {
            let _ = writeln!(out, "{pad}[{}]", items.len());
            for item in items {
                render(item, indent + 1, out);
            }
        }
        KeyNode::Reference { id } => {
            let _ = writeln!(out, "{pad}-> #{id}");
        }
        KeyNode::MethodTypeParameter {
            method_index,
            ordinal,
        } => {
            let _ = writeln!(out, "{pad}method[{method_index}] type parameter {ordinal}");
        }
        KeyNode::Null => {
            let _ = writeln!(out, "{pad}null");
        }
        KeyNode::String { value } => {
            let _ = writeln!(out, "{pad}{value:?}");
        }
        KeyNode::Integer { value } => {
            let _ = writeln!(out, "{pad}{value}");
        }
    }
}

/// Decode key text
///
/// # Errors
/// - `SymbolKeyError::Malformed` if the text does not follow the grammar
/// - `SymbolKeyError::NestingTooDeep` past the default nesting limit
pub fn parse(key: &str) -> Result<KeyDocument> {
    let header = grammar::split_header(key)
        .ok_or_else(|| SymbolKeyError::malformed(0, "expected `<version> \"<language>\"`"))?;
    let offset = key.len() - header.record.len();
    let mut parser = Parser {
        text: key,
        position: offset,
        depth: 0,
    };
    let root = parser.field()?;
    if parser.position != key.len() {
        return Err(SymbolKeyError::malformed(parser.position, "trailing text after key"));
    }
    Ok(KeyDocument {
        version: header.version,
        language: header.language,
        root,
    })
}

struct Parser<'k> {
    text: &'k str,
    position: usize,
    depth: usize,
}

impl Parser<'_> {
    fn field(&mut self) -> Result<KeyNode> {
        self.expect(b' ')?;
        match self.peek() {
            Some(b'!') => {
                self.position += 1;
                Ok(KeyNode::Null)
            }
            Some(b'"') => {
                let (value, end) = grammar::parse_quoted(self.text, self.position)
                    .ok_or_else(|| self.malformed("unterminated string"))?;
                self.position = end;
                Ok(KeyNode::String { value })
            }
            Some(b'(') => {
                self.position += 1;
                self.depth += 1;
                if self.depth > DEFAULT_MAX_NESTING_DEPTH {
                    return Err(SymbolKeyError::NestingTooDeep {
                        limit: DEFAULT_MAX_NESTING_DEPTH,
                    });
                }
                let node = self.group();
                self.depth -= 1;
                node
            }
            Some(b) if b == b'-' || b.is_ascii_digit() => Ok(KeyNode::Integer {
                value: self.integer()?,
            }),
            _ => Err(self.malformed("expected a field")),
        }
    }

    fn group(&mut self) -> Result<KeyNode> {
        let c = self.text[self.position..]
            .chars()
            .next()
            .ok_or_else(|| self.malformed("unexpected end of key"))?;
        let tag = SymbolKeyType::from_char(c)
            .ok_or_else(|| self.malformed(format!("unknown tag {c:?}")))?;
        self.position += c.len_utf8();

        let node = match tag {
            SymbolKeyType::Array => {
                self.expect(b' ')?;
                let count = self.unsigned()?;
                let mut items = Vec::new();
                for _ in 0..count {
                    items.push(self.field()?);
                }
                KeyNode::Array { items }
            }
            SymbolKeyType::Reference => {
                self.expect(b' ')?;
                KeyNode::Reference {
                    id: self.unsigned()?,
                }
            }
            SymbolKeyType::TypeParameterOrdinal => {
                self.expect(b' ')?;
                let method_index = self.unsigned()?;
                self.expect(b' ')?;
                KeyNode::MethodTypeParameter {
                    method_index,
                    ordinal: self.unsigned()?,
                }
            }
            SymbolKeyType::Null => return Err(self.malformed("`!` cannot open a group")),
            _ => {
                let mut fields = Vec::new();
                while self.peek() == Some(b' ') {
                    fields.push(self.field()?);
                }
                let id = match fields.pop() {
                    Some(KeyNode::Integer { value }) => u32::try_from(value)
                        .map_err(|_| self.malformed(format!("record id {value} out of range")))?,
                    _ => return Err(self.malformed("record has no trailing id")),
                };
                KeyNode::Record {
                    tag: c,
                    kind: tag.name(),
                    id,
                    fields,
                }
            }
        };
        self.expect(b')')?;
        Ok(node)
    }

    fn integer(&mut self) -> Result<i64> {
        let start = self.position;
        let bytes = self.text.as_bytes();
        let mut end = start;
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        let value = self.text[start..end]
            .parse::<i64>()
            .map_err(|_| self.malformed("expected an integer"))?;
        self.position = end;
        Ok(value)
    }

    fn unsigned(&mut self) -> Result<u32> {
        let value = self.integer()?;
        u32::try_from(value).map_err(|_| self.malformed(format!("{value} out of range")))
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.position).copied()
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        if self.peek() == Some(expected) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.malformed(format!("expected {:?}", char::from(expected))))
        }
    }

    fn malformed(&self, message: impl Into<String>) -> SymbolKeyError {
        SymbolKeyError::malformed(self.position, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_nested_records_and_arrays() {
        let doc = parse(r#"5 "C#" (F "count" (D ! "Counter" 0 ! 0 (% 0) 0) 1)"#).unwrap();
        assert_eq!(doc.version, 5);
        assert_eq!(doc.language, "C#");
        assert_eq!(doc.record_count(), 2);
        let KeyNode::Record { tag, id, fields, .. } = &doc.root else {
            panic!("expected record, got {:?}", doc.root);
        };
        assert_eq!(*tag, 'F');
        assert_eq!(*id, 1);
        assert_eq!(fields[0], KeyNode::String { value: "count".into() });
        assert!(matches!(fields[1], KeyNode::Record { tag: 'D', .. }));
    }

    #[test]
    fn parses_structural_tags() {
        let doc = parse(r#"5 "C#" (M "F" (# 0) 1 0 (% 1 0) (% 1 (@ 0 0)) ! 2)"#).unwrap();
        let KeyNode::Record { fields, .. } = &doc.root else {
            panic!("expected record");
        };
        assert_eq!(fields[1], KeyNode::Reference { id: 0 });
        assert_eq!(
            fields[5],
            KeyNode::Array {
                items: vec![KeyNode::MethodTypeParameter {
                    method_index: 0,
                    ordinal: 0
                }]
            }
        );
        assert_eq!(fields[6], KeyNode::Null);
    }

    #[test]
    fn rejects_broken_keys() {
        assert!(parse("").is_err());
        assert!(parse(r#"5 "C#" (F "x" !)"#).is_err());
        assert!(parse(r#"5 "C#" (F "x" ! 0"#).is_err());
        assert!(parse(r#"5 "C#" (% 2 1) "#).is_err());
        assert!(parse(r#"5 "C#" (H 0)"#).is_err());
    }

    #[test]
    fn json_and_tree_rendering() {
        let doc = parse(r#"5 "C#" (p "DEBUG" 0)"#).unwrap();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["root"]["node"], "record");
        assert_eq!(json["root"]["kind"], "Preprocessing");
        assert_eq!(doc.render_tree(), "version 5 language \"C#\"\nPreprocessing #0\n  \"DEBUG\"\n");
    }
}
