//! Key grammar
//!
//! A key is `<version> "<language>" <record>`. Records look like
//! `(<tag> <field>... <id>)` where every field is preceded by one space.
//! Besides one tag per symbol schema there are four structural tags:
//! `%` (array), `#` (back-reference), `!` (null) and `@` (method
//! type-parameter ordinal).

/// Version written at the head of every key
///
/// Bumped whenever a schema changes; keys with another version never
/// resolve.
pub const FORMAT_VERSION: i32 = 5;

/// Record tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKeyType {
    /// `A`
    Alias,
    /// `B`: local, label, range variable, local function
    BodyLevel,
    /// `C`
    ConstructedMethod,
    /// `D`
    NamedType,
    /// `E`
    ErrorType,
    /// `F`
    Field,
    /// `G`
    FunctionPointer,
    /// `I`
    DynamicType,
    /// `L`
    BuiltinOperator,
    /// `M`
    Method,
    /// `N`
    Namespace,
    /// `O`
    PointerType,
    /// `P`
    Parameter,
    /// `Q`
    Property,
    /// `R`
    ArrayType,
    /// `S`
    Assembly,
    /// `T`
    TupleType,
    /// `U`
    Module,
    /// `V`
    Event,
    /// `W`
    AnonymousType,
    /// `X`
    ReducedExtensionMethod,
    /// `Y`
    TypeParameter,
    /// `Z`
    AnonymousFunctionOrDelegate,
    /// `p`
    Preprocessing,
    /// `%`
    Array,
    /// `#`
    Reference,
    /// `!`
    Null,
    /// `@`
    TypeParameterOrdinal,
}

impl SymbolKeyType {
    /// Tag character
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Alias => 'A',
            Self::BodyLevel => 'B',
            Self::ConstructedMethod => 'C',
            Self::NamedType => 'D',
            Self::ErrorType => 'E',
            Self::Field => 'F',
            Self::FunctionPointer => 'G',
            Self::DynamicType => 'I',
            Self::BuiltinOperator => 'L',
            Self::Method => 'M',
            Self::Namespace => 'N',
            Self::PointerType => 'O',
            Self::Parameter => 'P',
            Self::Property => 'Q',
            Self::ArrayType => 'R',
            Self::Assembly => 'S',
            Self::TupleType => 'T',
            Self::Module => 'U',
            Self::Event => 'V',
            Self::AnonymousType => 'W',
            Self::ReducedExtensionMethod => 'X',
            Self::TypeParameter => 'Y',
            Self::AnonymousFunctionOrDelegate => 'Z',
            Self::Preprocessing => 'p',
            Self::Array => '%',
            Self::Reference => '#',
            Self::Null => '!',
            Self::TypeParameterOrdinal => '@',
        }
    }

    /// Decode a tag character
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'A' => Self::Alias,
            'B' => Self::BodyLevel,
            'C' => Self::ConstructedMethod,
            'D' => Self::NamedType,
            'E' => Self::ErrorType,
            'F' => Self::Field,
            'G' => Self::FunctionPointer,
            'I' => Self::DynamicType,
            'L' => Self::BuiltinOperator,
            'M' => Self::Method,
            'N' => Self::Namespace,
            'O' => Self::PointerType,
            'P' => Self::Parameter,
            'Q' => Self::Property,
            'R' => Self::ArrayType,
            'S' => Self::Assembly,
            'T' => Self::TupleType,
            'U' => Self::Module,
            'V' => Self::Event,
            'W' => Self::AnonymousType,
            'X' => Self::ReducedExtensionMethod,
            'Y' => Self::TypeParameter,
            'Z' => Self::AnonymousFunctionOrDelegate,
            'p' => Self::Preprocessing,
            '%' => Self::Array,
            '#' => Self::Reference,
            '!' => Self::Null,
            '@' => Self::TypeParameterOrdinal,
            _ => return None,
        })
    }

    /// Schema name used in failure breadcrumbs and diagnostics
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Alias => "Alias",
            Self::BodyLevel => "BodyLevel",
            Self::ConstructedMethod => "ConstructedMethod",
            Self::NamedType => "NamedType",
            Self::ErrorType => "ErrorType",
            Self::Field => "Field",
            Self::FunctionPointer => "FunctionPointerType",
            Self::DynamicType => "DynamicType",
            Self::BuiltinOperator => "BuiltinOperator",
            Self::Method => "Method",
            Self::Namespace => "Namespace",
            Self::PointerType => "PointerType",
            Self::Parameter => "Parameter",
            Self::Property => "Property",
            Self::ArrayType => "ArrayType",
            Self::Assembly => "Assembly",
            Self::TupleType => "TupleType",
            Self::Module => "Module",
            Self::Event => "Event",
            Self::AnonymousType => "AnonymousType",
            Self::ReducedExtensionMethod => "ReducedExtensionMethod",
            Self::TypeParameter => "TypeParameter",
            Self::AnonymousFunctionOrDelegate => "AnonymousFunctionOrDelegate",
            Self::Preprocessing => "Preprocessing",
            Self::Array => "Array",
            Self::Reference => "Reference",
            Self::Null => "Null",
            Self::TypeParameterOrdinal => "TypeParameterOrdinal",
        }
    }

    /// Check if the tag opens a symbol record that carries its own id
    #[inline]
    #[must_use]
    pub const fn has_id(self) -> bool {
        !matches!(
            self,
            Self::Array | Self::Reference | Self::Null | Self::TypeParameterOrdinal
        )
    }
}

/// Location kinds written before an inline location
pub(crate) mod location_kind {
    pub(crate) const NONE: i64 = 0;
    pub(crate) const SOURCE: i64 = 1;
    pub(crate) const METADATA: i64 = 2;
}

/// Append `value` as a quoted string, doubling embedded quotes
pub(crate) fn push_quoted(buffer: &mut String, value: &str) {
    buffer.push('"');
    for c in value.chars() {
        if c == '"' {
            buffer.push('"');
        }
        buffer.push(c);
    }
    buffer.push('"');
}

/// Parse a quoted string starting at `start` (which must hold `"`)
///
/// Returns the unescaped value and the offset just past the closing quote.
pub(crate) fn parse_quoted(text: &str, start: usize) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'"') {
        return None;
    }
    let mut value = String::new();
    let mut segment = start + 1;
    let mut i = start + 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            value.push_str(&text[segment..i]);
            if bytes.get(i + 1) == Some(&b'"') {
                value.push('"');
                i += 2;
                segment = i;
                continue;
            }
            return Some((value, i + 1));
        }
        i += 1;
    }
    None
}

/// Key split into its header and top-level record
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header<'k> {
    pub(crate) version: i32,
    pub(crate) language: String,
    /// Text after the language string, starting with the separating space
    pub(crate) record: &'k str,
}

/// Split `<version> "<language>"` off the front of a key
pub(crate) fn split_header(key: &str) -> Option<Header<'_>> {
    let digits_end = key
        .char_indices()
        .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '-')))
        .map_or(key.len(), |(i, _)| i);
    let version = key[..digits_end].parse::<i32>().ok()?;
    if key.as_bytes().get(digits_end) != Some(&b' ') {
        return None;
    }
    let (language, end) = parse_quoted(key, digits_end + 1)?;
    Some(Header {
        version,
        language,
        record: &key[end..],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn tag_chars_round_trip() {
        for c in "ABCDEFGILMNOPQRSTUVWXYZp%#!@".chars() {
            let tag = SymbolKeyType::from_char(c).unwrap();
            assert_eq!(tag.as_char(), c);
        }
        assert_eq!(SymbolKeyType::from_char('H'), None);
        assert_eq!(SymbolKeyType::from_char('a'), None);
    }

    #[test]
    fn structural_tags_have_no_id() {
        assert!(!SymbolKeyType::Reference.has_id());
        assert!(!SymbolKeyType::TypeParameterOrdinal.has_id());
        assert!(SymbolKeyType::Method.has_id());
    }

    #[test]
    fn quoted_string_doubles_quotes() {
        let mut buffer = String::new();
        push_quoted(&mut buffer, r#"say "hi""#);
        assert_eq!(buffer, r#""say ""hi""""#);
        let (value, end) = parse_quoted(&buffer, 0).unwrap();
        assert_eq!(value, r#"say "hi""#);
        assert_eq!(end, buffer.len());
    }

    #[test]
    fn unterminated_string_is_rejected() {
        assert_eq!(parse_quoted(r#""abc"#, 0), None);
        assert_eq!(parse_quoted("abc", 0), None);
    }

    #[test]
    fn header_is_split_from_record() {
        let header = split_header(r#"5 "C#" (S "Lib" 0)"#).unwrap();
        assert_eq!(header.version, 5);
        assert_eq!(header.language, "C#");
        assert_eq!(header.record, r#" (S "Lib" 0)"#);
        assert_eq!(split_header("five \"C#\" !"), None);
        assert_eq!(split_header("5"), None);
    }

    proptest! {
        #[test]
        fn quoting_is_lossless(value in ".*") {
            let mut buffer = String::from("x ");
            push_quoted(&mut buffer, &value);
            buffer.push_str(" tail");
            let (parsed, end) = parse_quoted(&buffer, 2).unwrap();
            prop_assert_eq!(parsed, value);
            prop_assert_eq!(&buffer[end..], " tail");
        }
    }
}
