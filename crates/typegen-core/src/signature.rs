//! Parser for compact generic-type descriptors.
//!
//! A descriptor is a sequence of tokens:
//!
//! * a single-letter primitive code (`D J I S B F Z V`),
//! * `[` followed by exactly one token (an array of that token),
//! * a class reference `Lpkg/Name;`, optionally carrying generic arguments
//!   `Lpkg/Name<...>;` where the argument list is closed by `>;`.
//!
//! Parsing runs left to right without backtracking. Every step takes an
//! immutable [`Cursor`] and returns the parsed node together with the cursor
//! positioned after it.
//!
//! # Examples
//!
//! ```
//! use typegen_core::metadata::MetadataContext;
//! use typegen_core::signature::{parse_signature, Intermediate};
//!
//! let metadata = MetadataContext::new();
//! let nodes = parse_signature("Ljava/util/List<Ljava/lang/String;>;", &metadata).unwrap();
//! match &nodes[0] {
//!     Intermediate::Class(list) => {
//!         assert_eq!(list.qualified_name, "java.util.List");
//!         assert_eq!(list.generic_args.len(), 1);
//!     }
//!     other => panic!("unexpected node {other:?}"),
//! }
//! ```

use crate::metadata::{ClassInfo, ClassProvider};
use crate::utils::dotted_name;
use crate::{Error, Result};

/// Primitive descriptor codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveCode {
    Double,
    Float,
    Long,
    Int,
    Short,
    Byte,
    Boolean,
    Void,
}

impl PrimitiveCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'D' => Some(Self::Double),
            b'F' => Some(Self::Float),
            b'J' => Some(Self::Long),
            b'I' => Some(Self::Int),
            b'S' => Some(Self::Short),
            b'B' => Some(Self::Byte),
            b'Z' => Some(Self::Boolean),
            b'V' => Some(Self::Void),
            _ => None,
        }
    }
}

/// A parsed descriptor node, before any wrapper or container handling.
#[derive(Debug, Clone)]
pub enum Intermediate<'a> {
    Primitive(PrimitiveCode),
    Class(ClassRef<'a>),
    Array(Box<Intermediate<'a>>),
}

/// A class reference with its generic arguments.
///
/// `class` is `None` when the provider does not know the class.
#[derive(Debug, Clone)]
pub struct ClassRef<'a> {
    pub qualified_name: String,
    pub class: Option<&'a ClassInfo>,
    pub generic_args: Vec<Intermediate<'a>>,
}

/// Argument and return types of a method signature
#[derive(Debug, Clone)]
pub struct MethodSignature<'a> {
    pub arguments: Vec<Intermediate<'a>>,
    pub return_type: Intermediate<'a>,
}

/// Position in a descriptor string. Copying a cursor never mutates the source.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'s> {
    source: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn rest(&self) -> &'s str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<u8> {
        self.rest().as_bytes().first().copied()
    }

    fn advance(self, n: usize) -> Self {
        Self {
            source: self.source,
            pos: (self.pos + n).min(self.source.len()),
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::Signature {
            signature: self.source.to_string(),
            position: self.pos,
            reason: reason.into(),
        }
    }
}

/// Parses a whole descriptor into its top-level nodes.
pub fn parse_signature<'a>(
    signature: &str,
    classes: &'a dyn ClassProvider,
) -> Result<Vec<Intermediate<'a>>> {
    let parser = SignatureParser { classes };
    let (nodes, _) = parser.parse_list(Cursor::new(signature), 0)?;
    Ok(nodes)
}

/// Parses a descriptor that holds a single type, such as a field signature.
pub fn parse_single<'a>(signature: &str, classes: &'a dyn ClassProvider) -> Result<Intermediate<'a>> {
    parse_signature(signature, classes)?
        .into_iter()
        .next()
        .ok_or_else(|| Cursor::new(signature).error("expected a type"))
}

/// Splits a method signature `(<args>)<return>` and parses both halves.
///
/// Formal type parameters before `(` and a throws clause after the return
/// type are ignored.
pub fn parse_method_signature<'a>(
    signature: &str,
    classes: &'a dyn ClassProvider,
) -> Result<MethodSignature<'a>> {
    let cursor = Cursor::new(signature);
    let open = signature
        .find('(')
        .ok_or_else(|| cursor.error("method signature has no '('"))?;
    let close = signature[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| cursor.advance(open).error("method signature has no ')'"))?;

    let arguments = parse_signature(&signature[open + 1..close], classes)?;
    let return_type = parse_signature(&signature[close + 1..], classes)?
        .into_iter()
        .next()
        .ok_or_else(|| cursor.advance(close + 1).error("method signature has no return type"))?;

    Ok(MethodSignature {
        arguments,
        return_type,
    })
}

struct SignatureParser<'a> {
    classes: &'a dyn ClassProvider,
}

impl<'a> SignatureParser<'a> {
    /// Parses tokens until the input ends (level 0) or a `>;` closes the
    /// current argument list (level > 0).
    fn parse_list<'s>(
        &self,
        mut cursor: Cursor<'s>,
        level: usize,
    ) -> Result<(Vec<Intermediate<'a>>, Cursor<'s>)> {
        let mut nodes = Vec::new();
        loop {
            let rest = cursor.rest();
            if rest.starts_with(">;") {
                if level == 0 {
                    return Err(cursor.error("misaligned '>;' outside of a generic argument list"));
                }
                return Ok((nodes, cursor.advance(2)));
            }
            if rest.trim().is_empty() {
                if level > 0 {
                    return Err(cursor.error("unterminated generic argument list"));
                }
                return Ok((nodes, cursor));
            }
            let (node, next) = self.parse_token(cursor, level)?;
            nodes.push(node);
            cursor = next;
        }
    }

    fn parse_token<'s>(
        &self,
        cursor: Cursor<'s>,
        level: usize,
    ) -> Result<(Intermediate<'a>, Cursor<'s>)> {
        match cursor.peek() {
            Some(b'[') => {
                let (element, next) = self.parse_token(cursor.advance(1), level)?;
                Ok((Intermediate::Array(Box::new(element)), next))
            }
            // variance markers carry no shape
            Some(b'+') | Some(b'-') => self.parse_token(cursor.advance(1), level),
            Some(b'*') => Ok((
                Intermediate::Class(self.class_ref("java.lang.Object")),
                cursor.advance(1),
            )),
            Some(code) => match PrimitiveCode::from_code(code) {
                Some(primitive) => Ok((Intermediate::Primitive(primitive), cursor.advance(1))),
                None => self.parse_class(cursor, level),
            },
            None => Err(cursor.error("unexpected end of signature")),
        }
    }

    fn parse_class<'s>(
        &self,
        mut cursor: Cursor<'s>,
        level: usize,
    ) -> Result<(Intermediate<'a>, Cursor<'s>)> {
        while cursor.peek() == Some(b'L') {
            cursor = cursor.advance(1);
        }

        let rest = cursor.rest();
        let end = rest
            .find(';')
            .ok_or_else(|| cursor.error("found no terminating ';'"))?;

        match rest.find('<') {
            Some(open) if open < end => {
                let mut class_ref = self.class_ref(&rest[..open]);
                let (args, next) = self.parse_list(cursor.advance(open + 1), level + 1)?;
                class_ref.generic_args = args;
                Ok((Intermediate::Class(class_ref), next))
            }
            _ => Ok((
                Intermediate::Class(self.class_ref(&rest[..end])),
                cursor.advance(end + 1),
            )),
        }
    }

    fn class_ref(&self, path: &str) -> ClassRef<'a> {
        let qualified_name = dotted_name(path);
        let class = self.classes.class(&qualified_name);
        if class.is_none() {
            log::warn!("Could not load class {}", qualified_name);
        }
        ClassRef {
            qualified_name,
            class,
            generic_args: Vec::new(),
        }
    }
}
