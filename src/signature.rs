//! Method signature encoding.
//!
//! Artifact file names embed the compiled method's signature in JVM
//! type-descriptor form: parameter descriptors between parentheses followed by
//! the return descriptor, e.g. `(ILjava/lang/String;)V`. This module builds
//! those strings from source-level type names and parses them back.

use std::fmt;

use crate::errors::SignatureError;

/// A single field or return type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    /// Binary class name with `.` separators, e.g. `java.lang.String`.
    Object(String),
    Array(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    /// Parses a source-level type name such as `int`, `java.lang.String[]`
    /// or `Outer$Inner`.
    pub fn parse_type_name(name: &str) -> Result<Self, SignatureError> {
        let trimmed = name.trim();
        let mut base = trimmed;
        let mut dims = 0usize;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped.trim_end();
            dims += 1;
        }

        let mut ty = match base {
            "void" => TypeDescriptor::Void,
            "boolean" => TypeDescriptor::Boolean,
            "byte" => TypeDescriptor::Byte,
            "char" => TypeDescriptor::Char,
            "short" => TypeDescriptor::Short,
            "int" => TypeDescriptor::Int,
            "long" => TypeDescriptor::Long,
            "float" => TypeDescriptor::Float,
            "double" => TypeDescriptor::Double,
            class if is_class_name(class) => TypeDescriptor::Object(class.to_string()),
            _ => {
                return Err(SignatureError::UnknownType {
                    name: trimmed.to_string(),
                })
            }
        };

        if dims > 0 && ty == TypeDescriptor::Void {
            return Err(SignatureError::VoidParameter);
        }
        for _ in 0..dims {
            ty = TypeDescriptor::Array(Box::new(ty));
        }
        Ok(ty)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeDescriptor::Void)
    }

    fn write_descriptor(&self, out: &mut String) {
        match self {
            TypeDescriptor::Void => out.push('V'),
            TypeDescriptor::Boolean => out.push('Z'),
            TypeDescriptor::Byte => out.push('B'),
            TypeDescriptor::Char => out.push('C'),
            TypeDescriptor::Short => out.push('S'),
            TypeDescriptor::Int => out.push('I'),
            TypeDescriptor::Long => out.push('J'),
            TypeDescriptor::Float => out.push('F'),
            TypeDescriptor::Double => out.push('D'),
            TypeDescriptor::Object(name) => {
                out.push('L');
                out.extend(name.chars().map(|c| if c == '.' { '/' } else { c }));
                out.push(';');
            }
            TypeDescriptor::Array(component) => {
                out.push('[');
                component.write_descriptor(out);
            }
        }
    }

    pub fn descriptor(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.descriptor())
    }
}

fn is_class_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

/// Parameter types plus return type of one compiled method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub params: Vec<TypeDescriptor>,
    pub ret: TypeDescriptor,
}

impl MethodSignature {
    pub fn new(params: Vec<TypeDescriptor>, ret: TypeDescriptor) -> Result<Self, SignatureError> {
        if params.iter().any(TypeDescriptor::is_void) {
            return Err(SignatureError::VoidParameter);
        }
        Ok(Self { params, ret })
    }

    /// Builds a signature from source-level type names.
    pub fn from_type_names<S: AsRef<str>>(params: &[S], ret: &str) -> Result<Self, SignatureError> {
        let params = params
            .iter()
            .map(|name| TypeDescriptor::parse_type_name(name.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(params, TypeDescriptor::parse_type_name(ret)?)
    }

    /// Parses an encoded descriptor such as `(I[Ljava/lang/Object;)Z`.
    pub fn parse_descriptor(descriptor: &str) -> Result<Self, SignatureError> {
        let mut parser = DescriptorParser {
            text: descriptor,
            pos: 0,
        };
        parser.expect(b'(')?;
        let mut params = Vec::new();
        while parser.peek() != Some(b')') {
            let ty = parser.field_type()?;
            if ty.is_void() {
                return Err(SignatureError::VoidParameter);
            }
            params.push(ty);
        }
        parser.expect(b')')?;
        let ret = parser.field_type()?;
        if parser.pos != descriptor.len() {
            return Err(parser.malformed());
        }
        Ok(Self { params, ret })
    }

    pub fn encode(&self) -> String {
        let mut out = String::from("(");
        for param in &self.params {
            param.write_descriptor(&mut out);
        }
        out.push(')');
        self.ret.write_descriptor(&mut out);
        out
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

struct DescriptorParser<'a> {
    text: &'a str,
    pos: usize,
}

impl DescriptorParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn malformed(&self) -> SignatureError {
        SignatureError::MalformedDescriptor {
            descriptor: self.text.to_string(),
            offset: self.pos,
        }
    }

    fn expect(&mut self, byte: u8) -> Result<(), SignatureError> {
        if self.peek() != Some(byte) {
            return Err(self.malformed());
        }
        self.pos += 1;
        Ok(())
    }

    fn field_type(&mut self) -> Result<TypeDescriptor, SignatureError> {
        let Some(tag) = self.peek() else {
            return Err(self.malformed());
        };
        self.pos += 1;
        let ty = match tag {
            b'V' => TypeDescriptor::Void,
            b'Z' => TypeDescriptor::Boolean,
            b'B' => TypeDescriptor::Byte,
            b'C' => TypeDescriptor::Char,
            b'S' => TypeDescriptor::Short,
            b'I' => TypeDescriptor::Int,
            b'J' => TypeDescriptor::Long,
            b'F' => TypeDescriptor::Float,
            b'D' => TypeDescriptor::Double,
            b'L' => {
                let rest = &self.text[self.pos..];
                let Some(end) = rest.find(';') else {
                    return Err(self.malformed());
                };
                if end == 0 {
                    return Err(self.malformed());
                }
                let name = rest[..end].replace('/', ".");
                self.pos += end + 1;
                TypeDescriptor::Object(name)
            }
            b'[' => {
                let component = self.field_type()?;
                if component.is_void() {
                    return Err(SignatureError::VoidParameter);
                }
                TypeDescriptor::Array(Box::new(component))
            }
            _ => {
                self.pos -= 1;
                return Err(self.malformed());
            }
        };
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_primitive_and_object_types() {
        let sig = MethodSignature::from_type_names(&["int", "java.lang.String"], "void").unwrap();
        assert_eq!(sig.encode(), "(ILjava/lang/String;)V");
    }

    #[test]
    fn encodes_arrays_and_nested_classes() {
        let sig = MethodSignature::from_type_names(
            &["long[][]", "compiler.jeandle.TestCardTableBarrier$OldObject"],
            "boolean[]",
        )
        .unwrap();
        assert_eq!(
            sig.to_string(),
            "([[JLcompiler/jeandle/TestCardTableBarrier$OldObject;)[Z"
        );
    }

    #[test]
    fn empty_parameter_list() {
        let sig = MethodSignature::from_type_names::<&str>(&[], "boolean").unwrap();
        assert_eq!(sig.encode(), "()Z");
    }

    #[test]
    fn rejects_void_parameters() {
        assert_eq!(
            MethodSignature::from_type_names(&["void"], "int"),
            Err(SignatureError::VoidParameter)
        );
        assert_eq!(
            TypeDescriptor::parse_type_name("void[]"),
            Err(SignatureError::VoidParameter)
        );
    }

    #[test]
    fn rejects_unknown_type_names() {
        assert!(matches!(
            TypeDescriptor::parse_type_name("java..String"),
            Err(SignatureError::UnknownType { .. })
        ));
        assert!(matches!(
            TypeDescriptor::parse_type_name("1abc"),
            Err(SignatureError::UnknownType { .. })
        ));
    }

    #[test]
    fn parses_descriptors() {
        let sig = MethodSignature::parse_descriptor("(I[Ljava/lang/Object;D)Z").unwrap();
        assert_eq!(
            sig.params,
            vec![
                TypeDescriptor::Int,
                TypeDescriptor::Array(Box::new(TypeDescriptor::Object(
                    "java.lang.Object".to_string()
                ))),
                TypeDescriptor::Double,
            ]
        );
        assert_eq!(sig.ret, TypeDescriptor::Boolean);
        assert_eq!(sig.encode(), "(I[Ljava/lang/Object;D)Z");
    }

    #[test]
    fn reports_offset_of_malformed_descriptor() {
        assert_eq!(
            MethodSignature::parse_descriptor("(IQ)V"),
            Err(SignatureError::MalformedDescriptor {
                descriptor: "(IQ)V".to_string(),
                offset: 2,
            })
        );
        assert!(MethodSignature::parse_descriptor("()").is_err());
        assert!(MethodSignature::parse_descriptor("(Ljava/lang/String)V").is_err());
        assert!(MethodSignature::parse_descriptor("()VV").is_err());
    }
}
