//! App id validation
//!
//! App ids end up as Android package names and iOS bundle ids, so every
//! dot-separated segment must be a legal Java identifier that is not a
//! reserved word.

/// Predicate deciding whether an app id is acceptable
pub trait IdentifierValidator: Send + Sync {
    /// True if `id` may be used as an app id
    fn is_valid(&self, id: &str) -> bool;
}

/// Java keywords and literals that cannot appear as a package segment
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Validates ids as Java-style package names (`org.example.app`)
#[derive(Debug, Clone, Copy, Default)]
pub struct JavaPackageValidator;

impl IdentifierValidator for JavaPackageValidator {
    fn is_valid(&self, id: &str) -> bool {
        is_valid_identifier(id)
    }
}

/// True if every dot-separated segment of `id` is a non-reserved Java identifier
#[must_use]
pub fn is_valid_identifier(id: &str) -> bool {
    !id.is_empty() && id.split('.').all(is_valid_segment)
}

fn is_valid_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }

    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return false;
    }

    !RESERVED_WORDS.contains(&segment)
}
