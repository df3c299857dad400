//! Syntax profiles: static, compiled-in descriptors mapping file extensions
//! to comment delimiters, keyword tables, and feature flags.
//!
//! A profile is chosen once per document from the filename extension and
//! never mutated. Keywords carry a trailing `|` marker in the table to put
//! them in the secondary (type-like) display class; the marker is stripped
//! before matching.

use bitflags::bitflags;

pub mod highlight;

pub use highlight::{highlight_row, is_separator};

bitflags! {
    /// Feature switches consulted by the per-row highlight pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyntaxFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// Static per-filetype highlighting descriptor.
#[derive(Debug)]
pub struct Syntax {
    /// Display name shown in the status bar.
    pub name: &'static str,
    /// Filename suffixes that select this profile.
    pub extensions: &'static [&'static str],
    /// Keyword table; a trailing `|` marks the type-keyword class.
    pub keywords: &'static [&'static str],
    /// Line-comment prefix; empty disables line comments.
    pub line_comment: &'static str,
    /// Block-comment delimiters; both empty disables block comments.
    pub block_comment_start: &'static str,
    pub block_comment_end: &'static str,
    pub flags: SyntaxFlags,
}

/// The compiled-in profile table.
pub static SYNTAXES: &[Syntax] = &[
    Syntax {
        name: "c",
        extensions: &[".c", ".h", ".cpp"],
        keywords: &[
            "switch", "if", "while", "for", "break", "continue", "return", "else", "struct",
            "union", "typedef", "static", "enum", "class", "case", "int|", "long|", "double|",
            "float|", "char|", "unsigned|", "signed|", "void|",
        ],
        line_comment: "//",
        block_comment_start: "/*",
        block_comment_end: "*/",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
    Syntax {
        name: "rust",
        extensions: &[".rs"],
        keywords: &[
            "fn", "let", "mut", "if", "else", "match", "while", "for", "loop", "return",
            "struct", "enum", "impl", "trait", "pub", "use", "mod", "const", "static", "break",
            "continue", "i8|", "i16|", "i32|", "i64|", "u8|", "u16|", "u32|", "u64|", "usize|",
            "isize|", "f32|", "f64|", "bool|", "char|", "str|", "String|",
        ],
        line_comment: "//",
        block_comment_start: "/*",
        block_comment_end: "*/",
        flags: SyntaxFlags::NUMBERS.union(SyntaxFlags::STRINGS),
    },
];

/// Pick the profile whose extension matches `filename`, if any.
pub fn select(filename: &str) -> Option<&'static Syntax> {
    SYNTAXES
        .iter()
        .find(|s| s.extensions.iter().any(|ext| filename.ends_with(ext)))
}
