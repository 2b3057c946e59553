use std::fmt;

/// Markup produced by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Typst,
    Markdown,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Typst, OutputFormat::Markdown];

    /// Extension of generated files
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Typst => "typ",
            OutputFormat::Markdown => "md",
        }
    }

    /// Suffix of template files, e.g. `Header.tmp.typ`
    pub fn template_suffix(&self) -> &'static str {
        match self {
            OutputFormat::Typst => ".tmp.typ",
            OutputFormat::Markdown => ".tmp.md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Typst => f.write_str("typst"),
            OutputFormat::Markdown => f.write_str("markdown"),
        }
    }
}
