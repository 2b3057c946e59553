//! Templates shipped with the binary, shared by every built-in theme

use crate::format::OutputFormat;
use crate::model::EntryKind;
use crate::theme::loader::TemplateName;

/// Built-in template text for `name` in `format`
pub fn builtin_template(format: OutputFormat, name: TemplateName) -> &'static str {
    match format {
        OutputFormat::Typst => typst_template(name),
        OutputFormat::Markdown => markdown_template(name),
    }
}

fn typst_template(name: TemplateName) -> &'static str {
    match name {
        TemplateName::Preamble => include_str!("../../templates/typst/Preamble.tmp.typ"),
        TemplateName::Header => include_str!("../../templates/typst/Header.tmp.typ"),
        TemplateName::SectionBeginning => {
            include_str!("../../templates/typst/SectionBeginning.tmp.typ")
        }
        TemplateName::SectionEnding => include_str!("../../templates/typst/SectionEnding.tmp.typ"),
        TemplateName::Entry(kind) => match kind {
            EntryKind::Education => include_str!("../../templates/typst/EducationEntry.tmp.typ"),
            EntryKind::Experience => include_str!("../../templates/typst/ExperienceEntry.tmp.typ"),
            EntryKind::Publication => {
                include_str!("../../templates/typst/PublicationEntry.tmp.typ")
            }
            EntryKind::Normal => include_str!("../../templates/typst/NormalEntry.tmp.typ"),
            EntryKind::OneLine => include_str!("../../templates/typst/OneLineEntry.tmp.typ"),
            EntryKind::Text => include_str!("../../templates/typst/TextEntry.tmp.typ"),
        },
    }
}

fn markdown_template(name: TemplateName) -> &'static str {
    match name {
        TemplateName::Preamble => include_str!("../../templates/markdown/Preamble.tmp.md"),
        TemplateName::Header => include_str!("../../templates/markdown/Header.tmp.md"),
        TemplateName::SectionBeginning => {
            include_str!("../../templates/markdown/SectionBeginning.tmp.md")
        }
        TemplateName::SectionEnding => include_str!("../../templates/markdown/SectionEnding.tmp.md"),
        TemplateName::Entry(kind) => match kind {
            EntryKind::Education => include_str!("../../templates/markdown/EducationEntry.tmp.md"),
            EntryKind::Experience => {
                include_str!("../../templates/markdown/ExperienceEntry.tmp.md")
            }
            EntryKind::Publication => {
                include_str!("../../templates/markdown/PublicationEntry.tmp.md")
            }
            EntryKind::Normal => include_str!("../../templates/markdown/NormalEntry.tmp.md"),
            EntryKind::OneLine => include_str!("../../templates/markdown/OneLineEntry.tmp.md"),
            EntryKind::Text => include_str!("../../templates/markdown/TextEntry.tmp.md"),
        },
    }
}
