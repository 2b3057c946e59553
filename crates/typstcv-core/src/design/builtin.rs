//! Option schemas of the built-in themes
//!
//! All built-in themes share the option set of `classic` and differ in their
//! defaults; `sb2nov` and `moderncv` add one option each.

use crate::design::option::{OptionSpec, OptionValue};
use crate::design::schema::ThemeSchema;
use crate::types::{Color, Length, LengthUnit};

pub const BUILTIN_THEMES: [&str; 5] = [
    "classic",
    "sb2nov",
    "engineeringresumes",
    "engineeringclassic",
    "moderncv",
];

pub const DEFAULT_THEME: &str = "classic";

pub const PAGE_SIZES: [&str; 2] = ["us-letter", "a4"];

pub const BULLETS: [&str; 8] = ["•", "◦", "-", "◆", "★", "■", "—", "○"];

pub const SECTION_TITLE_TYPES: [&str; 4] =
    ["with-partial-line", "with-full-line", "without-line", "moderncv"];

/// Schema of a built-in theme
pub fn builtin_schema(id: &str) -> Option<ThemeSchema> {
    match id {
        "classic" => Some(classic()),
        "sb2nov" => Some(sb2nov()),
        "engineeringresumes" => Some(engineeringresumes()),
        "engineeringclassic" => Some(engineeringclassic()),
        "moderncv" => Some(moderncv()),
        _ => None,
    }
}

/// Schema custom themes start from
pub fn default_schema() -> ThemeSchema {
    classic()
}

pub fn builtin_schemas() -> Vec<ThemeSchema> {
    BUILTIN_THEMES
        .iter()
        .filter_map(|id| builtin_schema(id))
        .collect()
}

fn cm(value: f64) -> OptionValue {
    OptionValue::Length(Length::cm(value))
}

fn pt(value: f64) -> OptionValue {
    OptionValue::Length(Length::pt(value))
}

fn em(value: f64) -> OptionValue {
    OptionValue::Length(Length::em(value))
}

fn inches(value: f64) -> OptionValue {
    OptionValue::Length(Length::new(value, LengthUnit::In))
}

fn color(r: u8, g: u8, b: u8) -> OptionValue {
    OptionValue::Color(Color::rgb(r, g, b))
}

fn flag(value: bool) -> OptionValue {
    OptionValue::Bool(value)
}

fn text(value: &str) -> OptionValue {
    OptionValue::Text(value.to_string())
}

fn classic() -> ThemeSchema {
    ThemeSchema::new("classic", "Blue accents, partial-line section titles")
        // page
        .with(
            OptionSpec::new("page", "size", text("us-letter"))
                .choice(&PAGE_SIZES)
                .describe("Paper size"),
        )
        .with(OptionSpec::new("page", "top_margin", cm(2.0)).positive())
        .with(OptionSpec::new("page", "bottom_margin", cm(2.0)).positive())
        .with(OptionSpec::new("page", "left_margin", cm(2.0)).positive())
        .with(OptionSpec::new("page", "right_margin", cm(2.0)).positive())
        .with(
            OptionSpec::new("page", "show_page_numbering", flag(true))
                .describe("Show \"Name - Page n of m\" in the footer"),
        )
        .with(
            OptionSpec::new("page", "show_last_updated_date", flag(true))
                .describe("Show the last updated date in the top right corner"),
        )
        // colors
        .with(OptionSpec::new("colors", "text", color(0, 0, 0)))
        .with(OptionSpec::new("colors", "name", color(0, 79, 144)))
        .with(OptionSpec::new("colors", "connections", color(0, 79, 144)))
        .with(OptionSpec::new("colors", "section_titles", color(0, 79, 144)))
        .with(OptionSpec::new("colors", "links", color(0, 79, 144)))
        .with(OptionSpec::new(
            "colors",
            "last_updated_date_and_page_numbering",
            color(128, 128, 128),
        ))
        // text
        .with(OptionSpec::new("text", "font_family", text("Source Sans 3")))
        .with(OptionSpec::new("text", "font_size", pt(10.0)).positive())
        .with(
            OptionSpec::new("text", "leading", em(0.6))
                .positive()
                .describe("Space between lines"),
        )
        .with(
            OptionSpec::new("text", "alignment", text("justified"))
                .choice(&["left", "justified", "justified-with-no-hyphenation"]),
        )
        .with(
            OptionSpec::new("text", "date_and_location_column_alignment", text("right"))
                .choice(&["left", "right", "center"]),
        )
        // links
        .with(OptionSpec::new("links", "underline", flag(false)))
        .with(OptionSpec::new("links", "use_external_link_icon", flag(true)))
        // header
        .with(OptionSpec::new("header", "name_font_size", pt(30.0)).positive())
        .with(OptionSpec::new("header", "name_bold", flag(true)))
        .with(OptionSpec::new(
            "header",
            "vertical_space_between_name_and_connections",
            cm(0.7),
        ))
        .with(OptionSpec::new(
            "header",
            "vertical_space_between_connections_and_first_section",
            cm(0.7),
        ))
        .with(OptionSpec::new("header", "horizontal_space_between_connections", cm(0.5)))
        .with(OptionSpec::new("header", "separator_between_connections", text("")))
        .with(
            OptionSpec::new("header", "alignment", text("center"))
                .choice(&["left", "center", "right"]),
        )
        .with(OptionSpec::new("header", "use_icons_for_connections", flag(true)))
        // section titles
        .with(
            OptionSpec::new("section_titles", "type", text("with-partial-line"))
                .choice(&SECTION_TITLE_TYPES),
        )
        .with(OptionSpec::new("section_titles", "font_size", em(1.4)).positive())
        .with(OptionSpec::new("section_titles", "bold", flag(true)))
        .with(OptionSpec::new("section_titles", "small_caps", flag(false)))
        .with(OptionSpec::new("section_titles", "line_thickness", pt(0.5)).positive())
        .with(OptionSpec::new("section_titles", "vertical_space_above", cm(0.5)))
        .with(OptionSpec::new("section_titles", "vertical_space_below", cm(0.3)))
        // entries
        .with(
            OptionSpec::new("entries", "date_and_location_width", cm(4.15))
                .positive()
                .describe("Width of the date and location column"),
        )
        .with(OptionSpec::new("entries", "left_and_right_margin", cm(0.2)))
        .with(OptionSpec::new("entries", "horizontal_space_between_columns", cm(0.1)))
        .with(OptionSpec::new("entries", "vertical_space_between_entries", em(1.2)))
        .with(OptionSpec::new("entries", "allow_page_break_in_entries", flag(true)))
        .with(OptionSpec::new("entries", "short_second_row", flag(false)))
        .with(
            OptionSpec::new("entries", "show_time_spans_in", OptionValue::List(Vec::new()))
                .describe("Section keys whose entries show their time span"),
        )
        // highlights
        .with(OptionSpec::new("highlights", "bullet", text("•")).choice(&BULLETS))
        .with(OptionSpec::new("highlights", "top_margin", cm(0.25)))
        .with(OptionSpec::new("highlights", "left_margin", cm(0.4)))
        .with(OptionSpec::new("highlights", "vertical_space_between_highlights", cm(0.25)))
        .with(OptionSpec::new(
            "highlights",
            "horizontal_space_between_bullet_and_highlight",
            em(0.5),
        ))
        .with(OptionSpec::new("highlights", "summary_left_margin", cm(0.0)))
}

fn sb2nov() -> ThemeSchema {
    ThemeSchema::derive(&classic(), "sb2nov", "Single column, full-line section titles")
        .default_of("page", "top_margin", inches(0.6))
        .default_of("page", "bottom_margin", inches(0.6))
        .default_of("page", "left_margin", inches(0.6))
        .default_of("page", "right_margin", inches(0.6))
        .default_of("colors", "name", color(0, 0, 0))
        .default_of("colors", "connections", color(0, 0, 0))
        .default_of("colors", "section_titles", color(0, 0, 0))
        .default_of("colors", "links", color(0, 0, 0))
        .default_of("text", "font_family", text("New Computer Modern"))
        .default_of("header", "name_font_size", pt(24.0))
        .default_of("header", "separator_between_connections", text("|"))
        .default_of("header", "use_icons_for_connections", flag(false))
        .default_of("links", "underline", flag(true))
        .default_of("links", "use_external_link_icon", flag(false))
        .default_of("section_titles", "type", text("with-full-line"))
        .default_of("section_titles", "small_caps", flag(true))
        .default_of("highlights", "bullet", text("◦"))
        .with(
            OptionSpec::new("entries", "degree_column_width", cm(1.0))
                .positive()
                .describe("Width of the degree column of education entries"),
        )
}

fn engineeringresumes() -> ThemeSchema {
    ThemeSchema::derive(
        &classic(),
        "engineeringresumes",
        "Compact, left-aligned, no icons",
    )
    .default_of("page", "top_margin", cm(2.0))
    .default_of("page", "bottom_margin", cm(2.0))
    .default_of("page", "show_last_updated_date", flag(false))
    .default_of("colors", "name", color(0, 0, 0))
    .default_of("colors", "connections", color(0, 0, 0))
    .default_of("colors", "section_titles", color(0, 0, 0))
    .default_of("colors", "links", color(0, 0, 0))
    .default_of("text", "font_family", text("XCharter"))
    .default_of("text", "alignment", text("left"))
    .default_of("header", "name_font_size", pt(25.0))
    .default_of("header", "name_bold", flag(false))
    .default_of("header", "separator_between_connections", text("|"))
    .default_of("header", "use_icons_for_connections", flag(false))
    .default_of("links", "underline", flag(true))
    .default_of("links", "use_external_link_icon", flag(false))
    .default_of("section_titles", "type", text("with-full-line"))
    .default_of("section_titles", "font_size", em(1.2))
    .default_of("entries", "vertical_space_between_entries", em(0.8))
    .default_of("highlights", "bullet", text("•"))
    .default_of("highlights", "left_margin", cm(0.0))
    .default_of("highlights", "top_margin", cm(0.1))
}

fn engineeringclassic() -> ThemeSchema {
    ThemeSchema::derive(
        &classic(),
        "engineeringclassic",
        "Classic layout with engineering typography",
    )
    .default_of("page", "show_last_updated_date", flag(false))
    .default_of("text", "font_family", text("Raleway"))
    .default_of("text", "alignment", text("left"))
    .default_of("header", "alignment", text("left"))
    .default_of("header", "name_bold", flag(false))
    .default_of("header", "use_icons_for_connections", flag(true))
    .default_of("section_titles", "type", text("with-full-line"))
    .default_of("section_titles", "bold", flag(false))
    .default_of("links", "use_external_link_icon", flag(false))
}

fn moderncv() -> ThemeSchema {
    ThemeSchema::derive(&classic(), "moderncv", "Date column on the left, moderncv styling")
        .default_of("page", "top_margin", cm(2.0))
        .default_of("page", "left_margin", cm(1.5))
        .default_of("page", "right_margin", cm(1.5))
        .default_of("text", "font_family", text("Fontin"))
        .default_of("text", "date_and_location_column_alignment", text("left"))
        .default_of("header", "alignment", text("left"))
        .default_of("header", "name_font_size", pt(32.0))
        .default_of("header", "name_bold", flag(false))
        .default_of("section_titles", "type", text("moderncv"))
        .default_of("section_titles", "bold", flag(false))
        .default_of("section_titles", "font_size", em(1.3))
        .default_of("entries", "date_and_location_width", cm(3.8))
        .default_of("highlights", "bullet", text("•"))
        .with(
            OptionSpec::new("header", "name_italic", flag(true))
                .describe("Typeset the name in italics"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_has_a_schema() {
        let schemas = builtin_schemas();
        assert_eq!(schemas.len(), BUILTIN_THEMES.len());
        for (schema, id) in schemas.iter().zip(BUILTIN_THEMES) {
            assert_eq!(schema.id, id);
        }
        assert!(builtin_schema("fancy").is_none());
    }

    #[test]
    fn test_classic_margins() {
        let classic = builtin_schema("classic").unwrap();
        for side in ["top", "bottom", "left", "right"] {
            let option = classic.option("page", &format!("{side}_margin")).unwrap();
            assert_eq!(option.default, cm(2.0));
            assert!(option.positive);
        }
    }

    #[test]
    fn test_theme_specific_options() {
        assert!(builtin_schema("sb2nov")
            .unwrap()
            .option("entries", "degree_column_width")
            .is_some());
        assert!(builtin_schema("moderncv")
            .unwrap()
            .option("header", "name_italic")
            .is_some());
        assert!(builtin_schema("classic")
            .unwrap()
            .option("header", "name_italic")
            .is_none());
    }

    #[test]
    fn test_defaults_satisfy_their_own_constraints() {
        for schema in builtin_schemas() {
            for option in schema.options() {
                let raw = match option.default.to_json() {
                    serde_json::Value::Bool(b) => serde_yaml::Value::Bool(b),
                    serde_json::Value::String(s) => serde_yaml::Value::String(s),
                    serde_json::Value::Array(items) => serde_yaml::Value::Sequence(
                        items
                            .into_iter()
                            .map(|i| serde_yaml::Value::String(i.as_str().unwrap().to_string()))
                            .collect(),
                    ),
                    other => panic!("unexpected default {other}"),
                };
                assert_eq!(
                    option.parse_value(&raw).as_ref(),
                    Ok(&option.default),
                    "{} {}",
                    schema.id,
                    option.key()
                );
            }
        }
    }
}
