//! JSON Schema of the input document, for editor autocompletion
//!
//! The `cv`, `locale` and `settings` parts are derived from schema-only
//! mirrors of the model. The `design` part is a `oneOf` over every theme the
//! registry knows, custom themes included.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde_json::{json, Value};

use crate::design::DEFAULT_THEME;
use crate::locale::Locale;
use crate::model::entry::{
    EducationEntry, ExperienceEntry, NormalEntry, OneLineEntry, PublicationEntry,
};
use crate::model::settings::Settings;
use crate::model::social::SocialNetwork;
use crate::theme::{ThemeError, ThemeRegistry};
use crate::types::link::{EmailSchema, PhoneSchema};
use crate::types::Link;

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(title = "typstcv input", deny_unknown_fields)]
struct InputSchema {
    cv: CvSchema,
    /// Replaced by the theme union
    design: Option<Value>,
    locale: Option<Locale>,
    settings: Option<Settings>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(rename = "Cv", deny_unknown_fields)]
struct CvSchema {
    name: Option<String>,
    location: Option<String>,
    email: Option<EmailSchema>,
    phone: Option<PhoneSchema>,
    website: Option<Link>,
    /// Path of a photo shown in the header
    photo: Option<String>,
    social_networks: Option<Vec<SocialNetwork>>,
    /// Section key to entries; keys in `snake_case` become Title Case
    sections: Option<BTreeMap<String, SectionSchema>>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(rename = "Section")]
#[serde(untagged)]
enum SectionSchema {
    /// Entries of one type, inferred from the first
    List(Vec<EntrySchema>),
    Declared(DeclaredSection),
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(deny_unknown_fields)]
struct DeclaredSection {
    entry_type: EntryTypeName,
    entries: Vec<EntrySchema>,
    /// Label of publication and normal entry links
    link_text: Option<String>,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(rename = "Entry")]
#[serde(untagged)]
enum EntrySchema {
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Publication(PublicationEntry),
    Normal(NormalEntry),
    OneLine(OneLineEntry),
    Text(String),
}

#[allow(dead_code)]
#[derive(JsonSchema)]
#[schemars(rename = "EntryType")]
enum EntryTypeName {
    EducationEntry,
    ExperienceEntry,
    PublicationEntry,
    NormalEntry,
    OneLineEntry,
    TextEntry,
}

/// JSON Schema for the whole input, including discovered custom themes
pub fn input_schema(registry: &ThemeRegistry) -> Result<Value, ThemeError> {
    let mut schema = schemars::schema_for!(InputSchema).to_value();

    let designs: Vec<Value> = registry
        .themes()?
        .into_iter()
        .map(|theme| {
            let mut design = theme.schema.to_json_schema();
            // A design block without `theme` selects the default theme
            if theme.id() == DEFAULT_THEME {
                if let Some(object) = design.as_object_mut() {
                    object.remove("required");
                }
            }
            design
        })
        .collect();

    if let Some(properties) = schema
        .get_mut("properties")
        .and_then(Value::as_object_mut)
    {
        properties.insert(
            "design".to_string(),
            json!({
                "description": "Theme and its options",
                "oneOf": designs,
            }),
        );
    }
    log::debug!("input schema built with {} theme(s)", designs.len());
    Ok(schema)
}
