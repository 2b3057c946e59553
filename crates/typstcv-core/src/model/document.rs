//! The `cv:` block: identity, contacts and ordered sections

use serde_yaml::Value;

use crate::model::dates::ValidationContext;
use crate::model::entry::EntryKind;
use crate::model::error::{describe, FieldPath, ValidationIssue};
use crate::model::fields::{Fields, Issues};
use crate::model::section::Section;
use crate::model::social::{Network, SocialNetwork};
use crate::types::Link;

const CV_FIELDS: [&str; 8] = [
    "name",
    "location",
    "email",
    "phone",
    "website",
    "photo",
    "social_networks",
    "sections",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    Location,
    Email,
    Phone,
    Website,
    Social(Network),
}

impl ConnectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionKind::Location => "Location",
            ConnectionKind::Email => "Email",
            ConnectionKind::Phone => "Phone",
            ConnectionKind::Website => "Website",
            ConnectionKind::Social(network) => network.name(),
        }
    }
}

/// One item of the header's contact line
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub kind: ConnectionKind,
    /// Link target; `None` for plain text such as the location
    pub href: Option<String>,
    /// Label as written by the user (location) or derived from the link
    pub display: String,
}

/// Validated `cv:` block
#[derive(Debug, Clone, PartialEq)]
pub struct Cv {
    pub name: Option<String>,
    pub location: Option<String>,
    pub email: Option<Link>,
    pub phone: Option<Link>,
    pub website: Option<Link>,
    pub photo: Option<String>,
    pub social_networks: Vec<SocialNetwork>,
    /// In input order
    pub sections: Vec<Section>,
    connections: Vec<Connection>,
}

impl Cv {
    /// Contact line items: location, email, phone, website, then social networks
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Variants used by at least one section
    pub fn entry_kinds(&self) -> Vec<EntryKind> {
        let mut kinds: Vec<EntryKind> = self.sections.iter().map(|s| s.entry_kind).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    pub(crate) fn read(
        value: &Value,
        path: &FieldPath,
        ctx: &ValidationContext,
        issues: &mut Issues,
    ) -> Option<Cv> {
        let Some(map) = value.as_mapping() else {
            issues.push(ValidationIssue::field(
                path.clone(),
                describe(value),
                "expected a mapping",
            ));
            return None;
        };

        let before = issues.len();
        let fields = Fields::new(map, path.clone());
        fields.reject_unknown(&CV_FIELDS, issues);

        let name = fields.text("name", issues);
        let location = fields.text("location", issues);
        let email = fields.link("email", Link::email, issues);
        let phone = fields.link("phone", Link::phone, issues);
        let website = fields.link("website", Link::url, issues);
        let photo = fields.text("photo", issues);

        let social_networks: Vec<SocialNetwork> = fields
            .sequence("social_networks", issues)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .filter_map(|(i, raw)| {
                SocialNetwork::read(raw, &path.key("social_networks").index(i), issues)
            })
            .collect();

        let mut sections = Vec::new();
        if let Some(raw_sections) = fields.mapping("sections", issues) {
            let sections_path = path.key("sections");
            for (key, raw) in raw_sections {
                let Some(key) = key.as_str() else {
                    issues.push(ValidationIssue::field(
                        sections_path.clone(),
                        describe(key),
                        "section titles must be strings",
                    ));
                    continue;
                };
                if let Some(section) = Section::read(key, raw, &sections_path.key(key), ctx, issues) {
                    sections.push(section);
                }
            }
        }

        if issues.len() > before {
            return None;
        }

        let connections = build_connections(
            location.as_deref(),
            [email.as_ref(), phone.as_ref(), website.as_ref()],
            &social_networks,
        );

        Some(Cv {
            name,
            location,
            email,
            phone,
            website,
            photo,
            social_networks,
            sections,
            connections,
        })
    }
}

fn build_connections(
    location: Option<&str>,
    links: [Option<&Link>; 3],
    social_networks: &[SocialNetwork],
) -> Vec<Connection> {
    let mut connections = Vec::new();
    if let Some(location) = location {
        connections.push(Connection {
            kind: ConnectionKind::Location,
            href: None,
            display: location.to_string(),
        });
    }

    let kinds = [ConnectionKind::Email, ConnectionKind::Phone, ConnectionKind::Website];
    for (kind, link) in kinds.into_iter().zip(links) {
        if let Some(link) = link {
            connections.push(Connection {
                kind,
                href: Some(link.href()),
                display: link.display(),
            });
        }
    }

    connections.extend(social_networks.iter().map(|social| Connection {
        kind: ConnectionKind::Social(social.network),
        href: Some(social.url.clone()),
        display: social.username.clone(),
    }));
    connections
}
