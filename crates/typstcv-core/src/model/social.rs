//! Social network references and their profile URLs

use std::fmt;

use schemars::JsonSchema;
use serde::Serialize;
use serde_yaml::Value;

use crate::model::error::{describe, FieldPath, ValidationIssue};
use crate::model::fields::{Fields, Issues};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum Network {
    LinkedIn,
    GitHub,
    GitLab,
    Instagram,
    #[serde(rename = "ORCID")]
    Orcid,
    Mastodon,
    StackOverflow,
    ResearchGate,
    YouTube,
    #[serde(rename = "Google Scholar")]
    GoogleScholar,
    Telegram,
    X,
}

impl Network {
    pub const ALL: [Network; 12] = [
        Network::LinkedIn,
        Network::GitHub,
        Network::GitLab,
        Network::Instagram,
        Network::Orcid,
        Network::Mastodon,
        Network::StackOverflow,
        Network::ResearchGate,
        Network::YouTube,
        Network::GoogleScholar,
        Network::Telegram,
        Network::X,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Network::LinkedIn => "LinkedIn",
            Network::GitHub => "GitHub",
            Network::GitLab => "GitLab",
            Network::Instagram => "Instagram",
            Network::Orcid => "ORCID",
            Network::Mastodon => "Mastodon",
            Network::StackOverflow => "StackOverflow",
            Network::ResearchGate => "ResearchGate",
            Network::YouTube => "YouTube",
            Network::GoogleScholar => "Google Scholar",
            Network::Telegram => "Telegram",
            Network::X => "X",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|n| n.name() == name)
    }

    /// Check a username's shape for networks that encode more than a handle
    fn check_username(&self, username: &str) -> Result<(), &'static str> {
        if username.chars().any(char::is_whitespace) {
            return Err("usernames cannot contain whitespace");
        }
        match self {
            Network::Mastodon => {
                let Some(rest) = username.strip_prefix('@') else {
                    return Err("Mastodon usernames look like @user@host");
                };
                match rest.split_once('@') {
                    Some((user, host)) if !user.is_empty() && host.contains('.') => Ok(()),
                    _ => Err("Mastodon usernames look like @user@host"),
                }
            }
            Network::StackOverflow => match username.split_once('/') {
                Some((id, name))
                    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) && !name.is_empty() =>
                {
                    Ok(())
                }
                _ => Err("StackOverflow usernames look like 12345/name"),
            },
            _ => Ok(()),
        }
    }

    pub fn profile_url(&self, username: &str) -> String {
        match self {
            Network::LinkedIn => format!("https://linkedin.com/in/{}", username),
            Network::GitHub => format!("https://github.com/{}", username),
            Network::GitLab => format!("https://gitlab.com/{}", username),
            Network::Instagram => format!("https://instagram.com/{}", username),
            Network::Orcid => format!("https://orcid.org/{}", username),
            Network::Mastodon => {
                let rest = username.trim_start_matches('@');
                match rest.split_once('@') {
                    Some((user, host)) => format!("https://{}/@{}", host, user),
                    None => format!("https://mastodon.social/@{}", rest),
                }
            }
            Network::StackOverflow => format!("https://stackoverflow.com/users/{}", username),
            Network::ResearchGate => format!("https://researchgate.net/profile/{}", username),
            Network::YouTube => format!("https://youtube.com/@{}", username.trim_start_matches('@')),
            Network::GoogleScholar => {
                format!("https://scholar.google.com/citations?user={}", username)
            }
            Network::Telegram => format!("https://t.me/{}", username),
            Network::X => format!("https://x.com/{}", username),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct SocialNetwork {
    pub network: Network,
    pub username: String,
    #[serde(skip)]
    pub url: String,
}

impl SocialNetwork {
    pub(crate) fn read(value: &Value, path: &FieldPath, issues: &mut Issues) -> Option<Self> {
        let Some(map) = value.as_mapping() else {
            issues.push(ValidationIssue::field(
                path.clone(),
                describe(value),
                "expected a mapping with network and username",
            ));
            return None;
        };
        let fields = Fields::new(map, path.clone());
        let before = issues.len();
        fields.reject_unknown(&["network", "username"], issues);

        let network = fields.required_text("network", issues).and_then(|name| {
            let network = Network::from_name(&name);
            if network.is_none() {
                let supported: Vec<&str> = Network::ALL.iter().map(|n| n.name()).collect();
                issues.push(ValidationIssue::field(
                    path.key("network"),
                    format!("\"{}\"", name),
                    format!("unsupported network; supported: {}", supported.join(", ")),
                ));
            }
            network
        });
        let username = fields.required_text("username", issues);

        let (network, username) = (network?, username?);
        if let Err(constraint) = network.check_username(&username) {
            issues.push(ValidationIssue::field(
                path.key("username"),
                format!("\"{}\"", username),
                constraint,
            ));
        }
        if issues.len() > before {
            return None;
        }

        Some(Self {
            url: network.profile_url(&username),
            network,
            username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(yaml: &str) -> (Option<SocialNetwork>, Issues) {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        let mut issues = Vec::new();
        let social = SocialNetwork::read(&value, &FieldPath::from_keys(&["s"]), &mut issues);
        (social, issues)
    }

    #[test]
    fn test_profile_urls() {
        let cases = [
            (Network::GitHub, "jdoe", "https://github.com/jdoe"),
            (Network::LinkedIn, "jdoe", "https://linkedin.com/in/jdoe"),
            (Network::Mastodon, "@jdoe@fosstodon.org", "https://fosstodon.org/@jdoe"),
            (
                Network::StackOverflow,
                "12345/jdoe",
                "https://stackoverflow.com/users/12345/jdoe",
            ),
            (
                Network::GoogleScholar,
                "abc123",
                "https://scholar.google.com/citations?user=abc123",
            ),
            (Network::YouTube, "jdoe", "https://youtube.com/@jdoe"),
        ];
        for (network, username, expected) in cases {
            assert_eq!(network.profile_url(username), expected);
        }
    }

    #[test]
    fn test_read_valid() {
        let (social, issues) = read("network: GitHub\nusername: jdoe\n");
        assert!(issues.is_empty());
        let social = social.unwrap();
        assert_eq!(social.network, Network::GitHub);
        assert_eq!(social.url, "https://github.com/jdoe");
    }

    #[test]
    fn test_unknown_network_lists_supported() {
        let (social, issues) = read("network: MySpace\nusername: jdoe\n");
        assert!(social.is_none());
        assert_eq!(issues[0].path().to_string(), "s.network");
        assert!(issues[0].to_string().contains("Google Scholar"));
    }

    #[test]
    fn test_bad_mastodon_username() {
        let (social, issues) = read("network: Mastodon\nusername: jdoe\n");
        assert!(social.is_none());
        assert_eq!(issues[0].path().to_string(), "s.username");
    }

    #[test]
    fn test_display_name_round_trips() {
        for network in Network::ALL {
            assert_eq!(Network::from_name(network.name()), Some(network));
            let serialized = serde_yaml::to_string(&network).unwrap();
            assert_eq!(serialized.trim().trim_matches('\''), network.name());
        }
    }
}
