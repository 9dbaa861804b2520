use crate::error::{CostbookError, Result};

/// Marketing acquisition channel. The closed set shared by validation,
/// labeling and revenue attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    Direct,
    Website,
    Search,
    Social,
    Campaign,
}

pub const ALL_CHANNELS: &[Channel] = &[
    Channel::Direct,
    Channel::Website,
    Channel::Search,
    Channel::Social,
    Channel::Campaign,
];

impl Channel {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Website => "website",
            Self::Search => "search",
            Self::Social => "social",
            Self::Campaign => "campaign",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct => "Direct Entry",
            Self::Website => "Websites",
            Self::Search => "Search Engines",
            Self::Social => "Social Networks",
            Self::Campaign => "Campaigns",
        }
    }

    pub fn from_code(code: &str) -> Option<Channel> {
        ALL_CHANNELS.iter().find(|c| c.code() == code).copied()
    }

    /// Strict variant for manual entry paths: unknown codes are a
    /// validation error listing the valid set.
    pub fn parse_code(code: &str) -> Result<Channel> {
        Self::from_code(code).ok_or_else(|| {
            let valid: Vec<&str> = ALL_CHANNELS.iter().map(|c| c.code()).collect();
            CostbookError::Validation(format!(
                "Invalid channel type '{code}'. Valid types: {}",
                valid.join(", ")
            ))
        })
    }

    /// Map the analytics platform's numeric referrer-type codes.
    pub fn from_referrer_code(code: u32) -> Option<Channel> {
        match code {
            1 => Some(Self::Direct),
            2 => Some(Self::Search),
            3 => Some(Self::Website),
            6 => Some(Self::Campaign),
            7 => Some(Self::Social),
            _ => None,
        }
    }
}

// Translated referrer-type labels seen in visit breakdowns. Evaluated in
// order, exact match first and then substring containment, so the order
// of overlapping patterns ("campaign" / "campaigns") is significant.
const LABEL_PATTERNS: &[(&str, Channel)] = &[
    ("direct", Channel::Direct),
    ("direct entry", Channel::Direct),
    ("entrée directe", Channel::Direct),
    ("direkt", Channel::Direct),
    ("search", Channel::Search),
    ("search engine", Channel::Search),
    ("search engines", Channel::Search),
    ("moteur de recherche", Channel::Search),
    ("moteurs de recherche", Channel::Search),
    ("suchmaschine", Channel::Search),
    ("website", Channel::Website),
    ("websites", Channel::Website),
    ("site web", Channel::Website),
    ("sites web", Channel::Website),
    ("webseiten", Channel::Website),
    ("social", Channel::Social),
    ("social network", Channel::Social),
    ("social networks", Channel::Social),
    ("réseau social", Channel::Social),
    ("réseaux sociaux", Channel::Social),
    ("soziale netzwerke", Channel::Social),
    ("campaign", Channel::Campaign),
    ("campaigns", Channel::Campaign),
    ("campagne", Channel::Campaign),
    ("campagnes", Channel::Campaign),
    ("kampagnen", Channel::Campaign),
];

/// Resolve a translated breakdown label to a channel.
pub fn match_label(label: &str) -> Option<Channel> {
    let label = label.trim().to_lowercase();

    for (pattern, channel) in LABEL_PATTERNS {
        if *pattern == label {
            return Some(*channel);
        }
    }
    for (pattern, channel) in LABEL_PATTERNS {
        if label.contains(pattern) {
            return Some(*channel);
        }
    }
    None
}
