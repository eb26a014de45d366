//! What the profile card says.

use serde::{Deserialize, Serialize};

/// A labelled link shown under the tagline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Short label, e.g. "GitHub".
    pub label: String,
    /// Where it points.
    pub url: String,
}

/// The text on the profile card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Owner name, shown large.
    pub name: String,
    /// Titles the typewriter line cycles through.
    pub titles: Vec<String>,
    /// One line under the title.
    pub tagline: String,
    /// Links shown at the bottom of the card.
    pub links: Vec<Link>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: "Anuj Nayak".into(),
            titles: vec![
                "Mathematics Explorer".into(),
                "AI/ML Enthusiast".into(),
                "Creative Problem Solver".into(),
                "Full-Stack Developer".into(),
            ],
            tagline: "Building things for the web, one experiment at a time.".into(),
            links: vec![Link {
                label: "GitHub".into(),
                url: "https://github.com/AnujNayak108".into(),
            }],
        }
    }
}
