//! Module data model.
//!
//! A module is one unit of authored content with an append-only version
//! history. Versions are never edited; restoring an old version appends a
//! copy of it.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markdown::render_markdown;
use crate::references::parse_references;

/// Kind of content a module holds. Drives per-type styling in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Definition,
    Example,
    Explanation,
    Diagram,
    Proof,
    Problem,
}

impl ModuleType {
    /// Every type, in display order.
    pub const ALL: [ModuleType; 6] = [
        ModuleType::Definition,
        ModuleType::Example,
        ModuleType::Explanation,
        ModuleType::Diagram,
        ModuleType::Proof,
        ModuleType::Problem,
    ];

    /// The lowercase tag used in markup and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleType::Definition => "definition",
            ModuleType::Example => "example",
            ModuleType::Explanation => "explanation",
            ModuleType::Diagram => "diagram",
            ModuleType::Proof => "proof",
            ModuleType::Problem => "problem",
        }
    }
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ModuleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ModuleType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownModuleType(s.to_string()))
    }
}

/// Module author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Identifying metadata of a module: what a reference link needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

/// One immutable snapshot of a module's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleVersion {
    number: u32,
    markdown: String,
    html: String,
    created_at: DateTime<Utc>,
}

impl ModuleVersion {
    fn new(number: u32, markdown: String, html: String) -> Self {
        Self {
            number,
            markdown,
            html,
            created_at: Utc::now(),
        }
    }

    /// Version number, starting at 1.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Raw markdown source.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// HTML rendered when the version was created.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// A unit of authored content with its full version history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ModuleRecord")]
pub struct Module {
    id: String,
    title: String,
    #[serde(rename = "type")]
    module_type: ModuleType,
    author: Author,
    versions: Vec<ModuleVersion>,
}

impl Module {
    /// Create a module whose history starts at version 1 with `markdown`.
    pub fn create(
        id: impl Into<String>,
        title: impl Into<String>,
        module_type: ModuleType,
        author: Author,
        markdown: impl Into<String>,
    ) -> Self {
        let markdown = markdown.into();
        let html = render_markdown(&markdown);
        Self {
            id: id.into(),
            title: title.into(),
            module_type,
            author,
            versions: vec![ModuleVersion::new(1, markdown, html)],
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn module_type(&self) -> ModuleType {
        self.module_type
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    /// All versions, oldest first.
    pub fn versions(&self) -> &[ModuleVersion] {
        &self.versions
    }

    /// The version with the highest number.
    pub fn latest(&self) -> &ModuleVersion {
        // Construction and deserialization both guarantee a non-empty history.
        &self.versions[self.versions.len() - 1]
    }

    /// Look up a version by number.
    pub fn version(&self, number: u32) -> Option<&ModuleVersion> {
        self.versions.iter().find(|v| v.number == number)
    }

    /// Identifying metadata for reference lookups.
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            module_type: self.module_type,
        }
    }

    /// Ids referenced by the latest version's markdown.
    pub fn references(&self) -> BTreeSet<String> {
        parse_references(self.latest().markdown())
    }

    /// Append a new version carrying `markdown`.
    pub fn update_content(&mut self, markdown: impl Into<String>) -> &ModuleVersion {
        let markdown = markdown.into();
        let html = render_markdown(&markdown);
        self.push_version(markdown, html)
    }

    /// Append a new version that copies the content of version `number`.
    pub fn restore(&mut self, number: u32) -> Result<&ModuleVersion> {
        let source = self.version(number).ok_or_else(|| Error::VersionNotFound {
            module_id: self.id.clone(),
            version: number,
        })?;
        let (markdown, html) = (source.markdown.clone(), source.html.clone());
        tracing::debug!("Restoring module {} to content of version {}", self.id, number);
        Ok(self.push_version(markdown, html))
    }

    fn push_version(&mut self, markdown: String, html: String) -> &ModuleVersion {
        let number = self.latest().number + 1;
        self.versions.push(ModuleVersion::new(number, markdown, html));
        self.latest()
    }
}

/// Serialized form of a module, validated into [`Module`].
#[derive(Deserialize)]
struct ModuleRecord {
    id: String,
    title: String,
    #[serde(rename = "type")]
    module_type: ModuleType,
    author: Author,
    versions: Vec<VersionRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionRecord {
    number: u32,
    markdown: String,
    #[serde(default)]
    html: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<ModuleRecord> for Module {
    type Error = Error;

    fn try_from(record: ModuleRecord) -> Result<Self> {
        if record.versions.is_empty() {
            return Err(Error::InvalidModule(format!(
                "module '{}' has no versions",
                record.id
            )));
        }

        let mut versions = Vec::with_capacity(record.versions.len());
        for (expected, version) in (1u32..).zip(record.versions) {
            if version.number != expected {
                return Err(Error::InvalidModule(format!(
                    "module '{}' has version {} where version {} was expected",
                    record.id, version.number, expected
                )));
            }
            let html = version
                .html
                .unwrap_or_else(|| render_markdown(&version.markdown));
            versions.push(ModuleVersion {
                number: version.number,
                markdown: version.markdown,
                html,
                created_at: version.created_at.unwrap_or_else(Utc::now),
            });
        }

        Ok(Module {
            id: record.id,
            title: record.title,
            module_type: record.module_type,
            author: record.author,
            versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Module {
        Module::create(
            "limits",
            "Limits",
            ModuleType::Definition,
            Author::new("u1", "Ada"),
            "# Limits\n\nSee @module:continuity.",
        )
    }

    #[test]
    fn test_create_starts_at_version_one() {
        let module = sample();
        assert_eq!(module.versions().len(), 1);
        assert_eq!(module.latest().number(), 1);
        assert!(module.latest().html().contains("<h1>Limits</h1>"));
    }

    #[test]
    fn test_update_appends_version() {
        let mut module = sample();
        module.update_content("# Limits v2");
        assert_eq!(module.versions().len(), 2);
        assert_eq!(module.latest().number(), 2);
        // Old version is untouched.
        assert!(module.version(1).unwrap().markdown().contains("@module:continuity"));
        assert_eq!(module.latest().markdown(), "# Limits v2");
    }

    #[test]
    fn test_restore_appends_copy() {
        let mut module = sample();
        module.update_content("rewritten");
        let restored = module.restore(1).unwrap().clone();
        assert_eq!(restored.number(), 3);
        assert_eq!(restored.markdown(), module.version(1).unwrap().markdown());
        assert_eq!(module.versions().len(), 3);
    }

    #[test]
    fn test_restore_missing_version() {
        let mut module = sample();
        let err = module.restore(7).unwrap_err();
        assert!(matches!(err, Error::VersionNotFound { version: 7, .. }));
        assert_eq!(module.versions().len(), 1);
    }

    #[test]
    fn test_references_follow_latest_version() {
        let mut module = sample();
        assert!(module.references().contains("continuity"));
        module.update_content("Now see @module:derivative");
        let refs = module.references();
        assert!(refs.contains("derivative"));
        assert!(!refs.contains("continuity"));
    }

    #[test]
    fn test_module_type_parse() {
        assert_eq!("Proof".parse::<ModuleType>().unwrap(), ModuleType::Proof);
        assert!(matches!(
            "lemma".parse::<ModuleType>(),
            Err(Error::UnknownModuleType(_))
        ));
        assert_eq!(ModuleType::Diagram.to_string(), "diagram");
    }

    #[test]
    fn test_module_type_display_pads() {
        assert_eq!(format!("[{:<12}]", ModuleType::Proof), "[proof       ]");
        assert_eq!(format!("[{:>7}]", ModuleType::Example), "[example]");
    }

    #[test]
    fn test_deserialize_renders_missing_html() {
        let json = r##"{
            "id": "m1", "title": "M1", "type": "example",
            "author": {"id": "u", "name": "Grace"},
            "versions": [{"number": 1, "markdown": "# Hi"}]
        }"##;
        let module: Module = serde_json::from_str(json).unwrap();
        assert_eq!(module.latest().html(), "<h1>Hi</h1>\n");
        assert_eq!(module.module_type(), ModuleType::Example);
    }

    #[test]
    fn test_deserialize_rejects_empty_history() {
        let json = r#"{
            "id": "m1", "title": "M1", "type": "example",
            "author": {"id": "u", "name": "Grace"},
            "versions": []
        }"#;
        assert!(serde_json::from_str::<Module>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_gap_in_numbers() {
        let json = r#"{
            "id": "m1", "title": "M1", "type": "proof",
            "author": {"id": "u", "name": "Grace"},
            "versions": [{"number": 1, "markdown": "a"}, {"number": 3, "markdown": "b"}]
        }"#;
        assert!(serde_json::from_str::<Module>(json).is_err());
    }

    #[test]
    fn test_serialize_roundtrip_keeps_history() {
        let mut module = sample();
        module.update_content("second");
        let json = serde_json::to_string(&module).unwrap();
        let back: Module = serde_json::from_str(&json).unwrap();
        assert_eq!(back, module);
    }
}
