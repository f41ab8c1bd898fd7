//! Obsidian vault export
//!
//! Protocols become pages under `Protocols/` with a metadata callout and
//! `[[wikilinks]]` to the protocols and known entities they mention. Generic
//! documents land in `Documents/`, entity stubs in `Entities/`, and the root
//! gets README, protocol, entity and tag indexes.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

use clemens_config::ObsidianConfig;
use clemens_parser::{Document, ParsedDocument, ProtocolDocument};

use crate::error::{ExportError, ExportResult};
use crate::format::{slugify, truncate_chars};

static PROTOCOL_MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Protocol\s+(\d+)").expect("protocol mention regex"));

static LINK_SPAN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]]*\]\]").expect("link span regex"));

pub const PROTOCOLS_FOLDER: &str = "Protocols";
pub const DOCUMENTS_FOLDER: &str = "Documents";
pub const ENTITIES_FOLDER: &str = "Entities";

/// An internal `[[target]]` or `[[target|display]]` link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiLink {
    pub target: String,
    pub display: Option<String>,
}

impl WikiLink {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            display: None,
        }
    }

    pub fn with_display(target: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            display: Some(display.into()),
        }
    }
}

impl fmt::Display for WikiLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display {
            Some(display) => write!(f, "[[{}|{}]]", self.target, display),
            None => write!(f, "[[{}]]", self.target),
        }
    }
}

/// One Markdown file in the vault
#[derive(Debug, Clone, PartialEq)]
pub struct ObsidianPage {
    /// File name including `.md`
    pub filename: String,
    pub title: String,
    /// Body below the frontmatter
    pub content: String,
    /// Extra frontmatter fields, in output order
    pub frontmatter: Vec<(String, String)>,
    pub outgoing_links: Vec<WikiLink>,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
}

impl ObsidianPage {
    pub fn new(
        filename: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            content: content.into(),
            frontmatter: Vec::new(),
            outgoing_links: Vec::new(),
            tags: Vec::new(),
            created: Utc::now(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add a frontmatter field when `value` is present
    pub fn with_field(mut self, key: &str, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.frontmatter.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// File name without the `.md` extension, the target other pages link to
    pub fn stem(&self) -> &str {
        self.filename.strip_suffix(".md").unwrap_or(&self.filename)
    }

    /// Frontmatter block followed by the body
    pub fn render(&self) -> String {
        let mut lines = vec![
            "---".to_string(),
            format!("title: \"{}\"", self.title.replace('"', "\\\"")),
            format!("created: {}", self.created.to_rfc3339()),
        ];
        if !self.tags.is_empty() {
            lines.push(format!("tags: [{}]", self.tags.join(", ")));
        }
        for (key, value) in &self.frontmatter {
            lines.push(format!("{}: {}", key, value));
        }
        lines.push("---".to_string());
        lines.push(String::new());
        lines.push(self.content.clone());
        lines.join("\n")
    }
}

/// Pages keyed by their path relative to the vault root
#[derive(Debug, Clone)]
pub struct ObsidianVault {
    pub name: String,
    pub root_path: PathBuf,
    pub pages: BTreeMap<String, ObsidianPage>,
}

impl ObsidianVault {
    pub fn new(name: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root_path: root_path.into(),
            pages: BTreeMap::new(),
        }
    }

    /// Add `page` under `folder` (empty for the root), returning its key
    pub fn add_page(&mut self, page: ObsidianPage, folder: &str) -> String {
        let key = if folder.is_empty() {
            page.filename.clone()
        } else {
            format!("{}/{}", folder, page.filename)
        };
        self.pages.insert(key.clone(), page);
        key
    }

    pub fn page(&self, path: &str) -> Option<&ObsidianPage> {
        self.pages.get(path)
    }

    /// Whether any page, in any folder, has this link target
    pub fn has_page_named(&self, stem: &str) -> bool {
        self.pages.values().any(|page| page.stem() == stem)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Link target → keys of the pages linking to it
    pub fn backlinks(&self) -> BTreeMap<String, Vec<String>> {
        let mut backlinks: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, page) in &self.pages {
            for link in &page.outgoing_links {
                let sources = backlinks.entry(link.target.clone()).or_default();
                if !sources.contains(key) {
                    sources.push(key.clone());
                }
            }
        }
        backlinks
    }

    /// Write every page below `root_path`, returning the number written
    pub fn export(&self) -> ExportResult<usize> {
        fs::create_dir_all(&self.root_path).map_err(|e| ExportError::io(&self.root_path, e))?;
        for (key, page) in &self.pages {
            let path = self.root_path.join(key);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| ExportError::io(parent, e))?;
            }
            fs::write(&path, page.render()).map_err(|e| ExportError::io(&path, e))?;
            debug!("Wrote {}", path.display());
        }
        Ok(self.pages.len())
    }
}

/// Entities mentioned in `text`: `Protocol_N` for every protocol mention,
/// then each known entity that occurs (case-insensitive), spaces as `_`
pub fn extract_entities(text: &str, known_entities: &[String]) -> Vec<String> {
    let mut entities: Vec<String> = Vec::new();
    let mut push = |entity: String| {
        if !entities.contains(&entity) {
            entities.push(entity);
        }
    };

    for caps in PROTOCOL_MENTION_REGEX.captures_iter(text) {
        if let Some(number) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
            push(format!("Protocol_{}", number));
        }
    }

    let lowered = text.to_lowercase();
    for entity in known_entities {
        if lowered.contains(&entity.to_lowercase()) {
            push(entity.replace(' ', "_"));
        }
    }
    entities
}

fn link_spans(text: &str) -> Vec<Range<usize>> {
    LINK_SPAN_REGEX.find_iter(text).map(|m| m.range()).collect()
}

/// Link the first word-bounded mention of each entity that is not already
/// inside a `[[...]]` link
pub fn add_wikilinks(text: &str, entities: &[String]) -> (String, Vec<WikiLink>) {
    let mut result = text.to_string();
    let mut links = Vec::new();

    for entity in entities {
        let readable = entity.replace('_', " ");
        let Ok(pattern) = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&readable))) else {
            continue;
        };

        let spans = link_spans(&result);
        let found = pattern
            .find_iter(&result)
            .find(|m| !spans.iter().any(|s| m.start() < s.end && s.start < m.end()))
            .map(|m| (m.range(), m.as_str().to_string()));

        if let Some((range, original)) = found {
            let link = WikiLink::with_display(entity.as_str(), original);
            result.replace_range(range, &link.to_string());
            links.push(link);
        }
    }
    (result, links)
}

/// Link target of a protocol's page
pub fn protocol_page_name(protocol: &ProtocolDocument) -> String {
    match protocol.protocol_number {
        Some(number) => format!("Protocol_{}", number),
        None => document_page_name(protocol),
    }
}

fn document_page_name(doc: &ParsedDocument) -> String {
    let slug = slugify(doc.display_title());
    if slug.is_empty() {
        slugify(doc.filepath.file_stem().and_then(|s| s.to_str()).unwrap_or("untitled"))
    } else {
        slug
    }
}

fn status_mark(protocol: &ProtocolDocument) -> &'static str {
    if protocol.is_operational() {
        "✅"
    } else {
        "⚠️"
    }
}

fn or_unknown(value: Option<&str>) -> &str {
    value.unwrap_or("Unknown")
}

/// Vault page for one protocol
pub fn protocol_to_obsidian_page(
    protocol: &ProtocolDocument,
    config: &ObsidianConfig,
) -> ObsidianPage {
    let mut lines = vec![format!("# {}", protocol.display_title())];
    if let Some(subtitle) = &protocol.subtitle {
        lines.push(format!("## {}", subtitle));
    }
    lines.push(String::new());

    lines.push("> [!info] Protocol Metadata".to_string());
    lines.push(format!("> - **Number:** {}", or_unknown(protocol.protocol_id.as_deref())));
    lines.push(format!("> - **Category:** {}", or_unknown(protocol.category.as_deref())));
    lines.push(format!("> - **Status:** {}", or_unknown(protocol.status.as_deref())));
    lines.push(format!("> - **Date:** {}", or_unknown(protocol.discovery_date.as_deref())));
    lines.push(String::new());

    if let Some(emergent) = &protocol.emergent_observation {
        lines.push("## 🎯 Emergent Observation".to_string());
        lines.push(String::new());
        lines.push(truncate_chars(&emergent.content, config.emergent_excerpt_chars).to_string());
        lines.push(String::new());
    }

    if !protocol.checkmarks.is_empty() {
        lines.push("## ✅ Key Points".to_string());
        lines.push(String::new());
        for item in protocol.checkmarks.iter().take(config.max_key_points) {
            lines.push(format!("- ✅ {}", item));
        }
        lines.push(String::new());
    }

    let mut outgoing_links = Vec::new();
    if !protocol.protocol_references.is_empty() {
        lines.push("## 🔗 Related Protocols".to_string());
        lines.push(String::new());
        for reference in &protocol.protocol_references {
            let link = WikiLink::with_display(
                format!("Protocol_{}", reference.number),
                format!("Protocol {}", reference.number),
            );
            if reference.description.is_empty() {
                lines.push(format!("- {}", link));
            } else {
                lines.push(format!("- {}: {}", link, reference.description));
            }
            outgoing_links.push(link);
        }
        lines.push(String::new());
    }

    if !protocol.footer_emojis.is_empty() {
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(protocol.footer_emojis.concat());
    }

    let mut content = lines.join("\n");
    if config.add_links {
        let entities = extract_entities(&content, &config.known_entities);
        let (linked, links) = add_wikilinks(&content, &entities);
        content = linked;
        outgoing_links.extend(links);
    }

    let mut tags = vec!["protocol".to_string(), "nspfrp".to_string()];
    if let Some(category) = &protocol.category {
        let head = category.split('/').next().unwrap_or_default().trim();
        let slug = slugify(head).to_lowercase();
        if !slug.is_empty() {
            tags.push(slug);
        }
    }
    if protocol.is_operational() {
        tags.push("operational".to_string());
    }
    if protocol.is_emergent() {
        tags.push("emergent".to_string());
    }

    let filename = format!("{}.md", protocol_page_name(protocol));
    let title = protocol.title.clone().unwrap_or_else(|| filename.clone());
    let mut page = ObsidianPage::new(filename, title, content)
        .with_tags(tags)
        .with_field("protocol_number", protocol.protocol_number)
        .with_field("category", protocol.category.as_deref())
        .with_field("status", protocol.status.as_deref());
    page.outgoing_links = outgoing_links;
    page
}

/// Vault page holding the opening of a non-protocol document
pub fn document_to_obsidian_page(doc: &ParsedDocument, config: &ObsidianConfig) -> ObsidianPage {
    let title = doc.display_title();
    let content = format!(
        "# {}\n\n{}",
        title,
        truncate_chars(&doc.content, config.document_excerpt_chars)
    );
    ObsidianPage::new(format!("{}.md", document_page_name(doc)), title, content)
        .with_tags(["document"])
}

/// Add an `Entities/` stub for every entity the protocols mention
///
/// Entities that already have a page elsewhere in the vault (a protocol
/// mentioned by number, for instance) are skipped. Returns the number of
/// pages added.
pub fn create_entity_pages<'a, I>(
    vault: &mut ObsidianVault,
    protocols: I,
    config: &ObsidianConfig,
) -> usize
where
    I: IntoIterator<Item = &'a ProtocolDocument>,
{
    let mut referenced_in: BTreeMap<String, Vec<WikiLink>> = BTreeMap::new();
    for protocol in protocols {
        let source = match &protocol.protocol_id {
            Some(id) => WikiLink::with_display(protocol_page_name(protocol), id.as_str()),
            None => WikiLink::new(protocol_page_name(protocol)),
        };
        for entity in extract_entities(&protocol.content, &config.known_entities) {
            let sources = referenced_in.entry(entity).or_default();
            if !sources.contains(&source) {
                sources.push(source.clone());
            }
        }
    }

    let mut added = 0;
    for (entity, sources) in referenced_in {
        if vault.has_page_named(&entity) {
            continue;
        }
        let readable = entity.replace('_', " ");
        let mut lines = vec![
            format!("# {}", readable),
            String::new(),
            "## Referenced In".to_string(),
            String::new(),
        ];
        lines.extend(sources.iter().map(|link| format!("- {}", link)));

        let mut page = ObsidianPage::new(format!("{}.md", entity), readable, lines.join("\n"))
            .with_tags(["entity"]);
        page.outgoing_links = sources;
        vault.add_page(page, ENTITIES_FOLDER);
        added += 1;
    }
    added
}

fn add_index_pages(vault: &mut ObsidianVault, documents: &[Document], config: &ObsidianConfig) {
    let mut protocols: Vec<&ProtocolDocument> =
        documents.iter().filter_map(Document::as_protocol).collect();
    protocols.sort_by_key(|p| p.protocol_number.unwrap_or(0));

    let mut lines = vec![
        format!("# {} Knowledge Base", vault.name),
        String::new(),
        format!("**Generated:** {}", Utc::now().to_rfc3339()),
        format!("**Total Documents:** {}", documents.len()),
        String::new(),
    ];
    if !protocols.is_empty() {
        lines.push("## 📜 Protocols".to_string());
        lines.push(String::new());
        for protocol in &protocols {
            lines.push(format!(
                "- {} {}",
                status_mark(protocol),
                WikiLink::with_display(protocol_page_name(protocol), protocol.display_title())
            ));
        }
        lines.push(String::new());
    }
    lines.push("## 🗺️ Navigation".to_string());
    lines.push(String::new());
    lines.push("- [[Protocol_Index|Protocol Index]]".to_string());
    lines.push("- [[Entity_Index|Entity Index]]".to_string());
    lines.push("- [[Tag_Index|Tags]]".to_string());
    let readme = ObsidianPage::new(
        "README.md",
        format!("{} Knowledge Base", vault.name),
        lines.join("\n"),
    )
    .with_tags(["index"]);
    vault.add_page(readme, "");

    if !protocols.is_empty() {
        let mut by_category: BTreeMap<&str, Vec<&ProtocolDocument>> = BTreeMap::new();
        for &protocol in &protocols {
            by_category
                .entry(protocol.category.as_deref().unwrap_or("Uncategorized"))
                .or_default()
                .push(protocol);
        }
        let mut lines = vec!["# Protocol Index".to_string(), String::new()];
        for (category, members) in by_category {
            lines.push(format!("## {}", category));
            lines.push(String::new());
            for protocol in members {
                lines.push(format!("- {}", WikiLink::new(protocol_page_name(protocol))));
            }
            lines.push(String::new());
        }
        let index = ObsidianPage::new("Protocol_Index.md", "Protocol Index", lines.join("\n"))
            .with_tags(["index", "protocols"]);
        vault.add_page(index, "");
    }

    let entities: BTreeSet<String> = protocols
        .iter()
        .flat_map(|p| extract_entities(&p.content, &config.known_entities))
        .collect();
    let mut lines = vec!["# Entity Index".to_string(), String::new()];
    lines.extend(entities.iter().map(|e| format!("- {}", WikiLink::new(e.as_str()))));
    let index = ObsidianPage::new("Entity_Index.md", "Entity Index", lines.join("\n"))
        .with_tags(["index", "entities"]);
    vault.add_page(index, "");

    let mut by_tag: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for page in vault.pages.values() {
        for tag in &page.tags {
            by_tag.entry(tag).or_default().insert(page.stem());
        }
    }
    let mut lines = vec!["# Tag Index".to_string(), String::new()];
    for (tag, stems) in &by_tag {
        lines.push(format!("## #{}", tag));
        lines.push(String::new());
        lines.extend(stems.iter().map(|stem| format!("- [[{}]]", stem)));
        lines.push(String::new());
    }
    let index = ObsidianPage::new("Tag_Index.md", "Tags", lines.join("\n")).with_tags(["index"]);
    vault.add_page(index, "");
}

/// Build the vault for `documents` and write it below `root`
pub fn export_obsidian_vault(
    documents: &[Document],
    root: impl AsRef<Path>,
    config: &ObsidianConfig,
) -> ExportResult<ObsidianVault> {
    let mut vault = ObsidianVault::new(config.vault_name.as_str(), root.as_ref());

    for doc in documents {
        match doc {
            Document::Protocol(protocol) => {
                vault.add_page(protocol_to_obsidian_page(protocol, config), PROTOCOLS_FOLDER);
            }
            Document::Generic(doc) => {
                vault.add_page(document_to_obsidian_page(doc, config), DOCUMENTS_FOLDER);
            }
        }
    }

    if config.create_entity_pages {
        let protocols = documents.iter().filter_map(Document::as_protocol);
        let added = create_entity_pages(&mut vault, protocols, config);
        debug!("Added {} entity pages", added);
    }

    add_index_pages(&mut vault, documents, config);
    let written = vault.export()?;
    info!(
        "Exported {} pages to vault '{}' at {}",
        written,
        vault.name,
        vault.root_path.display()
    );
    Ok(vault)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clemens_parser::test_utils::{parse_protocol_text, protocol_markdown};

    fn entities(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_wikilink_display() {
        assert_eq!(WikiLink::new("Home").to_string(), "[[Home]]");
        assert_eq!(
            WikiLink::with_display("Protocol_3", "P3").to_string(),
            "[[Protocol_3|P3]]"
        );
    }

    #[test]
    fn test_render_frontmatter() {
        let page = ObsidianPage::new("a.md", "Say \"hi\"", "body")
            .with_tags(["protocol", "nspfrp"])
            .with_field("protocol_number", Some(4))
            .with_field("category", None::<&str>);
        let text = page.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "---");
        assert_eq!(lines[1], "title: \"Say \\\"hi\\\"\"");
        assert!(lines[2].starts_with("created: "));
        assert_eq!(lines[3], "tags: [protocol, nspfrp]");
        assert_eq!(lines[4], "protocol_number: 4");
        assert_eq!(lines[5], "---");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "body");
    }

    #[test]
    fn test_extract_entities_dedupes_in_order() {
        let known = entities(&["Mark Twain", "Lewis & Clark", "Marco Polo"]);
        let found = extract_entities(
            "protocol 3 met mark twain; Protocol 3 again, then Protocol 1 and LEWIS & CLARK",
            &known,
        );
        assert_eq!(found, vec!["Protocol_3", "Protocol_1", "Mark_Twain", "Lewis_&_Clark"]);
    }

    #[test]
    fn test_add_wikilinks_first_mention_only() {
        let (text, links) = add_wikilinks(
            "Mark Twain wrote. mark twain again.",
            &entities(&["Mark_Twain"]),
        );
        assert_eq!(text, "[[Mark_Twain|Mark Twain]] wrote. mark twain again.");
        assert_eq!(links, vec![WikiLink::with_display("Mark_Twain", "Mark Twain")]);
    }

    #[test]
    fn test_add_wikilinks_skips_existing_links() {
        let (text, links) = add_wikilinks(
            "- [[Protocol_7|Protocol 7]]: river. Later Protocol 7 again.",
            &entities(&["Protocol_7"]),
        );
        assert_eq!(
            text,
            "- [[Protocol_7|Protocol 7]]: river. Later [[Protocol_7|Protocol 7]] again."
        );
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_add_wikilinks_respects_word_bounds() {
        let (text, links) = add_wikilinks("Protocol 70 only", &entities(&["Protocol_7"]));
        assert_eq!(text, "Protocol 70 only");
        assert!(links.is_empty());
    }

    #[test]
    fn test_protocol_page() {
        let protocol =
            parse_protocol_text(&protocol_markdown(12, "Fog", "✅ OPERATIONAL"), "PROTOCOL_12.md");
        let page = protocol_to_obsidian_page(&protocol, &ObsidianConfig::default());

        assert_eq!(page.filename, "Protocol_12.md");
        assert_eq!(page.title, "PROTOCOL 12: Fog");
        assert_eq!(page.tags, vec!["protocol", "nspfrp", "navigation", "operational"]);
        assert_eq!(
            page.frontmatter,
            vec![
                ("protocol_number".to_string(), "12".to_string()),
                ("category".to_string(), "Navigation".to_string()),
                ("status".to_string(), "✅ OPERATIONAL".to_string()),
            ]
        );
        assert!(page.content.starts_with("# [[Protocol_12|PROTOCOL 12]]: Fog\n"));
        assert!(page.content.contains("> - **Number:** P12"));
        assert!(page.content.contains("- [[Protocol_11|Protocol 11]]: earlier soundings."));
        assert!(page
            .content
            .contains("Builds on [[Protocol_11|Protocol 11]]: earlier soundings."));
        assert!(page.content.ends_with("---\n🌊🚀✨"));
        assert!(page
            .outgoing_links
            .iter()
            .any(|l| l.target == "Protocol_11"));
    }

    #[test]
    fn test_protocol_page_without_links() {
        let protocol =
            parse_protocol_text(&protocol_markdown(2, "Fog", "draft"), "PROTOCOL_2.md");
        let config = ObsidianConfig {
            add_links: false,
            ..ObsidianConfig::default()
        };
        let page = protocol_to_obsidian_page(&protocol, &config);
        assert!(page.content.starts_with("# PROTOCOL 2: Fog\n"));
        assert!(!page.content.contains("Builds on [["));
        assert!(!page.tags.contains(&"operational".to_string()));
    }

    #[test]
    fn test_vault_backlinks_and_keys() {
        let mut vault = ObsidianVault::new("Test", "/tmp/unused");
        let mut a = ObsidianPage::new("A.md", "A", "");
        a.outgoing_links.push(WikiLink::new("C"));
        let mut b = ObsidianPage::new("B.md", "B", "");
        b.outgoing_links.push(WikiLink::new("C"));
        assert_eq!(vault.add_page(a, "Docs"), "Docs/A.md");
        assert_eq!(vault.add_page(b, ""), "B.md");

        let backlinks = vault.backlinks();
        assert_eq!(backlinks["C"], vec!["B.md", "Docs/A.md"]);
        assert!(vault.page("Docs/A.md").is_some());
        assert!(vault.has_page_named("A"));
        assert_eq!(vault.len(), 2);
    }
}
