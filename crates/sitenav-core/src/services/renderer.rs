//! HTML rendering of a menu hierarchy

use std::collections::HashMap;

use sitenav_shared::constants::{DEFAULT_GROUP_TAG, DEFAULT_ITEM_TAG};
use sitenav_shared::utils::{escape_html, is_valid_tag_name};

use crate::domain::{MenuHierarchy, MenuNode, OptionId};
use crate::error::DomainError;
use crate::services::link_resolver::LinkEntry;

/// Link entries resolved for each displayable option.
pub type EntryMap = HashMap<OptionId, Vec<LinkEntry>>;

/// Element names wrapping a level and each of its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuTags {
    group_tag: String,
    item_tag: String,
}

impl MenuTags {
    pub fn new(group_tag: &str, item_tag: &str) -> Result<Self, DomainError> {
        for tag in [group_tag, item_tag] {
            if !is_valid_tag_name(tag) {
                return Err(DomainError::InvalidTagName(tag.to_string()));
            }
        }
        Ok(Self {
            group_tag: group_tag.to_ascii_lowercase(),
            item_tag: item_tag.to_ascii_lowercase(),
        })
    }

    /// `<ul>` / `<li>`
    pub fn list() -> Self {
        Self {
            group_tag: DEFAULT_GROUP_TAG.to_string(),
            item_tag: DEFAULT_ITEM_TAG.to_string(),
        }
    }

    /// `<div>` / `<div>`
    pub fn div() -> Self {
        Self {
            group_tag: "div".to_string(),
            item_tag: "div".to_string(),
        }
    }

    pub fn group_tag(&self) -> &str {
        &self.group_tag
    }

    pub fn item_tag(&self) -> &str {
        &self.item_tag
    }
}

impl Default for MenuTags {
    fn default() -> Self {
        Self::list()
    }
}

/// Renders the top level and, recursively, every expanded sub menu.
///
/// Returns an empty string when nothing is displayable.
pub fn render_menu(hierarchy: &MenuHierarchy, entries: &EntryMap, tags: &MenuTags) -> String {
    render_level(hierarchy, entries, tags, MenuNode::Root, 0)
}

fn render_level(hierarchy: &MenuHierarchy, entries: &EntryMap, tags: &MenuTags, node: MenuNode, level: usize) -> String {
    let mut items = Vec::new();

    for &id in hierarchy.children(node) {
        let Some(option) = hierarchy.option(id) else {
            continue;
        };
        let is_current = hierarchy.is_current(id);

        for entry in entries.get(&id).map(Vec::as_slice).unwrap_or(&[]) {
            // Model options highlight the matching row only
            let highlighted = entry.selected || (is_current && option.model_target().is_none());

            let sub_menu = if hierarchy.has_sub_menu(id) && option.expands_children(entry.selected) {
                render_level(hierarchy, entries, tags, MenuNode::Option(id), level + 1)
            } else {
                String::new()
            };

            items.push(render_item(entry, tags, level, highlighted, &sub_menu));
        }
    }

    if items.is_empty() {
        return String::new();
    }

    format!(
        "<{tag} class=\"menu-level-{level}\">\n{items}\n</{tag}>",
        tag = tags.group_tag,
        level = level,
        items = items.join("\n"),
    )
}

fn render_item(entry: &LinkEntry, tags: &MenuTags, level: usize, highlighted: bool, sub_menu: &str) -> String {
    let mut class = format!("menu-item menu-level-{}", level);
    if highlighted {
        class.push_str(" selected");
    }

    let text = escape_html(&entry.text);
    let title = escape_html(&entry.title);
    let label = match &entry.href {
        Some(href) => format!("<a href=\"{}\" title=\"{}\">{}</a>", escape_html(href), title, text),
        None => format!("<span title=\"{}\">{}</span>", title, text),
    };

    format!(
        "<{tag} class=\"{class}\">{label}{sub_menu}</{tag}>",
        tag = tags.item_tag,
        class = class,
        label = label,
        sub_menu = sub_menu,
    )
}
