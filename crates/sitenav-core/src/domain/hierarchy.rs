//! Resolved menu tree for one request

use std::collections::{BTreeMap, HashMap};

use super::menu_option::{MenuOption, OptionId};
use super::request::UrlKwargs;

/// Key of a sub menu: the top level or an expanded option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MenuNode {
    Root,
    Option(OptionId),
}

/// Output of the hierarchy builder.
///
/// `displayable` always holds `Root`, plus one entry for every option on
/// the selected chain. `selected` maps that chain to `true` for the option
/// matching the current URL and `false` for its ancestors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuHierarchy {
    /// Every visible option, keyed by id.
    pub options: HashMap<OptionId, MenuOption>,
    pub displayable: BTreeMap<MenuNode, Vec<OptionId>>,
    pub selected: BTreeMap<OptionId, bool>,
    /// Arguments that rebuild the matched option's URL.
    pub selected_params: UrlKwargs,
    /// Arguments the router extracted from the current URL.
    pub current_kwargs: UrlKwargs,
}

impl MenuHierarchy {
    pub fn children(&self, node: MenuNode) -> &[OptionId] {
        self.displayable.get(&node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn option(&self, id: OptionId) -> Option<&MenuOption> {
        self.options.get(&id)
    }

    /// The option matching the current URL.
    pub fn current(&self) -> Option<OptionId> {
        self.selected.iter().find(|(_, is_match)| **is_match).map(|(id, _)| *id)
    }

    pub fn is_current(&self, id: OptionId) -> bool {
        self.selected.get(&id).copied().unwrap_or(false)
    }

    pub fn has_sub_menu(&self, id: OptionId) -> bool {
        self.displayable.contains_key(&MenuNode::Option(id))
    }

    /// Arguments used to build links: the selected ones, or the current
    /// URL's when nothing matched.
    pub fn link_params(&self) -> &UrlKwargs {
        if self.selected.is_empty() {
            &self.current_kwargs
        } else {
            &self.selected_params
        }
    }
}
