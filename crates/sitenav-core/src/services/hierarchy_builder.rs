// ============================================================================
// Sitenav Core - Hierarchy Builder
// File: crates/sitenav-core/src/services/hierarchy_builder.rs
// Description: Visible options, the selected chain and the displayable tree
// ============================================================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{MenuHierarchy, MenuNode, MenuOption, MenuRequest, OptionId, SiteId, UrlKwargs};
use crate::repositories::RecordStore;
use crate::routing::{discover_current_url, UrlResolver};
use crate::services::link_resolver::LinkResolver;
use crate::services::url_matcher::UrlMatcher;
use crate::services::visibility::{filter_for_site, filter_visible};

pub struct HierarchyBuilder<S: RecordStore + ?Sized> {
    links: Arc<LinkResolver<S>>,
    matcher: UrlMatcher<S>,
    urls: Arc<dyn UrlResolver>,
    site_id: Option<SiteId>,
}

impl<S: RecordStore + ?Sized> HierarchyBuilder<S> {
    pub fn new(
        links: Arc<LinkResolver<S>>,
        matcher: UrlMatcher<S>,
        urls: Arc<dyn UrlResolver>,
        site_id: Option<SiteId>,
    ) -> Self {
        Self {
            links,
            matcher,
            urls,
            site_id,
        }
    }

    /// Builds the tree for one request from a group's options, which must
    /// already be ordered by `(ordering, id)`.
    pub async fn build(&self, options: Vec<MenuOption>, request: &MenuRequest) -> MenuHierarchy {
        // 1. Site and visibility filters
        let options = filter_visible(filter_for_site(options, self.site_id), &request.user);

        // 2. Where are we?
        let current = discover_current_url(self.urls.as_ref(), request);

        // 3. Drop options that cannot produce a URL, collect match candidates
        let mut visible = Vec::with_capacity(options.len());
        let mut candidates = Vec::new();
        for option in options {
            if !self.links.can_generate(&option, &current.kwargs).await {
                debug!(option_id = option.id, "Menu option cannot generate a URL here");
                continue;
            }
            if self.matcher.url_matches(&option, &current).await {
                candidates.push(option.id);
            }
            visible.push(option);
        }

        // 4. Selected chain and displayable tree
        assemble_hierarchy(visible, &candidates, current.kwargs)
    }
}

/// Assembles the displayable tree from visible options.
///
/// The first candidate whose ancestors are all visible becomes the
/// selection. Top-level options are always displayable; children are
/// displayable only under an option on the selected chain.
pub fn assemble_hierarchy(visible: Vec<MenuOption>, candidates: &[OptionId], current_kwargs: UrlKwargs) -> MenuHierarchy {
    let order: Vec<OptionId> = visible.iter().map(|o| o.id).collect();
    let options: HashMap<OptionId, MenuOption> = visible.into_iter().map(|o| (o.id, o)).collect();

    let selected = select_chain(&options, candidates);
    let selected_params = if selected.is_empty() {
        UrlKwargs::new()
    } else {
        current_kwargs.clone()
    };

    let mut displayable: BTreeMap<MenuNode, Vec<OptionId>> = BTreeMap::new();
    displayable.insert(MenuNode::Root, Vec::new());
    for id in selected.keys() {
        displayable.insert(MenuNode::Option(*id), Vec::new());
    }

    for id in order {
        let node = match options.get(&id).and_then(|o| o.parent_id) {
            None => MenuNode::Root,
            Some(parent) if selected.contains_key(&parent) => MenuNode::Option(parent),
            Some(_) => continue,
        };
        if let Some(children) = displayable.get_mut(&node) {
            children.push(id);
        }
    }

    MenuHierarchy {
        options,
        displayable,
        selected,
        selected_params,
        current_kwargs,
    }
}

fn select_chain(options: &HashMap<OptionId, MenuOption>, candidates: &[OptionId]) -> BTreeMap<OptionId, bool> {
    'candidates: for &candidate in candidates {
        let mut chain = BTreeMap::from([(candidate, true)]);
        let mut seen = HashSet::from([candidate]);
        let mut cursor = options.get(&candidate).and_then(|o| o.parent_id);

        while let Some(parent) = cursor {
            let Some(parent_option) = options.get(&parent) else {
                debug!(option_id = candidate, parent, "Matched option has a hidden ancestor");
                continue 'candidates;
            };
            if !seen.insert(parent) {
                warn!(option_id = candidate, parent, "Parent cycle in menu options");
                continue 'candidates;
            }
            chain.insert(parent, false);
            cursor = parent_option.parent_id;
        }

        return chain;
    }

    BTreeMap::new()
}
