//! Which menu options a user may see

use crate::domain::{MenuOption, RequestUser, SiteId};

/// Visibility rule for a single option.
///
/// Anonymous users see options flagged for them. Authenticated users see
/// options flagged for authenticated users when they hold every required
/// permission; staff additionally see options flagged for staff.
pub fn is_visible(option: &MenuOption, user: &RequestUser) -> bool {
    match user {
        RequestUser::Anonymous => option.show_to_anonymous,
        RequestUser::Authenticated { is_staff, .. } => {
            let as_member = option.show_to_authenticated && user.has_all(&option.permissions);
            as_member || (*is_staff && option.show_to_staff)
        }
    }
}

/// Keeps visible options, preserving order.
pub fn filter_visible(options: Vec<MenuOption>, user: &RequestUser) -> Vec<MenuOption> {
    options.into_iter().filter(|o| is_visible(o, user)).collect()
}

/// Keeps options attached to `site_id`; everything passes when unset.
pub fn filter_for_site(options: Vec<MenuOption>, site_id: Option<SiteId>) -> Vec<MenuOption> {
    match site_id {
        Some(site) => options.into_iter().filter(|o| o.sites.contains(&site)).collect(),
        None => options,
    }
}
