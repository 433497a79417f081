use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{json, Value};

use sitenav_core::domain::{ContentTypeSchema, MenuNode, MenuOptionRecord, MenuRequest, RequestUser, SiteId};
use sitenav_core::routing::UrlResolver;
use sitenav_core::services::{MenuAdminService, MenuService, MenuTags};
use sitenav_core::repositories::MenuRepository;

use crate::memory::{InMemoryMenuRepository, InMemoryRecordStore};
use crate::routing::PatternRouter;

struct Site {
    repo: Arc<InMemoryMenuRepository>,
    records: Arc<InMemoryRecordStore>,
    router: Arc<PatternRouter>,
    admin: MenuAdminService<InMemoryMenuRepository>,
}

impl Site {
    async fn new() -> Self {
        let router = Arc::new(PatternRouter::new());
        for (name, view, pattern) in [
            ("home", "home", "/"),
            ("contact", "contact", "/contact/"),
            ("blog-list", "blog_list", "/blog/"),
            ("blog-detail", "blog_detail", "/blog/<slug:slug>/"),
            ("article-detail", "article_detail", "/articles/<int:pk>/"),
            ("category", "category", "/category/<slug:cat>/"),
        ] {
            router.add(name, view, pattern).unwrap();
        }

        let records = Arc::new(InMemoryRecordStore::new());
        records.register(ContentTypeSchema {
            name: "article".to_string(),
            label_field: "title".to_string(),
            fields: vec!["id".to_string(), "title".to_string(), "category".to_string()],
            managers: BTreeMap::new(),
        });
        for (id, title, category) in [(1, "First", "news"), (2, "Second", "news"), (3, "Third", "sport")] {
            records
                .insert("article", json!({"id": id, "title": title, "category": category}))
                .unwrap();
        }

        let repo = Arc::new(InMemoryMenuRepository::new());
        let admin = MenuAdminService::new(repo.clone());
        admin
            .create_group(sitenav_core::domain::MenuGroup::new(1, "main".to_string(), String::new()).unwrap())
            .await
            .unwrap();

        Self {
            repo,
            records,
            router,
            admin,
        }
    }

    async fn add(&self, fields: Value) {
        let mut record = json!({
            "menu_group_id": 1,
            "show_to_anonymous": true,
        });
        if let (Some(base), Value::Object(extra)) = (record.as_object_mut(), fields) {
            base.extend(extra);
        }
        let record: MenuOptionRecord = serde_json::from_value(record).unwrap();
        self.admin.save_option(record).await.unwrap();
    }

    fn menus(&self, site_id: Option<SiteId>) -> MenuService<InMemoryMenuRepository, InMemoryRecordStore> {
        let urls: Arc<dyn UrlResolver> = self.router.clone();
        MenuService::new(self.repo.clone(), self.records.clone(), urls, site_id)
    }
}

fn request(user: RequestUser, path: &str) -> MenuRequest {
    MenuRequest::new(user, "http", "testserver", path)
}

async fn main_group(site: &Site) -> sitenav_core::domain::MenuGroup {
    site.repo.find_group_by_name("main").await.unwrap().unwrap()
}

#[tokio::test]
async fn contact_page_selects_absolute_option() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Contact", "url": "/contact/", "ordering": 1})).await;
    site.add(json!({"id": 2, "name": "Blog", "option_type": "named", "url_name": "blog-list", "ordering": 2})).await;

    let menus = site.menus(None);
    let req = request(RequestUser::Anonymous, "/contact/");
    let hierarchy = menus.generate_hierarchy(&main_group(&site).await, &req).await.unwrap();
    assert_eq!(hierarchy.selected, BTreeMap::from([(1, true)]));

    let html = menus.render("main", &req, &MenuTags::list()).await;
    assert!(html.contains("<span title=\"\">Contact</span>"));
    assert!(html.contains("<a href=\"/blog/\" title=\"\">Blog</a>"));
}

#[tokio::test]
async fn blog_detail_selects_named_chain() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Blog", "option_type": "named", "url_name": "blog-list", "ordering": 1})).await;
    site.add(json!({"id": 2, "parent_id": 1, "name": "Post", "option_type": "named", "url_name": "blog-detail", "ordering": 1})).await;

    let menus = site.menus(None);
    let req = request(RequestUser::Anonymous, "/blog/x/");
    let hierarchy = menus.generate_hierarchy(&main_group(&site).await, &req).await.unwrap();
    assert_eq!(hierarchy.selected, BTreeMap::from([(1, false), (2, true)]));

    let html = menus.render("main", &req, &MenuTags::list()).await;
    assert!(html.contains("<a href=\"/blog/\" title=\"\">Blog</a><ul class=\"menu-level-1\">"));
    assert!(html.contains("<li class=\"menu-item menu-level-1 selected\"><span title=\"\">Post</span></li>"));
}

#[tokio::test]
async fn article_detail_fans_out_model_rows() {
    let site = Site::new().await;
    site.add(json!({
        "id": 1, "name": "Articles", "option_type": "model", "ordering": 1,
        "url_name": "article-detail", "content_type": "article",
        "url_id": "pk", "model_id": "id", "order_by": "id"
    }))
    .await;

    let menus = site.menus(None);
    let req = request(RequestUser::Anonymous, "/articles/2/");
    let hierarchy = menus.generate_hierarchy(&main_group(&site).await, &req).await.unwrap();
    let entries = menus.resolve_entries(&hierarchy).await;

    let rows = &entries[&1_i64];
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].href.as_deref(), Some("/articles/1/"));
    assert!(rows[1].selected);
    assert_eq!(rows[1].href, None);
    assert_eq!(rows[2].href.as_deref(), Some("/articles/3/"));

    let html = menus.render("main", &req, &MenuTags::div()).await;
    assert!(html.contains("<div class=\"menu-item menu-level-0 selected\"><span title=\"\">Second</span></div>"));
}

#[tokio::test]
async fn model_option_needing_missing_argument_is_hidden() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Home", "option_type": "named", "url_name": "home", "ordering": 1})).await;
    site.add(json!({
        "id": 2, "name": "In category", "option_type": "model", "ordering": 2,
        "url_name": "article-detail", "content_type": "article", "query": "category=%(cat)s",
        "url_id": "pk", "model_id": "id"
    }))
    .await;

    let menus = site.menus(None);
    let group = main_group(&site).await;

    let home = menus.generate_hierarchy(&group, &request(RequestUser::Anonymous, "/")).await.unwrap();
    assert!(home.displayable.values().all(|ids| !ids.contains(&2)));

    // With the argument present the same option fans out
    let html = menus
        .render("main", &request(RequestUser::Anonymous, "/category/news/"), &MenuTags::list())
        .await;
    assert!(html.contains(">First</a>"));
    assert!(html.contains(">Second</a>"));
    assert!(!html.contains("Third"));
}

#[tokio::test]
async fn staff_flag_shows_option_to_staff_only() {
    let site = Site::new().await;
    site.add(json!({
        "id": 1, "name": "Admin", "url": "/admin/", "ordering": 1,
        "show_to_anonymous": false, "show_to_authenticated": false, "show_to_staff": true
    }))
    .await;

    let menus = site.menus(None);
    let member = menus
        .render("main", &request(RequestUser::authenticated("ana"), "/"), &MenuTags::list())
        .await;
    let staff = menus
        .render("main", &request(RequestUser::staff("root"), "/"), &MenuTags::list())
        .await;
    assert_eq!(member, "");
    assert!(staff.contains("Admin"));
}

#[tokio::test]
async fn permissions_and_superusers() {
    let site = Site::new().await;
    site.add(json!({
        "id": 1, "name": "Write", "url": "/write/", "ordering": 1,
        "show_to_anonymous": false, "show_to_staff": false, "permissions": ["blog.add_post"]
    }))
    .await;

    let menus = site.menus(None);
    let tags = MenuTags::list();
    let without = RequestUser::authenticated("ana");
    let with = RequestUser::authenticated("bo").with_permissions(["blog.add_post"]);
    let superuser = RequestUser::Authenticated {
        username: "root".to_string(),
        is_staff: false,
        is_superuser: true,
        permissions: Default::default(),
    };

    assert_eq!(menus.render("main", &request(without, "/"), &tags).await, "");
    assert!(menus.render("main", &request(with, "/"), &tags).await.contains("Write"));
    assert!(menus.render("main", &request(superuser, "/"), &tags).await.contains("Write"));
}

#[tokio::test]
async fn site_filter_keeps_attached_options() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Everywhere", "url": "/a/", "ordering": 1, "sites": [1, 2]})).await;
    site.add(json!({"id": 2, "name": "Second site", "url": "/b/", "ordering": 2, "sites": [2]})).await;

    let req = request(RequestUser::Anonymous, "/");
    let first = site.menus(Some(1)).render("main", &req, &MenuTags::list()).await;
    assert!(first.contains("Everywhere"));
    assert!(!first.contains("Second site"));

    let all = site.menus(None).render("main", &req, &MenuTags::list()).await;
    assert!(all.contains("Second site"));
}

#[tokio::test]
async fn rendering_is_idempotent() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Blog", "option_type": "named", "url_name": "blog-list", "ordering": 1})).await;
    site.add(json!({"id": 2, "parent_id": 1, "name": "Post", "option_type": "named", "url_name": "blog-detail", "ordering": 1})).await;
    site.add(json!({"id": 3, "name": "Contact", "url": "/contact/", "ordering": 2})).await;

    let menus = site.menus(None);
    let req = request(RequestUser::Anonymous, "/blog/hello/");
    let first = menus.render("main", &req, &MenuTags::list()).await;
    let second = menus.render("main", &req, &MenuTags::list()).await;
    assert_eq!(first, second);

    let group = main_group(&site).await;
    let a = menus.generate_hierarchy(&group, &req).await.unwrap();
    let b = menus.generate_hierarchy(&group, &req).await.unwrap();
    assert_eq!(a, b);
    assert_eq!(a.children(MenuNode::Root), &[1, 3]);
}

#[tokio::test]
async fn unknown_group_and_unroutable_path() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Contact", "url": "/contact/", "ordering": 1})).await;
    let menus = site.menus(None);

    assert_eq!(menus.render("footer", &request(RequestUser::Anonymous, "/"), &MenuTags::list()).await, "");

    let html = menus
        .render("main", &request(RequestUser::Anonymous, "/no/such/page/"), &MenuTags::list())
        .await;
    assert!(html.contains("<a href=\"/contact/\""));
    assert!(!html.contains("selected"));
}

#[tokio::test]
async fn ancestor_chain_is_complete_for_deep_trees() {
    let site = Site::new().await;
    site.add(json!({"id": 1, "name": "Level 0", "url": "/a/", "ordering": 1})).await;
    site.add(json!({"id": 2, "parent_id": 1, "name": "Level 1", "url": "/b/", "ordering": 1})).await;
    site.add(json!({"id": 3, "parent_id": 2, "name": "Level 2", "url": "/contact/", "ordering": 1})).await;
    site.add(json!({"id": 4, "parent_id": 2, "name": "Sibling", "url": "/d/", "ordering": 2})).await;
    site.add(json!({"id": 5, "parent_id": 4, "name": "Hidden nephew", "url": "/e/", "ordering": 1})).await;

    let menus = site.menus(None);
    let req = request(RequestUser::Anonymous, "/contact/");
    let h = menus.generate_hierarchy(&main_group(&site).await, &req).await.unwrap();

    assert_eq!(h.selected, BTreeMap::from([(1, false), (2, false), (3, true)]));
    assert_eq!(h.children(MenuNode::Option(2)), &[3, 4]);
    assert!(!h.has_sub_menu(4));

    let html = menus.render("main", &req, &MenuTags::list()).await;
    assert!(html.contains("menu-level-2"));
    assert!(!html.contains("Hidden nephew"));
}

#[tokio::test]
async fn breadcrumbs_follow_router_views() {
    use sitenav_core::domain::{BreadcrumbPolicy, BreadcrumbRegistry, CrumbContext, Setting};
    use sitenav_core::routing::LazyUrl;
    use sitenav_core::services::{BreadcrumbService, RootUrl};

    use crate::memory::InMemoryBreadcrumbStore;

    let site = Site::new().await;
    let urls: Arc<dyn UrlResolver> = site.router.clone();

    let mut registry = BreadcrumbRegistry::new();
    registry
        .register("blog_list", BreadcrumbPolicy::reset("Blog"))
        .register(
            "blog_detail",
            BreadcrumbPolicy::new(
                Setting::computed(|ctx: &CrumbContext| format!("Post {}", ctx.kwargs.get("slug").cloned().unwrap_or_default())),
                Setting::Fixed(false),
                Setting::Fixed(true),
            ),
        );

    let store = Arc::new(InMemoryBreadcrumbStore::new());
    let root = RootUrl::Route(LazyUrl::new("home", Default::default(), urls.clone()));
    let crumbs = BreadcrumbService::new(store.clone(), registry, root, "Home");

    let visit = |path: &str| {
        let resolved = urls.resolve(path);
        CrumbContext {
            path: path.to_string(),
            view: resolved.as_ref().map(|r| r.view.clone()),
            kwargs: resolved.map(|r| r.kwargs).unwrap_or_default(),
            user: RequestUser::Anonymous,
        }
    };

    assert_eq!(crumbs.crumbs("s1").await.len(), 1);

    crumbs.track("s1", &visit("/blog/")).await;
    crumbs.track("s1", &visit("/blog/first/")).await;
    let trail = crumbs.track("s1", &visit("/blog/second/")).await;
    assert_eq!(trail.urls, vec!["/", "/blog/", "/blog/first/", "/blog/second/"]);

    // Unregistered views leave the trail untouched
    crumbs.track("s1", &visit("/contact/")).await;
    let shown = crumbs.crumbs("s1").await;
    assert_eq!(shown.len(), 4);
    assert_eq!(shown[3].title, "Post second");

    let trail = crumbs.track("s1", &visit("/blog/")).await;
    assert_eq!(trail.urls, vec!["/", "/blog/"]);
    assert_eq!(store.session_count(), 1);
}
