//! End-to-end tests for the Pagebind engine.
//!
//! These exercise a small in-memory blog site: an index layout that loops
//! over subpages and a post layout that injects pre-rendered body HTML,
//! with links resolved against the site index.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use pagebind_core::{Frontmatter, Page, SiteConfig};
use pagebind_engine::{
    LinkIndex, RenderError, SiteRenderer, Template, TemplateRegistry,
};

const INDEX_LAYOUT: &str = concat!(
    "<section class=\"post-list\">",
    "<h1 :text=\"$page.title\"></h1>",
    "<ul>",
    "<li :loop=\"$page.subpages()\">",
    "<a href=\"$loop.it.link()\" :text=\"$loop.it.title\"></a>",
    "<time :text=\"$loop.it.date.format('January 02, 2006')\"></time>",
    "</li>",
    "</ul>",
    "</section>",
);

const POST_LAYOUT: &str = concat!(
    "<article>",
    "<h1 :text=\"$page.title\"></h1>",
    "<div class=\"content\" :html=\"$page.content()\"></div>",
    "</article>",
);

fn post(title: &str, id: &str, day: u32, body: &str) -> Arc<Page> {
    let fm = Frontmatter {
        title: title.to_string(),
        date: Some(Utc.with_ymd_and_hms(2024, 1, day, 9, 0, 0).unwrap()),
        author: Some("Dana".to_string()),
        layout: Some("post".to_string()),
        tags: vec!["sql".to_string()],
        ..Frontmatter::default()
    };
    Arc::new(Page::from_frontmatter(&fm, id, format!("/{id}"), body))
}

fn site() -> (Vec<Arc<Page>>, SiteRenderer) {
    let pipe = post(
        "Pipe Syntax",
        "blog/1-pipe-syntax",
        14,
        r#"<p>$section.id("comparison")A comparison of pipe syntax.</p>"#,
    );
    let dbt = post(
        "Testing dbt Pipelines",
        "blog/2-dbt-testing",
        20,
        r#"<p>See $link.ref("comparison") first.</p>"#,
    );

    let index_fm = Frontmatter {
        title: "Blog".to_string(),
        layout: Some("blog".to_string()),
        ..Frontmatter::default()
    };
    let index = Arc::new(
        Page::from_frontmatter(&index_fm, "blog", "/blog", "")
            .with_subpages(vec![pipe.clone(), dbt.clone()]),
    );

    let config = SiteConfig {
        title: "Data Blog".to_string(),
        base_url: "https://example.com".to_string(),
        ..SiteConfig::default()
    };

    let mut links = LinkIndex::from_pages(&index, &config.base_url);
    links.insert_anchor("comparison", "https://example.com/blog/1-pipe-syntax");

    let mut registry = TemplateRegistry::new();
    registry.register(Template::parse("blog", INDEX_LAYOUT).expect("index layout"));
    registry.register(Template::parse("post", POST_LAYOUT).expect("post layout"));

    let pages = vec![index, pipe, dbt];
    (pages, SiteRenderer::new(registry, links, config))
}

#[test]
fn test_index_page_lists_posts_in_order() {
    let (pages, renderer) = site();

    let html = renderer.render_page(&pages[0]).expect("index renders");

    assert!(html.starts_with("<section class=\"post-list\"><h1>Blog</h1>"));
    let first = html.find("Pipe Syntax").expect("first post listed");
    let second = html.find("Testing dbt Pipelines").expect("second post listed");
    assert!(first < second, "posts must keep subpage order");
    assert!(html.contains("<a href=\"/blog/1-pipe-syntax\">Pipe Syntax</a>"));
    assert!(html.contains("<time>January 14, 2024</time>"));
    assert!(html.contains("<time>January 20, 2024</time>"));
}

#[test]
fn test_post_page_injects_body_and_resolves_hints() {
    let (pages, renderer) = site();

    let html = renderer.render_page(&pages[1]).expect("post renders");
    assert!(html.contains("<h1>Pipe Syntax</h1>"));
    assert!(html.contains("<span id=\"comparison\"></span>"));

    let html = renderer.render_page(&pages[2]).expect("post renders");
    assert!(html.contains("See https://example.com/blog/1-pipe-syntax#comparison first."));
}

#[test]
fn test_render_all_is_order_stable() {
    let (pages, renderer) = site();

    let rendered = renderer.render_all(&pages).expect("site renders");

    let ids: Vec<_> = rendered.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["blog", "blog/1-pipe-syntax", "blog/2-dbt-testing"]);

    for ((_, html), page) in rendered.iter().zip(&pages) {
        assert_eq!(html, &renderer.render_page(page).expect("re-render"));
    }
}

#[test]
fn test_dead_link_aborts_the_page() {
    let (mut pages, renderer) = site();

    let broken = post(
        "Broken",
        "blog/3-broken",
        21,
        r#"<p>See $link.page("missing/page").</p>"#,
    );
    pages.push(broken.clone());

    let err = renderer.render_page(&broken).expect_err("dead link must fail");
    assert!(matches!(err, RenderError::Eval { .. }));
    assert!(err.to_string().contains("missing/page"));

    // The batch fails as a unit rather than emitting a dead link.
    assert!(renderer.render_all(&pages).is_err());
}

#[test]
fn test_rendering_is_deterministic() {
    let (pages, renderer) = site();

    let a = renderer.render_page(&pages[0]).expect("render");
    let b = renderer.render_page(&pages[0]).expect("render");
    assert_eq!(a, b);
}
