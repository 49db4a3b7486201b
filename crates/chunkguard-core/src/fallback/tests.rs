use super::*;
use crate::env::EnvFlags;
use crate::page::{Link, StaticDocument};
use crate::storage::MemoryStorage;

const CDN: &str = "https://cdn.example.com";

fn doc(links: Vec<Link>) -> StaticDocument {
    StaticDocument::new("https://app.example.com/lesson/5", links).unwrap()
}

fn env() -> SharedEnv {
    SharedEnv::new(EnvFlags::with_cdn_host(CDN))
}

#[test]
fn no_links_leaves_flags_unchanged() {
    let env = env();
    let before = env.snapshot();
    let storage = MemoryStorage::new();

    let outcome = apply(&env, &doc(vec![]), &storage, CDN);

    assert_eq!(outcome, FallbackOutcome::NoQualifyingLink);
    assert_eq!(env.snapshot(), before);
    assert_eq!(storage.get_item(REVISION_HOST_KEY), None);
}

#[test]
fn first_failure_switches_to_page_origin() {
    let env = env();
    let storage = MemoryStorage::new();
    let d = doc(vec![Link::stylesheet("https://cdn.example.com/static/css/main.css")]);

    let outcome = apply(&env, &d, &storage, CDN);

    assert_eq!(
        outcome,
        FallbackOutcome::SwitchedToOrigin {
            chunk_url: "/static/css/".into()
        }
    );
    let f = env.snapshot();
    assert!(f.public_path_loaded);
    assert!(f.ed_local_host_loaded);
    assert_eq!(f.cdn_host_const, "");
    assert_eq!(f.cdn_host_const_prev, CDN);
    assert_eq!(f.chunk_url.as_deref(), Some("/static/css/"));
    assert_eq!(
        storage.get_item(REVISION_HOST_KEY).as_deref(),
        Some("https://app.example.com")
    );
}

#[test]
fn second_failure_switches_back_to_cdn() {
    let env = env();
    let storage = MemoryStorage::new();
    let d = doc(vec![Link::stylesheet("/static/css/main.css")]);

    apply(&env, &d, &storage, CDN);
    let outcome = apply(&env, &d, &storage, CDN);

    assert_eq!(
        outcome,
        FallbackOutcome::SwitchedToCdn {
            chunk_url: "https://cdn.example.com/static/css/".into()
        }
    );
    let f = env.snapshot();
    assert!(f.public_path_loaded);
    assert!(f.ed_local_host_loaded);
    assert_eq!(f.cdn_host_const, CDN);
    assert_eq!(f.cdn_host_const_prev, "");
    assert_eq!(storage.get_item(REVISION_HOST_KEY).as_deref(), Some(CDN));
}

#[test]
fn skips_excluded_and_non_stylesheet_links() {
    let env = env();
    let storage = MemoryStorage::new();
    let d = doc(vec![
        Link {
            rel: Some("preload".into()),
            href: Some("/preload/css/font.css".into()),
        },
        Link::stylesheet("https://cdn.example.com/pages/revision/r.css"),
        Link::stylesheet("https://cdn.example.com/static/old-browser.css"),
        Link {
            rel: Some("stylesheet".into()),
            href: None,
        },
        Link::stylesheet("https://fonts.example.com/family"),
        Link::stylesheet("https://cdn.example.com/app/css/app.css"),
        Link::stylesheet("https://cdn.example.com/other/css/second.css"),
    ]);

    let outcome = apply(&env, &d, &storage, CDN);

    assert_eq!(
        outcome,
        FallbackOutcome::SwitchedToOrigin {
            chunk_url: "/app/css/".into()
        }
    );
}

#[test]
fn only_excluded_links_resets_event_flag_only() {
    let env = env();
    env.update(|f| f.public_path_loaded = true);
    let storage = MemoryStorage::new();
    let d = doc(vec![Link::stylesheet("/pages/cdn/x.css")]);

    let outcome = apply(&env, &d, &storage, CDN);

    assert_eq!(outcome, FallbackOutcome::NoQualifyingLink);
    let f = env.snapshot();
    assert!(!f.public_path_loaded);
    assert!(!f.ed_local_host_loaded);
    assert_eq!(f.cdn_host_const, CDN);
}

struct FailingStorage;

impl PageStorage for FailingStorage {
    fn get_item(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_item(&self, _key: &str, _value: &str) -> anyhow::Result<()> {
        anyhow::bail!("quota exceeded")
    }
}

#[test]
fn storage_failure_does_not_abort_switch() {
    let env = env();
    let d = doc(vec![Link::stylesheet("/static/css/main.css")]);

    let outcome = apply(&env, &d, &FailingStorage, CDN);

    assert!(matches!(outcome, FallbackOutcome::SwitchedToOrigin { .. }));
    assert!(env.snapshot().ed_local_host_loaded);
}
