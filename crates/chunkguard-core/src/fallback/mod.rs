//! Origin-fallback heuristic.
//!
//! Runs once per failed chunk attempt that will be retried. It looks at the
//! page's stylesheets to learn where assets are served from and flips the
//! shared environment between the configured CDN host and the page origin.
//! Each flip is persisted under `REVISION_HOST_KEY`.

mod href;

use crate::env::SharedEnv;
use crate::page::Document;
use crate::storage::{PageStorage, REVISION_HOST_KEY};

/// What one run of the heuristic did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackOutcome {
    /// No stylesheet qualified; flags unchanged apart from the per-event reset.
    NoQualifyingLink,
    /// Page origin was in use; assets now resolve against the CDN host again.
    SwitchedToCdn { chunk_url: String },
    /// Assets now resolve against the page origin with relative paths.
    SwitchedToOrigin { chunk_url: String },
}

/// Run the heuristic for one failure event. Never fails.
pub fn apply(
    env: &SharedEnv,
    document: &dyn Document,
    storage: &dyn PageStorage,
    cdn_host: &str,
) -> FallbackOutcome {
    env.update(|f| f.public_path_loaded = false);

    let qualifying = document
        .links()
        .into_iter()
        .filter(|l| l.is_stylesheet())
        .filter_map(|l| l.href)
        .find(|h| !href::is_excluded(h) && href::is_css(h));

    let Some(css_href) = qualifying else {
        tracing::debug!("origin fallback: no qualifying stylesheet");
        return FallbackOutcome::NoQualifyingLink;
    };

    let base = href::base_path(&css_href);
    let origin = document.origin();

    let outcome = env.update(|f| {
        let outcome = if f.ed_local_host_loaded {
            let chunk_url = format!("{}/{}/", cdn_host, base);
            f.cdn_host_const_prev = String::new();
            f.cdn_host_const = cdn_host.to_string();
            f.chunk_url = Some(chunk_url.clone());
            FallbackOutcome::SwitchedToCdn { chunk_url }
        } else {
            let chunk_url = format!("/{}/", base);
            f.ed_local_host_loaded = true;
            f.cdn_host_const_prev = cdn_host.to_string();
            f.cdn_host_const = String::new();
            f.chunk_url = Some(chunk_url.clone());
            FallbackOutcome::SwitchedToOrigin { chunk_url }
        };
        f.public_path_loaded = true;
        outcome
    });

    let persisted = match &outcome {
        FallbackOutcome::SwitchedToCdn { .. } => cdn_host,
        _ => origin.as_str(),
    };
    if let Err(e) = storage.set_item(REVISION_HOST_KEY, persisted) {
        tracing::warn!("origin fallback: could not persist {}: {:#}", REVISION_HOST_KEY, e);
    }

    tracing::debug!(stylesheet = %css_href, ?outcome, "origin fallback applied");
    outcome
}

#[cfg(test)]
mod tests;
