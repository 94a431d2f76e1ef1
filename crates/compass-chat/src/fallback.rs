//! Static last-resort sources shown when the knowledge base is empty.

use compass_core::config::FallbackConfig;
use compass_core::FallbackSnippet;

/// Supplier of placeholder sources for the last-resort answer.
pub trait FallbackSource: Send + Sync {
    /// Sources to cite, in display order.
    fn snippets(&self) -> Vec<FallbackSnippet>;
}

/// Whether `url` belongs to one of the allowed domains (substring match).
pub fn domain_allowed(url: &str, allowed_domains: &[String]) -> bool {
    allowed_domains.iter().any(|d| url.contains(d.as_str()))
}

/// Fixed list of sources from configuration, restricted to allowed domains.
#[derive(Debug, Clone, Default)]
pub struct StaticFallback {
    snippets: Vec<FallbackSnippet>,
}

impl StaticFallback {
    pub fn new(config: &FallbackConfig) -> Self {
        let snippets: Vec<FallbackSnippet> = config
            .sources
            .iter()
            .filter(|s| {
                let allowed = domain_allowed(&s.url, &config.allowed_domains);
                if !allowed {
                    tracing::warn!(url = %s.url, "Fallback source outside allowed domains; skipped");
                }
                allowed
            })
            .cloned()
            .collect();
        Self { snippets }
    }
}

impl FallbackSource for StaticFallback {
    fn snippets(&self) -> Vec<FallbackSnippet> {
        self.snippets.clone()
    }
}
