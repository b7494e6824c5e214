//! REST URL construction for the model management backend
//!
//! Every URL is derived from an explicit [`ClientConfig`]: the service root
//! and the optional authentication ticket travel with the builder instead of
//! living in shared mutable state.

use mms_core::{ReadContext, LATEST_VERSION};
use regex::Regex;
use std::sync::LazyLock;

use crate::config::ClientConfig;

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}.\d{3}[+]?-\d{4}$").expect("valid regex")
});

/// Whether a version string is a timestamp such as
/// `2014-07-01T08:57:36.915-0700` (as opposed to a version number).
pub fn is_timestamp(version: &str) -> bool {
    TIMESTAMP_REGEX.is_match(version.trim())
}

/// Append `key=value` using `?` or `&` depending on whether the URL already
/// has a query string.
fn append_query(mut url: String, param: &str) -> String {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(param);
    url
}

/// Builds backend URLs for one configured service root
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    root: String,
    ticket: Option<String>,
}

impl UrlBuilder {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            root: config.base_url.trim_end_matches('/').to_string(),
            ticket: config.ticket.clone().filter(|t| !t.is_empty()),
        }
    }

    /// A copy of this builder that signs URLs with another ticket
    pub fn with_ticket(&self, ticket: impl Into<String>) -> Self {
        let ticket = ticket.into();
        Self {
            root: self.root.clone(),
            ticket: (!ticket.is_empty()).then_some(ticket),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn ticket(&self) -> Option<&str> {
        self.ticket.as_deref()
    }

    /// Scope a URL to a version: `latest` leaves it unchanged, timestamps
    /// become a `timestamp` query parameter, anything else is treated as a
    /// version number path segment.
    pub fn add_version(&self, url: String, version: &str) -> String {
        if version == LATEST_VERSION {
            url
        } else if is_timestamp(version) {
            append_query(url, &format!("timestamp={}", version))
        } else {
            format!("{}/versions/{}", url, version)
        }
    }

    /// Sign a URL with the ticket. Timestamped URLs are left unsigned.
    pub fn add_ticket(&self, url: String) -> String {
        match &self.ticket {
            None => url,
            Some(_) if url.contains("timestamp") => url,
            Some(ticket) => append_query(url, &format!("alf_ticket={}", ticket)),
        }
    }

    pub fn add_extended(&self, url: String, extended: bool) -> String {
        if extended {
            append_query(url, "extended=true")
        } else {
            url
        }
    }

    fn workspace_path(&self, workspace: &str) -> String {
        format!("{}/workspaces/{}", self.root, workspace)
    }

    pub fn mms_version_url(&self) -> String {
        self.add_ticket(format!("{}/mmsversion", self.root))
    }

    pub fn check_login_url(&self) -> String {
        format!("{}/checklogin", self.root)
    }

    pub fn check_ticket_url(&self, ticket: &str) -> String {
        format!("{}/mms/login/ticket/{}", self.root, ticket)
    }

    /// Logout URL for the configured ticket; `None` when no ticket is set
    pub fn logout_url(&self) -> Option<String> {
        let ticket = self.ticket.as_deref()?;
        Some(self.add_ticket(format!("{}/api/login/ticket/{}", self.root, ticket)))
    }

    pub fn jms_hostname_url(&self) -> String {
        format!("{}/connection/jms", self.root)
    }

    pub fn site_dashboard_url(&self, site: &str) -> String {
        self.add_ticket(format!("/share/page/site/{}/dashboard", site))
    }

    pub fn element_url(&self, id: &str, ctx: &ReadContext, extended: bool) -> String {
        let url = format!("{}/elements/{}", self.workspace_path(&ctx.workspace), id);
        self.add_extended(self.add_ticket(self.add_version(url, &ctx.version)), extended)
    }

    /// Element plus owned children, either to a fixed depth or fully recursive.
    /// These URLs are not ticket-signed.
    pub fn owned_element_url(
        &self,
        id: &str,
        ctx: &ReadContext,
        depth: Option<u32>,
        extended: bool,
    ) -> String {
        let recurse = match depth {
            Some(depth) if depth > 0 => format!("depth={}", depth),
            _ => "recurse=true".to_string(),
        };
        let url = format!("{}/elements/{}", self.workspace_path(&ctx.workspace), id);
        let url = append_query(self.add_version(url, &ctx.version), &recurse);
        self.add_extended(url, extended)
    }

    pub fn element_versions_url(&self, id: &str, workspace: &str) -> String {
        self.add_ticket(format!("{}/history/{}", self.workspace_path(workspace), id))
    }

    pub fn post_elements_url(&self, workspace: &str) -> String {
        self.add_ticket(format!("{}/elements", self.workspace_path(workspace)))
    }

    pub fn put_elements_url(&self, ctx: &ReadContext, extended: bool) -> String {
        let url = format!("{}/elements", self.workspace_path(&ctx.workspace));
        self.add_extended(self.add_ticket(self.add_version(url, &ctx.version)), extended)
    }

    /// `None` when the root, workspace or site is empty
    pub fn post_elements_with_site_url(&self, workspace: &str, site: &str) -> Option<String> {
        if self.root.is_empty() || workspace.is_empty() || site.is_empty() {
            return None;
        }
        let site = if site == "no-site" { "no_site" } else { site };
        Some(self.add_ticket(format!(
            "{}/sites/{}/elements",
            self.workspace_path(workspace),
            site
        )))
    }

    pub fn sites_url(&self, ctx: &ReadContext) -> String {
        let url = format!("{}/sites", self.workspace_path(&ctx.workspace));
        self.add_ticket(self.add_version(url, &ctx.version))
    }

    pub fn site_products_url(&self, site: &str, ctx: &ReadContext, extended: bool) -> String {
        let url = format!("{}/sites/{}/products", self.workspace_path(&ctx.workspace), site);
        self.add_extended(self.add_ticket(self.add_version(url, &ctx.version)), extended)
    }

    pub fn document_views_url(
        &self,
        id: &str,
        ctx: &ReadContext,
        simple: bool,
        extended: bool,
    ) -> String {
        let url = format!("{}/products/{}/views", self.workspace_path(&ctx.workspace), id);
        let mut url = self.add_version(url, &ctx.version);
        if simple {
            url = append_query(url, "simple=true");
        }
        self.add_extended(self.add_ticket(url), extended)
    }

    pub fn view_elements_url(&self, id: &str, ctx: &ReadContext, extended: bool) -> String {
        let url = format!("{}/views/{}/elements", self.workspace_path(&ctx.workspace), id);
        self.add_extended(self.add_ticket(self.add_version(url, &ctx.version)), extended)
    }

    pub fn image_url(&self, id: &str, extension: &str, ctx: &ReadContext) -> String {
        let url = format!(
            "{}/artifacts/{}?extension={}",
            self.workspace_path(&ctx.workspace),
            id,
            extension
        );
        self.add_ticket(self.add_version(url, &ctx.version))
    }

    /// Keyword search. `page` is only sent together with a positive `items`.
    /// Search results are always extended.
    pub fn element_search_url(
        &self,
        query: &str,
        filters: &[String],
        property_name: Option<&str>,
        page: Option<u32>,
        items: Option<u32>,
        workspace: &str,
    ) -> String {
        let mut url = format!("{}/search?keyword={}", self.workspace_path(workspace), query);
        if !filters.is_empty() {
            url.push_str(&format!("&filters={}", filters.join(",")));
        }
        if let Some(property_name) = property_name.filter(|p| !p.is_empty()) {
            url.push_str(&format!("&propertyName={}", property_name));
        }
        if let Some(items) = items.filter(|i| *i > 0) {
            url.push_str(&format!("&maxItems={}", items));
            if let Some(page) = page {
                url.push_str(&format!("&skipCount={}", page));
            }
        }
        self.add_extended(self.add_ticket(url), true)
    }

    pub fn workspaces_url(&self) -> String {
        self.add_ticket(format!("{}/workspaces", self.root))
    }

    pub fn workspace_url(&self, workspace: &str) -> String {
        self.add_ticket(self.workspace_path(workspace))
    }

    pub fn configs_url(&self, workspace: &str) -> String {
        self.add_ticket(format!("{}/configurations", self.workspace_path(workspace)))
    }

    pub fn config_url(&self, id: &str, workspace: &str) -> String {
        self.add_ticket(format!(
            "{}/configurations/{}",
            self.workspace_path(workspace),
            id
        ))
    }

    pub fn config_snapshots_url(&self, id: &str, workspace: &str) -> String {
        format!(
            "{}/configurations/{}/snapshots",
            self.workspace_path(workspace),
            id
        )
    }

    pub fn config_products_url(&self, id: &str, site: &str, workspace: &str) -> String {
        format!(
            "{}/sites/{}/configurations/{}/products",
            self.workspace_path(workspace),
            site,
            id
        )
    }

    pub fn product_snapshots_url(&self, id: &str, site: &str, workspace: &str) -> String {
        self.add_ticket(format!(
            "{}/sites/{}/products/{}/snapshots",
            self.workspace_path(workspace),
            site,
            id
        ))
    }

    pub fn html_to_pdf_url(&self, doc_id: &str, site: &str, workspace: &str) -> String {
        self.add_ticket(format!(
            "{}/sites/{}/documents/{}/htmlToPdf/123456789",
            self.workspace_path(workspace),
            site,
            doc_id
        ))
    }

    pub fn snapshot_url(&self, id: &str, workspace: &str) -> String {
        self.add_ticket(format!("{}/snapshots/{}", self.workspace_path(workspace), id))
    }

    pub fn ws_diff_url(
        &self,
        ws1: &str,
        ws2: &str,
        ws1_time: &str,
        ws2_time: &str,
        recalculate: bool,
    ) -> String {
        let mut url = format!(
            "{}/diff/{}/{}/{}/{}?background=true",
            self.root, ws1, ws2, ws1_time, ws2_time
        );
        if recalculate {
            url.push_str("&recalculate=true");
        }
        self.add_ticket(url)
    }

    pub fn post_ws_diff_url(&self, source_time: Option<&str>) -> String {
        let mut url = format!("{}/diff", self.root);
        if let Some(time) = source_time.filter(|t| is_timestamp(t)) {
            url = append_query(url, &format!("timestamp2={}", time));
        }
        self.add_ticket(url)
    }

    pub fn jobs_url(&self, id: &str) -> String {
        self.add_ticket(format!("{}/jobs/{}?recurse=1", self.workspace_path("master"), id))
    }

    pub fn job_url(&self, job_id: &str) -> String {
        self.add_ticket(format!("{}/jobs/{}", self.workspace_path("master"), job_id))
    }

    pub fn job_run_url(&self, job_id: &str) -> String {
        self.add_ticket(format!("{}/jobs/{}/execute", self.workspace_path("master"), job_id))
    }

    pub fn create_job_url(&self) -> String {
        self.add_ticket(format!("{}/jobs", self.workspace_path("master")))
    }
}
