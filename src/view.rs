//! Page Model
//!
//! The in-memory stand-in for the dashboard page: a fixed set of slots
//! addressed by the stable element ids of the original page. Slot
//! handles are resolved once at startup into a `ViewBindings` struct and
//! passed by reference into rendering; a missing required slot is a
//! startup-fatal error, before polling ever begins.

use std::collections::BTreeMap;

use thiserror::Error;

// ─── Slot Ids ────────────────────────────────────────────────────

pub const LAST_UPDATE: &str = "last-update";
pub const WALLET_ADDRESS: &str = "wallet-address";
pub const WALLET_NETWORK: &str = "wallet-network";
pub const WALLET_USDC: &str = "wallet-usdc";
pub const WALLET_ETH: &str = "wallet-eth";
pub const GUIDE_TITLE: &str = "guide-title";
pub const GUIDE_CHAPTER: &str = "guide-chapter";
pub const GUIDE_PROGRESS: &str = "guide-progress";
pub const GUIDE_PERCENT: &str = "guide-percent";
pub const AD_TOPIC: &str = "ad-topic";
pub const AD_COMPLETED: &str = "ad-completed";
pub const AD_TOTAL: &str = "ad-total";
pub const AD_NEXT: &str = "ad-next";
pub const MEM_DAILY: &str = "mem-daily";
pub const MEM_LESSONS: &str = "mem-lessons";
pub const MEM_CONSCIOUSNESS: &str = "mem-consciousness";
pub const EARN_TOTAL: &str = "earn-total";
pub const EARN_SOURCES: &str = "earn-sources";
pub const CRYPTO_STATUS: &str = "crypto-status";
pub const CRYPTO_CURRENT: &str = "crypto-current";
pub const AIRDROP_LIST: &str = "airdrop-list";
pub const FAUCET_LIST: &str = "faucet-list";
pub const ACTIVITY_LOG: &str = "activity-log";

/// The logout link is optional: the updater tolerates a page without it.
pub const LOGOUT_LINK: &str = "logout-link";

/// Every slot the renderer writes into. All of these must exist on the
/// page; `ViewBindings::resolve` fails on the first one that does not.
pub const REQUIRED_SLOTS: &[&str] = &[
    LAST_UPDATE,
    WALLET_ADDRESS,
    WALLET_NETWORK,
    WALLET_USDC,
    WALLET_ETH,
    GUIDE_TITLE,
    GUIDE_CHAPTER,
    GUIDE_PROGRESS,
    GUIDE_PERCENT,
    AD_TOPIC,
    AD_COMPLETED,
    AD_TOTAL,
    AD_NEXT,
    MEM_DAILY,
    MEM_LESSONS,
    MEM_CONSCIOUSNESS,
    EARN_TOTAL,
    EARN_SOURCES,
    CRYPTO_STATUS,
    CRYPTO_CURRENT,
    AIRDROP_LIST,
    FAUCET_LIST,
    ACTIVITY_LOG,
];

/// Startup error: the page does not carry a slot the renderer needs.
#[derive(Debug, Error)]
#[error("page is missing required element '{0}'")]
pub struct MissingSlot(pub String);

// ─── Document ────────────────────────────────────────────────────

/// Slot content, mirroring the text/markup split of the original page:
/// text is escaped when the page is serialized, markup is inlined as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
enum SlotContent {
    Text(String),
    Markup(String),
}

/// The mutable page. Slots are created up front from the page contract;
/// rendering only ever writes into slots that already exist.
#[derive(Clone, Debug)]
pub struct Document {
    slots: BTreeMap<String, SlotContent>,
}

impl Document {
    /// Create a document with an arbitrary slot set. Used by tests to
    /// model pages with missing elements.
    pub fn new<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let slots = ids
            .into_iter()
            .map(|id| (id.to_string(), SlotContent::Text(String::new())))
            .collect();
        Self { slots }
    }

    /// The full dashboard page: every required slot plus the logout link.
    pub fn with_page_slots() -> Self {
        let mut doc = Self::new(REQUIRED_SLOTS.iter().copied());
        doc.slots
            .insert(LOGOUT_LINK.to_string(), SlotContent::Text(String::new()));
        doc
    }

    pub fn has_slot(&self, id: &str) -> bool {
        self.slots.contains_key(id)
    }

    /// Set a slot's text content (escaped on serialization).
    pub fn set_text(&mut self, slot: &SlotRef, text: impl Into<String>) {
        self.slots
            .insert(slot.id.to_string(), SlotContent::Text(text.into()));
    }

    /// Set a slot's inner markup (inlined verbatim on serialization).
    pub fn set_markup(&mut self, slot: &SlotRef, markup: impl Into<String>) {
        self.slots
            .insert(slot.id.to_string(), SlotContent::Markup(markup.into()));
    }

    /// Raw stored content of a slot, text or markup alike.
    pub fn content(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(|c| match c {
            SlotContent::Text(s) => s.as_str(),
            SlotContent::Markup(s) => s.as_str(),
        })
    }

    /// Slot content as it appears in the serialized page.
    fn rendered(&self, id: &str) -> String {
        match self.slots.get(id) {
            Some(SlotContent::Text(s)) => crate::render::escape_html(s),
            Some(SlotContent::Markup(s)) => s.clone(),
            None => String::new(),
        }
    }

    /// Serialize the populated page to a standalone HTML document.
    pub fn to_html(&self) -> String {
        let logout = if self.has_slot(LOGOUT_LINK) {
            format!(
                "    <a id=\"{}\" href=\"login.html\">Logout</a>\n",
                LOGOUT_LINK
            )
        } else {
            String::new()
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Liberty Dashboard</title>
</head>
<body>
  <header>
    <h1>Liberty Dashboard</h1>
    <span id="last-update">{last_update}</span>
{logout}  </header>
  <section class="card" id="wallet">
    <h2>Wallet</h2>
    <p>Address: <span id="wallet-address">{wallet_address}</span></p>
    <p>Network: <span id="wallet-network">{wallet_network}</span></p>
    <p>Balance: <span id="wallet-usdc">{wallet_usdc}</span> / <span id="wallet-eth">{wallet_eth}</span></p>
  </section>
  <section class="card" id="guide">
    <h2>Guide</h2>
    <p><span id="guide-title">{guide_title}</span> &mdash; <span id="guide-chapter">{guide_chapter}</span></p>
    <div class="progress"><div class="progress-bar" id="guide-progress" style="{guide_progress}"></div></div>
    <span id="guide-percent">{guide_percent}</span>
  </section>
  <section class="card" id="auto-discovery">
    <h2>Auto Discovery</h2>
    <p>Topic: <span id="ad-topic">{ad_topic}</span></p>
    <p><span id="ad-completed">{ad_completed}</span> of <span id="ad-total">{ad_total}</span> topics</p>
    <p>Next run: <span id="ad-next">{ad_next}</span></p>
  </section>
  <section class="card" id="memory">
    <h2>Memory</h2>
    <p>Daily logs: <span id="mem-daily">{mem_daily}</span></p>
    <p>Lessons: <span id="mem-lessons">{mem_lessons}</span></p>
    <p>Journal entries: <span id="mem-consciousness">{mem_consciousness}</span></p>
  </section>
  <section class="card" id="earnings">
    <h2>Earnings</h2>
    <p>Total: <span id="earn-total">{earn_total}</span></p>
    <ul id="earn-sources">{earn_sources}</ul>
  </section>
  <section class="card" id="crypto">
    <h2>Crypto Opportunities</h2>
    <p>Status: <span id="crypto-status">{crypto_status}</span></p>
    <p>Pursuing: <span id="crypto-current">{crypto_current}</span></p>
    <ul id="airdrop-list">{airdrop_list}</ul>
    <ul id="faucet-list">{faucet_list}</ul>
  </section>
  <section class="card" id="activity">
    <h2>Recent Activity</h2>
    <ul id="activity-log">{activity_log}</ul>
  </section>
</body>
</html>
"#,
            last_update = self.rendered(LAST_UPDATE),
            logout = logout,
            wallet_address = self.rendered(WALLET_ADDRESS),
            wallet_network = self.rendered(WALLET_NETWORK),
            wallet_usdc = self.rendered(WALLET_USDC),
            wallet_eth = self.rendered(WALLET_ETH),
            guide_title = self.rendered(GUIDE_TITLE),
            guide_chapter = self.rendered(GUIDE_CHAPTER),
            guide_progress = self.rendered(GUIDE_PROGRESS),
            guide_percent = self.rendered(GUIDE_PERCENT),
            ad_topic = self.rendered(AD_TOPIC),
            ad_completed = self.rendered(AD_COMPLETED),
            ad_total = self.rendered(AD_TOTAL),
            ad_next = self.rendered(AD_NEXT),
            mem_daily = self.rendered(MEM_DAILY),
            mem_lessons = self.rendered(MEM_LESSONS),
            mem_consciousness = self.rendered(MEM_CONSCIOUSNESS),
            earn_total = self.rendered(EARN_TOTAL),
            earn_sources = self.rendered(EARN_SOURCES),
            crypto_status = self.rendered(CRYPTO_STATUS),
            crypto_current = self.rendered(CRYPTO_CURRENT),
            airdrop_list = self.rendered(AIRDROP_LIST),
            faucet_list = self.rendered(FAUCET_LIST),
            activity_log = self.rendered(ACTIVITY_LOG),
        )
    }
}

// ─── View Bindings ───────────────────────────────────────────────

/// A validated handle to one page slot. Only constructed through
/// `ViewBindings::resolve`, so holding one proves the slot exists.
#[derive(Clone, Debug)]
pub struct SlotRef {
    id: &'static str,
}

impl SlotRef {
    pub fn id(&self) -> &'static str {
        self.id
    }
}

/// All slot handles the renderer needs, resolved once at startup and
/// held for the life of the process.
#[derive(Clone, Debug)]
pub struct ViewBindings {
    pub last_update: SlotRef,
    pub wallet_address: SlotRef,
    pub wallet_network: SlotRef,
    pub wallet_usdc: SlotRef,
    pub wallet_eth: SlotRef,
    pub guide_title: SlotRef,
    pub guide_chapter: SlotRef,
    pub guide_progress: SlotRef,
    pub guide_percent: SlotRef,
    pub ad_topic: SlotRef,
    pub ad_completed: SlotRef,
    pub ad_total: SlotRef,
    pub ad_next: SlotRef,
    pub mem_daily: SlotRef,
    pub mem_lessons: SlotRef,
    pub mem_consciousness: SlotRef,
    pub earn_total: SlotRef,
    pub earn_sources: SlotRef,
    pub crypto_status: SlotRef,
    pub crypto_current: SlotRef,
    pub airdrop_list: SlotRef,
    pub faucet_list: SlotRef,
    pub activity_log: SlotRef,
}

impl ViewBindings {
    /// Resolve every required slot against the document.
    ///
    /// Fails on the first missing slot. This runs before the polling
    /// loop starts, so a page that does not match the contract never
    /// reaches the first refresh.
    pub fn resolve(document: &Document) -> Result<Self, MissingSlot> {
        let bind = |id: &'static str| -> Result<SlotRef, MissingSlot> {
            if document.has_slot(id) {
                Ok(SlotRef { id })
            } else {
                Err(MissingSlot(id.to_string()))
            }
        };

        Ok(Self {
            last_update: bind(LAST_UPDATE)?,
            wallet_address: bind(WALLET_ADDRESS)?,
            wallet_network: bind(WALLET_NETWORK)?,
            wallet_usdc: bind(WALLET_USDC)?,
            wallet_eth: bind(WALLET_ETH)?,
            guide_title: bind(GUIDE_TITLE)?,
            guide_chapter: bind(GUIDE_CHAPTER)?,
            guide_progress: bind(GUIDE_PROGRESS)?,
            guide_percent: bind(GUIDE_PERCENT)?,
            ad_topic: bind(AD_TOPIC)?,
            ad_completed: bind(AD_COMPLETED)?,
            ad_total: bind(AD_TOTAL)?,
            ad_next: bind(AD_NEXT)?,
            mem_daily: bind(MEM_DAILY)?,
            mem_lessons: bind(MEM_LESSONS)?,
            mem_consciousness: bind(MEM_CONSCIOUSNESS)?,
            earn_total: bind(EARN_TOTAL)?,
            earn_sources: bind(EARN_SOURCES)?,
            crypto_status: bind(CRYPTO_STATUS)?,
            crypto_current: bind(CRYPTO_CURRENT)?,
            airdrop_list: bind(AIRDROP_LIST)?,
            faucet_list: bind(FAUCET_LIST)?,
            activity_log: bind(ACTIVITY_LOG)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_succeeds_on_full_page() {
        let doc = Document::with_page_slots();
        assert!(ViewBindings::resolve(&doc).is_ok());
    }

    #[test]
    fn test_resolve_fails_on_missing_slot() {
        let ids: Vec<&str> = REQUIRED_SLOTS
            .iter()
            .copied()
            .filter(|id| *id != ACTIVITY_LOG)
            .collect();
        let doc = Document::new(ids);

        let err = ViewBindings::resolve(&doc).unwrap_err();
        assert_eq!(err.0, ACTIVITY_LOG);
    }

    #[test]
    fn test_text_is_escaped_in_serialized_page() {
        let mut doc = Document::with_page_slots();
        let bindings = ViewBindings::resolve(&doc).unwrap();

        doc.set_text(&bindings.wallet_address, "<0xABC>");
        let html = doc.to_html();
        assert!(html.contains("&lt;0xABC&gt;"));
        assert!(!html.contains("<0xABC>"));
    }

    #[test]
    fn test_markup_is_inlined_verbatim() {
        let mut doc = Document::with_page_slots();
        let bindings = ViewBindings::resolve(&doc).unwrap();

        doc.set_markup(&bindings.earn_sources, "<li>faucet</li>");
        assert!(doc.to_html().contains("<li>faucet</li>"));
    }

    #[test]
    fn test_page_without_logout_link_serializes() {
        let doc = Document::new(REQUIRED_SLOTS.iter().copied());
        let html = doc.to_html();
        assert!(!html.contains("logout-link"));
    }
}
