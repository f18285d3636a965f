//! Snapshot Rendering
//!
//! Pure field mapping from a `StatusSnapshot` into the page slots:
//! scalar copies, date formatting, and list building. Runs inside the
//! refresh cycle; any error here fails the whole cycle and leaves the
//! previously rendered content in place.

use chrono::{DateTime, Locale};

use crate::error::UpdateError;
use crate::types::{Activity, StatusSnapshot};
use crate::view::{Document, ViewBindings};

/// Placeholder item text for an empty earnings source list.
pub const NO_EARNINGS: &str = "No earnings yet";
/// Placeholder item text for an empty airdrop list.
pub const NO_AIRDROPS: &str = "No airdrops tracked";
/// Placeholder item text for an empty faucet list.
pub const NO_FAUCETS: &str = "No faucets tracked";
/// Placeholder item text for an empty activity feed.
pub const NO_ACTIVITY: &str = "No recent activity";
/// Placeholder shown in the crypto slots when the block is absent.
pub const NO_DATA: &str = "No data";

/// Activity entries beyond this count are dropped, keeping the first
/// entries of the sequence as received.
pub const MAX_ACTIVITIES: usize = 20;

/// Escape text for insertion into markup.
///
/// List entries come from the status document; they were trusted as-is
/// by the original page, but here everything that is not a fixed
/// literal goes through this.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format an ISO-8601 timestamp for display: numeric day, abbreviated
/// month, hour and minute, fr-FR convention. No timezone conversion
/// beyond the offset carried by the timestamp itself.
pub fn format_date(iso: &str) -> Result<String, UpdateError> {
    let parsed = DateTime::parse_from_rfc3339(iso).map_err(|source| UpdateError::Timestamp {
        value: iso.to_string(),
        source,
    })?;
    Ok(parsed
        .format_localized("%-d %b %H:%M", Locale::fr_FR)
        .to_string())
}

/// Numbers display the way the source wrote them: integral values
/// without a decimal point, fractional values as-is.
fn fmt_num(n: f64) -> String {
    format!("{}", n)
}

/// Build the `<li>` markup for a plain string list: one item per entry
/// in input order, or exactly one placeholder item when empty.
pub fn render_list(entries: &[String], placeholder: &str) -> String {
    if entries.is_empty() {
        return format!("<li>{}</li>", placeholder);
    }
    entries
        .iter()
        .map(|e| format!("<li>{}</li>", escape_html(e)))
        .collect()
}

/// Build the activity feed markup: at most `MAX_ACTIVITIES` entries in
/// input order (the source is responsible for newest-first ordering).
pub fn render_activities(activities: &[Activity]) -> Result<String, UpdateError> {
    if activities.is_empty() {
        return Ok(format!("<li>{}</li>", NO_ACTIVITY));
    }

    let mut out = String::new();
    for activity in activities.iter().take(MAX_ACTIVITIES) {
        out.push_str(&format!(
            "<li><span class=\"activity-time\">{}</span><span class=\"activity-message\">{}</span></li>",
            format_date(&activity.timestamp)?,
            escape_html(&activity.message),
        ));
    }
    Ok(out)
}

/// Copy every snapshot field into its page slot.
///
/// The progress bar width and the percent label derive from the same
/// `percent_complete` value, with no independent rounding.
pub fn apply(
    document: &mut Document,
    view: &ViewBindings,
    snapshot: &StatusSnapshot,
) -> Result<(), UpdateError> {
    document.set_text(
        &view.last_update,
        format!("Last update: {}", format_date(&snapshot.last_updated)?),
    );

    let wallet = &snapshot.wallet;
    document.set_text(&view.wallet_address, wallet.address.clone());
    document.set_text(&view.wallet_network, wallet.network.clone());
    document.set_text(&view.wallet_usdc, format!("{} USDC", fmt_num(wallet.balance_usdc)));
    document.set_text(&view.wallet_eth, format!("{} ETH", fmt_num(wallet.balance_eth)));

    let guide = &snapshot.guide_progress;
    let percent = fmt_num(guide.percent_complete);
    document.set_text(&view.guide_title, guide.title.clone());
    document.set_text(&view.guide_chapter, guide.current_chapter.clone());
    document.set_text(&view.guide_progress, format!("width: {}%", percent));
    document.set_text(&view.guide_percent, format!("{}%", percent));

    let discovery = &snapshot.auto_discovery;
    document.set_text(&view.ad_topic, discovery.current_topic.clone());
    document.set_text(&view.ad_completed, discovery.topics_completed.to_string());
    document.set_text(&view.ad_total, discovery.topics_total.to_string());
    document.set_text(&view.ad_next, format_date(&discovery.next_run)?);

    let memory = &snapshot.memory_stats;
    document.set_text(&view.mem_daily, memory.daily_logs.to_string());
    document.set_text(&view.mem_lessons, memory.important_lessons.to_string());
    document.set_text(
        &view.mem_consciousness,
        memory.consciousness_journal_entries.to_string(),
    );

    let earnings = &snapshot.earnings;
    document.set_text(
        &view.earn_total,
        format!("{} USDC", fmt_num(earnings.total_usdc_earned)),
    );
    document.set_markup(
        &view.earn_sources,
        render_list(&earnings.sources, NO_EARNINGS),
    );

    match &snapshot.crypto_opportunities {
        Some(crypto) => {
            document.set_text(&view.crypto_status, crypto.status.clone());
            document.set_text(&view.crypto_current, crypto.current_pursuit.clone());
            document.set_markup(&view.airdrop_list, render_list(&crypto.airdrops, NO_AIRDROPS));
            document.set_markup(&view.faucet_list, render_list(&crypto.faucets, NO_FAUCETS));
        }
        None => {
            document.set_text(&view.crypto_status, NO_DATA);
            document.set_text(&view.crypto_current, "-");
            document.set_markup(&view.airdrop_list, format!("<li>{}</li>", NO_DATA));
            document.set_markup(&view.faucet_list, format!("<li>{}</li>", NO_DATA));
        }
    }

    document.set_markup(&view.activity_log, render_activities(&snapshot.activities)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AutoDiscovery, CryptoOpportunities, Earnings, GuideProgress, MemoryStats, WalletStatus,
    };
    use crate::view;

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            last_updated: "2026-03-05T14:07:00Z".to_string(),
            wallet: WalletStatus {
                address: "0xABCDEF".to_string(),
                network: "Base Sepolia".to_string(),
                balance_usdc: 12.5,
                balance_eth: 0.01,
            },
            guide_progress: GuideProgress {
                title: "Airdrop Hunter's Handbook".to_string(),
                current_chapter: "Chapter 3".to_string(),
                percent_complete: 60.0,
            },
            auto_discovery: AutoDiscovery {
                current_topic: "Layer 2 bridges".to_string(),
                topics_completed: 7,
                topics_total: 12,
                next_run: "2026-03-05T15:00:00Z".to_string(),
            },
            memory_stats: MemoryStats {
                daily_logs: 42,
                important_lessons: 9,
                consciousness_journal_entries: 3,
            },
            earnings: Earnings {
                total_usdc_earned: 1.75,
                sources: vec!["faucet drip".to_string(), "testnet quest".to_string()],
            },
            crypto_opportunities: Some(CryptoOpportunities {
                status: "Hunting".to_string(),
                current_pursuit: "LayerZero".to_string(),
                airdrops: vec!["zkSync".to_string()],
                faucets: vec![],
            }),
            activities: vec![Activity {
                timestamp: "2026-03-05T14:00:00Z".to_string(),
                message: "Checked wallet balance".to_string(),
            }],
        }
    }

    fn page() -> (Document, ViewBindings) {
        let doc = Document::with_page_slots();
        let bindings = ViewBindings::resolve(&doc).unwrap();
        (doc, bindings)
    }

    #[test]
    fn test_format_date_fr_convention() {
        assert_eq!(format_date("2026-03-05T14:07:00Z").unwrap(), "5 mars 14:07");
    }

    #[test]
    fn test_format_date_rejects_garbage() {
        assert!(matches!(
            format_date("not-a-date"),
            Err(UpdateError::Timestamp { .. })
        ));
    }

    #[test]
    fn test_scalar_fields_map_verbatim() {
        let (mut doc, bindings) = page();
        apply(&mut doc, &bindings, &snapshot()).unwrap();

        assert_eq!(doc.content(view::WALLET_ADDRESS), Some("0xABCDEF"));
        assert_eq!(doc.content(view::WALLET_NETWORK), Some("Base Sepolia"));
        assert_eq!(doc.content(view::WALLET_USDC), Some("12.5 USDC"));
        assert_eq!(doc.content(view::WALLET_ETH), Some("0.01 ETH"));
        assert_eq!(doc.content(view::AD_COMPLETED), Some("7"));
        assert_eq!(doc.content(view::AD_TOTAL), Some("12"));
        assert_eq!(doc.content(view::MEM_DAILY), Some("42"));
        assert_eq!(doc.content(view::EARN_TOTAL), Some("1.75 USDC"));
        assert_eq!(
            doc.content(view::LAST_UPDATE),
            Some("Last update: 5 mars 14:07")
        );
    }

    #[test]
    fn test_progress_bar_and_label_share_one_value() {
        let (mut doc, bindings) = page();
        apply(&mut doc, &bindings, &snapshot()).unwrap();

        assert_eq!(doc.content(view::GUIDE_PROGRESS), Some("width: 60%"));
        assert_eq!(doc.content(view::GUIDE_PERCENT), Some("60%"));
    }

    #[test]
    fn test_empty_list_renders_single_placeholder() {
        let rendered = render_list(&[], NO_EARNINGS);
        assert_eq!(rendered, "<li>No earnings yet</li>");
    }

    #[test]
    fn test_nonempty_list_preserves_input_order() {
        let entries = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        let rendered = render_list(&entries, NO_EARNINGS);
        assert_eq!(rendered, "<li>b</li><li>a</li><li>b</li>");
    }

    #[test]
    fn test_list_entries_are_escaped() {
        let entries = vec!["<script>alert(1)</script>".to_string()];
        let rendered = render_list(&entries, NO_EARNINGS);
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_activities_capped_at_twenty() {
        let activities: Vec<Activity> = (0..25)
            .map(|i| Activity {
                timestamp: "2026-03-05T14:00:00Z".to_string(),
                message: format!("event {}", i),
            })
            .collect();

        let rendered = render_activities(&activities).unwrap();
        assert_eq!(rendered.matches("<li>").count(), MAX_ACTIVITIES);
        assert!(rendered.contains("event 0"));
        assert!(rendered.contains("event 19"));
        assert!(!rendered.contains("event 20"));
    }

    #[test]
    fn test_empty_activities_render_placeholder() {
        let rendered = render_activities(&[]).unwrap();
        assert_eq!(rendered, format!("<li>{}</li>", NO_ACTIVITY));
    }

    #[test]
    fn test_absent_crypto_block_renders_placeholders() {
        let (mut doc, bindings) = page();
        let mut snap = snapshot();
        snap.crypto_opportunities = None;
        apply(&mut doc, &bindings, &snap).unwrap();

        assert_eq!(doc.content(view::CRYPTO_STATUS), Some("No data"));
        assert_eq!(doc.content(view::CRYPTO_CURRENT), Some("-"));
        assert_eq!(doc.content(view::AIRDROP_LIST), Some("<li>No data</li>"));
        assert_eq!(doc.content(view::FAUCET_LIST), Some("<li>No data</li>"));
    }

    #[test]
    fn test_present_crypto_block_maps_all_four_slots() {
        let (mut doc, bindings) = page();
        apply(&mut doc, &bindings, &snapshot()).unwrap();

        assert_eq!(doc.content(view::CRYPTO_STATUS), Some("Hunting"));
        assert_eq!(doc.content(view::CRYPTO_CURRENT), Some("LayerZero"));
        assert_eq!(doc.content(view::AIRDROP_LIST), Some("<li>zkSync</li>"));
        assert_eq!(
            doc.content(view::FAUCET_LIST),
            Some("<li>No faucets tracked</li>")
        );
    }

    #[test]
    fn test_bad_timestamp_fails_the_whole_render() {
        let (mut doc, bindings) = page();
        let mut snap = snapshot();
        snap.activities[0].timestamp = "yesterday".to_string();

        assert!(apply(&mut doc, &bindings, &snap).is_err());
    }
}
