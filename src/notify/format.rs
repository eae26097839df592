//! Notification formatting - pure transforms from records to webhook payloads
//!
//! All free text is length-capped before transmission, metric percentages
//! are guarded against missing or zero goals, and long lists are elided
//! with an explicit "+N more" note.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::models::{DailyEntry, LockWeekRequest};
use crate::teams::{team_full_name, team_label};

/// Character caps per field before transmission
pub const BRIDGE_LIMIT: usize = 200;
pub const INCIDENT_LIMIT: usize = 300;
pub const CALLOUT_LIMIT: usize = 400;
pub const DEFAULT_LIMIT: usize = 500;

const TRUNCATION_MARKER: &str = "... (truncated)";

/// At most this many incidents appear in a daily message
const MAX_INCIDENTS_SHOWN: usize = 5;
/// At most this many action items appear in a weekly message
const MAX_ACTIONS_SHOWN: usize = 3;

/// Cap `text` at `max` characters, appending a truncation marker when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let head: String = text.chars().take(max).collect();
    format!("{}{}", head, TRUNCATION_MARKER)
}

/// achieved ÷ goal × 100. None when either side is missing, unparseable,
/// or zero - rendered as "N/A" rather than a numeric error.
pub fn percentage(achieved: &str, goal: &str) -> Option<f64> {
    let achieved: f64 = achieved.trim().parse().ok()?;
    let goal: f64 = goal.trim().parse().ok()?;
    if achieved <= 0.0 || goal <= 0.0 {
        return None;
    }
    Some(achieved / goal * 100.0)
}

/// Long-form date for message headers ("Sunday, March 2, 2025");
/// falls back to the raw string when it does not parse
fn long_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%A, %B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

fn metric_line(name: &str, achieved: &str, goal: &str, bridge: Option<&str>) -> String {
    let (status, pct) = match percentage(achieved, goal) {
        Some(p) => (if p >= 100.0 { "✅" } else { "⚠️" }, format!("{:.1}%", p)),
        None => ("⚠️", "N/A".to_string()),
    };
    let shown_achieved = if achieved.is_empty() { "N/A" } else { achieved };
    let shown_goal = if goal.is_empty() { "N/A" } else { goal };
    let mut line = format!(
        "{} *{}*: {}/{} ({})",
        status, name, shown_achieved, shown_goal, pct
    );
    if let Some(bridge) = bridge {
        line.push_str(&format!("\n   _Bridge: {}_", truncate(bridge, BRIDGE_LIMIT)));
    }
    line
}

fn safety_section(entry: &DailyEntry) -> String {
    if entry.wri_incidents.is_empty() {
        return "*✅ Safety*: No incidents reported".to_string();
    }

    let mut section = format!(
        "*🚨 Safety - {} WRI Incident(s) Reported*",
        entry.wri_incidents.len()
    );
    for (idx, incident) in entry.wri_incidents.iter().take(MAX_INCIDENTS_SHOWN).enumerate() {
        section.push_str(&format!(
            "\n\n*Incident #{}*\n{}",
            idx + 1,
            truncate(&incident.summary, INCIDENT_LIMIT)
        ));
        if let Some(link) = &incident.external_link {
            section.push_str(&format!("\n<{}|View in Austin>", link));
        }
    }
    if entry.wri_incidents.len() > MAX_INCIDENTS_SHOWN {
        section.push_str(&format!(
            "\n\n_...and {} more incident(s)_",
            entry.wri_incidents.len() - MAX_INCIDENTS_SHOWN
        ));
    }
    section
}

fn callouts_section(entry: &DailyEntry) -> Option<String> {
    if entry.handoff_notes.is_empty()
        && entry.station_readiness.is_empty()
        && entry.leadership_callouts.is_empty()
    {
        return None;
    }

    let mut section = "*📢 Shift Callouts*".to_string();
    if !entry.handoff_notes.is_empty() {
        section.push_str(&format!(
            "\n\n*Hand Off Notes:*\n{}",
            truncate(&entry.handoff_notes, CALLOUT_LIMIT)
        ));
    }
    if !entry.station_readiness.is_empty() {
        section.push_str(&format!(
            "\n\n*Station Readiness:*\n{}",
            truncate(&entry.station_readiness, CALLOUT_LIMIT)
        ));
    }
    if !entry.leadership_callouts.is_empty() {
        section.push_str(&format!(
            "\n\n*Leadership Callouts:*\n{}",
            truncate(&entry.leadership_callouts, CALLOUT_LIMIT)
        ));
    }
    Some(section)
}

/// Daily entry → webhook block payload, sent when an entry is locked
pub fn daily_message(entry: &DailyEntry) -> Value {
    let metric_lines: Vec<String> = entry
        .vret_metrics
        .iter()
        .map(|(name, value)| {
            metric_line(
                name,
                &value.achieved,
                &value.goal,
                entry.vret_bridges.get(name).map(String::as_str),
            )
        })
        .collect();
    let metrics_text = if metric_lines.is_empty() {
        "No data".to_string()
    } else {
        metric_lines.join("\n")
    };

    let mut blocks = vec![
        json!({
            "type": "header",
            "text": {
                "type": "plain_text",
                "text": format!("🔒 WASH Entry Locked - {}", team_label(&entry.team)),
                "emoji": true
            }
        }),
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!("*Date:* {}\n*Submitted by:* {}", long_date(&entry.date), entry.author)
            }
        }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": safety_section(entry) }
        }),
        json!({ "type": "divider" }),
        json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*📊 VRETs*\n{}", metrics_text) }
        }),
    ];

    if let Some(callouts) = callouts_section(entry) {
        blocks.push(json!({ "type": "divider" }));
        blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": callouts }
        }));
    }

    json!({
        "text": format!("WASH Entry Completed - {}", team_label(&entry.team)),
        "blocks": blocks
    })
}

/// Per-metric weekly average: sum of achieved ÷ sum of goal over the days
/// that carry data for the metric. Percentages come from the sums, so days
/// with larger goals weigh more than a mean of daily percentages would.
fn weekly_metric_line(name: &str, entries: &[DailyEntry]) -> String {
    let mut achieved_sum = 0.0;
    let mut goal_sum = 0.0;
    let mut days = 0;

    for entry in entries {
        if let Some(value) = entry.vret_metrics.get(name) {
            let achieved: Option<f64> = value.achieved.trim().parse().ok();
            let goal: Option<f64> = value.goal.trim().parse().ok();
            if let (Some(a), Some(g)) = (achieved, goal) {
                if g > 0.0 {
                    achieved_sum += a;
                    goal_sum += g;
                    days += 1;
                }
            }
        }
    }

    if days == 0 || goal_sum <= 0.0 {
        return format!("⚠️ *{}*: No data", name);
    }

    let pct = achieved_sum / goal_sum * 100.0;
    let status = if pct >= 100.0 { "✅" } else { "⚠️" };
    format!(
        "{} *{}*: {}/{} ({:.1}%) across {} day(s)",
        status, name, achieved_sum, goal_sum, pct, days
    )
}

/// Week snapshot → webhook block payload, sent when a week is locked
pub fn weekly_message(week: &LockWeekRequest) -> Value {
    let metric_names: BTreeSet<&String> = week
        .entries
        .iter()
        .flat_map(|e| e.vret_metrics.keys())
        .collect();
    let metric_lines: Vec<String> = metric_names
        .iter()
        .map(|name| weekly_metric_line(name.as_str(), &week.entries))
        .collect();
    let metrics_text = if metric_lines.is_empty() {
        "No data".to_string()
    } else {
        metric_lines.join("\n")
    };

    let incident_count: usize = week.entries.iter().map(|e| e.wri_incidents.len()).sum();
    let days_locked = week.entries.iter().filter(|e| e.locked).count();

    let mut actions_text = if week.actions.is_empty() {
        "No action items this week".to_string()
    } else {
        week.actions
            .iter()
            .take(MAX_ACTIONS_SHOWN)
            .map(|a| {
                format!(
                    "• [{}] {} — {} (Due {})",
                    serde_json::to_value(a.status)
                        .ok()
                        .and_then(|v| v.as_str().map(String::from))
                        .unwrap_or_default(),
                    truncate(&a.action, DEFAULT_LIMIT),
                    a.owner,
                    a.due_date
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    if week.actions.len() > MAX_ACTIONS_SHOWN {
        actions_text.push_str(&format!(
            "\n_...and {} more action item(s)_",
            week.actions.len() - MAX_ACTIONS_SHOWN
        ));
    }

    json!({
        "text": format!("Weekly WASH Summary - {}", team_label(&week.team)),
        "blocks": [
            {
                "type": "header",
                "text": {
                    "type": "plain_text",
                    "text": format!("📅 Week Locked - {}", team_label(&week.team)),
                    "emoji": true
                }
            },
            {
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!(
                        "*Team:* {}\n*Week:* {} to {}\n*Locked by:* {}\n*Days locked:* {}/7\n*WRI incidents:* {}",
                        team_full_name(&week.team),
                        week.week_start, week.week_end, week.locked_by, days_locked, incident_count
                    )
                }
            },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*📊 VRET Weekly Averages*\n{}", metrics_text) }
            },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": format!("*📋 Action Items*\n{}", actions_text) }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionStatus, Incident, MetricValue, WeeklyAction};

    fn entry_with_metric(achieved: &str, goal: &str) -> DailyEntry {
        let mut entry = DailyEntry {
            date: "2025-03-02".to_string(),
            team: "A".to_string(),
            author: "Jordan".to_string(),
            ..Default::default()
        };
        entry.vret_metrics.insert(
            "Pick - Total".to_string(),
            MetricValue {
                achieved: achieved.to_string(),
                goal: goal.to_string(),
            },
        );
        entry
    }

    #[test]
    fn test_percentage_above_goal() {
        let pct = percentage("100", "80").unwrap();
        assert_eq!(format!("{:.1}", pct), "125.0");
    }

    #[test]
    fn test_percentage_missing_or_zero_is_none() {
        assert!(percentage("0", "80").is_none());
        assert!(percentage("100", "").is_none());
        assert!(percentage("", "80").is_none());
        assert!(percentage("100", "0").is_none());
        assert!(percentage("abc", "80").is_none());
    }

    #[test]
    fn test_truncate_over_limit() {
        let long = "x".repeat(1000);
        let capped = truncate(&long, CALLOUT_LIMIT);
        assert_eq!(capped.chars().count(), CALLOUT_LIMIT + TRUNCATION_MARKER.chars().count());
        assert!(capped.ends_with("... (truncated)"));
    }

    #[test]
    fn test_truncate_under_limit_passthrough() {
        assert_eq!(truncate("short note", CALLOUT_LIMIT), "short note");
    }

    #[test]
    fn test_daily_message_metric_rendering() {
        let entry = entry_with_metric("100", "80");
        let msg = daily_message(&entry);
        let text = msg.to_string();
        assert!(text.contains("125.0%"));
        assert!(text.contains("✅ *Pick - Total*: 100/80"));
    }

    #[test]
    fn test_daily_message_na_metric() {
        let entry = entry_with_metric("", "80");
        let msg = daily_message(&entry);
        assert!(msg.to_string().contains("(N/A)"));
    }

    #[test]
    fn test_daily_message_incident_elision() {
        let mut entry = entry_with_metric("90", "100");
        for i in 0..7 {
            entry.wri_incidents.push(Incident {
                summary: format!("incident {}", i),
                external_link: None,
            });
        }
        let msg = daily_message(&entry);
        let text = msg.to_string();
        assert!(text.contains("7 WRI Incident(s) Reported"));
        assert!(text.contains("and 2 more incident(s)"));
        assert!(!text.contains("incident 5"));
    }

    #[test]
    fn test_daily_message_no_callouts_block_when_empty() {
        let entry = entry_with_metric("90", "100");
        let msg = daily_message(&entry);
        assert!(!msg.to_string().contains("Shift Callouts"));
    }

    #[test]
    fn test_weekly_average_uses_sums_not_mean_of_percentages() {
        // 80/100 and 100/50 → 180/150 = 120.0%, not (80% + 200%) / 2 = 140%
        let week = LockWeekRequest {
            team: "A".to_string(),
            week_start: "2025-03-02".to_string(),
            week_end: "2025-03-08".to_string(),
            entries: vec![entry_with_metric("80", "100"), entry_with_metric("100", "50")],
            actions: vec![],
            locked_by: "Jordan".to_string(),
        };
        let msg = weekly_message(&week);
        let text = msg.to_string();
        assert!(text.contains("120.0%"));
        assert!(!text.contains("140.0%"));
    }

    #[test]
    fn test_weekly_message_action_elision() {
        let actions: Vec<WeeklyAction> = (0..5)
            .map(|i| WeeklyAction {
                action: format!("action {}", i),
                owner: "Sam".to_string(),
                status: ActionStatus::Open,
                week_start: "2025-03-02".to_string(),
                team: "A".to_string(),
                ..Default::default()
            })
            .collect();
        let week = LockWeekRequest {
            team: "A".to_string(),
            week_start: "2025-03-02".to_string(),
            week_end: "2025-03-08".to_string(),
            entries: vec![],
            actions,
            locked_by: "Jordan".to_string(),
        };
        let text = weekly_message(&week).to_string();
        assert!(text.contains("action 0"));
        assert!(text.contains("action 2"));
        assert!(!text.contains("action 3"));
        assert!(text.contains("and 2 more action item(s)"));
    }

    #[test]
    fn test_weekly_message_counts() {
        let mut locked_day = entry_with_metric("90", "100");
        locked_day.locked = true;
        locked_day.wri_incidents.push(Incident {
            summary: "slip near dock 4".to_string(),
            external_link: None,
        });
        let week = LockWeekRequest {
            team: "B".to_string(),
            week_start: "2025-03-02".to_string(),
            week_end: "2025-03-08".to_string(),
            entries: vec![locked_day, entry_with_metric("95", "100")],
            actions: vec![],
            locked_by: "Jordan".to_string(),
        };
        let text = weekly_message(&week).to_string();
        assert!(text.contains("*Days locked:* 1/7"));
        assert!(text.contains("*WRI incidents:* 1"));
    }
}
