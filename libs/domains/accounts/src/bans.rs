//! Ban lifecycle.
//!
//! An account is either `Clear` (no history, or the last record is closed) or
//! `Banned` (the last record is open). `ban` and `unban` are the only legal
//! transitions and neither is idempotent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::error::{AccountError, AccountResult};
use crate::models::{Account, BanRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BanState {
    Clear,
    Banned,
}

pub fn state(account: &Account) -> BanState {
    if account.active_ban().is_some() {
        BanState::Banned
    } else {
        BanState::Clear
    }
}

pub fn has_active_ban(account: &Account) -> bool {
    state(account) == BanState::Banned
}

/// Latest event time recorded in the history, used to keep it chronological
fn last_event(account: &Account) -> Option<DateTime<Utc>> {
    account
        .ban_history
        .last()
        .map(|ban| ban.unbanned_at.unwrap_or(ban.banned_at))
}

/// Open a new ban. Fails with `AlreadyBanned` when one is already open.
pub fn ban(
    mut account: Account,
    issuer: &str,
    reason: &str,
    at: DateTime<Utc>,
) -> AccountResult<Account> {
    if has_active_ban(&account) {
        return Err(AccountError::AlreadyBanned(account.email));
    }

    let banned_at = last_event(&account).map_or(at, |last| at.max(last));
    account.ban_history.push(BanRecord {
        banned_by: issuer.to_string(),
        banned_at,
        reason: reason.to_string(),
        unbanned_by: None,
        unbanned_at: None,
    });

    Ok(account)
}

/// Close the open ban. Fails with `NoActiveBan` when there is none.
pub fn unban(mut account: Account, issuer: &str, at: DateTime<Utc>) -> AccountResult<Account> {
    let Some(open) = account.ban_history.last_mut().filter(|ban| ban.is_open()) else {
        return Err(AccountError::NoActiveBan(account.email));
    };

    open.unbanned_by = Some(issuer.to_string());
    open.unbanned_at = Some(at.max(open.banned_at));

    Ok(account)
}

/// Rendered ban history of one account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InspectionReport {
    NoBans { email: String },
    History { email: String, bans: Vec<BanRecord> },
}

pub fn inspect(account: &Account) -> InspectionReport {
    if account.ban_history.is_empty() {
        InspectionReport::NoBans {
            email: account.email.clone(),
        }
    } else {
        InspectionReport::History {
            email: account.email.clone(),
            bans: account.ban_history.clone(),
        }
    }
}

impl fmt::Display for InspectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectionReport::NoBans { email } => {
                write!(f, "user {} does not have any bans", email)
            }
            InspectionReport::History { email, bans } => {
                writeln!(f, "user {} has the following bans:", email)?;
                for ban in bans {
                    write!(
                        f,
                        "-- Banned by {} because '{}' at {}.",
                        ban.banned_by,
                        ban.reason,
                        ban.banned_at.to_rfc3339()
                    )?;
                    if let (Some(by), Some(at)) = (&ban.unbanned_by, ban.unbanned_at) {
                        write!(f, " Unbanned by {} at {}.", by, at.to_rfc3339())?;
                    }
                    writeln!(f)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::{Duration, TimeZone};

    fn account() -> Account {
        Account::new(
            "alice@mail.com".to_string(),
            "hash".to_string(),
            "cheesecake".to_string(),
            Role::User,
        )
    }

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_ban_from_clear_opens_record() {
        let banned = ban(account(), "admin@mail.com", "spam", t(0)).unwrap();

        assert_eq!(state(&banned), BanState::Banned);
        assert_eq!(banned.ban_history.len(), 1);
        let record = &banned.ban_history[0];
        assert_eq!(record.banned_by, "admin@mail.com");
        assert_eq!(record.reason, "spam");
        assert_eq!(record.banned_at, t(0));
        assert!(record.is_open());
    }

    #[test]
    fn test_double_ban_is_rejected() {
        let banned = ban(account(), "admin@mail.com", "spam", t(0)).unwrap();
        let err = ban(banned, "admin@mail.com", "again", t(1)).unwrap_err();
        assert_eq!(err, AccountError::AlreadyBanned("alice@mail.com".to_string()));
    }

    #[test]
    fn test_unban_from_clear_is_rejected() {
        let err = unban(account(), "admin@mail.com", t(0)).unwrap_err();
        assert_eq!(err, AccountError::NoActiveBan("alice@mail.com".to_string()));
    }

    #[test]
    fn test_ban_unban_cycle_repeats() {
        let mut current = account();

        for round in 0..5 {
            current = ban(current, "admin@mail.com", "spam", t(round * 10)).unwrap();
            assert!(has_active_ban(&current));
            assert!(ban(current.clone(), "admin@mail.com", "spam", t(round * 10 + 1)).is_err());

            current = unban(current, "super@mail.com", t(round * 10 + 2)).unwrap();
            assert!(!has_active_ban(&current));
            assert!(unban(current.clone(), "super@mail.com", t(round * 10 + 3)).is_err());
        }

        assert_eq!(current.ban_history.len(), 5);
        assert!(current.ban_history.iter().all(|b| !b.is_open()));
    }

    #[test]
    fn test_active_ban_tracks_last_record_only() {
        let mut current = ban(account(), "a", "first", t(0)).unwrap();
        current = unban(current, "b", t(1)).unwrap();
        assert!(!has_active_ban(&current));

        current = ban(current, "a", "second", t(2)).unwrap();
        assert!(has_active_ban(&current));
        assert_eq!(current.active_ban().unwrap().reason, "second");
    }

    #[test]
    fn test_history_stays_chronological_with_skewed_clock() {
        let banned = ban(account(), "a", "first", t(100)).unwrap();
        let cleared = unban(banned, "b", t(50)).unwrap();
        assert_eq!(cleared.ban_history[0].unbanned_at, Some(t(100)));

        let again = ban(cleared, "a", "second", t(10)).unwrap();
        assert_eq!(again.ban_history[1].banned_at, t(100));
        assert!(again.ban_history[0].banned_at <= again.ban_history[1].banned_at);
    }

    #[test]
    fn test_inspect_without_history() {
        let report = inspect(&account());
        assert_eq!(
            report,
            InspectionReport::NoBans {
                email: "alice@mail.com".to_string()
            }
        );
        assert_eq!(report.to_string(), "user alice@mail.com does not have any bans");
    }

    #[test]
    fn test_inspect_renders_every_episode() {
        let mut current = ban(account(), "admin@mail.com", "spam", t(0)).unwrap();
        current = unban(current, "super@mail.com", t(0) + Duration::hours(1)).unwrap();
        current = ban(current, "admin@mail.com", "flood", t(7200)).unwrap();

        let rendered = inspect(&current).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "user alice@mail.com has the following bans:");
        assert!(lines[1].contains("Banned by admin@mail.com because 'spam'"));
        assert!(lines[1].contains("Unbanned by super@mail.com"));
        assert!(lines[2].contains("because 'flood'"));
        assert!(!lines[2].contains("Unbanned"));
    }
}
