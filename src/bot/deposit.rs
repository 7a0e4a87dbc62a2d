use std::sync::OnceLock;

use regex::Regex;

use super::message::Embed;

/* Deposit notices are posted into the donation channel by external services.
 * Two kinds are recognised: an in-game deposit of World Locks or Diamond Locks,
 * and a Saweria top-up paid in Rupiah. Anything else is not a deposit.
 */

// One Diamond Lock is worth this many World Locks.
pub const DIAMOND_LOCK_RATE: i64 = 100;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum LockUnit {
    WorldLock,
    DiamondLock,
}

impl LockUnit {
    pub fn label(&self) -> &'static str {
        match self {
            LockUnit::WorldLock => "World Lock",
            LockUnit::DiamondLock => "Diamond Lock",
        }
    }

    // Converts an amount of this unit into World Locks. None on overflow.
    pub fn to_world_locks(&self, amount: i64) -> Option<i64> {
        match self {
            LockUnit::WorldLock => Some(amount),
            LockUnit::DiamondLock => amount.checked_mul(DIAMOND_LOCK_RATE),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum DepositNotice {
    // In-game deposit, `amount` is in `unit` as written in the notice.
    Lock {
        name: String,
        amount: i64,
        unit: LockUnit,
    },
    // Saweria top-up, `amount` is in Rupiah.
    Saweria { name: String, amount: i64 },
}

impl DepositNotice {
    // Lowercased account name the notice is for.
    pub fn name(&self) -> &str {
        match self {
            DepositNotice::Lock { name, .. } => name,
            DepositNotice::Saweria { name, .. } => name,
        }
    }
}

fn lock_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"GrowID: (\S+)\nDeposit: (\d+) (World Lock|Diamond Lock)")
            .expect("lock deposit pattern is valid")
    })
}

fn saweria_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\S+) melakukan Top Up via Saweria sebanyak Rp ([\d.]+)")
            .expect("saweria pattern is valid")
    })
}

// Parses a Rupiah amount written with '.' thousands separators.
fn parse_rupiah(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| *c != '.').collect();
    digits.parse().ok()
}

fn parse_lock_deposit(description: &str) -> Option<DepositNotice> {
    let captures = lock_pattern().captures(description)?;
    let unit = match &captures[3] {
        "Diamond Lock" => LockUnit::DiamondLock,
        _ => LockUnit::WorldLock,
    };

    let amount: i64 = captures[2].parse().ok()?;
    if unit.to_world_locks(amount).is_none() {
        log::debug!(
            "Deposit - Ignored notice for {} with out of range amount {} {}",
            &captures[1],
            amount,
            unit.label()
        );
        return None;
    }

    Some(DepositNotice::Lock {
        name: captures[1].to_lowercase(),
        amount,
        unit,
    })
}

fn parse_saweria_top_up(title: &str) -> Option<DepositNotice> {
    let captures = saweria_pattern().captures(title)?;

    Some(DepositNotice::Saweria {
        name: captures[1].to_lowercase(),
        amount: parse_rupiah(&captures[2])?,
    })
}

/* Classifies a message by its first embed.
 * The lock deposit pattern is checked on the description first,
 * the Saweria pattern on the title second. None if neither matches.
 */
pub fn parse_deposit_notice(embeds: &[Embed]) -> Option<DepositNotice> {
    let embed = embeds.first()?;

    embed
        .description
        .as_deref()
        .and_then(parse_lock_deposit)
        .or_else(|| embed.title.as_deref().and_then(parse_saweria_top_up))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embed(title: Option<&str>, description: Option<&str>) -> Vec<Embed> {
        vec![Embed {
            title: title.map(str::to_string),
            description: description.map(str::to_string),
        }]
    }

    #[test]
    fn test_diamond_lock_deposit() {
        let notice =
            parse_deposit_notice(&embed(None, Some("GrowID: bob\nDeposit: 5 Diamond Lock")));
        assert_eq!(
            notice,
            Some(DepositNotice::Lock {
                name: "bob".to_string(),
                amount: 5,
                unit: LockUnit::DiamondLock
            })
        );
        assert_eq!(LockUnit::DiamondLock.to_world_locks(5), Some(500));
    }

    #[test]
    fn test_world_lock_deposit() {
        let notice = parse_deposit_notice(&embed(None, Some("GrowID: bob\nDeposit: 5 World Lock")));
        assert_eq!(
            notice,
            Some(DepositNotice::Lock {
                name: "bob".to_string(),
                amount: 5,
                unit: LockUnit::WorldLock
            })
        );
        assert_eq!(LockUnit::WorldLock.to_world_locks(5), Some(5));
    }

    #[test]
    fn test_diamond_lock_overflow_is_not_a_deposit() {
        let description = "GrowID: bob\nDeposit: 99999999999999999 Diamond Lock";
        assert_eq!(parse_deposit_notice(&embed(None, Some(description))), None);
        assert_eq!(LockUnit::DiamondLock.to_world_locks(99999999999999999), None);

        // The same amount is fine in World Locks
        let description = "GrowID: bob\nDeposit: 99999999999999999 World Lock";
        assert_eq!(
            parse_deposit_notice(&embed(None, Some(description))),
            Some(DepositNotice::Lock {
                name: "bob".to_string(),
                amount: 99999999999999999,
                unit: LockUnit::WorldLock
            })
        );
    }

    #[test]
    fn test_deposit_name_is_lowercased() {
        let notice =
            parse_deposit_notice(&embed(None, Some("GrowID: BoB\nDeposit: 1 World Lock"))).unwrap();
        assert_eq!(notice.name(), "bob");
    }

    #[test]
    fn test_saweria_top_up() {
        let notice = parse_deposit_notice(&embed(
            Some("carol melakukan Top Up via Saweria sebanyak Rp 10.000"),
            None,
        ));
        assert_eq!(
            notice,
            Some(DepositNotice::Saweria {
                name: "carol".to_string(),
                amount: 10000
            })
        );
    }

    #[test]
    fn test_saweria_large_amount() {
        let notice = parse_deposit_notice(&embed(
            Some("Dave melakukan Top Up via Saweria sebanyak Rp 1.250.000"),
            Some("Terima kasih!"),
        ));
        assert_eq!(
            notice,
            Some(DepositNotice::Saweria {
                name: "dave".to_string(),
                amount: 1250000
            })
        );
    }

    #[test]
    fn test_lock_deposit_wins_over_saweria() {
        let notice = parse_deposit_notice(&embed(
            Some("carol melakukan Top Up via Saweria sebanyak Rp 10.000"),
            Some("GrowID: bob\nDeposit: 2 World Lock"),
        ));
        assert_eq!(notice.unwrap().name(), "bob");
    }

    #[test]
    fn test_only_first_embed_is_inspected() {
        let embeds = vec![
            Embed {
                title: Some("Unrelated".to_string()),
                description: None,
            },
            Embed {
                title: None,
                description: Some("GrowID: bob\nDeposit: 5 World Lock".to_string()),
            },
        ];
        assert_eq!(parse_deposit_notice(&embeds), None);
    }

    #[test]
    fn test_unmatched_payloads() {
        assert_eq!(parse_deposit_notice(&[]), None);
        assert_eq!(parse_deposit_notice(&embed(None, None)), None);
        assert_eq!(
            parse_deposit_notice(&embed(Some("hello"), Some("GrowID: bob Deposit: 5 World Lock"))),
            None
        );
        assert_eq!(
            parse_deposit_notice(&embed(None, Some("GrowID: bob\nDeposit: 5 Gem"))),
            None
        );
        assert_eq!(
            parse_deposit_notice(&embed(
                Some("carol melakukan Top Up via Saweria sebanyak Rp ."),
                None
            )),
            None
        );
    }
}
