use chrono::{DateTime, TimeDelta, Utc};
use fnstatus_common::{Game, OfferSet, PromotionOffer};

const SECS_PER_DAY: i64 = 86_400;
const SECS_PER_HOUR: i64 = 3_600;

/// A game free right now, until `ends_at`
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentFree<'a> {
    pub game: &'a Game,
    pub ends_at: DateTime<Utc>,
}

/// A game that will be free from `starts_at`
#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingFree<'a> {
    pub game: &'a Game,
    pub starts_at: DateTime<Utc>,
}

/// Qualifying (game, time) pairs, in catalog and offer order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameWindows<'a> {
    pub current_free: Vec<CurrentFree<'a>>,
    pub upcoming_free: Vec<UpcomingFree<'a>>,
}

impl<'a> GameWindows<'a> {
    pub fn extend(&mut self, other: GameWindows<'a>) {
        self.current_free.extend(other.current_free);
        self.upcoming_free.extend(other.upcoming_free);
    }
}

/// Time left until a promotion ends.
///
/// `hours` is the hour component modulo 24, meant for the "ends in N hours"
/// line when `days == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
}

/// Parse an ISO-8601 timestamp into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn free_offers(sets: &[OfferSet]) -> impl Iterator<Item = &PromotionOffer> {
    sets.iter()
        .flat_map(|set| set.offers.iter())
        .filter(|offer| offer.is_free())
}

/// Classify one game's offers against `now`.
///
/// Current: free and `end_date` parses and lies after `now`.
/// Upcoming: free and `start_date` parses; a start in the past still counts.
/// Offers with a missing or unparseable date are skipped, and so are games
/// without promotions.
pub fn classify_game(game: &Game, now: DateTime<Utc>) -> GameWindows<'_> {
    let mut windows = GameWindows::default();

    let Some(promotions) = game.promotions.as_ref() else {
        return windows;
    };

    for offer in free_offers(&promotions.promotional_offers) {
        if let Some(ends_at) = offer.end_date.as_deref().and_then(parse_timestamp) {
            if ends_at > now {
                windows.current_free.push(CurrentFree { game, ends_at });
            }
        }
    }

    for offer in free_offers(&promotions.upcoming_offers) {
        if let Some(starts_at) = offer.start_date.as_deref().and_then(parse_timestamp) {
            windows.upcoming_free.push(UpcomingFree { game, starts_at });
        }
    }

    windows
}

/// Classify every game of a catalog, preserving catalog order.
pub fn classify_catalog(games: &[Game], now: DateTime<Utc>) -> GameWindows<'_> {
    let mut windows = GameWindows::default();
    for game in games {
        windows.extend(classify_game(game, now));
    }
    windows
}

/// Whole seconds in `delta`, rounded toward negative infinity.
fn floor_seconds(delta: TimeDelta) -> i64 {
    let secs = delta.num_seconds();
    if delta < TimeDelta::seconds(secs) {
        secs - 1
    } else {
        secs
    }
}

/// Floor of whole days and leftover hours in `end - now`.
pub fn remaining(now: DateTime<Utc>, end: DateTime<Utc>) -> Remaining {
    let secs = floor_seconds(end - now);
    Remaining {
        days: secs.div_euclid(SECS_PER_DAY),
        hours: secs.rem_euclid(SECS_PER_DAY) / SECS_PER_HOUR,
    }
}

/// Whole days until `start` (floor, not clamped: past starts go negative).
pub fn until(now: DateTime<Utc>, start: DateTime<Utc>) -> i64 {
    floor_seconds(start - now).div_euclid(SECS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use fnstatus_common::{DiscountSetting, Promotions};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    fn offer(pct: Option<i64>, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> PromotionOffer {
        PromotionOffer {
            start_date: start.map(iso),
            end_date: end.map(iso),
            discount_setting: pct.map(|p| DiscountSetting {
                discount_type: Some("PERCENTAGE".to_string()),
                discount_percentage: Some(p),
            }),
        }
    }

    fn game(title: &str, current: Vec<PromotionOffer>, upcoming: Vec<PromotionOffer>) -> Game {
        Game {
            title: title.to_string(),
            description: String::new(),
            promotions: Some(Promotions {
                promotional_offers: vec![OfferSet { offers: current }],
                upcoming_offers: vec![OfferSet { offers: upcoming }],
            }),
        }
    }

    #[test]
    fn test_current_free_two_days_left() {
        let end = now() + TimeDelta::days(2);
        let g = game("Free Now", vec![offer(Some(0), Some(now()), Some(end))], vec![]);

        let windows = classify_game(&g, now());
        assert_eq!(windows.current_free.len(), 1);
        assert_eq!(windows.current_free[0].ends_at, end);
        assert_eq!(windows.current_free[0].game.title, "Free Now");
        assert_eq!(remaining(now(), end).days, 2);
        assert!(windows.upcoming_free.is_empty());
    }

    #[test]
    fn test_discounted_offer_never_qualifies() {
        let g = game(
            "Half Price",
            vec![offer(Some(50), Some(now()), Some(now() + TimeDelta::days(3)))],
            vec![offer(Some(50), Some(now() + TimeDelta::days(7)), None)],
        );
        let windows = classify_game(&g, now());
        assert!(windows.current_free.is_empty());
        assert!(windows.upcoming_free.is_empty());
    }

    #[test]
    fn test_expired_offer_excluded() {
        let g = game(
            "Expired",
            vec![offer(Some(0), None, Some(now() - TimeDelta::hours(1)))],
            vec![],
        );
        assert!(classify_game(&g, now()).current_free.is_empty());

        // Ending exactly now is not in the future either
        let g = game("Edge", vec![offer(Some(0), None, Some(now()))], vec![]);
        assert!(classify_game(&g, now()).current_free.is_empty());
    }

    #[test]
    fn test_missing_or_bad_dates_excluded() {
        let mut bad = offer(Some(0), None, None);
        bad.end_date = Some("not a date".to_string());
        bad.start_date = Some("soon".to_string());

        let g = game(
            "Dateless",
            vec![offer(Some(0), None, None), bad.clone()],
            vec![offer(Some(0), None, None), bad],
        );
        let windows = classify_game(&g, now());
        assert!(windows.current_free.is_empty());
        assert!(windows.upcoming_free.is_empty());
    }

    #[test]
    fn test_missing_discount_setting_counts_as_free() {
        let end = now() + TimeDelta::hours(5);
        let g = game("No Discount Field", vec![offer(None, None, Some(end))], vec![]);
        assert_eq!(classify_game(&g, now()).current_free.len(), 1);
    }

    #[test]
    fn test_upcoming_with_past_start_still_counts() {
        let past = now() - TimeDelta::days(2);
        let g = game("Late Upcoming", vec![], vec![offer(Some(0), Some(past), None)]);

        let windows = classify_game(&g, now());
        assert_eq!(windows.upcoming_free.len(), 1);
        assert_eq!(until(now(), windows.upcoming_free[0].starts_at), -2);
    }

    #[test]
    fn test_game_in_both_lists_with_multiple_offers() {
        let g = game(
            "Both",
            vec![
                offer(Some(0), None, Some(now() + TimeDelta::days(1))),
                offer(Some(0), None, Some(now() + TimeDelta::days(4))),
            ],
            vec![offer(Some(0), Some(now() + TimeDelta::days(7)), None)],
        );
        let windows = classify_game(&g, now());
        assert_eq!(windows.current_free.len(), 2);
        assert_eq!(windows.upcoming_free.len(), 1);
    }

    #[test]
    fn test_game_without_promotions_skipped() {
        let g = Game {
            title: "Plain".to_string(),
            ..Default::default()
        };
        assert_eq!(classify_game(&g, now()), GameWindows::default());
    }

    #[test]
    fn test_classify_catalog_keeps_order() {
        let games = vec![
            game("First", vec![offer(Some(0), None, Some(now() + TimeDelta::days(1)))], vec![]),
            Game::default(),
            game("Second", vec![offer(Some(0), None, Some(now() + TimeDelta::days(2)))], vec![]),
        ];
        let windows = classify_catalog(&games, now());
        let titles: Vec<&str> = windows.current_free.iter().map(|c| c.game.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_remaining_hours_when_under_a_day() {
        let end = now() + TimeDelta::hours(5) + TimeDelta::minutes(30);
        assert_eq!(remaining(now(), end), Remaining { days: 0, hours: 5 });

        let end = now() + TimeDelta::days(3) + TimeDelta::hours(2);
        assert_eq!(remaining(now(), end), Remaining { days: 3, hours: 2 });
    }

    #[test]
    fn test_until_floors() {
        assert_eq!(until(now(), now() + TimeDelta::hours(47)), 1);
        assert_eq!(until(now(), now() + TimeDelta::days(3)), 3);
        assert_eq!(until(now(), now() + TimeDelta::hours(2)), 0);
        assert_eq!(until(now(), now() - TimeDelta::hours(1)), -1);
        assert_eq!(until(now(), now() - TimeDelta::milliseconds(500)), -1);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("2024-06-01T12:00:00.000Z"), Some(now()));
        assert_eq!(parse_timestamp("2024-06-01T14:00:00+02:00"), Some(now()));
        assert_eq!(parse_timestamp("2024-06-01"), None);
    }
}
