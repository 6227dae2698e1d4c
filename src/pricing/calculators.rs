//! Core pricing calculation functions.
//!
//! Pure functions for seasonal pricing - no database access. Callers fetch the
//! relevant [`SeasonalPeriod`] rows and the fallback nightly price, then hand
//! them over here.

use rust_decimal::Decimal;

use crate::dates::{nights_between, DateRange};

use super::models::SeasonalPeriod;
use super::responses::{PriceCalculation, PriceDetail, PublicGrid, PublicGridPeriod};

/// Minimum stay applied when no touched season asks for more.
pub const DEFAULT_MIN_NIGHTS: i32 = 3;

/// Stays of at least this many nights are charged the weekly night rate.
pub const WEEKLY_RATE_MIN_NIGHTS: i64 = 7;

/// Price a stay across the seasonal periods that cover it.
///
/// Walks the stay from its first night. A night inside a period jumps the
/// cursor to the end of that period (or of the stay) and prices the whole span
/// at the season's rate; a night outside every period is priced on its own at
/// `default_price_per_night`. Consecutive spans of the same season are merged
/// into one detail row.
///
/// `periods` may contain rows outside the stay; only those overlapping it are
/// considered. Periods are expected not to overlap each other.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use holiday_rental_web::dates::DateRange;
/// use holiday_rental_web::pricing::calculate_price;
///
/// let stay = DateRange::new(
///     NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(),
/// ).unwrap();
///
/// let result = calculate_price(stay, &[], dec!(100));
/// assert_eq!(result.total_price, dec!(300));
/// assert_eq!(result.uncovered_days, 3);
/// assert!(result.details.is_empty());
/// ```
pub fn calculate_price(
    stay: DateRange,
    periods: &[SeasonalPeriod],
    default_price_per_night: Decimal,
) -> PriceCalculation {
    let total_nights = stay.nights();
    let is_weekly_rate = total_nights >= WEEKLY_RATE_MIN_NIGHTS;
    let periods = overlapping_sorted(stay, periods);

    let mut details: Vec<PriceDetail> = Vec::new();
    let mut total_price = Decimal::ZERO;
    let mut uncovered_days: i64 = 0;
    let mut min_nights_required = DEFAULT_MIN_NIGHTS;

    let mut cursor = stay.start;
    while cursor < stay.end {
        let covering = periods.iter().find(|p| p.range().contains(cursor));

        match covering {
            Some(period) => {
                let span_end = period.end_date.min(stay.end);
                let nights = nights_between(cursor, span_end);
                let price_per_night = period.rate_for(is_weekly_rate);
                let subtotal = price_per_night * Decimal::from(nights);

                match details.last_mut() {
                    Some(last) if last.season_id == period.season_id && last.end_date == cursor => {
                        last.end_date = span_end;
                        last.nights += nights;
                        last.subtotal += subtotal;
                    }
                    _ => details.push(PriceDetail {
                        start_date: cursor,
                        end_date: span_end,
                        nights,
                        season_id: period.season_id,
                        season_name: period.season_name.clone(),
                        price_per_night,
                        subtotal,
                    }),
                }

                total_price += subtotal;
                min_nights_required = min_nights_required.max(period.min_nights);
                cursor = span_end;
            }
            None => {
                uncovered_days += 1;
                total_price += default_price_per_night;
                cursor = match cursor.succ_opt() {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    tracing::debug!(
        start = %stay.start,
        end = %stay.end,
        total_nights,
        uncovered_days,
        spans = details.len(),
        %total_price,
        "priced stay"
    );

    PriceCalculation {
        total_price,
        total_nights,
        is_weekly_rate,
        min_nights_required,
        details,
        has_uncovered_days: uncovered_days > 0,
        uncovered_days,
        default_price_per_night,
    }
}

/// Longest minimum stay among the seasons whose periods overlap `range`,
/// never below [`DEFAULT_MIN_NIGHTS`].
pub fn min_nights_for(range: DateRange, periods: &[SeasonalPeriod]) -> i32 {
    periods
        .iter()
        .filter(|p| p.range().overlaps(&range))
        .map(|p| p.min_nights)
        .fold(DEFAULT_MIN_NIGHTS, i32::max)
}

/// Customer-facing grid for one year, ordered by season display order then
/// period start.
pub fn public_grid(year: i32, periods: &[SeasonalPeriod]) -> PublicGrid {
    let mut rows: Vec<&SeasonalPeriod> = periods.iter().filter(|p| p.year == year).collect();
    rows.sort_by_key(|p| (p.season_order, p.start_date));

    let periods = rows
        .into_iter()
        .map(|p| PublicGridPeriod {
            season_name: p.season_name.clone(),
            start_date: p.start_date,
            end_date: p.end_date,
            price_per_night: p.price_per_night,
            weekly_price: p.weekly_night_rate.unwrap_or(p.price_per_night)
                * Decimal::from(WEEKLY_RATE_MIN_NIGHTS),
            min_nights: p.min_nights,
            color: p.color.clone(),
        })
        .collect();

    PublicGrid { year, periods }
}

fn overlapping_sorted(stay: DateRange, periods: &[SeasonalPeriod]) -> Vec<&SeasonalPeriod> {
    let mut overlapping: Vec<&SeasonalPeriod> = periods
        .iter()
        .filter(|p| p.range().overlaps(&stay))
        .collect();
    overlapping.sort_by_key(|p| p.start_date);
    overlapping
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stay(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    struct Season {
        id: Uuid,
        name: &'static str,
        nightly: Decimal,
        weekly: Option<Decimal>,
        min_nights: i32,
        order: i32,
    }

    impl Season {
        fn new(name: &'static str, nightly: Decimal, min_nights: i32) -> Self {
            Self {
                id: Uuid::new_v4(),
                name,
                nightly,
                weekly: None,
                min_nights,
                order: 0,
            }
        }

        fn weekly(mut self, rate: Decimal) -> Self {
            self.weekly = Some(rate);
            self
        }

        fn order(mut self, order: i32) -> Self {
            self.order = order;
            self
        }

        fn period(&self, start: NaiveDate, end: NaiveDate) -> SeasonalPeriod {
            SeasonalPeriod {
                id: Uuid::new_v4(),
                start_date: start,
                end_date: end,
                year: start.year(),
                season_id: self.id,
                season_name: self.name.to_string(),
                price_per_night: self.nightly,
                weekly_night_rate: self.weekly,
                min_nights: self.min_nights,
                color: Some("#FF385C".to_string()),
                season_order: self.order,
            }
        }
    }

    // ==================== calculate_price tests ====================

    #[test]
    fn test_no_periods_uses_fallback_for_every_night() {
        let result = calculate_price(stay(date(2025, 6, 1), date(2025, 6, 4)), &[], dec!(100));

        assert_eq!(result.total_price, dec!(300));
        assert_eq!(result.total_nights, 3);
        assert_eq!(result.uncovered_days, 3);
        assert!(result.has_uncovered_days);
        assert!(result.details.is_empty());
        assert_eq!(result.min_nights_required, DEFAULT_MIN_NIGHTS);
        assert_eq!(result.default_price_per_night, dec!(100));
    }

    #[test]
    fn test_stay_inside_single_period() {
        let high = Season::new("High", dec!(150), 5);
        let periods = vec![high.period(date(2025, 7, 1), date(2025, 9, 1))];

        let result = calculate_price(stay(date(2025, 7, 10), date(2025, 7, 14)), &periods, dec!(100));

        assert_eq!(result.details.len(), 1);
        let detail = &result.details[0];
        assert_eq!(detail.nights, 4);
        assert_eq!(detail.price_per_night, dec!(150));
        assert_eq!(detail.subtotal, dec!(600));
        assert_eq!(detail.start_date, date(2025, 7, 10));
        assert_eq!(detail.end_date, date(2025, 7, 14));
        assert_eq!(result.total_price, dec!(600));
        assert_eq!(result.min_nights_required, 5);
        assert!(!result.has_uncovered_days);
        assert!(!result.is_weekly_rate);
    }

    #[test]
    fn test_stay_across_two_seasons() {
        let low = Season::new("Low", dec!(80), 3);
        let mid = Season::new("Mid", dec!(120), 3);
        let periods = vec![
            low.period(date(2025, 1, 1), date(2025, 4, 1)),
            mid.period(date(2025, 4, 1), date(2025, 7, 1)),
        ];

        let result = calculate_price(stay(date(2025, 3, 30), date(2025, 4, 3)), &periods, dec!(100));

        assert_eq!(result.details.len(), 2);
        assert_eq!(result.details[0].season_name, "Low");
        assert_eq!(result.details[0].nights, 2);
        assert_eq!(result.details[0].subtotal, dec!(160));
        assert_eq!(result.details[1].season_name, "Mid");
        assert_eq!(result.details[1].nights, 2);
        assert_eq!(result.details[1].subtotal, dec!(240));
        assert_eq!(result.total_price, dec!(400));
        assert_eq!(result.total_nights, 4);
        assert_eq!(result.uncovered_days, 0);
    }

    #[test]
    fn test_adjacent_periods_of_same_season_merge() {
        let high = Season::new("High", dec!(200), 7);
        let periods = vec![
            high.period(date(2025, 8, 1), date(2025, 8, 15)),
            high.period(date(2025, 7, 1), date(2025, 8, 1)),
        ];

        let result = calculate_price(stay(date(2025, 7, 28), date(2025, 8, 3)), &periods, dec!(100));

        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].start_date, date(2025, 7, 28));
        assert_eq!(result.details[0].end_date, date(2025, 8, 3));
        assert_eq!(result.details[0].nights, 6);
        assert_eq!(result.details[0].subtotal, dec!(1200));
    }

    #[test]
    fn test_same_season_separated_by_gap_does_not_merge() {
        let high = Season::new("High", dec!(200), 3);
        let periods = vec![
            high.period(date(2025, 7, 1), date(2025, 7, 5)),
            high.period(date(2025, 7, 6), date(2025, 7, 10)),
        ];

        let result = calculate_price(stay(date(2025, 7, 3), date(2025, 7, 8)), &periods, dec!(90));

        assert_eq!(result.details.len(), 2);
        assert_eq!(result.details[0].nights, 2);
        assert_eq!(result.details[1].nights, 2);
        assert_eq!(result.uncovered_days, 1);
        assert_eq!(result.total_price, dec!(890));
    }

    #[test]
    fn test_period_end_belongs_to_next_period() {
        let low = Season::new("Low", dec!(80), 3);
        let mid = Season::new("Mid", dec!(120), 3);
        let periods = vec![
            low.period(date(2025, 1, 1), date(2025, 4, 1)),
            mid.period(date(2025, 4, 1), date(2025, 7, 1)),
        ];

        let result = calculate_price(stay(date(2025, 4, 1), date(2025, 4, 2)), &periods, dec!(100));

        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].season_name, "Mid");
    }

    #[test]
    fn test_weekly_rate_applies_to_seven_nights() {
        let high = Season::new("High", dec!(150), 3).weekly(dec!(100));
        let periods = vec![high.period(date(2025, 7, 1), date(2025, 9, 1))];

        let result = calculate_price(stay(date(2025, 7, 5), date(2025, 7, 12)), &periods, dec!(100));

        assert!(result.is_weekly_rate);
        assert_eq!(result.details[0].price_per_night, dec!(100));
        assert_eq!(result.details[0].subtotal, dec!(700));
        assert_eq!(result.total_price, dec!(700));
    }

    #[test]
    fn test_weekly_rate_not_applied_below_seven_nights() {
        let high = Season::new("High", dec!(150), 3).weekly(dec!(100));
        let periods = vec![high.period(date(2025, 7, 1), date(2025, 9, 1))];

        let result = calculate_price(stay(date(2025, 7, 5), date(2025, 7, 11)), &periods, dec!(100));

        assert!(!result.is_weekly_rate);
        assert_eq!(result.total_price, dec!(900));
    }

    #[test]
    fn test_weekly_rate_uses_whole_stay_length_per_season() {
        let low = Season::new("Low", dec!(80), 3).weekly(dec!(70));
        let mid = Season::new("Mid", dec!(120), 3);
        let periods = vec![
            low.period(date(2025, 1, 1), date(2025, 4, 1)),
            mid.period(date(2025, 4, 1), date(2025, 7, 1)),
        ];

        // 4 nights Low at weekly rate, 3 nights Mid without a weekly rate
        let result = calculate_price(stay(date(2025, 3, 28), date(2025, 4, 4)), &periods, dec!(100));

        assert!(result.is_weekly_rate);
        assert_eq!(result.details[0].price_per_night, dec!(70));
        assert_eq!(result.details[0].subtotal, dec!(280));
        assert_eq!(result.details[1].price_per_night, dec!(120));
        assert_eq!(result.details[1].subtotal, dec!(360));
        assert_eq!(result.total_price, dec!(640));
    }

    #[test]
    fn test_min_nights_is_max_of_touched_seasons() {
        let low = Season::new("Low", dec!(80), 2);
        let high = Season::new("High", dec!(200), 7);
        let peak = Season::new("Peak", dec!(300), 14);
        let periods = vec![
            low.period(date(2025, 6, 1), date(2025, 7, 1)),
            high.period(date(2025, 7, 1), date(2025, 8, 1)),
            peak.period(date(2025, 8, 1), date(2025, 8, 15)),
        ];

        let result = calculate_price(stay(date(2025, 6, 28), date(2025, 7, 3)), &periods, dec!(100));

        assert_eq!(result.min_nights_required, 7);
    }

    #[test]
    fn test_low_minimums_keep_default_floor() {
        let low = Season::new("Low", dec!(80), 1);
        let periods = vec![low.period(date(2025, 1, 1), date(2025, 4, 1))];

        let result = calculate_price(stay(date(2025, 2, 1), date(2025, 2, 2)), &periods, dec!(100));

        assert_eq!(result.min_nights_required, DEFAULT_MIN_NIGHTS);
    }

    #[test]
    fn test_partial_coverage_mixes_fallback_and_season() {
        let low = Season::new("Low", dec!(80), 3);
        let periods = vec![low.period(date(2025, 1, 10), date(2025, 1, 20))];

        let result = calculate_price(stay(date(2025, 1, 8), date(2025, 1, 12)), &periods, dec!(95));

        assert_eq!(result.uncovered_days, 2);
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].nights, 2);
        assert_eq!(result.total_price, dec!(350));
    }

    #[test]
    fn test_nights_add_up() {
        let low = Season::new("Low", dec!(80), 3);
        let mid = Season::new("Mid", dec!(120), 4);
        let periods = vec![
            low.period(date(2025, 1, 5), date(2025, 1, 9)),
            mid.period(date(2025, 1, 9), date(2025, 1, 12)),
            low.period(date(2025, 1, 14), date(2025, 1, 30)),
        ];

        let result = calculate_price(stay(date(2025, 1, 1), date(2025, 2, 2)), &periods, dec!(100));
        let priced: i64 = result.details.iter().map(|d| d.nights).sum();

        assert_eq!(result.total_nights, 32);
        assert_eq!(priced + result.uncovered_days, result.total_nights);
        assert_eq!(result.details.len(), 3);
    }

    #[test]
    fn test_periods_outside_stay_are_ignored() {
        let low = Season::new("Low", dec!(80), 10);
        let periods = vec![low.period(date(2024, 1, 1), date(2024, 4, 1))];

        let result = calculate_price(stay(date(2025, 1, 1), date(2025, 1, 4)), &periods, dec!(100));

        assert_eq!(result.min_nights_required, DEFAULT_MIN_NIGHTS);
        assert_eq!(result.uncovered_days, 3);
    }

    #[test]
    fn test_stay_across_new_year() {
        let winter = Season::new("Winter", dec!(110), 3);
        let periods = vec![
            winter.period(date(2025, 12, 1), date(2026, 1, 1)),
            winter.period(date(2026, 1, 1), date(2026, 3, 1)),
        ];

        let result = calculate_price(stay(date(2025, 12, 30), date(2026, 1, 2)), &periods, dec!(100));

        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].nights, 3);
        assert_eq!(result.total_price, dec!(330));
    }

    // ==================== min_nights_for tests ====================

    #[test]
    fn test_min_nights_for_without_periods() {
        assert_eq!(
            min_nights_for(stay(date(2025, 1, 1), date(2025, 1, 5)), &[]),
            DEFAULT_MIN_NIGHTS
        );
    }

    #[test]
    fn test_min_nights_for_single_season() {
        let high = Season::new("High", dec!(200), 7);
        let periods = vec![high.period(date(2025, 7, 1), date(2025, 9, 1))];

        assert_eq!(min_nights_for(stay(date(2025, 7, 5), date(2025, 7, 6)), &periods), 7);
        // touching the period's end does not count
        assert_eq!(
            min_nights_for(stay(date(2025, 9, 1), date(2025, 9, 5)), &periods),
            DEFAULT_MIN_NIGHTS
        );
    }

    // ==================== public_grid tests ====================

    #[test]
    fn test_public_grid_orders_and_derives_weekly_price() {
        let high = Season::new("High", dec!(150), 7).weekly(dec!(120)).order(2);
        let low = Season::new("Low", dec!(80), 3).order(1);
        let periods = vec![
            high.period(date(2025, 7, 1), date(2025, 9, 1)),
            low.period(date(2025, 9, 1), date(2025, 12, 1)),
            low.period(date(2025, 1, 1), date(2025, 4, 1)),
            low.period(date(2026, 1, 1), date(2026, 4, 1)),
        ];

        let grid = public_grid(2025, &periods);

        assert_eq!(grid.year, 2025);
        assert_eq!(grid.periods.len(), 3);
        assert_eq!(grid.periods[0].season_name, "Low");
        assert_eq!(grid.periods[0].start_date, date(2025, 1, 1));
        assert_eq!(grid.periods[0].weekly_price, dec!(560));
        assert_eq!(grid.periods[1].start_date, date(2025, 9, 1));
        assert_eq!(grid.periods[2].season_name, "High");
        assert_eq!(grid.periods[2].weekly_price, dec!(840));
        assert_eq!(grid.periods[2].min_nights, 7);
    }
}
