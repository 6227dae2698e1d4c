//! Booking money: extras, deposit and balance on top of the rental price.
//!
//! Pure functions. The rental price itself comes from the booking row (which
//! defaults to the engine's total) and the per-season breakdown from the engine.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::Tariffs;
use crate::pricing::PriceDetail;

use super::models::Booking;
use super::responses::PriceSummary;

/// Round to whole currency units, halves away from zero.
///
/// Deposits are quoted in whole units on contracts and invoices.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Money breakdown of a booking.
///
/// `details` is the engine breakdown for the stay; it is only kept when the
/// stay spans more than one season. `None` for bookings without a rental
/// price (channel and personal stays).
pub fn price_summary(
    booking: &Booking,
    tariffs: &Tariffs,
    details: Vec<PriceDetail>,
) -> Option<PriceSummary> {
    let rental_price = booking.rental_price?;
    let nights = booking.nights();

    let cleaning_price = if booking.cleaning_included && !booking.cleaning_offered {
        tariffs.cleaning
    } else {
        Decimal::ZERO
    };

    let linen_price = if booking.linen_included && !booking.linen_offered {
        tariffs.linen_per_occupant * Decimal::from(booking.occupants_count)
    } else {
        Decimal::ZERO
    };

    let tourist_tax_price = if booking.tourist_tax_included {
        tariffs.tourist_tax_per_adult_night * Decimal::from(booking.adults_count) * Decimal::from(nights)
    } else {
        Decimal::ZERO
    };

    let total_price = rental_price + cleaning_price + linen_price + tourist_tax_price;
    let deposit_amount = round_money(total_price * tariffs.deposit_percent / Decimal::ONE_HUNDRED);
    let balance_amount = total_price - deposit_amount;

    let price_details = if spans_several_seasons(&details) {
        Some(details)
    } else {
        None
    };

    Some(PriceSummary {
        booking_id: booking.id,
        nights_count: nights,
        rental_price,
        cleaning_price,
        linen_price,
        tourist_tax_price,
        total_price,
        deposit_amount,
        balance_amount,
        price_details,
    })
}

fn spans_several_seasons(details: &[PriceDetail]) -> bool {
    details
        .first()
        .map(|first| details.iter().any(|d| d.season_id != first.season_id))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::models::{BookingSource, BookingStatus};
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking() -> Booking {
        Booking {
            id: Uuid::new_v4(),
            start_date: date(2025, 7, 5),
            end_date: date(2025, 7, 12),
            status: BookingStatus::Pending,
            primary_client: None,
            occupants_count: 4,
            adults_count: 2,
            rental_price: Some(dec!(840)),
            tourist_tax_included: true,
            cleaning_included: true,
            cleaning_offered: false,
            linen_included: true,
            linen_offered: false,
            notes: None,
            source: None,
            source_custom_name: None,
            label: None,
            external_amount: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn detail(season_id: Uuid, name: &str, nights: i64, price: Decimal) -> PriceDetail {
        PriceDetail {
            start_date: date(2025, 7, 5),
            end_date: date(2025, 7, 12),
            nights,
            season_id,
            season_name: name.to_string(),
            price_per_night: price,
            subtotal: price * Decimal::from(nights),
        }
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(295.5)), dec!(296));
        assert_eq!(round_money(dec!(295.49)), dec!(295));
        assert_eq!(round_money(dec!(-2.5)), dec!(-3));
    }

    #[test]
    fn test_summary_with_all_extras() {
        let summary = price_summary(&booking(), &Tariffs::default(), vec![]).expect("priced booking");

        assert_eq!(summary.nights_count, 7);
        assert_eq!(summary.cleaning_price, dec!(80));
        assert_eq!(summary.linen_price, dec!(60));
        // 0.80 x 2 adults x 7 nights
        assert_eq!(summary.tourist_tax_price, dec!(11.20));
        assert_eq!(summary.total_price, dec!(991.20));
        // 30% of 991.20 = 297.36
        assert_eq!(summary.deposit_amount, dec!(297));
        assert_eq!(summary.balance_amount, dec!(694.20));
        assert!(summary.price_details.is_none());
    }

    #[test]
    fn test_offered_and_excluded_extras_are_free() {
        let mut b = booking();
        b.cleaning_offered = true;
        b.linen_included = false;
        b.tourist_tax_included = false;

        let summary = price_summary(&b, &Tariffs::default(), vec![]).expect("priced booking");

        assert_eq!(summary.cleaning_price, Decimal::ZERO);
        assert_eq!(summary.linen_price, Decimal::ZERO);
        assert_eq!(summary.tourist_tax_price, Decimal::ZERO);
        assert_eq!(summary.total_price, dec!(840));
        assert_eq!(summary.deposit_amount, dec!(252));
        assert_eq!(summary.balance_amount, dec!(588));
    }

    #[test]
    fn test_details_kept_only_across_seasons() {
        let high = Uuid::new_v4();
        let mid = Uuid::new_v4();

        let single = vec![detail(high, "High", 7, dec!(120))];
        let summary = price_summary(&booking(), &Tariffs::default(), single).expect("priced booking");
        assert!(summary.price_details.is_none());

        let split = vec![
            detail(mid, "Mid", 3, dec!(100)),
            detail(high, "High", 4, dec!(120)),
        ];
        let summary = price_summary(&booking(), &Tariffs::default(), split).expect("priced booking");
        assert_eq!(summary.price_details.map(|d| d.len()), Some(2));
    }

    #[test]
    fn test_deposit_plus_balance_is_total() {
        let mut b = booking();
        b.rental_price = Some(dec!(333.33));
        let summary = price_summary(&b, &Tariffs::default(), vec![]).expect("priced booking");
        assert_eq!(summary.deposit_amount + summary.balance_amount, summary.total_price);
    }

    #[test]
    fn test_channel_booking_has_no_summary() {
        let mut b = booking();
        b.rental_price = None;
        b.source = Some(BookingSource::Airbnb);
        b.external_amount = Some(dec!(910));

        assert!(price_summary(&b, &Tariffs::default(), vec![]).is_none());
    }
}
