// -------------------------------------------------------------------------------------------------
//  End-to-end scenarios across parsing, arithmetic, allocation, and conversion.
// -------------------------------------------------------------------------------------------------

use exacta_core::{FixedPoint, RoundingMode};
use exacta_model::{
    AllocateOptions, Currency, ExchangeRate, FormatOptions, Money, MoneyAmount, PriceRange,
    convert,
};
use proptest::prelude::*;
use rstest::rstest;
use ustr::Ustr;

fn usd(amount: &str) -> Money {
    Money::new(amount.parse::<FixedPoint>().unwrap(), Currency::USD())
}

#[rstest]
fn test_sales_tax_on_parsed_amount() {
    let subtotal: Money = "$1,234.56".parse().unwrap();
    let tax = subtotal
        .mul_checked("8.25%", Some(RoundingMode::HalfExpand))
        .unwrap();
    assert_eq!(tax, usd("101.85"));
}

#[rstest]
fn test_parsed_allocation() {
    let shares = "$100"
        .parse::<Money>()
        .unwrap()
        .allocate_checked(&[1, 2, 1], AllocateOptions::default())
        .unwrap();
    assert_eq!(shares, vec![usd("25.00"), usd("50.00"), usd("25.00")]);
}

#[rstest]
fn test_sats_round_trip_to_btc_display() {
    let money: Money = "100 sat".parse().unwrap();
    assert_eq!(money.currency, Currency::BTC());
    let rendered = money.format(&FormatOptions {
        preferred_unit: Some(Ustr::from("btc")),
        ..FormatOptions::default()
    });
    assert_eq!(rendered, "0.00000100 BTC");
}

#[rstest]
fn test_price_range_split_conserves_span() {
    let range: PriceRange = "$50 - $100".parse().unwrap();
    let thirds = range.split(3).unwrap();
    let total = thirds
        .iter()
        .skip(1)
        .try_fold(thirds[0].span(), |acc, sub| acc.add_checked(&sub.span()))
        .unwrap();
    assert_eq!(total, usd("50.00"));
}

#[rstest]
fn test_mismatch_names_operation_and_codes() {
    let dollars: Money = "$10".parse().unwrap();
    let euros: Money = "€10".parse().unwrap();
    let err = dollars.add_checked(&euros).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("add"));
    assert!(msg.contains("USD"));
    assert!(msg.contains("EUR"));
}

#[rstest]
fn test_symbol_disambiguation_and_scientific_notation() {
    assert_eq!("$100".parse::<Money>().unwrap().currency, Currency::USD());
    assert_eq!("¥100".parse::<Money>().unwrap().currency, Currency::JPY());

    let money = Money::parse("1.23E+5", Some(Currency::USD())).unwrap();
    assert_eq!(money, usd("123000.00"));
}

#[rstest]
fn test_rate_averaging_survives_awkward_counts() {
    let when = chrono::Utc::now();
    let rates: Vec<ExchangeRate> = (0..7)
        .map(|i| {
            ExchangeRate::new(
                Currency::EUR(),
                Currency::USD(),
                FixedPoint::new(100 + 10 * i, 2),
                when,
                None,
            )
        })
        .collect();
    let mean = ExchangeRate::average(&rates).unwrap();
    assert_eq!(mean.rate, "1.30".parse().unwrap());

    let mean_of_three = ExchangeRate::average(&rates[..3]).unwrap();
    assert_eq!(mean_of_three.rate, "1.10".parse().unwrap());
}

#[rstest]
fn test_convert_and_back_is_lossless() {
    let when = chrono::Utc::now();
    let eur_usd = ExchangeRate::new(
        Currency::EUR(),
        Currency::USD(),
        "1.0832".parse().unwrap(),
        when,
        None,
    );
    // 1.0832 has prime factors beyond 2 and 5, so the intermediate is rational
    let round_trip = convert(&convert(&usd("19.99"), &eur_usd).unwrap(), &eur_usd).unwrap();
    assert_eq!(round_trip, usd("19.99"));
}

fn strip_factors(mut n: i64, factor: i64) -> i64 {
    while n % factor == 0 {
        n /= factor;
    }
    n
}

proptest! {
    #[test]
    fn prop_allocation_conserves_total_and_precision(
        amount in any::<i64>(),
        decimals in 0u32..6,
        ratios in proptest::collection::vec(1i64..100, 1..12),
    ) {
        let money = Money::new(FixedPoint::new(amount, decimals), Currency::USD());
        let shares = money
            .allocate_checked(&ratios, AllocateOptions::default())
            .unwrap();
        prop_assert_eq!(shares.len(), ratios.len());

        let total = shares
            .iter()
            .skip(1)
            .fold(shares[0].clone(), |acc, share| acc.add_checked(share).unwrap());
        prop_assert_eq!(&total, &money);

        for share in &shares {
            let MoneyAmount::Fixed(fixed) = &share.amount else {
                panic!("allocation must stay fixed-point");
            };
            prop_assert_eq!(fixed.decimals, decimals);
        }
    }

    #[test]
    fn prop_json_round_trip(amount in any::<i64>(), decimals in 0u32..12) {
        let money = Money::new(FixedPoint::new(amount, decimals), Currency::USD());
        let back = Money::from_json(&money.to_json().unwrap()).unwrap();
        prop_assert_eq!(back, money);
    }

    #[test]
    fn prop_two_five_smooth_division_is_exact(
        amount in any::<i32>(),
        twos in 0u32..6,
        fives in 0u32..6,
    ) {
        let divisor = 2i64.pow(twos) * 5i64.pow(fives);
        let money = Money::new(FixedPoint::new(amount, 2), Currency::USD());
        let quotient = money.div_checked(divisor, None).unwrap();
        let back = quotient.mul_checked(divisor, None).unwrap();
        prop_assert_eq!(back, money);
    }

    #[test]
    fn prop_other_divisors_require_a_mode(amount in any::<i32>(), divisor in 2i64..500) {
        prop_assume!(strip_factors(strip_factors(divisor, 2), 5) != 1);
        let money = Money::new(FixedPoint::new(amount, 2), Currency::USD());
        let err = money.div_checked(divisor, None).unwrap_err();
        prop_assert_eq!(err.code(), "DIVISION_REQUIRES_ROUNDING");

        // Supplying a mode always succeeds at canonical precision
        let rounded = money
            .div_checked(divisor, Some(RoundingMode::HalfExpand))
            .unwrap();
        let MoneyAmount::Fixed(fixed) = &rounded.amount else {
            panic!("rounded division must narrow to fixed-point");
        };
        prop_assert_eq!(fixed.decimals, 2);
    }
}
