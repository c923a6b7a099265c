//! [`Contract`] definitions.

use common::{unit, Date, DateOf, DateTimeOf, Money, Period};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{product, user, Product};
#[cfg(doc)]
use crate::domain::User;

/// Rental [`Contract`] leasing some quantity of a [`Product`] to a [`User`]
/// for an inclusive window of calendar [`Date`]s.
///
/// Related [`Product`] and [`User`] are referenced by ID only and are resolved
/// at read time.
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the rented [`Product`].
    pub product_id: product::Id,

    /// ID of the renting [`User`].
    pub user_id: user::Id,

    /// Number of [`Product`] units leased under this [`Contract`].
    pub quantity: Quantity,

    /// Declared length of the rental in days.
    pub rental_days: RentalDays,

    /// Total [`Money`] amount charged for this [`Contract`].
    pub total_amount: Money,

    /// [`Condition`] of the [`Product`] recorded at handover.
    pub state_before: Condition,

    /// [`Condition`] of the [`Product`] recorded at return, if it happened.
    pub state_after: Option<Condition>,

    /// [`Date`] when the [`Product`] was handed over.
    pub usage_date: UsageDate,

    /// [`Date`] when the [`Product`] was returned, if it was.
    pub retrieval_date: Option<RetrievalDate>,

    /// First [`Date`] of the rental window.
    pub start_date: StartDate,

    /// Last [`Date`] of the rental window.
    pub end_date: EndDate,

    /// [`DateTime`] when this [`Contract`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl Contract {
    /// Returns the current [`Phase`] of this [`Contract`].
    ///
    /// The [`Phase`] is never stored, but derived from the recorded return
    /// data and the rental window every time it's asked for.
    #[must_use]
    pub fn phase(&self) -> Phase {
        use Phase as P;

        if self.state_after.is_some() && self.retrieval_date.is_some() {
            return P::Closed;
        }

        if Date::today() >= self.start_date.coerce() {
            return P::InUse;
        }

        P::Drafted
    }

    /// Indicates whether the rental window of this [`Contract`] intersects
    /// the given [`Period`].
    ///
    /// Both endpoints of the window are inclusive.
    #[must_use]
    pub fn overlaps(&self, window: &Period) -> bool {
        self.start_date.coerce() <= window.end()
            && self.end_date.coerce() >= window.start()
    }

    /// Calculates the total [`Money`] amount for renting the given `quantity`
    /// of the [`Product`] during `days`.
    ///
    /// Full weeks are billed at the weekly price and the remaining days at
    /// the daily one, with the sum multiplied by the `quantity`.
    #[must_use]
    pub fn calculate_total(
        product: &Product,
        quantity: Quantity,
        days: RentalDays,
    ) -> Money {
        let weeks = product.price_per_week.scaled(Decimal::from(days / 7));
        let rest = product.price_per_day.scaled(Decimal::from(days % 7));

        Money {
            amount: (weeks.amount + rest.amount) * Decimal::from(quantity),
            currency: product.price_per_day.currency,
        }
    }
}

/// ID of a [`Contract`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Number of [`Product`] units leased under a [`Contract`].
pub type Quantity = i32;

/// Length of a [`Contract`]'s rental in days.
pub type RentalDays = i32;

/// Recorded physical [`Condition`] of a rented [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Condition(String);

impl Condition {
    /// Creates a new [`Condition`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `state` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(state: impl Into<String>) -> Self {
        Self(state.into())
    }

    /// Creates a new [`Condition`] if the given `state` is valid.
    #[must_use]
    pub fn new(state: impl Into<String>) -> Option<Self> {
        let state = state.into();
        Self::check(&state).then_some(Self(state))
    }

    /// Checks whether the given `state` is a valid [`Condition`].
    fn check(state: impl AsRef<str>) -> bool {
        let state = state.as_ref();
        state.trim() == state && !state.is_empty() && state.len() <= 1024
    }
}

impl FromStr for Condition {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Condition`")
    }
}

/// Lifecycle [`Phase`] of a [`Contract`].
///
/// Never stored, always computed via [`Contract::phase()`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Phase {
    /// The rental window hasn't opened yet.
    #[display("DRAFTED")]
    Drafted,

    /// The rental window has opened and the [`Product`] wasn't returned yet.
    #[display("IN_USE")]
    InUse,

    /// The [`Product`] was returned and its post-rental state recorded.
    #[display("CLOSED")]
    Closed,
}

/// [`DateTime`] when a [`Contract`] was created.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// Marker type indicating the opening of a rental window.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// First [`Date`] of a [`Contract`]'s rental window.
pub type StartDate = DateOf<(Contract, Start)>;

/// Marker type indicating the closing of a rental window.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// Last [`Date`] of a [`Contract`]'s rental window.
pub type EndDate = DateOf<(Contract, End)>;

/// Marker type indicating a [`Product`] handover.
#[derive(Clone, Copy, Debug)]
pub struct Usage;

/// [`Date`] when a [`Product`] was handed over under a [`Contract`].
pub type UsageDate = DateOf<(Contract, Usage)>;

/// Marker type indicating a [`Product`] return.
#[derive(Clone, Copy, Debug)]
pub struct Retrieval;

/// [`Date`] when a [`Product`] was returned under a [`Contract`].
pub type RetrievalDate = DateOf<(Contract, Retrieval)>;

#[cfg(test)]
mod spec {
    use common::{Date, DateTime, Money, Period};
    use rust_decimal::Decimal;

    use crate::domain::{product, user, Product};

    use super::{Condition, Contract, Id, Phase};

    fn date(s: &str) -> Date {
        Date::from_calendar_str(s).unwrap()
    }

    fn days_from_today(days: i64) -> Date {
        let today: time::Date = Date::today().into();
        today.checked_add(time::Duration::days(days)).unwrap().into()
    }

    fn product() -> Product {
        Product {
            id: product::Id::new(),
            object: product::Object::new("Excavator").unwrap(),
            brand: product::Brand::new("Komatsu").unwrap(),
            model: product::Model::new("PC210").unwrap(),
            quantity: 3,
            description: product::Description::new("21-ton tracked")
                .unwrap(),
            precautions: product::Precautions::new("Check hydraulics")
                .unwrap(),
            price_per_day: "100USD".parse().unwrap(),
            price_per_week: "600USD".parse().unwrap(),
            deposit: "1000USD".parse().unwrap(),
            created_at: DateTime::now().coerce(),
            deleted_at: None,
        }
    }

    fn contract(start: Date, end: Date) -> Contract {
        let product = product();
        Contract {
            id: Id::new(),
            product_id: product.id,
            user_id: user::Id::new(),
            quantity: 1,
            rental_days: 10,
            total_amount: Contract::calculate_total(&product, 1, 10),
            state_before: Condition::new("good").unwrap(),
            state_after: None,
            usage_date: start.coerce(),
            retrieval_date: None,
            start_date: start.coerce(),
            end_date: end.coerce(),
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn totals_split_weeks_and_days() {
        let product = product();

        // 10 days = 1 week + 3 days: 600 + 3 * 100 = 900.
        assert_eq!(
            Contract::calculate_total(&product, 1, 10).amount,
            Decimal::from(900),
        );

        // Two units double the price.
        assert_eq!(
            Contract::calculate_total(&product, 2, 10).amount,
            Decimal::from(1800),
        );

        // 14 days = exactly 2 weeks.
        assert_eq!(
            Contract::calculate_total(&product, 1, 14).amount,
            Decimal::from(1200),
        );

        // Short rentals are billed daily only.
        assert_eq!(
            Contract::calculate_total(&product, 1, 3).amount,
            Decimal::from(300),
        );
    }

    #[test]
    fn totals_keep_product_currency() {
        let product = product();
        assert_eq!(
            Contract::calculate_total(&product, 2, 9).currency,
            product.price_per_day.currency,
        );
    }

    #[test]
    fn phase_is_drafted_before_window_opens() {
        let c = contract(days_from_today(5), days_from_today(10));
        assert_eq!(c.phase(), Phase::Drafted);
    }

    #[test]
    fn phase_is_in_use_once_window_opens() {
        let c = contract(days_from_today(-2), days_from_today(5));
        assert_eq!(c.phase(), Phase::InUse);
    }

    #[test]
    fn phase_is_closed_after_return_is_recorded() {
        let mut c = contract(days_from_today(-10), days_from_today(-3));
        assert_eq!(c.phase(), Phase::InUse);

        // Both the post-rental state and the return date are required.
        c.state_after = Some(Condition::new("scratched").unwrap());
        assert_eq!(c.phase(), Phase::InUse);

        c.retrieval_date = Some(days_from_today(-3).coerce());
        assert_eq!(c.phase(), Phase::Closed);
    }

    #[test]
    fn window_intersection_is_inclusive() {
        let c = contract(date("2024-03-10"), date("2024-03-15"));

        let window = |s, e| Period::new(date(s), date(e)).unwrap();
        assert!(c.overlaps(&window("2024-03-01", "2024-03-12")));
        assert!(c.overlaps(&window("2024-03-15", "2024-03-20")));
        assert!(c.overlaps(&window("2024-03-01", "2024-03-10")));
        assert!(!c.overlaps(&window("2024-03-01", "2024-03-09")));
        assert!(!c.overlaps(&window("2024-03-16", "2024-03-20")));
    }
}
