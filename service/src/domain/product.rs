//! [`Product`] definitions.

use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(doc)]
use common::DateTime;
#[cfg(doc)]
use crate::domain::Contract;

/// Physical product available for rent under [`Contract`]s.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// [`Object`] this [`Product`] represents.
    pub object: Object,

    /// [`Brand`] of this [`Product`].
    pub brand: Brand,

    /// [`Model`] of this [`Product`].
    pub model: Model,

    /// Number of units of this [`Product`] owned by the agency.
    pub quantity: Quantity,

    /// [`Description`] of this [`Product`].
    pub description: Description,

    /// [`Precautions`] to be taken when handling this [`Product`].
    pub precautions: Precautions,

    /// [`Money`] charged for renting one unit for a single day.
    pub price_per_day: Money,

    /// [`Money`] charged for renting one unit for a full week.
    pub price_per_week: Money,

    /// [`Money`] deposited as a caution for one unit.
    pub deposit: Money,

    /// [`DateTime`] when this [`Product`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Product`] was removed from the catalog.
    ///
    /// Removed [`Product`]s are kept for existing [`Contract`]s to resolve.
    pub deleted_at: Option<DeletionDateTime>,
}

/// ID of a [`Product`].
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

/// Number of [`Product`] units owned by the agency.
pub type Quantity = i32;

/// Object a [`Product`] represents ("excavator", "projector", etc).
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Object(String);

impl Object {
    /// Creates a new [`Object`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `object` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(object: impl Into<String>) -> Self {
        Self(object.into())
    }

    /// Creates a new [`Object`] if the given `object` is valid.
    #[must_use]
    pub fn new(object: impl Into<String>) -> Option<Self> {
        let object = object.into();
        Self::check(&object).then_some(Self(object))
    }

    /// Checks whether the given `object` is a valid [`Object`].
    fn check(object: impl AsRef<str>) -> bool {
        let object = object.as_ref();
        object.trim() == object && !object.is_empty() && object.len() <= 512
    }
}

impl FromStr for Object {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Object`")
    }
}

/// Brand of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Brand(String);

impl Brand {
    /// Creates a new [`Brand`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `brand` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(brand: impl Into<String>) -> Self {
        Self(brand.into())
    }

    /// Creates a new [`Brand`] if the given `brand` is valid.
    #[must_use]
    pub fn new(brand: impl Into<String>) -> Option<Self> {
        let brand = brand.into();
        Self::check(&brand).then_some(Self(brand))
    }

    /// Checks whether the given `brand` is a valid [`Brand`].
    fn check(brand: impl AsRef<str>) -> bool {
        let brand = brand.as_ref();
        brand.trim() == brand && !brand.is_empty() && brand.len() <= 512
    }
}

impl FromStr for Brand {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Brand`")
    }
}

/// Model of a [`Product`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 512
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Description of a [`Product`].
///
/// May be empty, unlike an [`Object`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `description` matches the
    /// format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(description: impl Into<String>) -> Self {
        Self(description.into())
    }

    /// Creates a new [`Description`] if the given `description` is valid.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Option<Self> {
        let description = description.into();
        Self::check(&description).then_some(Self(description))
    }

    /// Checks whether the given `description` is a valid [`Description`].
    fn check(description: impl AsRef<str>) -> bool {
        let description = description.as_ref();
        description.trim() == description && description.len() <= 1024
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Precautions to be taken when handling a [`Product`].
///
/// May be empty, like a [`Description`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Precautions(String);

impl Precautions {
    /// Creates a new [`Precautions`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `precautions` match the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(precautions: impl Into<String>) -> Self {
        Self(precautions.into())
    }

    /// Creates new [`Precautions`] if the given `precautions` are valid.
    #[must_use]
    pub fn new(precautions: impl Into<String>) -> Option<Self> {
        let precautions = precautions.into();
        Self::check(&precautions).then_some(Self(precautions))
    }

    /// Checks whether the given `precautions` are valid [`Precautions`].
    fn check(precautions: impl AsRef<str>) -> bool {
        let precautions = precautions.as_ref();
        precautions.trim() == precautions && precautions.len() <= 1024
    }
}

impl FromStr for Precautions {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Precautions`")
    }
}

/// [`DateTime`] when a [`Product`] was created.
pub type CreationDateTime = DateTimeOf<(Product, unit::Creation)>;

/// [`DateTime`] when a [`Product`] was removed from the catalog.
pub type DeletionDateTime = DateTimeOf<(Product, unit::Deletion)>;

#[cfg(test)]
mod spec {
    use super::{Description, Object};

    #[test]
    fn object_requires_trimmed_non_empty_input() {
        assert!(Object::new("Excavator").is_some());
        assert!(Object::new("").is_none());
        assert!(Object::new(" Excavator").is_none());
        assert!(Object::new("Excavator ").is_none());
    }

    #[test]
    fn description_may_be_empty() {
        assert!(Description::new("").is_some());
        assert!(Description::new("21-ton tracked excavator").is_some());
        assert!(Description::new(" padded ").is_none());
    }
}
