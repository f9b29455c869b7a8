//! Domain layer: stored records and their enumerations.
//!
//! Each record type implements [`Entity`](crate::persistence::Entity) so
//! it can be stored by any repository backend. Records created through the
//! API also implement [`Editable`], and records that only exist under a
//! parent implement [`Child`].

/// Lists `(column, value)` pairs for the named fields of `$src`.
macro_rules! columns {
    ($src:expr; $($field:ident),+ $(,)?) => {
        vec![$(
            (
                stringify!($field),
                $crate::query::Value::from(::std::borrow::ToOwned::to_owned(&$src.$field)),
            ),
        )+]
    };
}

/// Declares an enumeration stored as text.
///
/// Generates serde, OpenAPI and `sqlx` support, `as_str`, `Display`,
/// `FromStr`, and conversion into a filter [`Value`](crate::query::Value).
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Stored text form.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::domain::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err($crate::domain::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl sqlx::Type<sqlx::Postgres> for $name {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
                <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $name {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let text = <&str as sqlx::Decode<'r, sqlx::Postgres>>::decode(value)?;
                Ok(text.parse::<Self>()?)
            }
        }

        impl From<$name> for $crate::query::Value {
            fn from(v: $name) -> Self {
                Self::Text(Some(v.as_str().to_string()))
            }
        }

        impl From<Option<$name>> for $crate::query::Value {
            fn from(v: Option<$name>) -> Self {
                Self::Text(v.map(|v| v.as_str().to_string()))
            }
        }
    };
}

pub mod exercise;
pub mod food_item;
pub mod meal;
pub mod nutrition;
pub mod record;
pub mod user;
pub mod workout;

pub use exercise::{Difficulty, Exercise, ExerciseDetails, ExerciseType};
pub use food_item::{FoodItem, FoodItemDetails, FoodSource};
pub use meal::{Meal, MealDetails, MealFoodItem, MealFoodItemDetails, MealType};
pub use nutrition::{ActivityLevel, Biometric, BiometricDetails, NutritionGoal, NutritionGoalDetails};
pub use record::{Child, Editable, NewRecord};
pub use user::{User, UserProfile};
pub use workout::{
    DayOfWeek, PlanExercise, PlanExerciseDetails, SessionLog, SessionLogDetails, SessionStatus,
    WorkoutPlan, WorkoutPlanDetails, WorkoutSession, WorkoutSessionDetails,
};

/// Text that names no variant of a stored enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Enumeration name.
    pub kind: &'static str,
    /// Offending text.
    pub value: String,
}
