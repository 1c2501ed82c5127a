//! The six forecast aggregations, expressed as lazy polars pipelines over an observation frame.
//!
//! Every pipeline first restricts the frame to `hours_forecast <= hours`. The horizon must
//! already be validated; see [`crate::validate_horizon`].

use crate::types::observation::{
    COL_CITY, COL_DATETIME, COL_HOURS_FORECAST, COL_TEMP, COL_WEATHER, COL_WEATHER_DESCRIPTION,
    COL_WIND_SPEED,
};
use polars::prelude::*;

pub const COL_PERCENTAGE: &str = "percentage";
pub const COL_AVERAGE_TEMP: &str = "average_temp";
pub const COL_HIGHEST_TEMP: &str = "highest_temp";
pub const COL_MAX_TEMP: &str = "max_temp";
pub const COL_MIN_TEMP: &str = "min_temp";
pub const COL_HIGHEST_TEMP_VARIATION: &str = "highest_temp_variation";

/// Whether an extremum is taken over the whole horizon-filtered table or per city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtremumScope {
    /// Rows holding the maximum over all cities. Ties across cities all survive.
    #[default]
    Global,
    /// Rows holding each city's own maximum; at least one row per city.
    PerCity,
}

pub trait ForecastQueryExt {
    /// Keeps rows with `hours_forecast <= hours`.
    fn within_hours(self, hours: u32) -> LazyFrame;

    /// Share of the horizon spent in each `(city, weather, weather_description)` combination.
    ///
    /// Columns: `city, weather, weather_description, percentage`, where
    /// `percentage = round(count / hours * 100)`. Rows are ordered by city ascending, then
    /// percentage descending, then weather and description ascending.
    fn distinct_weather(self, hours: u32) -> LazyFrame;

    /// The rows of [`Self::distinct_weather`] holding each city's highest percentage.
    ///
    /// Columns: `city, weather, weather_description`. Tied conditions all survive.
    fn most_common_weather(self, hours: u32) -> LazyFrame;

    /// Columns: `city, average_temp`, with the mean rounded to two decimals. One row per city.
    fn average_temp(self, hours: u32) -> LazyFrame;

    /// Columns: `datetime, city, highest_temp`. Every tied row survives, ordered by city
    /// then datetime.
    fn highest_temp(self, hours: u32, scope: ExtremumScope) -> LazyFrame;

    /// Columns: `city, max_temp, min_temp, highest_temp_variation`.
    ///
    /// Computes each city's temperature range, then keeps the city or cities with the
    /// largest one. The variation is reported rounded to two decimals.
    fn highest_temp_variation(self, hours: u32) -> LazyFrame;

    /// Columns: `datetime, city, wind_speed_m_s`. Same shape and tie policy as
    /// [`Self::highest_temp`].
    fn strongest_wind(self, hours: u32, scope: ExtremumScope) -> LazyFrame;
}

impl ForecastQueryExt for LazyFrame {
    fn within_hours(self, hours: u32) -> LazyFrame {
        self.filter(col(COL_HOURS_FORECAST).lt_eq(lit(i64::from(hours))))
    }

    fn distinct_weather(self, hours: u32) -> LazyFrame {
        let percentage = (len().cast(DataType::Float64) / lit(f64::from(hours)) * lit(100.0))
            .round(0)
            .alias(COL_PERCENTAGE);

        self.within_hours(hours)
            .group_by([col(COL_CITY), col(COL_WEATHER), col(COL_WEATHER_DESCRIPTION)])
            .agg([percentage])
            .sort_by_exprs(
                [
                    col(COL_CITY),
                    col(COL_PERCENTAGE),
                    col(COL_WEATHER),
                    col(COL_WEATHER_DESCRIPTION),
                ],
                SortMultipleOptions::default()
                    .with_order_descending_multi([false, true, false, false]),
            )
    }

    fn most_common_weather(self, hours: u32) -> LazyFrame {
        self.distinct_weather(hours)
            .filter(col(COL_PERCENTAGE).eq(col(COL_PERCENTAGE).max().over([col(COL_CITY)])))
            .select([
                col(COL_CITY),
                col(COL_WEATHER),
                col(COL_WEATHER_DESCRIPTION),
            ])
    }

    fn average_temp(self, hours: u32) -> LazyFrame {
        self.within_hours(hours)
            .group_by([col(COL_CITY)])
            .agg([col(COL_TEMP).mean().round(2).alias(COL_AVERAGE_TEMP)])
            .sort_by_exprs([col(COL_CITY)], SortMultipleOptions::default())
    }

    fn highest_temp(self, hours: u32, scope: ExtremumScope) -> LazyFrame {
        self.within_hours(hours)
            .filter(is_maximum(COL_TEMP, scope))
            .select([
                col(COL_DATETIME),
                col(COL_CITY),
                col(COL_TEMP).alias(COL_HIGHEST_TEMP),
            ])
            .sort_by_exprs(
                [col(COL_CITY), col(COL_DATETIME)],
                SortMultipleOptions::default(),
            )
    }

    fn highest_temp_variation(self, hours: u32) -> LazyFrame {
        self.within_hours(hours)
            .group_by([col(COL_CITY)])
            .agg([
                col(COL_TEMP).max().alias(COL_MAX_TEMP),
                col(COL_TEMP).min().alias(COL_MIN_TEMP),
            ])
            .with_column((col(COL_MAX_TEMP) - col(COL_MIN_TEMP)).alias(COL_HIGHEST_TEMP_VARIATION))
            // argmax on the unrounded range
            .filter(
                col(COL_HIGHEST_TEMP_VARIATION).eq(col(COL_HIGHEST_TEMP_VARIATION).max()),
            )
            .select([
                col(COL_CITY),
                col(COL_MAX_TEMP),
                col(COL_MIN_TEMP),
                col(COL_HIGHEST_TEMP_VARIATION).round(2),
            ])
            .sort_by_exprs([col(COL_CITY)], SortMultipleOptions::default())
    }

    fn strongest_wind(self, hours: u32, scope: ExtremumScope) -> LazyFrame {
        self.within_hours(hours)
            .filter(is_maximum(COL_WIND_SPEED, scope))
            .select([col(COL_DATETIME), col(COL_CITY), col(COL_WIND_SPEED)])
            .sort_by_exprs(
                [col(COL_CITY), col(COL_DATETIME)],
                SortMultipleOptions::default(),
            )
    }
}

/// Predicate selecting the rows where `column` equals its maximum within `scope`.
fn is_maximum(column: &str, scope: ExtremumScope) -> Expr {
    let maximum = match scope {
        ExtremumScope::Global => col(column).max(),
        ExtremumScope::PerCity => col(column).max().over([col(COL_CITY)]),
    };
    col(column).eq(maximum)
}
