use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_YEARS: u32 = 100;
const MONTHS_PER_YEAR: u32 = 12;

/// Inputs for the compound-interest visualization.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthParams {
    pub principal: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    pub years: u32,
}

/// Balance snapshot at the end of a year; year 0 is the starting point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct YearProjection {
    pub year: u32,
    pub balance: f64,
    pub contributed: f64,
    pub interest: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
    #[error("horizon of {0} years exceeds the maximum of {MAX_YEARS}")]
    HorizonTooLong(u32),
    #[error("balance overflowed in year {year}")]
    Overflow { year: u32 },
}

/// Project a balance with monthly compounding and end-of-month deposits.
///
/// Amounts are rounded to cents in the output; the running balance is not.
pub fn project_growth(params: GrowthParams) -> Result<Vec<YearProjection>, SimulationError> {
    check_amount("principal", params.principal)?;
    check_amount("monthly_contribution", params.monthly_contribution)?;
    check_amount("annual_rate_percent", params.annual_rate_percent)?;
    if params.years > MAX_YEARS {
        return Err(SimulationError::HorizonTooLong(params.years));
    }

    let monthly_rate = params.annual_rate_percent / 100.0 / f64::from(MONTHS_PER_YEAR);
    let mut balance = params.principal;
    let mut contributed = params.principal;
    let mut table = Vec::with_capacity(params.years as usize + 1);
    table.push(snapshot(0, balance, contributed));

    for year in 1..=params.years {
        for _ in 0..MONTHS_PER_YEAR {
            balance = balance * (1.0 + monthly_rate) + params.monthly_contribution;
            contributed += params.monthly_contribution;
        }
        if !balance.is_finite() || !contributed.is_finite() {
            return Err(SimulationError::Overflow { year });
        }
        table.push(snapshot(year, balance, contributed));
    }

    Ok(table)
}

fn check_amount(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::InvalidAmount { field, value })
    }
}

fn snapshot(year: u32, balance: f64, contributed: f64) -> YearProjection {
    YearProjection {
        year,
        balance: cents(balance),
        contributed: cents(contributed),
        interest: cents(balance - contributed),
    }
}

fn cents(amount: f64) -> f64 {
    let scaled = amount * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(principal: f64, monthly: f64, rate: f64, years: u32) -> GrowthParams {
        GrowthParams {
            principal,
            monthly_contribution: monthly,
            annual_rate_percent: rate,
            years,
        }
    }

    #[test]
    fn compounds_monthly() {
        let table = project_growth(params(1000.0, 0.0, 12.0, 2)).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].balance, 1000.0);
        assert_eq!(table[1].balance, 1126.83);
        assert_eq!(table[1].interest, 126.83);
        assert_eq!(table[2].balance, 1269.73);
    }

    #[test]
    fn zero_rate_only_adds_contributions() {
        let table = project_growth(params(500.0, 100.0, 0.0, 2)).unwrap();
        let last = table.last().unwrap();
        assert_eq!(last.year, 2);
        assert_eq!(last.balance, 2900.0);
        assert_eq!(last.contributed, 2900.0);
        assert_eq!(last.interest, 0.0);
    }

    #[test]
    fn zero_years_is_starting_point() {
        let table = project_growth(params(250.0, 50.0, 5.0, 0)).unwrap();
        assert_eq!(
            table,
            vec![YearProjection {
                year: 0,
                balance: 250.0,
                contributed: 250.0,
                interest: 0.0,
            }]
        );
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            project_growth(params(-1.0, 0.0, 5.0, 1)),
            Err(SimulationError::InvalidAmount {
                field: "principal",
                value: -1.0,
            })
        );
        assert!(project_growth(params(0.0, f64::NAN, 5.0, 1)).is_err());
        assert!(project_growth(params(0.0, 0.0, f64::INFINITY, 1)).is_err());
        assert_eq!(
            project_growth(params(0.0, 0.0, 5.0, 101)),
            Err(SimulationError::HorizonTooLong(101))
        );
    }

    #[test]
    fn reports_overflowing_balance() {
        let err = project_growth(params(1000.0, 0.0, 1.0e6, 100)).unwrap_err();
        assert!(matches!(err, SimulationError::Overflow { year } if year < 100));
        assert!(err.to_string().contains("overflowed"));

        let big = project_growth(params(f64::MAX, f64::MAX, 0.0, 1));
        assert_eq!(big, Err(SimulationError::Overflow { year: 1 }));

        let start = project_growth(params(f64::MAX, 0.0, 0.0, 0)).unwrap();
        assert_eq!(start[0].balance, f64::MAX);
    }
}
