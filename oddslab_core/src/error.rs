use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },
    #[error("statistics requested over an empty batch")]
    EmptyBatch,
    #[error("insufficient cards: needed {needed}, available {available}")]
    InsufficientCards { needed: usize, available: usize },
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// Largest accepted stake per trial.
pub const MAX_BET: f64 = 1e9;
/// Largest accepted payout multiplier. `MAX_BET * MAX_MULTIPLIER` keeps
/// payouts, and their sums over any realistic batch, finite.
pub const MAX_MULTIPLIER: f64 = 1e6;

/// Bets must be strictly positive and at most [`MAX_BET`].
pub fn check_bet(bet_amount: f64) -> SimResult<f64> {
    if !bet_amount.is_finite() || bet_amount <= 0.0 || bet_amount > MAX_BET {
        return Err(SimError::invalid(
            "bet_amount",
            format!("must be a positive number up to {MAX_BET}, got {bet_amount}"),
        ));
    }
    Ok(bet_amount)
}

pub fn check_multiplier(field: &'static str, value: f64) -> SimResult<f64> {
    if !value.is_finite() || value < 0.0 || value > MAX_MULTIPLIER {
        return Err(SimError::invalid(
            field,
            format!("must be a non-negative number up to {MAX_MULTIPLIER}, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bet_validation() {
        assert_eq!(check_bet(2.5), Ok(2.5));
        assert!(check_bet(0.0).is_err());
        assert!(check_bet(-1.0).is_err());
        assert!(check_bet(f64::NAN).is_err());
        assert!(check_bet(f64::INFINITY).is_err());
        assert_eq!(check_bet(MAX_BET), Ok(MAX_BET));
        assert!(check_bet(1e307).is_err());
    }

    #[test]
    fn multiplier_validation() {
        assert_eq!(check_multiplier("m", 0.0), Ok(0.0));
        assert_eq!(check_multiplier("m", MAX_MULTIPLIER), Ok(MAX_MULTIPLIER));
        assert!(check_multiplier("m", MAX_MULTIPLIER * 10.0).is_err());
        assert!(check_multiplier("m", -0.5).is_err());
    }

    #[test]
    fn error_messages_name_the_field() {
        let err = SimError::invalid("sides", "must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `sides`: must be at least 2"
        );
        let err = SimError::InsufficientCards {
            needed: 2,
            available: 1,
        };
        assert_eq!(err.to_string(), "insufficient cards: needed 2, available 1");
    }
}
