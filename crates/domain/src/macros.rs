//! Macro for implementing Display and FromStr for status-like enums
//!
//! Used by [`FlightStatus`](crate::FlightStatus) and
//! [`LegType`](crate::LegType) so that the wire spelling lives in one place.
//! Parsing is case-insensitive and treats `_` and spaces as `-`, so
//! `"ON_TIME"`, `"on time"` and `"on-time"` all parse to the same variant.
//!
//! # Example
//!
//! ```rust
//! use fids_domain::impl_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum GateState {
//!     Open,
//!     FinalCall,
//!     Closed,
//! }
//!
//! impl_status_conversions!(GateState {
//!     Open => "open",
//!     FinalCall => "final-call",
//!     Closed => "closed",
//! });
//!
//! assert_eq!("FINAL_CALL".parse::<GateState>().unwrap(), GateState::FinalCall);
//! ```

/// Implements `Display`, `FromStr` and `as_str` for status enums.
///
/// `FromStr` returns [`FidsError::Validation`](crate::FidsError::Validation)
/// naming the enum and the rejected input.
#[macro_export]
macro_rules! impl_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical kebab-case spelling.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::FidsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
                match normalized.as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::FidsError::Validation(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum GateState {
        Open,
        FinalCall,
        Closed,
    }

    impl_status_conversions!(GateState {
        Open => "open",
        FinalCall => "final-call",
        Closed => "closed",
    });

    #[test]
    fn display_uses_canonical_spelling() {
        assert_eq!(GateState::Open.to_string(), "open");
        assert_eq!(GateState::FinalCall.to_string(), "final-call");
        assert_eq!(GateState::Closed.as_str(), "closed");
    }

    #[test]
    fn parsing_accepts_case_and_separator_variants() {
        assert_eq!(GateState::from_str("final-call").unwrap(), GateState::FinalCall);
        assert_eq!(GateState::from_str("FINAL_CALL").unwrap(), GateState::FinalCall);
        assert_eq!(GateState::from_str(" Final Call ").unwrap(), GateState::FinalCall);
        assert_eq!(GateState::from_str("CLOSED").unwrap(), GateState::Closed);
    }

    #[test]
    fn parsing_rejects_unknown_values() {
        let err = GateState::from_str("boarding").unwrap_err();
        assert!(err.to_string().contains("Invalid GateState: boarding"));
        assert!(GateState::from_str("").is_err());
    }
}
