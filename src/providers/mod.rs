pub mod frankfurter_provider;
pub mod manual_provider;
pub mod rate_provider;

pub use frankfurter_provider::FrankfurterProvider;
pub use manual_provider::FixedRateProvider;
pub use rate_provider::{RateProviderError, RateProviderTrait, RateQuote};
