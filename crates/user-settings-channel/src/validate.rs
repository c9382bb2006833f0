//! Channel address validation

use regex::Regex;

use crate::prelude::*;
use user_settings_types::error::ValidationFailure;

pub const EMAIL_MAX_LENGTH: usize = 255;
pub const DIIA_ADDRESS_LENGTH: usize = 10;

/// Top level domains blocked regardless of configuration
pub const DEFAULT_RESTRICTED_DOMAINS: &[&str] = &["ru", "by"];

const FIELD_REQUIRED: &str = "Поле обов'язкове";

pub const EMAIL_EMPTY: ValidationFailure =
	ValidationFailure::new("E-EMAIL-EMPTY", "Email address is empty", FIELD_REQUIRED);
pub const EMAIL_TOO_LONG: ValidationFailure = ValidationFailure::new(
	"E-EMAIL-TOO-LONG",
	"Email address is too long",
	"Адреса електронної пошти задовга",
);
pub const EMAIL_INVALID: ValidationFailure = ValidationFailure::new(
	"E-EMAIL-INVALID",
	"Email address is not valid",
	"Невірний формат адреси електронної пошти",
);
pub const EMAIL_RESTRICTED_DOMAIN: ValidationFailure = ValidationFailure::new(
	"E-EMAIL-RESTRICTED-DOMAIN",
	"Email address has restricted domain",
	"Недопустимий домен адреси електронної пошти",
);
pub const DIIA_EMPTY: ValidationFailure =
	ValidationFailure::new("E-DIIA-EMPTY", "Diia address is empty", FIELD_REQUIRED);
pub const DIIA_INVALID: ValidationFailure =
	ValidationFailure::new("E-DIIA-INVALID", "Diia address is not valid", "Невірний формат РНОКПП");
pub const VERIFICATION_CODE_EMPTY: ValidationFailure = ValidationFailure::new(
	"E-VERIFICATION-CODE-EMPTY",
	"Verification code is empty",
	FIELD_REQUIRED,
);
pub const DEACTIVATION_REASON_EMPTY: ValidationFailure = ValidationFailure::new(
	"E-DEACTIVATION-REASON-EMPTY",
	"Deactivation reason is empty",
	FIELD_REQUIRED,
);

/// Validates addresses for every channel
///
/// Built once at start and registered as an app extension.
pub struct AddressValidator {
	email_re: Regex,
	restricted_domains: Box<[Box<str>]>,
}

impl AddressValidator {
	pub fn new<S: AsRef<str>>(restricted_domains: &[S]) -> AppResult<Self> {
		let email_re = Regex::new(
			r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
		)
		.map_err(|e| Error::Internal(format!("Invalid email pattern: {}", e)))?;

		let restricted_domains = DEFAULT_RESTRICTED_DOMAINS
			.iter()
			.copied()
			.chain(restricted_domains.iter().map(AsRef::as_ref))
			.map(|d| d.trim().trim_start_matches('.').to_ascii_lowercase())
			.filter(|d| !d.is_empty())
			.map(Into::into)
			.collect();

		Ok(Self { email_re, restricted_domains })
	}

	pub fn validate(&self, channel: Channel, address: &str) -> Result<(), ValidationFailure> {
		match channel {
			Channel::Email => self.validate_email(address),
			Channel::Diia => validate_diia(address),
		}
	}

	pub fn validate_email(&self, address: &str) -> Result<(), ValidationFailure> {
		if address.trim().is_empty() {
			return Err(EMAIL_EMPTY);
		}
		if address.chars().count() > EMAIL_MAX_LENGTH {
			return Err(EMAIL_TOO_LONG);
		}
		if !self.email_re.is_match(address) {
			return Err(EMAIL_INVALID);
		}

		let domain = address.rsplit_once('@').map_or("", |(_, d)| d).to_ascii_lowercase();
		let restricted = self.restricted_domains.iter().any(|r| {
			domain == r.as_ref()
				|| domain.strip_suffix(r.as_ref()).is_some_and(|prefix| prefix.ends_with('.'))
		});
		if restricted {
			return Err(EMAIL_RESTRICTED_DOMAIN);
		}

		Ok(())
	}
}

/// The Diia address is the citizen's 10 digit tax number
pub fn validate_diia(address: &str) -> Result<(), ValidationFailure> {
	if address.trim().is_empty() {
		return Err(DIIA_EMPTY);
	}
	if address.len() != DIIA_ADDRESS_LENGTH || !address.bytes().all(|b| b.is_ascii_digit()) {
		return Err(DIIA_INVALID);
	}
	Ok(())
}


// vim: ts=4
